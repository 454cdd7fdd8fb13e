#![allow(dead_code)]

pub const START: &str = "Start logging at: 2024-01-01 23:59:00";
pub const VERSION: &str = "[23:59:01] Info: Server version 'Beta v. Enraged Koala' '645' '0.1.0'";
pub const BOUND: &str = "[23:59:02] Info: TcpServer listening on: 0.0.0.0:21025";
pub const ALICE_IN: &str = "[23:59:30] Info: Client 'Alice' <1> (127.0.0.1:52000) connected";
pub const ALICE_OUT: &str = "[00:10:00] Info: Client 'Alice' <1> (127.0.0.1:52000) disconnected";
pub const ALICE_HELLO: &str = "[00:00:05] Info: Chat: <Alice> hello";
pub const WORLD_UP: &str = "[23:59:40] Info: Loading world db for world alpha:1:2";
pub const WORLD_DOWN: &str = "[00:05:00] Info: Shutting down world alpha:1:2";
