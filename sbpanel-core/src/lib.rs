pub mod cli;
pub mod conf;
pub mod event;
pub mod ingest;
pub mod logging;
pub mod persist;
pub mod probe;
pub mod server;
pub mod source;
pub mod state;
pub mod timeline;
