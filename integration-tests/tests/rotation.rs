mod common;

use chrono::NaiveDate;
use common::*;
use integration_tests::harness::{GameServer, TestPanel, free_port};
use sbpanel_core::state::ServerState;
use std::fs;

const RESTART: &str = "Start logging at: 2024-01-03 08:00:00";
const BOB_IN: &str = "[08:00:10] Info: Client 'Bob' <1> (10.0.0.2:40000) connected";

fn launched_jan_3(s: &ServerState) -> bool {
    s.last_launch == NaiveDate::from_ymd_opt(2024, 1, 3).and_then(|d| d.and_hms_opt(8, 0, 0))
}

/// The server moves its log aside and starts a new one.
#[tokio::test]
async fn follows_a_renamed_and_recreated_log() {
    // Arrange
    let game = GameServer::listen(free_port()).await;
    let mut panel = TestPanel::new(game.port());
    panel.write_log(&[START, ALICE_IN]);
    panel.start().await;
    panel.wait_until("login", |s| s.is_online("Alice")).await;

    // Act
    fs::rename(panel.log_path(), panel.dir().join("starbound_server.log.1")).unwrap();
    panel.write_log(&[RESTART, BOB_IN]);

    // Assert
    panel
        .wait_until("new log", |s| s.is_online("Bob") && !s.is_online("Alice"))
        .await;
    panel.stop().await;
}

/// The server truncates its log in place.
#[tokio::test]
async fn follows_a_truncated_log() {
    let game = GameServer::listen(free_port()).await;
    let mut panel = TestPanel::new(game.port());
    panel.write_log(&[START, ALICE_IN, WORLD_UP]);
    panel.start().await;
    panel.wait_until("world", |s| s.is_active("alpha:1:2")).await;

    panel.write_log(&[RESTART]);
    panel.wait_until("relaunch", launched_jan_3).await;
    panel.append(BOB_IN);

    panel.wait_until("bob", |s| s.is_online("Bob")).await;
    let state = panel.stop().await;
    assert!(!state.is_online("Alice"));
    assert!(!state.is_active("alpha:1:2"));
}

/// The log vanishes for a while before coming back.
#[tokio::test]
async fn waits_out_a_missing_log() {
    let game = GameServer::listen(free_port()).await;
    let mut panel = TestPanel::new(game.port());
    panel.write_log(&[START]);
    panel.start().await;
    panel.wait_until("started", |s| s.last_launch.is_some()).await;

    fs::remove_file(panel.log_path()).unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    panel.write_log(&[RESTART, BOB_IN]);

    panel.wait_until("bob", |s| s.is_online("Bob")).await;
    panel.stop().await;
}
