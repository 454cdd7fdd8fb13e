mod common;

use common::*;
use integration_tests::harness::{GameServer, TestPanel, free_port};
use pretty_assertions::assert_eq;
use sbpanel_core::state::ServerStatus;

/// Status follows the game port as live lines arrive.
#[tokio::test]
async fn status_tracks_the_game_port() {
    // Arrange: nothing listening yet.
    let port = free_port();
    let mut panel = TestPanel::new(port);
    panel.write_log(&[START]);
    panel.start().await;
    panel
        .wait_until("offline", |s| s.status == ServerStatus::Offline)
        .await;

    // Act
    let game = GameServer::listen(port).await;
    panel.append(ALICE_IN);

    // Assert
    panel
        .wait_until("online", |s| s.status == ServerStatus::Online)
        .await;
    let state = panel.stop().await;
    assert_eq!(game.port(), port);
    assert!(state.status_changed_at.is_some());
    assert!(state.is_online("Alice"));
}

/// Going offline clears who is online.
#[tokio::test]
async fn offline_transition_clears_presence() {
    let port = free_port();
    let game = GameServer::listen(port).await;
    let mut panel = TestPanel::new(port);
    panel.write_log(&[START, ALICE_IN]);
    panel.start().await;
    panel.wait_until("login", |s| s.is_online("Alice")).await;

    drop(game);
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    panel.append(WORLD_UP);

    panel
        .wait_until("offline", |s| s.status == ServerStatus::Offline)
        .await;
    let state = panel.state().load();
    assert_eq!(state.online_players().count(), 0);
    assert_eq!(state.active_worlds().count(), 0);
    panel.stop().await;
}
