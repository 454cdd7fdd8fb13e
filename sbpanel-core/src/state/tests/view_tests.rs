use super::{at, hms};
use crate::event::Event;
use crate::state::{ServerStatus, StateHandle, StateStore};
use pretty_assertions::assert_eq;

fn populated() -> StateStore {
    let mut store = StateStore::default();
    store.update_status(true, at(1, 8, 0, 0));
    store.apply(
        &Event::PlayerConnected {
            name: "Alice".into(),
            time: hms(9, 0, 0),
        },
        Some(at(1, 9, 0, 0)),
    );
    store.apply(
        &Event::PlayerConnected {
            name: "Bob".into(),
            time: hms(10, 0, 0),
        },
        Some(at(1, 10, 0, 0)),
    );
    store.apply(
        &Event::PlayerDisconnected {
            name: "Bob".into(),
            time: hms(11, 0, 0),
        },
        Some(at(1, 11, 0, 0)),
    );
    store.apply(
        &Event::WorldLoaded {
            coords: "alpha".into(),
            time: hms(9, 30, 0),
        },
        Some(at(1, 9, 30, 0)),
    );
    store
}

#[test]
fn view_reports_presence_with_durations() {
    // Arrange
    let store = populated();
    let now = at(1, 12, 0, 0);

    // Act
    let view = store.view(now);

    // Assert
    assert_eq!(view.status, ServerStatus::Online);
    assert_eq!(view.status_age.as_deref(), Some("4 hours"));
    assert_eq!(view.version, "unknown");

    assert_eq!(view.online_players.len(), 1);
    assert_eq!(view.online_players[0].name, "Alice");
    assert_eq!(view.online_players[0].online_for.as_deref(), Some("3 hours"));

    assert_eq!(view.offline_players.len(), 1);
    assert_eq!(view.offline_players[0].name, "Bob");
    assert_eq!(view.offline_players[0].offline_for.as_deref(), Some("1 hour"));

    assert_eq!(view.active_worlds.len(), 1);
    assert_eq!(view.active_worlds[0].coords, "alpha");
    assert_eq!(
        view.active_worlds[0].active_for.as_deref(),
        Some("2 hours")
    );
}

#[test]
fn offline_players_most_recent_first() {
    let mut store = populated();
    store.apply(
        &Event::PlayerDisconnected {
            name: "Alice".into(),
            time: hms(11, 30, 0),
        },
        Some(at(1, 11, 30, 0)),
    );

    let names: Vec<_> = store
        .view(at(1, 12, 0, 0))
        .offline_players
        .into_iter()
        .map(|p| p.name)
        .collect();

    assert_eq!(names, vec!["Alice", "Bob"]);
}

#[test]
fn view_serializes_to_json() {
    let view = populated().view(at(1, 12, 0, 0));

    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["status"], "online");
    assert_eq!(json["online_players"][0]["name"], "Alice");
    assert_eq!(json["online_players"][0]["connected_at"], "2024-01-01T09:00:00");
}

#[test]
fn handle_publishes_whole_snapshots() {
    let handle = StateHandle::new(Default::default());
    let before = handle.load();

    handle.publish(populated().state().clone());

    assert_eq!(before.players.len(), 0);
    assert_eq!(handle.load().players.len(), 2);
    assert_eq!(handle.view(at(1, 12, 0, 0)).online_players.len(), 1);
}
