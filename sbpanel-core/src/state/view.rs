use crate::state::humanize::time_ago;
use crate::state::model::{ChatEntry, ServerState, ServerStatus};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Read-only projection of [`ServerState`] for presentation layers.
///
/// Durations are pre-rendered relative to the `now` the view was built
/// with, so consumers never touch the underlying maps and sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub status: ServerStatus,
    pub status_changed_at: Option<NaiveDateTime>,
    pub status_age: Option<String>,
    pub version: String,
    pub port: Option<u16>,
    pub last_launch: Option<NaiveDateTime>,
    pub online_players: Vec<OnlinePlayer>,
    pub offline_players: Vec<OfflinePlayer>,
    pub active_worlds: Vec<ActiveWorld>,
    pub chat: Vec<ChatEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnlinePlayer {
    pub name: String,
    pub connected_at: Option<NaiveDateTime>,
    pub online_for: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfflinePlayer {
    pub name: String,
    pub last_seen: Option<NaiveDateTime>,
    pub offline_for: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveWorld {
    pub coords: String,
    pub loaded_at: Option<NaiveDateTime>,
    pub active_for: Option<String>,
}

impl PanelView {
    pub fn from_state(state: &ServerState, now: NaiveDateTime) -> Self {
        let ago = |t: Option<NaiveDateTime>| t.map(|t| time_ago(t, now));

        // Longest-connected first.
        let mut online_players: Vec<OnlinePlayer> = state
            .online_players()
            .map(|p| OnlinePlayer {
                name: p.name.clone(),
                connected_at: p.last_connect,
                online_for: ago(p.last_connect),
            })
            .collect();
        online_players.sort_by(|a, b| a.connected_at.cmp(&b.connected_at));

        // Most recently seen first.
        let mut offline_players: Vec<OfflinePlayer> = state
            .offline_players()
            .map(|p| OfflinePlayer {
                name: p.name.clone(),
                last_seen: p.last_seen,
                offline_for: ago(p.last_seen),
            })
            .collect();
        offline_players.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));

        let active_worlds = state
            .active_worlds()
            .map(|w| ActiveWorld {
                coords: w.coords.clone(),
                loaded_at: w.last_load,
                active_for: ago(w.last_load),
            })
            .collect();

        Self {
            status: state.status,
            status_changed_at: state.status_changed_at,
            status_age: ago(state.status_changed_at),
            version: state
                .version
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            port: state.port,
            last_launch: state.last_launch,
            online_players,
            offline_players,
            active_worlds,
            chat: state.chat.clone(),
        }
    }
}
