use crate::state::{ChatEntry, Player, ServerState, ServerStatus, World};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PersistedState {
    pub version: u32,

    #[serde(default)]
    pub players: BTreeMap<String, Player>,

    #[serde(default)]
    pub worlds: BTreeMap<String, World>,

    #[serde(default)]
    pub status: ServerStatus,

    #[serde(default)]
    pub status_changed_at: Option<NaiveDateTime>,

    #[serde(default)]
    pub chat: Vec<ChatEntry>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            players: BTreeMap::new(),
            worlds: BTreeMap::new(),
            status: ServerStatus::default(),
            status_changed_at: None,
            chat: Vec::new(),
        }
    }
}

impl From<&ServerState> for PersistedState {
    fn from(state: &ServerState) -> Self {
        Self {
            version: SCHEMA_VERSION,
            players: state.players.clone(),
            worlds: state.worlds.clone(),
            status: state.status,
            status_changed_at: state.status_changed_at,
            chat: state.chat.clone(),
        }
    }
}

/// Everyone starts offline and every world inactive until the log says
/// otherwise.
impl From<PersistedState> for ServerState {
    fn from(persisted: PersistedState) -> Self {
        Self {
            status: persisted.status,
            status_changed_at: persisted.status_changed_at,
            players: persisted.players,
            worlds: persisted.worlds,
            chat: persisted.chat,
            ..ServerState::default()
        }
    }
}
