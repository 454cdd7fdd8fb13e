use crate::timeline::Timeline;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ServerStatus::Unknown => "unknown",
            ServerStatus::Online => "online",
            ServerStatus::Offline => "offline",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub last_connect: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_seen: Option<NaiveDateTime>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_connect: None,
            last_seen: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct World {
    pub coords: String,
    #[serde(default)]
    pub last_load: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_unload: Option<NaiveDateTime>,
}

impl World {
    pub fn new(coords: impl Into<String>) -> Self {
        Self {
            coords: coords.into(),
            last_load: None,
            last_unload: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatEntry {
    pub time: Option<NaiveDateTime>,
    pub name: String,
    pub text: String,
}

/// Root aggregate for everything known about the monitored server.
///
/// `players`, `worlds`, `chat`, `status` and `status_changed_at` survive
/// restarts. The rest is rebuilt from the log on every start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerState {
    pub status: ServerStatus,
    pub status_changed_at: Option<NaiveDateTime>,
    pub last_launch: Option<NaiveDateTime>,
    pub version: Option<String>,
    /// Port the game server reported binding, if seen since startup.
    pub port: Option<u16>,
    pub timeline: Timeline,
    pub players: BTreeMap<String, Player>,
    pub worlds: BTreeMap<String, World>,
    pub chat: Vec<ChatEntry>,
    pub(crate) online: BTreeSet<String>,
    pub(crate) active: BTreeSet<String>,
}

impl ServerState {
    pub fn is_online(&self, name: &str) -> bool {
        self.online.contains(name)
    }

    pub fn is_active(&self, coords: &str) -> bool {
        self.active.contains(coords)
    }

    pub fn online_players(&self) -> impl Iterator<Item = &Player> {
        self.online.iter().filter_map(|name| self.players.get(name))
    }

    /// Every known player that is not online.
    pub fn offline_players(&self) -> impl Iterator<Item = &Player> {
        self.players
            .values()
            .filter(|p| !self.online.contains(&p.name))
    }

    pub fn active_worlds(&self) -> impl Iterator<Item = &World> {
        self.active.iter().filter_map(|coords| self.worlds.get(coords))
    }

    /// Forget who is online and what is loaded. Known players all become
    /// offline, known worlds inactive.
    pub(crate) fn clear_presence(&mut self) {
        self.online.clear();
        self.active.clear();
    }
}
