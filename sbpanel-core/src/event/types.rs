use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Chat messages starting with this character are server commands.
pub const COMMAND_PREFIX: char = '/';

/// A structured fact extracted from one log line.
///
/// `time` is the bare time-of-day printed on the line. Plain-format logs do
/// not print one, in which case it is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ServerStarted {
        date: NaiveDate,
        time: NaiveTime,
    },
    /// `launch` is set when the line is the only launch signal the log
    /// gives, as in plain-format logs without a start marker.
    VersionAnnounced {
        version: String,
        launch: bool,
    },
    /// The game server bound its TCP listener.
    PortBound {
        port: u16,
    },
    PlayerConnected {
        name: String,
        time: Option<NaiveTime>,
    },
    PlayerDisconnected {
        name: String,
        time: Option<NaiveTime>,
    },
    WorldLoaded {
        coords: String,
        time: Option<NaiveTime>,
    },
    WorldUnloaded {
        coords: String,
        time: Option<NaiveTime>,
    },
    ChatMessage {
        name: String,
        text: String,
        time: Option<NaiveTime>,
    },
}

impl Event {
    /// Time-of-day carried by the line, if any. The start marker carries a
    /// full date and is not included here.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        match self {
            Event::ServerStarted { .. }
            | Event::VersionAnnounced { .. }
            | Event::PortBound { .. } => None,
            Event::PlayerConnected { time, .. }
            | Event::PlayerDisconnected { time, .. }
            | Event::WorldLoaded { time, .. }
            | Event::WorldUnloaded { time, .. }
            | Event::ChatMessage { time, .. } => *time,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::ServerStarted { .. } => "start",
            Event::VersionAnnounced { .. } => "version",
            Event::PortBound { .. } => "bind",
            Event::PlayerConnected { .. } => "login",
            Event::PlayerDisconnected { .. } => "logout",
            Event::WorldLoaded { .. } => "world_load",
            Event::WorldUnloaded { .. } => "world_unload",
            Event::ChatMessage { .. } => "chat",
        }
    }
}

/// Which flavour of server log is being read.
///
/// Older servers print bare `Info: ...` lines; newer ones prefix every line
/// with `[HH:MM:SS]`. `Auto` tries the timestamped patterns first and falls
/// back to the plain ones, line by line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Timestamped,
    Plain,
    #[default]
    Auto,
}
