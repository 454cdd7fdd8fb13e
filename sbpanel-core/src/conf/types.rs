use crate::event::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the state file written beside the log when no path is configured.
pub const DEFAULT_STATE_FILE: &str = ".sbpanel.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PanelConfig {
    pub server: ServerConfig,

    #[serde(default)]
    pub state: StateConfig,

    #[serde(default)]
    pub tail: TailConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server log to follow.
    pub log_path: PathBuf,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Host the game server listens on.
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// How often to probe while the log is quiet. 0 disables.
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,

    /// Optional pid file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TailConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_retry_initial_ms")]
    pub retry_initial_ms: u64,

    #[serde(default = "default_retry_max_ms")]
    pub retry_max_ms: u64,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            retry_initial_ms: default_retry_initial_ms(),
            retry_max_ms: default_retry_max_ms(),
        }
    }
}

impl TailConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn retry_initial(&self) -> Duration {
        Duration::from_millis(self.retry_initial_ms)
    }

    pub fn retry_max(&self) -> Duration {
        Duration::from_millis(self.retry_max_ms)
    }
}

impl ServerConfig {
    pub fn for_log(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            log_format: LogFormat::default(),
            address: default_address(),
            port: default_port(),
            probe_timeout_ms: default_probe_timeout_ms(),
            probe_interval_secs: default_probe_interval_secs(),
            pid_file: None,
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn probe_interval(&self) -> Option<Duration> {
        (self.probe_interval_secs > 0).then(|| Duration::from_secs(self.probe_interval_secs))
    }
}

impl PanelConfig {
    /// Defaults for everything but the log path.
    pub fn for_log(log_path: impl Into<PathBuf>) -> Self {
        Self {
            server: ServerConfig::for_log(log_path),
            state: StateConfig::default(),
            tail: TailConfig::default(),
        }
    }

    /// Configured state file, or `.sbpanel.json` next to the log.
    pub fn state_path(&self) -> PathBuf {
        if let Some(path) = &self.state.path {
            return path.clone();
        }

        self.server
            .log_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(DEFAULT_STATE_FILE)
    }
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    21025
}

fn default_probe_timeout_ms() -> u64 {
    1_000
}

fn default_probe_interval_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_retry_initial_ms() -> u64 {
    250
}

fn default_retry_max_ms() -> u64 {
    5_000
}
