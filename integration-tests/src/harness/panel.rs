use sbpanel_core::conf::{PanelConfig, TailConfig};
use sbpanel_core::event::LogFormat;
use sbpanel_core::ingest::ShutdownHandle;
use sbpanel_core::server::{self, Agent};
use sbpanel_core::state::{ServerState, StateHandle};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// A panel agent following a log in its own temp directory.
pub struct TestPanel {
    dir: TempDir,
    config: PanelConfig,
    shutdown: ShutdownHandle,
    agent: Option<Agent>,
}

impl TestPanel {
    /// Panel probing `game_port`, with an empty log already in place.
    pub fn new(game_port: u16) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let log = dir.path().join("starbound_server.log");
        fs::write(&log, "").expect("failed to create log");

        let mut config = PanelConfig::for_log(&log);
        config.server.log_format = LogFormat::Timestamped;
        config.server.port = game_port;
        config.server.probe_timeout_ms = 200;
        config.server.probe_interval_secs = 0;
        config.tail = TailConfig {
            poll_interval_ms: 10,
            retry_initial_ms: 10,
            retry_max_ms: 100,
        };

        Self {
            dir,
            config,
            shutdown: ShutdownHandle::new(),
            agent: None,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn log_path(&self) -> PathBuf {
        self.config.server.log_path.clone()
    }

    pub fn state_path(&self) -> PathBuf {
        self.config.state_path()
    }

    /// Replace the log contents.
    pub fn write_log(&self, lines: &[&str]) {
        let mut text = lines.join("\n");
        text.push('\n');
        fs::write(self.log_path(), text).expect("failed to write log");
    }

    pub fn append(&self, line: &str) {
        let mut file = OpenOptions::new()
            .append(true)
            .open(self.log_path())
            .expect("failed to open log");
        writeln!(file, "{line}").expect("failed to append to log");
    }

    pub async fn start(&mut self) -> StateHandle {
        self.shutdown = ShutdownHandle::new();
        let agent = server::start(&self.config, self.shutdown.subscribe())
            .await
            .expect("failed to start panel");
        let handle = agent.state();
        self.agent = Some(agent);
        handle
    }

    /// Trigger shutdown and wait for the final state.
    pub async fn stop(&mut self) -> ServerState {
        self.shutdown.trigger();
        let agent = self.agent.take().expect("panel not running");
        tokio::time::timeout(Duration::from_secs(5), agent.join())
            .await
            .expect("panel did not stop in time")
            .expect("ingestion task failed")
    }

    pub fn state(&self) -> StateHandle {
        self.agent.as_ref().expect("panel not running").state()
    }

    /// Poll the published state until `check` holds.
    pub async fn wait_until(&self, what: &str, check: impl Fn(&ServerState) -> bool) {
        let handle = self.state();
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);

        while !check(handle.load().as_ref()) {
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed out waiting for {what}"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
