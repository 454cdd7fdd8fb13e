use crate::conf::PanelConfig;
use crate::ingest::{IngestionLoop, Ingestor, ShutdownHandle, ShutdownSignal};
use crate::persist::{JsonFileStorage, load_or_default};
use crate::probe::TcpProbe;
use crate::server::pid::PidFile;
use crate::source::LogTail;
use crate::state::{ServerState, StateHandle};
use anyhow::{Context, Result};
use tokio::task::JoinHandle;

/// A running ingestion task and the handle its snapshots are published on.
#[derive(Debug)]
pub struct Agent {
    state: StateHandle,
    task: JoinHandle<ServerState>,
}

impl Agent {
    pub fn state(&self) -> StateHandle {
        self.state.clone()
    }

    /// Wait for the ingestion task to finish after shutdown.
    pub async fn join(self) -> Result<ServerState> {
        self.task.await.context("ingestion task panicked")
    }
}

/// Load persisted state, open the log and spawn ingestion on the current
/// runtime. Failing to open the log is the only fatal error.
pub async fn start(config: &PanelConfig, shutdown: ShutdownSignal) -> Result<Agent> {
    let storage = JsonFileStorage::new(config.state_path());
    tracing::info!(path = %storage.path().display(), "state file");
    let initial = load_or_default(&storage);

    let tail = LogTail::open(&config.server.log_path, config.tail.clone())
        .await
        .context("cannot follow server log")?;

    let probe = TcpProbe::from(&config.server);
    tracing::info!(
        log = %config.server.log_path.display(),
        format = ?config.server.log_format,
        address = probe.address(),
        port = probe.port(),
        "starting ingestion"
    );

    let ingestion = IngestionLoop::new(
        Ingestor::new(config.server.log_format, initial),
        probe,
        storage,
    )
    .with_probe_interval(config.server.probe_interval());

    let state = ingestion.handle();
    let task = tokio::spawn(ingestion.run(tail, shutdown));

    Ok(Agent { state, task })
}

/// Run until SIGINT/SIGTERM.
pub fn run(config: PanelConfig) -> Result<()> {
    use tokio::runtime::Builder;

    // Attempt to write pid file (best-effort)
    let _pid = config.server.pid_file.as_ref().and_then(|path| {
        match PidFile::create(path) {
            Ok(guard) => {
                tracing::info!(pid_file = %path.display(), "pid file written");
                Some(guard)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to write pid file; continuing");
                None
            }
        }
    });

    let runtime = Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async {
        let shutdown = ShutdownHandle::new();

        tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                if let Err(e) = shutdown.install_signal_handler().await {
                    tracing::error!(error = %e, "failed to install signal handler");
                }
            }
        });

        let agent = start(&config, shutdown.subscribe()).await?;
        let state = agent.join().await?;

        tracing::info!(
            status = %state.status,
            players = state.players.len(),
            worlds = state.worlds.len(),
            chat = state.chat.len(),
            "sbpanel stopped"
        );
        Ok(())
    })
}
