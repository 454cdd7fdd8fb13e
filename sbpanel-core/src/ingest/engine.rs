use crate::event::{Event, EventExtractor, LogFormat};
use crate::ingest::shutdown::ShutdownSignal;
use crate::persist::StateStorage;
use crate::probe::StatusProbe;
use crate::source::{LogTail, TailEvent};
use crate::state::{ServerState, StateHandle, StateStore};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rebuilding state from the existing log. No probing, no saving.
    Replay,
    Live,
}

/// Line → event → resolved time → state. No I/O.
#[derive(Debug, Clone)]
pub struct Ingestor {
    extractor: EventExtractor,
    store: StateStore,
}

impl Ingestor {
    pub fn new(format: LogFormat, initial: ServerState) -> Self {
        Self {
            extractor: EventExtractor::new(format),
            store: StateStore::new(initial),
        }
    }

    pub fn mode(&self) -> Mode {
        if self.store.is_live() {
            Mode::Live
        } else {
            Mode::Replay
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    pub fn into_store(self) -> StateStore {
        self.store
    }

    /// Route one line. Returns true when an event was applied.
    ///
    /// `now` stands in for untimed events once live; during replay those
    /// events leave timestamps alone.
    pub fn process_line(&mut self, line: &str, now: NaiveDateTime) -> bool {
        let event = match self.extractor.extract(line) {
            Ok(Some(event)) => event,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "skipping log line");
                return false;
            }
        };

        let at = match (&event, event.time_of_day()) {
            (Event::ServerStarted { .. }, _) => None,
            (_, Some(time)) => match self.store.resolve(time) {
                Some(at) => Some(at),
                None => {
                    tracing::debug!(kind = event.kind(), %time, "no start marker yet; line skipped");
                    return false;
                }
            },
            (_, None) if self.store.is_live() => Some(now),
            (_, None) => None,
        };

        self.store.apply(&event, at);
        true
    }

    /// Feed a batch of historical lines. Returns how many were applied.
    pub fn replay<I, S>(&mut self, lines: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let now = Local::now().naive_local();
        lines
            .into_iter()
            .filter(|line| self.process_line(line.as_ref(), now))
            .count()
    }
}

/// Drives an [`Ingestor`] from a live log tail.
///
/// Sole writer of the state; readers go through the [`StateHandle`].
pub struct IngestionLoop<P, S> {
    ingestor: Ingestor,
    probe: P,
    storage: Arc<S>,
    handle: StateHandle,
    probe_interval: Option<Duration>,
}

impl<P, S> IngestionLoop<P, S>
where
    P: StatusProbe,
    S: StateStorage + 'static,
{
    pub fn new(ingestor: Ingestor, probe: P, storage: S) -> Self {
        let handle = StateHandle::new(ingestor.store().state().clone());
        Self {
            ingestor,
            probe,
            storage: Arc::new(storage),
            handle,
            probe_interval: None,
        }
    }

    /// Probe on this period while live, even with no new lines.
    pub fn with_probe_interval(mut self, every: Option<Duration>) -> Self {
        self.probe_interval = every;
        self
    }

    pub fn handle(&self) -> StateHandle {
        self.handle.clone()
    }

    pub fn mode(&self) -> Mode {
        self.ingestor.mode()
    }

    pub fn ingestor(&self) -> &Ingestor {
        &self.ingestor
    }

    pub fn process_line(&mut self, line: &str, now: NaiveDateTime) -> bool {
        self.ingestor.process_line(line, now)
    }

    /// Process a line with live side effects when applicable.
    pub async fn handle_line(&mut self, line: &str) -> bool {
        let now = Local::now().naive_local();
        if !self.process_line(line, now) {
            return false;
        }

        if self.mode() == Mode::Live {
            self.refresh_status().await;
            self.save().await;
            self.publish();
        }

        true
    }

    /// Replay is over. Probe once, publish, switch to live.
    pub async fn go_live(&mut self) {
        self.ingestor.store_mut().go_live();
        if self.refresh_status().await {
            self.save().await;
        }
        self.publish();

        let state = self.ingestor.store().state();
        tracing::info!(
            status = %state.status,
            players = state.players.len(),
            online = state.online_players().count(),
            worlds = state.worlds.len(),
            active = state.active_worlds().count(),
            chat = state.chat.len(),
            version = state.version.as_deref().unwrap_or("unknown"),
            "replay complete; following log"
        );
    }

    /// Follow `tail` until `shutdown` fires. Returns the final state.
    pub async fn run(mut self, mut tail: LogTail, mut shutdown: ShutdownSignal) -> ServerState {
        let mut ticker = self.probe_interval.map(|every| {
            let mut interval = tokio::time::interval_at(Instant::now() + every, every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        tracing::info!(path = %tail.path().display(), "ingestion started");

        loop {
            let live = self.mode() == Mode::Live;

            tokio::select! {
                biased;

                _ = shutdown.wait() => break,

                event = tail.next() => match event {
                    TailEvent::Line(line) => {
                        self.handle_line(&line).await;
                    }
                    TailEvent::CaughtUp => self.go_live().await,
                },

                _ = tick(&mut ticker), if live => {
                    if self.refresh_status().await {
                        self.save().await;
                        self.publish();
                    }
                }
            }
        }

        if self.mode() == Mode::Live {
            self.save().await;
        }
        self.publish();
        tracing::info!("ingestion stopped");

        self.ingestor.into_store().state().clone()
    }

    async fn refresh_status(&mut self) -> bool {
        let reachable = self.probe.check().await;
        self.ingestor
            .store_mut()
            .update_status(reachable, Local::now().naive_local())
    }

    /// Disk writes and fsync run on the blocking pool.
    async fn save(&self) {
        let storage = Arc::clone(&self.storage);
        let snapshot = self.ingestor.store().persisted();

        match tokio::task::spawn_blocking(move || storage.save(&snapshot)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "failed to persist state"),
            Err(e) => tracing::error!(error = %e, "state save task failed"),
        }
    }

    fn publish(&self) {
        self.handle.publish(self.ingestor.store().state().clone());
    }
}

async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
