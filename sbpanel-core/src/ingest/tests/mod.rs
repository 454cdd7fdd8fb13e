
use crate::persist::{PersistError, PersistedState, StateStorage};
use crate::probe::StatusProbe;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;

pub(crate) fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

/// Probe whose answer the test controls.
#[derive(Clone, Default)]
pub(crate) struct StubProbe {
    up: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl StubProbe {
    pub(crate) fn up() -> Self {
        let probe = Self::default();
        probe.set(true);
        probe
    }

    pub(crate) fn set(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusProbe for StubProbe {
    async fn check(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.up.load(Ordering::SeqCst)
    }
}

/// Records every save; optionally refuses them.
#[derive(Clone, Default)]
pub(crate) struct MemoryStorage {
    saves: Arc<Mutex<Vec<PersistedState>>>,
    saved_on: Arc<Mutex<Option<ThreadId>>>,
    failing: bool,
}

impl MemoryStorage {
    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(crate) fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    /// Thread that ran the most recent save.
    pub(crate) fn saved_on(&self) -> Option<ThreadId> {
        *self.saved_on.lock().unwrap()
    }

    pub(crate) fn last(&self) -> Option<PersistedState> {
        self.saves.lock().unwrap().last().cloned()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        Ok(self.last())
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistError> {
        *self.saved_on.lock().unwrap() = Some(std::thread::current().id());
        if self.failing {
            return Err(PersistError::io(
                "/dev/full",
                std::io::Error::other("disk full"),
            ));
        }
        self.saves.lock().unwrap().push(state.clone());
        Ok(())
    }
}
