use crate::state::model::ServerState;
use crate::state::view::PanelView;
use arc_swap::ArcSwap;
use chrono::NaiveDateTime;
use std::sync::Arc;

/// Shared, read-mostly access to the latest published [`ServerState`].
///
/// The ingestion loop is the only writer. It builds the next state on its
/// own copy and swaps it in whole, so readers always see a consistent
/// snapshot and never block the writer.
#[derive(Clone)]
pub struct StateHandle {
    inner: Arc<ArcSwap<ServerState>>,
}

impl StateHandle {
    pub fn new(initial: ServerState) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    pub fn load(&self) -> Arc<ServerState> {
        self.inner.load_full()
    }

    pub fn view(&self, now: NaiveDateTime) -> PanelView {
        PanelView::from_state(&self.inner.load(), now)
    }

    pub(crate) fn publish(&self, state: ServerState) {
        self.inner.store(Arc::new(state));
    }
}

impl std::fmt::Debug for StateHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.load();
        f.debug_struct("StateHandle")
            .field("status", &state.status)
            .field("players", &state.players.len())
            .field("worlds", &state.worlds.len())
            .finish()
    }
}
