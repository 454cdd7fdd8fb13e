use crate::event::{COMMAND_PREFIX, Event};
use crate::persist::PersistedState;
use crate::state::model::{ChatEntry, Player, ServerState, ServerStatus, World};
use crate::state::view::PanelView;
use chrono::NaiveDateTime;

/// Owner of the mutable [`ServerState`].
///
/// All mutation goes through [`StateStore::apply`] (log events) and
/// [`StateStore::update_status`] (probe results).
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    state: ServerState,
    live: bool,
    last_chat: Option<ChatEntry>,
}

impl StateStore {
    pub fn new(state: ServerState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &ServerState {
        &self.state
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn go_live(&mut self) {
        self.live = true;
    }

    /// Resolve a line's time-of-day against the date cursor.
    pub fn resolve(&mut self, time: chrono::NaiveTime) -> Option<NaiveDateTime> {
        self.state.timeline.resolve(time)
    }

    /// Apply one event. `at` is the event's resolved time; `None` leaves
    /// existing timestamps untouched.
    pub fn apply(&mut self, event: &Event, at: Option<NaiveDateTime>) {
        match event {
            Event::ServerStarted { date, time } => {
                let launch = self.state.timeline.start(*date, *time);
                self.state.last_launch = Some(launch);
                if self.state.status == ServerStatus::Online {
                    self.state.status_changed_at = Some(launch);
                }
                self.state.clear_presence();
                tracing::info!(%launch, "server launched");
            }

            Event::VersionAnnounced { version, launch } => {
                self.state.version = Some(version.clone());
                if *launch {
                    self.state.clear_presence();
                }
                tracing::info!(%version, "server version");
            }

            Event::PortBound { port } => {
                self.state.port = Some(*port);
                tracing::info!(port = *port, "server bound");
            }

            Event::PlayerConnected { name, .. } => {
                let player = self.player_mut(name);
                if let Some(at) = at {
                    player.last_connect = Some(at);
                    player.last_seen = Some(at);
                }
                self.state.online.insert(name.clone());
                tracing::info!(player = %name, at = ?at, "player connected");
            }

            Event::PlayerDisconnected { name, .. } => {
                let player = self.player_mut(name);
                if let Some(at) = at {
                    player.last_seen = Some(at);
                }
                self.state.online.remove(name);
                tracing::info!(player = %name, at = ?at, "player disconnected");
            }

            Event::WorldLoaded { coords, .. } => {
                let world = self.world_mut(coords);
                if let Some(at) = at {
                    world.last_load = Some(at);
                }
                self.state.active.insert(coords.clone());
                tracing::info!(%coords, "world loaded");
            }

            Event::WorldUnloaded { coords, .. } => {
                let world = self.world_mut(coords);
                if let Some(at) = at {
                    world.last_unload = Some(at);
                }
                self.state.active.remove(coords);
                tracing::info!(%coords, "world unloaded");
            }

            Event::ChatMessage { name, text, .. } => {
                let player = self.player_mut(name);
                if let Some(at) = at {
                    player.last_seen = Some(at);
                }

                if text.starts_with(COMMAND_PREFIX) {
                    tracing::debug!(player = %name, "command not recorded in chat");
                    return;
                }

                self.record_chat(ChatEntry {
                    time: at,
                    name: name.clone(),
                    text: text.clone(),
                });
            }
        }
    }

    /// Feed a reachability result. Only transitions move the status-change
    /// time. Returns whether the status changed.
    pub fn update_status(&mut self, reachable: bool, now: NaiveDateTime) -> bool {
        let next = if reachable {
            ServerStatus::Online
        } else {
            ServerStatus::Offline
        };

        if next == self.state.status {
            return false;
        }

        tracing::info!(from = %self.state.status, to = %next, "server status changed");
        self.state.status = next;
        self.state.status_changed_at = Some(now);

        if next == ServerStatus::Offline {
            self.state.clear_presence();
        }

        true
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState::from(&self.state)
    }

    pub fn view(&self, now: NaiveDateTime) -> PanelView {
        PanelView::from_state(&self.state, now)
    }

    // Replaying a log that was already partly captured in persisted chat
    // would duplicate it. Outside live mode, an entry equal to the previous
    // candidate is dropped. Only the immediately preceding candidate is
    // compared.
    fn record_chat(&mut self, entry: ChatEntry) {
        let fresh = self.last_chat.as_ref() != Some(&entry);

        if self.live || fresh {
            tracing::info!(player = %entry.name, text = %entry.text, "chat");
            self.state.chat.push(entry.clone());
        } else {
            tracing::debug!(player = %entry.name, "duplicate chat line skipped during replay");
        }

        self.last_chat = Some(entry);
    }

    fn player_mut(&mut self, name: &str) -> &mut Player {
        self.state
            .players
            .entry(name.to_string())
            .or_insert_with(|| Player::new(name))
    }

    fn world_mut(&mut self, coords: &str) -> &mut World {
        self.state
            .worlds
            .entry(coords.to_string())
            .or_insert_with(|| World::new(coords))
    }
}
