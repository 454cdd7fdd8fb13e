use crate::persist::error::PersistError;
use crate::persist::schema::{PersistedState, SCHEMA_VERSION};
use crate::state::ServerState;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where persisted state lives.
pub trait StateStorage: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PersistedState>, PersistError>;

    fn save(&self, state: &PersistedState) -> Result<(), PersistError>;
}

/// JSON document on local disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PersistError::io(&self.path, e)),
        };

        let state: PersistedState =
            serde_json::from_slice(&bytes).map_err(|e| PersistError::Decode {
                path: self.path.clone(),
                source: e,
            })?;

        if state.version != SCHEMA_VERSION {
            return Err(PersistError::UnsupportedVersion {
                path: self.path.clone(),
                found: state.version,
                expected: SCHEMA_VERSION,
            });
        }

        Ok(Some(state))
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistError> {
        let json = serde_json::to_vec_pretty(state)?;

        // Write beside the target, then rename over it.
        let mut tmp =
            NamedTempFile::new_in(self.dir()).map_err(|e| PersistError::io(&self.path, e))?;
        tmp.write_all(&json)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| PersistError::io(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| PersistError::io(&self.path, e.error))?;

        Ok(())
    }
}

/// Load persisted state, falling back to an empty state on any failure.
pub fn load_or_default(storage: &dyn StateStorage) -> ServerState {
    match storage.load() {
        Ok(Some(persisted)) => {
            tracing::info!(
                players = persisted.players.len(),
                worlds = persisted.worlds.len(),
                chat = persisted.chat.len(),
                "loaded persisted state"
            );
            ServerState::from(persisted)
        }
        Ok(None) => {
            tracing::info!("no persisted state; starting empty");
            ServerState::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load persisted state; starting empty");
            ServerState::default()
        }
    }
}
