//! Durable state between runs.
//!
//! Only the long-lived facts are written: known players, known worlds,
//! chat history and the last observed status. Presence (who is online,
//! which worlds are loaded) is never persisted; it is rebuilt by replaying
//! the log on startup.

mod error;
mod schema;
mod storage;


pub use error::PersistError;
pub use schema::{PersistedState, SCHEMA_VERSION};
pub use storage::{JsonFileStorage, StateStorage, load_or_default};
