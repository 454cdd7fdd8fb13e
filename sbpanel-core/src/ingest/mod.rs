//! Ingestion: replay the existing log, then follow it live.
//!
//! [`Ingestor`] is the pure line-to-state pipeline. [`IngestionLoop`] adds
//! the tail, the status probe, persistence and snapshot publishing, all of
//! which only fire once the backlog has been replayed.

mod engine;
mod shutdown;

#[cfg(test)]
mod tests;

pub use engine::{IngestionLoop, Ingestor, Mode};
pub use shutdown::{ShutdownHandle, ShutdownSignal};
