//! Log line sources: a live tail and a one-shot reader for replay.

mod error;
mod tail;

#[cfg(test)]
mod tests;

pub use error::SourceError;
pub use tail::{LogTail, TailEvent, read_log};
