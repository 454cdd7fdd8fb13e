//! Log line -> typed event extraction.
//!
//! Every line is tested against a fixed, ordered list of patterns and the
//! first match wins:
//!
//! start marker
//! version
//! login
//! logout
//! world load
//! world unload
//! chat
//!
//! The order is part of the contract. Chat text is free-form and can look
//! like any other line, so it is always tried last.

mod extract;
mod types;


pub use extract::{EventExtractor, ExtractError};
pub use types::{COMMAND_PREFIX, Event, LogFormat};
