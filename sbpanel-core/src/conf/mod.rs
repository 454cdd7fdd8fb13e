//! Panel configuration.
//!
//! A single HCL file with a required `server` block and optional `state`
//! and `tail` blocks. Everything except `server.log_path` has a default.

mod error;
mod loader;
pub mod types;
mod validation;


pub use error::ConfigError;
pub use loader::{load_config, parse_config};
pub use types::{DEFAULT_STATE_FILE, PanelConfig, ServerConfig, StateConfig, TailConfig};
pub use validation::{Severity, ValidationIssue, ValidationReport, validate};
