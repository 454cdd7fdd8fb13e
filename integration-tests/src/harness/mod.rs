pub mod game;
pub mod panel;
pub mod tracing;

pub use game::{GameServer, free_port};
pub use panel::TestPanel;
pub use tracing::{CapturedEvent, LogCapture};
