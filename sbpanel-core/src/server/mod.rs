mod pid;
mod setup;

pub use pid::{PidFile, remove_pid, write_pid};
pub use setup::{Agent, run, start};
