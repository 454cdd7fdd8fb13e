mod handle;
mod humanize;
mod model;
mod store;
mod view;

#[cfg(test)]
mod tests;

pub use handle::StateHandle;
pub use humanize::time_ago;
pub use model::{ChatEntry, Player, ServerState, ServerStatus, World};
pub use store::StateStore;
pub use view::{ActiveWorld, OfflinePlayer, OnlinePlayer, PanelView};
