//! CLI command implementations

pub mod battle;
pub mod event;
pub mod init;
pub mod leaderboard;
pub mod loot;
pub mod progress;
pub mod quest;
pub mod status;

mod context;
mod output;

pub use context::Context;
