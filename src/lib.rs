//! BlogPortal - gamified blogging
//!
//! Writers earn XP for publishing, liking, commenting and trending posts,
//! level up, keep daily streaks, unlock badges, claim quests, open loot
//! boxes and compete in the Battle Arena.
//!
//! ## Layout
//!
//! - [`gamification`]: the engine that owns a user's progression
//! - [`store`]: per-user persistence behind the `ProgressStore` trait
//! - [`leaderboard`]: ranking over stored records
//! - [`arena`]: battles, entries and votes
//! - [`config`]: `~/.blogportal/config.toml`

pub mod arena;
pub mod clock;
pub mod config;
pub mod gamification;
pub mod identity;
pub mod leaderboard;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use gamification::{open_session, EngineError, GamificationEngine, UserProgress};
pub use identity::{Identity, UserId};
