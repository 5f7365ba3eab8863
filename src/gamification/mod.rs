//! Gamification system: XP, Levels, Badges, Streaks, Quests and Loot
//!
//! `GamificationEngine` is the only way progression state changes; the other
//! modules hold the catalogs and the pure rules it applies.

mod badges;
mod checker;
mod engine;
mod error;
mod events;
mod levels;
mod loot;
mod progress;
mod quests;
mod streaks;

pub use badges::{Badge, BadgeId, Rarity, UnlockedBadge, BADGES};
pub use engine::{
    open_session, GamificationEngine, LootOpening, PuzzleOutcome, QuestCompletion,
};
pub use error::{EngineError, QuestBlock};
pub use events::{ActivityEvent, GamificationEvent, LevelUp, Notification};
pub use levels::{level_for_xp, xp_for_level, LevelProgress, XpRewards, LEGENDARY_LEVEL, MAX_XP, XP_PER_LEVEL};
pub use loot::{Cosmetic, CosmeticKind, LootBox, LootContent, LootItem, LOOT_BOXES};
pub use progress::{UserProgress, XpChange};
pub use quests::{
    Difficulty, Puzzle, Quest, QuestBoard, QuestCycle, QuestMetric, QuestReward, QuestSet,
    QuestType,
};
pub use streaks::{is_active, next_streak, StreakChange, StreakUpdate, STREAK_MASTER_DAYS};
