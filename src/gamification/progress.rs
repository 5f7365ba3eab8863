//! Per-user progression record
//!
//! `UserProgress` is the blob persisted for each identity. The methods here
//! are the primitive state transitions; the rules that chain them together
//! (level-up badges, streak badges, quest rewards) live in the engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::badges::{BadgeId, UnlockedBadge};
use super::error::EngineError;
use super::levels::{level_for_xp, LevelProgress, MAX_XP};
use super::loot::Cosmetic;
use super::quests::QuestBoard;
use super::streaks::{next_streak, StreakUpdate};

/// Outcome of an XP change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpChange {
    pub delta: i64,
    pub xp: u64,
    pub level: u32,
    pub previous_level: u32,
    pub leveled_up: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub xp: u64,
    pub level: u32,
    pub streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub last_active_date: Option<NaiveDate>,
    #[serde(default)]
    pub badges: Vec<UnlockedBadge>,
    #[serde(default)]
    pub completed_quest_ids: Vec<String>,

    // Aggregate counters
    #[serde(default)]
    pub total_posts: u64,
    /// Likes received across all posts
    #[serde(default)]
    pub total_likes: u64,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub trending_posts: u64,
    #[serde(default)]
    pub likes_given: u64,
    #[serde(default)]
    pub space_posts: u64,
    /// Completions across all cycles (a daily quest counts once per day)
    #[serde(default)]
    pub quests_completed: u64,
    #[serde(default)]
    pub battles_joined: u64,
    #[serde(default)]
    pub votes_cast: u64,

    #[serde(default)]
    pub quest_board: QuestBoard,
    /// Quest-awarded loot boxes not yet opened
    #[serde(default)]
    pub unlocked_loot_boxes: Vec<String>,
    #[serde(default)]
    pub cosmetics: Vec<Cosmetic>,
    /// Battles whose prize was already paid out
    #[serde(default)]
    pub claimed_battles: Vec<String>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            streak: 0,
            best_streak: 0,
            last_active_date: None,
            badges: Vec::new(),
            completed_quest_ids: Vec::new(),
            total_posts: 0,
            total_likes: 0,
            total_comments: 0,
            trending_posts: 0,
            likes_given: 0,
            space_posts: 0,
            quests_completed: 0,
            battles_joined: 0,
            votes_cast: 0,
            quest_board: QuestBoard::default(),
            unlocked_loot_boxes: Vec::new(),
            cosmetics: Vec::new(),
            claimed_battles: Vec::new(),
        }
    }
}

impl UserProgress {
    /// Record with the given XP and its derived level
    pub fn with_xp(xp: u64) -> Self {
        Self {
            xp,
            level: level_for_xp(xp),
            ..Self::default()
        }
    }

    /// Re-derive fields that must never be trusted from storage
    pub fn normalize(&mut self) {
        self.level = level_for_xp(self.xp);
        self.best_streak = self.best_streak.max(self.streak);
    }

    pub fn level_progress(&self) -> LevelProgress {
        LevelProgress::new(self.xp)
    }

    /// Apply a signed XP delta. Rejects, rather than clamps, a balance below zero
    /// or above [`MAX_XP`].
    pub fn apply_xp(&mut self, amount: i64) -> Result<XpChange, EngineError> {
        let xp = if amount >= 0 {
            let added = amount.unsigned_abs();
            self.xp
                .checked_add(added)
                .filter(|xp| *xp <= MAX_XP)
                .ok_or(EngineError::XpOverflow {
                    balance: self.xp,
                    amount: added,
                })?
        } else {
            let requested = amount.unsigned_abs();
            self.xp
                .checked_sub(requested)
                .ok_or(EngineError::InsufficientBalance {
                    balance: self.xp,
                    requested,
                })?
        };

        let previous_level = self.level;
        self.xp = xp;
        self.level = level_for_xp(xp);

        Ok(XpChange {
            delta: amount,
            xp,
            level: self.level,
            previous_level,
            leveled_up: self.level > previous_level,
        })
    }

    pub fn has_badge(&self, id: BadgeId) -> bool {
        self.badges.iter().any(|b| b.id == id)
    }

    /// Add a badge unless already held
    pub fn grant_badge(&mut self, id: BadgeId, at: DateTime<Utc>) -> Option<UnlockedBadge> {
        if self.has_badge(id) {
            return None;
        }
        let unlocked = UnlockedBadge {
            id,
            unlocked_at: at,
        };
        self.badges.push(unlocked.clone());
        Some(unlocked)
    }

    /// Record streak-qualifying activity on `today`
    pub fn record_active_day(&mut self, today: NaiveDate) -> StreakUpdate {
        let update = next_streak(self.streak, self.last_active_date, today);
        self.streak = update.streak;
        self.best_streak = self.best_streak.max(update.streak);
        self.last_active_date = Some(today);
        update
    }

    pub fn record_quest_completion(&mut self, quest_id: &str) {
        self.quests_completed = self.quests_completed.saturating_add(1);
        if !self.completed_quest_ids.iter().any(|id| id == quest_id) {
            self.completed_quest_ids.push(quest_id.to_string());
        }
    }

    pub fn has_loot_box(&self, box_id: &str) -> bool {
        self.unlocked_loot_boxes.iter().any(|id| id == box_id)
    }

    /// Returns whether the box was newly added
    pub fn add_loot_box(&mut self, box_id: &str) -> bool {
        if self.has_loot_box(box_id) {
            return false;
        }
        self.unlocked_loot_boxes.push(box_id.to_string());
        true
    }

    pub fn take_loot_box(&mut self, box_id: &str) -> bool {
        let before = self.unlocked_loot_boxes.len();
        self.unlocked_loot_boxes.retain(|id| id != box_id);
        self.unlocked_loot_boxes.len() != before
    }

    /// Returns whether the cosmetic was new
    pub fn add_cosmetic(&mut self, cosmetic: Cosmetic) -> bool {
        if self.cosmetics.contains(&cosmetic) {
            return false;
        }
        self.cosmetics.push(cosmetic);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_level_one() {
        let progress = UserProgress::default();
        assert_eq!(progress.xp, 0);
        assert_eq!(progress.level, 1);
        assert!(progress.badges.is_empty());
    }

    #[test]
    fn test_apply_xp_levels_up() {
        let mut progress = UserProgress::with_xp(90);
        let change = progress.apply_xp(20).unwrap();
        assert_eq!(change.xp, 110);
        assert_eq!(change.level, 2);
        assert!(change.leveled_up);
    }

    #[test]
    fn test_apply_xp_rejects_negative_balance() {
        let mut progress = UserProgress::with_xp(40);
        let err = progress.apply_xp(-50).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientBalance {
                balance: 40,
                requested: 50
            }
        ));
        assert_eq!(progress.xp, 40);
        assert_eq!(progress.level, 1);
    }

    #[test]
    fn test_apply_xp_rejects_overflow() {
        let mut progress = UserProgress::with_xp(MAX_XP);
        let err = progress.apply_xp(1).unwrap_err();
        assert!(matches!(
            err,
            EngineError::XpOverflow { balance, amount: 1 } if balance == MAX_XP
        ));
        assert_eq!(progress.xp, MAX_XP);
        assert_eq!(progress.level, u32::MAX);

        let mut progress = UserProgress::with_xp(MAX_XP - 10);
        assert!(progress.apply_xp(10).is_ok());
        assert_eq!(progress.level, u32::MAX);
    }

    #[test]
    fn test_spending_recomputes_level() {
        let mut progress = UserProgress::with_xp(150);
        let change = progress.apply_xp(-100).unwrap();
        assert_eq!(change.level, 1);
        assert!(!change.leveled_up);
    }

    #[test]
    fn test_grant_badge_once() {
        let mut progress = UserProgress::default();
        let now = Utc::now();
        assert!(progress.grant_badge(BadgeId::FirstPost, now).is_some());
        assert!(progress.grant_badge(BadgeId::FirstPost, now).is_none());
        assert_eq!(progress.badges.len(), 1);
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let json = r#"{"xp": 250, "level": 1, "streak": 2}"#;
        let mut progress: UserProgress = serde_json::from_str(json).unwrap();
        progress.normalize();
        assert_eq!(progress.level, 3);
        assert_eq!(progress.best_streak, 2);
        assert!(progress.quest_board.daily.is_none());
    }
}
