//! Inbound activity events and outbound gamification events

use super::badges::{BadgeId, UnlockedBadge};
use super::streaks::StreakChange;

/// Something the user did elsewhere in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    PostPublished { tags: Vec<String> },
    /// The user liked somebody's post
    PostLiked,
    /// One of the user's posts received a like
    LikeReceived,
    CommentPosted,
    /// One of the user's posts hit trending
    PostTrending,
    BattleJoined,
    BattleVoted,
}

/// A level up event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
}

/// Events produced while applying an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamificationEvent {
    XpAwarded { amount: i64, reason: String },
    LevelUp(LevelUp),
    BadgeUnlocked(UnlockedBadge),
    Streak { change: StreakChange, count: u32 },
    QuestProgressed { quest_id: String, current: u32, target: u32 },
    QuestCompleted { quest_id: String },
    LootBoxUnlocked { box_id: String },
    QuestsRegenerated { cycle: &'static str, cycle_key: String },
}

/// Toast payload for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub xp_delta: i64,
    pub reason: String,
    pub badge_unlocked: Option<BadgeId>,
}

impl Notification {
    /// Summarize one operation's events; `None` when nothing is worth showing
    pub fn from_events(events: &[GamificationEvent]) -> Option<Self> {
        let mut xp_delta = 0i64;
        let mut reason = None;
        let mut badge_unlocked = None;

        for event in events {
            match event {
                GamificationEvent::XpAwarded { amount, reason: r } => {
                    xp_delta = xp_delta.saturating_add(*amount);
                    reason.get_or_insert_with(|| r.clone());
                }
                GamificationEvent::BadgeUnlocked(badge) => {
                    badge_unlocked.get_or_insert(badge.id);
                }
                _ => {}
            }
        }

        if xp_delta == 0 && reason.is_none() && badge_unlocked.is_none() {
            return None;
        }

        let reason = reason.unwrap_or_else(|| match badge_unlocked {
            Some(id) => format!("Unlocked {}", id.badge().name),
            None => String::new(),
        });

        Some(Self {
            xp_delta,
            reason,
            badge_unlocked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_notification_sums_xp_and_keeps_first_reason() {
        let events = vec![
            GamificationEvent::XpAwarded {
                amount: -100,
                reason: "Opened Starter Box".to_string(),
            },
            GamificationEvent::XpAwarded {
                amount: 50,
                reason: "Loot box reward".to_string(),
            },
        ];
        let note = Notification::from_events(&events).unwrap();
        assert_eq!(note.xp_delta, -50);
        assert_eq!(note.reason, "Opened Starter Box");
        assert_eq!(note.badge_unlocked, None);
    }

    #[test]
    fn test_badge_only_notification() {
        let events = vec![GamificationEvent::BadgeUnlocked(UnlockedBadge {
            id: BadgeId::StreakMaster,
            unlocked_at: Utc::now(),
        })];
        let note = Notification::from_events(&events).unwrap();
        assert_eq!(note.xp_delta, 0);
        assert_eq!(note.reason, "Unlocked Streak Master");
        assert_eq!(note.badge_unlocked, Some(BadgeId::StreakMaster));
    }

    #[test]
    fn test_nothing_to_show() {
        let events = vec![GamificationEvent::Streak {
            change: StreakChange::Unchanged,
            count: 3,
        }];
        assert!(Notification::from_events(&events).is_none());
    }
}
