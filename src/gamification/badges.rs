//! Badge definitions and metadata
//!
//! The badge catalog is compiled in and never changes at runtime. A user's
//! unlocked badges reference catalog entries by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rarity tier shared by badges and loot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

/// Unique identifier for each badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeId {
    FirstPost,
    Trendsetter,
    SocialButterfly,
    StreakMaster,
    SpaceExplorer,
    LegendaryWriter,
    BattleWinner,
    QuestMaster,
    CommunityHero,
}

impl BadgeId {
    /// Get the string ID used in storage and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstPost => "first-post",
            Self::Trendsetter => "trendsetter",
            Self::SocialButterfly => "social-butterfly",
            Self::StreakMaster => "streak-master",
            Self::SpaceExplorer => "space-explorer",
            Self::LegendaryWriter => "legendary-writer",
            Self::BattleWinner => "battle-winner",
            Self::QuestMaster => "quest-master",
            Self::CommunityHero => "community-hero",
        }
    }

    /// Parse from string ID; `None` for ids outside the catalog
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "first-post" => Some(Self::FirstPost),
            "trendsetter" => Some(Self::Trendsetter),
            "social-butterfly" => Some(Self::SocialButterfly),
            "streak-master" => Some(Self::StreakMaster),
            "space-explorer" => Some(Self::SpaceExplorer),
            "legendary-writer" => Some(Self::LegendaryWriter),
            "battle-winner" => Some(Self::BattleWinner),
            "quest-master" => Some(Self::QuestMaster),
            "community-hero" => Some(Self::CommunityHero),
            _ => None,
        }
    }

    pub fn all() -> &'static [BadgeId] {
        &[
            Self::FirstPost,
            Self::Trendsetter,
            Self::SocialButterfly,
            Self::StreakMaster,
            Self::SpaceExplorer,
            Self::LegendaryWriter,
            Self::BattleWinner,
            Self::QuestMaster,
            Self::CommunityHero,
        ]
    }

    pub fn badge(&self) -> &'static Badge {
        Badge::get(*self)
    }
}

/// Badge definition with all metadata
#[derive(Debug, Clone)]
pub struct Badge {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rarity: Rarity,
}

/// All badge definitions
pub static BADGES: &[Badge] = &[
    Badge {
        id: BadgeId::FirstPost,
        name: "First Steps",
        description: "Published your first blog post",
        icon: "✍️",
        rarity: Rarity::Common,
    },
    Badge {
        id: BadgeId::Trendsetter,
        name: "Trendsetter",
        description: "Had a blog post hit trending",
        icon: "🔥",
        rarity: Rarity::Rare,
    },
    Badge {
        id: BadgeId::SocialButterfly,
        name: "Social Butterfly",
        description: "Received 100 likes across all posts",
        icon: "🦋",
        rarity: Rarity::Rare,
    },
    Badge {
        id: BadgeId::StreakMaster,
        name: "Streak Master",
        description: "Maintained a 7-day writing streak",
        icon: "⚡",
        rarity: Rarity::Epic,
    },
    Badge {
        id: BadgeId::SpaceExplorer,
        name: "Space Explorer",
        description: "Published 5 space-related blog posts",
        icon: "🚀",
        rarity: Rarity::Epic,
    },
    Badge {
        id: BadgeId::LegendaryWriter,
        name: "Legendary Writer",
        description: "Reached level 10",
        icon: "👑",
        rarity: Rarity::Legendary,
    },
    Badge {
        id: BadgeId::BattleWinner,
        name: "Battle Winner",
        description: "Won a Battle Arena competition",
        icon: "⚔️",
        rarity: Rarity::Epic,
    },
    Badge {
        id: BadgeId::QuestMaster,
        name: "Quest Master",
        description: "Completed 50 quests",
        icon: "🎯",
        rarity: Rarity::Rare,
    },
    Badge {
        id: BadgeId::CommunityHero,
        name: "Community Hero",
        description: "Helped 100 fellow writers",
        icon: "🌟",
        rarity: Rarity::Legendary,
    },
];

impl Badge {
    /// Get badge definition by ID
    pub fn get(id: BadgeId) -> &'static Badge {
        BADGES
            .iter()
            .find(|b| b.id == id)
            .expect("All badges should be defined")
    }

    /// Look up a catalog entry by its string ID
    pub fn find(id: &str) -> Option<&'static Badge> {
        BadgeId::from_str(id).map(Self::get)
    }

    pub fn total_count() -> usize {
        BADGES.len()
    }
}

/// A badge held by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedBadge {
    pub id: BadgeId,
    pub unlocked_at: DateTime<Utc>,
}

impl UnlockedBadge {
    pub fn badge(&self) -> &'static Badge {
        Badge::get(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_badge_id_is_defined_once() {
        assert_eq!(BadgeId::all().len(), Badge::total_count());
        for id in BadgeId::all() {
            assert_eq!(BADGES.iter().filter(|b| b.id == *id).count(), 1);
            assert_eq!(Badge::get(*id).id, *id);
        }
    }

    #[test]
    fn test_string_ids_roundtrip() {
        for id in BadgeId::all() {
            assert_eq!(BadgeId::from_str(id.as_str()), Some(*id));
        }
        assert_eq!(BadgeId::from_str("space-warrior"), None);
    }

    #[test]
    fn test_serde_uses_string_ids() {
        let json = serde_json::to_string(&BadgeId::StreakMaster).unwrap();
        assert_eq!(json, "\"streak-master\"");
        let json = serde_json::to_string(&Rarity::Legendary).unwrap();
        assert_eq!(json, "\"legendary\"");
    }
}
