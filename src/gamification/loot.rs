//! Loot boxes
//!
//! Boxes are either unlocked for everyone (and usually cost XP) or handed
//! out as quest rewards. Quest-awarded boxes are consumed when opened.

use serde::{Deserialize, Serialize};

use super::badges::Rarity;

/// One thing inside a loot box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LootContent {
    Xp(u32),
    /// Badge id; ids outside the badge catalog are ignored on open
    Badge(&'static str),
    Theme(&'static str),
    Avatar(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct LootItem {
    pub content: LootContent,
    pub rarity: Rarity,
}

#[derive(Debug, Clone)]
pub struct LootBox {
    pub id: &'static str,
    pub name: &'static str,
    pub rarity: Rarity,
    pub description: &'static str,
    pub contents: &'static [LootItem],
    /// XP price to open
    pub cost: Option<u32>,
    pub unlocked_by_default: bool,
}

/// All loot box definitions
pub static LOOT_BOXES: &[LootBox] = &[
    LootBox {
        id: "starter-box",
        name: "Starter Box",
        rarity: Rarity::Common,
        description: "A basic loot box for new writers",
        contents: &[
            LootItem {
                content: LootContent::Xp(50),
                rarity: Rarity::Common,
            },
            LootItem {
                content: LootContent::Theme("Ocean Blue"),
                rarity: Rarity::Common,
            },
        ],
        cost: Some(100),
        unlocked_by_default: true,
    },
    LootBox {
        id: "space-explorer",
        name: "Space Explorer Box",
        rarity: Rarity::Rare,
        description: "Cosmic rewards for space enthusiasts",
        contents: &[
            LootItem {
                content: LootContent::Xp(150),
                rarity: Rarity::Rare,
            },
            LootItem {
                content: LootContent::Avatar("Astronaut"),
                rarity: Rarity::Rare,
            },
            LootItem {
                content: LootContent::Theme("Galaxy Dark"),
                rarity: Rarity::Rare,
            },
        ],
        cost: None,
        unlocked_by_default: false,
    },
    LootBox {
        id: "epic-writer",
        name: "Epic Writer Box",
        rarity: Rarity::Epic,
        description: "Premium rewards for dedicated writers",
        contents: &[
            LootItem {
                content: LootContent::Xp(300),
                rarity: Rarity::Epic,
            },
            LootItem {
                content: LootContent::Badge("epic-writer"),
                rarity: Rarity::Epic,
            },
            LootItem {
                content: LootContent::Theme("Golden Sunset"),
                rarity: Rarity::Epic,
            },
        ],
        cost: None,
        unlocked_by_default: false,
    },
    LootBox {
        id: "legendary-creator",
        name: "Legendary Creator Box",
        rarity: Rarity::Legendary,
        description: "The ultimate reward for master creators",
        contents: &[
            LootItem {
                content: LootContent::Xp(500),
                rarity: Rarity::Legendary,
            },
            LootItem {
                content: LootContent::Badge("legendary-creator"),
                rarity: Rarity::Legendary,
            },
            LootItem {
                content: LootContent::Avatar("Crown Avatar"),
                rarity: Rarity::Legendary,
            },
            LootItem {
                content: LootContent::Theme("Royal Purple"),
                rarity: Rarity::Legendary,
            },
        ],
        cost: None,
        unlocked_by_default: false,
    },
];

impl LootBox {
    pub fn find(id: &str) -> Option<&'static LootBox> {
        LOOT_BOXES.iter().find(|b| b.id == id)
    }

    /// Total XP granted by the contents (before the cost is deducted)
    pub fn xp_contents(&self) -> u32 {
        self.contents
            .iter()
            .filter_map(|item| match item.content {
                LootContent::Xp(xp) => Some(xp),
                _ => None,
            })
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CosmeticKind {
    Theme,
    Avatar,
}

/// Theme or avatar collected from a loot box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cosmetic {
    pub kind: CosmeticKind,
    pub name: String,
}
