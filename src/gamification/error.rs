//! Engine error types

use std::fmt;

use crate::store::StoreError;

/// Why a quest could not be completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestBlock {
    Unknown,
    AlreadyCompleted,
    Expired,
    NotAPuzzle,
}

impl fmt::Display for QuestBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Unknown => "not in the active quest set",
            Self::AlreadyCompleted => "already completed",
            Self::Expired => "expired",
            Self::NotAPuzzle => "not a puzzle quest",
        };
        f.write_str(msg)
    }
}

/// Error type for engine operations
///
/// Everything except `Storage` is an expected outcome the caller reports to
/// the user; the state is unchanged in every case.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Not enough XP: have {balance}, need {requested}")]
    InsufficientBalance { balance: u64, requested: u64 },

    #[error("XP would exceed the maximum: have {balance}, adding {amount}")]
    XpOverflow { balance: u64, amount: u64 },

    #[error("Quest '{quest_id}' cannot be completed: {reason}")]
    QuestNotCompletable { quest_id: String, reason: QuestBlock },

    #[error("Loot box '{0}' is locked")]
    LootBoxLocked(String),

    #[error("Unknown loot box '{0}'")]
    UnknownLootBox(String),

    #[error("Progress could not be saved: {0}")]
    Storage(#[from] StoreError),
}

impl EngineError {
    pub(crate) fn quest(quest_id: &str, reason: QuestBlock) -> Self {
        Self::QuestNotCompletable {
            quest_id: quest_id.to_string(),
            reason,
        }
    }
}
