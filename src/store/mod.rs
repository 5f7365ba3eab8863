//! Durable per-user progress storage
//!
//! The engine only ever sees the [`ProgressStore`] trait: one opaque
//! `UserProgress` blob per identity. Three backends are provided:
//!
//! - [`MemoryStore`] keeps records in memory (tests, previews)
//! - [`JsonFileStore`] writes one `progress_<user>.json` per user
//! - [`SqliteStore`] keeps all users in a single `progress.db`

mod json;
mod memory;
mod sqlite;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::gamification::UserProgress;
use crate::identity::{Identity, UserId};

pub use json::JsonFileStore;
pub(crate) use json::{lock_exclusive, replace_file, write_atomic};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Error type for storage backends
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to lock {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed progress record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A stored record together with the identity it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProgress {
    pub user_id: UserId,
    #[serde(default)]
    pub name: String,
    pub progress: UserProgress,
}

/// Key-value surface the engine persists through
pub trait ProgressStore {
    /// Load a user's record; `None` if the user was never saved
    fn load(&self, user: &UserId) -> Result<Option<UserProgress>, StoreError>;

    /// Replace a user's record
    fn save(&mut self, identity: &Identity, progress: &UserProgress) -> Result<(), StoreError>;

    /// Every stored record, in a stable order
    fn records(&self) -> Result<Vec<StoredProgress>, StoreError>;
}

impl<S: ProgressStore + ?Sized> ProgressStore for Box<S> {
    fn load(&self, user: &UserId) -> Result<Option<UserProgress>, StoreError> {
        (**self).load(user)
    }

    fn save(&mut self, identity: &Identity, progress: &UserProgress) -> Result<(), StoreError> {
        (**self).save(identity, progress)
    }

    fn records(&self) -> Result<Vec<StoredProgress>, StoreError> {
        (**self).records()
    }
}

impl<S: ProgressStore + ?Sized> ProgressStore for &mut S {
    fn load(&self, user: &UserId) -> Result<Option<UserProgress>, StoreError> {
        (**self).load(user)
    }

    fn save(&mut self, identity: &Identity, progress: &UserProgress) -> Result<(), StoreError> {
        (**self).save(identity, progress)
    }

    fn records(&self) -> Result<Vec<StoredProgress>, StoreError> {
        (**self).records()
    }
}
