//! In-memory progress store

use super::{ProgressStore, StoreError, StoredProgress};
use crate::gamification::UserProgress;
use crate::identity::{Identity, UserId};

/// Records kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<StoredProgress>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Seed a record directly, bypassing the engine
    pub fn insert(&mut self, identity: &Identity, progress: UserProgress) {
        self.upsert(identity, progress);
    }

    fn upsert(&mut self, identity: &Identity, progress: UserProgress) {
        match self.records.iter_mut().find(|r| r.user_id == identity.id) {
            Some(record) => {
                record.name.clone_from(&identity.name);
                record.progress = progress;
            }
            None => self.records.push(StoredProgress {
                user_id: identity.id.clone(),
                name: identity.name.clone(),
                progress,
            }),
        }
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, user: &UserId) -> Result<Option<UserProgress>, StoreError> {
        Ok(self
            .records
            .iter()
            .find(|r| &r.user_id == user)
            .map(|r| r.progress.clone()))
    }

    fn save(&mut self, identity: &Identity, progress: &UserProgress) -> Result<(), StoreError> {
        self.upsert(identity, progress.clone());
        self.saves += 1;
        Ok(())
    }

    fn records(&self) -> Result<Vec<StoredProgress>, StoreError> {
        Ok(self.records.clone())
    }
}
