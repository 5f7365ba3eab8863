//! Shared test utilities for engine integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;

use blogportal::gamification::UserProgress;
use blogportal::store::{MemoryStore, ProgressStore, StoreError, StoredProgress};
use blogportal::{FixedClock, GamificationEngine, Identity, UserId};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn ada() -> Identity {
    Identity::new("ada", "Ada Lovelace")
}

/// Engine over a fresh memory store, plus a handle to move its clock
pub fn engine_on(day: NaiveDate) -> (GamificationEngine<MemoryStore, FixedClock>, FixedClock) {
    engine_with(MemoryStore::new(), day)
}

pub fn engine_with(
    store: MemoryStore,
    day: NaiveDate,
) -> (GamificationEngine<MemoryStore, FixedClock>, FixedClock) {
    let clock = FixedClock::at_date(day);
    let engine =
        GamificationEngine::open(store, clock.clone(), ada()).expect("Failed to open engine");
    (engine, clock)
}

/// Memory store whose record for `ada()` starts from the given progress
pub fn store_with(progress: UserProgress) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert(&ada(), progress);
    store
}

/// Store that fails every call while its switch is on
#[derive(Clone, Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    pub failing: Rc<Cell<bool>>,
}

impl FailingStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.failing.set(true);
        store
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.get() {
            Err(StoreError::Unavailable("disk on fire".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ProgressStore for FailingStore {
    fn load(&self, user: &UserId) -> Result<Option<UserProgress>, StoreError> {
        self.check()?;
        self.inner.load(user)
    }

    fn save(&mut self, identity: &Identity, progress: &UserProgress) -> Result<(), StoreError> {
        self.check()?;
        self.inner.save(identity, progress)
    }

    fn records(&self) -> Result<Vec<StoredProgress>, StoreError> {
        self.check()?;
        self.inner.records()
    }
}
