//! Tests for progress persistence and the leaderboard built on top of it

mod common;

use tempfile::TempDir;

use blogportal::gamification::{ActivityEvent, BadgeId, QuestCycle};
use blogportal::leaderboard::{self, LeaderboardCategory};
use blogportal::store::{JsonFileStore, ProgressStore, SqliteStore};
use blogportal::{FixedClock, GamificationEngine, Identity, UserId};

use common::{ada, date};

fn grace() -> Identity {
    Identity::new("grace", "Grace Hopper")
}

/// Publish a post and claim the daily quest for it
fn busy_day<S: ProgressStore>(engine: &mut GamificationEngine<S, FixedClock>) {
    engine
        .record(ActivityEvent::PostPublished {
            tags: vec!["space".to_string()],
        })
        .unwrap();
    engine.complete_quest("daily-post").unwrap();
}

#[test]
fn test_json_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at_date(date(2024, 1, 10));

    let mut engine =
        GamificationEngine::open(JsonFileStore::new(dir.path()), clock.clone(), ada()).unwrap();
    busy_day(&mut engine);
    let saved = engine.progress().clone();
    drop(engine);

    assert!(dir.path().join("progress_616461.json").exists());

    let engine = GamificationEngine::open(JsonFileStore::new(dir.path()), clock, ada()).unwrap();
    assert_eq!(engine.progress(), &saved);
    assert_eq!(engine.progress().xp, 75);
    assert!(engine.progress().has_badge(BadgeId::FirstPost));
    assert!(engine.quests(QuestCycle::Daily)[0].completed);
}

#[test]
fn test_sqlite_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("progress.db");
    let clock = FixedClock::at_date(date(2024, 1, 10));

    let mut engine =
        GamificationEngine::open(SqliteStore::open(&path).unwrap(), clock.clone(), ada()).unwrap();
    busy_day(&mut engine);
    let saved = engine.progress().clone();
    drop(engine);

    // Next day: progress is kept, the daily board is fresh
    clock.advance_days(1);
    let engine =
        GamificationEngine::open(SqliteStore::open(&path).unwrap(), clock, ada()).unwrap();
    assert_eq!(engine.progress().xp, saved.xp);
    assert_eq!(engine.progress().badges, saved.badges);
    assert_eq!(engine.progress().streak, 1);
    assert_eq!(engine.progress().completed_quest_ids, vec!["daily-post"]);
    assert!(engine.claimable_quests().is_empty());
    assert_eq!(engine.store().schema_version().unwrap(), 2);
}

#[test]
fn test_users_are_kept_apart() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at_date(date(2024, 1, 10));

    let mut engine =
        GamificationEngine::open(JsonFileStore::new(dir.path()), clock.clone(), ada()).unwrap();
    engine.add_xp(300, "seed").unwrap();

    let engine = GamificationEngine::open(JsonFileStore::new(dir.path()), clock, grace()).unwrap();
    assert_eq!(engine.progress().xp, 0);
    assert_eq!(engine.identity().id, UserId::new("grace"));
}

#[test]
fn test_leaderboard_from_json_store() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at_date(date(2024, 1, 10));

    let mut engine =
        GamificationEngine::open(JsonFileStore::new(dir.path()), clock.clone(), ada()).unwrap();
    engine.add_xp(120, "seed").unwrap();

    let mut engine =
        GamificationEngine::open(JsonFileStore::new(dir.path()), clock, grace()).unwrap();
    engine.add_xp(40, "seed").unwrap();
    engine
        .record(ActivityEvent::PostPublished { tags: vec![] })
        .unwrap();
    engine
        .record(ActivityEvent::PostPublished { tags: vec![] })
        .unwrap();

    let store = JsonFileStore::new(dir.path());
    let overall = leaderboard::from_store(&store, LeaderboardCategory::Overall).unwrap();
    let order: Vec<_> = overall
        .iter()
        .map(|r| (r.rank, r.entry.name.as_str(), r.entry.xp))
        .collect();
    assert_eq!(
        order,
        vec![(1, "Ada Lovelace", 120), (2, "Grace Hopper", 90)]
    );

    let posts = leaderboard::from_store(&store, LeaderboardCategory::Posts).unwrap();
    assert_eq!(posts[0].entry.user_id, UserId::new("grace"));
    assert_eq!(posts[0].entry.posts, 2);
    assert_eq!(
        leaderboard::rank_of(&posts, &UserId::new("ada")),
        Some(2)
    );
}

#[test]
fn test_leaderboard_from_sqlite_store() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let clock = FixedClock::at_date(date(2024, 1, 10));

    for (identity, streak_days) in [(ada(), 2u64), (grace(), 4)] {
        let mut engine = GamificationEngine::open(&mut store, clock.clone(), identity).unwrap();
        for _ in 0..streak_days {
            engine.update_streak().unwrap();
            clock.advance_days(1);
        }
        clock.set_date(date(2024, 1, 10));
    }

    let boxed: Box<dyn ProgressStore> = Box::new(store);
    let ranked = leaderboard::from_store(&*boxed, LeaderboardCategory::Streak).unwrap();
    let streaks: Vec<_> = ranked
        .iter()
        .map(|r| (r.entry.user_id.as_str(), r.entry.streak))
        .collect();
    assert_eq!(streaks, vec![("grace", 4), ("ada", 2)]);
}
