//! Tests for battles and battle prizes

mod common;

use blogportal::arena::{Arena, BattleError, BattleStatus};
use blogportal::clock::Clock;
use blogportal::gamification::ActivityEvent;
use blogportal::store::MemoryStore;
use blogportal::{FixedClock, GamificationEngine, Identity, UserId};

use common::{ada, date};

fn elena() -> Identity {
    Identity::new("elena-rodriguez", "Elena Rodriguez")
}

#[test]
fn test_winner_claims_prize_once() {
    let clock = FixedClock::at_date(date(2024, 1, 20));
    let arena = Arena::seed(clock.now());
    let battle = arena.get("4").unwrap();
    assert_eq!(battle.status(clock.now()), BattleStatus::Completed);

    let mut engine = GamificationEngine::open(MemoryStore::new(), clock, elena()).unwrap();
    let change = engine.claim_battle_prize(battle).unwrap().unwrap();
    assert_eq!(change.xp, 150);
    assert_eq!(change.level, 2);
    assert_eq!(engine.progress().claimed_battles, vec!["4"]);

    let note = engine.take_notification().unwrap();
    assert_eq!(note.reason, "Won battle: The Art of Minimalism");

    assert_eq!(engine.claim_battle_prize(battle).unwrap(), None);
    assert_eq!(engine.progress().xp, 150);
}

#[test]
fn test_only_the_winner_can_claim() {
    let clock = FixedClock::at_date(date(2024, 1, 20));
    let arena = Arena::seed(clock.now());

    let mut engine = GamificationEngine::open(
        MemoryStore::new(),
        clock,
        Identity::new("zen-master", "Zen Master"),
    )
    .unwrap();

    assert_eq!(engine.claim_battle_prize(arena.get("4").unwrap()).unwrap(), None);
    assert_eq!(engine.progress().xp, 0);
}

#[test]
fn test_no_prize_before_voting_ends() {
    let clock = FixedClock::at_date(date(2024, 1, 20));
    let arena = Arena::seed(clock.now());

    let mut engine = GamificationEngine::open(
        MemoryStore::new(),
        clock,
        Identity::new("alex-cosmos", "Dr. Alex Cosmos"),
    )
    .unwrap();

    // Leading, but the battle is still in its voting phase
    assert_eq!(engine.claim_battle_prize(arena.get("2").unwrap()).unwrap(), None);
}

#[test]
fn test_join_vote_and_win() {
    let clock = FixedClock::at_date(date(2024, 1, 20));
    let mut arena = Arena::seed(clock.now());
    let mut engine = GamificationEngine::open(MemoryStore::new(), clock.clone(), ada()).unwrap();

    let entry = arena
        .join("1", engine.identity(), Some("my-post".to_string()), clock.now())
        .unwrap();
    assert_eq!(entry.votes, 0);
    engine.record(ActivityEvent::BattleJoined).unwrap();
    assert_eq!(engine.progress().battles_joined, 1);

    assert!(matches!(
        arena.join("1", &ada(), None, clock.now()),
        Err(BattleError::AlreadyJoined(_))
    ));
    assert!(matches!(
        arena.vote("3", &UserId::new("sarah-chen"), &ada().id, clock.now()),
        Err(BattleError::VotingClosed {
            status: BattleStatus::Upcoming,
            ..
        })
    ));

    // Into the voting phase; 30 voters push the new entry past sarah-chen
    let voting = clock.now() + chrono::Duration::hours(12);
    for i in 0..30 {
        let voter = UserId::new(format!("fan-{i}"));
        arena.vote("1", &ada().id, &voter, voting).unwrap();
    }
    assert!(matches!(
        arena.vote("1", &ada().id, &ada().id, voting),
        Err(BattleError::SelfVote)
    ));
    assert!(matches!(
        arena.vote("1", &UserId::new("sarah-chen"), &UserId::new("fan-0"), voting),
        Err(BattleError::AlreadyVoted(_))
    ));

    // Voting closes 34 hours after seeding
    clock.set(clock.now() + chrono::Duration::hours(35));
    let change = engine
        .claim_battle_prize(arena.get("1").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(change.xp, 200);
}

#[test]
fn test_full_battle_rejects_entries() {
    let clock = FixedClock::at_date(date(2024, 1, 20));
    let mut arena = Arena::seed(clock.now());
    let now = clock.now();

    for i in 0..3 {
        let identity = Identity::new(format!("writer-{i}"), format!("Writer {i}"));
        arena.join("1", &identity, None, now).unwrap();
    }

    assert!(matches!(
        arena.join("1", &ada(), None, now),
        Err(BattleError::Full { max: 5, .. })
    ));
    assert!(matches!(
        arena.join("4", &ada(), None, now),
        Err(BattleError::NotJoinable {
            status: BattleStatus::Completed,
            ..
        })
    ));
}
