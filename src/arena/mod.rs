//! Battle Arena
//!
//! Battles are shared between all users and live in `battles.json` next to
//! the progress records. Prizes are paid out per user through
//! `GamificationEngine::claim_battle_prize`.

mod battle;

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::identity::{Identity, UserId};
use crate::store::{lock_exclusive, replace_file, write_atomic, StoreError};

pub use battle::{Battle, BattlePrize, BattleStatus, Participant};

/// File name of the battle list inside the data directory
pub const BATTLES_FILE: &str = "battles.json";

#[derive(Debug, thiserror::Error)]
pub enum BattleError {
    #[error("Unknown battle '{0}'")]
    UnknownBattle(String),

    #[error("'{0}' is not taking part in this battle")]
    UnknownParticipant(String),

    #[error("Battle '{battle_id}' is {status} and not open for entries")]
    NotJoinable {
        battle_id: String,
        status: BattleStatus,
    },

    #[error("Battle '{battle_id}' is full ({max} participants)")]
    Full { battle_id: String, max: usize },

    #[error("Already joined battle '{0}'")]
    AlreadyJoined(String),

    #[error("Voting for battle '{battle_id}' is closed ({status})")]
    VotingClosed {
        battle_id: String,
        status: BattleStatus,
    },

    #[error("Already voted in battle '{0}'")]
    AlreadyVoted(String),

    #[error("Participants cannot vote for themselves")]
    SelfVote,

    #[error("Malformed battle file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// All known battles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arena {
    pub battles: Vec<Battle>,
}

impl Arena {
    /// Load battles from a file; a missing file is an empty arena
    pub fn load(path: &Path) -> Result<Self, BattleError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No battle file yet");
                return Ok(Self::default());
            }
            Err(e) => return Err(StoreError::io(path, e).into()),
        };
        Ok(Self {
            battles: serde_json::from_str(&content)?,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), BattleError> {
        let content = serde_json::to_vec_pretty(&self.battles)?;
        write_atomic(path, &content)?;
        Ok(())
    }

    /// Load, modify and save the battle file under one exclusive lock, so
    /// concurrent joins and votes are never lost. Nothing is written when
    /// `op` fails.
    pub fn update<T, E>(path: &Path, op: impl FnOnce(&mut Arena) -> Result<T, E>) -> Result<T, E>
    where
        E: From<BattleError>,
    {
        let _lock = lock_exclusive(path).map_err(BattleError::from)?;
        let mut arena = Self::load(path)?;
        let value = op(&mut arena)?;
        let content = serde_json::to_vec_pretty(&arena.battles).map_err(BattleError::from)?;
        replace_file(path, &content).map_err(BattleError::from)?;
        Ok(value)
    }

    pub fn get(&self, battle_id: &str) -> Result<&Battle, BattleError> {
        self.battles
            .iter()
            .find(|b| b.id == battle_id)
            .ok_or_else(|| BattleError::UnknownBattle(battle_id.to_string()))
    }

    fn get_mut(&mut self, battle_id: &str) -> Result<&mut Battle, BattleError> {
        self.battles
            .iter_mut()
            .find(|b| b.id == battle_id)
            .ok_or_else(|| BattleError::UnknownBattle(battle_id.to_string()))
    }

    /// Battles currently in the given phase
    pub fn with_status(&self, status: BattleStatus, now: DateTime<Utc>) -> Vec<&Battle> {
        self.battles
            .iter()
            .filter(|b| b.status(now) == status)
            .collect()
    }

    pub fn join(
        &mut self,
        battle_id: &str,
        identity: &Identity,
        post_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&Participant, BattleError> {
        self.get_mut(battle_id)?.join(identity, post_id, now)
    }

    pub fn vote(
        &mut self,
        battle_id: &str,
        participant: &UserId,
        voter: &UserId,
        now: DateTime<Utc>,
    ) -> Result<u32, BattleError> {
        self.get_mut(battle_id)?.vote(participant, voter, now)
    }

    /// Starter battles, one per phase, scheduled around `now`
    pub fn seed(now: DateTime<Utc>) -> Self {
        let at = |hours: i64| now + Duration::hours(hours);
        let entrant = |id: &str, name: &str, post: &str, votes: u32, joined| Participant {
            user_id: UserId::new(id),
            name: name.to_string(),
            post_id: Some(post.to_string()),
            votes,
            joined_at: joined,
        };

        let battles = vec![
            Battle {
                id: "1".to_string(),
                topic: "The Future of AI in Education".to_string(),
                description: "Write about how artificial intelligence will transform learning and teaching in the next decade.".to_string(),
                start: at(-2),
                end: at(10),
                voting_end: at(34),
                participants: vec![
                    entrant("sarah-chen", "Sarah Chen", "ai-education-future", 23, at(-2)),
                    entrant("marcus-green", "Marcus Green", "ai-learning-revolution", 18, at(-1)),
                ],
                max_participants: 5,
                prize: BattlePrize {
                    xp: 200,
                    badge: Some("battle-winner".to_string()),
                },
                voters: Vec::new(),
            },
            Battle {
                id: "2".to_string(),
                topic: "Space Tourism: Dream or Reality?".to_string(),
                description: "Explore the current state and future prospects of commercial space travel for everyday people.".to_string(),
                start: at(-26),
                end: at(-14),
                voting_end: at(10),
                participants: vec![
                    entrant("alex-cosmos", "Dr. Alex Cosmos", "space-tourism-reality", 45, at(-26)),
                    entrant("luna-star", "Luna Star", "commercial-space-future", 38, at(-25)),
                    entrant("rocket-riley", "Rocket Riley", "space-travel-dreams", 29, at(-24)),
                ],
                max_participants: 5,
                prize: BattlePrize {
                    xp: 200,
                    badge: Some("space-warrior".to_string()),
                },
                voters: Vec::new(),
            },
            Battle {
                id: "3".to_string(),
                topic: "Sustainable Cities of Tomorrow".to_string(),
                description: "Design the perfect eco-friendly city that balances technology, nature, and human needs.".to_string(),
                start: at(22),
                end: at(34),
                voting_end: at(58),
                participants: Vec::new(),
                max_participants: 4,
                prize: BattlePrize {
                    xp: 150,
                    badge: Some("eco-champion".to_string()),
                },
                voters: Vec::new(),
            },
            Battle {
                id: "4".to_string(),
                topic: "The Art of Minimalism".to_string(),
                description: "Explore how minimalist principles can improve our digital and physical lives.".to_string(),
                start: at(-50),
                end: at(-38),
                voting_end: at(-14),
                participants: vec![
                    entrant("elena-rodriguez", "Elena Rodriguez", "minimalist-life", 67, at(-50)),
                    entrant("zen-master", "Zen Master", "simple-living", 42, at(-49)),
                ],
                max_participants: 3,
                prize: BattlePrize {
                    xp: 150,
                    badge: Some("minimalist-master".to_string()),
                },
                voters: Vec::new(),
            },
        ];

        Self { battles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_seed_covers_every_phase() {
        let now = now();
        let arena = Arena::seed(now);
        for status in [
            BattleStatus::Upcoming,
            BattleStatus::Active,
            BattleStatus::Voting,
            BattleStatus::Completed,
        ] {
            assert_eq!(arena.with_status(status, now).len(), 1, "{status}");
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let arena = Arena::load(&dir.path().join(BATTLES_FILE)).unwrap();
        assert!(arena.battles.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(BATTLES_FILE);
        let now = now();

        let mut arena = Arena::seed(now);
        arena
            .join("1", &Identity::new("me", "Me"), None, now)
            .unwrap();
        arena.save(&path).unwrap();

        let loaded = Arena::load(&path).unwrap();
        assert_eq!(loaded, arena);
        assert!(loaded.get("1").unwrap().participant(&UserId::new("me")).is_some());
    }

    #[test]
    fn test_unknown_battle() {
        let mut arena = Arena::seed(now());
        assert!(matches!(
            arena.vote("99", &UserId::new("a"), &UserId::new("b"), now()),
            Err(BattleError::UnknownBattle(_))
        ));
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(BATTLES_FILE);
        let now = now();
        Arena::seed(now).save(&path).unwrap();

        let result = Arena::update(&path, |arena| {
            arena.join("1", &Identity::new("me", "Me"), None, now)?;
            arena.join("1", &Identity::new("me", "Me"), None, now)?;
            Ok::<_, BattleError>(())
        });

        assert!(matches!(result, Err(BattleError::AlreadyJoined(_))));
        assert_eq!(Arena::load(&path).unwrap(), Arena::seed(now));
    }

    #[test]
    fn test_concurrent_votes_are_all_counted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(BATTLES_FILE);
        let now = now();
        Arena::seed(now).save(&path).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let voter = UserId::new(format!("fan-{i}"));
                    Arena::update(&path, |arena| {
                        arena.vote("2", &UserId::new("luna-star"), &voter, now)
                    })
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let arena = Arena::load(&path).unwrap();
        let battle = arena.get("2").unwrap();
        assert_eq!(battle.participant(&UserId::new("luna-star")).unwrap().votes, 46);
        assert_eq!(battle.voters.len(), 8);
    }
}
