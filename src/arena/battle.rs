//! Battles: timed writing competitions decided by community votes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BattleError;
use crate::identity::{Identity, UserId};

/// Phase of a battle, derived from its schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleStatus {
    Upcoming,
    Active,
    Voting,
    Completed,
}

impl BattleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Voting => "voting",
            Self::Completed => "completed",
        }
    }

    pub fn accepts_entries(&self) -> bool {
        matches!(self, Self::Upcoming | Self::Active)
    }

    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::Active | Self::Voting)
    }
}

impl std::fmt::Display for BattleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: UserId,
    pub name: String,
    /// Post entered into the battle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    pub votes: u32,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattlePrize {
    pub xp: u32,
    /// Badge id; ids outside the badge catalog are ignored when claimed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    pub id: String,
    pub topic: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub voting_end: DateTime<Utc>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    pub max_participants: usize,
    pub prize: BattlePrize,
    /// Users who already voted in this battle
    #[serde(default)]
    pub voters: Vec<UserId>,
}

impl Battle {
    pub fn status(&self, now: DateTime<Utc>) -> BattleStatus {
        if now < self.start {
            BattleStatus::Upcoming
        } else if now < self.end {
            BattleStatus::Active
        } else if now < self.voting_end {
            BattleStatus::Voting
        } else {
            BattleStatus::Completed
        }
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants
    }

    pub fn participant(&self, user: &UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.user_id == user)
    }

    pub fn has_voted(&self, user: &UserId) -> bool {
        self.voters.contains(user)
    }

    pub fn total_votes(&self) -> u32 {
        self.participants.iter().map(|p| p.votes).sum()
    }

    /// Enter a battle with an optional post
    pub fn join(
        &mut self,
        identity: &Identity,
        post_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&Participant, BattleError> {
        let status = self.status(now);
        if !status.accepts_entries() {
            return Err(BattleError::NotJoinable {
                battle_id: self.id.clone(),
                status,
            });
        }
        if self.participant(&identity.id).is_some() {
            return Err(BattleError::AlreadyJoined(self.id.clone()));
        }
        if self.is_full() {
            return Err(BattleError::Full {
                battle_id: self.id.clone(),
                max: self.max_participants,
            });
        }

        self.participants.push(Participant {
            user_id: identity.id.clone(),
            name: identity.name.clone(),
            post_id,
            votes: 0,
            joined_at: now,
        });
        let index = self.participants.len() - 1;
        Ok(&self.participants[index])
    }

    /// Cast `voter`'s single vote for a participant. Returns the new tally.
    pub fn vote(
        &mut self,
        participant: &UserId,
        voter: &UserId,
        now: DateTime<Utc>,
    ) -> Result<u32, BattleError> {
        let status = self.status(now);
        if !status.accepts_votes() {
            return Err(BattleError::VotingClosed {
                battle_id: self.id.clone(),
                status,
            });
        }
        if participant == voter {
            return Err(BattleError::SelfVote);
        }
        if self.has_voted(voter) {
            return Err(BattleError::AlreadyVoted(self.id.clone()));
        }

        let entry = self
            .participants
            .iter_mut()
            .find(|p| &p.user_id == participant)
            .ok_or_else(|| BattleError::UnknownParticipant(participant.to_string()))?;
        entry.votes += 1;
        let votes = entry.votes;
        self.voters.push(voter.clone());
        Ok(votes)
    }

    /// Participant with the most votes; ties go to whoever joined first
    pub fn leader(&self) -> Option<&Participant> {
        self.participants
            .iter()
            .reduce(|best, p| if p.votes > best.votes { p } else { best })
    }

    /// The leader, once the battle is completed
    pub fn winner(&self, now: DateTime<Utc>) -> Option<&Participant> {
        if self.status(now) != BattleStatus::Completed {
            return None;
        }
        self.leader()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn battle(now: DateTime<Utc>) -> Battle {
        Battle {
            id: "b1".to_string(),
            topic: "Minimalism".to_string(),
            description: String::new(),
            start: now - Duration::hours(1),
            end: now + Duration::hours(1),
            voting_end: now + Duration::hours(2),
            participants: Vec::new(),
            max_participants: 2,
            prize: BattlePrize {
                xp: 150,
                badge: Some("battle-winner".to_string()),
            },
            voters: Vec::new(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_status_follows_schedule() {
        let now = now();
        let b = battle(now);
        assert_eq!(b.status(now - Duration::hours(2)), BattleStatus::Upcoming);
        assert_eq!(b.status(now), BattleStatus::Active);
        assert_eq!(b.status(now + Duration::minutes(90)), BattleStatus::Voting);
        assert_eq!(b.status(now + Duration::hours(2)), BattleStatus::Completed);
    }

    #[test]
    fn test_join_rules() {
        let now = now();
        let mut b = battle(now);
        let ada = Identity::new("ada", "Ada");

        b.join(&ada, Some("post-1".to_string()), now).unwrap();
        assert!(matches!(
            b.join(&ada, None, now),
            Err(BattleError::AlreadyJoined(_))
        ));

        b.join(&Identity::new("bob", "Bob"), None, now).unwrap();
        assert!(matches!(
            b.join(&Identity::new("cy", "Cy"), None, now),
            Err(BattleError::Full { max: 2, .. })
        ));
    }

    #[test]
    fn test_cannot_join_during_voting() {
        let now = now();
        let mut b = battle(now);
        let err = b
            .join(&Identity::new("ada", "Ada"), None, now + Duration::minutes(90))
            .unwrap_err();
        assert!(matches!(
            err,
            BattleError::NotJoinable {
                status: BattleStatus::Voting,
                ..
            }
        ));
    }

    #[test]
    fn test_vote_rules() {
        let now = now();
        let mut b = battle(now);
        let ada = Identity::new("ada", "Ada");
        b.join(&ada, None, now).unwrap();
        let voter = UserId::new("voter");

        assert!(matches!(
            b.vote(&ada.id, &ada.id, now),
            Err(BattleError::SelfVote)
        ));
        assert_eq!(b.vote(&ada.id, &voter, now).unwrap(), 1);
        assert!(matches!(
            b.vote(&ada.id, &voter, now),
            Err(BattleError::AlreadyVoted(_))
        ));
        assert!(matches!(
            b.vote(&UserId::new("ghost"), &UserId::new("v2"), now),
            Err(BattleError::UnknownParticipant(_))
        ));
        assert!(matches!(
            b.vote(&ada.id, &UserId::new("late"), now + Duration::hours(3)),
            Err(BattleError::VotingClosed { .. })
        ));
    }

    #[test]
    fn test_winner_ties_go_to_earliest_joiner() {
        let now = now();
        let mut b = battle(now);
        let ada = Identity::new("ada", "Ada");
        let bob = Identity::new("bob", "Bob");
        b.join(&ada, None, now).unwrap();
        b.join(&bob, None, now).unwrap();
        b.vote(&bob.id, &UserId::new("v1"), now).unwrap();
        b.vote(&ada.id, &UserId::new("v2"), now).unwrap();

        assert_eq!(b.winner(now), None);
        let done = now + Duration::hours(2);
        assert_eq!(b.winner(done).map(|p| p.name.as_str()), Some("Ada"));
    }
}
