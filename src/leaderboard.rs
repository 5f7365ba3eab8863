//! Leaderboard ranking
//!
//! Pure read-side computation over stored progress records. Sorting is
//! stable and descending, so users with equal scores keep the order in
//! which they were supplied.

use serde::Serialize;

use crate::gamification::UserProgress;
use crate::identity::UserId;
use crate::store::{ProgressStore, StoreError, StoredProgress};

/// Stat a leaderboard is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardCategory {
    /// Total XP
    #[default]
    Overall,
    Posts,
    Likes,
    Trending,
    Streak,
}

impl LeaderboardCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Posts => "posts",
            Self::Likes => "likes",
            Self::Trending => "trending",
            Self::Streak => "streak",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "overall" | "xp" => Some(Self::Overall),
            "posts" => Some(Self::Posts),
            "likes" => Some(Self::Likes),
            "trending" => Some(Self::Trending),
            "streak" => Some(Self::Streak),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub name: String,
    pub xp: u64,
    pub level: u32,
    pub posts: u64,
    pub likes: u64,
    pub comments: u64,
    pub trending: u64,
    pub streak: u32,
    pub badges: usize,
}

impl LeaderboardEntry {
    pub fn from_progress(user_id: UserId, name: impl Into<String>, progress: &UserProgress) -> Self {
        Self {
            user_id,
            name: name.into(),
            xp: progress.xp,
            level: progress.level,
            posts: progress.total_posts,
            likes: progress.total_likes,
            comments: progress.total_comments,
            trending: progress.trending_posts,
            streak: progress.streak,
            badges: progress.badges.len(),
        }
    }

    pub fn score(&self, category: LeaderboardCategory) -> u64 {
        match category {
            LeaderboardCategory::Overall => self.xp,
            LeaderboardCategory::Posts => self.posts,
            LeaderboardCategory::Likes => self.likes,
            LeaderboardCategory::Trending => self.trending,
            LeaderboardCategory::Streak => u64::from(self.streak),
        }
    }
}

impl From<StoredProgress> for LeaderboardEntry {
    fn from(record: StoredProgress) -> Self {
        Self::from_progress(record.user_id, record.name, &record.progress)
    }
}

/// An entry with its 1-based position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// Sort entries by a category, highest first
pub fn rank(mut entries: Vec<LeaderboardEntry>, category: LeaderboardCategory) -> Vec<RankedEntry> {
    // sort_by is stable
    entries.sort_by(|a, b| b.score(category).cmp(&a.score(category)));
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankedEntry { rank: i + 1, entry })
        .collect()
}

/// 1-based rank of a user in an already ranked list
pub fn rank_of(ranked: &[RankedEntry], user: &UserId) -> Option<usize> {
    ranked
        .iter()
        .find(|r| &r.entry.user_id == user)
        .map(|r| r.rank)
}

/// Rank every user a store knows about
pub fn from_store<S: ProgressStore + ?Sized>(
    store: &S,
    category: LeaderboardCategory,
) -> Result<Vec<RankedEntry>, StoreError> {
    let entries = store
        .records()?
        .into_iter()
        .map(LeaderboardEntry::from)
        .collect();
    Ok(rank(entries, category))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, xp: u64, streak: u32) -> LeaderboardEntry {
        let mut progress = UserProgress::with_xp(xp);
        progress.streak = streak;
        LeaderboardEntry::from_progress(UserId::new(id), id, &progress)
    }

    #[test]
    fn test_rank_by_xp() {
        let ranked = rank(
            vec![entry("b", 2100, 0), entry("c", 1890, 0), entry("a", 2450, 0)],
            LeaderboardCategory::Overall,
        );
        let order: Vec<_> = ranked.iter().map(|r| (r.rank, r.entry.xp)).collect();
        assert_eq!(order, vec![(1, 2450), (2, 2100), (3, 1890)]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(
            vec![entry("first", 10, 3), entry("second", 20, 3), entry("third", 30, 1)],
            LeaderboardCategory::Streak,
        );
        let ids: Vec<_> = ranked.iter().map(|r| r.entry.user_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_of() {
        let ranked = rank(
            vec![entry("a", 5, 0), entry("b", 50, 0)],
            LeaderboardCategory::Overall,
        );
        assert_eq!(rank_of(&ranked, &UserId::new("a")), Some(2));
        assert_eq!(rank_of(&ranked, &UserId::new("zz")), None);
    }
}
