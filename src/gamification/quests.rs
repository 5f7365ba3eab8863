//! Quest System
//!
//! Quests are handed out per assignment cycle. Daily quests are regenerated
//! each calendar day, weekly quests each ISO week, and permanent quests
//! (achievements and puzzles) exactly once. A cycle is only regenerated when
//! its key changes, so progress survives a reload within the same cycle.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::badges::BadgeId;

/// Quest category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestType {
    Daily,
    Weekly,
    Achievement,
    Puzzle,
}

impl QuestType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Achievement => "achievement",
            Self::Puzzle => "puzzle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Legendary,
}

/// Activity that advances a quest's progress counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestMetric {
    PostsPublished,
    LikesGiven,
    CommentsPosted,
    TrendingPosts,
    /// Progress mirrors the current daily streak
    DailyStreak,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestReward {
    pub xp: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<BadgeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loot_box: Option<String>,
}

impl QuestReward {
    fn xp(xp: u32) -> Self {
        Self {
            xp,
            badge: None,
            loot_box: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

/// A quest instance assigned to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<QuestMetric>,
    pub target: u32,
    pub current: u32,
    pub reward: QuestReward,
    pub completed: bool,
    /// Last calendar day on which the quest may be completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puzzle: Option<Puzzle>,
}

impl Quest {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_at.is_some_and(|last_day| today > last_day)
    }

    /// Progress reached the target and the reward has not been claimed
    pub fn is_claimable(&self, today: NaiveDate) -> bool {
        !self.completed && self.current >= self.target && !self.is_expired(today)
    }

    /// Add progress, clamped to the target. Returns whether anything changed.
    pub fn advance(&mut self, amount: u32) -> bool {
        self.set_progress(self.current.saturating_add(amount))
    }

    /// Set progress, clamped to the target. Completed quests are frozen.
    pub fn set_progress(&mut self, value: u32) -> bool {
        if self.completed {
            return false;
        }
        let clamped = value.min(self.target);
        let changed = clamped != self.current;
        self.current = clamped;
        changed
    }

    pub fn mark_completed(&mut self) {
        self.current = self.target;
        self.completed = true;
    }
}

/// Assignment cycle a quest set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestCycle {
    Daily,
    Weekly,
    Permanent,
}

impl QuestCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Permanent => "permanent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "permanent" => Some(Self::Permanent),
            _ => None,
        }
    }

    pub fn all() -> &'static [QuestCycle] {
        &[Self::Daily, Self::Weekly, Self::Permanent]
    }

    /// Deduplication key of the cycle containing `today`
    pub fn key(&self, today: NaiveDate) -> String {
        match self {
            Self::Daily => today.format("%Y-%m-%d").to_string(),
            Self::Weekly => {
                let week = today.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Self::Permanent => "permanent".to_string(),
        }
    }

    /// Last valid day of the cycle containing `today`
    pub fn expiry(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => Some(today),
            Self::Weekly => {
                let remaining = 6 - u64::from(today.weekday().num_days_from_monday());
                today.checked_add_days(Days::new(remaining))
            }
            Self::Permanent => None,
        }
    }

    /// Build the fresh quest set for the cycle containing `today`
    pub fn generate(&self, today: NaiveDate) -> QuestSet {
        let expires_at = self.expiry(today);
        let quests = match self {
            Self::Daily => daily_quests(expires_at),
            Self::Weekly => weekly_quests(expires_at),
            Self::Permanent => permanent_quests(),
        };
        QuestSet {
            cycle_key: self.key(today),
            quests,
        }
    }
}

fn metric_quest(
    id: &str,
    title: &str,
    description: &str,
    quest_type: QuestType,
    difficulty: Difficulty,
    metric: QuestMetric,
    target: u32,
    reward: QuestReward,
    expires_at: Option<NaiveDate>,
) -> Quest {
    Quest {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        quest_type,
        difficulty,
        metric: Some(metric),
        target,
        current: 0,
        reward,
        completed: false,
        expires_at,
        puzzle: None,
    }
}

fn daily_quests(expires_at: Option<NaiveDate>) -> Vec<Quest> {
    vec![
        metric_quest(
            "daily-post",
            "Daily Writer",
            "Publish 1 blog post today",
            QuestType::Daily,
            Difficulty::Easy,
            QuestMetric::PostsPublished,
            1,
            QuestReward::xp(50),
            expires_at,
        ),
        metric_quest(
            "daily-likes",
            "Spread the Love",
            "Like 5 blog posts today",
            QuestType::Daily,
            Difficulty::Easy,
            QuestMetric::LikesGiven,
            5,
            QuestReward::xp(25),
            expires_at,
        ),
        metric_quest(
            "daily-comments",
            "Community Engagement",
            "Comment on 3 blog posts today",
            QuestType::Daily,
            Difficulty::Easy,
            QuestMetric::CommentsPosted,
            3,
            QuestReward::xp(30),
            expires_at,
        ),
    ]
}

fn weekly_quests(expires_at: Option<NaiveDate>) -> Vec<Quest> {
    vec![
        metric_quest(
            "weekly-streak",
            "Weekly Warrior",
            "Maintain a 7-day writing streak",
            QuestType::Weekly,
            Difficulty::Hard,
            QuestMetric::DailyStreak,
            7,
            QuestReward {
                xp: 200,
                badge: Some(BadgeId::StreakMaster),
                loot_box: Some("epic-writer".to_string()),
            },
            expires_at,
        ),
        metric_quest(
            "weekly-writer",
            "Prolific Writer",
            "Publish 3 blog posts this week",
            QuestType::Weekly,
            Difficulty::Medium,
            QuestMetric::PostsPublished,
            3,
            QuestReward::xp(120),
            expires_at,
        ),
    ]
}

fn permanent_quests() -> Vec<Quest> {
    vec![
        metric_quest(
            "trending-master",
            "Trending Master",
            "Get 3 blog posts trending",
            QuestType::Achievement,
            Difficulty::Legendary,
            QuestMetric::TrendingPosts,
            3,
            QuestReward {
                xp: 500,
                badge: Some(BadgeId::Trendsetter),
                loot_box: Some("legendary-creator".to_string()),
            },
            None,
        ),
        Quest {
            id: "space-puzzle".to_string(),
            title: "Space Knowledge Quiz".to_string(),
            description: "Answer this space-related question correctly".to_string(),
            quest_type: QuestType::Puzzle,
            difficulty: Difficulty::Medium,
            metric: None,
            target: 1,
            current: 0,
            reward: QuestReward {
                xp: 100,
                badge: None,
                loot_box: Some("space-explorer".to_string()),
            },
            completed: false,
            expires_at: None,
            puzzle: Some(Puzzle {
                question: "What is the closest star to Earth (other than the Sun)?".to_string(),
                options: vec![
                    "Alpha Centauri".to_string(),
                    "Proxima Centauri".to_string(),
                    "Sirius".to_string(),
                    "Vega".to_string(),
                ],
                correct_answer: 1,
            }),
        },
    ]
}

/// Quests of one cycle, tagged with the cycle key they were generated for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestSet {
    pub cycle_key: String,
    pub quests: Vec<Quest>,
}

impl QuestSet {
    /// Keep progress and completion of quests from an earlier set of the
    /// same cycle. Sets from another cycle key are ignored.
    pub fn carry_over(&mut self, previous: &QuestSet) {
        if previous.cycle_key != self.cycle_key {
            return;
        }
        for quest in &mut self.quests {
            if let Some(old) = previous.quests.iter().find(|q| q.id == quest.id) {
                quest.current = old.current.min(quest.target);
                quest.completed = old.completed;
            }
        }
    }
}

/// All active quest sets of a user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestBoard {
    #[serde(default)]
    pub daily: Option<QuestSet>,
    #[serde(default)]
    pub weekly: Option<QuestSet>,
    #[serde(default)]
    pub permanent: Option<QuestSet>,
}

impl QuestBoard {
    pub fn set(&self, cycle: QuestCycle) -> Option<&QuestSet> {
        match cycle {
            QuestCycle::Daily => self.daily.as_ref(),
            QuestCycle::Weekly => self.weekly.as_ref(),
            QuestCycle::Permanent => self.permanent.as_ref(),
        }
    }

    fn slot_mut(&mut self, cycle: QuestCycle) -> &mut Option<QuestSet> {
        match cycle {
            QuestCycle::Daily => &mut self.daily,
            QuestCycle::Weekly => &mut self.weekly,
            QuestCycle::Permanent => &mut self.permanent,
        }
    }

    /// Quests of one cycle (empty if never generated)
    pub fn quests(&self, cycle: QuestCycle) -> &[Quest] {
        self.set(cycle).map(|s| s.quests.as_slice()).unwrap_or(&[])
    }

    /// The cycle has never been generated or its key changed
    pub fn needs_refresh(&self, cycle: QuestCycle, today: NaiveDate) -> bool {
        self.set(cycle)
            .is_none_or(|set| set.cycle_key != cycle.key(today))
    }

    /// Replace the quest set of one cycle
    pub fn replace(&mut self, cycle: QuestCycle, set: QuestSet) {
        *self.slot_mut(cycle) = Some(set);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        QuestCycle::all()
            .iter()
            .flat_map(move |cycle| self.quests(*cycle).iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Quest> {
        [&mut self.daily, &mut self.weekly, &mut self.permanent]
            .into_iter()
            .flatten()
            .flat_map(|set| set.quests.iter_mut())
    }

    pub fn find(&self, quest_id: &str) -> Option<&Quest> {
        self.iter().find(|q| q.id == quest_id)
    }

    pub fn find_mut(&mut self, quest_id: &str) -> Option<&mut Quest> {
        self.iter_mut().find(|q| q.id == quest_id)
    }
}
