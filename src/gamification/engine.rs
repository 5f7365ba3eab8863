//! Gamification Engine - core progression logic
//!
//! Owns one user's `UserProgress` and applies every rule that mutates it:
//! XP and levels, badge unlocks, streaks, quest lifecycle, loot boxes and
//! battle prizes. Each operation is staged on a copy of the record, persisted
//! through the [`ProgressStore`], and only then committed. A failed save
//! leaves the in-memory state as it was.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::badges::{BadgeId, UnlockedBadge};
use super::checker::{check_level_badge, check_milestone_badges, check_streak_badge};
use super::error::{EngineError, QuestBlock};
use super::events::{ActivityEvent, GamificationEvent, LevelUp, Notification};
use super::levels::{LevelProgress, XpRewards};
use super::loot::{Cosmetic, CosmeticKind, LootBox, LootContent};
use super::progress::{UserProgress, XpChange};
use super::quests::{Quest, QuestCycle, QuestMetric};
use super::streaks::StreakUpdate;
use crate::arena::Battle;
use crate::clock::Clock;
use crate::identity::Identity;
use crate::store::ProgressStore;

/// Result of a successful quest claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestCompletion {
    /// The quest instance after completion
    pub quest: Quest,
    pub xp: XpChange,
    /// Reward badge, if it was newly unlocked
    pub badge: Option<UnlockedBadge>,
    /// Reward loot box, if it was newly unlocked
    pub loot_box: Option<String>,
}

/// Result of answering a puzzle quest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleOutcome {
    Correct(QuestCompletion),
    Incorrect,
}

/// What came out of an opened loot box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootOpening {
    pub box_id: String,
    pub spent: u32,
    pub xp_gained: u32,
    pub badges: Vec<UnlockedBadge>,
    /// Cosmetics that were not already owned
    pub cosmetics: Vec<Cosmetic>,
    pub xp: u64,
    pub level: u32,
}

/// Start a session for whoever the identity provider reports.
///
/// Without an identity there is nothing to act on: no engine is built and
/// the store is never touched.
pub fn open_session<S: ProgressStore, C: Clock>(
    store: S,
    clock: C,
    identity: Option<Identity>,
) -> Result<Option<GamificationEngine<S, C>>, EngineError> {
    match identity {
        Some(identity) => GamificationEngine::open(store, clock, identity).map(Some),
        None => {
            debug!("No identity present, gamification is inert");
            Ok(None)
        }
    }
}

/// Main engine for one user's progression
pub struct GamificationEngine<S, C> {
    store: S,
    clock: C,
    identity: Identity,
    progress: UserProgress,
    last_events: Vec<GamificationEvent>,
    notification: Option<Notification>,
}

impl<S: ProgressStore, C: Clock> GamificationEngine<S, C> {
    /// Load (or create) the user's progress and bring the quest board up to
    /// date for the current cycles.
    pub fn open(store: S, clock: C, identity: Identity) -> Result<Self, EngineError> {
        let progress = match store.load(&identity.id)? {
            Some(mut progress) => {
                progress.normalize();
                progress
            }
            None => {
                debug!(user = %identity.id, "No stored progress, starting fresh");
                UserProgress::default()
            }
        };

        let mut engine = Self {
            store,
            clock,
            identity,
            progress,
            last_events: Vec::new(),
            notification: None,
        };
        engine.refresh_quests()?;
        Ok(engine)
    }

    // ========================================
    // OPERATIONS
    // ========================================

    /// Add (or, with a negative amount, spend) XP
    pub fn add_xp(&mut self, amount: i64, reason: &str) -> Result<XpChange, EngineError> {
        self.transact(|staged| staged.add_xp(amount, reason))
    }

    /// Unlock a catalog badge by id. Unknown and already-held ids are no-ops.
    pub fn unlock_badge(&mut self, badge_id: &str) -> Result<&[UnlockedBadge], EngineError> {
        self.transact(|staged| {
            staged.unlock_badge(badge_id);
            Ok(())
        })?;
        Ok(&self.progress.badges)
    }

    /// Claim an active quest's reward
    pub fn complete_quest(&mut self, quest_id: &str) -> Result<QuestCompletion, EngineError> {
        self.transact(|staged| staged.complete_quest(quest_id))
    }

    /// Answer a puzzle quest; a correct answer completes it
    pub fn answer_puzzle(
        &mut self,
        quest_id: &str,
        answer: usize,
    ) -> Result<PuzzleOutcome, EngineError> {
        let today = self.clock.today();
        let quest = self
            .progress
            .quest_board
            .find(quest_id)
            .ok_or_else(|| EngineError::quest(quest_id, QuestBlock::Unknown))?;
        let puzzle = quest
            .puzzle
            .as_ref()
            .ok_or_else(|| EngineError::quest(quest_id, QuestBlock::NotAPuzzle))?;
        if quest.completed {
            return Err(EngineError::quest(quest_id, QuestBlock::AlreadyCompleted));
        }
        if quest.is_expired(today) {
            return Err(EngineError::quest(quest_id, QuestBlock::Expired));
        }

        if puzzle.correct_answer != answer {
            debug!(quest = quest_id, answer, "Incorrect puzzle answer");
            return Ok(PuzzleOutcome::Incorrect);
        }

        self.complete_quest(quest_id).map(PuzzleOutcome::Correct)
    }

    /// Record today as an active day
    pub fn update_streak(&mut self) -> Result<StreakUpdate, EngineError> {
        self.transact(|staged| Ok(staged.update_streak()))
    }

    /// Rebuild the quest set of one cycle. Within the same cycle key the
    /// progress and completion of existing quests is kept.
    pub fn generate_quests(&mut self, cycle: QuestCycle) -> Result<&[Quest], EngineError> {
        self.transact(|staged| {
            staged.regenerate(cycle);
            Ok(())
        })?;
        Ok(self.progress.quest_board.quests(cycle))
    }

    /// Regenerate every cycle whose key changed since it was generated
    pub fn refresh_quests(&mut self) -> Result<Vec<QuestCycle>, EngineError> {
        self.transact(|staged| {
            let stale: Vec<QuestCycle> = QuestCycle::all()
                .iter()
                .copied()
                .filter(|cycle| staged.progress.quest_board.needs_refresh(*cycle, staged.today))
                .collect();
            for cycle in &stale {
                staged.regenerate(*cycle);
            }
            Ok(stale)
        })
    }

    /// Apply an activity event from the rest of the application
    pub fn record(&mut self, event: ActivityEvent) -> Result<&[GamificationEvent], EngineError> {
        self.transact(|staged| staged.apply_activity(&event))?;
        Ok(&self.last_events)
    }

    /// Open a loot box, paying its XP cost if it has one
    pub fn open_loot_box(&mut self, box_id: &str) -> Result<LootOpening, EngineError> {
        self.transact(|staged| staged.open_loot_box(box_id))
    }

    /// Pay out a battle prize if the active user won it and has not claimed
    /// it before. Returns `None` when there is nothing to claim.
    pub fn claim_battle_prize(&mut self, battle: &Battle) -> Result<Option<XpChange>, EngineError> {
        let now = self.clock.now();
        let Some(winner) = battle.winner(now) else {
            debug!(battle = %battle.id, "Battle has no winner yet");
            return Ok(None);
        };
        if winner.user_id != self.identity.id {
            return Ok(None);
        }
        if self.progress.claimed_battles.contains(&battle.id) {
            debug!(battle = %battle.id, "Battle prize already claimed");
            return Ok(None);
        }

        self.transact(|staged| {
            staged.progress.claimed_battles.push(battle.id.clone());
            let change = staged.add_xp(
                i64::from(battle.prize.xp),
                &format!("Won battle: {}", battle.topic),
            )?;
            if let Some(badge) = &battle.prize.badge {
                staged.unlock_badge(badge);
            }
            Ok(Some(change))
        })
    }

    // ========================================
    // QUERIES
    // ========================================

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// XP still needed to reach the next level
    pub fn next_level_xp(&self) -> u64 {
        self.progress.level_progress().xp_to_next()
    }

    pub fn level_progress(&self) -> LevelProgress {
        self.progress.level_progress()
    }

    /// Active quests of one cycle
    pub fn quests(&self, cycle: QuestCycle) -> &[Quest] {
        self.progress.quest_board.quests(cycle)
    }

    /// Quests whose progress reached the target but are not yet claimed
    pub fn claimable_quests(&self) -> Vec<&Quest> {
        let today = self.clock.today();
        self.progress
            .quest_board
            .iter()
            .filter(|q| q.is_claimable(today))
            .collect()
    }

    /// Events produced by the last successful operation
    pub fn last_events(&self) -> &[GamificationEvent] {
        &self.last_events
    }

    /// Take the pending toast notification, if any
    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Stage an operation on a copy, persist it, then commit
    fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut Staged) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut staged = Staged {
            progress: self.progress.clone(),
            events: Vec::new(),
            now: self.clock.now(),
            today: self.clock.today(),
        };
        let value = op(&mut staged)?;

        let Staged {
            progress, events, ..
        } = staged;
        if progress != self.progress {
            self.store.save(&self.identity, &progress)?;
            self.progress = progress;
        }
        self.notification = Notification::from_events(&events);
        self.last_events = events;
        Ok(value)
    }
}

/// Working copy of the progress record for one operation
struct Staged {
    progress: UserProgress,
    events: Vec<GamificationEvent>,
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl Staged {
    fn add_xp(&mut self, amount: i64, reason: &str) -> Result<XpChange, EngineError> {
        let change = self.progress.apply_xp(amount)?;
        self.events.push(GamificationEvent::XpAwarded {
            amount,
            reason: reason.to_string(),
        });

        if change.leveled_up {
            info!(
                old_level = change.previous_level,
                new_level = change.level,
                "Level up"
            );
            self.events.push(GamificationEvent::LevelUp(LevelUp {
                old_level: change.previous_level,
                new_level: change.level,
            }));
        }
        if let Some(id) = check_level_badge(&self.progress) {
            self.unlock(id);
        }
        Ok(change)
    }

    fn unlock(&mut self, id: BadgeId) -> Option<UnlockedBadge> {
        let Some(unlocked) = self.progress.grant_badge(id, self.now) else {
            debug!(badge = id.as_str(), "Badge already unlocked");
            return None;
        };
        info!(badge = id.as_str(), "Badge unlocked");
        self.events
            .push(GamificationEvent::BadgeUnlocked(unlocked.clone()));
        Some(unlocked)
    }

    fn unlock_badge(&mut self, badge_id: &str) -> Option<UnlockedBadge> {
        match BadgeId::from_str(badge_id) {
            Some(id) => self.unlock(id),
            None => {
                warn!(badge = badge_id, "Ignoring unknown badge id");
                None
            }
        }
    }

    fn update_streak(&mut self) -> StreakUpdate {
        let update = self.progress.record_active_day(self.today);
        self.events.push(GamificationEvent::Streak {
            change: update.change,
            count: update.streak,
        });

        // Streak quests mirror the streak rather than accumulate
        let today = self.today;
        for quest in self.progress.quest_board.iter_mut() {
            if quest.metric != Some(QuestMetric::DailyStreak) || quest.is_expired(today) {
                continue;
            }
            if quest.set_progress(update.streak) {
                self.events.push(GamificationEvent::QuestProgressed {
                    quest_id: quest.id.clone(),
                    current: quest.current,
                    target: quest.target,
                });
            }
        }

        if let Some(id) = check_streak_badge(&self.progress) {
            self.unlock(id);
        }
        update
    }

    fn advance(&mut self, metric: QuestMetric, amount: u32) {
        let today = self.today;
        for quest in self.progress.quest_board.iter_mut() {
            if quest.metric != Some(metric) || quest.is_expired(today) {
                continue;
            }
            if quest.advance(amount) {
                self.events.push(GamificationEvent::QuestProgressed {
                    quest_id: quest.id.clone(),
                    current: quest.current,
                    target: quest.target,
                });
            }
        }
    }

    fn check_milestones(&mut self) {
        for id in check_milestone_badges(&self.progress) {
            self.unlock(id);
        }
    }

    fn complete_quest(&mut self, quest_id: &str) -> Result<QuestCompletion, EngineError> {
        let today = self.today;
        let quest = self
            .progress
            .quest_board
            .find_mut(quest_id)
            .ok_or_else(|| EngineError::quest(quest_id, QuestBlock::Unknown))?;
        if quest.completed {
            return Err(EngineError::quest(quest_id, QuestBlock::AlreadyCompleted));
        }
        if quest.is_expired(today) {
            return Err(EngineError::quest(quest_id, QuestBlock::Expired));
        }

        quest.mark_completed();
        let quest = quest.clone();
        self.progress.record_quest_completion(&quest.id);
        info!(quest = %quest.id, "Quest completed");
        self.events.push(GamificationEvent::QuestCompleted {
            quest_id: quest.id.clone(),
        });

        let xp = self.add_xp(
            i64::from(quest.reward.xp),
            &format!("Completed quest: {}", quest.title),
        )?;
        let badge = quest.reward.badge.and_then(|id| self.unlock(id));
        let loot_box = match &quest.reward.loot_box {
            Some(box_id) if self.progress.add_loot_box(box_id) => {
                self.events.push(GamificationEvent::LootBoxUnlocked {
                    box_id: box_id.clone(),
                });
                Some(box_id.clone())
            }
            _ => None,
        };
        self.check_milestones();

        Ok(QuestCompletion {
            quest,
            xp,
            badge,
            loot_box,
        })
    }

    fn apply_activity(&mut self, event: &ActivityEvent) -> Result<(), EngineError> {
        match event {
            ActivityEvent::PostPublished { tags } => {
                self.progress.total_posts += 1;
                if tags.iter().any(|t| t.eq_ignore_ascii_case("space")) {
                    self.progress.space_posts += 1;
                }
                self.add_xp(i64::from(XpRewards::POST_PUBLISHED), "Published a post")?;
                self.update_streak();
                self.advance(QuestMetric::PostsPublished, 1);
            }
            ActivityEvent::PostLiked => {
                self.progress.likes_given += 1;
                self.add_xp(i64::from(XpRewards::POST_LIKED), "Liked a post")?;
                self.advance(QuestMetric::LikesGiven, 1);
            }
            ActivityEvent::LikeReceived => {
                self.progress.total_likes += 1;
            }
            ActivityEvent::CommentPosted => {
                self.progress.total_comments += 1;
                self.add_xp(i64::from(XpRewards::COMMENT_POSTED), "Posted a comment")?;
                self.update_streak();
                self.advance(QuestMetric::CommentsPosted, 1);
            }
            ActivityEvent::PostTrending => {
                self.progress.trending_posts += 1;
                self.add_xp(i64::from(XpRewards::POST_TRENDING), "Post is trending")?;
                self.advance(QuestMetric::TrendingPosts, 1);
            }
            ActivityEvent::BattleJoined => {
                self.progress.battles_joined += 1;
            }
            ActivityEvent::BattleVoted => {
                self.progress.votes_cast += 1;
            }
        }
        self.check_milestones();
        Ok(())
    }

    fn open_loot_box(&mut self, box_id: &str) -> Result<LootOpening, EngineError> {
        let loot = LootBox::find(box_id)
            .ok_or_else(|| EngineError::UnknownLootBox(box_id.to_string()))?;
        let awarded = self.progress.has_loot_box(box_id);
        if !loot.unlocked_by_default && !awarded {
            return Err(EngineError::LootBoxLocked(box_id.to_string()));
        }

        let spent = loot.cost.unwrap_or(0);
        if spent > 0 {
            self.add_xp(-i64::from(spent), &format!("Opened {}", loot.name))?;
        }
        if awarded {
            self.progress.take_loot_box(box_id);
        }

        let mut opening = LootOpening {
            box_id: box_id.to_string(),
            spent,
            xp_gained: 0,
            badges: Vec::new(),
            cosmetics: Vec::new(),
            xp: 0,
            level: 0,
        };
        for item in loot.contents {
            match item.content {
                LootContent::Xp(xp) => {
                    self.add_xp(i64::from(xp), "Loot box reward")?;
                    opening.xp_gained += xp;
                }
                LootContent::Badge(id) => {
                    if let Some(badge) = self.unlock_badge(id) {
                        opening.badges.push(badge);
                    }
                }
                LootContent::Theme(name) => {
                    self.collect(&mut opening, CosmeticKind::Theme, name);
                }
                LootContent::Avatar(name) => {
                    self.collect(&mut opening, CosmeticKind::Avatar, name);
                }
            }
        }
        info!(loot_box = box_id, xp = opening.xp_gained, "Loot box opened");

        opening.xp = self.progress.xp;
        opening.level = self.progress.level;
        Ok(opening)
    }

    fn collect(&mut self, opening: &mut LootOpening, kind: CosmeticKind, name: &str) {
        let cosmetic = Cosmetic {
            kind,
            name: name.to_string(),
        };
        if self.progress.add_cosmetic(cosmetic.clone()) {
            opening.cosmetics.push(cosmetic);
        }
    }

    fn regenerate(&mut self, cycle: QuestCycle) {
        let mut set = cycle.generate(self.today);
        if let Some(previous) = self.progress.quest_board.set(cycle) {
            set.carry_over(previous);
        }
        debug!(cycle = cycle.as_str(), key = %set.cycle_key, "Generated quests");
        self.events.push(GamificationEvent::QuestsRegenerated {
            cycle: cycle.as_str(),
            cycle_key: set.cycle_key.clone(),
        });
        self.progress.quest_board.replace(cycle, set);
    }
}
