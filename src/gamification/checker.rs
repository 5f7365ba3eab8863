//! Badge checking logic
//!
//! Decides which catalog badges a progress record has earned but does not
//! hold yet.

use super::badges::BadgeId;
use super::levels::LEGENDARY_LEVEL;
use super::progress::UserProgress;
use super::streaks::STREAK_MASTER_DAYS;

/// Check counter-based badges (posts, likes, trending, quests, comments)
pub fn check_milestone_badges(progress: &UserProgress) -> Vec<BadgeId> {
    let milestones = [
        (progress.total_posts, 1, BadgeId::FirstPost),
        (progress.trending_posts, 1, BadgeId::Trendsetter),
        (progress.total_likes, 100, BadgeId::SocialButterfly),
        (progress.space_posts, 5, BadgeId::SpaceExplorer),
        (progress.quests_completed, 50, BadgeId::QuestMaster),
        (progress.total_comments, 100, BadgeId::CommunityHero),
    ];

    milestones
        .into_iter()
        .filter(|(count, threshold, id)| count >= threshold && !progress.has_badge(*id))
        .map(|(_, _, id)| id)
        .collect()
}

/// Check the streak badge
pub fn check_streak_badge(progress: &UserProgress) -> Option<BadgeId> {
    (progress.streak >= STREAK_MASTER_DAYS && !progress.has_badge(BadgeId::StreakMaster))
        .then_some(BadgeId::StreakMaster)
}

/// Check the level badge
pub fn check_level_badge(progress: &UserProgress) -> Option<BadgeId> {
    (progress.level >= LEGENDARY_LEVEL && !progress.has_badge(BadgeId::LegendaryWriter))
        .then_some(BadgeId::LegendaryWriter)
}
