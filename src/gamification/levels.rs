//! XP and Level system
//!
//! Levels are a pure function of XP: every 100 XP is one level.

/// XP span of a single level
pub const XP_PER_LEVEL: u64 = 100;

/// Largest balance whose level still fits in a `u32`
pub const MAX_XP: u64 = u32::MAX as u64 * XP_PER_LEVEL - 1;

/// Level that unlocks the `legendary-writer` badge
pub const LEGENDARY_LEVEL: u32 = 10;

/// Level reached with the given XP: `floor(xp / 100) + 1`.
/// Exact up to [`MAX_XP`]; larger values clamp to `u32::MAX`.
pub fn level_for_xp(xp: u64) -> u32 {
    u32::try_from(xp / XP_PER_LEVEL)
        .map(|l| l.saturating_add(1))
        .unwrap_or(u32::MAX)
}

/// XP at which the given level starts
pub fn xp_for_level(level: u32) -> u64 {
    u64::from(level.saturating_sub(1)) * XP_PER_LEVEL
}

/// Level snapshot for display (progress bar, "XP to next level")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelProgress {
    pub total_xp: u64,
    pub level: u32,
    /// XP at which the current level started
    pub current_level_xp: u64,
    /// XP at which the next level starts
    pub next_level_xp: u64,
}

impl LevelProgress {
    pub fn new(total_xp: u64) -> Self {
        let level = level_for_xp(total_xp);
        Self {
            total_xp,
            level,
            current_level_xp: xp_for_level(level),
            next_level_xp: xp_for_level(level.saturating_add(1)),
        }
    }

    /// XP still missing to reach the next level
    pub fn xp_to_next(&self) -> u64 {
        self.next_level_xp.saturating_sub(self.total_xp)
    }

    /// XP earned inside the current level
    pub fn xp_in_level(&self) -> u64 {
        self.total_xp - self.current_level_xp
    }

    /// Progress to next level (0.0 - 1.0)
    pub fn progress_to_next(&self) -> f32 {
        let span = self.next_level_xp - self.current_level_xp;
        if span == 0 {
            1.0
        } else {
            self.xp_in_level() as f32 / span as f32
        }
    }
}

/// XP rewards for blogging activity
pub struct XpRewards;

impl XpRewards {
    pub const POST_PUBLISHED: u32 = 25;
    pub const POST_LIKED: u32 = 1;
    pub const COMMENT_POSTED: u32 = 5;
    pub const POST_TRENDING: u32 = 50;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_xp() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(110), 2);
        assert_eq!(level_for_xp(900), 10);
        assert_eq!(level_for_xp(2450), 25);
        assert_eq!(level_for_xp(MAX_XP), u32::MAX);
        assert_eq!(level_for_xp(MAX_XP - XP_PER_LEVEL), u32::MAX - 1);
    }

    #[test]
    fn test_xp_for_level_inverts_level_for_xp() {
        for level in 1..50 {
            assert_eq!(level_for_xp(xp_for_level(level)), level);
            assert_eq!(level_for_xp(xp_for_level(level + 1) - 1), level);
        }
    }

    #[test]
    fn test_level_progress() {
        let progress = LevelProgress::new(175);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.xp_in_level(), 75);
        assert_eq!(progress.xp_to_next(), 25);
        assert!((progress.progress_to_next() - 0.75).abs() < 0.001);
    }
}
