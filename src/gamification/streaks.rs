//! Streak tracking system
//!
//! Tracks consecutive calendar days with qualifying activity.

use chrono::NaiveDate;

/// Streak length that unlocks `streak-master`
pub const STREAK_MASTER_DAYS: u32 = 7;

/// What recording an active day did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// Activity continued yesterday's streak
    Extended,
    /// First activity, or the previous streak was broken
    Started,
    /// Today was already recorded
    Unchanged,
}

/// Result of recording an active day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub change: StreakChange,
    pub streak: u32,
}

/// Compute the streak after activity on `today`.
///
/// Continuation is decided on calendar days, not elapsed time.
pub fn next_streak(current: u32, last_active: Option<NaiveDate>, today: NaiveDate) -> StreakUpdate {
    let yesterday = today.pred_opt();

    if last_active.is_some() && last_active == yesterday {
        StreakUpdate {
            change: StreakChange::Extended,
            streak: current.saturating_add(1),
        }
    } else if last_active != Some(today) {
        StreakUpdate {
            change: StreakChange::Started,
            streak: 1,
        }
    } else {
        StreakUpdate {
            change: StreakChange::Unchanged,
            streak: current,
        }
    }
}

/// Whether a streak last touched on `last_active` can still be extended
/// (activity today or yesterday)
pub fn is_active(last_active: Option<NaiveDate>, today: NaiveDate) -> bool {
    let Some(last) = last_active else {
        return false;
    };
    let days_since = (today - last).num_days();
    (0..=1).contains(&days_since)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_consecutive_day_extends() {
        let update = next_streak(4, Some(day(10)), day(11));
        assert_eq!(update.change, StreakChange::Extended);
        assert_eq!(update.streak, 5);
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let update = next_streak(4, Some(day(11)), day(11));
        assert_eq!(update.change, StreakChange::Unchanged);
        assert_eq!(update.streak, 4);
    }

    #[test]
    fn test_gap_resets_to_one() {
        let update = next_streak(5, Some(day(10)), day(15));
        assert_eq!(update.change, StreakChange::Started);
        assert_eq!(update.streak, 1);
    }

    #[test]
    fn test_first_activity_starts_at_one() {
        let update = next_streak(0, None, day(1));
        assert_eq!(update.streak, 1);
    }

    #[test]
    fn test_is_active() {
        assert!(is_active(Some(day(10)), day(10)));
        assert!(is_active(Some(day(10)), day(11)));
        assert!(!is_active(Some(day(10)), day(12)));
        assert!(!is_active(None, day(12)));
    }
}
