//! Consecutive-day streaks over a user's reflection history.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::models::reflection::Reflection;
use crate::services::time_bucket::local_day;

/// How far back the current streak is allowed to reach.
pub const MAX_STREAK_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakStats {
    pub current: u32,
    pub longest: u32,
}

/// Distinct calendar days that have at least one reflection.
pub fn entry_days(entries: &[Reflection]) -> BTreeSet<NaiveDate> {
    entries.iter().map(|e| local_day(e.occurred_at)).collect()
}

/// Counts days with a reflection walking back from `today`.
///
/// A missing `today` does not end the walk, it just isn't counted: someone
/// who wrote yesterday and the day before still has a streak of 2 before
/// writing today. Any later gap ends it.
pub fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0u32;

    for offset in 0..MAX_STREAK_DAYS {
        let check_date = today - Duration::days(offset);
        if days.contains(&check_date) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }

    streak
}

/// Longest run of consecutive days anywhere in `days`.
pub fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0u32;
    let mut streak = 0u32;
    let mut prev_date: Option<NaiveDate> = None;

    for date in days {
        streak = match prev_date {
            Some(prev) if *date == prev + Duration::days(1) => streak + 1,
            _ => 1,
        };
        longest = longest.max(streak);
        prev_date = Some(*date);
    }

    longest
}

pub fn streak_stats(entries: &[Reflection], today: NaiveDate) -> StreakStats {
    let days = entry_days(entries);
    StreakStats {
        current: current_streak(&days, today),
        longest: longest_streak(&days),
    }
}
