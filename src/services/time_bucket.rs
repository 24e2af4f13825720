//! Day and week arithmetic for reflections.
//!
//! Everything here works on UTC calendar days: a reflection belongs to the
//! day its `occurred_at` falls on, and weeks start on Monday at 00:00.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

/// Short labels used by the weekly summary, Monday first.
pub const DAY_LABELS_UPPER: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

/// Labels used by the mood distribution card, Monday first.
pub const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Calendar day a timestamp belongs to.
pub fn local_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Midnight at the start of `day`.
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::default()).and_utc()
}

/// Monday of the week containing `date`.
pub fn find_monday(date: NaiveDate) -> NaiveDate {
    // ISO numbering: Monday = 1 .. Sunday = 7
    let weekday = date.weekday().number_from_monday() as i64;
    date - Duration::days(weekday - 1)
}

/// Returns `[start, end)` for the week containing `now`.
///
/// `start` is the most recent Monday at 00:00 (today if `now` is a Monday),
/// `end` is exactly seven days later.
pub fn week_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_day(find_monday(local_day(now)));
    (start, start + Duration::days(7))
}

/// Maps a timestamp to its weekday slot, Monday = 0 .. Sunday = 6.
pub fn day_index(ts: DateTime<Utc>) -> usize {
    let index = local_day(ts).weekday().num_days_from_sunday() as i32 - 1;
    // Sunday comes out as -1 under Sunday-first numbering
    if index < 0 {
        6
    } else {
        index as usize
    }
}
