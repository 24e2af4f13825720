//! Per-day mood aggregation over a time window.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::reflection::{Reflection, MAX_MOOD, MIN_MOOD};
use crate::services::time_bucket::day_index;

/// Week-level mood, derived from the mean of the non-empty days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoodLabel {
    Positive,
    Neutral,
    Low,
}

impl MoodLabel {
    /// `None` means there was nothing to average and falls back to `Neutral`.
    pub fn from_average(avg: Option<f64>) -> Self {
        match avg {
            Some(avg) if avg >= 4.0 => MoodLabel::Positive,
            Some(avg) if avg >= 3.0 => MoodLabel::Neutral,
            Some(_) => MoodLabel::Low,
            None => MoodLabel::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Emotion {
    Sad,
    Pensive,
    Neutral,
    Calm,
    Radiant,
}

/// Emotion name for each mood value, indexed by `mood - 1`.
const EMOTIONS: [Emotion; 5] = [
    Emotion::Sad,
    Emotion::Pensive,
    Emotion::Neutral,
    Emotion::Calm,
    Emotion::Radiant,
];

impl Emotion {
    pub fn for_mood(mood: i32) -> Option<Self> {
        if !(MIN_MOOD..=MAX_MOOD).contains(&mood) {
            return None;
        }
        EMOTIONS.get((mood - MIN_MOOD) as usize).copied()
    }
}

/// Rounds to one decimal place, halves away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayBucket {
    pub count: u32,
    pub sum: i64,
}

impl DayBucket {
    pub fn push(&mut self, mood: i32) {
        self.count += 1;
        self.sum += mood as i64;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Unrounded mean, `None` for an empty day.
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.sum as f64 / self.count as f64)
        }
    }

    /// Mean rounded to one decimal, 0 for an empty day.
    pub fn average(&self) -> f64 {
        self.mean().map(round_to_tenth).unwrap_or(0.0)
    }
}

/// Count of entries per mood value, remembering the order values first appeared.
#[derive(Debug, Clone, Default)]
pub struct MoodHistogram {
    counts: [u32; 5],
    first_seen: Vec<i32>,
}

impl MoodHistogram {
    pub fn record(&mut self, mood: i32) {
        if !(MIN_MOOD..=MAX_MOOD).contains(&mood) {
            return;
        }
        let slot = (mood - MIN_MOOD) as usize;
        if self.counts[slot] == 0 {
            self.first_seen.push(mood);
        }
        self.counts[slot] += 1;
    }

    pub fn count(&self, mood: i32) -> u32 {
        if !(MIN_MOOD..=MAX_MOOD).contains(&mood) {
            return 0;
        }
        self.counts[(mood - MIN_MOOD) as usize]
    }

    /// Most frequent mood. Ties go to the value that was recorded first.
    pub fn most_frequent(&self) -> Option<i32> {
        let mut best: Option<(i32, u32)> = None;
        for &mood in &self.first_seen {
            let count = self.count(mood);
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((mood, count)),
            }
        }
        best.map(|(mood, _)| mood)
    }
}

/// Entries of one window grouped into Monday-first day buckets.
#[derive(Debug, Clone, Default)]
pub struct WeekAggregate {
    pub days: [DayBucket; 7],
    pub entry_count: usize,
    pub histogram: MoodHistogram,
}

impl WeekAggregate {
    /// Rounded per-day averages, Monday first. Empty days are 0.
    pub fn daily_averages(&self) -> [f64; 7] {
        self.days.map(|d| d.average())
    }

    /// Mean of the rounded averages of the days that have entries.
    ///
    /// Each day counts once no matter how many entries it holds.
    pub fn mean_of_days(&self) -> Option<f64> {
        let averages: Vec<f64> = self
            .days
            .iter()
            .filter(|d| !d.is_empty())
            .map(|d| d.average())
            .collect();
        if averages.is_empty() {
            return None;
        }
        Some(averages.iter().sum::<f64>() / averages.len() as f64)
    }

    pub fn mood_label(&self) -> MoodLabel {
        MoodLabel::from_average(self.mean_of_days())
    }

    pub fn top_emotion(&self) -> Emotion {
        self.histogram
            .most_frequent()
            .and_then(Emotion::for_mood)
            .unwrap_or(Emotion::Neutral)
    }
}

/// Buckets the entries that fall inside `[start, end)` by weekday.
pub fn aggregate(entries: &[Reflection], start: DateTime<Utc>, end: DateTime<Utc>) -> WeekAggregate {
    let mut week = WeekAggregate::default();

    for entry in entries
        .iter()
        .filter(|e| e.occurred_at >= start && e.occurred_at < end)
    {
        week.days[day_index(entry.occurred_at)].push(entry.mood);
        week.histogram.record(entry.mood);
        week.entry_count += 1;
    }

    week
}
