//! Builds the weekly summary and personal insight responses.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::models::reflection::Reflection;
use crate::services::insight::{
    mood_uplift, rotating_question, weekly_insight, MoodUplift, HIGH_DAY_THRESHOLD,
    LOW_DAY_THRESHOLD,
};
use crate::services::mood::{aggregate, Emotion, MoodLabel};
use crate::services::streak::streak_stats;
use crate::services::time_bucket::{local_day, week_window, DAY_LABELS, DAY_LABELS_UPPER};

pub const NEUTRAL_COLOR: &str = "#6D5D8B";
pub const LOW_COLOR: &str = "#C9A24D";

/// Percent shown for a day without entries.
const EMPTY_DAY_PERCENT: u32 = 50;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMood {
    pub day: &'static str,
    pub average_mood: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub days: Vec<DayMood>,
    pub date_range: String,
    pub mood_label: MoodLabel,
    pub top_emotion: Emotion,
    pub entry_count: usize,
    pub streak_days: u32,
    pub longest_streak: u32,
    pub insight_text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDistribution {
    pub day: &'static str,
    pub value: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInsights {
    pub mood_distribution: Vec<DayDistribution>,
    pub mood_uplift: MoodUplift,
    pub ai_insight: String,
}

/// "Feb 9 — Feb 15" for the week starting on `monday`.
pub fn date_range_label(monday: NaiveDate) -> String {
    let sunday = monday + Duration::days(6);
    format!("{} — {}", monday.format("%b %-d"), sunday.format("%b %-d"))
}

/// `history` should cover the current week and as much of the past as the
/// streak needs; entries outside the week only feed the streak.
pub fn weekly_summary(history: &[Reflection], now: DateTime<Utc>) -> WeeklySummary {
    let (start, end) = week_window(now);
    let week = aggregate(history, start, end);
    let label = week.mood_label();
    let streaks = streak_stats(history, local_day(now));

    let days = DAY_LABELS_UPPER
        .into_iter()
        .zip(week.daily_averages())
        .map(|(day, average_mood)| DayMood { day, average_mood })
        .collect();

    WeeklySummary {
        days,
        date_range: date_range_label(local_day(start)),
        mood_label: label,
        top_emotion: week.top_emotion(),
        entry_count: week.entry_count,
        streak_days: streaks.current,
        longest_streak: streaks.longest,
        insight_text: weekly_insight(week.entry_count, label).to_string(),
    }
}

pub fn personal_insights(entries: &[Reflection], now: DateTime<Utc>) -> PersonalInsights {
    let (start, end) = week_window(now);
    let week = aggregate(entries, start, end);

    let mut high_days = 0u32;
    let mut low_days = 0u32;
    let mut mood_distribution = Vec::with_capacity(7);

    for (day, bucket) in DAY_LABELS.into_iter().zip(week.days.iter()) {
        let mut value = EMPTY_DAY_PERCENT;
        let mut color = NEUTRAL_COLOR;

        if let Some(avg) = bucket.mean() {
            value = (avg / 5.0 * 100.0).round() as u32;
            if avg <= LOW_DAY_THRESHOLD {
                color = LOW_COLOR;
                low_days += 1;
            } else if avg >= HIGH_DAY_THRESHOLD {
                high_days += 1;
            }
        }

        mood_distribution.push(DayDistribution { day, value, color });
    }

    PersonalInsights {
        mood_distribution,
        mood_uplift: mood_uplift(week.entry_count, high_days, low_days),
        ai_insight: rotating_question(week.entry_count).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::insight::{ONBOARDING_INSIGHT, ONBOARDING_QUESTION};
    use crate::services::test_support::{at, reflection};

    // Wednesday 2026-02-11, week of Mon 9 .. Sun 15
    fn now() -> DateTime<Utc> {
        at(2026, 2, 11, 14)
    }

    #[test]
    fn test_date_range_label() {
        let monday = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
        assert_eq!(date_range_label(monday), "Feb 9 — Feb 15");
    }

    #[test]
    fn test_date_range_label_across_months() {
        let monday = NaiveDate::from_ymd_opt(2026, 3, 30).unwrap();
        assert_eq!(date_range_label(monday), "Mar 30 — Apr 5");
    }

    #[test]
    fn test_weekly_summary_two_days() {
        let entries = vec![
            reflection(5, at(2026, 2, 9, 10)),
            reflection(1, at(2026, 2, 10, 10)),
        ];
        let summary = weekly_summary(&entries, now());

        let averages: Vec<f64> = summary.days.iter().map(|d| d.average_mood).collect();
        assert_eq!(averages, vec![5.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(summary.days[0].day, "MON");
        assert_eq!(summary.days[6].day, "SUN");
        assert_eq!(summary.mood_label, MoodLabel::Neutral);
        assert_eq!(summary.entry_count, 2);
        assert_eq!(summary.date_range, "Feb 9 — Feb 15");
        // Nothing yet today, Tue and Mon still count
        assert_eq!(summary.streak_days, 2);
        assert_eq!(summary.insight_text, weekly_insight(2, MoodLabel::Neutral));
    }

    #[test]
    fn test_weekly_summary_empty() {
        let summary = weekly_summary(&[], now());
        assert_eq!(summary.days.len(), 7);
        assert!(summary.days.iter().all(|d| d.average_mood == 0.0));
        assert_eq!(summary.mood_label, MoodLabel::Neutral);
        assert_eq!(summary.top_emotion, Emotion::Neutral);
        assert_eq!(summary.streak_days, 0);
        assert_eq!(summary.insight_text, ONBOARDING_INSIGHT);
    }

    #[test]
    fn test_weekly_summary_streak_uses_history_outside_week() {
        // Sun 8 (last week), Mon 9, Tue 10, Wed 11
        let entries = vec![
            reflection(4, at(2026, 2, 8, 10)),
            reflection(4, at(2026, 2, 9, 10)),
            reflection(5, at(2026, 2, 10, 10)),
            reflection(4, at(2026, 2, 11, 9)),
        ];
        let summary = weekly_summary(&entries, now());
        assert_eq!(summary.entry_count, 3);
        assert_eq!(summary.streak_days, 4);
        assert_eq!(summary.longest_streak, 4);
        assert_eq!(summary.mood_label, MoodLabel::Positive);
        assert_eq!(summary.top_emotion, Emotion::Calm);
    }

    #[test]
    fn test_weekly_summary_serializes_camel_case() {
        let summary = weekly_summary(&[reflection(4, at(2026, 2, 11, 9))], now());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["moodLabel"], "Positive");
        assert_eq!(json["topEmotion"], "Calm");
        assert_eq!(json["streakDays"], 1);
        assert_eq!(json["days"][2]["averageMood"], 4.0);
    }

    #[test]
    fn test_personal_insights_empty_week() {
        let insights = personal_insights(&[], now());
        assert_eq!(insights.mood_distribution.len(), 7);
        for day in &insights.mood_distribution {
            assert_eq!(day.value, 50);
            assert_eq!(day.color, NEUTRAL_COLOR);
        }
        assert_eq!(insights.mood_uplift.value, "0%");
        assert_eq!(insights.ai_insight, ONBOARDING_QUESTION);
    }

    #[test]
    fn test_personal_insights_distribution_and_trend() {
        let entries = vec![
            reflection(5, at(2026, 2, 9, 10)),
            reflection(4, at(2026, 2, 10, 10)),
            reflection(5, at(2026, 2, 10, 20)),
            reflection(2, at(2026, 2, 11, 10)),
        ];
        let insights = personal_insights(&entries, now());
        let d = &insights.mood_distribution;

        assert_eq!(d[0].day, "Mon");
        assert_eq!(d[0].value, 100);
        assert_eq!(d[1].value, 90);
        assert_eq!(d[2].value, 40);
        assert_eq!(d[2].color, LOW_COLOR);
        assert_eq!(d[3].value, 50);

        // Two high days vs one low day
        assert_eq!(insights.mood_uplift.value, "+24%");
        assert_eq!(insights.mood_uplift.title, "Positive trend detected");
        // 4 entries -> question index 4
        assert_eq!(insights.ai_insight, rotating_question(4));
    }

    #[test]
    fn test_personal_insights_low_boundary_is_inclusive() {
        let entries = vec![
            reflection(2, at(2026, 2, 9, 10)),
            reflection(3, at(2026, 2, 9, 11)),
        ];
        let insights = personal_insights(&entries, now());
        assert_eq!(insights.mood_distribution[0].value, 50);
        assert_eq!(insights.mood_distribution[0].color, LOW_COLOR);
    }

    #[test]
    fn test_personal_insights_self_care() {
        let entries = vec![
            reflection(1, at(2026, 2, 9, 10)),
            reflection(2, at(2026, 2, 10, 10)),
            reflection(2, at(2026, 2, 11, 10)),
        ];
        let insights = personal_insights(&entries, now());
        assert_eq!(insights.mood_uplift.value, "3 days");
    }
}
