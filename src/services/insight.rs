//! Fixed-text insights picked from aggregate mood statistics.
//!
//! No model is involved: each function selects one entry from a static table
//! using simple, ordered rules.

use serde::Serialize;

use crate::services::mood::MoodLabel;

pub const ONBOARDING_INSIGHT: &str =
    "Start journaling to unlock personalized insights about your emotional patterns.";

/// Paragraph per week label. Anything not listed gets `LOW_WEEK_INSIGHT`.
const WEEKLY_INSIGHTS: [(MoodLabel, &str); 2] = [
    (
        MoodLabel::Positive,
        "You had a great week! Your reflections show a positive emotional trend. Keep up the good habits that contribute to your wellbeing.",
    ),
    (
        MoodLabel::Neutral,
        "Your week was balanced. Notice what activities or thoughts bring you closer to feeling calm and content.",
    ),
];

const LOW_WEEK_INSIGHT: &str = "This week had its challenges. Remember that acknowledging difficult emotions is the first step to understanding them. Consider what small changes might support your wellbeing.";

pub const ONBOARDING_QUESTION: &str = "What would help you feel more balanced today?";

const QUESTIONS: [&str; 5] = [
    "Do these patterns resonate with you today?",
    "What small change could improve your mood this week?",
    "Have you noticed what triggers your best days?",
    "What patterns do you see in your reflections?",
    "How can you build on your positive moments?",
];

/// A day with an average at or above this is a high day.
pub const HIGH_DAY_THRESHOLD: f64 = 4.0;
/// A day with an average at or below this is a low day.
pub const LOW_DAY_THRESHOLD: f64 = 2.5;

/// Short motivational card shown next to the mood distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodUplift {
    pub value: String,
    pub title: String,
    pub description: String,
}

impl MoodUplift {
    fn new(value: impl Into<String>, title: &str, description: &str) -> Self {
        Self {
            value: value.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

pub fn weekly_insight(entry_count: usize, label: MoodLabel) -> &'static str {
    if entry_count == 0 {
        return ONBOARDING_INSIGHT;
    }
    WEEKLY_INSIGHTS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, text)| *text)
        .unwrap_or(LOW_WEEK_INSIGHT)
}

/// First matching rule wins.
pub fn mood_uplift(entry_count: usize, high_days: u32, low_days: u32) -> MoodUplift {
    if entry_count == 0 {
        return MoodUplift::new(
            "0%",
            "Start tracking to see insights",
            "Log a few reflections to unlock personalized mood insights and patterns.",
        );
    }

    if high_days > low_days && high_days >= 2 {
        return MoodUplift::new(
            format!("+{}%", high_days * 12),
            "Positive trend detected",
            "Your mood has been consistently higher on days with more activity. Keep building on these positive patterns.",
        );
    }

    if low_days >= 3 {
        return MoodUplift::new(
            format!("{} days", low_days),
            "Time for self-care",
            "You've had several challenging days. Consider activities that usually lift your mood.",
        );
    }

    // Static figure, not derived from the data.
    MoodUplift::new(
        "+24%",
        "Exercise correlates with higher mood",
        "On days you logged physical activity, your baseline mood was significantly higher than inactive days.",
    )
}

pub fn rotating_question(entry_count: usize) -> &'static str {
    if entry_count == 0 {
        return ONBOARDING_QUESTION;
    }
    QUESTIONS[entry_count % QUESTIONS.len()]
}
