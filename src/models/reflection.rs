use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const MIN_MOOD: i32 = 1;
pub const MAX_MOOD: i32 = 5;

/// One user's mood + note for a single day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood: i32,
    pub note: String,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReflectionRequest {
    #[validate(range(min = 1, max = 5, message = "Mood must be between 1 and 5"))]
    pub mood: i32,

    #[serde(default)]
    #[validate(length(max = 500, message = "Note must be 500 characters or less"))]
    pub note: String,

    /// Defaults to the time of the request.
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ReflectionQuery {
    pub since: Option<DateTime<Utc>>,
}
