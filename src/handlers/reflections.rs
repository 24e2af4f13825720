use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Duration, Utc};

use crate::auth::middleware::AuthUser;
use crate::db::reflections::EntryReader;
use crate::error::AppResult;
use crate::models::reflection::{CreateReflectionRequest, Reflection, ReflectionQuery};
use crate::services::{
    entries::record_entry,
    streak::MAX_STREAK_DAYS,
    summary::{self, PersonalInsights, WeeklySummary},
    time_bucket::{local_day, start_of_day, week_window},
};
use crate::AppState;

pub async fn create_reflection(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateReflectionRequest>,
) -> AppResult<Json<Reflection>> {
    let entry = record_entry(
        &state.store,
        &state.entry_locks,
        auth_user.id,
        body,
        Utc::now(),
    )
    .await?;

    Ok(Json(entry))
}

pub async fn list_reflections(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ReflectionQuery>,
) -> AppResult<Json<Vec<Reflection>>> {
    let since = query
        .since
        .unwrap_or_else(|| Utc::now() - Duration::days(30));

    let entries = state.store.list_entries(auth_user.id, Some(since)).await?;
    Ok(Json(entries))
}

pub async fn weekly_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<WeeklySummary>> {
    let now = Utc::now();
    // Enough history for the longest possible streak; always covers this week
    let since = start_of_day(local_day(now) - Duration::days(MAX_STREAK_DAYS - 1));

    let history = state.store.list_entries(auth_user.id, Some(since)).await?;
    tracing::debug!(user_id = %auth_user.id, entries = history.len(), "Building weekly summary");

    Ok(Json(summary::weekly_summary(&history, now)))
}

pub async fn personal_insights(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<PersonalInsights>> {
    let now = Utc::now();
    let (week_start, _) = week_window(now);

    let entries = state.store.list_entries(auth_user.id, Some(week_start)).await?;

    Ok(Json(summary::personal_insights(&entries, now)))
}
