use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::reflection::Reflection;
use crate::services::time_bucket::local_day;

/// Read side used by the analytics endpoints.
#[allow(async_fn_in_trait)]
pub trait EntryReader {
    /// All of a user's reflections, oldest first, optionally from `since` onward.
    async fn list_entries(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Reflection>>;
}

/// Write side, only used when recording a new reflection.
#[allow(async_fn_in_trait)]
pub trait EntryWriter {
    async fn count_entries(&self, user_id: Uuid, day: NaiveDate) -> AppResult<i64>;

    async fn insert_entry(&self, entry: &Reflection) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgReflectionStore {
    pool: PgPool,
}

impl PgReflectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl EntryReader for PgReflectionStore {
    async fn list_entries(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Reflection>> {
        let entries = sqlx::query_as::<_, Reflection>(
            r#"
            SELECT id, user_id, mood, note, occurred_at, created_at
            FROM reflections
            WHERE user_id = $1 AND ($2::timestamptz IS NULL OR occurred_at >= $2)
            ORDER BY occurred_at ASC
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

impl EntryWriter for PgReflectionStore {
    async fn count_entries(&self, user_id: Uuid, day: NaiveDate) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reflections WHERE user_id = $1 AND entry_date = $2",
        )
        .bind(user_id)
        .bind(day)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn insert_entry(&self, entry: &Reflection) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reflections (id, user_id, mood, note, occurred_at, entry_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.mood)
        .bind(&entry.note)
        .bind(entry.occurred_at)
        .bind(local_day(entry.occurred_at))
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            // (user_id, entry_date) is unique; another instance got there first
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("A reflection already exists for this day".into())
            }
            other => AppError::Database(other),
        })?;

        Ok(())
    }
}
