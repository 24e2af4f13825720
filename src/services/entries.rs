//! Recording new reflections: validation, the one-per-day rule and the
//! per-user critical section around "check then insert".

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;
use validator::Validate;

use crate::db::reflections::EntryWriter;
use crate::error::{AppError, AppResult};
use crate::models::reflection::{CreateReflectionRequest, Reflection};
use crate::services::time_bucket::local_day;

/// One mutex per user, created on first use.
///
/// Creates for the same user run one at a time; different users never wait
/// on each other.
#[derive(Clone, Default)]
pub struct EntryLocks {
    slots: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl EntryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user_id: Uuid) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(user_id).or_default().clone()
        };
        slot.lock_owned().await
    }

    /// Drops slots nobody is holding or waiting on. Returns how many were removed.
    pub async fn prune(&self) -> usize {
        let mut slots = self.slots.lock().await;
        let before = slots.len();
        slots.retain(|_, slot| Arc::strong_count(slot) > 1);
        before - slots.len()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }
}

/// Validates and stores a reflection for `user_id`.
///
/// Fails with `Validation` before touching storage, and with `Conflict` if
/// the user already has a reflection on that calendar day.
pub async fn record_entry<W: EntryWriter>(
    writer: &W,
    locks: &EntryLocks,
    user_id: Uuid,
    body: CreateReflectionRequest,
    now: DateTime<Utc>,
) -> AppResult<Reflection> {
    body.validate()?;

    let occurred_at = body.occurred_at.unwrap_or(now);
    let day = local_day(occurred_at);
    if (day - local_day(now)).num_days().abs() > 1 {
        return Err(AppError::Validation(
            "occurredAt must be within ±1 day of today".into(),
        ));
    }

    let _guard = locks.acquire(user_id).await;

    if writer.count_entries(user_id, day).await? > 0 {
        tracing::warn!(user_id = %user_id, day = %day, "Duplicate reflection rejected");
        return Err(AppError::Conflict(
            "A reflection already exists for this day".into(),
        ));
    }

    let entry = Reflection {
        id: Uuid::new_v4(),
        user_id,
        mood: body.mood,
        note: body.note,
        occurred_at,
        created_at: now,
    };
    writer.insert_entry(&entry).await?;

    tracing::info!(user_id = %user_id, day = %day, mood = entry.mood, "Reflection recorded");
    Ok(entry)
}
