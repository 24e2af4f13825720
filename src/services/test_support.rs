use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::models::reflection::Reflection;

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn reflection(mood: i32, occurred_at: DateTime<Utc>) -> Reflection {
    Reflection {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        mood,
        note: String::new(),
        occurred_at,
        created_at: occurred_at,
    }
}
