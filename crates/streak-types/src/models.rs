use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of checkmark slots allocated per habit. The array is sized for the
/// longest month and allocated once; shorter months display a prefix of it.
pub const DAYS_TRACKED: usize = 31;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// One tracked habit and its daily completion state for the month it was
/// created in. `checkmarks[0]` is calendar day 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: Uuid,
    pub owner_email: String,
    pub name: String,
    pub checkmarks: Vec<bool>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Number of days checked off.
    pub fn achieved(&self) -> usize {
        self.checkmarks.iter().filter(|c| **c).count()
    }
}

/// A free-text reflection note.
///
/// `id` is the storage identity; `local_key` is the client-assigned key
/// (creation time in milliseconds) that the dashboard re-renders against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub local_key: i64,
    pub content: String,
    /// Display-only formatted timestamp, recomputed by the client on every
    /// save. Not sortable.
    pub updated_at: String,
    pub owner_email: String,
    pub created_at: DateTime<Utc>,
}
