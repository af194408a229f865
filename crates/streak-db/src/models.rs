//! Database row types — these map directly to SQLite rows.
//! Distinct from the streak-types API models to keep the DB layer
//! independent; fallible row-to-domain conversion lives here so string
//! parsing happens in exactly one place.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use streak_types::models::{Habit, Note};

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

pub struct HabitRow {
    pub id: String,
    pub owner_email: String,
    pub name: String,
    pub checkmarks: String,
    pub created_at: String,
}

pub struct NoteRow {
    pub id: String,
    pub local_key: i64,
    pub content: String,
    pub updated_at: String,
    pub owner_email: String,
    pub created_at: String,
}

impl HabitRow {
    pub fn into_habit(self) -> Result<Habit> {
        Ok(Habit {
            id: self
                .id
                .parse()
                .with_context(|| format!("corrupt habit id '{}'", self.id))?,
            owner_email: self.owner_email,
            name: self.name,
            checkmarks: serde_json::from_str(&self.checkmarks)
                .with_context(|| format!("corrupt checkmarks on habit '{}'", self.id))?,
            created_at: parse_timestamp(&self.created_at)
                .with_context(|| format!("corrupt created_at on habit '{}'", self.id))?,
        })
    }
}

impl NoteRow {
    pub fn into_note(self) -> Result<Note> {
        Ok(Note {
            id: self
                .id
                .parse()
                .with_context(|| format!("corrupt note id '{}'", self.id))?,
            local_key: self.local_key,
            content: self.content,
            updated_at: self.updated_at,
            owner_email: self.owner_email,
            created_at: parse_timestamp(&self.created_at)
                .with_context(|| format!("corrupt created_at on note '{}'", self.id))?,
        })
    }
}

/// Stored timestamp format: RFC 3339 UTC with fixed millisecond precision,
/// e.g. `2024-03-01T00:00:00.000Z`. Fixed width means lexicographic order
/// equals chronological order, which the range filter and descending sort
/// in SQL rely on.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_round_trip() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap();
        let s = format_timestamp(ts);
        assert_eq!(s, "2024-03-01T12:30:45.000Z");
        assert_eq!(parse_timestamp(&s).unwrap(), ts);
    }

    #[test]
    fn timestamp_order_is_lexicographic() {
        let earlier = format_timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 2).unwrap());
        let later = format_timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 10).unwrap());
        assert!(earlier < later);
    }
}
