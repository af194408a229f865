use crate::Database;
use crate::models::{HabitRow, NoteRow, UserRow, format_timestamp};
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use streak_types::models::{Habit, Note};

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        name: &str,
        email: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, email, password, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, name, email, password_hash, format_timestamp(created_at)],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .prepare("SELECT id, name, email, password, created_at FROM users WHERE email = ?1")?
                .query_row([email], |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        password: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    // -- Habits --

    pub fn insert_habit(&self, habit: &Habit) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO habits (id, owner_email, name, checkmarks, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    habit.id.to_string(),
                    habit.owner_email,
                    habit.name,
                    serde_json::to_string(&habit.checkmarks)?,
                    format_timestamp(habit.created_at),
                ],
            )?;
            Ok(())
        })
    }

    /// Habits owned by `owner_email` created within `[start, end)`, newest
    /// first. Callers pass the first instant of the displayed month and the
    /// first instant of the next one.
    pub fn list_habits_in_range(
        &self,
        owner_email: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Habit>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner_email, name, checkmarks, created_at
                 FROM habits
                 WHERE owner_email = ?1 AND created_at >= ?2 AND created_at < ?3
                 ORDER BY created_at DESC",
            )?;

            let rows = stmt
                .query_map(
                    rusqlite::params![owner_email, format_timestamp(start), format_timestamp(end)],
                    habit_row,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(HabitRow::into_habit).collect()
        })
    }

    pub fn get_habit(&self, id: &str) -> Result<Option<Habit>> {
        self.with_conn(|conn| match query_habit(conn, id)? {
            Some(row) => Ok(Some(row.into_habit()?)),
            None => Ok(None),
        })
    }

    /// Flip one checkmark slot and return the updated habit, or `None` when
    /// the habit does not exist. The read and the write happen inside a
    /// single `with_conn` closure, so concurrent toggles on the same habit
    /// serialize instead of overwriting each other's array.
    pub fn toggle_checkmark(&self, id: &str, day_index: usize) -> Result<Option<Habit>> {
        self.with_conn(|conn| {
            let Some(row) = query_habit(conn, id)? else {
                return Ok(None);
            };
            let mut habit = row.into_habit()?;

            if day_index >= habit.checkmarks.len() {
                bail!(
                    "day index {} out of range for habit '{}'",
                    day_index,
                    habit.id
                );
            }
            habit.checkmarks[day_index] = !habit.checkmarks[day_index];

            conn.execute(
                "UPDATE habits SET checkmarks = ?1 WHERE id = ?2",
                rusqlite::params![serde_json::to_string(&habit.checkmarks)?, id],
            )?;

            Ok(Some(habit))
        })
    }

    /// Returns true when a row was actually removed.
    pub fn delete_habit(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM habits WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }

    // -- Notes --

    pub fn insert_note(&self, note: &Note) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notes (id, local_key, content, updated_at, owner_email, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    note.id.to_string(),
                    note.local_key,
                    note.content,
                    note.updated_at,
                    note.owner_email,
                    format_timestamp(note.created_at),
                ],
            )?;
            Ok(())
        })
    }

    pub fn list_notes(&self, owner_email: &str) -> Result<Vec<Note>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, local_key, content, updated_at, owner_email, created_at
                 FROM notes
                 WHERE owner_email = ?1",
            )?;

            let rows = stmt
                .query_map([owner_email], note_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(NoteRow::into_note).collect()
        })
    }

    pub fn get_note(&self, id: &str) -> Result<Option<Note>> {
        self.with_conn(|conn| match query_note(conn, id)? {
            Some(row) => Ok(Some(row.into_note()?)),
            None => Ok(None),
        })
    }

    /// Replace content and the display timestamp; every other field is
    /// immutable across update. Returns the updated note, or `None` when the
    /// id does not resolve (no record is created in that case).
    pub fn update_note(&self, id: &str, content: &str, updated_at: &str) -> Result<Option<Note>> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE notes SET content = ?1, updated_at = ?2 WHERE id = ?3",
                rusqlite::params![content, updated_at, id],
            )?;
            if n == 0 {
                return Ok(None);
            }
            match query_note(conn, id)? {
                Some(row) => Ok(Some(row.into_note()?)),
                None => Ok(None),
            }
        })
    }

    /// Returns true when a row was actually removed.
    pub fn delete_note(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }
}

fn habit_row(row: &rusqlite::Row<'_>) -> std::result::Result<HabitRow, rusqlite::Error> {
    Ok(HabitRow {
        id: row.get(0)?,
        owner_email: row.get(1)?,
        name: row.get(2)?,
        checkmarks: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn note_row(row: &rusqlite::Row<'_>) -> std::result::Result<NoteRow, rusqlite::Error> {
    Ok(NoteRow {
        id: row.get(0)?,
        local_key: row.get(1)?,
        content: row.get(2)?,
        updated_at: row.get(3)?,
        owner_email: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn query_habit(conn: &Connection, id: &str) -> Result<Option<HabitRow>> {
    let row = conn
        .prepare(
            "SELECT id, owner_email, name, checkmarks, created_at FROM habits WHERE id = ?1",
        )?
        .query_row([id], habit_row)
        .optional()?;
    Ok(row)
}

fn query_note(conn: &Connection, id: &str) -> Result<Option<NoteRow>> {
    let row = conn
        .prepare(
            "SELECT id, local_key, content, updated_at, owner_email, created_at FROM notes WHERE id = ?1",
        )?
        .query_row([id], note_row)
        .optional()?;
    Ok(row)
}
