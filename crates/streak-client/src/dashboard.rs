//! The dashboard controller: keeps the in-memory habit grid and note list
//! reconciled with the server.
//!
//! Every mutation is applied to local state first, then confirmed against
//! the server response: the optimistic entry is replaced by the
//! authoritative record on success and rolled back on failure. Fetch
//! failures are logged and swallowed; the previously displayed state stays
//! put.

use chrono::{DateTime, TimeZone, Utc};
use tracing::warn;
use uuid::Uuid;

use streak_types::api::CreateNoteRequest;
use streak_types::models::{DAYS_TRACKED, Habit, Note};

use crate::api::ApiClient;
use crate::calendar::MonthCursor;

/// Fixed monthly goal shown next to each habit's achieved count.
pub const GOAL_PER_HABIT: usize = 20;

pub struct Dashboard {
    client: ApiClient,
    pub cursor: MonthCursor,
    pub habits: Vec<Habit>,
    pub notes: Vec<Note>,
}

impl Dashboard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cursor: MonthCursor::today(),
            habits: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Initial fetch after login: habits for the displayed month plus the
    /// full note list.
    pub async fn load(&mut self) {
        self.refresh_habits().await;
        self.refresh_notes().await;
    }

    pub async fn refresh_habits(&mut self) {
        match self
            .client
            .list_habits(self.cursor.api_month(), self.cursor.year)
            .await
        {
            Ok(habits) => self.habits = habits,
            Err(e) => warn!("failed to fetch habits: {}", e),
        }
    }

    pub async fn refresh_notes(&mut self) {
        match self.client.list_notes().await {
            Ok(notes) => self.notes = notes,
            Err(e) => warn!("failed to fetch notes: {}", e),
        }
    }

    // -- Month navigation: every move re-fetches the displayed month --

    pub async fn prev_month(&mut self) {
        self.cursor.prev_month();
        self.refresh_habits().await;
    }

    pub async fn next_month(&mut self) {
        self.cursor.next_month();
        self.refresh_habits().await;
    }

    pub async fn jump_to_today(&mut self) {
        self.cursor.jump_to_today();
        self.refresh_habits().await;
    }

    // -- Habits --

    pub async fn add_habit(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let placeholder_id = Uuid::new_v4();
        self.habits.insert(
            0,
            Habit {
                id: placeholder_id,
                owner_email: self.client.email().unwrap_or_default().to_string(),
                name: name.to_string(),
                checkmarks: vec![false; DAYS_TRACKED],
                created_at: Utc::now(),
            },
        );

        match self.client.create_habit(name, None).await {
            Ok(habit) => {
                if let Some(entry) = self.habits.iter_mut().find(|h| h.id == placeholder_id) {
                    *entry = habit;
                }
            }
            Err(e) => {
                self.habits.retain(|h| h.id != placeholder_id);
                warn!("failed to create habit: {}", e);
            }
        }
    }

    pub async fn toggle_checkmark(&mut self, habit_id: Uuid, day_index: usize) {
        let Some(pos) = self.habits.iter().position(|h| h.id == habit_id) else {
            return;
        };
        if day_index >= self.habits[pos].checkmarks.len() {
            return;
        }

        self.habits[pos].checkmarks[day_index] = !self.habits[pos].checkmarks[day_index];

        match self.client.toggle_checkmark(habit_id, day_index).await {
            Ok(habit) => self.habits[pos] = habit,
            Err(e) => {
                self.habits[pos].checkmarks[day_index] = !self.habits[pos].checkmarks[day_index];
                warn!("failed to toggle checkmark: {}", e);
            }
        }
    }

    pub async fn delete_habit(&mut self, habit_id: Uuid) {
        let Some(pos) = self.habits.iter().position(|h| h.id == habit_id) else {
            return;
        };
        let removed = self.habits.remove(pos);

        if let Err(e) = self.client.delete_habit(habit_id).await {
            self.habits.insert(pos, removed);
            warn!("failed to delete habit: {}", e);
        }
    }

    // -- Notes --

    /// Create or update depending on whether a note is being edited.
    /// Blank input is a no-op, as is an edit whose local key no longer
    /// resolves to a known note.
    pub async fn save_note(&mut self, editing: Option<i64>, input: &str) {
        if input.trim().is_empty() {
            return;
        }
        let updated_at = format_display_timestamp(Utc::now());

        match editing {
            Some(local_key) => {
                let Some(note_id) = resolve_note_id(&self.notes, local_key) else {
                    return;
                };
                let Some(pos) = self.notes.iter().position(|n| n.local_key == local_key) else {
                    return;
                };
                let backup = self.notes[pos].clone();
                self.notes[pos].content = input.to_string();
                self.notes[pos].updated_at = updated_at.clone();

                match self.client.update_note(note_id, input, &updated_at).await {
                    Ok(note) => self.notes[pos] = note,
                    Err(e) => {
                        self.notes[pos] = backup;
                        warn!("failed to update note: {}", e);
                    }
                }
            }
            None => {
                let local_key = Utc::now().timestamp_millis();
                self.notes.push(Note {
                    id: Uuid::nil(),
                    local_key,
                    content: input.to_string(),
                    updated_at: updated_at.clone(),
                    owner_email: self.client.email().unwrap_or_default().to_string(),
                    created_at: Utc::now(),
                });

                let req = CreateNoteRequest {
                    local_key,
                    content: input.to_string(),
                    updated_at,
                };
                match self.client.create_note(&req).await {
                    Ok(note) => {
                        if let Some(entry) =
                            self.notes.iter_mut().find(|n| n.local_key == local_key)
                        {
                            *entry = note;
                        }
                    }
                    Err(e) => {
                        self.notes.retain(|n| n.local_key != local_key);
                        warn!("failed to create note: {}", e);
                    }
                }
            }
        }
    }

    /// No-op when the local key does not resolve; never issues a
    /// malformed request for a note the view does not know about.
    pub async fn delete_note(&mut self, local_key: i64) {
        let Some(note_id) = resolve_note_id(&self.notes, local_key) else {
            return;
        };
        let Some(pos) = self.notes.iter().position(|n| n.local_key == local_key) else {
            return;
        };
        let removed = self.notes.remove(pos);

        if let Err(e) = self.client.delete_note(note_id).await {
            self.notes.insert(pos, removed);
            warn!("failed to delete note: {}", e);
        }
    }
}

/// Resolve the view's local key to the server identity required by
/// update/delete calls.
fn resolve_note_id(notes: &[Note], local_key: i64) -> Option<Uuid> {
    notes
        .iter()
        .find(|n| n.local_key == local_key)
        .map(|n| n.id)
}

/// Long-form display timestamp recomputed on every note save, e.g.
/// "March 5, 2026 at 02:11 PM". Display-only; never parsed back.
fn format_display_timestamp<Tz: TimeZone>(ts: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.format("%B %-d, %Y at %I:%M %p").to_string()
}
