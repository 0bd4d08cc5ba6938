//! Mutation surface for reminders.
//!
//! Front-ends talk to the store exclusively through [`ReminderManager`]:
//! drafts are validated into typed records before anything is persisted,
//! and every operation is scoped to the calling owner.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use chrono::NaiveDateTime;
use log::info;
use serde::Deserialize;

use crate::core::error::{CreateReminderError, StorageError, ValidationError};
use crate::database::{Database, Recurrence, Reminder};

/// Creation payload as submitted by a front-end.
///
/// Mirrors the wire shape of the stored record: `datetime` is ISO-8601 (a
/// trailing `Z` is tolerated and ignored), `repeat` one of `none`, `daily`,
/// `weekly`, `custom`; `days` is only meaningful for `custom`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderDraft {
    pub text: String,
    pub datetime: String,
    #[serde(default = "default_repeat")]
    pub repeat: String,
    #[serde(default)]
    pub days: Option<Vec<i64>>,
}

fn default_repeat() -> String {
    "none".to_string()
}

/// Write surface used by front-ends: validated creation, listing, toggle
/// and delete.
#[derive(Clone)]
pub struct ReminderManager {
    database: Database,
}

impl ReminderManager {
    pub fn new(database: Database) -> Self {
        ReminderManager { database }
    }

    /// Register a user on first contact. Idempotent.
    pub async fn register_user(
        &self,
        user_id: i64,
        username: Option<&str>,
        first_name: &str,
    ) -> Result<(), StorageError> {
        self.database.add_user(user_id, username, first_name).await
    }

    /// Validate `draft` and store it as a new reminder for `owner_id`.
    pub async fn create_reminder(
        &self,
        owner_id: i64,
        draft: &ReminderDraft,
    ) -> Result<Reminder, CreateReminderError> {
        let (text, anchor_time, recurrence) = validate_draft(draft)?;
        let reminder = self
            .database
            .add_reminder(owner_id, &text, anchor_time, recurrence)
            .await?;
        info!("Created reminder {} for user {owner_id}", reminder.id);
        Ok(reminder)
    }

    /// Active reminders owned by `owner_id`, oldest first.
    pub async fn list_mine(&self, owner_id: i64) -> Vec<Reminder> {
        self.database.reminders_for_owner(owner_id).await
    }

    /// Flip a reminder between active and paused. Returns the new state, or
    /// `None` when no reminder matches both id and owner.
    pub async fn toggle(&self, id: u64, owner_id: i64) -> Result<Option<bool>, StorageError> {
        self.database.toggle_reminder(id, owner_id).await
    }

    /// Remove a reminder. A miss (unknown id, or another owner's reminder)
    /// is a no-op reported as `false`, not an error.
    pub async fn delete(&self, id: u64, owner_id: i64) -> Result<bool, StorageError> {
        self.database.delete_reminder(id, owner_id).await
    }
}

fn validate_draft(
    draft: &ReminderDraft,
) -> Result<(String, NaiveDateTime, Recurrence), ValidationError> {
    let text = draft.text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }

    let anchor_time = parse_datetime(&draft.datetime)?;

    let recurrence = match draft.repeat.as_str() {
        "none" => Recurrence::None,
        "daily" => Recurrence::Daily,
        "weekly" => Recurrence::Weekly,
        "custom" => Recurrence::Custom(validate_days(draft.days.as_deref())?),
        other => return Err(ValidationError::UnknownRepeat(other.to_string())),
    };

    Ok((text.to_string(), anchor_time, recurrence))
}

/// Accepts `YYYY-MM-DDTHH:MM`, with optional seconds and fraction, and an
/// optional trailing `Z`.
fn parse_datetime(raw: &str) -> Result<NaiveDateTime, ValidationError> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    Err(ValidationError::BadDatetime(raw.to_string()))
}

/// A custom day set must be present, non-empty, and within 0..=6. The
/// stored set is sorted and deduplicated.
fn validate_days(days: Option<&[i64]>) -> Result<Vec<u8>, ValidationError> {
    let days = days.unwrap_or_default();
    if days.is_empty() {
        return Err(ValidationError::EmptyDays);
    }

    let mut out: Vec<u8> = Vec::with_capacity(days.len());
    for &day in days {
        if !(0..=6).contains(&day) {
            return Err(ValidationError::DayOutOfRange(day));
        }
        let day = day as u8;
        if !out.contains(&day) {
            out.push(day);
        }
    }
    out.sort_unstable();
    Ok(out)
}
