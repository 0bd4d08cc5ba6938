//! # Database Module
//!
//! Durable store for reminder and user records. Both collections live
//! behind one mutex and are written back to JSON files on every mutation,
//! so a sweep and a concurrent front-end call always see consistent state.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Atomic replace on persist (temp file + rename)
//! - 1.1.0: Monotonic reminder ids, never reused after deletion
//! - 1.0.0: Initial creation with reminder and user collections

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::error::StorageError;

/// How a reminder repeats after its anchor time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "recurrence", content = "days", rename_all = "lowercase")]
pub enum Recurrence {
    /// Fires once at the anchor minute, then is deactivated.
    None,
    /// Fires every day at the anchor's time of day.
    Daily,
    /// Fires on the anchor's weekday at the anchor's time of day.
    Weekly,
    /// Fires on the listed weekdays, Sunday = 0 through Saturday = 6.
    Custom(Vec<u8>),
}

impl Recurrence {
    /// One-shot reminders are retired after their single firing.
    pub fn is_one_shot(&self) -> bool {
        matches!(self, Recurrence::None)
    }
}

/// A stored reminder.
///
/// `anchor_time` is the firing instant for one-shot reminders; for
/// recurring reminders it carries the time of day (and, for weekly, the
/// reference weekday) that occurrences must match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: u64,
    pub owner_id: i64,
    pub text: String,
    pub anchor_time: NaiveDateTime,
    #[serde(flatten)]
    pub recurrence: Recurrence,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

/// A registered user, keyed in storage by the id in string form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: Option<String>,
    pub first_name: String,
    pub registered_at: NaiveDateTime,
}

struct Store {
    reminders: Vec<Reminder>,
    users: HashMap<String, User>,
    next_id: u64,
    reminders_path: PathBuf,
    users_path: PathBuf,
}

/// Handle to the reminder store. Cheap to clone; all clones share the same
/// underlying collections and mutex.
#[derive(Clone)]
pub struct Database {
    inner: Arc<Mutex<Store>>,
}

impl Database {
    /// Open the store under `data_dir`, creating the directory and empty
    /// collections on first run.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = data_dir.as_ref();
        tokio::fs::create_dir_all(dir).await.map_err(|e| StorageError::Write {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let reminders_path = dir.join("reminders.json");
        let users_path = dir.join("users.json");
        let reminders: Vec<Reminder> = load_collection(&reminders_path).await?;
        let users: HashMap<String, User> = load_collection(&users_path).await?;

        // Ids stay unique for the lifetime of the process even after
        // deletions, so allocation starts past the highest id ever stored.
        let next_id = reminders.iter().map(|r| r.id).max().unwrap_or(0) + 1;

        info!(
            "Opened reminder store at {} ({} reminders, {} users)",
            dir.display(),
            reminders.len(),
            users.len()
        );

        Ok(Database {
            inner: Arc::new(Mutex::new(Store {
                reminders,
                users,
                next_id,
                reminders_path,
                users_path,
            })),
        })
    }

    /// Register a user on first contact. Re-registration is a no-op.
    pub async fn add_user(
        &self,
        user_id: i64,
        username: Option<&str>,
        first_name: &str,
    ) -> Result<(), StorageError> {
        let mut store = self.inner.lock().await;
        let key = user_id.to_string();
        if store.users.contains_key(&key) {
            return Ok(());
        }

        store.users.insert(
            key.clone(),
            User {
                username: username.map(str::to_string),
                first_name: first_name.to_string(),
                registered_at: Local::now().naive_local(),
            },
        );
        if let Err(e) = persist(&store.users_path, &store.users).await {
            store.users.remove(&key);
            return Err(e);
        }

        debug!("Registered user {user_id}");
        Ok(())
    }

    /// Look up a user record.
    pub async fn user(&self, user_id: i64) -> Option<User> {
        self.inner.lock().await.users.get(&user_id.to_string()).cloned()
    }

    /// Store a new reminder for `owner_id` and return the stored record.
    pub async fn add_reminder(
        &self,
        owner_id: i64,
        text: &str,
        anchor_time: NaiveDateTime,
        recurrence: Recurrence,
    ) -> Result<Reminder, StorageError> {
        let mut store = self.inner.lock().await;
        let reminder = Reminder {
            id: store.next_id,
            owner_id,
            text: text.to_string(),
            anchor_time,
            recurrence,
            active: true,
            created_at: Local::now().naive_local(),
        };

        store.reminders.push(reminder.clone());
        if let Err(e) = persist(&store.reminders_path, &store.reminders).await {
            store.reminders.pop();
            return Err(e);
        }
        store.next_id += 1;

        info!("Stored reminder {} for user {owner_id}", reminder.id);
        Ok(reminder)
    }

    /// Active reminders owned by `owner_id`, in insertion order.
    pub async fn reminders_for_owner(&self, owner_id: i64) -> Vec<Reminder> {
        self.inner
            .lock()
            .await
            .reminders
            .iter()
            .filter(|r| r.owner_id == owner_id && r.active)
            .cloned()
            .collect()
    }

    /// Snapshot of every active reminder, regardless of owner. Used by the
    /// scheduler at the start of a sweep.
    pub async fn active_reminders(&self) -> Vec<Reminder> {
        self.inner
            .lock()
            .await
            .reminders
            .iter()
            .filter(|r| r.active)
            .cloned()
            .collect()
    }

    /// Flip `active` for the reminder matching both id and owner. Returns
    /// the new state, or `None` when nothing matches — a wrong id and a
    /// wrong owner are indistinguishable to the caller.
    pub async fn toggle_reminder(
        &self,
        id: u64,
        owner_id: i64,
    ) -> Result<Option<bool>, StorageError> {
        let mut store = self.inner.lock().await;
        let Some(idx) = store
            .reminders
            .iter()
            .position(|r| r.id == id && r.owner_id == owner_id)
        else {
            return Ok(None);
        };

        store.reminders[idx].active = !store.reminders[idx].active;
        let new_state = store.reminders[idx].active;
        if let Err(e) = persist(&store.reminders_path, &store.reminders).await {
            store.reminders[idx].active = !new_state;
            return Err(e);
        }

        debug!("Toggled reminder {id} to active={new_state}");
        Ok(Some(new_state))
    }

    /// Remove the reminder matching both id and owner. Returns whether a
    /// record was removed; a miss is a no-op, not an error.
    pub async fn delete_reminder(&self, id: u64, owner_id: i64) -> Result<bool, StorageError> {
        let mut store = self.inner.lock().await;
        let retained: Vec<Reminder> = store
            .reminders
            .iter()
            .filter(|r| !(r.id == id && r.owner_id == owner_id))
            .cloned()
            .collect();
        if retained.len() == store.reminders.len() {
            return Ok(false);
        }

        persist(&store.reminders_path, &retained).await?;
        store.reminders = retained;

        info!("Deleted reminder {id} for user {owner_id}");
        Ok(true)
    }

    /// Unconditionally deactivate a reminder. Called by the scheduler after
    /// a one-shot has fired; the id came from an owned record, so no owner
    /// check is repeated here.
    pub async fn deactivate_reminder(&self, id: u64) -> Result<(), StorageError> {
        let mut store = self.inner.lock().await;
        let Some(idx) = store.reminders.iter().position(|r| r.id == id) else {
            return Ok(());
        };
        if !store.reminders[idx].active {
            return Ok(());
        }

        store.reminders[idx].active = false;
        if let Err(e) = persist(&store.reminders_path, &store.reminders).await {
            store.reminders[idx].active = true;
            return Err(e);
        }

        debug!("Deactivated reminder {id}");
        Ok(())
    }
}

async fn load_collection<T>(path: &Path) -> Result<T, StorageError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match tokio::fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StorageError::Decode {
            path: path.to_path_buf(),
            source: e,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(StorageError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Write the whole collection to a sibling temp file, then rename over the
/// target. The record on disk is either the old state or the new one,
/// never a torn write.
async fn persist<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| StorageError::Encode {
        path: path.to_path_buf(),
        source: e,
    })?;

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes).await.map_err(|e| StorageError::Write {
        path: tmp.clone(),
        source: e,
    })?;
    tokio::fs::rename(&tmp, path).await.map_err(|e| StorageError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn anchor() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_and_never_reused() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();

        let first = db.add_reminder(1, "a", anchor(), Recurrence::None).await.unwrap();
        let second = db.add_reminder(1, "b", anchor(), Recurrence::None).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        assert!(db.delete_reminder(second.id, 1).await.unwrap());
        let third = db.add_reminder(1, "c", anchor(), Recurrence::None).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_add_user_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();

        db.add_user(42, Some("ada"), "Ada").await.unwrap();
        let registered = db.user(42).await.unwrap();

        db.add_user(42, Some("countess"), "Augusta").await.unwrap();
        let after = db.user(42).await.unwrap();
        assert_eq!(registered, after);
        assert_eq!(after.first_name, "Ada");
    }

    #[tokio::test]
    async fn test_toggle_requires_matching_owner() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();

        let reminder = db.add_reminder(1, "a", anchor(), Recurrence::Daily).await.unwrap();
        assert_eq!(db.toggle_reminder(reminder.id, 999).await.unwrap(), None);
        assert_eq!(db.toggle_reminder(reminder.id, 1).await.unwrap(), Some(false));
        assert_eq!(db.toggle_reminder(reminder.id, 1).await.unwrap(), Some(true));
    }

    #[tokio::test]
    async fn test_delete_with_wrong_owner_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();

        let reminder = db.add_reminder(1, "keep me", anchor(), Recurrence::None).await.unwrap();
        assert!(!db.delete_reminder(reminder.id, 999).await.unwrap());

        let mine = db.reminders_for_owner(1).await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].text, "keep me");
    }

    #[tokio::test]
    async fn test_listing_excludes_inactive_and_other_owners() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();

        let mine = db.add_reminder(1, "mine", anchor(), Recurrence::None).await.unwrap();
        let paused = db.add_reminder(1, "paused", anchor(), Recurrence::None).await.unwrap();
        db.add_reminder(2, "theirs", anchor(), Recurrence::None).await.unwrap();
        db.toggle_reminder(paused.id, 1).await.unwrap();

        let listed = db.reminders_for_owner(1).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);

        assert_eq!(db.active_reminders().await.len(), 2);
    }

    #[tokio::test]
    async fn test_deactivate_is_unconditional_and_tolerates_missing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();

        let reminder = db.add_reminder(1, "a", anchor(), Recurrence::None).await.unwrap();
        db.deactivate_reminder(reminder.id).await.unwrap();
        assert!(db.reminders_for_owner(1).await.is_empty());

        // Unknown id: nothing to do, not an error
        db.deactivate_reminder(9999).await.unwrap();
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let db = Database::open(dir.path()).await.unwrap();
            db.add_user(42, None, "Ada").await.unwrap();
            db.add_reminder(42, "persisted", anchor(), Recurrence::Weekly).await.unwrap();
            let gone = db.add_reminder(42, "deleted", anchor(), Recurrence::None).await.unwrap();
            db.delete_reminder(gone.id, 42).await.unwrap();
        }

        let reopened = Database::open(dir.path()).await.unwrap();
        let reminders = reopened.reminders_for_owner(42).await;
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].text, "persisted");
        assert_eq!(reminders[0].recurrence, Recurrence::Weekly);
        assert_eq!(reopened.user(42).await.unwrap().first_name, "Ada");

        // Allocation resumes past the highest surviving id
        let next = reopened.add_reminder(42, "later", anchor(), Recurrence::None).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_reminder_record_layout() {
        let reminder = Reminder {
            id: 7,
            owner_id: 42,
            text: "Buy milk".to_string(),
            anchor_time: anchor(),
            recurrence: Recurrence::Custom(vec![1, 3]),
            active: true,
            created_at: anchor(),
        };

        let value = serde_json::to_value(&reminder).unwrap();
        assert_eq!(value["recurrence"], "custom");
        assert_eq!(value["days"], serde_json::json!([1, 3]));
        assert_eq!(value["anchor_time"], "2024-01-01T09:00:00");

        let one_shot = Reminder {
            recurrence: Recurrence::None,
            ..reminder
        };
        let value = serde_json::to_value(&one_shot).unwrap();
        assert_eq!(value["recurrence"], "none");
        assert!(value.get("days").is_none());

        let parsed: Reminder = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.recurrence, Recurrence::None);
    }
}
