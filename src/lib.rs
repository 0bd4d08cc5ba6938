// Core layer - configuration and error types
pub mod core;

// Features layer - all feature modules
pub mod features;

// Infrastructure
pub mod database;
pub mod dispatch;

// Re-export core config for convenience
pub use core::Config;
pub use core::{CreateReminderError, StorageError, ValidationError};

// Re-export feature items
pub use features::reminders::{ReminderDraft, ReminderManager, ReminderScheduler};

// Re-export storage records and the dispatch seam
pub use database::{Database, Recurrence, Reminder, User};
pub use dispatch::{DispatchError, DispatchGateway, LogGateway};
