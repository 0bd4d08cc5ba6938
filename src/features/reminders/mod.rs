//! # Reminders Feature
//!
//! Reminder scheduling with recurrence matching and timed delivery.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Configurable deactivation policy for undelivered one-shots
//! - 1.0.0: Initial release with once/daily/weekly/custom recurrence

pub mod manager;
pub mod recurrence;
pub mod render;
pub mod scheduler;

pub use manager::{ReminderDraft, ReminderManager};
pub use recurrence::is_due;
pub use render::{notification_text, summary_line};
pub use scheduler::ReminderScheduler;
