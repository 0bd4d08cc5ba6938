//! # Features Module
//!
//! Feature modules of the nudge bot.

pub mod reminders;

pub use reminders::{ReminderDraft, ReminderManager, ReminderScheduler};
