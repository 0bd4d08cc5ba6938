//! Error types shared across the reminder engine.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with storage and validation errors

use std::path::PathBuf;
use thiserror::Error;

/// Durable-write or load failure in the reminder store.
///
/// Every variant carries the file involved. A mutation that returns this
/// error has not been committed; the in-memory state is rolled back to
/// match what is on disk.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt data in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejected mutation input. Each variant names the offending field; the
/// reminder is not created when any of these fire.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("text must not be empty")]
    EmptyText,
    #[error("datetime {0:?} is not a valid ISO-8601 timestamp")]
    BadDatetime(String),
    #[error("repeat {0:?} is not one of none, daily, weekly, custom")]
    UnknownRepeat(String),
    #[error("days must name at least one weekday for custom repeat")]
    EmptyDays,
    #[error("days contains {0}, outside the 0 (Sunday) to 6 (Saturday) range")]
    DayOutOfRange(i64),
}

/// Error surface of reminder creation: invalid input, or a persist that
/// failed after validation passed.
#[derive(Debug, Error)]
pub enum CreateReminderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
