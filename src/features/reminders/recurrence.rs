//! Recurrence matching for scheduled reminders.
//!
//! Pure predicates over wall-clock timestamps. Matching is exact at minute
//! granularity: the predicate holds for one calendar minute and goes false
//! as soon as the minute advances, so a sub-minute poll interval observes
//! each occurrence in exactly one sweep.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::database::{Recurrence, Reminder};

/// Whether `reminder` is due at `now`.
///
/// Inactive reminders are never due. One-shot reminders match their anchor
/// minute; recurring reminders match the anchor's time of day (and, for
/// weekly and custom, the weekday) with seconds truncated.
pub fn is_due(now: NaiveDateTime, reminder: &Reminder) -> bool {
    if !reminder.active {
        return false;
    }

    let anchor = reminder.anchor_time;
    match &reminder.recurrence {
        Recurrence::None => same_minute(now, anchor),
        Recurrence::Daily => same_time_of_day(now, anchor),
        Recurrence::Weekly => now.weekday() == anchor.weekday() && same_time_of_day(now, anchor),
        Recurrence::Custom(days) => {
            days.contains(&weekday_number(now)) && same_time_of_day(now, anchor)
        }
    }
}

/// Same calendar minute: date, hour and minute all equal.
fn same_minute(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date() && same_time_of_day(a, b)
}

fn same_time_of_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.hour() == b.hour() && a.minute() == b.minute()
}

/// Weekday as stored in custom day sets: Sunday = 0 through Saturday = 6.
pub fn weekday_number(dt: NaiveDateTime) -> u8 {
    dt.weekday().num_days_from_sunday() as u8
}
