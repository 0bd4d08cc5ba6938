//! Notification and listing text for reminders.

use crate::database::{Recurrence, Reminder};

/// Weekday labels indexed by stored day number (Sunday = 0).
const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Message body delivered when a reminder fires. Falls back to a generic
/// greeting when the owner has no user record.
pub fn notification_text(reminder: &Reminder, first_name: Option<&str>) -> String {
    let name = first_name.unwrap_or("friend");
    format!(
        "🔔 Reminder!\n\nYou asked to be reminded about \"{}\" — consider this your nudge.\n\nHave a great day, {}! 🌟",
        reminder.text, name
    )
}

/// One-line summary of a reminder for listings.
pub fn summary_line(reminder: &Reminder) -> String {
    let date = reminder.anchor_time.format("%d.%m.%Y");
    let time = reminder.anchor_time.format("%H:%M");
    let repeat = match &reminder.recurrence {
        Recurrence::None => "⏰ once".to_string(),
        Recurrence::Daily => "🔄 daily".to_string(),
        Recurrence::Weekly => "📅 weekly".to_string(),
        Recurrence::Custom(days) => {
            let names: Vec<&str> = days
                .iter()
                .filter_map(|&d| DAY_NAMES.get(d as usize).copied())
                .collect();
            format!("📌 on {}", names.join(", "))
        }
    };
    let status = if reminder.active { "✅ active" } else { "⏸️ paused" };

    format!("#{} {} · {} {} · {} · {}", reminder.id, reminder.text, date, time, repeat, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn reminder(recurrence: Recurrence) -> Reminder {
        let anchor: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        Reminder {
            id: 12,
            owner_id: 42,
            text: "Buy milk".to_string(),
            anchor_time: anchor,
            recurrence,
            active: true,
            created_at: anchor,
        }
    }

    #[test]
    fn test_notification_text_uses_first_name() {
        let r = reminder(Recurrence::None);
        let text = notification_text(&r, Some("Ada"));
        assert!(text.contains("Buy milk"));
        assert!(text.contains("Ada"));
    }

    #[test]
    fn test_notification_text_falls_back_without_user_record() {
        let r = reminder(Recurrence::None);
        assert!(notification_text(&r, None).contains("friend"));
    }

    #[test]
    fn test_summary_line_shows_custom_day_names() {
        let line = summary_line(&reminder(Recurrence::Custom(vec![1, 3])));
        assert!(line.contains("#12"));
        assert!(line.contains("01.01.2024"));
        assert!(line.contains("09:05"));
        assert!(line.contains("Mon, Wed"));
        assert!(line.contains("active"));
    }

    #[test]
    fn test_summary_line_marks_paused_reminders() {
        let mut r = reminder(Recurrence::Daily);
        r.active = false;
        assert!(summary_line(&r).contains("paused"));
    }
}
