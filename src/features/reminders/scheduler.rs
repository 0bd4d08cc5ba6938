//! # Reminder Scheduler
//!
//! Background loop that sweeps the store on a fixed tick and delivers due
//! reminders through the dispatch gateway.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Configurable deactivation policy for undelivered one-shots
//! - 1.0.0: Initial release with interval sweeps

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use log::{debug, error, info, warn};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::database::Database;
use crate::dispatch::DispatchGateway;
use crate::features::reminders::recurrence::is_due;
use crate::features::reminders::render::notification_text;

/// Periodic sweep driver. Created once at startup and spawned as a
/// background task; owns nothing but handles.
pub struct ReminderScheduler {
    database: Database,
    gateway: Arc<dyn DispatchGateway>,
    tick_interval: Duration,
    deactivate_undelivered: bool,
}

impl ReminderScheduler {
    pub fn new(
        database: Database,
        gateway: Arc<dyn DispatchGateway>,
        tick_interval: Duration,
        deactivate_undelivered: bool,
    ) -> Self {
        ReminderScheduler {
            database,
            gateway,
            tick_interval,
            deactivate_undelivered,
        }
    }

    /// Run sweeps on the fixed tick until `shutdown` signals. An in-flight
    /// sweep always finishes before the loop exits.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.tick_interval);
        // Ticks missed while the process was busy or suspended are skipped,
        // never replayed
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Reminder scheduler started (interval: {}s)",
            self.tick_interval.as_secs()
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.sweep(Local::now().naive_local()).await;
                }
                _ = shutdown.changed() => {
                    info!("Reminder scheduler stopping");
                    break;
                }
            }
        }
    }

    /// One pass over a snapshot of the active reminders at `now`: dispatch
    /// what is due, then retire fired one-shots. A failure on one reminder
    /// never aborts the rest of the sweep.
    pub async fn sweep(&self, now: NaiveDateTime) {
        let snapshot = self.database.active_reminders().await;
        debug!("Sweeping {} active reminders", snapshot.len());

        for reminder in snapshot {
            if !is_due(now, &reminder) {
                continue;
            }
            debug!("Reminder {} is due at {now}", reminder.id);

            let first_name = self
                .database
                .user(reminder.owner_id)
                .await
                .map(|user| user.first_name);
            let text = notification_text(&reminder, first_name.as_deref());

            let delivered = match self.gateway.send(reminder.owner_id, &text).await {
                Ok(()) => {
                    info!(
                        "Delivered reminder {} to user {}",
                        reminder.id, reminder.owner_id
                    );
                    true
                }
                Err(e) => {
                    error!("Dispatch failed for reminder {}: {e}", reminder.id);
                    false
                }
            };

            if reminder.recurrence.is_one_shot() {
                if !delivered && !self.deactivate_undelivered {
                    warn!(
                        "Keeping undelivered one-shot reminder {} active for another attempt",
                        reminder.id
                    );
                    continue;
                }
                if let Err(e) = self.database.deactivate_reminder(reminder.id).await {
                    // Skip only this write; the next sweep sees the reminder again
                    error!("Failed to deactivate reminder {}: {e}", reminder.id);
                }
            }
        }
    }
}
