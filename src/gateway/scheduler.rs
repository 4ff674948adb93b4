//! Watering reminders: the periodic notification job.
//!
//! Each tick selects the scenarios whose next watering instant has passed,
//! skips those already reminded today, and sends one message per scenario
//! with a "watered" button under it. Every send is recorded as a
//! `Notification`.

use crate::i18n;
use crate::keyboards;
use crate::usecases::UseCases;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use sprout_core::{
    config::SchedulerConfig,
    entities::{Group, Notification},
    error::SproutError,
    message::OutgoingMessage,
    traits::Channel,
    watering::start_of_day,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Outcome counts of one scheduler tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Sends watering reminders for due scenarios.
pub struct Notifier {
    usecases: UseCases,
    channel: Arc<dyn Channel>,
    config: SchedulerConfig,
    /// Scenario id → local time of its last reminder from this process.
    notified: Mutex<HashMap<i64, NaiveDateTime>>,
}

impl Notifier {
    pub fn new(usecases: UseCases, channel: Arc<dyn Channel>, config: SchedulerConfig) -> Self {
        Self {
            usecases,
            channel,
            config,
            notified: Mutex::new(HashMap::new()),
        }
    }

    /// Background task: tick every `poll_interval_secs`.
    pub async fn run(self: Arc<Self>) {
        info!(
            poll_secs = self.config.poll_interval_secs,
            send_hour = self.config.send_hour,
            "notification scheduler started"
        );
        loop {
            tokio::time::sleep(std::time::Duration::from_secs(
                self.config.poll_interval_secs,
            ))
            .await;

            let report = self.tick(Local::now().naive_local()).await;
            if report.sent > 0 || report.failed > 0 {
                info!(
                    sent = report.sent,
                    skipped = report.skipped,
                    failed = report.failed,
                    "scheduler tick"
                );
            }
        }
    }

    /// One pass over the due scenarios at local time `now`.
    ///
    /// A failing scenario is logged and counted; the others still go out.
    pub async fn tick(&self, now: NaiveDateTime) -> TickReport {
        let mut report = TickReport::default();
        if now.hour() < self.config.send_hour {
            debug!(hour = now.hour(), "scheduler: before send hour");
            return report;
        }

        let day_start = start_of_day(now.date());
        let limit = self.config.notify_limit.max(1);
        let mut offset = self.config.notify_offset;
        loop {
            let groups = match self.usecases.groups_for_notify(now, limit, offset).await {
                Ok(groups) => groups,
                Err(e) => {
                    error!("scheduler: failed to get due groups: {e}");
                    break;
                }
            };

            for group in &groups {
                match self.already_notified(group.id, day_start).await {
                    Ok(true) => {
                        report.skipped += 1;
                        continue;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        error!(group_id = group.id, "scheduler: suppression check failed: {e}");
                        report.failed += 1;
                        continue;
                    }
                }

                match self.notify(group, now).await {
                    Ok(notification) => {
                        info!(
                            group_id = group.id,
                            message_id = notification.message_id,
                            "sent watering reminder"
                        );
                        report.sent += 1;
                    }
                    Err(e) => {
                        error!(group_id = group.id, "failed to send watering reminder: {e}");
                        report.failed += 1;
                    }
                }
            }

            if (groups.len() as i64) < limit {
                break;
            }
            offset += limit;
        }
        report
    }

    /// Whether `group_id` was reminded on or after `day_start`.
    ///
    /// The in-process map answers first; a scenario it has never seen is
    /// looked up in the notification history, so a restart mid-day does not
    /// repeat the reminder.
    async fn already_notified(
        &self,
        group_id: i64,
        day_start: NaiveDateTime,
    ) -> Result<bool, SproutError> {
        if let Some(last) = self.notified.lock().await.get(&group_id) {
            return Ok(*last >= day_start);
        }
        let sent = self
            .usecases
            .notified_since(group_id, local_to_utc(day_start))
            .await?;
        if sent {
            self.notified.lock().await.insert(group_id, day_start);
        }
        Ok(sent)
    }

    /// Send the reminder for `group` and record it.
    ///
    /// A delivered reminder is suppressed for the rest of the day even when
    /// recording it fails.
    async fn notify(
        &self,
        group: &Group,
        now: NaiveDateTime,
    ) -> Result<Notification, SproutError> {
        let user = self.usecases.get_user_by_id(group.user_id).await?;
        let plants = self.usecases.group_plants(group.id).await?;

        let message = OutgoingMessage::text(user.telegram_id, i18n::notification(group, &plants))
            .with_keyboard(Some(keyboards::watered(group.id)));
        let sent = self.channel.send(message).await?;
        self.notified.lock().await.insert(group.id, now);

        self.usecases
            .save_notification(Notification {
                group_id: group.id,
                message_id: sent.id,
                text: sent.text,
                sent_at: sent.time,
                ..Default::default()
            })
            .await
    }
}

/// The UTC instant of a local wall-clock time.
fn local_to_utc(local: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&local).earliest() {
        Some(time) => time.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&local),
    }
}
