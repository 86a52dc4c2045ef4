use std::time::Duration;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::model::NotificationKind;
use crate::notify::{event_link, NewNotification, NotificationCenter, PushOutcome};
use crate::store::StoreHandle;

/// Tasks closer than this to their due date produce a warning.
pub const DUE_SOON_HORIZON_HOURS: f64 = 24.0;

const SYNTHETIC_FEED_CHANCE: f64 = 0.1;

/// Low-stakes feed entries emitted occasionally to keep the inbox alive.
const SYNTHETIC_FEED: &[(&str, &str, NotificationKind)] = &[
    (
        "New RFQ Received",
        "A client asked for a quote on event production.",
        NotificationKind::Info,
    ),
    (
        "Payment Recorded",
        "An invoice payment was recorded in finance.",
        NotificationKind::Success,
    ),
    (
        "Client Note Added",
        "A coordinator left a note on a client profile.",
        NotificationKind::Info,
    ),
    (
        "Service Updated",
        "A service rate card was revised.",
        NotificationKind::Info,
    ),
    (
        "RFQ Accepted",
        "A quote was accepted and moved to booking.",
        NotificationKind::Success,
    ),
];

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub interval: Duration,
    pub synthetic_feed: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            interval: Duration::from_secs(60),
            synthetic_feed: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Due-dated, incomplete tasks on live events that were examined.
    pub scanned: usize,
    pub emitted: usize,
    pub suppressed: usize,
}

/// One level-triggered pass over every task of every live event.
///
/// The only memory of "already notified" is a matching entry still being in
/// the capped feed: once that entry ages out, the same task may notify
/// again.
pub fn run_tick(store: &StoreHandle, center: &NotificationCenter) -> AppResult<TickReport> {
    let state = store.snapshot();
    let now = Utc::now();
    let mut report = TickReport::default();

    for event in state.events.iter().filter(|e| !e.status.is_terminal()) {
        let link = event_link(&event.id);
        for task in event.tasks.iter().filter(|t| !t.is_completed) {
            let Some(due) = task.due_date else { continue };
            report.scanned += 1;

            let already_notified = state.notifications.iter().any(|n| {
                n.link.as_deref() == Some(link.as_str()) && n.message.contains(&task.description)
            });
            if already_notified {
                report.suppressed += 1;
                continue;
            }

            let hours_left = (due - now).num_seconds() as f64 / 3600.0;
            let input = if hours_left < 0.0 {
                NewNotification::new(
                    "Task Overdue",
                    format!(
                        "\"{}\" for {} is past due.",
                        task.description, event.title
                    ),
                    NotificationKind::Error,
                )
                .with_link(link.clone())
            } else if hours_left < DUE_SOON_HORIZON_HOURS {
                NewNotification::new(
                    "Task Due Soon",
                    format!(
                        "\"{}\" for {} is due in {:.0} hours.",
                        task.description, event.title, hours_left
                    ),
                    NotificationKind::Warning,
                )
                .with_link(link.clone())
            } else {
                continue;
            };

            match center.push(input)? {
                PushOutcome::Stored { .. } => report.emitted += 1,
                PushOutcome::Suppressed => report.suppressed += 1,
            }
        }
    }

    debug!(
        target: "opsdesk",
        event = "deadline_tick",
        scanned = report.scanned,
        emitted = report.emitted,
        suppressed = report.suppressed
    );
    Ok(report)
}

/// One roll of the synthetic feed generator; goes through the same dedup
/// path as every other notification.
pub fn maybe_emit_synthetic(center: &NotificationCenter) {
    let (title, message, kind) = {
        let mut rng = rand::thread_rng();
        if !rng.gen_bool(SYNTHETIC_FEED_CHANCE) {
            return;
        }
        match SYNTHETIC_FEED.choose(&mut rng) {
            Some(entry) => *entry,
            None => return,
        }
    };
    if let Err(err) = center.push(NewNotification::new(title, message, kind)) {
        warn!(target: "opsdesk", event = "synthetic_feed_failed", error = %err);
    }
}

/// Recurring scan owned by the session lifecycle: started on login, stopped
/// on logout or shell teardown.
pub struct DeadlineMonitor {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl DeadlineMonitor {
    pub fn start(store: StoreHandle, center: NotificationCenter, config: MonitorConfig) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let interval = config.interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first interval tick completes immediately; consume it so
            // the first scan happens one full period after start.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        if let Err(err) = run_tick(&store, &center) {
                            warn!(target: "opsdesk", event = "deadline_tick_failed", error = %err);
                        }
                        if config.synthetic_feed {
                            maybe_emit_synthetic(&center);
                        }
                    }
                }
            }
        });
        info!(
            target: "opsdesk",
            event = "deadline_monitor_started",
            interval_secs = interval.as_secs()
        );
        DeadlineMonitor { shutdown, handle }
    }

    /// Cancel the timer and wait for the task to wind down between ticks.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
        info!(target: "opsdesk", event = "deadline_monitor_stopped");
    }
}
