use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::AppResult;
use crate::id::new_uuid_v7;
use crate::model::{Notification, NotificationKind};
use crate::store::StoreHandle;

/// The feed never holds more than this many entries; older ones fall off.
pub const NOTIFICATION_CAP: usize = 50;
/// Entries with identical title and message inside this window are dropped.
pub const DEDUP_WINDOW_SECS: i64 = 5;

const EVENT_LINK_PREFIX: &str = "event:";

/// Opaque link target for an event record, `event:<id>`.
pub fn event_link(event_id: &str) -> String {
    format!("{EVENT_LINK_PREFIX}{event_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Error,
}

/// Audio cue sink, implemented by the shell. Playback is best-effort; the
/// core logs and swallows failures.
pub trait Chime: Send + Sync {
    fn play(&self, cue: Cue) -> anyhow::Result<()>;
}

/// No-op sink for tests and headless shells.
pub struct SilentChime;

impl Chime for SilentChime {
    fn play(&self, _cue: Cue) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub link: Option<String>,
}

impl NewNotification {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        NewNotification {
            title: title.into(),
            message: message.into(),
            kind,
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Stored { id: String },
    Suppressed,
}

/// Instruction for the presentation layer to open a record's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/bindings/")]
pub struct NavigationIntent {
    pub target_view: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub target_record_id: Option<String>,
}

#[derive(Clone)]
pub struct NotificationCenter {
    store: StoreHandle,
    chime: Arc<dyn Chime>,
}

impl NotificationCenter {
    pub fn new(store: StoreHandle, chime: Arc<dyn Chime>) -> Self {
        NotificationCenter { store, chime }
    }

    /// Stamp and store a notification, unless an identical one landed within
    /// the dedup window. `warning` and `error` entries fire the error cue.
    pub fn push(&self, input: NewNotification) -> AppResult<PushOutcome> {
        self.push_at(input, Utc::now())
    }

    fn push_at(&self, input: NewNotification, now: DateTime<Utc>) -> AppResult<PushOutcome> {
        let entry = Notification {
            id: new_uuid_v7(),
            title: input.title,
            message: input.message,
            kind: input.kind,
            link: input.link,
            timestamp: now,
            read: false,
        };
        let id = entry.id.clone();
        let kind = entry.kind;

        let mut suppressed = false;
        self.store.mutate(|state| {
            // The check runs under the store lock so rapid sequential pushes
            // from racing triggers see each other.
            let duplicate = state.notifications.iter().any(|existing| {
                existing.title == entry.title
                    && existing.message == entry.message
                    && now - existing.timestamp < Duration::seconds(DEDUP_WINDOW_SECS)
            });
            if duplicate {
                suppressed = true;
                return;
            }
            state.notifications.insert(0, entry);
            state.notifications.truncate(NOTIFICATION_CAP);
        })?;

        if suppressed {
            debug!(target: "opsdesk", event = "notification_suppressed", id = %id);
            return Ok(PushOutcome::Suppressed);
        }
        if matches!(kind, NotificationKind::Warning | NotificationKind::Error) {
            self.cue(Cue::Error);
        }
        debug!(target: "opsdesk", event = "notification_stored", id = %id);
        Ok(PushOutcome::Stored { id })
    }

    /// Best-effort cue playback; a failure never reaches the caller.
    pub fn cue(&self, cue: Cue) {
        if let Err(err) = self.chime.play(cue) {
            warn!(target: "opsdesk", event = "cue_play_failed", error = %err);
        }
    }

    /// Mark an entry read. Unknown ids are a no-op.
    pub fn mark_read(&self, id: &str) -> AppResult<()> {
        self.store.mutate(|state| {
            if let Some(entry) = state.notifications.iter_mut().find(|n| n.id == id) {
                entry.read = true;
            }
        })
    }

    pub fn clear_all(&self) -> AppResult<()> {
        self.store.mutate(|state| state.notifications.clear())
    }

    /// Navigation intent for an entry whose link targets an event record.
    /// The only path by which a notification causes navigation; viewing
    /// twice yields the same intent.
    pub fn view(&self, id: &str) -> Option<NavigationIntent> {
        let state = self.store.snapshot();
        let entry = state.notifications.iter().find(|n| n.id == id)?;
        let event_id = entry.link.as_deref()?.strip_prefix(EVENT_LINK_PREFIX)?;
        Some(NavigationIntent {
            target_view: "events".into(),
            target_record_id: Some(event_id.to_string()),
        })
    }
}
