//! Orchestration core for the Opsdesk business manager.
//!
//! The desktop shell owns rendering and input; this crate owns the single
//! versioned state tree and everything derived from it: the store adapter,
//! the settings reconciler, the notification engine, the deadline monitor,
//! the admin elevation gate, and the backup codec.

pub mod backup;
pub mod deadline;
pub mod elevation;
mod error;
mod id;
pub mod logging;
pub mod migrate;
mod model;
pub mod notify;
pub mod settings;
pub mod state;
pub mod store;
mod time;

pub use backup::RestoreError;
pub use deadline::{run_tick, DeadlineMonitor, MonitorConfig, TickReport};
pub use elevation::{ChallengeOutcome, ElevationGate, SwitchOutcome, DEFAULT_ADMIN_PIN};
pub use error::{surface_for, AppError, AppResult, ErrorSurface};
pub use migrate::SCHEMA_VERSION;
pub use model::{
    ApplicationState, Client, Event, EventStatus, Notification, NotificationKind, Rfq, RfqStatus,
    ServiceItem, Task, ThemePreset, Transaction, TransactionKind, User, UserRole,
};
pub use notify::{
    event_link, Chime, Cue, NavigationIntent, NewNotification, NotificationCenter, PushOutcome,
    SilentChime, NOTIFICATION_CAP,
};
pub use settings::{update_settings, Merge, Settings, SettingsPatch, ThemeMode};
pub use state::AppState;
pub use store::{JsonFileStore, MemoryStore, StateBackend, StoreHandle};
