use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::id::new_uuid_v7;
use crate::settings::{Settings, SettingsPatch};
use crate::time::now_ms;

/// Severity class of a feed entry. `warning` and `error` additionally fire
/// the error cue when stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../ui/bindings/")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/bindings/")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub link: Option<String>,
    #[ts(type = "string")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

/// A deadline-bearing item attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/bindings/")]
pub struct Task {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional, type = "string")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        Task {
            description: description.into(),
            due_date: None,
            is_completed: false,
        }
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings/")]
pub enum EventStatus {
    Planned,
    InProgress,
    Completed,
    Canceled,
}

impl EventStatus {
    /// Terminal events are skipped by the deadline monitor.
    pub fn is_terminal(self) -> bool {
        matches!(self, EventStatus::Completed | EventStatus::Canceled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/bindings/")]
pub struct Event {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub client_id: Option<String>,
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional, type = "number")]
    pub starts_at: Option<i64>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    #[ts(type = "number")]
    pub created_at: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub updated_at: i64,
}

impl Event {
    pub fn new(title: impl Into<String>) -> Self {
        let now = now_ms();
        Event {
            id: new_uuid_v7(),
            title: title.into(),
            client_id: None,
            status: EventStatus::Planned,
            starts_at: None,
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings/")]
pub enum UserRole {
    Admin,
    Manager,
    Staff,
}

impl UserRole {
    /// Switching into this role must pass the PIN challenge.
    pub fn requires_elevation(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/bindings/")]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    #[ts(type = "number")]
    pub created_at: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub updated_at: i64,
}

impl User {
    pub fn new(name: impl Into<String>, role: UserRole) -> Self {
        let now = now_ms();
        User {
            id: new_uuid_v7(),
            name: name.into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/bindings/")]
pub struct Client {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    #[ts(type = "number")]
    pub created_at: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub updated_at: i64,
}

impl Client {
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_ms();
        Client {
            id: new_uuid_v7(),
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings/")]
pub enum RfqStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/bindings/")]
pub struct Rfq {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub client_id: Option<String>,
    pub status: RfqStatus,
    #[serde(default)]
    #[ts(type = "number")]
    pub amount_cents: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub created_at: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/bindings/")]
pub struct ServiceItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    #[ts(type = "number")]
    pub rate_cents: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub created_at: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings/")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/bindings/")]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    pub kind: TransactionKind,
    #[serde(default)]
    #[ts(type = "number")]
    pub amount_cents: i64,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    #[ts(type = "number")]
    pub occurred_at: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub created_at: i64,
}

/// A saved settings snapshot. Created by an explicit save action, applied
/// through the settings reconciler, deleted but never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/bindings/")]
pub struct ThemePreset {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub settings: SettingsPatch,
    #[serde(default)]
    #[ts(type = "number")]
    pub created_at: i64,
}

/// The single root aggregate. Owned by the store adapter; every other
/// component works on transient copies returned from `snapshot()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/bindings/")]
pub struct ApplicationState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub current_user_id: Option<String>,
    #[serde(default)]
    pub is_logged_in: bool,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub custom_themes: Vec<ThemePreset>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub rfqs: Vec<Rfq>,
    #[serde(default)]
    pub services: Vec<ServiceItem>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl ApplicationState {
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }
}
