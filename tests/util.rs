#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use opsdesk::{
    Event, EventStatus, NotificationCenter, SilentChime, StoreHandle, Task, User, UserRole,
};

pub fn memory_center() -> (StoreHandle, NotificationCenter) {
    let store = StoreHandle::in_memory();
    let center = NotificationCenter::new(store.clone(), Arc::new(SilentChime));
    (store, center)
}

/// Seed one live event carrying a single incomplete task due in
/// `due_in_hours` hours; returns the event id.
pub fn seed_event_with_task(store: &StoreHandle, title: &str, due_in_hours: i64) -> String {
    let mut event = Event::new(title);
    event.status = EventStatus::InProgress;
    event
        .tasks
        .push(Task::new("confirm vendor").with_due_date(Utc::now() + Duration::hours(due_in_hours)));
    let id = event.id.clone();
    store.mutate(move |state| state.events.push(event)).unwrap();
    id
}

/// Seed an admin and a staff user; returns `(admin_id, staff_id)`.
pub fn seed_users(store: &StoreHandle) -> (String, String) {
    let admin = User::new("Dana", UserRole::Admin);
    let staff = User::new("Riley", UserRole::Staff);
    let ids = (admin.id.clone(), staff.id.clone());
    store
        .mutate(move |state| {
            state.users.push(admin);
            state.users.push(staff);
        })
        .unwrap();
    ids
}
