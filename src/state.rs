use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;
use tracing::info;

use crate::deadline::{DeadlineMonitor, MonitorConfig};
use crate::elevation::ElevationGate;
use crate::error::AppResult;
use crate::notify::{Chime, NotificationCenter};
use crate::store::StoreHandle;

/// Handle aggregate the shell keeps for the lifetime of a session. Owns the
/// deadline monitor: started on login, stopped on logout.
pub struct AppState {
    store: StoreHandle,
    notifications: NotificationCenter,
    elevation: AsyncMutex<ElevationGate>,
    monitor: Mutex<Option<DeadlineMonitor>>,
    monitor_config: MonitorConfig,
}

impl AppState {
    pub fn new(store: StoreHandle, chime: Arc<dyn Chime>) -> Self {
        let notifications = NotificationCenter::new(store.clone(), chime);
        AppState {
            store,
            notifications,
            elevation: AsyncMutex::new(ElevationGate::new()),
            monitor: Mutex::new(None),
            monitor_config: MonitorConfig::default(),
        }
    }

    pub fn with_monitor_config(mut self, config: MonitorConfig) -> Self {
        self.monitor_config = config;
        self
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn elevation(&self) -> &AsyncMutex<ElevationGate> {
        &self.elevation
    }

    pub fn monitor_running(&self) -> bool {
        self.monitor
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Open a session: commit the identity, then start the deadline
    /// monitor. Must run inside a tokio runtime.
    pub fn login(&self, user_id: &str) -> AppResult<()> {
        let id = user_id.to_string();
        self.store.mutate(move |state| {
            state.current_user_id = Some(id);
            state.is_logged_in = true;
        })?;

        let mut guard = self.monitor.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_none() {
            *guard = Some(DeadlineMonitor::start(
                self.store.clone(),
                self.notifications.clone(),
                self.monitor_config.clone(),
            ));
        }
        drop(guard);

        info!(target: "opsdesk", event = "session_started", user_id = %user_id);
        Ok(())
    }

    /// Tear the session down: stop the monitor, drop any open challenge,
    /// clear the identity.
    pub async fn logout(&self) -> AppResult<()> {
        let monitor = self
            .monitor
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(monitor) = monitor {
            monitor.stop().await;
        }
        self.elevation.lock().await.cancel();
        self.store.mutate(|state| {
            state.is_logged_in = false;
            state.current_user_id = None;
        })?;
        info!(target: "opsdesk", event = "session_ended");
        Ok(())
    }
}
