use std::time::Duration;

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::model::NotificationKind;
use crate::notify::{Cue, NewNotification, NotificationCenter};
use crate::store::StoreHandle;

/// Used when `settings.admin_pin` was never configured (`None`).
pub const DEFAULT_ADMIN_PIN: &str = "1234";
pub const PIN_LENGTH: usize = 4;

/// Keeps the fourth digit visible briefly before the rejection renders.
const REJECT_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Target role needs no elevation; the switch was committed directly.
    Committed,
    ChallengeOpened,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// More digits required, or no challenge is open.
    Pending,
    Verified,
    Rejected,
}

/// Challenge state machine guarding privileged identity switches:
/// `Idle → Challenging → {Verified | Rejected}`. Ephemeral; never persisted.
#[derive(Debug, Default)]
pub struct ElevationGate {
    pending_user_id: Option<String>,
    input_digits: String,
    error_message: Option<String>,
    is_open: bool,
}

impl ElevationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn pending_user_id(&self) -> Option<&str> {
        self.pending_user_id.as_deref()
    }

    pub fn input_len(&self) -> usize {
        self.input_digits.len()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Begin switching the active identity. Elevated roles open the
    /// challenge; everything else commits immediately.
    pub fn request_switch(
        &mut self,
        store: &StoreHandle,
        target_user_id: &str,
    ) -> AppResult<SwitchOutcome> {
        let state = store.snapshot();
        let user = state.user(target_user_id).ok_or_else(|| {
            AppError::new("ELEVATION/UNKNOWN_USER", "No such user")
                .with_context("id", target_user_id.to_string())
        })?;

        if user.role.requires_elevation() {
            self.pending_user_id = Some(user.id.clone());
            self.input_digits.clear();
            self.error_message = None;
            self.is_open = true;
            info!(target: "opsdesk", event = "elevation_challenge_opened", user_id = %target_user_id);
            return Ok(SwitchOutcome::ChallengeOpened);
        }

        let id = user.id.clone();
        store.mutate(move |s| s.current_user_id = Some(id))?;
        info!(target: "opsdesk", event = "identity_switched", user_id = %target_user_id);
        Ok(SwitchOutcome::Committed)
    }

    /// Append one digit. Non-digits and overflow past four are ignored; the
    /// fourth digit triggers verification.
    pub async fn submit_digit(
        &mut self,
        store: &StoreHandle,
        center: &NotificationCenter,
        digit: char,
    ) -> AppResult<ChallengeOutcome> {
        if !self.is_open || !digit.is_ascii_digit() || self.input_digits.len() >= PIN_LENGTH {
            return Ok(ChallengeOutcome::Pending);
        }
        self.input_digits.push(digit);
        if self.input_digits.len() == PIN_LENGTH {
            self.verify(store, center).await
        } else {
            Ok(ChallengeOutcome::Pending)
        }
    }

    /// Compare the entered digits against the configured PIN. The PIN is
    /// read at the moment of comparison; exact string equality only.
    pub async fn verify(
        &mut self,
        store: &StoreHandle,
        center: &NotificationCenter,
    ) -> AppResult<ChallengeOutcome> {
        if !self.is_open {
            return Ok(ChallengeOutcome::Pending);
        }

        let expected = store
            .snapshot()
            .settings
            .admin_pin
            .clone()
            .unwrap_or_else(|| DEFAULT_ADMIN_PIN.to_string());

        if self.input_digits != expected {
            tokio::time::sleep(REJECT_DELAY).await;
            self.error_message = Some("Incorrect PIN. Try again.".to_string());
            self.input_digits.clear();
            center.cue(Cue::Error);
            warn!(target: "opsdesk", event = "elevation_rejected");
            return Ok(ChallengeOutcome::Rejected);
        }

        let Some(target) = self.pending_user_id.clone() else {
            // Challenge open with no pending target is unreachable through
            // the public API; fold it back to idle.
            self.cancel();
            return Ok(ChallengeOutcome::Pending);
        };

        let name = store
            .snapshot()
            .user(&target)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| target.clone());
        {
            let target = target.clone();
            store.mutate(move |s| s.current_user_id = Some(target))?;
        }
        center.push(NewNotification::new(
            "Admin Access",
            format!("Now operating as {name}."),
            NotificationKind::Success,
        ))?;

        self.pending_user_id = None;
        self.input_digits.clear();
        self.error_message = None;
        self.is_open = false;
        info!(target: "opsdesk", event = "elevation_verified", user_id = %target);
        Ok(ChallengeOutcome::Verified)
    }

    /// Discard the pending switch and all input; back to idle.
    pub fn cancel(&mut self) {
        self.pending_user_id = None;
        self.input_digits.clear();
        self.error_message = None;
        self.is_open = false;
    }
}
