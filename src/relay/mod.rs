//! Notification relay port
//!
//! The relay delivers a finished contact record to the site owner. Delivery is
//! best-effort: `Ok(false)` and `Err(_)` both mean "not confirmed", and the
//! engine treats them the same way.

pub mod emailjs;
pub mod template;

pub use emailjs::EmailJsRelay;
pub use template::{NotificationTemplate, PhoneAlert, Urgency};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::value_objects::ContactNotificationPayload;

/// Errors a relay adapter can raise
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay transport failed: {0}")]
    Transport(String),

    #[error("relay is misconfigured: {0}")]
    Misconfigured(String),

    #[error("relay failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(err.to_string())
    }
}

/// Port for delivering contact notifications
#[async_trait]
pub trait NotificationRelay: Send + Sync {
    /// Hand the payload over for delivery; `true` means accepted
    async fn send(&self, payload: &ContactNotificationPayload) -> Result<bool, RelayError>;
}

/// How a submission ended, as far as the visitor is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered,
    NotConfirmed,
}

impl DeliveryOutcome {
    /// Fold a relay result into an outcome
    pub fn from_relay_result(result: &Result<bool, RelayError>) -> Self {
        match result {
            Ok(true) => DeliveryOutcome::Delivered,
            Ok(false) | Err(_) => DeliveryOutcome::NotConfirmed,
        }
    }
}

/// Structured local record of a submission, written whatever the relay said
pub fn log_contact_payload(payload: &ContactNotificationPayload, outcome: DeliveryOutcome) {
    info!(
        name = %payload.name,
        company = payload.company.as_deref().unwrap_or("-"),
        inquiry_type = %payload.inquiry_type,
        contact_method = %payload.contact_method,
        contact_info = payload.contact_info().unwrap_or("Not provided"),
        details = %payload.details,
        outcome = ?outcome,
        "contact form submission"
    );
}

/// What a [`RecordingRelay`] answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingBehavior {
    Accept,
    Decline,
    Fail,
}

/// In-memory relay that keeps every payload it is given
#[derive(Debug)]
pub struct RecordingRelay {
    behavior: RecordingBehavior,
    sent: Mutex<Vec<ContactNotificationPayload>>,
}

impl RecordingRelay {
    pub fn new(behavior: RecordingBehavior) -> Self {
        Self {
            behavior,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new(RecordingBehavior::Accept)
    }

    pub fn declining() -> Self {
        Self::new(RecordingBehavior::Decline)
    }

    pub fn failing() -> Self {
        Self::new(RecordingBehavior::Fail)
    }

    /// Number of `send` calls so far
    pub async fn call_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn payloads(&self) -> Vec<ContactNotificationPayload> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl NotificationRelay for RecordingRelay {
    async fn send(&self, payload: &ContactNotificationPayload) -> Result<bool, RelayError> {
        self.sent.lock().await.push(payload.clone());

        match self.behavior {
            RecordingBehavior::Accept => Ok(true),
            RecordingBehavior::Decline => Ok(false),
            RecordingBehavior::Fail => Err(RelayError::Other("recording relay set to fail".to_string())),
        }
    }
}
