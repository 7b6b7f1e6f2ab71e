//! Notification relay configuration (EmailJS)

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// EmailJS relay settings
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// REST endpoint the notification is posted to
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    pub service_id: String,

    pub template_id: String,

    /// Template for the phone follow-up; the main template when unset
    #[serde(default)]
    pub phone_alert_template_id: Option<String>,

    pub public_key: String,

    /// Where notifications are delivered
    pub recipient: String,

    /// Reply-to used when the visitor left no email address
    #[serde(default = "default_fallback_reply_to")]
    pub fallback_reply_to: String,

    #[serde(default = "default_phone_alert_delay_ms")]
    pub phone_alert_delay_ms: u64,

    /// Upper bound on a single relay request
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl RelayConfig {
    pub fn phone_alert_template(&self) -> &str {
        self.phone_alert_template_id
            .as_deref()
            .unwrap_or(&self.template_id)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validate relay configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.endpoint.starts_with("http") {
            return Err(ValidationError::InvalidEndpoint);
        }
        if self.service_id.is_empty() {
            return Err(ValidationError::MissingRequired("RELAY__SERVICE_ID"));
        }
        if self.template_id.is_empty() {
            return Err(ValidationError::MissingRequired("RELAY__TEMPLATE_ID"));
        }
        if self.public_key.is_empty() {
            return Err(ValidationError::MissingRequired("RELAY__PUBLIC_KEY"));
        }
        if !self.recipient.contains('@') {
            return Err(ValidationError::InvalidRecipient);
        }
        if self.request_timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout);
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            service_id: String::new(),
            template_id: String::new(),
            phone_alert_template_id: None,
            public_key: String::new(),
            recipient: String::new(),
            fallback_reply_to: default_fallback_reply_to(),
            phone_alert_delay_ms: default_phone_alert_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".to_string()
}

fn default_fallback_reply_to() -> String {
    "noreply@example.com".to_string()
}

fn default_phone_alert_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}
