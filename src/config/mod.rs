//! Application configuration
//!
//! Loaded from environment variables with the `CONTACT_DIALOG` prefix; nested
//! values use `__` as the separator, e.g.
//! `CONTACT_DIALOG__PACING__MIN_DELAY_MS=900` or
//! `CONTACT_DIALOG__RELAY__SERVICE_ID=service_abc`.

mod error;
mod pacing;
mod relay;

pub use error::{ConfigError, ValidationError};
pub use pacing::PacingConfig;
pub use relay::RelayConfig;

use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::relay::{EmailJsRelay, NotificationRelay, RecordingRelay, RelayError};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Typing delay bounds
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Relay settings; without them submissions are only logged locally
    #[serde(default)]
    pub relay: Option<RelayConfig>,
}

impl AppConfig {
    /// Load and validate configuration from `.env` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values are missing, cannot be parsed, or fail validation.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CONTACT_DIALOG")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pacing.validate()?;
        if let Some(relay) = &self.relay {
            relay.validate()?;
        }
        Ok(())
    }

    /// Relay for this configuration
    ///
    /// Without relay settings nothing leaves the process: the returned relay
    /// declines every payload, so visitors get the backup acknowledgement and
    /// the payload only reaches the local log.
    pub fn notification_relay(&self) -> Result<Arc<dyn NotificationRelay>, RelayError> {
        match &self.relay {
            Some(relay) => Ok(Arc::new(EmailJsRelay::new(relay.clone())?)),
            None => {
                warn!("no relay configured, contact submissions are only logged");
                Ok(Arc::new(RecordingRelay::declining()))
            }
        }
    }
}
