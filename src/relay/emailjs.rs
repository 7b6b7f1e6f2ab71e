//! EmailJS-backed notification relay

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};

use super::template::{NotificationTemplate, PhoneAlert};
use super::{NotificationRelay, RelayError};
use crate::config::RelayConfig;
use crate::value_objects::ContactNotificationPayload;

#[derive(Debug, Serialize)]
struct SendRequest<'a, T: Serialize> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a T,
}

/// Relay posting to the EmailJS REST endpoint
#[derive(Debug, Clone)]
pub struct EmailJsRelay {
    client: Client,
    config: RelayConfig,
}

impl EmailJsRelay {
    /// Relay with its own client, bounded by `request_timeout_ms`
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| RelayError::Misconfigured(err.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn with_client(client: Client, config: RelayConfig) -> Self {
        Self { client, config }
    }

    async fn post<T: Serialize>(
        client: &Client,
        config: &RelayConfig,
        template_id: &str,
        params: &T,
    ) -> Result<StatusCode, RelayError> {
        let request = SendRequest {
            service_id: &config.service_id,
            template_id,
            user_id: &config.public_key,
            template_params: params,
        };

        let response = client.post(&config.endpoint).json(&request).send().await?;
        Ok(response.status())
    }

    /// Best-effort follow-up; failures are only logged
    fn schedule_phone_alert(&self, alert: PhoneAlert) {
        let client = self.client.clone();
        let config = self.config.clone();
        let delay = Duration::from_millis(config.phone_alert_delay_ms);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let template_id = config.phone_alert_template();
            match Self::post(&client, &config, template_id, &alert).await {
                Ok(status) if status == StatusCode::OK => info!("phone alert sent"),
                Ok(status) => error!(%status, "phone alert rejected"),
                Err(err) => error!(error = %err, "phone alert failed"),
            }
        });
    }
}

#[async_trait]
impl NotificationRelay for EmailJsRelay {
    async fn send(&self, payload: &ContactNotificationPayload) -> Result<bool, RelayError> {
        let now = Utc::now();
        let template = NotificationTemplate::from_payload(
            payload,
            &self.config.recipient,
            &self.config.fallback_reply_to,
            now,
        );

        debug!(subject = %template.subject, "posting contact notification");
        let status = Self::post(&self.client, &self.config, &self.config.template_id, &template).await?;

        if status != StatusCode::OK {
            error!(%status, "contact notification rejected");
            return Ok(false);
        }

        if let Some(alert) = PhoneAlert::from_payload(payload, &self.config.recipient, now) {
            self.schedule_phone_alert(alert);
        }

        Ok(true)
    }
}
