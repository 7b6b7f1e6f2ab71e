//! Email template parameters derived from a contact payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ContactMethod, ContactNotificationPayload};

const ALERT_SUMMARY_LIMIT: usize = 100;

/// Priority flag carried into the email subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    High,
    Normal,
}

impl Urgency {
    /// Hiring inquiries jump the queue
    pub fn for_inquiry(inquiry_type: &str) -> Self {
        if inquiry_type.to_lowercase().contains("hire") {
            Urgency::High
        } else {
            Urgency::Normal
        }
    }
}

/// Parameters for the primary notification email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTemplate {
    pub to_email: String,
    pub from_name: String,
    pub from_company: String,
    pub inquiry_type: String,
    pub contact_method: ContactMethod,
    pub contact_info: String,
    pub message_details: String,
    pub timestamp: String,
    pub reply_to: String,
    pub urgency: Urgency,
    pub phone_preferred: String,
    pub phone_number: String,
    pub subject: String,
}

impl NotificationTemplate {
    pub fn from_payload(
        payload: &ContactNotificationPayload,
        recipient: &str,
        fallback_reply_to: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let urgency = Urgency::for_inquiry(&payload.inquiry_type);
        let prefix = match urgency {
            Urgency::High => "URGENT: ",
            Urgency::Normal => "",
        };
        let phone_preferred = if payload.contact_method == ContactMethod::Phone {
            "YES - Please call instead of email"
        } else {
            "No"
        };

        Self {
            to_email: recipient.to_string(),
            from_name: payload.name.clone(),
            from_company: payload
                .company
                .clone()
                .unwrap_or_else(|| "Not specified".to_string()),
            inquiry_type: payload.inquiry_type.clone(),
            contact_method: payload.contact_method,
            contact_info: payload.contact_info().unwrap_or("Not provided").to_string(),
            message_details: payload.details.clone(),
            timestamp: now.to_rfc2822(),
            reply_to: payload
                .email
                .clone()
                .unwrap_or_else(|| fallback_reply_to.to_string()),
            urgency,
            phone_preferred: phone_preferred.to_string(),
            phone_number: payload
                .phone
                .clone()
                .unwrap_or_else(|| "Not provided".to_string()),
            subject: format!(
                "{prefix}New Contact: {} - {}",
                payload.name, payload.inquiry_type
            ),
        }
    }
}

/// Short "call me back" alert sent when the visitor prefers the phone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneAlert {
    pub to_email: String,
    pub subject: String,
    pub message: String,
    pub from_name: String,
    pub timestamp: String,
}

impl PhoneAlert {
    /// `None` unless the visitor chose the phone and left a number
    pub fn from_payload(
        payload: &ContactNotificationPayload,
        recipient: &str,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        if payload.contact_method != ContactMethod::Phone {
            return None;
        }
        let phone = payload.phone.as_deref()?;

        let company = payload.company.as_deref().unwrap_or("unspecified company");
        let message = format!(
            "{} from {} wants to discuss: {}\n\nThey prefer PHONE contact: {}\n\nQuick summary: {}\n\nCall them back or send full details via email.",
            payload.name,
            company,
            payload.inquiry_type,
            phone,
            summarize(&payload.details),
        );

        Some(Self {
            to_email: recipient.to_string(),
            subject: format!("Call request: {} wants you to call {}", payload.name, phone),
            message,
            from_name: "Portfolio Contact Bot".to_string(),
            timestamp: now.to_rfc2822(),
        })
    }
}

fn summarize(details: &str) -> String {
    if details.chars().count() > ALERT_SUMMARY_LIMIT {
        let head: String = details.chars().take(ALERT_SUMMARY_LIMIT).collect();
        format!("{head}...")
    } else {
        details.to_string()
    }
}
