//! Value objects for the contact dialog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{DialogError, DialogResult};

/// Identifier of one visitor session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Monotonic message identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Bot,
    User,
}

/// A single line of the transcript
///
/// Messages are append-only; nothing hands out a mutable reference once a
/// message is in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Allocated by the owning dialog, strictly increasing
    pub id: MessageId,
    /// The rendered text
    pub text: String,
    /// Who wrote it
    pub sender: Sender,
    /// When it entered the transcript
    pub timestamp: DateTime<Utc>,
    /// Quick-reply options offered alongside a bot message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Message {
    /// Create a bot message
    pub fn bot(id: MessageId, text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            options,
        }
    }

    /// Create a user message
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            options: Vec::new(),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

/// What the visitor sent, and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// Typed into the free-text field
    FreeText(String),
    /// A quick-reply option was selected
    QuickReply(String),
}

impl UserInput {
    pub fn text(&self) -> &str {
        match self {
            UserInput::FreeText(text) | UserInput::QuickReply(text) => text,
        }
    }

    pub fn is_quick_reply(&self) -> bool {
        matches!(self, UserInput::QuickReply(_))
    }

    /// Blank input carries nothing to record
    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }
}

/// Preferred way to get back to the visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
    Linkedin,
}

impl ContactMethod {
    /// Loose classification of a free-text preference
    ///
    /// Anything that does not mention a phone or LinkedIn falls back to email.
    pub fn classify(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        if lowered.contains("phone") || lowered.contains("call") {
            ContactMethod::Phone
        } else if lowered.contains("linkedin") {
            ContactMethod::Linkedin
        } else {
            ContactMethod::Email
        }
    }

    /// The record field that holds the detail for this method
    pub fn detail_field(&self) -> ContactField {
        match self {
            ContactMethod::Email => ContactField::Email,
            ContactMethod::Phone => ContactField::Phone,
            ContactMethod::Linkedin => ContactField::Linkedin,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMethod::Email => "email",
            ContactMethod::Phone => "phone",
            ContactMethod::Linkedin => "linkedin",
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tone the script takes, derived from the inquiry text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryTone {
    Sales,
    Hiring,
    Project,
    Collaboration,
    General,
}

impl InquiryTone {
    /// Case-insensitive substring classification, first match wins
    pub fn classify(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        if lowered.contains("sell") {
            InquiryTone::Sales
        } else if lowered.contains("hire") {
            InquiryTone::Hiring
        } else if lowered.contains("project") {
            InquiryTone::Project
        } else if lowered.contains("partner") || lowered.contains("collaborat") {
            InquiryTone::Collaboration
        } else {
            InquiryTone::General
        }
    }
}

/// The closed set of inquiry quick replies offered at the start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryOption {
    Hiring,
    Project,
    Collaborate,
    Sell,
    Network,
}

impl InquiryOption {
    pub const ALL: [InquiryOption; 5] = [
        InquiryOption::Hiring,
        InquiryOption::Project,
        InquiryOption::Collaborate,
        InquiryOption::Sell,
        InquiryOption::Network,
    ];

    /// Sentence shown to the visitor; always contains its tone keyword
    pub fn label(&self) -> &'static str {
        match self {
            InquiryOption::Hiring => "I'm looking to hire someone",
            InquiryOption::Project => "I have a project in mind",
            InquiryOption::Collaborate => "I'd like to collaborate or partner up",
            InquiryOption::Sell => "I have something to sell",
            InquiryOption::Network => "Just networking",
        }
    }

    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|o| o.label().to_string()).collect()
    }
}

/// Fields of the contact record, each written at exactly one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    InquiryType,
    Name,
    Company,
    ContactMethod,
    Email,
    Phone,
    Linkedin,
    Details,
}

/// Everything collected from the visitor so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContactRecord {
    pub name: Option<String>,
    pub company: Option<String>,
    pub inquiry_type: Option<String>,
    pub contact_method: Option<ContactMethod>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub details: Option<String>,
}

impl UserContactRecord {
    /// Write a text field once; later writes are refused
    pub fn record(&mut self, field: ContactField, value: impl Into<String>) -> DialogResult<()> {
        let slot = match field {
            ContactField::InquiryType => &mut self.inquiry_type,
            ContactField::Name => &mut self.name,
            ContactField::Company => &mut self.company,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Linkedin => &mut self.linkedin,
            ContactField::Details => &mut self.details,
            ContactField::ContactMethod => {
                return Err(DialogError::ValidationError(
                    "contact method is recorded with record_contact_method".to_string(),
                ));
            }
        };

        if slot.is_some() {
            return Err(DialogError::ValidationError(format!(
                "{field:?} has already been recorded"
            )));
        }
        *slot = Some(value.into());
        Ok(())
    }

    /// Write the contact method once
    pub fn record_contact_method(&mut self, method: ContactMethod) -> DialogResult<()> {
        if self.contact_method.is_some() {
            return Err(DialogError::ValidationError(
                "ContactMethod has already been recorded".to_string(),
            ));
        }
        self.contact_method = Some(method);
        Ok(())
    }

    /// Tone of the recorded inquiry, `General` when nothing was recorded
    pub fn tone(&self) -> InquiryTone {
        self.inquiry_type
            .as_deref()
            .map(InquiryTone::classify)
            .unwrap_or(InquiryTone::General)
    }
}

/// Immutable snapshot handed to the notification relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactNotificationPayload {
    pub name: String,
    pub company: Option<String>,
    pub inquiry_type: String,
    pub contact_method: ContactMethod,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub details: String,
}

impl ContactNotificationPayload {
    /// Assemble the payload from the record plus the details just submitted
    pub fn assemble(record: &UserContactRecord, details: &str) -> DialogResult<Self> {
        Ok(Self {
            name: record
                .name
                .clone()
                .ok_or(DialogError::IncompleteRecord("name"))?,
            company: record.company.clone(),
            inquiry_type: record
                .inquiry_type
                .clone()
                .ok_or(DialogError::IncompleteRecord("inquiryType"))?,
            contact_method: record
                .contact_method
                .ok_or(DialogError::IncompleteRecord("contactMethod"))?,
            email: record.email.clone(),
            phone: record.phone.clone(),
            linkedin: record.linkedin.clone(),
            details: details.to_string(),
        })
    }

    /// First contact detail available, in email, phone, linkedin order
    pub fn contact_info(&self) -> Option<&str> {
        self.email
            .as_deref()
            .or(self.phone.as_deref())
            .or(self.linkedin.as_deref())
    }
}

/// Where a post-completion option sends the visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTarget {
    Resume,
    Projects,
    Linkedin,
    Home,
}

impl NavigationTarget {
    pub const ALL: [NavigationTarget; 4] = [
        NavigationTarget::Resume,
        NavigationTarget::Projects,
        NavigationTarget::Linkedin,
        NavigationTarget::Home,
    ];

    /// Map an option label to its destination
    pub fn from_label(label: &str) -> Option<Self> {
        let lowered = label.to_lowercase();
        if lowered.contains("resume") {
            Some(NavigationTarget::Resume)
        } else if lowered.contains("project") {
            Some(NavigationTarget::Projects)
        } else if lowered.contains("linkedin") {
            Some(NavigationTarget::Linkedin)
        } else if lowered.contains("home") {
            Some(NavigationTarget::Home)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NavigationTarget::Resume => "View my resume",
            NavigationTarget::Projects => "Explore my projects",
            NavigationTarget::Linkedin => "Connect on LinkedIn",
            NavigationTarget::Home => "Back to home",
        }
    }

    /// Route or URL the shell should open
    pub fn destination(&self) -> &'static str {
        match self {
            NavigationTarget::Resume => "/resume",
            NavigationTarget::Projects => "/projects",
            NavigationTarget::Linkedin => "https://www.linkedin.com/",
            NavigationTarget::Home => "/",
        }
    }

    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|t| t.label().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_classification_is_case_insensitive() {
        assert_eq!(InquiryTone::classify("I want to SELL you a thing"), InquiryTone::Sales);
        assert_eq!(InquiryTone::classify("We'd like to Hire you"), InquiryTone::Hiring);
        assert_eq!(InquiryTone::classify("a PROJECT"), InquiryTone::Project);
        assert_eq!(InquiryTone::classify("partnership"), InquiryTone::Collaboration);
        assert_eq!(InquiryTone::classify("collaboration"), InquiryTone::Collaboration);
        assert_eq!(InquiryTone::classify("hello"), InquiryTone::General);
    }

    #[test]
    fn test_tone_first_match_wins() {
        // "sell" is checked before "project"
        assert_eq!(InquiryTone::classify("sell you a project tool"), InquiryTone::Sales);
    }

    #[test]
    fn test_every_inquiry_label_carries_its_tone() {
        assert_eq!(InquiryTone::classify(InquiryOption::Hiring.label()), InquiryTone::Hiring);
        assert_eq!(InquiryTone::classify(InquiryOption::Project.label()), InquiryTone::Project);
        assert_eq!(
            InquiryTone::classify(InquiryOption::Collaborate.label()),
            InquiryTone::Collaboration
        );
        assert_eq!(InquiryTone::classify(InquiryOption::Sell.label()), InquiryTone::Sales);
        assert_eq!(InquiryTone::classify(InquiryOption::Network.label()), InquiryTone::General);
    }

    #[test]
    fn test_contact_method_classification() {
        assert_eq!(ContactMethod::classify("I'd like a phone call"), ContactMethod::Phone);
        assert_eq!(ContactMethod::classify("just CALL me"), ContactMethod::Phone);
        assert_eq!(ContactMethod::classify("linkedin please"), ContactMethod::Linkedin);
        assert_eq!(ContactMethod::classify("sure"), ContactMethod::Email);
        assert_eq!(ContactMethod::classify("any"), ContactMethod::Email);
    }

    #[test]
    fn test_record_fields_are_write_once() {
        let mut record = UserContactRecord::default();
        record.record(ContactField::Name, "Jane").unwrap();
        assert!(record.record(ContactField::Name, "John").is_err());
        assert_eq!(record.name.as_deref(), Some("Jane"));

        record.record_contact_method(ContactMethod::Phone).unwrap();
        assert!(record.record_contact_method(ContactMethod::Email).is_err());
        assert!(record.record(ContactField::ContactMethod, "email").is_err());
    }

    #[test]
    fn test_payload_requires_core_fields() {
        let mut record = UserContactRecord::default();
        assert_eq!(
            ContactNotificationPayload::assemble(&record, "hi"),
            Err(DialogError::IncompleteRecord("name"))
        );

        record.record(ContactField::Name, "Jane").unwrap();
        record.record(ContactField::InquiryType, "hiring").unwrap();
        record.record_contact_method(ContactMethod::Linkedin).unwrap();
        record.record(ContactField::Linkedin, "in/jane").unwrap();

        let payload = ContactNotificationPayload::assemble(&record, "details").unwrap();
        assert_eq!(payload.details, "details");
        assert_eq!(payload.contact_info(), Some("in/jane"));
    }

    #[test]
    fn test_navigation_targets_from_labels() {
        for target in NavigationTarget::ALL {
            assert_eq!(NavigationTarget::from_label(target.label()), Some(target));
        }
        assert_eq!(NavigationTarget::from_label("something else"), None);
    }

    #[test]
    fn test_blank_input() {
        assert!(UserInput::FreeText("   \t".to_string()).is_blank());
        assert!(!UserInput::QuickReply("email".to_string()).is_blank());
    }
}
