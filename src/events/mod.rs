//! Contact dialog domain events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::relay::DeliveryOutcome;
use crate::value_objects::{ContactField, Message, NavigationTarget, SessionId};

/// Common surface of every dialog event
pub trait DomainEvent {
    /// Subject the event is published under
    fn subject(&self) -> String;

    /// Session the event belongs to
    fn aggregate_id(&self) -> Uuid;

    fn event_type(&self) -> &'static str;
}

/// Session opened and the greeting was scheduled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationStarted {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
}

impl DomainEvent for ConversationStarted {
    fn subject(&self) -> String {
        "contact.dialog.started.v1".to_string()
    }

    fn aggregate_id(&self) -> Uuid {
        *self.session_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        "ConversationStarted"
    }
}

/// Typing indicator toggled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingChanged {
    pub session_id: SessionId,
    pub is_typing: bool,
}

impl DomainEvent for TypingChanged {
    fn subject(&self) -> String {
        "contact.dialog.typing.changed.v1".to_string()
    }

    fn aggregate_id(&self) -> Uuid {
        *self.session_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        "TypingChanged"
    }
}

/// A message entered the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAppended {
    pub session_id: SessionId,
    pub message: Message,
}

impl DomainEvent for MessageAppended {
    fn subject(&self) -> String {
        "contact.dialog.message.appended.v1".to_string()
    }

    fn aggregate_id(&self) -> Uuid {
        *self.session_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        "MessageAppended"
    }
}

/// A contact record field was written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactFieldRecorded {
    pub session_id: SessionId,
    pub field: ContactField,
    pub value: String,
}

impl DomainEvent for ContactFieldRecorded {
    fn subject(&self) -> String {
        "contact.dialog.field.recorded.v1".to_string()
    }

    fn aggregate_id(&self) -> Uuid {
        *self.session_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        "ContactFieldRecorded"
    }
}

/// The dialog moved one step forward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepAdvanced {
    pub session_id: SessionId,
    pub from: u8,
    pub to: u8,
}

impl DomainEvent for StepAdvanced {
    fn subject(&self) -> String {
        "contact.dialog.step.advanced.v1".to_string()
    }

    fn aggregate_id(&self) -> Uuid {
        *self.session_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        "StepAdvanced"
    }
}

/// Submission to the relay began
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionStarted {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
}

impl DomainEvent for SubmissionStarted {
    fn subject(&self) -> String {
        "contact.dialog.submission.started.v1".to_string()
    }

    fn aggregate_id(&self) -> Uuid {
        *self.session_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        "SubmissionStarted"
    }
}

/// Closing sequence delivered and submission cleared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionCompleted {
    pub session_id: SessionId,
    pub outcome: DeliveryOutcome,
    pub completed_at: DateTime<Utc>,
}

impl DomainEvent for SubmissionCompleted {
    fn subject(&self) -> String {
        "contact.dialog.submission.completed.v1".to_string()
    }

    fn aggregate_id(&self) -> Uuid {
        *self.session_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        "SubmissionCompleted"
    }
}

/// A post-completion option asked the shell to navigate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationRequested {
    pub session_id: SessionId,
    pub target: NavigationTarget,
    pub requested_at: DateTime<Utc>,
}

impl DomainEvent for NavigationRequested {
    fn subject(&self) -> String {
        "contact.dialog.navigation.requested.v1".to_string()
    }

    fn aggregate_id(&self) -> Uuid {
        *self.session_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        "NavigationRequested"
    }
}

/// Every event the dialog can emit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DialogDomainEvent {
    ConversationStarted(ConversationStarted),
    TypingChanged(TypingChanged),
    MessageAppended(MessageAppended),
    ContactFieldRecorded(ContactFieldRecorded),
    StepAdvanced(StepAdvanced),
    SubmissionStarted(SubmissionStarted),
    SubmissionCompleted(SubmissionCompleted),
    NavigationRequested(NavigationRequested),
}

impl DialogDomainEvent {
    fn inner(&self) -> &dyn DomainEvent {
        match self {
            DialogDomainEvent::ConversationStarted(e) => e,
            DialogDomainEvent::TypingChanged(e) => e,
            DialogDomainEvent::MessageAppended(e) => e,
            DialogDomainEvent::ContactFieldRecorded(e) => e,
            DialogDomainEvent::StepAdvanced(e) => e,
            DialogDomainEvent::SubmissionStarted(e) => e,
            DialogDomainEvent::SubmissionCompleted(e) => e,
            DialogDomainEvent::NavigationRequested(e) => e,
        }
    }
}

impl DomainEvent for DialogDomainEvent {
    fn subject(&self) -> String {
        self.inner().subject()
    }

    fn aggregate_id(&self) -> Uuid {
        self.inner().aggregate_id()
    }

    fn event_type(&self) -> &'static str {
        self.inner().event_type()
    }
}
