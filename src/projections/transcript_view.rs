//! Transcript projection for rendering a session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::DialogProjection;
use crate::events::{ConversationStarted, DialogDomainEvent, DomainEvent};
use crate::relay::DeliveryOutcome;
use crate::value_objects::{ContactField, Message, NavigationTarget, Sender, SessionId};

/// Everything the shell needs to draw one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptView {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub messages: Vec<Message>,
    pub is_typing: bool,
    pub is_submitting: bool,
    pub step: u8,
    pub recorded_fields: HashMap<ContactField, String>,
    pub delivery: Option<DeliveryOutcome>,
    pub navigations: Vec<NavigationTarget>,
}

impl TranscriptView {
    /// Create from a ConversationStarted event
    pub fn from_started(event: &ConversationStarted) -> Self {
        Self {
            session_id: event.session_id,
            started_at: event.started_at,
            messages: Vec::new(),
            is_typing: false,
            is_submitting: false,
            step: 0,
            recorded_fields: HashMap::new(),
            delivery: None,
            navigations: Vec::new(),
        }
    }

    /// Quick replies on offer: those of the latest bot message
    pub fn current_options(&self) -> &[String] {
        self.last_bot_message()
            .map(|m| m.options.as_slice())
            .unwrap_or(&[])
    }

    pub fn last_bot_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.sender == Sender::Bot)
    }

    pub fn messages_from(&self, sender: Sender) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.sender == sender)
    }
}

impl DialogProjection for TranscriptView {
    fn apply_event(&mut self, event: &DialogDomainEvent) {
        match event {
            DialogDomainEvent::ConversationStarted(_) => {
                // Already handled in from_started
            }
            DialogDomainEvent::TypingChanged(e) => {
                self.is_typing = e.is_typing;
            }
            DialogDomainEvent::MessageAppended(e) => {
                self.messages.push(e.message.clone());
            }
            DialogDomainEvent::ContactFieldRecorded(e) => {
                self.recorded_fields.insert(e.field, e.value.clone());
            }
            DialogDomainEvent::StepAdvanced(e) => {
                self.step = e.to;
            }
            DialogDomainEvent::SubmissionStarted(_) => {
                self.is_submitting = true;
            }
            DialogDomainEvent::SubmissionCompleted(e) => {
                self.is_submitting = false;
                self.delivery = Some(e.outcome);
            }
            DialogDomainEvent::NavigationRequested(e) => {
                self.navigations.push(e.target);
            }
        }
    }

    fn id(&self) -> String {
        self.session_id.to_string()
    }
}

/// Keeps one view per session
#[derive(Debug, Default)]
pub struct TranscriptProjectionUpdater {
    views: HashMap<Uuid, TranscriptView>,
}

impl TranscriptProjectionUpdater {
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
        }
    }

    /// Handle a domain event; events for unknown sessions are dropped
    pub fn handle_event(&mut self, event: &DialogDomainEvent) {
        let session_id = event.aggregate_id();

        match event {
            DialogDomainEvent::ConversationStarted(e) => {
                self.views.insert(session_id, TranscriptView::from_started(e));
            }
            _ => {
                if let Some(view) = self.views.get_mut(&session_id) {
                    view.apply_event(event);
                }
            }
        }
    }

    pub fn get_view(&self, session_id: &SessionId) -> Option<&TranscriptView> {
        self.views.get(session_id.as_uuid())
    }

    /// Sessions still waiting on the relay
    pub fn submitting_sessions(&self) -> Vec<&TranscriptView> {
        self.views.values().filter(|v| v.is_submitting).collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
