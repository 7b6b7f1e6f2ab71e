//! Contact dialog aggregate - one visitor's scripted conversation
//!
//! The aggregate owns everything a session accumulates:
//! - The append-only transcript
//! - The step position and the contact record being filled in
//! - Typing and submission flags the presentation shell reacts to
//! - The one-shot start latch
//!
//! Every mutation returns the events it produced. Timing and the relay call
//! live in [`crate::handlers::ConversationEngine`]; this module is synchronous.

pub mod script;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DialogError, DialogResult};
use crate::events::{
    ContactFieldRecorded, ConversationStarted, DialogDomainEvent, MessageAppended,
    NavigationRequested, StepAdvanced, SubmissionCompleted, SubmissionStarted, TypingChanged,
};
use crate::relay::DeliveryOutcome;
use crate::value_objects::{
    ContactField, ContactMethod, InquiryOption, InquiryTone, Message, MessageId,
    NavigationTarget, SessionId, UserContactRecord, UserInput,
};

/// Step reached once the details have been given
pub const TERMINAL_STEP: u8 = 6;

/// Reactive state of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    /// Position in the script, 0 through 6
    pub step: u8,
    /// Answers collected so far
    pub collected_data: UserContactRecord,
    /// Typing indicator
    pub is_typing: bool,
    /// Set while the notification is in flight and the closing lines play
    pub is_submitting: bool,
}

impl ConversationState {
    pub fn is_terminal(&self) -> bool {
        self.step >= TERMINAL_STEP
    }
}

/// A bot line waiting to be delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotLine {
    pub text: String,
    pub options: Vec<String>,
}

impl BotLine {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }
}

/// Write the step processor asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordUpdate {
    Field(ContactField, String),
    ContactMethod(ContactMethod),
}

/// What has to happen after a step has been processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    /// Deliver these bot lines in order
    Prompt(Vec<BotLine>),
    /// Run the submission sequence with the details just given
    Submit { details: String },
    /// Post-completion option, with its destination if the label has one
    Navigate(Option<NavigationTarget>),
}

/// Result of the pure step processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub next_step: u8,
    pub update: Option<RecordUpdate>,
    pub follow_up: FollowUp,
}

/// Opening lines scheduled when a session starts
pub fn opening_lines() -> Vec<BotLine> {
    vec![
        BotLine::text(script::GREETING),
        BotLine::with_options(script::INQUIRY_PROMPT, InquiryOption::labels()),
    ]
}

/// Closing lines played after submission, in order
pub fn closing_lines(outcome: DeliveryOutcome, tone: InquiryTone) -> Vec<BotLine> {
    vec![
        BotLine::text(script::acknowledgement(outcome)),
        BotLine::text(script::expected_response_time(tone)),
        BotLine::text(script::THANK_YOU),
        BotLine::with_options(script::FINAL_PROMPT, NavigationTarget::labels()),
    ]
}

/// Decide what a reply at `step` does
///
/// Pure: nothing is mutated, the caller applies the outcome. Unrecognised text
/// always falls through to the default branch.
pub fn process_step(
    step: u8,
    raw_text: &str,
    record: &UserContactRecord,
) -> DialogResult<StepOutcome> {
    let outcome = match step {
        0 => StepOutcome {
            next_step: 1,
            update: Some(RecordUpdate::Field(ContactField::InquiryType, raw_text.to_string())),
            follow_up: FollowUp::Prompt(vec![BotLine::text(script::ask_name(
                InquiryTone::classify(raw_text),
            ))]),
        },
        1 => StepOutcome {
            next_step: 2,
            update: Some(RecordUpdate::Field(ContactField::Name, raw_text.to_string())),
            follow_up: FollowUp::Prompt(vec![BotLine::text(script::ask_company(
                raw_text,
                record.tone(),
            ))]),
        },
        2 => StepOutcome {
            next_step: 3,
            update: Some(RecordUpdate::Field(ContactField::Company, raw_text.to_string())),
            follow_up: FollowUp::Prompt(vec![BotLine::with_options(
                script::CONTACT_PREFERENCE_PROMPT,
                script::CONTACT_PREFERENCE_OPTIONS
                    .iter()
                    .map(|o| o.to_string())
                    .collect(),
            )]),
        },
        3 => {
            let method = ContactMethod::classify(raw_text);
            StepOutcome {
                next_step: 4,
                update: Some(RecordUpdate::ContactMethod(method)),
                follow_up: FollowUp::Prompt(vec![BotLine::text(script::ask_contact_detail(
                    method,
                ))]),
            }
        }
        4 => {
            let method = record
                .contact_method
                .ok_or(DialogError::IncompleteRecord("contactMethod"))?;
            StepOutcome {
                next_step: 5,
                update: Some(RecordUpdate::Field(method.detail_field(), raw_text.to_string())),
                follow_up: FollowUp::Prompt(vec![BotLine::text(script::DETAILS_PROMPT)]),
            }
        }
        5 => StepOutcome {
            next_step: TERMINAL_STEP,
            update: Some(RecordUpdate::Field(ContactField::Details, raw_text.to_string())),
            follow_up: FollowUp::Submit {
                details: raw_text.to_string(),
            },
        },
        TERMINAL_STEP => StepOutcome {
            next_step: TERMINAL_STEP,
            update: None,
            follow_up: FollowUp::Navigate(NavigationTarget::from_label(raw_text)),
        },
        other => {
            return Err(DialogError::InvalidStateTransition {
                from: format!("step {other}"),
                to: "any step (unknown step value)".to_string(),
            });
        }
    };

    Ok(outcome)
}

/// Result of feeding one input to the aggregate
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Blank free text, nothing changed
    Rejected,
    /// Free text after the script finished, nothing changed
    Ignored,
    /// The input was accepted
    Accepted {
        events: Vec<DialogDomainEvent>,
        follow_up: FollowUp,
    },
}

/// Contact dialog aggregate root
#[derive(Debug, Clone)]
pub struct ContactDialog {
    session_id: SessionId,
    state: ConversationState,
    transcript: Vec<Message>,
    next_message_id: u64,
    /// One-shot start latch, kept outside the reactive state
    started: bool,
    version: u64,
}

impl ContactDialog {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            state: ConversationState::default(),
            transcript: Vec::new(),
            next_message_id: 1,
            started: false,
            version: 0,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn step(&self) -> u8 {
        self.state.step
    }

    pub fn record(&self) -> &UserContactRecord {
        &self.state.collected_data
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Trip the start latch
    ///
    /// Returns no events when the session has already started; the latch never resets.
    pub fn start(&mut self) -> Vec<DialogDomainEvent> {
        if self.started {
            return Vec::new();
        }
        self.started = true;
        self.version += 1;

        vec![DialogDomainEvent::ConversationStarted(ConversationStarted {
            session_id: self.session_id,
            started_at: Utc::now(),
        })]
    }

    /// Toggle the typing indicator, no event when the value is unchanged
    pub fn set_typing(&mut self, is_typing: bool) -> Vec<DialogDomainEvent> {
        if self.state.is_typing == is_typing {
            return Vec::new();
        }
        self.state.is_typing = is_typing;
        self.version += 1;

        vec![DialogDomainEvent::TypingChanged(TypingChanged {
            session_id: self.session_id,
            is_typing,
        })]
    }

    /// Append a bot line to the transcript
    pub fn append_bot_message(&mut self, line: BotLine) -> Vec<DialogDomainEvent> {
        let message = Message::bot(self.allocate_id(), line.text, line.options);
        self.push_message(message)
    }

    fn append_user_message(&mut self, text: &str) -> Vec<DialogDomainEvent> {
        let message = Message::user(self.allocate_id(), text);
        self.push_message(message)
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_message_id);
        self.next_message_id += 1;
        id
    }

    fn push_message(&mut self, message: Message) -> Vec<DialogDomainEvent> {
        debug!(session_id = %self.session_id, id = message.id.0, sender = ?message.sender, "message appended");
        self.transcript.push(message.clone());
        self.version += 1;

        vec![DialogDomainEvent::MessageAppended(MessageAppended {
            session_id: self.session_id,
            message,
        })]
    }

    /// Feed one visitor input through the step table
    pub fn advance(&mut self, input: &UserInput) -> DialogResult<Advance> {
        if input.is_blank() {
            return Ok(Advance::Rejected);
        }
        if self.state.is_terminal() && !input.is_quick_reply() {
            return Ok(Advance::Ignored);
        }
        if self.state.is_submitting {
            return Err(DialogError::InvalidStateTransition {
                from: "submitting".to_string(),
                to: format!("step {}", self.state.step),
            });
        }

        let raw_text = input.text();
        let outcome = process_step(self.state.step, raw_text, &self.state.collected_data)?;

        let mut events = self.append_user_message(raw_text);

        if let Some(update) = outcome.update {
            events.extend(self.apply_update(update)?);
        }

        if outcome.next_step != self.state.step {
            let from = self.state.step;
            self.state.step = outcome.next_step;
            self.version += 1;
            debug!(session_id = %self.session_id, from, to = outcome.next_step, "step advanced");
            events.push(DialogDomainEvent::StepAdvanced(StepAdvanced {
                session_id: self.session_id,
                from,
                to: outcome.next_step,
            }));
        }

        if let FollowUp::Navigate(Some(target)) = &outcome.follow_up {
            events.push(DialogDomainEvent::NavigationRequested(NavigationRequested {
                session_id: self.session_id,
                target: *target,
                requested_at: Utc::now(),
            }));
        }

        Ok(Advance::Accepted {
            events,
            follow_up: outcome.follow_up,
        })
    }

    fn apply_update(&mut self, update: RecordUpdate) -> DialogResult<Vec<DialogDomainEvent>> {
        let (field, value) = match update {
            RecordUpdate::Field(field, value) => {
                self.state.collected_data.record(field, value.clone())?;
                (field, value)
            }
            RecordUpdate::ContactMethod(method) => {
                self.state.collected_data.record_contact_method(method)?;
                (ContactField::ContactMethod, method.to_string())
            }
        };
        self.version += 1;

        Ok(vec![DialogDomainEvent::ContactFieldRecorded(ContactFieldRecorded {
            session_id: self.session_id,
            field,
            value,
        })])
    }

    /// Mark the notification as in flight
    pub fn begin_submission(&mut self) -> DialogResult<Vec<DialogDomainEvent>> {
        if self.state.is_submitting {
            return Err(DialogError::InvalidStateTransition {
                from: "submitting".to_string(),
                to: "submitting".to_string(),
            });
        }
        if !self.state.is_terminal() {
            return Err(DialogError::InvalidStateTransition {
                from: format!("step {}", self.state.step),
                to: "submitting (requires the final step)".to_string(),
            });
        }

        self.state.is_submitting = true;
        self.version += 1;

        Ok(vec![DialogDomainEvent::SubmissionStarted(SubmissionStarted {
            session_id: self.session_id,
            started_at: Utc::now(),
        })])
    }

    /// Clear the submission flag once the closing lines have played
    pub fn finish_submission(
        &mut self,
        outcome: DeliveryOutcome,
    ) -> DialogResult<Vec<DialogDomainEvent>> {
        if !self.state.is_submitting {
            return Err(DialogError::InvalidStateTransition {
                from: "idle".to_string(),
                to: "submission finished".to_string(),
            });
        }

        self.state.is_submitting = false;
        self.version += 1;

        Ok(vec![DialogDomainEvent::SubmissionCompleted(SubmissionCompleted {
            session_id: self.session_id,
            outcome,
            completed_at: Utc::now(),
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_step_is_a_defect() {
        let record = UserContactRecord::default();
        assert!(matches!(
            process_step(7, "anything", &record),
            Err(DialogError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_sales_tone_changes_company_wording() {
        let mut record = UserContactRecord::default();
        record
            .record(ContactField::InquiryType, "I have something to sell")
            .unwrap();

        let outcome = process_step(1, "Sam", &record).unwrap();
        let FollowUp::Prompt(lines) = outcome.follow_up else {
            panic!("expected a prompt");
        };
        assert_eq!(lines[0].text, script::ask_company("Sam", InquiryTone::Sales));
        assert!(lines[0].text.contains("representing"));
    }

    #[test]
    fn test_detail_step_without_method_is_a_defect() {
        let record = UserContactRecord::default();
        assert_eq!(
            process_step(4, "jane@example.com", &record),
            Err(DialogError::IncompleteRecord("contactMethod"))
        );
    }

    #[test]
    fn test_start_latch_never_resets() {
        let mut dialog = ContactDialog::new(SessionId::new());
        assert_eq!(dialog.start().len(), 1);
        assert!(dialog.start().is_empty());
        assert!(dialog.has_started());
    }

    #[test]
    fn test_message_ids_are_monotonic() {
        let mut dialog = ContactDialog::new(SessionId::new());
        dialog.append_bot_message(BotLine::text("one"));
        dialog.append_bot_message(BotLine::text("two"));
        dialog.advance(&UserInput::FreeText("hiring".to_string())).unwrap();

        let ids: Vec<u64> = dialog.transcript().iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_submission_requires_terminal_step() {
        let mut dialog = ContactDialog::new(SessionId::new());
        assert!(dialog.begin_submission().is_err());
        assert!(dialog.finish_submission(DeliveryOutcome::Delivered).is_err());
    }
}
