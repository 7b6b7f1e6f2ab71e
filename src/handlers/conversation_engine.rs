//! Conversation engine - drives one session of the contact dialog
//!
//! The engine wraps a [`ContactDialog`] with everything that takes time:
//! bot lines are queued and delivered one at a time after a pacing delay,
//! and the finished record is handed to the notification relay.
//! Events are kept in order and published on a broadcast channel for the
//! presentation shell.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{error, info, warn};

use super::pacing::Pacer;
use crate::aggregate::{
    closing_lines, opening_lines, Advance, BotLine, ContactDialog, ConversationState, FollowUp,
};
use crate::error::DialogResult;
use crate::events::DialogDomainEvent;
use crate::relay::{log_contact_payload, DeliveryOutcome, NotificationRelay};
use crate::value_objects::{
    ContactNotificationPayload, Message, NavigationTarget, SessionId, UserInput,
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// What a call to [`ConversationEngine::submit_user_response`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Blank input, nothing changed
    Rejected,
    /// Free text after the script finished
    Ignored,
    /// Moved to `step` and delivered the next prompt
    Advanced { step: u8 },
    /// Details given, notification attempted and closing lines delivered
    Submitted(DeliveryOutcome),
    /// Post-completion option chosen
    Navigated(Option<NavigationTarget>),
}

/// Async driver for a single visitor session
pub struct ConversationEngine {
    dialog: ContactDialog,
    relay: Arc<dyn NotificationRelay>,
    pacer: Box<dyn Pacer>,
    pending: VecDeque<BotLine>,
    event_log: Vec<DialogDomainEvent>,
    publisher: broadcast::Sender<DialogDomainEvent>,
}

impl ConversationEngine {
    /// Create an engine for a new session
    pub fn new(relay: Arc<dyn NotificationRelay>, pacer: impl Pacer + 'static) -> Self {
        Self::with_session(SessionId::new(), relay, pacer)
    }

    pub fn with_session(
        session_id: SessionId,
        relay: Arc<dyn NotificationRelay>,
        pacer: impl Pacer + 'static,
    ) -> Self {
        let (publisher, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            dialog: ContactDialog::new(session_id),
            relay,
            pacer: Box::new(pacer),
            pending: VecDeque::new(),
            event_log: Vec::new(),
            publisher,
        }
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<DialogDomainEvent> {
        self.publisher.subscribe()
    }

    pub fn session_id(&self) -> SessionId {
        self.dialog.session_id()
    }

    pub fn dialog(&self) -> &ContactDialog {
        &self.dialog
    }

    pub fn state(&self) -> &ConversationState {
        self.dialog.state()
    }

    pub fn transcript(&self) -> &[Message] {
        self.dialog.transcript()
    }

    /// Every event produced so far, in order
    pub fn events(&self) -> &[DialogDomainEvent] {
        &self.event_log
    }

    /// Greet the visitor and ask what brings them here
    ///
    /// Runs at most once per session; later calls return `false` and do nothing.
    pub async fn initialize(&mut self) -> bool {
        let events = self.dialog.start();
        if events.is_empty() {
            return false;
        }
        self.publish(events);
        info!(session_id = %self.session_id(), "contact dialog started");

        for line in opening_lines() {
            self.emit_bot_message(line);
        }
        self.deliver_pending().await;
        true
    }

    /// Queue a bot line; the typing indicator goes up immediately
    ///
    /// Every caller follows up with [`Self::deliver_pending`].
    fn emit_bot_message(&mut self, line: BotLine) {
        self.pending.push_back(line);
        let events = self.dialog.set_typing(true);
        self.publish(events);
    }

    /// Deliver queued bot lines in order, pausing before each one
    async fn deliver_pending(&mut self) {
        while let Some(line) = self.pending.pop_front() {
            let events = self.dialog.set_typing(true);
            self.publish(events);

            tokio::time::sleep(self.pacer.next_delay()).await;

            let events = self.dialog.append_bot_message(line);
            self.publish(events);
            let events = self.dialog.set_typing(false);
            self.publish(events);
        }
    }

    /// Free-text convenience for [`Self::submit_user_response`]
    pub async fn submit_text(&mut self, text: impl Into<String>) -> DialogResult<ResponseOutcome> {
        self.submit_user_response(UserInput::FreeText(text.into())).await
    }

    /// Quick-reply convenience for [`Self::submit_user_response`]
    pub async fn select_option(
        &mut self,
        label: impl Into<String>,
    ) -> DialogResult<ResponseOutcome> {
        self.submit_user_response(UserInput::QuickReply(label.into())).await
    }

    /// Record the visitor's reply and play whatever the script does next
    pub async fn submit_user_response(&mut self, input: UserInput) -> DialogResult<ResponseOutcome> {
        let (events, follow_up) = match self.dialog.advance(&input)? {
            Advance::Rejected => return Ok(ResponseOutcome::Rejected),
            Advance::Ignored => return Ok(ResponseOutcome::Ignored),
            Advance::Accepted { events, follow_up } => (events, follow_up),
        };
        self.publish(events);

        match follow_up {
            FollowUp::Prompt(lines) => {
                for line in lines {
                    self.emit_bot_message(line);
                }
                self.deliver_pending().await;
                Ok(ResponseOutcome::Advanced {
                    step: self.dialog.step(),
                })
            }
            FollowUp::Submit { details } => {
                let outcome = self.run_submission(&details).await?;
                Ok(ResponseOutcome::Submitted(outcome))
            }
            FollowUp::Navigate(target) => {
                if let Some(target) = target {
                    info!(session_id = %self.session_id(), ?target, "navigation requested");
                }
                Ok(ResponseOutcome::Navigated(target))
            }
        }
    }

    async fn run_submission(&mut self, details: &str) -> DialogResult<DeliveryOutcome> {
        let payload = ContactNotificationPayload::assemble(self.dialog.record(), details)?;
        let tone = self.dialog.record().tone();

        let events = self.dialog.begin_submission()?;
        self.publish(events);
        info!(session_id = %self.session_id(), "submitting contact notification");

        let outcome = dispatch(self.relay.as_ref(), self.session_id(), &payload).await;

        for line in closing_lines(outcome, tone) {
            self.emit_bot_message(line);
        }
        self.deliver_pending().await;

        let events = self.dialog.finish_submission(outcome)?;
        self.publish(events);
        Ok(outcome)
    }

    fn publish(&mut self, events: Vec<DialogDomainEvent>) {
        for event in events {
            // No receivers is fine; the shell may not be listening yet
            let _ = self.publisher.send(event.clone());
            self.event_log.push(event);
        }
    }
}

/// Hand the payload to the relay and fold whatever happens into an outcome
async fn dispatch(
    relay: &dyn NotificationRelay,
    session_id: SessionId,
    payload: &ContactNotificationPayload,
) -> DeliveryOutcome {
    let result = relay.send(payload).await;
    match &result {
        Ok(true) => info!(%session_id, "contact notification delivered"),
        Ok(false) => warn!(%session_id, "contact notification not accepted"),
        Err(err) => error!(%session_id, error = %err, "contact notification failed"),
    }

    let outcome = DeliveryOutcome::from_relay_result(&result);
    log_contact_payload(payload, outcome);
    outcome
}
