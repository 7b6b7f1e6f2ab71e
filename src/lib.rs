//! Contact dialog domain module
//!
//! A scripted, step-indexed conversation that collects a visitor's contact
//! details on a portfolio site and forwards them to the owner. It provides:
//! - A fixed seven-step script with loose, never-blocking input classification
//! - An append-only transcript with paced bot replies and a typing indicator
//! - A single best-effort notification per session with graceful fallback copy
//! - An event stream and transcript projection for the presentation shell
//!
//! The dialog cannot trap a visitor: unrecognised replies fall through to the
//! default branch and relay failures only change one line of copy.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod events;
pub mod handlers;
pub mod projections;
pub mod relay;
pub mod value_objects;

// Re-export main types
pub use aggregate::{
    process_step, Advance, BotLine, ContactDialog, ConversationState, FollowUp, RecordUpdate,
    StepOutcome, TERMINAL_STEP,
};

pub use config::{AppConfig, ConfigError, PacingConfig, RelayConfig, ValidationError};

pub use error::{DialogError, DialogResult};

pub use events::{
    ContactFieldRecorded, ConversationStarted, DialogDomainEvent, DomainEvent, MessageAppended,
    NavigationRequested, StepAdvanced, SubmissionCompleted, SubmissionStarted, TypingChanged,
};

pub use handlers::{ConversationEngine, FixedPacer, Pacer, RandomPacer, ResponseOutcome};
pub use projections::{DialogProjection, TranscriptProjectionUpdater, TranscriptView};

pub use relay::{
    DeliveryOutcome, EmailJsRelay, NotificationRelay, NotificationTemplate, RecordingRelay,
    RelayError,
};

pub use value_objects::{
    ContactField, ContactMethod, ContactNotificationPayload, InquiryOption, InquiryTone, Message,
    MessageId, NavigationTarget, Sender, SessionId, UserContactRecord, UserInput,
};
