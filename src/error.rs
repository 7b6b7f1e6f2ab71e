//! Errors raised by the contact dialog
//!
//! Delivery failures never appear here: the engine folds them into
//! [`DeliveryOutcome`](crate::relay::DeliveryOutcome) before they reach a caller.

use thiserror::Error;

/// Errors produced by the dialog aggregate and engine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DialogError {
    /// An operation was attempted from a step that does not allow it
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    /// Input or data failed validation
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A field the submission requires was never collected
    #[error("contact record is missing required field `{0}`")]
    IncompleteRecord(&'static str),
}

/// Result type used across the dialog
pub type DialogResult<T> = Result<T, DialogError>;
