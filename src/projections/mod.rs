//! Read models for the presentation shell
//!
//! The shell never touches the aggregate; it rebuilds what it renders by
//! applying the event stream to a projection.

use crate::events::DialogDomainEvent;

pub mod transcript_view;

pub use transcript_view::{TranscriptProjectionUpdater, TranscriptView};

/// Common trait for dialog projections
pub trait DialogProjection: Send + Sync {
    /// Update the projection based on an event
    fn apply_event(&mut self, event: &DialogDomainEvent);

    /// Get the projection ID
    fn id(&self) -> String;
}
