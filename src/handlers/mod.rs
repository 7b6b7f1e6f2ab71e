//! Session driver and its pacing seam

pub mod conversation_engine;
pub mod pacing;

pub use conversation_engine::{ConversationEngine, ResponseOutcome};
pub use pacing::{FixedPacer, Pacer, RandomPacer};
