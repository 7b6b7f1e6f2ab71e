//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Typing delay must be greater than zero")]
    ZeroDelay,

    #[error("Typing delay range is empty (min {min_ms}ms >= max {max_ms}ms)")]
    EmptyDelayRange { min_ms: u64, max_ms: u64 },

    #[error("Typing delay range {min_ms}..{max_ms}ms leaves the 800..2000ms band")]
    DelayOutOfBand { min_ms: u64, max_ms: u64 },

    #[error("Relay request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Relay endpoint must be an http(s) URL")]
    InvalidEndpoint,

    #[error("Invalid recipient email address")]
    InvalidRecipient,
}
