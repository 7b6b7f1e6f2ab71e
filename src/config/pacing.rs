//! Typing latency configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::handlers::RandomPacer;

/// Lowest configurable delay
pub const MIN_DELAY_FLOOR_MS: u64 = 800;

/// Highest configurable (exclusive) upper bound
pub const MAX_DELAY_CEILING_MS: u64 = 2000;

/// Bounds of the simulated typing delay, in milliseconds
///
/// Both bounds must stay inside `[800, 2000)`; tests that need other delays
/// build a `FixedPacer` or `RandomPacer` directly.
#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Exclusive upper bound
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl PacingConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Validate pacing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_delay_ms == 0 {
            return Err(ValidationError::ZeroDelay);
        }
        if self.min_delay_ms >= self.max_delay_ms {
            return Err(ValidationError::EmptyDelayRange {
                min_ms: self.min_delay_ms,
                max_ms: self.max_delay_ms,
            });
        }
        if self.min_delay_ms < MIN_DELAY_FLOOR_MS || self.max_delay_ms > MAX_DELAY_CEILING_MS {
            return Err(ValidationError::DelayOutOfBand {
                min_ms: self.min_delay_ms,
                max_ms: self.max_delay_ms,
            });
        }
        Ok(())
    }

    /// Build the pacer these bounds describe
    pub fn pacer(&self) -> Result<RandomPacer, ValidationError> {
        self.validate()?;
        Ok(RandomPacer::new(self.min_delay(), self.max_delay()))
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_min_delay_ms() -> u64 {
    MIN_DELAY_FLOOR_MS
}

fn default_max_delay_ms() -> u64 {
    MAX_DELAY_CEILING_MS
}
