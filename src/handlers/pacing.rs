//! Simulated typing latency

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

const MIN_DELAY: Duration = Duration::from_millis(1);

/// Source of the pause before each bot line is delivered
///
/// Delays are never zero: an instantly delivered bot line would race the
/// visitor's own message.
pub trait Pacer: Send {
    fn next_delay(&mut self) -> Duration;
}

/// Uniform delay in `[min, max)`
#[derive(Debug)]
pub struct RandomPacer {
    min_ms: u64,
    max_ms: u64,
    rng: StdRng,
}

impl RandomPacer {
    /// `max` is raised above `min` if the range would otherwise be empty
    pub fn new(min: Duration, max: Duration) -> Self {
        Self::with_rng(min, max, StdRng::from_entropy())
    }

    /// Deterministic pacer for reproducible runs
    pub fn seeded(min: Duration, max: Duration, seed: u64) -> Self {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }

    fn with_rng(min: Duration, max: Duration, rng: StdRng) -> Self {
        let min_ms = (min.as_millis() as u64).max(1);
        let max_ms = (max.as_millis() as u64).max(min_ms + 1);
        Self { min_ms, max_ms, rng }
    }
}

impl Default for RandomPacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(800), Duration::from_millis(2000))
    }
}

impl Pacer for RandomPacer {
    fn next_delay(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(self.min_ms..self.max_ms))
    }
}

/// Same delay every time
#[derive(Debug, Clone, Copy)]
pub struct FixedPacer {
    delay: Duration,
}

impl FixedPacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: delay.max(MIN_DELAY),
        }
    }
}

impl Pacer for FixedPacer {
    fn next_delay(&mut self) -> Duration {
        self.delay
    }
}
