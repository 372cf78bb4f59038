use std::time::{Duration, Instant};

use crate::foundation::error::{RainError, RainResult};

/// Cooperative processing budget checked between pipeline stages and droplet placements.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// Start a budget of `limit` from now. `None` never expires.
    pub fn new(limit: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    /// A deadline that never expires.
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Build from an optional millisecond limit, as stored in configuration.
    pub fn from_millis(limit_ms: Option<u64>) -> Self {
        Self::new(limit_ms.map(Duration::from_millis))
    }

    /// Time spent since the deadline was started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Fail with [`RainError::Timeout`] once the budget is used up.
    pub fn check(&self, stage: &str) -> RainResult<()> {
        let Some(limit) = self.limit else {
            return Ok(());
        };
        let elapsed = self.elapsed();
        if elapsed >= limit {
            tracing::warn!(stage, ?elapsed, ?limit, "processing deadline exceeded");
            return Err(RainError::Timeout {
                elapsed_ms: elapsed.as_millis() as u64,
                limit_ms: limit.as_millis() as u64,
            });
        }
        Ok(())
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/deadline.rs"]
mod tests;
