use listwarden_domain::RefreshSummary;
use std::time::Duration;

/// Delay before the first retry after a failed cycle.
pub const INITIAL_DELAY: Duration = Duration::from_secs(5);
/// Ceiling for the delay between scheduled cycles.
pub const MAX_DELAY: Duration = Duration::from_secs(60 * 60);

/// Delay between scheduled refresh cycles.
///
/// Starts short so a boot without network recovers quickly, doubles on
/// every total network failure, and jumps to the ceiling as soon as a
/// cycle reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshBackoff {
    current: Duration,
    max: Duration,
}

impl RefreshBackoff {
    pub fn new() -> Self {
        Self::with_bounds(INITIAL_DELAY, MAX_DELAY)
    }

    pub fn with_bounds(initial: Duration, max: Duration) -> Self {
        Self {
            current: initial.min(max),
            max,
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    /// Feed one cycle's outcome and return the delay before the next.
    ///
    /// `None` means the cycle did not run (refresh disabled or another
    /// cycle in progress) and leaves the delay as it is.
    pub fn record(&mut self, outcome: Option<&RefreshSummary>) -> Duration {
        match outcome {
            None => {}
            Some(summary) if summary.network_error => {
                self.current = self.current.saturating_mul(2).min(self.max);
            }
            Some(_) => self.current = self.max,
        }
        self.current
    }
}

impl Default for RefreshBackoff {
    fn default() -> Self {
        Self::new()
    }
}
