use std::time::Duration;

/// Single cancellable delayed task driven by host-supplied elapsed time.
///
/// At most one run is pending. [`RecomputeTask::schedule`] cancels any
/// pending run before arming a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecomputeTask {
    delay: Duration,
    remaining: Option<Duration>,
    generation: u64,
}

impl RecomputeTask {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            remaining: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Increments on every schedule; lets callers tell runs apart.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn schedule(&mut self) {
        self.cancel();
        self.remaining = Some(self.delay);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Advances the task clock. Returns `true` exactly once when a pending
    /// run becomes due.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        match remaining.checked_sub(elapsed) {
            Some(left) if !left.is_zero() => {
                self.remaining = Some(left);
                false
            }
            _ => {
                self.remaining = None;
                true
            }
        }
    }
}
