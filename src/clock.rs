use std::cell::Cell;
use std::time::Duration;

/// Monotonic time since an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Moves to `at`. Never goes backwards.
    pub fn set(&self, at: Duration) {
        if at > self.now.get() {
            self.now.set(at);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Tags armed timeouts so that only the most recently armed one acts.
#[derive(Debug, Default)]
pub struct TimerGeneration {
    current: Cell<u64>,
}

impl TimerGeneration {
    /// Supersedes every earlier token and returns the new one.
    pub fn arm(&self) -> u64 {
        let token = self.current.get().wrapping_add(1);
        self.current.set(token);
        token
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.current.get() == token
    }
}
