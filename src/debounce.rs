use std::time::{Duration, Instant};

/// Coalesces bursts of triggers into one trailing-edge firing.
///
/// The debouncer owns no timer. The caller passes `now` in and polls, so
/// the same code runs off the system clock or a hand-driven test clock.
/// Each trigger pushes the deadline out again, so the effect fires once
/// the triggers have been quiet for `quiet`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Debouncer {
            quiet,
            deadline: None,
        }
    }

    /// Arms (or re-arms) the debouncer.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once per burst, when the quiet period has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Fires a pending effect right away, skipping the rest of the wait.
    pub fn flush_now(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
