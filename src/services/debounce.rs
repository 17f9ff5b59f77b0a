//! Input Debouncer
//!
//! Coalesces bursts of updates into one commit once a quiet window has passed
//! since the most recent update.

use std::time::Duration;

use tokio::time::Instant;

/// Default quiet window between the last keystroke and re-interpolation.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record an update, restarting the quiet window.
    pub fn touch(&mut self) {
        self.deadline = Some(Instant::now() + self.window);
    }

    /// An update is waiting to be committed.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The quiet window has elapsed since the last update.
    pub fn is_due(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Drop any pending update.
    pub fn clear(&mut self) {
        self.deadline = None;
    }

    /// Sleep until the pending window closes. Returns immediately when
    /// nothing is pending.
    pub async fn settled(&mut self) {
        if let Some(deadline) = self.deadline.take() {
            tokio::time::sleep_until(deadline).await;
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
