//! Cancellable per-match deadline.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// A single deadline owned by a match worker.
///
/// Arming replaces any previous deadline; cancelling clears it. The worker
/// copies [`PhaseTimer::deadline`] before `select!` and waits on
/// [`wait_until`], so an early completion simply re-arms or cancels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTimer {
    deadline: Option<Instant>,
}

impl PhaseTimer {
    /// Unarmed timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Expire `duration` from now.
    pub fn arm(&mut self, duration: Duration) {
        self.deadline = Some(Instant::now() + duration);
    }

    /// Clear the deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Current deadline.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a deadline is set.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left, zero once expired, `None` when unarmed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }
}

/// Sleep until `deadline`, or forever when there is none.
pub async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_arm_and_expire() {
        let mut timer = PhaseTimer::new();
        assert!(!timer.is_armed());
        timer.arm(Duration::from_secs(30));
        assert_eq!(timer.remaining(), Some(Duration::from_secs(30)));

        let start = Instant::now();
        wait_until(timer.deadline()).await;
        assert_eq!(start.elapsed(), Duration::from_secs(30));
        assert_eq!(timer.remaining(), Some(Duration::ZERO));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let mut timer = PhaseTimer::new();
        timer.arm(Duration::from_secs(1));
        timer.cancel();
        let fired = tokio::time::timeout(Duration::from_secs(3600), wait_until(timer.deadline())).await;
        assert!(fired.is_err());
    }
}
