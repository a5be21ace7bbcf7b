//! Session timer measuring active workout time.
//!
//! The timer only runs while a person is detected and the session is not
//! paused. Every stop flushes the pending delta into the elapsed total, so
//! paused or undetected stretches are never counted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTimer {
    elapsed_ms: u64,
    active_since_ms: Option<u64>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active time committed so far.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Active time including the pending, not yet committed, delta.
    pub fn elapsed_at(&self, now_ms: u64) -> u64 {
        match self.active_since_ms {
            Some(since) => self.elapsed_ms + now_ms.saturating_sub(since),
            None => self.elapsed_ms,
        }
    }

    pub fn active_since_ms(&self) -> Option<u64> {
        self.active_since_ms
    }

    pub fn is_running(&self) -> bool {
        self.active_since_ms.is_some()
    }

    /// Advances an active tick: commits the delta when already running,
    /// otherwise starts the timer without adding anything.
    pub fn tick(&mut self, now_ms: u64) {
        if let Some(since) = self.active_since_ms {
            self.elapsed_ms += now_ms.saturating_sub(since);
        }
        self.active_since_ms = Some(now_ms);
    }

    /// Starts the timer if it is not already running.
    pub fn start(&mut self, now_ms: u64) {
        if self.active_since_ms.is_none() {
            self.active_since_ms = Some(now_ms);
        }
    }

    /// Flushes the pending delta and stops accrual.
    pub fn stop(&mut self, now_ms: u64) {
        if let Some(since) = self.active_since_ms.take() {
            self.elapsed_ms += now_ms.saturating_sub(since);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_starts_without_delta() {
        let mut timer = SessionTimer::new();
        timer.tick(1_000);
        assert_eq!(timer.elapsed_ms(), 0);
        assert!(timer.is_running());

        timer.tick(1_250);
        assert_eq!(timer.elapsed_ms(), 250);
    }

    #[test]
    fn pausing_subtracts_exactly_the_paused_span() {
        let mut continuous = SessionTimer::new();
        for t in (0..=10_000).step_by(500) {
            continuous.tick(t);
        }
        assert_eq!(continuous.elapsed_ms(), 10_000);

        let mut paused = SessionTimer::new();
        paused.tick(0);
        paused.tick(2_000);
        paused.stop(2_000);
        paused.start(3_000);
        paused.tick(5_000);
        paused.stop(5_500);
        paused.start(7_000);
        paused.tick(10_000);

        // Paused from 2.0s to 3.0s and from 5.5s to 7.0s.
        assert_eq!(paused.elapsed_ms(), 10_000 - 1_000 - 1_500);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut timer = SessionTimer::new();
        timer.start(0);
        timer.stop(400);
        timer.stop(900);
        assert_eq!(timer.elapsed_ms(), 400);
        assert!(!timer.is_running());
    }

    #[test]
    fn elapsed_at_includes_pending_delta() {
        let mut timer = SessionTimer::new();
        timer.tick(100);
        assert_eq!(timer.elapsed_at(600), 500);
        assert_eq!(timer.elapsed_ms(), 0);
    }
}
