//! Hold-time accumulator for isometric exercises.
//!
//! Time is accrued frame to frame: each qualifying frame adds the delta since
//! the previous qualifying frame and moves the anchor forward. A frame below
//! the quality bar clears the anchor, so the next qualifying frame starts a
//! new run without adding anything. Seconds already earned are never taken
//! back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldTracker {
    seconds: f64,
    anchor_ms: Option<u64>,
}

impl HoldTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds held with qualifying form so far.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Timestamp of the last qualifying frame of the current run.
    pub fn anchor_ms(&self) -> Option<u64> {
        self.anchor_ms
    }

    /// Scores a frame against the hold quality bar. Form must strictly exceed
    /// the bar to qualify.
    pub fn observe_score(&mut self, form_score: f32, quality_bar: f32, now_ms: u64) {
        self.observe(form_score > quality_bar, now_ms);
    }

    pub fn observe(&mut self, qualifying: bool, now_ms: u64) {
        if !qualifying {
            self.interrupt();
            return;
        }

        if let Some(anchor) = self.anchor_ms {
            self.seconds += now_ms.saturating_sub(anchor) as f64 / 1000.0;
        }
        self.anchor_ms = Some(now_ms);
    }

    /// Pauses accrual without losing earned time.
    pub fn interrupt(&mut self) {
        self.anchor_ms = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
