use serde::{Deserialize, Serialize};

use crate::{hold::HoldTracker, timer::SessionTimer, ExerciseKind};

/// Phase of the current repetition cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Up,
    Down,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackSeverity {
    #[default]
    Info,
    Good,
    Warning,
}

/// Display text for the user together with how it should be styled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub text: String,
    pub severity: FeedbackSeverity,
}

impl Feedback {
    pub fn new(text: impl Into<String>, severity: FeedbackSeverity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, FeedbackSeverity::Info)
    }

    pub fn good(text: impl Into<String>) -> Self {
        Self::new(text, FeedbackSeverity::Good)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, FeedbackSeverity::Warning)
    }
}

/// The single mutable record of an in-progress workout. Only the workout
/// controller writes to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub plan_index: usize,
    pub stage: Stage,
    pub rep_count: u32,
    pub hold: HoldTracker,
    pub timer: SessionTimer,
    pub person_present: bool,
    pub pose_confidence_pct: u8,
    pub form_score_pct: f32,
    pub low_confidence_notice: bool,
    pub feedback: Feedback,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            plan_index: 0,
            stage: Stage::Neutral,
            rep_count: 0,
            hold: HoldTracker::new(),
            timer: SessionTimer::new(),
            person_present: true,
            pose_confidence_pct: 0,
            form_score_pct: 0.0,
            low_confidence_notice: false,
            feedback: Feedback::info("Select your exercises to begin!"),
        }
    }

    /// Clears everything tied to the current exercise attempt.
    pub fn reset_exercise(&mut self) {
        self.stage = Stage::Neutral;
        self.rep_count = 0;
        self.hold.reset();
        self.form_score_pct = 0.0;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress through the current exercise, in the exercise's own unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ExerciseProgress {
    Reps(u32),
    Hold(f64),
}

impl ExerciseProgress {
    pub fn for_kind(kind: ExerciseKind, state: &SessionState) -> Self {
        match kind {
            ExerciseKind::Reps => Self::Reps(state.rep_count),
            ExerciseKind::Hold => Self::Hold(state.hold.seconds()),
        }
    }
}

/// Read-only view of the session handed to renderers after each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub person_present: bool,
    pub pose_confidence_pct: u8,
    pub form_score_pct: f32,
    pub low_confidence_notice: bool,
    pub feedback_text: String,
    pub feedback_severity: FeedbackSeverity,
    pub progress: Option<ExerciseProgress>,
    pub elapsed_ms: u64,
    pub paused: bool,
    pub current_exercise: Option<String>,
    pub next_exercise: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_reset_keeps_session_fields() {
        let mut state = SessionState::new();
        state.plan_index = 2;
        state.rep_count = 7;
        state.stage = Stage::Down;
        state.hold.observe(true, 0);
        state.hold.observe(true, 1_500);
        state.timer.tick(0);
        state.timer.tick(4_000);

        state.reset_exercise();

        assert_eq!(state.rep_count, 0);
        assert_eq!(state.stage, Stage::Neutral);
        assert_eq!(state.hold.seconds(), 0.0);
        assert_eq!(state.hold.anchor_ms(), None);
        assert_eq!(state.plan_index, 2);
        assert_eq!(state.timer.elapsed_ms(), 4_000);
    }

    #[test]
    fn progress_uses_exercise_unit() {
        let mut state = SessionState::new();
        state.rep_count = 4;
        assert_eq!(
            ExerciseProgress::for_kind(ExerciseKind::Reps, &state),
            ExerciseProgress::Reps(4)
        );
        assert_eq!(
            ExerciseProgress::for_kind(ExerciseKind::Hold, &state),
            ExerciseProgress::Hold(0.0)
        );
    }
}
