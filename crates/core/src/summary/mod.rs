use serde::{Deserialize, Serialize};

use crate::catalogue::{CompletedExercise, ExerciseKind};

const HEADLINES: [&str; 4] = [
    "Outstanding work! You completed {count} exercises and stayed consistent throughout.",
    "Fantastic effort! Your dedication to {names} shows real commitment to your fitness goals.",
    "Amazing session! You pushed through {count} exercises with great form and determination.",
    "Excellent workout! Your consistency and effort in completing {names} is truly impressive.",
];

const HOLD_SUGGESTION: &str = "Consider holding your plank position 10 seconds longer next time.";

const REP_SUGGESTIONS: [&str; 4] = [
    "Try adding 2-3 more reps to your next session to increase the challenge!",
    "Challenge yourself with jump squats or diamond push-ups for extra intensity.",
    "Add a 30-second rest between exercises to maintain perfect form throughout.",
    "Try slowing down your movements to focus on muscle engagement and control.",
];

/// End of workout recap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub exercise_count: usize,
    pub exercises: Vec<String>,
    pub total_reps: u32,
    pub total_hold_seconds: f64,
    pub elapsed_ms: u64,
    pub headline: String,
    pub suggestion: String,
}

impl WorkoutSummary {
    pub fn from_history(history: &[CompletedExercise], elapsed_ms: u64) -> Self {
        let exercises: Vec<String> = history.iter().map(|e| e.name.clone()).collect();
        let total_reps = history
            .iter()
            .filter(|e| e.kind == ExerciseKind::Reps)
            .map(|e| e.achieved.max(0.0) as u32)
            .sum();
        let total_hold_seconds = history
            .iter()
            .filter(|e| e.kind == ExerciseKind::Hold)
            .map(|e| e.achieved)
            .sum();

        let headline = if history.is_empty() {
            "Every workout starts somewhere. Pick an exercise and give it a go!".to_string()
        } else {
            HEADLINES[history.len() % HEADLINES.len()]
                .replace("{count}", &history.len().to_string())
                .replace("{names}", &exercises.join(", "))
        };

        let suggestion = if history.iter().any(|e| e.kind == ExerciseKind::Hold) {
            HOLD_SUGGESTION
        } else {
            REP_SUGGESTIONS[total_reps as usize % REP_SUGGESTIONS.len()]
        };

        Self {
            exercise_count: history.len(),
            exercises,
            total_reps,
            total_hold_seconds,
            elapsed_ms,
            headline,
            suggestion: suggestion.to_string(),
        }
    }
}
