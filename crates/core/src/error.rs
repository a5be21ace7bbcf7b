/// Result alias that carries the custom [`CoachError`] type.
pub type Result<T> = std::result::Result<T, CoachError>;

/// Common error type for the core crate.
///
/// Only session setup and control misuse produce errors. Frame processing
/// degrades to "no update" instead.
#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    /// Free-form message for conditions without a dedicated variant.
    #[error("{0}")]
    Message(String),
    /// A workout was started with no exercises in the plan.
    #[error("workout plan is empty")]
    EmptyPlan,
    /// The named exercise is not in the catalogue, or has no registered
    /// policy while strict policy checking is enabled.
    #[error("unknown exercise `{0}`")]
    UnknownExercise(String),
    /// The plan contains an entry the engine cannot run.
    #[error("invalid workout plan: {0}")]
    InvalidPlan(String),
    #[error("a workout is already in progress")]
    AlreadyStarted,
    #[error("no workout is in progress")]
    NotInProgress,
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed configuration, catalogue or recorded frame data.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl CoachError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for CoachError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for CoachError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_unknown_exercise_with_name() {
        let err = CoachError::UnknownExercise("Burpees".to_string());
        assert!(format!("{err}").contains("Burpees"));
    }

    #[test]
    fn converts_plain_strings() {
        let err: CoachError = "camera unplugged".into();
        assert!(matches!(err, CoachError::Message(ref m) if m == "camera unplugged"));
    }
}
