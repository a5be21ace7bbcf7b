//! Core library for the Workout Coach application.
//!
//! The crate turns a stream of per-frame pose skeletons into repetition
//! counts, hold durations, form scores and coaching feedback for a catalogue
//! of exercises. Each module owns one stage of that pipeline (normalising
//! joints, gating on confidence, per-exercise policies, timing, workout
//! progression). Pose estimation, rendering and narration live outside the
//! crate and only exchange plain data with it.

pub mod catalogue;
pub mod config;
pub mod error;
pub mod gate;
pub mod geometry;
pub mod hold;
pub mod policy;
pub mod pose;
pub mod session;
pub mod summary;
pub mod timeline;
pub mod timer;
pub mod workout;

pub use catalogue::{Catalogue, CompletedExercise, Exercise, ExerciseKind, Orientation};
pub use config::{DisplayConfig, EngineConfig, GateConfig, HoldRule, PolicyConfig, RepRule};
pub use error::{CoachError, Result};
pub use gate::{ConfidenceGate, GateReading, PresenceTransition};
pub use geometry::{angle_at, vertical_distance};
pub use hold::HoldTracker;
pub use policy::{ExercisePolicy, PolicyRegistry, PolicyUpdate, PriorState, Side};
pub use pose::{normalize, Joint, JointMap, JointPoint, PoseSample, RawJoint};
pub use session::{ExerciseProgress, Feedback, FeedbackSeverity, SessionSnapshot, SessionState, Stage};
pub use summary::WorkoutSummary;
pub use timeline::{ControlCommand, FrameSource, LoopStats, TickInput, TickLoop, TickObserver};
pub use timer::SessionTimer;
pub use workout::{CoachEvent, StartReport, TickOutcome, WorkoutController, WorkoutPhase};
