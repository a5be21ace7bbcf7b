//! Workout progression controller.
//!
//! Owns the [`SessionState`] and sequences the engine across the planned
//! exercises: each tick gates the pose, runs the current exercise policy,
//! accrues hold and active time, and advances to the next exercise once the
//! target is reached.

use serde::{Deserialize, Serialize};

use crate::{
    catalogue::{CompletedExercise, Exercise, ExerciseKind},
    config::EngineConfig,
    gate::{ConfidenceGate, GateReading, PresenceTransition},
    policy::{ExercisePolicy, PolicyRegistry, PolicyUpdate, PriorState},
    pose::{normalize, PoseSample},
    session::{ExerciseProgress, Feedback, SessionSnapshot, SessionState},
    summary::WorkoutSummary,
    CoachError, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutPhase {
    NotStarted,
    InProgress,
    Completed,
}

/// Discrete transitions worth narrating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CoachEvent {
    ExerciseStarted { name: String, first: bool },
    ExerciseCompleted { exercise: CompletedExercise },
    Paused,
    Resumed,
    TrackingLost,
    TrackingRegained,
    WorkoutCompleted,
}

impl CoachEvent {
    /// Text for the narrator.
    pub fn message(&self) -> String {
        match self {
            Self::ExerciseStarted { name, first: true } => format!("Let's start with {name}"),
            Self::ExerciseStarted { name, first: false } => format!("Next up: {name}. Get ready!"),
            Self::ExerciseCompleted { exercise } => format!("Great job on the {}.", exercise.name),
            Self::Paused => "Workout paused.".to_string(),
            Self::Resumed => "Resuming.".to_string(),
            Self::TrackingLost => LOST_MESSAGE.to_string(),
            Self::TrackingRegained => "There you are!".to_string(),
            Self::WorkoutCompleted => "Workout Complete!".to_string(),
        }
    }
}

const LOST_MESSAGE: &str = "Step into frame so I can see you.";

/// Everything a tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub snapshot: SessionSnapshot,
    pub events: Vec<CoachEvent>,
    /// False when the tick was skipped (not started, paused or finished).
    pub processed: bool,
}

/// Information returned when a workout starts.
#[derive(Debug, Clone, PartialEq)]
pub struct StartReport {
    pub events: Vec<CoachEvent>,
    /// Plan entries coached with generic feedback for lack of a policy.
    pub unregistered: Vec<String>,
}

#[derive(Debug)]
pub struct WorkoutController {
    config: EngineConfig,
    registry: PolicyRegistry,
    gate: ConfidenceGate,
    plan: Vec<Exercise>,
    policies: Vec<ExercisePolicy>,
    history: Vec<CompletedExercise>,
    state: SessionState,
    phase: WorkoutPhase,
    paused: bool,
}

impl WorkoutController {
    /// Fails when the policy thresholds are inconsistent.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let registry = PolicyRegistry::new(config.policies.clone())?;
        let gate = ConfidenceGate::new(config.gate.clone());
        Ok(Self {
            config,
            registry,
            gate,
            plan: Vec::new(),
            policies: Vec::new(),
            history: Vec::new(),
            state: SessionState::new(),
            phase: WorkoutPhase::NotStarted,
            paused: false,
        })
    }

    pub fn phase(&self) -> WorkoutPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn plan(&self) -> &[Exercise] {
        &self.plan
    }

    pub fn history(&self) -> &[CompletedExercise] {
        &self.history
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        match self.phase {
            WorkoutPhase::InProgress => self.plan.get(self.state.plan_index),
            _ => None,
        }
    }

    /// Fixes the plan and enters the first exercise.
    ///
    /// The plan is validated up front so nothing can fail mid-session. On
    /// error the controller is left untouched.
    pub fn start(&mut self, plan: Vec<Exercise>) -> Result<StartReport> {
        if self.phase == WorkoutPhase::InProgress {
            return Err(CoachError::AlreadyStarted);
        }
        if plan.is_empty() {
            return Err(CoachError::EmptyPlan);
        }

        let mut policies = Vec::with_capacity(plan.len());
        let mut unregistered = Vec::new();
        for exercise in &plan {
            if exercise.target == 0 {
                return Err(CoachError::InvalidPlan(format!(
                    "`{}` has a zero target",
                    exercise.name
                )));
            }
            let policy = self.registry.resolve(&exercise.name);
            match policy.kind() {
                Some(kind) if kind != exercise.kind => {
                    return Err(CoachError::InvalidPlan(format!(
                        "`{}` is planned as {:?} but its policy measures {:?}",
                        exercise.name, exercise.kind, kind
                    )));
                }
                None if self.config.strict_policies => {
                    return Err(CoachError::UnknownExercise(exercise.name.clone()));
                }
                None => unregistered.push(exercise.name.clone()),
                Some(_) => {}
            }
            policies.push(policy);
        }

        if !unregistered.is_empty() {
            tracing::warn!(?unregistered, "no policy registered, using generic coaching");
        }

        let first = plan[0].name.clone();
        tracing::info!(exercises = plan.len(), first = %first, "workout started");

        self.plan = plan;
        self.policies = policies;
        self.history.clear();
        self.gate.reset();
        self.state = SessionState::new();
        self.phase = WorkoutPhase::InProgress;
        self.paused = false;

        let event = CoachEvent::ExerciseStarted { name: first, first: true };
        self.state.feedback = Feedback::info(event.message());

        Ok(StartReport {
            events: vec![event],
            unregistered,
        })
    }

    /// Processes one display tick.
    ///
    /// `pose` is the estimator output for the frame, `None` when no person
    /// was found. Skipped ticks (not started, paused, finished) leave the
    /// state untouched.
    pub fn tick(&mut self, now_ms: u64, pose: Option<&PoseSample>) -> TickOutcome {
        if self.phase != WorkoutPhase::InProgress || self.paused {
            return self.outcome(Vec::new(), false);
        }

        let joints = pose.map(|sample| normalize(sample, &self.config.display));
        let reading = self.gate.observe(joints.as_ref());
        let mut events = Vec::new();

        if !reading.person_present {
            if reading.transition == Some(PresenceTransition::Lost) {
                tracing::warn!(
                    absent_frames = self.gate.absent_frames(),
                    "lost track of the person"
                );
                self.state.timer.stop(now_ms);
                self.state.hold.interrupt();
                self.state.feedback = Feedback::warning(LOST_MESSAGE);
                events.push(CoachEvent::TrackingLost);
            }
            self.apply_presence(&reading);
            return self.outcome(events, true);
        }

        if reading.transition == Some(PresenceTransition::Regained) {
            tracing::debug!("person back in frame");
            events.push(CoachEvent::TrackingRegained);
        }
        self.state.timer.tick(now_ms);
        self.apply_presence(&reading);

        match joints {
            Some(joints) => self.apply_policy(&joints, &reading, now_ms),
            // Hold time is only credited between verified frames.
            None => self.state.hold.interrupt(),
        }

        if self.current_target_met() {
            events.extend(self.complete_current(now_ms));
        }

        self.outcome(events, true)
    }

    /// Freezes timing and progress. No-op unless a workout is running.
    pub fn pause(&mut self, now_ms: u64) -> Option<CoachEvent> {
        if self.phase != WorkoutPhase::InProgress || self.paused {
            return None;
        }

        self.state.timer.stop(now_ms);
        self.state.hold.interrupt();
        self.paused = true;
        tracing::info!(elapsed_ms = self.state.timer.elapsed_ms(), "workout paused");

        let event = CoachEvent::Paused;
        self.state.feedback = Feedback::info(event.message());
        Some(event)
    }

    /// Restarts timing without touching rep or hold progress.
    pub fn resume(&mut self, now_ms: u64) -> Option<CoachEvent> {
        if self.phase != WorkoutPhase::InProgress || !self.paused {
            return None;
        }

        self.paused = false;
        if self.state.person_present {
            self.state.timer.start(now_ms);
        }
        tracing::info!("workout resumed");

        let event = CoachEvent::Resumed;
        self.state.feedback = Feedback::info(event.message());
        Some(event)
    }

    /// Ends the current exercise with whatever was achieved so far.
    pub fn skip(&mut self, now_ms: u64) -> Result<Vec<CoachEvent>> {
        if self.phase != WorkoutPhase::InProgress {
            return Err(CoachError::NotInProgress);
        }
        Ok(self.complete_current(now_ms))
    }

    /// Drops the plan, history and all session state.
    pub fn reset(&mut self) {
        self.plan.clear();
        self.policies.clear();
        self.history.clear();
        self.gate.reset();
        self.state = SessionState::new();
        self.phase = WorkoutPhase::NotStarted;
        self.paused = false;
        tracing::info!("workout reset");
    }

    /// Read-only view for renderers.
    pub fn snapshot(&self) -> SessionSnapshot {
        let current = self.current_exercise();
        let next = match self.phase {
            WorkoutPhase::InProgress => self.plan.get(self.state.plan_index + 1),
            _ => None,
        };

        SessionSnapshot {
            person_present: self.state.person_present,
            pose_confidence_pct: self.state.pose_confidence_pct,
            form_score_pct: self.state.form_score_pct,
            low_confidence_notice: self.state.low_confidence_notice,
            feedback_text: self.state.feedback.text.clone(),
            feedback_severity: self.state.feedback.severity,
            progress: current.map(|exercise| ExerciseProgress::for_kind(exercise.kind, &self.state)),
            elapsed_ms: self.state.timer.elapsed_ms(),
            paused: self.paused,
            current_exercise: current.map(|exercise| exercise.name.clone()),
            next_exercise: next.map(|exercise| exercise.name.clone()),
        }
    }

    /// Summary of everything finished so far.
    pub fn summary(&self) -> WorkoutSummary {
        WorkoutSummary::from_history(&self.history, self.state.timer.elapsed_ms())
    }

    fn apply_presence(&mut self, reading: &GateReading) {
        self.state.person_present = reading.person_present;
        self.state.pose_confidence_pct = reading.confidence_pct;
        self.state.low_confidence_notice = reading.low_confidence_notice;
    }

    fn apply_policy(&mut self, joints: &crate::pose::JointMap, reading: &GateReading, now_ms: u64) {
        let Some(policy) = self.policies.get(self.state.plan_index).copied() else {
            return;
        };
        let prior = PriorState {
            stage: self.state.stage,
            rep_count: self.state.rep_count,
        };
        let update = policy.evaluate(joints, prior, self.registry.score_floor());

        let is_hold = self
            .plan
            .get(self.state.plan_index)
            .map(|exercise| exercise.kind == ExerciseKind::Hold)
            .unwrap_or(false);
        if is_hold {
            self.track_hold(update.as_ref(), policy.quality_bar(), reading.pose_usable, now_ms);
        }

        let Some(update) = update else {
            return;
        };

        if update.rep_count > self.state.rep_count {
            tracing::debug!(
                exercise = policy.name(),
                reps = update.rep_count,
                "repetition counted"
            );
        }
        self.state.stage = update.stage;
        self.state.rep_count = self.state.rep_count.max(update.rep_count);
        self.state.feedback = update.feedback;
        if let Some(score) = update.form_score {
            self.state.form_score_pct = score;
        }
    }

    /// Bad form clears the anchor on any present frame. Time only accrues
    /// across usable frames whose form was actually measured.
    fn track_hold(&mut self, update: Option<&PolicyUpdate>, quality_bar: f32, usable: bool, now_ms: u64) {
        let hold = &mut self.state.hold;
        match update.map(|update| update.form_score) {
            Some(Some(score)) if score <= quality_bar => hold.interrupt(),
            Some(_) if !usable => hold.interrupt(),
            Some(Some(score)) => hold.observe_score(score, quality_bar, now_ms),
            Some(None) => hold.observe(true, now_ms),
            None => hold.interrupt(),
        }
    }

    fn current_target_met(&self) -> bool {
        let Some(exercise) = self.plan.get(self.state.plan_index) else {
            return false;
        };
        let achieved = match exercise.kind {
            ExerciseKind::Reps => f64::from(self.state.rep_count),
            ExerciseKind::Hold => self.state.hold.seconds(),
        };
        exercise.is_met_by(achieved)
    }

    fn complete_current(&mut self, now_ms: u64) -> Vec<CoachEvent> {
        let Some(exercise) = self.plan.get(self.state.plan_index) else {
            return Vec::new();
        };

        let completed = CompletedExercise {
            name: exercise.name.clone(),
            kind: exercise.kind,
            achieved: match exercise.kind {
                ExerciseKind::Reps => f64::from(self.state.rep_count),
                ExerciseKind::Hold => self.state.hold.seconds(),
            },
        };
        tracing::info!(
            exercise = %completed.name,
            achieved = completed.achieved,
            target = exercise.target,
            "exercise finished"
        );

        self.history.push(completed.clone());
        self.state.reset_exercise();
        self.state.plan_index += 1;

        let mut events = vec![CoachEvent::ExerciseCompleted { exercise: completed }];
        match self.plan.get(self.state.plan_index) {
            Some(next) => {
                let event = CoachEvent::ExerciseStarted {
                    name: next.name.clone(),
                    first: false,
                };
                self.state.feedback = Feedback::info(event.message());
                events.push(event);
            }
            None => {
                self.state.timer.stop(now_ms);
                self.phase = WorkoutPhase::Completed;
                self.paused = false;
                tracing::info!(
                    exercises = self.history.len(),
                    elapsed_ms = self.state.timer.elapsed_ms(),
                    "workout complete"
                );
                let event = CoachEvent::WorkoutCompleted;
                self.state.feedback = Feedback::info(event.message());
                events.push(event);
            }
        }
        events
    }

    fn outcome(&self, events: Vec<CoachEvent>, processed: bool) -> TickOutcome {
        TickOutcome {
            snapshot: self.snapshot(),
            events,
            processed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalogue::{Catalogue, Orientation},
        pose::{Joint, RawJoint},
        session::Stage,
    };

    /// A full-body pose with the left arm bent to `elbow_degrees`.
    fn arm_pose(elbow_degrees: f32) -> PoseSample {
        let theta = elbow_degrees.to_radians();
        let mut joints: Vec<RawJoint> = Joint::ALL
            .iter()
            .map(|joint| RawJoint::named(joint.as_str(), 50.0, 50.0, 0.9))
            .collect();
        let set = |joints: &mut Vec<RawJoint>, joint: Joint, x: f32, y: f32| {
            joints[joint as usize] = RawJoint::named(joint.as_str(), x, y, 0.9);
        };
        set(&mut joints, Joint::LeftShoulder, 300.0, 200.0);
        set(&mut joints, Joint::LeftElbow, 200.0, 200.0);
        set(
            &mut joints,
            Joint::LeftWrist,
            200.0 + 100.0 * theta.cos(),
            200.0 + 100.0 * theta.sin(),
        );
        PoseSample::new(joints, 640, 480)
    }

    /// A side-on body line bent at the hip to `line_degrees`.
    fn plank_pose(line_degrees: f32) -> PoseSample {
        let theta = line_degrees.to_radians();
        let mut joints: Vec<RawJoint> = Joint::ALL
            .iter()
            .map(|joint| RawJoint::named(joint.as_str(), 50.0, 50.0, 0.9))
            .collect();
        joints[Joint::LeftHip as usize] = RawJoint::named("left_hip", 300.0, 300.0, 0.9);
        joints[Joint::LeftShoulder as usize] = RawJoint::named("left_shoulder", 400.0, 300.0, 0.9);
        joints[Joint::LeftAnkle as usize] = RawJoint::named(
            "left_ankle",
            300.0 + 200.0 * theta.cos(),
            300.0 + 200.0 * theta.sin(),
            0.9,
        );
        PoseSample::new(joints, 640, 480)
    }

    fn controller() -> WorkoutController {
        WorkoutController::new(EngineConfig::default()).unwrap()
    }

    fn curls(target: u32) -> Exercise {
        Exercise::reps("Bicep Curls", target, Orientation::Portrait)
    }

    #[test]
    fn empty_plan_is_refused() {
        let mut coach = controller();
        let err = coach.start(Vec::new()).unwrap_err();
        assert!(matches!(err, CoachError::EmptyPlan));
        assert_eq!(coach.phase(), WorkoutPhase::NotStarted);
    }

    #[test]
    fn start_announces_first_exercise() {
        let mut coach = controller();
        let plan = Catalogue::standard().plan(&["Squats", "Plank"]).unwrap();
        let report = coach.start(plan).unwrap();

        assert_eq!(report.events[0].message(), "Let's start with Squats");
        assert!(report.unregistered.is_empty());
        let snapshot = coach.snapshot();
        assert_eq!(snapshot.current_exercise.as_deref(), Some("Squats"));
        assert_eq!(snapshot.next_exercise.as_deref(), Some("Plank"));
        assert_eq!(snapshot.progress, Some(ExerciseProgress::Reps(0)));
    }

    #[test]
    fn cannot_start_twice() {
        let mut coach = controller();
        coach.start(vec![curls(3)]).unwrap();
        assert!(matches!(coach.start(vec![curls(3)]), Err(CoachError::AlreadyStarted)));
    }

    #[test]
    fn rejects_kind_mismatch_and_zero_targets() {
        let mut coach = controller();
        let bad_kind = Exercise::reps("Plank", 10, Orientation::Landscape);
        assert!(matches!(coach.start(vec![bad_kind]), Err(CoachError::InvalidPlan(_))));

        assert!(matches!(coach.start(vec![curls(0)]), Err(CoachError::InvalidPlan(_))));
        assert_eq!(coach.phase(), WorkoutPhase::NotStarted);
    }

    #[test]
    fn unknown_exercises_fall_back_unless_strict() {
        let burpees = Exercise::reps("Burpees", 5, Orientation::Portrait);

        let mut coach = controller();
        let report = coach.start(vec![burpees.clone()]).unwrap();
        assert_eq!(report.unregistered, ["Burpees"]);
        let outcome = coach.tick(0, Some(&arm_pose(90.0)));
        assert_eq!(outcome.snapshot.feedback_text, "Keep going!");

        let mut strict = WorkoutController::new(EngineConfig {
            strict_policies: true,
            ..EngineConfig::default()
        })
        .unwrap();
        assert!(matches!(
            strict.start(vec![burpees]),
            Err(CoachError::UnknownExercise(_))
        ));
    }

    #[test]
    fn reaching_target_advances_the_plan() {
        let mut coach = controller();
        coach
            .start(vec![curls(1), Exercise::hold("Plank", 30, Orientation::Landscape)])
            .unwrap();

        coach.tick(0, Some(&arm_pose(170.0)));
        coach.tick(100, Some(&arm_pose(45.0)));
        assert_eq!(coach.state().stage, Stage::Up);
        let outcome = coach.tick(200, Some(&arm_pose(170.0)));

        assert_eq!(coach.history().len(), 1);
        assert_eq!(coach.history()[0].achieved, 1.0);
        assert_eq!(coach.state().plan_index, 1);
        assert_eq!(coach.state().rep_count, 0);
        assert_eq!(coach.state().stage, Stage::Neutral);
        assert_eq!(outcome.snapshot.current_exercise.as_deref(), Some("Plank"));
        assert!(outcome
            .events
            .iter()
            .any(|event| event.message() == "Next up: Plank. Get ready!"));
    }

    #[test]
    fn finishing_last_exercise_completes_workout() {
        let mut coach = controller();
        coach.start(vec![curls(1)]).unwrap();

        coach.tick(0, Some(&arm_pose(45.0)));
        let outcome = coach.tick(1_000, Some(&arm_pose(170.0)));

        assert_eq!(coach.phase(), WorkoutPhase::Completed);
        assert!(outcome.events.contains(&CoachEvent::WorkoutCompleted));
        assert_eq!(outcome.snapshot.feedback_text, "Workout Complete!");
        assert_eq!(outcome.snapshot.current_exercise, None);
        assert_eq!(coach.state().timer.elapsed_ms(), 1_000);

        let after = coach.tick(2_000, Some(&arm_pose(45.0)));
        assert!(!after.processed);
        assert_eq!(coach.history().len(), 1);
    }

    #[test]
    fn plank_accrues_hold_and_completes() {
        let mut coach = controller();
        coach
            .start(vec![Exercise::hold("Plank", 3, Orientation::Landscape)])
            .unwrap();

        coach.tick(0, Some(&plank_pose(178.0)));
        coach.tick(1_000, Some(&plank_pose(178.0)));
        // Sagging hips freeze accrual.
        coach.tick(2_000, Some(&plank_pose(150.0)));
        assert!((coach.state().hold.seconds() - 1.0).abs() < 1e-9);

        coach.tick(3_000, Some(&plank_pose(178.0)));
        coach.tick(4_000, Some(&plank_pose(178.0)));
        assert!((coach.state().hold.seconds() - 2.0).abs() < 1e-9);
        coach.tick(5_000, Some(&plank_pose(178.0)));

        assert_eq!(coach.phase(), WorkoutPhase::Completed);
        assert!((coach.history()[0].achieved - 3.0).abs() < 1e-9);
    }

    /// Only the three body-line joints, too few for a usable pose.
    fn sparse_plank_pose(line_degrees: f32) -> PoseSample {
        let mut sample = plank_pose(line_degrees);
        sample.joints.retain(|joint| {
            matches!(
                joint.name.as_deref(),
                Some("left_shoulder" | "left_hip" | "left_ankle")
            )
        });
        sample
    }

    #[test]
    fn sagging_on_sparse_frames_is_never_credited() {
        let mut coach = controller();
        coach
            .start(vec![Exercise::hold("Plank", 30, Orientation::Landscape)])
            .unwrap();

        coach.tick(0, Some(&plank_pose(178.0)));
        for second in 1..=9u64 {
            let outcome = coach.tick(second * 1_000, Some(&sparse_plank_pose(140.0)));
            assert_eq!(outcome.snapshot.feedback_text, "Keep your back flat");
            assert!(outcome.snapshot.person_present);
        }
        coach.tick(10_000, Some(&plank_pose(178.0)));
        assert_eq!(coach.state().hold.seconds(), 0.0);

        coach.tick(11_000, Some(&plank_pose(178.0)));
        assert!((coach.state().hold.seconds() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unverified_frames_break_the_hold_run() {
        let mut coach = controller();
        coach
            .start(vec![Exercise::hold("Plank", 30, Orientation::Landscape)])
            .unwrap();

        // Good form, but too few joints to trust.
        coach.tick(0, Some(&plank_pose(178.0)));
        coach.tick(1_000, Some(&sparse_plank_pose(178.0)));
        coach.tick(2_000, Some(&plank_pose(178.0)));
        assert_eq!(coach.state().hold.seconds(), 0.0);

        // A dropped frame inside the debounce window.
        coach.tick(3_000, None);
        assert!(coach.state().person_present);
        coach.tick(4_000, Some(&plank_pose(178.0)));
        assert_eq!(coach.state().hold.seconds(), 0.0);

        coach.tick(5_000, Some(&plank_pose(178.0)));
        assert!((coach.state().hold.seconds() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn losing_the_person_stops_the_timer_after_debounce() {
        let mut coach = controller();
        coach.start(vec![curls(10)]).unwrap();

        coach.tick(0, Some(&arm_pose(170.0)));
        coach.tick(1_000, Some(&arm_pose(170.0)));
        let mut lost_events = 0;
        for i in 1..=5u64 {
            let outcome = coach.tick(1_000 + i * 100, None);
            lost_events += outcome
                .events
                .iter()
                .filter(|event| **event == CoachEvent::TrackingLost)
                .count();
        }

        assert_eq!(lost_events, 1);
        assert!(!coach.state().person_present);
        assert!(coach.state().low_confidence_notice);
        // The debounce frames still counted as present time.
        assert_eq!(coach.state().timer.elapsed_ms(), 1_500);

        let outcome = coach.tick(5_000, Some(&arm_pose(170.0)));
        assert!(outcome.events.contains(&CoachEvent::TrackingRegained));
        assert_eq!(coach.state().timer.elapsed_ms(), 1_500);
        coach.tick(5_400, Some(&arm_pose(170.0)));
        assert_eq!(coach.state().timer.elapsed_ms(), 1_900);
    }

    #[test]
    fn pause_skips_ticks_and_preserves_progress() {
        let mut coach = controller();
        coach.start(vec![curls(5)]).unwrap();

        coach.tick(0, Some(&arm_pose(45.0)));
        coach.tick(500, Some(&arm_pose(170.0)));
        assert_eq!(coach.state().rep_count, 1);

        assert_eq!(coach.pause(1_000), Some(CoachEvent::Paused));
        assert_eq!(coach.pause(1_100), None);
        let outcome = coach.tick(2_000, Some(&arm_pose(45.0)));
        assert!(!outcome.processed);
        assert!(outcome.snapshot.paused);

        assert_eq!(coach.resume(4_000), Some(CoachEvent::Resumed));
        coach.tick(4_500, Some(&arm_pose(170.0)));

        assert_eq!(coach.state().rep_count, 1);
        assert_eq!(coach.state().timer.elapsed_ms(), 1_000 + 500);
    }

    #[test]
    fn skip_records_partial_progress() {
        let mut coach = controller();
        coach.start(vec![curls(10), curls(10)]).unwrap();
        coach.tick(0, Some(&arm_pose(45.0)));
        coach.tick(100, Some(&arm_pose(170.0)));

        let events = coach.skip(200).unwrap();
        assert_eq!(coach.history()[0].achieved, 1.0);
        assert_eq!(coach.state().plan_index, 1);
        assert_eq!(events.len(), 2);

        coach.skip(300).unwrap();
        assert_eq!(coach.phase(), WorkoutPhase::Completed);
        assert!(matches!(coach.skip(400), Err(CoachError::NotInProgress)));
    }

    #[test]
    fn reset_returns_to_not_started() {
        let mut coach = controller();
        coach.start(vec![curls(1), curls(1)]).unwrap();
        coach.skip(0).unwrap();

        coach.reset();

        assert_eq!(coach.phase(), WorkoutPhase::NotStarted);
        assert!(coach.history().is_empty());
        assert!(coach.plan().is_empty());
        assert_eq!(coach.state(), &SessionState::new());
        assert!(!coach.tick(0, None).processed);
    }
}
