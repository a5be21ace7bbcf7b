//! Exercise policies: per-exercise rep counting, form scoring and feedback.
//!
//! Every policy is a pure function of the current joints and the prior
//! stage/rep count. Reps use two-threshold hysteresis: the pose has to pass
//! the compress threshold and then the more lenient release threshold before
//! one rep is counted, so jitter around either boundary never double counts.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    config::{HoldRule, PolicyConfig, RepRule},
    geometry::{angle_at, vertical_distance},
    pose::{Joint, JointMap, JointPoint},
    session::{Feedback, Stage},
    CoachError, ExerciseKind, Result,
};

/// Body side a policy measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Anatomical role of a joint, independent of side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Shoulder,
    Elbow,
    Wrist,
    Hip,
    Knee,
    Ankle,
}

impl Side {
    pub fn joint(self, role: Role) -> Joint {
        match (self, role) {
            (Side::Left, Role::Shoulder) => Joint::LeftShoulder,
            (Side::Left, Role::Elbow) => Joint::LeftElbow,
            (Side::Left, Role::Wrist) => Joint::LeftWrist,
            (Side::Left, Role::Hip) => Joint::LeftHip,
            (Side::Left, Role::Knee) => Joint::LeftKnee,
            (Side::Left, Role::Ankle) => Joint::LeftAnkle,
            (Side::Right, Role::Shoulder) => Joint::RightShoulder,
            (Side::Right, Role::Elbow) => Joint::RightElbow,
            (Side::Right, Role::Wrist) => Joint::RightWrist,
            (Side::Right, Role::Hip) => Joint::RightHip,
            (Side::Right, Role::Knee) => Joint::RightKnee,
            (Side::Right, Role::Ankle) => Joint::RightAnkle,
        }
    }
}

const ARM: &[Role] = &[Role::Shoulder, Role::Elbow, Role::Wrist];
const LEG: &[Role] = &[Role::Hip, Role::Knee, Role::Ankle];
const BODY_LINE: &[Role] = &[Role::Shoulder, Role::Hip, Role::Ankle];
const PUSH_UP: &[Role] = &[Role::Shoulder, Role::Elbow, Role::Wrist, Role::Hip, Role::Ankle];
const SPREAD: &[Role] = &[Role::Wrist, Role::Ankle];

/// Stage and rep count a policy builds on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorState {
    pub stage: Stage,
    pub rep_count: u32,
}

/// Result of evaluating one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyUpdate {
    pub stage: Stage,
    pub rep_count: u32,
    /// `None` when the exercise has no registered policy.
    pub form_score: Option<f32>,
    pub feedback: Feedback,
    pub side: Option<Side>,
}

/// One case per known exercise, carrying its thresholds as data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExercisePolicy {
    BicepCurl(RepRule),
    Squat(RepRule),
    PushUp(RepRule),
    JumpingJack(RepRule),
    Lunge(RepRule),
    Plank(HoldRule),
    /// Exercise without a registered policy: progression and timing only.
    Fallback,
}

impl ExercisePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BicepCurl(_) => "bicep curl",
            Self::Squat(_) => "squat",
            Self::PushUp(_) => "push-up",
            Self::JumpingJack(_) => "jumping jack",
            Self::Lunge(_) => "lunge",
            Self::Plank(_) => "plank",
            Self::Fallback => "fallback",
        }
    }

    pub fn is_registered(&self) -> bool {
        !matches!(self, Self::Fallback)
    }

    /// Kind of exercise the policy measures, `None` for the fallback.
    pub fn kind(&self) -> Option<ExerciseKind> {
        match self {
            Self::Plank(_) => Some(ExerciseKind::Hold),
            Self::Fallback => None,
            _ => Some(ExerciseKind::Reps),
        }
    }

    /// Form score above which feedback is positive and hold time accrues.
    pub fn quality_bar(&self) -> f32 {
        match self {
            Self::BicepCurl(rule)
            | Self::Squat(rule)
            | Self::PushUp(rule)
            | Self::JumpingJack(rule)
            | Self::Lunge(rule) => rule.quality_bar,
            Self::Plank(rule) => rule.quality_bar,
            Self::Fallback => 0.0,
        }
    }

    /// Joint roles that must be confidently detected on one side.
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            Self::BicepCurl(_) => ARM,
            Self::Squat(_) | Self::Lunge(_) => LEG,
            Self::PushUp(_) => PUSH_UP,
            Self::JumpingJack(_) => SPREAD,
            Self::Plank(_) => BODY_LINE,
            Self::Fallback => &[],
        }
    }

    /// Evaluates a frame. Yields `None` when a required joint is missing or
    /// below `score_floor`, leaving the prior state untouched.
    pub fn evaluate(&self, joints: &JointMap, prior: PriorState, score_floor: f32) -> Option<PolicyUpdate> {
        if let Self::Fallback = self {
            return Some(PolicyUpdate {
                stage: prior.stage,
                rep_count: prior.rep_count,
                form_score: None,
                feedback: Feedback::info("Keep going!"),
                side: None,
            });
        }

        let side = pick_side(joints, self.required_roles(), score_floor)?;
        let point = |role: Role| joints.get(side.joint(role)).map(JointPoint::xy);

        let (stage, rep_count, form_score, good, warning) = match *self {
            Self::BicepCurl(rule) => {
                let angle = angle_at(point(Role::Shoulder)?, point(Role::Elbow)?, point(Role::Wrist)?);
                let (stage, reps) = count(rule, Stage::Up, angle, prior);
                (stage, reps, angle_score(rule.ideal, angle), "Great curl!", "Control the motion")
            }
            Self::Squat(rule) => {
                let angle = angle_at(point(Role::Hip)?, point(Role::Knee)?, point(Role::Ankle)?);
                let (stage, reps) = count(rule, Stage::Down, angle, prior);
                (stage, reps, angle_score(rule.ideal, angle), "Nice squat depth!", "Lower a bit more")
            }
            Self::Lunge(rule) => {
                let angle = angle_at(point(Role::Hip)?, point(Role::Knee)?, point(Role::Ankle)?);
                let (stage, reps) = count(rule, Stage::Down, angle, prior);
                (stage, reps, angle_score(rule.ideal, angle), "Great lunge!", "Lower front knee")
            }
            Self::PushUp(rule) => {
                let shoulder = point(Role::Shoulder)?;
                let elbow = angle_at(shoulder, point(Role::Elbow)?, point(Role::Wrist)?);
                let line = angle_at(shoulder, point(Role::Hip)?, point(Role::Ankle)?);
                let (stage, reps) = count(rule, Stage::Down, elbow, prior);
                (stage, reps, angle_score(rule.ideal, line), "Strong plank line!", "Keep your core tight")
            }
            Self::JumpingJack(rule) => {
                let distance = vertical_distance(point(Role::Wrist)?, point(Role::Ankle)?);
                let (stage, reps) = count(rule, Stage::Up, distance, prior);
                (stage, reps, spread_score(rule.ideal, distance), "Explosive!", "Reach higher")
            }
            Self::Plank(rule) => {
                let line = angle_at(point(Role::Shoulder)?, point(Role::Hip)?, point(Role::Ankle)?);
                (
                    prior.stage,
                    prior.rep_count,
                    angle_score(rule.ideal, line),
                    "Hold it steady!",
                    "Keep your back flat",
                )
            }
            Self::Fallback => return None,
        };

        let feedback = if form_score > self.quality_bar() {
            Feedback::good(good)
        } else {
            Feedback::warning(warning)
        };

        Some(PolicyUpdate {
            stage,
            rep_count,
            form_score: Some(form_score),
            feedback,
            side: Some(side),
        })
    }
}

/// Resolves exercise names to policies using the configured thresholds.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    config: PolicyConfig,
}

impl PolicyRegistry {
    /// Rejects thresholds that would let one frame both compress and release.
    pub fn new(config: PolicyConfig) -> Result<Self> {
        let rules = [
            ("bicep_curl", &config.bicep_curl),
            ("squat", &config.squat),
            ("push_up", &config.push_up),
            ("jumping_jack", &config.jumping_jack),
            ("lunge", &config.lunge),
        ];
        for (name, rule) in rules {
            if rule.compress_below.partial_cmp(&rule.release_above) != Some(Ordering::Less) {
                return Err(CoachError::msg(format!(
                    "policy `{name}` must compress below its release threshold ({} >= {})",
                    rule.compress_below, rule.release_above
                )));
            }
        }
        Ok(Self { config })
    }

    pub fn score_floor(&self) -> f32 {
        self.config.score_floor
    }

    /// Looks a policy up by exercise name. Case and punctuation are ignored,
    /// and a trailing plural `s` is only dropped when the name as written is
    /// not itself a known key, so "Push-ups" and "push up" resolve alike.
    pub fn resolve(&self, exercise_name: &str) -> ExercisePolicy {
        let key = policy_key(exercise_name);
        self.lookup(&key)
            .or_else(|| key.strip_suffix('s').and_then(|singular| self.lookup(singular)))
            .unwrap_or(ExercisePolicy::Fallback)
    }

    fn lookup(&self, key: &str) -> Option<ExercisePolicy> {
        let config = &self.config;
        let policy = match key {
            "bicepcurl" | "curl" => ExercisePolicy::BicepCurl(config.bicep_curl),
            "squat" => ExercisePolicy::Squat(config.squat),
            "pushup" => ExercisePolicy::PushUp(config.push_up),
            "jumpingjack" => ExercisePolicy::JumpingJack(config.jumping_jack),
            "lunge" => ExercisePolicy::Lunge(config.lunge),
            "plank" => ExercisePolicy::Plank(config.plank),
            _ => return None,
        };
        Some(policy)
    }
}

fn policy_key(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Picks the side whose required joints all meet the floor, preferring the
/// more confident side and the left one on ties.
fn pick_side(joints: &JointMap, roles: &[Role], floor: f32) -> Option<Side> {
    [Side::Left, Side::Right]
        .into_iter()
        .filter_map(|side| {
            roles
                .iter()
                .map(|role| joints.confident(side.joint(*role), floor).map(|p| p.score))
                .sum::<Option<f32>>()
                .map(|total| (side, total))
        })
        .fold(None, |best: Option<(Side, f32)>, candidate| match best {
            Some(best) if best.1 >= candidate.1 => Some(best),
            _ => Some(candidate),
        })
        .map(|(side, _)| side)
}

/// Two-threshold hysteresis step.
fn count(rule: RepRule, compressed: Stage, value: f32, prior: PriorState) -> (Stage, u32) {
    let released = match compressed {
        Stage::Up => Stage::Down,
        _ => Stage::Up,
    };
    let mut stage = prior.stage;
    let mut reps = prior.rep_count;

    if value < rule.compress_below && stage != compressed {
        stage = compressed;
    }
    if value > rule.release_above && stage == compressed {
        stage = released;
        reps += 1;
    }

    (stage, reps)
}

fn angle_score(ideal: f32, measured: f32) -> f32 {
    (100.0 - (ideal - measured).abs()).clamp(0.0, 100.0)
}

fn spread_score(full_spread: f32, distance: f32) -> f32 {
    if full_spread <= 0.0 {
        return 0.0;
    }
    (distance / full_spread * 100.0).clamp(0.0, 100.0)
}
