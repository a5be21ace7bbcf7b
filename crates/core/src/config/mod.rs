use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level configuration structure for the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub gate: GateConfig,
    pub policies: PolicyConfig,
    pub display: DisplayConfig,
    /// Refuse to start plans containing exercises without a registered
    /// policy instead of coaching them with generic feedback.
    pub strict_policies: bool,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Thresholds used to decide whether a person is present and the pose usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum per-joint score for a joint to count as confident.
    pub score_threshold: f32,
    /// Confident joints required before the pose is usable.
    pub min_confident_joints: usize,
    /// Consecutive frames without a pose before presence is dropped.
    pub absent_frame_threshold: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.3,
            min_confident_joints: 8,
            absent_frame_threshold: 5,
        }
    }
}

/// Target surface the normaliser scales joints into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Two-threshold hysteresis and scoring constants for a repetition exercise.
///
/// A rep starts when the measured value drops below `compress_below` and is
/// counted once it rises above `release_above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepRule {
    pub compress_below: f32,
    pub release_above: f32,
    /// Ideal joint angle, or the full-spread distance for spread scoring.
    pub ideal: f32,
    /// Form score above which feedback is positive.
    pub quality_bar: f32,
}

impl RepRule {
    pub const fn new(compress_below: f32, release_above: f32, ideal: f32, quality_bar: f32) -> Self {
        Self {
            compress_below,
            release_above,
            ideal,
            quality_bar,
        }
    }
}

/// Scoring constants for an isometric hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldRule {
    /// Ideal shoulder-hip-ankle body line angle.
    pub ideal: f32,
    /// Form score hold time is accrued above.
    pub quality_bar: f32,
}

/// Tunable constants for every registered exercise policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Minimum score for each joint a policy requires.
    pub score_floor: f32,
    pub bicep_curl: RepRule,
    pub squat: RepRule,
    /// Reps are counted on the elbow angle, form is scored on the body line.
    pub push_up: RepRule,
    /// Measured on wrist-to-ankle vertical distance in display pixels.
    pub jumping_jack: RepRule,
    pub lunge: RepRule,
    pub plank: HoldRule,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            score_floor: 0.3,
            bicep_curl: RepRule::new(60.0, 150.0, 110.0, 80.0),
            squat: RepRule::new(90.0, 165.0, 100.0, 80.0),
            push_up: RepRule::new(90.0, 160.0, 170.0, 80.0),
            jumping_jack: RepRule::new(140.0, 220.0, 240.0, 70.0),
            lunge: RepRule::new(110.0, 165.0, 100.0, 80.0),
            plank: HoldRule {
                ideal: 180.0,
                quality_bar: 80.0,
            },
        }
    }
}
