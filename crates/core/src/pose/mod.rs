//! Canonical joint model and the keypoint normaliser.
//!
//! Pose estimators disagree on how they label joints: some emit
//! `left_shoulder`, some `leftShoulder`, some only a positional index in the
//! 17 point COCO order. Everything downstream of [`normalize`] only ever sees
//! the canonical [`Joint`] keys of a [`JointMap`], already scaled into display
//! space.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::DisplayConfig;

/// The 17 body landmarks tracked by the engine, in COCO order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Joint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    pub const COUNT: usize = 17;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::Nose,
        Joint::LeftEye,
        Joint::RightEye,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    /// Looks up a joint by its position in the COCO ordering.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Resolves a model specific joint name. Both `snake_case` and
    /// `camelCase` spellings are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let joint = match name {
            "nose" => Self::Nose,
            "left_eye" | "leftEye" => Self::LeftEye,
            "right_eye" | "rightEye" => Self::RightEye,
            "left_ear" | "leftEar" => Self::LeftEar,
            "right_ear" | "rightEar" => Self::RightEar,
            "left_shoulder" | "leftShoulder" => Self::LeftShoulder,
            "right_shoulder" | "rightShoulder" => Self::RightShoulder,
            "left_elbow" | "leftElbow" => Self::LeftElbow,
            "right_elbow" | "rightElbow" => Self::RightElbow,
            "left_wrist" | "leftWrist" => Self::LeftWrist,
            "right_wrist" | "rightWrist" => Self::RightWrist,
            "left_hip" | "leftHip" => Self::LeftHip,
            "right_hip" | "rightHip" => Self::RightHip,
            "left_knee" | "leftKnee" => Self::LeftKnee,
            "right_knee" | "rightKnee" => Self::RightKnee,
            "left_ankle" | "leftAnkle" => Self::LeftAnkle,
            "right_ankle" | "rightAnkle" => Self::RightAnkle,
            _ => return None,
        };
        Some(joint)
    }

    /// Canonical (camelCase) name of the joint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "leftEye",
            Self::RightEye => "rightEye",
            Self::LeftEar => "leftEar",
            Self::RightEar => "rightEar",
            Self::LeftShoulder => "leftShoulder",
            Self::RightShoulder => "rightShoulder",
            Self::LeftElbow => "leftElbow",
            Self::RightElbow => "rightElbow",
            Self::LeftWrist => "leftWrist",
            Self::RightWrist => "rightWrist",
            Self::LeftHip => "leftHip",
            Self::RightHip => "rightHip",
            Self::LeftKnee => "leftKnee",
            Self::RightKnee => "rightKnee",
            Self::LeftAnkle => "leftAnkle",
            Self::RightAnkle => "rightAnkle",
        }
    }
}

/// A joint position in display space with its detection confidence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointPoint {
    pub x: f32,
    pub y: f32,
    /// Detection confidence (0.0 - 1.0)
    pub score: f32,
}

impl JointPoint {
    pub fn new(x: f32, y: f32, score: f32) -> Self {
        Self { x, y, score }
    }

    /// Whether the detection confidence reaches `threshold`.
    pub fn meets(&self, threshold: f32) -> bool {
        self.score >= threshold
    }

    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Canonical joints detected in one frame. Absent joints are unknown, not
/// zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointMap {
    joints: BTreeMap<Joint, JointPoint>,
}

impl JointMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, joint: Joint, point: JointPoint) {
        self.joints.insert(joint, point);
    }

    pub fn get(&self, joint: Joint) -> Option<&JointPoint> {
        self.joints.get(&joint)
    }

    /// Returns the joint only when its score reaches `floor`.
    pub fn confident(&self, joint: Joint, floor: f32) -> Option<&JointPoint> {
        self.get(joint).filter(|point| point.meets(floor))
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, &JointPoint)> {
        self.joints.iter().map(|(joint, point)| (*joint, point))
    }

    /// Scores of every joint reaching `threshold`.
    pub fn confident_scores(&self, threshold: f32) -> Vec<f32> {
        self.joints
            .values()
            .filter(|point| point.meets(threshold))
            .map(|point| point.score)
            .collect()
    }
}

impl FromIterator<(Joint, JointPoint)> for JointMap {
    fn from_iter<T: IntoIterator<Item = (Joint, JointPoint)>>(iter: T) -> Self {
        Self {
            joints: iter.into_iter().collect(),
        }
    }
}

/// A joint exactly as reported by the pose estimator, in source frame pixels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawJoint {
    /// Model specific joint name. When absent the joint is identified by its
    /// position in the sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub score: f32,
}

impl RawJoint {
    pub fn named(name: impl Into<String>, x: f32, y: f32, score: f32) -> Self {
        Self {
            name: Some(name.into()),
            x,
            y,
            score,
        }
    }

    pub fn positional(x: f32, y: f32, score: f32) -> Self {
        Self {
            name: None,
            x,
            y,
            score,
        }
    }
}

/// One pose returned by the estimator for a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    pub joints: Vec<RawJoint>,
    /// Pixel width of the frame the estimator ran on.
    pub source_width: u32,
    /// Pixel height of the frame the estimator ran on.
    pub source_height: u32,
}

impl PoseSample {
    pub fn new(joints: Vec<RawJoint>, source_width: u32, source_height: u32) -> Self {
        Self {
            joints,
            source_width,
            source_height,
        }
    }

    /// Horizontal and vertical factors mapping source pixels onto the display.
    /// A zero sized source dimension leaves that axis unscaled.
    pub fn scale_to(&self, display: &DisplayConfig) -> (f32, f32) {
        (
            axis_scale(display.width, self.source_width),
            axis_scale(display.height, self.source_height),
        )
    }
}

fn axis_scale(display: u32, source: u32) -> f32 {
    if source == 0 {
        1.0
    } else {
        display as f32 / source as f32
    }
}

/// Maps a raw pose sample onto canonical joints in display space.
///
/// Unrecognised names, out of range positions and non-finite coordinates are
/// dropped silently so a single bad joint never fails the frame.
pub fn normalize(sample: &PoseSample, display: &DisplayConfig) -> JointMap {
    let (scale_x, scale_y) = sample.scale_to(display);

    sample
        .joints
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let joint = match raw.name.as_deref() {
                Some(name) => Joint::from_name(name)?,
                None => Joint::from_index(index)?,
            };
            if !raw.x.is_finite() || !raw.y.is_finite() {
                return None;
            }
            let score = if raw.score.is_finite() {
                raw.score.clamp(0.0, 1.0)
            } else {
                0.0
            };
            Some((
                joint,
                JointPoint::new(raw.x * scale_x, raw.y * scale_y, score),
            ))
        })
        .collect()
}
