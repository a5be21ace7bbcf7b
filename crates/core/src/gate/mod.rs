//! Confidence gate - decides per frame whether a person is reliably present.
//!
//! Presence is debounced: a person is only considered gone after
//! `absent_frame_threshold` consecutive frames without a pose, while a single
//! frame with a pose restores presence immediately.

use serde::{Deserialize, Serialize};

use crate::{config::GateConfig, pose::JointMap};

/// Edge of the debounced presence signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceTransition {
    Lost,
    Regained,
}

/// Result of gating a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateReading {
    /// Debounced presence after this frame.
    pub person_present: bool,
    /// The estimator returned a pose for this frame.
    pub pose_detected: bool,
    /// Enough confident joints were detected to trust the pose.
    pub pose_usable: bool,
    /// Rounded mean confidence of the confident joints, 0 when unusable or
    /// when no joint is confident.
    pub confidence_pct: u8,
    pub low_confidence_notice: bool,
    pub transition: Option<PresenceTransition>,
}

#[derive(Debug, Clone)]
pub struct ConfidenceGate {
    config: GateConfig,
    absent_frames: u32,
    person_present: bool,
}

impl ConfidenceGate {
    /// Starts out assuming the person is present.
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            absent_frames: 0,
            person_present: true,
        }
    }

    pub fn person_present(&self) -> bool {
        self.person_present
    }

    pub fn absent_frames(&self) -> u32 {
        self.absent_frames
    }

    pub fn reset(&mut self) {
        self.absent_frames = 0;
        self.person_present = true;
    }

    /// Feeds one frame. `None` means the estimator returned no pose.
    pub fn observe(&mut self, joints: Option<&JointMap>) -> GateReading {
        match joints {
            Some(joints) => {
                self.absent_frames = 0;
                let transition = if self.person_present {
                    None
                } else {
                    self.person_present = true;
                    Some(PresenceTransition::Regained)
                };
                let (pose_usable, confidence_pct) = self.assess(joints);

                GateReading {
                    person_present: true,
                    pose_detected: true,
                    pose_usable,
                    confidence_pct,
                    low_confidence_notice: false,
                    transition,
                }
            }
            None => {
                self.absent_frames = self.absent_frames.saturating_add(1);
                let mut transition = None;
                if self.person_present && self.absent_frames >= self.config.absent_frame_threshold {
                    self.person_present = false;
                    transition = Some(PresenceTransition::Lost);
                }

                GateReading {
                    person_present: self.person_present,
                    pose_detected: false,
                    pose_usable: false,
                    confidence_pct: 0,
                    low_confidence_notice: !self.person_present,
                    transition,
                }
            }
        }
    }

    /// Usability and confidence percentage of a detected pose.
    fn assess(&self, joints: &JointMap) -> (bool, u8) {
        let scores = joints.confident_scores(self.config.score_threshold);
        if scores.len() < self.config.min_confident_joints {
            return (false, 0);
        }
        if scores.is_empty() {
            return (true, 0);
        }

        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        // Never report a usable pose with confident joints as 0%.
        (true, ((mean * 100.0).round() as u8).clamp(1, 100))
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Joint, JointPoint};

    fn pose_with(count: usize, score: f32) -> JointMap {
        Joint::ALL
            .iter()
            .take(count)
            .map(|joint| (*joint, JointPoint::new(0.0, 0.0, score)))
            .collect()
    }

    #[test]
    fn four_gaps_never_drop_presence() {
        let mut gate = ConfidenceGate::default();
        for _ in 0..4 {
            let reading = gate.observe(None);
            assert!(reading.person_present);
            assert!(!reading.low_confidence_notice);
            assert_eq!(reading.transition, None);
        }

        let pose = pose_with(17, 0.9);
        let reading = gate.observe(Some(&pose));
        assert!(reading.person_present);
        assert_eq!(reading.transition, None);
        assert_eq!(gate.absent_frames(), 0);
    }

    #[test]
    fn fifth_gap_drops_presence_once() {
        let mut gate = ConfidenceGate::default();
        let mut lost = 0;
        for _ in 0..8 {
            let reading = gate.observe(None);
            if reading.transition == Some(PresenceTransition::Lost) {
                lost += 1;
            }
        }

        assert_eq!(lost, 1);
        assert!(!gate.person_present());
        assert!(gate.observe(None).low_confidence_notice);
    }

    #[test]
    fn single_pose_frame_restores_presence() {
        let mut gate = ConfidenceGate::default();
        for _ in 0..5 {
            gate.observe(None);
        }

        let pose = pose_with(17, 0.9);
        let reading = gate.observe(Some(&pose));
        assert_eq!(reading.transition, Some(PresenceTransition::Regained));
        assert!(reading.person_present);
        assert!(!reading.low_confidence_notice);
    }

    #[test]
    fn sparse_pose_is_present_but_not_usable() {
        let mut gate = ConfidenceGate::default();
        let pose = pose_with(7, 0.9);
        let reading = gate.observe(Some(&pose));

        assert!(reading.person_present);
        assert!(!reading.pose_usable);
        assert_eq!(reading.confidence_pct, 0);
    }

    #[test]
    fn confidence_is_mean_of_confident_joints() {
        let mut gate = ConfidenceGate::default();
        let mut pose = pose_with(8, 0.8);
        pose.insert(Joint::RightAnkle, JointPoint::new(0.0, 0.0, 0.1));

        let reading = gate.observe(Some(&pose));
        assert!(reading.pose_usable);
        assert_eq!(reading.confidence_pct, 80);
    }

    #[test]
    fn zero_minimum_accepts_a_pose_without_confident_joints() {
        let mut gate = ConfidenceGate::new(GateConfig {
            min_confident_joints: 0,
            ..GateConfig::default()
        });
        let pose = pose_with(17, 0.1);
        let reading = gate.observe(Some(&pose));

        assert!(reading.pose_usable);
        assert_eq!(reading.confidence_pct, 0);
    }
}
