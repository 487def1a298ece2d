/*!
Turns one frame of face landmarks into game control values.

Two independent axes are produced: how far the mouth is open (throttle) and
which side of the face midline the lips sit on (steering). The extractor holds
nothing between frames except its configuration.
*/

use std::fmt::Display;

use log::debug;

use crate::{
    config::ExtractorConfig,
    model::{GestureState, LandmarkSet, LipPosition},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    InsufficientLandmarks { required: usize, available: usize },
    NonFiniteLandmark { index: usize },
}

impl Display for GestureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientLandmarks {
                required,
                available,
            } => write!(
                f,
                "Insufficient landmarks: need {required}, have {available}"
            ),
            Self::NonFiniteLandmark { index } => {
                write!(f, "Landmark {index} has a non-finite coordinate")
            }
        }
    }
}

impl std::error::Error for GestureError {}

type Result<T> = std::result::Result<T, GestureError>;

#[derive(Debug, Default, Clone)]
pub struct GestureExtractor {
    config: ExtractorConfig,
}

impl GestureExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn ensure_len(landmarks: &LandmarkSet, required: usize) -> Result<()> {
        if landmarks.len() < required {
            return Err(GestureError::InsufficientLandmarks {
                required,
                available: landmarks.len(),
            });
        }

        Ok(())
    }

    fn ensure_finite(landmarks: &LandmarkSet, index: usize) -> Result<()> {
        let point = &landmarks[index];
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(GestureError::NonFiniteLandmark { index });
        }

        Ok(())
    }

    /// Distance between the upper and lower lip centers.
    ///
    /// Anything strictly below the closed-mouth threshold is clamped to exactly 0
    /// so sensor noise at rest never produces throttle.
    pub fn compute_mouth_opening(&self, landmarks: &LandmarkSet) -> Result<f32> {
        Self::ensure_len(landmarks, self.config.required_for_mouth_opening())?;

        Self::ensure_finite(landmarks, self.config.upper_lip)?;
        Self::ensure_finite(landmarks, self.config.lower_lip)?;

        let upper = &landmarks[self.config.upper_lip];
        let lower = &landmarks[self.config.lower_lip];
        let distance = upper.distance_2d(lower);
        if !distance.is_finite() {
            return Err(GestureError::NonFiniteLandmark {
                index: self.config.lower_lip,
            });
        }

        if distance < self.config.closed_mouth_threshold {
            debug!("Mouth closed");
            Ok(0.0)
        } else {
            debug!("Mouth opening distance: {distance}");
            Ok(distance)
        }
    }

    /// Classify the lips as left, right or centered relative to the reference point.
    ///
    /// Lip points lying exactly on the midline count towards neither side. The
    /// classification only leaves CENTER when the side counts differ by more
    /// than the configured tolerance.
    pub fn compute_lip_position(&self, landmarks: &LandmarkSet) -> Result<LipPosition> {
        Self::ensure_len(landmarks, self.config.required_for_lip_position())?;

        Self::ensure_finite(landmarks, self.config.reference)?;
        let reference_x = landmarks[self.config.reference].x;

        let (left, right) =
            self.config
                .lip_indices
                .iter()
                .fold((0usize, 0usize), |(left, right), &idx| {
                    let x = landmarks[idx].x;
                    if x < reference_x {
                        (left + 1, right)
                    } else if x > reference_x {
                        (left, right + 1)
                    } else {
                        (left, right)
                    }
                });

        let position = if left.abs_diff(right) > self.config.lip_tolerance {
            if left > right {
                LipPosition::Left
            } else {
                LipPosition::Right
            }
        } else {
            LipPosition::Center
        };

        debug!("Lip position: {position} (left {left}, right {right})");

        Ok(position)
    }

    /// Compute both axes for a frame. Never fails: an axis that cannot be
    /// computed falls back to its neutral value.
    pub fn extract(&self, landmarks: &LandmarkSet) -> GestureState {
        let mouth_opening = self.compute_mouth_opening(landmarks).unwrap_or_else(|e| {
            debug!("{e}, treating mouth as closed");
            0.0
        });
        let lip_position = self.compute_lip_position(landmarks).unwrap_or_else(|e| {
            debug!("{e}, treating lips as centered");
            LipPosition::Center
        });

        GestureState {
            mouth_opening,
            lip_position,
        }
    }
}
