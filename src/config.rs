use std::{fmt::Display, path::Path};

use log::error;
use serde::{Deserialize, Serialize};

/// MediaPipe face mesh indices around the lips.
pub const DEFAULT_LIP_INDICES: [usize; 16] = [
    0, 13, 14, 17, 78, 191, 80, 81, 82, 311, 308, 402, 317, 324, 291, 61,
];

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Unable to read config: {e}"),
            Self::Parse(e) => write!(f, "Unable to parse config: {e}"),
            Self::Invalid(reason) => write!(f, "Invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

type Result<T> = std::result::Result<T, ConfigError>;

/// Landmark topology and thresholds used by the gesture extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Upper lip center.
    pub upper_lip: usize,
    /// Lower lip center.
    pub lower_lip: usize,
    /// Horizontal midline of the face (nose bridge).
    pub reference: usize,
    pub lip_indices: Vec<usize>,
    /// Lower bound on the set size before lip position is attempted at all.
    pub min_lip_position_landmarks: usize,
    /// Openings strictly below this are reported as exactly 0.
    pub closed_mouth_threshold: f32,
    /// Left/right count difference that must be exceeded to leave CENTER.
    pub lip_tolerance: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            upper_lip: 13,
            lower_lip: 14,
            reference: 1,
            lip_indices: DEFAULT_LIP_INDICES.to_vec(),
            min_lip_position_landmarks: 170,
            closed_mouth_threshold: 0.01,
            lip_tolerance: 2,
        }
    }
}

impl ExtractorConfig {
    pub fn required_for_mouth_opening(&self) -> usize {
        self.upper_lip.max(self.lower_lip) + 1
    }

    pub fn required_for_lip_position(&self) -> usize {
        let highest = self
            .lip_indices
            .iter()
            .copied()
            .chain(std::iter::once(self.reference))
            .max()
            .unwrap_or_default();

        self.min_lip_position_landmarks.max(highest + 1)
    }

    fn validate(&self) -> Result<()> {
        if self.lip_indices.is_empty() {
            return Err(ConfigError::Invalid("lip_indices must not be empty".into()));
        }
        if self.lip_tolerance == 0 {
            return Err(ConfigError::Invalid(
                "lip_tolerance must be at least 1".into(),
            ));
        }
        if !(self.closed_mouth_threshold >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "closed_mouth_threshold must be non-negative, got {}",
                self.closed_mouth_threshold
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Word similarity that must be exceeded to earn partial credit.
    pub similarity_threshold: f32,
    /// Fraction of the score lost per word of length mismatch, relative to the prompt length.
    pub length_penalty_weight: f32,
    /// Floor for the length multiplier.
    pub min_length_multiplier: f32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            length_penalty_weight: 0.5,
            min_length_multiplier: 0.5,
        }
    }
}

impl ScorerConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::Invalid(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if !(self.length_penalty_weight >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "length_penalty_weight must be non-negative, got {}",
                self.length_penalty_weight
            )));
        }
        if !(0.0..=1.0).contains(&self.min_length_multiplier) {
            return Err(ConfigError::Invalid(format!(
                "min_length_multiplier must be within [0, 1], got {}",
                self.min_length_multiplier
            )));
        }

        Ok(())
    }
}

/// Mouth opening to car speed curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    pub base_speed: f32,
    pub speed_per_step: f32,
    pub step: f32,
    pub max_speed: f32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            base_speed: 50.0,
            speed_per_step: 25.0,
            step: 0.01,
            max_speed: 400.0,
        }
    }
}

impl ThrottleConfig {
    fn validate(&self) -> Result<()> {
        if !(self.step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if !(self.max_speed >= self.base_speed) {
            return Err(ConfigError::Invalid(format!(
                "max_speed {} is below base_speed {}",
                self.max_speed, self.base_speed
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extractor: ExtractorConfig,
    pub scorer: ScorerConfig,
    pub throttle: ThrottleConfig,
}

impl Config {
    /// Load a JSON config. Missing fields fall back to their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            error!("Unable to read {}: {e}", path.display());
            ConfigError::from(e)
        })?;

        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let config = serde_json::from_str::<Config>(data)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.extractor.validate()?;
        self.scorer.validate()?;
        self.throttle.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn required_counts() {
        let config = ExtractorConfig::default();

        assert_eq!(config.required_for_mouth_opening(), 15);
        // Highest lip index is 402, above the 170 floor.
        assert_eq!(config.required_for_lip_position(), 403);
    }

    #[test]
    fn required_count_respects_floor() {
        let config = ExtractorConfig {
            lip_indices: vec![2, 3, 4],
            ..Default::default()
        };

        assert_eq!(config.required_for_lip_position(), 170);
    }

    #[test]
    fn partial_json() {
        let config = Config::from_json(r#"{"extractor": {"lip_tolerance": 4}}"#).unwrap();

        assert_eq!(config.extractor.lip_tolerance, 4);
        assert_eq!(config.extractor.upper_lip, 13);
        assert_eq!(config.scorer, ScorerConfig::default());
    }

    #[test]
    fn empty_json_object() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn reject_empty_lip_indices() {
        let err = Config::from_json(r#"{"extractor": {"lip_indices": []}}"#).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn reject_zero_lip_tolerance() {
        let err = Config::from_json(r#"{"extractor": {"lip_tolerance": 0}}"#).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn reject_bad_similarity_threshold() {
        let err = Config::from_json(r#"{"scorer": {"similarity_threshold": 1.5}}"#).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn reject_zero_step() {
        let err = Config::from_json(r#"{"throttle": {"step": 0.0}}"#).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn reject_malformed_json() {
        let err = Config::from_json("{").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file() {
        let err = Config::from_path("/nonexistent/oro.json").unwrap_err();

        assert!(matches!(err, ConfigError::Io(_)));
    }
}
