use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Lateral lip position relative to the face midline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LipPosition {
    Left,
    Right,
    #[default]
    Center,
}

impl LipPosition {
    /// The position seen in a horizontally mirrored frame.
    pub fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Center => Self::Center,
        }
    }
}

impl AsRef<str> for LipPosition {
    fn as_ref(&self) -> &str {
        match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Center => "CENTER",
        }
    }
}

impl Display for LipPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl FromStr for LipPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            "center" | "centre" | "c" => Ok(Self::Center),
            _ => Err(format!("Unknown lip position: {s}")),
        }
    }
}

/// Control values derived from a single frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureState {
    /// 0 means closed. Larger is more open.
    pub mouth_opening: f32,
    pub lip_position: LipPosition,
}

impl GestureState {
    /// The safe output for a frame without a usable detection.
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn is_neutral(&self) -> bool {
        self.mouth_opening == 0.0 && self.lip_position == LipPosition::Center
    }
}
