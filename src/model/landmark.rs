use serde::{Deserialize, Serialize};

/// A single detected point on a tracked face, in normalized image coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn with_depth(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Planar distance to `other`. Depth is ignored.
    pub fn distance_2d(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;

        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f32, f32)> for Landmark {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// One face in one frame.
///
/// Indices are stable across frames for the same logical point, so lookups
/// by fixed index (e.g. upper lip center) stay meaningful.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet(Vec<Landmark>);

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self(points)
    }

    /// A copy with every x coordinate reflected about `axis_x`.
    pub fn mirrored(&self, axis_x: f32) -> Self {
        Self(
            self.0
                .iter()
                .map(|p| Landmark::with_depth(2.0 * axis_x - p.x, p.y, p.z))
                .collect(),
        )
    }

    pub fn into_inner(self) -> Vec<Landmark> {
        self.0
    }
}

impl std::ops::Deref for LandmarkSet {
    type Target = [Landmark];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(value: Vec<Landmark>) -> Self {
        Self(value)
    }
}

impl FromIterator<Landmark> for LandmarkSet {
    fn from_iter<T: IntoIterator<Item = Landmark>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
