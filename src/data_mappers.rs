//! Mapping gesture states onto game controls.

mod steering;
mod throttle;

pub use steering::SteeringMapper;
pub use throttle::ThrottleMapper;

use crate::model::GestureState;

/// Converts a frame's gesture state into a value a game controller applies directly.
pub trait Mapper {
    type Output;

    fn map(&self, state: &GestureState) -> Self::Output;
}
