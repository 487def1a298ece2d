use super::Mapper;
use crate::model::{GestureState, LipPosition};

/// Lip position to horizontal velocity for the dodge player.
#[derive(Debug, Clone)]
pub struct SteeringMapper {
    move_speed: f32,
}

impl Default for SteeringMapper {
    fn default() -> Self {
        Self { move_speed: 1.0 }
    }
}

impl SteeringMapper {
    pub fn new(move_speed: f32) -> Self {
        Self { move_speed }
    }

    /// -1 for LEFT, 1 for RIGHT and 0 (stop) for CENTER.
    pub fn direction(position: LipPosition) -> f32 {
        match position {
            LipPosition::Left => -1.0,
            LipPosition::Right => 1.0,
            LipPosition::Center => 0.0,
        }
    }
}

impl Mapper for SteeringMapper {
    type Output = f32;

    fn map(&self, state: &GestureState) -> Self::Output {
        Self::direction(state.lip_position) * self.move_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(lip_position: LipPosition) -> GestureState {
        GestureState {
            mouth_opening: 0.3,
            lip_position,
        }
    }

    #[test]
    fn directions() {
        let mapper = SteeringMapper::new(5.0);

        assert_eq!(mapper.map(&state(LipPosition::Left)), -5.0);
        assert_eq!(mapper.map(&state(LipPosition::Right)), 5.0);
        assert_eq!(mapper.map(&state(LipPosition::Center)), 0.0);
    }

    #[test]
    fn mirrored_is_negated() {
        let mapper = SteeringMapper::default();

        for position in [LipPosition::Left, LipPosition::Right, LipPosition::Center] {
            assert_eq!(
                mapper.map(&state(position.mirrored())),
                -mapper.map(&state(position))
            );
        }
    }
}
