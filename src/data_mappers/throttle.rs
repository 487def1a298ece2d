use super::Mapper;
use crate::{config::ThrottleConfig, model::GestureState};

/// Mouth opening to forward speed for the hill climb car.
///
/// Any opening at all accelerates; a closed mouth yields 0 and the host brakes.
#[derive(Debug, Default, Clone)]
pub struct ThrottleMapper {
    config: ThrottleConfig,
}

impl ThrottleMapper {
    pub fn new(config: ThrottleConfig) -> Self {
        Self { config }
    }

    pub fn speed_for(&self, mouth_opening: f32) -> f32 {
        if !mouth_opening.is_finite() || mouth_opening <= 0.0 {
            return 0.0;
        }

        let ThrottleConfig {
            base_speed,
            speed_per_step,
            step,
            max_speed,
        } = self.config;

        (base_speed + speed_per_step * (mouth_opening / step)).min(max_speed)
    }
}

impl Mapper for ThrottleMapper {
    type Output = f32;

    fn map(&self, state: &GestureState) -> Self::Output {
        self.speed_for(state.mouth_opening)
    }
}
