use log::debug;

use super::GestureSink;
use crate::model::{GestureState, LipPosition};

/// Calls back only when the lip position changes.
///
/// Starts out at CENTER, so a steady centered face never fires.
pub struct LipPositionWatcher<F> {
    last: LipPosition,
    callback: F,
}

impl<F> LipPositionWatcher<F>
where
    F: FnMut(LipPosition),
{
    pub fn new(callback: F) -> Self {
        Self {
            last: LipPosition::Center,
            callback,
        }
    }

    pub fn current(&self) -> LipPosition {
        self.last
    }
}

impl<F> GestureSink for LipPositionWatcher<F>
where
    F: FnMut(LipPosition),
{
    fn on_gesture(&mut self, state: &GestureState) {
        if state.lip_position == self.last {
            return;
        }

        debug!("Lip position changed: {} -> {}", self.last, state.lip_position);
        self.last = state.lip_position;
        (self.callback)(state.lip_position);
    }
}
