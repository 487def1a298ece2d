use std::sync::mpsc::Sender;

use log::error;

use super::GestureSink;
use crate::model::GestureState;

/// Forwards every state over a channel, e.g. to a game loop on another thread.
#[derive(Debug)]
pub struct ChannelSink {
    sender: Sender<GestureState>,
    disconnected: bool,
}

impl ChannelSink {
    pub fn new(sender: Sender<GestureState>) -> Self {
        Self {
            sender,
            disconnected: false,
        }
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl GestureSink for ChannelSink {
    fn on_gesture(&mut self, state: &GestureState) {
        if self.disconnected {
            return;
        }

        if let Err(e) = self.sender.send(*state) {
            error!("Gesture receiver disconnected, dropping further states: {e}");
            self.disconnected = true;
        }
    }
}
