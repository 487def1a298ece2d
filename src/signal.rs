/*!
Delivery of per-frame gesture states to game controllers.

A [GesturePipeline] runs the extractor once per host tick and hands the result
to every registered [GestureSink]. Sinks replace any global "lip position
changed" notification: a controller subscribes by registering a sink and
unsubscribes by dropping the pipeline or its receiving end.
*/

mod channel;
mod watcher;

pub use channel::ChannelSink;
pub use watcher::LipPositionWatcher;

use log::debug;

use crate::{
    extractor::GestureExtractor,
    model::{GestureState, LandmarkSet},
};

/// Something that consumes the gesture state of every processed frame.
pub trait GestureSink {
    fn on_gesture(&mut self, state: &GestureState);
}

impl<F> GestureSink for F
where
    F: FnMut(&GestureState),
{
    fn on_gesture(&mut self, state: &GestureState) {
        self(state)
    }
}

#[derive(Default)]
pub struct GesturePipeline {
    extractor: GestureExtractor,
    sinks: Vec<Box<dyn GestureSink + Send>>,
    frames: u64,
    missed: u64,
}

impl std::fmt::Debug for GesturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GesturePipeline")
            .field("extractor", &self.extractor)
            .field("sinks", &self.sinks.len())
            .field("frames", &self.frames)
            .field("missed", &self.missed)
            .finish()
    }
}

impl GesturePipeline {
    pub fn new(extractor: GestureExtractor) -> Self {
        Self {
            extractor,
            ..Default::default()
        }
    }

    pub fn add_sink(&mut self, sink: impl GestureSink + Send + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn extractor(&self) -> &GestureExtractor {
        &self.extractor
    }

    /// Process one frame. `None` means the detector found no face.
    ///
    /// Every sink sees the resulting state, neutral on a miss.
    pub fn process(&mut self, landmarks: Option<&LandmarkSet>) -> GestureState {
        self.frames += 1;

        let state = match landmarks {
            Some(v) => self.extractor.extract(v),
            None => {
                debug!("No face detected");
                self.missed += 1;
                GestureState::neutral()
            }
        };

        for sink in self.sinks.iter_mut() {
            sink.on_gesture(&state);
        }

        state
    }

    /// Frames processed so far, including misses.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames without a detected face.
    pub fn missed(&self) -> u64 {
        self.missed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{mpsc, Arc, Mutex};

    use super::*;
    use crate::{extractor::tests::face_with_lips, model::LipPosition};

    #[test]
    fn miss_is_neutral() {
        let mut pipeline = GesturePipeline::default();

        assert!(pipeline.process(None).is_neutral());
        assert_eq!(pipeline.frames(), 1);
        assert_eq!(pipeline.missed(), 1);
    }

    #[test]
    fn notifies_every_sink() {
        let seen = Arc::new(Mutex::new(vec![]));
        let (sender, receiver) = mpsc::channel();

        let mut pipeline = GesturePipeline::default();
        let closure_seen = seen.clone();
        pipeline.add_sink(move |state: &GestureState| {
            closure_seen.lock().unwrap().push(state.lip_position);
        });
        pipeline.add_sink(ChannelSink::new(sender));

        pipeline.process(Some(&face_with_lips(16, 0)));
        pipeline.process(None);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![LipPosition::Left, LipPosition::Center]
        );
        assert_eq!(receiver.try_recv().unwrap().lip_position, LipPosition::Left);
        assert!(receiver.try_recv().unwrap().is_neutral());
        assert_eq!(pipeline.frames(), 2);
        assert_eq!(pipeline.missed(), 1);
    }

    #[test]
    fn short_set_is_not_a_miss() {
        let mut pipeline = GesturePipeline::default();

        assert!(pipeline.process(Some(&LandmarkSet::default())).is_neutral());
        assert_eq!(pipeline.missed(), 0);
    }
}
