/*!
Session statistics for the mouth-driven games and accuracy checks for the
mouth-opening signal itself.
*/

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Openings above this count as "open" when comparing against ground truth.
pub const OPEN_THRESHOLD: f32 = 0.01;

/// Summary of one attempt at a level, as stored with the patient's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub recorded_at: DateTime<Utc>,
    pub final_distance: f32,
    pub time_taken: f32,
    pub average_speed: f32,
    pub max_speed: f32,
    pub min_speed: f32,
    pub max_mouth_opening: f32,
    pub min_mouth_opening: f32,
    pub mouth_opening_distances: Vec<f32>,
    pub speeds: Vec<f32>,
}

fn max_of(values: &[f32]) -> f32 {
    values.iter().copied().reduce(f32::max).unwrap_or_default()
}

fn min_of(values: &[f32]) -> f32 {
    values.iter().copied().reduce(f32::min).unwrap_or_default()
}

/// Collects the throttle samples of an attempt while it is played.
#[derive(Debug, Default, Clone)]
pub struct AttemptRecorder {
    mouth_openings: Vec<f32>,
    speeds: Vec<f32>,
}

impl AttemptRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame. Closed-mouth frames are not part of the attempt's series.
    pub fn record(&mut self, mouth_opening: f32, speed: f32) {
        if mouth_opening > 0.0 {
            self.mouth_openings.push(mouth_opening);
            self.speeds.push(speed);
        }
    }

    pub fn len(&self) -> usize {
        self.mouth_openings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mouth_openings.is_empty()
    }

    /// Close the attempt after covering `distance` in `elapsed_s` seconds.
    pub fn finish(self, distance: f32, elapsed_s: f32) -> AttemptSummary {
        let average_speed = if elapsed_s > 0.0 {
            distance / elapsed_s
        } else {
            0.0
        };

        let summary = AttemptSummary {
            recorded_at: Utc::now(),
            final_distance: distance,
            time_taken: elapsed_s,
            average_speed,
            max_speed: max_of(&self.speeds),
            min_speed: min_of(&self.speeds),
            max_mouth_opening: max_of(&self.mouth_openings),
            min_mouth_opening: min_of(&self.mouth_openings),
            mouth_opening_distances: self.mouth_openings,
            speeds: self.speeds,
        };

        info!(
            "Attempt finished: distance {:.2}, time {:.2}s, speed {:.2}",
            summary.final_distance, summary.time_taken, summary.average_speed
        );

        summary
    }
}

/// Precision/recall of predicted mouth openings against ground truth.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionEvaluator {
    pub true_positives: u32,
    pub false_positives: u32,
    pub false_negatives: u32,
    pub true_negatives: u32,
}

fn ratio(numerator: u32, denominator: u32) -> f32 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f32 / denominator as f32
    }
}

impl DetectionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, predicted: f32, actual: f32) {
        let predicted_open = predicted > OPEN_THRESHOLD;
        let actual_open = actual > OPEN_THRESHOLD;

        match (predicted_open, actual_open) {
            (true, true) => self.true_positives += 1,
            (true, false) => self.false_positives += 1,
            (false, true) => self.false_negatives += 1,
            (false, false) => self.true_negatives += 1,
        }

        debug!(
            "Evaluated: TP={}, FP={}, FN={}",
            self.true_positives, self.false_positives, self.false_negatives
        );
    }

    pub fn precision(&self) -> f32 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f32 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1(&self) -> f32 {
        let precision = self.precision();
        let recall = self.recall();

        if precision + recall == 0.0 {
            return 0.0;
        }

        2.0 * precision * recall / (precision + recall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod attempt {
        use super::*;

        #[test]
        fn skips_closed_frames() {
            let mut recorder = AttemptRecorder::new();
            recorder.record(0.0, 0.0);
            recorder.record(0.02, 100.0);
            recorder.record(0.0, 0.0);
            recorder.record(0.04, 150.0);

            assert_eq!(recorder.len(), 2);

            let summary = recorder.finish(30.0, 10.0);

            assert_eq!(summary.mouth_opening_distances, vec![0.02, 0.04]);
            assert_eq!(summary.speeds, vec![100.0, 150.0]);
            assert_eq!(summary.max_speed, 150.0);
            assert_eq!(summary.min_speed, 100.0);
            assert_eq!(summary.max_mouth_opening, 0.04);
            assert_eq!(summary.min_mouth_opening, 0.02);
            assert_eq!(summary.average_speed, 3.0);
        }

        #[test]
        fn empty_attempt() {
            let summary = AttemptRecorder::new().finish(0.0, 0.0);

            assert_eq!(summary.max_speed, 0.0);
            assert_eq!(summary.min_speed, 0.0);
            assert_eq!(summary.max_mouth_opening, 0.0);
            assert_eq!(summary.min_mouth_opening, 0.0);
            assert_eq!(summary.average_speed, 0.0);
            assert!(summary.speeds.is_empty());
        }

        #[test]
        fn serializes() {
            let summary = AttemptRecorder::new().finish(1.0, 2.0);
            let json = serde_json::to_string(&summary).unwrap();
            let back = serde_json::from_str::<AttemptSummary>(&json).unwrap();

            assert_eq!(back, summary);
        }
    }

    mod detection {
        use super::*;

        #[test]
        fn counts() {
            let mut evaluator = DetectionEvaluator::new();
            evaluator.evaluate(0.05, 0.04);
            evaluator.evaluate(0.05, 0.0);
            evaluator.evaluate(0.0, 0.03);
            evaluator.evaluate(0.0, 0.0);
            evaluator.evaluate(0.03, 0.06);

            assert_eq!(evaluator.true_positives, 2);
            assert_eq!(evaluator.false_positives, 1);
            assert_eq!(evaluator.false_negatives, 1);
            assert_eq!(evaluator.true_negatives, 1);

            assert!((evaluator.precision() - 2.0 / 3.0).abs() < 1e-6);
            assert!((evaluator.recall() - 2.0 / 3.0).abs() < 1e-6);
            assert!((evaluator.f1() - 2.0 / 3.0).abs() < 1e-6);
        }

        #[test]
        fn threshold_is_strict() {
            let mut evaluator = DetectionEvaluator::new();
            evaluator.evaluate(OPEN_THRESHOLD, OPEN_THRESHOLD);

            assert_eq!(evaluator.true_negatives, 1);
        }

        #[test]
        fn empty_is_zero_not_nan() {
            let evaluator = DetectionEvaluator::new();

            assert_eq!(evaluator.precision(), 0.0);
            assert_eq!(evaluator.recall(), 0.0);
            assert_eq!(evaluator.f1(), 0.0);
        }
    }
}
