use ndarray::Zip;

use crate::shared::activity_error::ActivityError;
use crate::shared::constants::INACTIVE_THRESHOLD;
use crate::shared::frame::Frame;

use super::activity_record::ActivityRecord;

/// Scores how different a frame is from its predecessor and classifies it
/// against a fixed threshold.
///
/// The score is the mean over every sample of `(current² - previous²)²`.
/// Note this squares the samples *before* differencing, so it is not the
/// usual mean squared error; the threshold is calibrated against this
/// exact scale.
#[derive(Clone, Copy, Debug)]
pub struct FrameDifferencer {
    threshold: f64,
}

impl FrameDifferencer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Mean of `(c² - p²)²` over all samples. An empty frame scores 0.
    ///
    /// A single sample term reaches 65025² ≈ 4.2e9, so terms are computed in
    /// `i64` and summed as `u64` before the final division.
    pub fn score(&self, current: &Frame, previous: &Frame) -> Result<f64, ActivityError> {
        if !current.same_shape(previous) {
            return Err(ActivityError::ShapeMismatch {
                current: current.shape(),
                previous: previous.shape(),
            });
        }

        let samples = current.data().len();
        if samples == 0 {
            return Ok(0.0);
        }

        let sum = Zip::from(&current.as_ndarray())
            .and(&previous.as_ndarray())
            .fold(0u64, |acc, &c, &p| acc + squared_term(c, p));

        Ok(sum as f64 / samples as f64)
    }

    pub fn is_inactive(&self, score: f64) -> bool {
        score < self.threshold
    }

    /// Scores `current` against `previous` and builds its log record.
    pub fn record(
        &self,
        frame_index: usize,
        current: &Frame,
        previous: &Frame,
    ) -> Result<ActivityRecord, ActivityError> {
        let score = self.score(current, previous)?;
        Ok(ActivityRecord {
            frame_index,
            score,
            inactive: self.is_inactive(score),
        })
    }
}

impl Default for FrameDifferencer {
    fn default() -> Self {
        Self::new(INACTIVE_THRESHOLD)
    }
}

fn squared_term(current: u8, previous: u8) -> u64 {
    let c = current as i64;
    let p = previous as i64;
    let diff = c * c - p * p;
    (diff * diff) as u64
}
