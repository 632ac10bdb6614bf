use crate::shared::constants::OVERLAY_PRECISION;
use crate::shared::frame::Frame;

/// Burns a line of text into a frame.
///
/// Implementations modify the frame in-place (`&mut Frame`); callers that
/// need the untouched pixels keep their own copy.
pub trait FrameAnnotator: Send {
    fn annotate(&self, frame: &mut Frame, text: &str) -> Result<(), Box<dyn std::error::Error>>;
}

/// Fixed-precision rendering of a score for the overlay.
pub fn format_score(score: f64) -> String {
    format!("{score:.prec$}", prec = OVERLAY_PRECISION)
}
