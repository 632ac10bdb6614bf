/// Scores strictly below this mark a frame as inactive.
pub const INACTIVE_THRESHOLD: f64 = 50.0;

/// Input videos are picked up by this file extension.
pub const VIDEO_EXTENSION: &str = "mp4";

/// Appended to the input file stem for both outputs.
pub const OUTPUT_SUFFIX: &str = "_activity";

pub const LOG_EXTENSION: &str = "csv";

pub const LOG_HEADER: [&str; 3] = ["Frame", "MSE", "Inactive"];

/// Baseline-left corner of the score overlay, in pixels.
pub const OVERLAY_ORIGIN: (i32, i32) = (50, 50);
pub const OVERLAY_FONT_SCALE: f64 = 1.0;
pub const OVERLAY_THICKNESS: u32 = 2;
/// Pure blue, RGB order.
pub const OVERLAY_COLOR: [u8; 3] = [0, 0, 255];

/// Decimal digits of the score burned into each frame.
pub const OVERLAY_PRECISION: usize = 6;
