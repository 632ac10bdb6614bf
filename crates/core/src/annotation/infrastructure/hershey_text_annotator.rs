use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::constants::{
    OVERLAY_COLOR, OVERLAY_FONT_SCALE, OVERLAY_ORIGIN, OVERLAY_THICKNESS,
};
use crate::shared::frame::Frame;

use super::hershey_simplex::{self, PEN_UP};

/// Draws text with the Hershey simplex stroke font.
///
/// Strokes are rendered as thick line segments; each pixel is blended
/// toward the text colour by how much of it the stroke covers, which gives
/// anti-aliased edges without supersampling.
pub struct HersheyTextAnnotator {
    origin: (i32, i32),
    scale: f64,
    thickness: u32,
    color: [u8; 3],
}

/// A stroke segment in pixel coordinates.
#[derive(Clone, Copy, Debug)]
struct Segment {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl HersheyTextAnnotator {
    /// `origin` is the baseline-left corner of the first glyph.
    pub fn new(origin: (i32, i32), scale: f64, thickness: u32, color: [u8; 3]) -> Self {
        Self {
            origin,
            scale,
            thickness: thickness.max(1),
            color,
        }
    }

    fn layout(&self, text: &str) -> Vec<Segment> {
        let (ox, oy) = (self.origin.0 as f64, self.origin.1 as f64);
        let mut segments = Vec::new();
        let mut pen_x = 0i32;

        for c in text.chars() {
            let glyph = hershey_simplex::glyph(c);
            let to_px = |(gx, gy): (i8, i8)| {
                (
                    ox + (pen_x + gx as i32) as f64 * self.scale,
                    oy - gy as f64 * self.scale,
                )
            };
            for pair in glyph.points.windows(2) {
                if pair[0] == PEN_UP || pair[1] == PEN_UP {
                    continue;
                }
                let (x0, y0) = to_px(pair[0]);
                let (x1, y1) = to_px(pair[1]);
                segments.push(Segment { x0, y0, x1, y1 });
            }
            pen_x += glyph.advance;
        }
        segments
    }

    /// Colour for a frame with `channels` samples per pixel. Gray frames get
    /// the colour's luma; channels past the third (alpha) are left alone.
    fn channel_color(&self, channels: usize) -> Vec<u8> {
        let [r, g, b] = self.color;
        if channels < 3 {
            let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
            vec![luma.round() as u8]
        } else {
            vec![r, g, b]
        }
    }
}

impl Default for HersheyTextAnnotator {
    fn default() -> Self {
        Self::new(
            OVERLAY_ORIGIN,
            OVERLAY_FONT_SCALE,
            OVERLAY_THICKNESS,
            OVERLAY_COLOR,
        )
    }
}

impl FrameAnnotator for HersheyTextAnnotator {
    fn annotate(&self, frame: &mut Frame, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        let segments = self.layout(text);
        if segments.is_empty() || frame.data().is_empty() {
            return Ok(());
        }

        let half = self.thickness as f64 / 2.0;
        let reach = half + 1.0;
        let (min_x, min_y, max_x, max_y) = bounds(&segments);

        let (height, width, channels) = frame.shape();
        let col_start = (min_x - reach).floor().max(0.0) as usize;
        let row_start = (min_y - reach).floor().max(0.0) as usize;
        let col_end = ((max_x + reach).ceil().max(0.0) as usize).min(width);
        let row_end = ((max_y + reach).ceil().max(0.0) as usize).min(height);
        if col_start >= col_end || row_start >= row_end {
            return Ok(());
        }

        let color = self.channel_color(channels);
        let mut pixels = frame.as_ndarray_mut();

        for row in row_start..row_end {
            for col in col_start..col_end {
                let (px, py) = (col as f64, row as f64);
                let dist = segments
                    .iter()
                    .map(|s| distance_to_segment(px, py, s))
                    .fold(f64::INFINITY, f64::min);
                let coverage = (half + 0.5 - dist).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                for (c, &target) in color.iter().enumerate() {
                    let sample = &mut pixels[[row, col, c]];
                    let blended = *sample as f64 * (1.0 - coverage) + target as f64 * coverage;
                    *sample = blended.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
        Ok(())
    }
}

fn bounds(segments: &[Segment]) -> (f64, f64, f64, f64) {
    segments.iter().fold(
        (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(min_x, min_y, max_x, max_y), s| {
            (
                min_x.min(s.x0).min(s.x1),
                min_y.min(s.y0).min(s.y1),
                max_x.max(s.x0).max(s.x1),
                max_y.max(s.y0).max(s.y1),
            )
        },
    )
}

fn distance_to_segment(px: f64, py: f64, s: &Segment) -> f64 {
    let (dx, dy) = (s.x1 - s.x0, s.y1 - s.y0);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((px - s.x0) * dx + (py - s.y0) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (s.x0 + t * dx, s.y0 + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}
