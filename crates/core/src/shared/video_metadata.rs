use std::path::PathBuf;

/// Stream properties reported by a [`VideoReader`] and mirrored by the
/// output encoder.
///
/// [`VideoReader`]: crate::video::domain::video_reader::VideoReader
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Frame count from the container header, 0 when unknown.
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}
