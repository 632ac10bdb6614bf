use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::activity_error::ActivityError;
use crate::shared::constants::{LOG_EXTENSION, OUTPUT_SUFFIX};

/// One unit of batch work: an input video and where its annotated copy and
/// activity log go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoJob {
    pub input: PathBuf,
    pub output_video: PathBuf,
    pub output_log: PathBuf,
}

impl VideoJob {
    /// Derives sibling outputs for `input`: `clip.mp4` becomes
    /// `clip_activity.mp4` and `clip_activity.csv`.
    pub fn for_input(input: &Path) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base = format!("{stem}{OUTPUT_SUFFIX}");

        let video_name = match input.extension() {
            Some(ext) => format!("{base}.{}", ext.to_string_lossy()),
            None => base.clone(),
        };
        let output_video = input.with_file_name(video_name);
        let output_log = input.with_file_name(format!("{base}.{LOG_EXTENSION}"));

        Self {
            input: input.to_path_buf(),
            output_video,
            output_log,
        }
    }
}

/// Lists the videos in `dir` ending in `.<extension>` (case-insensitive) and
/// builds a job for each, sorted by file name.
///
/// Files that are themselves activity outputs (`*_activity.<ext>`) are
/// skipped so a re-run does not annotate its own results. Subdirectories
/// are not descended into.
pub fn scan_directory(dir: &Path, extension: &str) -> Result<Vec<VideoJob>, ActivityError> {
    let scan_err = |source| ActivityError::ScanDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir).map_err(scan_err)? {
        let path = entry.map_err(scan_err)?.path();
        if path.is_file() && is_candidate(&path, extension) {
            inputs.push(path);
        }
    }
    inputs.sort();

    Ok(inputs.iter().map(|p| VideoJob::for_input(p)).collect())
}

fn is_candidate(path: &Path, extension: &str) -> bool {
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false);
    let is_output = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.ends_with(OUTPUT_SUFFIX))
        .unwrap_or(false);
    has_extension && !is_output
}
