use std::path::Path;

use crate::activity::domain::activity_log::ActivityLog;
use crate::activity::domain::frame_differencer::FrameDifferencer;
use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::activity_error::ActivityError;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::detect_activity_use_case::{ActivitySummary, DetectActivityUseCase};
use super::pipeline_logger::PipelineLogger;
use super::video_job::{scan_directory, VideoJob};

/// Fresh adapters for one video. Readers, writers and logs hold per-file
/// state, so every job gets its own set.
pub struct VideoComponents {
    pub reader: Box<dyn VideoReader>,
    pub writer: Box<dyn VideoWriter>,
    pub log: Box<dyn ActivityLog>,
    pub annotator: Box<dyn FrameAnnotator>,
    pub logger: Box<dyn PipelineLogger>,
}

pub type ComponentFactory = Box<dyn Fn(&VideoJob) -> VideoComponents>;

/// Outcome of a batch run. Every job ends up in exactly one of the lists.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<(VideoJob, ActivitySummary)>,
    pub failed: Vec<(VideoJob, ActivityError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }
}

/// Runs activity detection over a list of videos, one after another.
///
/// A failing video is logged and recorded in the report; the remaining
/// videos are still processed.
pub struct BatchActivityUseCase {
    factory: ComponentFactory,
    differencer: FrameDifferencer,
}

impl BatchActivityUseCase {
    pub fn new(factory: ComponentFactory, differencer: FrameDifferencer) -> Self {
        Self {
            factory,
            differencer,
        }
    }

    pub fn execute(&self, jobs: Vec<VideoJob>) -> BatchReport {
        let mut report = BatchReport::default();
        let total = jobs.len();

        for (i, job) in jobs.into_iter().enumerate() {
            log::info!("[{}/{total}] {}", i + 1, job.input.display());

            let components = (self.factory)(&job);
            let mut use_case = DetectActivityUseCase::new(
                components.reader,
                components.writer,
                components.log,
                components.annotator,
                self.differencer,
                components.logger,
            );

            match use_case.execute(&job) {
                Ok(summary) => {
                    log::debug!(
                        "{}: {} frames, {} inactive",
                        job.input.display(),
                        summary.frames,
                        summary.inactive_frames
                    );
                    report.processed.push((job, summary));
                }
                Err(e) => {
                    log::error!("Skipping {}: {e}", job.input.display());
                    report.failed.push((job, e));
                }
            }
        }

        report
    }

    /// Scans `dir` for `.<extension>` videos and processes each of them.
    pub fn run_directory(&self, dir: &Path, extension: &str) -> Result<BatchReport, ActivityError> {
        let jobs = scan_directory(dir, extension)?;
        if jobs.is_empty() {
            log::info!("No .{extension} files found in {}", dir.display());
        }
        Ok(self.execute(jobs))
    }
}
