use std::time::Instant;

use crate::activity::domain::activity_log::ActivityLog;
use crate::activity::domain::frame_differencer::FrameDifferencer;
use crate::annotation::domain::frame_annotator::{format_score, FrameAnnotator};
use crate::shared::activity_error::ActivityError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::pipeline_logger::PipelineLogger;
use super::video_job::VideoJob;

/// Totals for one processed video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActivitySummary {
    pub frames: usize,
    pub inactive_frames: usize,
}

/// Single-pass activity detection for one video:
/// decode → score against the previous frame → log → annotate → encode.
///
/// Frames are handled strictly in decode order and the previous-frame
/// buffer starts as an all-zero frame, so frame 0 always gets a record.
/// Reader, writer and log are released on every exit path; whatever was
/// written before a failure stays on disk.
pub struct DetectActivityUseCase {
    reader: Box<dyn VideoReader>,
    writer: Box<dyn VideoWriter>,
    log: Box<dyn ActivityLog>,
    annotator: Box<dyn FrameAnnotator>,
    differencer: FrameDifferencer,
    logger: Box<dyn PipelineLogger>,
}

impl DetectActivityUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        writer: Box<dyn VideoWriter>,
        log: Box<dyn ActivityLog>,
        annotator: Box<dyn FrameAnnotator>,
        differencer: FrameDifferencer,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            writer,
            log,
            annotator,
            differencer,
            logger,
        }
    }

    pub fn execute(&mut self, job: &VideoJob) -> Result<ActivitySummary, ActivityError> {
        let metadata = self
            .reader
            .open(&job.input)
            .map_err(|source| ActivityError::OpenInput {
                path: job.input.clone(),
                source,
            })?;

        if let Err(source) = self.writer.open(&job.output_video, &metadata) {
            self.reader.close();
            return Err(ActivityError::OpenOutput {
                path: job.output_video.clone(),
                source,
            });
        }

        if let Err(source) = self.log.open(&job.output_log) {
            self.reader.close();
            if let Err(e) = self.writer.close() {
                log::warn!("Failed to finalize {}: {e}", job.output_video.display());
            }
            return Err(ActivityError::OpenLog {
                path: job.output_log.clone(),
                source,
            });
        }

        let processed = self.process_frames(&metadata);
        self.reader.close();
        let closed = self.close_outputs(job);

        let summary = match (processed, closed) {
            (Ok(summary), Ok(())) => summary,
            (Ok(_), Err(e)) => return Err(e),
            (Err(e), closed) => {
                if let Err(close_err) = closed {
                    log::warn!("{close_err}");
                }
                return Err(e);
            }
        };

        self.logger.summary();
        self.logger
            .info(&format!("Processed video: {}", job.input.display()));
        self.logger
            .info(&format!("CSV saved to: {}", job.output_log.display()));
        self.logger
            .info(&format!("Video saved to: {}", job.output_video.display()));

        Ok(summary)
    }

    fn process_frames(&mut self, metadata: &VideoMetadata) -> Result<ActivitySummary, ActivityError> {
        let mut summary = ActivitySummary::default();
        let mut previous: Option<Frame> = None;
        let mut frames = self.reader.frames();

        loop {
            let frame_index = summary.frames;

            let started = Instant::now();
            let frame = match frames.next() {
                None => break,
                Some(Ok(frame)) => frame,
                Some(Err(source)) => {
                    log::warn!("Decode failed at frame {frame_index}, stopping early");
                    return Err(ActivityError::Decode {
                        frame: frame_index,
                        source,
                    });
                }
            };
            self.logger.timing("decode", elapsed_ms(started));

            let started = Instant::now();
            let record = match &previous {
                Some(prev) => self.differencer.record(frame_index, &frame, prev)?,
                None => {
                    let sentinel =
                        Frame::zeroed(frame.width(), frame.height(), frame.channels(), 0);
                    self.differencer.record(frame_index, &frame, &sentinel)?
                }
            };
            self.logger.timing("score", elapsed_ms(started));

            self.log
                .append(&record)
                .map_err(|source| ActivityError::WriteLog {
                    frame: frame_index,
                    source,
                })?;

            let started = Instant::now();
            let mut annotated = frame.clone();
            self.annotator
                .annotate(&mut annotated, &format_score(record.score))
                .map_err(|source| ActivityError::Annotate {
                    frame: frame_index,
                    source,
                })?;
            self.logger.timing("annotate", elapsed_ms(started));

            let started = Instant::now();
            self.writer
                .write(&annotated)
                .map_err(|source| ActivityError::Encode {
                    frame: frame_index,
                    source,
                })?;
            self.logger.timing("encode", elapsed_ms(started));

            previous = Some(frame);
            summary.frames += 1;
            if record.inactive {
                summary.inactive_frames += 1;
            }
            self.logger.metric("score", record.score);
            self.logger.progress(summary.frames, metadata.total_frames);
        }

        Ok(summary)
    }

    /// Closes the writer and the log, attempting both; reports the first
    /// failure.
    fn close_outputs(&mut self, job: &VideoJob) -> Result<(), ActivityError> {
        let video = self
            .writer
            .close()
            .map_err(|source| ActivityError::Close {
                path: job.output_video.clone(),
                source,
            });
        let log = self.log.close().map_err(|source| ActivityError::Close {
            path: job.output_log.clone(),
            source,
        });
        video.and(log)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
