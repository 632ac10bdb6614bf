use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use motion_activity_core::activity::domain::frame_differencer::FrameDifferencer;
use motion_activity_core::activity::infrastructure::csv_activity_log::CsvActivityLog;
use motion_activity_core::annotation::infrastructure::hershey_text_annotator::HersheyTextAnnotator;
use motion_activity_core::pipeline::batch_activity_use_case::{
    BatchActivityUseCase, BatchReport, ComponentFactory, VideoComponents,
};
use motion_activity_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use motion_activity_core::shared::constants::VIDEO_EXTENSION;
use motion_activity_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use motion_activity_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;

/// Per-frame motion activity scoring for a folder of videos.
///
/// For every `.mp4` in the folder, writes `<name>_activity.mp4` with the
/// frame score drawn on each frame and `<name>_activity.csv` with one row
/// per frame.
#[derive(Parser)]
#[command(name = "motion-activity")]
struct Cli {
    /// Folder containing the input videos.
    #[arg(long = "input_folder", visible_alias = "input-folder")]
    input_folder: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let use_case = BatchActivityUseCase::new(build_factory(), FrameDifferencer::default());
    let report = use_case.run_directory(&cli.input_folder, VIDEO_EXTENSION)?;
    report_outcome(&report)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    check_input_folder(&cli.input_folder)
}

fn check_input_folder(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !dir.exists() {
        return Err(format!("Input folder not found: {}", dir.display()).into());
    }
    if !dir.is_dir() {
        return Err(format!("Input folder is not a directory: {}", dir.display()).into());
    }
    Ok(())
}

fn build_factory() -> ComponentFactory {
    Box::new(|_job| VideoComponents {
        reader: Box::new(FfmpegReader::new()),
        writer: Box::new(FfmpegWriter::new()),
        log: Box::new(CsvActivityLog::new()),
        annotator: Box::new(HersheyTextAnnotator::default()),
        logger: Box::new(StdoutPipelineLogger::default()),
    })
}

fn report_outcome(report: &BatchReport) -> Result<(), Box<dyn std::error::Error>> {
    if report.total() > 0 {
        log::info!(
            "Done: {} processed, {} failed",
            report.processed.len(),
            report.failed.len()
        );
    }
    if report.is_success() {
        return Ok(());
    }
    for (job, e) in &report.failed {
        log::error!("{}: {e}", job.input.display());
    }
    Err(format!(
        "{} of {} videos failed",
        report.failed.len(),
        report.total()
    )
    .into())
}
