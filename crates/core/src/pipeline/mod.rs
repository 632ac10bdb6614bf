pub mod batch_activity_use_case;
pub mod detect_activity_use_case;
pub mod pipeline_logger;
pub mod video_job;
