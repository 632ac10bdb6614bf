pub mod activity_error;
pub mod constants;
pub mod frame;
pub mod video_metadata;
