pub mod activity_log;
pub mod activity_record;
pub mod frame_differencer;
