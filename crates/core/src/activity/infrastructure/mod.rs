pub mod csv_activity_log;
