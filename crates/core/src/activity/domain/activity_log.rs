use std::path::Path;

use super::activity_record::ActivityRecord;

/// Append-only sink for per-frame activity records.
///
/// Records arrive in frame order; implementations must not reorder them.
pub trait ActivityLog: Send {
    /// Creates (or truncates) the log at `path` and writes any header.
    fn open(&mut self, path: &Path) -> Result<(), Box<dyn std::error::Error>>;

    fn append(&mut self, record: &ActivityRecord) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes buffered rows. Safe to call more than once.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
