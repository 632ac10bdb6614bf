use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::activity::domain::activity_log::ActivityLog;
use crate::activity::domain::activity_record::ActivityRecord;
use crate::shared::constants::LOG_HEADER;

/// Writes activity records as comma-separated rows:
///
/// ```text
/// Frame,MSE,Inactive
/// 0,4227250625.0,False
/// 1,0.0,True
/// ```
///
/// Scores keep a decimal point, tiny scores use a two-digit exponent, and
/// booleans are written as `True`/`False`.
pub struct CsvActivityLog {
    out: Option<BufWriter<File>>,
}

impl CsvActivityLog {
    pub fn new() -> Self {
        Self { out: None }
    }
}

impl Default for CsvActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityLog for CsvActivityLog {
    fn open(&mut self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "{}", LOG_HEADER.join(","))?;
        self.out = Some(out);
        Ok(())
    }

    fn append(&mut self, record: &ActivityRecord) -> Result<(), Box<dyn std::error::Error>> {
        let out = self.out.as_mut().ok_or("CsvActivityLog: not opened")?;
        writeln!(out, "{}", format_row(record))?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(mut out) = self.out.take() {
            out.flush()?;
        }
        Ok(())
    }
}

fn format_row(record: &ActivityRecord) -> String {
    format!(
        "{},{},{}",
        record.frame_index,
        format_score_field(record.score),
        if record.inactive { "True" } else { "False" }
    )
}

/// Shortest round-trip form with a decimal point on integral values
/// (`0.0`) and a signed two-digit exponent on very small ones (`1e-07`).
fn format_score_field(score: f64) -> String {
    let text = format!("{score:?}");
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(frame_index: usize, score: f64, inactive: bool) -> ActivityRecord {
        ActivityRecord {
            frame_index,
            score,
            inactive,
        }
    }

    #[test]
    fn test_format_row() {
        assert_eq!(format_row(&record(0, 0.0, true)), "0,0.0,True");
        assert_eq!(
            format_row(&record(1, 4_227_250_625.0, false)),
            "1,4227250625.0,False"
        );
        assert_eq!(format_row(&record(2, 49.5, true)), "2,49.5,True");
    }

    #[rstest]
    #[case::zero(0.0, "0.0")]
    #[case::integral(4_227_250_625.0, "4227250625.0")]
    #[case::fractional(49.999999, "49.999999")]
    #[case::smallest_decimal(0.0001, "0.0001")]
    #[case::one_sample_in_a_1080p_frame(1.0 / 6_220_800.0, "1.6075102880658437e-07")]
    #[case::single_digit_exponent(1e-5, "1e-05")]
    fn test_format_score_field(#[case] score: f64, #[case] expected: &str) {
        assert_eq!(format_score_field(score), expected);
    }

    #[test]
    fn test_format_row_with_tiny_score() {
        assert_eq!(
            format_row(&record(3, 1.0 / 6_220_800.0, true)),
            "3,1.6075102880658437e-07,True"
        );
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip_activity.csv");

        let mut log = CsvActivityLog::new();
        log.open(&path).unwrap();
        log.append(&record(0, 4_227_250_625.0, false)).unwrap();
        log.append(&record(1, 0.0, true)).unwrap();
        log.close().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Frame,MSE,Inactive\n0,4227250625.0,False\n1,0.0,True\n");
    }

    #[test]
    fn test_header_only_when_no_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        let mut log = CsvActivityLog::new();
        log.open(&path).unwrap();
        log.close().unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Frame,MSE,Inactive\n"
        );
    }

    #[test]
    fn test_reopen_truncates_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rerun.csv");

        let mut log = CsvActivityLog::new();
        log.open(&path).unwrap();
        for i in 0..5 {
            log.append(&record(i, 1.0, true)).unwrap();
        }
        log.close().unwrap();

        let mut log = CsvActivityLog::new();
        log.open(&path).unwrap();
        log.append(&record(0, 2.0, true)).unwrap();
        log.close().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("0,2.0,True\n"));
    }

    #[test]
    fn test_append_without_open_returns_error() {
        let mut log = CsvActivityLog::new();
        assert!(log.append(&record(0, 0.0, true)).is_err());
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("log.csv");
        let mut log = CsvActivityLog::new();
        assert!(log.open(&path).is_err());
    }

    #[test]
    fn test_close_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = CsvActivityLog::new();
        log.open(&dir.path().join("log.csv")).unwrap();
        log.close().unwrap();
        log.close().unwrap();
    }
}
