use std::path::PathBuf;

use thiserror::Error;

/// Boxed error coming back from an I/O adapter (reader, writer, log sink).
pub type AdapterError = Box<dyn std::error::Error>;

#[derive(Error, Debug)]
pub enum ActivityError {
    #[error("failed to open input {path}: {source}")]
    OpenInput {
        path: PathBuf,
        #[source]
        source: AdapterError,
    },
    #[error("failed to open output video {path}: {source}")]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: AdapterError,
    },
    #[error("failed to open activity log {path}: {source}")]
    OpenLog {
        path: PathBuf,
        #[source]
        source: AdapterError,
    },
    #[error("decode failed at frame {frame}: {source}")]
    Decode {
        frame: usize,
        #[source]
        source: AdapterError,
    },
    #[error("encode failed at frame {frame}: {source}")]
    Encode {
        frame: usize,
        #[source]
        source: AdapterError,
    },
    #[error("failed to write activity record for frame {frame}: {source}")]
    WriteLog {
        frame: usize,
        #[source]
        source: AdapterError,
    },
    #[error("failed to annotate frame {frame}: {source}")]
    Annotate {
        frame: usize,
        #[source]
        source: AdapterError,
    },
    #[error("failed to finalize {path}: {source}")]
    Close {
        path: PathBuf,
        #[source]
        source: AdapterError,
    },
    #[error("frame shape {current:?} does not match previous frame shape {previous:?}")]
    ShapeMismatch {
        current: (usize, usize, usize),
        previous: (usize, usize, usize),
    },
    #[error("failed to scan directory {path}: {source}")]
    ScanDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
