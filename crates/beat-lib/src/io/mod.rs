//! Recording loaders. The processing core never touches these; callers load a
//! recording here and hand the samples to the core.

pub mod recording;
pub mod text;

use std::path::PathBuf;
use thiserror::Error;

pub use recording::{
    load_recording, load_recording_with_text_rate, parse_recording, RecordingFormat,
    DEFAULT_TEXT_SAMPLING_RATE,
};

/// Failures while reading a recording file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file type {extension:?}; use .json, .csv or .txt")]
    UnsupportedFileType { extension: String },
    #[error("file appears to be empty")]
    EmptyData,
    #[error(
        "could not parse sample {token:?} (value #{position}); expected numbers separated by commas, tabs, spaces or line breaks"
    )]
    CsvParseFailed { token: String, position: usize },
    #[error("malformed delimited text: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON recording: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON recording has no samplingRate (or legacy fs/sampling_rate) field")]
    MissingSamplingRate,
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
