use super::{text::parse_f32_series, LoadError};
use crate::signal::EcgRecording;
use serde::Deserialize;
use std::path::Path;

/// Sampling rate assumed for CSV/TXT files, which carry samples only.
pub const DEFAULT_TEXT_SAMPLING_RATE: f64 = 360.0;

/// On-disk JSON layout. Older exports used `fs` or `sampling_rate`
/// instead of `samplingRate`.
#[derive(Debug, Deserialize)]
struct RecordingFile {
    samples: Vec<f32>,
    #[serde(default, rename = "samplingRate")]
    sampling_rate: Option<f64>,
    #[serde(default)]
    fs: Option<f64>,
    #[serde(default, rename = "sampling_rate")]
    legacy_sampling_rate: Option<f64>,
}

/// Supported recording formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingFormat {
    Json,
    DelimitedText,
}

impl RecordingFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "csv" | "txt" => Ok(Self::DelimitedText),
            _ => Err(LoadError::UnsupportedFileType { extension }),
        }
    }
}

/// Load a recording, assuming [`DEFAULT_TEXT_SAMPLING_RATE`] for delimited text.
pub fn load_recording(path: &Path) -> Result<EcgRecording, LoadError> {
    load_recording_with_text_rate(path, DEFAULT_TEXT_SAMPLING_RATE)
}

/// Load a `.json`, `.csv` or `.txt` recording. `text_sampling_rate` applies to the
/// delimited formats only; JSON files carry their own rate.
pub fn load_recording_with_text_rate(
    path: &Path,
    text_sampling_rate: f64,
) -> Result<EcgRecording, LoadError> {
    let format = RecordingFormat::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let recording = parse_recording(&bytes, format, text_sampling_rate)?;
    log::debug!(
        "loaded {}: {} samples @ {} Hz",
        path.display(),
        recording.len(),
        recording.sampling_rate
    );
    Ok(recording)
}

/// Decode an in-memory recording.
pub fn parse_recording(
    bytes: &[u8],
    format: RecordingFormat,
    text_sampling_rate: f64,
) -> Result<EcgRecording, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyData);
    }
    match format {
        RecordingFormat::Json => decode_json(bytes),
        RecordingFormat::DelimitedText => {
            let text = String::from_utf8_lossy(bytes);
            let samples = parse_f32_series(&text)?;
            Ok(EcgRecording::new(samples, text_sampling_rate))
        }
    }
}

fn decode_json(bytes: &[u8]) -> Result<EcgRecording, LoadError> {
    let file: RecordingFile = serde_json::from_slice(bytes)?;
    let sampling_rate = match (file.sampling_rate, file.fs, file.legacy_sampling_rate) {
        (Some(rate), _, _) => rate,
        (None, Some(rate), _) | (None, None, Some(rate)) => {
            log::info!("recording uses a legacy sampling rate field");
            rate
        }
        (None, None, None) => return Err(LoadError::MissingSamplingRate),
    };
    Ok(EcgRecording::new(file.samples, sampling_rate))
}
