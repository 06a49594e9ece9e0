use crate::{
    config::PipelineConfig,
    detectors::ecg::detect_r_peaks,
    normalize::{stats, z_score_normalize, SignalStats},
    segment::{beat_window_lengths, beat_windows},
    signal::{BeatWindow, EcgRecording, Events},
};
use serde::{Deserialize, Serialize};

/// Number of leading samples kept in a [`RecordingSummary`] preview.
pub const PREVIEW_LEN: usize = 100;

/// Everything a presentation layer needs from one run, as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatPipelineResult {
    pub sampling_rate: f64,
    pub sample_count: usize,
    /// Stats of the raw input.
    pub stats: SignalStats,
    pub normalized: Vec<f32>,
    pub peaks: Events,
    pub pre_samples: usize,
    pub post_samples: usize,
    pub windows: Vec<BeatWindow>,
}

/// Normalize, detect R-peaks on the normalized trace, then cut beat windows.
pub fn run_beat_pipeline(recording: &EcgRecording, cfg: &PipelineConfig) -> BeatPipelineResult {
    let fs = recording.sampling_rate;
    let normalized = z_score_normalize(&recording.samples);
    let peaks = detect_r_peaks(&normalized, fs, &cfg.detector);
    let windows = beat_windows(&peaks, normalized.len(), fs, &cfg.segmenter);
    let (pre_samples, post_samples) = if fs > 0.0 {
        beat_window_lengths(fs, &cfg.segmenter)
    } else {
        (0, 0)
    };

    log::debug!(
        "pipeline: {} samples @ {} Hz -> {} peaks, {} windows",
        recording.len(),
        fs,
        peaks.len(),
        windows.len()
    );

    BeatPipelineResult {
        sampling_rate: fs,
        sample_count: recording.len(),
        stats: stats(&recording.samples),
        normalized,
        peaks: Events::from_indices(peaks),
        pre_samples,
        post_samples,
        windows,
    }
}

/// Human-facing description of a freshly loaded recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSummary {
    pub status: String,
    pub sample_count: usize,
    pub sampling_rate: f64,
    pub duration_s: f64,
    pub stats: SignalStats,
    pub preview: Vec<f32>,
}

impl RecordingSummary {
    pub fn new(source_name: &str, recording: &EcgRecording) -> Self {
        let status = format!(
            "{} — {} samples @ {} Hz",
            source_name,
            recording.len(),
            recording.sampling_rate.trunc() as i64
        );
        let preview_len = recording.len().min(PREVIEW_LEN);
        Self {
            status,
            sample_count: recording.len(),
            sampling_rate: recording.sampling_rate,
            duration_s: recording.duration(),
            stats: stats(&recording.samples),
            preview: recording.samples[..preview_len].to_vec(),
        }
    }
}
