//! ECG beat extraction: z-score normalization, R-peak detection and fixed-width
//! beat windows, plus the loaders and figure model that sit around them.
//!
//! The processing core (`normalize`, `detectors`, `segment`, `pipeline`) is pure:
//! it borrows samples, returns owned results and never fails. Degenerate input
//! (empty signal, non-positive sampling rate) produces empty output.

pub mod config;
pub mod detectors;
pub mod io;
pub mod normalize;
pub mod pipeline;
pub mod plot;
pub mod segment;
pub mod signal;
pub mod synthetic;

pub use config::PipelineConfig;
pub use detectors::ecg::{detect_r_peaks, RPeakConfig};
pub use normalize::{stats, z_score_normalize, SignalStats};
pub use pipeline::{run_beat_pipeline, BeatPipelineResult, RecordingSummary};
pub use segment::{beat_windows, SegmenterConfig};
pub use signal::*;
