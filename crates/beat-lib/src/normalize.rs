//! Per-recording z-score normalization.

use serde::{Deserialize, Serialize};

/// Variance floor used by [`z_score_normalize`] so a flat signal maps to zeros.
pub const VARIANCE_FLOOR: f64 = 1e-12;

/// Summary statistics of a sample sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalStats {
    pub mean: f32,
    /// Population standard deviation.
    pub std: f32,
    pub min: f32,
    pub max: f32,
}

/// Mean and population variance, accumulated in f64.
fn moments(samples: &[f32]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&x| x as f64).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|&x| (x as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance)
}

/// Transform samples to zero mean and unit population variance.
///
/// Empty input returns an empty vector. A constant signal engages the
/// variance floor and comes back as all zeros.
pub fn z_score_normalize(samples: &[f32]) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    let (mean, variance) = moments(samples);
    let std = variance.max(VARIANCE_FLOOR).sqrt();
    log::debug!(
        "z-score normalize: {} samples, mean={:.6}, std={:.6}",
        samples.len(),
        mean,
        std
    );
    samples
        .iter()
        .map(|&x| ((x as f64 - mean) / std) as f32)
        .collect()
}

/// Mean, population std, min and max. All zeros for empty input.
pub fn stats(samples: &[f32]) -> SignalStats {
    if samples.is_empty() {
        return SignalStats::default();
    }
    let (mean, variance) = moments(samples);
    let min = samples.iter().copied().fold(f32::INFINITY, f32::min);
    let max = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    SignalStats {
        mean: mean as f32,
        std: variance.max(0.0).sqrt() as f32,
        min,
        max,
    }
}
