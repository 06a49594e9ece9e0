use crate::signal::{EcgRecording, Events};
use serde::{Deserialize, Serialize};

/// Parameters of the local-maximum R-peak detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RPeakConfig {
    /// Minimum peak height in z-score units. Typical values are 0.8–1.5.
    pub threshold_z: f32,
    /// Minimum time between accepted R-peaks (seconds). 0.20 s caps detection at ~300 bpm.
    pub refractory_s: f64,
}

impl Default for RPeakConfig {
    fn default() -> Self {
        Self {
            threshold_z: 1.0,
            refractory_s: 0.20,
        }
    }
}

impl RPeakConfig {
    /// Refractory period in samples, never below one.
    pub fn refractory_samples(&self, sampling_rate: f64) -> usize {
        (self.refractory_s * sampling_rate).round().max(1.0) as usize
    }
}

/// Detect R-peaks in an already normalized signal.
///
/// Single forward scan over the interior samples. A sample is a candidate when it
/// rises strictly above its left neighbour and is not below its right one, so a
/// flat plateau reports its first sample only. Candidates must reach
/// `threshold_z` and lie at least the refractory period after the last accepted
/// peak. Accepted peaks are never revisited.
///
/// Returns an empty list for fewer than four samples or a non-positive rate.
pub fn detect_r_peaks(samples: &[f32], sampling_rate: f64, cfg: &RPeakConfig) -> Vec<usize> {
    if samples.len() <= 3 {
        return Vec::new();
    }
    if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
        log::warn!("R-peak detection skipped: sampling rate {sampling_rate} is not positive");
        return Vec::new();
    }

    let refractory = cfg.refractory_samples(sampling_rate);
    let mut peaks = Vec::new();
    let mut last_accepted = 0usize;

    for (offset, w) in samples.windows(3).enumerate() {
        let i = offset + 1;
        let (prev, x, next) = (w[0], w[1], w[2]);

        let is_local_max = x > prev && x >= next;
        let above_threshold = x >= cfg.threshold_z;
        if !is_local_max || !above_threshold {
            continue;
        }
        if !peaks.is_empty() && i - last_accepted < refractory {
            continue;
        }

        peaks.push(i);
        last_accepted = i;
    }

    log::debug!(
        "detected {} R-peaks in {} samples (threshold_z={}, refractory={} samples)",
        peaks.len(),
        samples.len(),
        cfg.threshold_z,
        refractory
    );
    peaks
}

/// Run [`detect_r_peaks`] over a recording's samples.
pub fn detect_r_peaks_events(recording: &EcgRecording, cfg: &RPeakConfig) -> Events {
    Events::from_indices(detect_r_peaks(
        &recording.samples,
        recording.sampling_rate,
        cfg,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::z_score_normalize;
    use crate::synthetic::synthetic_ecg;

    fn cfg(threshold_z: f32, refractory_s: f64) -> RPeakConfig {
        RPeakConfig {
            threshold_z,
            refractory_s,
        }
    }

    #[test]
    fn finds_single_triangular_peak() {
        let samples = [0.0, 0.0, 0.0, 1.0, 2.0, 1.0, 0.0, 0.0, 0.0];
        let peaks = detect_r_peaks(&samples, 360.0, &cfg(0.5, 0.001));
        assert_eq!(peaks, vec![4]);
    }

    #[test]
    fn refractory_rejects_close_second_peak() {
        let mut samples = vec![0.0f32; 40];
        samples[10] = 3.0;
        samples[15] = 3.0;
        // 0.2 s at 100 Hz = 20 samples
        let c = cfg(1.0, 0.2);
        assert_eq!(c.refractory_samples(100.0), 20);
        assert_eq!(detect_r_peaks(&samples, 100.0, &c), vec![10]);
    }

    #[test]
    fn peak_exactly_refractory_apart_is_accepted() {
        let mut samples = vec![0.0f32; 40];
        samples[10] = 3.0;
        samples[30] = 3.0;
        assert_eq!(detect_r_peaks(&samples, 100.0, &cfg(1.0, 0.2)), vec![10, 30]);
    }

    #[test]
    fn first_candidate_is_never_refractory_blocked() {
        let mut samples = vec![0.0f32; 10];
        samples[1] = 2.0;
        assert_eq!(detect_r_peaks(&samples, 100.0, &cfg(1.0, 5.0)), vec![1]);
    }

    #[test]
    fn plateau_reports_first_sample_once() {
        let samples = [0.0, 0.0, 2.0, 2.0, 0.0, 0.0];
        assert_eq!(detect_r_peaks(&samples, 100.0, &cfg(1.0, 0.001)), vec![2]);
        let wide = [0.0, 2.0, 2.0, 2.0, 2.0, 0.0, 0.0];
        assert_eq!(detect_r_peaks(&wide, 100.0, &cfg(1.0, 0.001)), vec![1]);
    }

    #[test]
    fn nan_threshold_accepts_nothing() {
        let samples = [0.0, 0.0, 0.0, 1.0, 2.0, 1.0, 0.0, 0.0, 0.0];
        assert!(detect_r_peaks(&samples, 360.0, &cfg(f32::NAN, 0.001)).is_empty());
    }

    #[test]
    fn flat_run_at_threshold_never_fires() {
        let samples = [1.0f32; 12];
        assert!(detect_r_peaks(&samples, 100.0, &cfg(1.0, 0.001)).is_empty());
    }

    #[test]
    fn threshold_is_inclusive() {
        let samples = [0.0, 0.0, 1.0, 0.0, 0.0];
        assert_eq!(detect_r_peaks(&samples, 100.0, &cfg(1.0, 0.001)), vec![2]);
        assert!(detect_r_peaks(&samples, 100.0, &cfg(1.01, 0.001)).is_empty());
    }

    #[test]
    fn degenerate_inputs_yield_nothing() {
        let c = RPeakConfig::default();
        assert!(detect_r_peaks(&[], 360.0, &c).is_empty());
        assert!(detect_r_peaks(&[0.0, 5.0, 0.0], 360.0, &c).is_empty());
        assert!(detect_r_peaks(&[0.0, 5.0, 0.0, 0.0], 0.0, &c).is_empty());
        assert!(detect_r_peaks(&[0.0, 5.0, 0.0, 0.0], -1.0, &c).is_empty());
        assert!(detect_r_peaks(&[0.0, 5.0, 0.0, 0.0], f64::NAN, &c).is_empty());
        assert!(detect_r_peaks(&[0.0; 100], 360.0, &c).is_empty());
    }

    #[test]
    fn edges_are_never_peaks() {
        let samples = [5.0, 0.0, 0.0, 0.0, 5.0];
        assert!(detect_r_peaks(&samples, 100.0, &cfg(1.0, 0.001)).is_empty());
    }

    #[test]
    fn output_is_ordered_interior_and_spaced() {
        // Deterministic pseudo-noise so the scan sees many candidates.
        let mut state = 0x2545_f491u32;
        let samples: Vec<f32> = (0..2000)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state % 1000) as f32 / 250.0 - 2.0
            })
            .collect();
        let fs = 250.0;
        let c = cfg(0.5, 0.05);
        let refractory = c.refractory_samples(fs);
        let peaks = detect_r_peaks(&samples, fs, &c);
        assert!(!peaks.is_empty());
        assert!(peaks.iter().all(|&p| p >= 1 && p <= samples.len() - 2));
        for w in peaks.windows(2) {
            assert!(w[1] > w[0]);
            assert!(w[1] - w[0] >= refractory);
        }
    }

    #[test]
    fn detects_one_peak_per_synthetic_beat() {
        let rec = synthetic_ecg(360.0, 5.0);
        let normalized = z_score_normalize(&rec.samples);
        let peaks = detect_r_peaks(&normalized, rec.sampling_rate, &RPeakConfig::default());
        // one beat per second, centred 0.2 s into each second
        assert_eq!(peaks, vec![72, 432, 792, 1152, 1512]);
    }

    #[test]
    fn events_wrapper_matches_slice_api() {
        let rec = EcgRecording::new(vec![0.0, 0.0, 0.0, 1.0, 2.0, 1.0, 0.0, 0.0, 0.0], 360.0);
        let events = detect_r_peaks_events(&rec, &cfg(0.5, 0.001));
        assert_eq!(events.indices, vec![4]);
    }
}
