//! Fixed-width beat windows around detected R-peaks.

use crate::signal::BeatWindow;
use serde::{Deserialize, Serialize};

/// Window spans around each R-peak, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    pub pre_s: f64,
    pub post_s: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            pre_s: 0.20,
            post_s: 0.40,
        }
    }
}

/// `(pre, post)` spans in samples: `floor(seconds * fs)`, negative durations count as zero.
pub fn beat_window_lengths(sampling_rate: f64, cfg: &SegmenterConfig) -> (usize, usize) {
    let to_samples = |seconds: f64| (seconds * sampling_rate).floor().max(0.0) as usize;
    (to_samples(cfg.pre_s), to_samples(cfg.post_s))
}

/// Cut one window per peak, in input order.
///
/// Peaks whose window would start before sample 0 or end after `signal_len` are
/// skipped rather than clamped. Overlapping windows are all emitted.
pub fn beat_windows(
    peaks: &[usize],
    signal_len: usize,
    sampling_rate: f64,
    cfg: &SegmenterConfig,
) -> Vec<BeatWindow> {
    if !sampling_rate.is_finite() || sampling_rate <= 0.0 || signal_len == 0 || peaks.is_empty()
    {
        return Vec::new();
    }

    let (pre, post) = beat_window_lengths(sampling_rate, cfg);
    if pre == 0 && post == 0 {
        log::warn!("beat windows skipped: pre and post spans are both zero samples");
        return Vec::new();
    }

    let mut out = Vec::with_capacity(peaks.len());
    for &peak in peaks {
        let Some(start) = peak.checked_sub(pre) else {
            continue;
        };
        let end = peak.saturating_add(post);
        if end > signal_len {
            continue;
        }
        out.push(BeatWindow {
            peak_index: peak,
            start_index: start,
            end_index: end,
        });
    }

    log::debug!(
        "segmented {} of {} peaks into windows of {}+{} samples",
        out.len(),
        peaks.len(),
        pre,
        post
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spans_at_360_hz() {
        assert_eq!(
            beat_window_lengths(360.0, &SegmenterConfig::default()),
            (72, 144)
        );
    }

    #[test]
    fn window_at_left_edge_is_kept_and_before_it_dropped() {
        let cfg = SegmenterConfig::default();
        let windows = beat_windows(&[72], 1000, 360.0, &cfg);
        assert_eq!(
            windows,
            vec![BeatWindow {
                peak_index: 72,
                start_index: 0,
                end_index: 216,
            }]
        );
        assert!(beat_windows(&[50], 1000, 360.0, &cfg).is_empty());
    }

    #[test]
    fn right_edge_is_exclusive() {
        let cfg = SegmenterConfig::default();
        // 856 + 144 = 1000 fits exactly, 857 does not
        let windows = beat_windows(&[856, 857], 1000, 360.0, &cfg);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].end_index, 1000);
    }

    #[test]
    fn windows_have_constant_width_and_valid_bounds() {
        let cfg = SegmenterConfig::default();
        let peaks = [10, 72, 100, 300, 310, 700, 900, 990];
        let windows = beat_windows(&peaks, 1000, 360.0, &cfg);
        assert!(!windows.is_empty());
        for w in &windows {
            assert!(w.start_index < w.end_index);
            assert!(w.end_index <= 1000);
            assert_eq!(w.len(), 216);
        }
        let kept: Vec<usize> = windows.iter().map(|w| w.peak_index).collect();
        assert_eq!(kept, vec![72, 100, 300, 310, 700]);
    }

    #[test]
    fn overlapping_windows_are_not_merged() {
        let windows = beat_windows(&[300, 310], 1000, 360.0, &SegmenterConfig::default());
        assert_eq!(windows.len(), 2);
        assert!(windows[0].end_index > windows[1].start_index);
    }

    #[test]
    fn preserves_input_order() {
        let windows = beat_windows(&[500, 200], 1000, 360.0, &SegmenterConfig::default());
        let order: Vec<usize> = windows.iter().map(|w| w.peak_index).collect();
        assert_eq!(order, vec![500, 200]);
    }

    #[test]
    fn degenerate_inputs_yield_nothing() {
        let cfg = SegmenterConfig::default();
        assert!(beat_windows(&[], 1000, 360.0, &cfg).is_empty());
        assert!(beat_windows(&[500], 0, 360.0, &cfg).is_empty());
        assert!(beat_windows(&[500], 1000, 0.0, &cfg).is_empty());
        assert!(beat_windows(&[500], 1000, -360.0, &cfg).is_empty());
        let zero = SegmenterConfig {
            pre_s: 0.0,
            post_s: 0.0,
        };
        assert!(beat_windows(&[500], 1000, 360.0, &zero).is_empty());
    }

    #[test]
    fn huge_spans_drop_every_peak() {
        let cfg = SegmenterConfig {
            pre_s: 1e300,
            post_s: 1e300,
        };
        assert_eq!(beat_window_lengths(360.0, &cfg), (usize::MAX, usize::MAX));
        assert!(beat_windows(&[5], 10, 360.0, &cfg).is_empty());
        let post_only = SegmenterConfig {
            pre_s: 0.0,
            post_s: 1e300,
        };
        assert!(beat_windows(&[0, 5], 10, 360.0, &post_only).is_empty());
    }

    #[test]
    fn spans_truncate_toward_zero() {
        let cfg = SegmenterConfig {
            pre_s: 0.0149,
            post_s: 0.0151,
        };
        // 1.49 -> 1, 1.51 -> 1
        assert_eq!(beat_window_lengths(100.0, &cfg), (1, 1));
        let negative = SegmenterConfig {
            pre_s: -0.1,
            post_s: 0.1,
        };
        assert_eq!(beat_window_lengths(100.0, &negative), (0, 10));
    }
}
