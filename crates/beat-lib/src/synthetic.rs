//! Built-in demo recording: one Gaussian R-wave per second over a slow sinusoidal baseline.

use crate::signal::EcgRecording;
use std::f64::consts::PI;

pub const DEMO_SAMPLING_RATE: f64 = 360.0;
pub const DEMO_DURATION_S: f64 = 5.0;

/// Synthetic ECG-like trace at `fs` Hz lasting `duration_s` seconds.
///
/// `x(t) = 0.08 sin(2π·1.2·t) + exp(-((t mod 1 - 0.2)·40)²)`, so each second
/// carries a unit-height peak 0.2 s in.
pub fn synthetic_ecg(fs: f64, duration_s: f64) -> EcgRecording {
    if !(fs > 0.0) || !(duration_s > 0.0) {
        return EcgRecording::new(Vec::new(), fs);
    }
    let total = (fs * duration_s) as usize;
    let samples = (0..total)
        .map(|i| {
            let t = i as f64 / fs;
            let baseline = (2.0 * PI * 1.2 * t).sin() * 0.08;
            let r_wave = (-((t % 1.0 - 0.2) * 40.0).powi(2)).exp();
            (baseline + r_wave) as f32
        })
        .collect();
    EcgRecording::new(samples, fs)
}

/// The 5 s, 360 Hz demo recording.
pub fn demo_recording() -> EcgRecording {
    synthetic_ecg(DEMO_SAMPLING_RATE, DEMO_DURATION_S)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_has_expected_shape() {
        let rec = demo_recording();
        assert_eq!(rec.len(), 1800);
        assert_eq!(rec.sampling_rate, 360.0);
        let (argmax, max) = rec
            .samples
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |acc, (i, v)| if v > acc.1 { (i, v) } else { acc });
        assert!(max > 0.9 && max < 1.1, "max {}", max);
        assert_eq!(argmax % 360, 72);
    }

    #[test]
    fn invalid_parameters_give_empty_recording() {
        assert!(synthetic_ecg(0.0, 5.0).is_empty());
        assert!(synthetic_ecg(360.0, -1.0).is_empty());
    }
}
