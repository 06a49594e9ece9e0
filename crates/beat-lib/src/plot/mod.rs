//! Backend-agnostic figures for ECG traces and overlaid beats.

use crate::signal::BeatWindow;
use serde::{Deserialize, Serialize};

/// 0xRRGGBB
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub fn rgb(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

pub const WAVEFORM_COLOR: Color = Color(0x00B050);
pub const PEAK_COLOR: Color = Color(0xFF0077);

const BEAT_PALETTE: [Color; 6] = [
    Color(0x1F77B4),
    Color(0xFF7F0E),
    Color(0x2CA02C),
    Color(0xD62728),
    Color(0x9467BD),
    Color(0x8C564B),
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Connected trace.
    Line,
    /// Unconnected points, e.g. R-peak markers.
    Markers,
}

/// Line width or marker radius in pixels, plus color.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub points: Vec<[f64; 2]>,
    pub stroke: Stroke,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub x_label: Option<String>,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: None,
            series: Vec::new(),
        }
    }

    /// `(x_min, x_max, y_min, y_max)` over every series, `None` when there are no points.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut points = self.series.iter().flat_map(|s| s.points.iter());
        let first = points.next()?;
        let init = (first[0], first[0], first[1], first[1]);
        Some(points.fold(init, |(x0, x1, y0, y1), p| {
            (x0.min(p[0]), x1.max(p[0]), y0.min(p[1]), y1.max(p[1]))
        }))
    }
}

/// Rendering target for a [`Figure`].
pub trait PlotBackend {
    fn draw(&mut self, fig: &Figure) -> anyhow::Result<()>;
}

/// Min/max envelope decimation: at most `max_points` points, in x order.
///
/// Each bucket contributes its lowest and highest sample, so narrow QRS spikes
/// survive heavy downsampling.
pub fn decimate_envelope(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points {
        return points.to_vec();
    }
    if max_points < 2 {
        return points.iter().take(max_points).copied().collect();
    }

    let buckets = max_points / 2;
    let mut out = Vec::with_capacity(buckets * 2);
    for b in 0..buckets {
        let start = b * points.len() / buckets;
        let end = (b + 1) * points.len() / buckets;
        let bucket = &points[start..end];
        let (mut lo, mut hi) = (0, 0);
        for (i, p) in bucket.iter().enumerate() {
            if p[1] < bucket[lo][1] {
                lo = i;
            }
            if p[1] > bucket[hi][1] {
                hi = i;
            }
        }
        match lo.cmp(&hi) {
            std::cmp::Ordering::Less => out.extend([bucket[lo], bucket[hi]]),
            std::cmp::Ordering::Greater => out.extend([bucket[hi], bucket[lo]]),
            std::cmp::Ordering::Equal => out.push(bucket[lo]),
        }
    }
    out
}

fn seconds_per_sample(fs: f64) -> f64 {
    1.0 / if fs > 0.0 { fs } else { 1.0 }
}

/// Waveform over time in seconds, with optional R-peak markers.
///
/// Only the trace is decimated; every peak keeps its marker.
pub fn figure_from_waveform(
    title: &str,
    samples: &[f32],
    fs: f64,
    peaks: &[usize],
    max_points: usize,
) -> Figure {
    let dt = seconds_per_sample(fs);
    let trace: Vec<[f64; 2]> = samples
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64 * dt, v as f64])
        .collect();
    let mut fig = Figure::new(title);
    fig.x_label = Some("time (s)".into());
    fig.series.push(Series {
        name: "ECG".into(),
        kind: SeriesKind::Line,
        points: decimate_envelope(&trace, max_points),
        stroke: Stroke {
            width: 1.5,
            color: WAVEFORM_COLOR,
        },
    });

    let markers: Vec<[f64; 2]> = peaks
        .iter()
        .filter_map(|&p| samples.get(p).map(|&v| [p as f64 * dt, v as f64]))
        .collect();
    if !markers.is_empty() {
        fig.series.push(Series {
            name: "R-peaks".into(),
            kind: SeriesKind::Markers,
            points: markers,
            stroke: Stroke {
                width: 3.0,
                color: PEAK_COLOR,
            },
        });
    }
    fig
}

/// All beat windows overlaid, time measured from each window's R-peak.
pub fn figure_from_beats(title: &str, samples: &[f32], windows: &[BeatWindow], fs: f64) -> Figure {
    let dt = seconds_per_sample(fs);
    let mut fig = Figure::new(title);
    fig.x_label = Some("time from R-peak (s)".into());
    for (n, window) in windows.iter().enumerate() {
        let Some(beat) = window.slice(samples) else {
            continue;
        };
        let offset = window.peak_offset() as f64;
        fig.series.push(Series {
            name: format!("beat {}", n + 1),
            kind: SeriesKind::Line,
            points: beat
                .iter()
                .enumerate()
                .map(|(i, &v)| [(i as f64 - offset) * dt, v as f64])
                .collect(),
            stroke: Stroke {
                width: 1.0,
                color: BEAT_PALETTE[n % BEAT_PALETTE.len()],
            },
        });
    }
    fig
}
