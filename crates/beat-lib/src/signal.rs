use serde::{Deserialize, Serialize};

/// Single-lead ECG recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgRecording {
    /// Uniform sampling rate in Hz
    #[serde(rename = "samplingRate")]
    pub sampling_rate: f64,
    /// Samples
    pub samples: Vec<f32>,
}

impl EcgRecording {
    pub fn new(samples: Vec<f32>, sampling_rate: f64) -> Self {
        Self {
            sampling_rate,
            samples,
        }
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    /// Duration in seconds, zero when the sampling rate is unusable.
    pub fn duration(&self) -> f64 {
        if self.sampling_rate > 0.0 {
            self.samples.len() as f64 / self.sampling_rate
        } else {
            0.0
        }
    }
}

/// Point events on a timeline (e.g., R-peak indices)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Events {
    pub indices: Vec<usize>,
}

impl Events {
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }
    pub fn len(&self) -> usize {
        self.indices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Fixed-width slice of the signal around one R-peak. `end_index` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeatWindow {
    pub peak_index: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl BeatWindow {
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.end_index == self.start_index
    }

    /// Offset of the R-peak inside the window.
    pub fn peak_offset(&self) -> usize {
        self.peak_index - self.start_index
    }

    /// Borrow the beat's samples; `None` if `signal` is shorter than the window.
    pub fn slice<'a>(&self, signal: &'a [f32]) -> Option<&'a [f32]> {
        signal.get(self.start_index..self.end_index)
    }
}
