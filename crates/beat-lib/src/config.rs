use crate::detectors::ecg::RPeakConfig;
use crate::segment::SegmenterConfig;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for the whole normalize → detect → segment run.
///
/// Every field has a default, so a TOML file only needs the values it changes:
///
/// ```toml
/// [detector]
/// threshold_z = 1.2
///
/// [segmenter]
/// post_s = 0.5
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub detector: RPeakConfig,
    pub segmenter: SegmenterConfig,
}

impl PipelineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: PipelineConfig = toml::from_str(contents).context("parsing pipeline config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the processing stages would silently turn into empty output.
    pub fn validate(&self) -> Result<()> {
        if !self.detector.threshold_z.is_finite() {
            bail!("detector.threshold_z must be finite");
        }
        for (name, value) in [
            ("detector.refractory_s", self.detector.refractory_s),
            ("segmenter.pre_s", self.segmenter.pre_s),
            ("segmenter.post_s", self.segmenter.post_s),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{} must be a non-negative number of seconds, got {}", name, value);
            }
        }
        Ok(())
    }
}

/// Read and validate a TOML pipeline config.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    PipelineConfig::from_toml_str(&contents)
        .with_context(|| format!("loading config {}", path.display()))
}
