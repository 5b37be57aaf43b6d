//! Dataset-building configuration.
//!
//! [`DatasetConfig`] holds the cohort, feature mode and randomness settings;
//! [`FilterConfig`] and [`LayoutConfig`] configure the on-disk backend.  All
//! fields have defaults matching the CHB-MIT study setup, and every struct
//! deserialises from a partial TOML document:
//!
//! ```toml
//! seed = 7
//! mode = "theta_alpha"
//!
//! [filter]
//! notch = [60.0]
//!
//! [layout]
//! root = "/data/chb-mit"
//! ```
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::features::FeatureMode;
use crate::index::SubjectId;

/// Subjects excluded for insufficient age / data quality.
pub const DEFAULT_EXCLUDED: [u32; 6] = [6, 8, 10, 12, 13, 15];

/// Configuration for one dataset-building run.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use ictal::{DatasetConfig, FeatureMode};
///
/// let cfg = DatasetConfig {
///     mode: FeatureMode::ThetaAlpha,
///     seed: 1234,
///     ..DatasetConfig::default()
/// };
/// assert_eq!(cfg.subjects().len(), 13);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// First subject id (inclusive).  Default: `1`.
    pub first_subject: u32,

    /// Last subject id (inclusive).  Default: `19`.
    pub last_subject: u32,

    /// Subject ids never processed.  Default: `{6, 8, 10, 12, 13, 15}`.
    pub excluded: Vec<u32>,

    /// Which bands feed the feature vector.  Default: all five.
    pub mode: FeatureMode,

    /// Base seed for non-seizure window draws.  Each subject derives its own
    /// generator from this seed and its id, so results do not depend on
    /// processing order.  Default: `0`.
    pub seed: u64,

    /// Process subjects on the rayon thread pool.  Default: `true`.
    pub parallel: bool,

    pub filter: FilterConfig,

    pub layout: LayoutConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            first_subject: 1,
            last_subject: 19,
            excluded: DEFAULT_EXCLUDED.to_vec(),
            mode: FeatureMode::AllBands,
            seed: 0,
            parallel: true,
            filter: FilterConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl DatasetConfig {
    /// Load from a TOML file; missing keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let cfg: Self = toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.first_subject <= self.last_subject,
            "empty cohort range {}..={}",
            self.first_subject,
            self.last_subject
        );
        self.filter.validate()
    }

    pub fn cohort(&self) -> RangeInclusive<u32> {
        self.first_subject..=self.last_subject
    }

    pub fn is_excluded(&self, subject: SubjectId) -> bool {
        self.excluded.contains(&subject.0)
    }

    /// Cohort ids minus exclusions, in ascending order.
    pub fn subjects(&self) -> Vec<SubjectId> {
        self.cohort().map(SubjectId).filter(|&s| !self.is_excluded(s)).collect()
    }
}

/// Signal conditioning applied by the directory backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Notch centre frequencies in Hz.  Each one gets its own narrow
    /// band-stop, as MNE's `notch_filter(freqs=...)` does.
    /// Default: `[49.1, 50.9]`.
    pub notch: Vec<f32>,

    /// Stop-band width of every notch in Hz.  `None` uses `freq / 200`.
    pub notch_width: Option<f32>,

    /// Transition bandwidth of each notch in Hz.  Default: `1.0`.
    pub notch_trans_bandwidth: f32,

    /// Lower-edge transition bandwidth of every sub-band filter.  Default: `1.0` Hz.
    pub l_trans_bandwidth: f32,

    /// Upper-edge transition bandwidth of every sub-band filter.  Default: `1.0` Hz.
    pub h_trans_bandwidth: f32,

    /// Channels never included in a segment (duplicates, placeholders and
    /// the stimulus channel).  Matching ignores case and spaces.
    ///
    /// Default: `["-", "T8-P8", ".", "STI 014"]`.
    pub exclude_channels: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            notch: vec![49.1, 50.9],
            notch_width: None,
            notch_trans_bandwidth: 1.0,
            l_trans_bandwidth: 1.0,
            h_trans_bandwidth: 1.0,
            exclude_channels: ["-", "T8-P8", ".", "STI 014"].map(String::from).to_vec(),
        }
    }
}

impl FilterConfig {
    /// Stop band `(low, high)` in Hz of the notch centred on `freq`.
    pub fn notch_band(&self, freq: f32) -> (f32, f32) {
        let width = self.notch_width.unwrap_or(freq / 200.0);
        (freq - width / 2.0, freq + width / 2.0)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.notch.iter().all(|&f| f > 0.0), "notch frequencies must be positive: {:?}", self.notch);
        ensure!(self.notch_width.map_or(true, |w| w > 0.0), "notch width must be positive");
        ensure!(
            self.notch_trans_bandwidth > 0.0 && self.l_trans_bandwidth > 0.0 && self.h_trans_bandwidth > 0.0,
            "transition bandwidths must be positive"
        );
        Ok(())
    }
}

/// Where the cohort lives on disk.
///
/// ```text
/// <root>/p_01/chb01-summary.txt
/// <root>/p_01/chb01_03.safetensors    (annotated as chb01_03.edf)
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub root: PathBuf,
    /// Extension recordings are stored under, replacing the annotated one.
    pub recording_extension: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { root: PathBuf::from("data"), recording_extension: "safetensors".into() }
    }
}

impl LayoutConfig {
    pub fn subject_dir(&self, subject: SubjectId) -> PathBuf {
        self.root.join(format!("p_{}", subject.padded()))
    }

    pub fn summary_path(&self, subject: SubjectId) -> PathBuf {
        self.subject_dir(subject).join(format!("chb{}-summary.txt", subject.padded()))
    }

    /// `chb01_03.edf` → `<root>/p_01/chb01_03.<recording_extension>`.
    pub fn recording_path(&self, subject: SubjectId, file_id: &str) -> PathBuf {
        let mut path = self.subject_dir(subject).join(file_id);
        path.set_extension(&self.recording_extension);
        path
    }
}
