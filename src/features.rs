//! Band statistics feature vectors.
//!
//! Each selected band is pooled over all channels and time points and reduced
//! to `(mean, median, variance)` with population variance (`ddof = 0`),
//! matching `np.mean` / `np.median` / `np.var` on the flattened band array.
//!
//! | mode                      | bands                           | length |
//! |---------------------------|---------------------------------|--------|
//! | [`FeatureMode::AllBands`] | Delta, Theta, Alpha, Beta, Gamma | 15     |
//! | [`FeatureMode::ThetaAlpha`] | Theta, Alpha                  | 6      |
use ndarray::ArrayView2;
use serde::Deserialize;

use crate::band::{Band, Segment};
use crate::error::Skip;
use crate::window::Label;

/// Statistics computed per band.
pub const STATS_PER_BAND: usize = 3;

/// Which bands feed the feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureMode {
    #[default]
    AllBands,
    ThetaAlpha,
}

impl FeatureMode {
    pub fn bands(self) -> &'static [Band] {
        match self {
            FeatureMode::AllBands => &Band::ALL,
            FeatureMode::ThetaAlpha => &[Band::Theta, Band::Alpha],
        }
    }

    /// Fixed vector length for this mode.
    pub fn vector_len(self) -> usize {
        self.bands().len() * STATS_PER_BAND
    }
}

/// One labelled feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub values: Vec<f64>,
    pub label: Label,
}

/// Encode `segment` into a vector of `mode.vector_len()` values.
///
/// Fails as a whole if any selected band is missing or empty; a partial
/// vector is never returned.
pub fn encode(segment: &Segment, mode: FeatureMode, label: Label, file_id: &str) -> Result<FeatureVector, Skip> {
    let mut values = Vec::with_capacity(mode.vector_len());
    for &band in mode.bands() {
        let data = segment
            .band(band)
            .ok_or_else(|| Skip::backend(file_id, format!("{} band missing from segment", band.name())))?;
        let stats = band_stats(data.view())
            .ok_or_else(|| Skip::backend(file_id, format!("{} band is empty", band.name())))?;
        values.extend_from_slice(&stats);
    }
    debug_assert_eq!(values.len(), mode.vector_len());
    Ok(FeatureVector { values, label })
}

/// `[mean, median, variance]` over every element, or `None` when empty.
pub fn band_stats(data: ArrayView2<'_, f32>) -> Option<[f64; STATS_PER_BAND]> {
    let n = data.len();
    if n == 0 {
        return None;
    }
    let mut pooled: Vec<f64> = data.iter().map(|&v| v as f64).collect();

    let mean = pooled.iter().sum::<f64>() / n as f64;
    let var = pooled.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
    let median = median_inplace(&mut pooled);

    Some([mean, median, var])
}

/// Median of a non-empty slice; reorders the slice.
fn median_inplace(xs: &mut [f64]) -> f64 {
    let n = xs.len();
    let mid = n / 2;
    let (below, upper, _) = xs.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = *upper;
    if n % 2 == 1 {
        upper
    } else {
        // Lower middle is the largest element left of `mid`.
        let lower = below.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lower + upper) / 2.0
    }
}
