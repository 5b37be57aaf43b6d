//! Canonical EEG frequency bands and the band-decomposed segment.
use std::collections::BTreeMap;

use ndarray::Array2;

/// EEG sub-band, ordered Delta → Gamma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    Delta,
    Theta,
    Alpha,
    Beta,
    Gamma,
}

impl Band {
    pub const ALL: [Band; 5] = [Band::Delta, Band::Theta, Band::Alpha, Band::Beta, Band::Gamma];

    /// Pass-band edges `(l_freq, h_freq)` in Hz.  `l_freq == 0` means low-pass.
    pub fn edges(self) -> (f32, f32) {
        match self {
            Band::Delta => (0.0, 4.0),
            Band::Theta => (5.0, 7.0),
            Band::Alpha => (8.0, 12.0),
            Band::Beta => (13.0, 25.0),
            Band::Gamma => (30.0, 45.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Band::Delta => "Delta",
            Band::Theta => "Theta",
            Band::Alpha => "Alpha",
            Band::Beta => "Beta",
            Band::Gamma => "Gamma",
        }
    }
}

/// Band-filtered data for one window: band → `[C, T]`.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    bands: BTreeMap<Band, Array2<f32>>,
}

impl Segment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, band: Band, data: Array2<f32>) {
        self.bands.insert(band, data);
    }

    pub fn with_band(mut self, band: Band, data: Array2<f32>) -> Self {
        self.insert(band, data);
        self
    }

    pub fn band(&self, band: Band) -> Option<&Array2<f32>> {
        self.bands.get(&band)
    }

    pub fn bands(&self) -> impl Iterator<Item = Band> + '_ {
        self.bands.keys().copied()
    }
}
