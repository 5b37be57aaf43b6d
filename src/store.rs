//! On-disk [`SegmentBackend`]: cohort directory of summaries and
//! safetensors recordings.
//!
//! Per window:
//!
//! ```text
//! recording.safetensors
//!   │
//!   ├─ io::Recording::load     [C, T] f32 + sfreq + channel names
//!   ├─ drop_channels           FilterConfig::exclude_channels
//!   ├─ crop                    [start·sfreq, end·sfreq)
//!   ├─ notch                   one narrow band-stop per FilterConfig::notch
//!   └─ per band                zero-phase FIR band-pass, 1 Hz transitions
//!        │
//!        └─→ Segment { band → [C, 150·sfreq] }
//! ```
//!
//! Filter kernels depend only on the sampling rate and the window length, so
//! they are designed once per `(sfreq, n_samples)` and shared across windows.
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use ndarray::{s, Array2};
use tracing::{debug, warn};

use crate::annotation::parse_summary;
use crate::backend::SegmentBackend;
use crate::band::{Band, Segment};
use crate::config::{FilterConfig, LayoutConfig};
use crate::error::Skip;
use crate::filter::{design_bandpass, design_bandstop, FirKernel};
use crate::index::{SubjectId, SubjectIndex};
use crate::io::{Recording, RecordingInfo};
use crate::window::Window;

/// Planned notch and band-pass kernels for one `(sfreq, n_samples)`.
struct KernelBank {
    notches: Vec<FirKernel>,
    bands: Vec<(Band, FirKernel)>,
}

/// Cache key: sampling rate bits and window length in samples.
type KernelKey = (u32, usize);

/// Reads a cohort laid out per [`LayoutConfig`].
pub struct DirectoryBackend {
    layout: LayoutConfig,
    filter: FilterConfig,
    bands: Vec<Band>,
    kernels: Mutex<HashMap<KernelKey, Arc<KernelBank>>>,
}

impl fmt::Debug for DirectoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryBackend")
            .field("layout", &self.layout)
            .field("filter", &self.filter)
            .field("bands", &self.bands)
            .finish_non_exhaustive()
    }
}

impl DirectoryBackend {
    /// Backend producing all five bands.
    pub fn new(layout: LayoutConfig, filter: FilterConfig) -> Self {
        Self { layout, filter, bands: Band::ALL.to_vec(), kernels: Mutex::default() }
    }

    /// Restrict segments to `bands`; the rest are never filtered.
    pub fn with_bands(mut self, bands: &[Band]) -> Self {
        self.bands = bands.to_vec();
        self.kernels = Mutex::default();
        self
    }

    /// Number of distinct `(sfreq, n_samples)` kernel sets planned so far.
    pub fn planned_kernel_sets(&self) -> usize {
        self.kernels.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn recording_path(&self, subject: SubjectId, file_id: &str) -> PathBuf {
        self.layout.recording_path(subject, file_id)
    }

    fn kernels(&self, sfreq: f32, n_t: usize) -> Result<Arc<KernelBank>> {
        let key = (sfreq.to_bits(), n_t);
        if let Some(bank) = self.kernels.lock().unwrap_or_else(PoisonError::into_inner).get(&key) {
            return Ok(Arc::clone(bank));
        }

        let mut notches = Vec::with_capacity(self.filter.notch.len());
        for &freq in &self.filter.notch {
            let (lo, hi) = self.filter.notch_band(freq);
            let h = design_bandstop(lo, hi, self.filter.notch_trans_bandwidth, sfreq)
                .with_context(|| format!("designing {freq} Hz notch"))?;
            notches.push(FirKernel::new(&h, n_t)?);
        }
        let mut bands = Vec::with_capacity(self.bands.len());
        for &band in &self.bands {
            let (l_freq, h_freq) = band.edges();
            let h = design_bandpass(
                l_freq,
                h_freq,
                self.filter.l_trans_bandwidth,
                self.filter.h_trans_bandwidth,
                sfreq,
            )
            .with_context(|| format!("designing {} filter", band.name()))?;
            bands.push((band, FirKernel::new(&h, n_t)?));
        }
        debug!(sfreq, n_t, notches = notches.len(), bands = bands.len(), "planned filter kernels");

        let bank = Arc::new(KernelBank { notches, bands });
        let mut cache = self.kernels.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(key).or_insert(bank)))
    }

    fn condition(&self, mut crop: Array2<f32>, sfreq: f32) -> Result<Segment> {
        let bank = self.kernels(sfreq, crop.ncols())?;
        for notch in &bank.notches {
            notch.apply_rows(&mut crop);
        }

        let mut segment = Segment::new();
        for (band, kernel) in &bank.bands {
            let mut data = crop.clone();
            kernel.apply_rows(&mut data);
            segment.insert(*band, data);
        }
        Ok(segment)
    }
}

impl SegmentBackend for DirectoryBackend {
    fn load_index(&self, subject: SubjectId) -> Result<SubjectIndex> {
        let path = self.layout.summary_path(subject);
        let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let parsed = parse_summary(&text);

        let mut index = SubjectIndex::new(subject);
        index.file_records = parsed.seizure_records;
        index.file_records.extend(parsed.non_seizure_records);
        index.diagnostics = parsed.diagnostics;

        let mut unreadable = Vec::new();
        for record in &index.file_records {
            if index.durations.contains_key(&record.file_id) || unreadable_has(&unreadable, &record.file_id) {
                continue;
            }
            let rec_path = self.recording_path(subject, &record.file_id);
            if !rec_path.is_file() {
                debug!(file = %rec_path.display(), "no recording");
                continue;
            }
            match RecordingInfo::probe(&rec_path) {
                Ok(info) => {
                    index.durations.insert(record.file_id.clone(), info.duration_secs());
                }
                Err(e) => {
                    let skip = Skip::backend(&record.file_id, format!("unreadable recording: {e:#}"));
                    warn!(subject = subject.0, kind = skip.kind(), "{skip}");
                    unreadable.push(skip);
                }
            }
        }
        index.diagnostics.extend(unreadable);
        Ok(index)
    }

    fn load_segment(&self, subject: SubjectId, window: &Window) -> Result<Segment, Skip> {
        let file_id = window.file_id.as_str();
        let path = self.recording_path(subject, file_id);
        if !path.is_file() {
            return Err(Skip::missing(file_id));
        }
        let fail = |e: anyhow::Error| Skip::backend(file_id, format!("{e:#}"));

        let mut rec = Recording::load(&path).map_err(fail)?;
        rec.drop_channels(&self.filter.exclude_channels);
        if rec.data.nrows() == 0 {
            return Err(Skip::backend(file_id, "no channels left after exclusion"));
        }

        let sfreq = rec.sfreq as f64;
        let start = (window.start_sec * sfreq).round() as usize;
        let stop = (window.end_sec * sfreq).round() as usize;
        if window.start_sec < 0.0 || stop > rec.data.ncols() || stop <= start {
            return Err(Skip::backend(
                file_id,
                format!(
                    "window [{}, {}) s outside {} samples at {} Hz",
                    window.start_sec,
                    window.end_sec,
                    rec.data.ncols(),
                    rec.sfreq
                ),
            ));
        }

        let crop = rec.data.slice(s![.., start..stop]).to_owned();
        self.condition(crop, rec.sfreq).map_err(fail)
    }
}

fn unreadable_has(skips: &[Skip], file_id: &str) -> bool {
    skips.iter().any(|s| s.file_id() == Some(file_id))
}
