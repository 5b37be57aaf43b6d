//! # ictal — seizure-detection feature datasets from annotated EEG
//!
//! `ictal` turns a cohort of long multi-channel EEG recordings, each subject
//! annotated by a CHB-MIT style `chbNN-summary.txt`, into two labelled
//! collections of fixed-width feature vectors: seizure and non-seizure.
//!
//! ## Pipeline overview
//!
//! ```text
//! chbNN-summary.txt
//!   │
//!   ├─ annotation::parse_summary()    seizure / non-seizure file records
//!   ├─ window                         150 s windows
//!   │     seizure:      [onset − 30, onset + 120)
//!   │     non-seizure:  one random window per third of the recording
//!   ├─ SegmentBackend::load_segment   notch + 5 band-pass sub-bands
//!   ├─ features::encode()             mean / median / variance per band
//!   └─ DatasetBuilder::build()        whole cohort, rayon-parallel
//!        │
//!        └─→ Dataset { seizure: Vec<FeatureVector>, non_seizure: Vec<FeatureVector> }
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use ictal::{DatasetBuilder, DatasetConfig, DirectoryBackend};
//! use std::path::PathBuf;
//!
//! let mut cfg = DatasetConfig::default();
//! cfg.layout.root = PathBuf::from("/data/chb-mit");
//!
//! let backend = DirectoryBackend::new(cfg.layout.clone(), cfg.filter.clone())
//!     .with_bands(cfg.mode.bands());
//! let dataset = DatasetBuilder::new(cfg, backend).build();
//!
//! println!("{} seizure / {} non-seizure vectors",
//!     dataset.seizure.len(), dataset.non_seizure.len());
//! for d in &dataset.report.diagnostics {
//!     eprintln!("skipped: {d}");
//! }
//! ```
//!
//! ## Running individual steps
//!
//! ```
//! use ictal::annotation::parse_summary;
//! use ictal::window::seizure_window;
//!
//! let text = "File Name: chb01_03.edf\n\
//!             File Start Time: 13:43:04\n\
//!             File End Time: 14:43:04\n\
//!             Number of Seizures in File: 1\n\
//!             Seizure Start Time: 2996 seconds\n\
//!             Seizure End Time: 3036 seconds\n";
//! let parsed = parse_summary(text);
//! let record = &parsed.seizure_records[0];
//! let w = seizure_window(&record.file_id, &record.seizure_events[0], 3600).unwrap();
//! assert_eq!((w.start_sec, w.end_sec), (2966.0, 3116.0));
//! ```

pub mod annotation;
pub mod backend;
pub mod band;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod filter;
pub mod index;
pub mod io;
pub mod logging;
pub mod store;
pub mod window;

// ── Crate-root re-exports ─────────────────────────────────────────────────

pub use annotation::{parse_summary, ParsedSummary};
pub use backend::SegmentBackend;
pub use band::{Band, Segment};
pub use config::{DatasetConfig, FilterConfig, LayoutConfig};
pub use dataset::{BuildReport, Dataset, DatasetBuilder};
pub use error::{Diagnostic, Skip, SubjectFailure};
pub use features::{encode, FeatureMode, FeatureVector};
pub use index::{FileRecord, SeizureEvent, SubjectId, SubjectIndex};
pub use io::{write_dataset, Recording, RecordingInfo, StWriter};
pub use store::DirectoryBackend;
pub use window::{non_seizure_windows, seizure_window, Label, Window, WINDOW_SECS};
