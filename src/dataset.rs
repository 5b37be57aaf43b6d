//! Cohort-level dataset assembly.
//!
//! For every non-excluded subject:
//!
//! 1. `backend.load_index`               annotations + durations
//! 2. seizure records → `seizure_window` per event
//!    non-seizure records → `non_seizure_windows` (three thirds)
//! 3. `backend.load_segment` per window
//! 4. `features::encode` per segment
//!
//! Subjects are independent, so they run on the rayon pool and are merged back
//! in cohort order.  Nothing here returns an error: every failure ends up in
//! the [`BuildReport`].
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::backend::SegmentBackend;
use crate::config::DatasetConfig;
use crate::error::{Diagnostic, Skip, SubjectFailure};
use crate::features::{encode, FeatureMode, FeatureVector};
use crate::index::{SubjectId, SubjectIndex};
use crate::window::{non_seizure_windows, seizure_window, Label, Window};

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub mode: FeatureMode,
    pub seizure: Vec<FeatureVector>,
    pub non_seizure: Vec<FeatureVector>,
    pub report: BuildReport,
}

impl Dataset {
    /// Iterate all vectors, seizure first.
    pub fn vectors(&self) -> impl Iterator<Item = &FeatureVector> {
        self.seizure.iter().chain(self.non_seizure.iter())
    }
}

/// What was processed and what was skipped.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Subjects whose index loaded, in cohort order.
    pub processed: Vec<SubjectId>,
    /// Subjects whose index could not be obtained.
    pub failed: Vec<SubjectFailure>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    pub fn count(&self, kind: &str) -> usize {
        self.diagnostics.iter().filter(|d| d.skip.kind() == kind).count()
    }
}

/// Per-subject result before merging.
#[derive(Debug, Default)]
struct SubjectOutput {
    seizure: Vec<FeatureVector>,
    non_seizure: Vec<FeatureVector>,
    diagnostics: Vec<Diagnostic>,
}

/// Drives annotation → window → segment → features over a cohort.
pub struct DatasetBuilder<B> {
    config: DatasetConfig,
    backend: B,
}

impl<B: SegmentBackend> DatasetBuilder<B> {
    pub fn new(config: DatasetConfig, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Run the whole cohort.
    pub fn build(&self) -> Dataset {
        let subjects = self.config.subjects();
        info!(
            subjects = subjects.len(),
            mode = ?self.config.mode,
            parallel = self.config.parallel,
            "building dataset"
        );

        let results: Vec<(SubjectId, Result<SubjectOutput, String>)> = if self.config.parallel {
            subjects.par_iter().map(|&s| (s, self.run_subject(s))).collect()
        } else {
            subjects.iter().map(|&s| (s, self.run_subject(s))).collect()
        };

        let mut dataset = Dataset {
            mode: self.config.mode,
            seizure: Vec::new(),
            non_seizure: Vec::new(),
            report: BuildReport::default(),
        };
        for (subject, result) in results {
            match result {
                Ok(out) => {
                    dataset.seizure.extend(out.seizure);
                    dataset.non_seizure.extend(out.non_seizure);
                    dataset.report.diagnostics.extend(out.diagnostics);
                    dataset.report.processed.push(subject);
                }
                Err(message) => dataset.report.failed.push(SubjectFailure { subject, message }),
            }
        }

        info!(
            seizure = dataset.seizure.len(),
            non_seizure = dataset.non_seizure.len(),
            skipped = dataset.report.diagnostics.len(),
            failed_subjects = dataset.report.failed.len(),
            "dataset complete"
        );
        dataset
    }

    /// Generator for `subject`'s non-seizure draws, independent of scheduling.
    pub fn subject_rng(&self, subject: SubjectId) -> StdRng {
        let mixed = self.config.seed ^ (subject.0 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        StdRng::seed_from_u64(mixed)
    }

    fn run_subject(&self, subject: SubjectId) -> Result<SubjectOutput, String> {
        let index = match self.backend.load_index(subject) {
            Ok(index) => index,
            Err(e) => {
                let message = format!("{e:#}");
                error!(subject = subject.0, "cannot load index: {message}");
                return Err(message);
            }
        };
        let out = self.process_index(&index);
        info!(
            subject = subject.0,
            seizure = out.seizure.len(),
            non_seizure = out.non_seizure.len(),
            skipped = out.diagnostics.len(),
            "subject done"
        );
        Ok(out)
    }

    /// Windows, segments and vectors for one already-loaded subject.
    fn process_index(&self, index: &SubjectIndex) -> SubjectOutput {
        let subject = index.subject_id;
        let mut out = SubjectOutput::default();
        let record_skip = |out: &mut SubjectOutput, skip: Skip| {
            warn!(subject = subject.0, kind = skip.kind(), "{skip}");
            out.diagnostics.push(Diagnostic { subject, skip });
        };

        // Index skips were already logged when the index was loaded.
        out.diagnostics
            .extend(index.diagnostics.iter().cloned().map(|skip| Diagnostic { subject, skip }));

        let mut windows: Vec<Window> = Vec::new();
        for record in index.seizure_records() {
            let Some(duration) = index.duration_of(&record.file_id) else {
                if !index.is_unreadable(&record.file_id) {
                    record_skip(&mut out, Skip::missing(&record.file_id));
                }
                continue;
            };
            for event in &record.seizure_events {
                match seizure_window(&record.file_id, event, duration) {
                    Ok(w) => windows.push(w),
                    Err(s) => record_skip(&mut out, s),
                }
            }
        }

        let mut rng = self.subject_rng(subject);
        for record in index.non_seizure_records() {
            let Some(duration) = index.duration_of(&record.file_id) else {
                if !index.is_unreadable(&record.file_id) {
                    record_skip(&mut out, Skip::missing(&record.file_id));
                }
                continue;
            };
            for outcome in non_seizure_windows(&record.file_id, duration, &mut rng) {
                match outcome {
                    Ok(w) => windows.push(w),
                    Err(s) => record_skip(&mut out, s),
                }
            }
        }

        for window in &windows {
            let vector = self
                .backend
                .load_segment(subject, window)
                .and_then(|segment| encode(&segment, self.config.mode, window.label, &window.file_id));
            match vector {
                Ok(v) if v.label == Label::Seizure => out.seizure.push(v),
                Ok(v) => out.non_seizure.push(v),
                Err(s) => record_skip(&mut out, s),
            }
        }
        out
    }
}
