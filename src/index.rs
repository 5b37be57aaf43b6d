//! Per-subject annotation index types.
use std::collections::BTreeMap;
use std::fmt;

use crate::error::Skip;

/// One seizure inside a recording, in whole seconds from the file start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeizureEvent {
    pub start_sec: u32,
    pub end_sec: u32,
}

impl SeizureEvent {
    /// Returns `None` unless `end_sec > start_sec`.
    pub fn new(start_sec: u32, end_sec: u32) -> Option<Self> {
        (end_sec > start_sec).then_some(Self { start_sec, end_sec })
    }

    pub fn duration_secs(&self) -> u32 {
        self.end_sec - self.start_sec
    }
}

/// One annotated recording.  No events means a non-seizure file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub file_id: String,
    pub seizure_events: Vec<SeizureEvent>,
}

impl FileRecord {
    pub fn seizure(file_id: impl Into<String>, event: SeizureEvent) -> Self {
        Self { file_id: file_id.into(), seizure_events: vec![event] }
    }

    pub fn non_seizure(file_id: impl Into<String>) -> Self {
        Self { file_id: file_id.into(), seizure_events: Vec::new() }
    }

    #[inline]
    pub fn is_seizure(&self) -> bool {
        !self.seizure_events.is_empty()
    }
}

/// Cohort subject number (`chb01` → `SubjectId(1)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubjectId(pub u32);

impl SubjectId {
    /// Single-digit ids get a leading zero in derived paths.
    #[inline]
    pub fn is_short(self) -> bool {
        self.0 < 10
    }

    /// `"01"` for 1, `"19"` for 19.
    pub fn padded(self) -> String {
        if self.is_short() {
            format!("0{}", self.0)
        } else {
            self.0.to_string()
        }
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the dataset builder needs to know about one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectIndex {
    pub subject_id: SubjectId,
    pub is_short_id: bool,
    /// Seizure records (one event each) first, then non-seizure records.
    pub file_records: Vec<FileRecord>,
    /// Recording duration in whole seconds.  Absent entries are missing files.
    pub durations: BTreeMap<String, u32>,
    /// Skips collected while building the index: annotation parse errors
    /// and recordings that exist but could not be read.
    pub diagnostics: Vec<Skip>,
}

impl SubjectIndex {
    pub fn new(subject_id: SubjectId) -> Self {
        Self {
            subject_id,
            is_short_id: subject_id.is_short(),
            file_records: Vec::new(),
            durations: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn seizure_records(&self) -> impl Iterator<Item = &FileRecord> {
        self.file_records.iter().filter(|r| r.is_seizure())
    }

    pub fn non_seizure_records(&self) -> impl Iterator<Item = &FileRecord> {
        self.file_records.iter().filter(|r| !r.is_seizure())
    }

    pub fn duration_of(&self, file_id: &str) -> Option<u32> {
        self.durations.get(file_id).copied()
    }

    /// Whether `file_id` is present on disk but was already reported as unreadable.
    pub fn is_unreadable(&self, file_id: &str) -> bool {
        self.diagnostics
            .iter()
            .any(|s| matches!(s, Skip::Backend { .. }) && s.file_id() == Some(file_id))
    }
}
