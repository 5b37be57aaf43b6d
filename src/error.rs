//! Skip taxonomy.
//!
//! Nothing below the dataset level is fatal.  Every per-item failure is a
//! [`Skip`] value that the caller records as a [`Diagnostic`] and moves past:
//!
//! | variant              | scope skipped            |
//! |----------------------|--------------------------|
//! | `Parse`              | one annotation block/event |
//! | `WindowInfeasible`   | one window               |
//! | `Backend`            | one window's vector      |
//! | `MissingFile`        | one recording            |
use std::fmt;

use crate::index::SubjectId;

/// Why one unit of work was skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Skip {
    /// An annotation block or event line did not match the expected layout.
    #[error("annotation line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// The requested window does not fit inside the recording.
    #[error("window infeasible in {file_id}: {reason}")]
    WindowInfeasible { file_id: String, reason: String },

    /// Loading, filtering or encoding the segment failed.
    #[error("backend failure for {file_id}: {reason}")]
    Backend { file_id: String, reason: String },

    /// The recording referenced by the index is not available.
    #[error("recording {file_id} not found")]
    MissingFile { file_id: String },
}

impl Skip {
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Skip::Parse { line, reason: reason.into() }
    }

    pub fn infeasible(file_id: &str, reason: impl Into<String>) -> Self {
        Skip::WindowInfeasible { file_id: file_id.to_string(), reason: reason.into() }
    }

    pub fn backend(file_id: &str, reason: impl Into<String>) -> Self {
        Skip::Backend { file_id: file_id.to_string(), reason: reason.into() }
    }

    pub fn missing(file_id: &str) -> Self {
        Skip::MissingFile { file_id: file_id.to_string() }
    }

    /// Short stable name of the variant, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Skip::Parse { .. } => "parse",
            Skip::WindowInfeasible { .. } => "window_infeasible",
            Skip::Backend { .. } => "backend",
            Skip::MissingFile { .. } => "missing_file",
        }
    }

    /// Recording the skip refers to; `None` for annotation-level skips.
    pub fn file_id(&self) -> Option<&str> {
        match self {
            Skip::Parse { .. } => None,
            Skip::WindowInfeasible { file_id, .. }
            | Skip::Backend { file_id, .. }
            | Skip::MissingFile { file_id } => Some(file_id),
        }
    }
}

/// A recorded skip, tagged with the subject it happened in.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub subject: SubjectId,
    pub skip: Skip,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subject {}: {}", self.subject, self.skip)
    }
}

/// A subject whose index could not be obtained at all.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectFailure {
    pub subject: SubjectId,
    pub message: String,
}
