//! Summary-file parser.
//!
//! Reads the per-subject `chbNN-summary.txt` index.  A file block looks like:
//!
//! ```text
//! +0  File Name: chb01_03.edf
//! +1  File Start Time: 13:43:04
//! +2  File End Time: 14:43:04
//! +3  Number of Seizures in File: 1
//! +4  Seizure Start Time: 2996 seconds
//! +5  Seizure End Time: 3036 seconds
//! ```
//!
//! A count of `n` (1..=3) is followed by `n` start/end pairs at
//! +4/+5, +6/+7, +8/+9.  Each seizure becomes its own [`FileRecord`] with
//! exactly one event.  Any other count (0, >3, garbage) makes the file a
//! non-seizure record.
//!
//! The parser walks the lines with three states:
//!
//! ```text
//! SeekFileMarker ──"File Name"──▶ ReadCount ──1..=3──▶ ReadEventPairs
//!       ▲                           │                       │
//!       └────── non-seizure ────────┘◀──── all pairs read ──┘
//! ```
use tracing::warn;

use crate::error::Skip;
use crate::index::{FileRecord, SeizureEvent};

const FILE_MARKER: &str = "File Name";
const COUNT_MARKER: &str = "File:";
/// Lines between the file marker and the count marker.
const COUNT_OFFSET: usize = 3;
const MAX_SEIZURES_PER_FILE: u32 = 3;

/// Output of [`parse_summary`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSummary {
    pub seizure_records: Vec<FileRecord>,
    pub non_seizure_records: Vec<FileRecord>,
    pub diagnostics: Vec<Skip>,
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    SeekFileMarker,
    ReadCount { marker: usize, file_id: String },
    ReadEventPairs { marker: usize, file_id: String, count: u32 },
}

/// Parse one subject's summary text.
///
/// Never fails as a whole: blocks or events that do not fit the layout are
/// reported in [`ParsedSummary::diagnostics`] and skipped.
pub fn parse_summary(text: &str) -> ParsedSummary {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let mut out = ParsedSummary::default();
    let mut state = State::SeekFileMarker;
    let mut i = 0;

    while i < lines.len() {
        state = match state {
            State::SeekFileMarker => {
                let line = lines[i];
                if !line.contains(FILE_MARKER) {
                    i += 1;
                    State::SeekFileMarker
                } else if i + COUNT_OFFSET >= lines.len() {
                    out.diagnostics.push(Skip::parse(i + 1, "file block truncated before seizure count"));
                    i += 1;
                    State::SeekFileMarker
                } else {
                    match value_token(line) {
                        Some(file_id) => State::ReadCount { marker: i, file_id: file_id.to_string() },
                        None => {
                            out.diagnostics.push(Skip::parse(i + 1, "file name marker without a name"));
                            i += 1;
                            State::SeekFileMarker
                        }
                    }
                }
            }

            State::ReadCount { marker, file_id } => {
                match seizure_count(lines[marker + COUNT_OFFSET]) {
                    Some(count) if (1..=MAX_SEIZURES_PER_FILE).contains(&count) => {
                        State::ReadEventPairs { marker, file_id, count }
                    }
                    _ => {
                        out.non_seizure_records.push(FileRecord::non_seizure(file_id));
                        i = marker + 1;
                        State::SeekFileMarker
                    }
                }
            }

            State::ReadEventPairs { marker, file_id, count } => {
                let last = pair_offset(count) + 1;
                if marker + last >= lines.len() {
                    out.diagnostics.push(Skip::parse(
                        marker + 1,
                        format!("{file_id}: {count} seizures announced but input ends early"),
                    ));
                    i = marker + 1;
                } else {
                    for k in 1..=count {
                        let at = marker + pair_offset(k);
                        match read_event(lines[at], lines[at + 1]) {
                            Ok(event) => out.seizure_records.push(FileRecord::seizure(file_id.clone(), event)),
                            Err(reason) => out.diagnostics.push(Skip::parse(at + 1, format!("{file_id}: {reason}"))),
                        }
                    }
                    i = marker + last + 1;
                }
                State::SeekFileMarker
            }
        };
    }

    for skip in &out.diagnostics {
        warn!(kind = skip.kind(), "{skip}");
    }
    out
}

/// Offset of the start line of seizure `k` (1-based) relative to the marker.
#[inline]
fn pair_offset(k: u32) -> usize {
    COUNT_OFFSET + 2 * k as usize - 1
}

/// First whitespace-delimited token after the last colon.
fn value_token(line: &str) -> Option<&str> {
    let (_, tail) = line.rsplit_once(':')?;
    tail.split_whitespace().next()
}

fn seizure_count(line: &str) -> Option<u32> {
    if !line.contains(COUNT_MARKER) {
        return None;
    }
    value_token(line)?.parse().ok()
}

fn read_seconds(line: &str) -> Result<u32, String> {
    let token = value_token(line).ok_or_else(|| format!("no time value in {line:?}"))?;
    token.parse().map_err(|_| format!("bad time value {token:?}"))
}

fn read_event(start_line: &str, end_line: &str) -> Result<SeizureEvent, String> {
    let start = read_seconds(start_line)?;
    let end = read_seconds(end_line)?;
    SeizureEvent::new(start, end).ok_or_else(|| format!("seizure end {end} not after start {start}"))
}
