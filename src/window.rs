//! Fixed-length window selection.
//!
//! Seizure windows start [`PRE_ONSET_SECS`] before onset.  Non-seizure
//! windows are drawn one per third of the recording:
//!
//! ```text
//! L = floor((D - 1) / 3)
//!
//! 0      40            L                 2L                3L     D
//! |------[ third 0 )---|----[ third 1 )---|----[ third 2 )--|------|
//!         start ∈ [40, L-155)  [L, 2L-155)       [2L, 3L-155)
//! ```
use rand::Rng;

use crate::error::Skip;
use crate::index::SeizureEvent;

/// Length of every window, in seconds.
pub const WINDOW_SECS: u32 = 150;
/// Pre-ictal context included before a seizure onset.
pub const PRE_ONSET_SECS: u32 = 30;
/// Minimum offset of a non-seizure window from the file head.
pub const HEAD_OFFSET_SECS: u32 = 40;
/// Space kept free at the end of each third.
pub const TAIL_MARGIN_SECS: u32 = WINDOW_SECS + 5;
/// Non-seizure windows drawn per recording.
pub const THIRDS: u32 = 3;

/// Class of a window and of the feature vector derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Seizure,
    NonSeizure,
}

/// A labelled `[start_sec, end_sec)` interval of one recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub file_id: String,
    pub start_sec: f64,
    pub end_sec: f64,
    pub label: Label,
}

impl Window {
    fn new(file_id: &str, start_sec: u32, label: Label) -> Self {
        Self {
            file_id: file_id.to_string(),
            start_sec: start_sec as f64,
            end_sec: start_sec as f64 + WINDOW_SECS as f64,
            label,
        }
    }

    #[inline]
    pub fn len_secs(&self) -> f64 {
        self.end_sec - self.start_sec
    }
}

/// Window around one seizure: `[t0 - 30, t0 - 30 + 150)`.
///
/// Infeasible when the onset is closer than 30 s to the file head or the
/// recording (`duration_secs`) ends before the window does.
pub fn seizure_window(file_id: &str, event: &SeizureEvent, duration_secs: u32) -> Result<Window, Skip> {
    let onset = event.start_sec;
    let start = onset.checked_sub(PRE_ONSET_SECS).ok_or_else(|| {
        Skip::infeasible(file_id, format!("onset {onset}s leaves no {PRE_ONSET_SECS}s pre-ictal context"))
    })?;
    let end = start.checked_add(WINDOW_SECS).ok_or_else(|| {
        Skip::infeasible(file_id, format!("onset {onset}s puts the window end past {}s", u32::MAX))
    })?;
    if duration_secs < end {
        return Err(Skip::infeasible(
            file_id,
            format!("recording is {duration_secs}s, seizure window needs {end}s"),
        ));
    }
    Ok(Window::new(file_id, start, Label::Seizure))
}

/// Length of one third, or `None` if the recording cannot be split.
pub fn third_length(duration_secs: u32) -> Option<u32> {
    let third = duration_secs.checked_sub(1)? / THIRDS;
    (THIRDS * third < duration_secs).then_some(third)
}

/// Half-open start range for third `k`.
pub fn third_bounds(third: u32, k: u32) -> (u32, u32) {
    let lo = if k == 0 { HEAD_OFFSET_SECS } else { k * third };
    let hi = ((k + 1) * third).saturating_sub(TAIL_MARGIN_SECS);
    (lo, hi)
}

/// Draw up to three non-seizure windows, one per third.
///
/// Returns one outcome per third (or a single rejection when the recording
/// cannot be partitioned), in third order.
pub fn non_seizure_windows<R: Rng>(
    file_id: &str,
    duration_secs: u32,
    rng: &mut R,
) -> Vec<Result<Window, Skip>> {
    let Some(third) = third_length(duration_secs) else {
        return vec![Err(Skip::infeasible(
            file_id,
            format!("recording of {duration_secs}s cannot be split into thirds"),
        ))];
    };

    (0..THIRDS)
        .map(|k| {
            let (lo, hi) = third_bounds(third, k);
            if hi <= lo {
                return Err(Skip::infeasible(
                    file_id,
                    format!("third {k} of {duration_secs}s recording has empty start range [{lo}, {hi})"),
                ));
            }
            let start = rng.random_range(lo..hi);
            Ok(Window::new(file_id, start, Label::NonSeizure))
        })
        .collect()
}
