//! The seam between the dataset builder and wherever recordings live.
use anyhow::Result;

use crate::band::Segment;
use crate::error::Skip;
use crate::index::{SubjectId, SubjectIndex};
use crate::window::Window;

/// Source of annotation indices and band-filtered segments.
///
/// Implementations must be shareable across the rayon pool.  A failing
/// [`load_segment`](Self::load_segment) only skips that window; a failing
/// [`load_index`](Self::load_index) only drops that subject.
pub trait SegmentBackend: Sync {
    /// Parsed annotations plus recording durations for one subject.
    fn load_index(&self, subject: SubjectId) -> Result<SubjectIndex>;

    /// Notch- and band-filtered data for `window`, one array per band.
    ///
    /// The auxiliary/stimulus channels are never included.
    fn load_segment(&self, subject: SubjectId, window: &Window) -> Result<Segment, Skip>;
}

impl<B: SegmentBackend + ?Sized> SegmentBackend for &B {
    fn load_index(&self, subject: SubjectId) -> Result<SubjectIndex> {
        (**self).load_index(subject)
    }

    fn load_segment(&self, subject: SubjectId, window: &Window) -> Result<Segment, Skip> {
        (**self).load_segment(subject, window)
    }
}
