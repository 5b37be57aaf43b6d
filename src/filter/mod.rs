//! FIR filter design and application.
//!
//! - [`design`]: Hamming-windowed sinc band-pass / band-stop design, matching
//!   `mne.filter.create_filter(fir_window='hamming', phase='zero')` with
//!   explicit transition bandwidths.
//! - [`apply`]: Overlap-add zero-phase convolution, matching MNE's
//!   `_overlap_add_filter` / `_1d_overlap_filter`.

pub mod apply;
pub mod design;

pub use apply::{apply_fir_zero_phase, FirKernel};
pub use design::{auto_filter_length, design_bandpass, design_bandstop, firwin, hamming};
