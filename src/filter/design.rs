//! Windowed-sinc FIR design matching MNE's `fir_design='firwin'`.
//!
//! With explicit transition bandwidths `l_trans` / `h_trans`:
//!   • filter length N = ceil(3.3 / min(l_trans, h_trans) * sfreq), rounded to odd
//!   • band-pass  = lowpass(h_freq + h_trans/2) − lowpass(l_freq − l_trans/2)
//!   • band-stop  = δ − [lowpass(h_freq + trans/2) − lowpass(l_freq − trans/2)]
//!
//! `l_freq <= 0` degenerates to a plain low-pass (the Delta band).
use std::f64::consts::PI;

use anyhow::{ensure, Result};

/// Number of FIR taps for a given transition bandwidth.
/// Returns an odd integer (required for zero-phase linear-phase FIR).
///
/// Formula: `ceil(3.3 / trans_bw * sfreq)` rounded up to odd.
pub fn auto_filter_length(trans_bw: f32, sfreq: f32) -> usize {
    let n_raw = (3.3 / trans_bw * sfreq).ceil() as usize;
    if n_raw % 2 == 0 { n_raw + 1 } else { n_raw }
}

/// Band-pass FIR between `l_freq` and `h_freq` (Hz).
///
/// Cutoffs (−6 dB) sit in the middle of each transition band.
pub fn design_bandpass(l_freq: f32, h_freq: f32, l_trans: f32, h_trans: f32, sfreq: f32) -> Result<Vec<f32>> {
    let nyq = sfreq / 2.0;
    ensure!(h_freq > l_freq, "band-pass needs h_freq > l_freq, got {l_freq}..{h_freq} Hz");
    ensure!(h_freq + h_trans / 2.0 < nyq, "h_freq {h_freq} Hz too close to Nyquist ({nyq} Hz)");
    ensure!(l_trans > 0.0 && h_trans > 0.0, "transition bandwidths must be positive");

    let n = auto_filter_length(l_trans.min(h_trans), sfreq);
    let mut h = firwin(n, h_freq + h_trans / 2.0, sfreq, true);

    if l_freq > 0.0 {
        let lo_cut = (l_freq - l_trans / 2.0).max(0.0);
        if lo_cut > 0.0 {
            let lp_low = firwin(n, lo_cut, sfreq, true);
            h.iter_mut().zip(lp_low.iter()).for_each(|(a, &b)| *a -= b);
        }
    }

    Ok(h.iter().map(|&v| v as f32).collect())
}

/// Band-stop FIR removing `l_freq..h_freq` (Hz), e.g. mains interference.
///
/// The transitions lie outside the stop band, so everything between the two
/// edges is fully attenuated.
pub fn design_bandstop(l_freq: f32, h_freq: f32, trans: f32, sfreq: f32) -> Result<Vec<f32>> {
    ensure!(h_freq > l_freq, "band-stop needs h_freq > l_freq, got {l_freq}..{h_freq} Hz");
    ensure!(trans > 0.0, "transition bandwidth must be positive");
    let lo_cut = l_freq - trans / 2.0;
    let hi_cut = h_freq + trans / 2.0;
    ensure!(lo_cut > 0.0 && hi_cut < sfreq / 2.0, "stop band {l_freq}..{h_freq} Hz outside (0, Nyquist)");

    let n = auto_filter_length(trans, sfreq);
    let hi = firwin(n, hi_cut, sfreq, true);
    let lo = firwin(n, lo_cut, sfreq, true);

    // δ − (hi − lo)
    let mut h: Vec<f64> = hi.iter().zip(lo.iter()).map(|(&a, &b)| b - a).collect();
    h[n / 2] += 1.0;
    Ok(h.iter().map(|&v| v as f32).collect())
}

/// Lowpass (or, with `pass_zero = false`, highpass) Hamming-windowed sinc.
///
/// `cutoff_hz` is the -6 dB point; the result has unit DC gain before any
/// spectral inversion.
pub fn firwin(n: usize, cutoff_hz: f32, sfreq: f32, pass_zero: bool) -> Vec<f64> {
    assert!(n % 2 == 1, "firwin requires odd N for linear-phase filter");
    let alpha = (n - 1) as f64 / 2.0;
    let fc = cutoff_hz as f64 / (sfreq as f64 / 2.0);

    let win = hamming(n);
    let mut h: Vec<f64> = (0..n)
        .map(|i| {
            let x = i as f64 - alpha;
            let sinc = if x == 0.0 { fc } else { (PI * fc * x).sin() / (PI * x) };
            sinc * win[i]
        })
        .collect();

    let s: f64 = h.iter().sum();
    h.iter_mut().for_each(|v| *v /= s);

    if !pass_zero {
        h.iter_mut().for_each(|v| *v = -*v);
        h[n / 2] += 1.0;
    }
    h
}

/// Hamming window of length `n`.
pub fn hamming(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}
