//! Overlap-add zero-phase FIR convolution.
//!
//! Matches MNE's `_overlap_add_filter` + `_1d_overlap_filter`.
//!
//! Zero-phase is achieved by shifting the output left by `(N-1)/2` samples,
//! NOT by running filtfilt. The edge transient is suppressed by
//! reflect-limited padding of `N-1` samples on each side.
//!
//! A [`FirKernel`] is planned once for a given signal length and then reused
//! for every channel of every window of that length.
use std::sync::Arc;

use anyhow::{ensure, Result};
use ndarray::{Array2, ArrayView1};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// FIR taps together with their FFT and the forward/inverse plans.
pub struct FirKernel {
    n_taps: usize,
    n_fft: usize,
    h_fft: Vec<Complex<f32>>,
    fwd: Arc<dyn Fft<f32>>,
    inv: Arc<dyn Fft<f32>>,
}

impl FirKernel {
    /// Plan `h` (odd length) for signals of `n_samples` samples.
    pub fn new(h: &[f32], n_samples: usize) -> Result<Self> {
        ensure!(h.len() % 2 == 1, "FIR kernel must have odd length, got {}", h.len());
        let n_ext = n_samples + 2 * (h.len() - 1);
        let n_fft = choose_fft_len(h.len(), n_ext);

        let mut planner: FftPlanner<f32> = FftPlanner::new();
        let fwd = planner.plan_fft_forward(n_fft);
        let inv = planner.plan_fft_inverse(n_fft);

        let mut h_fft = zero_padded(h, n_fft);
        fwd.process(&mut h_fft);

        Ok(Self { n_taps: h.len(), n_fft, h_fft, fwd, inv })
    }

    /// Filter every row of `data` ([C, T]) in place.
    pub fn apply_rows(&self, data: &mut Array2<f32>) {
        for mut row in data.rows_mut() {
            let filtered = self.filter(&row.to_vec());
            row.assign(&ArrayView1::from(&filtered));
        }
    }

    /// Filter one signal; the output has the input's length.
    pub fn filter(&self, x: &[f32]) -> Vec<f32> {
        let n_x = x.len();
        if n_x == 0 {
            return vec![];
        }
        let shift = (self.n_taps - 1) / 2;
        let n_edge = self.n_taps - 1;

        let x_ext = reflect_limited_pad(x, n_edge, n_edge);
        let n_ext = x_ext.len();

        let n_seg = self.n_fft - self.n_taps + 1;
        let inv_scale = 1.0 / self.n_fft as f32;
        let mut y = vec![0.0_f32; n_ext];

        for start in (0..n_ext).step_by(n_seg) {
            let stop = (start + n_seg).min(n_ext);
            let mut buf = zero_padded(&x_ext[start..stop], self.n_fft);

            self.fwd.process(&mut buf);
            buf.iter_mut().zip(self.h_fft.iter()).for_each(|(b, &hf)| *b *= hf);
            self.inv.process(&mut buf);

            let out_start = start.saturating_sub(shift);
            let out_end = (out_start + self.n_fft).min(n_ext);
            let prod_start = shift.saturating_sub(start);

            for (o, p) in (out_start..out_end).zip(prod_start..self.n_fft) {
                y[o] += buf[p].re * inv_scale;
            }
        }

        y[n_edge..n_edge + n_x].to_vec()
    }
}

/// One-shot convenience: design-time kernel applied to every row of `data`.
pub fn apply_fir_zero_phase(data: &mut Array2<f32>, h: &[f32]) -> Result<()> {
    FirKernel::new(h, data.ncols())?.apply_rows(data);
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn zero_padded(x: &[f32], n: usize) -> Vec<Complex<f32>> {
    x.iter()
        .map(|&v| Complex { re: v, im: 0.0 })
        .chain(std::iter::repeat(Complex::default()))
        .take(n)
        .collect()
}

/// Reflect-limited padding (matches MNE's `_smart_pad`).
///
/// Left:  `pad[i] = 2*x[0] - x[n_l-i]`  for i in 1..=n_l
/// Right: `pad[i] = 2*x[-1] - x[-(i+1)]` for i in 1..=n_r
/// Requested padding beyond the signal length is zero-filled.
fn reflect_limited_pad(x: &[f32], n_l: usize, n_r: usize) -> Vec<f32> {
    let n = x.len();
    let actual_l = n_l.min(n - 1);
    let actual_r = n_r.min(n - 1);
    let (first, last) = (x[0], x[n - 1]);

    let mut out = Vec::with_capacity(n_l + n + n_r);
    out.resize(n_l - actual_l, 0.0);
    out.extend((1..=actual_l).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=actual_r).map(|i| 2.0 * last - x[n - 1 - i]));
    out.resize(n_l + n + n_r, 0.0);
    out
}

/// Power-of-two block size minimising MNE's overlap-add cost:
///   `cost = ceil(n_x / (N - n_h + 1)) * N * (log2(N) + 1) + 4e-5 * N * n_x`
fn choose_fft_len(n_h: usize, n_x: usize) -> usize {
    let min_fft = 2 * n_h - 1;
    let max_pow = (n_x as f64).log2().ceil() as u32 + 1;
    let min_pow = (min_fft as f64).log2().ceil() as u32;

    (min_pow..=max_pow)
        .map(|pow| {
            let n = 1_usize << pow;
            let n_seg = (n - n_h + 1) as f64;
            let cost = (n_x as f64 / n_seg).ceil() * n as f64 * (pow as f64 + 1.0)
                + 4e-5 * n as f64 * n_x as f64;
            (n, cost)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(n, _)| n)
        .unwrap_or(1_usize << max_pow)
}
