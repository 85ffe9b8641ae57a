// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Per-mode time series consumed when building a [`crate::Scri`].

use num_complex::Complex64;
use st_sphere::{mode_index, n_modes, ELL_MAX_LIMIT};

use crate::error::{size_mismatch, value, BmsResult};

/// Time-domain waveform decomposed into `(ℓ, m)` modes.
pub trait ModeTimeSeries {
    fn times(&self) -> &[f64];

    fn n_times(&self) -> usize {
        self.times().len()
    }

    fn ell_max(&self) -> usize;

    /// Storage index of mode `(ell, m)`, if present.
    fn find_mode_index(&self, ell: usize, m: i32) -> Option<usize>;

    /// Value of mode `mode` at time index `i_t`.
    fn data(&self, mode: usize, i_t: usize) -> Complex64;

    /// Time derivative of mode `mode` at every sample.
    fn data_dot(&self, mode: usize) -> Vec<Complex64>;
}

/// In-memory waveform holding every mode `0 ≤ ℓ ≤ ℓMax` in `(ℓ, m)` order.
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    t: Vec<f64>,
    ell_max: usize,
    modes: Vec<Vec<Complex64>>,
}

impl Waveform {
    /// `modes[mode_index(ℓ, m)][i_t]` holds the data; times must increase.
    pub fn new(t: Vec<f64>, ell_max: usize, modes: Vec<Vec<Complex64>>) -> BmsResult<Self> {
        if ell_max > ELL_MAX_LIMIT {
            return Err(size_mismatch(format!(
                "ellMax={ell_max} exceeds the limit {ELL_MAX_LIMIT}"
            )));
        }
        if modes.len() != n_modes(ell_max) {
            return Err(size_mismatch(format!(
                "ellMax={ell_max} needs {} modes, got {}",
                n_modes(ell_max),
                modes.len()
            )));
        }
        if let Some(bad) = modes.iter().position(|series| series.len() != t.len()) {
            return Err(size_mismatch(format!(
                "mode {bad} has {} samples, expected {}",
                modes[bad].len(),
                t.len()
            )));
        }
        if t.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(value("waveform times must be strictly increasing"));
        }
        Ok(Self { t, ell_max, modes })
    }

    /// Builds a waveform by sampling `f(ℓ, m, t)`.
    pub fn from_fn(
        t: Vec<f64>,
        ell_max: usize,
        f: impl Fn(usize, i32, f64) -> Complex64,
    ) -> BmsResult<Self> {
        let mut modes = Vec::with_capacity(n_modes(ell_max));
        for ell in 0..=ell_max {
            let l = ell as i32;
            for m in -l..=l {
                modes.push(t.iter().map(|&ti| f(ell, m, ti)).collect());
            }
        }
        Self::new(t, ell_max, modes)
    }

    pub fn mode(&self, ell: usize, m: i32) -> Option<&[Complex64]> {
        self.find_mode_index(ell, m).map(|i| self.modes[i].as_slice())
    }
}

impl ModeTimeSeries for Waveform {
    fn times(&self) -> &[f64] {
        &self.t
    }

    fn ell_max(&self) -> usize {
        self.ell_max
    }

    fn find_mode_index(&self, ell: usize, m: i32) -> Option<usize> {
        (ell <= self.ell_max && m.unsigned_abs() as usize <= ell).then(|| mode_index(ell, m))
    }

    fn data(&self, mode: usize, i_t: usize) -> Complex64 {
        self.modes[mode][i_t]
    }

    fn data_dot(&self, mode: usize) -> Vec<Complex64> {
        derivative(&self.t, &self.modes[mode])
    }
}

/// Second-order finite-difference derivative on an irregular grid.
///
/// Interior points use the centred three-point stencil, the ends one-sided
/// three-point stencils. Two samples give their slope, one sample zero.
pub fn derivative(t: &[f64], f: &[Complex64]) -> Vec<Complex64> {
    let n = t.len().min(f.len());
    match n {
        0 => Vec::new(),
        1 => vec![Complex64::new(0.0, 0.0)],
        2 => {
            let slope = (f[1] - f[0]) / (t[1] - t[0]);
            vec![slope, slope]
        }
        _ => {
            let mut out = Vec::with_capacity(n);
            let (h1, h2) = (t[1] - t[0], t[2] - t[1]);
            out.push(
                f[0] * (-(2.0 * h1 + h2) / (h1 * (h1 + h2)))
                    + f[1] * ((h1 + h2) / (h1 * h2))
                    - f[2] * (h1 / (h2 * (h1 + h2))),
            );
            for i in 1..n - 1 {
                let (h1, h2) = (t[i] - t[i - 1], t[i + 1] - t[i]);
                out.push(
                    -f[i - 1] * (h2 / (h1 * (h1 + h2)))
                        + f[i] * ((h2 - h1) / (h1 * h2))
                        + f[i + 1] * (h1 / (h2 * (h1 + h2))),
                );
            }
            let (h1, h2) = (t[n - 2] - t[n - 3], t[n - 1] - t[n - 2]);
            out.push(
                f[n - 3] * (h2 / (h1 * (h1 + h2))) - f[n - 2] * ((h1 + h2) / (h1 * h2))
                    + f[n - 1] * ((h1 + 2.0 * h2) / (h2 * (h1 + h2))),
            );
            out
        }
    }
}
