// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::ops::Index;

use num_complex::Complex64;
use spiral_config::{settings, BmsSettings};
use st_sphere::{grid_to_modes, n_modes, nyquist_size, DataGrid, Modes, ThreeVector};
use tracing::{debug, trace};

use crate::error::{size_mismatch, value, BmsError, BmsResult};
use crate::retarded::{check_time_range, interpolate_grids, retarded_times, retarded_window};
use crate::slice::{FieldKind, SliceGrid, SliceModes, SliceOfScri};
use crate::waveform::ModeTimeSeries;

/// Radiative data on a sequence of retarded-time slices.
#[derive(Clone, Debug, PartialEq)]
pub struct Scri {
    t: Vec<f64>,
    slices: Vec<SliceModes>,
    ell_max: usize,
}

impl Scri {
    /// Pairs every time with its slice. Times must increase strictly and all
    /// slices must share one ellMax and the canonical spins.
    pub fn new(t: Vec<f64>, slices: Vec<SliceModes>) -> BmsResult<Self> {
        if t.len() != slices.len() {
            return Err(size_mismatch(format!(
                "{} time samples for {} slices",
                t.len(),
                slices.len()
            )));
        }
        let Some(first) = slices.first() else {
            return Err(size_mismatch("a scri needs at least one slice"));
        };
        if t.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(value("slice times must be strictly increasing"));
        }
        let ell_max = first.ell_max();
        for (i, slice) in slices.iter().enumerate() {
            slice.validate()?;
            if slice.ell_max() != ell_max {
                return Err(size_mismatch(format!(
                    "slice {i} has ellMax={}, slice 0 has ellMax={ell_max}",
                    slice.ell_max()
                )));
            }
        }
        Ok(Self { t, slices, ell_max })
    }

    /// Ingests the mode time series of `ψ0..ψ4` and `σ`; `σ̇` is the time
    /// derivative of `σ`. Times are taken from `psi0`.
    pub fn from_waveforms<W>(
        psi0: &W,
        psi1: &W,
        psi2: &W,
        psi3: &W,
        psi4: &W,
        sigma: &W,
    ) -> BmsResult<Self>
    where
        W: ModeTimeSeries + ?Sized,
    {
        let inputs = [psi0, psi1, psi2, psi3, psi4, sigma];
        let n_times = psi0.n_times();
        let ell_max = psi0.ell_max();
        for (kind, w) in FieldKind::ALL.iter().zip(inputs.iter()) {
            if w.n_times() != n_times {
                return Err(size_mismatch(format!(
                    "{} has {} time samples, psi0 has {n_times}",
                    kind.name(),
                    w.n_times()
                )));
            }
            if w.ell_max() != ell_max {
                return Err(size_mismatch(format!(
                    "{} has ellMax={}, psi0 has ellMax={ell_max}",
                    kind.name(),
                    w.ell_max()
                )));
            }
        }

        // index of each (ℓ, m) in every input, in lexicographic order
        let lookup = |w: &W| -> BmsResult<Vec<usize>> {
            let mut indices = Vec::with_capacity(n_modes(ell_max));
            for ell in 0..=ell_max {
                let l = ell as i32;
                for m in -l..=l {
                    indices.push(w.find_mode_index(ell, m).ok_or(BmsError::MissingMode { ell, m })?);
                }
            }
            Ok(indices)
        };
        let indices = inputs
            .iter()
            .map(|w| lookup(*w))
            .collect::<BmsResult<Vec<_>>>()?;
        let sigma_dot: Vec<Vec<Complex64>> =
            indices[5].iter().map(|&mode| sigma.data_dot(mode)).collect();

        let mut slices = Vec::with_capacity(n_times);
        for i_t in 0..n_times {
            let take = |k: usize| -> Vec<Complex64> {
                indices[k].iter().map(|&mode| inputs[k].data(mode, i_t)).collect()
            };
            let slice = SliceModes::try_from_fn(|kind| match kind {
                FieldKind::Psi0 => Modes::new(kind.spin(), take(0)),
                FieldKind::Psi1 => Modes::new(kind.spin(), take(1)),
                FieldKind::Psi2 => Modes::new(kind.spin(), take(2)),
                FieldKind::Psi3 => Modes::new(kind.spin(), take(3)),
                FieldKind::Psi4 => Modes::new(kind.spin(), take(4)),
                FieldKind::Sigma => Modes::new(kind.spin(), take(5)),
                FieldKind::SigmaDot => {
                    Modes::new(kind.spin(), sigma_dot.iter().map(|series| series[i_t]).collect())
                }
            })?;
            slices.push(slice);
        }
        debug!(n_times, ell_max, "built scri from waveforms");
        Self::new(psi0.times().to_vec(), slices)
    }

    pub fn t(&self) -> &[f64] {
        &self.t
    }

    pub fn n_times(&self) -> usize {
        self.t.len()
    }

    pub fn ell_max(&self) -> usize {
        self.ell_max
    }

    pub fn slices(&self) -> &[SliceModes] {
        &self.slices
    }

    /// BMS transformation to the slice `u' = 0` of the frame reached by the
    /// boost `v` and supertranslation `delta`, sampled at `u0`.
    pub fn bms_transformation(
        &self,
        u0: f64,
        v: &ThreeVector,
        delta: &Modes,
    ) -> BmsResult<SliceModes> {
        self.bms_transformation_with_settings(u0, v, delta, settings())
    }

    pub fn bms_transformation_with_settings(
        &self,
        u0: f64,
        v: &ThreeVector,
        delta: &Modes,
        settings: &BmsSettings,
    ) -> BmsResult<SliceModes> {
        let n = nyquist_size(self.ell_max.max(delta.ell_max()));
        let u = retarded_times(u0, delta, n)?;
        let (u_min, u_max) = check_time_range(&self.t, &u)?;
        let window = retarded_window(&self.t, u_min, u_max, settings);
        debug!(u0, ?v, n, ?window, "BMS transformation of scri");

        let times = &self.t[window.clone()];
        let transformed = self.slices[window.clone()]
            .iter()
            .zip(times.iter())
            .map(|(slice, &ti)| {
                trace!(t = ti, "boosting slice");
                slice.bms_transformation_on_slice_at(ti, v, delta, n)
            })
            .collect::<BmsResult<Vec<SliceGrid>>>()?;

        SliceOfScri::try_from_fn(|kind| -> BmsResult<Modes> {
            let samples: Vec<&DataGrid> = transformed.iter().map(|s| s.field(kind)).collect();
            let grid = interpolate_grids(times, &samples, &u, settings.parallel)?;
            Ok(grid_to_modes(&grid, self.ell_max)?.truncated(self.ell_max))
        })
    }
}

impl Index<usize> for Scri {
    type Output = SliceModes;

    fn index(&self, index: usize) -> &Self::Output {
        &self.slices[index]
    }
}
