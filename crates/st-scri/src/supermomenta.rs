// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Supermomentum time series and the Moreschi iteration towards the
//! nice-section frame.

use num_complex::Complex64;
use rayon::prelude::*;
use spiral_config::{settings, BmsSettings};
use st_sphere::{
    grid_to_modes, mode_index, modes_to_boosted_grid, modes_to_grid, nyquist_size,
    v_from_one_over_k, DataGrid, Modes,
};
use tracing::debug;

use crate::error::{size_mismatch, value, BmsResult};
use crate::momentum::{four_momentum_from_supermomentum, mass_from_four_momentum};
use crate::retarded::{check_time_range, interpolate_grids, retarded_times, retarded_window};
use crate::scri::Scri;

#[derive(Clone, Debug, PartialEq)]
pub struct SuperMomenta {
    t: Vec<f64>,
    psi: Vec<Modes>,
}

impl SuperMomenta {
    pub fn new(t: Vec<f64>, psi: Vec<Modes>) -> BmsResult<Self> {
        if t.len() != psi.len() {
            return Err(size_mismatch(format!(
                "{} time samples for {} supermomenta",
                t.len(),
                psi.len()
            )));
        }
        if t.is_empty() {
            return Err(size_mismatch("supermomenta need at least one sample"));
        }
        if t.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(value("supermomentum times must be strictly increasing"));
        }
        Ok(Self { t, psi })
    }

    /// Supermomentum of every slice of `scri`.
    pub fn from_scri(scri: &Scri) -> BmsResult<Self> {
        let psi = scri
            .slices()
            .par_iter()
            .map(|slice| slice.super_momentum())
            .collect::<BmsResult<Vec<_>>>()?;
        Self::new(scri.t().to_vec(), psi)
    }

    pub fn t(&self) -> &[f64] {
        &self.t
    }

    pub fn psi(&self) -> &[Modes] {
        &self.psi
    }

    pub fn n_times(&self) -> usize {
        self.t.len()
    }

    fn ell_max(&self) -> usize {
        self.psi.iter().map(Modes::ell_max).max().unwrap_or(0)
    }

    /// Supermomentum on the `u' = 0` cut of the frame with conformal factor
    /// `1/K = one_over_k` and supertranslation `delta`.
    ///
    /// The result keeps every mode of the working resolution, including the
    /// higher `ℓ` generated by the boost and the `K³` factor.
    pub fn bms_transform(&self, one_over_k: &Modes, delta: &Modes) -> BmsResult<Modes> {
        self.bms_transform_with_settings(one_over_k, delta, settings())
    }

    pub fn bms_transform_with_settings(
        &self,
        one_over_k: &Modes,
        delta: &Modes,
        settings: &BmsSettings,
    ) -> BmsResult<Modes> {
        let ell_max = self.ell_max();
        let v = v_from_one_over_k(one_over_k);
        let k_cubed = one_over_k.pow(3)?;
        let d4_delta = delta.edth2edthbar2();

        // Every corrected slice shares one ellMax, so one grid size serves all.
        let corrected_ell = ell_max.max(delta.ell_max()) + k_cubed.ell_max();
        let n = nyquist_size(corrected_ell);
        let u = retarded_times(0.0, delta, n)?;
        let (u_min, u_max) = check_time_range(&self.t, &u)?;
        let window = retarded_window(&self.t, u_min, u_max, settings);
        debug!(?v, n, ?window, "BMS transformation of supermomenta");

        let times = &self.t[window.clone()];
        let grids = self.psi[window]
            .iter()
            .map(|psi| -> BmsResult<DataGrid> {
                let corrected = psi.sub(&d4_delta)?.mul(&k_cubed)?;
                Ok(modes_to_boosted_grid(&corrected, &v, n, n)?)
            })
            .collect::<BmsResult<Vec<DataGrid>>>()?;
        let samples: Vec<&DataGrid> = grids.iter().collect();
        let grid = interpolate_grids(times, &samples, &u, settings.parallel)?;
        Ok(grid_to_modes(&grid, corrected_ell)?)
    }

    /// One Moreschi fixed-point step, updating `one_over_k` (`ℓ ≤ 1`) and
    /// `delta` (`ℓ ≥ 2`) in place. On error both are left unchanged.
    pub fn moreschi_iteration(&self, one_over_k: &mut Modes, delta: &mut Modes) -> BmsResult<()> {
        self.moreschi_iteration_with_settings(one_over_k, delta, settings())
    }

    pub fn moreschi_iteration_with_settings(
        &self,
        one_over_k: &mut Modes,
        delta: &mut Modes,
        settings: &BmsSettings,
    ) -> BmsResult<()> {
        let k = one_over_k.padded(1);
        let psi_i = self.bms_transform_with_settings(&k, delta, settings)?;
        let p = four_momentum_from_supermomentum(&psi_i);
        let mass = mass_from_four_momentum(&p);
        if !(mass.is_finite() && mass > 0.0) {
            return Err(value(format!(
                "Bondi mass {mass} of four-momentum {p:?} is not positive"
            )));
        }
        debug!(mass, ?p, "Moreschi step");

        let g = settings.moreschi_grid;
        let mass_over_k_cubed = modes_to_grid(&k, g, g)?
            .pow(3)
            .divide_into(Complex64::new(mass, 0.0));
        let delta_deriv = psi_i.add(&grid_to_modes(&mass_over_k_cubed, 0)?)?;

        let mut new_delta = delta.values().to_vec();
        for ell in 2..=delta.ell_max() {
            let factor = 4.0 / ((ell - 1) * ell * (ell + 1) * (ell + 2)) as f64;
            let l = ell as i32;
            for m in -l..=l {
                new_delta[mode_index(ell, m)] =
                    delta_deriv.get(ell, m).unwrap_or(Complex64::new(0.0, 0.0)) * factor;
            }
        }

        let mut new_k = k.values().to_vec();
        new_k[0] = psi_i[0] / mass;
        for i in 1..4 {
            new_k[i] = -psi_i.get(1, i as i32 - 2).unwrap_or(Complex64::new(0.0, 0.0)) / (3.0 * mass);
        }

        let new_delta = Modes::new(delta.spin(), new_delta)?;
        let new_k = Modes::new(k.spin(), new_k)?;
        *delta = new_delta;
        *one_over_k = new_k;
        Ok(())
    }
}
