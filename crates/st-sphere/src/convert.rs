// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Conversions between [`Modes`] and [`DataGrid`].

use rayon::prelude::*;
use tracing::trace;

use crate::error::SphereResult;
use crate::grid::{boosted_grid_rotors, DataGrid};
use crate::modes::Modes;
use crate::rotor::ThreeVector;
use crate::spectral::{analyze, check_engine_ell, evaluate, synthesize};

/// Smallest grid that resolves `ell_max` without aliasing.
#[inline]
pub fn nyquist_size(ell_max: usize) -> usize {
    2 * ell_max + 1
}

/// Spectral synthesis on an equiangular grid of at least `2ℓMax+1` points
/// in each direction.
pub fn modes_to_grid(modes: &Modes, n_theta: usize, n_phi: usize) -> SphereResult<DataGrid> {
    let ell_max = modes.ell_max();
    check_engine_ell(ell_max)?;
    let n_theta = n_theta.max(nyquist_size(ell_max));
    let n_phi = n_phi.max(nyquist_size(ell_max));
    trace!(spin = modes.spin(), ell_max, n_theta, n_phi, "synthesising grid");
    let data = synthesize(modes.values(), modes.spin(), ell_max, n_theta, n_phi)?;
    DataGrid::new(modes.spin(), n_theta, n_phi, data)
}

/// Samples the field seen by an observer boosted with velocity `v`.
///
/// Each point evaluates the unboosted modes directly at the composite rotor
/// `Boost(-v, R ẑ R̄) · R`, so no intermediate grid is resampled.
pub fn modes_to_boosted_grid(
    modes: &Modes,
    v: &ThreeVector,
    n_theta: usize,
    n_phi: usize,
) -> SphereResult<DataGrid> {
    let ell_max = modes.ell_max();
    check_engine_ell(ell_max)?;
    let n_theta = n_theta.max(nyquist_size(ell_max));
    let n_phi = n_phi.max(nyquist_size(ell_max));
    trace!(spin = modes.spin(), ell_max, n_theta, n_phi, ?v, "synthesising boosted grid");
    let data = boosted_grid_rotors(v, n_theta, n_phi)?
        .par_iter()
        .map(|r| evaluate(modes.values(), modes.spin(), ell_max, r))
        .collect();
    DataGrid::new(modes.spin(), n_theta, n_phi, data)
}

/// Spectral analysis at ellMax `max(min_ell, ⌊(n_θ-1)/2⌋, ⌊(n_φ-1)/2⌋)`.
pub fn grid_to_modes(grid: &DataGrid, min_ell: usize) -> SphereResult<Modes> {
    let ell_max = min_ell
        .max(grid.n_theta().saturating_sub(1) / 2)
        .max(grid.n_phi().saturating_sub(1) / 2);
    trace!(
        spin = grid.spin(),
        ell_max,
        n_theta = grid.n_theta(),
        n_phi = grid.n_phi(),
        "analysing grid"
    );
    let data = analyze(grid.values(), grid.spin(), grid.n_theta(), grid.n_phi(), ell_max)?;
    Ok(Modes::from_parts(grid.spin(), ell_max, data))
}
