// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Conformal factor `K = 1/(γ(1 - v·n̂))` of the sphere at infinity under a
//! boost, and the inverse relation recovering `v` from the `ℓ ≤ 1` part of
//! `1/K`.

use num_complex::Complex64;

use crate::error::{value, SphereResult};
use crate::grid::{DataGrid, ScriFunctor};
use crate::modes::Modes;
use crate::rotor::{rotate_z_hat, Rotor, ThreeVector};
use crate::spectral::{grid_rotors, mode_index};

fn lorentz_factor(v: &ThreeVector) -> SphereResult<f64> {
    let speed_sq = v.norm_squared();
    if !(speed_sq < 1.0) {
        return Err(value(format!(
            "boost speed |v|={} must be below 1",
            speed_sq.sqrt()
        )));
    }
    Ok(1.0 / (1.0 - speed_sq).sqrt())
}

/// `1/K` as a function of the rotor, `γ(1 - v·R ẑ R̄)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverseConformalFactor {
    v: ThreeVector,
    gamma: f64,
}

impl InverseConformalFactor {
    pub fn new(v: ThreeVector) -> SphereResult<Self> {
        let gamma = lorentz_factor(&v)?;
        Ok(Self { v, gamma })
    }
}

impl ScriFunctor for InverseConformalFactor {
    fn evaluate(&self, r: &Rotor) -> Complex64 {
        Complex64::new(self.gamma * (1.0 - self.v.dot(&rotate_z_hat(r))), 0.0)
    }
}

fn sample_directions(
    n_theta: usize,
    n_phi: usize,
    f: impl Fn(&ThreeVector) -> f64,
) -> SphereResult<DataGrid> {
    let data = grid_rotors(n_theta, n_phi)
        .iter()
        .map(|r| Complex64::new(f(&rotate_z_hat(r)), 0.0))
        .collect();
    DataGrid::new(0, n_theta, n_phi, data)
}

/// `K(θ, φ) = 1/(γ(1 - v·n̂))` sampled on the unboosted grid.
pub fn conformal_factor_grid(v: &ThreeVector, n_theta: usize, n_phi: usize) -> SphereResult<DataGrid> {
    let gamma = lorentz_factor(v)?;
    sample_directions(n_theta, n_phi, |n| 1.0 / (gamma * (1.0 - v.dot(n))))
}

/// `1/K(θ, φ) = γ(1 - v·n̂)` sampled on the unboosted grid.
pub fn inverse_conformal_factor_grid(
    v: &ThreeVector,
    n_theta: usize,
    n_phi: usize,
) -> SphereResult<DataGrid> {
    let gamma = lorentz_factor(v)?;
    sample_directions(n_theta, n_phi, |n| gamma * (1.0 - v.dot(n)))
}

/// `1/K` evaluated through the boosted point loop, i.e. in the boosted frame.
pub fn inverse_conformal_factor_boosted_grid(
    v: &ThreeVector,
    n_theta: usize,
    n_phi: usize,
) -> SphereResult<DataGrid> {
    let functor = InverseConformalFactor::new(*v)?;
    DataGrid::from_functor(0, &functor, v, n_theta, n_phi)
}

/// Boost velocity encoded in the `ℓ ≤ 1` modes of `1/K`.
///
/// Missing dipole modes count as zero.
pub fn v_from_one_over_k(one_over_k: &Modes) -> ThreeVector {
    let coeff = |m: i32| -> Complex64 {
        if one_over_k.ell_max() >= 1 {
            one_over_k[mode_index(1, m)]
        } else {
            Complex64::new(0.0, 0.0)
        }
    };
    let k0 = one_over_k[0];
    let (k1, k2, k3) = (coeff(-1), coeff(0), coeff(1));
    let i = Complex64::new(0.0, 1.0);
    let s32 = 1.5f64.sqrt();
    ThreeVector::new(
        (s32 * (k3 - k1) / k0).re,
        (i * s32 * (k3 + k1) / k0).re,
        (-(3.0f64).sqrt() * k2 / k0).re,
    )
}
