// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Bondi four-momentum read off the `ℓ ≤ 1` part of a supermomentum.

use std::f64::consts::PI;

use num_complex::Complex64;
use st_sphere::{FourVector, Modes};
use tracing::warn;

/// `(p0, p1, p2, p3)` from the monopole and dipole of `psi`.
///
/// The dipole normalisation carries an extra `1/√3` relative to the
/// monopole; the Moreschi update is written against exactly these constants.
pub fn four_momentum_from_supermomentum(psi: &Modes) -> FourVector {
    let mode = |ell: usize, m: i32| psi.get(ell, m).unwrap_or(Complex64::new(0.0, 0.0));
    let (psi0, psi1, psi2, psi3) = (mode(0, 0), mode(1, -1), mode(1, 0), mode(1, 1));
    let i = Complex64::new(0.0, 1.0);
    let sqrt3 = 3.0f64.sqrt();
    let sqrt4pi = (4.0 * PI).sqrt();
    let sqrt8pi = (8.0 * PI).sqrt();
    FourVector::new(
        psi0.re / sqrt4pi,
        (psi1 - psi3).re / (sqrt3 * sqrt8pi),
        -(i * (psi1 + psi3)).re / (sqrt3 * sqrt8pi),
        psi2.re / (sqrt3 * sqrt4pi),
    )
}

/// `√(p0² - p1² - p2² - p3²)`; NaN for space-like momenta.
pub fn mass_from_four_momentum(p: &FourVector) -> f64 {
    let m2 = p[0] * p[0] - p[1] * p[1] - p[2] * p[2] - p[3] * p[3];
    if m2 < 0.0 {
        warn!(?p, m2, "four-momentum is space-like");
    }
    m2.sqrt()
}
