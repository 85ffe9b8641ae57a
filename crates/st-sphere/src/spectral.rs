// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Spin-weighted spherical-harmonic engine.
//!
//! Harmonics are defined through the Wigner 𝔇 matrix written in terms of the
//! rotor components `R_a = w + i z` and `R_b = y + i x`:
//!
//! ```text
//! ₛY_ℓm(R) = (-1)^s √((2ℓ+1)/4π) 𝔇^ℓ_{m,-s}(R)
//! ```
//!
//! which yields the Condon–Shortley phases, `ₛY(R e^{γẑ/2}) = e^{-isγ} ₛY(R)`
//! and `ð ₛY_ℓm = √((ℓ-s)(ℓ+s+1)) ₛ₊₁Y_ℓm`.
//!
//! Coefficients are stored lexicographically, `ℓ` first then `m = -ℓ..=ℓ`, so
//! mode `(ℓ, m)` sits at `ℓ² + ℓ + m`. Grids are equiangular: `θ` covers
//! `[0, π]` inclusively, `φ` covers `[0, 2π)`, and point `(i_θ, i_φ)` sits at
//! `i_θ · n_φ + i_φ`.
//!
//! Synthesis separates the `e^{imφ}` dependence and finishes each θ-row with an
//! inverse FFT. Analysis takes the forward FFT of each θ-row and solves one
//! small least-squares problem per `m` against the θ-profiles of the
//! harmonics; that inversion is exact for band-limited data once
//! `n_θ ≥ ℓ_max + 2` and `n_φ ≥ 2ℓ_max + 1`.
//!
//! `𝔇` factors into a phase and the real Wigner `d^ℓ_{m',m}(β)` with
//! `cos(β/2) = |R_a|`, `sin(β/2) = |R_b|`. The latter is evaluated through
//! its Jacobi-polynomial form, which stays accurate up to [`ENGINE_ELL_LIMIT`].

use std::f64::consts::PI;
use std::sync::{Arc, OnceLock};

use nalgebra::DMatrix;
use num_complex::Complex64;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};

use crate::error::{size_mismatch, value, SphereResult};
use crate::rotor::{rotor_from_spherical, Rotor};

/// Largest ellMax accepted for caller-supplied coefficient vectors.
pub const ELL_MAX_LIMIT: usize = 32;

/// Largest ellMax the engine evaluates; products of two fields at
/// [`ELL_MAX_LIMIT`] still fit.
pub const ENGINE_ELL_LIMIT: usize = 80;

const SVD_EPS: f64 = 1.0e-12;

/// Number of coefficients for `0 ≤ ℓ ≤ ell_max`.
#[inline]
pub fn n_modes(ell_max: usize) -> usize {
    (ell_max + 1) * (ell_max + 1)
}

/// Linear index of mode `(ell, m)`.
#[inline]
pub fn mode_index(ell: usize, m: i32) -> usize {
    debug_assert!(m.unsigned_abs() as usize <= ell);
    ((ell * ell + ell) as isize + m as isize) as usize
}

/// The ellMax whose coefficient count equals `len`, if any.
pub fn ell_max_for_len(len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let root = (len as f64).sqrt().round() as usize;
    (root * root == len).then(|| root - 1)
}

/// Polar sample points, inclusive of both poles.
pub fn theta_samples(n_theta: usize) -> Vec<f64> {
    if n_theta <= 1 {
        return vec![0.0; n_theta];
    }
    let dtheta = PI / (n_theta - 1) as f64;
    (0..n_theta).map(|i| dtheta * i as f64).collect()
}

/// Azimuthal sample points; `2π` itself is excluded.
pub fn phi_samples(n_phi: usize) -> Vec<f64> {
    let dphi = 2.0 * PI / n_phi.max(1) as f64;
    (0..n_phi).map(|i| dphi * i as f64).collect()
}

/// Rotors of every grid point in storage order.
pub fn grid_rotors(n_theta: usize, n_phi: usize) -> Vec<Rotor> {
    let phis = phi_samples(n_phi);
    theta_samples(n_theta)
        .into_iter()
        .flat_map(|theta| phis.iter().map(move |&phi| rotor_from_spherical(theta, phi)))
        .collect()
}

pub(crate) fn check_engine_ell(ell_max: usize) -> SphereResult<()> {
    if ell_max > ENGINE_ELL_LIMIT {
        return Err(size_mismatch(format!(
            "ellMax={ell_max} exceeds the transform limit {ENGINE_ELL_LIMIT}"
        )));
    }
    Ok(())
}

fn check_coefficients(coeffs: &[Complex64], ell_max: usize) -> SphereResult<()> {
    check_engine_ell(ell_max)?;
    if coeffs.len() < n_modes(ell_max) {
        return Err(size_mismatch(format!(
            "{} coefficients cannot hold ellMax={ell_max}",
            coeffs.len()
        )));
    }
    Ok(())
}

fn factorials() -> &'static [f64] {
    static TABLE: OnceLock<Vec<f64>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = Vec::with_capacity(2 * ENGINE_ELL_LIMIT + 2);
        let mut acc = 1.0f64;
        table.push(acc);
        for n in 1..=(2 * ENGINE_ELL_LIMIT + 1) {
            acc *= n as f64;
            table.push(acc);
        }
        table
    })
}

#[inline]
fn factorial(n: i32) -> f64 {
    factorials()[n as usize]
}

#[inline]
fn binomial(n: i32, k: i32) -> f64 {
    factorial(n) / (factorial(k) * factorial(n - k))
}

/// `P_n^{(α,β)}(x)` by the forward three-term recurrence.
fn jacobi(n: i32, alpha: i32, beta: i32, x: f64) -> f64 {
    let (a, b) = (alpha as f64, beta as f64);
    let mut prev = 1.0;
    if n == 0 {
        return prev;
    }
    let mut curr = 0.5 * (2.0 * (a + 1.0) + (a + b + 2.0) * (x - 1.0));
    for k in 2..=n {
        let k = k as f64;
        let c = 2.0 * k + a + b;
        let next = ((c - 1.0) * (c * (c - 2.0) * x + a * a - b * b) * curr
            - 2.0 * (k + a - 1.0) * (k + b - 1.0) * c * prev)
            / (2.0 * k * (k + a + b) * (c - 2.0));
        prev = curr;
        curr = next;
    }
    curr
}

/// Real Wigner `d^ℓ_{m',m}(β)` given `cos(β/2)` and `sin(β/2)`.
fn wigner_small_d(ell: i32, mp: i32, m: i32, cos_half: f64, sin_half: f64) -> f64 {
    // (degree k, exponent a, sign exponent λ); the smallest k selects the form.
    let forms = [
        (ell + m, mp - m, mp - m),
        (ell - m, m - mp, 0),
        (ell + mp, m - mp, 0),
        (ell - mp, mp - m, mp - m),
    ];
    let mut chosen = forms[0];
    for form in &forms[1..] {
        if form.0 < chosen.0 {
            chosen = *form;
        }
    }
    let (k, a, lambda) = chosen;
    let b = 2 * ell - 2 * k - a;
    let norm = (binomial(2 * ell - k, k + a) / binomial(k + b, b)).sqrt();
    let sign = if lambda.rem_euclid(2) == 0 { 1.0 } else { -1.0 };
    let cos_beta = (cos_half - sin_half) * (cos_half + sin_half);
    sign * norm * sin_half.powi(a) * cos_half.powi(b) * jacobi(k, a, b, cos_beta)
}

/// Rotor components `(R_a, R_b)` used by the 𝔇 formula.
#[inline]
fn rotor_components(r: &Rotor) -> (Complex64, Complex64) {
    (Complex64::new(r.w, r.k), Complex64::new(r.j, r.i))
}

/// Wigner matrix element `𝔇^ℓ_{m',m}` for a rotor given by `(R_a, R_b)`.
fn wigner_d(ell: i32, mp: i32, m: i32, ra: Complex64, rb: Complex64) -> Complex64 {
    if ell < 0 || mp.abs() > ell || m.abs() > ell {
        return Complex64::new(0.0, 0.0);
    }
    let (abs_a, abs_b) = (ra.norm(), rb.norm());
    let scale = abs_a.hypot(abs_b);
    if scale == 0.0 {
        return Complex64::new(0.0, 0.0);
    }
    let phase = (mp + m) as f64 * ra.arg() + (m - mp) as f64 * rb.arg();
    Complex64::from_polar(wigner_small_d(ell, mp, m, abs_a / scale, abs_b / scale), phase)
}

#[inline]
fn swsh_components(s: i32, ell: i32, m: i32, ra: Complex64, rb: Complex64) -> Complex64 {
    let sign = if s.rem_euclid(2) == 0 { 1.0 } else { -1.0 };
    let norm = ((2 * ell + 1) as f64 / (4.0 * PI)).sqrt();
    wigner_d(ell, m, -s, ra, rb) * (sign * norm)
}

/// Spin-weighted harmonic `ₛY_ℓm` evaluated at an arbitrary rotor.
pub fn swsh(s: i32, ell: usize, m: i32, r: &Rotor) -> SphereResult<Complex64> {
    check_engine_ell(ell)?;
    let (ra, rb) = rotor_components(r);
    Ok(swsh_components(s, ell as i32, m, ra, rb))
}

/// Mode sum `Σ a_ℓm ₛY_ℓm(R)`; callers guarantee `coeffs` covers `ell_max`
/// and `ell_max ≤ ENGINE_ELL_LIMIT`.
pub(crate) fn evaluate(coeffs: &[Complex64], s: i32, ell_max: usize, r: &Rotor) -> Complex64 {
    let (ra, rb) = rotor_components(r);
    let ell_min = s.unsigned_abs() as usize;
    let mut acc = Complex64::new(0.0, 0.0);
    for ell in ell_min..=ell_max {
        let l = ell as i32;
        for m in -l..=l {
            let a = coeffs[mode_index(ell, m)];
            if a.re == 0.0 && a.im == 0.0 {
                continue;
            }
            acc += a * swsh_components(s, l, m, ra, rb);
        }
    }
    acc
}

/// Real θ-profile `ₛY_ℓm(θ, 0)`.
fn theta_profile(s: i32, ell: i32, m: i32, theta: f64) -> f64 {
    let ra = Complex64::new((0.5 * theta).cos(), 0.0);
    let rb = Complex64::new((0.5 * theta).sin(), 0.0);
    swsh_components(s, ell, m, ra, rb).re
}

fn plan_rows(n_phi: usize, inverse: bool) -> Arc<dyn Fft<f64>> {
    let mut planner = FftPlanner::<f64>::new();
    if inverse {
        planner.plan_fft_inverse(n_phi)
    } else {
        planner.plan_fft_forward(n_phi)
    }
}

/// Forward transform: coefficients to grid values.
pub fn synthesize(
    coeffs: &[Complex64],
    s: i32,
    ell_max: usize,
    n_theta: usize,
    n_phi: usize,
) -> SphereResult<Vec<Complex64>> {
    check_coefficients(coeffs, ell_max)?;
    let mut out = vec![Complex64::new(0.0, 0.0); n_theta * n_phi];
    if out.is_empty() {
        return Ok(out);
    }
    let thetas = theta_samples(n_theta);
    let ell_min = s.unsigned_abs() as usize;
    let fft = plan_rows(n_phi, true);

    out.par_chunks_mut(n_phi)
        .zip(thetas.par_iter())
        .for_each(|(row, &theta)| {
            // Aliased m share a bin, exactly as e^{imφ_k} does on the grid.
            for ell in ell_min..=ell_max {
                let l = ell as i32;
                for m in -l..=l {
                    let a = coeffs[mode_index(ell, m)];
                    if a.re == 0.0 && a.im == 0.0 {
                        continue;
                    }
                    row[m.rem_euclid(n_phi as i32) as usize] += a * theta_profile(s, l, m, theta);
                }
            }
            fft.process(row);
        });
    Ok(out)
}

/// Backward transform: grid values to coefficients up to `ell_max`.
pub fn analyze(
    values: &[Complex64],
    s: i32,
    n_theta: usize,
    n_phi: usize,
    ell_max: usize,
) -> SphereResult<Vec<Complex64>> {
    if values.len() != n_theta * n_phi {
        return Err(size_mismatch(format!(
            "(n_theta={n_theta})*(n_phi={n_phi}) != (values={})",
            values.len()
        )));
    }
    if n_theta == 0 || n_phi == 0 {
        return Err(size_mismatch(format!("empty grid {n_theta}x{n_phi}")));
    }
    check_engine_ell(ell_max)?;
    let thetas = theta_samples(n_theta);
    let l_max = ell_max as i32;

    // spectra[j·n_φ + (m mod n_φ)] = Σ_k f(θ_j, φ_k) e^{-imφ_k}
    let fft = plan_rows(n_phi, false);
    let mut spectra = values.to_vec();
    spectra.par_chunks_mut(n_phi).for_each(|row| fft.process(row));
    let norm = 1.0 / n_phi as f64;

    let solved: Vec<(i32, Vec<Complex64>)> = (-l_max..=l_max)
        .into_par_iter()
        .map(|m| -> SphereResult<(i32, Vec<Complex64>)> {
            let ell_lo = m.abs().max(s.abs());
            if ell_lo > l_max {
                return Ok((m, Vec::new()));
            }
            let n_ell = (l_max - ell_lo + 1) as usize;
            let design = DMatrix::from_fn(n_theta, n_ell, |j, k| {
                theta_profile(s, ell_lo + k as i32, m, thetas[j])
            });
            let bin = m.rem_euclid(n_phi as i32) as usize;
            let rhs = DMatrix::from_fn(n_theta, 2, |j, c| {
                let f = spectra[j * n_phi + bin] * norm;
                if c == 0 {
                    f.re
                } else {
                    f.im
                }
            });
            let solution = design
                .svd(true, true)
                .solve(&rhs, SVD_EPS)
                .map_err(|reason| value(format!("harmonic projection for m={m} failed: {reason}")))?;
            let coeffs = (0..n_ell)
                .map(|k| Complex64::new(solution[(k, 0)], solution[(k, 1)]))
                .collect();
            Ok((m, coeffs))
        })
        .collect::<SphereResult<_>>()?;

    let mut coeffs = vec![Complex64::new(0.0, 0.0); n_modes(ell_max)];
    for (m, column) in solved {
        let ell_lo = m.abs().max(s.abs()) as usize;
        for (k, a) in column.into_iter().enumerate() {
            coeffs[mode_index(ell_lo + k, m)] = a;
        }
    }
    Ok(coeffs)
}
