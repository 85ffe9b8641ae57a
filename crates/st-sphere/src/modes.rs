// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Spin-weighted spherical-harmonic coefficients and their algebra.
//!
//! Sums and differences act on coefficients directly. Products and quotients
//! mix `ℓ` values, so both operands are synthesised on a `(2L+1)²` grid with
//! `L` the sum of their ellMax values, combined pointwise and analysed back.

use std::ops::Index;

use num_complex::Complex64;

use crate::convert::{grid_to_modes, modes_to_grid};
use crate::error::{bad_field, size_mismatch, SphereResult};
use crate::rotor::{rotor_from_spherical, Rotor};
use crate::spectral::{self, ell_max_for_len, mode_index, n_modes, ELL_MAX_LIMIT};

#[derive(Clone, Debug, PartialEq)]
pub struct Modes {
    spin: i32,
    ell_max: usize,
    data: Vec<Complex64>,
}

impl Modes {
    /// Wraps caller-supplied coefficients in `(ℓ, m)` lexicographic order.
    ///
    /// The length must be `(ℓMax+1)²` for some `ℓMax ≤ ELL_MAX_LIMIT`.
    pub fn new(spin: i32, data: Vec<Complex64>) -> SphereResult<Self> {
        let ell_max = ell_max_for_len(data.len()).ok_or_else(|| {
            size_mismatch(format!(
                "{} coefficients do not correspond to any ellMax",
                data.len()
            ))
        })?;
        if ell_max > ELL_MAX_LIMIT {
            return Err(size_mismatch(format!(
                "ellMax={ell_max} exceeds the limit {ELL_MAX_LIMIT}"
            )));
        }
        Ok(Self {
            spin,
            ell_max,
            data,
        })
    }

    /// Internal constructor for results of transforms; the length is trusted.
    pub(crate) fn from_parts(spin: i32, ell_max: usize, data: Vec<Complex64>) -> Self {
        debug_assert_eq!(data.len(), n_modes(ell_max));
        Self {
            spin,
            ell_max,
            data,
        }
    }

    pub fn zeros(spin: i32, ell_max: usize) -> Self {
        Self::from_parts(spin, ell_max, vec![Complex64::new(0.0, 0.0); n_modes(ell_max)])
    }

    #[inline]
    pub fn spin(&self) -> i32 {
        self.spin
    }

    #[inline]
    pub fn ell_max(&self) -> usize {
        self.ell_max
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn values(&self) -> &[Complex64] {
        &self.data
    }

    /// Coefficient of `(ell, m)`, if stored.
    pub fn get(&self, ell: usize, m: i32) -> Option<Complex64> {
        if ell > self.ell_max || m.unsigned_abs() as usize > ell {
            return None;
        }
        Some(self.data[mode_index(ell, m)])
    }

    /// Drops every mode above `ell_max`.
    pub fn truncated(&self, ell_max: usize) -> Self {
        let keep = ell_max.min(self.ell_max);
        Self::from_parts(self.spin, keep, self.data[..n_modes(keep)].to_vec())
    }

    /// Extends with zero coefficients up to `ell_max`.
    pub fn padded(&self, ell_max: usize) -> Self {
        let mut data = self.data.clone();
        if ell_max > self.ell_max {
            data.resize(n_modes(ell_max), Complex64::new(0.0, 0.0));
        }
        Self::from_parts(self.spin, ell_max.max(self.ell_max), data)
    }

    fn check_spin(&self, other: &Self, op: &str) -> SphereResult<()> {
        if self.spin != other.spin {
            return Err(bad_field(format!(
                "cannot {op} modes of spin {} and {}",
                self.spin, other.spin
            )));
        }
        Ok(())
    }

    /// Coefficient-wise sum; the shorter operand is zero-padded.
    pub fn add(&self, other: &Self) -> SphereResult<Self> {
        self.check_spin(other, "add")?;
        let ell_max = self.ell_max.max(other.ell_max);
        let mut out = self.padded(ell_max);
        for (a, b) in out.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
        Ok(out)
    }

    /// Coefficient-wise difference; the shorter operand is zero-padded.
    pub fn sub(&self, other: &Self) -> SphereResult<Self> {
        self.check_spin(other, "subtract")?;
        let ell_max = self.ell_max.max(other.ell_max);
        let mut out = self.padded(ell_max);
        for (a, b) in out.data.iter_mut().zip(other.data.iter()) {
            *a -= b;
        }
        Ok(out)
    }

    fn product_grids(&self, other: &Self) -> SphereResult<(usize, crate::DataGrid, crate::DataGrid)> {
        let ell_max = self.ell_max + other.ell_max;
        let n = 2 * ell_max + 1;
        let lhs = modes_to_grid(self, n, n)?;
        let rhs = modes_to_grid(other, n, n)?;
        Ok((ell_max, lhs, rhs))
    }

    /// Product through the grid; spins add.
    pub fn mul(&self, other: &Self) -> SphereResult<Self> {
        let (ell_max, lhs, rhs) = self.product_grids(other)?;
        grid_to_modes(&lhs.mul(&rhs)?, ell_max)
    }

    /// Quotient through the grid; spins subtract.
    pub fn div(&self, other: &Self) -> SphereResult<Self> {
        let (ell_max, lhs, rhs) = self.product_grids(other)?;
        grid_to_modes(&lhs.div(&rhs)?, ell_max)
    }

    /// Integer power through the grid, analysed at ellMax `|p|·ℓMax`.
    pub fn pow(&self, p: i32) -> SphereResult<Self> {
        let ell_max = self.ell_max * (p.unsigned_abs() as usize).max(1);
        let n = 2 * ell_max + 1;
        let grid = modes_to_grid(self, n, n)?;
        grid_to_modes(&grid.pow(p), ell_max)
    }

    /// `a · M`
    pub fn scale(&self, a: Complex64) -> Self {
        Self::from_parts(
            self.spin,
            self.ell_max,
            self.data.iter().map(|&x| a * x).collect(),
        )
    }

    /// Coefficients of the complex conjugate field stored as a spin `-s`
    /// object; only the coefficients are conjugated.
    pub fn bar(&self) -> Self {
        Self::from_parts(
            -self.spin,
            self.ell_max,
            self.data.iter().map(|x| x.conj()).collect(),
        )
    }

    fn diagonal(&self, spin: i32, factor: impl Fn(i32) -> f64) -> Self {
        let mut data = self.data.clone();
        for ell in 0..=self.ell_max {
            let f = factor(ell as i32);
            let l = ell as i32;
            for m in -l..=l {
                data[mode_index(ell, m)] *= f;
            }
        }
        Self::from_parts(spin, self.ell_max, data)
    }

    /// Spin-raising `ð`: `(ℓ, m) ↦ √((ℓ-s)(ℓ+s+1)/2)` for `ℓ ≥ |s+1|`.
    pub fn edth(&self) -> Self {
        let s = self.spin;
        self.diagonal(s + 1, |ell| {
            if ell < (s + 1).abs() {
                0.0
            } else {
                (((ell - s) * (ell + s + 1)) as f64 / 2.0).sqrt()
            }
        })
    }

    /// Spin-lowering `ð̄`: `(ℓ, m) ↦ -√((ℓ+s)(ℓ-s+1)/2)` for `ℓ ≥ |s-1|`.
    pub fn edthbar(&self) -> Self {
        let s = self.spin;
        self.diagonal(s - 1, |ell| {
            if ell < (s - 1).abs() {
                0.0
            } else {
                -(((ell + s) * (ell - s + 1)) as f64 / 2.0).sqrt()
            }
        })
    }

    /// `ð² ð̄²`: `(ℓ, m) ↦ (ℓ-1)ℓ(ℓ+1)(ℓ+2)`, spin unchanged.
    pub fn edth2edthbar2(&self) -> Self {
        self.diagonal(self.spin, |ell| {
            ((ell - 1) * ell * (ell + 1) * (ell + 2)) as f64
        })
    }

    /// Field value at the direction `(θ, φ)`.
    pub fn evaluate_at_point(&self, theta: f64, phi: f64) -> Complex64 {
        self.evaluate_at_rotor(&rotor_from_spherical(theta, phi))
    }

    /// Field value at an arbitrary rotor, including its spin phase.
    pub fn evaluate_at_rotor(&self, r: &Rotor) -> Complex64 {
        spectral::evaluate(&self.data, self.spin, self.ell_max, r)
    }
}

impl Index<usize> for Modes {
    type Output = Complex64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SphereError;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::PI;

    fn random_modes(rng: &mut StdRng, spin: i32, ell_max: usize) -> Modes {
        let mut data = vec![Complex64::new(0.0, 0.0); n_modes(ell_max)];
        for ell in spin.unsigned_abs() as usize..=ell_max {
            let l = ell as i32;
            for m in -l..=l {
                data[mode_index(ell, m)] =
                    Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            }
        }
        Modes::new(spin, data).unwrap()
    }

    fn assert_modes_close(a: &Modes, b: &Modes, eps: f64) {
        assert_eq!(a.spin(), b.spin());
        assert_eq!(a.ell_max(), b.ell_max());
        for (x, y) in a.values().iter().zip(b.values()) {
            assert_abs_diff_eq!(x.re, y.re, epsilon = eps);
            assert_abs_diff_eq!(x.im, y.im, epsilon = eps);
        }
    }

    #[test]
    fn construction_validates_length() {
        assert!(matches!(
            Modes::new(0, vec![Complex64::new(0.0, 0.0); 5]).unwrap_err(),
            SphereError::SizeMismatch { .. }
        ));
        assert!(Modes::new(0, vec![Complex64::new(0.0, 0.0); n_modes(ELL_MAX_LIMIT + 1)]).is_err());
        assert_eq!(Modes::new(-2, vec![Complex64::new(0.0, 0.0); 16]).unwrap().ell_max(), 3);
    }

    #[test]
    fn addition_pads_shorter_operand() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = random_modes(&mut rng, 0, 2);
        let b = random_modes(&mut rng, 0, 4);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.ell_max(), 4);
        assert_eq!(sum.get(3, 1), b.get(3, 1));

        let diff = a.sub(&b).unwrap();
        assert_eq!(diff.get(4, -2), b.get(4, -2).map(|x| -x));
        assert_modes_close(&diff.add(&b).unwrap(), &a.padded(4), 1e-14);
    }

    #[test]
    fn addition_requires_equal_spin() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = random_modes(&mut rng, 1, 2);
        let b = random_modes(&mut rng, 2, 2);
        assert!(matches!(a.add(&b).unwrap_err(), SphereError::BadFieldInformation { .. }));
        assert!(matches!(a.sub(&b).unwrap_err(), SphereError::BadFieldInformation { .. }));
    }

    #[test]
    fn product_matches_pointwise_product() {
        let mut rng = StdRng::seed_from_u64(17);
        let a = random_modes(&mut rng, 1, 2);
        let b = random_modes(&mut rng, -2, 3);
        let prod = a.mul(&b).unwrap();
        assert_eq!(prod.spin(), -1);
        assert_eq!(prod.ell_max(), 5);
        for &(theta, phi) in &[(0.3, 0.1), (1.7, 4.0), (2.9, -2.2)] {
            let expected = a.evaluate_at_point(theta, phi) * b.evaluate_at_point(theta, phi);
            let got = prod.evaluate_at_point(theta, phi);
            assert_abs_diff_eq!(got.re, expected.re, epsilon = 1e-9);
            assert_abs_diff_eq!(got.im, expected.im, epsilon = 1e-9);
        }
    }

    #[test]
    fn product_at_ell_limit_matches_pointwise_product() {
        let mut rng = StdRng::seed_from_u64(41);
        let a = random_modes(&mut rng, 0, ELL_MAX_LIMIT);
        let b = random_modes(&mut rng, 1, ELL_MAX_LIMIT);
        let prod = a.mul(&b).unwrap();
        assert_eq!(prod.ell_max(), 2 * ELL_MAX_LIMIT);
        for _ in 0..8 {
            let theta = rng.gen_range(0.0..PI);
            let phi = rng.gen_range(0.0..2.0 * PI);
            let expected = a.evaluate_at_point(theta, phi) * b.evaluate_at_point(theta, phi);
            let got = prod.evaluate_at_point(theta, phi);
            assert!(
                (got - expected).norm() <= 1e-8 * expected.norm().max(1.0),
                "({theta}, {phi}): {got} != {expected}"
            );
        }
    }

    #[test]
    fn edth_kills_monopole_and_raises_spin() {
        let m = Modes::new(0, vec![Complex64::new(2.0, -1.0)]).unwrap();
        let e = m.edth();
        assert_eq!(e.spin(), 1);
        assert_eq!(e[0], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn edth_operators_follow_ghp_normalisation() {
        let mut rng = StdRng::seed_from_u64(23);
        let m = random_modes(&mut rng, 0, 3);
        let e = m.edth();
        let expected = m.get(2, 1).unwrap() * (3.0f64).sqrt();
        assert_abs_diff_eq!(e.get(2, 1).unwrap().re, expected.re, epsilon = 1e-14);

        let eb = m.edthbar();
        assert_eq!(eb.spin(), -1);
        let expected = -m.get(3, -2).unwrap() * (6.0f64).sqrt();
        assert_abs_diff_eq!(eb.get(3, -2).unwrap().im, expected.im, epsilon = 1e-14);

        let d4 = m.edth2edthbar2();
        assert_eq!(d4.get(0, 0).unwrap(), Complex64::new(0.0, 0.0));
        assert_eq!(d4.get(1, 1).unwrap(), Complex64::new(0.0, 0.0));
        assert_abs_diff_eq!(d4.get(2, 0).unwrap().re, 24.0 * m.get(2, 0).unwrap().re, epsilon = 1e-13);
    }

    #[test]
    fn bar_conjugates_coefficients() {
        let m = Modes::new(2, vec![Complex64::new(1.0, 2.0); 9]).unwrap();
        let b = m.bar();
        assert_eq!(b.spin(), -2);
        assert_eq!(b[5], Complex64::new(1.0, -2.0));
    }

    #[test]
    fn monopole_evaluates_to_constant() {
        let m = Modes::new(0, vec![Complex64::new((4.0 * PI).sqrt(), 0.0)]).unwrap();
        let value = m.evaluate_at_point(1.2, 0.4);
        assert_abs_diff_eq!(value.re, 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(value.im, 0.0, epsilon = 1e-14);
    }

    #[test]
    fn power_of_scalar_field() {
        let mut rng = StdRng::seed_from_u64(29);
        let m = random_modes(&mut rng, 0, 2);
        let cube = m.pow(3).unwrap();
        assert_eq!(cube.ell_max(), 6);
        let (theta, phi) = (0.8, 2.5);
        let expected = m.evaluate_at_point(theta, phi).powi(3);
        let got = cube.evaluate_at_point(theta, phi);
        assert_abs_diff_eq!(got.re, expected.re, epsilon = 1e-9);
        assert_abs_diff_eq!(got.im, expected.im, epsilon = 1e-9);
    }

    #[test]
    fn truncation_and_lookup() {
        let mut rng = StdRng::seed_from_u64(31);
        let m = random_modes(&mut rng, 0, 4);
        let t = m.truncated(2);
        assert_eq!(t.ell_max(), 2);
        assert_eq!(t.len(), 9);
        assert_eq!(t.get(2, -2), m.get(2, -2));
        assert_eq!(t.get(3, 0), None);
        assert_eq!(m.get(1, 2), None);
    }
}
