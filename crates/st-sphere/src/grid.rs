// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Spin-weighted fields sampled on an equiangular grid.

use std::ops::Index;

use num_complex::Complex64;
use rayon::prelude::*;

use crate::error::{bad_field, size_mismatch, SphereResult};
use crate::rotor::{boost, rotate_z_hat, Rotor, ThreeVector};
use crate::spectral::grid_rotors;

/// A spin-weighted function that can be evaluated at any rotor.
///
/// Closures `Fn(&Rotor) -> Complex64` implement this automatically, so ad-hoc
/// fields can be sampled without declaring a type.
pub trait ScriFunctor: Sync {
    fn evaluate(&self, r: &Rotor) -> Complex64;
}

impl<F> ScriFunctor for F
where
    F: Fn(&Rotor) -> Complex64 + Sync,
{
    #[inline]
    fn evaluate(&self, r: &Rotor) -> Complex64 {
        self(r)
    }
}

/// Composite rotors `Boost(-v, R ẑ R̄) · R` for every point of the grid.
///
/// Evaluating an unboosted field at these rotors yields the boosted field on
/// the grid.
pub fn boosted_grid_rotors(
    v: &ThreeVector,
    n_theta: usize,
    n_phi: usize,
) -> SphereResult<Vec<Rotor>> {
    let minus_v = -v;
    grid_rotors(n_theta, n_phi)
        .into_par_iter()
        .map(|rp| -> SphereResult<Rotor> {
            let rb = boost(&minus_v, &rotate_z_hat(&rp))?;
            Ok(rb * rp)
        })
        .collect()
}

/// Equiangular samples of a spin-weighted field.
#[derive(Clone, Debug, PartialEq)]
pub struct DataGrid {
    spin: i32,
    n_theta: usize,
    n_phi: usize,
    data: Vec<Complex64>,
}

impl DataGrid {
    /// Wraps explicit samples; `data.len()` must equal `n_theta * n_phi`.
    pub fn new(spin: i32, n_theta: usize, n_phi: usize, data: Vec<Complex64>) -> SphereResult<Self> {
        if data.len() != n_theta * n_phi {
            return Err(size_mismatch(format!(
                "(n_theta={n_theta})*(n_phi={n_phi}) != (data.len()={})",
                data.len()
            )));
        }
        Ok(Self {
            spin,
            n_theta,
            n_phi,
            data,
        })
    }

    /// Grid holding the same value everywhere.
    pub fn constant(spin: i32, n_theta: usize, n_phi: usize, value: Complex64) -> Self {
        Self {
            spin,
            n_theta,
            n_phi,
            data: vec![value; n_theta * n_phi],
        }
    }

    /// Samples `functor` through the boosted point loop: each value is
    /// `functor(Boost(-v, R ẑ R̄) · R)` for the grid rotor `R`.
    pub fn from_functor<F>(
        spin: i32,
        functor: &F,
        v: &ThreeVector,
        n_theta: usize,
        n_phi: usize,
    ) -> SphereResult<Self>
    where
        F: ScriFunctor + ?Sized,
    {
        let data = boosted_grid_rotors(v, n_theta, n_phi)?
            .par_iter()
            .map(|r| functor.evaluate(r))
            .collect();
        Ok(Self {
            spin,
            n_theta,
            n_phi,
            data,
        })
    }

    #[inline]
    pub fn spin(&self) -> i32 {
        self.spin
    }

    #[inline]
    pub fn n_theta(&self) -> usize {
        self.n_theta
    }

    #[inline]
    pub fn n_phi(&self) -> usize {
        self.n_phi
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

    fn check_dims(&self, other: &Self, op: &str) -> SphereResult<()> {
        if self.n_theta != other.n_theta || self.n_phi != other.n_phi {
            return Err(size_mismatch(format!(
                "cannot {op} grids of shape {}x{} and {}x{}",
                self.n_theta, self.n_phi, other.n_theta, other.n_phi
            )));
        }
        Ok(())
    }

    fn check_spin(&self, other: &Self, op: &str) -> SphereResult<()> {
        if self.spin != other.spin {
            return Err(bad_field(format!(
                "cannot {op} grids of spin {} and {}",
                self.spin, other.spin
            )));
        }
        Ok(())
    }

    fn zip_with(&self, other: &Self, spin: i32, f: impl Fn(Complex64, Complex64) -> Complex64) -> Self {
        Self {
            spin,
            n_theta: self.n_theta,
            n_phi: self.n_phi,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    fn map(&self, spin: i32, f: impl Fn(Complex64) -> Complex64) -> Self {
        Self {
            spin,
            n_theta: self.n_theta,
            n_phi: self.n_phi,
            data: self.data.iter().map(|&a| f(a)).collect(),
        }
    }

    /// Pointwise sum; shapes and spins must agree.
    pub fn add(&self, other: &Self) -> SphereResult<Self> {
        self.check_dims(other, "add")?;
        self.check_spin(other, "add")?;
        Ok(self.zip_with(other, self.spin, |a, b| a + b))
    }

    /// Pointwise difference; shapes and spins must agree.
    pub fn sub(&self, other: &Self) -> SphereResult<Self> {
        self.check_dims(other, "subtract")?;
        self.check_spin(other, "subtract")?;
        Ok(self.zip_with(other, self.spin, |a, b| a - b))
    }

    /// Pointwise product; spins add.
    pub fn mul(&self, other: &Self) -> SphereResult<Self> {
        self.check_dims(other, "multiply")?;
        Ok(self.zip_with(other, self.spin + other.spin, |a, b| a * b))
    }

    /// Pointwise quotient; spins subtract.
    pub fn div(&self, other: &Self) -> SphereResult<Self> {
        self.check_dims(other, "divide")?;
        Ok(self.zip_with(other, self.spin - other.spin, |a, b| a / b))
    }

    /// `a · G`
    pub fn scale(&self, a: Complex64) -> Self {
        self.map(self.spin, |x| a * x)
    }

    /// `a + G`
    pub fn offset(&self, a: Complex64) -> Self {
        self.map(self.spin, |x| a + x)
    }

    /// `a - G`
    pub fn subtract_from(&self, a: Complex64) -> Self {
        self.map(self.spin, |x| a - x)
    }

    /// `a / G`; the spin flips sign.
    pub fn divide_into(&self, a: Complex64) -> Self {
        self.map(-self.spin, |x| a / x)
    }

    /// Pointwise integer power; the spin is multiplied by `p`.
    pub fn pow(&self, p: i32) -> Self {
        self.map(self.spin * p, |x| x.powi(p))
    }

    /// Pointwise complex conjugate; the spin flips sign.
    pub fn conjugate(&self) -> Self {
        self.map(-self.spin, |x| x.conj())
    }
}

impl Index<usize> for DataGrid {
    type Output = Complex64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}
