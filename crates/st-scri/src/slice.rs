// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Radiative data on one retarded-time cut of null infinity.
//!
//! A slice bundles the five Weyl scalars `ψ0..ψ4`, the shear `σ` and its news
//! `σ̇`, each with a fixed spin weight. [`SliceModes`] stores them as
//! spherical-harmonic modes, [`SliceGrid`] as (boosted) grid samples.

use num_complex::Complex64;
use st_sphere::{
    grid_to_modes, inverse_conformal_factor_boosted_grid, inverse_conformal_factor_grid,
    modes_to_boosted_grid, modes_to_grid, nyquist_size, DataGrid, FourVector, Modes, SphereError,
    ThreeVector,
};
use tracing::trace;

use crate::error::{size_mismatch, BmsError, BmsResult};
use crate::momentum::{four_momentum_from_supermomentum, mass_from_four_momentum};

/// The seven fields of a slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Psi0,
    Psi1,
    Psi2,
    Psi3,
    Psi4,
    Sigma,
    SigmaDot,
}

impl FieldKind {
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Psi0,
        FieldKind::Psi1,
        FieldKind::Psi2,
        FieldKind::Psi3,
        FieldKind::Psi4,
        FieldKind::Sigma,
        FieldKind::SigmaDot,
    ];

    /// Spin weight carried by the field.
    pub fn spin(self) -> i32 {
        match self {
            FieldKind::Psi0 => 2,
            FieldKind::Psi1 => 1,
            FieldKind::Psi2 => 0,
            FieldKind::Psi3 => -1,
            FieldKind::Psi4 => -2,
            FieldKind::Sigma | FieldKind::SigmaDot => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Psi0 => "psi0",
            FieldKind::Psi1 => "psi1",
            FieldKind::Psi2 => "psi2",
            FieldKind::Psi3 => "psi3",
            FieldKind::Psi4 => "psi4",
            FieldKind::Sigma => "sigma",
            FieldKind::SigmaDot => "sigmadot",
        }
    }
}

/// Fixed seven-field record, generic over the field representation.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceOfScri<D> {
    pub psi0: D,
    pub psi1: D,
    pub psi2: D,
    pub psi3: D,
    pub psi4: D,
    pub sigma: D,
    pub sigmadot: D,
}

pub type SliceModes = SliceOfScri<Modes>;
pub type SliceGrid = SliceOfScri<DataGrid>;

impl<D> SliceOfScri<D> {
    pub fn from_fn(mut f: impl FnMut(FieldKind) -> D) -> Self {
        Self {
            psi0: f(FieldKind::Psi0),
            psi1: f(FieldKind::Psi1),
            psi2: f(FieldKind::Psi2),
            psi3: f(FieldKind::Psi3),
            psi4: f(FieldKind::Psi4),
            sigma: f(FieldKind::Sigma),
            sigmadot: f(FieldKind::SigmaDot),
        }
    }

    pub fn try_from_fn<E>(mut f: impl FnMut(FieldKind) -> Result<D, E>) -> Result<Self, E> {
        Ok(Self {
            psi0: f(FieldKind::Psi0)?,
            psi1: f(FieldKind::Psi1)?,
            psi2: f(FieldKind::Psi2)?,
            psi3: f(FieldKind::Psi3)?,
            psi4: f(FieldKind::Psi4)?,
            sigma: f(FieldKind::Sigma)?,
            sigmadot: f(FieldKind::SigmaDot)?,
        })
    }

    pub fn field(&self, kind: FieldKind) -> &D {
        match kind {
            FieldKind::Psi0 => &self.psi0,
            FieldKind::Psi1 => &self.psi1,
            FieldKind::Psi2 => &self.psi2,
            FieldKind::Psi3 => &self.psi3,
            FieldKind::Psi4 => &self.psi4,
            FieldKind::Sigma => &self.sigma,
            FieldKind::SigmaDot => &self.sigmadot,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKind, &D)> + '_ {
        FieldKind::ALL.into_iter().map(move |kind| (kind, self.field(kind)))
    }
}

impl SliceModes {
    /// All-zero slice with the canonical spins.
    pub fn zeros(ell_max: usize) -> Self {
        Self::from_fn(|kind| Modes::zeros(kind.spin(), ell_max))
    }

    pub fn ell_max(&self) -> usize {
        self.iter().map(|(_, m)| m.ell_max()).max().unwrap_or(0)
    }

    /// Checks the canonical spins and a shared ellMax.
    pub fn validate(&self) -> BmsResult<()> {
        let ell_max = self.psi0.ell_max();
        for (kind, modes) in self.iter() {
            if modes.spin() != kind.spin() {
                return Err(BmsError::Sphere(SphereError::BadFieldInformation {
                    reason: format!(
                        "{} must have spin {}, got {}",
                        kind.name(),
                        kind.spin(),
                        modes.spin()
                    ),
                }));
            }
            if modes.ell_max() != ell_max {
                return Err(size_mismatch(format!(
                    "{} has ellMax={}, psi0 has ellMax={ell_max}",
                    kind.name(),
                    modes.ell_max()
                )));
            }
        }
        Ok(())
    }

    /// Moreschi supermomentum `ψ2 + σ·conj(σ̇) + ð ð conj(σ)`.
    pub fn super_momentum(&self) -> BmsResult<Modes> {
        let shear_news = self.sigma.mul(&self.sigmadot.bar())?;
        let eth_eth_sigma_bar = self.sigma.bar().edth().edth();
        Ok(self.psi2.add(&shear_news)?.add(&eth_eth_sigma_bar)?)
    }

    pub fn four_momentum(&self) -> BmsResult<FourVector> {
        Ok(four_momentum_from_supermomentum(&self.super_momentum()?))
    }

    pub fn mass(&self) -> BmsResult<f64> {
        Ok(mass_from_four_momentum(&self.four_momentum()?))
    }

    /// Grid-space image of the slice under the boost `v` and supertranslation
    /// `delta`, at the smallest grid resolving both.
    pub fn bms_transformation_on_slice(
        &self,
        u: f64,
        v: &ThreeVector,
        delta: &Modes,
    ) -> BmsResult<SliceGrid> {
        let n = nyquist_size(self.ell_max().max(delta.ell_max()));
        self.bms_transformation_on_slice_at(u, v, delta, n)
    }

    /// As [`Self::bms_transformation_on_slice`] on an `n × n` grid; `n` must
    /// resolve both the slice and `delta`.
    pub fn bms_transformation_on_slice_at(
        &self,
        u: f64,
        v: &ThreeVector,
        delta: &Modes,
        n: usize,
    ) -> BmsResult<SliceGrid> {
        let needed = nyquist_size(self.ell_max().max(delta.ell_max()));
        if n < needed {
            return Err(size_mismatch(format!(
                "grid size {n} cannot resolve ellMax={}",
                (needed - 1) / 2
            )));
        }
        trace!(u, ?v, n, "transforming slice");

        let one_over_k = inverse_conformal_factor_boosted_grid(v, n, n)?;
        let one_over_k_cubed = one_over_k.pow(3);
        let eth_eth_delta = modes_to_boosted_grid(&delta.edth().edth(), v, n, n)?;

        // u' = (u - δ) K evaluated in the unboosted frame; ð u' / K on the boosted grid.
        let delta_grid = modes_to_grid(delta, n, n)?;
        let u_prime = delta_grid
            .subtract_from(Complex64::new(u, 0.0))
            .div(&inverse_conformal_factor_grid(v, n, n)?)?;
        let eth_u_prime = grid_to_modes(&u_prime, 0)?.edth();
        let eth_u_over_k = modes_to_boosted_grid(&eth_u_prime, v, n, n)?.mul(&one_over_k)?;

        let boosted = SliceGrid::try_from_fn(|kind| modes_to_boosted_grid(self.field(kind), v, n, n))?;
        let e = &eth_u_over_k;
        let (psi0, psi1, psi2, psi3, psi4) = (
            &boosted.psi0,
            &boosted.psi1,
            &boosted.psi2,
            &boosted.psi3,
            &boosted.psi4,
        );

        let two = Complex64::new(2.0, 0.0);
        let three = Complex64::new(3.0, 0.0);
        let four = Complex64::new(4.0, 0.0);
        let six = Complex64::new(6.0, 0.0);

        // Order-four binomial ladder of the null rotation about l.
        let e_psi4 = e.mul(psi4)?;
        let new_psi3 = psi3.sub(&e_psi4)?;
        let new_psi2 = psi2.sub(&e.mul(&psi3.scale(two).sub(&e_psi4)?)?)?;
        let new_psi1 = psi1.sub(&e.mul(
            &psi2
                .scale(three)
                .sub(&e.mul(&psi3.scale(three).sub(&e_psi4)?)?)?,
        )?)?;
        let new_psi0 = psi0.sub(&e.mul(
            &psi1.scale(four).sub(&e.mul(
                &psi2
                    .scale(six)
                    .sub(&e.mul(&psi3.scale(four).sub(&e_psi4)?)?)?,
            )?)?,
        )?)?;

        Ok(SliceGrid {
            psi0: new_psi0.mul(&one_over_k_cubed)?,
            psi1: new_psi1.mul(&one_over_k_cubed)?,
            psi2: new_psi2.mul(&one_over_k_cubed)?,
            psi3: new_psi3.mul(&one_over_k_cubed)?,
            psi4: psi4.mul(&one_over_k_cubed)?,
            sigma: one_over_k.mul(&boosted.sigma.sub(&eth_eth_delta)?)?,
            sigmadot: boosted.sigmadot.mul(&one_over_k.pow(2))?,
        })
    }

    /// Single-slice Moreschi step. Only the time-series iteration on
    /// [`crate::SuperMomenta`] is supported; the arguments are left untouched.
    pub fn moreschi_iteration(&self, _one_over_k: &mut Modes, _delta: &mut Modes) -> BmsResult<()> {
        Err(BmsError::NotYetImplemented("SliceModes::moreschi_iteration"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use st_sphere::grid::boosted_grid_rotors;
    use st_sphere::spectral::grid_rotors;
    use st_sphere::{mode_index, n_modes, rotate_z_hat};
    use std::f64::consts::PI;

    fn random_slice(seed: u64, ell_max: usize) -> SliceModes {
        let mut rng = StdRng::seed_from_u64(seed);
        SliceModes::from_fn(|kind| {
            let mut data = vec![Complex64::new(0.0, 0.0); n_modes(ell_max)];
            for ell in kind.spin().unsigned_abs() as usize..=ell_max {
                let l = ell as i32;
                for m in -l..=l {
                    data[mode_index(ell, m)] =
                        Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                }
            }
            Modes::new(kind.spin(), data).unwrap()
        })
    }

    #[test]
    fn zero_slice_has_canonical_spins() {
        let slice = SliceModes::zeros(3);
        slice.validate().unwrap();
        let spins: Vec<i32> = slice.iter().map(|(_, m)| m.spin()).collect();
        assert_eq!(spins, vec![2, 1, 0, -1, -2, 2, 2]);
        assert_eq!(slice.ell_max(), 3);
    }

    #[test]
    fn validation_flags_wrong_spin_and_ell() {
        let mut slice = SliceModes::zeros(2);
        slice.psi3 = Modes::zeros(1, 2);
        assert!(matches!(slice.validate().unwrap_err(), BmsError::Sphere(_)));

        let mut slice = SliceModes::zeros(2);
        slice.sigma = Modes::zeros(2, 3);
        assert!(matches!(slice.validate().unwrap_err(), BmsError::SizeMismatch { .. }));
    }

    #[test]
    fn mass_of_monopole_slice() {
        let mass = 0.75;
        let mut slice = SliceModes::zeros(2);
        let mut psi2 = vec![Complex64::new(0.0, 0.0); n_modes(2)];
        psi2[0] = Complex64::new(mass * (4.0 * PI).sqrt(), 0.0);
        slice.psi2 = Modes::new(0, psi2).unwrap();
        assert_abs_diff_eq!(slice.mass().unwrap(), mass, epsilon = 1e-12);
    }

    #[test]
    fn supermomentum_combines_shear_terms() {
        let slice = random_slice(41, 2);
        let psi = slice.super_momentum().unwrap();
        assert_eq!(psi.spin(), 0);
        assert_eq!(psi.ell_max(), 4);
        let (theta, phi) = (1.1, 0.6);
        let expected = slice.psi2.evaluate_at_point(theta, phi)
            + slice.sigma.evaluate_at_point(theta, phi)
                * slice.sigmadot.evaluate_at_point(theta, phi).conj()
            + slice.sigma.bar().edth().edth().evaluate_at_point(theta, phi);
        let got = psi.evaluate_at_point(theta, phi);
        assert_abs_diff_eq!(got.re, expected.re, epsilon = 1e-9);
        assert_abs_diff_eq!(got.im, expected.im, epsilon = 1e-9);
    }

    #[test]
    fn identity_transformation_reproduces_fields() {
        let slice = random_slice(43, 2);
        let delta = Modes::zeros(0, 0);
        let grids = slice
            .bms_transformation_on_slice(0.3, &ThreeVector::zeros(), &delta)
            .unwrap();
        for (kind, grid) in grids.iter() {
            assert_eq!(grid.spin(), kind.spin());
            let back = grid_to_modes(grid, 2).unwrap();
            for (a, b) in back.values().iter().zip(slice.field(kind).values()) {
                assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-9);
                assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn pure_time_translation_leaves_weyl_scalars_alone() {
        let slice = random_slice(47, 1);
        let mut shift = vec![Complex64::new(0.0, 0.0); n_modes(1)];
        shift[0] = Complex64::new(0.4 * (4.0 * PI).sqrt(), 0.0);
        let delta = Modes::new(0, shift).unwrap();
        let grids = slice
            .bms_transformation_on_slice(1.0, &ThreeVector::zeros(), &delta)
            .unwrap();
        let reference = modes_to_grid(&slice.psi1, 3, 3).unwrap();
        for (a, b) in grids.psi1.values().iter().zip(reference.values()) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-10);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn boosted_supertranslated_slice_follows_tetrad_ladder() {
        let slice = random_slice(53, 2);
        let mut data = vec![Complex64::new(0.0, 0.0); n_modes(2)];
        data[mode_index(1, -1)] = Complex64::new(0.1, 0.2);
        data[mode_index(1, 0)] = Complex64::new(0.3, 0.0);
        data[mode_index(1, 1)] = Complex64::new(-0.1, 0.2);
        data[mode_index(2, -2)] = Complex64::new(0.05, 0.04);
        data[mode_index(2, 2)] = Complex64::new(0.05, -0.04);
        let delta = Modes::new(0, data).unwrap();
        let v = ThreeVector::new(0.12, -0.05, 0.2);
        let u = 0.7;
        let n = 5;

        let grids = slice.bms_transformation_on_slice(u, &v, &delta).unwrap();
        assert_eq!((grids.psi0.n_theta(), grids.psi0.n_phi()), (n, n));

        // ð of u' = (u - δ) K, sampled on the unboosted grid.
        let gamma = 1.0 / (1.0 - v.norm_squared()).sqrt();
        let u_prime: Vec<Complex64> = grid_rotors(n, n)
            .iter()
            .map(|r| {
                let k = 1.0 / (gamma * (1.0 - v.dot(&rotate_z_hat(r))));
                (Complex64::new(u, 0.0) - delta.evaluate_at_rotor(r)) * k
            })
            .collect();
        let eth_u_prime = grid_to_modes(&DataGrid::new(0, n, n, u_prime).unwrap(), 0)
            .unwrap()
            .edth();
        let eth_eth_delta = delta.edth().edth();

        let mut largest_e = 0.0f64;
        for (p, r) in boosted_grid_rotors(&v, n, n).unwrap().iter().enumerate() {
            let inv_k = gamma * (1.0 - v.dot(&rotate_z_hat(r)));
            let e = eth_u_prime.evaluate_at_rotor(r) * inv_k;
            largest_e = largest_e.max(e.norm());
            let f = |kind: FieldKind| slice.field(kind).evaluate_at_rotor(r);
            let (p0, p1, p2, p3, p4) = (
                f(FieldKind::Psi0),
                f(FieldKind::Psi1),
                f(FieldKind::Psi2),
                f(FieldKind::Psi3),
                f(FieldKind::Psi4),
            );
            let w = inv_k.powi(3);
            let expected = [
                (p0 - e * p1 * 4.0 + e.powi(2) * p2 * 6.0 - e.powi(3) * p3 * 4.0 + e.powi(4) * p4) * w,
                (p1 - e * p2 * 3.0 + e.powi(2) * p3 * 3.0 - e.powi(3) * p4) * w,
                (p2 - e * p3 * 2.0 + e.powi(2) * p4) * w,
                (p3 - e * p4) * w,
                p4 * w,
                (f(FieldKind::Sigma) - eth_eth_delta.evaluate_at_rotor(r)) * inv_k,
                f(FieldKind::SigmaDot) * (inv_k * inv_k),
            ];
            for (kind, want) in FieldKind::ALL.into_iter().zip(expected) {
                let got = grids.field(kind)[p];
                assert!(
                    (got - want).norm() < 1e-9 * want.norm().max(1.0),
                    "{} at point {p}: {got} != {want}",
                    kind.name()
                );
            }
        }
        assert!(largest_e > 1e-2, "frame-dragging term vanished: {largest_e}");
    }

    #[test]
    fn undersized_grid_is_rejected() {
        let slice = SliceModes::zeros(3);
        let err = slice
            .bms_transformation_on_slice_at(0.0, &ThreeVector::zeros(), &Modes::zeros(0, 0), 5)
            .unwrap_err();
        assert!(matches!(err, BmsError::SizeMismatch { .. }));
    }

    #[test]
    fn per_slice_moreschi_step_is_unimplemented() {
        let slice = SliceModes::zeros(1);
        let mut one_over_k = Modes::zeros(0, 1);
        let mut delta = Modes::zeros(0, 2);
        let before = (one_over_k.clone(), delta.clone());
        let err = slice.moreschi_iteration(&mut one_over_k, &mut delta).unwrap_err();
        assert!(matches!(err, BmsError::NotYetImplemented(_)));
        assert_eq!((one_over_k, delta), before);
    }
}
