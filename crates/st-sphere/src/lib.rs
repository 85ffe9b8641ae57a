// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Spin-weighted fields on the celestial sphere.
//!
//! The crate provides rotors and the aberration [`boost`], an equiangular
//! [`DataGrid`] with pointwise algebra, spherical-harmonic [`Modes`] with the
//! `ð`/`ð̄` operators, and the conversions between the two representations
//! (plain and boosted synthesis, analysis). Conformal-factor fields used by BMS
//! transformations live in [`conformal`].

pub mod conformal;
pub mod convert;
pub mod error;
pub mod grid;
pub mod modes;
pub mod rotor;
pub mod spectral;

pub use conformal::{
    conformal_factor_grid, inverse_conformal_factor_boosted_grid, inverse_conformal_factor_grid,
    v_from_one_over_k, InverseConformalFactor,
};
pub use convert::{grid_to_modes, modes_to_boosted_grid, modes_to_grid, nyquist_size};
pub use error::{SphereError, SphereResult};
pub use grid::{DataGrid, ScriFunctor};
pub use modes::Modes;
pub use rotor::{boost, rapidity, rotate_z_hat, rotor_from_spherical, FourVector, Rotor, ThreeVector};
pub use spectral::{mode_index, n_modes, ELL_MAX_LIMIT};
