// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Radiative data at future null infinity and its BMS transformations.
//!
//! A [`Scri`] holds the Weyl scalars, shear and news of a waveform as a
//! sequence of [`SliceModes`]. [`Scri::bms_transformation`] maps the data to
//! the cut `u' = 0` of a frame related by a boost and a supertranslation:
//! every slice near the target cut is evaluated on the boosted grid, each grid
//! point is interpolated in retarded time with a natural cubic spline, and the
//! result is analysed back into modes. [`SuperMomenta`] applies the same
//! pipeline to the Moreschi supermomentum and provides one step of the
//! Moreschi iteration.
//!
//! Grid loops run on rayon; tunables live in [`spiral_config::BmsSettings`].

pub mod error;
pub mod momentum;
pub mod retarded;
pub mod scri;
pub mod slice;
pub mod spline;
pub mod supermomenta;
pub mod waveform;

pub use error::{BmsError, BmsResult};
pub use momentum::{four_momentum_from_supermomentum, mass_from_four_momentum};
pub use scri::Scri;
pub use slice::{FieldKind, SliceGrid, SliceModes, SliceOfScri};
pub use spline::NaturalCubicSpline;
pub use supermomenta::SuperMomenta;
pub use spiral_config::tracing::init_tracing;
pub use waveform::{ModeTimeSeries, Waveform};

pub use st_sphere::{DataGrid, FourVector, Modes, Rotor, ThreeVector};
