// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use st_sphere::SphereError;
use thiserror::Error;

/// Result alias for transformations of radiative data.
pub type BmsResult<T> = Result<T, BmsError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BmsError {
    /// Out-of-range time, non-monotonic samples or a non-physical momentum.
    #[error("invalid value: {reason}")]
    Value { reason: String },
    /// Sample counts, slice counts or ellMax disagree between inputs.
    #[error("size mismatch: {reason}")]
    SizeMismatch { reason: String },
    /// A waveform does not carry the requested mode.
    #[error("waveform has no mode (ell={ell}, m={m})")]
    MissingMode { ell: usize, m: i32 },
    #[error("{0} is not implemented")]
    NotYetImplemented(&'static str),
    #[error(transparent)]
    Sphere(#[from] SphereError),
}

pub(crate) fn value(reason: impl Into<String>) -> BmsError {
    BmsError::Value {
        reason: reason.into(),
    }
}

pub(crate) fn size_mismatch(reason: impl Into<String>) -> BmsError {
    BmsError::SizeMismatch {
        reason: reason.into(),
    }
}
