// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use thiserror::Error;

/// Result alias for sphere-field utilities.
pub type SphereResult<T> = Result<T, SphereError>;

/// Failures raised by grid/mode construction and their algebra.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SphereError {
    /// Degenerate or non-physical numeric input.
    #[error("invalid value: {reason}")]
    Value { reason: String },
    /// Grid dimensions, coefficient counts or ellMax disagree.
    #[error("size mismatch: {reason}")]
    SizeMismatch { reason: String },
    /// Spin weights are incompatible for the requested operation.
    #[error("bad field information: {reason}")]
    BadFieldInformation { reason: String },
}

pub(crate) fn value(reason: impl Into<String>) -> SphereError {
    SphereError::Value {
        reason: reason.into(),
    }
}

pub(crate) fn size_mismatch(reason: impl Into<String>) -> SphereError {
    SphereError::SizeMismatch {
        reason: reason.into(),
    }
}

pub(crate) fn bad_field(reason: impl Into<String>) -> SphereError {
    SphereError::BadFieldInformation {
        reason: reason.into(),
    }
}
