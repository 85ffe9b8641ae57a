// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Process-level configuration for the scri crates: transform settings read
//! from the environment or TOML, and the tracing subscriber bootstrap.

pub mod settings;
pub mod tracing;

pub use settings::{configure, settings, BmsSettings, SettingsError};
