// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use serde::Deserialize;
use std::sync::OnceLock;

/// Tunables shared by the retarded-time interpolation and the Moreschi step.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BmsSettings {
    /// Indices added on each side of the bracketing time window.
    pub window_padding: usize,
    /// Minimum distance between the first and last index of the window.
    pub window_min_span: usize,
    /// Grid size used to sample `M / OneOverK^3` during a Moreschi step.
    pub moreschi_grid: usize,
    /// Whether per-point grid loops run through rayon.
    pub parallel: bool,
}

impl Default for BmsSettings {
    fn default() -> Self {
        Self {
            window_padding: 3,
            window_min_span: 7,
            moreschi_grid: 7,
            parallel: true,
        }
    }
}

/// Errors emitted while parsing settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to parse settings TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{key} must be at least {min}, got {value}")]
    OutOfRange {
        key: &'static str,
        min: usize,
        value: usize,
    },
}

impl BmsSettings {
    /// Builds a snapshot from `SCRI_*` environment variables, falling back to
    /// the defaults for anything missing or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let window_padding = env_usize("SCRI_WINDOW_PADDING").unwrap_or(defaults.window_padding);
        let window_min_span =
            env_usize("SCRI_WINDOW_MIN_SPAN").unwrap_or(defaults.window_min_span);
        let moreschi_grid = env_usize("SCRI_MORESCHI_GRID")
            .filter(|&n| n >= 1)
            .unwrap_or(defaults.moreschi_grid);
        let parallel = std::env::var("SCRI_PARALLEL")
            .ok()
            .map(|v| !matches!(v.as_str(), "0" | "false" | "False" | "off" | "OFF"))
            .unwrap_or(defaults.parallel);

        Self {
            window_padding,
            window_min_span,
            moreschi_grid,
            parallel,
        }
    }

    /// Parses a `[bms]`-free TOML table; keys that are absent keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let parsed: Self = toml::from_str(text)?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.moreschi_grid < 1 {
            return Err(SettingsError::OutOfRange {
                key: "moreschi_grid",
                min: 1,
                value: self.moreschi_grid,
            });
        }
        Ok(())
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<usize>().ok())
}

static SETTINGS: OnceLock<BmsSettings> = OnceLock::new();

/// Returns the lazily initialised process-wide settings.
pub fn settings() -> &'static BmsSettings {
    SETTINGS.get_or_init(|| {
        let cfg = BmsSettings::from_env();
        apply_process_hints(&cfg);
        cfg
    })
}

/// Fixes the process-wide settings. Intended for tests; the first caller wins.
pub fn configure(cfg: BmsSettings) -> &'static BmsSettings {
    SETTINGS.get_or_init(|| {
        apply_process_hints(&cfg);
        cfg
    })
}

fn apply_process_hints(cfg: &BmsSettings) {
    if !cfg.parallel {
        // Only effective before rayon builds its global pool.
        std::env::set_var("RAYON_NUM_THREADS", "1");
    }
}
