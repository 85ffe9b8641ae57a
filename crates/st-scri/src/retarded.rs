// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Retarded-time bookkeeping shared by the multi-slice transforms: the target
//! time of every grid point, the bracketing window of slices and the per-point
//! spline interpolation across that window.

use std::ops::RangeInclusive;

use num_complex::Complex64;
use rayon::prelude::*;
use spiral_config::BmsSettings;
use st_sphere::{modes_to_grid, DataGrid, Modes};
use tracing::debug;

use crate::error::{size_mismatch, value, BmsResult};
use crate::spline::interpolate_complex;

/// Per-point source times `u0 + δ(θ, φ)` on an `n × n` grid.
pub fn retarded_times(u0: f64, delta: &Modes, n: usize) -> BmsResult<Vec<f64>> {
    let grid = modes_to_grid(delta, n, n)?;
    Ok(grid.values().iter().map(|z| u0 + z.re).collect())
}

/// Fails unless every target time lies inside `[t[0], t[N-1]]`; returns the
/// smallest and largest target.
pub fn check_time_range(t: &[f64], u: &[f64]) -> BmsResult<(f64, f64)> {
    let (Some(&t_first), Some(&t_last)) = (t.first(), t.last()) else {
        return Err(value("no time samples to interpolate from"));
    };
    let (u_min, u_max) = u
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    if u.iter().any(|x| !x.is_finite()) || u_min < t_first || u_max > t_last {
        return Err(value(format!(
            "retarded times [{u_min}, {u_max}] leave the sampled range [{t_first}, {t_last}]"
        )));
    }
    Ok((u_min, u_max))
}

/// Indices of the slices bracketing `[u_min, u_max]`, padded on both sides
/// and widened to the minimum span, clipped to the available samples.
pub fn retarded_window(
    t: &[f64],
    u_min: f64,
    u_max: f64,
    settings: &BmsSettings,
) -> RangeInclusive<usize> {
    let last = t.len().saturating_sub(1);
    let mut i_max = last;
    while i_max > 0 && t[i_max] > u_max {
        i_max -= 1;
    }
    let mut i_min = 0;
    while i_min < last && t[i_min] < u_min {
        i_min += 1;
    }
    let i_min = i_min.saturating_sub(settings.window_padding);
    let i_max = last.min((i_min + settings.window_min_span).max(i_max + settings.window_padding));
    debug!(u_min, u_max, i_min, i_max, "selected retarded-time window");
    i_min..=i_max
}

/// For each grid point, splines the samples across `times` and evaluates at
/// that point's target time `u[i]`.
pub fn interpolate_grids(
    times: &[f64],
    samples: &[&DataGrid],
    u: &[f64],
    parallel: bool,
) -> BmsResult<DataGrid> {
    let Some(first) = samples.first() else {
        return Err(size_mismatch("no grids to interpolate between"));
    };
    if samples.len() != times.len() {
        return Err(size_mismatch(format!(
            "{} grids for {} time samples",
            samples.len(),
            times.len()
        )));
    }
    if let Some(bad) = samples.iter().find(|g| g.len() != u.len()) {
        return Err(size_mismatch(format!(
            "grid with {} points cannot be interpolated at {} targets",
            bad.len(),
            u.len()
        )));
    }

    let point = |i: usize| -> BmsResult<Complex64> {
        let series: Vec<Complex64> = samples.iter().map(|g| g[i]).collect();
        interpolate_complex(times, &series, u[i])
    };
    let data: Vec<Complex64> = if parallel {
        (0..u.len()).into_par_iter().map(point).collect::<BmsResult<_>>()?
    } else {
        (0..u.len()).map(point).collect::<BmsResult<_>>()?
    };
    Ok(DataGrid::new(first.spin(), first.n_theta(), first.n_phi(), data)?)
}
