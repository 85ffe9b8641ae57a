// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Natural cubic splines over irregular abscissas.

use num_complex::Complex64;

use crate::error::{size_mismatch, value, BmsResult};

/// Interpolant with vanishing second derivative at both ends.
#[derive(Clone, Debug, PartialEq)]
pub struct NaturalCubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    second: Vec<f64>,
}

impl NaturalCubicSpline {
    /// Fits the spline through `(x[i], y[i])`; `x` must be strictly increasing.
    ///
    /// One sample gives a constant and two give a straight line.
    pub fn new(x: &[f64], y: &[f64]) -> BmsResult<Self> {
        if x.len() != y.len() {
            return Err(size_mismatch(format!(
                "spline abscissas ({}) and ordinates ({}) differ in length",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(value("spline needs at least one sample"));
        }
        if x.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(value("spline abscissas must be strictly increasing"));
        }

        let n = x.len();
        let mut second = vec![0.0; n];
        if n > 2 {
            // Thomas sweep over the interior second derivatives.
            let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
            let mut diag = vec![0.0; n];
            let mut rhs = vec![0.0; n];
            for i in 1..n - 1 {
                diag[i] = 2.0 * (h[i - 1] + h[i]);
                rhs[i] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
            }
            for i in 2..n - 1 {
                let w = h[i - 1] / diag[i - 1];
                diag[i] -= w * h[i - 1];
                rhs[i] -= w * rhs[i - 1];
            }
            second[n - 2] = rhs[n - 2] / diag[n - 2];
            for i in (1..n - 2).rev() {
                second[i] = (rhs[i] - h[i] * second[i + 1]) / diag[i];
            }
        }

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            second,
        })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Value at `t`; `t` outside the sampled range is rejected.
    pub fn evaluate(&self, t: f64) -> BmsResult<f64> {
        let (lo, hi) = self.domain();
        if !(t >= lo && t <= hi) {
            return Err(value(format!(
                "spline evaluated at {t}, outside the sampled range [{lo}, {hi}]"
            )));
        }
        let n = self.x.len();
        if n == 1 {
            return Ok(self.y[0]);
        }
        let k = self.x.partition_point(|&xi| xi <= t).clamp(1, n - 1) - 1;
        let h = self.x[k + 1] - self.x[k];
        let a = (self.x[k + 1] - t) / h;
        let b = (t - self.x[k]) / h;
        Ok(a * self.y[k]
            + b * self.y[k + 1]
            + ((a * a * a - a) * self.second[k] + (b * b * b - b) * self.second[k + 1]) * h * h
                / 6.0)
    }
}

/// Splines the real and imaginary parts independently and evaluates at `t`.
pub fn interpolate_complex(x: &[f64], y: &[Complex64], t: f64) -> BmsResult<Complex64> {
    let re: Vec<f64> = y.iter().map(|z| z.re).collect();
    let im: Vec<f64> = y.iter().map(|z| z.im).collect();
    Ok(Complex64::new(
        NaturalCubicSpline::new(x, &re)?.evaluate(t)?,
        NaturalCubicSpline::new(x, &im)?.evaluate(t)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BmsError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn passes_through_knots() {
        let x = [0.0, 0.4, 1.0, 1.9, 3.0];
        let y = [1.0, -0.5, 2.0, 0.25, 4.0];
        let spline = NaturalCubicSpline::new(&x, &y).unwrap();
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert_abs_diff_eq!(spline.evaluate(*xi).unwrap(), *yi, epsilon = 1e-14);
        }
    }

    #[test]
    fn reproduces_straight_lines_exactly() {
        let x = [-1.0, 0.2, 0.3, 2.0, 5.5, 6.0];
        let y: Vec<f64> = x.iter().map(|t| 3.0 * t - 2.0).collect();
        let spline = NaturalCubicSpline::new(&x, &y).unwrap();
        for t in [-0.5, 0.25, 1.0, 4.0, 5.9] {
            assert_abs_diff_eq!(spline.evaluate(t).unwrap(), 3.0 * t - 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn tracks_smooth_function() {
        let x: Vec<f64> = (0..40).map(|i| 0.1 * i as f64 + 0.002 * (i * i) as f64).collect();
        let y: Vec<f64> = x.iter().map(|t| t.sin()).collect();
        let spline = NaturalCubicSpline::new(&x, &y).unwrap();
        assert_abs_diff_eq!(spline.evaluate(2.0).unwrap(), 2.0f64.sin(), epsilon = 1e-4);
    }

    #[test]
    fn short_inputs_degrade_gracefully() {
        let single = NaturalCubicSpline::new(&[1.0], &[7.0]).unwrap();
        assert_eq!(single.evaluate(1.0).unwrap(), 7.0);
        let pair = NaturalCubicSpline::new(&[0.0, 2.0], &[1.0, 5.0]).unwrap();
        assert_abs_diff_eq!(pair.evaluate(0.5).unwrap(), 2.0, epsilon = 1e-15);
    }

    #[test]
    fn rejects_bad_input_and_extrapolation() {
        assert!(matches!(
            NaturalCubicSpline::new(&[0.0, 1.0], &[1.0]).unwrap_err(),
            BmsError::SizeMismatch { .. }
        ));
        assert!(NaturalCubicSpline::new(&[0.0, 0.0, 1.0], &[1.0, 2.0, 3.0]).is_err());
        let spline = NaturalCubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
        assert!(matches!(spline.evaluate(2.5).unwrap_err(), BmsError::Value { .. }));
        assert!(spline.evaluate(f64::NAN).is_err());
    }

    #[test]
    fn complex_parts_are_independent() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y: Vec<Complex64> = x.iter().map(|&t| Complex64::new(t, -2.0 * t)).collect();
        let z = interpolate_complex(&x, &y, 1.5).unwrap();
        assert_abs_diff_eq!(z.re, 1.5, epsilon = 1e-14);
        assert_abs_diff_eq!(z.im, -3.0, epsilon = 1e-14);
    }
}
