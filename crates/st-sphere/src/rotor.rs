// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Rotors (unit quaternions) locating points and tangent frames on the sphere,
//! and the aberration rotor induced by a Lorentz boost.

use nalgebra::{Quaternion, Vector3, Vector4};

use crate::error::{value, SphereResult};

/// Spatial velocity or direction, units with c = 1.
pub type ThreeVector = Vector3<f64>;

/// Bondi four-momentum `(p0, p1, p2, p3)`.
pub type FourVector = Vector4<f64>;

/// Rotor acting on the sphere. `R ẑ R̄` is the point, `R (x̂ + iŷ) R̄` the dyad.
pub type Rotor = Quaternion<f64>;

/// Below this the boost is treated as the identity.
pub const BOOST_TOLERANCE: f64 = 1.0e-14;

/// Rotor `exp(φ ẑ/2) exp(θ ŷ/2)` taking ẑ to the point `(θ, φ)`.
pub fn rotor_from_spherical(theta: f64, phi: f64) -> Rotor {
    let (sp, cp) = (0.5 * phi).sin_cos();
    let (st, ct) = (0.5 * theta).sin_cos();
    Quaternion::new(cp * ct, -sp * st, cp * st, sp * ct)
}

/// The point on the sphere addressed by `r`, i.e. `R ẑ R̄`.
pub fn rotate_z_hat(r: &Rotor) -> ThreeVector {
    let z_hat = Quaternion::from_imag(Vector3::z());
    (r * z_hat * r.conjugate()).imag()
}

/// Rapidity of a boost with velocity `v`.
pub fn rapidity(v: &ThreeVector) -> f64 {
    let speed = v.norm();
    (1.0 / (1.0 - speed * speed).sqrt()).acosh()
}

/// Rotor taking the direction `n` into its aberrated image under a boost to
/// a frame moving with velocity `v` relative to the current one.
///
/// `n` is normalised internally. The identity is returned when the boost is
/// negligible or when `n` is (anti)parallel to `v`.
pub fn boost(v: &ThreeVector, n: &ThreeVector) -> SphereResult<Rotor> {
    let speed = v.norm();
    let alpha = rapidity(v);
    if speed < BOOST_TOLERANCE || (1.0 - alpha.exp()).abs() < BOOST_TOLERANCE {
        return Ok(Rotor::identity());
    }
    if !(speed < 1.0) {
        return Err(value(format!("boost speed |v|={speed} must be below 1")));
    }
    let v_hat = v / speed;

    let norm_n = n.norm();
    if norm_n == 0.0 || !norm_n.is_finite() {
        return Err(value(format!("|n|={norm_n} is too small to define a direction")));
    }
    let n_hat = n / norm_n;

    let theta = n_hat.dot(&v_hat).clamp(-1.0, 1.0).acos();
    let theta_prime = 2.0 * (alpha.exp() * (0.5 * theta).tan()).atan();

    let axis = v_hat.cross(&n_hat);
    let axis_norm = axis.norm();
    if axis_norm < BOOST_TOLERANCE {
        return Ok(Rotor::identity());
    }

    let generator = Quaternion::from_imag(axis * (0.5 * (theta_prime - theta) / axis_norm));
    Ok(generator.exp())
}
