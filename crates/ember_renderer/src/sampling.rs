//! Random-sampling helpers shared by the estimators and the pixel loop.

use std::f64::consts::PI;

use ember_math::{orthogonal, DVec3};
use rand::RngCore;

/// Uniform f64 in [0, 1) from an object-safe RNG handle.
///
/// `dyn RngCore` cannot use `Rng::random` directly; this mirrors the
/// standard-distribution construction from the top 53 mantissa bits.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Cosine-weighted hemisphere direction around `normal` from two uniform
/// draws. The frame is (normal, e1, e2) with e1 the deterministic orthogonal
/// of the normal.
pub fn cosine_hemisphere(normal: DVec3, u1: f64, u2: f64) -> DVec3 {
    let e1 = orthogonal(normal);
    let e2 = normal.cross(e1);
    let phi = 2.0 * PI * u1;
    let sin_theta = (1.0 - u2).sqrt();
    phi.cos() * sin_theta * e1 + phi.sin() * sin_theta * e2 + u2.sqrt() * normal
}

/// Gaussian sub-pixel offsets for anti-aliasing, via Box-Muller on two
/// uniform draws, scaled to half a pixel of standard deviation.
pub fn gaussian_jitter(u1: f64, u2: f64) -> (f64, f64) {
    let r = (-2.0 * u1.ln()).sqrt();
    let angle = 2.0 * PI * u2;
    (r * angle.cos() * 0.5, r * angle.sin() * 0.5)
}
