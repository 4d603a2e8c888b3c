//! Uniform random numbers and the warps that map them onto shapes.
//!
//! Every warp takes a 2D sample in [0, 1)^2 and is a pure function of it,
//! so the estimator controls all randomness through the generator it owns.

use std::f32::consts::{FRAC_1_PI, FRAC_PI_2, FRAC_PI_4, PI};

use rand::{Rng, RngCore};

use crate::{Vec2, Vec3};

/// Uniform scalar in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform point in [0, 1)^2.
#[inline]
pub fn gen_vec2(rng: &mut dyn RngCore) -> Vec2 {
    Vec2::new(gen_f32(rng), gen_f32(rng))
}

/// Point on the unit disk using the polar mapping (r = sqrt(u), theta = 2 pi v).
pub fn uniform_sample_disk(sample: Vec2) -> Vec2 {
    let radius = sample.x.sqrt();
    let theta = 2.0 * PI * sample.y;
    radius * Vec2::new(theta.cos(), theta.sin())
}

/// Point on the unit disk using Shirley's concentric mapping.
///
/// Preserves relative areas better than [`uniform_sample_disk`], which keeps
/// stratified samples stratified.
pub fn concentric_sample_disk(sample: Vec2) -> Vec2 {
    let offset = 2.0 * sample - Vec2::ONE;
    if offset.x == 0.0 && offset.y == 0.0 {
        return Vec2::ZERO;
    }

    let (radius, theta) = if offset.x.abs() > offset.y.abs() {
        (offset.x, FRAC_PI_4 * offset.y / offset.x)
    } else {
        (offset.y, FRAC_PI_2 - FRAC_PI_4 * offset.x / offset.y)
    };
    radius * Vec2::new(theta.cos(), theta.sin())
}

/// Direction on the +Z hemisphere with uniform solid-angle density.
pub fn uniform_sample_hemisphere(sample: Vec2) -> Vec3 {
    let z = 1.0 - sample.x;
    let s = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * sample.y;
    Vec3::new(s * phi.cos(), s * phi.sin(), z)
}

pub fn uniform_hemisphere_pdf() -> f32 {
    0.5 * FRAC_1_PI
}

/// Direction on the +Z hemisphere with density proportional to cos(theta).
pub fn cosine_sample_hemisphere(sample: Vec2) -> Vec3 {
    let s = sample.x.sqrt();
    let phi = 2.0 * PI * sample.y;
    Vec3::new(s * phi.cos(), s * phi.sin(), (1.0 - sample.x).max(0.0).sqrt())
}

pub fn cosine_hemisphere_pdf(cos_theta: f32) -> f32 {
    cos_theta.max(0.0) * FRAC_1_PI
}

/// Barycentric coordinates of a point uniformly distributed over a triangle.
///
/// Returns `(b0, b1, b2)` weighting vertices 0, 1 and 2.
pub fn uniform_sample_triangle(sample: Vec2) -> Vec3 {
    let s = sample.x.sqrt();
    let u = 1.0 - s;
    let v = s * sample.y;
    Vec3::new(u, v, 1.0 - u - v)
}

/// Barycentric coordinates of `p` with respect to triangle (a, b, c).
///
/// Works for any triangle orientation; `p` is assumed to lie in its plane.
/// Returns `(b0, b1, b2)` with `p = b0 * a + b1 * b + b2 * c`.
pub fn barycentric(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let e1 = b - a;
    let e2 = c - a;
    let ep = p - a;

    let d11 = e1.dot(e1);
    let d12 = e1.dot(e2);
    let d22 = e2.dot(e2);
    let dp1 = ep.dot(e1);
    let dp2 = ep.dot(e2);

    let denom = d11 * d22 - d12 * d12;
    let v = (d22 * dp1 - d12 * dp2) / denom;
    let w = (d11 * dp2 - d12 * dp1) / denom;
    Vec3::new(1.0 - v - w, v, w)
}

/// Mirror `d` about the unit normal `n`.
#[inline]
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - 2.0 * d.dot(n) * n
}
