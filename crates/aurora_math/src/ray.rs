use crate::{Interval, Vec3};

/// Smallest accepted hit distance along a ray.
///
/// Rays spawned on a surface would otherwise re-hit that surface at `t ~ 0`
/// ("shadow acne").
pub const RAY_EPSILON: f32 = 1e-4;

/// A ray in 3D space with a normalized direction and a parametric domain.
///
/// A hit at parameter `t` is only valid when `t` lies strictly inside `t`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t: Interval,
}

impl Ray {
    /// Create a ray covering `(RAY_EPSILON, +inf)`.
    ///
    /// The direction is normalized; callers never need to pre-normalize.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_interval(origin, direction, Interval::new(RAY_EPSILON, f32::INFINITY))
    }

    /// Create a ray with an explicit parametric domain.
    pub fn with_interval(origin: Vec3, direction: Vec3, t: Interval) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            t,
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the (unit length) direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
