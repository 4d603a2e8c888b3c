//! Local surface data at a ray hit.

use aurora_math::{Frame, Ray, Vec2, Vec3};

/// A point sampled on a light, as seen from a shading point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Index of the light triangle in the scene
    pub index: usize,
    pub point: Vec3,
    /// Geometric normal of the light at `point`
    pub normal: Vec3,
    /// Unit direction from the shading point towards `point`
    pub direction: Vec3,
    pub distance: f32,
}

/// Surface quantities at an intersection, rebuilt for every hit.
///
/// Both normals are flipped to face the incoming ray, so `wo` is always in
/// the upper hemisphere of the geometric normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingPoint {
    /// World-space hit position
    pub point: Vec3,
    /// Interpolated, renormalized shading normal
    pub normal: Vec3,
    pub geometric_normal: Vec3,
    pub uv: Vec2,
    /// Tangent frame around `normal`
    pub frame: Frame,
    /// Unit direction back along the incoming ray
    pub wo: Vec3,
    /// Filled in by light sampling
    pub light: Option<LightSample>,
}

impl ShadingPoint {
    /// Ray leaving this point in `direction`.
    pub fn spawn_ray(&self, direction: Vec3) -> Ray {
        Ray::new(self.point, direction)
    }
}
