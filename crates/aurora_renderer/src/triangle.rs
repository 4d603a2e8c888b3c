//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use aurora_math::sampling::{barycentric, uniform_sample_triangle};
use aurora_math::{Frame, Interval, Ray, Vec2, Vec3};

use crate::{Bsdf, RenderError, RenderResult, ShadingPoint};

/// Determinant magnitude below which a ray counts as parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A triangle corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// A triangle owning its three vertices, counter-clockwise.
#[derive(Debug, Clone)]
pub struct Triangle {
    vertices: [Vertex; 3],
    bsdf: Arc<Bsdf>,
    /// Unit face normal, following the winding
    normal: Vec3,
    area: f32,
}

impl Triangle {
    /// Create a triangle, rejecting zero-area (or non-finite) geometry.
    pub fn new(vertices: [Vertex; 3], bsdf: Arc<Bsdf>) -> RenderResult<Self> {
        let [p0, p1, p2] = vertices.map(|v| v.position);
        let cross = (p1 - p0).cross(p2 - p0);
        let area = 0.5 * cross.length();

        let normal = match cross.try_normalize() {
            Some(n) if area > 0.0 && area.is_finite() => n,
            _ => return Err(RenderError::DegenerateTriangle([p0, p1, p2])),
        };

        Ok(Self {
            vertices,
            bsdf,
            normal,
            area,
        })
    }

    /// Create a flat-shaded triangle from positions alone.
    ///
    /// Every corner gets the face normal; uvs are (0,0), (1,0), (0,1).
    pub fn flat(p0: Vec3, p1: Vec3, p2: Vec3, bsdf: Arc<Bsdf>) -> RenderResult<Self> {
        let normal = (p1 - p0)
            .cross(p2 - p0)
            .try_normalize()
            .ok_or(RenderError::DegenerateTriangle([p0, p1, p2]))?;

        Self::new(
            [
                Vertex::new(p0, normal, Vec2::ZERO),
                Vertex::new(p1, normal, Vec2::X),
                Vertex::new(p2, normal, Vec2::Y),
            ],
            bsdf,
        )
    }

    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    pub fn bsdf(&self) -> &Bsdf {
        &self.bsdf
    }

    /// Shared handle to the surface descriptor.
    pub fn bsdf_handle(&self) -> &Arc<Bsdf> {
        &self.bsdf
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn geometric_normal(&self) -> Vec3 {
        self.normal
    }

    /// Intersect within the ray's own parametric range.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        self.intersect_within(ray, ray.t)
    }

    /// Möller-Trumbore intersection, returning the hit distance.
    ///
    /// Barycentric bounds are closed, so a ray through a shared edge may
    /// report both neighbours; the scene keeps the first one it finds.
    /// The distance must lie strictly inside `ray_t`.
    pub fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let [v0, v1, v2] = self.vertices.map(|v| v.position);
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        ray_t.surrounds(t).then_some(t)
    }

    /// Build the shading point for a hit at `distance` along `ray`.
    pub fn shade(&self, ray: &Ray, distance: f32) -> ShadingPoint {
        let point = ray.at(distance);
        let [a, b, c] = self.vertices;
        let w = barycentric(point, a.position, b.position, c.position);

        let interpolated = w.x * a.normal + w.y * b.normal + w.z * c.normal;
        let uv = w.x * a.uv + w.y * b.uv + w.z * c.uv;

        let mut geometric_normal = self.normal;
        let mut normal = interpolated.try_normalize().unwrap_or(geometric_normal);

        // Face both normals towards the viewer
        if geometric_normal.dot(ray.direction()) > 0.0 {
            geometric_normal = -geometric_normal;
        }
        if normal.dot(geometric_normal) < 0.0 {
            normal = -normal;
        }

        ShadingPoint {
            point,
            normal,
            geometric_normal,
            uv,
            frame: Frame::from_normal(normal),
            wo: -ray.direction(),
            light: None,
        }
    }

    /// Map a uniform 2D sample to a point distributed uniformly by area.
    pub fn sample_point(&self, sample: Vec2) -> Vec3 {
        let w = uniform_sample_triangle(sample);
        let [a, b, c] = self.vertices.map(|v| v.position);
        w.x * a + w.y * b + w.z * c
    }
}
