//! Pinhole camera for ray generation.

use std::f32::consts::PI;

use aurora_math::{look_at, Mat4, Ray, Vec2, Vec3};

use crate::{RenderError, RenderResult};

/// A pinhole camera looking down its local -Z axis.
///
/// `fov` is the vertical field of view in radians; the film size only sets
/// the aspect ratio and the pixel-to-NDC mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    fov: f32,
    width: u32,
    height: u32,
    camera_to_world: Mat4,
}

impl Camera {
    /// Create a camera from an explicit camera-to-world transform.
    pub fn new(fov: f32, width: u32, height: u32, camera_to_world: Mat4) -> RenderResult<Self> {
        if !(fov > 0.0 && fov < PI) {
            return Err(RenderError::DegenerateCamera(format!(
                "field of view {fov} rad outside (0, pi)"
            )));
        }
        if width == 0 || height == 0 {
            return Err(RenderError::DegenerateCamera(format!(
                "empty film {width}x{height}"
            )));
        }

        Ok(Self {
            fov,
            width,
            height,
            camera_to_world,
        })
    }

    /// Place a camera at `eye` looking towards `target`.
    pub fn look_at(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov: f32,
        width: u32,
        height: u32,
    ) -> RenderResult<Self> {
        let camera_to_world = look_at(eye, target, up).ok_or_else(|| {
            RenderError::DegenerateCamera(format!(
                "no basis for eye {eye}, target {target}, up {up}"
            ))
        })?;
        Self::new(fov, width, height, camera_to_world)
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn camera_to_world(&self) -> Mat4 {
        self.camera_to_world
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Generate the ray through pixel (x, y), offset by `jitter` in
    /// [-0.5, 0.5]^2. Row 0 is the top of the image.
    pub fn generate_ray(&self, x: u32, y: u32, jitter: Vec2) -> Ray {
        let ndc = Vec2::new(
            (x as f32 + 0.5 + jitter.x) / self.width as f32,
            (y as f32 + 0.5 + jitter.y) / self.height as f32,
        );

        let scale = (0.5 * self.fov).tan();
        let screen = Vec2::new(
            (2.0 * ndc.x - 1.0) * self.aspect_ratio() * scale,
            (1.0 - 2.0 * ndc.y) * scale,
        );

        let origin = self.camera_to_world.transform_point3(Vec3::ZERO);
        let near = self
            .camera_to_world
            .transform_point3(Vec3::new(screen.x, screen.y, -1.0));
        Ray::new(origin, near - origin)
    }
}
