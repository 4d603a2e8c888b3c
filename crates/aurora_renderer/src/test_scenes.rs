//! Small scenes shared by the render loop tests.

use std::sync::Arc;

use aurora_math::{Color, Vec3};

use crate::{Bsdf, Camera, Scene, Triangle};

/// Upward-facing diffuse floor with a small light hovering over the origin.
pub(crate) fn lit_floor() -> Scene {
    let mut scene = Scene::new();
    scene.add_triangle(
        Triangle::flat(
            Vec3::new(-6.0, 0.0, 6.0),
            Vec3::new(6.0, 0.0, 6.0),
            Vec3::new(0.0, 0.0, -6.0),
            Arc::new(Bsdf::diffuse(Color::splat(0.8))),
        )
        .unwrap(),
    );
    scene
        .add_light(
            Triangle::flat(
                Vec3::new(-0.5, 2.0, 0.5),
                Vec3::new(0.0, 2.0, -0.5),
                Vec3::new(0.5, 2.0, 0.5),
                Arc::new(Bsdf::emissive(Color::splat(10.0))),
            )
            .unwrap(),
        )
        .unwrap();
    scene
}

/// Square-film camera looking down at the origin from above and behind.
pub(crate) fn oblique_camera(size: u32) -> Camera {
    Camera::look_at(
        Vec3::new(0.0, 6.0, 8.0),
        Vec3::ZERO,
        Vec3::Y,
        60f32.to_radians(),
        size,
        size,
    )
    .unwrap()
}
