//! Simple path tracer example.
//!
//! Renders a red triangle lit by a small white triangle and saves to PPM.
//!
//! Run with: cargo run --example simple_render -p aurora_renderer

use std::sync::Arc;

use aurora_core::write_ppm;
use aurora_renderer::{
    post_process, render_parallel, Bsdf, Camera, Color, RenderOptions, Scene, Triangle, Vec3,
};

fn main() {
    env_logger::init();

    println!("Aurora Path Tracer - Simple Example");
    println!("===================================");

    let start = std::time::Instant::now();
    let scene = build_scene();
    println!("Scene built in {:?}", start.elapsed());

    let options = RenderOptions {
        width: 256,
        height: 256,
        camera_samples: 16,
        ..Default::default()
    };
    let camera = Camera::look_at(
        Vec3::new(1.0, 1.0, 35.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::Y,
        45f32.to_radians(),
        options.width,
        options.height,
    )
    .expect("Camera basis");

    println!(
        "Rendering {}x{} @ {} spp...",
        options.width, options.height, options.camera_samples
    );

    let start = std::time::Instant::now();
    let mut image = render_parallel(&scene, &camera, &options, |_| {}).expect("Render failed");
    println!("Rendered in {:?}", start.elapsed());

    post_process(&mut image, &options);

    let filename = "output.ppm";
    write_ppm(filename, &image).expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let red = Arc::new(Bsdf::diffuse(Color::new(1.0, 0.0, 0.0)));
    let white = Arc::new(Bsdf::emissive(Color::ONE));

    scene.add_triangle(
        Triangle::flat(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            red,
        )
        .expect("Receiver triangle"),
    );
    scene
        .add_light(
            Triangle::flat(
                Vec3::new(2.0, 0.0, 10.0),
                Vec3::new(4.0, 0.0, 10.0),
                Vec3::new(3.0, 2.0, 10.0),
                white,
            )
            .expect("Light triangle"),
        )
        .expect("Light is emissive");

    scene
}
