//! Render options and the serial render loop.
//!
//! Each pixel draws from its own generator seeded from (seed, x, y), so the
//! serial loop and the bucketed parallel loop produce identical images.

use std::time::Instant;

use aurora_core::Image;
use aurora_math::sampling::gen_vec2;
use aurora_math::{Color, Vec2};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::{Camera, PathTracer, RenderError, RenderResult, Scene};

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Maximum number of bounces after the camera hit (0 = direct only)
    pub max_depth: u32,
    /// Jittered camera rays per pixel
    pub camera_samples: u32,
    /// Light samples per direct estimate
    pub light_samples: u32,
    /// Continuations at the first diffuse bounce of each camera path
    pub diffuse_samples: u32,
    /// Reconstruction filter width in pixels; carried for output writers,
    /// the box-averaging loop ignores it
    pub filter_width: f32,
    pub gamma: f32,
    /// Photographic stops applied before gamma
    pub exposure: f32,
    /// Radiance of rays that leave the scene
    pub background: Color,
    pub seed: u64,
    /// Tile edge for parallel rendering
    pub bucket_size: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            max_depth: 1,
            camera_samples: 4,
            light_samples: 1,
            diffuse_samples: 1,
            filter_width: 2.0,
            gamma: 2.2,
            exposure: 0.0,
            background: Color::ZERO,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderOptions {
    /// Reject configurations the render loop cannot run with.
    pub fn validate(&self) -> RenderResult<()> {
        let invalid = |message: String| Err(RenderError::InvalidOptions(message));

        if self.width == 0 || self.height == 0 {
            return invalid(format!("resolution {}x{} is empty", self.width, self.height));
        }
        for (name, value) in [
            ("camera_samples", self.camera_samples),
            ("light_samples", self.light_samples),
            ("diffuse_samples", self.diffuse_samples),
            ("bucket_size", self.bucket_size),
        ] {
            if value == 0 {
                return invalid(format!("{name} must be at least 1"));
            }
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return invalid(format!("gamma {} must be positive", self.gamma));
        }
        if !self.exposure.is_finite() {
            return invalid(format!("exposure {} is not finite", self.exposure));
        }
        if !(self.filter_width.is_finite() && self.filter_width >= 0.0) {
            return invalid(format!("filter width {} is invalid", self.filter_width));
        }
        if !self.background.is_finite() || self.background.min_element() < 0.0 {
            return invalid(format!("background {} is invalid", self.background));
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Generator for pixel (x, y) under `seed`.
pub fn pixel_rng(seed: u64, x: u32, y: u32) -> Xoshiro256PlusPlus {
    let key = (u64::from(y) << 32) | u64::from(x);
    Xoshiro256PlusPlus::seed_from_u64(seed ^ key.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Average `camera_samples` jittered estimates for pixel (x, y).
pub fn render_pixel(tracer: &PathTracer, camera: &Camera, x: u32, y: u32, options: &RenderOptions) -> Color {
    let mut rng = pixel_rng(options.seed, x, y);
    let mut pixel_color = Color::ZERO;

    for _ in 0..options.camera_samples {
        let jitter = gen_vec2(&mut rng) - Vec2::splat(0.5);
        let ray = camera.generate_ray(x, y, jitter);
        pixel_color += tracer.trace(ray, &mut rng);
    }

    pixel_color / options.camera_samples as f32
}

/// Check that the options are runnable and match the camera film.
pub(crate) fn check_setup(camera: &Camera, options: &RenderOptions) -> RenderResult<()> {
    options.validate()?;
    if camera.width() != options.width || camera.height() != options.height {
        return Err(RenderError::InvalidOptions(format!(
            "camera film {}x{} does not match resolution {}x{}",
            camera.width(),
            camera.height(),
            options.width,
            options.height
        )));
    }
    Ok(())
}

/// Render the scene one pixel at a time on the calling thread.
///
/// The result is linear radiance; see [`post_process`].
pub fn render(scene: &Scene, camera: &Camera, options: &RenderOptions) -> RenderResult<Image> {
    check_setup(camera, options)?;
    let tracer = PathTracer::new(scene, options);
    let mut image = Image::new(options.width, options.height);

    log::info!(
        "Rendering {}x{} ({} spp, depth {}, {} triangles, {} lights)",
        options.width,
        options.height,
        options.camera_samples,
        options.max_depth,
        scene.len(),
        scene.light_count()
    );
    let start = Instant::now();

    for y in 0..options.height {
        for x in 0..options.width {
            let color = render_pixel(&tracer, camera, x, y, options);
            image.set(x, y, color);
        }
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}

/// Apply exposure, then gamma, then clip to [0, 1].
pub fn post_process(image: &mut Image, options: &RenderOptions) {
    image.apply_exposure(options.exposure);
    image.apply_gamma(options.gamma);
    image.saturate();
}
