//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon.

use std::time::Instant;

use aurora_core::Image;
use rayon::prelude::*;

use crate::renderer::{check_setup, render_pixel};
use crate::{Camera, Color, PathTracer, RenderOptions, RenderResult, Scene};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets closest to the image center come first, so the middle of the
/// frame resolves earliest.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from the image center. The sort is stable, so
/// equidistant buckets keep row-major order.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Pixel colors in row-major order within the bucket
    pub pixels: Vec<Color>,
}

/// Render a single bucket.
pub fn render_bucket(
    bucket: &Bucket,
    tracer: &PathTracer,
    camera: &Camera,
    options: &RenderOptions,
) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = render_pixel(tracer, camera, bucket.x + local_x, bucket.y + local_y, options);
            pixels.push(color);
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
    }
}

/// Render the scene with buckets spread over the current rayon pool.
///
/// `on_bucket` is called from worker threads as each bucket completes.
/// The image is identical to [`crate::render`] for the same options.
pub fn render_parallel<F>(
    scene: &Scene,
    camera: &Camera,
    options: &RenderOptions,
    on_bucket: F,
) -> RenderResult<Image>
where
    F: Fn(&BucketResult) + Sync,
{
    check_setup(camera, options)?;
    let tracer = PathTracer::new(scene, options);
    let buckets = generate_buckets(options.width, options.height, options.bucket_size);

    log::info!(
        "Rendering {}x{} in {} buckets on {} threads ({} spp, depth {})",
        options.width,
        options.height,
        buckets.len(),
        rayon::current_num_threads(),
        options.camera_samples,
        options.max_depth
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, &tracer, camera, options);
            on_bucket(&result);
            result
        })
        .collect();

    let mut image = Image::new(options.width, options.height);
    for result in &results {
        let bucket = result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let i = i as u32;
            image.set(bucket.x + i % bucket.width, bucket.y + i / bucket.width, *color);
        }
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}
