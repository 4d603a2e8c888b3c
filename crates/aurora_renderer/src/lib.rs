//! Aurora Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over flat triangle scenes: Möller-Trumbore
//! intersection, explicit light sampling for direct light, cosine-weighted
//! bounces for indirect light, and a jittered multi-sample render loop.

mod bsdf;
mod bucket;
mod camera;
mod error;
mod integrator;
mod intersection;
mod renderer;
mod scene;
mod shading;
mod triangle;

#[cfg(test)]
mod test_scenes;

pub use bsdf::{Bsdf, BsdfSample};
pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult};
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use integrator::PathTracer;
pub use intersection::Intersection;
pub use renderer::{
    pixel_rng, post_process, render, render_pixel, RenderOptions, DEFAULT_BUCKET_SIZE,
};
pub use scene::Scene;
pub use shading::{LightSample, ShadingPoint};
pub use triangle::{Triangle, Vertex};

/// Re-export common math types from aurora_math
pub use aurora_math::{Color, Ray, Vec2, Vec3};
