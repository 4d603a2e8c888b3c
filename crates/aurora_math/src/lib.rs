//! Aurora math - vectors, rays and sampling utilities.
//!
//! Thin layer over `glam` with the few extra pieces the path tracer needs:
//! parametric intervals, rays, color post-processing, tangent frames,
//! the look-at transform and the uniform sampling warps.

// Re-export glam for convenience
pub use glam::*;

mod color;
mod frame;
mod interval;
mod ray;
pub mod sampling;
mod transform;

pub use color::{Color, ColorExt};
pub use frame::Frame;
pub use interval::Interval;
pub use ray::{Ray, RAY_EPSILON};
pub use transform::{look_at, Mat4Ext};
