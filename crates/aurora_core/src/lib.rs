//! Aurora Core - mesh and image I/O for the Aurora path tracer.
//!
//! This crate provides:
//!
//! - **Mesh**: indexed triangle geometry with optional normals and UVs
//! - **OBJ**: Wavefront OBJ reading and writing
//! - **Image**: a linear RGB pixel buffer with exposure/gamma post-processing
//! - **PPM/PNG**: binary P6 pixel dumps and PNG export
//!
//! # Example
//!
//! ```ignore
//! use aurora_core::{read_obj, Image, write_ppm};
//!
//! let mesh = read_obj("bunny.obj")?;
//! println!("Loaded {} triangles", mesh.triangle_count());
//!
//! let image = Image::new(64, 64);
//! write_ppm("black.ppm", &image)?;
//! ```

pub mod image;
pub mod mesh;
pub mod obj;
pub mod ppm;

// Re-export commonly used types
pub use crate::image::{save_png, Image, ImageError, ImageResult};
pub use mesh::{Corner, Mesh, MeshError, MeshResult};
pub use obj::{parse_obj, read_obj, write_obj};
pub use ppm::{read_ppm, write_ppm};
