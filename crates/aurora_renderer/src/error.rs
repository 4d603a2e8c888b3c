//! Errors raised while building scenes or configuring a render.

use aurora_core::MeshError;
use aurora_math::Vec3;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Degenerate triangle with vertices {0:?}")]
    DegenerateTriangle([Vec3; 3]),

    #[error("Light triangles need an emissive BSDF")]
    NotEmissive,

    #[error("Triangle index {index} out of range ({count} triangles)")]
    TriangleIndexOutOfRange { index: usize, count: usize },

    #[error("Degenerate camera: {0}")]
    DegenerateCamera(String),

    #[error("Invalid render options: {0}")]
    InvalidOptions(String),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),
}

pub type RenderResult<T> = Result<T, RenderError>;
