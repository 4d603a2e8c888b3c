//! Indexed triangle geometry.
//!
//! Positions, normals and UVs are stored in independent arrays, each with
//! its own index stream, mirroring how OBJ files address them. The renderer
//! resolves every corner into an owned vertex when it builds its scene.

use aurora_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors that can occur while loading or validating a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{kind} index {index} out of range ({count} available)")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        count: usize,
    },

    #[error("Inconsistent index streams: {0}")]
    InconsistentIndices(String),
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A fully resolved triangle corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub position: Vec3,
    pub normal: Option<Vec3>,
    pub uv: Option<Vec2>,
}

/// A triangle mesh with OBJ-style attribute streams.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,

    /// Shading normals (addressed by `normal_indices`)
    pub normals: Vec<Vec3>,

    /// Texture coordinates (addressed by `uv_indices`)
    pub uvs: Vec<Vec2>,

    /// Position indices (every 3 indices form a triangle, counter-clockwise)
    pub indices: Vec<u32>,

    /// Per-corner normal indices, parallel to `indices`
    pub normal_indices: Option<Vec<u32>>,

    /// Per-corner UV indices, parallel to `indices`
    pub uv_indices: Option<Vec<u32>>,
}

impl Mesh {
    /// Create a mesh from positions and triangle indices only.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            ..Default::default()
        }
    }

    /// Attach normals with their own per-corner index stream.
    pub fn with_normals(mut self, normals: Vec<Vec3>, normal_indices: Vec<u32>) -> Self {
        self.normals = normals;
        self.normal_indices = Some(normal_indices);
        self
    }

    /// Attach texture coordinates with their own per-corner index stream.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>, uv_indices: Vec<u32>) -> Self {
        self.uvs = uvs;
        self.uv_indices = Some(uv_indices);
        self
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertex positions in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn has_normals(&self) -> bool {
        self.normal_indices.is_some()
    }

    pub fn has_uvs(&self) -> bool {
        self.uv_indices.is_some()
    }

    /// Resolve corner `k` (0..3) of triangle `triangle`.
    ///
    /// # Panics
    ///
    /// Panics if the triangle or any referenced attribute is out of range.
    /// Call [`Mesh::validate`] first for untrusted data.
    pub fn corner(&self, triangle: usize, k: usize) -> Corner {
        assert!(k < 3, "corner index {k} out of range");
        let slot = triangle * 3 + k;

        Corner {
            position: self.positions[self.indices[slot] as usize],
            normal: self
                .normal_indices
                .as_ref()
                .map(|ni| self.normals[ni[slot] as usize]),
            uv: self.uv_indices.as_ref().map(|ti| self.uvs[ti[slot] as usize]),
        }
    }

    /// Check index stream lengths and that every index addresses an element.
    pub fn validate(&self) -> MeshResult<()> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::InconsistentIndices(format!(
                "{} position indices is not a multiple of 3",
                self.indices.len()
            )));
        }

        check_stream("position", &self.indices, self.positions.len())?;

        for (kind, stream, count) in [
            ("normal", &self.normal_indices, self.normals.len()),
            ("uv", &self.uv_indices, self.uvs.len()),
        ] {
            if let Some(stream) = stream {
                if stream.len() != self.indices.len() {
                    return Err(MeshError::InconsistentIndices(format!(
                        "{} {kind} indices for {} corners",
                        stream.len(),
                        self.indices.len()
                    )));
                }
                check_stream(kind, stream, count)?;
            }
        }

        Ok(())
    }

    /// Compute smooth vertex normals by averaging area-weighted face normals.
    ///
    /// Replaces any existing normals; the normal stream reuses the position
    /// indices. Faces are assumed counter-clockwise.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            // Unreferenced or fully degenerate vertices get a default up normal
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = normals;
        self.normal_indices = Some(self.indices.clone());
    }
}

fn check_stream(kind: &'static str, stream: &[u32], count: usize) -> MeshResult<()> {
    match stream.iter().find(|&&i| i as usize >= count) {
        Some(&index) => Err(MeshError::IndexOutOfRange {
            kind,
            index: index as usize,
            count,
        }),
        None => Ok(()),
    }
}
