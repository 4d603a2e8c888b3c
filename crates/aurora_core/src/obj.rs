//! Wavefront OBJ reading and writing.
//!
//! Supported statements:
//! - `v x y z`, `vt u v`, `vn x y z`
//! - `f` with `i`, `i/t`, `i//n` or `i/t/n` corners (1-based, negative
//!   indices are relative to the end); polygons are fan-triangulated
//!
//! Everything else (`o`, `g`, `s`, `usemtl`, `mtllib`, ...) is skipped.
//! Any malformed line fails the whole load so callers never see a partial mesh.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use aurora_math::{Vec2, Vec3};

use crate::mesh::{Mesh, MeshError, MeshResult};

/// Read and parse an OBJ file.
pub fn read_obj(path: impl AsRef<Path>) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let mesh = parse_obj(&content)?;
    log::debug!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ text into a validated mesh.
pub fn parse_obj(content: &str) -> MeshResult<Mesh> {
    let mut parser = ObjParser::default();
    for (i, line) in content.lines().enumerate() {
        parser.parse_line(i + 1, line)?;
    }
    parser.finish()
}

/// Write a mesh as OBJ text.
pub fn write_obj(path: impl AsRef<Path>, mesh: &Mesh) -> MeshResult<()> {
    mesh.validate()?;
    fs::write(path, format_obj(mesh))?;
    Ok(())
}

fn format_obj(mesh: &Mesh) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    for p in &mesh.positions {
        let _ = writeln!(out, "v {:.5} {:.5} {:.5}", p.x, p.y, p.z);
    }
    if mesh.has_uvs() {
        for t in &mesh.uvs {
            let _ = writeln!(out, "vt {:.5} {:.5}", t.x, t.y);
        }
    }
    if mesh.has_normals() {
        for n in &mesh.normals {
            let _ = writeln!(out, "vn {:.5} {:.5} {:.5}", n.x, n.y, n.z);
        }
    }

    for (face, slots) in mesh.indices.chunks_exact(3).enumerate() {
        out.push('f');
        for (k, &vi) in slots.iter().enumerate() {
            let slot = face * 3 + k;
            let _ = write!(out, " {}", vi + 1);
            match (&mesh.uv_indices, &mesh.normal_indices) {
                (Some(t), Some(n)) => {
                    let _ = write!(out, "/{}/{}", t[slot] + 1, n[slot] + 1);
                }
                (Some(t), None) => {
                    let _ = write!(out, "/{}", t[slot] + 1);
                }
                (None, Some(n)) => {
                    let _ = write!(out, "//{}", n[slot] + 1);
                }
                (None, None) => {}
            }
        }
        out.push('\n');
    }

    out
}

/// One parsed face corner: position, optional uv and optional normal index.
type FaceCorner = (u32, Option<u32>, Option<u32>);

#[derive(Default)]
struct ObjParser {
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    uv_indices: Vec<u32>,
    normal_indices: Vec<u32>,
    /// Whether faces carry uvs/normals; fixed by the first face
    layout: Option<(bool, bool)>,
    skipped: usize,
}

impl ObjParser {
    fn parse_line(&mut self, line_no: usize, line: &str) -> MeshResult<()> {
        let line = line.split('#').next().unwrap_or("").trim();
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();

        match keyword {
            "v" => {
                let [x, y, z] = parse_floats::<3>(line_no, &args)?;
                self.positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(line_no, &args)?;
                self.uvs.push(Vec2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(line_no, &args)?;
                self.normals.push(Vec3::new(x, y, z));
            }
            "f" => self.parse_face(line_no, &args)?,
            _ => self.skipped += 1,
        }
        Ok(())
    }

    fn parse_face(&mut self, line_no: usize, args: &[&str]) -> MeshResult<()> {
        if args.len() < 3 {
            return Err(parse_error(
                line_no,
                format!("face needs at least 3 corners, got {}", args.len()),
            ));
        }

        let corners = args
            .iter()
            .map(|corner| self.parse_corner(line_no, corner))
            .collect::<MeshResult<Vec<FaceCorner>>>()?;

        let layout = (corners[0].1.is_some(), corners[0].2.is_some());
        let expected = *self.layout.get_or_insert(layout);
        if corners
            .iter()
            .any(|c| (c.1.is_some(), c.2.is_some()) != expected)
        {
            return Err(parse_error(
                line_no,
                "face corners mix attribute layouts".to_string(),
            ));
        }

        // Fan triangulation around the first corner
        for i in 1..corners.len() - 1 {
            for corner in [corners[0], corners[i], corners[i + 1]] {
                self.indices.push(corner.0);
                if let Some(t) = corner.1 {
                    self.uv_indices.push(t);
                }
                if let Some(n) = corner.2 {
                    self.normal_indices.push(n);
                }
            }
        }
        Ok(())
    }

    fn parse_corner(&self, line_no: usize, corner: &str) -> MeshResult<FaceCorner> {
        let mut parts = corner.split('/');
        let position = match parts.next() {
            Some(p) if !p.is_empty() => resolve_index(line_no, p, self.positions.len())?,
            _ => return Err(parse_error(line_no, format!("missing vertex index in '{corner}'"))),
        };
        let uv = match parts.next() {
            Some(t) if !t.is_empty() => Some(resolve_index(line_no, t, self.uvs.len())?),
            _ => None,
        };
        let normal = match parts.next() {
            Some(n) if !n.is_empty() => Some(resolve_index(line_no, n, self.normals.len())?),
            _ => None,
        };
        if parts.next().is_some() {
            return Err(parse_error(line_no, format!("too many components in '{corner}'")));
        }
        Ok((position, uv, normal))
    }

    fn finish(self) -> MeshResult<Mesh> {
        if self.skipped > 0 {
            log::warn!("Ignored {} unsupported OBJ statements", self.skipped);
        }

        let (has_uvs, has_normals) = self.layout.unwrap_or((false, false));
        let mut mesh = Mesh::new(self.positions, self.indices);
        if has_normals {
            mesh = mesh.with_normals(self.normals, self.normal_indices);
        }
        if has_uvs {
            mesh = mesh.with_uvs(self.uvs, self.uv_indices);
        }
        mesh.validate()?;
        Ok(mesh)
    }
}

fn parse_error(line: usize, message: String) -> MeshError {
    MeshError::Parse { line, message }
}

fn parse_floats<const N: usize>(line_no: usize, args: &[&str]) -> MeshResult<[f32; N]> {
    if args.len() < N {
        return Err(parse_error(
            line_no,
            format!("expected {N} numbers, got {}", args.len()),
        ));
    }

    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(args) {
        *slot = token
            .parse()
            .map_err(|_| parse_error(line_no, format!("invalid number '{token}'")))?;
    }
    Ok(out)
}

/// Convert a 1-based (or negative, relative) OBJ index into a 0-based one.
fn resolve_index(line_no: usize, token: &str, count: usize) -> MeshResult<u32> {
    let raw: i64 = token
        .parse()
        .map_err(|_| parse_error(line_no, format!("invalid index '{token}'")))?;

    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => Some(count as i64 + r),
    };

    match resolved {
        Some(i) if i >= 0 && (i as usize) < count => Ok(i as u32),
        _ => Err(parse_error(
            line_no,
            format!("index {raw} out of range ({count} defined so far)"),
        )),
    }
}
