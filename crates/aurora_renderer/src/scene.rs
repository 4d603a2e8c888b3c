//! Triangle scene with a light subset.

use std::ops::Range;
use std::sync::Arc;

use aurora_core::Mesh;
use aurora_math::{Ray, Vec2, Vec3};

use crate::{Bsdf, Intersection, RenderError, RenderResult, Triangle, Vertex};

/// An ordered set of triangles plus the indices of those that can be
/// sampled as lights.
///
/// Every light index addresses an emissive triangle of this scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    triangles: Vec<Triangle>,
    lights: Vec<usize>,
    /// Parallel to `triangles`: membership in `lights`
    is_light: Vec<bool>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triangle and return its index. Emissive triangles are not
    /// sampled as lights unless added through [`Scene::add_light`] or
    /// [`Scene::mark_light`].
    pub fn add_triangle(&mut self, triangle: Triangle) -> usize {
        self.triangles.push(triangle);
        self.is_light.push(false);
        self.triangles.len() - 1
    }

    /// Add an emissive triangle and register it as a light.
    pub fn add_light(&mut self, triangle: Triangle) -> RenderResult<usize> {
        if !triangle.bsdf().is_emissive() {
            return Err(RenderError::NotEmissive);
        }
        let index = self.add_triangle(triangle);
        self.lights.push(index);
        self.is_light[index] = true;
        Ok(index)
    }

    /// Register an existing triangle as a light. Marking twice is a no-op.
    pub fn mark_light(&mut self, index: usize) -> RenderResult<()> {
        let triangle = self
            .triangles
            .get(index)
            .ok_or(RenderError::TriangleIndexOutOfRange {
                index,
                count: self.triangles.len(),
            })?;
        if !triangle.bsdf().is_emissive() {
            return Err(RenderError::NotEmissive);
        }
        if !self.is_light[index] {
            self.is_light[index] = true;
            self.lights.push(index);
        }
        Ok(())
    }

    /// Add every face of `mesh` with the given surface.
    ///
    /// Corners without normals get the face normal; corners without uvs get
    /// (0,0), (1,0), (0,1). Emissive meshes become lights. If any face is
    /// invalid nothing is added.
    pub fn add_mesh(&mut self, mesh: &Mesh, bsdf: Arc<Bsdf>) -> RenderResult<Range<usize>> {
        mesh.validate()?;

        const DEFAULT_UVS: [Vec2; 3] = [Vec2::ZERO, Vec2::X, Vec2::Y];

        let triangles = (0..mesh.triangle_count())
            .map(|face| {
                let corners = [0, 1, 2].map(|k| mesh.corner(face, k));
                let [p0, p1, p2] = corners.map(|c| c.position);
                let face_normal = (p1 - p0)
                    .cross(p2 - p0)
                    .try_normalize()
                    .ok_or(RenderError::DegenerateTriangle([p0, p1, p2]))?;

                let mut vertices = [Vertex::new(Vec3::ZERO, face_normal, Vec2::ZERO); 3];
                for (k, (vertex, corner)) in vertices.iter_mut().zip(corners).enumerate() {
                    vertex.position = corner.position;
                    vertex.normal = corner
                        .normal
                        .and_then(|n| n.try_normalize())
                        .unwrap_or(face_normal);
                    vertex.uv = corner.uv.unwrap_or(DEFAULT_UVS[k]);
                }
                Triangle::new(vertices, bsdf.clone())
            })
            .collect::<RenderResult<Vec<_>>>()?;

        let start = self.triangles.len();
        self.triangles.extend(triangles);
        let range = start..self.triangles.len();
        let emissive = bsdf.is_emissive();
        self.is_light.resize(self.triangles.len(), emissive);
        if emissive {
            self.lights.extend(range.clone());
        }

        log::debug!(
            "Added mesh: {} triangles ({} total, {} lights)",
            range.len(),
            self.triangles.len(),
            self.lights.len()
        );
        Ok(range)
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Get triangle `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; indices come from this scene's
    /// own intersection results and light list.
    pub fn triangle(&self, index: usize) -> &Triangle {
        &self.triangles[index]
    }

    /// Indices of the light triangles.
    pub fn lights(&self) -> &[usize] {
        &self.lights
    }

    /// Whether triangle `index` is in the light subset. False for
    /// out-of-range indices.
    pub fn is_light(&self, index: usize) -> bool {
        self.is_light.get(index).copied().unwrap_or(false)
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Find the nearest triangle hit by `ray`.
    ///
    /// Linear scan; this is the single entry point an acceleration
    /// structure would replace. On equal distances the lower index wins.
    pub fn intersects(&self, ray: &Ray) -> Option<Intersection> {
        let mut nearest = None;
        let mut ray_t = ray.t;

        for (index, triangle) in self.triangles.iter().enumerate() {
            if let Some(distance) = triangle.intersect_within(ray, ray_t) {
                nearest = Some(Intersection::new(distance, index));
                ray_t = ray_t.with_max(distance);
            }
        }

        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_math::Color;

    fn grey() -> Arc<Bsdf> {
        Arc::new(Bsdf::diffuse(Color::splat(0.5)))
    }

    fn light() -> Arc<Bsdf> {
        Arc::new(Bsdf::emissive(Color::ONE))
    }

    /// Unit-ish triangle facing +Z at height z, shifted sideways by dx.
    fn quad_half(z: f32, dx: f32, bsdf: Arc<Bsdf>) -> Triangle {
        Triangle::flat(
            Vec3::new(-1.0 + dx, -1.0, z),
            Vec3::new(1.0 + dx, -1.0, z),
            Vec3::new(dx, 1.0, z),
            bsdf,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_scene_misses() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert!(scene.intersects(&Ray::new(Vec3::ZERO, -Vec3::Z)).is_none());
    }

    #[test]
    fn test_nearest_hit_is_order_independent() {
        let depths = [-5.0, -2.0, -9.0, -3.5];
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), -Vec3::Z);

        // Every rotation of the insertion order must pick the z = -2 triangle
        for shift in 0..depths.len() {
            let mut scene = Scene::new();
            for i in 0..depths.len() {
                scene.add_triangle(quad_half(depths[(i + shift) % depths.len()], 0.0, grey()));
            }

            let hit = scene.intersects(&ray).unwrap();
            assert!((hit.distance - 3.0).abs() < 1e-5);
            let z = scene.triangle(hit.index).vertices()[0].position.z;
            assert_eq!(z, -2.0);
        }
    }

    #[test]
    fn test_miss_between_triangles() {
        let mut scene = Scene::new();
        scene.add_triangle(quad_half(0.0, -5.0, grey()));
        scene.add_triangle(quad_half(0.0, 5.0, grey()));

        assert!(scene.intersects(&Ray::new(Vec3::new(0.0, 0.0, 1.0), -Vec3::Z)).is_none());
        let hit = scene
            .intersects(&Ray::new(Vec3::new(5.0, 0.0, 1.0), -Vec3::Z))
            .unwrap();
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn test_lights() {
        let mut scene = Scene::new();
        scene.add_triangle(quad_half(0.0, 0.0, grey()));
        let emitter = scene.add_triangle(quad_half(5.0, 0.0, light()));
        assert_eq!(scene.light_count(), 0);
        assert!(!scene.is_light(emitter));

        scene.mark_light(emitter).unwrap();
        scene.mark_light(emitter).unwrap();
        assert_eq!(scene.lights(), &[emitter]);
        assert!(scene.is_light(emitter));
        assert!(!scene.is_light(0));
        assert!(!scene.is_light(7));

        assert!(matches!(scene.mark_light(0), Err(RenderError::NotEmissive)));
        assert!(matches!(
            scene.mark_light(7),
            Err(RenderError::TriangleIndexOutOfRange { index: 7, count: 2 })
        ));

        let second = scene.add_light(quad_half(6.0, 0.0, light())).unwrap();
        assert_eq!(scene.lights(), &[emitter, second]);
        assert!(scene.is_light(second));
        assert!(matches!(
            scene.add_light(quad_half(7.0, 0.0, grey())),
            Err(RenderError::NotEmissive)
        ));
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_add_mesh() {
        let mesh = Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        );

        let mut scene = Scene::new();
        scene.add_triangle(quad_half(-1.0, 0.0, grey()));
        let range = scene.add_mesh(&mesh, light()).unwrap();

        assert_eq!(range, 1..3);
        assert_eq!(scene.lights(), &[1, 2]);
        assert_eq!((0..3).map(|i| scene.is_light(i)).collect::<Vec<_>>(), [false, true, true]);

        let grey_range = scene.add_mesh(&mesh, grey()).unwrap();
        assert!(grey_range.clone().all(|i| !scene.is_light(i)));
        let tri = scene.triangle(2);
        assert_eq!(tri.vertices()[2].uv, Vec2::Y);
        assert_eq!(tri.vertices()[0].normal, Vec3::Z);
    }

    #[test]
    fn test_add_mesh_rejects_degenerate_face_atomically() {
        let mesh = Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, 2.0 * Vec3::X],
            vec![0, 1, 2, 0, 1, 3],
        );

        let mut scene = Scene::new();
        assert!(matches!(
            scene.add_mesh(&mesh, grey()),
            Err(RenderError::DegenerateTriangle(_))
        ));
        assert!(scene.is_empty());

        let broken = Mesh::new(vec![Vec3::ZERO], vec![0, 1, 2]);
        assert!(matches!(scene.add_mesh(&broken, grey()), Err(RenderError::Mesh(_))));
    }
}
