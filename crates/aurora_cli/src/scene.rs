//! Scenes the binary knows how to build.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use aurora_core::read_obj;
use aurora_math::{Color, Vec3};
use aurora_renderer::{Bsdf, Scene, Triangle};

/// A scene plus the camera placement that frames it.
pub(crate) struct SceneSetup {
    pub(crate) scene: Scene,
    pub(crate) eye: Vec3,
    pub(crate) target: Vec3,
}

/// Diffuse floor, a red triangle, a mirror panel and a single triangular light.
pub(crate) fn demo_scene() -> anyhow::Result<SceneSetup> {
    let mut scene = Scene::new();

    let floor = Arc::new(Bsdf::diffuse(Color::splat(0.75)));
    let red = Arc::new(Bsdf::diffuse(Color::new(0.8, 0.1, 0.1)));
    let mirror = Arc::new(Bsdf::specular(Color::splat(0.9)));
    let light = Arc::new(Bsdf::emissive(Color::splat(12.0)));

    let quad = |scene: &mut Scene, corners: [Vec3; 4], bsdf: &Arc<Bsdf>| -> anyhow::Result<()> {
        let [a, b, c, d] = corners;
        scene.add_triangle(Triangle::flat(a, b, c, bsdf.clone())?);
        scene.add_triangle(Triangle::flat(a, c, d, bsdf.clone())?);
        Ok(())
    };

    quad(
        &mut scene,
        [
            Vec3::new(-5.0, 0.0, 5.0),
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::new(5.0, 0.0, -5.0),
            Vec3::new(-5.0, 0.0, -5.0),
        ],
        &floor,
    )?;
    quad(
        &mut scene,
        [
            Vec3::new(-3.5, 0.0, -3.0),
            Vec3::new(0.5, 0.0, -3.5),
            Vec3::new(0.5, 3.0, -3.5),
            Vec3::new(-3.5, 3.0, -3.0),
        ],
        &mirror,
    )?;
    scene.add_triangle(Triangle::flat(
        Vec3::new(0.5, 0.0, 0.5),
        Vec3::new(2.5, 0.0, 0.0),
        Vec3::new(1.5, 2.0, 0.2),
        red,
    )?);
    scene.add_light(Triangle::flat(
        Vec3::new(-1.0, 4.0, 1.0),
        Vec3::new(1.0, 4.0, 1.0),
        Vec3::new(0.0, 4.0, -1.0),
        light,
    )?)?;

    log::debug!(
        "Built demo scene: {} triangles, {} lights",
        scene.len(),
        scene.light_count()
    );
    Ok(SceneSetup {
        scene,
        eye: Vec3::new(0.0, 2.5, 9.0),
        target: Vec3::new(0.0, 1.0, 0.0),
    })
}

/// Load OBJ files as grey diffuse geometry lit from above.
///
/// The light and default camera are placed from the combined bounds.
pub(crate) fn mesh_scene(paths: &[PathBuf]) -> anyhow::Result<SceneSetup> {
    let grey = Arc::new(Bsdf::diffuse(Color::splat(0.7)));
    let mut scene = Scene::new();
    let mut min = Vec3::INFINITY;
    let mut max = Vec3::NEG_INFINITY;

    for path in paths {
        let mesh = read_obj(path).with_context(|| format!("loading {}", path.display()))?;
        for &p in &mesh.positions {
            min = min.min(p);
            max = max.max(p);
        }
        let range = scene
            .add_mesh(&mesh, grey.clone())
            .with_context(|| format!("adding {}", path.display()))?;
        log::info!("Loaded {} ({} triangles)", path.display(), range.len());
    }

    if scene.is_empty() {
        bail!("meshes contain no triangles");
    }

    let center = (min + max) * 0.5;
    let radius = ((max - min).length() * 0.5).max(1e-3);

    let h = radius * 0.5;
    let top = Vec3::new(center.x, max.y + radius, center.z);
    scene.add_light(Triangle::flat(
        top + Vec3::new(-h, 0.0, h),
        top + Vec3::new(h, 0.0, h),
        top + Vec3::new(0.0, 0.0, -h),
        Arc::new(Bsdf::emissive(Color::splat(8.0))),
    )?)?;

    Ok(SceneSetup {
        scene,
        eye: center + Vec3::new(0.0, 0.5, 2.5) * radius,
        target: center,
    })
}
