//! Direct + indirect radiance estimator.
//!
//! Paths are traced iteratively with a throughput accumulator. At every
//! diffuse vertex one light is sampled explicitly; a registered light found
//! by a later diffuse bounce is then skipped so it is not counted twice.
//! Emitters outside the light subset are never sampled, so their emission
//! is always picked up by the bounce that hits them. Camera rays and
//! specular bounces pick up all emission directly.

use aurora_math::sampling::gen_vec2;
use aurora_math::{Color, ColorExt, Ray};
use rand::{Rng, RngCore};

use crate::{Bsdf, LightSample, RenderOptions, Scene, ShadingPoint};

/// Radiance estimator over a scene.
pub struct PathTracer<'a> {
    scene: &'a Scene,
    options: &'a RenderOptions,
}

/// Where a path segment starts, carried through the bounce loop.
#[derive(Clone, Copy)]
struct PathState {
    ray: Ray,
    depth: u32,
    throughput: Color,
    /// Add emission of registered lights at the next hit
    count_emission: bool,
    /// The next diffuse vertex may fan out into `diffuse_samples` paths
    may_split: bool,
}

impl<'a> PathTracer<'a> {
    pub fn new(scene: &'a Scene, options: &'a RenderOptions) -> Self {
        Self { scene, options }
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// Estimate the radiance arriving along a camera ray.
    pub fn trace(&self, ray: Ray, rng: &mut dyn RngCore) -> Color {
        self.trace_path(
            PathState {
                ray,
                depth: 0,
                throughput: Color::ONE,
                count_emission: true,
                may_split: true,
            },
            rng,
        )
    }

    fn trace_path(&self, mut state: PathState, rng: &mut dyn RngCore) -> Color {
        let mut radiance = Color::ZERO;

        loop {
            let Some(hit) = self.scene.intersects(&state.ray) else {
                radiance += state.throughput * self.options.background;
                break;
            };

            let triangle = self.scene.triangle(hit.index);
            let bsdf = triangle.bsdf();
            let mut sp = triangle.shade(&state.ray, hit.distance);

            if state.count_emission || !self.scene.is_light(hit.index) {
                radiance += state.throughput * bsdf.emitted();
            }
            if bsdf.receives_direct() {
                radiance += state.throughput * self.estimate_direct(&mut sp, bsdf, rng);
            }

            if state.depth >= self.options.max_depth {
                break;
            }

            let splits = self.options.diffuse_samples;
            if state.may_split && splits > 1 && matches!(bsdf, Bsdf::Diffuse { .. }) {
                let mut indirect = Color::ZERO;
                for _ in 0..splits {
                    if let Some(sample) = bsdf.sample(&sp, rng) {
                        indirect += self.trace_path(
                            PathState {
                                ray: sp.spawn_ray(sample.direction),
                                depth: state.depth + 1,
                                throughput: sample.weight,
                                count_emission: false,
                                may_split: false,
                            },
                            rng,
                        );
                    }
                }
                radiance += state.throughput * indirect / splits as f32;
                break;
            }

            let Some(sample) = bsdf.sample(&sp, rng) else {
                break;
            };
            state.throughput *= sample.weight;
            if state.throughput.is_black() {
                break;
            }

            state.count_emission = bsdf.is_delta();
            state.may_split &= bsdf.is_delta();
            state.ray = sp.spawn_ray(sample.direction);
            state.depth += 1;
        }

        radiance
    }

    /// Direct light reflected at `sp`, averaged over `light_samples`
    /// samples. Zero when the scene has no lights.
    pub fn estimate_direct(
        &self,
        sp: &mut ShadingPoint,
        bsdf: &Bsdf,
        rng: &mut dyn RngCore,
    ) -> Color {
        if self.scene.lights().is_empty() {
            return Color::ZERO;
        }

        let samples = self.options.light_samples.max(1);
        let mut sum = Color::ZERO;
        for _ in 0..samples {
            sum += self.sample_light(sp, bsdf, rng);
        }
        sum / samples as f32
    }

    /// One-sample estimate from a uniformly chosen light.
    ///
    /// Converts the area sample to solid angle with
    /// `cos_x * cos_y / distance^2` and divides by the pdf
    /// `1 / (area * light_count)`. The light only counts when the shadow
    /// ray's nearest hit is that same light triangle.
    pub fn sample_light(&self, sp: &mut ShadingPoint, bsdf: &Bsdf, rng: &mut dyn RngCore) -> Color {
        let lights = self.scene.lights();
        if lights.is_empty() {
            return Color::ZERO;
        }

        let index = lights[rng.gen_range(0..lights.len())];
        let light = self.scene.triangle(index);
        let point = light.sample_point(gen_vec2(rng));

        let to_light = point - sp.point;
        let distance_squared = to_light.length_squared();
        if distance_squared <= 0.0 {
            return Color::ZERO;
        }
        let distance = distance_squared.sqrt();
        let direction = to_light / distance;

        sp.light = Some(LightSample {
            index,
            point,
            normal: light.geometric_normal(),
            direction,
            distance,
        });

        let cos_x = sp.normal.dot(direction);
        // Emission is two-sided
        let cos_y = light.geometric_normal().dot(direction).abs();
        if cos_x <= 0.0 || cos_y <= 0.0 {
            return Color::ZERO;
        }

        let f = bsdf.evaluate(sp.wo, direction, sp.normal);
        if f.is_black() {
            return Color::ZERO;
        }

        let shadow = sp.spawn_ray(direction);
        match self.scene.intersects(&shadow) {
            Some(hit) if hit.index == index => {}
            _ => return Color::ZERO,
        }

        let inverse_pdf = light.area() * lights.len() as f32;
        light.bsdf().emitted() * f * (cos_x * cos_y / distance_squared) * inverse_pdf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    use crate::Triangle;

    /// Large upward-facing diffuse floor at y = 0.
    fn floor(reflectance: f32) -> Triangle {
        Triangle::flat(
            Vec3::new(-20.0, 0.0, 20.0),
            Vec3::new(20.0, 0.0, 20.0),
            Vec3::new(0.0, 0.0, -20.0),
            Arc::new(Bsdf::diffuse(Color::splat(reflectance))),
        )
        .unwrap()
    }

    /// Small horizontal triangle centred above the origin.
    fn panel(height: f32, size: f32, bsdf: Bsdf) -> Triangle {
        Triangle::flat(
            Vec3::new(-size, height, size),
            Vec3::new(size, height, size),
            Vec3::new(0.0, height, -size),
            Arc::new(bsdf),
        )
        .unwrap()
    }

    fn light_scene(height: f32, radiance: f32) -> Scene {
        let mut scene = Scene::new();
        scene.add_triangle(floor(0.5));
        scene
            .add_light(panel(height, 0.05, Bsdf::emissive(Color::splat(radiance))))
            .unwrap();
        scene
    }

    /// Shading point on the floor straight below the light.
    fn floor_point(scene: &Scene) -> (ShadingPoint, Bsdf) {
        let ray = Ray::new(Vec3::new(0.3, 1.0, 0.0), Vec3::new(-0.3, -1.0, 0.0));
        let hit = scene.intersects(&ray).unwrap();
        let triangle = scene.triangle(hit.index);
        (triangle.shade(&ray, hit.distance), *triangle.bsdf())
    }

    fn mean_direct(scene: &Scene, n: usize, seed: u64) -> Color {
        let options = RenderOptions::default();
        let tracer = PathTracer::new(scene, &options);
        let (mut sp, bsdf) = floor_point(scene);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut sum = Color::ZERO;
        for _ in 0..n {
            sum += tracer.estimate_direct(&mut sp, &bsdf, &mut rng);
        }
        sum / n as f32
    }

    #[test]
    fn test_no_lights_gives_zero_direct() {
        let mut scene = Scene::new();
        scene.add_triangle(floor(0.5));
        // Emissive but never registered as a light
        scene.add_triangle(panel(1.0, 0.5, Bsdf::emissive(Color::ONE)));

        assert_eq!(mean_direct(&scene, 16, 1), Color::ZERO);
    }

    #[test]
    fn test_direct_scales_with_radiance_and_inverse_square() {
        let base = mean_direct(&light_scene(1.0, 10.0), 4000, 2).x;
        let brighter = mean_direct(&light_scene(1.0, 20.0), 4000, 2).x;
        let farther = mean_direct(&light_scene(2.0, 10.0), 4000, 2).x;

        assert!(base > 0.0);
        assert!((brighter / base - 2.0).abs() < 0.01);
        assert!((base / farther - 4.0).abs() < 0.1, "ratio {}", base / farther);

        // Analytic value for a small light: Le * (rho / pi) * area / h^2
        let area = 0.05 * 0.1;
        let expected = 10.0 * 0.5 / std::f32::consts::PI * area;
        assert!((base - expected).abs() / expected < 0.02);
    }

    #[test]
    fn test_occluded_light_is_exactly_zero() {
        let mut scene = light_scene(2.0, 10.0);
        scene.add_triangle(panel(1.0, 1.0, Bsdf::diffuse(Color::ONE)));

        let options = RenderOptions::default();
        let tracer = PathTracer::new(&scene, &options);
        let (mut sp, bsdf) = floor_point(&scene);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..500 {
            assert_eq!(tracer.estimate_direct(&mut sp, &bsdf, &mut rng), Color::ZERO);
        }
        assert_eq!(sp.light.map(|l| l.index), Some(1));
    }

    #[test]
    fn test_camera_ray_sees_emission() {
        let scene = light_scene(1.0, 7.0);
        let options = RenderOptions::default();
        let tracer = PathTracer::new(&scene, &options);
        let mut rng = StdRng::seed_from_u64(4);

        // Looking up at the light from the floor side
        let radiance = tracer.trace(Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::Y), &mut rng);
        assert_eq!(radiance, Color::splat(7.0));

        // Looking away from everything
        let radiance = tracer.trace(Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::X), &mut rng);
        assert_eq!(radiance, options.background);
    }

    /// Mean radiance over `n` traces of a ray hitting the floor below the panel.
    fn mean_trace(scene: &Scene, options: &RenderOptions, n: usize, seed: u64) -> Color {
        let tracer = PathTracer::new(scene, options);
        let ray = Ray::new(Vec3::new(0.3, 0.5, 0.0), Vec3::new(-0.3, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(seed);

        let mut sum = Color::ZERO;
        for _ in 0..n {
            sum += tracer.trace(ray, &mut rng);
        }
        sum / n as f32
    }

    #[test]
    fn test_unregistered_emitter_lights_diffuse_surfaces() {
        let emitter = || panel(1.0, 0.5, Bsdf::emissive(Color::splat(10.0)));
        let options = RenderOptions {
            max_depth: 1,
            ..RenderOptions::default()
        };

        let mut unregistered = Scene::new();
        unregistered.add_triangle(floor(0.5));
        unregistered.add_triangle(emitter());
        assert_eq!(unregistered.light_count(), 0);

        let mut registered = Scene::new();
        registered.add_triangle(floor(0.5));
        registered.add_light(emitter()).unwrap();

        // Found by bounce rays instead of light sampling; same expectation
        let bounced = mean_trace(&unregistered, &options, 20_000, 6);
        let sampled = mean_trace(&registered, &options, 20_000, 7);
        assert!(bounced.x > 0.0);
        assert!(
            (bounced.x - sampled.x).abs() / sampled.x < 0.08,
            "bounced {bounced} vs sampled {sampled}"
        );
    }

    /// Mirror floor under a registered light at y = 2.
    fn mirror_under_light() -> Scene {
        let mut scene = Scene::new();
        scene.add_triangle(
            Triangle::flat(
                Vec3::new(-20.0, 0.0, 20.0),
                Vec3::new(20.0, 0.0, 20.0),
                Vec3::new(0.0, 0.0, -20.0),
                Arc::new(Bsdf::specular(Color::splat(0.9))),
            )
            .unwrap(),
        );
        scene
            .add_light(panel(2.0, 0.5, Bsdf::emissive(Color::splat(10.0))))
            .unwrap();
        scene
    }

    #[test]
    fn test_mirror_reflects_light_emission() {
        let scene = mirror_under_light();
        let options = RenderOptions {
            max_depth: 1,
            ..RenderOptions::default()
        };
        let tracer = PathTracer::new(&scene, &options);

        // Hits the mirror at x = -0.1 and reflects into the light's centre
        let ray = Ray::new(Vec3::new(-0.2, 1.0, 0.0), Vec3::new(0.1, -1.0, 0.0));
        for seed in 0..8 {
            let radiance = tracer.trace(ray, &mut StdRng::seed_from_u64(seed));
            assert!(
                (radiance - Color::splat(9.0)).abs().max_element() < 1e-4,
                "radiance {radiance}"
            );
        }
    }

    #[test]
    fn test_mirror_at_max_depth_is_black() {
        let scene = mirror_under_light();
        let options = RenderOptions {
            max_depth: 0,
            ..RenderOptions::default()
        };
        let tracer = PathTracer::new(&scene, &options);

        let ray = Ray::new(Vec3::new(-0.2, 1.0, 0.0), Vec3::new(0.1, -1.0, 0.0));
        let radiance = tracer.trace(ray, &mut StdRng::seed_from_u64(8));
        assert_eq!(radiance, Color::ZERO);
    }

    fn room() -> Scene {
        let mut scene = light_scene(1.5, 10.0);
        // Walls give indirect light something to bounce off
        scene.add_triangle(
            Triangle::flat(
                Vec3::new(-2.0, 0.0, -2.0),
                Vec3::new(2.0, 0.0, -2.0),
                Vec3::new(0.0, 4.0, -2.0),
                Arc::new(Bsdf::diffuse(Color::splat(0.7))),
            )
            .unwrap(),
        );
        scene.add_triangle(
            Triangle::flat(
                Vec3::new(2.0, 0.0, -2.0),
                Vec3::new(2.0, 0.0, 2.0),
                Vec3::new(2.0, 4.0, 0.0),
                Arc::new(Bsdf::specular(Color::splat(0.9))),
            )
            .unwrap(),
        );
        scene
    }

    #[test]
    fn test_depth_zero_never_recurses_and_depth_adds_energy() {
        let scene = room();
        let shallow = RenderOptions {
            max_depth: 0,
            ..RenderOptions::default()
        };
        let deep = RenderOptions {
            max_depth: 3,
            ..RenderOptions::default()
        };
        let shallow_tracer = PathTracer::new(&scene, &shallow);
        let deep_tracer = PathTracer::new(&scene, &deep);

        let ray = Ray::new(Vec3::new(0.5, 1.0, 1.5), Vec3::new(-0.2, -1.0, -0.6));
        let mut gained = false;
        for seed in 0..200 {
            // Same random stream: the first vertex draws identical numbers
            let l0 = shallow_tracer.trace(ray, &mut StdRng::seed_from_u64(seed));
            let l3 = deep_tracer.trace(ray, &mut StdRng::seed_from_u64(seed));

            assert!(l3.x >= l0.x - 1e-6 && l3.y >= l0.y - 1e-6 && l3.z >= l0.z - 1e-6);
            gained |= l3.x > l0.x;
        }
        assert!(gained);
    }

    #[test]
    fn test_depth_zero_matches_direct_only() {
        let scene = room();
        let options = RenderOptions {
            max_depth: 0,
            ..RenderOptions::default()
        };
        let tracer = PathTracer::new(&scene, &options);
        let ray = Ray::new(Vec3::new(0.3, 1.0, 0.0), Vec3::new(-0.3, -1.0, 0.0));

        for seed in 0..20 {
            let traced = tracer.trace(ray, &mut StdRng::seed_from_u64(seed));

            let hit = scene.intersects(&ray).unwrap();
            let triangle = scene.triangle(hit.index);
            let mut sp = triangle.shade(&ray, hit.distance);
            let direct =
                tracer.estimate_direct(&mut sp, triangle.bsdf(), &mut StdRng::seed_from_u64(seed));
            assert_eq!(traced, direct);
        }
    }

    #[test]
    fn test_diffuse_splitting_is_unbiased() {
        let scene = room();
        let single = RenderOptions {
            max_depth: 2,
            diffuse_samples: 1,
            ..RenderOptions::default()
        };
        let split = RenderOptions {
            diffuse_samples: 8,
            ..single.clone()
        };
        let ray = Ray::new(Vec3::new(0.5, 1.0, 1.5), Vec3::new(-0.2, -1.0, -0.6));

        let mean = |options: &RenderOptions, n: usize| {
            let tracer = PathTracer::new(&scene, options);
            let mut rng = StdRng::seed_from_u64(5);
            let mut sum = 0.0f64;
            for _ in 0..n {
                sum += tracer.trace(ray, &mut rng).luminance() as f64;
            }
            sum / n as f64
        };

        let a = mean(&single, 40_000);
        let b = mean(&split, 5_000);
        assert!((a - b).abs() / a < 0.05, "single {a} vs split {b}");
    }
}
