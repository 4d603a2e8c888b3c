//! Surface descriptors.
//!
//! A [`Bsdf`] is a flat tag plus one color. The estimator branches on the
//! variant explicitly, so adding a variant forces every call site to
//! decide how it behaves.

use std::f32::consts::FRAC_1_PI;

use aurora_math::sampling::{cosine_sample_hemisphere, gen_vec2, reflect};
use aurora_math::{Color, Vec3};
use rand::RngCore;

use crate::ShadingPoint;

/// How a surface emits or reflects light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bsdf {
    /// Area light with constant radiance, emitted from both faces.
    Emissive { radiance: Color },
    /// Lambertian reflector.
    Diffuse { reflectance: Color },
    /// Perfect mirror.
    Specular { reflectance: Color },
    /// Absorbs everything.
    None,
}

/// A scattered direction and its Monte Carlo weight (f * cos / pdf).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsdfSample {
    pub direction: Vec3,
    pub weight: Color,
}

impl Bsdf {
    pub fn emissive(radiance: Color) -> Self {
        Bsdf::Emissive { radiance }
    }

    pub fn diffuse(reflectance: Color) -> Self {
        Bsdf::Diffuse { reflectance }
    }

    pub fn specular(reflectance: Color) -> Self {
        Bsdf::Specular { reflectance }
    }

    /// The carried color: radiance for lights, reflectance otherwise.
    pub fn color(&self) -> Color {
        match *self {
            Bsdf::Emissive { radiance } => radiance,
            Bsdf::Diffuse { reflectance } | Bsdf::Specular { reflectance } => reflectance,
            Bsdf::None => Color::ZERO,
        }
    }

    /// Radiance leaving the surface on its own.
    pub fn emitted(&self) -> Color {
        match *self {
            Bsdf::Emissive { radiance } => radiance,
            _ => Color::ZERO,
        }
    }

    pub fn is_emissive(&self) -> bool {
        matches!(self, Bsdf::Emissive { .. })
    }

    /// True when scattering is a Dirac delta (cannot be evaluated for an
    /// arbitrary pair of directions).
    pub fn is_delta(&self) -> bool {
        matches!(self, Bsdf::Specular { .. })
    }

    /// Whether light sampling can contribute at this surface.
    ///
    /// Emitters and absorbers are never receivers; a mirror's delta lobe
    /// has zero probability of lining up with a sampled light point.
    pub fn receives_direct(&self) -> bool {
        matches!(self, Bsdf::Diffuse { .. })
    }

    /// BRDF value for outgoing direction `wo` and incident direction `wi`
    /// about the shading normal `n` (all pointing away from the surface).
    pub fn evaluate(&self, wo: Vec3, wi: Vec3, n: Vec3) -> Color {
        match *self {
            Bsdf::Diffuse { reflectance } if wo.dot(n) > 0.0 && wi.dot(n) > 0.0 => {
                reflectance * FRAC_1_PI
            }
            _ => Color::ZERO,
        }
    }

    /// Pick a continuation direction at `sp`.
    ///
    /// Diffuse surfaces importance-sample the cosine lobe, so the weight
    /// reduces to the reflectance. Returns `None` for surfaces that end
    /// the path.
    pub fn sample(&self, sp: &ShadingPoint, rng: &mut dyn RngCore) -> Option<BsdfSample> {
        match *self {
            Bsdf::Diffuse { reflectance } => {
                let local = cosine_sample_hemisphere(gen_vec2(rng));
                let direction = sp.frame.to_world(local).try_normalize()?;
                Some(BsdfSample {
                    direction,
                    weight: reflectance,
                })
            }
            Bsdf::Specular { reflectance } => Some(BsdfSample {
                direction: reflect(-sp.wo, sp.normal),
                weight: reflectance,
            }),
            Bsdf::Emissive { .. } | Bsdf::None => None,
        }
    }
}

impl Default for Bsdf {
    fn default() -> Self {
        Bsdf::diffuse(Color::splat(0.5))
    }
}
