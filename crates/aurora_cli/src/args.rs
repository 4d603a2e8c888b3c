//! Command line option parsing.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context as _;
use aurora_math::Vec3;
use aurora_renderer::RenderOptions;
use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(name = "aurora", version, about = "Monte Carlo triangle path tracer")]
pub(crate) struct AuroraArgs {
    /// JSON file with render options. Flags given on the command line win.
    #[arg(long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Image width in pixels.
    #[arg(long)]
    pub(crate) width: Option<u32>,

    /// Image height in pixels.
    #[arg(long)]
    pub(crate) height: Option<u32>,

    /// Bounces after the first hit (0 = direct light only).
    #[arg(long)]
    pub(crate) max_depth: Option<u32>,

    /// Jittered camera rays per pixel.
    #[arg(long)]
    pub(crate) camera_samples: Option<u32>,

    /// Light samples per direct estimate.
    #[arg(long)]
    pub(crate) light_samples: Option<u32>,

    /// Continuations at the first diffuse bounce.
    #[arg(long)]
    pub(crate) diffuse_samples: Option<u32>,

    #[arg(long)]
    pub(crate) gamma: Option<f32>,

    /// Exposure in stops.
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) exposure: Option<f32>,

    /// Seed for the per-pixel random streams.
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Vertical field of view in degrees.
    #[arg(long, default_value_t = 45.0)]
    pub(crate) fov: f32,

    /// Camera position. Defaults depend on the scene.
    #[arg(long, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub(crate) eye: Option<Vec3Arg>,

    /// Point the camera looks at.
    #[arg(long, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub(crate) target: Option<Vec3Arg>,

    /// OBJ file to render as grey diffuse geometry; may be repeated.
    ///
    /// Without meshes the built-in scene is rendered.
    #[arg(long = "mesh", value_name = "OBJ")]
    pub(crate) meshes: Vec<PathBuf>,

    /// Worker threads (defaults to one per core).
    #[arg(long)]
    pub(crate) threads: Option<usize>,

    /// Render on the calling thread without buckets.
    #[arg(long, conflicts_with = "threads")]
    pub(crate) serial: bool,

    /// Output file: ".png" writes PNG, anything else binary PPM.
    #[arg(long, short = 'o', value_name = "FILE", default_value = "output.ppm")]
    pub(crate) output: PathBuf,
}

impl AuroraArgs {
    /// Load the config file (if any) and apply command line overrides.
    pub(crate) fn render_options(&self) -> anyhow::Result<RenderOptions> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => RenderOptions::default(),
        };

        let overrides = [
            (&mut options.width, self.width),
            (&mut options.height, self.height),
            (&mut options.max_depth, self.max_depth),
            (&mut options.camera_samples, self.camera_samples),
            (&mut options.light_samples, self.light_samples),
            (&mut options.diffuse_samples, self.diffuse_samples),
        ];
        for (slot, value) in overrides {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(gamma) = self.gamma {
            options.gamma = gamma;
        }
        if let Some(exposure) = self.exposure {
            options.exposure = exposure;
        }
        if let Some(seed) = self.seed {
            options.seed = seed;
        }

        options.validate()?;
        Ok(options)
    }

    pub(crate) fn writes_png(&self) -> bool {
        self.output
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"))
    }
}

fn load_options(path: &Path) -> anyhow::Result<RenderOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// A point given as "x,y,z".
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Vec3Arg(pub Vec3);

impl FromStr for Vec3Arg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords: [f32; 3] = s
            .split(',')
            .map(|c| {
                let c = c.trim();
                c.parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| format!("{c:?} is not a number"))
            })
            .collect::<Result<Vec<f32>, String>>()?
            .try_into()
            .map_err(|_| String::from("must be three comma-separated numbers"))?;
        Ok(Vec3Arg(Vec3::from_array(coords)))
    }
}
