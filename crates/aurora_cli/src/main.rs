//! `aurora`: render a triangle scene to a PPM or PNG file.

use std::time::Instant;

use anyhow::Context as _;
use aurora_core::{save_png, write_ppm, Image};
use aurora_math::Vec3;
use aurora_renderer::{post_process, render, render_parallel, Camera, RenderOptions};
use clap::Parser as _;
use indicatif::{ProgressBar, ProgressFinish, ProgressStyle};

mod args;
mod scene;

use args::AuroraArgs;
use scene::SceneSetup;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = AuroraArgs::parse();
    let options = args.render_options()?;

    let setup = if args.meshes.is_empty() {
        scene::demo_scene()?
    } else {
        scene::mesh_scene(&args.meshes)?
    };
    let camera = camera_for(&args, &setup, &options)?;

    let start = Instant::now();
    let mut image = match args.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("creating render thread pool")?;
            pool.install(|| render_with_progress(&setup, &camera, &options))?
        }
        None if args.serial => render(&setup.scene, &camera, &options)?,
        None => render_with_progress(&setup, &camera, &options)?,
    };
    post_process(&mut image, &options);

    let written = if args.writes_png() {
        save_png(&args.output, &image)
    } else {
        write_ppm(&args.output, &image)
    };
    written.with_context(|| format!("writing {}", args.output.display()))?;

    log::info!(
        "Wrote {} in {:.2?}",
        args.output.display(),
        start.elapsed()
    );
    Ok(())
}

fn camera_for(args: &AuroraArgs, setup: &SceneSetup, options: &RenderOptions) -> anyhow::Result<Camera> {
    let eye = args.eye.map_or(setup.eye, |a| a.0);
    let target = args.target.map_or(setup.target, |a| a.0);
    Camera::look_at(
        eye,
        target,
        Vec3::Y,
        args.fov.to_radians(),
        options.width,
        options.height,
    )
    .context("invalid camera placement")
}

fn render_with_progress(
    setup: &SceneSetup,
    camera: &Camera,
    options: &RenderOptions,
) -> anyhow::Result<Image> {
    let style = ProgressStyle::default_bar()
        .template("{prefix:8} [{elapsed}] {wide_bar} {pos:>6}/{len:6} {msg:30}")?;
    let progress = ProgressBar::new(options.pixel_count())
        .with_style(style)
        .with_prefix("Render")
        .with_finish(ProgressFinish::AndLeave);

    let image = render_parallel(&setup.scene, camera, options, |result| {
        progress.inc(u64::from(result.bucket.pixel_count()));
    })?;
    progress.finish_with_message("done");
    Ok(image)
}
