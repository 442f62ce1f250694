//! Trace a polarization optics scene and print the result as JSON
//!
//! Loads a scene file, optionally a bench configuration, traces every
//! emitter and prints:
//!
//! 1. Ray segments with their polarization states
//! 2. One reading per sensor
//! 3. Render hints per segment (with `--render`)
//!
//! Usage:
//! ```text
//! cargo run --bin trace_scene -- scene.json [--config bench.json] [--render] [--palette hue]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use optical_bench::shared_args::TraceArgs;
use optical_bench::{BenchConfig, LightTracer, RayRenderAdapter, RenderHints, Scene, TraceResult};
use serde::Serialize;

#[derive(Serialize)]
struct Output<'a> {
    #[serde(flatten)]
    trace: &'a TraceResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    render: Option<Vec<RenderHints>>,
}

fn main() -> Result<()> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = TraceArgs::parse();

    let mut config = match &args.config {
        Some(path) => BenchConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BenchConfig::default(),
    };
    if let Some(max_bounces) = args.max_bounces {
        config.tracer.max_bounces = max_bounces;
    }
    if let Some(palette) = args.palette {
        config.render.palette = palette;
    }
    config.tracer.validate()?;

    let mut scene = Scene::load_from_file(&args.scene)
        .with_context(|| format!("loading scene {}", args.scene.display()))?;
    if let Some(bounds) = args.bounds {
        scene = scene.with_bounds(bounds)?;
    }
    info!(
        "Loaded {} components ({} emitters, {} sensors)",
        scene.components().len(),
        scene.emitters().count(),
        scene.sensors().count()
    );

    let tracer = LightTracer::new(config.tracer).with_thresholds(config.thresholds);
    let result = tracer.trace(&scene);
    if result.truncated {
        warn!("Trace was truncated by the bounce or segment limit");
    }
    info!(
        "{} segments, {}/{} sensors activated",
        result.segments.len(),
        result.sensor_readings.iter().filter(|r| r.activated).count(),
        result.sensor_readings.len()
    );

    let json = if args.sensors_only {
        serde_json::to_string_pretty(&result.sensor_readings)?
    } else {
        let render = args.render.then(|| {
            RayRenderAdapter::from_config(&config.render, config.thresholds).render_all(&result.segments)
        });
        serde_json::to_string_pretty(&Output {
            trace: &result,
            render,
        })?
    };
    println!("{json}");

    Ok(())
}
