//! The `rate` workflow, shared by the CLI handler and tests:
//! read cube -> recenter -> shell masses -> rates -> peak.

use std::path::PathBuf;

use crate::domain::{DensityCube, RateConfig};
use crate::error::AppResult;
use crate::io::read_cube;
use crate::shells::{ShellAnalysis, ShellMassProfiler};

/// Outputs of one `massloss rate` run.
#[derive(Debug, Clone)]
pub struct RateRun {
    pub source: PathBuf,
    pub input: DensityCube,
    pub analysis: ShellAnalysis,
}

/// Read the configured cube and profile it.
pub fn run_rate(config: &RateConfig) -> AppResult<RateRun> {
    log::info!("Reading density cube {}", config.cube_path.display());
    let input = read_cube(&config.cube_path)?;
    run_rate_on_cube(config, input)
}

/// Profile an in-memory cube with the configured velocity and threshold.
pub fn run_rate_on_cube(config: &RateConfig, input: DensityCube) -> AppResult<RateRun> {
    let g = input.geometry();
    log::info!(
        "Cube: {} voxels/side, {} pc/voxel, offset ({}, {}) pc",
        g.npix,
        g.pixel_scale_pc,
        g.x_offset_pc,
        g.y_offset_pc
    );

    let profiler = ShellMassProfiler::new(config.velocity_km_s, config.epsilon)?;
    let analysis = profiler.analyze(&input)?;

    Ok(RateRun {
        source: config.cube_path.clone(),
        input,
        analysis,
    })
}
