//! Run configurations as understood by the pipelines.
//!
//! These are derived from CLI flags (plus defaults) in `app.rs`.

use std::path::PathBuf;

/// Default expansion velocity of the nebula, km/s.
pub const DEFAULT_VELOCITY_KM_S: f64 = 27.0;
/// Default threshold below which rates count as interpolation noise.
pub const DEFAULT_EPSILON: f64 = 1e-7;
/// Default input: the MAP truncated-normal-shell model of the 17 GHz data.
pub const DEFAULT_CUBE: &str = "s61-TNS-17GHz-model-3-6-rw-chi33.fits";
pub const DEFAULT_RATE_FIGURE: &str = "s61_17GHzmasslossrate.svg";
pub const DEFAULT_GALLERY_FIGURE: &str = "rhocube_gallery.png";

/// Configuration for one `massloss rate` run.
#[derive(Debug, Clone)]
pub struct RateConfig {
    pub cube_path: PathBuf,
    pub velocity_km_s: f64,
    pub epsilon: f64,
    pub figure: Option<PathBuf>,
    pub style: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            cube_path: PathBuf::from(DEFAULT_CUBE),
            velocity_km_s: DEFAULT_VELOCITY_KM_S,
            epsilon: DEFAULT_EPSILON,
            figure: Some(PathBuf::from(DEFAULT_RATE_FIGURE)),
            style: None,
            export_csv: None,
            export_json: None,
        }
    }
}

/// Parameters of a synthetic truncated-normal-shell cube.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub output: PathBuf,
    pub npix: usize,
    pub pixel_scale_pc: f64,
    /// Shell peak radius as a fraction of the half-width.
    pub radius: f64,
    /// Shell Gaussian width as a fraction of the half-width.
    pub sigma: f64,
    /// Peak electron density, cm^-3.
    pub peak_density: f64,
    pub x_offset_pc: f64,
    pub y_offset_pc: f64,
    /// Standard deviation of additive Gaussian noise relative to the peak.
    pub noise: f64,
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("synthetic-shell.fits"),
            npix: 64,
            pixel_scale_pc: 0.05,
            radius: 0.5,
            sigma: 0.1,
            peak_density: 1000.0,
            x_offset_pc: 0.0,
            y_offset_pc: 0.0,
            noise: 0.0,
            seed: 42,
        }
    }
}
