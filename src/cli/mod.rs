//! Command-line parsing for the shell mass-loss tool.
//!
//! Parsing stays separate from the profiling code; `app.rs` turns these
//! arguments into run configurations.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{
    DEFAULT_CUBE, DEFAULT_EPSILON, DEFAULT_GALLERY_FIGURE, DEFAULT_RATE_FIGURE, DEFAULT_VELOCITY_KM_S,
};
use crate::plot::Colormap;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "massloss",
    version,
    about = "Mass-loss-rate history of an expanding nebular shell from a 3D density cube"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Profile a density cube into shell masses and a mass-loss-rate curve.
    Rate(RateArgs),
    /// Render the six-panel gallery of projected density models.
    Gallery(GalleryArgs),
    /// Write a synthetic truncated-normal-shell cube to FITS.
    Synth(SynthArgs),
    /// Print the header and derived geometry of a FITS cube.
    Inspect(InspectArgs),
    /// Re-render the rate figure from a series JSON written by `rate --export-json`.
    Plot(PlotArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct RateArgs {
    /// Density cube (FITS, electron density in cm^-3).
    #[arg(long, env = "MASSLOSS_CUBE", default_value = DEFAULT_CUBE)]
    pub cube: PathBuf,

    /// Expansion velocity in km/s.
    #[arg(short = 'v', long, default_value_t = DEFAULT_VELOCITY_KM_S)]
    pub velocity: f64,

    /// Rates below this value (Msun/yr) are set to zero.
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Figure path; the format follows the extension (.svg or .png).
    #[arg(long, default_value = DEFAULT_RATE_FIGURE)]
    pub figure: PathBuf,

    /// Skip rendering the figure.
    #[arg(long)]
    pub no_figure: bool,

    /// JSON style file overriding figure defaults.
    #[arg(long, value_name = "JSON")]
    pub style: Option<PathBuf>,

    /// Export per-shell masses and rates to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,

    /// Export the full series (geometry, peak, budget, shells) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct GalleryArgs {
    /// Output figure (.png or .svg).
    #[arg(short, long, default_value = DEFAULT_GALLERY_FIGURE)]
    pub output: PathBuf,

    /// Colormap for the projected images.
    #[arg(long, value_enum)]
    pub colormap: Option<Colormap>,

    /// Gaussian smoothing of each model cube, in voxels.
    #[arg(long)]
    pub smoothing: Option<f64>,

    /// JSON style file overriding figure defaults.
    #[arg(long, value_name = "JSON")]
    pub style: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct SynthArgs {
    /// Output FITS file.
    #[arg(short, long, default_value = "synthetic-shell.fits")]
    pub output: PathBuf,

    /// Voxels per axis (even, >= 4).
    #[arg(short = 'n', long, default_value_t = 64)]
    pub npix: usize,

    /// Voxel edge length in parsec.
    #[arg(long, default_value_t = 0.05)]
    pub pixel_scale: f64,

    /// Shell peak radius as a fraction of the half-width.
    #[arg(long, default_value_t = 0.5)]
    pub radius: f64,

    /// Shell Gaussian width as a fraction of the half-width.
    #[arg(long, default_value_t = 0.1)]
    pub sigma: f64,

    /// Peak electron density, cm^-3.
    #[arg(long, default_value_t = 1000.0)]
    pub peak_density: f64,

    /// Offset of the shell centre from the grid centre along x, parsec.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub x_offset: f64,

    /// Offset of the shell centre from the grid centre along y, parsec.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub y_offset: f64,

    /// Gaussian noise standard deviation relative to the peak density.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Debug, Parser, Clone)]
pub struct InspectArgs {
    /// FITS file to inspect.
    #[arg(long, env = "MASSLOSS_CUBE", default_value = DEFAULT_CUBE)]
    pub cube: PathBuf,
}

#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Series JSON produced by `massloss rate --export-json`.
    #[arg(long, value_name = "JSON")]
    pub series: PathBuf,

    /// Output figure (.png or .svg).
    #[arg(short, long, default_value = DEFAULT_RATE_FIGURE)]
    pub output: PathBuf,

    /// JSON style file overriding figure defaults.
    #[arg(long, value_name = "JSON")]
    pub style: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_defaults() {
        let cli = Cli::try_parse_from(["massloss", "rate", "--cube", "m.fits"]).unwrap();
        let Command::Rate(args) = cli.command else {
            panic!("expected rate");
        };
        assert_eq!(args.cube, PathBuf::from("m.fits"));
        assert_eq!(args.velocity, 27.0);
        assert_eq!(args.epsilon, 1e-7);
        assert_eq!(args.figure, PathBuf::from(DEFAULT_RATE_FIGURE));
        assert!(!args.no_figure);
    }

    #[test]
    fn rate_overrides() {
        let cli = Cli::try_parse_from([
            "massloss", "rate", "--cube", "m.fits", "-v", "30", "--epsilon", "0", "--no-figure",
            "--export-csv", "out.csv",
        ])
        .unwrap();
        let Command::Rate(args) = cli.command else {
            panic!("expected rate");
        };
        assert_eq!(args.velocity, 30.0);
        assert_eq!(args.epsilon, 0.0);
        assert!(args.no_figure);
        assert_eq!(args.export_csv, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn gallery_colormap_and_synth_offsets_parse() {
        let cli = Cli::try_parse_from(["massloss", "gallery", "--colormap", "greys-r"]).unwrap();
        let Command::Gallery(args) = cli.command else {
            panic!("expected gallery");
        };
        assert_eq!(args.colormap, Some(Colormap::GreysR));

        let cli = Cli::try_parse_from(["massloss", "synth", "--x-offset", "-0.1", "-n", "32"]).unwrap();
        let Command::Synth(args) = cli.command else {
            panic!("expected synth");
        };
        assert_eq!(args.x_offset, -0.1);
        assert_eq!(args.npix, 32);
    }

    #[test]
    fn plot_requires_series() {
        assert!(Cli::try_parse_from(["massloss", "plot"]).is_err());
    }
}
