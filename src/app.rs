//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real main that parses the
//! CLI, sets up logging, and dispatches to one handler per subcommand.

use std::io::Write;

use clap::Parser;
use env_logger::Env;

use crate::cli::{Command, GalleryArgs, InspectArgs, PlotArgs, RateArgs, SynthArgs};
use crate::domain::{RateConfig, SynthConfig};
use crate::error::{AppError, AppResult};
use crate::io::fits::read_fits;
use crate::io::{SeriesFile, cube_from_image, read_series_json, write_cube, write_series_csv, write_series_json};
use crate::models::gallery_panels;
use crate::plot::{GalleryFigure, MassLossFigure, PlotStyle, save_figure};
use crate::shells::ShellAnalysis;

pub mod pipeline;

/// Entry point for the `massloss` binary.
pub fn run() -> AppResult<()> {
    // A `.env` next to the data may set MASSLOSS_CUBE or RUST_LOG.
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Rate(args) => handle_rate(args),
        Command::Gallery(args) => handle_gallery(args),
        Command::Synth(args) => handle_synth(args),
        Command::Inspect(args) => handle_inspect(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_rate(args: RateArgs) -> AppResult<()> {
    let config = rate_config_from_args(&args);
    let style = PlotStyle::load_or_default(config.style.as_deref())?;
    let run = pipeline::run_rate(&config)?;
    let analysis = &run.analysis;

    let figure = MassLossFigure::new(&analysis.series, style.rate, &style.font_family);
    report_rate(&mut std::io::stdout().lock(), analysis, |_| {
        save_figure(&figure, config.figure.as_deref())
    })?;

    if let Some(path) = &config.export_csv {
        write_series_csv(path, &analysis.series, analysis.recentered.geometry())?;
    }
    if let Some(path) = &config.export_json {
        write_series_json(path, &SeriesFile::from_analysis(&run.source, analysis))?;
    }
    Ok(())
}

/// Print the peak and series summary, save the figure, then print the mass
/// budget.
fn report_rate<W: Write>(
    out: &mut W,
    analysis: &ShellAnalysis,
    save: impl FnOnce(&mut W) -> AppResult<()>,
) -> AppResult<()> {
    let stdout = |err: std::io::Error| AppError::io("write report to", "stdout", err);
    writeln!(out, "{}", crate::report::format_peak(&analysis.peak)).map_err(stdout)?;
    writeln!(out, "{}", crate::report::format_series_summary(&analysis.series)).map_err(stdout)?;
    save(out)?;
    writeln!(out).map_err(stdout)?;
    writeln!(out, "{}", crate::report::format_budget(&analysis.budget)).map_err(stdout)?;
    Ok(())
}

fn handle_gallery(args: GalleryArgs) -> AppResult<()> {
    let mut style = PlotStyle::load_or_default(args.style.as_deref())?;
    if let Some(cmap) = args.colormap {
        style.gallery.colormap = cmap;
    }
    if let Some(sigma) = args.smoothing {
        if !(sigma.is_finite() && sigma >= 0.0) {
            return Err(AppError::config(format!("smoothing must be >= 0, got {sigma}")));
        }
        style.gallery.smoothing = sigma;
    }

    let figure = GalleryFigure::build(&gallery_panels(), style.gallery, &style.font_family);
    save_figure(&figure, Some(&args.output))
}

fn handle_synth(args: SynthArgs) -> AppResult<()> {
    let config = synth_config_from_args(&args);
    let cube = crate::data::generate_cube(&config)?;
    write_cube(&config.output, &cube, &crate::data::synthetic_header(&config))?;
    log::info!(
        "Wrote {n}x{n}x{n} synthetic cube to {}",
        config.output.display(),
        n = config.npix
    );
    Ok(())
}

fn handle_inspect(args: InspectArgs) -> AppResult<()> {
    let image = read_fits(&args.cube)?;
    let header = image.header.clone();
    let name = args.cube.display().to_string();

    let (geometry, total) = match cube_from_image(image, &name) {
        Ok(cube) => {
            let g = *cube.geometry();
            (Some(g), Some(cube.sum() * g.voxel_to_msun()))
        }
        Err(err) => {
            log::warn!("{err}");
            (None, None)
        }
    };

    println!(
        "{}",
        crate::report::format_header_summary(&args.cube, &header, geometry.as_ref(), total)
    );
    Ok(())
}

fn handle_plot(args: PlotArgs) -> AppResult<()> {
    let style = PlotStyle::load_or_default(args.style.as_deref())?;
    let file = read_series_json(&args.series)?;
    log::info!(
        "Series from {} (generated {})",
        file.source.display(),
        file.generated.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("{}", crate::report::format_peak(&file.peak));

    let figure = MassLossFigure::new(&file.series, style.rate, &style.font_family);
    save_figure(&figure, Some(&args.output))
}

pub fn rate_config_from_args(args: &RateArgs) -> RateConfig {
    RateConfig {
        cube_path: args.cube.clone(),
        velocity_km_s: args.velocity,
        epsilon: args.epsilon,
        figure: (!args.no_figure).then(|| args.figure.clone()),
        style: args.style.clone(),
        export_csv: args.export_csv.clone(),
        export_json: args.export_json.clone(),
    }
}

pub fn synth_config_from_args(args: &SynthArgs) -> SynthConfig {
    SynthConfig {
        output: args.output.clone(),
        npix: args.npix,
        pixel_scale_pc: args.pixel_scale,
        radius: args.radius,
        sigma: args.sigma,
        peak_density: args.peak_density,
        x_offset_pc: args.x_offset,
        y_offset_pc: args.y_offset,
        noise: args.noise,
        seed: args.seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    #[test]
    fn no_figure_clears_the_figure_path() {
        let cli = Cli::try_parse_from(["massloss", "rate", "--cube", "m.fits", "--no-figure"]).unwrap();
        let Command::Rate(args) = cli.command else {
            panic!("expected rate");
        };
        let config = rate_config_from_args(&args);
        assert!(config.figure.is_none());
        assert_eq!(config.velocity_km_s, 27.0);
    }

    #[test]
    fn rate_report_prints_the_budget_after_the_figure() {
        let synth = SynthConfig {
            npix: 8,
            ..SynthConfig::default()
        };
        let cube = crate::data::generate_cube(&synth).unwrap();
        let run = pipeline::run_rate_on_cube(&RateConfig::default(), cube).unwrap();

        let mut out = Vec::new();
        report_rate(&mut out, &run.analysis, |out| {
            out.extend_from_slice(b"[figure]\n");
            Ok(())
        })
        .unwrap();
        let text = String::from_utf8(out).unwrap();

        let peak = text.find("The peak of mass-loss rate").unwrap();
        let figure = text.find("[figure]").unwrap();
        let budget = text.find(&crate::report::format_budget(&run.analysis.budget)).unwrap();
        assert!(peak < figure && figure < budget, "{text}");
    }

    #[test]
    fn failed_figure_stops_before_the_budget() {
        let synth = SynthConfig {
            npix: 8,
            ..SynthConfig::default()
        };
        let cube = crate::data::generate_cube(&synth).unwrap();
        let run = pipeline::run_rate_on_cube(&RateConfig::default(), cube).unwrap();

        let mut out = Vec::new();
        let err = report_rate(&mut out, &run.analysis, |_| Err(AppError::render("no backend"))).unwrap_err();
        assert_eq!(err.exit_code(), 5);
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains(&crate::report::format_budget(&run.analysis.budget)));
    }

    #[test]
    fn synth_args_map_onto_config() {
        let cli = Cli::try_parse_from(["massloss", "synth", "-n", "16", "--y-offset", "0.2"]).unwrap();
        let Command::Synth(args) = cli.command else {
            panic!("expected synth");
        };
        let config = synth_config_from_args(&args);
        assert_eq!(config.npix, 16);
        assert_eq!(config.y_offset_pc, 0.2);
        assert_eq!(config.seed, 42);
    }
}
