//! Formatted terminal output.
//!
//! Formatting lives here so the profiling code stays free of presentation,
//! and output changes stay localized.

use std::path::Path;

use crate::domain::{CubeGeometry, MassBudget, MassLossSeries, PeakEpoch};
use crate::io::fits::FitsHeader;

/// `%.3e`-style scientific notation: three decimals, signed two-digit exponent.
pub fn sci(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let s = format!("{v:.3e}");
    let Some((mantissa, exp)) = s.split_once('e') else {
        return s;
    };
    let (sign, digits) = match exp.strip_prefix('-') {
        Some(d) => ('-', d),
        None => ('+', exp),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// The headline result of a run.
pub fn format_peak(peak: &PeakEpoch) -> String {
    format!(
        "The peak of mass-loss rate ({} Msun/yr) occured {} years ago.",
        sci(peak.rate_msun_per_yr),
        peak.lookback_yr.trunc() as i64
    )
}

/// Mass conservation check between the cube and its shells.
pub fn format_budget(budget: &MassBudget) -> String {
    let mut out = String::new();
    out.push_str("Sanity checks\n");
    out.push_str(&format!("Sum of voxel masses    = {:.6e} Msun\n", budget.cube_msun));
    out.push_str(&format!(
        "Sum of shell masses    = {:.6e} Msun  <-- should match the voxel sum\n",
        budget.shells_msun
    ));
    out.push_str(&format!(
        "Outside binned shells  = {:.6e} Msun\n",
        budget.unbinned_msun
    ));
    out.push_str(&format!("Relative closure error = {:.3e}", budget.closure_error()));
    out
}

/// One-line summary of the series binning.
pub fn format_series_summary(series: &MassLossSeries) -> String {
    let nonzero = series.points.iter().filter(|p| p.rate_msun_per_yr > 0.0).count();
    format!(
        "Shells: {} | v = {} km/s | dt = {:.1} yr | epsilon = {} | non-zero rates: {}",
        series.points.len(),
        series.velocity_km_s,
        series.time_bin_yr,
        sci(series.epsilon),
        nonzero
    )
}

/// Header and geometry report for `massloss inspect`.
pub fn format_header_summary(path: &Path, header: &FitsHeader, geometry: Option<&CubeGeometry>, total_msun: Option<f64>) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", path.display()));
    for card in &header.cards {
        let Some(value) = &card.value else {
            continue;
        };
        let comment = card.comment.as_deref().unwrap_or("");
        let line = format!("{:<8} = {:<22} {}", card.key, value.format().trim(), comment);
        out.push_str(line.trim_end());
        out.push('\n');
    }

    match geometry {
        Some(g) => {
            out.push('\n');
            out.push_str(&format!("Grid: {0} x {0} x {0} voxels\n", g.npix));
            out.push_str(&format!("Pixel scale: {} pc\n", g.pixel_scale_pc));
            out.push_str(&format!(
                "Centre offset: x = {} pc, y = {} pc\n",
                g.x_offset_pc, g.y_offset_pc
            ));
            out.push_str(&format!("Voxel mass at unit density: {} Msun\n", sci(g.voxel_to_msun())));
            out.push_str(&format!("Binned shells: {}\n", g.half().saturating_sub(1)));
        }
        None => out.push_str("\nGeometry: unavailable (not a density cube)\n"),
    }
    if let Some(total) = total_msun {
        out.push_str(&format!("Total mass: {} Msun\n", sci(total)));
    }

    out.trim_end().to_string()
}
