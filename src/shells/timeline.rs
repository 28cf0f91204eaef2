//! Radius-to-look-back-time mapping and mass-loss rates.
//!
//! Material ejected from the centre at constant velocity `v` now sits at
//! radius `r = v t`, so each shell's radius maps linearly to the time since it
//! was ejected. The rate normalisation uses the spacing of the first two time
//! samples, which is valid because the mapping is linear.

use crate::domain::{
    CubeGeometry, MassLossSeries, PC_TO_KM, PeakEpoch, RadialMassProfile, RatePoint,
    SECONDS_PER_YEAR,
};
use crate::error::{AppError, AppResult};

/// `num` evenly spaced samples over `[start, stop]`, last sample exactly `stop`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut out: Vec<f64> = (0..num).map(|i| i as f64 * step + start).collect();
            out[num - 1] = stop;
            out
        }
    }
}

/// Shell mid-radii in parsec: `N/2` samples over `[0, pixelscale * N/2]`.
pub fn shell_radii_pc(geometry: &CubeGeometry) -> Vec<f64> {
    let half = geometry.half();
    linspace(0.0, geometry.pixel_scale_pc * half as f64, half)
}

/// Convert radii (pc) to look-back times (yr) at expansion velocity `v` (km/s).
pub fn lookback_years(radii_pc: &[f64], velocity_km_s: f64) -> Vec<f64> {
    let pc_per_year = (velocity_km_s / PC_TO_KM) * SECONDS_PER_YEAR;
    radii_pc.iter().map(|r| r / pc_per_year).collect()
}

/// Width of one time bin, from the first two samples.
pub fn time_bin_width(years: &[f64]) -> AppResult<f64> {
    if years.len() < 2 {
        return Err(AppError::degenerate(format!(
            "need at least two time samples, got {}",
            years.len()
        )));
    }
    let dt = years[1] - years[0];
    if !(dt.is_finite() && dt > 0.0) {
        return Err(AppError::degenerate(format!(
            "time-bin width must be finite and > 0, got {dt} (check the expansion velocity)"
        )));
    }
    Ok(dt)
}

/// Build the mass-loss-rate series for a shell profile.
///
/// Rates below `epsilon` are set to exactly zero.
pub fn mass_loss_series(
    profile: &RadialMassProfile,
    geometry: &CubeGeometry,
    velocity_km_s: f64,
    epsilon: f64,
) -> AppResult<MassLossSeries> {
    let radii = shell_radii_pc(geometry);
    let years = lookback_years(&radii, velocity_km_s);
    let dt = time_bin_width(&years)?;

    if radii.len() != profile.len() {
        return Err(AppError::invalid_grid(format!(
            "profile has {} shells but the time axis has {} samples",
            profile.len(),
            radii.len()
        )));
    }

    let points = profile
        .shells
        .iter()
        .zip(radii.iter().zip(&years))
        .map(|(shell, (&radius_pc, &lookback_yr))| {
            let rate = shell.mass_msun / dt;
            RatePoint {
                shell: shell.shell,
                radius_pc,
                lookback_yr,
                mass_msun: shell.mass_msun,
                rate_msun_per_yr: if rate < epsilon { 0.0 } else { rate },
            }
        })
        .collect();

    Ok(MassLossSeries {
        points,
        time_bin_yr: dt,
        velocity_km_s,
        epsilon,
    })
}

/// Epoch with the largest rate; the earliest such shell wins ties.
pub fn peak_epoch(series: &MassLossSeries) -> Option<PeakEpoch> {
    let mut best: Option<(usize, &RatePoint)> = None;
    for (i, p) in series.points.iter().enumerate() {
        match best {
            Some((_, b)) if p.rate_msun_per_yr <= b.rate_msun_per_yr => {}
            _ => best = Some((i, p)),
        }
    }
    best.map(|(index, p)| PeakEpoch {
        index,
        lookback_yr: p.lookback_yr,
        rate_msun_per_yr: p.rate_msun_per_yr,
    })
}
