//! Export the per-shell mass-loss table to CSV.
//!
//! One row per shell, meant to be easy to consume in spreadsheets or scripts.

use std::path::Path;

use serde::Serialize;

use crate::domain::{CubeGeometry, MassLossSeries};
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
struct ShellRow {
    shell: usize,
    radius_px: f64,
    radius_pc: f64,
    lookback_yr: f64,
    mass_msun: f64,
    rate_msun_per_yr: f64,
}

/// Write the mass-loss series as CSV.
pub fn write_series_csv(path: &Path, series: &MassLossSeries, geometry: &CubeGeometry) -> AppResult<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| AppError::export("CSV", format!("{}: {e}", path.display())))?;

    for p in &series.points {
        let row = ShellRow {
            shell: p.shell,
            radius_px: p.radius_pc / geometry.pixel_scale_pc,
            radius_pc: p.radius_pc,
            lookback_yr: p.lookback_yr,
            mass_msun: p.mass_msun,
            rate_msun_per_yr: p.rate_msun_per_yr,
        };
        writer.serialize(row).map_err(|e| AppError::export("CSV", e))?;
    }

    writer.flush().map_err(|e| AppError::io("Failed to flush CSV", path, e))?;
    log::info!("Wrote {} shells to {}", series.points.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RatePoint;

    #[test]
    fn writes_header_and_one_row_per_shell() {
        let series = MassLossSeries {
            points: vec![
                RatePoint {
                    shell: 0,
                    radius_pc: 0.0,
                    lookback_yr: 0.0,
                    mass_msun: 1e-3,
                    rate_msun_per_yr: 2e-6,
                },
                RatePoint {
                    shell: 1,
                    radius_pc: 0.5,
                    lookback_yr: 500.0,
                    mass_msun: 0.0,
                    rate_msun_per_yr: 0.0,
                },
            ],
            time_bin_yr: 500.0,
            velocity_km_s: 27.0,
            epsilon: 1e-7,
        };
        let geometry = CubeGeometry {
            pixel_scale_pc: 0.25,
            npix: 4,
            x_offset_pc: 0.0,
            y_offset_pc: 0.0,
        };

        let path = std::env::temp_dir().join(format!("massloss-export-{}.csv", std::process::id()));
        write_series_csv(&path, &series, &geometry).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "shell,radius_px,radius_pc,lookback_yr,mass_msun,rate_msun_per_yr");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("1,2.0,0.5,500.0,"), "{}", lines[2]);
    }
}
