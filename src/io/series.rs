//! Read/write mass-loss series JSON files.
//!
//! Series JSON is the portable record of one `massloss rate` run: the cube
//! geometry, the physical inputs, the peak epoch, the mass budget, and every
//! shell. `massloss plot` re-renders the figure from it without the cube.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CubeGeometry, MassBudget, MassLossSeries, PeakEpoch};
use crate::error::{AppError, AppResult};
use crate::shells::ShellAnalysis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub source: PathBuf,
    pub geometry: CubeGeometry,
    pub peak: PeakEpoch,
    pub budget: MassBudget,
    pub series: MassLossSeries,
}

impl SeriesFile {
    pub fn from_analysis(source: &Path, analysis: &ShellAnalysis) -> Self {
        Self {
            tool: "massloss".to_string(),
            generated: Utc::now(),
            source: source.to_path_buf(),
            geometry: *analysis.recentered.geometry(),
            peak: analysis.peak,
            budget: analysis.budget,
            series: analysis.series.clone(),
        }
    }
}

pub fn write_series_json(path: &Path, file: &SeriesFile) -> AppResult<()> {
    let out = File::create(path).map_err(|e| AppError::io("Failed to create series JSON", path, e))?;
    serde_json::to_writer_pretty(out, file).map_err(|e| AppError::export("series JSON", e))?;
    log::info!("Wrote series JSON to {}", path.display());
    Ok(())
}

pub fn read_series_json(path: &Path) -> AppResult<SeriesFile> {
    let file = File::open(path).map_err(|e| AppError::io("Failed to open series JSON", path, e))?;
    serde_json::from_reader(file).map_err(|e| AppError::config(format!("Invalid series JSON '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DensityCube;
    use crate::shells::ShellMassProfiler;

    #[test]
    fn series_json_reloads() {
        let geometry = CubeGeometry {
            pixel_scale_pc: 0.1,
            npix: 8,
            x_offset_pc: 0.0,
            y_offset_pc: 0.0,
        };
        let cube = DensityCube::filled(geometry, 50.0).unwrap();
        let analysis = ShellMassProfiler::new(27.0, 0.0).unwrap().analyze(&cube).unwrap();
        let file = SeriesFile::from_analysis(Path::new("uniform.fits"), &analysis);

        let path = std::env::temp_dir().join(format!("massloss-series-{}.json", std::process::id()));
        write_series_json(&path, &file).unwrap();
        let back = read_series_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.series.points.len(), 4);
        assert_eq!(back.peak.index, file.peak.index);
        assert_eq!(back.geometry, geometry);
        assert_eq!(back.tool, "massloss");
    }
}
