//! Figure styling passed explicitly to each renderer.
//!
//! Every field has a default matching the published figures, and a style
//! file only needs to name what it overrides:
//!
//! ```json
//! { "rate": { "x_limits": [-30000.0, 0.0], "legend": "33-GHz model" } }
//! ```

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::plot::colormap::Colormap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub font_family: String,
    pub rate: RateStyle,
    pub gallery: GalleryStyle,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            rate: RateStyle::default(),
            gallery: GalleryStyle::default(),
        }
    }
}

impl PlotStyle {
    pub fn load(path: &Path) -> AppResult<Self> {
        let file = File::open(path).map_err(|e| AppError::io("Failed to open style file", path, e))?;
        let style: PlotStyle = serde_json::from_reader(file)
            .map_err(|e| AppError::config(format!("Invalid style file '{}': {e}", path.display())))?;
        style.validate()?;
        Ok(style)
    }

    /// Style from an optional file, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        let r = &self.rate;
        for (name, v) in [
            ("x_major", r.x_major),
            ("x_minor", r.x_minor),
            ("y_major", r.y_major),
            ("y_minor", r.y_minor),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(AppError::config(format!("rate.{name} must be > 0, got {v}")));
            }
        }
        for (name, lim) in [("x_limits", r.x_limits), ("y_limits", r.y_limits)] {
            if let Some((lo, hi)) = lim {
                if !(lo.is_finite() && hi.is_finite() && hi > lo) {
                    return Err(AppError::config(format!("rate.{name} must be increasing, got [{lo}, {hi}]")));
                }
            }
        }
        if r.width == 0 || r.height == 0 || self.gallery.width == 0 || self.gallery.height == 0 {
            return Err(AppError::config("figure sizes must be non-zero"));
        }
        Ok(())
    }
}

/// Mass-loss-rate step plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateStyle {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    /// Time axis range in years, negative into the past.
    pub x_limits: Option<(f64, f64)>,
    /// Rate axis range; derived from the data when absent.
    pub y_limits: Option<(f64, f64)>,
    pub x_major: f64,
    pub x_minor: f64,
    pub y_major: f64,
    pub y_minor: f64,
    pub line_width: u32,
    pub grid: bool,
    pub legend: Option<String>,
}

impl Default for RateStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            font_size: 16,
            x_limits: Some((-25000.0, 0.0)),
            y_limits: None,
            x_major: 5000.0,
            x_minor: 1000.0,
            y_major: 2e-6,
            y_minor: 1e-6,
            line_width: 2,
            grid: true,
            legend: Some("17-GHz data TNS model".to_string()),
        }
    }
}

/// Model gallery panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryStyle {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    pub colormap: Colormap,
    /// Gaussian smoothing of each model cube, in voxels.
    pub smoothing: f64,
}

impl Default for GalleryStyle {
    fn default() -> Self {
        Self {
            width: 1700,
            height: 310,
            font_size: 10,
            colormap: Colormap::BluesR,
            smoothing: crate::models::GALLERY_SMOOTHING,
        }
    }
}
