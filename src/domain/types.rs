//! Shared domain types.
//!
//! Cube, profile and series types are plain data so they can be computed in
//! memory, printed, and exported to CSV/JSON without conversion layers.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Proton mass in kg.
pub const PROTON_MASS_KG: f64 = 1.672621777e-27;
/// Solar mass in kg.
pub const SOLAR_MASS_KG: f64 = 1.98855e30;
/// One parsec in cm.
pub const PC_TO_CM: f64 = 3.0857e18;
/// One parsec in km.
pub const PC_TO_KM: f64 = 3.0857e13;
/// Seconds in a 365-day year.
pub const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 60.0 * 60.0;

/// Smallest grid edge that still yields two time samples (`N/2 >= 2`).
pub const MIN_NPIX: usize = 4;

/// Pixel geometry of a cube, taken from its header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubeGeometry {
    /// Voxel edge length in parsec (`CDELT1`).
    pub pixel_scale_pc: f64,
    /// Voxels per axis (`NAXIS1`).
    pub npix: usize,
    /// Offset of the true centre from the grid centre along x, in parsec (`XOFF`).
    pub x_offset_pc: f64,
    /// Same along y (`YOFF`).
    pub y_offset_pc: f64,
}

impl CubeGeometry {
    /// Mass in solar masses of one voxel holding unit electron density (cm^-3).
    ///
    /// `(pixelscale_cm)^3 * m_p / M_sun`
    pub fn voxel_to_msun(&self) -> f64 {
        (self.pixel_scale_pc * PC_TO_CM).powi(3) * PROTON_MASS_KG / SOLAR_MASS_KG
    }

    /// Half the grid edge, in whole pixels.
    pub fn half(&self) -> usize {
        self.npix / 2
    }

    /// Recentering shift in pixels along `(z, y, x)`.
    pub fn recenter_shift_px(&self) -> [f64; 3] {
        [
            0.0,
            -self.y_offset_pc / self.pixel_scale_pc,
            -self.x_offset_pc / self.pixel_scale_pc,
        ]
    }
}

/// A cubic grid of electron densities (cm^-3), stored in FITS order:
/// index `(z, y, x)` with x varying fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCube {
    geometry: CubeGeometry,
    data: Vec<f64>,
}

impl DensityCube {
    /// Build a cube, rejecting anything the shell binning cannot handle.
    pub fn new(geometry: CubeGeometry, data: Vec<f64>) -> AppResult<Self> {
        let expected = voxel_count(&geometry)?;
        let n = geometry.npix;
        if data.len() != expected {
            return Err(AppError::invalid_grid(format!(
                "expected {expected} voxels for a {n}^3 grid, got {}",
                data.len()
            )));
        }
        Ok(Self { geometry, data })
    }

    /// Cube filled with one value; handy for synthetic inputs.
    pub fn filled(geometry: CubeGeometry, value: f64) -> AppResult<Self> {
        let count = voxel_count(&geometry)?;
        Self::new(geometry, vec![value; count])
    }

    pub fn geometry(&self) -> &CubeGeometry {
        &self.geometry
    }

    pub fn npix(&self) -> usize {
        self.geometry.npix
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn index(&self, z: usize, y: usize, x: usize) -> usize {
        let n = self.geometry.npix;
        (z * n + y) * n + x
    }

    pub fn get(&self, z: usize, y: usize, x: usize) -> f64 {
        self.data[self.index(z, y, x)]
    }

    pub fn set(&mut self, z: usize, y: usize, x: usize, value: f64) {
        let i = self.index(z, y, x);
        self.data[i] = value;
    }

    /// Sum of all voxel values (raw density units).
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Replace the voxel data, keeping the geometry.
    pub fn with_data(&self, data: Vec<f64>) -> AppResult<Self> {
        Self::new(self.geometry, data)
    }
}

/// Reject grids that are not even-sized cubes of at least `MIN_NPIX` per side,
/// or whose pixel scale cannot be used for unit conversion.
pub fn validate_geometry(geometry: &CubeGeometry) -> AppResult<()> {
    let n = geometry.npix;
    if n < MIN_NPIX {
        return Err(AppError::invalid_grid(format!(
            "grid size {n} is below the minimum of {MIN_NPIX}"
        )));
    }
    if n % 2 != 0 {
        return Err(AppError::invalid_grid(format!("grid size {n} is odd; N/2 must be whole")));
    }
    if !(geometry.pixel_scale_pc.is_finite() && geometry.pixel_scale_pc > 0.0) {
        return Err(AppError::invalid_grid(format!(
            "pixel scale must be finite and > 0, got {}",
            geometry.pixel_scale_pc
        )));
    }
    if !(geometry.x_offset_pc.is_finite() && geometry.y_offset_pc.is_finite()) {
        return Err(AppError::invalid_grid("centre offsets must be finite"));
    }
    Ok(())
}

/// `N^3` for a valid geometry, rejecting grids too large to address.
pub fn voxel_count(geometry: &CubeGeometry) -> AppResult<usize> {
    validate_geometry(geometry)?;
    let n = geometry.npix;
    n.checked_mul(n)
        .and_then(|plane| plane.checked_mul(n))
        .ok_or_else(|| AppError::invalid_grid(format!("grid size {n} overflows the voxel count")))
}

/// Shell index, radius and integrated mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShellMass {
    pub shell: usize,
    /// Inner radius of the shell, in pixels.
    pub radius_px: f64,
    pub mass_msun: f64,
}

/// Mass per unit-width shell, from the centre out to `N/2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialMassProfile {
    pub shells: Vec<ShellMass>,
    pub voxel_to_msun: f64,
}

impl RadialMassProfile {
    pub fn total_mass(&self) -> f64 {
        self.shells.iter().map(|s| s.mass_msun).sum()
    }

    pub fn len(&self) -> usize {
        self.shells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }
}

/// One sample of the mass-loss history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub shell: usize,
    pub radius_pc: f64,
    pub lookback_yr: f64,
    pub mass_msun: f64,
    pub rate_msun_per_yr: f64,
}

/// Mass-loss rate as a function of look-back time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassLossSeries {
    pub points: Vec<RatePoint>,
    pub time_bin_yr: f64,
    pub velocity_km_s: f64,
    pub epsilon: f64,
}

impl MassLossSeries {
    /// `(lookback_yr, rate)` pairs, in shell order.
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.lookback_yr, p.rate_msun_per_yr))
            .collect()
    }

    pub fn rates(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.rate_msun_per_yr).collect()
    }
}

/// Epoch of maximum mass-loss rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakEpoch {
    pub index: usize,
    pub lookback_yr: f64,
    pub rate_msun_per_yr: f64,
}

/// Mass totals used to sanity-check the shell binning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassBudget {
    /// Sum over every voxel of the recentered cube.
    pub cube_msun: f64,
    /// Sum over all shells.
    pub shells_msun: f64,
    /// Voxels outside the outermost binned shell (cube corners).
    pub unbinned_msun: f64,
}

impl MassBudget {
    /// Relative mismatch between the cube total and shells + unbinned.
    pub fn closure_error(&self) -> f64 {
        let accounted = self.shells_msun + self.unbinned_msun;
        let scale = self.cube_msun.abs().max(f64::MIN_POSITIVE);
        (self.cube_msun - accounted).abs() / scale
    }
}
