//! Density model contract and grid evaluation.
//!
//! A model is a pure function of position in its own frame, where the grid
//! spans `[-1, 1]` on every axis. `Placement` tilts and shifts the model
//! frame relative to the sky frame; `ModelGrid` samples a placed model on an
//! N^3 grid, optionally smooths it, and projects it along the line of sight.

use nalgebra::{Rotation3, Vector3};
use rayon::prelude::*;

use crate::math::gaussian_smooth;
use crate::shells::linspace;

/// Something that can report a density at a point of its own frame.
pub trait DensityModel: Sync {
    fn name(&self) -> &'static str;

    /// Density at `p` (model frame, grid half-width 1).
    fn density(&self, p: &Vector3<f64>) -> f64;
}

/// Orientation and offset of a model on the sky.
///
/// Tilts are in degrees and applied about x, then y, then z.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Placement {
    pub tilt_x_deg: f64,
    pub tilt_y_deg: f64,
    pub tilt_z_deg: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl Placement {
    pub fn tilted(tilt_x_deg: f64, tilt_y_deg: f64, tilt_z_deg: f64) -> Self {
        Self {
            tilt_x_deg,
            tilt_y_deg,
            tilt_z_deg,
            ..Self::default()
        }
    }

    fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_euler_angles(
            self.tilt_x_deg.to_radians(),
            self.tilt_y_deg.to_radians(),
            self.tilt_z_deg.to_radians(),
        )
    }
}

/// A model sampled on an N×N×N `(z, y, x)` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGrid {
    pub npix: usize,
    pub data: Vec<f64>,
}

impl ModelGrid {
    /// Sample `model` at every voxel centre, then smooth with a Gaussian of
    /// `smoothing` voxels (`0` disables smoothing).
    pub fn sample(model: &dyn DensityModel, npix: usize, placement: &Placement, smoothing: f64) -> Self {
        let coord = linspace(-1.0, 1.0, npix);
        let inverse = placement.rotation().inverse();
        let plane = npix * npix;
        let mut data = vec![0.0; npix * plane];

        data.par_chunks_mut(plane).enumerate().for_each(|(iz, slab)| {
            let z = coord[iz];
            for (iy, row) in slab.chunks_mut(npix).enumerate() {
                let y = coord[iy] - placement.y_offset;
                for (ix, v) in row.iter_mut().enumerate() {
                    let x = coord[ix] - placement.x_offset;
                    let p = inverse * Vector3::new(x, y, z);
                    *v = model.density(&p);
                }
            }
        });

        let data = gaussian_smooth(&data, npix, smoothing);
        Self { npix, data }
    }

    /// Line-of-sight (z) sum, as an N×N `(y, x)` image normalised to a peak of 1.
    pub fn project(&self) -> Projection {
        let n = self.npix;
        let plane = n * n;
        let mut image = vec![0.0; plane];
        for slab in self.data.chunks(plane) {
            for (acc, v) in image.iter_mut().zip(slab) {
                *acc += v;
            }
        }
        let peak = image.iter().copied().fold(0.0, f64::max);
        if peak > 0.0 {
            for v in &mut image {
                *v /= peak;
            }
        }
        Projection { npix: n, image }
    }
}

/// A 2D projected image, row-major `(y, x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub npix: usize,
    pub image: Vec<f64>,
}

impl Projection {
    pub fn get(&self, y: usize, x: usize) -> f64 {
        self.image[y * self.npix + x]
    }
}
