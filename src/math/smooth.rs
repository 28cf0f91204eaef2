//! Separable Gaussian smoothing of cubes.
//!
//! The kernel is truncated at `4 sigma` and normalised to unit sum; lines are
//! extended by half-sample reflection (`d c b a | a b c d | d c b a`).

use crate::math::axis::{Axis, map_lines};

const TRUNCATE: f64 = 4.0;

/// Normalised 1D Gaussian kernel of radius `round(4 sigma)`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as usize;
    let two_s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-x * x / two_s2).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

fn reflect(k: i64, n: usize) -> usize {
    let n = n as i64;
    let period = 2 * n;
    let mut k = k.rem_euclid(period);
    if k >= n {
        k = period - 1 - k;
    }
    k as usize
}

/// Convolve one line with `kernel`.
pub fn convolve_line(src: &[f64], kernel: &[f64], out: &mut [f64]) {
    let n = src.len();
    let radius = (kernel.len() / 2) as i64;
    for (i, o) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (j, w) in kernel.iter().enumerate() {
            let k = i as i64 + j as i64 - radius;
            acc += w * src[reflect(k, n)];
        }
        *o = acc;
    }
}

/// Smooth an N×N×N cube with an isotropic Gaussian of `sigma` voxels.
///
/// `sigma <= 0` returns the input unchanged.
pub fn gaussian_smooth(data: &[f64], n: usize, sigma: f64) -> Vec<f64> {
    if !(sigma > 0.0) {
        return data.to_vec();
    }
    let kernel = gaussian_kernel(sigma);
    let mut current = data.to_vec();
    for axis in Axis::ALL {
        current = map_lines(&current, n, axis, |src, dst| convolve_line(src, &kernel, dst));
    }
    current
}
