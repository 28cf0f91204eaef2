//! Cubic B-spline shifting of sampled lines and cubes.
//!
//! A line is first converted to B-spline coefficients with the recursive
//! prefilter (pole `z = sqrt(3) - 2`, mirror boundary), then resampled at
//! `i - shift`. Positions that fall outside `[0, n - 1]` are set to zero, so
//! material shifted off the grid is lost rather than wrapped.
//!
//! Fractional shifts produce small ringing (including slightly negative
//! values) next to sharp edges; callers that need non-negative output clamp
//! afterwards.

use crate::math::axis::{Axis, map_lines};

const POLE: f64 = -0.267_949_192_431_122_7; // sqrt(3) - 2
const GAIN: f64 = 6.0; // (1 - z)(1 - 1/z)

/// Samples this close outside the grid still count as inside.
const EDGE_TOL: f64 = 1e-9;

/// Cubic B-spline basis function.
pub fn bspline3(t: f64) -> f64 {
    let a = t.abs();
    if a < 1.0 {
        2.0 / 3.0 - a * a + 0.5 * a * a * a
    } else if a < 2.0 {
        let u = 2.0 - a;
        u * u * u / 6.0
    } else {
        0.0
    }
}

/// Convert samples to cubic B-spline coefficients in place.
pub fn prefilter(c: &mut [f64]) {
    let n = c.len();
    if n < 2 {
        return;
    }
    for v in c.iter_mut() {
        *v *= GAIN;
    }

    c[0] = causal_init(c);
    for k in 1..n {
        c[k] += POLE * c[k - 1];
    }

    c[n - 1] = (POLE / (POLE * POLE - 1.0)) * (c[n - 1] + POLE * c[n - 2]);
    for k in (0..n - 1).rev() {
        c[k] = POLE * (c[k + 1] - c[k]);
    }
}

/// Exact first causal coefficient for a mirror-symmetric extension.
fn causal_init(c: &[f64]) -> f64 {
    let n = c.len();
    let iz = 1.0 / POLE;
    let mut zn = POLE;
    let mut z2n = POLE.powi(n as i32 - 1);
    let mut sum = c[0] + z2n * c[n - 1];
    z2n *= z2n * iz;
    for v in &c[1..n - 1] {
        sum += (zn + z2n) * v;
        zn *= POLE;
        z2n *= iz;
    }
    sum / (1.0 - zn * zn)
}

/// Whole-sample mirror of an index into `0..n`.
fn mirror(k: i64, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as i64 - 1);
    let mut k = k.rem_euclid(period);
    if k >= n as i64 {
        k = period - k;
    }
    k as usize
}

/// Evaluate the spline defined by `coeffs` at fractional position `x`.
pub fn eval(coeffs: &[f64], x: f64) -> f64 {
    let n = coeffs.len();
    if n == 0 || x < -EDGE_TOL || x > (n - 1) as f64 + EDGE_TOL {
        return 0.0;
    }
    if n == 1 {
        return coeffs[0];
    }
    let base = x.floor() as i64;
    let mut acc = 0.0;
    for k in (base - 1)..=(base + 2) {
        let w = bspline3(x - k as f64);
        if w != 0.0 {
            acc += w * coeffs[mirror(k, n)];
        }
    }
    acc
}

/// Shift one line by `shift` samples: `out[i] = f(i - shift)`.
pub fn shift_line(src: &[f64], shift: f64, out: &mut [f64]) {
    if shift == 0.0 {
        out.copy_from_slice(src);
        return;
    }
    let mut coeffs = src.to_vec();
    prefilter(&mut coeffs);
    for (i, o) in out.iter_mut().enumerate() {
        *o = eval(&coeffs, i as f64 - shift);
    }
}

/// Shift an N×N×N `(z, y, x)` cube by `shift[axis]` samples along each axis.
///
/// Axes with a zero shift are skipped entirely, so a zero shift returns the
/// input unchanged.
pub fn shift_cube(data: &[f64], n: usize, shift: [f64; 3]) -> Vec<f64> {
    let mut current = data.to_vec();
    for axis in Axis::ALL {
        let s = shift[axis as usize];
        if s == 0.0 {
            continue;
        }
        current = map_lines(&current, n, axis, |src, dst| shift_line(src, s, dst));
    }
    current
}
