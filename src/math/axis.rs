//! Apply 1D line filters along one axis of an N×N×N cube.
//!
//! Cubes are stored `(z, y, x)` with x fastest. Lines along y and x stay inside
//! one z-plane, so planes are processed in parallel; lines along z cross planes
//! and are gathered per `(y, x)` column instead.

use rayon::prelude::*;

/// Axis of a `(z, y, x)` cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Z = 0,
    Y = 1,
    X = 2,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Z, Axis::Y, Axis::X];
}

/// Run `filter(input_line, output_line)` over every line of `data` along `axis`.
///
/// `data` must hold `n^3` values.
pub fn map_lines<F>(data: &[f64], n: usize, axis: Axis, filter: F) -> Vec<f64>
where
    F: Fn(&[f64], &mut [f64]) + Sync,
{
    debug_assert_eq!(data.len(), n * n * n);
    let plane = n * n;
    let mut out = vec![0.0; data.len()];

    match axis {
        Axis::X => {
            out.par_chunks_mut(plane)
                .zip(data.par_chunks(plane))
                .for_each(|(dst, src)| {
                    for (d, s) in dst.chunks_mut(n).zip(src.chunks(n)) {
                        filter(s, d);
                    }
                });
        }
        Axis::Y => {
            out.par_chunks_mut(plane)
                .zip(data.par_chunks(plane))
                .for_each(|(dst, src)| {
                    let mut line_in = vec![0.0; n];
                    let mut line_out = vec![0.0; n];
                    for x in 0..n {
                        for y in 0..n {
                            line_in[y] = src[y * n + x];
                        }
                        filter(&line_in, &mut line_out);
                        for y in 0..n {
                            dst[y * n + x] = line_out[y];
                        }
                    }
                });
        }
        Axis::Z => {
            let columns: Vec<Vec<f64>> = (0..plane)
                .into_par_iter()
                .map(|yx| {
                    let line_in: Vec<f64> = (0..n).map(|z| data[z * plane + yx]).collect();
                    let mut line_out = vec![0.0; n];
                    filter(&line_in, &mut line_out);
                    line_out
                })
                .collect();
            for (yx, column) in columns.iter().enumerate() {
                for (z, v) in column.iter().enumerate() {
                    out[z * plane + yx] = *v;
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n * n * n).map(|i| i as f64).collect()
    }

    #[test]
    fn identity_filter_preserves_cube_on_every_axis() {
        let n = 4;
        let data = ramp(n);
        for axis in Axis::ALL {
            let out = map_lines(&data, n, axis, |src, dst| dst.copy_from_slice(src));
            assert_eq!(out, data, "axis {axis:?}");
        }
    }

    #[test]
    fn lines_follow_the_requested_axis() {
        let n = 3;
        let data = ramp(n);
        // Reversing each line along x mirrors the fastest index only.
        let out = map_lines(&data, n, Axis::X, |src, dst| {
            for (i, v) in src.iter().rev().enumerate() {
                dst[i] = *v;
            }
        });
        assert_eq!(out[0], data[2]);
        assert_eq!(out[2], data[0]);

        let out = map_lines(&data, n, Axis::Z, |src, dst| {
            for (i, v) in src.iter().rev().enumerate() {
                dst[i] = *v;
            }
        });
        assert_eq!(out[0], data[2 * n * n]);
    }
}
