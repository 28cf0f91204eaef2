//! Radial distance grid and unit-width shell integration.
//!
//! Shell `j` collects voxels with `j < R <= j + 1` (in pixels from the grid
//! centre); shell 0 also takes the centre voxel `R == 0`. Shells run from 0 to
//! `N/2 - 2`; the profile still has `N/2` entries so it lines up with the time
//! axis, and the last entry stays zero.

use nalgebra::Vector3;

use crate::domain::{DensityCube, MassBudget, RadialMassProfile, ShellMass};

/// Distance of each `(z, y, x)` voxel from the grid centre `N/2`, in pixels.
pub fn radial_distance_grid(n: usize) -> Vec<f64> {
    let half = (n / 2) as f64;
    let coord: Vec<f64> = (0..n).map(|i| i as f64 - half).collect();
    let mut r = Vec::with_capacity(n * n * n);
    for &z in &coord {
        for &y in &coord {
            for &x in &coord {
                r.push(Vector3::new(y, z, x).norm());
            }
        }
    }
    r
}

/// Shell index for a voxel at distance `r`, or `None` past the outermost shell.
pub fn shell_index(r: f64, binned_shells: usize) -> Option<usize> {
    if r == 0.0 {
        return Some(0);
    }
    // ceil(r) - 1 is the unique j with j < r <= j + 1.
    let j = r.ceil() as usize - 1;
    (j < binned_shells).then_some(j)
}

/// Integrate voxel densities into shells and convert to solar masses.
///
/// Returns the profile along with whole-cube and unbinned totals.
pub fn shell_masses(cube: &DensityCube) -> (RadialMassProfile, MassBudget) {
    let n = cube.npix();
    let half = cube.geometry().half();
    let binned = half - 1;
    let voxel_to_msun = cube.geometry().voxel_to_msun();

    let radii = radial_distance_grid(n);
    let mut sums = vec![0.0; half];
    let mut unbinned = 0.0;
    for (&r, &rho) in radii.iter().zip(cube.data()) {
        match shell_index(r, binned) {
            Some(j) => sums[j] += rho,
            None => unbinned += rho,
        }
    }

    let shells: Vec<ShellMass> = sums
        .iter()
        .enumerate()
        .map(|(j, s)| ShellMass {
            shell: j,
            radius_px: j as f64,
            mass_msun: s * voxel_to_msun,
        })
        .collect();

    let profile = RadialMassProfile {
        shells,
        voxel_to_msun,
    };
    let budget = MassBudget {
        cube_msun: cube.data().iter().map(|rho| rho * voxel_to_msun).sum(),
        shells_msun: profile.total_mass(),
        unbinned_msun: unbinned * voxel_to_msun,
    };
    (profile, budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CubeGeometry;

    fn geometry(npix: usize) -> CubeGeometry {
        CubeGeometry {
            pixel_scale_pc: 1.0,
            npix,
            x_offset_pc: 0.0,
            y_offset_pc: 0.0,
        }
    }

    #[test]
    fn centre_voxel_sits_at_half_index() {
        let n = 4;
        let r = radial_distance_grid(n);
        assert_eq!(r[(2 * n + 2) * n + 2], 0.0);
        assert_eq!(r[(2 * n + 2) * n + 3], 1.0);
        assert_eq!(r[0], 12f64.sqrt());
    }

    #[test]
    fn radius_sums_offsets_in_meshgrid_order() {
        let n = 6;
        let half = (n / 2) as f64;
        let r = radial_distance_grid(n);
        for (idx, &got) in r.iter().enumerate() {
            let dz = (idx / (n * n)) as f64 - half;
            let dy = ((idx / n) % n) as f64 - half;
            let dx = (idx % n) as f64 - half;
            assert_eq!(got.to_bits(), (dy * dy + dz * dz + dx * dx).sqrt().to_bits());
        }
        // (z, y, x) = (0, 3, 5): dy = 0, dz = -3, dx = 2.
        assert_eq!(r[5 + n * 3], 13f64.sqrt());
    }

    #[test]
    fn shell_index_uses_half_open_intervals() {
        assert_eq!(shell_index(0.0, 3), Some(0));
        assert_eq!(shell_index(1.0, 3), Some(0));
        assert_eq!(shell_index(1.0 + 1e-12, 3), Some(1));
        assert_eq!(shell_index(3.0, 3), Some(2));
        assert_eq!(shell_index(3.5, 3), None);
    }

    #[test]
    fn four_cube_shell_zero_holds_centre_and_face_neighbours() {
        let cube = DensityCube::filled(geometry(4), 1.0).unwrap();
        let (profile, budget) = shell_masses(&cube);
        let f = cube.geometry().voxel_to_msun();

        assert_eq!(profile.len(), 2);
        assert_eq!(profile.shells[0].mass_msun, 7.0 * f);
        assert_eq!(profile.shells[1].mass_msun, 0.0);
        assert!((budget.cube_msun - 64.0 * f).abs() <= 1e-12 * 64.0 * f);
        assert!((budget.unbinned_msun - 57.0 * f).abs() <= 1e-12 * 57.0 * f);
    }

    #[test]
    fn uniform_cube_mass_is_fully_accounted() {
        let rho0 = 3.5;
        let cube = DensityCube::filled(geometry(12), rho0).unwrap();
        let (_, budget) = shell_masses(&cube);
        let want = rho0 * 12f64.powi(3) * cube.geometry().voxel_to_msun();
        assert!((budget.cube_msun - want).abs() / want < 1e-12);
        assert!(budget.closure_error() < 1e-12);
    }

    #[test]
    fn confined_density_leaves_outer_shells_empty() {
        let n = 16;
        let r0 = 3.0;
        let radii = radial_distance_grid(n);
        let data: Vec<f64> = radii.iter().map(|&r| if r <= r0 { 2.0 } else { 0.0 }).collect();
        let cube = DensityCube::new(geometry(n), data).unwrap();
        let (profile, budget) = shell_masses(&cube);

        for s in &profile.shells {
            if s.radius_px >= r0 {
                assert_eq!(s.mass_msun, 0.0, "shell {}", s.shell);
            }
        }
        assert!(profile.shells[2].mass_msun > 0.0);
        assert_eq!(budget.unbinned_msun, 0.0);
        assert!((budget.cube_msun - budget.shells_msun).abs() / budget.cube_msun < 1e-12);
    }
}
