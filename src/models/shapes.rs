//! Geometric density models: shells, torus, dual cone and helices.
//!
//! All lengths are in units of the grid half-width; angles in degrees.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::models::model::DensityModel;

/// Spherical shell with `rho ∝ (r / rin)^-exponent` between `rin` and `rout`.
///
/// `exponent = 0` gives a constant-density shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawShell {
    pub rin: f64,
    pub rout: f64,
    pub exponent: f64,
}

impl DensityModel for PowerLawShell {
    fn name(&self) -> &'static str {
        "power-law shell"
    }

    fn density(&self, p: &Vector3<f64>) -> f64 {
        let r = p.norm();
        if r < self.rin || r > self.rout {
            return 0.0;
        }
        if self.exponent == 0.0 {
            1.0
        } else {
            (r / self.rin).powf(-self.exponent)
        }
    }
}

/// Gaussian radial profile peaking at `r`, truncated to `[rlo, rup]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncatedNormalShell {
    pub r: f64,
    pub sigma: f64,
    pub rlo: f64,
    pub rup: f64,
}

impl DensityModel for TruncatedNormalShell {
    fn name(&self) -> &'static str {
        "truncated normal shell"
    }

    fn density(&self, p: &Vector3<f64>) -> f64 {
        let rho = p.norm();
        if rho < self.rlo || rho > self.rup {
            return 0.0;
        }
        let d = (rho - self.r) / self.sigma;
        (-0.5 * d * d).exp()
    }
}

/// Torus in the xy-plane: ring radius `r`, tube radius `rcross`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantDensityTorus {
    pub r: f64,
    pub rcross: f64,
}

impl DensityModel for ConstantDensityTorus {
    fn name(&self) -> &'static str {
        "constant-density torus"
    }

    fn density(&self, p: &Vector3<f64>) -> f64 {
        let ring = (p.x * p.x + p.y * p.y).sqrt() - self.r;
        if ring * ring + p.z * p.z <= self.rcross * self.rcross {
            1.0
        } else {
            0.0
        }
    }
}

/// Two opposite cones along z with full opening angle `theta_deg`, cut at radius `r`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantDensityDualCone {
    pub r: f64,
    pub theta_deg: f64,
}

impl DensityModel for ConstantDensityDualCone {
    fn name(&self) -> &'static str {
        "constant-density dual cone"
    }

    fn density(&self, p: &Vector3<f64>) -> f64 {
        let dist = p.norm();
        if dist > self.r {
            return 0.0;
        }
        let half = (0.5 * self.theta_deg).to_radians();
        if p.z.abs() >= dist * half.cos() { 1.0 } else { 0.0 }
    }
}

/// Surface the helix winds on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelixEnvelope {
    /// Winding radius grows with `|z|` (45 degree half-opening).
    DualCone,
    /// Constant winding radius equal to the half-height.
    Cylinder,
}

/// Tube of radius `rtube` around a helix of half-height `h` making `nturns`
/// turns about the z axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Helix3D {
    pub h: f64,
    pub nturns: f64,
    pub rtube: f64,
    pub envelope: HelixEnvelope,
    /// Curve samples, ascending in z.
    curve: Vec<Vector3<f64>>,
}

const HELIX_SAMPLES_PER_TURN: usize = 720;

impl Helix3D {
    pub fn new(h: f64, nturns: f64, rtube: f64, envelope: HelixEnvelope) -> Self {
        let count = ((nturns.abs().max(1.0) * HELIX_SAMPLES_PER_TURN as f64) as usize).max(2);
        let curve = (0..count)
            .map(|i| {
                let t = -1.0 + 2.0 * i as f64 / (count - 1) as f64;
                let z = h * t;
                let radius = match envelope {
                    HelixEnvelope::DualCone => z.abs(),
                    HelixEnvelope::Cylinder => h,
                };
                let phi = PI * nturns * (t + 1.0);
                Vector3::new(radius * phi.cos(), radius * phi.sin(), z)
            })
            .collect();
        Self {
            h,
            nturns,
            rtube,
            envelope,
            curve,
        }
    }
}

impl DensityModel for Helix3D {
    fn name(&self) -> &'static str {
        match self.envelope {
            HelixEnvelope::DualCone => "helix on dual cone",
            HelixEnvelope::Cylinder => "helix on cylinder",
        }
    }

    fn density(&self, p: &Vector3<f64>) -> f64 {
        let lo = self.curve.partition_point(|c| c.z < p.z - self.rtube);
        let r2 = self.rtube * self.rtube;
        let inside = self.curve[lo..]
            .iter()
            .take_while(|c| c.z <= p.z + self.rtube)
            .any(|c| (c - p).norm_squared() <= r2);
        if inside { 1.0 } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_shell_is_hollow() {
        let shell = PowerLawShell {
            rin: 0.4,
            rout: 0.8,
            exponent: 0.0,
        };
        assert_eq!(shell.density(&Vector3::zeros()), 0.0);
        assert_eq!(shell.density(&Vector3::new(0.6, 0.0, 0.0)), 1.0);
        assert_eq!(shell.density(&Vector3::new(0.0, 0.9, 0.0)), 0.0);
    }

    #[test]
    fn power_law_shell_falls_off() {
        let shell = PowerLawShell {
            rin: 0.2,
            rout: 1.0,
            exponent: 2.0,
        };
        let at = |r: f64| shell.density(&Vector3::new(r, 0.0, 0.0));
        assert!((at(0.4) - 0.25).abs() < 1e-12);
        assert!(at(0.3) > at(0.6));
    }

    #[test]
    fn truncated_normal_peaks_at_r_and_cuts_off() {
        let shell = TruncatedNormalShell {
            r: 0.5,
            sigma: 0.1,
            rlo: 0.3,
            rup: 1.0,
        };
        assert_eq!(shell.density(&Vector3::new(0.0, 0.0, 0.5)), 1.0);
        assert_eq!(shell.density(&Vector3::new(0.0, 0.0, 0.29)), 0.0);
        assert!(shell.density(&Vector3::new(0.0, 0.0, 0.31)) > 0.0);
    }

    #[test]
    fn torus_has_a_hole() {
        let torus = ConstantDensityTorus { r: 0.6, rcross: 0.25 };
        assert_eq!(torus.density(&Vector3::zeros()), 0.0);
        assert_eq!(torus.density(&Vector3::new(0.6, 0.0, 0.0)), 1.0);
        assert_eq!(torus.density(&Vector3::new(0.0, 0.6, 0.3)), 0.0);
    }

    #[test]
    fn dual_cone_opens_along_z() {
        let cone = ConstantDensityDualCone { r: 0.8, theta_deg: 45.0 };
        assert_eq!(cone.density(&Vector3::new(0.0, 0.0, 0.5)), 1.0);
        assert_eq!(cone.density(&Vector3::new(0.0, 0.0, -0.5)), 1.0);
        assert_eq!(cone.density(&Vector3::new(0.5, 0.0, 0.0)), 0.0);
        assert_eq!(cone.density(&Vector3::new(0.0, 0.0, 0.9)), 0.0);
    }

    #[test]
    fn helix_tube_follows_the_curve() {
        let helix = Helix3D::new(0.6, 1.0, 0.1, HelixEnvelope::Cylinder);
        // t = -1: phi = 0, point (h, 0, -h).
        assert_eq!(helix.density(&Vector3::new(0.6, 0.0, -0.6)), 1.0);
        assert_eq!(helix.density(&Vector3::new(0.0, 0.0, 0.0)), 0.0);
        // t = 0: half a turn, point (-h, 0, 0).
        assert_eq!(helix.density(&Vector3::new(-0.6, 0.0, 0.0)), 1.0);
    }

    #[test]
    fn conical_helix_narrows_at_the_waist() {
        let helix = Helix3D::new(0.7, 1.0, 0.05, HelixEnvelope::DualCone);
        assert_eq!(helix.density(&Vector3::zeros()), 1.0);
        assert_eq!(helix.density(&Vector3::new(0.7, 0.0, 0.0)), 0.0);
    }
}
