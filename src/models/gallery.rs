//! The six model panels of the gallery figure.

use crate::models::model::{DensityModel, ModelGrid, Placement, Projection};
use crate::models::shapes::{
    ConstantDensityDualCone, ConstantDensityTorus, Helix3D, HelixEnvelope, PowerLawShell,
    TruncatedNormalShell,
};

/// Gaussian smoothing applied to every gallery model, in voxels.
pub const GALLERY_SMOOTHING: f64 = 1.0;

/// One configured model panel.
pub struct GalleryPanel {
    pub label: &'static str,
    pub title: &'static str,
    pub npix: usize,
    pub placement: Placement,
    pub model: Box<dyn DensityModel>,
}

impl GalleryPanel {
    pub fn project(&self, smoothing: f64) -> Projection {
        ModelGrid::sample(self.model.as_ref(), self.npix, &self.placement, smoothing).project()
    }
}

/// Panels (a)-(f) in display order.
pub fn gallery_panels() -> Vec<GalleryPanel> {
    vec![
        GalleryPanel {
            label: "(a)",
            title: "Constant-density shell",
            npix: 201,
            placement: Placement::default(),
            model: Box::new(PowerLawShell {
                rin: 0.4,
                rout: 0.8,
                exponent: 0.0,
            }),
        },
        GalleryPanel {
            label: "(b)",
            title: "Truncated Normal shell",
            npix: 201,
            placement: Placement::default(),
            model: Box::new(TruncatedNormalShell {
                r: 0.5,
                sigma: 0.1,
                rlo: 0.3,
                rup: 1.0,
            }),
        },
        GalleryPanel {
            label: "(c)",
            title: "Constant-density torus",
            npix: 201,
            placement: Placement::tilted(35.0, 0.0, 45.0),
            model: Box::new(ConstantDensityTorus { r: 0.6, rcross: 0.25 }),
        },
        GalleryPanel {
            label: "(d)",
            title: "Constant-density dual cone",
            npix: 201,
            placement: Placement::tilted(30.0, 0.0, 50.0),
            model: Box::new(ConstantDensityDualCone { r: 0.8, theta_deg: 45.0 }),
        },
        GalleryPanel {
            label: "(e)",
            title: "Helix on dual cone",
            npix: 101,
            placement: Placement::tilted(-90.0, 0.0, 0.0),
            model: Box::new(Helix3D::new(0.7, 1.0, 0.17, HelixEnvelope::DualCone)),
        },
        GalleryPanel {
            label: "(f)",
            title: "Helix on cylinder",
            npix: 101,
            placement: Placement::tilted(-90.0, 0.0, 0.0),
            model: Box::new(Helix3D::new(0.6, 1.0, 0.17, HelixEnvelope::Cylinder)),
        },
    ]
}
