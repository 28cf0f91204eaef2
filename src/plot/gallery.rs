//! Side-by-side gallery of projected density models.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::models::{GalleryPanel, Projection};
use crate::plot::save::{DrawResult, Figure};
use crate::plot::style::GalleryStyle;

/// A projected panel, ready to draw.
pub struct RenderedPanel {
    pub label: String,
    pub title: String,
    pub projection: Projection,
}

pub struct GalleryFigure {
    pub panels: Vec<RenderedPanel>,
    pub style: GalleryStyle,
    pub font_family: String,
}

impl GalleryFigure {
    /// Sample and project every panel.
    pub fn build(panels: &[GalleryPanel], style: GalleryStyle, font_family: &str) -> Self {
        let rendered = panels
            .iter()
            .map(|panel| {
                log::info!("Panel: {} {}", panel.label, panel.model.name());
                RenderedPanel {
                    label: panel.label.to_string(),
                    title: panel.title.to_string(),
                    projection: panel.project(style.smoothing),
                }
            })
            .collect();
        Self {
            panels: rendered,
            style,
            font_family: font_family.to_string(),
        }
    }
}

/// Image cell `(ix, iy)` of an `n`-pixel panel spanning `[-1, 1]`.
fn cell_bounds(ix: usize, iy: usize, n: usize) -> [(f64, f64); 2] {
    let w = 2.0 / n as f64;
    let x0 = -1.0 + ix as f64 * w;
    let y0 = -1.0 + iy as f64 * w;
    [(x0, y0), (x0 + w, y0 + w)]
}

impl Figure for GalleryFigure {
    fn size(&self) -> (u32, u32) {
        (self.style.width, self.style.height)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, labels: bool) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        if self.panels.is_empty() {
            return Ok(());
        }

        let family = self.font_family.as_str();
        let size = self.style.font_size as f64;
        let areas = root.split_evenly((1, self.panels.len()));

        for (i, (panel, area)) in self.panels.iter().zip(areas.iter()).enumerate() {
            let mut builder = ChartBuilder::on(area);
            builder.margin(6);
            if labels {
                builder
                    .caption(&panel.title, (family, size * 1.2))
                    .x_label_area_size(28)
                    .y_label_area_size(if i == 0 { 34 } else { 24 });
            }
            let mut chart = builder.build_cartesian_2d(-1.0..1.0, -1.0..1.0)?;

            let mut mesh = chart.configure_mesh();
            mesh.disable_mesh()
                .x_labels(5)
                .y_labels(5)
                .x_desc("x")
                .label_style((family, size))
                .axis_desc_style((family, size));
            if i == 0 {
                mesh.y_desc("y");
            }
            mesh.draw()?;

            let n = panel.projection.npix;
            let cmap = self.style.colormap;
            chart.draw_series((0..n).flat_map(|iy| {
                (0..n).map(move |ix| {
                    let color = cmap.color(panel.projection.get(iy, ix));
                    Rectangle::new(cell_bounds(ix, iy, n), color.filled())
                })
            }))?;

            if labels {
                chart.draw_series(std::iter::once(Text::new(
                    panel.label.clone(),
                    (-0.8, -0.8),
                    (family, size).into_font().color(&WHITE),
                )))?;
            }
        }

        Ok(())
    }
}
