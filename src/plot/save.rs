//! Writing figures to disk.
//!
//! A `Figure` knows its pixel size and how to draw itself onto any plotters
//! drawing area; `save_figure` picks the backend from the file extension.
//!
//! SVG carries text natively. Bitmap text needs a font rasteriser, which only
//! exists with the `ttf` feature; without it PNG figures are drawn with no
//! text at all.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{AppError, AppResult};

/// Result of drawing onto a backend `DB`.
pub type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Whether the bitmap backend can rasterise text in this build.
pub const RASTER_TEXT: bool = cfg!(feature = "ttf");

pub trait Figure {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    /// Draw onto `root`. With `labels == false` no text element may be drawn:
    /// no captions, tick labels, axis descriptions or legends.
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, labels: bool) -> DrawResult<DB>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    /// Whether text can be drawn in this format.
    pub fn draws_text(self) -> bool {
        match self {
            OutputFormat::Svg => true,
            OutputFormat::Png => RASTER_TEXT,
        }
    }

    pub fn from_path(path: &Path) -> AppResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => Ok(OutputFormat::Png),
            Some("svg") => Ok(OutputFormat::Svg),
            other => Err(AppError::config(format!(
                "Unsupported figure format {:?} for '{}' (use .png or .svg)",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

/// Write `figure` to `path`; without a path this does nothing.
pub fn save_figure<F: Figure>(figure: &F, path: Option<&Path>) -> AppResult<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let format = OutputFormat::from_path(path)?;

    let labels = format.draws_text();
    if !labels {
        log::warn!("PNG text needs the `ttf` feature; drawing {} without labels", path.display());
    }

    log::info!("Writing figure to file {}", path.display());
    match format {
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, figure.size()).into_drawing_area();
            figure.draw(&root, labels).map_err(AppError::render)?;
            root.present().map_err(AppError::render)?;
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, figure.size()).into_drawing_area();
            figure.draw(&root, labels).map_err(AppError::render)?;
            root.present().map_err(AppError::render)?;
        }
    }
    log::info!("Done.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blank;

    impl Figure for Blank {
        fn size(&self) -> (u32, u32) {
            (40, 30)
        }

        fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, _labels: bool) -> DrawResult<DB> {
            root.fill(&WHITE)
        }
    }

    #[test]
    fn no_path_is_a_no_op() {
        assert!(save_figure(&Blank, None).is_ok());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a.PNG")).unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("a.svg")).unwrap(), OutputFormat::Svg);
        assert!(matches!(
            OutputFormat::from_path(Path::new("a.pdf")),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn writes_svg_file() {
        let path = std::env::temp_dir().join(format!("massloss-blank-{}.svg", std::process::id()));
        save_figure(&Blank, Some(&path)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(text.contains("<svg"));
    }

    fn temp_png(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("massloss-{name}-{}.png", std::process::id()))
    }

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        let _ = std::fs::remove_file(path);
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']), "not a PNG");
    }

    #[test]
    fn png_text_follows_the_font_feature() {
        assert!(OutputFormat::Svg.draws_text());
        assert_eq!(OutputFormat::Png.draws_text(), RASTER_TEXT);
    }

    #[test]
    fn rate_figure_writes_png() {
        use crate::plot::{MassLossFigure, RateStyle};

        let fig = MassLossFigure {
            pairs: vec![(0.0, 0.0), (6000.0, 2e-6), (30000.0, 1e-6)],
            style: RateStyle::default(),
            font_family: "sans-serif".into(),
        };
        let path = temp_png("rate");
        save_figure(&fig, Some(&path)).unwrap();
        assert_png(&path);
    }

    #[test]
    fn gallery_figure_writes_png() {
        use crate::models::gallery_panels;
        use crate::plot::{GalleryFigure, GalleryStyle};

        let mut panels = gallery_panels();
        for p in &mut panels {
            p.npix = 11;
        }
        let style = GalleryStyle {
            smoothing: 0.0,
            ..GalleryStyle::default()
        };
        let fig = GalleryFigure::build(&panels, style, "sans-serif");
        let path = temp_png("gallery");
        save_figure(&fig, Some(&path)).unwrap();
        assert_png(&path);
    }
}
