//! Figure rendering with plotters.
//!
//! - the mass-loss-rate step plot (`rate`)
//! - the density-model gallery (`gallery`)
//! - colormaps, styles, and backend selection by file extension

pub mod colormap;
pub mod gallery;
pub mod rate;
pub mod save;
pub mod style;

pub use colormap::Colormap;
pub use gallery::GalleryFigure;
pub use rate::MassLossFigure;
pub use save::{Figure, OutputFormat, save_figure};
pub use style::{GalleryStyle, PlotStyle, RateStyle};
