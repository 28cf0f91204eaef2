//! Geometric density models rendered in the model gallery.
//!
//! Models are small structs implementing `DensityModel`, so grid sampling,
//! smoothing and projection stay generic.

pub mod gallery;
pub mod model;
pub mod shapes;

pub use gallery::*;
pub use model::*;
pub use shapes::*;
