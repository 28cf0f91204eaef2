//! Input/output helpers.
//!
//! - FITS primary-HDU parsing and writing (`fits`)
//! - density cubes on top of FITS (`cube`)
//! - per-shell CSV export (`export`)
//! - series JSON read/write (`series`)

pub mod cube;
pub mod export;
pub mod fits;
pub mod series;

pub use cube::*;
pub use export::*;
pub use series::*;
