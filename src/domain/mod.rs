//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the density cube and its header geometry (`DensityCube`, `CubeGeometry`)
//! - shell profiles and mass-loss series (`RadialMassProfile`, `MassLossSeries`)
//! - physical constants for unit conversion

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
