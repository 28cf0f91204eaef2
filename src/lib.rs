//! `nebula-massloss` library crate.
//!
//! Turns a 3D electron-density cube of an expanding nebular shell into a
//! mass-loss-rate history, and renders the figures that go with it. The
//! binary (`massloss`) is a thin wrapper around this library.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod shells;
