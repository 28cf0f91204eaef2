//! Reporting: formatted terminal output for profiling runs and cube inspection.

pub mod format;

pub use format::*;
