//! Application error type.
//!
//! Every failure carries the process exit code `main` reports, so the binary
//! can stay a thin `match` around `app::run()`.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// The cube is not an even-sized N×N×N grid with N >= 4, or its data does
    /// not match the declared shape.
    #[error("invalid density grid: {details}")]
    InvalidGrid { details: String },

    /// A header card the pipeline depends on is absent or unparsable.
    #[error("missing header metadata '{key}' in {source_name}")]
    MissingMetadata { key: String, source_name: String },

    /// Radius-to-time mapping produced a zero, negative or non-finite bin width.
    #[error("degenerate time binning: {details}")]
    DegenerateBinning { details: String },

    /// Structurally malformed FITS file.
    #[error("malformed FITS file {path}: {details}")]
    Fits { path: PathBuf, details: String },

    #[error("{action} '{path}': {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad command-line or style values.
    #[error("{0}")]
    Config(String),

    #[error("failed to render figure: {0}")]
    Render(String),

    #[error("failed to export {what}: {details}")]
    Export { what: &'static str, details: String },
}

impl AppError {
    pub fn invalid_grid(details: impl Into<String>) -> Self {
        Self::InvalidGrid {
            details: details.into(),
        }
    }

    pub fn missing_metadata(key: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self::MissingMetadata {
            key: key.into(),
            source_name: source_name.into(),
        }
    }

    pub fn degenerate(details: impl Into<String>) -> Self {
        Self::DegenerateBinning {
            details: details.into(),
        }
    }

    pub fn fits(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        Self::Fits {
            path: path.into(),
            details: details.into(),
        }
    }

    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn render(err: impl std::fmt::Display) -> Self {
        Self::Render(err.to_string())
    }

    pub fn export(what: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Export {
            what,
            details: err.to_string(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Io { .. } | AppError::Config(_) | AppError::Export { .. } => 2,
            AppError::InvalidGrid { .. } | AppError::MissingMetadata { .. } | AppError::Fits { .. } => 3,
            AppError::DegenerateBinning { .. } => 4,
            AppError::Render(_) => 5,
        }
    }
}
