//! Error types for Wirekit operations.
//!
//! User-input problems are never errors: they are reported as
//! [`Diagnostic`](wirekit_parser::error::Diagnostic) values on the
//! compilation. [`WirekitError`] covers host-level failures, plus the
//! `Diagnostics` variant that callers use to turn a compilation with
//! error-severity diagnostics into a failure.

use std::{io, path::PathBuf};

use thiserror::Error;

use wirekit_parser::error::{Diagnostic, ParseError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// The main error type for Wirekit operations.
#[derive(Debug, Error)]
pub enum WirekitError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("export error: {0}")]
    Export(String),

    /// A compilation produced error-severity diagnostics.
    #[error("{err}")]
    Diagnostics { err: ParseError, src: String },
}

impl WirekitError {
    /// Create a `Diagnostics` error carrying the source it refers to.
    pub fn new_diagnostics_error(diagnostics: Vec<Diagnostic>, src: impl Into<String>) -> Self {
        Self::Diagnostics {
            err: ParseError::new(diagnostics),
            src: src.into(),
        }
    }
}
