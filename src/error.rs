// src/error.rs
//! Crate-wide error type for the conversion pipeline
//!
//! Every failure is terminal for the run: errors propagate to the top level
//! and the process exits nonzero. There is no retry or local recovery.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a machine config into a package
#[derive(Error, Debug)]
pub enum Error {
    /// Input document could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input document could not be deserialized
    #[error("failed to parse machine config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Input document violates the expected schema
    #[error("invalid machine config: {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Encoded file content could not be decoded
    #[error("failed to decode content: {0}")]
    Decode(String),

    /// A staged file or its ancestor directories could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Embedded payload could not be converted into a file set
    #[error("failed to translate embedded config: {0}")]
    Translate(String),

    /// Assembled manifest failed structural validation
    #[error("invalid package manifest: {0}")]
    ManifestValidation(String),

    /// Requested package format is not registered
    #[error("unknown package format: {0}")]
    UnknownFormat(String),

    /// Manifest is not representable in the requested package format
    #[error("manifest rejected by {format} writer: {reason}")]
    PackageValidation { format: &'static str, reason: String },

    /// Output file creation or package stream writing failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
