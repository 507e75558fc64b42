// src/emit/mod.rs
//! Package emission
//!
//! Resolves a format name against the writer registry, validates the
//! manifest against the format, and streams the package into a
//! conventionally named output file.

pub mod rpm;

use crate::error::{Error, Result};
use crate::manifest::PackageManifest;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Supported package formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFormatType {
    Rpm,
}

impl PackageFormatType {
    /// Get a human-readable name for the format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rpm => "rpm",
        }
    }

    /// Resolve a format name against the registry.
    pub fn resolve(name: &str) -> Result<Self> {
        match name {
            "rpm" => Ok(Self::Rpm),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }

    fn writer(&self) -> &'static dyn PackageWriter {
        match self {
            Self::Rpm => &rpm::RpmWriter,
        }
    }
}

/// A package format backend.
pub trait PackageWriter {
    /// Reject manifests the format cannot represent.
    fn validate(&self, manifest: &PackageManifest) -> Result<()>;

    /// Conventional output file name for the manifest.
    fn conventional_file_name(&self, manifest: &PackageManifest) -> String;

    /// Stream the package for `manifest` into `out`. Staged sources are
    /// read from disk at this point.
    fn write(&self, manifest: &PackageManifest, out: &mut dyn Write) -> Result<()>;
}

/// Emit `manifest` as a package of the named format into `output_dir`,
/// returning the output path.
///
/// A mid-stream writer failure removes the partial output file before the
/// error propagates. Removal is best effort: a failed removal is logged,
/// never escalated.
pub fn emit(manifest: &PackageManifest, format: &str, output_dir: &Path) -> Result<PathBuf> {
    let format = PackageFormatType::resolve(format)?;
    let writer = format.writer();

    writer.validate(manifest)?;

    let target = output_dir.join(writer.conventional_file_name(manifest));
    let mut out = File::create(&target)?;

    info!("Writing {} package to {}", format.name(), target.display());

    if let Err(err) = writer.write(manifest, &mut out) {
        drop(out);
        if let Err(remove_err) = std::fs::remove_file(&target) {
            warn!(
                "Failed to remove partial output {}: {}",
                target.display(),
                remove_err
            );
        }
        return Err(err);
    }

    Ok(target)
}
