// src/manifest.rs
//! Package manifest assembly
//!
//! Composes fixed policy metadata with the translated file set into the
//! manifest handed to a package writer. Pure with respect to the
//! filesystem: staged sources are described, never read. Callers are
//! responsible for materializing the staging tree before emission.

use crate::error::{Error, Result};
use crate::staging::staged_path;
use crate::translate::LoadedConfig;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Fixed package metadata policy.
///
/// These values are deliberately not derived from the input document.
/// `Default` carries the current placeholder relationships; construct a
/// policy explicitly to override them.
#[derive(Debug, Clone)]
pub struct PackagePolicy {
    pub version: String,
    pub arch: String,
    pub platform: String,
    pub section: String,
    pub provides: Vec<String>,
    pub depends: Vec<String>,
    pub replaces: Vec<String>,
    pub recommends: Vec<String>,
    pub suggests: Vec<String>,
    pub conflicts: Vec<String>,
}

impl Default for PackagePolicy {
    fn default() -> Self {
        Self {
            version: "v1.0.0".to_string(),
            arch: "amd64".to_string(),
            platform: "linux".to_string(),
            section: "default".to_string(),
            provides: vec!["bar".to_string()],
            depends: vec!["foo".to_string(), "bar".to_string()],
            replaces: vec!["foobar".to_string()],
            recommends: vec!["whatever".to_string()],
            suggests: vec!["something-else".to_string()],
            conflicts: vec!["not-foo".to_string(), "not-bar".to_string()],
        }
    }
}

/// One staged-source to package-destination pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    pub source: PathBuf,
    pub destination: String,
}

/// Package identity, relationships, and content map. Constructed once per
/// run and immutable thereafter.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    pub arch: String,
    pub platform: String,
    pub section: String,
    pub provides: Vec<String>,
    pub depends: Vec<String>,
    pub replaces: Vec<String>,
    pub recommends: Vec<String>,
    pub suggests: Vec<String>,
    pub conflicts: Vec<String>,
    pub contents: Vec<ContentEntry>,
}

/// Assemble and validate the package manifest for `config`.
///
/// One content entry is produced per translated file entry, with the source
/// resolved under `staging_root` and the destination kept verbatim.
pub fn build_manifest(
    config: &mut LoadedConfig,
    staging_root: &Path,
    policy: &PackagePolicy,
) -> Result<PackageManifest> {
    info!("Building package manifest for {}", config.name());

    let name = config.name().to_string();
    let files = config.translate()?;

    let contents = files
        .files
        .iter()
        .map(|entry| ContentEntry {
            source: staged_path(staging_root, &entry.path),
            destination: entry.path.clone(),
        })
        .collect();

    let manifest = PackageManifest {
        name,
        version: policy.version.clone(),
        arch: policy.arch.clone(),
        platform: policy.platform.clone(),
        section: policy.section.clone(),
        provides: policy.provides.clone(),
        depends: policy.depends.clone(),
        replaces: policy.replaces.clone(),
        recommends: policy.recommends.clone(),
        suggests: policy.suggests.clone(),
        conflicts: policy.conflicts.clone(),
        contents,
    };

    manifest.validate()?;

    Ok(manifest)
}

impl PackageManifest {
    /// Structural validation. Format writers apply their own checks on top.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::ManifestValidation(
                "package name is empty".to_string(),
            ));
        }
        if self.version.is_empty() {
            return Err(Error::ManifestValidation(
                "package version is empty".to_string(),
            ));
        }
        if self.arch.is_empty() {
            return Err(Error::ManifestValidation(
                "package architecture is empty".to_string(),
            ));
        }

        for provided in &self.provides {
            if self.conflicts.contains(provided) {
                return Err(Error::ManifestValidation(format!(
                    "identifier {:?} appears in both provides and conflicts",
                    provided
                )));
            }
        }

        let mut seen = HashSet::new();
        for entry in &self.contents {
            if entry.destination.is_empty() {
                return Err(Error::ManifestValidation(
                    "content entry with empty destination".to_string(),
                ));
            }
            if !seen.insert(entry.destination.as_str()) {
                return Err(Error::ManifestValidation(format!(
                    "duplicate destination {:?}",
                    entry.destination
                )));
            }
        }

        Ok(())
    }
}
