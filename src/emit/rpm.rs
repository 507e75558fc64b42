// src/emit/rpm.rs
//! RPM package writer
//!
//! Streams a package manifest as an RPM using the `rpm` crate's
//! `PackageBuilder`. Staged sources are read from disk while the archive is
//! assembled.

use super::PackageWriter;
use crate::error::{Error, Result};
use crate::manifest::PackageManifest;
use rpm::{Dependency, PackageBuilder};
use std::io::Write;

const FORMAT: &str = "rpm";

/// Mode recorded for packaged files, matching the staging mode.
const RPM_FILE_MODE: i32 = 0o100755;

pub struct RpmWriter;

impl PackageWriter for RpmWriter {
    fn validate(&self, manifest: &PackageManifest) -> Result<()> {
        if manifest.platform != "linux" {
            return Err(Error::PackageValidation {
                format: FORMAT,
                reason: format!("unsupported platform {:?}", manifest.platform),
            });
        }
        if manifest
            .name
            .contains(|c: char| c.is_whitespace() || c == '/')
        {
            return Err(Error::PackageValidation {
                format: FORMAT,
                reason: format!("invalid package name {:?}", manifest.name),
            });
        }
        Ok(())
    }

    fn conventional_file_name(&self, manifest: &PackageManifest) -> String {
        format!(
            "{}-{}-1.{}.rpm",
            manifest.name,
            rpm_version(&manifest.version),
            rpm_arch(&manifest.arch)
        )
    }

    fn write(&self, manifest: &PackageManifest, mut out: &mut dyn Write) -> Result<()> {
        let mut builder = PackageBuilder::new(
            &manifest.name,
            rpm_version(&manifest.version),
            "Unspecified",
            &rpm_arch(&manifest.arch),
            &format!("Machine config {}", manifest.name),
        )
        .using_config(rpm::BuildConfig::default().compression(rpm::CompressionType::Gzip))
        .group(&manifest.section);

        for name in &manifest.provides {
            builder = builder.provides(Dependency::any(name));
        }
        for name in &manifest.depends {
            builder = builder.requires(Dependency::any(name));
        }
        for name in &manifest.replaces {
            builder = builder.obsoletes(Dependency::any(name));
        }
        for name in &manifest.recommends {
            builder = builder.recommends(Dependency::any(name));
        }
        for name in &manifest.suggests {
            builder = builder.suggests(Dependency::any(name));
        }
        for name in &manifest.conflicts {
            builder = builder.conflicts(Dependency::any(name));
        }

        for entry in &manifest.contents {
            let options = rpm::FileOptions::new(&entry.destination)
                .mode(rpm::FileMode::from(RPM_FILE_MODE));
            builder = builder
                .with_file(&entry.source, options)
                .map_err(|e| collaborator_error(&entry.destination, e))?;
        }

        let package = builder
            .build()
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;

        package
            .write(&mut out)
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;

        Ok(())
    }
}

/// Map RPM architecture names: the manifest policy uses "amd64"/"arm64",
/// RPM convention uses "x86_64"/"aarch64".
fn rpm_arch(arch: &str) -> String {
    match arch {
        "amd64" => "x86_64",
        "arm64" => "aarch64",
        other => other,
    }
    .to_string()
}

/// RPM versions drop the leading "v" carried by the policy default.
fn rpm_version(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

fn collaborator_error(destination: &str, err: rpm::Error) -> Error {
    Error::Io(std::io::Error::other(format!(
        "failed to add {}: {}",
        destination, err
    )))
}
