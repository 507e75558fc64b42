// src/payload.rs
//! Embedded file-tree payload schema
//!
//! The payload embedded in a machine config is an Ignition-style document:
//! a schema version plus a list of files with optional inline contents.
//! This module converts the opaque payload value into that schema and
//! validates it. Fields the packager does not consume are ignored.

use crate::error::{Error, Result};
use serde::Deserialize;

/// The translated payload: an ordered list of files to materialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    /// Payload schema version
    pub version: String,
    pub files: Vec<FileEntry>,
}

/// One file to materialize: an absolute destination path plus an optional
/// encoded-content string (see `dataurl`). No source means an empty file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub source: Option<String>,
}

#[derive(Deserialize)]
struct RawPayload {
    ignition: RawIgnition,
    #[serde(default)]
    storage: RawStorage,
}

#[derive(Deserialize)]
struct RawIgnition {
    version: String,
}

#[derive(Deserialize, Default)]
struct RawStorage {
    #[serde(default)]
    files: Vec<RawFile>,
}

#[derive(Deserialize)]
struct RawFile {
    path: String,
    contents: Option<RawContents>,
}

#[derive(Deserialize)]
struct RawContents {
    source: Option<String>,
}

/// Parse and validate an embedded payload value into a `FileSet`.
pub fn parse(payload: &serde_yaml::Value) -> Result<FileSet> {
    let raw: RawPayload = serde_yaml::from_value(payload.clone())
        .map_err(|e| Error::Translate(e.to_string()))?;

    if !raw.ignition.version.starts_with("3.") {
        return Err(Error::Translate(format!(
            "unsupported payload schema version {}",
            raw.ignition.version
        )));
    }

    let files = raw
        .storage
        .files
        .into_iter()
        .map(|file| {
            if !file.path.starts_with('/') {
                return Err(Error::Translate(format!(
                    "file path must be absolute: {:?}",
                    file.path
                )));
            }
            // A ".." component would re-root the file outside the staging
            // tree when the destination is joined under it.
            if file.path.split('/').any(|component| component == "..") {
                return Err(Error::Translate(format!(
                    "file path must not contain '..' components: {:?}",
                    file.path
                )));
            }
            Ok(FileEntry {
                path: file.path,
                source: file.contents.and_then(|c| c.source),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FileSet {
        version: raw.ignition.version,
        files,
    })
}
