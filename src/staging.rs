// src/staging.rs
//! Staging root lifecycle and file materialization
//!
//! Files from a translated payload are written under a temporary staging
//! root before packaging. The root owns every staged file and is removed
//! recursively when dropped, on every exit path.

use crate::dataurl;
use crate::error::{Error, Result};
use crate::payload::FileSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// Mode for created ancestor directories.
pub const DIR_MODE: u32 = 0o755;

/// Mode for staged files. Conservative default for packaged executables and
/// config files; ownership and final modes are applied by the packaging
/// step, so this is policy rather than a security boundary.
pub const FILE_MODE: u32 = 0o755;

/// A materialized file: decoded bytes on disk plus the destination path it
/// will take inside the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub source: PathBuf,
    pub destination: String,
}

/// Temporary directory owning all staged files.
#[derive(Debug)]
pub struct StagingRoot {
    dir: TempDir,
}

/// Resolve a package destination path under `root`.
///
/// Destinations are absolute; the leading separator is stripped so the path
/// lands inside the staging tree.
pub fn staged_path(root: &Path, destination: &str) -> PathBuf {
    root.join(destination.trim_start_matches('/'))
}

impl StagingRoot {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("mcpkg").tempdir()?;
        debug!("Created staging root {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Create the staging root under `parent` instead of the system temp
    /// directory.
    pub fn new_in(parent: impl AsRef<Path>) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("mcpkg")
            .tempdir_in(parent)?;
        debug!("Created staging root {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write every entry of `files` under the staging root, in order:
    /// create missing ancestor directories, decode the inline contents, and
    /// write the bytes. An entry without a source becomes an empty file.
    pub fn materialize(&self, files: &FileSet) -> Result<Vec<StagedFile>> {
        info!(
            "Writing {} files to disk under {}",
            files.files.len(),
            self.path().display()
        );

        let mut staged = Vec::with_capacity(files.files.len());

        for entry in &files.files {
            let target = staged_path(self.path(), &entry.path);

            if let Some(parent) = target.parent() {
                create_dir_all_with_mode(parent).map_err(|source| Error::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            let data = dataurl::decode(entry.source.as_deref())?;

            debug!("Writing {}", entry.path);
            write_with_mode(&target, &data).map_err(|source| Error::Write {
                path: target.clone(),
                source,
            })?;

            staged.push(StagedFile {
                source: target,
                destination: entry.path.clone(),
            });
        }

        Ok(staged)
    }
}

impl Drop for StagingRoot {
    fn drop(&mut self) {
        debug!("Removing staging root {}", self.dir.path().display());
    }
}

#[cfg(unix)]
fn create_dir_all_with_mode(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(true)
        .mode(DIR_MODE)
        .create(path)
}

#[cfg(not(unix))]
fn create_dir_all_with_mode(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(unix)]
fn write_with_mode(path: &Path, data: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::write(path, data)?;
    fs::set_permissions(path, fs::Permissions::from_mode(FILE_MODE))
}

#[cfg(not(unix))]
fn write_with_mode(path: &Path, data: &[u8]) -> std::io::Result<()> {
    fs::write(path, data)
}
