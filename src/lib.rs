// src/lib.rs

//! mcpkg
//!
//! Converts a declarative machine-config document into an installable OS
//! package. The pipeline is a one-shot batch conversion:
//!
//! 1. Load and validate the document (first YAML document only)
//! 2. Translate the embedded payload into a file set (cached)
//! 3. Materialize the files under a temporary staging root
//! 4. Describe the staged tree as a package manifest
//! 5. Stream the package through a format writer
//!
//! All failures are terminal; the staging root is removed on every exit
//! path.

pub mod dataurl;
pub mod document;
pub mod emit;
mod error;
pub mod manifest;
pub mod payload;
pub mod staging;
pub mod translate;

pub use document::MachineConfig;
pub use emit::{emit, PackageFormatType, PackageWriter};
pub use error::{Error, Result};
pub use manifest::{build_manifest, ContentEntry, PackageManifest, PackagePolicy};
pub use payload::{FileEntry, FileSet};
pub use staging::{StagedFile, StagingRoot};
pub use translate::LoadedConfig;
