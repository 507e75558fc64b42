// src/document.rs
//! Machine config document loading and validation
//!
//! A machine config is a YAML document carrying an identity (`metadata.name`)
//! and an opaque embedded payload (`spec.config`) describing the file tree to
//! package. Only the first document of a multi-document input is used.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// A loaded machine config document. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineConfig {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: Spec,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Spec {
    /// Embedded file-tree payload, kept opaque until translation
    #[serde(default)]
    pub config: Option<serde_yaml::Value>,
}

impl MachineConfig {
    /// Read and validate a machine config from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading machine config from: {}", path.display());

        let raw = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&raw)
    }

    /// Deserialize and validate the first YAML document in `raw`.
    ///
    /// Multi-document inputs are truncated to the first document. This is a
    /// documented limitation, not an error.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let Some(first) = serde_yaml::Deserializer::from_str(raw).next() else {
            return Err(Error::Validation {
                field: "document",
                reason: "input contains no YAML documents".to_string(),
            });
        };

        let config = MachineConfig::deserialize(first)?;
        config.validate()?;

        info!("Machine config {} validated", config.name());

        Ok(config)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// The embedded payload, if present. Guaranteed `Some` after `validate`.
    pub fn payload(&self) -> Option<&serde_yaml::Value> {
        self.spec.config.as_ref()
    }

    /// Structural validation: identity present, payload present and carrying
    /// a supported schema version. Full payload parsing happens later, at
    /// translation time.
    pub fn validate(&self) -> Result<()> {
        if self.metadata.name.is_empty() {
            return Err(Error::Validation {
                field: "metadata.name",
                reason: "missing or empty".to_string(),
            });
        }

        let Some(config) = &self.spec.config else {
            return Err(Error::Validation {
                field: "spec.config",
                reason: "embedded config payload is missing".to_string(),
            });
        };

        let version = config
            .get("ignition")
            .and_then(|ignition| ignition.get("version"))
            .and_then(|version| version.as_str())
            .ok_or_else(|| Error::Validation {
                field: "spec.config.ignition.version",
                reason: "missing payload schema version".to_string(),
            })?;

        if !version.starts_with("3.") {
            return Err(Error::Validation {
                field: "spec.config.ignition.version",
                reason: format!("unsupported schema version {}", version),
            });
        }

        Ok(())
    }
}
