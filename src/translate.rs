// src/translate.rs
//! Cached translation of the embedded payload
//!
//! `LoadedConfig` wraps a validated document together with an explicit
//! translation cache. The cache is an `Option<FileSet>` with `translate` as
//! its only mutator; the document itself is never modified. Not safe for
//! concurrent callers against the same instance.

use crate::document::MachineConfig;
use crate::error::{Error, Result};
use crate::payload::{self, FileSet};
use tracing::info;

/// A loaded machine config plus its translated-payload cache.
#[derive(Debug)]
pub struct LoadedConfig {
    document: MachineConfig,
    translated: Option<FileSet>,
}

impl LoadedConfig {
    pub fn new(document: MachineConfig) -> Self {
        Self {
            document,
            translated: None,
        }
    }

    pub fn name(&self) -> &str {
        self.document.name()
    }

    pub fn document(&self) -> &MachineConfig {
        &self.document
    }

    /// Translate the embedded payload into a file set.
    ///
    /// The first call parses the payload and caches the result; later calls
    /// return the cached value without re-parsing.
    pub fn translate(&mut self) -> Result<&FileSet> {
        self.translate_with(payload::parse)
    }

    fn translate_with<F>(&mut self, parse: F) -> Result<&FileSet>
    where
        F: FnOnce(&serde_yaml::Value) -> Result<FileSet>,
    {
        let file_set = match self.translated.take() {
            Some(cached) => cached,
            None => {
                info!("Translating embedded config for {}", self.document.name());

                let raw = self.document.payload().ok_or_else(|| {
                    Error::Translate("document has no embedded config payload".to_string())
                })?;

                parse(raw)?
            }
        };

        Ok(self.translated.insert(file_set))
    }
}
