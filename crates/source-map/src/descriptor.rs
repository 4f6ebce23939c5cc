//! The version 3 source map descriptor.

use crate::vlq::{self, DecodedMapping, Mapping};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options controlling the emitted map descriptor.
#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    /// Name of the original source, recorded in `sources`.
    pub source: Option<String>,
    /// Name of the generated file, recorded in `file`.
    pub file: Option<String>,
    /// Embed the original text in `sourcesContent`.
    pub include_content: bool,
}

/// Errors raised when reading an externally supplied map.
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// The descriptor is not valid JSON or has the wrong shape.
    #[error("invalid source map: {0}")]
    Json(#[from] serde_json::Error),

    /// Only version 3 maps are understood.
    #[error("unsupported source map version {0}")]
    UnsupportedVersion(u32),

    /// Maps here always describe a single source.
    #[error("expected a single source, found {0}")]
    MultipleSources(usize),
}

/// A single-source, name-less source map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapDescriptor {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMapDescriptor {
    /// Encodes a correspondence table.
    pub fn from_mappings(mappings: &[Mapping], original: &str, options: &MapOptions) -> Self {
        let source = options
            .source
            .clone()
            .or_else(|| options.file.clone())
            .unwrap_or_default();

        Self {
            version: 3,
            file: options.file.clone(),
            sources: vec![source],
            sources_content: options
                .include_content
                .then(|| vec![Some(original.to_string())]),
            names: Vec::new(),
            mappings: vlq::encode(mappings),
        }
    }

    /// Decodes the `mappings` string.
    pub fn decoded_mappings(&self) -> Vec<DecodedMapping> {
        vlq::decode(&self.mappings)
    }

    /// Serializes the descriptor to compact JSON.
    pub fn to_json(&self) -> String {
        // A struct of strings and integers always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parses and validates a descriptor.
    pub fn from_json(json: &str) -> Result<Self, SourceMapError> {
        let descriptor: SourceMapDescriptor = serde_json::from_str(json)?;
        if descriptor.version != 3 {
            return Err(SourceMapError::UnsupportedVersion(descriptor.version));
        }
        if descriptor.sources.len() > 1 {
            return Err(SourceMapError::MultipleSources(descriptor.sources.len()));
        }
        Ok(descriptor)
    }
}
