//! The transform cache.

use crate::diagnostic::{Diagnostic, TextSpan};
use crate::store::{MemoryStore, TransformCacheEntry, TransformStore};
use gen_transformer::{transform_source, TransformOptions, TransformResult};
use source_map::{ByteOffset, PositionMapper, SourceMapDescriptor};
use std::sync::Arc;

/// Transform results keyed by file identity, with position translation on
/// top.
///
/// Every translation builds a fresh [`PositionMapper`] from the entry stored
/// at that moment, so a later store or delete is always observed.
#[derive(Debug, Default)]
pub struct TransformCache<S = MemoryStore> {
    store: S,
}

impl TransformCache<MemoryStore> {
    /// Creates a cache backed by a fresh [`MemoryStore`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: TransformStore> TransformCache<S> {
    /// Creates a cache over an existing store.
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store_ref(&self) -> &S {
        &self.store
    }

    /// Stores a transformation, replacing any entry under `file_key`.
    pub fn store(
        &mut self,
        file_key: &str,
        original: impl Into<String>,
        transformed: impl Into<String>,
        map: SourceMapDescriptor,
    ) -> Arc<TransformCacheEntry> {
        let entry = Arc::new(TransformCacheEntry::new(file_key, original, transformed, map));
        let replaced = self.store.put(Arc::clone(&entry)).is_some();
        tracing::debug!(
            file = %file_key,
            mappings = entry.decoded_mappings.len(),
            replaced,
            "stored transform"
        );
        entry
    }

    /// Stores the output of [`transform_source`].
    pub fn store_result(
        &mut self,
        file_key: &str,
        original: &str,
        result: &TransformResult<'_>,
    ) -> Arc<TransformCacheEntry> {
        self.store(
            file_key,
            original,
            result.code.as_str(),
            result.source_map.clone(),
        )
    }

    /// Transforms `original` and stores the result.
    ///
    /// When `options` carries no filename, `file_key` names the map source.
    pub fn transform_and_store(
        &mut self,
        file_key: &str,
        original: &str,
        options: &TransformOptions,
    ) -> Arc<TransformCacheEntry> {
        let mut options = options.clone();
        options.filename.get_or_insert_with(|| file_key.to_string());
        let result = transform_source(original, &options);
        self.store_result(file_key, original, &result)
    }

    /// Returns the entry stored under `file_key`.
    pub fn entry(&self, file_key: &str) -> Option<Arc<TransformCacheEntry>> {
        self.store.get(file_key)
    }

    /// Returns true if an entry is stored under `file_key`.
    pub fn contains(&self, file_key: &str) -> bool {
        self.store.get(file_key).is_some()
    }

    /// Builds a mapper over the entry currently stored under `file_key`.
    pub fn mapper(&self, file_key: &str) -> Option<PositionMapper> {
        let entry = self.store.get(file_key)?;
        Some(PositionMapper::new(
            &entry.original_text,
            &entry.transformed_text,
            &entry.decoded_mappings,
        ))
    }

    /// Maps an original offset into the transformed text of `file_key`.
    pub fn to_transformed(&self, file_key: &str, offset: ByteOffset) -> Option<ByteOffset> {
        Some(self.mapper(file_key)?.to_transformed(offset))
    }

    /// Maps a transformed offset back into the original text of `file_key`.
    pub fn to_original(&self, file_key: &str, offset: ByteOffset) -> Option<ByteOffset> {
        Some(self.mapper(file_key)?.to_original(offset))
    }

    /// Maps a span of the transformed text back into the original text.
    /// Spans of files with no entry are returned unchanged.
    pub fn span_to_original(&self, file_key: &str, span: TextSpan) -> TextSpan {
        match self.mapper(file_key) {
            Some(mapper) => span.to_original(&mapper),
            None => span,
        }
    }

    /// Maps a span of the original text into the transformed text.
    /// Spans of files with no entry are returned unchanged.
    pub fn span_to_transformed(&self, file_key: &str, span: TextSpan) -> TextSpan {
        match self.mapper(file_key) {
            Some(mapper) => span.to_transformed(&mapper),
            None => span,
        }
    }

    /// Relocates a diagnostic into its file's original text.
    /// Diagnostics of files with no entry are returned unchanged.
    pub fn remap_diagnostic(&self, diagnostic: &Diagnostic) -> Diagnostic {
        match self.mapper(&diagnostic.file_name) {
            Some(mapper) => diagnostic.to_original(&mapper),
            None => diagnostic.clone(),
        }
    }

    /// Relocates a batch of diagnostics, building one mapper per file.
    pub fn remap_diagnostics(&self, diagnostics: &[Diagnostic]) -> Vec<Diagnostic> {
        let mut mappers: Vec<(&str, Option<PositionMapper>)> = Vec::new();
        diagnostics
            .iter()
            .map(|diagnostic| {
                let file = diagnostic.file_name.as_str();
                let index = match mappers.iter().position(|(name, _)| *name == file) {
                    Some(index) => index,
                    None => {
                        mappers.push((file, self.mapper(file)));
                        mappers.len() - 1
                    }
                };
                match &mappers[index].1 {
                    Some(mapper) => diagnostic.to_original(mapper),
                    None => diagnostic.clone(),
                }
            })
            .collect()
    }

    /// Removes the entry under `file_key`. Returns true if one was stored.
    pub fn delete(&mut self, file_key: &str) -> bool {
        let removed = self.store.delete(file_key).is_some();
        tracing::debug!(file = %file_key, removed, "deleted transform");
        removed
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        let count = self.store.len();
        self.store.clear();
        tracing::debug!(count, "cleared transform cache");
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
