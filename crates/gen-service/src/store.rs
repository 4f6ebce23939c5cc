//! Storage for transform results.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use source_map::{DecodedMapping, SourceMapDescriptor};
use std::sync::Arc;

/// A stored transformation of one file.
///
/// Entries are shared behind an [`Arc`] and never change once stored; a new
/// store under the same key replaces the entry as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformCacheEntry {
    /// The file identity the entry is stored under.
    pub file_key: SmolStr,
    /// The text as the user wrote it.
    pub original_text: String,
    /// The rewritten text handed to the compiler.
    pub transformed_text: String,
    /// The encoded map from the transformed text to the original.
    pub raw_map: SourceMapDescriptor,
    /// `raw_map`'s mappings, decoded once at store time.
    pub decoded_mappings: Vec<DecodedMapping>,
}

impl TransformCacheEntry {
    /// Creates an entry, decoding the map's mappings.
    pub fn new(
        file_key: impl Into<SmolStr>,
        original_text: impl Into<String>,
        transformed_text: impl Into<String>,
        raw_map: SourceMapDescriptor,
    ) -> Self {
        let decoded_mappings = raw_map.decoded_mappings();
        Self {
            file_key: file_key.into(),
            original_text: original_text.into(),
            transformed_text: transformed_text.into(),
            raw_map,
            decoded_mappings,
        }
    }
}

/// A key-value table of transform entries, keyed by file identity.
///
/// Implementations need no internal locking: writers take `&mut self`, so
/// sharing a store across threads means wrapping it in a lock or giving
/// each thread its own keys.
pub trait TransformStore {
    /// Returns the entry stored under `key`.
    fn get(&self, key: &str) -> Option<Arc<TransformCacheEntry>>;

    /// Stores `entry` under its own key, returning the entry it replaced.
    fn put(&mut self, entry: Arc<TransformCacheEntry>) -> Option<Arc<TransformCacheEntry>>;

    /// Removes the entry under `key`, returning it.
    fn delete(&mut self, key: &str) -> Option<Arc<TransformCacheEntry>>;

    /// Removes every entry.
    fn clear(&mut self);

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Returns true if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-memory [`TransformStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<SmolStr, Arc<TransformCacheEntry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over the stored keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(SmolStr::as_str)
    }
}

impl TransformStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Arc<TransformCacheEntry>> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, entry: Arc<TransformCacheEntry>) -> Option<Arc<TransformCacheEntry>> {
        self.entries.insert(entry.file_key.clone(), entry)
    }

    fn delete(&mut self, key: &str) -> Option<Arc<TransformCacheEntry>> {
        self.entries.remove(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
