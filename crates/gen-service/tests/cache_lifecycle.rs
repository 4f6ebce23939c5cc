//! Cache lifecycle through the public API, with a custom store.

use gen_service::{
    MemoryStore, TextSpan, TransformCache, TransformCacheEntry, TransformStore,
};
use gen_transformer::{transform_source, TransformOptions};
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// A store that counts writes, standing in for a host-provided table.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    puts: usize,
}

impl TransformStore for CountingStore {
    fn get(&self, key: &str) -> Option<Arc<TransformCacheEntry>> {
        self.inner.get(key)
    }

    fn put(&mut self, entry: Arc<TransformCacheEntry>) -> Option<Arc<TransformCacheEntry>> {
        self.puts += 1;
        self.inner.put(entry)
    }

    fn delete(&mut self, key: &str) -> Option<Arc<TransformCacheEntry>> {
        self.inner.delete(key)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[test]
fn test_store_lookup_delete() {
    let original = "const p = gen {\n  x <- f()\n}\n";
    let result = transform_source(original, &TransformOptions::default());

    let mut cache = TransformCache::new();
    cache.store_result("f", original, &result);

    assert!(cache.contains("f"));
    let entry = cache.entry("f").unwrap();
    assert_eq!(entry.original_text, original);
    assert_eq!(entry.transformed_text, result.code);
    assert_eq!(entry.raw_map, result.source_map);
    assert_eq!(entry.file_key.as_str(), "f");

    assert!(cache.delete("f"));
    assert!(!cache.contains("f"));
    assert!(cache.entry("f").is_none());
}

#[test]
fn test_explicit_store_keeps_texts_verbatim() {
    let original = "gen { x <- f() }";
    let result = transform_source(original, &TransformOptions::default());

    let mut cache = TransformCache::new();
    let entry = cache.store("k", original, result.code.clone(), result.source_map.clone());
    assert_eq!(entry.transformed_text, "gen { const x = yield* f() }");
    assert_eq!(entry.decoded_mappings, result.source_map.decoded_mappings());
}

#[test]
fn test_custom_store() {
    let mut cache = TransformCache::with_store(CountingStore::default());
    cache.transform_and_store("a.ts", "gen { x <- f() }", &TransformOptions::default());
    cache.transform_and_store("a.ts", "gen { y <- g() }", &TransformOptions::default());

    assert_eq!(cache.store_ref().puts, 2);
    assert_eq!(cache.len(), 1);
    assert_eq!(
        cache.entry("a.ts").unwrap().transformed_text,
        "gen { const y = yield* g() }"
    );

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_span_translation_both_ways() {
    let original = "gen {\n  value <- compute(1, 2)\n}\n";
    let mut cache = TransformCache::new();
    let entry = cache.transform_and_store("m.ts", original, &TransformOptions::default());

    let call = original.find("compute").unwrap() as u32;
    let forward = cache.span_to_transformed("m.ts", TextSpan::new(call, 7));
    let start = forward.start as usize;
    assert_eq!(&entry.transformed_text[start..start + 7], "compute");
    assert_eq!(forward.length, 7);

    assert_eq!(
        cache.span_to_original("m.ts", forward),
        TextSpan::new(call, 7)
    );
}
