//! Host-facing services for gen-block rewriting.
//!
//! A host transforms each file once, stores the result in a
//! [`TransformCache`] under the file's identity, runs its compiler on the
//! transformed text, and then relocates the compiler's diagnostics and spans
//! back into the text the user wrote.
//!
//! # Example
//!
//! ```
//! use gen_service::{Diagnostic, DiagnosticCategory, TransformCache};
//! use gen_transformer::TransformOptions;
//!
//! let source = "const p = gen {\n  user <- getUser(id)\n}\n";
//! let mut cache = TransformCache::new();
//! let entry = cache.transform_and_store("app.ts", source, &TransformOptions::default());
//!
//! let start = entry.transformed_text.find("getUser").unwrap() as u32;
//! let diagnostic = Diagnostic {
//!     file_name: "app.ts".to_string(),
//!     start,
//!     length: 7,
//!     message: "Cannot find name 'getUser'.".to_string(),
//!     code: 2304,
//!     category: DiagnosticCategory::Error,
//! };
//! let remapped = cache.remap_diagnostic(&diagnostic);
//! assert_eq!(&source[remapped.start as usize..][..7], "getUser");
//! ```

mod cache;
mod diagnostic;
mod store;

pub use cache::TransformCache;
pub use diagnostic::{Diagnostic, DiagnosticCategory, TextSpan};
pub use store::{MemoryStore, TransformCacheEntry, TransformStore};
