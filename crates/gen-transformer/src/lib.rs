//! Rewriting of `gen { … }` blocks into explicit `yield*` bindings.
//!
//! Inside a block, a bind line `target <- expression` becomes
//! `const target = yield* expression`, and a bare `<- expression` becomes
//! `yield* expression`. Every other line is kept as written. Lines inside
//! the body of a nested function or block-bodied arrow are never rewritten,
//! since they run in a different scope.
//!
//! # Example
//!
//! ```
//! use gen_transformer::{transform_source, TransformOptions};
//!
//! let source = "const program = gen {\n  user <- getUser(id);\n  return user\n}\n";
//! let result = transform_source(source, &TransformOptions::default());
//! assert_eq!(
//!     result.code,
//!     "const program = gen {\n  const user = yield* getUser(id);\n  return user\n}\n"
//! );
//! ```

mod bind;
mod scope;
mod transform;

pub use transform::{
    rewrites, transform, transform_source, BlockWrap, TransformOptions, TransformResult,
};
