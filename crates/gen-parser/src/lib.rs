//! Scanning for gen-block rewriting.
//!
//! This crate provides:
//! - A resilient tokenizer using `logos` that classifies every byte and never fails
//! - Scanners for opaque literals (strings, templates, comments, numbers)
//! - Discovery of `gen { … }` blocks with brace balancing that ignores braces
//!   inside opaque tokens
//!
//! # Example
//!
//! ```
//! use gen_parser::{find_gen_blocks, has_gen_blocks};
//!
//! let source = "const program = gen {\n  user <- getUser(id)\n}\n";
//! assert!(has_gen_blocks(source));
//!
//! let blocks = find_gen_blocks(source);
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].content, "\n  user <- getUser(id)\n");
//! ```

mod blocks;
mod lexer;
pub mod literal;

pub use blocks::{find_gen_blocks, has_gen_blocks, GenBlock};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use source_map::Span;
