//! Source position tracking and mapping for gen-block rewriting.
//!
//! This crate provides the pieces that keep positions in the rewritten text
//! traceable to the text the user wrote:
//! - [`TextEditor`] collects edits against an immutable buffer and
//!   materializes the result together with a per-character correspondence table
//! - [`vlq`] encodes and decodes that table as a base64 VLQ `mappings` string
//! - [`SourceMapDescriptor`] is the version 3 map wrapped around it
//! - [`PositionMapper`] answers offset and span queries in both directions
//!
//! # Example
//!
//! ```
//! use source_map::{ByteOffset, MapOptions, PositionMapper, TextEditor};
//!
//! let original = "x <- fetch()";
//! let mut editor = TextEditor::new(original);
//! editor.insert_before(0u32, "const ");
//! editor.overwrite(1u32, 5u32, " = yield* ");
//! let edited = editor.materialize();
//! assert_eq!(edited.as_str(), "const x = yield* fetch()");
//!
//! let map = edited.generate_map(&MapOptions::default());
//! let mapper = PositionMapper::from_descriptor(original, edited.as_str(), &map);
//! assert_eq!(mapper.to_original(ByteOffset::from(17)), ByteOffset::from(5));
//! ```

mod descriptor;
mod editor;
mod line_index;
mod mapper;
mod span;
pub mod vlq;

pub use descriptor::{MapOptions, SourceMapDescriptor, SourceMapError};
pub use editor::{Edit, EditedText, TextEditor};
pub use line_index::{LineCol, LineIndex};
pub use mapper::PositionMapper;
pub use span::{ByteOffset, Span};
pub use vlq::{DecodedMapping, Mapping};
