//! Edit accumulation over an immutable buffer.
//!
//! [`TextEditor`] collects edits that all refer to positions in the original
//! text. [`TextEditor::materialize`] applies them in a single pass and returns
//! an [`EditedText`], which can answer where any original offset ended up and
//! produce the full per-character correspondence table.

use crate::descriptor::{MapOptions, SourceMapDescriptor};
use crate::vlq::Mapping;
use crate::{ByteOffset, LineIndex, Span};
use std::fmt;
use text_size::TextSize;

/// A single edit against the original buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace the half-open range `span` with `text`.
    Overwrite { span: Span, text: String },
    /// Insert `text` at `pos`, in front of any insertion already made there.
    InsertBefore { pos: ByteOffset, text: String },
    /// Insert `text` at `pos`, behind earlier `InsertAfter` text at the same spot.
    InsertAfter { pos: ByteOffset, text: String },
}

impl Edit {
    /// Creates an overwrite edit.
    pub fn overwrite(span: Span, text: impl Into<String>) -> Self {
        Edit::Overwrite {
            span,
            text: text.into(),
        }
    }

    /// Creates an insert-before edit.
    pub fn insert_before(pos: impl Into<ByteOffset>, text: impl Into<String>) -> Self {
        Edit::InsertBefore {
            pos: pos.into(),
            text: text.into(),
        }
    }

    /// Creates an insert-after edit.
    pub fn insert_after(pos: impl Into<ByteOffset>, text: impl Into<String>) -> Self {
        Edit::InsertAfter {
            pos: pos.into(),
            text: text.into(),
        }
    }

    /// The original position the edit is anchored at.
    #[inline]
    pub fn pos(&self) -> ByteOffset {
        match self {
            Edit::Overwrite { span, .. } => span.start,
            Edit::InsertBefore { pos, .. } | Edit::InsertAfter { pos, .. } => *pos,
        }
    }

    /// The end of the replaced range; `None` for insertions.
    #[inline]
    pub fn end(&self) -> Option<ByteOffset> {
        match self {
            Edit::Overwrite { span, .. } => Some(span.end),
            _ => None,
        }
    }

    /// The inserted or replacement text.
    #[inline]
    pub fn text(&self) -> &str {
        match self {
            Edit::Overwrite { text, .. }
            | Edit::InsertBefore { text, .. }
            | Edit::InsertAfter { text, .. } => text,
        }
    }

    /// Signed change in length this edit introduces.
    pub fn delta(&self) -> i64 {
        let removed = match self {
            Edit::Overwrite { span, .. } => i64::from(u32::from(span.len())),
            _ => 0,
        };
        self.text().len() as i64 - removed
    }

    /// Returns the edit moved right by `delta` bytes.
    pub fn shifted(self, delta: ByteOffset) -> Edit {
        match self {
            Edit::Overwrite { span, text } => Edit::Overwrite {
                span: span.shifted(delta),
                text,
            },
            Edit::InsertBefore { pos, text } => Edit::InsertBefore {
                pos: pos + delta,
                text,
            },
            Edit::InsertAfter { pos, text } => Edit::InsertAfter {
                pos: pos + delta,
                text,
            },
        }
    }

    /// Tie-break rank when applying edits that share a position.
    fn apply_rank(&self) -> u8 {
        match self {
            Edit::Overwrite { .. } => 0,
            Edit::InsertAfter { .. } => 1,
            Edit::InsertBefore { .. } => 2,
        }
    }

    /// Whether the edit lies entirely in front of `offset`, so that its
    /// length change shifts `offset`. An insertion at `offset` itself counts.
    fn precedes(&self, offset: ByteOffset) -> bool {
        match self {
            Edit::Overwrite { span, .. } if !span.is_empty() => span.end <= offset,
            _ => self.pos() <= offset,
        }
    }
}

/// Accumulates edits against an original buffer.
///
/// Overlapping overwrite ranges are not detected and produce unspecified
/// output.
#[derive(Debug, Clone)]
pub struct TextEditor<'src> {
    original: &'src str,
    edits: Vec<Edit>,
}

impl<'src> TextEditor<'src> {
    /// Creates an editor with no edits.
    pub fn new(original: &'src str) -> Self {
        Self {
            original,
            edits: Vec::new(),
        }
    }

    /// Returns the original text.
    pub fn original(&self) -> &'src str {
        self.original
    }

    /// Returns the number of recorded edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns true if no edits were recorded.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Replaces `[start, end)` with `text`.
    pub fn overwrite(
        &mut self,
        start: impl Into<ByteOffset>,
        end: impl Into<ByteOffset>,
        text: impl Into<String>,
    ) -> &mut Self {
        self.push(Edit::overwrite(Span::new(start, end), text))
    }

    /// Inserts `text` at `pos`.
    pub fn insert_before(&mut self, pos: impl Into<ByteOffset>, text: impl Into<String>) -> &mut Self {
        self.push(Edit::insert_before(pos, text))
    }

    /// Inserts `text` at `pos`, after other text appended there.
    pub fn insert_after(&mut self, pos: impl Into<ByteOffset>, text: impl Into<String>) -> &mut Self {
        self.push(Edit::insert_after(pos, text))
    }

    /// Records an edit.
    ///
    /// Positions are clamped into the buffer and onto character boundaries.
    pub fn push(&mut self, edit: Edit) -> &mut Self {
        let edit = match edit {
            Edit::Overwrite { span, text } => {
                let start = self.clamp(span.start);
                let end = self.clamp(span.end).max(start);
                Edit::Overwrite {
                    span: Span::new(start, end),
                    text,
                }
            }
            Edit::InsertBefore { pos, text } => Edit::InsertBefore {
                pos: self.clamp(pos),
                text,
            },
            Edit::InsertAfter { pos, text } => Edit::InsertAfter {
                pos: self.clamp(pos),
                text,
            },
        };
        self.edits.push(edit);
        self
    }

    fn clamp(&self, offset: ByteOffset) -> ByteOffset {
        let mut offset = usize::from(offset).min(self.original.len());
        while !self.original.is_char_boundary(offset) {
            offset -= 1;
        }
        TextSize::from(offset as u32)
    }

    /// Applies every edit and freezes the result.
    ///
    /// Edits are applied from the end of the buffer towards the start so
    /// that every position still refers to untouched original text when its
    /// edit is applied.
    pub fn materialize(self) -> EditedText<'src> {
        let mut order: Vec<(usize, &Edit)> = self.edits.iter().enumerate().collect();
        order.sort_by_key(|(index, edit)| {
            let seq = match edit {
                Edit::InsertAfter { .. } => -(*index as i64),
                _ => *index as i64,
            };
            (std::cmp::Reverse(edit.pos()), edit.apply_rank(), seq)
        });

        let mut text = self.original.to_string();
        for (_, edit) in &order {
            match edit {
                Edit::Overwrite { span, text: replacement } => {
                    text.replace_range(span.range(), replacement);
                }
                Edit::InsertBefore { pos, text: inserted }
                | Edit::InsertAfter { pos, text: inserted } => {
                    text.insert_str(usize::from(*pos), inserted);
                }
            }
        }

        let mut edits = self.edits;
        // Insertions sort ahead of an overwrite anchored at the same position.
        edits.sort_by_key(|edit| (edit.pos(), matches!(edit, Edit::Overwrite { .. })));

        tracing::trace!(
            edits = edits.len(),
            original_len = self.original.len(),
            edited_len = text.len(),
            "materialized edits"
        );

        EditedText {
            original: self.original,
            text,
            edits,
        }
    }
}

/// The immutable result of applying a [`TextEditor`].
#[derive(Debug, Clone)]
pub struct EditedText<'src> {
    original: &'src str,
    text: String,
    /// Edits sorted by ascending original position.
    edits: Vec<Edit>,
}

impl<'src> EditedText<'src> {
    /// Returns the original text.
    pub fn original(&self) -> &'src str {
        self.original
    }

    /// Returns the edited text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the result, returning the edited text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Maps an original offset to its offset in the edited text.
    ///
    /// An offset inside an overwritten range maps to the start of the
    /// replacement.
    pub fn edited_offset(&self, offset: ByteOffset) -> ByteOffset {
        let mut cursor = EditCursor::new(&self.edits);
        cursor.resolve(offset)
    }

    /// Computes the correspondence table: one entry for every character
    /// boundary of every original line, including the line end.
    pub fn mappings(&self) -> Vec<Mapping> {
        let generated_index = LineIndex::new(&self.text);
        let mut cursor = EditCursor::new(&self.edits);
        let mut mappings = Vec::with_capacity(self.original.len() + 1);
        let mut line_start = 0usize;

        for (line_idx, line) in self.original.split('\n').enumerate() {
            let columns = line
                .char_indices()
                .map(|(col, _)| col)
                .chain(std::iter::once(line.len()));

            for col in columns {
                let original = TextSize::from((line_start + col) as u32);
                let generated = generated_index.line_col(cursor.resolve(original));
                mappings.push(Mapping {
                    original_line: line_idx as u32 + 1,
                    original_column: col as u32,
                    generated_line: generated.line + 1,
                    generated_column: generated.col,
                });
            }

            line_start += line.len() + 1;
        }

        mappings
    }

    /// Builds the encoded map descriptor for this edit.
    pub fn generate_map(&self, options: &MapOptions) -> SourceMapDescriptor {
        SourceMapDescriptor::from_mappings(&self.mappings(), self.original, options)
    }
}

impl fmt::Display for EditedText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Walks sorted edits while resolving non-decreasing offsets.
struct EditCursor<'a> {
    edits: &'a [Edit],
    next: usize,
    delta: i64,
}

impl<'a> EditCursor<'a> {
    fn new(edits: &'a [Edit]) -> Self {
        Self {
            edits,
            next: 0,
            delta: 0,
        }
    }

    /// Resolves `offset`. Calls must pass non-decreasing offsets.
    fn resolve(&mut self, offset: ByteOffset) -> ByteOffset {
        while let Some(edit) = self.edits.get(self.next) {
            if !edit.precedes(offset) {
                break;
            }
            self.delta += edit.delta();
            self.next += 1;
        }

        let anchor = match self.edits.get(self.next) {
            Some(Edit::Overwrite { span, .. }) if span.contains(offset) => span.start,
            _ => offset,
        };

        let shifted = (i64::from(u32::from(anchor)) + self.delta).max(0);
        TextSize::from(shifted as u32)
    }
}
