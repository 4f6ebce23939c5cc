//! Bidirectional offset and span translation over decoded mappings.

use crate::descriptor::SourceMapDescriptor;
use crate::vlq::DecodedMapping;
use crate::{ByteOffset, LineCol, LineIndex, Span};
use std::collections::BTreeMap;

/// One side of a decoded mapping, keyed under the line of the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Anchor {
    column: u32,
    target_line: u32,
    target_column: u32,
}

/// Anchors grouped by 1-based line, each group in table order.
type AnchorTable = BTreeMap<u32, Vec<Anchor>>;

/// Translates positions between an original text and its transformed form.
///
/// A lookup converts the offset to a line and column, picks the closest
/// anchor at or before that column, and carries the remaining column
/// distance over to the other side. Offsets with no usable anchor are
/// returned unchanged.
#[derive(Debug, Clone)]
pub struct PositionMapper {
    original_index: LineIndex,
    transformed_index: LineIndex,
    by_original: AnchorTable,
    by_generated: AnchorTable,
}

impl PositionMapper {
    /// Builds a mapper from decoded mappings.
    pub fn new(original: &str, transformed: &str, mappings: &[DecodedMapping]) -> Self {
        let mut by_original = AnchorTable::new();
        let mut by_generated = AnchorTable::new();

        for mapping in mappings {
            by_original
                .entry(mapping.original_line)
                .or_default()
                .push(Anchor {
                    column: mapping.original_column,
                    target_line: mapping.generated_line,
                    target_column: mapping.generated_column,
                });
            by_generated
                .entry(mapping.generated_line)
                .or_default()
                .push(Anchor {
                    column: mapping.generated_column,
                    target_line: mapping.original_line,
                    target_column: mapping.original_column,
                });
        }

        Self {
            original_index: LineIndex::new(original),
            transformed_index: LineIndex::new(transformed),
            by_original,
            by_generated,
        }
    }

    /// Builds a mapper by decoding a map descriptor.
    pub fn from_descriptor(original: &str, transformed: &str, map: &SourceMapDescriptor) -> Self {
        Self::new(original, transformed, &map.decoded_mappings())
    }

    /// Returns true if there are no mappings, so every lookup is the identity.
    pub fn is_empty(&self) -> bool {
        self.by_original.is_empty()
    }

    /// Maps an offset in the original text to the transformed text.
    pub fn to_transformed(&self, offset: ByteOffset) -> ByteOffset {
        translate(
            offset,
            &self.original_index,
            &self.transformed_index,
            &self.by_original,
        )
    }

    /// Maps an offset in the transformed text back to the original text.
    pub fn to_original(&self, offset: ByteOffset) -> ByteOffset {
        translate(
            offset,
            &self.transformed_index,
            &self.original_index,
            &self.by_generated,
        )
    }

    /// Maps a span of the original text into the transformed text.
    pub fn span_to_transformed(&self, span: Span) -> Span {
        let start = self.to_transformed(span.start);
        let end = self.to_transformed(span.end);
        Span::new(start, end.max(start))
    }

    /// Maps a span of the transformed text back into the original text.
    pub fn span_to_original(&self, span: Span) -> Span {
        let start = self.to_original(span.start);
        let end = self.to_original(span.end);
        Span::new(start, end.max(start))
    }
}

fn translate(offset: ByteOffset, from: &LineIndex, to: &LineIndex, table: &AnchorTable) -> ByteOffset {
    let position = from.line_col(offset);
    let line = position.line + 1;

    let Some((anchor, next)) = find_anchor(table, line, position.col) else {
        return offset;
    };

    let mut column =
        i64::from(anchor.target_column) + i64::from(position.col) - i64::from(anchor.column);
    // The carried distance never runs past the next anchor on the same
    // target line. Text removed by an edit leaves a gap between anchors
    // that is wider on this side than on the other.
    if let Some(next) = next.filter(|next| next.target_line == anchor.target_line) {
        column = column.min(i64::from(next.target_column.max(anchor.target_column)));
    }
    let target = LineCol::new(
        anchor.target_line.saturating_sub(1),
        column.clamp(0, i64::from(u32::MAX)) as u32,
    );

    // A column past the end of its line stays on that line.
    let mapped = match to.line_end(target.line) {
        Some(end) => to.offset_clamped(target).min(end),
        None => to.offset_clamped(target),
    };
    tracing::trace!(
        from = u32::from(offset),
        to = u32::from(mapped),
        "translated offset"
    );
    mapped
}

/// Picks the anchor with the greatest column not past `column` on `line`
/// (the last one on ties), else the last anchor of the nearest earlier line.
/// The second anchor is the closest one after `column` on `line`, if any.
fn find_anchor(table: &AnchorTable, line: u32, column: u32) -> Option<(Anchor, Option<Anchor>)> {
    if let Some(anchors) = table.get(&line) {
        let best = anchors
            .iter()
            .filter(|anchor| anchor.column <= column)
            .fold(None, |best: Option<&Anchor>, anchor| match best {
                Some(best) if best.column > anchor.column => Some(best),
                _ => Some(anchor),
            });
        if let Some(best) = best {
            let next = anchors
                .iter()
                .filter(|anchor| anchor.column > column)
                .min_by_key(|anchor| (anchor.column, anchor.target_column));
            return Some((*best, next.copied()));
        }
    }

    table
        .range(..line)
        .next_back()
        .and_then(|(_, anchors)| anchors.last().copied())
        .map(|anchor| (anchor, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::MapOptions;
    use crate::editor::TextEditor;
    use text_size::TextSize;

    fn offset(value: u32) -> ByteOffset {
        TextSize::from(value)
    }

    fn decoded(generated: (u32, u32), original: (u32, u32)) -> DecodedMapping {
        DecodedMapping {
            generated_line: generated.0,
            generated_column: generated.1,
            original_line: original.0,
            original_column: original.1,
            source_index: Some(0),
            name_index: None,
        }
    }

    fn bind_mapper() -> (String, PositionMapper) {
        let original = "gen {\n  x <- foo()\n}\n";
        let mut editor = TextEditor::new(original);
        editor.insert_before(8u32, "const ");
        editor.overwrite(9u32, 13u32, " = yield* ");
        let edited = editor.materialize();
        let map = edited.generate_map(&MapOptions::default());
        let transformed = edited.as_str().to_string();
        let mapper = PositionMapper::from_descriptor(original, &transformed, &map);
        (transformed, mapper)
    }

    #[test]
    fn test_empty_mapper_is_identity() {
        let mapper = PositionMapper::new("abc", "xyz", &[]);
        assert!(mapper.is_empty());
        assert_eq!(mapper.to_transformed(offset(2)), offset(2));
        assert_eq!(mapper.to_original(offset(40)), offset(40));
    }

    #[test]
    fn test_roundtrip_through_edit() {
        let (transformed, mapper) = bind_mapper();
        assert_eq!(transformed, "gen {\n  const x = yield* foo()\n}\n");

        // "foo" in the original sits at offset 13.
        let foo = mapper.to_transformed(offset(13));
        assert_eq!(&transformed[usize::from(foo)..usize::from(foo) + 3], "foo");
        assert_eq!(mapper.to_original(foo), offset(13));

        // "x" keeps its identity in both directions.
        let x = mapper.to_transformed(offset(8));
        assert_eq!(&transformed[usize::from(x)..usize::from(x) + 1], "x");
        assert_eq!(mapper.to_original(x), offset(8));

        // The closing brace on the last line.
        let brace = transformed.rfind('}').unwrap() as u32;
        assert_eq!(mapper.to_original(offset(brace)), offset(19));
    }

    #[test]
    fn test_inserted_text_maps_to_nearest_preceding_anchor() {
        let (transformed, mapper) = bind_mapper();
        let keyword = transformed.find("const").unwrap() as u32;
        // "const " has no anchor of its own. The distance carried from the
        // column before it stops at the anchor of "x".
        assert_eq!(mapper.to_original(offset(keyword - 1)), offset(7));
        assert_eq!(mapper.to_original(offset(keyword + 2)), offset(8));
    }

    #[test]
    fn test_removed_text_does_not_overshoot_next_anchor() {
        let original = "a     b";
        let mut editor = TextEditor::new(original);
        editor.overwrite(1u32, 6u32, " ");
        let edited = editor.materialize();
        assert_eq!(edited.as_str(), "a b");
        let map = edited.generate_map(&MapOptions::default());
        let mapper = PositionMapper::from_descriptor(original, edited.as_str(), &map);

        let mapped: Vec<u32> = (0..=7u32)
            .map(|at| u32::from(mapper.to_transformed(offset(at))))
            .collect();
        assert_eq!(mapped, vec![0, 1, 2, 2, 2, 2, 2, 3]);
    }

    #[test]
    fn test_tie_prefers_last_anchor() {
        let mappings = [decoded((1, 0), (1, 0)), decoded((1, 5), (1, 0))];
        let mapper = PositionMapper::new("abcdef", "0123456789", &mappings);
        assert_eq!(mapper.to_transformed(offset(1)), offset(6));
    }

    #[test]
    fn test_falls_back_to_earlier_line() {
        let mappings = [decoded((1, 0), (1, 0)), decoded((1, 2), (1, 2))];
        let mapper = PositionMapper::new("abc\ndef", "abc\ndef", &mappings);
        // Line 2 has no mappings: use the last anchor of line 1 and carry the
        // column distance (1 - 2 → clamped to 0).
        assert_eq!(mapper.to_transformed(offset(5)), offset(1));
    }

    #[test]
    fn test_no_anchor_before_start_of_file_is_identity() {
        let mappings = [decoded((2, 0), (2, 0))];
        let mapper = PositionMapper::new("ab\ncd", "ab\ncd", &mappings);
        assert_eq!(mapper.to_original(offset(1)), offset(1));
    }

    #[test]
    fn test_span_translation() {
        let (transformed, mapper) = bind_mapper();
        let call = transformed.find("foo()").unwrap() as u32;
        let span = mapper.span_to_original(Span::at(call, 5u32));
        assert_eq!(span, Span::new(13u32, 18u32));

        let forward = mapper.span_to_transformed(Span::at(13u32, 5u32));
        assert_eq!(forward.slice(&transformed), "foo()");
    }

    #[test]
    fn test_span_length_never_negative() {
        let mappings = [decoded((1, 0), (1, 5)), decoded((1, 3), (1, 0))];
        let mapper = PositionMapper::new("abcdefgh", "abcdefgh", &mappings);
        let span = mapper.span_to_original(Span::new(0u32, 3u32));
        assert_eq!(span.start, offset(5));
        assert!(span.is_empty());
    }
}
