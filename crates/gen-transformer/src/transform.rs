//! Bind-line rewriting and whole-file transformation.

use crate::bind::BindLine;
use crate::scope::ScopeTracker;
use gen_parser::{find_gen_blocks, has_gen_blocks, tokenize, GenBlock};
use serde::{Deserialize, Serialize};
use source_map::{ByteOffset, Edit, MapOptions, Mapping, SourceMapDescriptor, Span, TextEditor};

/// Text placed in front of a bound target.
const BINDING_KEYWORD: &str = "const ";
/// Replaces the arrow of a line with a target.
const BINDING_OPERATOR: &str = "= yield*";
/// Replaces the arrow of a line with no target.
const YIELD_OPERATOR: &str = "yield*";

/// Replacement text for the `gen {` and `}` delimiters of each block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockWrap {
    /// Replaces `gen {`, keyword through opening brace.
    pub open: String,
    /// Replaces the closing `}`.
    pub close: String,
}

/// Options for transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// The filename of the source file.
    pub filename: Option<String>,
    /// Whether to generate source maps.
    pub source_maps: bool,
    /// Embed the original text in the map.
    pub include_content: bool,
    /// Delimiter replacement applied to every top-level block.
    pub wrap: Option<BlockWrap>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            filename: None,
            source_maps: true,
            include_content: false,
            wrap: None,
        }
    }
}

/// The result of transformation.
#[derive(Debug, Clone)]
pub struct TransformResult<'src> {
    /// The transformed code.
    pub code: String,
    /// The encoded map from `code` back to the source.
    pub source_map: SourceMapDescriptor,
    /// The correspondence table the map was encoded from.
    pub mappings: Vec<Mapping>,
    /// The top-level blocks that were rewritten.
    pub blocks: Vec<GenBlock<'src>>,
}

/// Computes the edits that rewrite every bind line in a block's content.
///
/// Positions are relative to the start of `content`. Lines inside nested
/// function bodies, comment lines, and lines starting inside a multi-line
/// literal are left alone.
pub fn rewrites(content: &str) -> Vec<Edit> {
    let tokens = tokenize(content);
    let mut scope = ScopeTracker::default();
    let mut next_token = 0;
    let mut edits = Vec::new();
    let mut line_start = 0;

    for raw_line in content.split_inclusive('\n') {
        let start = line_start;
        line_start += raw_line.len();

        let line = raw_line.trim_end_matches(['\n', '\r']);
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let first = start + (line.len() - trimmed.len());
        while let Some(token) = tokens.get(next_token) {
            if token.start() >= first {
                break;
            }
            scope.advance(token);
            next_token += 1;
        }

        let inside_literal = next_token
            .checked_sub(1)
            .and_then(|index| tokens.get(index))
            .is_some_and(|token| token.end() > first && token.kind.is_opaque());
        if inside_literal || scope.in_function_body() {
            continue;
        }

        if let Some(bind) = BindLine::parse(line) {
            bind_edits(&bind, start, &mut edits);
        }
    }

    edits
}

/// Only the `<-` token is replaced, so the whitespace around it survives and
/// every edit grows the text. A space is added on a side with none.
fn bind_edits(bind: &BindLine, line_start: usize, edits: &mut Vec<Edit>) {
    let at = |offset: usize| ByteOffset::from((line_start + offset) as u32);
    let arrow = Span::new(at(bind.arrow.start), at(bind.arrow.end));
    let trailing = if bind.arrow.end == bind.expr.start { " " } else { "" };

    match &bind.target {
        Some(target) => {
            let leading = if target.end == bind.arrow.start { " " } else { "" };
            edits.push(Edit::insert_before(at(target.start), BINDING_KEYWORD));
            edits.push(Edit::overwrite(
                arrow,
                format!("{leading}{BINDING_OPERATOR}{trailing}"),
            ));
        }
        None => {
            edits.push(Edit::overwrite(arrow, format!("{YIELD_OPERATOR}{trailing}")));
        }
    }
}

/// Rewrites every bind line in a block's content.
pub fn transform(content: &str) -> String {
    let mut editor = TextEditor::new(content);
    for edit in rewrites(content) {
        editor.push(edit);
    }
    editor.materialize().into_string()
}

/// Transforms every gen block in a source file.
pub fn transform_source<'src>(text: &'src str, options: &TransformOptions) -> TransformResult<'src> {
    let blocks = if has_gen_blocks(text) {
        find_gen_blocks(text)
    } else {
        Vec::new()
    };

    let mut editor = TextEditor::new(text);
    for block in &blocks {
        let content_start = block.content_span().start;
        for edit in rewrites(block.content) {
            editor.push(edit.shifted(content_start));
        }

        if let Some(wrap) = &options.wrap {
            editor.overwrite(
                block.start,
                block.brace_start + ByteOffset::from(1),
                wrap.open.as_str(),
            );
            editor.overwrite(block.brace_end(), block.end, wrap.close.as_str());
        }
    }

    let edit_count = editor.len();
    let edited = editor.materialize();
    let mappings = if options.source_maps {
        edited.mappings()
    } else {
        Vec::new()
    };
    let map_options = MapOptions {
        source: options.filename.clone(),
        file: options.filename.clone(),
        include_content: options.include_content,
    };
    let source_map = SourceMapDescriptor::from_mappings(&mappings, text, &map_options);

    tracing::debug!(
        file = options.filename.as_deref().unwrap_or("<anonymous>"),
        blocks = blocks.len(),
        edits = edit_count,
        "transformed source"
    );

    TransformResult {
        code: edited.into_string(),
        source_map,
        mappings,
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transform_bind_line() {
        assert_eq!(
            transform("x <- fetchFoo()\n"),
            "const x = yield* fetchFoo()\n"
        );
    }

    #[test]
    fn test_transform_keeps_semicolon_and_indent() {
        assert_eq!(
            transform("\n    user <- getUser(id);\n"),
            "\n    const user = yield* getUser(id);\n"
        );
    }

    #[test]
    fn test_transform_without_target() {
        assert_eq!(transform("  <- log('hi')"), "  yield* log('hi')");
    }

    #[test]
    fn test_transform_crlf_lines() {
        assert_eq!(
            transform("a <- f()\r\nb <- g()\r\n"),
            "const a = yield* f()\r\nconst b = yield* g()\r\n"
        );
    }

    #[test]
    fn test_transform_skips_comments_and_declarations() {
        let content = "\n  // x <- f()\n  const y = 1;\n  /* z <- g() */\n";
        assert_eq!(transform(content), content);
    }

    #[test]
    fn test_transform_skips_lines_inside_literals() {
        let content = "s <- `\nx <- f()\n`\n/*\ny <- g()\n*/\n";
        assert_eq!(
            transform(content),
            "const s = yield* `\nx <- f()\n`\n/*\ny <- g()\n*/\n"
        );
    }

    #[test]
    fn test_scope_exclusion() {
        let nested = "\n  arr.map(function (x) {\n    y <- f(x)\n  })\n";
        assert_eq!(transform(nested), nested);

        let control = "\n  if (cond) {\n    y <- f(x)\n  }\n";
        assert_eq!(
            transform(control),
            "\n  if (cond) {\n    const y = yield* f(x)\n  }\n"
        );
    }

    #[test]
    fn test_rewrites_are_relative_to_content() {
        let edits = rewrites(" x <- f()");
        assert_eq!(
            edits,
            vec![
                Edit::insert_before(1u32, "const "),
                Edit::overwrite(Span::new(3u32, 5u32), "= yield*"),
            ]
        );
    }

    #[test]
    fn test_transform_keeps_arrow_spacing() {
        assert_eq!(
            transform("x\t\t<-\t\tf()\n"),
            "const x\t\t= yield*\t\tf()\n"
        );
        assert_eq!(transform("$user<-load(id);"), "const $user = yield* load(id);");
        assert_eq!(transform("  <-log()"), "  yield* log()");
    }

    #[test]
    fn test_transform_source_without_blocks_is_unchanged() {
        let result = transform_source("const x = 1;\n", &TransformOptions::default());
        assert_eq!(result.code, "const x = 1;\n");
        assert!(result.blocks.is_empty());
        assert_eq!(result.mappings.len(), 14);
    }

    #[test]
    fn test_transform_source_rewrites_blocks() {
        let source = "const p = gen {\n  x <- f()\n  return x\n}\n";
        let result = transform_source(source, &TransformOptions::default());
        assert_eq!(
            result.code,
            "const p = gen {\n  const x = yield* f()\n  return x\n}\n"
        );
        assert_eq!(result.blocks.len(), 1);
    }

    #[test]
    fn test_transform_source_wrap() {
        let options = TransformOptions {
            wrap: Some(BlockWrap {
                open: "Effect.gen(function* () {".to_string(),
                close: "})".to_string(),
            }),
            ..TransformOptions::default()
        };
        let result = transform_source("gen { x <- f() }", &options);
        assert_eq!(
            result.code,
            "Effect.gen(function* () { const x = yield* f() })"
        );
    }

    #[test]
    fn test_transform_source_without_maps() {
        let options = TransformOptions {
            source_maps: false,
            ..TransformOptions::default()
        };
        let result = transform_source("gen { x <- f() }", &options);
        assert!(result.mappings.is_empty());
        assert_eq!(result.source_map.mappings, "");
    }

    #[test]
    fn test_options_from_json() {
        let options: TransformOptions = serde_json::from_str(
            r#"{"filename":"a.ts","includeContent":true,"wrap":{"open":"(","close":")"}}"#,
        )
        .unwrap();
        assert_eq!(options.filename.as_deref(), Some("a.ts"));
        assert!(options.source_maps);
        assert!(options.include_content);
        assert_eq!(options.wrap.unwrap().close, ")");
    }
}
