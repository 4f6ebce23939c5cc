//! Locating `gen { … }` blocks.

use crate::lexer::{tokenize, Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;
use source_map::{ByteOffset, Span};
use text_size::TextSize;

static GEN_BLOCK_HINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bgen\s*\{").unwrap());

/// A `gen { … }` block found in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenBlock<'src> {
    /// Offset of the `gen` keyword.
    pub start: ByteOffset,
    /// Offset of the opening `{`.
    pub brace_start: ByteOffset,
    /// Offset just after the matching `}`.
    pub end: ByteOffset,
    /// The text strictly between the braces.
    pub content: &'src str,
}

impl GenBlock<'_> {
    /// The whole block, `gen` keyword through the closing brace.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// The span of [`GenBlock::content`] in the file.
    pub fn content_span(&self) -> Span {
        Span::new(
            self.brace_start + TextSize::from(1),
            self.end - TextSize::from(1),
        )
    }

    /// Offset of the closing `}`.
    pub fn brace_end(&self) -> ByteOffset {
        self.end - TextSize::from(1)
    }
}

/// Cheap textual check for anything that could be a gen block.
///
/// May report blocks that are only mentioned inside strings or comments;
/// never misses one whose `{` follows the keyword after plain whitespace.
pub fn has_gen_blocks(text: &str) -> bool {
    GEN_BLOCK_HINT.is_match(text)
}

/// Finds every top-level gen block in `text`.
///
/// Blocks nested inside another block's braces belong to that block and are
/// not reported separately.
pub fn find_gen_blocks(text: &str) -> Vec<GenBlock<'_>> {
    let tokens = tokenize(text);
    let mut blocks = Vec::new();
    let mut index = 0;

    while index < tokens.len() {
        if tokens[index].kind != TokenKind::Gen {
            index += 1;
            continue;
        }

        match match_block(text, &tokens, index) {
            Some((block, close)) => {
                blocks.push(block);
                index = close + 1;
            }
            None => index += 1,
        }
    }

    tracing::debug!(count = blocks.len(), "found gen blocks");
    blocks
}

/// Tries to match a block whose `gen` keyword is `tokens[keyword]`.
/// Returns the block and the index of its closing brace token.
fn match_block<'src>(
    text: &'src str,
    tokens: &[Token<'src>],
    keyword: usize,
) -> Option<(GenBlock<'src>, usize)> {
    let open = next_significant(tokens, keyword + 1)?;
    if tokens[open].kind != TokenKind::LBrace {
        return None;
    }

    let mut depth = 1usize;
    for (index, token) in tokens.iter().enumerate().skip(open + 1) {
        match token.kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => {
                depth -= 1;
                if depth == 0 {
                    let brace_start = tokens[open].start();
                    let block = GenBlock {
                        start: tokens[keyword].span.start,
                        brace_start: tokens[open].span.start,
                        end: token.span.end,
                        content: &text[brace_start + 1..token.start()],
                    };
                    return Some((block, index));
                }
            }
            _ => {}
        }
    }

    None
}

/// Index of the first non-trivia token at or after `from`.
fn next_significant(tokens: &[Token<'_>], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&index| !tokens[index].kind.is_trivia())
}
