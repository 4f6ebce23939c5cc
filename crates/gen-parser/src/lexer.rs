//! Tokenizer using logos.
//!
//! The lexer classifies every byte of the input: concatenating the text of
//! all tokens reproduces the source exactly. It never fails. Unterminated
//! strings, templates and comments run to the end of the input, and
//! anything logos does not recognise becomes a one-character
//! [`TokenKind::Other`] token.

use crate::literal;
use logos::Logos;
use source_map::Span;
use std::collections::VecDeque;
use text_size::TextSize;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The source text of the token.
    pub text: &'src str,
    /// The span of the token in the source.
    pub span: Span,
}

impl Token<'_> {
    /// The start offset of the token.
    #[inline]
    pub fn start(&self) -> usize {
        usize::from(self.span.start)
    }

    /// The end offset of the token (exclusive).
    #[inline]
    pub fn end(&self) -> usize {
        usize::from(self.span.end)
    }
}

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos)]
pub enum TokenKind {
    // === Trivia ===
    /// A run of spaces and tabs.
    #[regex(r"[ \t]+")]
    Whitespace,

    /// A run of line terminators (`\n`, `\r\n`, lone `\r`).
    #[regex(r"(\r\n|\n|\r)+")]
    LineTerminator,

    /// `// …` up to, not including, the line terminator.
    #[token("//", line_comment)]
    LineComment,

    /// `/* … */`, or to the end of input when unclosed.
    #[token("/*", block_comment)]
    BlockComment,

    // === Literals ===
    /// A single- or double-quoted string.
    #[token("'", single_quoted)]
    #[token("\"", double_quoted)]
    String,

    /// A back-quoted template literal, embedded expressions included.
    #[token("`", template)]
    Template,

    /// A numeric literal.
    #[regex(r"[0-9]", number)]
    Number,

    // === Keywords ===
    /// `gen`
    #[token("gen", priority = 5)]
    Gen,

    /// `function`
    #[token("function", priority = 5)]
    Function,

    /// An identifier.
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*", priority = 4)]
    Ident,

    // === Structural punctuators ===
    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `[`
    #[token("[")]
    LBracket,

    /// `]`
    #[token("]")]
    RBracket,

    /// `,`
    #[token(",")]
    Comma,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `=>`
    #[token("=>")]
    FatArrow,

    /// `<-`, the bind arrow.
    #[token("<-")]
    LeftArrow,

    /// Any other operator.
    #[token("===")]
    #[token("!==")]
    #[token("...")]
    #[token("**=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token(">>>")]
    #[token("&&=")]
    #[token("||=")]
    #[token("??=")]
    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("&&")]
    #[token("||")]
    #[token("??")]
    #[token("?.")]
    #[token("++")]
    #[token("--")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("**")]
    #[token("<<")]
    #[token(">>")]
    #[token(".")]
    #[token("<")]
    #[token(">")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("!")]
    #[token("~")]
    #[token("?")]
    #[token(":")]
    #[token("=")]
    #[token("@")]
    #[token("#")]
    Punct,

    /// A single character nothing else matched.
    Other,
}

fn line_comment(lex: &mut logos::Lexer<TokenKind>) {
    let len = literal::line_comment_len(lex.remainder());
    lex.bump(len);
}

fn block_comment(lex: &mut logos::Lexer<TokenKind>) {
    let len = literal::block_comment_len(lex.remainder());
    lex.bump(len);
}

fn single_quoted(lex: &mut logos::Lexer<TokenKind>) {
    let len = literal::quoted_len(lex.remainder(), '\'');
    lex.bump(len);
}

fn double_quoted(lex: &mut logos::Lexer<TokenKind>) {
    let len = literal::quoted_len(lex.remainder(), '"');
    lex.bump(len);
}

fn template(lex: &mut logos::Lexer<TokenKind>) {
    let len = literal::template_len(lex.remainder());
    lex.bump(len);
}

fn number(lex: &mut logos::Lexer<TokenKind>) {
    let len = literal::number_tail_len(lex.remainder());
    lex.bump(len);
}

impl TokenKind {
    /// Returns true for whitespace, line terminators and comments.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::LineTerminator
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }

    /// Returns true for tokens whose contents are never inspected:
    /// strings, templates and comments.
    pub fn is_opaque(&self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Template
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }
}

/// A lexer over source text.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    /// Single-character tokens split out of an unrecognised run.
    pending: VecDeque<Token<'src>>,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            pending: VecDeque::new(),
        }
    }


    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token<'src> {
        Token {
            kind,
            text: &self.source[start..end],
            span: Span::new(TextSize::from(start as u32), TextSize::from(end as u32)),
        }
    }

    /// Queues one `Other` token per character of an unrecognised run.
    fn split_unrecognised(&mut self, start: usize, end: usize) {
        let mut end = end;
        while !self.source.is_char_boundary(end) {
            end += 1;
        }
        let span_end = self.inner.span().end;
        if end > span_end {
            self.inner.bump(end - span_end);
        }

        for (offset, c) in self.source[start..end].char_indices() {
            let char_start = start + offset;
            let token = self.token(TokenKind::Other, char_start, char_start + c.len_utf8());
            self.pending.push_back(token);
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }

        let result = self.inner.next()?;
        let span = self.inner.span();
        match result {
            Ok(kind) => Some(self.token(kind, span.start, span.end)),
            Err(()) => {
                self.split_unrecognised(span.start, span.end.max(span.start + 1));
                self.pending.pop_front()
            }
        }
    }
}

/// Tokenizes the whole input.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).collect()
}
