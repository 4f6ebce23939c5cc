//! Scanners for opaque literals.
//!
//! Each function receives the text immediately after an opening delimiter and
//! returns how many bytes belong to the literal, closing delimiter included.
//! A literal that never closes runs to the end of the input. Every returned
//! length lands on a character boundary.

/// Advances past a backslash escape starting at `pos`: the backslash and
/// whatever character follows it, even a line terminator.
fn skip_escape(text: &str, pos: usize) -> usize {
    let after = pos + 1;
    after + text[after..].chars().next().map_or(0, char::len_utf8)
}

/// Length of a single- or double-quoted string body.
pub fn quoted_len(rest: &str, quote: char) -> usize {
    let mut pos = 0;
    while let Some(c) = rest[pos..].chars().next() {
        match c {
            '\\' => pos = skip_escape(rest, pos),
            c if c == quote => return pos + 1,
            c => pos += c.len_utf8(),
        }
    }
    rest.len()
}

/// Length of a template literal body, embedded `${ … }` regions included.
pub fn template_len(rest: &str) -> usize {
    let mut pos = 0;
    while let Some(c) = rest[pos..].chars().next() {
        match c {
            '\\' => pos = skip_escape(rest, pos),
            '`' => return pos + 1,
            '$' if rest[pos + 1..].starts_with('{') => {
                pos += 2;
                pos += template_expression_len(&rest[pos..]);
            }
            c => pos += c.len_utf8(),
        }
    }
    rest.len()
}

/// Length of an embedded template expression, measured from just after
/// `${` up to and including the `}` that brings the brace depth back to zero.
///
/// Nested template literals and quoted strings are skipped whole, so braces
/// inside them never move the depth.
pub fn template_expression_len(rest: &str) -> usize {
    let mut depth = 1usize;
    let mut pos = 0;
    while let Some(c) = rest[pos..].chars().next() {
        match c {
            '{' => {
                depth += 1;
                pos += 1;
            }
            '}' => {
                depth -= 1;
                pos += 1;
                if depth == 0 {
                    return pos;
                }
            }
            '`' => {
                pos += 1;
                pos += template_len(&rest[pos..]);
            }
            '\'' | '"' => {
                pos += 1;
                pos += quoted_len(&rest[pos..], c);
            }
            '\\' => pos = skip_escape(rest, pos),
            c => pos += c.len_utf8(),
        }
    }
    rest.len()
}

/// Length of a block comment body, `*/` included.
pub fn block_comment_len(rest: &str) -> usize {
    rest.find("*/").map_or(rest.len(), |end| end + 2)
}

/// Length of a line comment body, stopping before the line terminator.
pub fn line_comment_len(rest: &str) -> usize {
    rest.find(|c: char| c == '\n' || c == '\r').unwrap_or(rest.len())
}

/// Length of the remainder of a number literal after its first digit.
///
/// Digits, `.`, `_`, and exponent markers are consumed; an exponent marker
/// takes a directly following sign with it. A trailing `n` marks a big
/// integer.
pub fn number_tail_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let mut pos = 0;
    while let Some(&byte) = bytes.get(pos) {
        match byte {
            b'0'..=b'9' | b'.' | b'_' => pos += 1,
            b'e' | b'E' => {
                pos += 1;
                if matches!(bytes.get(pos), Some(b'+' | b'-')) {
                    pos += 1;
                }
            }
            _ => break,
        }
    }
    if bytes.get(pos) == Some(&b'n') {
        pos += 1;
    }
    pos
}
