//! Recognising bind lines.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static BIND_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^[\ \t]*
        (?:
            (?P<target>
                [A-Za-z_$][A-Za-z0-9_$]*
              | \[ [\ \tA-Za-z0-9_$,.]* \]
              | \{ [\ \tA-Za-z0-9_$,.]* \}
            )
            [\ \t]*
        )?
        (?P<arrow><-)
        [\ \t]*
        (?P<expr>.+?)
        [\ \t]*;?
        [\ \t]*$",
    )
    .unwrap()
});

/// The parts of a `target <- expression` line, as byte ranges into the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BindLine {
    /// The bound identifier or destructuring pattern, if any.
    pub target: Option<Range<usize>>,
    /// The `<-` operator.
    pub arrow: Range<usize>,
    /// The right-hand side, without a trailing `;` or whitespace.
    pub expr: Range<usize>,
}

impl BindLine {
    /// Matches a single line, which must not contain its line terminator.
    pub(crate) fn parse(line: &str) -> Option<Self> {
        let captures = BIND_LINE.captures(line)?;
        Some(Self {
            target: captures.name("target").map(|m| m.range()),
            arrow: captures.name("arrow")?.range(),
            expr: captures.name("expr")?.range(),
        })
    }
}
