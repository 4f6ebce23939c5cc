//! Tracking whether the scan position is inside a nested function body.

use gen_parser::{Token, TokenKind};

/// A `function` keyword whose body brace has not been seen yet.
#[derive(Debug, Clone, Copy)]
struct PendingFunction {
    /// Paren depth at the keyword.
    paren_depth: usize,
    /// Set once the parameter list has closed.
    params_closed: bool,
}

/// Follows a token stream and reports whether the current position lies
/// inside the body of a block-bodied function or arrow function.
///
/// Braces belonging to control flow (`if`, `else`, `try`, object literals)
/// are tracked but do not count as function bodies.
#[derive(Debug, Default)]
pub(crate) struct ScopeTracker {
    /// One entry per open `{`; `true` for function bodies.
    braces: Vec<bool>,
    open_functions: usize,
    paren_depth: usize,
    pending: Option<PendingFunction>,
    after_arrow: bool,
}

impl ScopeTracker {
    /// Returns true while any function body is open.
    pub(crate) fn in_function_body(&self) -> bool {
        self.open_functions > 0
    }

    /// Consumes the next token.
    pub(crate) fn advance(&mut self, token: &Token<'_>) {
        if token.kind.is_trivia() {
            return;
        }

        let after_arrow = std::mem::take(&mut self.after_arrow);

        match token.kind {
            TokenKind::Function => {
                self.pending = Some(PendingFunction {
                    paren_depth: self.paren_depth,
                    params_closed: false,
                });
            }
            TokenKind::FatArrow => self.after_arrow = true,
            TokenKind::LParen => self.paren_depth += 1,
            TokenKind::RParen => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                if let Some(pending) = self.pending.as_mut() {
                    if pending.paren_depth == self.paren_depth {
                        pending.params_closed = true;
                    }
                }
            }
            TokenKind::LBrace => {
                let body = after_arrow || self.take_function_body();
                if body {
                    self.open_functions += 1;
                }
                self.braces.push(body);
            }
            TokenKind::RBrace => {
                if self.braces.pop() == Some(true) {
                    self.open_functions -= 1;
                }
            }
            // A body-less declaration such as an overload signature.
            TokenKind::Semicolon => {
                if matches!(self.pending, Some(p) if p.paren_depth == self.paren_depth) {
                    self.pending = None;
                }
            }
            _ => {}
        }
    }

    /// Claims the current `{` for a pending `function` whose parameters have
    /// closed at the same paren depth.
    fn take_function_body(&mut self) -> bool {
        match self.pending {
            Some(pending) if pending.params_closed && pending.paren_depth == self.paren_depth => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gen_parser::tokenize;

    /// Nesting state just before the first occurrence of `marker`.
    fn nested_at(source: &str, marker: &str) -> bool {
        let at = source.find(marker).unwrap();
        let mut scope = ScopeTracker::default();
        for token in tokenize(source) {
            if token.start() >= at {
                break;
            }
            scope.advance(&token);
        }
        scope.in_function_body()
    }

    #[test]
    fn test_function_body_is_nested() {
        assert!(nested_at("arr.map(function (x) { HERE })", "HERE"));
        assert!(nested_at("function named(a, b) {\n HERE\n}", "HERE"));
    }

    #[test]
    fn test_control_flow_is_not_nested() {
        assert!(!nested_at("if (cond) { HERE }", "HERE"));
        assert!(!nested_at("try { a } catch (e) { HERE }", "HERE"));
        assert!(!nested_at("const o = { a: 1, HERE }", "HERE"));
    }

    #[test]
    fn test_block_arrow_is_nested() {
        assert!(nested_at("xs.forEach((x) => { HERE })", "HERE"));
        assert!(nested_at("xs.forEach(x =>\n  {\n HERE })", "HERE"));
    }

    #[test]
    fn test_expression_arrow_is_not_nested() {
        assert!(!nested_at("const f = (x) => x + 1;\nHERE", "HERE"));
        assert!(!nested_at("const f = () => ({ a: 1 });\nHERE", "HERE"));
    }

    #[test]
    fn test_scope_closes_with_its_brace() {
        let source = "xs.map(function (x) { if (x) { a } })\nHERE";
        assert!(!nested_at(source, "HERE"));
    }

    #[test]
    fn test_destructured_parameters_do_not_open_body() {
        let source = "function f({ a, b } = {}) {\n HERE }";
        assert!(nested_at(source, "HERE"));
        assert!(!nested_at("function f({ a, HERE", "HERE"));
    }

    #[test]
    fn test_signature_without_body_is_dropped() {
        assert!(!nested_at("function f(a: number);\nif (a) { HERE }", "HERE"));
    }

    #[test]
    fn test_stray_close_brace_is_ignored() {
        assert!(!nested_at("} } HERE", "HERE"));
    }
}
