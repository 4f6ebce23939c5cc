//! Host diagnostic and span shapes.

use serde::{Deserialize, Serialize};
use source_map::{PositionMapper, Span};

/// Diagnostic category, as reported by the compiler.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

/// A compiler diagnostic located in a transformed file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The file identity, matching the cache key.
    pub file_name: String,
    /// Byte offset of the start.
    pub start: u32,
    /// Length in bytes.
    pub length: u32,
    /// The diagnostic message.
    pub message: String,
    /// The compiler's error code.
    pub code: u32,
    /// The severity.
    pub category: DiagnosticCategory,
}

/// A `start`/`length` text span, as used for hovers and navigation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TextSpan {
    pub start: u32,
    pub length: u32,
}

impl TextSpan {
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    fn to_span(self) -> Span {
        Span::at(self.start, self.length)
    }

    fn from_span(span: Span) -> Self {
        Self {
            start: span.start.into(),
            length: span.len().into(),
        }
    }

    /// Translates a span of the transformed text into the original text.
    pub fn to_original(self, mapper: &PositionMapper) -> Self {
        Self::from_span(mapper.span_to_original(self.to_span()))
    }

    /// Translates a span of the original text into the transformed text.
    pub fn to_transformed(self, mapper: &PositionMapper) -> Self {
        Self::from_span(mapper.span_to_transformed(self.to_span()))
    }
}

impl Diagnostic {
    /// The diagnostic's location.
    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.start, self.length)
    }

    /// Returns a copy located in the original text.
    pub fn to_original(&self, mapper: &PositionMapper) -> Self {
        let span = self.span().to_original(mapper);
        Self {
            start: span.start,
            length: span.length,
            ..self.clone()
        }
    }
}
