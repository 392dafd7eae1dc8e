use std::fmt;

use crate::token::TokenKind;

/// A 1-indexed line and column in the source text.
///
/// Columns count Unicode code points, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The position of the first character of any document.
    pub const START: Position = Position { line: 1, column: 1 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A byte-offset span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Creates a new span from start (inclusive) to end (exclusive).
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Errors produced while lexing or parsing a DBML document.
///
/// Both stages stop at the first error; no partial AST is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DbmlError {
    /// A quoted, backticked or triple-quoted literal was still open at end of input.
    UnterminatedLiteral {
        kind: TokenKind,
        position: Position,
        span: Span,
    },

    /// A `/*` block comment was still open at end of input.
    UnterminatedComment { position: Position, span: Span },

    /// The current token does not fit any production allowed at this point.
    SyntaxError {
        expected: String,
        found: String,
        position: Position,
        span: Span,
    },
}

impl DbmlError {
    /// Where the error starts in the source.
    pub fn position(&self) -> Position {
        match self {
            Self::UnterminatedLiteral { position, .. }
            | Self::UnterminatedComment { position, .. }
            | Self::SyntaxError { position, .. } => *position,
        }
    }

    /// Byte span of the offending lexeme (or the unterminated literal).
    pub fn span(&self) -> Span {
        match self {
            Self::UnterminatedLiteral { span, .. }
            | Self::UnterminatedComment { span, .. }
            | Self::SyntaxError { span, .. } => *span,
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::UnterminatedLiteral { .. } => "unterminated_literal",
            Self::UnterminatedComment { .. } => "unterminated_comment",
            Self::SyntaxError { .. } => "syntax_error",
        }
    }
}

impl fmt::Display for DbmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedLiteral { kind, position, .. } => {
                write!(
                    f,
                    "unterminated {} starting at {position}",
                    kind.description()
                )
            }
            Self::UnterminatedComment { position, .. } => {
                write!(f, "unterminated block comment starting at {position}")
            }
            Self::SyntaxError {
                expected,
                found,
                position,
                ..
            } => {
                write!(
                    f,
                    "syntax error at {position}: expected {expected}, found {found}"
                )
            }
        }
    }
}

impl std::error::Error for DbmlError {}
