use logos::{FilterResult, Logos};

use crate::error::{DbmlError, Position, Span};
use crate::token::{classify, Token, TokenKind};

/// Why logos stopped on a lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ScanError {
    /// No rule matches; the first character is dropped.
    #[default]
    Unrecognized,
    /// A literal opened but never closed before end of input.
    Unterminated(TokenKind),
    /// A `/*` with no matching `*/`.
    UnterminatedComment,
}

/// Raw lexemes recognized by logos, before keyword classification.
///
/// Whitespace and `//` comments are skipped by logos; block comments are
/// consumed by a callback so that an unclosed one is reported.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = ScanError)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
enum Lexeme {
    /// Letters and underscores only; digits end the run.
    #[regex(r"[A-Za-z_]+")]
    Word,

    #[regex(r"[0-9]+", scan_number)]
    Number(TokenKind),

    #[token("\"", |lex| scan_escaped(lex, '"', TokenKind::DoubleQuoted))]
    DoubleQuoted,

    /// `'...'` or `'''...'''`; the callback decides which.
    #[token("'", scan_apostrophe)]
    Apostrophe(TokenKind),

    #[token("`", |lex| scan_until(lex, "`", TokenKind::FuncExpr))]
    Backtick,

    /// Never emitted: the callback skips the comment or fails.
    #[token("/*", scan_block_comment)]
    BlockComment,

    #[token(">")]
    Gt,
    #[token("-")]
    Minus,
    #[token("<")]
    Lt,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBrack,
    #[token("]")]
    RBrack,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Period,
    #[token(",")]
    Comma,
}

/// Extends an integer run with a `.digits` fraction when one follows.
fn scan_number(lex: &mut logos::Lexer<'_, Lexeme>) -> TokenKind {
    let rest = lex.remainder().as_bytes();
    if rest.len() >= 2 && rest[0] == b'.' && rest[1].is_ascii_digit() {
        let fraction = rest[1..].iter().take_while(|b| b.is_ascii_digit()).count();
        lex.bump(1 + fraction);
        TokenKind::Float
    } else {
        TokenKind::Int
    }
}

/// Consumes up to and including the next `quote` not preceded by a backslash.
fn scan_escaped(
    lex: &mut logos::Lexer<'_, Lexeme>,
    quote: char,
    kind: TokenKind,
) -> Result<(), ScanError> {
    let rest = lex.remainder();
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            lex.bump(i + c.len_utf8());
            return Ok(());
        }
    }
    lex.bump(rest.len());
    Err(ScanError::Unterminated(kind))
}

/// Consumes up to and including the next occurrence of `close`.
fn scan_until(
    lex: &mut logos::Lexer<'_, Lexeme>,
    close: &str,
    kind: TokenKind,
) -> Result<(), ScanError> {
    let rest = lex.remainder();
    match rest.find(close) {
        Some(i) => {
            lex.bump(i + close.len());
            Ok(())
        }
        None => {
            lex.bump(rest.len());
            Err(ScanError::Unterminated(kind))
        }
    }
}

fn scan_apostrophe(lex: &mut logos::Lexer<'_, Lexeme>) -> Result<TokenKind, ScanError> {
    if lex.remainder().starts_with("''") {
        lex.bump(2);
        scan_until(lex, "'''", TokenKind::Multiline)?;
        Ok(TokenKind::Multiline)
    } else {
        scan_escaped(lex, '\'', TokenKind::SingleQuoted)?;
        Ok(TokenKind::SingleQuoted)
    }
}

/// Skips a block comment through the first `*/`. Comments do not nest.
fn scan_block_comment(lex: &mut logos::Lexer<'_, Lexeme>) -> FilterResult<(), ScanError> {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(i) => {
            lex.bump(i + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(rest.len());
            FilterResult::Error(ScanError::UnterminatedComment)
        }
    }
}

impl Lexeme {
    fn kind(self, text: &str) -> TokenKind {
        match self {
            Self::Word => classify(text),
            Self::Number(kind) | Self::Apostrophe(kind) => kind,
            Self::DoubleQuoted => TokenKind::DoubleQuoted,
            Self::Backtick => TokenKind::FuncExpr,
            Self::BlockComment => TokenKind::Illegal,
            Self::Gt => TokenKind::ManyToOne,
            Self::Minus => TokenKind::OneToOne,
            Self::Lt => TokenKind::OneToMany,
            Self::LParen => TokenKind::LParen,
            Self::RParen => TokenKind::RParen,
            Self::LBrack => TokenKind::LBrack,
            Self::RBrack => TokenKind::RBrack,
            Self::LBrace => TokenKind::LBrace,
            Self::RBrace => TokenKind::RBrace,
            Self::Colon => TokenKind::Colon,
            Self::Semicolon => TokenKind::Semicolon,
            Self::Period => TokenKind::Period,
            Self::Comma => TokenKind::Comma,
        }
    }
}

/// Width of the opening (and closing) delimiter stripped from a literal's value.
fn delimiter_width(kind: TokenKind) -> usize {
    match kind {
        TokenKind::DoubleQuoted | TokenKind::SingleQuoted | TokenKind::FuncExpr => 1,
        TokenKind::Multiline => 3,
        _ => 0,
    }
}

/// Maps byte offsets to line/column positions.
///
/// Offsets must be queried in non-decreasing order; the tracker only moves
/// forward over the source, so a whole scan costs one pass.
#[derive(Debug)]
struct LineTracker {
    line: usize,
    /// Code points between the start of the current line and `offset`.
    column: usize,
    offset: usize,
}

impl LineTracker {
    fn new() -> Self {
        Self {
            line: 1,
            column: 0,
            offset: 0,
        }
    }

    fn position_at(&mut self, source: &str, offset: usize) -> Position {
        let offset = offset.min(source.len()).max(self.offset);
        for b in &source.as_bytes()[self.offset..offset] {
            if *b == b'\n' {
                self.line += 1;
                self.column = 0;
            } else if (*b & 0xC0) != 0x80 {
                // Every non-continuation byte starts a code point.
                self.column += 1;
            }
        }
        self.offset = offset;
        Position::new(self.line, self.column + 1)
    }
}

/// Incremental scanner over DBML source text.
///
/// Yields tokens in source order and finishes with exactly one `Eof` token.
/// After an error or the `Eof` token the iterator is exhausted.
pub struct Lexer<'s> {
    source: &'s str,
    inner: logos::Lexer<'s, Lexeme>,
    /// Byte offset of `inner`'s input within `source`.
    base: usize,
    tracker: LineTracker,
    finished: bool,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            inner: Lexeme::lexer(source),
            base: 0,
            tracker: LineTracker::new(),
            finished: false,
        }
    }

    /// Restarts scanning at `offset`, discarding whatever logos had consumed.
    fn restart_at(&mut self, offset: usize) {
        self.base = offset;
        self.inner = Lexeme::lexer(&self.source[offset..]);
    }

    /// Ends the scan at an error starting at `range`.
    fn stop_at(&mut self, range: std::ops::Range<usize>) -> (Position, Span) {
        self.finished = true;
        let position = self.tracker.position_at(self.source, range.start);
        (position, Span::from(range))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, DbmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let Some(result) = self.inner.next() else {
                self.finished = true;
                let end = self.source.len();
                let position = self.tracker.position_at(self.source, end);
                return Some(Ok(Token::eof(position, end)));
            };
            let local = self.inner.span();
            let range = self.base + local.start..self.base + local.end;

            match result {
                Ok(lexeme) => {
                    let text = &self.source[range.clone()];
                    let kind = lexeme.kind(text);
                    let width = delimiter_width(kind);
                    let value = &text[width..text.len() - width];
                    let position = self.tracker.position_at(self.source, range.start);
                    return Some(Ok(Token::new(kind, value, position, range.into())));
                }
                Err(ScanError::Unrecognized) => {
                    // Drop one character only; a failed partial match may
                    // have swallowed valid input after it.
                    let skipped = self.source[range.start..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                    tracing::trace!(offset = range.start, "skipping unrecognized character");
                    if range.len() > skipped {
                        self.restart_at(range.start + skipped);
                    }
                }
                Err(ScanError::Unterminated(kind)) => {
                    let (position, span) = self.stop_at(range);
                    return Some(Err(DbmlError::UnterminatedLiteral {
                        kind,
                        position,
                        span,
                    }));
                }
                Err(ScanError::UnterminatedComment) => {
                    let (position, span) = self.stop_at(range);
                    return Some(Err(DbmlError::UnterminatedComment { position, span }));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Tokenizes DBML source text into position-tagged tokens.
///
/// The result always ends with a single `Eof` token. Unrecognized characters
/// are skipped one at a time; comments produce no tokens.
///
/// # Errors
///
/// Returns `DbmlError::UnterminatedLiteral` when a quoted, backticked or
/// triple-quoted literal is not closed before the end of input, and
/// `DbmlError::UnterminatedComment` for a `/*` without a closing `*/`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, DbmlError> {
    let tokens = Lexer::new(source).collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(tokens = tokens.len(), bytes = source.len(), "tokenized source");
    Ok(tokens)
}
