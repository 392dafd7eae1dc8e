use std::fmt;

use crate::error::{Position, Span};

/// Every token category the lexer can produce.
///
/// Kinds fall into four disjoint bands (literals, relations, delimiters,
/// keywords) plus the `Illegal` and `Eof` sentinels, which belong to none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,

    // -- Literals --
    /// Table, column, enum names and anything else identifier-shaped.
    Ident,
    /// `123`
    Int,
    /// `123.45`
    Float,
    /// `"abc"`
    DoubleQuoted,
    /// `'abc'`
    SingleQuoted,
    /// `` `now()` ``
    FuncExpr,
    /// `'''abc'''`
    Multiline,

    // -- Relations --
    /// `>`
    ManyToOne,
    /// `-`
    OneToOne,
    /// `<`
    OneToMany,

    // -- Delimiters --
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Colon,
    Semicolon,
    Period,
    Comma,

    // -- Keywords --
    Project,
    DatabaseType,
    Table,
    As,
    Indexes,
    Ref,
    Enum,
    Note,
}

impl TokenKind {
    /// All keyword kinds, in declaration order.
    pub const KEYWORDS: [TokenKind; 8] = [
        Self::Project,
        Self::DatabaseType,
        Self::Table,
        Self::As,
        Self::Indexes,
        Self::Ref,
        Self::Enum,
        Self::Note,
    ];

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::Int
                | Self::Float
                | Self::DoubleQuoted
                | Self::SingleQuoted
                | Self::FuncExpr
                | Self::Multiline
        )
    }

    pub fn is_relation(self) -> bool {
        matches!(self, Self::ManyToOne | Self::OneToOne | Self::OneToMany)
    }

    pub fn is_delimiter(self) -> bool {
        matches!(
            self,
            Self::LParen
                | Self::RParen
                | Self::LBrack
                | Self::RBrack
                | Self::LBrace
                | Self::RBrace
                | Self::Colon
                | Self::Semicolon
                | Self::Period
                | Self::Comma
        )
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::Project
                | Self::DatabaseType
                | Self::Table
                | Self::As
                | Self::Indexes
                | Self::Ref
                | Self::Enum
                | Self::Note
        )
    }

    /// The canonical spelling: the symbol or keyword itself, or an
    /// upper-case class name for literals and sentinels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Illegal => "ILLEGAL",
            Self::Eof => "EOF",
            Self::Ident => "IDENT",
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::DoubleQuoted => "QUOTE",
            Self::SingleQuoted => "STRING",
            Self::FuncExpr => "FUNCEXPR",
            Self::Multiline => "MULTILINE",
            Self::ManyToOne => ">",
            Self::OneToOne => "-",
            Self::OneToMany => "<",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrack => "[",
            Self::RBrack => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Period => ".",
            Self::Comma => ",",
            Self::Project => "Project",
            Self::DatabaseType => "database_type",
            Self::Table => "Table",
            Self::As => "as",
            Self::Indexes => "Indexes",
            Self::Ref => "Ref",
            Self::Enum => "Enum",
            Self::Note => "Note",
        }
    }

    /// Returns a human-readable description of this token kind.
    pub fn description(self) -> &'static str {
        match self {
            Self::Illegal => "illegal token",
            Self::Eof => "end of input",
            Self::Ident => "identifier",
            Self::Int => "integer literal",
            Self::Float => "float literal",
            Self::DoubleQuoted => "double-quoted string",
            Self::SingleQuoted => "single-quoted string",
            Self::FuncExpr => "function expression",
            Self::Multiline => "multiline string",
            Self::ManyToOne => "'>'",
            Self::OneToOne => "'-'",
            Self::OneToMany => "'<'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBrack => "'['",
            Self::RBrack => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Colon => "':'",
            Self::Semicolon => "';'",
            Self::Period => "'.'",
            Self::Comma => "','",
            Self::Project => "'Project'",
            Self::DatabaseType => "'database_type'",
            Self::Table => "'Table'",
            Self::As => "'as'",
            Self::Indexes => "'Indexes'",
            Self::Ref => "'Ref'",
            Self::Enum => "'Enum'",
            Self::Note => "'Note'",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves an identifier-shaped lexeme to its keyword kind, or `Ident`.
///
/// Matching is exact and case-sensitive. The lexer calls this only after it
/// has consumed a maximal identifier run, so `Table` and `Tablex` take the
/// same scanning path and only diverge here.
pub fn classify(lexeme: &str) -> TokenKind {
    match lexeme {
        "Project" => TokenKind::Project,
        "database_type" => TokenKind::DatabaseType,
        "Table" => TokenKind::Table,
        "as" => TokenKind::As,
        "Indexes" => TokenKind::Indexes,
        "Ref" => TokenKind::Ref,
        "Enum" => TokenKind::Enum,
        "Note" => TokenKind::Note,
        _ => TokenKind::Ident,
    }
}

/// Whether `lexeme` is one of the reserved keyword spellings.
pub fn is_keyword_str(lexeme: &str) -> bool {
    classify(lexeme).is_keyword()
}

/// A classified, position-tagged lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The raw lexeme. Quoted, backticked and triple-quoted literals hold
    /// their inner text without delimiters and without unescaping.
    pub value: String,
    /// Where the lexeme (including any opening delimiter) begins.
    pub position: Position,
    /// Byte range of the full lexeme, delimiters included.
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, position: Position, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
            span,
        }
    }

    /// The end-of-input sentinel at the given position and byte offset.
    pub fn eof(position: Position, offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", position, Span::new(offset, offset))
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Describes the token for error messages, e.g. `identifier ('users')`.
    pub fn describe(&self) -> String {
        if self.is_eof() {
            self.kind.description().to_string()
        } else {
            format!("{} ('{}')", self.kind.description(), self.value)
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>13}  {:>4}:{:<4} {}",
            self.kind.as_str(),
            self.position.line,
            self.position.column,
            self.value
        )
    }
}
