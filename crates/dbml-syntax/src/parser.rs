use std::borrow::Cow;

use crate::ast::{Ast, ColumnDecl, Declaration, EnumDecl, ProjectDecl, TableDecl};
use crate::error::{DbmlError, Position};
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};

/// Read position over a token slice that is guaranteed to end with `Eof`.
///
/// The cursor never moves past the final `Eof`, so `peek` is always valid.
struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        debug_assert!(tokens.last().is_some_and(Token::is_eof));
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &'t Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> &'t Token {
        let tok = self.peek();
        if !tok.is_eof() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes the current token if it has the given kind.
    fn eat(&mut self, kind: TokenKind) -> Option<&'t Token> {
        if self.peek_kind() == kind {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consumes a token of `kind` or fails with `expected` in the message.
    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<&'t Token, DbmlError> {
        self.eat(kind).ok_or_else(|| self.unexpected(expected))
    }

    /// A syntax error pointing at the current token.
    fn unexpected(&self, expected: &str) -> DbmlError {
        let found = self.peek();
        DbmlError::SyntaxError {
            expected: expected.to_string(),
            found: found.describe(),
            position: found.position,
            span: found.span,
        }
    }
}

/// Predictive recursive descent parser for the DBML grammar.
///
/// One token of lookahead selects each production; there is no
/// backtracking and no recovery after an error.
struct Parser<'t> {
    cursor: Cursor<'t>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            cursor: Cursor::new(tokens),
        }
    }

    // -- Grammar productions --

    /// document = (project | table | enum)* EOF
    fn parse_document(&mut self) -> Result<Ast, DbmlError> {
        let mut declarations = Vec::new();

        loop {
            let decl = match self.cursor.peek_kind() {
                TokenKind::Project => Declaration::Project(self.parse_project()?),
                TokenKind::Table => Declaration::Table(self.parse_table()?),
                TokenKind::Enum => Declaration::Enum(self.parse_enum()?),
                TokenKind::Eof => break,
                _ => {
                    return Err(self
                        .cursor
                        .unexpected("one of Project, Table, Ref, or Enum"))
                }
            };
            tracing::trace!(
                keyword = decl.keyword(),
                name = decl.name(),
                "parsed declaration"
            );
            declarations.push(decl);
        }

        tracing::debug!(declarations = declarations.len(), "parsed document");
        Ok(Ast::new(declarations))
    }

    /// project = "Project" IDENT "{" ("database_type" ":" STRING)* "}"
    fn parse_project(&mut self) -> Result<ProjectDecl, DbmlError> {
        let keyword = self.cursor.expect(TokenKind::Project, "'Project'")?;
        let name = self.cursor.expect(TokenKind::Ident, "project name")?;
        self.cursor.expect(TokenKind::LBrace, "'{'")?;

        let mut db_type = None;
        loop {
            match self.cursor.peek_kind() {
                TokenKind::RBrace => {
                    self.cursor.advance();
                    break;
                }
                TokenKind::DatabaseType => {
                    self.cursor.advance();
                    self.cursor.expect(TokenKind::Colon, "':'")?;
                    db_type = Some(self.expect_string("database type string")?.value.clone());
                }
                _ => return Err(self.cursor.unexpected("'database_type' or '}'")),
            }
        }

        Ok(ProjectDecl::new(name.value.clone(), db_type, keyword.position))
    }

    /// table = "Table" IDENT ("as" IDENT)? "{" column* "}"
    fn parse_table(&mut self) -> Result<TableDecl, DbmlError> {
        let keyword = self.cursor.expect(TokenKind::Table, "'Table'")?;
        let name = self.cursor.expect(TokenKind::Ident, "table name")?;

        let alias = match self.cursor.eat(TokenKind::As) {
            Some(_) => Some(self.cursor.expect(TokenKind::Ident, "table alias")?.value.clone()),
            None => None,
        };

        self.cursor.expect(TokenKind::LBrace, "'{'")?;

        let mut columns = Vec::new();
        while self.cursor.eat(TokenKind::RBrace).is_none() {
            columns.push(self.parse_column()?);
        }

        Ok(TableDecl::new(
            name.value.clone(),
            alias,
            columns,
            keyword.position,
        ))
    }

    /// column = IDENT IDENT
    fn parse_column(&mut self) -> Result<ColumnDecl, DbmlError> {
        let name = self
            .cursor
            .expect(TokenKind::Ident, "column name or '}'")?;
        let column_type = self.cursor.expect(TokenKind::Ident, "column type")?;
        Ok(ColumnDecl::new(
            name.value.clone(),
            column_type.value.clone(),
            name.position,
        ))
    }

    /// enum = "Enum" IDENT "{" (IDENT | QUOTE)* "}"
    fn parse_enum(&mut self) -> Result<EnumDecl, DbmlError> {
        let keyword = self.cursor.expect(TokenKind::Enum, "'Enum'")?;
        let name = self.cursor.expect(TokenKind::Ident, "enum name")?;
        self.cursor.expect(TokenKind::LBrace, "'{'")?;

        let mut values = Vec::new();
        loop {
            match self.cursor.peek_kind() {
                TokenKind::RBrace => {
                    self.cursor.advance();
                    break;
                }
                TokenKind::Ident => values.push(self.cursor.advance().value.clone()),
                // Quote marks are reinstated so quoted values stay distinguishable.
                TokenKind::DoubleQuoted => {
                    values.push(format!("\"{}\"", self.cursor.advance().value));
                }
                _ => {
                    return Err(self
                        .cursor
                        .unexpected("enum value (identifier or double-quoted string) or '}'"))
                }
            }
        }

        Ok(EnumDecl::new(name.value.clone(), values, keyword.position))
    }

    // -- Token expectation helpers --

    /// Accepts a double-quoted or single-quoted string.
    fn expect_string(&mut self, context: &str) -> Result<&'t Token, DbmlError> {
        match self.cursor.peek_kind() {
            TokenKind::DoubleQuoted | TokenKind::SingleQuoted => Ok(self.cursor.advance()),
            _ => Err(self.cursor.unexpected(context)),
        }
    }
}

/// Ensures the slice ends with an `Eof` token, appending one after the last
/// token when it does not.
fn with_eof(tokens: &[Token]) -> Cow<'_, [Token]> {
    if tokens.last().is_some_and(Token::is_eof) {
        return Cow::Borrowed(tokens);
    }
    let mut owned = tokens.to_vec();
    let (position, offset) = match tokens.last() {
        Some(last) => (position_after(last), last.span.end),
        None => (Position::START, 0),
    };
    owned.push(Token::eof(position, offset));
    Cow::Owned(owned)
}

/// The position just past `token`, in code points.
///
/// Delimiters are ASCII, so their width is the byte difference between the
/// span and the value; half of it sits after the value.
fn position_after(token: &Token) -> Position {
    let delimiters = token.span.len().saturating_sub(token.value.len());
    match token.value.rfind('\n') {
        Some(i) => Position::new(
            token.position.line + token.value.matches('\n').count(),
            token.value[i + 1..].chars().count() + delimiters / 2 + 1,
        ),
        None => Position::new(
            token.position.line,
            token.position.column + token.value.chars().count() + delimiters,
        ),
    }
}

/// Parse a token sequence into an [`Ast`].
///
/// The sequence is normally the output of [`tokenize`]. A sequence that does
/// not end with `Eof` is treated as ending after its last token.
///
/// # Errors
///
/// Returns `DbmlError::SyntaxError` for the first token that does not fit
/// the grammar. No partial AST is returned.
pub fn parse_tokens(tokens: &[Token]) -> Result<Ast, DbmlError> {
    let tokens = with_eof(tokens);
    Parser::new(&tokens).parse_document()
}

/// Parse DBML source text into an [`Ast`].
///
/// # Errors
///
/// Returns the first lexical (`UnterminatedLiteral`, `UnterminatedComment`)
/// or syntax (`SyntaxError`) error encountered.
pub fn parse(source: &str) -> Result<Ast, DbmlError> {
    let tokens = tokenize(source)?;
    parse_tokens(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::HasPosition;
    use crate::error::Span;
    use dbml_core::Column;

    fn syntax_error(source: &str) -> (String, String, Position) {
        match parse(source) {
            Err(DbmlError::SyntaxError {
                expected,
                found,
                position,
                ..
            }) => (expected, found, position),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    // -- Top level --

    #[test]
    fn parse_empty_document() {
        let ast = parse("").unwrap();
        assert!(ast.is_empty());
    }

    #[test]
    fn parse_comments_only() {
        let ast = parse("// nothing here\n/* at all */").unwrap();
        assert!(ast.is_empty());
    }

    #[test]
    fn parse_declarations_in_source_order() {
        let ast = parse(
            "Enum a { x }
             Table b { }
             Project c { }
             Table d { }",
        )
        .unwrap();
        let keywords: Vec<_> = ast.declarations().iter().map(Declaration::keyword).collect();
        assert_eq!(keywords, vec!["Enum", "Table", "Project", "Table"]);
        let names: Vec<_> = ast.declarations().iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn error_unknown_top_level_token() {
        let (expected, found, position) = syntax_error("users { }");
        assert_eq!(expected, "one of Project, Table, Ref, or Enum");
        assert_eq!(found, "identifier ('users')");
        assert_eq!(position, Position::new(1, 1));
    }

    #[test]
    fn error_ref_is_reserved_but_not_parsed() {
        let (expected, found, _) = syntax_error("Ref: a.id > b.id");
        assert!(expected.contains("Ref"));
        assert_eq!(found, "'Ref' ('Ref')");
    }

    // -- Project --

    #[test]
    fn parse_project_with_database_type() {
        let ast = parse(r#"Project p { database_type: "PostgreSQL" }"#).unwrap();
        let project = ast.project().unwrap();
        assert_eq!(project.name, "p");
        assert_eq!(project.db_type, "PostgreSQL");
    }

    #[test]
    fn parse_project_single_quoted_database_type() {
        let ast = parse("Project p { database_type: 'MySQL' }").unwrap();
        assert_eq!(ast.project().unwrap().db_type, "MySQL");
    }

    #[test]
    fn parse_project_empty_body() {
        let ast = parse("Project p { }").unwrap();
        let project = ast.project().unwrap();
        assert_eq!(project.db_type, "");
    }

    #[test]
    fn parse_project_last_database_type_wins() {
        let ast = parse(r#"Project p { database_type: "a" database_type: "b" }"#).unwrap();
        assert_eq!(ast.project().unwrap().db_type, "b");
    }

    #[test]
    fn error_project_note_not_supported() {
        let (expected, found, _) = syntax_error("Project p { Note: 'x' }");
        assert_eq!(expected, "'database_type' or '}'");
        assert!(found.contains("Note"));
    }

    #[test]
    fn error_project_unquoted_database_type() {
        let (expected, found, position) = syntax_error("Project p {\n  database_type: PostgreSQL\n}");
        assert_eq!(expected, "database type string");
        assert_eq!(found, "identifier ('PostgreSQL')");
        assert_eq!(position, Position::new(2, 18));
    }

    #[test]
    fn error_project_missing_colon() {
        let (expected, _, _) = syntax_error(r#"Project p { database_type "x" }"#);
        assert_eq!(expected, "':'");
    }

    #[test]
    fn error_project_missing_name() {
        let (expected, found, _) = syntax_error("Project { }");
        assert_eq!(expected, "project name");
        assert_eq!(found, "'{' ('{')");
    }

    #[test]
    fn error_project_unclosed_body() {
        let (_, found, _) = syntax_error("Project p {");
        assert_eq!(found, "end of input");
    }

    // -- Table --

    #[test]
    fn parse_table_columns_in_order() {
        let ast = parse("Table users { id integer name string }").unwrap();
        let tables = ast.tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "users");
        assert_eq!(tables[0].alias, "");
        assert_eq!(
            tables[0].columns,
            vec![Column::new("id", "integer"), Column::new("name", "string")]
        );
    }

    #[test]
    fn parse_table_alias() {
        let ast = parse("Table users as u { id integer }").unwrap();
        assert_eq!(ast.tables()[0].alias, "u");
        match &ast.declarations()[0] {
            Declaration::Table(t) => assert_eq!(t.alias(), Some("u")),
            other => panic!("expected Table, got {other:?}"),
        }
    }

    #[test]
    fn parse_table_without_alias_leaves_it_unset() {
        let ast = parse("Table users { }").unwrap();
        match &ast.declarations()[0] {
            Declaration::Table(t) => assert_eq!(t.alias(), None),
            other => panic!("expected Table, got {other:?}"),
        }
    }

    #[test]
    fn parse_empty_table() {
        let ast = parse("Table t { }").unwrap();
        let tables = ast.tables();
        assert_eq!(tables[0].name, "t");
        assert!(tables[0].columns.is_empty());
    }

    #[test]
    fn parse_column_positions() {
        let ast = parse("Table t {\n  id integer\n  name string\n}").unwrap();
        match &ast.declarations()[0] {
            Declaration::Table(t) => {
                assert_eq!(t.position(), Position::new(1, 1));
                assert_eq!(t.columns()[0].position(), Position::new(2, 3));
                assert_eq!(t.columns()[1].position(), Position::new(3, 3));
            }
            other => panic!("expected Table, got {other:?}"),
        }
    }

    #[test]
    fn error_table_missing_alias() {
        let (expected, found, _) = syntax_error("Table users as { }");
        assert_eq!(expected, "table alias");
        assert_eq!(found, "'{' ('{')");
    }

    #[test]
    fn error_table_column_missing_type() {
        let (expected, found, _) = syntax_error("Table t { id }");
        assert_eq!(expected, "column type");
        assert_eq!(found, "'}' ('}')");
    }

    #[test]
    fn error_table_column_with_settings() {
        let (expected, _, position) = syntax_error("Table t { id integer [pk] }");
        assert_eq!(expected, "column name or '}'");
        assert_eq!(position, Position::new(1, 22));
    }

    #[test]
    fn error_table_keyword_as_column_name() {
        let (_, found, _) = syntax_error("Table t { Note string }");
        assert_eq!(found, "'Note' ('Note')");
    }

    // -- Enum --

    #[test]
    fn parse_enum_mixed_values() {
        let ast = parse(r#"Enum status { active inactive "on hold" }"#).unwrap();
        let enums = ast.enums();
        assert_eq!(enums[0].name, "status");
        assert_eq!(enums[0].values, vec!["active", "inactive", "\"on hold\""]);
    }

    #[test]
    fn parse_enum_keeps_duplicates() {
        let ast = parse("Enum e { a b a }").unwrap();
        assert_eq!(ast.enums()[0].values, vec!["a", "b", "a"]);
    }

    #[test]
    fn parse_empty_enum() {
        let ast = parse("Enum e {}").unwrap();
        assert!(ast.enums()[0].values.is_empty());
    }

    #[test]
    fn error_enum_single_quoted_value() {
        let (expected, found, _) = syntax_error("Enum e { 'x' }");
        assert!(expected.starts_with("enum value"));
        assert_eq!(found, "single-quoted string ('x')");
    }

    #[test]
    fn error_enum_unterminated_value() {
        let err = parse("Enum e { 'abc }").unwrap_err();
        assert!(matches!(
            err,
            DbmlError::UnterminatedLiteral {
                kind: TokenKind::SingleQuoted,
                ..
            }
        ));
    }

    // -- Token-level entry point --

    #[test]
    fn parse_tokens_is_idempotent() {
        let tokens = tokenize("Project p { } Table t { a b } Enum e { x }").unwrap();
        let first = parse_tokens(&tokens).unwrap();
        let second = parse_tokens(&tokens).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn parse_tokens_without_eof() {
        let mut tokens = tokenize("Table t { }").unwrap();
        tokens.pop();
        let ast = parse_tokens(&tokens).unwrap();
        assert_eq!(ast.len(), 1);
    }

    #[test]
    fn parse_tokens_truncated_reports_end_of_input() {
        let mut tokens = tokenize("Table t {").unwrap();
        tokens.pop();
        match parse_tokens(&tokens) {
            Err(DbmlError::SyntaxError {
                found, position, ..
            }) => {
                assert_eq!(found, "end of input");
                assert_eq!(position, Position::new(1, 10));
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn parse_tokens_truncated_after_multibyte_string() {
        let mut tokens = tokenize("Project p { database_type: 'héllo'").unwrap();
        tokens.pop();
        match parse_tokens(&tokens) {
            Err(DbmlError::SyntaxError { position, span, .. }) => {
                assert_eq!(position, Position::new(1, 35));
                assert_eq!(span, Span::new(35, 35));
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn position_after_multiline_token() {
        let token = Token::new(
            TokenKind::Multiline,
            "a\nbc",
            Position::new(1, 1),
            Span::new(0, 10),
        );
        assert_eq!(position_after(&token), Position::new(2, 6));
    }

    #[test]
    fn comments_do_not_hide_declarations() {
        assert_eq!(parse("/* header **/\nTable t { }").unwrap().len(), 1);
        let ast = parse("Table a { } /* x **/ Table b { }").unwrap();
        let names: Vec<_> = ast.declarations().iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn unclosed_comment_fails_parse() {
        let err = parse("/* open\nTable t { }").unwrap_err();
        assert!(matches!(err, DbmlError::UnterminatedComment { .. }));
        assert_eq!(err.position(), Position::START);
    }

    #[test]
    fn parse_tokens_empty_slice() {
        assert!(parse_tokens(&[]).unwrap().is_empty());
    }
}
