//! # dbml-syntax
//!
//! Lexer, parser and printer for DBML schema documents.
//!
//! This crate provides:
//! - A token model with keyword classification and band predicates
//! - A lexer producing position-tagged tokens terminated by an end-of-input token
//! - A predictive recursive descent parser producing an [`Ast`]
//! - Read-only accessors that resolve the AST into `dbml-core` domain objects
//! - A printer that renders an AST back to canonical DBML text
//!
//! Parsing is fail-fast: the first lexical or syntax error aborts with a
//! [`DbmlError`] carrying the line, column and offending lexeme.
//!
//! # Example
//!
//! ```
//! use dbml_syntax::parse;
//!
//! let source = r#"
//! Project shop { database_type: "PostgreSQL" }
//!
//! Table users as u {
//!     id integer
//!     name string
//! }
//!
//! Enum status { active inactive "on hold" }
//! "#;
//!
//! let ast = parse(source).expect("parse failed");
//! assert_eq!(ast.len(), 3);
//!
//! let project = ast.project().expect("project declared");
//! assert_eq!(project.db_type, "PostgreSQL");
//!
//! let tables = ast.tables();
//! assert_eq!(tables[0].alias, "u");
//! assert_eq!(tables[0].columns.len(), 2);
//!
//! assert_eq!(ast.enums()[0].values, ["active", "inactive", "\"on hold\""]);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;

pub use ast::{Ast, ColumnDecl, Declaration, EnumDecl, HasPosition, Node, ProjectDecl, TableDecl};
pub use error::{DbmlError, Position, Span};
pub use lexer::{tokenize, Lexer};
pub use parser::{parse, parse_tokens};
pub use printer::{print, print_declaration};
pub use token::{classify, Token, TokenKind};
