use dbml_syntax::{DbmlError, TokenKind};
use miette::{Diagnostic, NamedSource, SourceSpan};

/// A diagnostic wrapping a `DbmlError` for rich miette rendering.
///
/// The module-level `#[allow(unused_assignments)]` in main.rs is required
/// because miette's derive macro generates assignment patterns that rustc
/// flags as unused.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct DbmlDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("{label}")]
    span: SourceSpan,

    message: String,
    label: String,

    #[help]
    suggestion: Option<String>,
}

/// Convert a `DbmlError` into a `DbmlDiagnostic` with a label and,
/// where one is obvious, a suggested fix.
pub fn dbml_error_to_diagnostic(error: &DbmlError, source: &str, filename: &str) -> DbmlDiagnostic {
    let named_src = NamedSource::new(filename, source.to_string());
    let span = error.span();
    let source_span: SourceSpan = (span.start, span.len()).into();

    match error {
        DbmlError::UnterminatedLiteral { kind, .. } => DbmlDiagnostic {
            src: named_src,
            span: source_span,
            message: error.to_string(),
            label: format!("{} opened here", kind.description()),
            suggestion: Some(format!(
                "Add the closing {} before the end of the file.",
                closing_delimiter(*kind)
            )),
        },

        DbmlError::UnterminatedComment { .. } => DbmlDiagnostic {
            src: named_src,
            span: source_span,
            message: error.to_string(),
            label: "block comment opened here".to_string(),
            suggestion: Some("Close the comment with `*/`; block comments do not nest.".to_string()),
        },

        DbmlError::SyntaxError {
            expected, found, ..
        } => DbmlDiagnostic {
            src: named_src,
            span: source_span,
            message: error.to_string(),
            label: format!("expected {expected}"),
            suggestion: syntax_suggestion(expected, found),
        },

        _ => DbmlDiagnostic {
            src: named_src,
            span: source_span,
            message: error.to_string(),
            label: "here".to_string(),
            suggestion: None,
        },
    }
}

/// Render an error as a miette report ready for `{:?}` printing.
pub fn render_diagnostic(error: &DbmlError, source: &str, filename: &str) -> miette::Report {
    miette::Report::new(dbml_error_to_diagnostic(error, source, filename))
}

fn closing_delimiter(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::DoubleQuoted => "`\"`",
        TokenKind::SingleQuoted => "`'`",
        TokenKind::FuncExpr => "backtick",
        TokenKind::Multiline => "`'''`",
        _ => "delimiter",
    }
}

fn syntax_suggestion(expected: &str, found: &str) -> Option<String> {
    if found.starts_with("'Ref'") {
        return Some("Ref declarations are reserved but not supported yet.".to_string());
    }
    if found.starts_with("'Note'") {
        return Some("Note settings are not supported yet; remove the Note line.".to_string());
    }
    if found == "end of input" {
        return Some("The file ended inside a declaration; close it with '}'.".to_string());
    }
    match expected {
        "database type string" => {
            Some("Quote the database type, e.g. database_type: \"PostgreSQL\"".to_string())
        }
        "column type" => Some("Each column needs a name and a type, e.g. id integer".to_string()),
        "one of Project, Table, Ref, or Enum" => {
            Some("Top-level declarations start with Project, Table or Enum.".to_string())
        }
        _ => None,
    }
}
