use crate::ast::{Ast, Declaration, EnumDecl, ProjectDecl, TableDecl};

/// Print a whole document to canonical DBML text.
///
/// Declarations are separated by blank lines and bodies use 4-space
/// indentation. Parsing the output yields the same declarations.
pub fn print(ast: &Ast) -> String {
    let mut output = String::new();
    for (i, decl) in ast.declarations().iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        print_into(decl, &mut output);
    }
    output
}

/// Print a single declaration.
pub fn print_declaration(decl: &Declaration) -> String {
    let mut output = String::new();
    print_into(decl, &mut output);
    output
}

fn print_into(decl: &Declaration, output: &mut String) {
    match decl {
        Declaration::Project(project) => print_project(project, output),
        Declaration::Table(table) => print_table(table, output),
        Declaration::Enum(e) => print_enum(e, output),
    }
}

fn print_project(project: &ProjectDecl, output: &mut String) {
    output.push_str("Project ");
    output.push_str(project.name());
    output.push_str(" {\n");
    if let Some(db_type) = project.db_type() {
        output.push_str("    database_type: ");
        output.push_str(&quote_string(db_type));
        output.push('\n');
    }
    output.push_str("}\n");
}

fn print_table(table: &TableDecl, output: &mut String) {
    output.push_str("Table ");
    output.push_str(table.name());
    if let Some(alias) = table.alias() {
        output.push_str(" as ");
        output.push_str(alias);
    }
    output.push_str(" {\n");
    for column in table.columns() {
        output.push_str("    ");
        output.push_str(column.name());
        output.push(' ');
        output.push_str(column.column_type());
        output.push('\n');
    }
    output.push_str("}\n");
}

fn print_enum(e: &EnumDecl, output: &mut String) {
    output.push_str("Enum ");
    output.push_str(e.name());
    output.push_str(" {\n");
    // Quoted values already carry their quote marks.
    for value in e.values() {
        output.push_str("    ");
        output.push_str(value);
        output.push('\n');
    }
    output.push_str("}\n");
}

/// Wraps a raw (still escaped) string value in quotes.
///
/// Double quotes are preferred; a value containing an unescaped `"` (only
/// possible when it was written single-quoted) keeps single quotes.
fn quote_string(raw: &str) -> String {
    if has_unescaped(raw, '"') {
        format!("'{raw}'")
    } else {
        format!("\"{raw}\"")
    }
}

fn has_unescaped(raw: &str, quote: char) -> bool {
    let mut escaped = false;
    for c in raw.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return true;
        }
    }
    false
}
