use dbml_core::Column;
use dbml_syntax::{parse, DbmlError, Declaration, HasPosition, Node, Position, TokenKind};

/// A small storefront schema exercising every supported declaration.
const SHOP_SCHEMA: &str = r#"
// Storefront schema
/* Tables, enums and the project header */

Project storefront {
    database_type: "PostgreSQL"
}

Table users as U {
    id integer
    email varchar
    created_at timestamp
}

Table orders {
    id integer
    user_id integer
    status order_status
}

Table audit_log { }

Enum order_status {
    created
    shipped
    "partially refunded"
    created
}
"#;

#[test]
fn parse_full_shop_schema() {
    let ast = parse(SHOP_SCHEMA).expect("shop schema should parse successfully");
    assert_eq!(ast.len(), 5, "expected Project, 3 tables and 1 enum");

    // --- Project ---
    let project = ast.project().expect("project declared");
    assert_eq!(project.name, "storefront");
    assert_eq!(project.db_type, "PostgreSQL");
    assert_eq!(project.note, "");
    assert_eq!(project.tables.len(), 3);
    assert_eq!(project.table("U").map(|t| t.name.as_str()), Some("users"));

    // --- Tables ---
    let tables = ast.tables();
    let users = &tables[0];
    assert_eq!(users.name, "users");
    assert_eq!(users.alias, "U");
    assert_eq!(users.column_names(), vec!["id", "email", "created_at"]);

    let orders = &tables[1];
    assert_eq!(orders.alias, "");
    assert_eq!(
        orders.column("status"),
        Some(&Column::new("status", "order_status"))
    );

    let audit = &tables[2];
    assert!(audit.columns.is_empty());

    // --- Enums ---
    let enums = ast.enums();
    assert_eq!(enums.len(), 1);
    assert_eq!(
        enums[0].values,
        vec!["created", "shipped", "\"partially refunded\"", "created"]
    );
}

#[test]
fn declaration_positions_point_at_keywords() {
    let ast = parse(SHOP_SCHEMA).unwrap();
    let positions: Vec<_> = ast.declarations().iter().map(|d| d.position()).collect();
    assert_eq!(
        positions,
        vec![
            Position::new(5, 1),
            Position::new(9, 1),
            Position::new(15, 1),
            Position::new(21, 1),
            Position::new(23, 1),
        ]
    );
}

#[test]
fn nodes_include_columns() {
    let ast = parse(SHOP_SCHEMA).unwrap();
    let columns = ast
        .nodes()
        .into_iter()
        .filter(|n| matches!(n, Node::Column(_)))
        .count();
    assert_eq!(columns, 6);
}

#[test]
fn multiple_projects_resolve_to_first() {
    let ast = parse(
        r#"Project first { database_type: "MySQL" }
           Project second { database_type: "SQLite" }"#,
    )
    .unwrap();
    assert_eq!(ast.len(), 2);
    assert_eq!(ast.project().unwrap().name, "first");
}

#[test]
fn no_project_declaration() {
    let ast = parse("Table t { id integer }").unwrap();
    assert!(ast.project().is_none());
    assert_eq!(ast.tables().len(), 1);
}

#[test]
fn tables_and_enums_accessors_preserve_order() {
    let ast = parse("Enum b { x } Table z { } Enum a { y } Table y { }").unwrap();
    let tables: Vec<_> = ast.tables().into_iter().map(|t| t.name).collect();
    let enums: Vec<_> = ast.enums().into_iter().map(|e| e.name).collect();
    assert_eq!(tables, vec!["z", "y"]);
    assert_eq!(enums, vec!["b", "a"]);
}

#[test]
fn syntax_error_reports_line_column_and_lexeme() {
    let err = parse("Table users {\n    id integer\n    name\n}").unwrap_err();
    match &err {
        DbmlError::SyntaxError {
            expected,
            found,
            position,
            ..
        } => {
            assert_eq!(expected, "column type");
            assert_eq!(found, "'}' ('}')");
            assert_eq!(*position, Position::new(4, 1));
        }
        other => panic!("expected SyntaxError, got {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("4:1"));
    assert!(msg.contains("column type"));
}

#[test]
fn first_error_wins() {
    // Both tables are malformed; only the first is reported.
    let err = parse("Table a { x }\nTable b { y }").unwrap_err();
    assert_eq!(err.position(), Position::new(1, 13));
}

#[test]
fn unterminated_string_is_an_error_not_a_panic() {
    let err = parse("Enum e { 'abc }").unwrap_err();
    assert!(matches!(
        err,
        DbmlError::UnterminatedLiteral {
            kind: TokenKind::SingleQuoted,
            position: Position { line: 1, column: 10 },
            ..
        }
    ));
}

#[test]
fn declaration_variants_match_keywords() {
    let ast = parse("Project p { } Table t { } Enum e { }").unwrap();
    for decl in ast.declarations() {
        let expected = match decl {
            Declaration::Project(_) => "Project",
            Declaration::Table(_) => "Table",
            Declaration::Enum(_) => "Enum",
        };
        assert_eq!(decl.keyword(), expected);
    }
}
