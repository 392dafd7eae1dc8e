//! Declaration nodes produced by the parser.
//!
//! Nodes are built once, in a single top-to-bottom pass, and have no
//! mutation API. Consumers read them through the accessors on [`Ast`], which
//! either borrow the nodes or resolve them into `dbml-core` domain objects.

use dbml_core::{Column, Enum, Project, Table};

use crate::error::Position;

/// Capability shared by every declaration node.
pub trait HasPosition {
    /// Position of the keyword or identifier that introduced the node.
    fn position(&self) -> Position;
}

/// `Project <name> { database_type: "<db>" }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDecl {
    name: String,
    db_type: Option<String>,
    position: Position,
}

impl ProjectDecl {
    pub(crate) fn new(name: String, db_type: Option<String>, position: Position) -> Self {
        Self {
            name,
            db_type,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `database_type` value, without quotes. The last assignment wins.
    pub fn db_type(&self) -> Option<&str> {
        self.db_type.as_deref()
    }

    /// Resolves this declaration; `tables` is left empty.
    pub fn resolve(&self) -> Project {
        Project {
            name: self.name.clone(),
            db_type: self.db_type.clone().unwrap_or_default(),
            note: String::new(),
            tables: Vec::new(),
        }
    }
}

/// `Table <name> [as <alias>] { <column>* }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDecl {
    name: String,
    alias: Option<String>,
    columns: Vec<ColumnDecl>,
    position: Position,
}

impl TableDecl {
    pub(crate) fn new(
        name: String,
        alias: Option<String>,
        columns: Vec<ColumnDecl>,
        position: Position,
    ) -> Self {
        Self {
            name,
            alias,
            columns,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Columns in source order. Empty when the body is `{}`.
    pub fn columns(&self) -> &[ColumnDecl] {
        &self.columns
    }

    pub fn resolve(&self) -> Table {
        Table {
            name: self.name.clone(),
            alias: self.alias.clone().unwrap_or_default(),
            note: String::new(),
            columns: self.columns.iter().map(ColumnDecl::resolve).collect(),
        }
    }
}

/// `<name> <type>` inside a table body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDecl {
    name: String,
    column_type: String,
    position: Position,
}

impl ColumnDecl {
    pub(crate) fn new(name: String, column_type: String, position: Position) -> Self {
        Self {
            name,
            column_type,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &str {
        &self.column_type
    }

    pub fn resolve(&self) -> Column {
        Column::new(self.name.clone(), self.column_type.clone())
    }
}

/// `Enum <name> { <value>* }`
///
/// Values written as double-quoted strings are stored with their quote
/// marks, e.g. `"on hold"`; bare identifiers are stored as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    name: String,
    values: Vec<String>,
    position: Position,
}

impl EnumDecl {
    pub(crate) fn new(name: String, values: Vec<String>, position: Position) -> Self {
        Self {
            name,
            values,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn resolve(&self) -> Enum {
        Enum::new(self.name.clone(), self.values.clone())
    }
}

macro_rules! impl_has_position {
    ($($ty:ty),*) => {
        $(
            impl HasPosition for $ty {
                fn position(&self) -> Position {
                    self.position
                }
            }
        )*
    };
}

impl_has_position!(ProjectDecl, TableDecl, ColumnDecl, EnumDecl);

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Project(ProjectDecl),
    Table(TableDecl),
    Enum(EnumDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Self::Project(p) => p.name(),
            Self::Table(t) => t.name(),
            Self::Enum(e) => e.name(),
        }
    }

    /// The introducing keyword, e.g. `Table`.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Project(_) => "Project",
            Self::Table(_) => "Table",
            Self::Enum(_) => "Enum",
        }
    }
}

impl HasPosition for Declaration {
    fn position(&self) -> Position {
        match self {
            Self::Project(p) => p.position(),
            Self::Table(t) => t.position(),
            Self::Enum(e) => e.position(),
        }
    }
}

/// A borrowed view of any node in the tree, nested columns included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    Project(&'a ProjectDecl),
    Table(&'a TableDecl),
    Column(&'a ColumnDecl),
    Enum(&'a EnumDecl),
}

impl Node<'_> {
    pub fn name(&self) -> &str {
        match self {
            Node::Project(p) => p.name(),
            Node::Table(t) => t.name(),
            Node::Column(c) => c.name(),
            Node::Enum(e) => e.name(),
        }
    }
}

impl HasPosition for Node<'_> {
    fn position(&self) -> Position {
        match self {
            Node::Project(p) => p.position(),
            Node::Table(t) => t.position(),
            Node::Column(c) => c.position(),
            Node::Enum(e) => e.position(),
        }
    }
}

/// A parsed DBML document: top-level declarations in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ast {
    declarations: Vec<Declaration>,
}

impl Ast {
    pub(crate) fn new(declarations: Vec<Declaration>) -> Self {
        Self { declarations }
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// The first `Project` declaration, resolved, with every table of the
    /// document attached in source order.
    pub fn project(&self) -> Option<Project> {
        let decl = self.declarations.iter().find_map(|d| match d {
            Declaration::Project(p) => Some(p),
            _ => None,
        })?;
        let mut project = decl.resolve();
        project.tables = self.tables();
        Some(project)
    }

    pub fn tables(&self) -> Vec<Table> {
        self.declarations
            .iter()
            .filter_map(|d| match d {
                Declaration::Table(t) => Some(t.resolve()),
                _ => None,
            })
            .collect()
    }

    pub fn enums(&self) -> Vec<Enum> {
        self.declarations
            .iter()
            .filter_map(|d| match d {
                Declaration::Enum(e) => Some(e.resolve()),
                _ => None,
            })
            .collect()
    }

    /// Every node, depth-first: each table is followed by its columns.
    pub fn nodes(&self) -> Vec<Node<'_>> {
        let mut nodes = Vec::with_capacity(self.declarations.len());
        for decl in &self.declarations {
            match decl {
                Declaration::Project(p) => nodes.push(Node::Project(p)),
                Declaration::Table(t) => {
                    nodes.push(Node::Table(t));
                    nodes.extend(t.columns().iter().map(Node::Column));
                }
                Declaration::Enum(e) => nodes.push(Node::Enum(e)),
            }
        }
        nodes
    }
}
