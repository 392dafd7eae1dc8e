use serde::{Deserialize, Serialize};

use super::Table;

/// A resolved project declaration together with the tables of its document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub db_type: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Looks up a table by name or alias.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.name == name || (t.has_alias() && t.alias == name))
    }
}
