use std::fmt;

use serde::{Deserialize, Serialize};

/// A table column: a name and its declared type, both as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.column_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_name_then_type() {
        assert_eq!(Column::new("id", "integer").to_string(), "id integer");
    }

    #[test]
    fn serializes_type_key() {
        let json = serde_json::to_value(Column::new("email", "varchar")).unwrap();
        assert_eq!(json["name"], "email");
        assert_eq!(json["type"], "varchar");
    }
}
