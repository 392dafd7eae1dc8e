use serde::{Deserialize, Serialize};

/// A resolved enum declaration.
///
/// Values keep declaration order and are not deduplicated. Values that were
/// written as double-quoted strings keep their surrounding quote marks, so
/// `active` and `"on hold"` stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl Enum {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Values with any surrounding double quotes removed.
    pub fn unquoted_values(&self) -> Vec<&str> {
        self.values.iter().map(|v| unquote(v)).collect()
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
