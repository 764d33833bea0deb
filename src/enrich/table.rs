use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::ConfigError;

/// External reference rows, e.g. the aircraft list a fleet operator
/// publishes. Row order is significant: the first row for a key wins.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct LookupTable {
    rows: Vec<Map<String, Value>>,
}

impl LookupTable {
    /// Parse a JSON array of objects.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Text form of a cell used for key comparison. Objects, arrays and nulls
/// never match.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
