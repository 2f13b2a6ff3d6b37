//! Parsed query values and re-serialization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered mapping produced by the query parsers.
pub type QueryMap = IndexMap<String, QueryValue>;

/// A decoded query value.
///
/// Serializes untagged, so a parsed query renders as plain JSON:
/// `{"a.b": ["x", "y"], "c": {"d": "1"}, "e": "2"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// Scalar value
    Text(String),
    /// Nested array with indices `0..n` in order
    List(Vec<QueryValue>),
    /// Any other nested structure
    Map(QueryMap),
}

impl QueryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[QueryValue]> {
        match self {
            QueryValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&QueryMap> {
        match self {
            QueryValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a nested entry by key (map key or list position).
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        match self {
            QueryValue::Text(_) => None,
            QueryValue::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            QueryValue::Map(map) => map.get(key),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Text(s)
    }
}

impl From<Vec<QueryValue>> for QueryValue {
    fn from(items: Vec<QueryValue>) -> Self {
        QueryValue::List(items)
    }
}

impl From<QueryMap> for QueryValue {
    fn from(map: QueryMap) -> Self {
        QueryValue::Map(map)
    }
}

/// Serialize a parsed mapping back into a query string.
///
/// Top-level keys are percent-encoded whole, so a literal `[` in a key name
/// survives as `%5B` and is not read back as bracket notation. Nested levels
/// are written as `[sub]` suffixes.
pub fn to_query_string(map: &QueryMap) -> String {
    let mut pairs = Vec::new();
    for (key, value) in map {
        push_pairs(&mut pairs, urlencoding::encode(key).into_owned(), value);
    }
    pairs.join("&")
}

fn push_pairs(pairs: &mut Vec<String>, prefix: String, value: &QueryValue) {
    match value {
        QueryValue::Text(s) => {
            pairs.push(format!("{}={}", prefix, urlencoding::encode(s)));
        }
        QueryValue::List(items) => {
            for (i, item) in items.iter().enumerate() {
                push_pairs(pairs, format!("{}[{}]", prefix, i), item);
            }
        }
        QueryValue::Map(map) => {
            for (key, item) in map {
                push_pairs(pairs, format!("{}[{}]", prefix, urlencoding::encode(key)), item);
            }
        }
    }
}
