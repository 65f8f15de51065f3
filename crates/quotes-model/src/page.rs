use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of the PaperQuotes listing endpoint.
///
/// Only the two fields the fetcher cares about are modeled; every other key
/// in the response is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotePage {
    /// Raw result entries. Absent or `null` means an empty page.
    #[serde(default)]
    pub results: Option<Vec<Value>>,
    /// Link to the following page. Only its truthiness matters.
    #[serde(default)]
    pub next: Value,
}

impl QuotePage {
    /// Whether the API advertises another page after this one.
    pub fn has_next(&self) -> bool {
        is_truthy(&self.next)
    }

    pub fn result_count(&self) -> usize {
        self.results.as_ref().map_or(0, Vec::len)
    }
}

/// Yield the `quote` strings of a page in result order.
///
/// Entries without a `quote` field, entries whose `quote` is not a string,
/// and entries that are not objects at all are skipped.
pub fn extract_quotes<'a>(page: &'a QuotePage) -> impl Iterator<Item = &'a str> + 'a {
    page.results
        .iter()
        .flatten()
        .filter_map(|item| item.get("quote")?.as_str())
}

/// JSON truthiness: `null`, `false`, zero, and empty strings, arrays, or
/// objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
