// Candidate records and the local (in-memory) filter.

use crate::utils::contains_ignore_case;
use serde_json::Value;

/// What is handed to `onSelect` when an entry is picked.
#[derive(Clone, Debug, PartialEq)]
pub enum ResultValue {
    /// Position in the host's `data`. The JS value itself stays with the
    /// widget and is passed back as the very same object.
    Data(usize),
    /// An identifier decoded from a remote response.
    Remote(Value),
}

/// A matchable record: `text` is shown and matched, `value` is handed back
/// untouched when the entry is selected.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub text: String,
    pub value: ResultValue,
}

impl SearchResult {
    pub fn new(text: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            text: text.into(),
            value: ResultValue::Remote(value.into()),
        }
    }

    /// Entry `index` of the host-supplied data.
    pub fn from_data(text: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            value: ResultValue::Data(index),
        }
    }
}

/// Items of `data` whose text contains `query` (ignoring case), in source order.
/// An empty query matches nothing.
pub fn filter_local(query: &str, data: &[SearchResult]) -> Vec<SearchResult> {
    if query.is_empty() {
        return Vec::new();
    }
    data.iter()
        .filter(|item| contains_ignore_case(&item.text, query))
        .cloned()
        .collect()
}

/// Keep at most `limit` results.
pub fn cap_results(mut results: Vec<SearchResult>, limit: usize) -> Vec<SearchResult> {
    results.truncate(limit);
    results
}
