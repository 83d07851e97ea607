//! Row-key filter expressions.
//!
//! A [`RowKeyFilter`] is an OR-combination of `RowKey eq '<id>'` clauses,
//! rendered in the table service's OData filter syntax. The service puts the
//! filter in the request URL, so the encoded length of the expression is what
//! callers have to keep under the service limit.

use std::collections::HashSet;

const ROW_KEY_PROPERTY: &str = "RowKey";

/// OR-combination of row-key equality clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowKeyFilter {
    row_keys: Vec<String>,
}

impl RowKeyFilter {
    /// Builds a filter matching any of the given row keys, in order.
    pub fn any_of<I, T>(row_keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            row_keys: row_keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of equality clauses.
    pub fn len(&self) -> usize {
        self.row_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty()
    }

    /// Row keys in clause order.
    pub fn row_keys(&self) -> &[String] {
        &self.row_keys
    }

    /// Renders the filter, e.g. `RowKey eq 'a' or RowKey eq 'b'`.
    ///
    /// Single quotes inside a key are doubled, as OData string literals require.
    pub fn expression(&self) -> String {
        self.row_keys
            .iter()
            .map(|key| format!("{ROW_KEY_PROPERTY} eq '{}'", key.replace('\'', "''")))
            .collect::<Vec<_>>()
            .join(" or ")
    }

    /// Length of the `$filter=` query parameter once URL-encoded.
    pub fn encoded_len(&self) -> usize {
        "$filter=".len() + urlencoding::encode(&self.expression()).len()
    }

    /// Returns true if `row_key` satisfies one of the clauses.
    pub fn matches(&self, row_key: &str) -> bool {
        self.row_keys.iter().any(|key| key == row_key)
    }

    /// Row keys as a set, for evaluating against many candidates.
    pub fn key_set(&self) -> HashSet<&str> {
        self.row_keys.iter().map(String::as_str).collect()
    }
}
