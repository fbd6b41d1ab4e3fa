//! Substring matching of a query against a record's fields

use crate::models::SearchableRecord;

/// Names of the fields whose lower-cased value contains the query, in the
/// record's declared field order. Empty or whitespace-only queries match
/// nothing.
pub fn match_fields(record: &SearchableRecord, query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    match_normalized(record, &needle)
}

/// Same as [`match_fields`] for a query already trimmed and lower-cased
pub(crate) fn match_normalized(record: &SearchableRecord, needle: &str) -> Vec<String> {
    record
        .searchable_fields()
        .filter(|(_, value)| value.to_lowercase().contains(needle))
        .map(|(name, _)| name.to_string())
        .collect()
}
