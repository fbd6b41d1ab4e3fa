//! Typeahead suggestions and recent-query history

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Default number of recent queries kept
pub const DEFAULT_RECENT_CAP: usize = 10;

/// Prefix suggestions: matching recent queries (most recent first) followed
/// by matching corpus titles, deduplicated case-insensitively keeping the
/// first-seen casing, truncated to `limit`.
pub fn suggest<R, T>(prefix: &str, recent_queries: R, corpus_titles: T, limit: usize) -> Vec<String>
where
    R: IntoIterator,
    R::Item: AsRef<str>,
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    // Trailing whitespace is part of what was typed
    let needle = prefix.trim_start().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut suggestions = Vec::new();

    let recent = recent_queries.into_iter().map(|q| q.as_ref().to_string());
    let titles = corpus_titles.into_iter().map(|t| t.as_ref().to_string());

    for candidate in recent.chain(titles) {
        if suggestions.len() >= limit {
            break;
        }
        let folded = candidate.to_lowercase();
        if folded.starts_with(&needle) && seen.insert(folded) {
            suggestions.push(candidate);
        }
    }

    suggestions
}

/// Bounded most-recent-first queue of executed queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentQueries {
    entries: VecDeque<String>,
    cap: usize,
}

impl Default for RecentQueries {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_CAP)
    }
}

impl RecentQueries {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Rebuild from a persisted most-recent-first list
    pub fn from_entries(entries: impl IntoIterator<Item = String>, cap: usize) -> Self {
        let mut queue = Self::new(cap);
        for entry in entries.into_iter().collect::<Vec<_>>().into_iter().rev() {
            queue.push(&entry);
        }
        queue
    }

    /// Push a query to the front. Blank queries are ignored; an existing
    /// case-insensitive duplicate moves to the front with the new casing.
    pub fn push(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.cap == 0 {
            return;
        }

        let folded = query.to_lowercase();
        self.entries.retain(|existing| existing.to_lowercase() != folded);
        self.entries.push_front(query.to_string());
        self.entries.truncate(self.cap);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_before_titles() {
        let recent = vec!["acme board", "beta"];
        let titles = vec!["Acme Corp", "Acorn Labs"];
        let suggestions = suggest("ac", &recent, &titles, 5);

        assert_eq!(suggestions, vec!["acme board", "Acme Corp", "Acorn Labs"]);
    }

    #[test]
    fn test_case_insensitive_dedup_keeps_first_casing() {
        let recent = vec!["ACME"];
        let titles = vec!["Acme", "acme"];
        assert_eq!(suggest("a", &recent, &titles, 5), vec!["ACME"]);
    }

    #[test]
    fn test_limit_truncates() {
        let titles: Vec<String> = (0..20).map(|i| format!("Deal {}", i)).collect();
        assert_eq!(suggest("deal", Vec::<String>::new(), &titles, 5).len(), 5);
    }

    #[test]
    fn test_blank_prefix_yields_nothing() {
        assert!(suggest("  ", vec!["a"], vec!["b"], 5).is_empty());
    }

    #[test]
    fn test_trailing_space_is_significant() {
        let titles = vec!["TechCorp", "Tech Ventures"];
        assert_eq!(suggest("tech ", Vec::<String>::new(), &titles, 5), vec!["Tech Ventures"]);
        assert_eq!(suggest("  tech", Vec::<String>::new(), &titles, 5).len(), 2);
    }

    #[test]
    fn test_recent_queue_is_bounded_and_push_front() {
        let mut recent = RecentQueries::new(3);
        for q in ["one", "two", "three", "four"] {
            recent.push(q);
        }
        assert_eq!(recent.to_vec(), vec!["four", "three", "two"]);
    }

    #[test]
    fn test_recent_duplicate_moves_to_front() {
        let mut recent = RecentQueries::new(5);
        recent.push("acme");
        recent.push("beta");
        recent.push("ACME");
        assert_eq!(recent.to_vec(), vec!["ACME", "beta"]);
    }

    #[test]
    fn test_recent_ignores_blank() {
        let mut recent = RecentQueries::default();
        recent.push("   ");
        assert!(recent.is_empty());
        assert_eq!(recent.cap(), DEFAULT_RECENT_CAP);
    }

    #[test]
    fn test_from_entries_preserves_order() {
        let recent = RecentQueries::from_entries(
            vec!["newest".to_string(), "older".to_string(), "oldest".to_string()],
            2,
        );
        assert_eq!(recent.to_vec(), vec!["newest", "older"]);
    }
}
