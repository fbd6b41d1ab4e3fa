//! Match highlighting.
//!
//! User queries are always passed through [`regex::escape`] before a pattern
//! is built, so input such as `"a("` or `"C++ (lang)"` is treated literally.

use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// Case-insensitive literal pattern for a query, `None` for blank queries
pub fn literal_pattern(query: &str) -> Option<Regex> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Byte ranges of every non-overlapping occurrence of the query in `text`
///
/// The regex folds case one character at a time, which misses characters
/// whose lowercase form is longer than one char (`İ` lowercases to `i̇`).
/// Text containing such characters is scanned with the same `to_lowercase`
/// folding the matcher uses, so highlights agree with what matched.
pub fn match_ranges(text: &str, query: &str) -> Vec<Range<usize>> {
    let Some(re) = literal_pattern(query) else {
        return Vec::new();
    };

    if text.chars().any(|c| c.to_lowercase().nth(1).is_some()) {
        folded_ranges(text, query)
    } else {
        re.find_iter(text).map(|m| m.range()).collect()
    }
}

fn folded_ranges(text: &str, query: &str) -> Vec<Range<usize>> {
    let needle = query.trim().to_lowercase();
    let mut ranges = Vec::new();
    let mut next_free = 0;

    for (start, _) in text.char_indices() {
        if start < next_free {
            continue;
        }

        let mut folded = String::new();
        for (offset, c) in text[start..].char_indices() {
            folded.extend(c.to_lowercase());
            if folded.len() >= needle.len() {
                if folded.starts_with(&needle) {
                    let end = start + offset + c.len_utf8();
                    ranges.push(start..end);
                    next_free = end;
                }
                break;
            }
        }
    }

    ranges
}

/// Wrap each occurrence of the query in `open`/`close` markers
pub fn highlight(text: &str, query: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for range in match_ranges(text, query) {
        out.push_str(&text[last..range.start]);
        out.push_str(open);
        out.push_str(&text[range.clone()]);
        out.push_str(close);
        last = range.end;
    }

    out.push_str(&text[last..]);
    out
}
