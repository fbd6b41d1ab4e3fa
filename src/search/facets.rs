//! Facet extraction for filter chips

use crate::models::SearchableRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One distinct value of a categorical field and how many records carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub name: String,
    pub count: u64,
}

/// Order in which facet values are returned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetOrder {
    /// Order of first appearance in the input; chips do not reorder on refresh
    #[default]
    FirstSeen,
    /// Lexicographic by value
    Alphabetical,
}

/// Tally the distinct non-empty values of `field` in first-seen order
pub fn extract_facets<'a, I>(records: I, field: &str) -> Vec<Facet>
where
    I: IntoIterator<Item = &'a SearchableRecord>,
{
    let mut facets: Vec<Facet> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for record in records {
        let value = match record.field(field) {
            Some(value) if !value.trim().is_empty() => value,
            _ => continue,
        };

        match positions.get(value) {
            Some(&slot) => facets[slot].count += 1,
            None => {
                positions.insert(value, facets.len());
                facets.push(Facet {
                    name: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    facets
}

/// [`extract_facets`] followed by the requested ordering
pub fn extract_facets_ordered<'a, I>(records: I, field: &str, order: FacetOrder) -> Vec<Facet>
where
    I: IntoIterator<Item = &'a SearchableRecord>,
{
    let mut facets = extract_facets(records, field);
    if order == FacetOrder::Alphabetical {
        facets.sort_by(|a, b| a.name.cmp(&b.name));
    }
    facets
}
