//! Relevance scoring from matched field names

use crate::models::{SUBTITLE_FIELD, TITLE_FIELD};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-field weights. Fields without an explicit weight use `default_weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWeights {
    #[serde(default = "default_weights")]
    pub weights: BTreeMap<String, f64>,

    #[serde(default = "default_weight")]
    pub default_weight: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            weights: default_weights(),
            default_weight: default_weight(),
        }
    }
}

impl FieldWeights {
    /// Override the weight of one field
    pub fn with_weight(mut self, field: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(field.into(), weight);
        self
    }

    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight;
        self
    }

    pub fn weight_for(&self, field: &str) -> f64 {
        self.weights
            .get(field)
            .copied()
            .unwrap_or(self.default_weight)
    }

    /// Weights must be finite and non-negative for scores to stay non-negative
    pub fn is_valid(&self) -> bool {
        std::iter::once(&self.default_weight)
            .chain(self.weights.values())
            .all(|w| w.is_finite() && *w >= 0.0)
    }
}

fn default_weights() -> BTreeMap<String, f64> {
    BTreeMap::from([
        (TITLE_FIELD.to_string(), 10.0),
        (SUBTITLE_FIELD.to_string(), 5.0),
    ])
}

fn default_weight() -> f64 {
    1.0
}

/// Sum of the weights of the matched fields. No length normalization.
pub fn score<S: AsRef<str>>(matched_fields: &[S], weights: &FieldWeights) -> f64 {
    matched_fields
        .iter()
        .map(|field| weights.weight_for(field.as_ref()))
        .sum()
}
