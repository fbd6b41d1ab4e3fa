//! Query state: the text query plus every active filter

use crate::models::EntityType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use validator::Validate;

/// Inclusive bounds on a numeric metric; a missing bound is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Inclusive date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

/// Everything the user has typed or selected.
///
/// Sets and maps are ordered so that serialization, equality and the
/// response fingerprint do not depend on insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    #[serde(default)]
    pub query: String,

    #[serde(default = "EntityType::all")]
    pub entity_types: BTreeSet<EntityType>,

    #[serde(default)]
    pub sectors: BTreeSet<String>,

    #[serde(default)]
    pub stages: BTreeSet<String>,

    #[serde(default)]
    pub risk_levels: BTreeSet<String>,

    #[serde(default)]
    pub numeric_ranges: BTreeMap<String, NumericRange>,

    #[serde(default)]
    pub date_range: Option<DateRange>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            query: String::new(),
            entity_types: EntityType::all(),
            sectors: BTreeSet::new(),
            stages: BTreeSet::new(),
            risk_levels: BTreeSet::new(),
            numeric_ranges: BTreeMap::new(),
            date_range: None,
        }
    }
}

impl QueryState {
    /// Create a query state searching all entity types
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set the text query
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Restrict to the given entity types
    pub fn with_entity_types(mut self, types: impl IntoIterator<Item = EntityType>) -> Self {
        self.entity_types = types.into_iter().collect();
        self
    }

    /// Filter by sectors
    pub fn with_sectors(mut self, sectors: Vec<impl Into<String>>) -> Self {
        self.sectors = sectors.into_iter().map(Into::into).collect();
        self
    }

    /// Filter by stages
    pub fn with_stages(mut self, stages: Vec<impl Into<String>>) -> Self {
        self.stages = stages.into_iter().map(Into::into).collect();
        self
    }

    /// Filter by risk levels
    pub fn with_risk_levels(mut self, levels: Vec<impl Into<String>>) -> Self {
        self.risk_levels = levels.into_iter().map(Into::into).collect();
        self
    }

    /// Bound a metric
    pub fn with_range(mut self, metric: impl Into<String>, range: NumericRange) -> Self {
        self.numeric_ranges.insert(metric.into(), range);
        self
    }

    /// Restrict to records dated within the window
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Toggle one entity type on or off. The set may become empty until
    /// the next toggle; [`QueryState::normalized`] repairs that.
    pub fn toggle_entity_type(&mut self, entity_type: EntityType) {
        if !self.entity_types.remove(&entity_type) {
            self.entity_types.insert(entity_type);
        }
    }

    /// Copy with an empty entity-type set replaced by every type
    pub fn normalized(&self) -> Self {
        let mut state = self.clone();
        if state.entity_types.is_empty() {
            state.entity_types = EntityType::all();
        }
        state
    }

    /// Trimmed, lower-cased query text
    pub fn normalized_query(&self) -> String {
        self.query.trim().to_lowercase()
    }

    /// True when the query is empty or only whitespace
    pub fn is_empty_query(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Categorical filters keyed by the record field they apply to
    pub fn categorical_filters(&self) -> [(&'static str, &BTreeSet<String>); 3] {
        [
            ("sector", &self.sectors),
            ("stage", &self.stages),
            ("risk_level", &self.risk_levels),
        ]
    }

    /// True when any filter beyond the entity types is active
    pub fn has_filters(&self) -> bool {
        self.categorical_filters().iter().any(|(_, set)| !set.is_empty())
            || !self.numeric_ranges.is_empty()
            || self.date_range.is_some()
    }
}

/// A named snapshot of a query state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SavedSearch {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub state: QueryState,

    pub created_at: DateTime<Utc>,
}

impl SavedSearch {
    pub fn new(name: impl Into<String>, state: QueryState) -> Self {
        Self {
            name: name.into(),
            state,
            created_at: Utc::now(),
        }
    }
}
