use crate::error::{AppError, Result};
use crate::models::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A portfolio company as stored by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    /// Company name
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,

    /// One-line description
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,

    /// Market sector (e.g. "FinTech")
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub sector: Option<String>,

    /// Funding stage (e.g. "Series A")
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub stage: Option<String>,

    /// Partner-assessed risk level
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub risk_level: Option<String>,

    /// Headquarters location
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,

    /// Website URL
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub website: Option<String>,

    /// Latest reported metrics
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub metrics: CompanyMetrics,

    /// When founders last submitted a metrics update
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub last_update_at: Option<DateTime<Utc>>,

    /// When founders were last reminded to submit an update
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub last_reminder_at: Option<DateTime<Utc>>,
}

impl Company {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_risk_level(mut self, risk_level: impl Into<String>) -> Self {
        self.risk_level = Some(risk_level.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Founder-reported metrics; every value is optional because updates are partial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyMetrics {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub arr: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub mrr: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub burn_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub runway_months: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub valuation: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub headcount: Option<f64>,
}

impl CompanyMetrics {
    /// Reported metrics keyed by name; absent metrics are omitted
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        [
            ("arr", self.arr),
            ("mrr", self.mrr),
            ("burn_rate", self.burn_rate),
            ("runway_months", self.runway_months),
            ("valuation", self.valuation),
            ("headcount", self.headcount),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
        .collect()
    }
}

/// A free-form note, optionally linked to a company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub content: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub company_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub company_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub author: Option<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A scheduled or past meeting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub company_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub company_name: Option<String>,

    /// Board meeting, check-in, pitch...
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub meeting_type: Option<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub attendees: Vec<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub summary: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// A deal in the due-diligence pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub company_name: String,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub sector: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub stage: Option<String>,

    /// Pipeline status (sourcing, diligence, term sheet...)
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub lead_partner: Option<String>,

    /// Proposed check size
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub amount: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub valuation: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Snapshot of every collection fetched from the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    #[serde(default, deserialize_with = "lenient::records")]
    pub companies: Vec<Company>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub notes: Vec<Note>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub meetings: Vec<Meeting>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub deals: Vec<Deal>,
}

impl Collections {
    /// Load a JSON export of the collections
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::NotFound(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let collections: Collections = serde_json::from_str(&raw)?;

        tracing::debug!(
            path = %path.display(),
            companies = collections.companies.len(),
            notes = collections.notes.len(),
            meetings = collections.meetings.len(),
            deals = collections.deals.len(),
            "Loaded collections"
        );

        Ok(collections)
    }

    pub fn len(&self) -> usize {
        self.companies.len() + self.notes.len() + self.meetings.len() + self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
