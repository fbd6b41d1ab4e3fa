use crate::models::{Collections, Company, Deal, Meeting, Note};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Field name under which a record's title is matched
pub const TITLE_FIELD: &str = "title";

/// Field name under which a record's subtitle is matched
pub const SUBTITLE_FIELD: &str = "subtitle";

const EXCERPT_CHARS: usize = 160;

/// The four kinds of searchable records
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EntityType {
    Company,
    Deal,
    Meeting,
    Note,
}

impl EntityType {
    /// Ranking priority on equal scores (lower ranks first)
    pub fn priority(&self) -> u8 {
        match self {
            EntityType::Company => 0,
            EntityType::Deal => 1,
            EntityType::Meeting => 2,
            EntityType::Note => 3,
        }
    }

    /// Every entity type
    pub fn all() -> BTreeSet<EntityType> {
        EntityType::iter().collect()
    }
}

/// Immutable snapshot of the searchable parts of a record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordData {
    /// Identifier, unique only within one entity type
    pub id: String,

    /// Primary display string
    pub title: String,

    /// Secondary display string, may be empty
    pub subtitle: String,

    /// Longer display text used in results
    pub description: String,

    /// Remaining searchable fields in declaration order
    pub fields: Vec<(String, String)>,

    /// Numeric values available to range filters
    pub metrics: BTreeMap<String, f64>,

    /// Date used by date-range filters
    pub date: Option<DateTime<Utc>>,
}

impl RecordData {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// A record of any searchable entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SearchableRecord {
    Company(RecordData),
    Note(RecordData),
    Meeting(RecordData),
    Deal(RecordData),
}

impl SearchableRecord {
    pub fn new(entity_type: EntityType, data: RecordData) -> Self {
        match entity_type {
            EntityType::Company => SearchableRecord::Company(data),
            EntityType::Note => SearchableRecord::Note(data),
            EntityType::Meeting => SearchableRecord::Meeting(data),
            EntityType::Deal => SearchableRecord::Deal(data),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            SearchableRecord::Company(_) => EntityType::Company,
            SearchableRecord::Note(_) => EntityType::Note,
            SearchableRecord::Meeting(_) => EntityType::Meeting,
            SearchableRecord::Deal(_) => EntityType::Deal,
        }
    }

    pub fn data(&self) -> &RecordData {
        match self {
            SearchableRecord::Company(data)
            | SearchableRecord::Note(data)
            | SearchableRecord::Meeting(data)
            | SearchableRecord::Deal(data) => data,
        }
    }

    pub fn id(&self) -> &str {
        &self.data().id
    }

    pub fn title(&self) -> &str {
        &self.data().title
    }

    pub fn subtitle(&self) -> &str {
        &self.data().subtitle
    }

    /// Composite identity; ids alone collide across entity types
    pub fn key(&self) -> (EntityType, &str) {
        (self.entity_type(), self.id())
    }

    /// Title, subtitle, then declared fields, in matching order
    pub fn searchable_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        let data = self.data();
        [
            (TITLE_FIELD, data.title.as_str()),
            (SUBTITLE_FIELD, data.subtitle.as_str()),
        ]
        .into_iter()
        .chain(
            data.fields
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )
    }

    /// Value of a named field, including `title` and `subtitle`
    pub fn field(&self, name: &str) -> Option<&str> {
        self.searchable_fields()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.data().metrics.get(name).copied()
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.data().date
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn excerpt(value: &str) -> String {
    if value.chars().count() <= EXCERPT_CHARS {
        return value.to_string();
    }
    let mut out: String = value.chars().take(EXCERPT_CHARS).collect();
    out.push('…');
    out
}

fn join_non_empty(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(separator)
}

impl From<&Company> for SearchableRecord {
    fn from(company: &Company) -> Self {
        let sector = text(&company.sector);
        let stage = text(&company.stage);

        SearchableRecord::Company(RecordData {
            id: company.id.clone(),
            title: company.name.clone(),
            subtitle: text(&company.description),
            description: join_non_empty(&[&sector, &stage], " · "),
            fields: vec![
                ("sector".to_string(), sector),
                ("stage".to_string(), stage),
                ("risk_level".to_string(), text(&company.risk_level)),
                ("location".to_string(), text(&company.location)),
                ("website".to_string(), text(&company.website)),
            ],
            metrics: company.metrics.to_map(),
            date: company.last_update_at,
        })
    }
}

impl From<&Note> for SearchableRecord {
    fn from(note: &Note) -> Self {
        let content = text(&note.content);

        SearchableRecord::Note(RecordData {
            id: note.id.clone(),
            title: note.title.clone(),
            subtitle: text(&note.company_name),
            description: excerpt(&content),
            fields: vec![
                ("content".to_string(), content),
                ("author".to_string(), text(&note.author)),
                ("tags".to_string(), note.tags.join(", ")),
            ],
            metrics: BTreeMap::new(),
            date: note.created_at,
        })
    }
}

impl From<&Meeting> for SearchableRecord {
    fn from(meeting: &Meeting) -> Self {
        let meeting_type = text(&meeting.meeting_type);
        let when = meeting
            .scheduled_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        SearchableRecord::Meeting(RecordData {
            id: meeting.id.clone(),
            title: meeting.title.clone(),
            subtitle: text(&meeting.company_name),
            description: join_non_empty(&[&meeting_type, &when], " · "),
            fields: vec![
                ("meeting_type".to_string(), meeting_type),
                ("attendees".to_string(), meeting.attendees.join(", ")),
                ("summary".to_string(), text(&meeting.summary)),
            ],
            metrics: BTreeMap::new(),
            date: meeting.scheduled_at,
        })
    }
}

impl From<&Deal> for SearchableRecord {
    fn from(deal: &Deal) -> Self {
        let stage = text(&deal.stage);
        let amount = deal
            .amount
            .map(|amount| format!("${:.0}", amount))
            .unwrap_or_default();

        let mut metrics = BTreeMap::new();
        if let Some(amount) = deal.amount {
            metrics.insert("amount".to_string(), amount);
        }
        if let Some(valuation) = deal.valuation {
            metrics.insert("valuation".to_string(), valuation);
        }

        SearchableRecord::Deal(RecordData {
            id: deal.id.clone(),
            title: deal.company_name.clone(),
            subtitle: text(&deal.status),
            description: join_non_empty(&[&stage, &amount], " · "),
            fields: vec![
                ("sector".to_string(), text(&deal.sector)),
                ("stage".to_string(), stage),
                ("lead_partner".to_string(), text(&deal.lead_partner)),
                ("notes".to_string(), text(&deal.notes)),
            ],
            metrics,
            date: deal.updated_at,
        })
    }
}

impl Collections {
    /// Flatten every collection into searchable snapshots
    pub fn records(&self) -> Vec<SearchableRecord> {
        let mut records = Vec::with_capacity(self.len());
        records.extend(self.companies.iter().map(SearchableRecord::from));
        records.extend(self.notes.iter().map(SearchableRecord::from));
        records.extend(self.meetings.iter().map(SearchableRecord::from));
        records.extend(self.deals.iter().map(SearchableRecord::from));
        records
    }
}
