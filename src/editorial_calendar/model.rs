use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Content family partitioning the calendar keyspace
#[derive(
    strum::IntoStaticStr,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
)]
#[strum(serialize_all = "lowercase")]
pub enum CalendarKind {
    City,
    Stadium,
    Article,
}

/// Editorial metadata for a single content item.
///
/// Entries are never mutated once fetched, a refresh replaces the whole snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl CalendarEntry {
    pub fn new(is_published: bool, date_published: Option<String>) -> Self {
        Self {
            is_published,
            date_published,
            keywords: None,
            section: None,
        }
    }

    /// Accepts either a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp
    pub fn published_date(&self) -> Option<NaiveDate> {
        let raw = self.date_published.as_deref()?.trim();

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    pub fn keywords(&self) -> &[String] {
        self.keywords.as_deref().unwrap_or_default()
    }
}

/// A full cache snapshot, keyed by kind and then by normalized key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarData {
    pub city: HashMap<String, CalendarEntry>,
    pub stadium: HashMap<String, CalendarEntry>,
    pub article: HashMap<String, CalendarEntry>,
}

impl CalendarData {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self, kind: CalendarKind) -> &HashMap<String, CalendarEntry> {
        match kind {
            CalendarKind::City => &self.city,
            CalendarKind::Stadium => &self.stadium,
            CalendarKind::Article => &self.article,
        }
    }

    pub(crate) fn entries_mut(&mut self, kind: CalendarKind) -> &mut HashMap<String, CalendarEntry> {
        match kind {
            CalendarKind::City => &mut self.city,
            CalendarKind::Stadium => &mut self.stadium,
            CalendarKind::Article => &mut self.article,
        }
    }

    /// `key` must already be normalized
    pub fn get(&self, kind: CalendarKind, key: &str) -> Option<&CalendarEntry> {
        self.entries(kind).get(key)
    }

    pub fn count(&self, kind: CalendarKind) -> usize {
        self.entries(kind).len()
    }

    pub fn len(&self) -> usize {
        CalendarKind::iter().map(|kind| self.count(kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
