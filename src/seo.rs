use crate::editorial_calendar::cache::EditorialCalendar;
use crate::editorial_calendar::model::{CalendarEntry, CalendarKind};
use itertools::Itertools;

/// What a content page feeds into its SEO metadata and structured data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoEnrichment {
    /// Only set for published entries with a known date
    pub date_published: Option<String>,
    pub section: Option<String>,
    pub keywords: Vec<String>,
}

impl SeoEnrichment {
    pub fn resolve(
        calendar: &EditorialCalendar,
        kind: CalendarKind,
        key: &str,
        page_keywords: &[&str],
    ) -> Self {
        Self::from_entry(calendar.lookup(kind, key).as_ref(), page_keywords)
    }

    /// Without an entry the page keeps its own keywords and advertises no date
    pub fn from_entry(entry: Option<&CalendarEntry>, page_keywords: &[&str]) -> Self {
        let calendar_keywords = entry.map(CalendarEntry::keywords).unwrap_or_default();

        let keywords = page_keywords
            .iter()
            .copied()
            .chain(calendar_keywords.iter().map(String::as_str))
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .unique_by(|keyword| keyword.to_lowercase())
            .map(str::to_string)
            .collect();

        Self {
            date_published: entry
                .filter(|entry| entry.is_published)
                .and_then(|entry| entry.date_published.clone()),
            section: entry.and_then(|entry| entry.section.clone()),
            keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(is_published: bool) -> CalendarEntry {
        CalendarEntry {
            is_published,
            date_published: Some("2025-06-11".to_string()),
            keywords: Some(vec![
                "World Cup 2026".to_string(),
                "mexico city".to_string(),
                " ".to_string(),
            ]),
            section: Some("City Guides".to_string()),
        }
    }

    #[test_log::test]
    fn should_advertise_date_of_published_entries() {
        let enrichment = SeoEnrichment::from_entry(Some(&entry(true)), &["Mexico City", "travel"]);

        assert_eq!(enrichment.date_published.as_deref(), Some("2025-06-11"));
        assert_eq!(enrichment.section.as_deref(), Some("City Guides"));
        assert_eq!(
            enrichment.keywords,
            vec!["Mexico City", "travel", "World Cup 2026"]
        );
    }

    #[test_log::test]
    fn should_omit_date_of_unpublished_entries() {
        let enrichment = SeoEnrichment::from_entry(Some(&entry(false)), &[]);

        assert_eq!(enrichment.date_published, None);
        assert_eq!(enrichment.section.as_deref(), Some("City Guides"));
    }

    #[test_log::test]
    fn without_an_entry_page_defaults_are_kept() {
        let enrichment = SeoEnrichment::from_entry(None, &["stadium", "tickets"]);

        assert_eq!(
            enrichment,
            SeoEnrichment {
                date_published: None,
                section: None,
                keywords: vec!["stadium".to_string(), "tickets".to_string()],
            }
        );
    }
}
