use super::error::CalendarError;
use super::model::{CalendarData, CalendarEntry, CalendarKind};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use tracing::{debug, warn};

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("Failed to create whitespace regex");
}

/// Lower-cases, trims and collapses every inner whitespace run into a single hyphen.
///
/// Both stored keys and looked-up keys go through this, so `"  New   York "` and
/// `"new-york"` address the same entry.
pub fn normalize_key(raw: &str) -> String {
    WHITESPACE_RUN
        .replace_all(raw.trim(), "-")
        .to_lowercase()
}

#[derive(Debug)]
pub struct ParsedCalendar {
    pub data: CalendarData,
    /// Entries dropped because they did not match the entry shape
    pub skipped: usize,
}

/// Builds a normalized snapshot from the raw wire document.
///
/// Only a body that isn't JSON, or isn't a JSON object at the top level, fails the whole
/// parse. Missing kinds are empty, unknown top-level keys are ignored, and malformed
/// kinds or entries are skipped individually.
pub fn parse_calendar(body: &str) -> Result<ParsedCalendar, CalendarError> {
    let mut root = match serde_json::from_str::<Value>(body)? {
        Value::Object(root) => root,
        other => {
            return Err(CalendarError::Shape(format!(
                "expected an object at the top level, found {}",
                json_type(&other)
            )))
        }
    };

    let mut data = CalendarData::empty();
    let mut skipped = 0;

    for kind in CalendarKind::iter() {
        let name: &'static str = kind.into();

        match root.remove(name) {
            None | Some(Value::Null) => {}
            Some(Value::Object(raw_entries)) => {
                skipped += insert_entries(&mut data, kind, raw_entries);
            }
            Some(other) => {
                warn!(kind = name, "Kind is a {} instead of an object (treating as empty)", json_type(&other));
            }
        }
    }

    Ok(ParsedCalendar { data, skipped })
}

fn insert_entries(data: &mut CalendarData, kind: CalendarKind, raw_entries: Map<String, Value>) -> usize {
    let entries = data.entries_mut(kind);
    let mut skipped = 0;

    for (raw_key, value) in raw_entries {
        match serde_json::from_value::<CalendarEntry>(value) {
            Ok(entry) => {
                let key = normalize_key(&raw_key);

                if entries.insert(key.clone(), entry).is_some() {
                    debug!(kind = %kind, raw_key = %raw_key, key = %key, "Duplicate normalized key, keeping the later entry");
                }
            }
            Err(err) => {
                warn!(kind = %kind, raw_key = %raw_key, "Skipping malformed entry. Err: {err}");
                skipped += 1;
            }
        }
    }

    skipped
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
