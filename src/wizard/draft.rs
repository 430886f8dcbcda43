//! The in-progress answer set and its JSON forms

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::value::FieldValue;
use crate::catalogue::{Catalogue, FieldDescriptor};
use crate::gateway::{FlatFields, FlatValue};

/// Date layout written to the persisted draft
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Field name to current value. Fields never edited are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    values: BTreeMap<String, FieldValue>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Persisted layout: one key per field, dates as ISO-8601 strings,
    /// everything else in its natural JSON form.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(name, value)| {
                let json = match value {
                    FieldValue::Text(s) | FieldValue::Signature(s) => Value::String(s.clone()),
                    FieldValue::Choices(values) => Value::Array(
                        values.iter().cloned().map(Value::String).collect(),
                    ),
                    FieldValue::Flag(checked) => Value::Bool(*checked),
                    FieldValue::Date(Some(date)) => {
                        Value::String(date.format(DATE_FORMAT).to_string())
                    }
                    FieldValue::Date(None) => Value::Null,
                };
                (name.clone(), json)
            })
            .collect();
        Value::Object(map)
    }

    /// Rebuild a draft from its persisted layout. Keys the catalogue does
    /// not know and values of the wrong JSON type are dropped. A date that
    /// does not parse loads as "no value".
    pub fn from_json(json: &Value, catalogue: &Catalogue) -> Self {
        let mut draft = Self::new();
        let Some(map) = json.as_object() else {
            return draft;
        };
        for (name, raw) in map {
            let Some(field) = catalogue.field(name) else {
                continue;
            };
            if let Some(value) = decode_value(field, raw) {
                draft.set(name, value);
            }
        }
        draft
    }

    /// Plain field map handed to the submission gateway
    pub fn flatten(&self, catalogue: &Catalogue) -> FlatFields {
        self.values
            .iter()
            .filter(|(name, _)| catalogue.field(name).is_some())
            .filter_map(|(name, value)| {
                let flat = match value {
                    FieldValue::Text(s) | FieldValue::Signature(s) => FlatValue::Text(s.clone()),
                    FieldValue::Choices(values) => FlatValue::List(values.clone()),
                    FieldValue::Flag(checked) => FlatValue::Flag(*checked),
                    FieldValue::Date(date) => FlatValue::Text(date_to_timestamp(date.as_ref()?)),
                };
                Some((name.clone(), flat))
            })
            .collect()
    }
}

fn decode_value(field: &FieldDescriptor, raw: &Value) -> Option<FieldValue> {
    match (FieldValue::empty_for(field), raw) {
        (FieldValue::Text(_), Value::String(s)) => Some(FieldValue::Text(s.clone())),
        (FieldValue::Signature(_), Value::String(s)) => Some(FieldValue::Signature(s.clone())),
        (FieldValue::Flag(_), Value::Bool(b)) => Some(FieldValue::Flag(*b)),
        (FieldValue::Choices(_), Value::Array(items)) => Some(FieldValue::choices(
            items.iter().filter_map(Value::as_str).map(str::to_string),
        )),
        (FieldValue::Date(_), Value::String(s)) => Some(FieldValue::Date(parse_date(s))),
        (FieldValue::Date(_), Value::Null) => Some(FieldValue::Date(None)),
        _ => {
            tracing::debug!(field = %field.name, kind = field.kind.label(), "dropping mistyped draft value");
            None
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

fn date_to_timestamp(date: &NaiveDate) -> String {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| date.format(DATE_FORMAT).to_string())
}
