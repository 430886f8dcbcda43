//! Field value objects

use chrono::NaiveDate;

use crate::catalogue::{FieldDescriptor, FieldKind};

/// Value of one draft field. The variant is fixed by the field's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// text, textarea, radio and select
    Text(String),
    /// multiselect and checkbox groups, insertion ordered without duplicates
    Choices(Vec<String>),
    /// single checkbox
    Flag(bool),
    Date(Option<NaiveDate>),
    Signature(String),
}

impl FieldValue {
    /// The unset value for a field
    pub fn empty_for(field: &FieldDescriptor) -> Self {
        match field.kind {
            FieldKind::Text | FieldKind::Textarea | FieldKind::Radio | FieldKind::Select => {
                Self::Text(String::new())
            }
            FieldKind::Multiselect => Self::Choices(Vec::new()),
            FieldKind::Checkbox if field.is_checkbox_group() => Self::Choices(Vec::new()),
            FieldKind::Checkbox => Self::Flag(false),
            FieldKind::Date => Self::Date(None),
            FieldKind::Signature => Self::Signature(String::new()),
        }
    }

    /// Whether this value has the shape the field's kind demands
    pub fn fits(&self, field: &FieldDescriptor) -> bool {
        matches!(
            (self, Self::empty_for(field)),
            (Self::Text(_), Self::Text(_))
                | (Self::Choices(_), Self::Choices(_))
                | (Self::Flag(_), Self::Flag(_))
                | (Self::Date(_), Self::Date(_))
                | (Self::Signature(_), Self::Signature(_))
        )
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) | Self::Signature(s) => s.trim().is_empty(),
            Self::Choices(values) => values.is_empty(),
            Self::Flag(checked) => !checked,
            Self::Date(date) => date.is_none(),
        }
    }

    /// Text content for text-like values
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) | Self::Signature(s) => s,
            _ => "",
        }
    }

    pub fn contains(&self, option: &str) -> bool {
        match self {
            Self::Choices(values) => values.iter().any(|v| v == option),
            Self::Text(s) => s == option,
            _ => false,
        }
    }

    /// Add the option if absent, remove it if present
    pub fn toggle(&mut self, option: &str) {
        if let Self::Choices(values) = self {
            if let Some(pos) = values.iter().position(|v| v == option) {
                values.remove(pos);
            } else {
                values.push(option.to_string());
            }
        }
    }

    /// Build a set value, dropping repeated entries
    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !out.contains(&value) {
                out.push(value);
            }
        }
        Self::Choices(out)
    }

    /// Get the display value for rendering
    pub fn display_value(&self, field: &FieldDescriptor) -> String {
        match self {
            Self::Text(s) => field.option_label(s).unwrap_or(s).to_string(),
            Self::Signature(s) => s.clone(),
            Self::Choices(values) => values
                .iter()
                .map(|v| field.option_label(v).unwrap_or(v))
                .collect::<Vec<_>>()
                .join(", "),
            Self::Flag(true) => "Yes".to_string(),
            Self::Flag(false) => "No".to_string(),
            Self::Date(Some(date)) => date.format("%d %b %Y").to_string(),
            Self::Date(None) => String::new(),
        }
    }
}
