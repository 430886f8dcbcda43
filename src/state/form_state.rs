//! Focus and editing state of the wizard step on screen

use std::collections::HashMap;

use crate::catalogue::Catalogue;
use crate::wizard::FieldValue;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// The fields of one step with the focused field, the highlighted option of
/// a choice field and partially typed dates.
#[derive(Debug, Clone, Default)]
pub struct StepForm {
    step: usize,
    field_names: Vec<String>,
    active_field: usize,
    option_cursor: usize,
    /// Date text as typed, kept until it parses
    date_buffers: HashMap<String, String>,
}

impl StepForm {
    pub fn for_step(catalogue: &Catalogue, step: usize) -> Self {
        Self {
            step,
            field_names: catalogue
                .step(step)
                .map(|s| s.field_names.clone())
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Name of the focused field
    pub fn active_name(&self) -> Option<&str> {
        self.field_names.get(self.active_field).map(String::as_str)
    }

    /// Focus a field by name. Unknown names leave the focus alone.
    pub fn focus(&mut self, name: &str) -> bool {
        match self.field_names.iter().position(|n| n == name) {
            Some(index) => {
                self.set_active_field(index);
                true
            }
            None => false,
        }
    }

    pub fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    /// Move the option highlight, wrapping at both ends
    pub fn move_option(&mut self, forward: bool, option_count: usize) {
        if option_count == 0 {
            self.option_cursor = 0;
            return;
        }
        let current = self.option_cursor.min(option_count - 1);
        self.option_cursor = if forward {
            (current + 1) % option_count
        } else if current == 0 {
            option_count - 1
        } else {
            current - 1
        };
    }

    /// Date text shown for a field: the typed buffer if any, else the value
    pub fn date_text(&self, name: &str, value: &FieldValue) -> String {
        if let Some(buffer) = self.date_buffers.get(name) {
            return buffer.clone();
        }
        match value {
            FieldValue::Date(Some(date)) => date.format("%Y-%m-%d").to_string(),
            _ => String::new(),
        }
    }

    /// Editable date buffer, seeded from the current value
    pub fn date_buffer_mut(&mut self, name: &str, value: &FieldValue) -> &mut String {
        let seed = self.date_text(name, value);
        self.date_buffers.entry(name.to_string()).or_insert(seed)
    }
}

impl Form for StepForm {
    fn field_count(&self) -> usize {
        self.field_names.len()
    }

    fn active_field(&self) -> usize {
        self.active_field
    }

    fn set_active_field(&mut self, index: usize) {
        if index != self.active_field {
            self.option_cursor = 0;
        }
        self.active_field = index;
    }
}
