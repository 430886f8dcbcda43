//! Field catalogue: the static description of every form field and the
//! ordered steps that group them.
//!
//! The catalogue is pure data. [`Catalogue::new`] checks that the steps and
//! field descriptors agree before anything else is allowed to use them.

mod membership;
mod terms;

pub use membership::membership_catalogue;
pub use terms::{terms_width, TERMS_LINES};

use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

/// Input kind of a field. Each kind has exactly one renderer and one value
/// shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Textarea,
    Checkbox,
    Radio,
    Select,
    Multiselect,
    Date,
    Signature,
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Date => "date",
            Self::Signature => "signature",
        }
    }

    /// Whether the kind is edited by typing characters
    pub fn is_typed(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Textarea | Self::Date | Self::Signature
        )
    }
}

/// Refinement of a `text` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputSubtype {
    #[default]
    Text,
    Email,
    Number,
    Link,
    Password,
}

/// One selectable option of a choice field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

/// Immutable description of a single field
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub options: Vec<FieldOption>,
    pub input_subtype: Option<InputSubtype>,
    pub placeholder: Option<String>,
    pub description: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            options: Vec::new(),
            input_subtype: None,
            placeholder: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn subtype(mut self, subtype: InputSubtype) -> Self {
        self.input_subtype = Some(subtype);
        self
    }

    pub fn options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = options
            .iter()
            .map(|(label, value)| FieldOption {
                label: label.to_string(),
                value: value.to_string(),
            })
            .collect();
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// A checkbox with options is a group holding a set of values.
    pub fn is_checkbox_group(&self) -> bool {
        self.kind == FieldKind::Checkbox && !self.options.is_empty()
    }

    /// Whether the field holds a set of option values
    pub fn holds_set(&self) -> bool {
        self.kind == FieldKind::Multiselect || self.is_checkbox_group()
    }

    pub fn subtype_or_default(&self) -> InputSubtype {
        self.input_subtype.unwrap_or_default()
    }

    /// Label of the option with the given value
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }

    fn needs_options(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Radio | FieldKind::Select | FieldKind::Multiselect
        )
    }
}

/// A named, ordered subset of fields presented together
#[derive(Debug, Clone)]
pub struct Step {
    pub title: String,
    pub description: String,
    pub field_names: Vec<String>,
}

impl Step {
    pub fn new(title: &str, description: &str, field_names: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            field_names: field_names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// Startup invariant failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogueError {
    #[error("catalogue has no steps")]
    NoSteps,
    #[error("duplicate field name: {0}")]
    DuplicateField(String),
    #[error("step '{step}' references unknown field '{field}'")]
    UnknownField { step: String, field: String },
    #[error("field '{0}' is not part of any step")]
    UnreachableField(String),
    #[error("required field '{field}' appears in {count} steps")]
    RequiredFieldInManySteps { field: String, count: usize },
    #[error("{kind} field '{field}' declares no options")]
    MissingOptions { field: String, kind: &'static str },
}

/// Validated set of field descriptors and steps
#[derive(Debug, Clone)]
pub struct Catalogue {
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
    steps: Vec<Step>,
}

impl Catalogue {
    /// Build a catalogue, checking that steps and fields agree.
    pub fn new(fields: Vec<FieldDescriptor>, steps: Vec<Step>) -> Result<Self, CatalogueError> {
        if steps.is_empty() {
            return Err(CatalogueError::NoSteps);
        }

        let mut index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if index.insert(field.name.clone(), i).is_some() {
                return Err(CatalogueError::DuplicateField(field.name.clone()));
            }
            if field.needs_options() && field.options.is_empty() {
                return Err(CatalogueError::MissingOptions {
                    field: field.name.clone(),
                    kind: field.kind.label(),
                });
            }
        }

        let mut appearances: BTreeMap<&str, usize> = BTreeMap::new();
        for step in &steps {
            let mut seen_in_step = HashSet::new();
            for name in &step.field_names {
                if !index.contains_key(name) {
                    return Err(CatalogueError::UnknownField {
                        step: step.title.clone(),
                        field: name.clone(),
                    });
                }
                if seen_in_step.insert(name.as_str()) {
                    *appearances.entry(name.as_str()).or_default() += 1;
                }
            }
        }

        for field in &fields {
            match appearances.get(field.name.as_str()).copied().unwrap_or(0) {
                0 => return Err(CatalogueError::UnreachableField(field.name.clone())),
                1 => {}
                count if field.required => {
                    return Err(CatalogueError::RequiredFieldInManySteps {
                        field: field.name.clone(),
                        count,
                    })
                }
                count => {
                    tracing::warn!(field = %field.name, count, "optional field shown in several steps");
                }
            }
        }

        Ok(Self {
            fields,
            index,
            steps,
        })
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Descriptors of a step's fields, in step order
    pub fn step_fields(&self, index: usize) -> Vec<&FieldDescriptor> {
        self.steps
            .get(index)
            .map(|step| {
                step.field_names
                    .iter()
                    .filter_map(|name| self.field(name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Index of the first step containing the field
    pub fn step_of(&self, name: &str) -> Option<usize> {
        self.steps
            .iter()
            .position(|s| s.field_names.iter().any(|n| n == name))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two-step catalogue used by wizard tests
    pub(crate) fn small_catalogue() -> Catalogue {
        Catalogue::new(
            vec![
                FieldDescriptor::new("fullName", "Full Name", FieldKind::Text).required(),
                FieldDescriptor::new("email", "Email Address", FieldKind::Text)
                    .required()
                    .subtype(InputSubtype::Email),
                FieldDescriptor::new("dateOfBirth", "Date of Birth", FieldKind::Date),
                FieldDescriptor::new("tier", "Tier", FieldKind::Select)
                    .required()
                    .options(&[("Gold", "gold"), ("Silver", "silver")]),
                FieldDescriptor::new("interests", "Interests", FieldKind::Multiselect)
                    .options(&[("Spa", "spa"), ("Golf", "golf"), ("Dining", "dining")]),
                FieldDescriptor::new("marketing", "Marketing", FieldKind::Checkbox),
                FieldDescriptor::new("signature", "Signature", FieldKind::Signature).required(),
            ],
            vec![
                Step::new("Details", "Who you are", &["fullName", "email", "dateOfBirth"]),
                Step::new("Membership", "Pick a tier", &["tier", "interests", "marketing"]),
                Step::new("Sign", "Declaration", &["signature"]),
            ],
        )
        .expect("test catalogue is consistent")
    }

    #[test]
    fn test_small_catalogue_is_consistent() {
        let catalogue = small_catalogue();
        assert_eq!(catalogue.step_count(), 3);
        assert_eq!(catalogue.step_of("tier"), Some(1));
        assert!(catalogue.field("missing").is_none());
    }

    #[test]
    fn test_step_fields_keep_step_order() {
        let catalogue = small_catalogue();
        let names: Vec<_> = catalogue
            .step_fields(1)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["tier", "interests", "marketing"]);
        assert!(catalogue.step_fields(9).is_empty());
    }

    #[test]
    fn test_rejects_unknown_step_reference() {
        let err = Catalogue::new(
            vec![FieldDescriptor::new("a", "A", FieldKind::Text)],
            vec![Step::new("One", "", &["a", "b"])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CatalogueError::UnknownField {
                step: "One".to_string(),
                field: "b".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_unreachable_field() {
        let err = Catalogue::new(
            vec![
                FieldDescriptor::new("a", "A", FieldKind::Text),
                FieldDescriptor::new("b", "B", FieldKind::Text),
            ],
            vec![Step::new("One", "", &["a"])],
        )
        .unwrap_err();
        assert_eq!(err, CatalogueError::UnreachableField("b".to_string()));
    }

    #[test]
    fn test_rejects_required_field_in_two_steps() {
        let err = Catalogue::new(
            vec![FieldDescriptor::new("a", "A", FieldKind::Text).required()],
            vec![Step::new("One", "", &["a"]), Step::new("Two", "", &["a"])],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogueError::RequiredFieldInManySteps { count: 2, .. }
        ));
    }

    #[test]
    fn test_allows_optional_field_in_two_steps() {
        let catalogue = Catalogue::new(
            vec![FieldDescriptor::new("a", "A", FieldKind::Text)],
            vec![Step::new("One", "", &["a"]), Step::new("Two", "", &["a"])],
        );
        assert!(catalogue.is_ok());
    }

    #[test]
    fn test_rejects_duplicate_names_and_missing_options() {
        let dup = Catalogue::new(
            vec![
                FieldDescriptor::new("a", "A", FieldKind::Text),
                FieldDescriptor::new("a", "A again", FieldKind::Text),
            ],
            vec![Step::new("One", "", &["a"])],
        );
        assert_eq!(dup.unwrap_err(), CatalogueError::DuplicateField("a".to_string()));

        let no_options = Catalogue::new(
            vec![FieldDescriptor::new("r", "R", FieldKind::Radio)],
            vec![Step::new("One", "", &["r"])],
        );
        assert!(matches!(
            no_options.unwrap_err(),
            CatalogueError::MissingOptions { kind: "radio", .. }
        ));
    }

    #[test]
    fn test_rejects_empty_step_list() {
        assert_eq!(
            Catalogue::new(vec![], vec![]).unwrap_err(),
            CatalogueError::NoSteps
        );
    }

    #[test]
    fn test_checkbox_group_holds_set() {
        let single = FieldDescriptor::new("c", "C", FieldKind::Checkbox);
        let group = FieldDescriptor::new("g", "G", FieldKind::Checkbox).options(&[("X", "x")]);
        assert!(!single.holds_set());
        assert!(group.holds_set());
        assert_eq!(group.option_label("x"), Some("X"));
    }
}
