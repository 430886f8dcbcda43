//! Validation schema derived from the catalogue
//!
//! Each field gets a short list of rules. Checking a step runs every rule of
//! every field in the step and collects all violations, never just the first.

use std::collections::{BTreeMap, HashMap};

use super::draft::Draft;
use super::value::FieldValue;
use crate::catalogue::{Catalogue, FieldDescriptor, FieldKind, InputSubtype};

/// One constraint on a field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    Number,
    Link,
    OneOf,
}

/// A failed rule with the message shown next to the field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: Rule,
    pub message: String,
}

/// Violations keyed by field name. Empty means the step is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepViolations {
    by_field: BTreeMap<String, Violation>,
}

impl StepViolations {
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    pub fn get(&self, field: &str) -> Option<&Violation> {
        self.by_field.get(field)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.by_field.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Violation)> {
        self.by_field.iter()
    }

    /// Forget a field's violation once it has been edited
    pub fn remove(&mut self, field: &str) {
        self.by_field.remove(field);
    }

    fn insert(&mut self, field: &str, violation: Violation) {
        self.by_field.entry(field.to_string()).or_insert(violation);
    }
}

#[derive(Debug, Clone)]
struct FieldRules {
    field: FieldDescriptor,
    rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
pub struct ValidationSchema {
    fields: HashMap<String, FieldRules>,
}

impl ValidationSchema {
    pub fn from_catalogue(catalogue: &Catalogue) -> Self {
        let fields = catalogue
            .fields()
            .iter()
            .map(|field| {
                (
                    field.name.clone(),
                    FieldRules {
                        field: field.clone(),
                        rules: rules_for(field),
                    },
                )
            })
            .collect();
        Self { fields }
    }

    #[cfg(test)]
    fn rules(&self, name: &str) -> &[Rule] {
        self.fields.get(name).map(|r| r.rules.as_slice()).unwrap_or(&[])
    }

    /// Check the named fields against the draft
    pub fn validate_fields<'a, I>(&self, names: I, draft: &Draft) -> StepViolations
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut violations = StepViolations::default();
        for name in names {
            let Some(entry) = self.fields.get(name) else {
                continue;
            };
            let empty = FieldValue::empty_for(&entry.field);
            let value = draft.get(name).unwrap_or(&empty);
            for rule in &entry.rules {
                if let Some(message) = check(*rule, &entry.field, value) {
                    violations.insert(name, Violation { rule: *rule, message });
                    break;
                }
            }
        }
        violations
    }
}

fn rules_for(field: &FieldDescriptor) -> Vec<Rule> {
    let mut rules = Vec::new();
    if field.required {
        rules.push(Rule::Required);
    }
    match field.kind {
        FieldKind::Text => match field.subtype_or_default() {
            InputSubtype::Email => rules.push(Rule::Email),
            InputSubtype::Number => rules.push(Rule::Number),
            InputSubtype::Link => rules.push(Rule::Link),
            InputSubtype::Text | InputSubtype::Password => {}
        },
        FieldKind::Radio | FieldKind::Select | FieldKind::Multiselect => rules.push(Rule::OneOf),
        FieldKind::Checkbox if field.is_checkbox_group() => rules.push(Rule::OneOf),
        _ => {}
    }
    rules
}

fn check(rule: Rule, field: &FieldDescriptor, value: &FieldValue) -> Option<String> {
    if rule != Rule::Required && value.is_empty() {
        return None;
    }
    let ok = match rule {
        Rule::Required => !value.is_empty(),
        Rule::Email => is_email(value.as_text().trim()),
        Rule::Number => value.as_text().trim().parse::<f64>().is_ok(),
        Rule::Link => is_link(value.as_text().trim()),
        Rule::OneOf => match value {
            FieldValue::Text(s) => field.option_label(s).is_some(),
            FieldValue::Choices(values) => values.iter().all(|v| field.option_label(v).is_some()),
            _ => true,
        },
    };
    if ok {
        return None;
    }
    Some(match rule {
        Rule::Required => format!("{} is required", field.label),
        Rule::Email => "Invalid email address".to_string(),
        Rule::Number => format!("{} must be a number", field.label),
        Rule::Link => format!("{} must be a valid link", field.label),
        Rule::OneOf => format!("{} has an unknown option", field.label),
    })
}

fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !text.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !domain.ends_with('.')
}

fn is_link(text: &str) -> bool {
    let rest = text
        .strip_prefix("https://")
        .or_else(|| text.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or("");
            !host.is_empty() && !host.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::tests::small_catalogue;

    fn schema() -> ValidationSchema {
        ValidationSchema::from_catalogue(&small_catalogue())
    }

    mod test_rules {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_rules_follow_descriptor() {
            let schema = schema();
            assert_eq!(schema.rules("email"), &[Rule::Required, Rule::Email]);
            assert_eq!(schema.rules("tier"), &[Rule::Required, Rule::OneOf]);
            assert_eq!(schema.rules("dateOfBirth"), &[] as &[Rule]);
        }

        #[test]
        fn test_email_format() {
            assert!(is_email("a@b.com"));
            assert!(is_email("first.last@mail.example.in"));
            assert!(!is_email("a@b"));
            assert!(!is_email("@b.com"));
            assert!(!is_email("a b@c.com"));
            assert!(!is_email("a@b.com."));
        }

        #[test]
        fn test_link_format() {
            assert!(is_link("https://coastalgrand.example/rooms"));
            assert!(!is_link("ftp://example.com"));
            assert!(!is_link("https://"));
        }
    }

    mod test_validate {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_collects_every_violation_in_step() {
            let violations =
                schema().validate_fields(["fullName", "email", "dateOfBirth"], &Draft::new());
            assert_eq!(violations.field_names(), vec!["email", "fullName"]);
            assert_eq!(
                violations.get("fullName").map(|v| v.message.as_str()),
                Some("Full Name is required")
            );
        }

        #[test]
        fn test_reports_format_violation() {
            let mut draft = Draft::new();
            draft.set("fullName", FieldValue::Text("Jo".into()));
            draft.set("email", FieldValue::Text("not-an-email".into()));
            let violations = schema().validate_fields(["fullName", "email"], &draft);
            assert_eq!(violations.len(), 1);
            let violation = violations.get("email").unwrap();
            assert_eq!(violation.rule, Rule::Email);
            assert_eq!(violation.message, "Invalid email address");
        }

        #[test]
        fn test_optional_fields_skip_format_when_empty() {
            let catalogue = crate::catalogue::Catalogue::new(
                vec![FieldDescriptor::new("price", "Price", FieldKind::Text)
                    .subtype(InputSubtype::Number)],
                vec![crate::catalogue::Step::new("One", "", &["price"])],
            )
            .unwrap();
            let schema = ValidationSchema::from_catalogue(&catalogue);
            assert!(schema.validate_fields(["price"], &Draft::new()).is_empty());

            let mut draft = Draft::new();
            draft.set("price", FieldValue::Text("lots".into()));
            let violations = schema.validate_fields(["price"], &draft);
            assert_eq!(violations.get("price").unwrap().rule, Rule::Number);
        }

        #[test]
        fn test_unknown_options_are_rejected() {
            let mut draft = Draft::new();
            draft.set("tier", FieldValue::Text("bronze".into()));
            draft.set("interests", FieldValue::choices(["spa", "casino"]));
            let violations = schema().validate_fields(["tier", "interests"], &draft);
            assert_eq!(violations.field_names(), vec!["interests", "tier"]);
        }

        #[test]
        fn test_empty_set_fails_required() {
            let catalogue = crate::catalogue::Catalogue::new(
                vec![FieldDescriptor::new("kyc", "KYC Documents", FieldKind::Checkbox)
                    .required()
                    .options(&[("PAN Card", "pan")])],
                vec![crate::catalogue::Step::new("One", "", &["kyc"])],
            )
            .unwrap();
            let schema = ValidationSchema::from_catalogue(&catalogue);
            let mut draft = Draft::new();
            draft.set("kyc", FieldValue::Choices(vec![]));
            assert_eq!(
                schema.validate_fields(["kyc"], &draft).get("kyc").unwrap().rule,
                Rule::Required
            );
        }
    }
}
