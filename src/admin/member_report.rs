//! Printable copy of one submitted application, for the applicant

use chrono::Local;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use super::report::format_inr;
use crate::catalogue::{Catalogue, FieldKind};
use crate::gateway::{parse_leading_int, FlatValue, SubmissionReceipt};
use crate::storage;
use crate::wizard::parse_date;

const WIDTH: usize = 72;

/// Report sections: heading and the fields listed under it
const SECTIONS: &[(&str, &[&str])] = &[
    (
        "PERSONAL DETAILS",
        &["memberType", "dateOfBirth", "occupation", "profession", "annualIncome"],
    ),
    ("CONTACT", &["contactMobile", "contactEmail"]),
    (
        "PAYMENT",
        &["paymentMode", "downPaymentAmount", "downPaymentOption"],
    ),
];

const ADDRESS: &[&str] = &[
    "premisesName",
    "roadStreetLane",
    "areaLocality",
    "city",
    "state",
    "postalCode",
    "country",
];

/// Fields shown as rupee amounts
const AMOUNTS: &[&str] = &["membershipPrice", "downPaymentAmount"];

pub struct MemberReport<'a> {
    receipt: &'a SubmissionReceipt,
    catalogue: &'a Catalogue,
}

impl<'a> MemberReport<'a> {
    pub fn new(receipt: &'a SubmissionReceipt, catalogue: &'a Catalogue) -> Self {
        Self { receipt, catalogue }
    }

    /// `<membershipId>.txt`, keeping only characters safe in a file name
    pub fn file_name(&self) -> String {
        let id: String = self
            .receipt
            .id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        let id = if id.is_empty() { "membership".to_string() } else { id };
        format!("{id}.txt")
    }

    /// Display text of one stored field, empty when absent
    fn value(&self, name: &str) -> String {
        let field = self.catalogue.field(name);
        let label_of = |v: &str| {
            field
                .and_then(|f| f.option_label(v))
                .unwrap_or(v)
                .to_string()
        };
        match self.receipt.data.get(name) {
            Some(FlatValue::Text(text)) if AMOUNTS.contains(&name) => parse_leading_int(text)
                .map(format_inr)
                .unwrap_or_else(|| text.clone()),
            Some(FlatValue::Text(text)) if field.is_some_and(|f| f.kind == FieldKind::Date) => {
                parse_date(text)
                    .map(|d| d.format("%d %b %Y").to_string())
                    .unwrap_or_else(|| text.clone())
            }
            Some(FlatValue::Text(text)) => label_of(text.as_str()),
            Some(FlatValue::List(values)) => values
                .iter()
                .map(|v| label_of(v.as_str()))
                .collect::<Vec<_>>()
                .join(", "),
            Some(FlatValue::Flag(true)) => "Yes".to_string(),
            Some(FlatValue::Flag(false)) => "No".to_string(),
            None => String::new(),
        }
    }

    fn label(&self, name: &'a str) -> &'a str {
        self.catalogue
            .field(name)
            .map(|f| f.label.as_str())
            .unwrap_or(name)
    }

    fn joined(&self, names: &[&str], separator: &str) -> String {
        names
            .iter()
            .map(|name| self.value(name))
            .filter(|v| !v.trim().is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn row(out: &mut String, label: &str, value: &str) {
        if !value.trim().is_empty() {
            let _ = writeln!(out, "  {label:<26}{value}");
        }
    }

    pub fn render_text(&self) -> String {
        let receipt = self.receipt;
        let rule = "=".repeat(WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{:^WIDTH$}", "COASTAL GRAND HOTEL");
        let _ = writeln!(out, "{:^WIDTH$}", "Membership Confirmation");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out);

        let _ = writeln!(out, "MEMBERSHIP");
        Self::row(&mut out, "Membership ID", &receipt.id);
        Self::row(
            &mut out,
            "Member",
            &self.joined(&["salutation", "firstName", "lastName"], " "),
        );
        Self::row(
            &mut out,
            "Category",
            &self.value("membershipCategory").to_uppercase(),
        );
        Self::row(&mut out, "Years", &self.value("membershipYears"));
        Self::row(&mut out, "Amount", &self.value("membershipPrice"));
        Self::row(&mut out, "Status", &receipt.status.to_uppercase());
        Self::row(
            &mut out,
            "Submitted",
            &receipt
                .submitted_at
                .with_timezone(&Local)
                .format("%d %b %Y, %I:%M %p")
                .to_string(),
        );

        for (heading, names) in SECTIONS {
            let _ = writeln!(out);
            let _ = writeln!(out, "{heading}");
            for name in *names {
                Self::row(&mut out, self.label(name), &self.value(name));
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "ADDRESS");
        Self::row(&mut out, "Address", &self.joined(ADDRESS, ", "));

        let _ = writeln!(out);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "Our membership team will contact you shortly. Please quote your"
        );
        let _ = writeln!(out, "membership ID in all correspondence.");
        out
    }

    /// Write the rendered report into `dir`, returning the file path
    pub fn export_to(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(self.file_name());
        storage::write_atomic(&path, &self.render_text())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::membership_catalogue;
    use crate::gateway::FlatFields;
    use chrono::{TimeZone, Utc};

    fn receipt() -> SubmissionReceipt {
        let mut data = FlatFields::new();
        let mut text = |name: &str, value: &str| {
            data.insert(name.to_string(), FlatValue::Text(value.to_string()));
        };
        text("salutation", "Ms.");
        text("firstName", "Asha");
        text("lastName", "Rao");
        text("dateOfBirth", "1990-05-01T00:00:00+00:00");
        text("contactEmail", "asha@example.com");
        text("city", "Panaji");
        text("country", "India");
        text("membershipCategory", "gold");
        text("membershipYears", "5");
        text("membershipPrice", "250000");
        SubmissionReceipt {
            id: "CM12345678AB3D".to_string(),
            submitted_at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            status: "pending".to_string(),
            data,
        }
    }

    mod rendering {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_report_lists_member_details() {
            let catalogue = membership_catalogue().unwrap();
            let receipt = receipt();
            let text = MemberReport::new(&receipt, &catalogue).render_text();
            assert!(text.contains("CM12345678AB3D"));
            assert!(text.contains("Asha Rao"));
            assert!(text.contains("₹2,50,000"));
            assert!(text.contains("01 May 1990"));
            assert!(text.contains("Panaji, India"));
            assert!(text.contains("PENDING"));
        }

        #[test]
        fn test_absent_fields_are_skipped() {
            let catalogue = membership_catalogue().unwrap();
            let receipt = receipt();
            let report = MemberReport::new(&receipt, &catalogue);
            assert_eq!(report.value("occupation"), "");
            let text = report.render_text();
            assert!(!text.contains(report.label("occupation")));
        }

        #[test]
        fn test_file_name_drops_unsafe_characters() {
            let catalogue = membership_catalogue().unwrap();
            let mut receipt = receipt();
            assert_eq!(
                MemberReport::new(&receipt, &catalogue).file_name(),
                "CM12345678AB3D.txt"
            );
            receipt.id = "../x".to_string();
            assert_eq!(MemberReport::new(&receipt, &catalogue).file_name(), "x.txt");
        }
    }

    mod export {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_export_writes_named_file() {
            let dir = tempfile::tempdir().unwrap();
            let catalogue = membership_catalogue().unwrap();
            let receipt = receipt();
            let report = MemberReport::new(&receipt, &catalogue);
            let path = report.export_to(dir.path()).unwrap();
            assert_eq!(path, dir.path().join("CM12345678AB3D.txt"));
            assert_eq!(std::fs::read_to_string(path).unwrap(), report.render_text());
        }
    }
}
