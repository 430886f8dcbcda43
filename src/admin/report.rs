//! Printable membership report

use chrono::{DateTime, Local, Utc};
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use crate::gateway::{parse_leading_int, AdminListItem};
use crate::storage;

/// Categories counted in the summary, in display order
pub const CATEGORIES: [&str; 5] = ["bronze", "silver", "gold", "platinum", "diamond"];

const TITLE_PREFIX: &str = "Coastal-Grand-Hotel-Membership-Report";

/// One member row with the fields the listing projection lacks filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub membership_id: String,
    pub member_type: String,
    pub salutation: String,
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    pub contact_email: String,
    pub contact_mobile: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub membership_category: String,
    pub membership_years: String,
    pub membership_price: String,
    pub payment_mode: String,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

impl ReportRow {
    fn from_item(item: &AdminListItem) -> Self {
        let mut names = item.name.split_whitespace();
        let first_name = names.next().unwrap_or_default().to_string();
        let last_name = names.collect::<Vec<_>>().join(" ");
        Self {
            membership_id: item.membership_id.clone(),
            member_type: "individual".to_string(),
            salutation: String::new(),
            first_name,
            last_name,
            profession: String::new(),
            contact_email: item.email.clone(),
            contact_mobile: item.mobile.clone(),
            city: item.city.clone(),
            state: item.state.clone(),
            country: "India".to_string(),
            membership_category: item.membership_category.clone(),
            membership_years: item.membership_years.clone(),
            membership_price: item.membership_price.clone(),
            payment_mode: item.payment_mode.clone(),
            status: item.status.clone(),
            submitted_at: item.submitted_at,
        }
    }

    pub fn display_name(&self) -> String {
        let mut name = String::new();
        if !self.salutation.is_empty() {
            name.push_str(&self.salutation);
            name.push(' ');
        }
        name.push_str(&self.first_name);
        if !self.last_name.is_empty() {
            name.push(' ');
            name.push_str(&self.last_name);
        }
        name
    }

    fn amount(&self) -> String {
        parse_leading_int(&self.membership_price)
            .map(format_inr)
            .unwrap_or_else(|| "-".to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
    /// Count per entry of [`CATEGORIES`]
    pub category_counts: [usize; 5],
    pub total_revenue: i64,
}

/// Aggregate the rows. Missing or unparseable prices add nothing.
pub fn build_report(items: &[AdminListItem]) -> ReportDocument {
    let rows: Vec<ReportRow> = items.iter().map(ReportRow::from_item).collect();
    let mut category_counts = [0; 5];
    for row in &rows {
        let category = row.membership_category.to_lowercase();
        if let Some(pos) = CATEGORIES.iter().position(|c| *c == category) {
            category_counts[pos] += 1;
        }
    }
    let total_revenue = sum_prices(rows.iter().map(|r| r.membership_price.as_str()));
    ReportDocument {
        generated_at: Utc::now(),
        rows,
        category_counts,
        total_revenue,
    }
}

/// Sum of price texts by their leading integer, saturating at the `i64`
/// bounds. Missing or unparseable prices add nothing.
pub fn sum_prices<'a>(prices: impl IntoIterator<Item = &'a str>) -> i64 {
    prices
        .into_iter()
        .map(|p| parse_leading_int(p).unwrap_or(0))
        .fold(0i64, i64::saturating_add)
}

/// Rupee amount with Indian digit grouping: 1500000 is `₹15,00,000`
pub fn format_inr(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}₹{grouped}")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ReportDocument {
    pub fn title(&self) -> String {
        format!(
            "{}-{}",
            TITLE_PREFIX,
            self.generated_at.with_timezone(&Local).format("%Y-%m-%d")
        )
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.title())
    }

    /// Plain-text rendering used for the on-screen preview and the export
    pub fn render_text(&self) -> String {
        let generated = self.generated_at.with_timezone(&Local);
        let mut out = String::new();
        let rule = "=".repeat(100);

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{:^100}", "COASTAL GRAND HOTEL");
        let _ = writeln!(out, "{:^100}", "Membership Report");
        let _ = writeln!(
            out,
            "{:^100}",
            format!("Generated on: {}", generated.format("%d %b %Y, %I:%M %p"))
        );
        let _ = writeln!(out, "{:^100}", format!("Total Members: {}", self.rows.len()));
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out);

        let _ = writeln!(out, "SUMMARY STATISTICS");
        let _ = writeln!(out, "  {:<16}{}", "Total Members", self.rows.len());
        for (category, count) in CATEGORIES.iter().zip(self.category_counts) {
            let _ = writeln!(out, "  {:<16}{}", format!("{} Members", capitalize(category)), count);
        }
        let _ = writeln!(out, "  {:<16}{}", "Total Revenue", format_inr(self.total_revenue));
        let _ = writeln!(out);

        let _ = writeln!(out, "MEMBER DETAILS");
        let _ = writeln!(
            out,
            "{:<15} {:<22} {:<28} {:<12} {:<9} {:<5} {:>12}  {:<22} {:<12} {:<12} {}",
            "ID", "Name", "Email", "Mobile", "Category", "Years", "Amount", "Location",
            "Occupation", "Payment", "Date"
        );
        let _ = writeln!(out, "{}", "-".repeat(170));
        for row in &self.rows {
            let location = match (row.city.is_empty(), row.state.is_empty()) {
                (false, false) => format!("{}, {}", row.city, row.state),
                (false, true) => row.city.clone(),
                _ => row.state.clone(),
            };
            let occupation = if row.profession.is_empty() {
                "N/A"
            } else {
                row.profession.as_str()
            };
            let _ = writeln!(
                out,
                "{:<15} {:<22} {:<28} {:<12} {:<9} {:<5} {:>12}  {:<22} {:<12} {:<12} {}",
                row.membership_id,
                row.display_name(),
                row.contact_email,
                row.contact_mobile,
                row.membership_category.to_uppercase(),
                row.membership_years,
                row.amount(),
                location,
                occupation,
                row.payment_mode,
                row.submitted_at
                    .with_timezone(&Local)
                    .format("%d %b %Y, %H:%M")
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "This report was generated automatically by the Coastal Grand Hotel Membership Management System"
        );
        let _ = writeln!(
            out,
            "(c) {} Coastal Grand Hotel. All rights reserved.",
            generated.format("%Y")
        );
        out
    }

    /// Write the rendered report into `dir`, returning the file path
    pub fn export_to(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(self.file_name());
        storage::write_atomic(&path, &self.render_text())?;
        Ok(path)
    }
}
