//! Records exchanged with the submission and admin gateways

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One flattened field value as the gateway stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlatValue {
    Flag(bool),
    List(Vec<String>),
    Text(String),
}

impl FlatValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Integer prefix of a price string: `"150000 INR"` is 150000, `"abc"` is None
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Flattened draft, keyed by field name
pub type FlatFields = BTreeMap<String, FlatValue>;

/// Status stamped on every new submission
pub const PENDING_STATUS: &str = "pending";

/// A stored membership application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
    pub status: String,
    #[serde(flatten)]
    pub fields: FlatFields,
}

impl Submission {
    pub fn text(&self, name: &str) -> &str {
        self.fields
            .get(name)
            .and_then(FlatValue::as_text)
            .unwrap_or("")
    }

    /// Summary row shown in the admin listing
    pub fn to_list_item(&self) -> AdminListItem {
        let name = format!("{} {}", self.text("firstName"), self.text("lastName"))
            .trim()
            .to_string();
        AdminListItem {
            membership_id: self.id.clone(),
            name,
            email: self.text("contactEmail").to_string(),
            mobile: self.text("contactMobile").to_string(),
            membership_category: self.text("membershipCategory").to_string(),
            membership_years: self.text("membershipYears").to_string(),
            membership_price: self.text("membershipPrice").to_string(),
            payment_mode: self.text("paymentMode").to_string(),
            status: self.status.clone(),
            submitted_at: self.submitted_at,
            city: self.text("city").to_string(),
            state: self.text("state").to_string(),
        }
    }
}

/// Gateway answer to an accepted submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
    pub status: String,
    pub data: FlatFields,
}

impl From<&Submission> for SubmissionReceipt {
    fn from(submission: &Submission) -> Self {
        Self {
            id: submission.id.clone(),
            submitted_at: submission.submitted_at,
            status: submission.status.clone(),
            data: submission.fields.clone(),
        }
    }
}

/// Read projection of a submission for the admin listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminListItem {
    pub membership_id: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub membership_category: String,
    pub membership_years: String,
    pub membership_price: String,
    pub payment_mode: String,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub city: String,
    pub state: String,
}

/// Sort field for the admin listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    SubmittedAt,
    FirstName,
    MembershipCategory,
    MembershipPrice,
    City,
}

impl SortField {
    pub fn next(&self) -> Self {
        match self {
            Self::SubmittedAt => Self::FirstName,
            Self::FirstName => Self::MembershipCategory,
            Self::MembershipCategory => Self::MembershipPrice,
            Self::MembershipPrice => Self::City,
            Self::City => Self::SubmittedAt,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SubmittedAt => "Submitted",
            Self::FirstName => "Name",
            Self::MembershipCategory => "Category",
            Self::MembershipPrice => "Price",
            Self::City => "City",
        }
    }

    /// Field name used by the store and the config file
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::SubmittedAt => "submittedAt",
            Self::FirstName => "firstName",
            Self::MembershipCategory => "membershipCategory",
            Self::MembershipPrice => "membershipPrice",
            Self::City => "city",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "submittedAt" => Some(Self::SubmittedAt),
            "firstName" => Some(Self::FirstName),
            "membershipCategory" => Some(Self::MembershipCategory),
            "membershipPrice" => Some(Self::MembershipPrice),
            "city" => Some(Self::City),
            _ => None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Parameters of one admin listing call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: usize,
    pub skip: usize,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            skip: 0,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
        }
    }
}

/// One page of the admin listing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListPage {
    pub items: Vec<AdminListItem>,
    pub total: usize,
    pub has_more: bool,
}

impl ListPage {
    pub fn new(items: Vec<AdminListItem>, query: &ListQuery, total: usize) -> Self {
        Self {
            items,
            total,
            has_more: query.skip.saturating_add(query.limit) < total,
        }
    }
}
