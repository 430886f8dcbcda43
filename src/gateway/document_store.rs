//! JSON-file document collection holding submitted applications
//!
//! The whole collection lives in memory behind a mutex and is rewritten
//! atomically after every change. A store opened without a path never
//! touches the disk.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::traits::{AdminGateway, GatewayError, SubmissionGateway};
use super::types::{
    parse_leading_int, FlatFields, ListPage, ListQuery, SortDirection, SortField, Submission,
    SubmissionReceipt, PENDING_STATUS,
};
use crate::storage;

/// File name of the collection inside the data directory
pub const COLLECTION_FILE: &str = "memberships.json";

const ID_PREFIX: &str = "CM";

/// Membership id: prefix, last 8 digits of the millisecond clock, then 4
/// random uppercase alphanumerics.
pub fn generate_membership_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().unsigned_abs().to_string();
    let clock = &millis[millis.len().saturating_sub(8)..];
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(4)
        .collect::<String>()
        .to_uppercase();
    format!("{ID_PREFIX}{clock}{suffix}")
}

pub struct DocumentStore {
    path: Option<PathBuf>,
    documents: Mutex<Vec<Submission>>,
}

impl DocumentStore {
    /// A store that keeps documents in memory only
    pub fn in_memory() -> Self {
        Self {
            path: None,
            documents: Mutex::new(Vec::new()),
        }
    }

    /// Open (or start) the collection at `path`. An unreadable or corrupt
    /// file is an error, not an empty collection.
    pub fn open(path: &Path) -> Result<Self, GatewayError> {
        let documents = match storage::read_optional(path).map_err(storage_error)? {
            Some(contents) if !contents.trim().is_empty() => {
                serde_json::from_str(&contents).map_err(|e| {
                    GatewayError::Storage(format!("{}: {}", path.display(), e))
                })?
            }
            _ => Vec::new(),
        };
        info!(path = %path.display(), "opened membership collection");
        Ok(Self {
            path: Some(path.to_path_buf()),
            documents: Mutex::new(documents),
        })
    }

    pub fn document_count(&self) -> usize {
        self.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    /// Insert an already stamped document
    pub fn insert(&self, submission: Submission) -> Result<(), GatewayError> {
        let mut docs = self.lock()?;
        docs.push(submission);
        self.persist(&docs)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Submission>>, GatewayError> {
        self.documents
            .lock()
            .map_err(|_| GatewayError::Storage("collection lock poisoned".to_string()))
    }

    fn persist(&self, docs: &[Submission]) -> Result<(), GatewayError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(docs)
            .map_err(|e| GatewayError::Storage(e.to_string()))?;
        storage::write_atomic(path, &json).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to write collection");
            storage_error(e)
        })
    }
}

fn storage_error(e: std::io::Error) -> GatewayError {
    GatewayError::Storage(e.to_string())
}

fn compare(a: &Submission, b: &Submission, field: SortField) -> Ordering {
    match field {
        SortField::SubmittedAt => a.submitted_at.cmp(&b.submitted_at),
        SortField::MembershipPrice => {
            let price = |s: &Submission| parse_leading_int(s.text("membershipPrice")).unwrap_or(0);
            price(a).cmp(&price(b))
        }
        SortField::FirstName | SortField::MembershipCategory | SortField::City => a
            .text(field.as_key())
            .to_lowercase()
            .cmp(&b.text(field.as_key()).to_lowercase()),
    }
}

#[async_trait]
impl SubmissionGateway for DocumentStore {
    async fn create(&self, fields: FlatFields) -> Result<SubmissionReceipt, GatewayError> {
        let now = Utc::now();
        let submission = Submission {
            id: generate_membership_id(now),
            submitted_at: now,
            status: PENDING_STATUS.to_string(),
            fields,
        };
        let receipt = SubmissionReceipt::from(&submission);
        self.insert(submission)?;
        info!(id = %receipt.id, "membership application stored");
        Ok(receipt)
    }
}

#[async_trait]
impl AdminGateway for DocumentStore {
    async fn list(&self, query: ListQuery) -> Result<ListPage, GatewayError> {
        let mut docs = self.lock()?.clone();
        docs.sort_by(|a, b| {
            let ord = compare(a, b, query.sort_field);
            match query.sort_direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        let total = docs.len();
        let items = docs
            .iter()
            .skip(query.skip)
            .take(query.limit)
            .map(Submission::to_list_item)
            .collect();
        debug!(
            skip = query.skip,
            limit = query.limit,
            sort = query.sort_field.as_key(),
            total,
            "listed memberships"
        );
        Ok(ListPage::new(items, &query, total))
    }

    async fn get_one(&self, id: &str) -> Result<Submission, GatewayError> {
        self.lock()?
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        let mut docs = self.lock()?;
        let Some(pos) = docs.iter().position(|s| s.id == id) else {
            return Err(GatewayError::NotFound(id.to_string()));
        };
        docs.remove(pos);
        self.persist(&docs)?;
        info!(id, "membership deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::FlatValue;
    use chrono::TimeZone;

    fn doc(n: usize, first: &str, price: &str) -> Submission {
        let mut fields = FlatFields::new();
        fields.insert("firstName".into(), FlatValue::Text(first.into()));
        fields.insert("lastName".into(), FlatValue::Text("Member".into()));
        fields.insert("membershipPrice".into(), FlatValue::Text(price.into()));
        Submission {
            id: format!("CM{n:08}"),
            submitted_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::minutes(n as i64),
            status: PENDING_STATUS.into(),
            fields,
        }
    }

    fn seeded(count: usize) -> DocumentStore {
        let store = DocumentStore::in_memory();
        for n in 0..count {
            store.insert(doc(n, &format!("Member{n}"), "1000")).unwrap();
        }
        store
    }

    mod test_ids {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_membership_id_shape() {
            let now = Utc.timestamp_millis_opt(1_718_000_123_456).unwrap();
            let id = generate_membership_id(now);
            assert!(id.starts_with("CM00123456"));
            assert_eq!(id.len(), 2 + 8 + 4);
            assert!(id[10..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }

    mod test_list {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_pagination_reports_has_more() {
            let store = seeded(25);
            let first = store.list(ListQuery::default()).await.unwrap();
            assert_eq!(first.total, 25);
            assert_eq!(first.items.len(), 10);
            assert!(first.has_more);

            let last = store
                .list(ListQuery {
                    skip: 20,
                    ..ListQuery::default()
                })
                .await
                .unwrap();
            assert_eq!(last.items.len(), 5);
            assert!(!last.has_more);
        }

        #[tokio::test]
        async fn test_default_sort_is_newest_first() {
            let store = seeded(3);
            let page = store.list(ListQuery::default()).await.unwrap();
            let ids: Vec<_> = page.items.iter().map(|i| i.membership_id.as_str()).collect();
            assert_eq!(ids, vec!["CM00000002", "CM00000001", "CM00000000"]);
        }

        #[tokio::test]
        async fn test_price_sorts_numerically() {
            let store = DocumentStore::in_memory();
            store.insert(doc(0, "A", "900")).unwrap();
            store.insert(doc(1, "B", "150000")).unwrap();
            store.insert(doc(2, "C", "not a price")).unwrap();
            let page = store
                .list(ListQuery {
                    sort_field: SortField::MembershipPrice,
                    sort_direction: SortDirection::Asc,
                    ..ListQuery::default()
                })
                .await
                .unwrap();
            let names: Vec<_> = page.items.iter().map(|i| i.name.as_str()).collect();
            assert_eq!(names, vec!["C Member", "A Member", "B Member"]);
        }
    }

    mod test_crud {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_create_stamps_pending_status() {
            let store = DocumentStore::in_memory();
            let mut fields = FlatFields::new();
            fields.insert("firstName".into(), FlatValue::Text("Asha".into()));
            let receipt = store.create(fields.clone()).await.unwrap();
            assert!(receipt.id.starts_with("CM"));
            assert_eq!(receipt.status, "pending");
            assert_eq!(receipt.data, fields);

            let stored = store.get_one(&receipt.id).await.unwrap();
            assert_eq!(stored.text("firstName"), "Asha");
        }

        #[tokio::test]
        async fn test_delete_then_list_hides_item() {
            let store = seeded(2);
            store.delete("CM00000001").await.unwrap();
            let page = store.list(ListQuery::default()).await.unwrap();
            assert_eq!(page.total, 1);
            assert_eq!(
                store.delete("CM00000001").await,
                Err(GatewayError::NotFound("CM00000001".into()))
            );
            assert!(matches!(
                store.get_one("nope").await,
                Err(GatewayError::NotFound(_))
            ));
        }

        #[tokio::test]
        async fn test_collection_survives_reopen() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join(COLLECTION_FILE);
            let id = {
                let store = DocumentStore::open(&path).unwrap();
                assert_eq!(store.document_count(), 0);
                let mut fields = FlatFields::new();
                fields.insert("city".into(), FlatValue::Text("Goa".into()));
                store.create(fields).await.unwrap().id
            };
            let reopened = DocumentStore::open(&path).unwrap();
            assert_eq!(reopened.document_count(), 1);
            assert_eq!(reopened.get_one(&id).await.unwrap().text("city"), "Goa");
        }

        #[test]
        fn test_corrupt_collection_is_an_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join(COLLECTION_FILE);
            std::fs::write(&path, "not json").unwrap();
            assert!(matches!(
                DocumentStore::open(&path),
                Err(GatewayError::Storage(_))
            ));
        }
    }
}
