//! Trait abstraction for the submission stores to enable mocking in tests

use async_trait::async_trait;
use thiserror::Error;

use super::types::{FlatFields, ListPage, ListQuery, Submission, SubmissionReceipt};

/// Failures reported by a gateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("membership {0} not found")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("{0}")]
    Rejected(String),
}

/// Accepts finished applications
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    /// Store a flattened draft, stamping id, time and status
    async fn create(&self, fields: FlatFields) -> Result<SubmissionReceipt, GatewayError>;
}

/// Read and delete access for the admin console
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminGateway: Send + Sync {
    /// List one page of submission summaries
    async fn list(&self, query: ListQuery) -> Result<ListPage, GatewayError>;

    /// Fetch a full submission
    async fn get_one(&self, id: &str) -> Result<Submission, GatewayError>;

    /// Remove a submission
    async fn delete(&self, id: &str) -> Result<(), GatewayError>;
}
