//! Gateways to the persisted membership collection

mod document_store;
mod traits;
mod types;

pub use document_store::{DocumentStore, COLLECTION_FILE};
pub use traits::{AdminGateway, GatewayError, SubmissionGateway};
pub use types::{
    parse_leading_int, AdminListItem, FlatFields, FlatValue, ListPage, ListQuery, SortDirection,
    SortField, Submission, SubmissionReceipt, PENDING_STATUS,
};

#[cfg(test)]
pub use traits::{MockAdminGateway, MockSubmissionGateway};
