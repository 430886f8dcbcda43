//! Multi-step membership wizard: draft values, validation, persistence and
//! the controller that ties them together.

mod controller;
mod draft;
mod store;
mod validation;
mod value;

pub use controller::{
    NavigationError, SubmissionPhase, SubmitOutcome, SubmitRejection, WizardController,
};
pub use draft::parse_date;
pub use store::{DraftSlot, DraftStore, FileDraftSlot};
pub use value::FieldValue;

#[cfg(test)]
pub use store::MemorySlot;
