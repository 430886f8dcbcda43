//! Application state module

mod app_state;
mod form_state;
mod loader_state;
mod terms_state;

pub use app_state::*;
pub use form_state::{Form, StepForm};
pub use loader_state::LoaderState;
pub use terms_state::{TermsState, TERMS_VISIBLE_ROWS};
