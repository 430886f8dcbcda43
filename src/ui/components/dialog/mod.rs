//! Dialog components for TUI

mod base;
mod confirm_dialog;
mod error_dialog;
mod loader_dialog;
mod terms_dialog;

pub use confirm_dialog::render_confirm_dialog;
pub use error_dialog::render_error_dialog;
pub use loader_dialog::render_loader_dialog;
pub use terms_dialog::render_terms_dialog;
