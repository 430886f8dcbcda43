//! Application state types

use std::collections::VecDeque;

use super::terms_state::{TermsState, TERMS_VISIBLE_ROWS};
use super::{LoaderState, StepForm};
use crate::admin::{filter_page, ReportDocument};
use crate::catalogue::TERMS_LINES;
use crate::gateway::{AdminListItem, ListPage, Submission};

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Wizard,
    Confirmation,
    Admin,
    AdminDetail,
    Report,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Wizard => "Membership Application",
            Self::Confirmation => "Application Received",
            Self::Admin => "Admin Dashboard",
            Self::AdminDetail => "Member Details",
            Self::Report => "Membership Report",
        }
    }

    /// Whether the view belongs to the admin console
    pub fn is_admin_view(&self) -> bool {
        matches!(self, Self::Admin | Self::AdminDetail | Self::Report)
    }
}

/// Pending delete confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeleteAction {
    pub membership_id: String,
    pub display_name: String,
    /// `true` when "Delete" is highlighted
    pub selected_option: bool,
}

impl PendingDeleteAction {
    pub fn for_item(item: &AdminListItem) -> Self {
        Self {
            membership_id: item.membership_id.clone(),
            display_name: item.name.clone(),
            selected_option: false,
        }
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,

    // Wizard
    pub form: StepForm,
    /// Open terms dialog
    pub terms: Option<TermsState>,
    pub loader: Option<LoaderState>,

    // Admin listing
    pub admin_page: Option<ListPage>,
    pub selected_index: usize,
    pub search_term: String,
    pub search_active: bool,
    pub detail: Option<Submission>,
    pub pending_delete: Option<PendingDeleteAction>,

    // Report
    pub report: Option<ReportDocument>,
    pub scroll_offset: usize,

    // Feedback
    errors: VecDeque<String>,
    pub status_message: Option<String>,
}

impl AppState {
    /// Fresh state showing `form` in the wizard
    pub fn with_form(form: StepForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// Open the terms dialog at the top of the text
    pub fn open_terms(&mut self) {
        self.terms = Some(TermsState::new(TERMS_LINES.len(), TERMS_VISIBLE_ROWS));
    }

    /// Queue an error for the modal error dialog
    pub fn push_error(&mut self, message: String) {
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Rows of the fetched page that match the search term
    pub fn visible_items(&self) -> Vec<&AdminListItem> {
        self.admin_page
            .as_ref()
            .map(|page| filter_page(&page.items, &self.search_term))
            .unwrap_or_default()
    }

    pub fn selected_item(&self) -> Option<&AdminListItem> {
        self.visible_items().get(self.selected_index).copied()
    }

    /// Keep the selection inside the visible rows
    pub fn clamp_selection(&mut self) {
        let count = self.visible_items().len();
        self.selected_index = self.selected_index.min(count.saturating_sub(1));
    }

    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn scroll_down(&mut self, max: usize) {
        if self.scroll_offset + 1 < max {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::tests::item;

    fn state_with_page() -> AppState {
        let items = vec![
            item("CM001", "Asha Rao", "Panaji", "150000"),
            item("CM002", "Vikram Shah", "Mumbai", "500000"),
            item("CM003", "Meera Iyer", "Mumbai", "250000"),
        ];
        AppState {
            admin_page: Some(ListPage {
                total: items.len(),
                items,
                has_more: false,
            }),
            ..Default::default()
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn test_errors_are_queued_in_order() {
            let mut state = AppState::default();
            assert!(!state.has_errors());
            state.push_error("first".to_string());
            state.push_error("second".to_string());
            assert_eq!(state.current_error(), Some("first"));
            state.dismiss_error();
            assert_eq!(state.current_error(), Some("second"));
            state.dismiss_error();
            assert!(!state.has_errors());
        }
    }

    mod selection {
        use super::*;

        #[test]
        fn test_selection_stays_in_bounds() {
            let mut state = state_with_page();
            state.move_selection_up();
            assert_eq!(state.selected_index, 0);
            for _ in 0..5 {
                state.move_selection_down(3);
            }
            assert_eq!(state.selected_index, 2);
        }

        #[test]
        fn test_search_narrows_visible_rows() {
            let mut state = state_with_page();
            state.selected_index = 2;
            state.search_term = "mumbai".to_string();
            state.clamp_selection();
            assert_eq!(state.visible_items().len(), 2);
            assert_eq!(state.selected_index, 1);
            assert_eq!(
                state.selected_item().map(|i| i.membership_id.as_str()),
                Some("CM003")
            );
        }

        #[test]
        fn test_no_page_means_no_selection() {
            let state = AppState::default();
            assert!(state.selected_item().is_none());
        }
    }

    mod views {
        use super::*;
        use crate::catalogue::tests::small_catalogue;

        #[test]
        fn test_with_form_starts_clean() {
            let form = StepForm::for_step(&small_catalogue(), 1);
            let state = AppState::with_form(form);
            assert_eq!(state.form.step(), 1);
            assert_eq!(state.current_view, View::Wizard);
            assert!(!state.has_errors());
            assert!(state.terms.is_none());
        }

        #[test]
        fn test_terms_open_at_the_top_and_locked() {
            let mut state = AppState::default();
            state.open_terms();
            let terms = state.terms.expect("terms open");
            assert_eq!(terms.scroll(), 0);
            assert!(!terms.can_accept());
        }

        #[test]
        fn test_default_view_is_wizard() {
            assert_eq!(View::default(), View::Wizard);
            assert!(!View::Wizard.is_admin_view());
            assert!(View::Report.is_admin_view());
        }
    }
}
