//! UI module for rendering the TUI

mod admin;
mod components;
mod confirmation;
mod forms;
mod layout;
mod report;
mod widgets;
mod wizard;

use crate::app::App;
use crate::state::View;
use components::{
    render_confirm_dialog, render_error_dialog, render_loader_dialog, render_terms_dialog,
};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    // Draw main content based on current view
    match app.state.current_view {
        View::Wizard => wizard::draw(frame, main_area, app),
        View::Confirmation => confirmation::draw(frame, main_area, app),
        View::Admin => admin::draw_list(frame, main_area, app),
        View::AdminDetail => admin::draw_detail(frame, main_area, app),
        View::Report => report::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Modal overlays, most urgent last
    if let Some(terms) = &app.state.terms {
        render_terms_dialog(frame, terms, app.wizard.terms_accepted());
    }
    if let Some(action) = &app.state.pending_delete {
        render_confirm_dialog(frame, action);
    }
    if let Some(loader) = &app.state.loader {
        render_loader_dialog(frame, loader);
    }
    if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error);
    }
}
