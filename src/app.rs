//! Application state and core logic

use crate::admin::{AdminService, DeleteOutcome, MemberReport, Pager};
use crate::catalogue::{membership_catalogue, Catalogue, FieldDescriptor, FieldKind};
use crate::config::MembershipConfig;
use crate::gateway::{
    DocumentStore, GatewayError, SubmissionGateway, SubmissionReceipt, COLLECTION_FILE,
};
use crate::platform::has_shortcut_modifier;
use crate::state::{AppState, Form, LoaderState, PendingDeleteAction, StepForm, View};
use crate::wizard::{
    parse_date, DraftSlot, DraftStore, FieldValue, FileDraftSlot, NavigationError,
    SubmitOutcome, SubmitRejection, WizardController,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Second Ctrl+C within this window quits
const QUIT_WINDOW: Duration = Duration::from_secs(1);

/// Longest accepted date entry (`YYYY-MM-DD`)
const DATE_INPUT_LEN: usize = 10;

type SubmissionResult = Result<SubmissionReceipt, GatewayError>;

/// A gateway call running on the runtime
struct PendingSubmission {
    rx: oneshot::Receiver<SubmissionResult>,
    result: Option<SubmissionResult>,
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Wizard controller holding the draft
    pub wizard: WizardController,
    /// Admin operations over the collection
    admin: AdminService,
    /// Collection receiving submissions
    store: Arc<DocumentStore>,
    /// Listing position and sort order
    pub pager: Pager,
    config: MembershipConfig,
    /// Write sort changes back to the config file
    persist_config: bool,
    data_dir: PathBuf,
    pending_submission: Option<PendingSubmission>,
    /// Whether the app should quit
    quit: bool,
    /// Timestamp of last Ctrl+C press for double-tap quit
    pub last_ctrl_c: Option<Instant>,
}

impl App {
    /// Create the application over the configured data directory
    pub fn new(config: MembershipConfig) -> Result<Self> {
        let data_dir = config.data_dir();
        std::fs::create_dir_all(&data_dir)?;
        let catalogue = Arc::new(membership_catalogue()?);
        let store = Arc::new(DocumentStore::open(&data_dir.join(COLLECTION_FILE))?);
        let slot = Box::new(FileDraftSlot::in_dir(&data_dir));
        let mut app = Self::with_parts(config, data_dir, catalogue, store, slot);
        app.persist_config = true;
        Ok(app)
    }

    /// Assemble the application from already opened parts
    pub fn with_parts(
        config: MembershipConfig,
        data_dir: PathBuf,
        catalogue: Arc<Catalogue>,
        store: Arc<DocumentStore>,
        slot: Box<dyn DraftSlot>,
    ) -> Self {
        let draft_store = DraftStore::new(slot, Arc::clone(&catalogue));
        let wizard = WizardController::new(catalogue, draft_store, config.debounce());
        let state =
            AppState::with_form(StepForm::for_step(wizard.catalogue(), wizard.current_step()));
        let admin = AdminService::new(store.clone());
        let pager = Pager::new(
            config.page_size(),
            config.sort_field(),
            config.sort_direction(),
        );
        Self {
            state,
            wizard,
            admin,
            store,
            pager,
            config,
            persist_config: false,
            data_dir,
            pending_submission: None,
            quit: false,
            last_ctrl_c: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Whether the submission loader is on screen
    pub fn is_submitting(&self) -> bool {
        self.state.loader.is_some()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.state.status_message = Some(message.into());
    }

    /// Periodic work: debounced draft writes and submission polling
    pub fn tick(&mut self, now: Instant) {
        self.wizard.tick(now);
        self.poll_submission(now);
    }

    fn request_quit(&mut self) {
        self.wizard.flush();
        info!("quitting");
        self.quit = true;
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Global quit: Ctrl+C twice
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            let now = Instant::now();
            match self.last_ctrl_c {
                Some(last) if now.duration_since(last) < QUIT_WINDOW => self.request_quit(),
                _ => {
                    self.last_ctrl_c = Some(now);
                    self.set_status("Press Ctrl+C again to quit");
                }
            }
            return Ok(());
        }

        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
                self.wizard.acknowledge_failure();
            }
            return Ok(());
        }

        // Nothing is accepted while a submission is in flight
        if self.is_submitting() {
            return Ok(());
        }

        if self.state.terms.is_some() {
            self.handle_terms_key(key);
            return Ok(());
        }

        if self.state.pending_delete.is_some() {
            self.handle_delete_dialog_key(key).await?;
            return Ok(());
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        if key.code == KeyCode::F(2) {
            if self.state.current_view.is_admin_view() {
                self.state.current_view = View::Wizard;
            } else if self.state.current_view == View::Wizard {
                self.open_admin().await;
            }
            return Ok(());
        }

        match self.state.current_view {
            View::Wizard => self.handle_wizard_key(key),
            View::Confirmation => self.handle_confirmation_key(key),
            View::Admin => self.handle_admin_key(key).await?,
            View::AdminDetail => self.handle_admin_detail_key(key),
            View::Report => self.handle_report_key(key),
        }

        Ok(())
    }

    // Wizard

    /// Rebuild the step form when the controller moved to another step
    fn sync_form(&mut self) {
        if self.state.form.step() != self.wizard.current_step() {
            self.state.form =
                StepForm::for_step(self.wizard.catalogue(), self.wizard.current_step());
        }
    }

    /// Focus the first field the last gate rejected
    fn focus_first_violation(&mut self) {
        let violations = self.wizard.violations();
        let first = self
            .state
            .form
            .field_names()
            .iter()
            .find(|name| violations.get(name).is_some())
            .cloned();
        if let Some(name) = first {
            self.state.form.focus(&name);
        }
    }

    fn active_descriptor(&self) -> Option<FieldDescriptor> {
        let name = self.state.form.active_name()?;
        self.wizard.catalogue().field(name).cloned()
    }

    fn active_value(&self, field: &FieldDescriptor) -> FieldValue {
        self.wizard
            .value(&field.name)
            .unwrap_or_else(|| FieldValue::empty_for(field))
    }

    fn apply_edit(&mut self, name: &str, value: FieldValue) {
        if let Err(e) = self.wizard.edit_field(name, value) {
            self.set_status(e.to_string());
        }
    }

    fn handle_wizard_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if has_shortcut_modifier(key.modifiers) {
            match key.code {
                KeyCode::Char('n') => {
                    self.next_step();
                    return;
                }
                KeyCode::Char('p') => {
                    self.previous_step();
                    return;
                }
                _ => {}
            }
        }

        if ctrl {
            match key.code {
                KeyCode::Char('t') => self.state.open_terms(),
                KeyCode::Char('s') => self.start_submission(),
                KeyCode::Char('r') => {
                    self.wizard.reset_all();
                    self.state.form = StepForm::for_step(self.wizard.catalogue(), 0);
                    self.set_status("Form cleared");
                }
                _ => {}
            }
            return;
        }

        if key.modifiers.contains(KeyModifiers::ALT) {
            if let KeyCode::Char(c) = key.code {
                if let Some(digit) = c.to_digit(10).filter(|d| *d >= 1) {
                    self.jump_to_step(digit as usize - 1);
                }
            }
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.state.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.state.form.prev_field(),
            KeyCode::Left | KeyCode::Right => {
                if let Some(field) = self.active_descriptor() {
                    self.state
                        .form
                        .move_option(key.code == KeyCode::Right, field.options.len());
                }
            }
            KeyCode::Char(' ') => match self.active_descriptor() {
                Some(field) if field.kind.is_typed() => self.type_char(&field, ' '),
                Some(field) => self.pick_option(&field),
                None => {}
            },
            KeyCode::Enter => match self.active_descriptor() {
                Some(field) if field.kind == FieldKind::Textarea => self.type_char(&field, '\n'),
                Some(field) if !field.kind.is_typed() => self.pick_option(&field),
                _ => self.state.form.next_field(),
            },
            KeyCode::Backspace => {
                if let Some(field) = self.active_descriptor() {
                    self.delete_char(&field);
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.active_descriptor() {
                    if field.kind.is_typed() {
                        self.type_char(&field, c);
                    }
                }
            }
            _ => {}
        }
    }

    fn type_char(&mut self, field: &FieldDescriptor, c: char) {
        let current = self.active_value(field);
        let next = match field.kind {
            FieldKind::Text | FieldKind::Textarea => {
                let mut text = current.as_text().to_string();
                text.push(c);
                FieldValue::Text(text)
            }
            FieldKind::Signature => {
                let mut text = current.as_text().to_string();
                text.push(c);
                FieldValue::Signature(text)
            }
            FieldKind::Date => {
                if !(c.is_ascii_digit() || c == '-') {
                    return;
                }
                let buffer = self.state.form.date_buffer_mut(&field.name, &current);
                if buffer.len() >= DATE_INPUT_LEN {
                    return;
                }
                buffer.push(c);
                FieldValue::Date(parse_date(buffer))
            }
            _ => return,
        };
        self.apply_edit(&field.name, next);
    }

    fn delete_char(&mut self, field: &FieldDescriptor) {
        let current = self.active_value(field);
        let next = match field.kind {
            FieldKind::Text | FieldKind::Textarea => {
                let mut text = current.as_text().to_string();
                text.pop();
                FieldValue::Text(text)
            }
            FieldKind::Signature => {
                let mut text = current.as_text().to_string();
                text.pop();
                FieldValue::Signature(text)
            }
            FieldKind::Date => {
                let buffer = self.state.form.date_buffer_mut(&field.name, &current);
                buffer.pop();
                FieldValue::Date(parse_date(buffer))
            }
            _ => return,
        };
        self.apply_edit(&field.name, next);
    }

    /// Pick, toggle or check the highlighted option of a choice field
    fn pick_option(&mut self, field: &FieldDescriptor) {
        let option = field
            .options
            .get(self.state.form.option_cursor())
            .map(|o| o.value.clone());
        let result = match (field.kind, option) {
            (FieldKind::Checkbox, _) if !field.is_checkbox_group() => {
                let checked = matches!(self.active_value(field), FieldValue::Flag(true));
                self.wizard
                    .edit_field(&field.name, FieldValue::Flag(!checked))
            }
            (_, Some(option)) if field.holds_set() => {
                self.wizard.toggle_choice(&field.name, &option)
            }
            (FieldKind::Radio | FieldKind::Select, Some(option)) => self
                .wizard
                .edit_field(&field.name, FieldValue::Text(option)),
            _ => Ok(()),
        };
        if let Err(e) = result {
            self.set_status(e.to_string());
        }
    }

    fn next_step(&mut self) {
        match self.wizard.go_next() {
            Ok(_) => self.sync_form(),
            Err(e) => {
                self.focus_first_violation();
                self.set_status(format!("Please fix the highlighted fields: {e}"));
            }
        }
    }

    fn previous_step(&mut self) {
        self.wizard.go_previous();
        self.sync_form();
    }

    fn jump_to_step(&mut self, target: usize) {
        match self.wizard.jump_to_step(target) {
            Ok(_) => self.sync_form(),
            Err(NavigationError::StepInvalid { step, .. }) if step == self.wizard.current_step() => {
                self.focus_first_violation();
                self.set_status("Please fix the highlighted fields first");
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn handle_terms_key(&mut self, key: KeyEvent) {
        let Some(terms) = self.state.terms.as_mut() else {
            return;
        };
        let page = terms.visible_rows() as isize;
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => terms.scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => terms.scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => terms.scroll_by(page),
            KeyCode::PageUp => terms.scroll_by(-page),
            KeyCode::End | KeyCode::Char('G') => terms.scroll_to_end(),
            KeyCode::Home | KeyCode::Char('g') => terms.scroll_to_top(),
            KeyCode::Enter | KeyCode::Char('y') => {
                if terms.can_accept() {
                    self.wizard.set_terms_accepted(true);
                    self.state.terms = None;
                    self.set_status("Terms and conditions accepted");
                } else {
                    self.set_status("Scroll to the end of the terms to accept them");
                }
            }
            KeyCode::Char('n') => {
                self.wizard.set_terms_accepted(false);
                self.state.terms = None;
            }
            KeyCode::Esc => self.state.terms = None,
            _ => {}
        }
    }

    // Submission

    /// Gate the draft and hand it to the collection on the runtime
    fn start_submission(&mut self) {
        let fields = match self.wizard.begin_submit() {
            Ok(fields) => fields,
            Err(SubmitRejection::TermsNotAccepted) => {
                self.state.open_terms();
                self.set_status("Please accept the terms and conditions");
                return;
            }
            Err(e @ SubmitRejection::InvalidStep { .. }) => {
                self.focus_first_violation();
                self.set_status(e.to_string());
                return;
            }
            Err(e) => {
                self.set_status(e.to_string());
                return;
            }
        };

        let (tx, rx) = oneshot::channel();
        let gateway = Arc::clone(&self.store);
        tokio::spawn(async move {
            let result = gateway.create(fields).await;
            // The receiver only goes away when the app is shutting down
            let _ = tx.send(result);
        });
        self.state.loader = Some(LoaderState::new());
        self.pending_submission = Some(PendingSubmission { rx, result: None });
    }

    /// Collect the gateway answer and settle it once the loader has run
    fn poll_submission(&mut self, now: Instant) {
        let Some(pending) = self.pending_submission.as_mut() else {
            return;
        };
        if pending.result.is_none() {
            match pending.rx.try_recv() {
                Ok(result) => pending.result = Some(result),
                Err(oneshot::error::TryRecvError::Empty) => return,
                Err(oneshot::error::TryRecvError::Closed) => {
                    pending.result = Some(Err(GatewayError::Storage(
                        "submission task ended without an answer".to_string(),
                    )));
                }
            }
        }
        let loader_done = self
            .state
            .loader
            .map(|loader| loader.min_elapsed(now))
            .unwrap_or(true);
        if !loader_done {
            return;
        }
        let Some(result) = self.pending_submission.take().and_then(|p| p.result) else {
            return;
        };
        self.state.loader = None;
        match self.wizard.complete_submit(result) {
            SubmitOutcome::Succeeded(_) => {
                self.state.form = StepForm::for_step(self.wizard.catalogue(), 0);
                self.state.current_view = View::Confirmation;
            }
            SubmitOutcome::Failed(message) => {
                self.push_error(format!("Submission failed: {message}"));
            }
        }
    }

    fn handle_confirmation_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') => {
                let Some(id) = self.wizard.receipt().map(|r| r.id.clone()) else {
                    return;
                };
                match self.copy_to_clipboard(&id) {
                    Ok(()) => self.set_status(format!("Copied {id}")),
                    Err(e) => {
                        warn!(error = %e, "clipboard unavailable");
                        self.set_status(format!("Could not copy: {e}"));
                    }
                }
            }
            KeyCode::Char('e') => self.export_member_report(),
            KeyCode::Enter | KeyCode::Esc => {
                self.wizard.reset_all();
                self.state.form = StepForm::for_step(self.wizard.catalogue(), 0);
                self.state.current_view = View::Wizard;
            }
            _ => {}
        }
    }

    /// Save the applicant's copy of the submitted application
    fn export_member_report(&mut self) {
        let Some(receipt) = self.wizard.receipt() else {
            return;
        };
        let report = MemberReport::new(receipt, self.wizard.catalogue());
        match report.export_to(&self.data_dir) {
            Ok(path) => {
                info!(path = %path.display(), "member report exported");
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(e) => self.push_error(format!("Could not save the member report: {e}")),
        }
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }

    // Admin

    async fn open_admin(&mut self) {
        self.state.current_view = View::Admin;
        self.state.search_term.clear();
        self.state.search_active = false;
        self.refresh_admin().await;
    }

    /// Reload the current page, stepping back when it has emptied out
    async fn refresh_admin(&mut self) {
        loop {
            match self.admin.list(self.pager.query()).await {
                Ok(page) => {
                    if self.pager.settle(&page) {
                        continue;
                    }
                    self.state.admin_page = Some(page);
                    self.state.clamp_selection();
                }
                Err(e) => self.push_error(format!("Could not load members: {e}")),
            }
            return;
        }
    }

    fn remember_sort(&mut self) {
        self.config
            .set_sort(self.pager.sort_field, self.pager.sort_direction);
        if self.persist_config {
            if let Err(e) = self.config.save() {
                warn!(error = %e, "failed to save sort order");
            }
        }
    }

    async fn handle_admin_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.state.search_active {
            match key.code {
                KeyCode::Esc => {
                    self.state.search_term.clear();
                    self.state.search_active = false;
                }
                KeyCode::Enter => self.state.search_active = false,
                KeyCode::Backspace => {
                    self.state.search_term.pop();
                }
                KeyCode::Char(c) => self.state.search_term.push(c),
                _ => {}
            }
            self.state.selected_index = 0;
            return Ok(());
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let count = self.state.visible_items().len();
                self.state.move_selection_down(count);
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Char('n') | KeyCode::Right => {
                let moved = self
                    .state
                    .admin_page
                    .as_ref()
                    .map(|page| self.pager.next_page(page))
                    .unwrap_or(false);
                if moved {
                    self.state.selected_index = 0;
                    self.refresh_admin().await;
                }
            }
            KeyCode::Char('p') | KeyCode::Left => {
                if self.pager.previous_page() {
                    self.state.selected_index = 0;
                    self.refresh_admin().await;
                }
            }
            KeyCode::Char('s') => {
                self.pager.cycle_sort_field();
                self.remember_sort();
                self.refresh_admin().await;
            }
            KeyCode::Char('S') => {
                self.pager.toggle_sort_direction();
                self.remember_sort();
                self.refresh_admin().await;
            }
            KeyCode::Char('/') => self.state.search_active = true,
            KeyCode::Enter => self.open_detail().await,
            KeyCode::Char('d') => {
                self.state.pending_delete =
                    self.state.selected_item().map(PendingDeleteAction::for_item);
            }
            KeyCode::Char('r') => self.open_report().await,
            KeyCode::F(5) => self.refresh_admin().await,
            KeyCode::Esc => self.state.current_view = View::Wizard,
            _ => {}
        }
        Ok(())
    }

    async fn open_detail(&mut self) {
        let Some(id) = self.state.selected_item().map(|i| i.membership_id.clone()) else {
            return;
        };
        match self.admin.get(&id).await {
            Ok(Some(submission)) => {
                self.state.detail = Some(submission);
                self.state.scroll_offset = 0;
                self.state.current_view = View::AdminDetail;
            }
            Ok(None) => {
                self.set_status(format!("Membership {id} no longer exists"));
                self.refresh_admin().await;
            }
            Err(e) => self.push_error(format!("Could not load {id}: {e}")),
        }
    }

    async fn open_report(&mut self) {
        match self.admin.report(self.config.report_fetch_limit()).await {
            Ok(report) => {
                self.state.report = Some(report);
                self.state.scroll_offset = 0;
                self.state.current_view = View::Report;
            }
            Err(e) => self.push_error(format!("Could not build the report: {e}")),
        }
    }

    fn handle_admin_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let rows = self.state.detail.as_ref().map(|d| d.fields.len()).unwrap_or(0);
                self.state.scroll_down(rows);
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('d') => {
                self.state.pending_delete = self.state.detail.as_ref().map(|d| {
                    PendingDeleteAction::for_item(&d.to_list_item())
                });
            }
            KeyCode::Esc => {
                self.state.detail = None;
                self.state.current_view = View::Admin;
            }
            _ => {}
        }
    }

    async fn handle_delete_dialog_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(action) = self.state.pending_delete.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                action.selected_option = !action.selected_option;
            }
            KeyCode::Esc => self.state.pending_delete = None,
            KeyCode::Enter => {
                if let Some(action) = self.state.pending_delete.take() {
                    if action.selected_option {
                        self.delete_member(&action.membership_id).await;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn delete_member(&mut self, id: &str) {
        match self.admin.delete(id).await {
            Ok(DeleteOutcome::Deleted) => self.set_status(format!("Deleted {id}")),
            Ok(DeleteOutcome::NotFound) => {
                self.set_status(format!("Membership {id} was already removed"))
            }
            Err(e) => {
                self.push_error(format!("Could not delete {id}: {e}"));
                return;
            }
        }
        self.state.detail = None;
        self.state.current_view = View::Admin;
        self.refresh_admin().await;
    }

    fn handle_report_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let lines = self
                    .state
                    .report
                    .as_ref()
                    .map(|r| r.render_text().lines().count())
                    .unwrap_or(0);
                self.state.scroll_down(lines);
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('e') => {
                let Some(report) = self.state.report.as_ref() else {
                    return;
                };
                match report.export_to(&self.data_dir) {
                    Ok(path) => {
                        info!(path = %path.display(), "report exported");
                        self.set_status(format!("Report saved to {}", path.display()));
                    }
                    Err(e) => self.push_error(format!("Could not export the report: {e}")),
                }
            }
            KeyCode::Esc => self.state.current_view = View::Admin,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::tests::small_catalogue;
    use crate::gateway::{AdminGateway, ListQuery, SortField};
    use crate::wizard::{MemorySlot, SubmissionPhase};
    use chrono::NaiveDate;

    struct Harness {
        app: App,
        slot: MemorySlot,
        store: Arc<DocumentStore>,
        _dir: tempfile::TempDir,
    }

    fn harness() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let slot = MemorySlot::new();
        let store = Arc::new(DocumentStore::in_memory());
        let app = App::with_parts(
            MembershipConfig::default(),
            dir.path().to_path_buf(),
            Arc::new(small_catalogue()),
            Arc::clone(&store),
            Box::new(slot.clone()),
        );
        Harness {
            app,
            slot,
            store,
            _dir: dir,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    /// Fill every required field of the small catalogue and land on the
    /// last step
    async fn fill_all_steps(app: &mut App) {
        type_text(app, "Asha Rao").await;
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        type_text(app, "asha@example.com").await;
        app.handle_key(ctrl('n')).await.unwrap();
        app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
        app.handle_key(ctrl('n')).await.unwrap();
        type_text(app, "Asha Rao").await;
    }

    async fn settle_submission(app: &mut App) {
        for _ in 0..20 {
            tokio::task::yield_now().await;
            app.tick(Instant::now() + LoaderState::MIN_DURATION * 2);
            if !app.is_submitting() {
                return;
            }
        }
        panic!("submission never settled");
    }

    mod wizard_keys {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_typing_edits_focused_field() {
            let mut h = harness();
            type_text(&mut h.app, "Jo").await;
            assert_eq!(
                h.app.wizard.value("fullName"),
                Some(FieldValue::Text("Jo".into()))
            );
            h.app.handle_key(key(KeyCode::Backspace)).await.unwrap();
            assert_eq!(
                h.app.wizard.value("fullName"),
                Some(FieldValue::Text("J".into()))
            );
        }

        #[tokio::test]
        async fn test_date_parses_once_complete() {
            let mut h = harness();
            h.app.handle_key(key(KeyCode::BackTab)).await.unwrap();
            assert_eq!(h.app.state.form.active_name(), Some("dateOfBirth"));
            type_text(&mut h.app, "1990-05-0x").await;
            assert_eq!(h.app.wizard.value("dateOfBirth"), Some(FieldValue::Date(None)));
            type_text(&mut h.app, "1").await;
            assert_eq!(
                h.app.wizard.value("dateOfBirth"),
                Some(FieldValue::Date(NaiveDate::from_ymd_opt(1990, 5, 1)))
            );
        }

        #[tokio::test]
        async fn test_blocked_next_focuses_first_invalid_field() {
            let mut h = harness();
            type_text(&mut h.app, "Asha").await;
            h.app.handle_key(ctrl('n')).await.unwrap();
            assert_eq!(h.app.wizard.current_step(), 0);
            assert_eq!(h.app.state.form.active_name(), Some("email"));
            assert!(h.app.state.status_message.is_some());
        }

        #[tokio::test]
        async fn test_choice_keys() {
            let mut h = harness();
            fill_all_steps(&mut h.app).await;
            h.app.handle_key(ctrl('p')).await.unwrap();
            assert_eq!(h.app.wizard.current_step(), 1);
            assert_eq!(h.app.wizard.value("tier"), Some(FieldValue::Text("gold".into())));

            h.app.handle_key(key(KeyCode::Right)).await.unwrap();
            h.app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(
                h.app.wizard.value("tier"),
                Some(FieldValue::Text("silver".into()))
            );

            h.app.handle_key(key(KeyCode::Tab)).await.unwrap();
            h.app.handle_key(key(KeyCode::Left)).await.unwrap();
            h.app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
            assert_eq!(
                h.app.wizard.value("interests"),
                Some(FieldValue::Choices(vec!["dining".into()]))
            );

            h.app.handle_key(key(KeyCode::Tab)).await.unwrap();
            h.app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
            assert_eq!(h.app.wizard.value("marketing"), Some(FieldValue::Flag(true)));
        }

        #[tokio::test]
        async fn test_alt_digit_jumps_back() {
            let mut h = harness();
            fill_all_steps(&mut h.app).await;
            h.app
                .handle_key(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::ALT))
                .await
                .unwrap();
            assert_eq!(h.app.wizard.current_step(), 0);
            assert_eq!(h.app.state.form.step(), 0);
        }

        #[tokio::test]
        async fn test_reset_clears_draft() {
            let mut h = harness();
            type_text(&mut h.app, "Asha").await;
            h.app.wizard.flush();
            assert!(h.slot.contents().is_some());
            h.app.handle_key(ctrl('r')).await.unwrap();
            assert!(h.app.wizard.draft().is_empty());
            assert_eq!(h.slot.contents(), None);
        }
    }

    mod submission {
        use super::*;
        use crate::catalogue::TERMS_LINES;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_submit_without_terms_opens_dialog() {
            let mut h = harness();
            fill_all_steps(&mut h.app).await;
            h.app.handle_key(ctrl('s')).await.unwrap();
            assert!(h.app.state.terms.is_some());
            assert!(!h.app.is_submitting());

            h.app.handle_key(key(KeyCode::End)).await.unwrap();
            h.app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert!(h.app.wizard.terms_accepted());
            assert!(h.app.state.terms.is_none());
        }

        #[tokio::test]
        async fn test_terms_need_scrolling_before_accept() {
            let mut h = harness();
            h.app.handle_key(ctrl('t')).await.unwrap();
            h.app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert!(!h.app.wizard.terms_accepted());
            assert!(h.app.state.terms.is_some());
            assert_eq!(
                h.app.state.status_message.as_deref(),
                Some("Scroll to the end of the terms to accept them")
            );

            for _ in 0..TERMS_LINES.len() {
                h.app.handle_key(key(KeyCode::Down)).await.unwrap();
            }
            h.app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert!(h.app.wizard.terms_accepted());
            assert!(h.app.state.terms.is_none());
        }

        #[tokio::test]
        async fn test_declining_terms_closes_dialog() {
            let mut h = harness();
            h.app.handle_key(ctrl('t')).await.unwrap();
            h.app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
            assert!(!h.app.wizard.terms_accepted());
            assert!(h.app.state.terms.is_none());
        }

        #[tokio::test]
        async fn test_submit_stores_and_confirms() {
            let mut h = harness();
            fill_all_steps(&mut h.app).await;
            h.app.wizard.set_terms_accepted(true);
            h.app.handle_key(ctrl('s')).await.unwrap();
            assert!(h.app.is_submitting());
            assert_eq!(h.app.wizard.phase(), SubmissionPhase::Submitting);

            // Keys are ignored while the loader is up
            h.app.handle_key(ctrl('s')).await.unwrap();

            settle_submission(&mut h.app).await;
            assert_eq!(h.app.state.current_view, View::Confirmation);
            assert_eq!(h.store.document_count(), 1);
            let receipt = h.app.wizard.receipt().unwrap().clone();
            assert!(receipt.id.starts_with("CM"));
            assert_eq!(h.slot.contents(), None);

            h.app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(h.app.state.current_view, View::Wizard);
            assert_eq!(h.app.wizard.phase(), SubmissionPhase::Editing);
            assert!(h.app.wizard.receipt().is_none());
        }

        #[tokio::test]
        async fn test_confirmation_saves_member_report() {
            let mut h = harness();
            fill_all_steps(&mut h.app).await;
            h.app.wizard.set_terms_accepted(true);
            h.app.handle_key(ctrl('s')).await.unwrap();
            settle_submission(&mut h.app).await;
            assert_eq!(h.app.state.current_view, View::Confirmation);

            let id = h.app.wizard.receipt().unwrap().id.clone();
            h.app.handle_key(key(KeyCode::Char('e'))).await.unwrap();
            let path = h.app.data_dir().join(format!("{id}.txt"));
            let text = std::fs::read_to_string(&path).unwrap();
            assert!(text.contains(&id));
            assert!(text.contains("Membership Confirmation"));
            assert_eq!(h.app.state.current_view, View::Confirmation);
        }

        #[tokio::test]
        async fn test_loader_holds_for_minimum_duration() {
            let mut h = harness();
            fill_all_steps(&mut h.app).await;
            h.app.wizard.set_terms_accepted(true);
            h.app.handle_key(ctrl('s')).await.unwrap();
            for _ in 0..5 {
                tokio::task::yield_now().await;
                h.app.tick(Instant::now());
            }
            assert!(h.app.is_submitting());
            assert_eq!(h.app.state.current_view, View::Wizard);
        }
    }

    mod admin_keys {
        use super::*;
        use crate::gateway::{FlatFields, FlatValue};
        use pretty_assertions::assert_eq;

        async fn seed(store: &DocumentStore, names: &[&str]) {
            for name in names {
                let mut fields = FlatFields::new();
                fields.insert("firstName".into(), FlatValue::Text(name.to_string()));
                fields.insert("city".into(), FlatValue::Text("Panaji".into()));
                store.create(fields).await.unwrap();
            }
        }

        #[tokio::test]
        async fn test_f2_opens_listing() {
            let mut h = harness();
            seed(&h.store, &["Asha", "Vikram"]).await;
            h.app.handle_key(key(KeyCode::F(2))).await.unwrap();
            assert_eq!(h.app.state.current_view, View::Admin);
            assert_eq!(h.app.state.admin_page.as_ref().unwrap().total, 2);

            h.app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert_eq!(h.app.state.current_view, View::Wizard);
        }

        #[tokio::test]
        async fn test_sort_key_cycles_field() {
            let mut h = harness();
            h.app.handle_key(key(KeyCode::F(2))).await.unwrap();
            h.app.handle_key(key(KeyCode::Char('s'))).await.unwrap();
            assert_eq!(h.app.pager.sort_field, SortField::FirstName);
            assert_eq!(h.app.config.admin_sort_field.as_deref(), Some("firstName"));
        }

        #[tokio::test]
        async fn test_search_filters_page() {
            let mut h = harness();
            seed(&h.store, &["Asha", "Vikram"]).await;
            h.app.handle_key(key(KeyCode::F(2))).await.unwrap();
            h.app.handle_key(key(KeyCode::Char('/'))).await.unwrap();
            type_text(&mut h.app, "vik").await;
            assert_eq!(h.app.state.visible_items().len(), 1);
            h.app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert!(h.app.state.search_term.is_empty());
            assert_eq!(h.app.state.visible_items().len(), 2);
        }

        #[tokio::test]
        async fn test_delete_requires_confirmation() {
            let mut h = harness();
            seed(&h.store, &["Asha"]).await;
            h.app.handle_key(key(KeyCode::F(2))).await.unwrap();

            h.app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
            assert!(h.app.state.pending_delete.is_some());
            // Cancel is highlighted first
            h.app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(h.store.document_count(), 1);

            h.app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
            h.app.handle_key(key(KeyCode::Down)).await.unwrap();
            h.app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(h.store.document_count(), 0);
            assert_eq!(h.app.state.admin_page.as_ref().unwrap().total, 0);
        }

        #[tokio::test]
        async fn test_detail_and_report_views() {
            let mut h = harness();
            seed(&h.store, &["Asha"]).await;
            h.app.handle_key(key(KeyCode::F(2))).await.unwrap();

            h.app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(h.app.state.current_view, View::AdminDetail);
            assert_eq!(h.app.state.detail.as_ref().unwrap().text("firstName"), "Asha");
            h.app.handle_key(key(KeyCode::Esc)).await.unwrap();

            h.app.handle_key(key(KeyCode::Char('r'))).await.unwrap();
            assert_eq!(h.app.state.current_view, View::Report);
            h.app.handle_key(key(KeyCode::Char('e'))).await.unwrap();
            let report = h.app.state.report.as_ref().unwrap();
            assert!(h.app.data_dir().join(report.file_name()).exists());
        }

        #[tokio::test]
        async fn test_paging_moves_through_collection() {
            let mut h = harness();
            let names: Vec<String> = (0..12).map(|i| format!("Member{i:02}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            seed(&h.store, &refs).await;
            h.app.handle_key(key(KeyCode::F(2))).await.unwrap();
            h.app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
            assert_eq!(h.app.pager.page_number(), 2);
            assert_eq!(h.app.state.admin_page.as_ref().unwrap().items.len(), 2);
            h.app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
            assert_eq!(h.app.pager.page_number(), 2);

            let page = h.store.list(ListQuery::default()).await.unwrap();
            assert_eq!(page.total, 12);
        }
    }

    mod quitting {
        use super::*;

        #[tokio::test]
        async fn test_double_ctrl_c_quits_and_flushes() {
            let mut h = harness();
            type_text(&mut h.app, "Asha").await;
            h.app.handle_key(ctrl('c')).await.unwrap();
            assert!(!h.app.should_quit());
            h.app.handle_key(ctrl('c')).await.unwrap();
            assert!(h.app.should_quit());
            assert!(h.slot.contents().unwrap().contains("Asha"));
        }
    }
}
