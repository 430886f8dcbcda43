//! Wizard controller: step pointer, validation gating, submission
//! lifecycle and draft synchronization.

use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::draft::Draft;
use super::store::{DraftStore, DraftSync};
use super::validation::{StepViolations, ValidationSchema};
use super::value::FieldValue;
use crate::catalogue::Catalogue;
use crate::gateway::{FlatFields, GatewayError, SubmissionGateway, SubmissionReceipt};

/// Where the wizard is in its submission lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Editing,
    /// Only held while a step is being checked
    ValidatingStep,
    Submitting,
    Succeeded,
    /// Last attempt failed; editing and resubmitting are allowed
    Failed,
}

impl SubmissionPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::ValidatingStep => "validating",
            Self::Submitting => "submitting",
            Self::Succeeded => "submitted",
            Self::Failed => "failed",
        }
    }
}

/// Transient wizard state. Only the draft is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    pub current_step: usize,
    pub terms_accepted: bool,
    pub phase: SubmissionPhase,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{field}' holds a {kind} value")]
    KindMismatch { field: String, kind: &'static str },
    #[error("'{option}' is not an option of '{field}'")]
    UnknownOption { field: String, option: String },
    #[error("the application is {0} and cannot be edited")]
    Locked(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("step {} has {} invalid field(s)", .step + 1, .violations.len())]
    StepInvalid {
        step: usize,
        violations: StepViolations,
    },
    #[error("step {} does not exist (there are {step_count})", .target + 1)]
    OutOfRange { target: usize, step_count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejection {
    #[error("please accept the terms and conditions")]
    TermsNotAccepted,
    #[error("step {} has {} invalid field(s)", .step + 1, .violations.len())]
    InvalidStep {
        step: usize,
        violations: StepViolations,
    },
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error("this application has already been submitted")]
    AlreadySubmitted,
}

/// Result of a gateway round-trip
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Succeeded(SubmissionReceipt),
    /// Gateway message, shown verbatim
    Failed(String),
}

pub struct WizardController {
    catalogue: Arc<Catalogue>,
    schema: ValidationSchema,
    draft: Draft,
    sync: DraftSync,
    state: WizardState,
    violations: StepViolations,
    receipt: Option<SubmissionReceipt>,
    last_failure: Option<String>,
}

impl WizardController {
    /// Build a controller, hydrating the draft from the store
    pub fn new(catalogue: Arc<Catalogue>, store: DraftStore, debounce: Duration) -> Self {
        let sync = DraftSync::new(store, debounce);
        let draft = sync.load();
        info!(fields = draft.len(), "wizard started");
        Self {
            schema: ValidationSchema::from_catalogue(&catalogue),
            catalogue,
            draft,
            sync,
            state: WizardState::default(),
            violations: StepViolations::default(),
            receipt: None,
            last_failure: None,
        }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn step_count(&self) -> usize {
        self.catalogue.step_count()
    }

    pub fn is_last_step(&self) -> bool {
        self.state.current_step + 1 == self.step_count()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.state.phase
    }

    pub fn terms_accepted(&self) -> bool {
        self.state.terms_accepted
    }

    /// Violations from the last failed gate, minus fields edited since
    pub fn violations(&self) -> &StepViolations {
        &self.violations
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Current value of a field, or its empty value when never edited
    pub fn value(&self, name: &str) -> Option<FieldValue> {
        let field = self.catalogue.field(name)?;
        Some(
            self.draft
                .get(name)
                .cloned()
                .unwrap_or_else(|| FieldValue::empty_for(field)),
        )
    }

    fn ensure_editable(&self) -> Result<(), EditError> {
        match self.state.phase {
            SubmissionPhase::Submitting | SubmissionPhase::Succeeded => {
                Err(EditError::Locked(self.state.phase.label()))
            }
            _ => Ok(()),
        }
    }

    fn touched(&mut self, name: &str) {
        self.violations.remove(name);
        if self.state.phase == SubmissionPhase::Failed {
            self.state.phase = SubmissionPhase::Editing;
        }
        self.sync.mark_dirty(Instant::now());
    }

    /// Replace a field's value. No validation beyond the value's shape.
    pub fn edit_field(&mut self, name: &str, value: FieldValue) -> Result<(), EditError> {
        self.ensure_editable()?;
        let field = self
            .catalogue
            .field(name)
            .ok_or_else(|| EditError::UnknownField(name.to_string()))?;
        if !value.fits(field) {
            return Err(EditError::KindMismatch {
                field: name.to_string(),
                kind: field.kind.label(),
            });
        }
        self.draft.set(name, value);
        self.touched(name);
        Ok(())
    }

    /// Add or remove one option of a set-valued field
    pub fn toggle_choice(&mut self, name: &str, option: &str) -> Result<(), EditError> {
        self.ensure_editable()?;
        let field = self
            .catalogue
            .field(name)
            .ok_or_else(|| EditError::UnknownField(name.to_string()))?;
        if !field.holds_set() {
            return Err(EditError::KindMismatch {
                field: name.to_string(),
                kind: field.kind.label(),
            });
        }
        if field.option_label(option).is_none() {
            return Err(EditError::UnknownOption {
                field: name.to_string(),
                option: option.to_string(),
            });
        }
        let mut value = self
            .draft
            .get(name)
            .cloned()
            .unwrap_or_else(|| FieldValue::empty_for(field));
        value.toggle(option);
        self.draft.set(name, value);
        self.touched(name);
        Ok(())
    }

    /// Forget a field's value
    pub fn clear_field(&mut self, name: &str) -> Result<(), EditError> {
        self.ensure_editable()?;
        if self.catalogue.field(name).is_none() {
            return Err(EditError::UnknownField(name.to_string()));
        }
        self.draft.remove(name);
        self.touched(name);
        Ok(())
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) {
        self.state.terms_accepted = accepted;
        debug!(accepted, "terms acceptance changed");
    }

    /// All violations of one step against the current draft
    pub fn validate_step(&self, step: usize) -> StepViolations {
        let names = self
            .catalogue
            .step(step)
            .map(|s| s.field_names.as_slice())
            .unwrap_or_default();
        self.schema
            .validate_fields(names.iter().map(String::as_str), &self.draft)
    }

    /// Validate a step on the way through a gate, passing through the
    /// transient validating phase.
    fn gate(&mut self, step: usize) -> StepViolations {
        let resume = self.state.phase;
        if resume == SubmissionPhase::Editing {
            self.state.phase = SubmissionPhase::ValidatingStep;
        }
        let violations = self.validate_step(step);
        self.state.phase = resume;
        if !violations.is_empty() {
            debug!(step, invalid = violations.len(), "step gate blocked");
        }
        violations
    }

    fn move_to(&mut self, step: usize) {
        if step != self.state.current_step {
            info!(from = self.state.current_step, to = step, "step changed");
        }
        self.state.current_step = step;
    }

    /// Advance one step when the current step is valid. On the last step a
    /// valid result leaves the pointer where it is.
    pub fn go_next(&mut self) -> Result<usize, NavigationError> {
        let current = self.state.current_step;
        let violations = self.gate(current);
        if !violations.is_empty() {
            self.violations = violations.clone();
            return Err(NavigationError::StepInvalid {
                step: current,
                violations,
            });
        }
        self.violations = StepViolations::default();
        let next = (current + 1).min(self.step_count() - 1);
        self.move_to(next);
        Ok(next)
    }

    /// Go back one step without validating, clamped at the first step
    pub fn go_previous(&mut self) -> usize {
        let previous = self.state.current_step.saturating_sub(1);
        self.violations = StepViolations::default();
        self.move_to(previous);
        previous
    }

    /// Jump to a step. Going back (or staying) is unconditional. Going
    /// forward requires every step from the current one up to, but not
    /// including, the target to be valid; the first invalid step aborts
    /// the jump.
    pub fn jump_to_step(&mut self, target: usize) -> Result<usize, NavigationError> {
        let step_count = self.step_count();
        if target >= step_count {
            return Err(NavigationError::OutOfRange { target, step_count });
        }
        let current = self.state.current_step;
        if target > current {
            for step in current..target {
                let violations = self.gate(step);
                if !violations.is_empty() {
                    if step == current {
                        self.violations = violations.clone();
                    }
                    return Err(NavigationError::StepInvalid { step, violations });
                }
            }
        }
        self.violations = StepViolations::default();
        self.move_to(target);
        Ok(target)
    }

    /// Check the submit gates and enter `Submitting`, returning the
    /// flattened draft for the gateway.
    pub fn begin_submit(&mut self) -> Result<FlatFields, SubmitRejection> {
        match self.state.phase {
            SubmissionPhase::Submitting => return Err(SubmitRejection::AlreadySubmitting),
            SubmissionPhase::Succeeded => return Err(SubmitRejection::AlreadySubmitted),
            _ => {}
        }
        let last = self.step_count() - 1;
        let violations = self.gate(last);
        if !violations.is_empty() {
            self.violations = violations.clone();
            return Err(SubmitRejection::InvalidStep {
                step: last,
                violations,
            });
        }
        if !self.state.terms_accepted {
            debug!("submit blocked until terms are accepted");
            return Err(SubmitRejection::TermsNotAccepted);
        }
        self.state.phase = SubmissionPhase::Submitting;
        self.last_failure = None;
        let fields = self.draft.flatten(&self.catalogue);
        info!(fields = fields.len(), "submitting application");
        Ok(fields)
    }

    /// Apply the gateway's answer to a submission started with
    /// [`WizardController::begin_submit`].
    pub fn complete_submit(
        &mut self,
        result: Result<SubmissionReceipt, GatewayError>,
    ) -> SubmitOutcome {
        if self.state.phase != SubmissionPhase::Submitting {
            warn!(phase = self.state.phase.label(), "submission result arrived out of turn");
        }
        match result {
            Ok(receipt) => {
                info!(id = %receipt.id, "application accepted");
                self.state.phase = SubmissionPhase::Succeeded;
                self.draft.clear();
                self.sync.clear();
                self.receipt = Some(receipt.clone());
                SubmitOutcome::Succeeded(receipt)
            }
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "application rejected");
                self.state.phase = SubmissionPhase::Failed;
                self.last_failure = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Gate, send and settle a submission in one call
    pub async fn submit(
        &mut self,
        gateway: &dyn SubmissionGateway,
    ) -> Result<SubmitOutcome, SubmitRejection> {
        let fields = self.begin_submit()?;
        let result = gateway.create(fields).await;
        Ok(self.complete_submit(result))
    }

    /// Leave the failed phase after the error has been shown
    pub fn acknowledge_failure(&mut self) {
        if self.state.phase == SubmissionPhase::Failed {
            self.state.phase = SubmissionPhase::Editing;
        }
    }

    /// Start over: empty draft and slot, first step, terms unaccepted
    pub fn reset_all(&mut self) {
        self.draft.clear();
        self.sync.clear();
        self.state = WizardState::default();
        self.violations = StepViolations::default();
        self.receipt = None;
        self.last_failure = None;
        info!("wizard reset");
    }

    /// Persist the draft if a debounced write is due
    pub fn tick(&mut self, now: Instant) -> bool {
        self.sync.tick(now, &self.draft)
    }

    /// Persist any pending edit immediately
    pub fn flush(&mut self) {
        self.sync.flush(&self.draft);
    }
}
