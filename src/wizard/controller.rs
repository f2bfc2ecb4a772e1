//! Step controller.
//!
//! Drives a [`Session`] through the nine steps. Each step is EDITING,
//! GENERATING or COMPLETE; leaving a step requires its gate to hold and
//! there is no way back.
//!
//! Gateway calls are split in two halves so a UI can run them in the
//! background: `begin_*` validates, flips the busy flag and hands out a
//! ticket carrying the request; `finish_*` takes the ticket back together
//! with the gateway outcome. A ticket issued before a [`reset`] no longer
//! matches the live session and its result is dropped.
//!
//! [`reset`]: StepController::reset

use std::sync::Arc;

use super::{Field, Gate, Kpi, Language, Session, StepId};
use crate::ai::{AIError, GenerationGateway, GenerationRequest, GenerationResult, Template};

/// Sub-state of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Editing,
    Generating,
    Complete,
}

/// Why a controller action was refused.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("required fields are empty: {}", join_fields(.0))]
    MissingFields(Vec<Field>),

    #[error("a request of this kind is already in progress")]
    Busy,

    #[error("{0} is not the active step")]
    NotActiveStep(StepId),

    #[error("step {0} has nothing to generate")]
    NotGenerative(StepId),

    #[error("step {0} is not complete yet")]
    NotComplete(StepId),

    #[error("already at the final step")]
    AtFinalStep,

    #[error("suggestions are not available for {0}")]
    NotSuggestible(Field),

    #[error("at most {0} KPIs can be selected")]
    SelectionFull(usize),

    #[error("result belongs to a session that was reset")]
    StaleResult,

    #[error(transparent)]
    Artifact(#[from] super::session::ArtifactMismatch),

    #[error("generation failed: {0}")]
    Generation(#[from] AIError),
}

fn join_fields(fields: &[Field]) -> String {
    fields.iter().map(|f| f.key()).collect::<Vec<_>>().join(", ")
}

/// Receipt for a started step generation.
#[derive(Debug)]
pub struct SubmitTicket {
    epoch: u64,
    step: StepId,
    request: GenerationRequest,
}

impl SubmitTicket {
    pub fn step(&self) -> StepId {
        self.step
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// Receipt for a started field suggestion.
#[derive(Debug)]
pub struct SuggestTicket {
    epoch: u64,
    field: Field,
    request: GenerationRequest,
}

impl SuggestTicket {
    pub fn field(&self) -> Field {
        self.field
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// Owns the session and mediates every change to it.
pub struct StepController {
    session: Session,
    gateway: Arc<dyn GenerationGateway>,
    epoch: u64,
    submitting: Option<StepId>,
    suggesting: Option<Field>,
}

impl StepController {
    /// Start a blank session.
    pub fn new(gateway: Arc<dyn GenerationGateway>, language: Language) -> Self {
        Self {
            session: Session::new(language),
            gateway,
            epoch: 0,
            submitting: None,
            suggesting: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Shared handle to the gateway, for running tickets elsewhere.
    pub fn gateway(&self) -> Arc<dyn GenerationGateway> {
        Arc::clone(&self.gateway)
    }

    pub fn current_step(&self) -> StepId {
        self.session.current_step()
    }

    /// Step whose generation is in flight, if any.
    pub fn submitting(&self) -> Option<StepId> {
        self.submitting
    }

    /// Field whose suggestion is in flight, if any.
    pub fn suggesting(&self) -> Option<Field> {
        self.suggesting
    }

    /// Sub-state of `step`.
    pub fn step_state(&self, step: StepId) -> StepState {
        if self.submitting == Some(step) {
            StepState::Generating
        } else if self.session.gate_satisfied(step) {
            StepState::Complete
        } else {
            StepState::Editing
        }
    }

    /// Change the output language. Stored artifacts are left untouched.
    pub fn set_language(&mut self, language: Language) {
        tracing::debug!(from = %self.session.language(), to = %language, "Language changed");
        self.session.set_language(language);
    }

    /// Edit a field of the active step.
    pub fn edit(&mut self, field: Field, value: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_active(field.step())?;
        self.session.set_field(field, value);
        Ok(())
    }

    /// Select or deselect a KPI on the dashboard step.
    ///
    /// Returns whether the KPI is selected afterwards.
    pub fn toggle_kpi(&mut self, kpi: Kpi) -> Result<bool, WizardError> {
        self.ensure_active(StepId::Dashboard)?;
        let limit = match StepId::Dashboard.gate() {
            Gate::Selection(n) => n,
            Gate::Artifact | Gate::Open => usize::MAX,
        };

        let selected = &mut self.session.dashboard.selected_kpis;
        if let Some(pos) = selected.iter().position(|k| *k == kpi) {
            selected.remove(pos);
            return Ok(false);
        }
        if selected.len() >= limit {
            return Err(WizardError::SelectionFull(limit));
        }
        selected.push(kpi);
        Ok(true)
    }

    /// Validate the active step and start generating its artifact.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, WizardError> {
        if self.submitting.is_some() {
            return Err(WizardError::Busy);
        }

        let step = self.current_step();
        if !step.is_generative() {
            return Err(WizardError::NotGenerative(step));
        }

        let missing = self.session.missing_fields(step);
        if !missing.is_empty() {
            return Err(WizardError::MissingFields(missing));
        }

        let template = self.template_for(step).ok_or(WizardError::NotGenerative(step))?;
        let request = GenerationRequest::new(template, self.session.language());
        self.submitting = Some(step);
        tracing::info!(%step, operation = request.template.operation(), "Generation started");

        Ok(SubmitTicket { epoch: self.epoch, step, request })
    }

    /// Apply the outcome of a started generation.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        outcome: Result<GenerationResult, AIError>,
    ) -> Result<StepState, WizardError> {
        if ticket.epoch != self.epoch {
            tracing::warn!(step = %ticket.step, "Discarding result for a reset session");
            return Err(WizardError::StaleResult);
        }
        self.submitting = None;

        match outcome {
            Ok(result) if result.is_empty() => {
                tracing::warn!(step = %ticket.step, "Empty result, keeping previous artifact");
                Err(WizardError::Generation(AIError::NoResponse))
            }
            Ok(result) => {
                self.session.store_artifact(ticket.step, result)?;
                let state = self.step_state(ticket.step);
                tracing::info!(step = %ticket.step, ?state, "Generation finished");
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(step = %ticket.step, error = %e, "Generation failed");
                Err(WizardError::Generation(e))
            }
        }
    }

    /// Generate the active step's artifact and store it.
    pub async fn submit(&mut self) -> Result<StepState, WizardError> {
        let ticket = self.begin_submit()?;
        let outcome = self.gateway.generate(&ticket.request).await;
        self.finish_submit(ticket, outcome)
    }

    /// Start a suggestion for one field of the active step.
    pub fn begin_suggest(&mut self, field: Field) -> Result<SuggestTicket, WizardError> {
        if self.suggesting.is_some() {
            return Err(WizardError::Busy);
        }
        if !field.is_suggestible() {
            return Err(WizardError::NotSuggestible(field));
        }
        self.ensure_active(field.step())?;

        let template = Template::Suggestion {
            field_label: field.prompt_label().to_string(),
            context: self.session.suggestion_context(),
        };
        let request = GenerationRequest::new(template, self.session.language());
        self.suggesting = Some(field);
        tracing::info!(%field, "Suggestion started");

        Ok(SuggestTicket { epoch: self.epoch, field, request })
    }

    /// Apply the outcome of a started suggestion to its field.
    pub fn finish_suggest(
        &mut self,
        ticket: SuggestTicket,
        outcome: Result<GenerationResult, AIError>,
    ) -> Result<(), WizardError> {
        if ticket.epoch != self.epoch {
            tracing::warn!(field = %ticket.field, "Discarding suggestion for a reset session");
            return Err(WizardError::StaleResult);
        }
        self.suggesting = None;
        let step = ticket.field.step();
        if step != self.current_step() {
            tracing::warn!(
                field = %ticket.field,
                "Discarding suggestion for a step already left"
            );
            return Err(WizardError::NotActiveStep(step));
        }

        match outcome {
            Ok(GenerationResult::Text(value)) => {
                self.session.set_field(ticket.field, value);
                Ok(())
            }
            Ok(GenerationResult::Voc(_) | GenerationResult::Faq(_)) => {
                tracing::warn!(
                    field = %ticket.field,
                    "Suggestion returned records instead of text"
                );
                Err(WizardError::Generation(AIError::NoResponse))
            }
            Err(e) => {
                tracing::warn!(field = %ticket.field, error = %e, "Suggestion failed");
                Err(WizardError::Generation(e))
            }
        }
    }

    /// Ask the gateway for a value of `field` and store it.
    pub async fn suggest(&mut self, field: Field) -> Result<(), WizardError> {
        let ticket = self.begin_suggest(field)?;
        let outcome = self.gateway.generate(&ticket.request).await;
        self.finish_suggest(ticket, outcome)
    }

    /// Whether the active step may be left.
    pub fn can_advance(&self) -> bool {
        let step = self.current_step();
        self.submitting.is_none()
            && !step.is_last()
            && self.step_state(step) == StepState::Complete
    }

    /// Move to the next step.
    pub fn advance(&mut self) -> Result<StepId, WizardError> {
        if self.submitting.is_some() {
            return Err(WizardError::Busy);
        }
        let step = self.current_step();
        let next = step.next().ok_or(WizardError::AtFinalStep)?;
        if !self.session.gate_satisfied(step) {
            return Err(WizardError::NotComplete(step));
        }

        self.session.set_current_step(next);
        tracing::debug!(from = %step, to = %next, "Advanced");
        Ok(next)
    }

    /// Discard the session and start over, keeping the language.
    ///
    /// Results of calls still in flight will be rejected as stale.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.submitting = None;
        self.suggesting = None;
        self.session = Session::new(self.session.language());
        tracing::info!(session = %self.session.id(), "Session reset");
    }

    fn ensure_active(&self, step: StepId) -> Result<(), WizardError> {
        if step == self.current_step() {
            Ok(())
        } else {
            Err(WizardError::NotActiveStep(step))
        }
    }

    fn template_for(&self, step: StepId) -> Option<Template> {
        let s = &self.session;
        let template = match step {
            StepId::Diagnosis => Template::Mission {
                feeling: s.diagnosis.feeling.clone(),
                goal: s.diagnosis.goal.clone(),
                problem: s.diagnosis.problem.clone(),
            },
            StepId::Journey => Template::JourneyAudit {
                channels: s.journey.channels.clone(),
                tools: s.journey.tools.clone(),
                example_response: s.journey.example_response.clone(),
            },
            StepId::Manifesto => Template::Manifesto {
                adjectives: s.manifesto.adjectives.clone(),
                form: s.manifesto.form.clone(),
                forbidden: s.manifesto.forbidden.clone(),
                preferred: s.manifesto.preferred.clone(),
            },
            StepId::Voc => Template::VocAnalysis { raw_messages: s.voc.raw_messages.clone() },
            StepId::SelfService => {
                Template::Faq { questions: s.self_service.questions.clone() }
            }
            StepId::Proactive => Template::ProactiveStrategy { context: s.full_context() },
            StepId::Dashboard | StepId::Sprint | StepId::Feedback => return None,
        };
        Some(template)
    }
}
