//! Session state store.
//!
//! A [`Session`] is the single source of truth for one wizard run: the
//! active step, the inputs of every step, the generated artifacts and the
//! output language. It only holds data; ordering and gating rules live in
//! the step controller.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Field, Gate, Kpi, Language, StepId};
use crate::ai::{FaqItem, GenerationResult, VocItem};

/// Step 1 inputs and the generated mission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub feeling: String,
    pub goal: String,
    pub problem: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,
}

/// Step 2 inputs and the journey audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journey {
    pub channels: String,
    pub tools: String,
    pub example_response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

/// Step 3 inputs and the communication manifesto.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifesto {
    pub adjectives: String,
    pub form: String,
    pub forbidden: String,
    pub preferred: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Step 4 KPI selection, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub selected_kpis: Vec<Kpi>,
}

/// Step 5 raw messages and the 3C analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voc {
    pub raw_messages: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Vec<VocItem>>,
}

/// Step 6 questions and the generated FAQ.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfService {
    pub questions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faq_items: Option<Vec<FaqItem>>,
}

/// Step 9 proactive strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proactive {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

/// Borrowed view of a step's artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactRef<'a> {
    Text(&'a str),
    Voc(&'a [VocItem]),
    Faq(&'a [FaqItem]),
}

impl ArtifactRef<'_> {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Voc(items) => items.is_empty(),
            Self::Faq(items) => items.is_empty(),
        }
    }
}

/// A generation result that does not fit the step it was stored into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("step {0} cannot hold this kind of artifact")]
pub struct ArtifactMismatch(pub StepId);

/// The complete in-memory state of one wizard run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(skip)]
    id: Uuid,
    current_step: StepId,
    language: Language,
    pub diagnosis: Diagnosis,
    pub journey: Journey,
    pub manifesto: Manifesto,
    pub dashboard: Dashboard,
    pub voc: Voc,
    pub self_service: SelfService,
    pub proactive: Proactive,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Session {
    /// A blank session on step 1.
    pub fn new(language: Language) -> Self {
        Self {
            id: Uuid::new_v4(),
            current_step: StepId::Diagnosis,
            language,
            diagnosis: Diagnosis::default(),
            journey: Journey::default(),
            manifesto: Manifesto::default(),
            dashboard: Dashboard::default(),
            voc: Voc::default(),
            self_service: SelfService::default(),
            proactive: Proactive::default(),
        }
    }

    /// Identity of this run, fresh on every reset.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn current_step(&self) -> StepId {
        self.current_step
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub(crate) fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Move to `step`. Callers guarantee forward-only movement.
    pub(crate) fn set_current_step(&mut self, step: StepId) {
        debug_assert!(step >= self.current_step);
        self.current_step = step;
    }

    /// Current value of a field.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Feeling => &self.diagnosis.feeling,
            Field::Goal => &self.diagnosis.goal,
            Field::Problem => &self.diagnosis.problem,
            Field::Channels => &self.journey.channels,
            Field::Tools => &self.journey.tools,
            Field::ExampleResponse => &self.journey.example_response,
            Field::Adjectives => &self.manifesto.adjectives,
            Field::Form => &self.manifesto.form,
            Field::Forbidden => &self.manifesto.forbidden,
            Field::Preferred => &self.manifesto.preferred,
            Field::RawMessages => &self.voc.raw_messages,
            Field::Questions => &self.self_service.questions,
        }
    }

    /// Mutable slot behind a field.
    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Feeling => &mut self.diagnosis.feeling,
            Field::Goal => &mut self.diagnosis.goal,
            Field::Problem => &mut self.diagnosis.problem,
            Field::Channels => &mut self.journey.channels,
            Field::Tools => &mut self.journey.tools,
            Field::ExampleResponse => &mut self.journey.example_response,
            Field::Adjectives => &mut self.manifesto.adjectives,
            Field::Form => &mut self.manifesto.form,
            Field::Forbidden => &mut self.manifesto.forbidden,
            Field::Preferred => &mut self.manifesto.preferred,
            Field::RawMessages => &mut self.voc.raw_messages,
            Field::Questions => &mut self.self_service.questions,
        }
    }

    /// Overwrite a field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// Required fields of `step` that are still blank.
    pub fn missing_fields(&self, step: StepId) -> Vec<Field> {
        step.fields().iter().copied().filter(|f| self.field(*f).trim().is_empty()).collect()
    }

    /// The stored artifact of a step, if any.
    pub fn artifact(&self, step: StepId) -> Option<ArtifactRef<'_>> {
        match step {
            StepId::Diagnosis => self.diagnosis.mission.as_deref().map(ArtifactRef::Text),
            StepId::Journey => self.journey.analysis.as_deref().map(ArtifactRef::Text),
            StepId::Manifesto => self.manifesto.result.as_deref().map(ArtifactRef::Text),
            StepId::Voc => self.voc.analysis.as_deref().map(ArtifactRef::Voc),
            StepId::SelfService => self.self_service.faq_items.as_deref().map(ArtifactRef::Faq),
            StepId::Proactive => self.proactive.strategy.as_deref().map(ArtifactRef::Text),
            StepId::Dashboard | StepId::Sprint | StepId::Feedback => None,
        }
    }

    /// Whether the step holds a non-empty artifact.
    pub fn has_artifact(&self, step: StepId) -> bool {
        self.artifact(step).is_some_and(|a| !a.is_empty())
    }

    /// Store a generation result as the artifact of `step`, replacing any
    /// previous one.
    pub fn store_artifact(
        &mut self,
        step: StepId,
        result: GenerationResult,
    ) -> Result<(), ArtifactMismatch> {
        match (step, result) {
            (StepId::Diagnosis, GenerationResult::Text(text)) => {
                self.diagnosis.mission = Some(text)
            }
            (StepId::Journey, GenerationResult::Text(text)) => self.journey.analysis = Some(text),
            (StepId::Manifesto, GenerationResult::Text(text)) => self.manifesto.result = Some(text),
            (StepId::Voc, GenerationResult::Voc(items)) => self.voc.analysis = Some(items),
            (StepId::SelfService, GenerationResult::Faq(items)) => {
                self.self_service.faq_items = Some(items);
            }
            (StepId::Proactive, GenerationResult::Text(text)) => {
                self.proactive.strategy = Some(text);
            }
            (step, _) => return Err(ArtifactMismatch(step)),
        }
        Ok(())
    }

    /// Whether the gate of `step` is satisfied.
    pub fn gate_satisfied(&self, step: StepId) -> bool {
        match step.gate() {
            Gate::Artifact => self.has_artifact(step),
            Gate::Selection(n) => self.dashboard.selected_kpis.len() == n,
            Gate::Open => true,
        }
    }

    /// Serialized diagnosis, journey and manifesto groups, used as context
    /// for field suggestions.
    pub fn suggestion_context(&self) -> String {
        #[derive(Serialize)]
        struct Partial<'a> {
            diagnosis: &'a Diagnosis,
            journey: &'a Journey,
            manifesto: &'a Manifesto,
        }

        serde_json::to_string(&Partial {
            diagnosis: &self.diagnosis,
            journey: &self.journey,
            manifesto: &self.manifesto,
        })
        .unwrap_or_default()
    }

    /// The entire session serialized as prompt context.
    pub fn full_context(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_blank() {
        let session = Session::new(Language::En);
        assert_eq!(session.current_step(), StepId::Diagnosis);
        assert_eq!(session.language(), Language::En);
        assert!(Field::ALL.iter().all(|f| session.field(*f).is_empty()));
        assert!(StepId::ALL.iter().all(|s| session.artifact(*s).is_none()));
    }

    #[test]
    fn test_field_setter_touches_exactly_one_slot() {
        let mut session = Session::default();
        session.set_field(Field::Tools, "Zendesk");

        assert_eq!(session.journey.tools, "Zendesk");
        for field in Field::ALL.iter().filter(|f| **f != Field::Tools) {
            assert!(session.field(*field).is_empty(), "{field} changed");
        }
    }

    #[test]
    fn test_missing_fields_ignores_whitespace_values() {
        let mut session = Session::default();
        session.set_field(Field::Feeling, "spokój");
        session.set_field(Field::Goal, "   ");

        assert_eq!(session.missing_fields(StepId::Diagnosis), vec![Field::Goal, Field::Problem]);
        assert!(session.missing_fields(StepId::Sprint).is_empty());
    }

    #[test]
    fn test_store_artifact_checks_shape() {
        let mut session = Session::default();
        assert!(session
            .store_artifact(StepId::Diagnosis, GenerationResult::Text("mission".into()))
            .is_ok());
        assert!(session.has_artifact(StepId::Diagnosis));

        let err = session.store_artifact(StepId::Voc, GenerationResult::Text("x".into()));
        assert_eq!(err, Err(ArtifactMismatch(StepId::Voc)));
        assert!(session.artifact(StepId::Voc).is_none());

        let err = session.store_artifact(StepId::Sprint, GenerationResult::Text("x".into()));
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_artifact_does_not_satisfy_gate() {
        let mut session = Session::default();
        session.store_artifact(StepId::Voc, GenerationResult::Voc(Vec::new())).unwrap();
        assert!(session.artifact(StepId::Voc).is_some());
        assert!(!session.gate_satisfied(StepId::Voc));
    }

    #[test]
    fn test_gate_for_open_and_selection_steps() {
        let mut session = Session::default();
        assert!(session.gate_satisfied(StepId::Sprint));
        assert!(!session.gate_satisfied(StepId::Dashboard));
        session.dashboard.selected_kpis = vec![Kpi::Csat, Kpi::Nps, Kpi::Ces];
        assert!(session.gate_satisfied(StepId::Dashboard));
    }

    #[test]
    fn test_suggestion_context_covers_first_three_groups() {
        let mut session = Session::default();
        session.set_field(Field::Feeling, "spokój");
        session.set_field(Field::RawMessages, "secret");

        let context: serde_json::Value =
            serde_json::from_str(&session.suggestion_context()).unwrap();
        assert_eq!(context["diagnosis"]["feeling"], "spokój");
        assert!(context.get("journey").is_some());
        assert!(context.get("manifesto").is_some());
        assert!(context.get("voc").is_none());
    }

    #[test]
    fn test_full_context_includes_every_artifact() {
        let mut session = Session::default();
        session.store_artifact(StepId::Journey, GenerationResult::Text("Pain #1".into())).unwrap();
        session
            .store_artifact(
                StepId::SelfService,
                GenerationResult::Faq(vec![FaqItem {
                    question: "Q".into(),
                    answer: "A".into(),
                    proactive_action: "P".into(),
                }]),
            )
            .unwrap();

        let context = session.full_context();
        assert!(context.contains("Pain #1"));
        assert!(context.contains("proactiveAction"));
        assert!(context.contains("\"currentStep\""));
    }
}
