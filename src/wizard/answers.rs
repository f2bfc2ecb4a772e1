//! Answers files and non-interactive runs.
//!
//! An answers file is a TOML document holding the inputs of every step.
//! [`run_to_end`] feeds it through a [`StepController`] the same way a
//! user would: fill the fields, submit, advance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Field, Kpi, Language, StepController, StepId, WizardError};

/// Inputs for a whole wizard run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Answers {
    /// Session language; the command line may override it
    pub language: Option<Language>,
    pub diagnosis: DiagnosisAnswers,
    pub journey: JourneyAnswers,
    pub manifesto: ManifestoAnswers,
    pub dashboard: DashboardAnswers,
    pub voc: VocAnswers,
    pub self_service: SelfServiceAnswers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisAnswers {
    pub feeling: String,
    pub goal: String,
    pub problem: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JourneyAnswers {
    pub channels: String,
    pub tools: String,
    pub example_response: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestoAnswers {
    pub adjectives: String,
    pub form: String,
    pub forbidden: String,
    pub preferred: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardAnswers {
    pub kpis: Vec<Kpi>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocAnswers {
    pub raw_messages: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfServiceAnswers {
    pub questions: String,
}

impl Answers {
    /// Load answers from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let answers: Self = toml::from_str(&content)?;
        Ok(answers)
    }

    /// Answer for a single field.
    pub fn get(&self, field: Field) -> &str {
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
}

/// Drive `controller` from its current step to the last one.
///
/// `on_step` is called after each step is complete, before advancing.
pub async fn run_to_end<F>(
    controller: &mut StepController,
    answers: &Answers,
    mut on_step: F,
) -> Result<(), WizardError>
where
    F: FnMut(StepId, &StepController),
{
    loop {
        let step = controller.current_step();

        for field in step.fields() {
            controller.edit(*field, answers.get(*field))?;
        }
        if step == StepId::Dashboard {
            for kpi in &answers.dashboard.kpis {
                if !controller.session().dashboard.selected_kpis.contains(kpi) {
                    controller.toggle_kpi(*kpi)?;
                }
            }
        }
        if step.is_generative() {
            controller.submit().await?;
        }

        on_step(step, controller);

        if step.is_last() {
            return Ok(());
        }
        controller.advance()?;
    }
}
