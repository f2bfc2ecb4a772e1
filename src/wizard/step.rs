//! Step identity, session language and the settable input fields.
//!
//! Every step/field pair is a variant of [`Field`], so writing into the
//! session is an exhaustive match instead of a walk over string keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output language of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Polish
    #[default]
    Pl,
    /// English
    En,
    /// German
    De,
    /// Spanish
    Es,
}

impl Language {
    /// All supported languages, in selector order.
    pub const ALL: [Self; 4] = [Self::Pl, Self::En, Self::De, Self::Es];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Pl => "pl",
            Self::En => "en",
            Self::De => "de",
            Self::Es => "es",
        }
    }

    /// English name of the language, used inside prompts.
    pub fn english_name(self) -> &'static str {
        match self {
            Self::Pl => "Polish",
            Self::En => "English",
            Self::De => "German",
            Self::Es => "Spanish",
        }
    }

    /// The next language in selector order, wrapping around.
    pub fn cycle(self) -> Self {
        match self {
            Self::Pl => Self::En,
            Self::En => Self::De,
            Self::De => Self::Es,
            Self::Es => Self::Pl,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// What must hold before a step may be left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// A generated artifact must be present and non-empty.
    Artifact,
    /// Exactly this many KPIs must be selected.
    Selection(usize),
    /// The step can always be left.
    Open,
}

/// The nine wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Diagnosis,
    Journey,
    Manifesto,
    Dashboard,
    Voc,
    SelfService,
    Sprint,
    Feedback,
    Proactive,
}

/// Number of KPIs the dashboard step requires.
pub const REQUIRED_KPIS: usize = 3;

impl StepId {
    /// All steps in wizard order.
    pub const ALL: [Self; 9] = [
        Self::Diagnosis,
        Self::Journey,
        Self::Manifesto,
        Self::Dashboard,
        Self::Voc,
        Self::SelfService,
        Self::Sprint,
        Self::Feedback,
        Self::Proactive,
    ];

    /// 1-based ordinal of the step.
    pub fn number(self) -> u8 {
        match self {
            Self::Diagnosis => 1,
            Self::Journey => 2,
            Self::Manifesto => 3,
            Self::Dashboard => 4,
            Self::Voc => 5,
            Self::SelfService => 6,
            Self::Sprint => 7,
            Self::Feedback => 8,
            Self::Proactive => 9,
        }
    }

    /// Look a step up by its 1-based ordinal.
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.number() == n)
    }

    /// The following step, or `None` for the last one.
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// Whether this is the terminal step.
    pub fn is_last(self) -> bool {
        self.next().is_none()
    }

    /// Advancement gate for this step.
    pub fn gate(self) -> Gate {
        match self {
            Self::Diagnosis
            | Self::Journey
            | Self::Manifesto
            | Self::Voc
            | Self::SelfService
            | Self::Proactive => Gate::Artifact,
            Self::Dashboard => Gate::Selection(REQUIRED_KPIS),
            Self::Sprint | Self::Feedback => Gate::Open,
        }
    }

    /// Whether submitting this step calls the generation gateway.
    pub fn is_generative(self) -> bool {
        self.gate() == Gate::Artifact
    }

    /// Required input fields of the step.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::Diagnosis => &[Field::Feeling, Field::Goal, Field::Problem],
            Self::Journey => &[Field::Channels, Field::Tools, Field::ExampleResponse],
            Self::Manifesto => {
                &[Field::Adjectives, Field::Form, Field::Forbidden, Field::Preferred]
            }
            Self::Voc => &[Field::RawMessages],
            Self::SelfService => &[Field::Questions],
            Self::Dashboard | Self::Sprint | Self::Feedback | Self::Proactive => &[],
        }
    }

    /// Stable identifier used in file names and serialized sessions.
    pub fn key(self) -> &'static str {
        match self {
            Self::Diagnosis => "diagnosis",
            Self::Journey => "journey",
            Self::Manifesto => "manifesto",
            Self::Dashboard => "dashboard",
            Self::Voc => "voc",
            Self::SelfService => "self_service",
            Self::Sprint => "sprint",
            Self::Feedback => "feedback",
            Self::Proactive => "proactive",
        }
    }

    /// Sidebar label in the given language.
    pub fn label(self, lang: Language) -> &'static str {
        use Language::{De, En, Es, Pl};
        match (self, lang) {
            (Self::Diagnosis, Pl) => "Diagnoza",
            (Self::Diagnosis, En) => "Diagnosis",
            (Self::Diagnosis, De) => "Diagnose",
            (Self::Diagnosis, Es) => "Diagnóstico",
            (Self::Journey, Pl) => "Mapa",
            (Self::Journey, En) => "Journey Map",
            (Self::Journey, De) => "Customer Journey",
            (Self::Journey, Es) => "Mapa del cliente",
            (Self::Manifesto, Pl) => "Manifest",
            (Self::Manifesto, En) => "Manifesto",
            (Self::Manifesto, De) => "Manifest",
            (Self::Manifesto, Es) => "Manifiesto",
            (Self::Dashboard, _) => "Dashboard",
            (Self::Voc, Pl) => "Głos Klienta",
            (Self::Voc, En) => "Voice of Customer",
            (Self::Voc, De) => "Kundenstimme",
            (Self::Voc, Es) => "Voz del cliente",
            (Self::SelfService, Pl) => "Samoobsługa",
            (Self::SelfService, En) => "Self-service",
            (Self::SelfService, De) => "Self-Service",
            (Self::SelfService, Es) => "Autoservicio",
            (Self::Sprint, _) => "Sprint",
            (Self::Feedback, _) => "Feedback",
            (Self::Proactive, Pl) => "Strategia",
            (Self::Proactive, En) => "Strategy",
            (Self::Proactive, De) => "Strategie",
            (Self::Proactive, Es) => "Estrategia",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A settable text input of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Feeling,
    Goal,
    Problem,
    Channels,
    Tools,
    ExampleResponse,
    Adjectives,
    Form,
    Forbidden,
    Preferred,
    RawMessages,
    Questions,
}

impl Field {
    /// Every field, grouped by step.
    pub const ALL: [Self; 12] = [
        Self::Feeling,
        Self::Goal,
        Self::Problem,
        Self::Channels,
        Self::Tools,
        Self::ExampleResponse,
        Self::Adjectives,
        Self::Form,
        Self::Forbidden,
        Self::Preferred,
        Self::RawMessages,
        Self::Questions,
    ];

    /// Step the field belongs to.
    pub fn step(self) -> StepId {
        match self {
            Self::Feeling | Self::Goal | Self::Problem => StepId::Diagnosis,
            Self::Channels | Self::Tools | Self::ExampleResponse => StepId::Journey,
            Self::Adjectives | Self::Form | Self::Forbidden | Self::Preferred => {
                StepId::Manifesto
            }
            Self::RawMessages => StepId::Voc,
            Self::Questions => StepId::SelfService,
        }
    }

    /// Whether per-field AI suggestion is offered for this field.
    pub fn is_suggestible(self) -> bool {
        matches!(self.step(), StepId::Diagnosis | StepId::Journey | StepId::Manifesto)
    }

    /// Whether the field takes multi-line input.
    pub fn is_multiline(self) -> bool {
        matches!(self, Self::ExampleResponse | Self::RawMessages | Self::Questions)
    }

    /// Stable identifier, as used in answers files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::Feeling => "feeling",
            Self::Goal => "goal",
            Self::Problem => "problem",
            Self::Channels => "channels",
            Self::Tools => "tools",
            Self::ExampleResponse => "example_response",
            Self::Adjectives => "adjectives",
            Self::Form => "form",
            Self::Forbidden => "forbidden",
            Self::Preferred => "preferred",
            Self::RawMessages => "raw_messages",
            Self::Questions => "questions",
        }
    }

    /// Label sent to the model when asking for a suggestion.
    pub fn prompt_label(self) -> &'static str {
        match self {
            Self::Feeling => "Customer Feeling",
            Self::Goal => "Business Goal",
            Self::Problem => "Main Pain Point",
            Self::Channels => "Contact Channels",
            Self::Tools => "Support Tools",
            Self::ExampleResponse => "Example Agent Response",
            Self::Adjectives => "Brand Voice Adjectives",
            Self::Form => "Form of Address",
            Self::Forbidden => "Forbidden Phrase",
            Self::Preferred => "Preferred Phrase",
            Self::RawMessages => "Raw Customer Messages",
            Self::Questions => "Frequent Questions",
        }
    }

    /// Form label in the given language.
    pub fn label(self, lang: Language) -> &'static str {
        use Language::{De, En, Es, Pl};
        match (self, lang) {
            (_, En) => self.prompt_label(),
            (Self::Feeling, Pl) => "Uczucie klienta",
            (Self::Feeling, De) => "Kundengefühl",
            (Self::Feeling, Es) => "Sentimiento del cliente",
            (Self::Goal, Pl) => "Cel biznesowy",
            (Self::Goal, De) => "Geschäftsziel",
            (Self::Goal, Es) => "Objetivo de negocio",
            (Self::Problem, Pl) => "Główny problem",
            (Self::Problem, De) => "Hauptproblem",
            (Self::Problem, Es) => "Problema principal",
            (Self::Channels, Pl) => "Kanały kontaktu",
            (Self::Channels, De) => "Kontaktkanäle",
            (Self::Channels, Es) => "Canales de contacto",
            (Self::Tools, Pl) => "Narzędzia",
            (Self::Tools, De) => "Werkzeuge",
            (Self::Tools, Es) => "Herramientas",
            (Self::ExampleResponse, Pl) => "Przykładowa odpowiedź",
            (Self::ExampleResponse, De) => "Beispielantwort",
            (Self::ExampleResponse, Es) => "Respuesta de ejemplo",
            (Self::Adjectives, Pl) => "Przymiotniki marki",
            (Self::Adjectives, De) => "Markenadjektive",
            (Self::Adjectives, Es) => "Adjetivos de marca",
            (Self::Form, Pl) => "Forma zwracania się",
            (Self::Form, De) => "Anredeform",
            (Self::Form, Es) => "Forma de tratamiento",
            (Self::Forbidden, Pl) => "Zakazany zwrot",
            (Self::Forbidden, De) => "Verbotene Phrase",
            (Self::Forbidden, Es) => "Frase prohibida",
            (Self::Preferred, Pl) => "Pożądany zwrot",
            (Self::Preferred, De) => "Bevorzugte Phrase",
            (Self::Preferred, Es) => "Frase preferida",
            (Self::RawMessages, Pl) => "Wiadomości od klientów",
            (Self::RawMessages, De) => "Kundennachrichten",
            (Self::RawMessages, Es) => "Mensajes de clientes",
            (Self::Questions, Pl) => "Najczęstsze pytania",
            (Self::Questions, De) => "Häufige Fragen",
            (Self::Questions, Es) => "Preguntas frecuentes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.key() == wanted)
            .ok_or_else(|| format!("unknown field: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbers_are_contiguous() {
        for (idx, step) in StepId::ALL.iter().enumerate() {
            assert_eq!(usize::from(step.number()), idx + 1);
            assert_eq!(StepId::from_number(step.number()), Some(*step));
        }
        assert_eq!(StepId::from_number(0), None);
        assert_eq!(StepId::from_number(10), None);
    }

    #[test]
    fn test_only_proactive_is_last() {
        assert!(StepId::Proactive.is_last());
        assert_eq!(StepId::Feedback.next(), Some(StepId::Proactive));
        assert!(StepId::ALL[..8].iter().all(|s| !s.is_last()));
    }

    #[test]
    fn test_gates() {
        assert_eq!(StepId::Diagnosis.gate(), Gate::Artifact);
        assert_eq!(StepId::Dashboard.gate(), Gate::Selection(3));
        assert_eq!(StepId::Sprint.gate(), Gate::Open);
        assert!(!StepId::Feedback.is_generative());
        assert!(StepId::Proactive.is_generative());
    }

    #[test]
    fn test_fields_belong_to_their_step() {
        for step in StepId::ALL {
            for field in step.fields() {
                assert_eq!(field.step(), step);
            }
        }
        let listed: usize = StepId::ALL.iter().map(|s| s.fields().len()).sum();
        assert_eq!(listed, Field::ALL.len());
    }

    #[test]
    fn test_suggestible_fields_are_first_three_steps() {
        assert!(Field::Feeling.is_suggestible());
        assert!(Field::Preferred.is_suggestible());
        assert!(!Field::RawMessages.is_suggestible());
        assert!(!Field::Questions.is_suggestible());
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("feeling".parse::<Field>(), Ok(Field::Feeling));
        assert_eq!("example-response".parse::<Field>(), Ok(Field::ExampleResponse));
        assert!("nope".parse::<Field>().is_err());
    }

    #[test]
    fn test_language_wire_format_and_cycle() {
        assert_eq!(serde_json::to_value(Language::De).unwrap(), "de");
        assert!(serde_json::from_str::<Language>("\"fr\"").is_err());
        let mut lang = Language::Pl;
        for _ in 0..4 {
            lang = lang.cycle();
        }
        assert_eq!(lang, Language::Pl);
    }
}
