//! KPI catalogue for the dashboard step.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Language;

/// A dashboard indicator the user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kpi {
    Csat,
    Nps,
    Ces,
    FirstContactResolution,
    FirstResponseTime,
    ResolutionTime,
    SelfServiceRate,
    Backlog,
}

impl Kpi {
    /// The full catalogue, in display order.
    pub const ALL: [Self; 8] = [
        Self::Csat,
        Self::Nps,
        Self::Ces,
        Self::FirstContactResolution,
        Self::FirstResponseTime,
        Self::ResolutionTime,
        Self::SelfServiceRate,
        Self::Backlog,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Csat => "csat",
            Self::Nps => "nps",
            Self::Ces => "ces",
            Self::FirstContactResolution => "first_contact_resolution",
            Self::FirstResponseTime => "first_response_time",
            Self::ResolutionTime => "resolution_time",
            Self::SelfServiceRate => "self_service_rate",
            Self::Backlog => "backlog",
        }
    }

    /// Display name. Acronyms stay untranslated.
    pub fn label(self, lang: Language) -> &'static str {
        use Language::{De, En, Es, Pl};
        match (self, lang) {
            (Self::Csat, _) => "CSAT",
            (Self::Nps, _) => "NPS",
            (Self::Ces, _) => "CES",
            (Self::FirstContactResolution, _) => "FCR",
            (Self::FirstResponseTime, Pl) => "Czas pierwszej odpowiedzi",
            (Self::FirstResponseTime, En) => "First response time",
            (Self::FirstResponseTime, De) => "Erstreaktionszeit",
            (Self::FirstResponseTime, Es) => "Tiempo de primera respuesta",
            (Self::ResolutionTime, Pl) => "Czas rozwiązania",
            (Self::ResolutionTime, En) => "Resolution time",
            (Self::ResolutionTime, De) => "Lösungszeit",
            (Self::ResolutionTime, Es) => "Tiempo de resolución",
            (Self::SelfServiceRate, Pl) => "Wskaźnik samoobsługi",
            (Self::SelfServiceRate, En) => "Self-service rate",
            (Self::SelfServiceRate, De) => "Self-Service-Quote",
            (Self::SelfServiceRate, Es) => "Tasa de autoservicio",
            (Self::Backlog, Pl) => "Zaległości",
            (Self::Backlog, En) => "Backlog",
            (Self::Backlog, De) => "Rückstand",
            (Self::Backlog, Es) => "Pendientes",
        }
    }
}

impl fmt::Display for Kpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
