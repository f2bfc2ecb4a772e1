//! The nine-step wizard.
//!
//! This module contains the session data model, the step definitions and
//! the controller that moves a session forward.

mod answers;
mod controller;
mod kpi;
mod session;
mod step;

pub use answers::{run_to_end, Answers};
pub use controller::{StepController, StepState, SubmitTicket, SuggestTicket, WizardError};
pub use kpi::Kpi;
pub use session::{
    ArtifactMismatch, ArtifactRef, Dashboard, Diagnosis, Journey, Manifesto, Proactive,
    SelfService, Session, Voc,
};
pub use step::{Field, Gate, Language, StepId, REQUIRED_KPIS};
