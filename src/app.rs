//! Application state for the interactive wizard.
//!
//! `App` owns the [`StepController`] and everything the screen needs on top
//! of it: focus, mode, status line. Gateway calls run on the tokio runtime
//! and report back through a channel drained on every tick, so the UI
//! thread never blocks on the network.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use tokio::runtime::Handle;

use crate::ai::{AIError, GenerationResult};
use crate::core::Config;
use crate::export;
use crate::tui::Theme;
use crate::wizard::{Field, Kpi, StepController, StepId, SubmitTicket, SuggestTicket, WizardError};

/// Outcome of a gateway call, sent from the runtime back to the UI thread.
#[derive(Debug)]
pub enum Completion {
    Submit(SubmitTicket, Result<GenerationResult, AIError>),
    Suggest(SuggestTicket, Result<GenerationResult, AIError>),
}

/// Application modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Editing the active step
    #[default]
    Normal,

    /// Showing help screen with keyboard shortcuts
    Help,

    /// Asking whether to discard the session
    ConfirmReset,
}

/// Main application state.
pub struct App {
    /// Session owner
    pub controller: StepController,

    /// Application configuration
    pub config: Config,

    /// Current UI theme
    pub theme: Theme,

    /// Current mode of the application
    pub mode: AppMode,

    /// Index of the focused field within the active step
    pub focus: usize,

    /// Highlighted row of the KPI list
    pub kpi_cursor: usize,

    /// Status message to display (if any)
    pub status_message: Option<String>,

    /// Whether the last status message reports a failure
    pub status_is_error: bool,

    /// Whether the application should quit
    pub should_quit: bool,

    /// Directory exports are written to
    pub export_dir: PathBuf,

    runtime: Handle,
    completions_tx: Sender<Completion>,
    completions_rx: Receiver<Completion>,
}

impl App {
    /// Create the application around an existing controller.
    ///
    /// `runtime` runs the gateway calls.
    pub fn new(controller: StepController, config: Config, runtime: Handle) -> Self {
        let theme = Theme::by_name(&config.ui.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.ui.theme, "Unknown theme, using default");
            Theme::default()
        });
        let export_dir = config.general.export_dir.clone();
        let (completions_tx, completions_rx) = mpsc::channel();

        Self {
            controller,
            config,
            theme,
            mode: AppMode::default(),
            focus: 0,
            kpi_cursor: 0,
            status_message: None,
            status_is_error: false,
            should_quit: false,
            export_dir,
            runtime,
            completions_tx,
            completions_rx,
        }
    }

    /// The step shown on screen.
    pub fn current_step(&self) -> StepId {
        self.controller.current_step()
    }

    /// The field that receives typed characters, if the step has fields.
    pub fn focused_field(&self) -> Option<Field> {
        self.current_step().fields().get(self.focus).copied()
    }

    /// Whether any gateway call is in flight.
    pub fn is_busy(&self) -> bool {
        self.controller.submitting().is_some() || self.controller.suggesting().is_some()
    }

    // --- Focus and editing ---

    pub fn focus_next(&mut self) {
        let count = self.current_step().fields().len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn focus_previous(&mut self) {
        let count = self.current_step().fields().len();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    /// Append a character to the focused field.
    pub fn enter_char(&mut self, c: char) {
        self.update_focused(|value| value.push(c));
    }

    /// Delete the last character of the focused field.
    pub fn delete_char(&mut self) {
        self.update_focused(|value| {
            value.pop();
        });
    }

    /// Start a new line in a multi-line field.
    pub fn insert_newline(&mut self) {
        if self.focused_field().is_some_and(Field::is_multiline) {
            self.enter_char('\n');
        }
    }

    /// Clear the focused field.
    pub fn clear_field(&mut self) {
        self.update_focused(String::clear);
    }

    fn update_focused(&mut self, change: impl FnOnce(&mut String)) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let mut value = self.controller.session().field(field).to_string();
        change(&mut value);
        if let Err(e) = self.controller.edit(field, value) {
            self.set_error(e);
        }
    }

    // --- Dashboard ---

    pub fn kpi_up(&mut self) {
        self.kpi_cursor = self.kpi_cursor.saturating_sub(1);
    }

    pub fn kpi_down(&mut self) {
        if self.kpi_cursor + 1 < Kpi::ALL.len() {
            self.kpi_cursor += 1;
        }
    }

    /// Select or deselect the KPI under the cursor.
    pub fn toggle_kpi(&mut self) {
        let Some(kpi) = Kpi::ALL.get(self.kpi_cursor).copied() else {
            return;
        };
        let lang = self.controller.session().language();
        match self.controller.toggle_kpi(kpi) {
            Ok(true) => self.set_status(format!("+ {}", kpi.label(lang))),
            Ok(false) => self.set_status(format!("- {}", kpi.label(lang))),
            Err(e) => self.set_error(e),
        }
    }

    // --- Gateway calls ---

    /// Validate the active step and start generating its artifact.
    pub fn submit(&mut self) {
        match self.controller.begin_submit() {
            Ok(ticket) => {
                self.set_status(format!("Generating {}...", ticket.step()));
                let gateway = self.controller.gateway();
                let tx = self.completions_tx.clone();
                self.runtime.spawn(async move {
                    let outcome = gateway.generate(ticket.request()).await;
                    let _ = tx.send(Completion::Submit(ticket, outcome));
                });
            }
            Err(e) => self.set_error(e),
        }
    }

    /// Ask for a suggestion for the focused field.
    pub fn suggest(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        match self.controller.begin_suggest(field) {
            Ok(ticket) => {
                self.set_status(format!("Suggesting {field}..."));
                let gateway = self.controller.gateway();
                let tx = self.completions_tx.clone();
                self.runtime.spawn(async move {
                    let outcome = gateway.generate(ticket.request()).await;
                    let _ = tx.send(Completion::Suggest(ticket, outcome));
                });
            }
            Err(e) => self.set_error(e),
        }
    }

    /// Apply one finished gateway call.
    pub fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Submit(ticket, outcome) => {
                match self.controller.finish_submit(ticket, outcome) {
                    Ok(_) => self.set_status("Done"),
                    Err(WizardError::StaleResult) => {}
                    Err(e) => self.set_error(e),
                }
            }
            Completion::Suggest(ticket, outcome) => {
                let field = ticket.field();
                match self.controller.finish_suggest(ticket, outcome) {
                    Ok(()) => self.set_status(format!("Suggested {field}")),
                    Err(WizardError::StaleResult) => {}
                    Err(e) => self.set_error(e),
                }
            }
        }
    }

    // --- Navigation ---

    /// Move to the next step.
    pub fn advance(&mut self) {
        match self.controller.advance() {
            Ok(step) => {
                self.focus = 0;
                self.kpi_cursor = 0;
                self.set_status(step.label(self.controller.session().language()));
            }
            Err(e) => self.set_error(e),
        }
    }

    pub fn cycle_language(&mut self) {
        let next = self.controller.session().language().cycle();
        self.controller.set_language(next);
        self.set_status(next.english_name());
    }

    pub fn request_reset(&mut self) {
        self.mode = AppMode::ConfirmReset;
    }

    pub fn confirm_reset(&mut self) {
        self.controller.reset();
        self.focus = 0;
        self.kpi_cursor = 0;
        self.mode = AppMode::Normal;
        self.set_status("Session reset");
    }

    pub fn cancel_reset(&mut self) {
        self.mode = AppMode::Normal;
    }

    // --- Export ---

    /// Export the artifact of the active step.
    pub fn export_current(&mut self) {
        let step = self.current_step();
        let result = export::export_step(
            self.controller.session(),
            step,
            &self.export_dir,
            &export::timestamp(),
        );
        match result {
            Ok(path) => self.set_status(format!("Exported {}", path.display())),
            Err(e) => self.set_error(e),
        }
    }

    /// Export every artifact and the session report.
    pub fn export_all(&mut self) {
        match export::export_session(self.controller.session(), &self.export_dir) {
            Ok(paths) => self.set_status(format!(
                "Exported {} files to {}",
                paths.len(),
                self.export_dir.display()
            )),
            Err(e) => self.set_error(e),
        }
    }

    // --- Lifecycle ---

    /// Set a status message to display temporarily.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    /// Show a failure in the status bar.
    pub fn set_error(&mut self, error: impl std::fmt::Display) {
        self.status_message = Some(error.to_string());
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Request the application to quit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Drain finished gateway calls (called on tick).
    pub fn tick(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply_completion(completion);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{settle, test_app};
    use super::*;
    use crate::wizard::StepState;

    #[test]
    fn test_app_creation() {
        let (_rt, app) = test_app();
        assert_eq!(app.current_step(), StepId::Diagnosis);
        assert_eq!(app.focused_field(), Some(Field::Feeling));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let (_rt, mut app) = test_app();
        app.enter_char('o');
        app.enter_char('k');
        app.focus_next();
        app.enter_char('x');
        app.delete_char();

        assert_eq!(app.controller.session().field(Field::Feeling), "ok");
        assert!(app.controller.session().field(Field::Goal).is_empty());
    }

    #[test]
    fn test_focus_wraps() {
        let (_rt, mut app) = test_app();
        app.focus_previous();
        assert_eq!(app.focused_field(), Some(Field::Problem));
        app.focus_next();
        assert_eq!(app.focused_field(), Some(Field::Feeling));
    }

    #[test]
    fn test_newline_only_in_multiline_fields() {
        let (_rt, mut app) = test_app();
        app.insert_newline();
        assert!(app.controller.session().field(Field::Feeling).is_empty());
    }

    #[test]
    fn test_submit_with_missing_fields_shows_error() {
        let (_rt, mut app) = test_app();
        app.submit();
        assert!(app.status_is_error);
        assert!(!app.is_busy());
    }

    #[test]
    fn test_submit_then_advance() {
        let (_rt, mut app) = test_app();
        for field in [Field::Feeling, Field::Goal, Field::Problem] {
            app.controller.edit(field, "x").unwrap();
        }

        app.submit();
        settle(&mut app);
        assert_eq!(app.controller.step_state(StepId::Diagnosis), StepState::Complete);

        app.advance();
        assert_eq!(app.current_step(), StepId::Journey);
        assert_eq!(app.focus, 0);
    }

    #[test]
    fn test_suggest_fills_focused_field() {
        let (_rt, mut app) = test_app();
        app.suggest();
        settle(&mut app);
        assert_eq!(app.controller.session().field(Field::Feeling), "calm");
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let (_rt, mut app) = test_app();
        app.enter_char('a');
        app.request_reset();
        assert_eq!(app.mode, AppMode::ConfirmReset);
        app.cancel_reset();
        assert_eq!(app.controller.session().field(Field::Feeling), "a");

        app.request_reset();
        app.confirm_reset();
        assert!(app.controller.session().field(Field::Feeling).is_empty());
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_cycle_language() {
        let (_rt, mut app) = test_app();
        app.cycle_language();
        assert_ne!(app.controller.session().language(), crate::wizard::Language::En);
    }
}
