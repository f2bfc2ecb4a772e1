//! Input handling for the TUI.
//!
//! Processes keyboard events and updates application state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};
use crate::wizard::StepId;

/// Handle keyboard events.
pub fn handle_events(key: KeyEvent, app: &mut App) {
    match app.mode {
        AppMode::Help => handle_help_mode(key, app),
        AppMode::ConfirmReset => handle_confirm_reset_mode(key, app),
        AppMode::Normal => handle_normal_mode(key, app),
    }
}

/// Handle input in help mode.
fn handle_help_mode(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q') | KeyCode::Enter => {
            app.dismiss_help();
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
        }
        _ => {}
    }
}

/// Handle input while the reset confirmation is shown.
fn handle_confirm_reset_mode(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => app.confirm_reset(),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => app.cancel_reset(),
        _ => {}
    }
}

fn handle_normal_mode(key: KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let on_dashboard = app.current_step() == StepId::Dashboard;

    match key.code {
        // Quit
        KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if ctrl => app.quit(),

        KeyCode::F(1) => app.show_help(),
        KeyCode::F(2) => app.cycle_language(),

        // Wizard actions
        KeyCode::Char('g') if ctrl => app.suggest(),
        KeyCode::Char('n') if ctrl => app.advance(),
        KeyCode::Char('e') if ctrl => app.export_current(),
        KeyCode::Char('s') if ctrl => app.export_all(),
        KeyCode::Char('r') if ctrl => app.request_reset(),
        KeyCode::Char('u') if ctrl => app.clear_field(),

        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => app.insert_newline(),
        KeyCode::Enter => app.submit(),

        // Focus
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_previous(),

        // KPI picker
        KeyCode::Up if on_dashboard => app.kpi_up(),
        KeyCode::Down if on_dashboard => app.kpi_down(),
        KeyCode::Char(' ') if on_dashboard => app.toggle_kpi(),

        // Text input
        KeyCode::Char(c) if !ctrl => app.enter_char(c),
        KeyCode::Backspace => app.delete_char(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{settle, test_app};
    use crate::wizard::{Field, Kpi};

    fn create_key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_events(create_key_event(code, KeyModifiers::NONE), app);
    }

    fn ctrl(app: &mut App, c: char) {
        handle_events(create_key_event(KeyCode::Char(c), KeyModifiers::CONTROL), app);
    }

    #[test]
    fn test_quit_on_escape() {
        let (_rt, mut app) = test_app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_quit_on_ctrl_c() {
        let (_rt, mut app) = test_app();
        ctrl(&mut app, 'c');
        assert!(app.should_quit);
    }

    #[test]
    fn test_char_input_and_backspace() {
        let (_rt, mut app) = test_app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.controller.session().field(Field::Feeling), "a");
    }

    #[test]
    fn test_tab_moves_focus() {
        let (_rt, mut app) = test_app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.controller.session().field(Field::Goal), "g");

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_field(), Some(Field::Feeling));
    }

    #[test]
    fn test_ctrl_g_suggests() {
        let (_rt, mut app) = test_app();
        ctrl(&mut app, 'g');
        settle(&mut app);
        assert_eq!(app.controller.session().field(Field::Feeling), "calm");
    }

    #[test]
    fn test_advance_blocked_until_complete() {
        let (_rt, mut app) = test_app();
        ctrl(&mut app, 'n');
        assert_eq!(app.current_step(), StepId::Diagnosis);
        assert!(app.status_is_error);
    }

    #[test]
    fn test_space_toggles_kpi_on_dashboard() {
        let (_rt, mut app) = test_app();
        for field in [Field::Feeling, Field::Goal, Field::Problem] {
            app.controller.edit(field, "x").unwrap();
        }
        press(&mut app, KeyCode::Enter);
        settle(&mut app);
        ctrl(&mut app, 'n');
        for field in [Field::Channels, Field::Tools, Field::ExampleResponse] {
            app.controller.edit(field, "x").unwrap();
        }
        press(&mut app, KeyCode::Enter);
        settle(&mut app);
        ctrl(&mut app, 'n');
        for field in [Field::Adjectives, Field::Form, Field::Forbidden, Field::Preferred] {
            app.controller.edit(field, "x").unwrap();
        }
        press(&mut app, KeyCode::Enter);
        settle(&mut app);
        ctrl(&mut app, 'n');
        assert_eq!(app.current_step(), StepId::Dashboard);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.controller.session().dashboard.selected_kpis, vec![Kpi::ALL[1]]);
    }

    #[test]
    fn test_reset_confirmation_flow() {
        let (_rt, mut app) = test_app();
        press(&mut app, KeyCode::Char('x'));
        ctrl(&mut app, 'r');
        assert_eq!(app.mode, AppMode::ConfirmReset);

        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.controller.session().field(Field::Feeling).is_empty());
    }

    #[test]
    fn test_help_toggle() {
        let (_rt, mut app) = test_app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, AppMode::Help);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!app.should_quit);
    }
}
