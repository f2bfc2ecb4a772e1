//! UI rendering for the TUI.
//!
//! Handles layout and widget rendering using ratatui.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::ai::Record;
use crate::app::{App, AppMode};
use crate::tui::Theme;
use crate::wizard::{ArtifactRef, Field, Kpi, StepId, StepState, REQUIRED_KPIS};

/// Draw the main UI.
pub fn draw(frame: &mut Frame, app: &App) {
    if matches!(app.mode, AppMode::Help) {
        draw_help_screen(frame, app);
        return;
    }

    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Sidebar + step
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(chunks[1]);

    draw_header(frame, app, chunks[0]);
    draw_sidebar(frame, app, body[0]);
    draw_step(frame, app, body[1]);
    draw_status_bar(frame, app, chunks[2]);

    if matches!(app.mode, AppMode::ConfirmReset) {
        draw_reset_overlay(frame, app);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let session = app.controller.session();
    let step = session.current_step();

    let title = Line::from(vec![
        Span::styled(" FRONT ", Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
        Span::styled("│ ", Style::default().fg(theme.border)),
        Span::styled(
            format!("{}/{} {}", step.number(), StepId::ALL.len(), step.label(session.language())),
            Style::default().fg(theme.text),
        ),
    ]);
    let language = Span::styled(
        format!(" {} ", session.language().code().to_uppercase()),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    );

    let header = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title_top(Line::from(language).alignment(Alignment::Right)),
    );
    frame.render_widget(header, area);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let session = app.controller.session();
    let current = session.current_step();

    let items: Vec<ListItem> = StepId::ALL
        .iter()
        .map(|step| {
            let (marker, style) = if *step == current {
                ("▶", Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
            } else if *step < current {
                ("✓", Style::default().fg(theme.success))
            } else {
                (" ", Style::default().fg(theme.text_dim))
            };
            ListItem::new(Line::from(Span::styled(
                format!(" {marker} {}. {}", step.number(), step.label(session.language())),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(" Steps "),
    );
    frame.render_widget(list, area);
}

fn draw_step(frame: &mut Frame, app: &App, area: Rect) {
    let step = app.current_step();

    if step == StepId::Dashboard {
        draw_kpi_picker(frame, app, area);
        return;
    }

    let fields = step.fields();
    let artifact = app.controller.session().artifact(step);

    if fields.is_empty() && !step.is_generative() {
        draw_open_step(frame, app, area);
        return;
    }

    let mut constraints: Vec<Constraint> = fields
        .iter()
        .map(|f| if f.is_multiline() { Constraint::Min(6) } else { Constraint::Length(3) })
        .collect();
    constraints.push(Constraint::Min(5));

    let rows =
        Layout::default().direction(Direction::Vertical).constraints(constraints).split(area);

    for (i, field) in fields.iter().enumerate() {
        draw_field(frame, app, *field, i == app.focus, rows[i]);
    }
    draw_artifact(frame, app, artifact, rows[fields.len()]);
}

fn draw_field(frame: &mut Frame, app: &App, field: Field, focused: bool, area: Rect) {
    let theme = &app.theme;
    let session = app.controller.session();
    let lang = session.language();

    let mut title = format!(" {} ", field.label(lang));
    if app.controller.suggesting() == Some(field) {
        title.push_str("… ");
    } else if focused && field.is_suggestible() {
        title.push_str("(Ctrl+G suggest) ");
    }

    let border = if focused { theme.primary } else { theme.border };
    let mut value = session.field(field).to_string();
    if focused {
        value.push('▏');
    }

    let paragraph = Paragraph::new(value)
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(title),
        );
    frame.render_widget(paragraph, area);
}

fn draw_artifact(frame: &mut Frame, app: &App, artifact: Option<ArtifactRef<'_>>, area: Rect) {
    let theme = &app.theme;
    let step = app.current_step();

    let (title, color) = match app.controller.step_state(step) {
        StepState::Generating => (" Generating… ", theme.accent),
        StepState::Complete => (" Result (Ctrl+N next, Ctrl+E export) ", theme.success),
        StepState::Editing => (" Result (Enter to generate) ", theme.border),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title);

    match artifact {
        Some(ArtifactRef::Text(text)) => {
            let paragraph = Paragraph::new(text.to_string())
                .style(Style::default().fg(theme.text))
                .wrap(Wrap { trim: false })
                .block(block);
            frame.render_widget(paragraph, area);
        }
        Some(ArtifactRef::Voc(items)) => {
            frame.render_widget(records_table(items, theme, block), area);
        }
        Some(ArtifactRef::Faq(items)) => {
            frame.render_widget(records_table(items, theme, block), area);
        }
        None => frame.render_widget(Paragraph::new("").block(block), area),
    }
}

fn records_table<'a, R: Record>(records: &'a [R], theme: &Theme, block: Block<'a>) -> Table<'a> {
    let header = Row::new(R::FIELDS.iter().map(|name| Cell::from(*name)))
        .style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD));

    let rows = records.iter().map(|record| {
        let cells: Vec<Cell> = record.values().into_iter().map(Cell::from).collect();
        Row::new(cells).style(Style::default().fg(theme.text))
    });

    let widths = vec![Constraint::Ratio(1, R::FIELDS.len() as u32); R::FIELDS.len()];
    Table::new(rows, widths).header(header).block(block)
}

fn draw_kpi_picker(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let session = app.controller.session();
    let selected = &session.dashboard.selected_kpis;

    let items: Vec<ListItem> = Kpi::ALL
        .iter()
        .enumerate()
        .map(|(i, kpi)| {
            let mark = if selected.contains(kpi) { "[x]" } else { "[ ]" };
            let mut style = Style::default().fg(theme.text);
            if i == app.kpi_cursor {
                style = style.bg(theme.selected_bg).add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(Span::styled(
                format!(" {mark} {}", kpi.label(session.language())),
                style,
            )))
        })
        .collect();

    let color = if selected.len() == REQUIRED_KPIS { theme.success } else { theme.border };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!(" KPIs {}/{} (Space toggles) ", selected.len(), REQUIRED_KPIS)),
    );
    frame.render_widget(list, area);
}

fn draw_open_step(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let step = app.current_step();
    let lang = app.controller.session().language();

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            step.label(lang),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Nothing to fill in here.", Style::default().fg(theme.text_dim))),
        Line::from(Span::styled("Press Ctrl+N to continue.", Style::default().fg(theme.text_dim))),
    ];

    let paragraph = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans = Vec::new();

    if let Some(step) = app.controller.submitting() {
        spans.push(Span::styled(
            format!(" GENERATING {step} "),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(field) = app.controller.suggesting() {
        spans.push(Span::styled(
            format!(" SUGGESTING {field} "),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    }
    if !spans.is_empty() {
        spans.push(Span::styled("│ ", Style::default().fg(theme.border)));
    }

    match &app.status_message {
        Some(message) => {
            let color = if app.status_is_error { theme.error } else { theme.success };
            spans.push(Span::styled(format!(" {message}"), Style::default().fg(color)));
        }
        None => spans.push(Span::styled(
            " F1 help • Enter generate • Ctrl+N next • Esc quit",
            Style::default().fg(theme.text_dim),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help_screen(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(2)])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        " Keyboard Shortcuts ",
        Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.primary)));
    frame.render_widget(title, chunks[0]);

    let section = |name: &'static str| {
        Line::from(Span::styled(
            name,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
    };

    let lines = vec![
        section("Editing"),
        Line::from(""),
        help_line("Tab / Shift+Tab", "Next / previous field", theme),
        help_line("Backspace", "Delete last character", theme),
        help_line("Ctrl+U", "Clear field", theme),
        help_line("Alt+Enter", "New line (long fields)", theme),
        help_line("Ctrl+G", "Suggest a value for the field", theme),
        Line::from(""),
        section("Wizard"),
        Line::from(""),
        help_line("Enter", "Generate the step result", theme),
        help_line("Ctrl+N", "Next step", theme),
        help_line("↑ / ↓, Space", "Pick KPIs on the dashboard", theme),
        help_line("F2", "Change language", theme),
        help_line("Ctrl+R", "Start over", theme),
        Line::from(""),
        section("Export"),
        Line::from(""),
        help_line("Ctrl+E", "Export the current result", theme),
        help_line("Ctrl+S", "Export everything with a report", theme),
        Line::from(""),
        help_line("Esc", "Quit", theme),
    ];
    frame.render_widget(Paragraph::new(lines), chunks[1]);

    let footer = Paragraph::new(Span::styled(
        "Press Esc or F1 to close",
        Style::default().fg(theme.text_dim),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[2]);
}

fn help_line<'a>(key: &'a str, description: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("  {:18}", key),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(description, Style::default().fg(theme.text)),
    ])
}

fn draw_reset_overlay(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();

    let popup_width = 44.min(area.width.saturating_sub(4));
    let popup_height = 5;
    let popup_area = Rect::new(
        (area.width.saturating_sub(popup_width)) / 2,
        (area.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );

    frame.render_widget(Clear, popup_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Discard all answers and results?",
            Style::default().fg(theme.text),
        )),
        Line::from(vec![
            Span::styled(" [y] Yes  ", Style::default().fg(theme.error)),
            Span::styled("[n] No", Style::default().fg(theme.text_dim)),
        ]),
    ];

    let popup = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.warning))
            .title(" Start over ")
            .title_style(Style::default().fg(theme.warning).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(popup, popup_area);
}
