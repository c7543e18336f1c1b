//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::format_elapsed;
use crate::data::StatusPage;

/// Render the header bar with the page title and fleet counts.
pub fn render_header(frame: &mut Frame, app: &App, page: &StatusPage<'_>, area: Rect) {
    let title = Span::styled(
        format!(" {} ", page.title),
        Style::default().add_modifier(Modifier::BOLD),
    );

    if app.state.is_none() {
        let line = Line::from(vec![title, Span::raw("| Loading...")]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let counts = page.counts;
    let dim = Style::default().add_modifier(Modifier::DIM);
    let count_span = |n: usize, style: Style| {
        if n > 0 {
            Span::styled(n.to_string(), style)
        } else {
            Span::styled("0", dim)
        }
    };

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.overall_style(page.fleet.status)),
        title,
        Span::raw("│ "),
        count_span(counts.up, Style::default().fg(app.theme.healthy)),
        Span::raw(" up "),
        count_span(
            counts.down,
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" down "),
        count_span(counts.maintenance, Style::default().fg(app.theme.warning)),
        Span::raw(" maint │ "),
        Span::styled(counts.total().to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" monitors"),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, page: &StatusPage<'_>, area: Rect) {
    let windows = page.maintenance.active.len() + page.maintenance.upcoming.len();
    let titles: Vec<Line> = vec![
        Line::from(" 1:Status "),
        Line::from(format!(" 2:Maintenance ({}) ", windows)),
    ];

    let selected = match app.current_view {
        View::Status => 0,
        View::Maintenance => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the source, time since the checker's last update and the controls.
/// Temporary messages and source errors take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = match (&app.state, &app.load_error) {
        (Some(state), error) => {
            let controls = if app.filter_active {
                "Type to search | Enter:apply Esc:cancel"
            } else {
                match app.current_view {
                    View::Status => "/:search f:filter Space:group Enter:detail Tab:switch ?:help q:quit",
                    View::Maintenance => "↑↓:select Tab:switch ?:help q:quit",
                }
            };
            let error = error
                .as_ref()
                .map(|e| format!(" | {}", e))
                .unwrap_or_default();

            format!(
                " {} | Updated {} ago{} | {}",
                app.source_description(),
                format_elapsed(app.now - state.last_update),
                error,
                controls,
            )
        }
        (None, Some(err)) => format!(" Error: {} | q:quit r:retry", err),
        (None, None) => " Loading... | q:quit".to_string(),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(title, Style::default().add_modifier(Modifier::BOLD))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Monitor detail"),
        Line::from("  Space       Expand/collapse group"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Filtering"),
        Line::from("  /         Search by name or id"),
        Line::from("  c         Clear search"),
        Line::from("  f         All / Issues / Maintenance"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Reload state"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 25u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
