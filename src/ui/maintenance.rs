//! Maintenance view rendering.
//!
//! Lists active windows first, then upcoming ones soonest first.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::config::MaintenanceWindow;
use crate::data::duration::{format_elapsed, format_timestamp};
use crate::data::StatusPage;

fn affected(window: &MaintenanceWindow, page: &StatusPage<'_>) -> String {
    match &window.monitors {
        None => "All monitors".to_string(),
        Some(ids) => ids
            .iter()
            .map(|id| page.row(id).map_or(id.as_str(), |r| r.monitor.name.as_str()))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn window_row<'a>(app: &App, page: &StatusPage<'_>, window: &MaintenanceWindow, active: bool) -> Row<'a> {
    let (state, timing) = if active {
        let until = match window.end_ts() {
            Some(end) => format!("ends in {}", format_elapsed(end - page.now)),
            None => "until further notice".to_string(),
        };
        (Cell::from("Active").style(Style::default().fg(app.theme.warning)), until)
    } else {
        (
            Cell::from("Upcoming").style(Style::default().fg(app.theme.highlight)),
            format!("starts in {}", format_elapsed(window.start_ts() - page.now)),
        )
    };

    let schedule = match window.end_ts() {
        Some(end) => format!("{} → {}", format_timestamp(window.start_ts()), format_timestamp(end)),
        None => format!("{} →", format_timestamp(window.start_ts())),
    };

    let title = if window.body.is_empty() {
        window.title.clone()
    } else {
        format!("{}: {}", window.title, window.body)
    };

    Row::new(vec![
        state,
        Cell::from(title),
        Cell::from(affected(window, page)),
        Cell::from(schedule),
        Cell::from(timing),
    ])
}

/// Render the Maintenance view.
pub fn render(frame: &mut Frame, app: &App, page: &StatusPage<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(
            " Maintenance ({} active, {} upcoming) ",
            page.maintenance.active.len(),
            page.maintenance.upcoming.len()
        ))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let rows: Vec<Row> = page
        .maintenance
        .active
        .iter()
        .map(|w| window_row(app, page, w, true))
        .chain(page.maintenance.upcoming.iter().map(|w| window_row(app, page, w, false)))
        .collect();

    if rows.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No scheduled maintenance",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("State"),
        Cell::from("Title"),
        Cell::from("Affects"),
        Cell::from("Schedule"),
        Cell::from("When"),
    ])
    .height(1)
    .style(app.theme.header);

    let widths = [
        Constraint::Length(9),  // State
        Constraint::Fill(3),    // Title
        Constraint::Fill(2),    // Affects
        Constraint::Length(36), // Schedule
        Constraint::Length(20), // When
    ];

    let selected = app.selected_window_index.min(rows.len().saturating_sub(1));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
