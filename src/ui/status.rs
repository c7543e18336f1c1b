//! Status view rendering.
//!
//! Fleet banner, SLA cards, and the monitor list (flat or grouped).

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::config::MonitorTarget;
use crate::data::{GroupView, Listing, MonitorStatus, StatusPage};
use crate::ui::render_sparkline;

/// Render the Status view.
pub fn render(frame: &mut Frame, app: &App, page: &StatusPage<'_>, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Banner
        Constraint::Length(3), // SLA cards
        Constraint::Min(5),    // Monitor list
    ])
    .split(area);

    render_banner(frame, app, page, chunks[0]);
    render_sla(frame, app, page, chunks[1]);
    render_list(frame, app, page, chunks[2]);
}

fn bordered<'a>(app: &App, title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

fn render_banner(frame: &mut Frame, app: &App, page: &StatusPage<'_>, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", page.fleet.status.message()),
        app.theme.overall_style(page.fleet.status),
    )];

    if !page.maintenance.active.is_empty() {
        spans.push(Span::styled(
            format!(" │ {} maintenance in progress", page.maintenance.active.len()),
            Style::default().fg(app.theme.warning),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(bordered(app, "")), area);
}

fn render_sla(frame: &mut Frame, app: &App, page: &StatusPage<'_>, area: Rect) {
    if page.sla.is_empty() {
        let empty = Paragraph::new(Span::styled(" No data yet", Style::default().add_modifier(Modifier::DIM)))
            .block(bordered(app, " SLA "));
        frame.render_widget(empty, area);
        return;
    }

    let constraints = vec![Constraint::Fill(1); page.sla.len()];
    let cards = Layout::horizontal(constraints).split(area);

    for (window, card) in page.sla.iter().zip(cards.iter()) {
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("{}%", window.sla),
                app.theme.uptime_style(window.sla.percent()).add_modifier(Modifier::BOLD),
            ),
        ]);
        let title = format!(" {}-day SLA ", window.days);
        frame.render_widget(Paragraph::new(line).block(bordered(app, title)), *card);
    }
}

fn monitor_row<'a>(app: &App, page: &StatusPage<'_>, monitor: &MonitorTarget, indent: &str) -> Row<'a> {
    let row = page.row(&monitor.id);
    let status = row.map_or(MonitorStatus::NoData, |r| r.status);

    let uptime = row
        .and_then(|r| r.overall)
        .map(|u| Cell::from(format!("{}%", u)).style(app.theme.uptime_style(u.percent())))
        .unwrap_or_else(|| Cell::from("-"));

    let latency = row
        .and_then(|r| r.latency.as_ref())
        .map(|l| format!("{} {:.0}ms", render_sparkline(l.sparkline_tail(8)), l.average_ms))
        .unwrap_or_else(|| "-".to_string());

    Row::new(vec![
        Cell::from(format!("{}{}", indent, monitor.name)),
        uptime,
        Cell::from(latency),
        Cell::from(status.label()).style(app.theme.status_style(status)),
    ])
}

fn group_row<'a>(app: &App, group: &GroupView<'_>) -> Row<'a> {
    let marker = if app.is_expanded(&group.name) { "▾" } else { "▸" };
    Row::new(vec![
        Cell::from(format!("{} {}", marker, group.name)).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(""),
        Cell::from(""),
        Cell::from(group.summary.label()).style(app.theme.group_style(group.summary.health())),
    ])
}

fn render_list(frame: &mut Frame, app: &App, page: &StatusPage<'_>, area: Rect) {
    let rows: Vec<Row> = match &page.listing {
        Listing::Flat(monitors) => monitors.iter().map(|m| monitor_row(app, page, m, "")).collect(),
        Listing::Grouped(groups) => {
            let mut rows = Vec::new();
            for group in groups {
                rows.push(group_row(app, group));
                if app.is_expanded(&group.name) {
                    rows.extend(group.monitors.iter().map(|m| monitor_row(app, page, m, "  ")));
                }
            }
            rows
        }
    };

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let title = format!(
        " Monitors [{}] [f:{}]{} ",
        page.showing(),
        app.status_filter.label(),
        filter_info
    );

    if rows.is_empty() {
        let message = if page.total() == 0 {
            "  No monitors configured"
        } else {
            "  No monitors match the current filter"
        };
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().add_modifier(Modifier::DIM))),
        ])
        .block(bordered(app, title));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Monitor"),
        Cell::from("Uptime"),
        Cell::from("Latency"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let widths = [
        Constraint::Fill(3),    // Monitor
        Constraint::Length(9),  // Uptime
        Constraint::Length(16), // Latency sparkline
        Constraint::Length(18), // Status badge
    ];

    let selected = app.selected_index.min(rows.len().saturating_sub(1));

    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(app, title))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
