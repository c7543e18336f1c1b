//! Detail overlay rendering.
//!
//! Displays a modal overlay for the selected monitor: status, overall
//! uptime, SLA per window, latency sparkline and the incident timeline.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::duration::{format_elapsed, format_timestamp};
use crate::data::timeline::monitor_timeline;
use crate::data::uptime::monitor_sla;
use crate::data::{MonitorRow, StatusPage};
use crate::ui::render_sparkline;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

fn header_lines<'a>(app: &App, page: &StatusPage<'_>, row: &MonitorRow<'_>) -> Vec<Line<'a>> {
    let monitor = row.monitor;
    let status_style = app.theme.status_style(row.status);

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" {} {} ", row.status.symbol(), monitor.name),
            status_style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("({})", monitor.id), Style::default().add_modifier(Modifier::DIM)),
    ])];

    if let Some(tooltip) = &monitor.tooltip {
        lines.push(Line::from(format!(" {}", tooltip)));
    }
    if let Some(link) = &monitor.status_page_link {
        lines.push(Line::from(Span::styled(
            format!(" {}", link),
            Style::default().fg(app.theme.highlight),
        )));
    }

    let mut stats = vec![
        Span::raw(" Status: "),
        Span::styled(row.status.label(), status_style.add_modifier(Modifier::BOLD)),
        Span::raw("    Overall: "),
    ];
    match row.overall {
        Some(uptime) => stats.push(Span::styled(
            format!("{}%", uptime),
            app.theme.uptime_style(uptime.percent()).add_modifier(Modifier::BOLD),
        )),
        None => stats.push(Span::raw("-")),
    }

    if let Some(state) = &app.state {
        for &days in &app.config.settings.sla_windows {
            let sla = monitor_sla(state, &monitor.id, days, page.now);
            stats.push(Span::raw(format!("    {}d: ", days)));
            stats.push(Span::styled(format!("{}%", sla), app.theme.uptime_style(sla.percent())));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(stats));

    if let Some(latency) = &row.latency {
        lines.push(Line::from(vec![
            Span::raw(" Latency: "),
            Span::styled(render_sparkline(&latency.sparkline), Style::default().fg(app.theme.highlight)),
            Span::raw(format!(
                " avg {:.0}ms, last {}ms ({})",
                latency.average_ms, latency.latest_ms, latency.location
            )),
        ]));
    }

    for window in page.maintenance.windows_for(&monitor.id) {
        lines.push(Line::from(Span::styled(
            format!(" Maintenance: {}", window.title),
            Style::default().fg(app.theme.warning),
        )));
    }

    lines
}

fn render_timeline(frame: &mut Frame, app: &App, page: &StatusPage<'_>, monitor_id: &str, area: Rect) {
    let days = app.config.settings.timeline_days;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let message = |text: String| {
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(text, Style::default().add_modifier(Modifier::DIM))),
        ])
    };

    let Some(state) = &app.state else {
        frame.render_widget(message("  No data available".to_string()).block(block.title(" Incidents ")), area);
        return;
    };

    let timeline = match monitor_timeline(state, &app.config.monitors, monitor_id, days, page.now) {
        Ok(timeline) => timeline,
        Err(e) => {
            frame.render_widget(message(format!("  {}", e)).block(block.title(" Incidents ")), area);
            return;
        }
    };

    let title = format!(" Incidents, last {} days ({}) ", days, timeline.len());
    if timeline.is_empty() {
        frame.render_widget(message("  No recent incidents".to_string()).block(block.title(title)), area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Started"),
        Cell::from("Duration"),
        Cell::from("Error"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = timeline
        .entries
        .iter()
        .map(|entry| {
            let started = entry.start().map(format_timestamp).unwrap_or_else(|| "-".to_string());
            let duration = if entry.is_open() {
                Cell::from(format!("{} (ongoing)", format_elapsed(entry.duration_secs())))
                    .style(Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD))
            } else {
                Cell::from(format_elapsed(entry.duration_secs()))
            };
            Row::new(vec![Cell::from(started), duration, Cell::from(entry.error().to_string())])
        })
        .collect();

    let widths = [
        Constraint::Length(17), // Started
        Constraint::Length(18), // Duration
        Constraint::Fill(1),    // Error
    ];

    frame.render_widget(Table::new(rows, widths).header(header).block(block.title(title)), area);
}

/// Render the monitor detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, page: &StatusPage<'_>, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(monitor_id) = app.selected_monitor_id() else {
        return;
    };
    let Some(row) = page.row(&monitor_id) else {
        return;
    };

    let overlay_width = (area.width * 95 / 100).clamp(MIN_OVERLAY_WIDTH, 110);
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 50);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let lines = header_lines(app, page, row);
    let chunks = Layout::vertical([
        Constraint::Length(lines.len() as u16 + 2), // Header with monitor info
        Constraint::Min(6),                         // Timeline
        Constraint::Length(1),                      // Footer
    ])
    .split(overlay_area);

    let header_block = Block::default()
        .title(" Monitor Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    frame.render_widget(Paragraph::new(lines).block(header_block), chunks[0]);

    render_timeline(frame, app, page, &monitor_id, chunks[1]);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[2]);
}
