//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{GroupHealth, MonitorStatus, OverallStatus};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for monitors under maintenance and degraded groups.
    pub warning: Color,
    /// Color for monitors that are down.
    pub critical: Color,
    /// Color for operational monitors.
    pub healthy: Color,
    /// Color for monitors without data.
    pub muted: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            muted: Color::DarkGray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            muted: Color::Gray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a monitor status
    pub fn status_style(&self, status: MonitorStatus) -> Style {
        match status {
            MonitorStatus::Up => Style::default().fg(self.healthy),
            MonitorStatus::Maintenance => Style::default().fg(self.warning),
            MonitorStatus::Down => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
            MonitorStatus::NoData => Style::default().fg(self.muted),
        }
    }

    /// Get style for the fleet banner
    pub fn overall_style(&self, status: OverallStatus) -> Style {
        match status {
            OverallStatus::AllUp => Style::default().fg(self.healthy).add_modifier(Modifier::BOLD),
            OverallStatus::Partial { .. } => Style::default().fg(self.warning).add_modifier(Modifier::BOLD),
            OverallStatus::AllDown => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
            OverallStatus::NoData => Style::default().fg(self.muted),
        }
    }

    /// Get style for a group header
    pub fn group_style(&self, health: GroupHealth) -> Style {
        match health {
            GroupHealth::Healthy => Style::default().fg(self.healthy),
            GroupHealth::Degraded => Style::default().fg(self.warning),
            GroupHealth::Down => Style::default().fg(self.critical),
        }
    }

    /// Get style for an uptime percentage
    pub fn uptime_style(&self, percent: f64) -> Style {
        if percent >= 99.9 {
            Style::default().fg(self.healthy)
        } else if percent >= 99.0 {
            Style::default().fg(self.warning)
        } else {
            Style::default().fg(self.critical)
        }
    }
}
