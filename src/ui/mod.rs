//! Terminal UI rendering using ratatui.
//!
//! Each view is implemented in its own submodule with a `render` function.
//! Configured text (titles, names, maintenance bodies) is rendered as plain
//! text and never interpreted.
//!
//! ## Submodules
//!
//! - [`status`]: Banner, SLA cards and the (grouped) monitor list
//! - [`maintenance`]: Active and upcoming maintenance windows
//! - [`detail`]: Modal overlay with uptime, latency and incident timeline
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (status/maintenance::render)         │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod common;
pub mod detail;
pub mod maintenance;
pub mod status;
pub mod theme;

pub use theme::Theme;

/// Sparkline characters (8 levels of height).
pub(crate) const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render normalized 0-7 values as sparkline characters.
pub(crate) fn render_sparkline(data: &[u8]) -> String {
    data.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}
