//! # upwatch
//!
//! A terminal status page and library for a fleet of uptime monitors.
//!
//! An external checker probes every monitor and appends incidents to a state
//! blob ([`MonitorState`]). This crate reads that blob from various sources
//! (files, channels, network streams), derives per-monitor status, SLA and
//! fleet aggregates, and displays them in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (engine) │    │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                ▲                                    │
//! │       ▼                │ config                             │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | StreamSource | ChannelSource  │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: The engine. Pure functions of the state, the configured
//!   monitors and maintenance windows, and the current time. Its entry point is
//!   [`StatusPage::compute`].
//! - **[`config`]**: Monitors, groups, maintenance windows and settings
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with implementations
//!   for file polling, TCP streams, and channel-based input
//! - **[`app`]**: Application state, view navigation, reload scheduling
//! - **[`viewstate`]**: Persisted presentation choices, kept away from the engine
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch the checker's state file
//! upwatch --state state.json --config upwatch.toml
//!
//! # Receive states over TCP
//! upwatch --connect localhost:9090 --config upwatch.toml
//!
//! # One monitor, printed to stdout
//! upwatch --config upwatch.toml --monitor api
//! ```
//!
//! ### Computing a page without the UI
//!
//! ```
//! use upwatch::{Filter, MonitorState, MonitorTarget, OverallStatus, PageConfig, StatusPage};
//!
//! let config = PageConfig {
//!     monitors: vec![MonitorTarget::new("api", "API"), MonitorTarget::new("web", "Web")],
//!     ..PageConfig::default()
//! };
//! let state = MonitorState::builder()
//!     .last_update(10_000)
//!     .monitor("api", |m| m.incident(|i| i.start(9_000).error("timeout")))
//!     .monitor("web", |m| m)
//!     .build();
//!
//! let page = StatusPage::compute(Some(&state), &config, &Filter::default(), 10_000);
//! assert_eq!(page.fleet.status, OverallStatus::Partial { down: 1, total: 2 });
//! ```
//!
//! ### As a library with channel source
//!
//! ```
//! use upwatch::{App, ChannelSource, MemoryViewStore, PageConfig};
//!
//! let (tx, source) = ChannelSource::create("checker");
//! let app = App::new(Box::new(source), PageConfig::default(), Box::new(MemoryViewStore::new()), 0);
//! ```
//!
//! ### Bridging from a byte stream
//!
//! ```no_run
//! use upwatch::StreamSource;
//! use tokio::sync::mpsc;
//!
//! # tokio_test::block_on(async {
//! let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
//! let source = StreamSource::from_bytes_channel(rx, "checker");
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod export;
pub mod source;
pub mod ui;
pub mod viewstate;

// Re-export main types for convenience
pub use app::App;
pub use config::{Group, MaintenanceWindow, MonitorTarget, PageConfig, Settings};
pub use data::{
    EngineError, Filter, FleetSummary, GroupSummary, Liveness, MonitorStatus, OverallStatus,
    OverallUptime, Sla, StatusFilter, StatusPage, Timeline,
};
pub use source::{decode_state, ChannelSource, DataSource, FileSource, StreamSource};
pub use upwatch_types::{Incident, Latency, LatencySample, MonitorState, Timestamp};
pub use viewstate::{FileViewStore, MemoryViewStore, ViewStateStore};
