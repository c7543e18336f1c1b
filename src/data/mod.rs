//! Status derivation engine.
//!
//! Turns a [`MonitorState`](upwatch_types::MonitorState) snapshot plus the
//! page configuration into per-monitor statuses, SLA figures, incident
//! timelines and fleet summaries. Everything here is a pure function of
//! `(state, monitors, maintenance windows, now)`: no I/O, no clocks, no view
//! state.
//!
//! ## Submodules
//!
//! - [`status`]: Per-monitor classification ([`MonitorStatus`], [`Liveness`])
//! - [`maintenance`]: Active and upcoming maintenance windows
//! - [`uptime`]: Fixed-window [`Sla`] and first-incident [`OverallUptime`]
//! - [`timeline`]: Most recent incidents of a monitor
//! - [`aggregate`]: Fleet banner and group health
//! - [`filter`]: Search, status filter and grouping
//! - [`page`]: All of the above in one pass ([`StatusPage`])
//! - [`latency`]: Latency sparklines for the detail view
//! - [`duration`]: Window parsing and elapsed-time formatting
//!
//! ## Data Flow
//!
//! ```text
//! MonitorState (raw JSON)
//!        │
//!        ├──▶ status::classify ◀── Maintenance::resolve(windows, now)
//!        ├──▶ uptime / timeline
//!        │
//!        ▼
//! aggregate::compose ──▶ filter::group_monitors ──▶ StatusPage
//! ```

pub mod aggregate;
pub mod duration;
pub mod error;
pub mod filter;
pub mod latency;
pub mod maintenance;
pub mod page;
pub mod status;
pub mod timeline;
pub mod uptime;

pub use aggregate::{FleetSummary, GroupHealth, GroupSummary, OverallStatus, StatusCounts};
pub use error::EngineError;
pub use filter::{find_monitor, Filter, GroupView, StatusFilter};
pub use latency::LatencySummary;
pub use maintenance::Maintenance;
pub use page::{Listing, MonitorRow, StatusPage, WindowSla};
pub use status::{Liveness, MonitorStatus};
pub use timeline::{Timeline, TimelineEntry, TIMELINE_LIMIT};
pub use uptime::{OverallUptime, Sla};
