//! Status page configuration.
//!
//! Monitors, groups, maintenance windows and display settings are loaded
//! from a single file (TOML, JSON or YAML, picked by extension) with
//! `UPWATCH__*` environment overrides layered on top.
//!
//! ```toml
//! title = "Example Service Status"
//!
//! [[monitors]]
//! id = "api"
//! name = "Public API"
//! status_page_link = "https://api.example.com"
//!
//! [[groups]]
//! name = "Core"
//! monitors = ["api", "web"]
//!
//! [[maintenances]]
//! monitors = ["api"]
//! title = "Database upgrade"
//! body = "Writes are paused"
//! start = "2026-01-01T00:00:00+08:00"
//! end = "2026-01-01T02:00:00+08:00"
//! color = "blue"
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use upwatch_types::Timestamp;

/// A monitored target as shown on the status page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorTarget {
    /// Stable identifier, joins the target with its incident history.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Extra description shown in the detail view.
    #[serde(default)]
    pub tooltip: Option<String>,
    /// Link to the monitored service.
    #[serde(default, alias = "statusPageLink")]
    pub status_page_link: Option<String>,
    /// Hide the latency sparkline in the detail view.
    #[serde(default, alias = "hideLatencyChart")]
    pub hide_latency_chart: bool,
}

impl MonitorTarget {
    /// Create a target with just an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tooltip: None,
            status_page_link: None,
            hide_latency_chart: false,
        }
    }
}

/// A named, ordered cluster of monitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group name, unique within the page.
    pub name: String,
    /// Member ids in display order.
    #[serde(default)]
    pub monitors: Vec<String>,
}

impl Group {
    /// Create a group from a name and member ids.
    pub fn new<I, S>(name: impl Into<String>, monitors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            monitors: monitors.into_iter().map(Into::into).collect(),
        }
    }
}

/// A scheduled maintenance window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    /// Affected monitor ids. `None` means every monitor.
    #[serde(default)]
    pub monitors: Option<Vec<String>>,
    /// Short headline.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub body: String,
    /// When the window opens.
    pub start: DateTime<FixedOffset>,
    /// When the window closes. `None` keeps it open indefinitely.
    #[serde(default)]
    pub end: Option<DateTime<FixedOffset>>,
    /// Display color hint (e.g. "blue", "yellow").
    #[serde(default)]
    pub color: String,
}

impl MaintenanceWindow {
    /// Create a window from epoch-second bounds, applying to every monitor.
    pub fn new(title: impl Into<String>, start: Timestamp, end: Option<Timestamp>) -> Self {
        Self {
            monitors: None,
            title: title.into(),
            body: String::new(),
            start: from_timestamp(start),
            end: end.map(from_timestamp),
            color: String::new(),
        }
    }

    /// Restrict the window to the given monitor ids.
    pub fn for_monitors<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.monitors = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Start as epoch seconds.
    pub fn start_ts(&self) -> Timestamp {
        self.start.timestamp()
    }

    /// End as epoch seconds.
    pub fn end_ts(&self) -> Option<Timestamp> {
        self.end.map(|end| end.timestamp())
    }
}

fn from_timestamp(ts: Timestamp) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default().fixed_offset()
}

/// Display and refresh settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Reload once the state is older than this many seconds.
    pub stale_after_secs: u64,
    /// Never auto-reload within this many seconds of opening the page.
    pub reload_grace_secs: u64,
    /// Trailing windows (in days) for the fleet SLA cards.
    pub sla_windows: Vec<i64>,
    /// Trailing window (in days) for incident timelines.
    pub timeline_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stale_after_secs: 300,
            reload_grace_secs: 30,
            sla_windows: vec![30, 90],
            timeline_days: 30,
        }
    }
}

/// Everything the status page needs besides the monitor state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Page title shown in the header.
    pub title: String,
    /// Monitored targets in display order.
    pub monitors: Vec<MonitorTarget>,
    /// Optional grouping. Empty means a flat list.
    pub groups: Vec<Group>,
    /// Scheduled maintenance windows.
    pub maintenances: Vec<MaintenanceWindow>,
    /// Display and refresh settings.
    pub settings: Settings,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Service Status".to_string(),
            monitors: Vec::new(),
            groups: Vec::new(),
            maintenances: Vec::new(),
            settings: Settings::default(),
        }
    }
}

impl PageConfig {
    /// Load configuration from a file with `UPWATCH__*` environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("UPWATCH").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        let page: PageConfig = config
            .try_deserialize()
            .with_context(|| format!("Invalid config {}", path.display()))?;
        page.validate()?;

        debug!(
            monitors = page.monitors.len(),
            groups = page.groups.len(),
            maintenances = page.maintenances.len(),
            "loaded config from {}",
            path.display()
        );
        Ok(page)
    }

    /// Check what is needed to join the config with incident data.
    ///
    /// Unknown ids in groups or maintenance windows are only logged; they are
    /// skipped when rendering.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for monitor in &self.monitors {
            if !seen.insert(monitor.id.as_str()) {
                bail!("Duplicate monitor id: {}", monitor.id);
            }
        }

        for window in &self.maintenances {
            if let Some(end) = window.end {
                if end < window.start {
                    bail!("Maintenance '{}' ends before it starts", window.title);
                }
            }
            for id in window.monitors.iter().flatten() {
                if !seen.contains(id.as_str()) {
                    warn!("maintenance '{}' references unknown monitor {}", window.title, id);
                }
            }
        }

        for group in &self.groups {
            for id in &group.monitors {
                if !seen.contains(id.as_str()) {
                    warn!("group '{}' references unknown monitor {}", group.name, id);
                }
            }
        }

        Ok(())
    }

    /// True when the page lists monitors by group.
    pub fn is_grouped(&self) -> bool {
        !self.groups.is_empty()
    }
}
