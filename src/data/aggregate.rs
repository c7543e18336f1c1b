//! Fleet and group level status.

use std::fmt;

use upwatch_types::MonitorState;

use super::maintenance::Maintenance;
use super::status::{classify, liveness, Liveness, MonitorStatus};
use crate::config::MonitorTarget;

/// Fleet-wide status shown in the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    /// The checker has not reported anything yet.
    NoData,
    AllUp,
    AllDown,
    /// Some monitors are down.
    Partial { down: u32, total: u32 },
}

impl OverallStatus {
    /// Banner message.
    pub fn message(&self) -> String {
        match self {
            OverallStatus::NoData => "No data yet".to_string(),
            OverallStatus::AllUp => "All systems operational".to_string(),
            OverallStatus::AllDown => "All systems not operational".to_string(),
            OverallStatus::Partial { down, total } => {
                format!("Some systems not operational ({}/{})", down, total)
            }
        }
    }

    /// True unless every monitor is up.
    pub fn has_issues(&self) -> bool {
        matches!(self, OverallStatus::AllDown | OverallStatus::Partial { .. })
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Result of composing the fleet counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetSummary {
    pub status: OverallStatus,
    pub up: u32,
    pub down: u32,
}

/// Compose the fleet status from the state counters.
///
/// The counters are maintenance-independent, so a monitor that is down
/// inside a maintenance window still counts as down here.
pub fn compose(state: Option<&MonitorState>) -> FleetSummary {
    let (up, down) = state.map_or((0, 0), |s| (s.overall_up, s.overall_down));

    let status = match (up, down) {
        (0, 0) => OverallStatus::NoData,
        (0, _) => OverallStatus::AllDown,
        (_, 0) => OverallStatus::AllUp,
        _ => OverallStatus::Partial {
            down,
            total: up.saturating_add(down),
        },
    };

    FleetSummary { status, up, down }
}

/// Health of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupHealth {
    Healthy,
    Degraded,
    Down,
}

/// Down count over a group's declared members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub name: String,
    pub down: usize,
    pub total: usize,
}

impl GroupSummary {
    pub fn health(&self) -> GroupHealth {
        if self.down == 0 {
            GroupHealth::Healthy
        } else if self.down == self.total {
            GroupHealth::Down
        } else {
            GroupHealth::Degraded
        }
    }

    /// Header label, e.g. "2/3 Operational".
    pub fn label(&self) -> String {
        format!("{}/{} Operational", self.total - self.down, self.total)
    }
}

/// Summarize a group. Members without data count as not down.
pub fn group_summary<S: AsRef<str>>(state: Option<&MonitorState>, name: &str, ids: &[S]) -> GroupSummary {
    let down = state.map_or(0, |state| {
        ids.iter()
            .filter(|id| liveness(state, id.as_ref()) == Some(Liveness::Down))
            .count()
    });

    GroupSummary {
        name: name.to_string(),
        down,
        total: ids.len(),
    }
}

/// Monitors per displayed status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub up: usize,
    pub down: usize,
    pub maintenance: usize,
    pub no_data: usize,
}

impl StatusCounts {
    /// Count the configured monitors by displayed status.
    pub fn tally(state: Option<&MonitorState>, monitors: &[MonitorTarget], maintenance: &Maintenance<'_>) -> Self {
        let mut counts = Self::default();
        for monitor in monitors {
            let status = match state {
                Some(state) => classify(state, &monitor.id, maintenance),
                None => MonitorStatus::NoData,
            };
            match status {
                MonitorStatus::Up => counts.up += 1,
                MonitorStatus::Down => counts.down += 1,
                MonitorStatus::Maintenance => counts.maintenance += 1,
                MonitorStatus::NoData => counts.no_data += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.up + self.down + self.maintenance + self.no_data
    }
}
