//! Search, status filtering and grouping of the monitor list.

use std::collections::HashSet;

use upwatch_types::MonitorState;

use super::aggregate::{group_summary, GroupSummary};
use super::error::EngineError;
use super::maintenance::Maintenance;
use super::status::{liveness, Liveness};
use crate::config::{Group, MonitorTarget};

/// Status predicate applied on top of the text query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    /// Monitors that are currently down, maintenance or not.
    Issues,
    /// Monitors covered by an active maintenance window.
    Maintenance,
}

impl StatusFilter {
    /// Cycle to the next filter.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Issues,
            StatusFilter::Issues => StatusFilter::Maintenance,
            StatusFilter::Maintenance => StatusFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Issues => "Issues",
            StatusFilter::Maintenance => "Maintenance",
        }
    }
}

/// Text query plus status predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub query: String,
    pub status: StatusFilter,
}

impl Filter {
    pub fn new(query: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            query: query.into(),
            status,
        }
    }

    /// True if nothing would be filtered out.
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.status == StatusFilter::All
    }

    /// Case-insensitive match against name and id. Surrounding whitespace is
    /// ignored, and a blank query matches.
    pub fn matches_query(&self, monitor: &MonitorTarget) -> bool {
        let query = self.query.trim();
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        monitor.name.to_lowercase().contains(&query) || monitor.id.to_lowercase().contains(&query)
    }

    /// Apply the status predicate.
    pub fn matches_status(
        &self,
        state: Option<&MonitorState>,
        monitor: &MonitorTarget,
        maintenance: &Maintenance<'_>,
    ) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Issues => {
                state.and_then(|s| liveness(s, &monitor.id)) == Some(Liveness::Down)
            }
            StatusFilter::Maintenance => maintenance.covers(&monitor.id),
        }
    }

    pub fn matches(
        &self,
        state: Option<&MonitorState>,
        monitor: &MonitorTarget,
        maintenance: &Maintenance<'_>,
    ) -> bool {
        self.matches_query(monitor) && self.matches_status(state, monitor, maintenance)
    }
}

/// Filter a flat monitor list, keeping input order.
pub fn filter_monitors<'a>(
    monitors: &'a [MonitorTarget],
    state: Option<&MonitorState>,
    filter: &Filter,
    maintenance: &Maintenance<'_>,
) -> Vec<&'a MonitorTarget> {
    monitors
        .iter()
        .filter(|m| filter.matches(state, m, maintenance))
        .collect()
}

/// One group of a grouped listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView<'a> {
    pub name: String,
    /// Matching monitors in the group's declared order.
    pub monitors: Vec<&'a MonitorTarget>,
    /// Down count over every declared member, filtered or not.
    pub summary: GroupSummary,
}

/// Partition monitors by group.
///
/// Groups keep their declaration order and each group its declared id order.
/// Ids with no configured monitor are skipped, monitors in no group are not
/// listed, and groups left empty after filtering are omitted.
pub fn group_monitors<'a>(
    monitors: &'a [MonitorTarget],
    groups: &[Group],
    state: Option<&MonitorState>,
    filter: &Filter,
    maintenance: &Maintenance<'_>,
) -> Vec<GroupView<'a>> {
    let matching = filter_monitors(monitors, state, filter, maintenance);

    groups
        .iter()
        .filter_map(|group| {
            let mut seen = HashSet::new();
            let members: Vec<&MonitorTarget> = group
                .monitors
                .iter()
                .filter(|id| seen.insert(id.as_str()))
                .filter_map(|id| matching.iter().copied().find(|m| &m.id == id))
                .collect();

            if members.is_empty() {
                return None;
            }

            Some(GroupView {
                name: group.name.clone(),
                monitors: members,
                summary: group_summary(state, &group.name, &group.monitors),
            })
        })
        .collect()
}

/// Look up a configured monitor by id.
pub fn find_monitor<'a>(monitors: &'a [MonitorTarget], monitor_id: &str) -> Result<&'a MonitorTarget, EngineError> {
    monitors
        .iter()
        .find(|m| m.id == monitor_id)
        .ok_or_else(|| EngineError::MonitorNotFound(monitor_id.to_string()))
}
