//! One computation pass over a state snapshot.

use upwatch_types::{MonitorState, Timestamp};

use super::aggregate::{compose, FleetSummary, StatusCounts};
use super::filter::{filter_monitors, group_monitors, Filter, GroupView};
use super::latency::{monitor_latency, LatencySummary};
use super::maintenance::Maintenance;
use super::status::{classify, MonitorStatus};
use super::uptime::{fleet_sla, monitor_overall_uptime, OverallUptime, Sla};
use crate::config::{MonitorTarget, PageConfig};

/// Fleet SLA over one trailing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSla {
    pub days: i64,
    pub sla: Sla,
}

/// Everything shown for one configured monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorRow<'a> {
    pub monitor: &'a MonitorTarget,
    pub status: MonitorStatus,
    /// `None` when the monitor has no data.
    pub overall: Option<OverallUptime>,
    pub latency: Option<LatencySummary>,
}

/// The filtered monitor list, flat or by group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing<'a> {
    Flat(Vec<&'a MonitorTarget>),
    Grouped(Vec<GroupView<'a>>),
}

impl Listing<'_> {
    /// Number of monitor entries shown. A monitor in two groups counts twice.
    pub fn shown(&self) -> usize {
        match self {
            Listing::Flat(monitors) => monitors.len(),
            Listing::Grouped(groups) => groups.iter().map(|g| g.monitors.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shown() == 0
    }
}

/// The status page at one instant.
///
/// A pure function of state, configuration, filter and time: computing it
/// twice with the same inputs gives the same page.
#[derive(Debug, Clone)]
pub struct StatusPage<'a> {
    pub title: &'a str,
    pub now: Timestamp,
    /// `None` when no snapshot could be read.
    pub last_update: Option<Timestamp>,
    pub fleet: FleetSummary,
    pub counts: StatusCounts,
    /// Fleet SLA per configured window, empty without a snapshot.
    pub sla: Vec<WindowSla>,
    pub maintenance: Maintenance<'a>,
    /// One row per configured monitor, in configuration order.
    pub rows: Vec<MonitorRow<'a>>,
    pub listing: Listing<'a>,
}

impl<'a> StatusPage<'a> {
    /// Compute the page. A missing snapshot yields a no-data page.
    pub fn compute(
        state: Option<&'a MonitorState>,
        config: &'a PageConfig,
        filter: &Filter,
        now: Timestamp,
    ) -> Self {
        let maintenance = Maintenance::resolve(&config.maintenances, now);

        let rows = config
            .monitors
            .iter()
            .map(|monitor| match state {
                Some(state) => MonitorRow {
                    monitor,
                    status: classify(state, &monitor.id, &maintenance),
                    overall: monitor_overall_uptime(state, &monitor.id, now),
                    latency: monitor_latency(state, monitor),
                },
                None => MonitorRow {
                    monitor,
                    status: MonitorStatus::NoData,
                    overall: None,
                    latency: None,
                },
            })
            .collect();

        let sla = state
            .map(|state| {
                config
                    .settings
                    .sla_windows
                    .iter()
                    .map(|&days| WindowSla {
                        days,
                        sla: fleet_sla(state, &config.monitors, days, now),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let listing = if config.is_grouped() {
            Listing::Grouped(group_monitors(
                &config.monitors,
                &config.groups,
                state,
                filter,
                &maintenance,
            ))
        } else {
            Listing::Flat(filter_monitors(&config.monitors, state, filter, &maintenance))
        };

        Self {
            title: &config.title,
            now,
            last_update: state.map(|s| s.last_update),
            fleet: compose(state),
            counts: StatusCounts::tally(state, &config.monitors, &maintenance),
            sla,
            maintenance,
            rows,
            listing,
        }
    }

    /// Row of a configured monitor.
    pub fn row(&self, monitor_id: &str) -> Option<&MonitorRow<'a>> {
        self.rows.iter().find(|row| row.monitor.id == monitor_id)
    }

    /// Displayed status of a monitor, `NoData` if it is not configured.
    pub fn status_of(&self, monitor_id: &str) -> MonitorStatus {
        self.row(monitor_id).map_or(MonitorStatus::NoData, |row| row.status)
    }

    /// Number of configured monitors.
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    /// "Showing n/m" counter for the list header.
    pub fn showing(&self) -> String {
        format!("Showing {}/{}", self.listing.shown(), self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Group, MaintenanceWindow};
    use crate::data::aggregate::OverallStatus;
    use crate::data::filter::StatusFilter;
    use upwatch_types::SECONDS_PER_DAY;

    const NOW: i64 = 100 * SECONDS_PER_DAY;

    fn config() -> PageConfig {
        PageConfig {
            monitors: vec![
                MonitorTarget::new("api", "API"),
                MonitorTarget::new("web", "Website"),
                MonitorTarget::new("db", "Database"),
            ],
            maintenances: vec![
                MaintenanceWindow::new("Patch", NOW - 3_600, Some(NOW + 3_600)).for_monitors(["db"]),
                MaintenanceWindow::new("Later", NOW + 7_200, None),
            ],
            ..PageConfig::default()
        }
    }

    fn state() -> MonitorState {
        MonitorState::builder()
            .last_update(NOW - 60)
            .monitor("api", |m| m.incident(|i| i.start(NOW - SECONDS_PER_DAY).end(NOW - SECONDS_PER_DAY / 2)))
            .monitor("web", |m| m)
            .monitor("db", |m| m.incident(|i| i.start(NOW - 600)))
            .latency("api", |l| l.sample("FRA", 80, NOW - 60))
            .build()
    }

    #[test]
    fn test_full_page() {
        let config = config();
        let state = state();
        let page = StatusPage::compute(Some(&state), &config, &Filter::default(), NOW);

        assert_eq!(page.title, "Service Status");
        assert_eq!(page.fleet.status, OverallStatus::Partial { down: 1, total: 3 });
        assert_eq!(page.status_of("api"), MonitorStatus::Up);
        assert_eq!(page.status_of("db"), MonitorStatus::Maintenance);
        assert_eq!(page.counts.maintenance, 1);
        assert_eq!(page.maintenance.active.len(), 1);
        assert_eq!(page.maintenance.upcoming.len(), 1);
        assert_eq!(page.sla.iter().map(|w| w.days).collect::<Vec<_>>(), vec![30, 90]);
        assert!(page.row("api").unwrap().latency.is_some());
        assert_eq!(page.showing(), "Showing 3/3");
        assert_eq!(page.last_update, Some(NOW - 60));
    }

    #[test]
    fn test_missing_state_is_no_data_page() {
        let config = config();
        let page = StatusPage::compute(None, &config, &Filter::default(), NOW);

        assert_eq!(page.fleet.status, OverallStatus::NoData);
        assert!(page.rows.iter().all(|r| r.status == MonitorStatus::NoData));
        assert!(page.sla.is_empty());
        assert_eq!(page.last_update, None);
        assert_eq!(page.listing.shown(), 3);
    }

    #[test]
    fn test_grouped_listing_with_filter() {
        let mut config = config();
        config.groups = vec![Group::new("Backend", ["db", "api"]), Group::new("Frontend", ["web"])];
        let state = state();
        let filter = Filter::new("", StatusFilter::Issues);

        let page = StatusPage::compute(Some(&state), &config, &filter, NOW);
        let Listing::Grouped(groups) = &page.listing else {
            panic!("expected grouped listing");
        };
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Backend");
        assert_eq!(groups[0].monitors[0].id, "db");
        assert_eq!(page.showing(), "Showing 1/3");
    }

    #[test]
    fn test_compute_is_idempotent() {
        let config = config();
        let state = state();
        let first = StatusPage::compute(Some(&state), &config, &Filter::default(), NOW);
        let second = StatusPage::compute(Some(&state), &config, &Filter::default(), NOW);
        assert_eq!(first.rows, second.rows);
        assert_eq!(first.listing, second.listing);
        assert_eq!(first.fleet, second.fleet);
    }
}
