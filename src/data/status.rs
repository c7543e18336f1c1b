//! Per-monitor status classification.
//!
//! Two layers are kept apart: [`Liveness`] is the raw up/down fact derived
//! from the incident history, and [`MonitorStatus`] is what the page shows
//! after maintenance overrides. Fleet counters always use the former.

use upwatch_types::{Incident, MonitorState, Timestamp};

use super::error::EngineError;
use super::maintenance::Maintenance;
use crate::config::MaintenanceWindow;

/// Raw up/down state of a monitor, ignoring maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Liveness {
    Up,
    Down,
}

/// Status of a monitor as displayed on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorStatus {
    /// Last incident closed, or no incidents at all.
    Up,
    /// Last incident still open.
    Down,
    /// Covered by an active maintenance window.
    Maintenance,
    /// The checker never reported on this monitor.
    NoData,
}

impl MonitorStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            MonitorStatus::Up => "Operational",
            MonitorStatus::Down => "Major outage",
            MonitorStatus::Maintenance => "Maintenance",
            MonitorStatus::NoData => "No data available",
        }
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            MonitorStatus::Up => "UP",
            MonitorStatus::Down => "DOWN",
            MonitorStatus::Maintenance => "MAINT",
            MonitorStatus::NoData => "N/A",
        }
    }
}

/// Raw liveness of a monitor. `None` when the state has no entry for it.
pub fn liveness(state: &MonitorState, monitor_id: &str) -> Option<Liveness> {
    let incidents = state.incidents(monitor_id)?;
    match incidents.last() {
        Some(last) if last.is_open() => Some(Liveness::Down),
        _ => Some(Liveness::Up),
    }
}

/// Displayed status of a monitor.
///
/// Maintenance overrides both up and down. A monitor without data stays
/// [`MonitorStatus::NoData`] even inside a maintenance window.
pub fn classify(state: &MonitorState, monitor_id: &str, maintenance: &Maintenance<'_>) -> MonitorStatus {
    match liveness(state, monitor_id) {
        None => MonitorStatus::NoData,
        Some(_) if maintenance.covers(monitor_id) => MonitorStatus::Maintenance,
        Some(Liveness::Up) => MonitorStatus::Up,
        Some(Liveness::Down) => MonitorStatus::Down,
    }
}

/// [`classify`] against unresolved windows.
pub fn classify_at(
    state: &MonitorState,
    monitor_id: &str,
    windows: &[MaintenanceWindow],
    now: Timestamp,
) -> MonitorStatus {
    classify(state, monitor_id, &Maintenance::resolve(windows, now))
}

/// Check a history against the append-only rules.
///
/// Violations are reported, never repaired: every start list is non-empty,
/// nominal starts never go backwards, closed incidents do not end before they
/// start, and only the last incident may be open.
pub fn check_history(monitor_id: &str, incidents: &[Incident]) -> Result<(), EngineError> {
    let invalid = |reason: String| EngineError::InvalidHistory {
        monitor: monitor_id.to_string(),
        reason,
    };

    let mut previous_start: Option<Timestamp> = None;
    for (index, incident) in incidents.iter().enumerate() {
        let Some(start) = incident.started_at() else {
            return Err(invalid(format!("incident {} has no start", index)));
        };
        if previous_start.is_some_and(|prev| start < prev) {
            return Err(invalid(format!("incident {} starts before its predecessor", index)));
        }
        match incident.end {
            Some(end) if end < start => {
                return Err(invalid(format!("incident {} ends before it starts", index)));
            }
            None if index + 1 != incidents.len() => {
                return Err(invalid(format!("incident {} is open but not last", index)));
            }
            _ => {}
        }
        previous_start = Some(start);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 5_000;

    fn sample_state() -> MonitorState {
        MonitorState::builder()
            .last_update(NOW)
            .monitor("m1", |m| m.incident(|i| i.start(1_000).end(2_000)).incident(|i| i.start(4_000)))
            .monitor("m2", |m| m.incident(|i| i.start(1_000).end(2_000)))
            .monitor("quiet", |m| m)
            .build()
    }

    #[test]
    fn test_open_last_incident_is_down() {
        let state = sample_state();
        assert_eq!(liveness(&state, "m1"), Some(Liveness::Down));
        assert_eq!(classify(&state, "m1", &Maintenance::none()), MonitorStatus::Down);
    }

    #[test]
    fn test_closed_and_empty_histories_are_up() {
        let state = sample_state();
        assert_eq!(classify(&state, "m2", &Maintenance::none()), MonitorStatus::Up);
        assert_eq!(classify(&state, "quiet", &Maintenance::none()), MonitorStatus::Up);
    }

    #[test]
    fn test_missing_entry_is_no_data() {
        let state = sample_state();
        assert_eq!(liveness(&state, "ghost"), None);
        assert_eq!(classify(&state, "ghost", &Maintenance::none()), MonitorStatus::NoData);
    }

    #[test]
    fn test_maintenance_overrides_display_but_not_counters() {
        let state = sample_state();
        let windows = vec![MaintenanceWindow::new("patch", NOW - 3_600, Some(NOW + 3_600)).for_monitors(["m1"])];

        assert_eq!(classify_at(&state, "m1", &windows, NOW), MonitorStatus::Maintenance);
        assert_eq!(liveness(&state, "m1"), Some(Liveness::Down));
        assert_eq!(state.overall_down, 1);
        assert_eq!(classify_at(&state, "m2", &windows, NOW), MonitorStatus::Up);
    }

    #[test]
    fn test_no_data_is_not_overridden_by_maintenance() {
        let state = sample_state();
        let windows = vec![MaintenanceWindow::new("all", NOW - 10, None)];
        assert_eq!(classify_at(&state, "ghost", &windows, NOW), MonitorStatus::NoData);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let state = sample_state();
        let windows = vec![MaintenanceWindow::new("all", NOW - 10, None).for_monitors(["m2"])];
        for id in ["m1", "m2", "quiet", "ghost"] {
            assert_eq!(classify_at(&state, id, &windows, NOW), classify_at(&state, id, &windows, NOW));
        }
    }

    #[test]
    fn test_check_history_accepts_valid_history() {
        let state = sample_state();
        for id in state.monitor_ids() {
            assert!(check_history(id, state.incidents(id).unwrap()).is_ok());
        }
    }

    #[test]
    fn test_check_history_reports_violations() {
        let open_in_middle = vec![
            Incident::builder().start(10).build(),
            Incident::builder().start(20).end(30).build(),
        ];
        let err = check_history("m", &open_in_middle).unwrap_err();
        assert!(err.to_string().contains("open but not last"));

        let backwards = vec![Incident::builder().start(50).end(10).build()];
        assert!(check_history("m", &backwards).is_err());

        let unordered = vec![
            Incident::builder().start(50).end(60).build(),
            Incident::builder().start(10).end(20).build(),
        ];
        assert!(check_history("m", &unordered).is_err());

        assert!(check_history("m", &[Incident::default()]).is_err());
    }
}
