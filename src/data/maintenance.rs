//! Maintenance window resolution.
//!
//! Works out which configured windows are active or upcoming at a given
//! instant and which monitors they cover. Overlapping windows are all kept;
//! callers that only need a yes/no use [`Maintenance::covers`].

use upwatch_types::Timestamp;

use crate::config::MaintenanceWindow;

/// True if `now` falls inside the window. Both bounds are inclusive.
pub fn is_active(window: &MaintenanceWindow, now: Timestamp) -> bool {
    now >= window.start_ts() && window.end_ts().is_none_or(|end| now <= end)
}

/// True if the window has not started yet.
pub fn is_upcoming(window: &MaintenanceWindow, now: Timestamp) -> bool {
    now < window.start_ts()
}

/// True if the window applies to the monitor. A window without a monitor
/// list applies to every monitor.
pub fn covers_monitor(window: &MaintenanceWindow, monitor_id: &str) -> bool {
    window
        .monitors
        .as_ref()
        .is_none_or(|ids| ids.iter().any(|id| id == monitor_id))
}

/// Active windows in configuration order.
pub fn active_windows(windows: &[MaintenanceWindow], now: Timestamp) -> Vec<&MaintenanceWindow> {
    windows.iter().filter(|w| is_active(w, now)).collect()
}

/// Upcoming windows, soonest first. Windows sharing a start keep their
/// configuration order.
pub fn upcoming_windows(windows: &[MaintenanceWindow], now: Timestamp) -> Vec<&MaintenanceWindow> {
    let mut upcoming: Vec<&MaintenanceWindow> =
        windows.iter().filter(|w| is_upcoming(w, now)).collect();
    upcoming.sort_by_key(|w| w.start_ts());
    upcoming
}

/// Maintenance windows resolved against a single instant.
///
/// Resolve once per computation pass and share it between the classifier,
/// the filter and the composer.
#[derive(Debug, Clone)]
pub struct Maintenance<'a> {
    /// Windows in effect right now.
    pub active: Vec<&'a MaintenanceWindow>,
    /// Windows that have not started yet, soonest first.
    pub upcoming: Vec<&'a MaintenanceWindow>,
}

impl<'a> Maintenance<'a> {
    /// Resolve `windows` at `now`.
    pub fn resolve(windows: &'a [MaintenanceWindow], now: Timestamp) -> Self {
        Self {
            active: active_windows(windows, now),
            upcoming: upcoming_windows(windows, now),
        }
    }

    /// No maintenance at all.
    pub fn none() -> Self {
        Self {
            active: Vec::new(),
            upcoming: Vec::new(),
        }
    }

    /// True if at least one active window covers the monitor.
    pub fn covers(&self, monitor_id: &str) -> bool {
        self.active.iter().any(|w| covers_monitor(w, monitor_id))
    }

    /// Every active window covering the monitor.
    pub fn windows_for(&self, monitor_id: &str) -> Vec<&'a MaintenanceWindow> {
        self.active
            .iter()
            .copied()
            .filter(|w| covers_monitor(w, monitor_id))
            .collect()
    }
}

/// Every window active at `now` that covers the monitor.
pub fn active_for_monitor<'a>(
    windows: &'a [MaintenanceWindow],
    monitor_id: &str,
    now: Timestamp,
) -> Vec<&'a MaintenanceWindow> {
    windows
        .iter()
        .filter(|w| is_active(w, now) && covers_monitor(w, monitor_id))
        .collect()
}

/// True if any active window in `windows` covers the monitor at `now`.
pub fn under_maintenance(windows: &[MaintenanceWindow], monitor_id: &str, now: Timestamp) -> bool {
    windows
        .iter()
        .any(|w| is_active(w, now) && covers_monitor(w, monitor_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600;
    const NOW: i64 = 1_700_000_000;

    fn window(title: &str, start: i64, end: Option<i64>) -> MaintenanceWindow {
        MaintenanceWindow::new(title, start, end)
    }

    #[test]
    fn test_active_bounds_are_inclusive() {
        let w = window("w", NOW - HOUR, Some(NOW + HOUR));
        assert!(is_active(&w, NOW - HOUR));
        assert!(is_active(&w, NOW));
        assert!(is_active(&w, NOW + HOUR));
        assert!(!is_active(&w, NOW + HOUR + 1));
        assert!(!is_active(&w, NOW - HOUR - 1));
    }

    #[test]
    fn test_open_ended_window_stays_active() {
        let w = window("forever", NOW - HOUR, None);
        assert!(is_active(&w, NOW + 365 * 86_400));
    }

    #[test]
    fn test_upcoming_is_strictly_before_start() {
        let w = window("later", NOW + HOUR, None);
        assert!(is_upcoming(&w, NOW));
        assert!(!is_upcoming(&w, NOW + HOUR));
        assert!(!is_active(&w, NOW));
    }

    #[test]
    fn test_upcoming_sorted_by_start() {
        let windows = vec![
            window("third", NOW + 3 * HOUR, None),
            window("first", NOW + HOUR, None),
            window("past", NOW - 2 * HOUR, Some(NOW - HOUR)),
            window("second", NOW + 2 * HOUR, None),
        ];
        let titles: Vec<&str> =
            upcoming_windows(&windows, NOW).iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        assert!(active_windows(&windows, NOW).is_empty());
    }

    #[test]
    fn test_missing_monitor_list_covers_everything() {
        let all = window("all", NOW, None);
        let some = window("some", NOW, None).for_monitors(["m1", "m2"]);
        assert!(covers_monitor(&all, "anything"));
        assert!(covers_monitor(&some, "m2"));
        assert!(!covers_monitor(&some, "m3"));
    }

    #[test]
    fn test_overlapping_windows_are_all_surfaced() {
        let windows = vec![
            window("db", NOW - HOUR, Some(NOW + HOUR)).for_monitors(["m1"]),
            window("network", NOW - 2 * HOUR, None),
            window("other", NOW - HOUR, None).for_monitors(["m2"]),
        ];
        let maintenance = Maintenance::resolve(&windows, NOW);

        assert_eq!(maintenance.active.len(), 3);
        let titles: Vec<&str> =
            maintenance.windows_for("m1").iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["db", "network"]);
        assert!(maintenance.covers("m3"));
        assert!(under_maintenance(&windows, "m1", NOW));
        assert_eq!(active_for_monitor(&windows, "m2", NOW).len(), 2);
        assert!(!under_maintenance(&windows, "m2", NOW - 3 * HOUR));
    }

    #[test]
    fn test_no_maintenance() {
        let maintenance = Maintenance::none();
        assert!(!maintenance.covers("m1"));
        assert!(maintenance.windows_for("m1").is_empty());
    }
}
