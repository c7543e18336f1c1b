//! Recent incident timeline for a single monitor.

use upwatch_types::{Incident, MonitorState, Timestamp, SECONDS_PER_DAY};

use super::error::EngineError;
use super::filter::find_monitor;
use crate::config::MonitorTarget;

/// Maximum number of incidents in a timeline.
pub const TIMELINE_LIMIT: usize = 20;

/// Placeholder for incidents recorded without an error message.
const UNKNOWN_ERROR: &str = "Unknown error";

/// One incident as shown in a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry<'a> {
    incident: &'a Incident,
    now: Timestamp,
}

impl<'a> TimelineEntry<'a> {
    /// The underlying incident.
    pub fn incident(&self) -> &'a Incident {
        self.incident
    }

    /// Nominal start.
    pub fn start(&self) -> Option<Timestamp> {
        self.incident.started_at()
    }

    /// Recovery time, `None` while still open.
    pub fn end(&self) -> Option<Timestamp> {
        self.incident.end
    }

    /// True while the monitor has not recovered.
    pub fn is_open(&self) -> bool {
        self.incident.is_open()
    }

    /// How long the incident lasted, or has lasted so far.
    pub fn duration_secs(&self) -> i64 {
        let Some(start) = self.start() else {
            return 0;
        };
        (self.incident.effective_end(self.now).min(self.now.max(start)) - start).max(0)
    }

    /// First error message, or a placeholder.
    pub fn error(&self) -> &'a str {
        self.incident.first_error().unwrap_or(UNKNOWN_ERROR)
    }
}

/// The most recent incidents touching a trailing window, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline<'a> {
    /// Length of the trailing window in days.
    pub window_days: i64,
    /// At most [`TIMELINE_LIMIT`] entries, newest first.
    pub entries: Vec<TimelineEntry<'a>>,
}

impl Timeline<'_> {
    /// True when nothing happened inside the window.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Build the timeline of one history.
///
/// Keeps incidents whose effective end (`end`, or `now` if open) lies inside
/// the trailing window, then the newest [`TIMELINE_LIMIT`] of those.
pub fn timeline(incidents: &[Incident], days: i64, now: Timestamp) -> Timeline<'_> {
    let window_start = now.saturating_sub(days.saturating_mul(SECONDS_PER_DAY));

    let matching: Vec<&Incident> = incidents
        .iter()
        .filter(|incident| incident.effective_end(now) >= window_start)
        .collect();

    let skip = matching.len().saturating_sub(TIMELINE_LIMIT);
    let entries = matching
        .into_iter()
        .skip(skip)
        .rev()
        .map(|incident| TimelineEntry { incident, now })
        .collect();

    Timeline {
        window_days: days,
        entries,
    }
}

/// Build the timeline of a configured monitor.
///
/// Fails only if no configured monitor has this id. A monitor the checker
/// has not reported on yet gets an empty timeline.
pub fn monitor_timeline<'a>(
    state: &'a MonitorState,
    monitors: &[MonitorTarget],
    monitor_id: &str,
    days: i64,
    now: Timestamp,
) -> Result<Timeline<'a>, EngineError> {
    find_monitor(monitors, monitor_id)?;
    Ok(timeline(state.incidents(monitor_id).unwrap_or_default(), days, now))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = SECONDS_PER_DAY;

    fn closed(start: i64, end: i64) -> Incident {
        Incident::builder().start(start).end(end).error(format!("err-{}", start)).build()
    }

    #[test]
    fn test_keeps_incidents_touching_window() {
        let now = 40 * DAY;
        let incidents = vec![
            closed(DAY, 2 * DAY),
            closed(9 * DAY, 10 * DAY + 1),
            closed(20 * DAY, 21 * DAY),
            Incident::builder().start(39 * DAY).build(),
        ];

        let tl = timeline(&incidents, 30, now);
        let starts: Vec<Option<i64>> = tl.entries.iter().map(|e| e.start()).collect();
        assert_eq!(starts, vec![Some(39 * DAY), Some(20 * DAY), Some(9 * DAY)]);
        assert!(tl.entries[0].is_open());
        assert_eq!(tl.entries[0].duration_secs(), DAY);
        assert_eq!(tl.window_days, 30);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let now = 100_000;
        let incidents: Vec<Incident> =
            (0..25).map(|n| closed(n * 1_000, n * 1_000 + 500)).collect();

        let tl = timeline(&incidents, 30, now);
        assert_eq!(tl.len(), TIMELINE_LIMIT);
        assert_eq!(tl.entries.first().and_then(|e| e.start()), Some(24_000));
        assert_eq!(tl.entries.last().and_then(|e| e.start()), Some(5_000));
        assert!(tl.entries.windows(2).all(|w| w[0].start() > w[1].start()));
    }

    #[test]
    fn test_empty_history_gives_empty_timeline() {
        let tl = timeline(&[], 30, 5_000);
        assert!(tl.is_empty());
    }

    #[test]
    fn test_entry_error_placeholder() {
        let incidents = vec![Incident::builder().start(10).end(20).build()];
        let tl = timeline(&incidents, 1, 100);
        assert_eq!(tl.entries[0].error(), "Unknown error");
        assert_eq!(tl.entries[0].duration_secs(), 10);
    }

    #[test]
    fn test_unknown_monitor_is_not_found() {
        let state = MonitorState::builder().monitor("api", |m| m).build();
        let monitors = vec![MonitorTarget::new("api", "API")];

        let err = monitor_timeline(&state, &monitors, "ghost", 30, 5_000).unwrap_err();
        assert_eq!(err, EngineError::MonitorNotFound("ghost".to_string()));
    }

    #[test]
    fn test_configured_monitor_without_data() {
        let state = MonitorState::new();
        let monitors = vec![MonitorTarget::new("api", "API")];
        let tl = monitor_timeline(&state, &monitors, "api", 30, 5_000).unwrap();
        assert!(tl.is_empty());
    }
}
