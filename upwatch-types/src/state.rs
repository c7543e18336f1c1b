//! MonitorState - the snapshot written by the uptime checker.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{Incident, IncidentBuilder, Latency, LatencyBuilder, Timestamp};

/// A point-in-time snapshot of every monitor's incident history.
///
/// The snapshot is replaced wholesale after each collection cycle. Consumers
/// treat it as an immutable value.
///
/// # Example
///
/// ```rust
/// use upwatch_types::MonitorState;
///
/// let state = MonitorState::builder()
///     .last_update(1_700_000_000)
///     .monitor("db", |m| m.incident(|i| i.start(1_699_990_000)))
///     .build();
///
/// assert_eq!(state.overall_down, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorState {
    /// Incident history per monitor id, oldest first.
    pub incident: BTreeMap<String, Vec<Incident>>,

    /// Latency series per monitor id. Series that do not decode are left out.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::latency::lenient::series")
    )]
    pub latency: BTreeMap<String, Latency>,

    /// Number of monitors currently up, regardless of maintenance.
    #[cfg_attr(feature = "serde", serde(rename = "overallUp"))]
    pub overall_up: u32,

    /// Number of monitors currently down, regardless of maintenance.
    #[cfg_attr(feature = "serde", serde(rename = "overallDown"))]
    pub overall_down: u32,

    /// When the checker finished its last collection cycle.
    #[cfg_attr(feature = "serde", serde(rename = "lastUpdate"))]
    pub last_update: Timestamp,
}

impl MonitorState {
    /// Create an empty state with no monitors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for constructing states.
    pub fn builder() -> MonitorStateBuilder {
        MonitorStateBuilder::new()
    }

    /// Check if the state holds no incident data at all.
    pub fn is_empty(&self) -> bool {
        self.incident.is_empty()
    }

    /// Incident history of a monitor.
    ///
    /// `None` means the checker never reported on this monitor, which is not
    /// the same as an empty history.
    pub fn incidents(&self, monitor_id: &str) -> Option<&[Incident]> {
        self.incident.get(monitor_id).map(Vec::as_slice)
    }

    /// Latency series of a monitor.
    pub fn latency(&self, monitor_id: &str) -> Option<&Latency> {
        self.latency.get(monitor_id)
    }

    /// Iterate over monitor ids that have incident data.
    pub fn monitor_ids(&self) -> impl Iterator<Item = &str> {
        self.incident.keys().map(String::as_str)
    }
}

/// Builder for `MonitorState` instances.
///
/// Unless [`counters`](Self::counters) is called, `overall_up` and
/// `overall_down` are derived from the histories: a monitor whose last
/// incident is open counts as down, every other monitor as up.
#[derive(Debug, Default)]
pub struct MonitorStateBuilder {
    incident: BTreeMap<String, Vec<Incident>>,
    latency: BTreeMap<String, Latency>,
    counters: Option<(u32, u32)>,
    last_update: Timestamp,
}

impl MonitorStateBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the last collection timestamp.
    pub fn last_update(mut self, ts: Timestamp) -> Self {
        self.last_update = ts;
        self
    }

    /// Add a monitor with its history built using a closure.
    pub fn monitor<F>(mut self, id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(HistoryBuilder) -> HistoryBuilder,
    {
        let history = f(HistoryBuilder::new()).build();
        self.incident.insert(id.into(), history);
        self
    }

    /// Add a latency series for a monitor.
    pub fn latency<F>(mut self, id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(LatencyBuilder) -> LatencyBuilder,
    {
        let latency = f(LatencyBuilder::new()).build();
        self.latency.insert(id.into(), latency);
        self
    }

    /// Override the fleet-wide up/down counters.
    pub fn counters(mut self, up: u32, down: u32) -> Self {
        self.counters = Some((up, down));
        self
    }

    /// Build the state.
    pub fn build(self) -> MonitorState {
        let (overall_up, overall_down) = self.counters.unwrap_or_else(|| {
            let down = self
                .incident
                .values()
                .filter(|history| history.last().is_some_and(Incident::is_open))
                .count() as u32;
            (self.incident.len() as u32 - down, down)
        });

        MonitorState {
            incident: self.incident,
            latency: self.latency,
            overall_up,
            overall_down,
            last_update: self.last_update,
        }
    }
}

/// Builder for a monitor's incident history.
#[derive(Debug, Default)]
pub struct HistoryBuilder {
    incidents: Vec<Incident>,
}

impl HistoryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an incident built using a closure.
    pub fn incident<F>(mut self, f: F) -> Self
    where
        F: FnOnce(IncidentBuilder) -> IncidentBuilder,
    {
        self.incidents.push(f(IncidentBuilder::new()).build());
        self
    }

    /// Build the history.
    pub fn build(self) -> Vec<Incident> {
        self.incidents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_derives_counters() {
        let state = MonitorState::builder()
            .last_update(5_000)
            .monitor("up", |m| m.incident(|i| i.start(10).end(20)))
            .monitor("quiet", |m| m)
            .monitor("down", |m| m.incident(|i| i.start(4_000)))
            .build();

        assert_eq!(state.overall_up, 2);
        assert_eq!(state.overall_down, 1);
        assert_eq!(state.last_update, 5_000);
    }

    #[test]
    fn builder_counter_override() {
        let state = MonitorState::builder().counters(0, 0).monitor("a", |m| m).build();
        assert_eq!((state.overall_up, state.overall_down), (0, 0));
    }

    #[test]
    fn missing_monitor_differs_from_empty_history() {
        let state = MonitorState::builder().monitor("quiet", |m| m).build();
        assert_eq!(state.incidents("quiet"), Some(&[][..]));
        assert_eq!(state.incidents("unknown"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_state_blob() {
        let json = r#"{
            "incident": {
                "api": [
                    { "start": [1000, 1060], "end": 2000, "error": ["HTTP 502", "HTTP 502"] },
                    { "start": [4000], "error": ["timeout"] }
                ],
                "web": []
            },
            "latency": {
                "api": { "recent": [ { "loc": "FRA", "ping": 120, "time": 4990 } ] }
            },
            "overallUp": 1,
            "overallDown": 1,
            "lastUpdate": 5000
        }"#;

        let state: MonitorState = serde_json::from_str(json).unwrap();
        assert_eq!(state.monitor_ids().collect::<Vec<_>>(), vec!["api", "web"]);
        assert_eq!(state.overall_down, 1);
        assert_eq!(state.last_update, 5_000);

        let api = state.incidents("api").unwrap();
        assert_eq!(api.len(), 2);
        assert_eq!(api[0].start, vec![1000, 1060]);
        assert!(api[1].is_open());
        assert_eq!(state.latency("api").unwrap().recent[0].ping, 120);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn latency_is_optional() {
        let json = r#"{"incident":{},"overallUp":0,"overallDown":0,"lastUpdate":0}"#;
        let state: MonitorState = serde_json::from_str(json).unwrap();
        assert!(state.latency.is_empty());
        assert!(state.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn malformed_latency_keeps_incidents() {
        let json = r#"{
            "incident": { "api": [ { "start": [1000], "end": 2000 } ], "web": [] },
            "latency": {
                "api": [1, 2, 3],
                "web": { "recent": [ { "loc": "FRA", "ping": 80, "time": 1990 } ] }
            },
            "overallUp": 2,
            "overallDown": 0,
            "lastUpdate": 2000
        }"#;

        let state: MonitorState = serde_json::from_str(json).unwrap();
        assert_eq!(state.incidents("api").map(|i| i.len()), Some(1));
        assert!(state.latency("api").map_or(true, |l| l.is_empty()));
        assert_eq!(state.latency("web").map(|l| l.recent.len()), Some(1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_counters_fail_to_parse() {
        let json = r#"{"incident":{}}"#;
        assert!(serde_json::from_str::<MonitorState>(json).is_err());
    }
}
