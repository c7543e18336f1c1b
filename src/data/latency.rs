//! Latency summaries for the detail view.

use upwatch_types::{Latency, MonitorState};

use crate::config::MonitorTarget;

/// Maximum number of samples drawn in a sparkline.
pub const SPARKLINE_POINTS: usize = 60;

/// What the detail view shows about a monitor's response times.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySummary {
    /// Mean ping over the recent samples, in milliseconds.
    pub average_ms: f64,
    /// Most recent ping in milliseconds.
    pub latest_ms: u64,
    /// Probe location of the most recent sample.
    pub location: String,
    /// Recent pings normalized to 0-7, oldest first.
    pub sparkline: Vec<u8>,
}

impl LatencySummary {
    /// Summarize a latency series. `None` when there are no samples.
    pub fn from_latency(latency: &Latency) -> Option<Self> {
        let latest = latency.latest()?;
        let average_ms = latency.average_ping()?;

        let skip = latency.recent.len().saturating_sub(SPARKLINE_POINTS);
        let pings: Vec<u64> = latency.recent.iter().skip(skip).map(|s| s.ping).collect();

        Some(Self {
            average_ms,
            latest_ms: latest.ping,
            location: latest.loc.clone(),
            sparkline: normalize_sparkline(&pings),
        })
    }

    /// The last `n` sparkline levels.
    pub fn sparkline_tail(&self, n: usize) -> &[u8] {
        &self.sparkline[self.sparkline.len().saturating_sub(n)..]
    }
}

/// Latency summary of a monitor, unless it hides its latency chart.
pub fn monitor_latency(state: &MonitorState, monitor: &MonitorTarget) -> Option<LatencySummary> {
    if monitor.hide_latency_chart {
        return None;
    }
    state.latency(&monitor.id).and_then(LatencySummary::from_latency)
}

/// Normalize values to 0-7 for 8 bar levels.
///
/// A flat series sits at the bottom level.
fn normalize_sparkline(values: &[u64]) -> Vec<u8> {
    let Some(&max) = values.iter().max() else {
        return Vec::new();
    };
    let min = values.iter().copied().min().unwrap_or(0);
    let range = (max - min).max(1) as f64;

    values
        .iter()
        .map(|&v| {
            let normalized = ((v - min) as f64 / range * 7.0).round() as u8;
            normalized.min(7)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_samples() {
        let latency = Latency::builder()
            .sample("FRA", 100, 10)
            .sample("FRA", 200, 20)
            .sample("AMS", 300, 30)
            .build();

        let summary = LatencySummary::from_latency(&latency).unwrap();
        assert_eq!(summary.average_ms, 200.0);
        assert_eq!(summary.latest_ms, 300);
        assert_eq!(summary.location, "AMS");
        assert_eq!(summary.sparkline, vec![0, 4, 7]);
    }

    #[test]
    fn test_empty_series() {
        assert!(LatencySummary::from_latency(&Latency::new()).is_none());
    }

    #[test]
    fn test_flat_series() {
        assert_eq!(normalize_sparkline(&[50, 50, 50]), vec![0, 0, 0]);
    }

    #[test]
    fn test_sparkline_keeps_recent_points() {
        let latency = (0..100u64)
            .fold(Latency::builder(), |b, n| b.sample("FRA", n, n as i64))
            .build();
        let summary = LatencySummary::from_latency(&latency).unwrap();
        assert_eq!(summary.sparkline.len(), SPARKLINE_POINTS);
        assert_eq!(summary.sparkline.last(), Some(&7));
        assert_eq!(summary.sparkline_tail(8).len(), 8);
    }

    #[test]
    fn test_hidden_chart() {
        let state = MonitorState::builder()
            .monitor("api", |m| m)
            .latency("api", |l| l.sample("FRA", 120, 10))
            .build();
        let mut monitor = MonitorTarget::new("api", "API");
        assert!(monitor_latency(&state, &monitor).is_some());

        monitor.hide_latency_chart = true;
        assert!(monitor_latency(&state, &monitor).is_none());
    }
}
