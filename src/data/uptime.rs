//! Uptime and SLA calculation.
//!
//! Two distinct numbers come out of the same incident history:
//!
//! - [`Sla`]: share of a fixed trailing window (e.g. 30 days) not covered by
//!   incidents. Rendered with two decimals.
//! - [`OverallUptime`]: share of the time since the monitor's first recorded
//!   incident that it was up. Rendered with four significant digits.
//!
//! Both are clamped to `[0, 100]` and fall back to 100 when their
//! denominator is not positive.

use std::fmt;

use upwatch_types::{Incident, MonitorState, Timestamp, SECONDS_PER_DAY};

use crate::config::MonitorTarget;

/// Fixed-window SLA percentage.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Sla(f64);

impl Sla {
    /// Percentage in `[0, 100]`.
    pub fn percent(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Sla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Uptime since the first recorded incident.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct OverallUptime(f64);

impl OverallUptime {
    /// Percentage in `[0, 100]`.
    pub fn percent(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for OverallUptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_precision(self.0, 4))
    }
}

/// Format with a fixed number of significant digits (`80` -> `"80.00"`,
/// `100` -> `"100.0"`, `9.5` -> `"9.500"`).
fn to_precision(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{:.*}", (digits - 1).max(0) as usize, value);
    }

    let exponent = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - exponent).max(0) as usize;
    let formatted = format!("{:.*}", decimals, value);

    // Rounding can carry into a new leading digit (99.996 -> "100.00").
    let carried = formatted
        .parse::<f64>()
        .is_ok_and(|rounded| rounded.abs() >= 10f64.powi(exponent + 1));
    if carried {
        let decimals = (digits - 2 - exponent).max(0) as usize;
        format!("{:.*}", decimals, value)
    } else {
        formatted
    }
}

/// `100 * (total - down) / total`, clamped, or 100 for a degenerate total.
fn percentage(total: i128, down: i128) -> f64 {
    if total <= 0 {
        return 100.0;
    }
    let uptime = (total - down) as f64 / total as f64 * 100.0;
    uptime.clamp(0.0, 100.0)
}

/// Seconds of the window `[window_start, now]` covered by incidents.
///
/// Incidents starting at or after `now` are ignored; open incidents run
/// until `now`. Overlapping incidents are counted twice, the caller clamps.
pub fn down_seconds(incidents: &[Incident], window_start: Timestamp, now: Timestamp) -> i64 {
    incidents
        .iter()
        .filter_map(|incident| {
            let start = incident.started_at().filter(|start| *start < now)?;
            let end = incident.effective_end(now).min(now);
            Some(end.saturating_sub(start.max(window_start)).max(0))
        })
        .fold(0i64, i64::saturating_add)
}

fn window_start(days: i64, now: Timestamp) -> Timestamp {
    now.saturating_sub(days.saturating_mul(SECONDS_PER_DAY))
}

/// SLA of a single history over `[window_start, now]`.
pub fn sla_between(incidents: &[Incident], window_start: Timestamp, now: Timestamp) -> Sla {
    let total = i128::from(now) - i128::from(window_start);
    let down = down_seconds(incidents, window_start, now);
    Sla(percentage(total, i128::from(down)))
}

/// SLA of a single history over the trailing `days`.
pub fn window_sla(incidents: &[Incident], days: i64, now: Timestamp) -> Sla {
    sla_between(incidents, window_start(days, now), now)
}

/// SLA of one monitor. A monitor without data has no downtime.
pub fn monitor_sla(state: &MonitorState, monitor_id: &str, days: i64, now: Timestamp) -> Sla {
    window_sla(state.incidents(monitor_id).unwrap_or_default(), days, now)
}

/// Fleet-wide SLA: downtime summed over all monitors against
/// `window * monitor count`.
pub fn fleet_sla(state: &MonitorState, monitors: &[MonitorTarget], days: i64, now: Timestamp) -> Sla {
    let start = window_start(days, now);
    let total = (i128::from(now) - i128::from(start)) * monitors.len() as i128;
    let down: i128 = monitors
        .iter()
        .map(|m| i128::from(down_seconds(state.incidents(&m.id).unwrap_or_default(), start, now)))
        .sum();
    Sla(percentage(total, down))
}

/// Uptime since the first recorded incident. 100 for an empty history.
pub fn overall_uptime(incidents: &[Incident], now: Timestamp) -> OverallUptime {
    let Some(first) = incidents.first().and_then(Incident::started_at) else {
        return OverallUptime(100.0);
    };

    let total = i128::from(now) - i128::from(first);
    let down: i128 = incidents
        .iter()
        .filter_map(|incident| {
            let start = incident.started_at()?;
            Some(i128::from(incident.effective_end(now)) - i128::from(start))
        })
        .sum();
    OverallUptime(percentage(total, down))
}

/// Overall uptime of one monitor. `None` when the state has no entry for it.
pub fn monitor_overall_uptime(state: &MonitorState, monitor_id: &str, now: Timestamp) -> Option<OverallUptime> {
    state
        .incidents(monitor_id)
        .map(|incidents| overall_uptime(incidents, now))
}
