//! JSON export of the computed status page.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use upwatch_types::MonitorState;

use crate::config::{MaintenanceWindow, PageConfig};
use crate::data::timeline::timeline;
use crate::data::StatusPage;

fn window_json(window: &MaintenanceWindow) -> Value {
    json!({
        "title": window.title,
        "body": window.body,
        "monitors": window.monitors,
        "start": window.start.to_rfc3339(),
        "end": window.end.map(|end| end.to_rfc3339()),
    })
}

/// Build the export document for a page.
///
/// Timelines are included when the snapshot is available.
pub fn page_to_json(page: &StatusPage<'_>, state: Option<&MonitorState>, config: &PageConfig) -> Value {
    let days = config.settings.timeline_days;

    let monitors: Vec<Value> = page
        .rows
        .iter()
        .map(|row| {
            let incidents: Vec<Value> = state
                .and_then(|s| s.incidents(&row.monitor.id))
                .map(|incidents| {
                    timeline(incidents, days, page.now)
                        .entries
                        .iter()
                        .map(|entry| {
                            json!({
                                "start": entry.start(),
                                "end": entry.end(),
                                "duration_secs": entry.duration_secs(),
                                "error": entry.error(),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            json!({
                "id": row.monitor.id,
                "name": row.monitor.name,
                "status": row.status.label(),
                "overall_uptime": row.overall.map(|u| u.to_string()),
                "average_latency_ms": row.latency.as_ref().map(|l| l.average_ms),
                "incidents": incidents,
            })
        })
        .collect();

    let sla: Vec<Value> = page
        .sla
        .iter()
        .map(|w| json!({ "days": w.days, "sla": w.sla.to_string() }))
        .collect();

    json!({
        "title": page.title,
        "generated_at": page.now,
        "last_update": page.last_update,
        "summary": {
            "status": page.fleet.status.message(),
            "up": page.fleet.up,
            "down": page.fleet.down,
            "maintenance": page.counts.maintenance,
            "no_data": page.counts.no_data,
        },
        "sla": sla,
        "maintenance": {
            "active": page.maintenance.active.iter().map(|w| window_json(w)).collect::<Vec<_>>(),
            "upcoming": page.maintenance.upcoming.iter().map(|w| window_json(w)).collect::<Vec<_>>(),
        },
        "monitors": monitors,
    })
}

/// Write the export document as pretty JSON.
pub fn write_page(page: &StatusPage<'_>, state: Option<&MonitorState>, config: &PageConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&page_to_json(page, state, config))?;
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorTarget;
    use crate::data::Filter;

    #[test]
    fn test_page_to_json() {
        let now = 10_000;
        let config = PageConfig {
            monitors: vec![MonitorTarget::new("api", "API"), MonitorTarget::new("new", "New")],
            maintenances: vec![MaintenanceWindow::new("Later", now + 100, None)],
            ..PageConfig::default()
        };
        let state = MonitorState::builder()
            .last_update(now)
            .monitor("api", |m| m.incident(|i| i.start(9_000).error("timeout")))
            .build();

        let page = StatusPage::compute(Some(&state), &config, &Filter::default(), now);
        let json = page_to_json(&page, Some(&state), &config);

        assert_eq!(json["summary"]["status"], "All systems not operational");
        assert_eq!(json["sla"][0]["days"], 30);
        assert_eq!(json["maintenance"]["upcoming"][0]["title"], "Later");
        assert_eq!(json["monitors"][0]["status"], "Major outage");
        assert_eq!(json["monitors"][0]["incidents"][0]["error"], "timeout");
        assert_eq!(json["monitors"][0]["incidents"][0]["end"], Value::Null);
        assert_eq!(json["monitors"][1]["status"], "No data available");
        assert_eq!(json["monitors"][1]["overall_uptime"], Value::Null);
    }

    #[test]
    fn test_write_page_without_state() {
        let config = PageConfig::default();
        let page = StatusPage::compute(None, &config, &Filter::default(), 0);
        let file = tempfile::NamedTempFile::new().unwrap();

        write_page(&page, None, &config, file.path()).unwrap();
        let json: Value = serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(json["summary"]["status"], "No data yet");
    }
}
