//! Decoding of serialized state snapshots.
//!
//! The checker writes the state blob as JSON:
//!
//! ```json
//! {
//!   "incident": { "api": [ { "start": [1000], "end": 2000, "error": ["HTTP 502"] } ] },
//!   "latency": { "api": { "recent": [ { "loc": "FRA", "ping": 120, "time": 1990 } ] } },
//!   "overallUp": 1,
//!   "overallDown": 0,
//!   "lastUpdate": 2000
//! }
//! ```

use tracing::warn;
use upwatch_types::MonitorState;

use crate::data::status::check_history;

/// Parse a state snapshot and report any history that breaks the ordering
/// rules. Broken histories are kept as they are.
pub fn decode_state(bytes: &[u8]) -> Result<MonitorState, serde_json::Error> {
    let state: MonitorState = serde_json::from_slice(bytes)?;
    report_invalid_histories(&state);
    Ok(state)
}

/// Log every monitor whose history breaks the ordering rules.
///
/// Returns the number of monitors reported.
pub fn report_invalid_histories(state: &MonitorState) -> usize {
    state
        .incident
        .iter()
        .filter_map(|(id, incidents)| check_history(id, incidents).err())
        .inspect(|err| warn!("{}", err))
        .count()
}
