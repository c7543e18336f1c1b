//! Incidents - intervals during which a monitor was considered down.

use alloc::string::String;
use alloc::vec::Vec;

use crate::Timestamp;

/// A recorded interval during which a monitor was down.
///
/// `start` holds one or more check timestamps: the first is the nominal start
/// of the incident, later entries are retries observed while it stayed open.
/// `error` is positionally correlated with `start`.
///
/// An incident without `end` is still open, meaning the monitor is down right
/// now. Only the last incident of a monitor may be open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Incident {
    /// Check timestamps, nominal start first.
    pub start: Vec<Timestamp>,

    /// When the monitor recovered. `None` while the incident is open.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub end: Option<Timestamp>,

    /// Error messages, one per entry in `start`.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub error: Vec<String>,
}

impl Incident {
    /// Create a builder for an incident.
    pub fn builder() -> IncidentBuilder {
        IncidentBuilder::new()
    }

    /// Nominal start of the incident.
    ///
    /// Returns `None` only for a malformed incident with an empty `start` list.
    pub fn started_at(&self) -> Option<Timestamp> {
        self.start.first().copied()
    }

    /// True while the monitor has not recovered.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// The end of the incident, or `now` if it is still open.
    pub fn effective_end(&self, now: Timestamp) -> Timestamp {
        self.end.unwrap_or(now)
    }

    /// The first recorded error message, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.error.first().map(String::as_str)
    }
}

/// Builder for `Incident`.
#[derive(Debug, Default)]
pub struct IncidentBuilder {
    start: Vec<Timestamp>,
    end: Option<Timestamp>,
    error: Vec<String>,
}

impl IncidentBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a check timestamp. The first call sets the nominal start.
    pub fn start(mut self, ts: Timestamp) -> Self {
        self.start.push(ts);
        self
    }

    /// Close the incident at the given timestamp.
    pub fn end(mut self, ts: Timestamp) -> Self {
        self.end = Some(ts);
        self
    }

    /// Append an error message.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error.push(message.into());
        self
    }

    /// Build the incident.
    pub fn build(self) -> Incident {
        Incident {
            start: self.start,
            end: self.end,
            error: self.error,
        }
    }
}
