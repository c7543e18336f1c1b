//! Latency samples recorded alongside the incident history.

use alloc::string::String;
use alloc::vec::Vec;

use crate::Timestamp;

/// Latency series for one monitor.
///
/// The checker may write more fields than these (for example a long-term
/// series); unknown fields are ignored when deserializing. Samples that do
/// not decode are dropped rather than failing the whole state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Latency {
    /// Most recent samples, oldest first.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "lenient::samples"))]
    pub recent: Vec<LatencySample>,
}

impl Latency {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for a latency series.
    pub fn builder() -> LatencyBuilder {
        LatencyBuilder::new()
    }

    /// Check if the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// The newest sample, if any.
    pub fn latest(&self) -> Option<&LatencySample> {
        self.recent.last()
    }

    /// Mean ping over the recent samples in milliseconds.
    pub fn average_ping(&self) -> Option<f64> {
        if self.recent.is_empty() {
            return None;
        }
        let total: u64 = self.recent.iter().map(|s| s.ping).sum();
        Some(total as f64 / self.recent.len() as f64)
    }
}

/// A single latency measurement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatencySample {
    /// Location code of the checker that took the sample.
    #[cfg_attr(feature = "serde", serde(default))]
    pub loc: String,

    /// Round-trip time in milliseconds. Fractional values are rounded.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "lenient::ping"))]
    pub ping: u64,

    /// When the sample was taken.
    pub time: Timestamp,
}

/// Builder for `Latency`.
#[derive(Debug, Default)]
pub struct LatencyBuilder {
    recent: Vec<LatencySample>,
}

impl LatencyBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample.
    pub fn sample(mut self, loc: impl Into<String>, ping: u64, time: Timestamp) -> Self {
        self.recent.push(LatencySample {
            loc: loc.into(),
            ping,
            time,
        });
        self
    }

    /// Build the latency series.
    pub fn build(self) -> Latency {
        Latency {
            recent: self.recent,
        }
    }
}

/// Tolerant decoding of latency data, which the status page only displays.
#[cfg(feature = "serde")]
pub(crate) mod lenient {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use serde::de::{Error, IgnoredAny};
    use serde::{Deserialize, Deserializer};

    use super::{Latency, LatencySample};

    /// A value that either decodes or is skipped.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry<T> {
        Valid(T),
        Invalid(IgnoredAny),
    }

    impl<T> Entry<T> {
        fn valid(self) -> Option<T> {
            match self {
                Entry::Valid(value) => Some(value),
                Entry::Invalid(_) => None,
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ping {
        Millis(u64),
        Fractional(f64),
    }

    pub(crate) fn ping<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Ping::deserialize(deserializer)? {
            Ping::Millis(ms) => Ok(ms),
            Ping::Fractional(ms) if ms.is_finite() && ms >= 0.0 => Ok((ms + 0.5) as u64),
            Ping::Fractional(ms) => Err(D::Error::custom(format_args!("invalid ping {}", ms))),
        }
    }

    pub(crate) fn samples<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<LatencySample>, D::Error> {
        let entries = Entry::<Vec<Entry<LatencySample>>>::deserialize(deserializer)?
            .valid()
            .unwrap_or_default();
        Ok(entries.into_iter().filter_map(Entry::valid).collect())
    }

    pub(crate) fn series<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Latency>, D::Error> {
        let entries = Entry::<BTreeMap<String, Entry<Latency>>>::deserialize(deserializer)?
            .valid()
            .unwrap_or_default();
        Ok(entries
            .into_iter()
            .filter_map(|(id, latency)| latency.valid().map(|l| (id, l)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_ping_over_samples() {
        let latency = LatencyBuilder::new()
            .sample("FRA", 100, 10)
            .sample("FRA", 200, 20)
            .sample("HKG", 300, 30)
            .build();
        assert_eq!(latency.average_ping(), Some(200.0));
        assert_eq!(latency.latest().map(|s| s.time), Some(30));
    }

    #[test]
    fn empty_series_has_no_average() {
        assert!(Latency::new().is_empty());
        assert_eq!(Latency::new().average_ping(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{"recent":[{"loc":"SJC","ping":87,"time":1700000000}],"all":[]}"#;
        let latency: Latency = serde_json::from_str(json).unwrap();
        assert_eq!(latency.recent.len(), 1);
        assert_eq!(latency.recent[0].loc, "SJC");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn fractional_ping_is_rounded() {
        let json = r#"{"recent":[{"loc":"FRA","ping":12.5,"time":10},{"loc":"FRA","ping":40,"time":20}]}"#;
        let latency: Latency = serde_json::from_str(json).unwrap();
        assert_eq!(latency.recent.iter().map(|s| s.ping).collect::<Vec<_>>(), vec![13, 40]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn undecodable_samples_are_dropped() {
        let json = r#"{"recent":[{"loc":"FRA","ping":"fast","time":10},{"ping":-3,"time":15},7,{"loc":"AMS","ping":90,"time":20}]}"#;
        let latency: Latency = serde_json::from_str(json).unwrap();
        assert_eq!(latency.recent.len(), 1);
        assert_eq!(latency.recent[0].loc, "AMS");

        let latency: Latency = serde_json::from_str(r#"{"recent":"none"}"#).unwrap();
        assert!(latency.is_empty());
    }
}
