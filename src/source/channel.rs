//! Channel-based data source.
//!
//! Receives state snapshots via a tokio watch channel, for embedding the
//! status page in a process that already holds the checker's state.

use tokio::sync::watch;
use upwatch_types::MonitorState;

use super::{report_invalid_histories, DataSource};

/// A data source that receives state snapshots via a channel.
///
/// # Example
///
/// ```
/// use upwatch::ChannelSource;
/// use upwatch_types::MonitorState;
///
/// let (tx, source) = ChannelSource::create("checker");
/// tx.send(MonitorState::builder().monitor("api", |m| m).build()).unwrap();
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<MonitorState>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    pub fn new(receiver: watch::Receiver<MonitorState>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    ///
    /// The channel starts out holding an empty state.
    pub fn create(source_description: &str) -> (watch::Sender<MonitorState>, Self) {
        let (tx, rx) = watch::channel(MonitorState::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<MonitorState> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            let state = self.receiver.borrow_and_update().clone();
            report_invalid_histories(&state);
            Some(state)
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        None
    }

    fn refresh(&mut self) {
        self.receiver.mark_changed();
    }
}
