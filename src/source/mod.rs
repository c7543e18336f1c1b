//! Data source abstraction for receiving monitor state snapshots.
//!
//! The uptime checker writes its state somewhere; this module gets it into
//! the TUI. A snapshot always replaces the previous one wholesale.

mod channel;
mod file;
mod snapshot;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use snapshot::{decode_state, report_invalid_histories};
pub use stream::StreamSource;

use std::fmt::Debug;

use upwatch_types::MonitorState;

/// Trait for receiving monitor state from various sources.
///
/// Implementations deliver snapshots from a polled file, a network stream or
/// an in-process channel. Failures never surface from `poll()`: the source
/// remembers the last error and the caller keeps its last good snapshot.
///
/// # Example
///
/// ```
/// use upwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("state.json");
/// if let Some(state) = source.poll() {
///     println!("Got {} monitors", state.incident.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(state)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<MonitorState>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The error from the last poll, if any.
    fn error(&self) -> Option<String>;

    /// Make the next poll deliver the current state again, even if unchanged.
    ///
    /// Push-based sources have nothing to re-read and keep the default.
    fn refresh(&mut self) {}
}
