//! Stream-based data source.
//!
//! Receives state snapshots from an async byte stream, for example a TCP
//! connection to a process that re-publishes the checker's state.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use upwatch_types::MonitorState;

use super::{decode_state, DataSource};

type SharedError = Arc<Mutex<Option<String>>>;

fn set_error(handle: &SharedError, error: Option<String>) {
    if let Ok(mut guard) = handle.lock() {
        *guard = error;
    }
}

/// A data source that receives state snapshots from an async stream.
///
/// This source spawns a background task that reads newline-delimited JSON
/// from the provided async reader and makes snapshots available via `poll()`.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use upwatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = br#"{"incident":{},"overallUp":0,"overallDown":0,"lastUpdate":0}"#.to_vec();
/// let source = StreamSource::spawn(Cursor::new(data), "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<MonitorState>,
    description: String,
    last_error: SharedError,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Each line is parsed as a complete `MonitorState`. Blank lines are
    /// skipped; a line that fails to parse is recorded as the last error and
    /// reading continues.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let last_error: SharedError = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        debug!("state stream closed");
                        set_error(&error_handle, Some("Connection closed".to_string()));
                        break;
                    }
                    Ok(_) if line.trim().is_empty() => continue,
                    Ok(_) => match decode_state(line.trim().as_bytes()) {
                        Ok(state) => {
                            set_error(&error_handle, None);
                            if tx.send(state).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("failed to parse state line: {}", e);
                            set_error(&error_handle, Some(format!("Parse error: {}", e)));
                        }
                    },
                    Err(e) => {
                        set_error(&error_handle, Some(format!("Read error: {}", e)));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }

    /// Create a StreamSource from a channel of raw JSON documents.
    ///
    /// Each message is one complete snapshot, no newline framing needed.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, state_rx) = mpsc::channel(16);
        let last_error: SharedError = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                match decode_state(&bytes) {
                    Ok(state) => {
                        set_error(&error_handle, None);
                        if tx.send(state).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        set_error(&error_handle, Some(format!("Parse error: {}", e)));
                    }
                }
            }
        });

        Self {
            receiver: state_rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }
}

impl DataSource for StreamSource {
    fn poll(&mut self) -> Option<MonitorState> {
        // Drain to the newest snapshot, older ones are superseded
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(state) => latest = Some(state),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if let (None, Ok(mut error)) = (&latest, self.last_error.lock()) {
                        error.get_or_insert_with(|| "Stream disconnected".to_string());
                    }
                    break;
                }
            }
        }
        latest
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|guard| guard.clone())
    }
}
