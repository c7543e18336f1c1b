//! File-based data source.
//!
//! Polls a JSON state file written by the uptime checker.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};
use upwatch_types::MonitorState;

use super::{decode_state, DataSource};

/// A data source that reads state snapshots from a JSON file.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file's modification time.
    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Read and parse the file.
    fn read_file(&mut self) -> Option<MonitorState> {
        match fs::read(&self.path) {
            Ok(content) => match decode_state(&content) {
                Ok(state) => {
                    self.last_error = None;
                    debug!(monitors = state.incident.len(), "read state from {}", self.path.display());
                    Some(state)
                }
                Err(e) => {
                    warn!("failed to parse {}: {}", self.path.display(), e);
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<MonitorState> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll or forced refresh
            (Some(_), None) => false, // File disappeared, keep the last state
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(state) = self.read_file() {
                self.last_modified = current_modified;
                return Some(state);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }

    fn refresh(&mut self) {
        self.last_modified = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "incident": {
                "api": [ { "start": [1000], "end": 2000, "error": ["timeout"] } ]
            },
            "overallUp": 1,
            "overallDown": 0,
            "lastUpdate": 2000
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/state.json");
        assert_eq!(source.path(), Path::new("/tmp/state.json"));
        assert_eq!(source.description(), "file: /tmp/state.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let state = source.poll().unwrap();
        assert_eq!(state.last_update, 2000);
        assert!(state.incidents("api").is_some());

        // Unchanged file
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_refresh_rereads_unchanged_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());

        source.refresh();
        assert!(source.poll().is_some());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let _ = source.poll();

        std::thread::sleep(std::time::Duration::from_millis(10));
        file.rewind().unwrap();
        writeln!(
            file,
            r#"{{"incident":{{"web":[]}},"overallUp":1,"overallDown":0,"lastUpdate":3000}}"#
        )
        .unwrap();
        file.flush().unwrap();

        // Filesystems with coarse mtime resolution may not see the change
        if let Some(state) = source.poll() {
            assert!(state.incidents("web").is_some());
        }
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/state.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }
}
