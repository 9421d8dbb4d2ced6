//! JSONL writer and reader for compliance trials.
//!
//! Each [`TrialRecord`] is serialized as a single JSON line appended to the
//! file, so repeated sessions accumulate into one log.

use pilot_application::TrialLog;
use pilot_domain::TrialRecord;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Trial logger that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record and on `Drop`.
pub struct JsonlTrialLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTrialLogger {
    /// Open `path` for appending, creating it (and parent directories) if needed.
    ///
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create trial log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open trial log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrialLog for JsonlTrialLogger {
    fn append(&self, record: &TrialRecord) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize trial record: {}", e);
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock()
            && let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush())
        {
            warn!("Could not write trial log {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlTrialLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Read every record of a trial log as raw JSON.
///
/// Blank lines are ignored; malformed lines are skipped with a warning.
pub fn read_trial_log(path: impl AsRef<Path>) -> io::Result<Vec<Value>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut records = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(value) => records.push(value),
            Err(e) => warn!("Skipping malformed trial line {}: {}", number + 1, e),
        }
    }
    Ok(records)
}
