//! Run logging
//!
//! Console logging goes through `tracing` and is initialized once in the
//! binary. File logging is deliberately not a process-wide side effect:
//! each run owns a [`RunLog`] opened under its `output_dir`, and the handle
//! is dropped with the engine.

use crate::error::Result;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Name of the log file written under `output_dir`.
pub const LOG_FILE_NAME: &str = "ascension.log";

/// Append-only log for a single pipeline run, written to
/// `output_dir/ascension.log`. Records are timestamped lines; each record
/// is also emitted as a `tracing` event so console and file stay in sync.
pub struct RunLog {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl RunLog {
    /// Open the run log under `output_dir`, creating the directory if needed.
    pub fn create(output_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = output_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Append one record and flush it to disk.
    pub fn record(&self, message: &str) {
        tracing::info!("{}", message);
        let line = format!(
            "{} [INFO] {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        );
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.write_all(line.as_bytes());
            let _ = writer.flush();
        }
    }

    /// Path of the log file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for RunLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLog").field("path", &self.path).finish()
    }
}
