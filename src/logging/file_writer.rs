//! Rotating text file writer
//!
//! Appends lines to `Log_<stamp>[_<n>].txt` files in a single directory. A new
//! root file is started whenever the date stamp changes; within one stamp, the
//! active file rolls over to a numbered suffix once it grows past the size cap.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::clock::{Clock, LocalClock};
use crate::error::{RecordLogError, Result};

/// Size above which the active file is rotated (512 KiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 / 2;

/// File name prefix shared by every log file
pub const LOG_FILE_PREFIX: &str = "Log_";

/// Extension of every log file
pub const LOG_FILE_EXTENSION: &str = "txt";

/// Root file name (no suffix, no extension) for a date stamp
pub fn root_log_file_name(date_stamp: &str) -> String {
    format!("{}{}", LOG_FILE_PREFIX, date_stamp)
}

/// Check whether a file name looks like one of ours
pub fn is_log_file_name(name: &str) -> bool {
    name.starts_with(LOG_FILE_PREFIX) && name.ends_with(&format!(".{}", LOG_FILE_EXTENSION))
}

/// Appends log lines to rotating files
///
/// Not internally synchronized; callers sharing a writer across threads wrap
/// it in a `Mutex` (see `LogManager`).
pub struct FileLogWriter {
    directory: PathBuf,
    max_file_size: u64,
    clock: Arc<dyn Clock>,
    /// Stamp of the last record
    save_date: String,
    root_log_file_name: String,
    /// Active file name, without extension
    log_file_name: String,
    /// Number of size rotations under the current root name
    file_count: u32,
}

impl FileLogWriter {
    /// Create a writer using the local wall clock
    pub fn new(directory: impl Into<PathBuf>, max_file_size: u64) -> Self {
        Self::with_clock(directory, max_file_size, Arc::new(LocalClock))
    }

    /// Create a writer with a custom clock
    ///
    /// The directory is not touched until the first record.
    pub fn with_clock(
        directory: impl Into<PathBuf>,
        max_file_size: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let save_date = clock.date_stamp();
        let root_log_file_name = root_log_file_name(&save_date);
        Self {
            directory: directory.into(),
            max_file_size,
            clock,
            save_date,
            log_file_name: root_log_file_name.clone(),
            root_log_file_name,
            file_count: 0,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn file_count(&self) -> u32 {
        self.file_count
    }

    /// Path of the file the next record would go to, before any rotation check
    pub fn current_file_path(&self) -> PathBuf {
        self.file_path(&self.log_file_name)
    }

    /// Append a line to the active log file
    ///
    /// The writer adds no separator; callers include their own newline.
    /// Failures are reported on the diagnostic channel and the line is dropped.
    pub fn record(&mut self, line: &str) {
        if let Err(e) = self.try_record(line) {
            report(&e);
        }
    }

    /// Append a line, returning any failure
    pub fn try_record(&mut self, line: &str) -> Result<()> {
        self.ensure_directory()?;

        let now = self.clock.date_stamp();
        if now != self.save_date {
            tracing::debug!(from = %self.save_date, to = %now, "Date stamp changed, starting new log file");
            self.file_count = 0;
            self.save_date = now;
            self.root_log_file_name = root_log_file_name(&self.save_date);
            self.log_file_name = self.root_log_file_name.clone();
        }

        let mut path = self.file_path(&self.log_file_name);
        if self.is_over_limit(&path) {
            self.file_count += 1;
            self.log_file_name = format!("{}_{}", self.root_log_file_name, self.file_count);
            path = self.file_path(&self.log_file_name);
            tracing::info!(path = %path.display(), "Log file over size limit, rotating");
        }

        if !path.exists() {
            File::create(&path).map_err(|source| RecordLogError::FileCreateFailed {
                path: path.clone(),
                source,
            })?;
        }

        append(&path, line.as_bytes()).map_err(|source| RecordLogError::FileAppendFailed {
            path: path.clone(),
            source,
        })
    }

    /// Delete the log directory with everything in it, then recreate it empty
    ///
    /// In-memory rotation state is kept. Failures are reported on the
    /// diagnostic channel; a failed delete does not prevent the recreate.
    pub fn reset_directory(&self) {
        if let Err(e) = self.delete_directory() {
            report(&e);
        }
        if let Err(e) = self.ensure_directory() {
            report(&e);
        }
    }

    /// Delete and recreate the log directory, stopping at the first failure
    pub fn try_reset_directory(&self) -> Result<()> {
        self.delete_directory()?;
        self.ensure_directory()
    }

    fn delete_directory(&self) -> Result<()> {
        match fs::remove_dir_all(&self.directory) {
            Ok(()) => {
                tracing::info!(dir = %self.directory.display(), "Log directory removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(RecordLogError::DirectoryDeleteFailed {
                path: self.directory.clone(),
                source,
            }),
        }
    }

    fn ensure_directory(&self) -> Result<()> {
        if self.directory.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.directory).map_err(|source| {
            RecordLogError::DirectoryCreateFailed {
                path: self.directory.clone(),
                source,
            }
        })
    }

    fn file_path(&self, file_name: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", file_name, LOG_FILE_EXTENSION))
    }

    /// True if the file exists and is larger than the cap
    fn is_over_limit(&self, path: &Path) -> bool {
        match fs::metadata(path) {
            Ok(metadata) => metadata.len() > self.max_file_size,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read log file size");
                false
            }
        }
    }
}

fn append(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(bytes)?;
    file.flush()
}

/// Send a swallowed error to the diagnostic channel
///
/// Falls back to stderr when no subscriber is installed, so failures are
/// never silent.
fn report(e: &RecordLogError) {
    if has_subscriber() {
        tracing::error!(
            path = %e.path().display(),
            kind = e.kind().describe(),
            "{}",
            e
        );
    } else {
        eprintln!("{}", diagnostic_line(e));
    }
}

fn has_subscriber() -> bool {
    tracing::dispatcher::get_default(|dispatch| {
        !dispatch.is::<tracing::subscriber::NoSubscriber>()
    })
}

/// Plain-text form of a swallowed error
fn diagnostic_line(e: &RecordLogError) -> String {
    format!("record-log: {} ({})", e, e.kind().describe())
}
