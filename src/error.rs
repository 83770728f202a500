//! Error types for the file log writer
//!
//! None of these ever reach the caller of `record()` or `reset_directory()`;
//! they are reported on the diagnostic channel and dropped.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecordLogError>;

/// Failures of the file log writer
#[derive(Error, Debug)]
pub enum RecordLogError {
    #[error("Failed to create log directory {path}: {source}")]
    DirectoryCreateFailed { path: PathBuf, source: io::Error },

    #[error("Failed to delete log directory {path}: {source}")]
    DirectoryDeleteFailed { path: PathBuf, source: io::Error },

    #[error("Failed to create log file {path}: {source}")]
    FileCreateFailed { path: PathBuf, source: io::Error },

    #[error("Failed to append to log file {path}: {source}")]
    FileAppendFailed { path: PathBuf, source: io::Error },
}

impl RecordLogError {
    /// Path the failed operation was working on
    pub fn path(&self) -> &Path {
        match self {
            RecordLogError::DirectoryCreateFailed { path, .. }
            | RecordLogError::DirectoryDeleteFailed { path, .. }
            | RecordLogError::FileCreateFailed { path, .. }
            | RecordLogError::FileAppendFailed { path, .. } => path,
        }
    }

    /// Underlying IO error
    pub fn io_error(&self) -> &io::Error {
        match self {
            RecordLogError::DirectoryCreateFailed { source, .. }
            | RecordLogError::DirectoryDeleteFailed { source, .. }
            | RecordLogError::FileCreateFailed { source, .. }
            | RecordLogError::FileAppendFailed { source, .. } => source,
        }
    }

    /// Categorize the underlying IO error
    pub fn kind(&self) -> DiskErrorKind {
        categorize_io_error(self.io_error())
    }
}

/// Categories of disk errors for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// Disk is full or quota exceeded
    DiskFull,
    /// Permission denied (read or write)
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// Other IO error
    Other,
}

impl DiskErrorKind {
    /// Short description for diagnostic output
    pub fn describe(&self) -> &'static str {
        match self {
            DiskErrorKind::DiskFull => "disk full",
            DiskErrorKind::PermissionDenied => "permission denied",
            DiskErrorKind::NotFound => "not found",
            DiskErrorKind::Other => "io error",
        }
    }
}

/// Categorize an IO error
pub fn categorize_io_error(e: &io::Error) -> DiskErrorKind {
    use std::io::ErrorKind;

    match e.kind() {
        ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,
        _ => {
            #[cfg(unix)]
            {
                if let Some(os_error) = e.raw_os_error() {
                    // ENOSPC = 28; EDQUOT = 122 on Linux, 69 on macOS
                    if os_error == 28 || os_error == 122 || os_error == 69 {
                        return DiskErrorKind::DiskFull;
                    }
                    // EACCES
                    if os_error == 13 {
                        return DiskErrorKind::PermissionDenied;
                    }
                }
            }
            DiskErrorKind::Other
        }
    }
}
