//! Log file retention management
//!
//! Handles cleanup of old log files based on age.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};

use super::file_writer::is_log_file_name;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Delete log files whose modification time is older than `retention_days`
///
/// Only `Log_*.txt` files are considered. A period too long to represent
/// keeps everything. Returns the number of files deleted.
pub fn cleanup_old_logs(logs_dir: &Path, retention_days: u64) -> Result<usize> {
    if !logs_dir.exists() {
        return Ok(0);
    }

    let Some(retention_secs) = retention_days.checked_mul(SECS_PER_DAY) else {
        return Ok(0);
    };
    let retention_duration = Duration::from_secs(retention_secs);
    let cutoff = SystemTime::now()
        .checked_sub(retention_duration)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut deleted_count = 0;

    let entries = fs::read_dir(logs_dir)
        .with_context(|| format!("Failed to read log directory {}", logs_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if is_log_file_name(name) => {}
            _ => continue,
        }

        if let Ok(metadata) = entry.metadata() {
            if !metadata.is_file() {
                continue;
            }
            if let Ok(modified) = metadata.modified() {
                if modified < cutoff && fs::remove_file(&path).is_ok() {
                    tracing::debug!(path = %path.display(), "Removed expired log file");
                    deleted_count += 1;
                }
            }
        }
    }

    Ok(deleted_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_cleanup_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let count = cleanup_old_logs(temp_dir.path(), 7).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_cleanup_nonexistent_dir() {
        let path = Path::new("/nonexistent/path/for/testing");
        let count = cleanup_old_logs(path, 7).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_cleanup_keeps_recent_files() {
        let temp_dir = TempDir::new().unwrap();

        let log_file = temp_dir.path().join("Log_202310181200.txt");
        File::create(&log_file)
            .unwrap()
            .write_all(b"test log content")
            .unwrap();

        let count = cleanup_old_logs(temp_dir.path(), 7).unwrap();
        assert_eq!(count, 0);
        assert!(log_file.exists());
    }

    #[test]
    fn test_huge_retention_does_not_panic() {
        let temp_dir = TempDir::new().unwrap();

        let log_file = temp_dir.path().join("Log_202310181200.txt");
        File::create(&log_file).unwrap().write_all(b"keep").unwrap();

        for days in [u64::MAX / 1000, u64::MAX] {
            let count = cleanup_old_logs(temp_dir.path(), days).unwrap();
            assert_eq!(count, 0);
        }
        assert!(log_file.exists());
    }

    #[test]
    fn test_zero_retention_removes_only_log_files() {
        let temp_dir = TempDir::new().unwrap();

        let log_file = temp_dir.path().join("Log_202310181200_1.txt");
        File::create(&log_file).unwrap().write_all(b"old").unwrap();
        let other_file = temp_dir.path().join("notes.txt");
        File::create(&other_file).unwrap().write_all(b"keep").unwrap();

        std::thread::sleep(Duration::from_millis(20));
        let count = cleanup_old_logs(temp_dir.path(), 0).unwrap();

        assert_eq!(count, 1);
        assert!(!log_file.exists());
        assert!(other_file.exists());
    }
}
