//! Log entry point
//!
//! `LogManager` ties the chunker, the console sink and the file writer
//! together. Construct one explicitly, or use the lazily created
//! `LogManager::shared()` instance through the `write_log!` macro.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::chunker::{CallSite, Chunker};
use crate::config::Config;
use crate::logging::{
    cleanup_old_logs, Clock, ConsoleSink, FileLogWriter, LocalClock, StdoutSink,
};

/// Formats log calls, prints them, and optionally persists them
pub struct LogManager {
    chunker: Chunker,
    default_tag: String,
    sink: Arc<dyn ConsoleSink>,
    writer: Mutex<FileLogWriter>,
}

impl LogManager {
    /// Create a manager using the local wall clock
    ///
    /// File errors are reported as `tracing` events. Install a subscriber
    /// (e.g. `diagnostics::init()`) to control where they go; without one they
    /// are printed to stderr.
    pub fn new(config: &Config, sink: Arc<dyn ConsoleSink>) -> Self {
        Self::with_clock(config, sink, Arc::new(LocalClock))
    }

    /// Create a manager with a custom clock for file names
    ///
    /// Runs retention cleanup once if `retention_days` is configured.
    pub fn with_clock(config: &Config, sink: Arc<dyn ConsoleSink>, clock: Arc<dyn Clock>) -> Self {
        let log_dir = config.log_directory();

        if let Some(days) = config.retention_days {
            match cleanup_old_logs(&log_dir, days) {
                Ok(count) if count > 0 => {
                    tracing::info!("Cleaned up {} old log files", count);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Log retention cleanup failed: {:#}", e),
            }
        }

        Self {
            chunker: config.chunker(),
            default_tag: config.default_tag.clone(),
            sink,
            writer: Mutex::new(FileLogWriter::with_clock(
                log_dir,
                config.max_file_size_bytes,
                clock,
            )),
        }
    }

    /// Process-wide instance, created on first use from `Config::load()`
    pub fn shared() -> &'static LogManager {
        static SHARED: OnceLock<LogManager> = OnceLock::new();
        SHARED.get_or_init(|| {
            let config = Config::load().unwrap_or_else(|e| {
                tracing::warn!("Using default logger config: {:#}", e);
                Config::default()
            });
            LogManager::new(&config, Arc::new(StdoutSink))
        })
    }

    /// Log a message
    ///
    /// Every produced line goes to the console sink; with `save_file` each line
    /// is also appended to the active log file. All lines of one call are
    /// written under a single lock, so concurrent calls never interleave
    /// inside a file. Never fails.
    ///
    /// A call without a message is persisted as well. Older versions only
    /// printed that call-site line to the console and never wrote it to file.
    pub fn write_log(
        &self,
        message: Option<&str>,
        tag: Option<&str>,
        save_file: bool,
        call_site: &CallSite,
    ) {
        let tag = tag.unwrap_or(&self.default_tag);
        let chunks = self.chunker.chunk(message, tag, call_site);

        if !save_file {
            for chunk in &chunks {
                self.sink.emit(&chunk.text);
            }
            return;
        }

        let mut writer = self.lock_writer();
        for chunk in &chunks {
            self.sink.emit(&chunk.text);
            writer.record(&chunk.text);
        }
    }

    /// Wipe the log directory and recreate it empty
    pub fn reset_log_directory(&self) {
        self.lock_writer().reset_directory();
    }

    /// Directory log files are written to
    pub fn log_directory(&self) -> PathBuf {
        self.lock_writer().directory().to_path_buf()
    }

    /// File the next persisted line would go to, before any rotation check
    pub fn current_log_file(&self) -> PathBuf {
        self.lock_writer().current_file_path()
    }

    /// A panic while holding the lock leaves the writer usable; recover it
    fn lock_writer(&self) -> MutexGuard<'_, FileLogWriter> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LogManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogManager")
            .field("chunker", &self.chunker)
            .field("default_tag", &self.default_tag)
            .finish_non_exhaustive()
    }
}

/// Capture the current call site
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(module_path!(), file!(), line!())
    };
}

/// Log through the shared `LogManager`
///
/// ```no_run
/// use record_log::write_log;
///
/// write_log!();
/// write_log!("connected");
/// write_log!(tag: "Net", "retrying");
/// write_log!(save: true, "persisted to file");
/// write_log!(tag: "Net", save: true, format!("status {}", 200));
/// ```
#[macro_export]
macro_rules! write_log {
    () => {
        $crate::LogManager::shared().write_log(None, None, false, &$crate::call_site!())
    };
    (tag: $tag:expr, save: $save:expr, $msg:expr) => {
        $crate::LogManager::shared().write_log(
            Some(::std::convert::AsRef::<str>::as_ref(&$msg)),
            Some($tag),
            $save,
            &$crate::call_site!(),
        )
    };
    (tag: $tag:expr, $msg:expr) => {
        $crate::write_log!(tag: $tag, save: false, $msg)
    };
    (save: $save:expr, $msg:expr) => {
        $crate::LogManager::shared().write_log(
            Some(::std::convert::AsRef::<str>::as_ref(&$msg)),
            None,
            $save,
            &$crate::call_site!(),
        )
    };
    ($msg:expr) => {
        $crate::write_log!(save: false, $msg)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{ConsoleBuffer, ManualClock};
    use std::fs;
    use tempfile::TempDir;

    fn manager_in(temp_dir: &TempDir) -> (LogManager, Arc<ConsoleBuffer>) {
        let mut config = Config::default();
        config.storage_root = Some(temp_dir.path().to_path_buf());
        let buffer = Arc::new(ConsoleBuffer::new(1000));
        let manager = LogManager::with_clock(
            &config,
            buffer.clone(),
            Arc::new(ManualClock::new("202310181200")),
        );
        (manager, buffer)
    }

    #[test]
    fn test_console_only_does_not_touch_disk() {
        let temp_dir = TempDir::new().unwrap();
        let (manager, buffer) = manager_in(&temp_dir);

        manager.write_log(Some("hello"), None, false, &CallSite::new("run", "src/app.rs", 3));

        assert_eq!(buffer.lines(), vec!["[Log] <app.rs> run [#3] hello\n"]);
        assert!(!manager.log_directory().exists());
    }

    #[test]
    fn test_save_file_persists_same_lines_including_call_site_only() {
        let temp_dir = TempDir::new().unwrap();
        let (manager, buffer) = manager_in(&temp_dir);

        manager.write_log(Some("hello"), Some("T"), true, &CallSite::new("run", "app.rs", 3));
        manager.write_log(None, Some("T"), true, &CallSite::new("run", "app.rs", 4));

        let content = fs::read_to_string(manager.current_log_file()).unwrap();
        assert_eq!(content, buffer.lines().concat());
        assert_eq!(content, "[T] <app.rs> run [#3] hello\n[T] <app.rs> run\n");
    }

    #[test]
    fn test_reset_log_directory() {
        let temp_dir = TempDir::new().unwrap();
        let (manager, _) = manager_in(&temp_dir);

        manager.write_log(Some("x"), None, true, &crate::call_site!());
        assert!(manager.current_log_file().exists());

        manager.reset_log_directory();

        assert!(manager.log_directory().is_dir());
        assert_eq!(fs::read_dir(manager.log_directory()).unwrap().count(), 0);
    }

    #[test]
    fn test_call_site_macro() {
        let site = crate::call_site!();
        assert_eq!(site.category(), "manager.rs");
        assert!(site.function.ends_with("manager::tests"));
        assert!(site.line > 0);
    }

    #[test]
    fn test_retention_runs_at_construction() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("LogDirectory");
        fs::create_dir_all(&log_dir).unwrap();
        let old = log_dir.join("Log_202001010000.txt");
        fs::write(&old, "old").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));

        let mut config = Config::default();
        config.storage_root = Some(temp_dir.path().to_path_buf());
        config.retention_days = Some(0);
        let _manager = LogManager::new(&config, Arc::new(ConsoleBuffer::new(10)));

        assert!(!old.exists());
    }

    #[test]
    fn test_huge_retention_at_construction_keeps_files() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("LogDirectory");
        fs::create_dir_all(&log_dir).unwrap();
        let recent = log_dir.join("Log_202310181200.txt");
        fs::write(&recent, "recent").unwrap();

        let mut config = Config::default();
        config.storage_root = Some(temp_dir.path().to_path_buf());
        config.retention_days = Some(u64::MAX / 1000);
        let _manager = LogManager::new(&config, Arc::new(ConsoleBuffer::new(10)));

        assert!(recent.exists());
    }
}
