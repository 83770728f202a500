//! File and console output
//!
//! Provides the rotating file writer, console sinks, an in-memory console
//! buffer, and age-based cleanup of old log files.

mod buffer;
mod clock;
mod console;
mod file_writer;
mod retention;

pub use buffer::{ConsoleBuffer, ConsoleEntry};
pub use clock::{Clock, LocalClock, ManualClock, DATE_STAMP_FORMAT};
pub use console::{format_console_line, ConsoleSink, StdoutSink};
pub use file_writer::{
    is_log_file_name, root_log_file_name, FileLogWriter, DEFAULT_MAX_FILE_SIZE,
    LOG_FILE_EXTENSION, LOG_FILE_PREFIX,
};
pub use retention::cleanup_old_logs;
