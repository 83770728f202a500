//! Console sink
//!
//! Every produced line goes to a console sink, whether or not it is also
//! written to a file.

use std::io::Write;

use chrono::Local;

/// Destination for console lines
pub trait ConsoleSink: Send + Sync {
    /// Emit one line as produced by the chunker (it may or may not end in a newline)
    fn emit(&self, line: &str);
}

/// Writes timestamped lines to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl ConsoleSink for StdoutSink {
    fn emit(&self, line: &str) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        // console output is best-effort; a closed stdout must not take the caller down
        let _ = writeln!(out, "{}", format_console_line(line));
    }
}

/// Prefix a line with a local timestamp and drop one trailing newline
pub fn format_console_line(line: &str) -> String {
    let line = line.strip_suffix('\n').unwrap_or(line);
    format!("{} {}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"), line)
}
