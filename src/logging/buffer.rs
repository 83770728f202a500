//! In-memory console buffer
//!
//! Thread-safe ring buffer that keeps the most recent console lines, for hosts
//! that display them themselves and for tests.

use std::collections::VecDeque;
use std::sync::RwLock;

use chrono::{DateTime, Local};

use super::console::ConsoleSink;

/// A single emitted console line
#[derive(Debug, Clone)]
pub struct ConsoleEntry {
    /// When the line was emitted
    pub timestamp: DateTime<Local>,
    /// Line text as produced by the chunker
    pub text: String,
}

impl ConsoleEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            text: text.into(),
        }
    }
}

/// Capped buffer of console lines
pub struct ConsoleBuffer {
    entries: RwLock<VecDeque<ConsoleEntry>>,
    max_entries: usize,
}

impl ConsoleBuffer {
    /// Create a buffer holding at most `max_entries` lines
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(max_entries)),
            max_entries,
        }
    }

    /// Push a line, dropping the oldest when full
    pub fn push(&self, entry: ConsoleEntry) {
        if self.max_entries == 0 {
            return;
        }
        if let Ok(mut entries) = self.entries.write() {
            if entries.len() >= self.max_entries {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }

    /// Get all entries as a vector
    pub fn all_entries(&self) -> Vec<ConsoleEntry> {
        self.entries
            .read()
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Get just the line texts, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .read()
            .map(|e| e.iter().map(|entry| entry.text.clone()).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl ConsoleSink for ConsoleBuffer {
    fn emit(&self, line: &str) {
        self.push(ConsoleEntry::new(line));
    }
}
