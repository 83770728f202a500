//! Date stamps for log file names

use std::sync::RwLock;

use chrono::Local;

/// Minute-granularity stamp used in log file names, e.g. `202310181342`
pub const DATE_STAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Source of the current date stamp
pub trait Clock: Send + Sync {
    /// Current date stamp in `DATE_STAMP_FORMAT`
    fn date_stamp(&self) -> String;
}

/// Wall clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn date_stamp(&self) -> String {
        Local::now().format(DATE_STAMP_FORMAT).to_string()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    stamp: RwLock<String>,
}

impl ManualClock {
    pub fn new(stamp: impl Into<String>) -> Self {
        Self {
            stamp: RwLock::new(stamp.into()),
        }
    }

    /// Replace the current stamp
    pub fn set(&self, stamp: impl Into<String>) {
        if let Ok(mut current) = self.stamp.write() {
            *current = stamp.into();
        }
    }
}

impl Clock for ManualClock {
    fn date_stamp(&self) -> String {
        self.stamp
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}
