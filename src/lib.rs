//! record-log - console logging with optional rotating text files
//!
//! Long messages are split into fixed-size segments under a header line.
//! Lines can additionally be appended to `Log_<YYYYMMDDHHmm>[_<n>].txt` files,
//! rotated by date stamp and by size. Logging never fails the caller.

pub mod chunker;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod manager;

pub use chunker::{CallSite, Chunk, ChunkMode, Chunker};
pub use config::Config;
pub use error::{RecordLogError, Result};
pub use logging::{ConsoleBuffer, ConsoleSink, FileLogWriter, StdoutSink};
pub use manager::LogManager;
