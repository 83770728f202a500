//! Message chunking
//!
//! Splits a message into the lines that go to the console and, optionally, to
//! the log file. Long messages get a header line followed by fixed-size body
//! segments.

use serde::{Deserialize, Serialize};

/// Default maximum segment length, in characters
pub const DEFAULT_MAX_CHUNK_LENGTH: usize = 300;

/// Where a log call came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Function (or module path) that issued the log call
    pub function: String,
    /// Source file of the call
    pub file: String,
    /// Line number of the call
    pub line: u32,
}

impl CallSite {
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }

    /// Category label shown in angle brackets: the last path component of the file
    pub fn category(&self) -> &str {
        self.file
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(self.file.as_str())
    }
}

/// How long messages are sliced into segments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkMode {
    /// Half-open `[i*max, (i+1)*max)` slices; no overlap, no lost characters
    #[default]
    Exclusive,
    /// Inclusive `[i*max, (i+1)*max]` slices, matching logs written by older
    /// versions: segments overlap by one character and any slice reaching past
    /// the end of the message is empty
    Legacy,
}

/// A single line produced for a log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Text as emitted, including its trailing newline if it has one
    pub text: String,
    /// True for the standalone header of a split message
    pub is_header: bool,
}

impl Chunk {
    fn header(text: String) -> Self {
        Self {
            text,
            is_header: true,
        }
    }

    fn body(text: String) -> Self {
        Self {
            text,
            is_header: false,
        }
    }
}

/// Splits messages into chunks
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    max_chunk_length: usize,
    mode: ChunkMode,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_LENGTH, ChunkMode::default())
    }
}

impl Chunker {
    /// Create a chunker; a zero length is treated as 1
    pub fn new(max_chunk_length: usize, mode: ChunkMode) -> Self {
        Self {
            max_chunk_length: max_chunk_length.max(1),
            mode,
        }
    }

    pub fn max_chunk_length(&self) -> usize {
        self.max_chunk_length
    }

    /// Produce the lines for one log call
    ///
    /// - no message: `[tag] <category> function\n` (persisted like any other
    ///   line when saving; older versions kept it console-only)
    /// - short message: `[tag] <category> function [#line] message\n`
    /// - long message: a header `[tag] <category> function [#line]` followed by
    ///   body segments; only the last segment ends with a newline
    pub fn chunk(&self, message: Option<&str>, tag: &str, call_site: &CallSite) -> Vec<Chunk> {
        let category = call_site.category();

        let message = match message {
            Some(m) if !m.is_empty() => m,
            _ => {
                return vec![Chunk::body(format!(
                    "[{}] <{}> {}\n",
                    tag, category, call_site.function
                ))]
            }
        };

        let prefix = format!(
            "[{}] <{}> {} [#{}]",
            tag, category, call_site.function, call_site.line
        );

        let chars: Vec<char> = message.chars().collect();
        let segments = self.segments(&chars);

        if segments.len() == 1 {
            return vec![Chunk::body(format!("{} {}\n", prefix, message))];
        }

        let last = segments.len() - 1;
        let mut chunks = Vec::with_capacity(segments.len() + 1);
        chunks.push(Chunk::header(prefix));
        for (i, mut segment) in segments.into_iter().enumerate() {
            if i == last {
                segment.push('\n');
            }
            chunks.push(Chunk::body(segment));
        }
        chunks
    }

    /// Split a message into body segments; a single segment means the message
    /// is printed on one line
    fn segments(&self, chars: &[char]) -> Vec<String> {
        let n = chars.len();
        let max = self.max_chunk_length;

        match self.mode {
            ChunkMode::Exclusive => {
                if n <= max {
                    return vec![chars.iter().collect()];
                }
                chars.chunks(max).map(|c| c.iter().collect()).collect()
            }
            ChunkMode::Legacy => {
                let divide_count = n / max;
                if divide_count == 0 {
                    return vec![chars.iter().collect()];
                }
                (0..=divide_count)
                    .map(|i| {
                        let start = i * max;
                        let end = if i == divide_count {
                            n - 1
                        } else {
                            (i + 1) * max
                        };
                        inclusive_slice(chars, start, end)
                    })
                    .collect()
            }
        }
    }
}

/// Characters `start..=end`, or empty when the range is not inside `chars`
pub fn inclusive_slice(chars: &[char], start: usize, end: usize) -> String {
    if start > end || end >= chars.len() {
        return String::new();
    }
    chars[start..=end].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> CallSite {
        CallSite::new("f", "src/net/client.rs", 9)
    }

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_category_is_last_path_component() {
        assert_eq!(site().category(), "client.rs");
        assert_eq!(CallSite::new("f", "C:\\src\\a.rs", 1).category(), "a.rs");
        assert_eq!(CallSite::new("f", "main.rs", 1).category(), "main.rs");
    }

    #[test]
    fn test_missing_message_prints_call_site_only() {
        let chunker = Chunker::default();
        let chunks = chunker.chunk(None, "T", &site());
        assert_eq!(texts(&chunks), vec!["[T] <client.rs> f\n"]);

        let chunks = chunker.chunk(Some(""), "T", &site());
        assert_eq!(texts(&chunks), vec!["[T] <client.rs> f\n"]);
    }

    #[test]
    fn test_short_message_is_one_line() {
        let chunks = Chunker::default().chunk(Some("hello"), "Log", &site());
        assert_eq!(texts(&chunks), vec!["[Log] <client.rs> f [#9] hello\n"]);
        assert!(!chunks[0].is_header);
    }

    #[test]
    fn test_exclusive_up_to_max_is_one_line() {
        for len in [1, 299, 300] {
            let message = "x".repeat(len);
            let chunks = Chunker::default().chunk(Some(&message), "T", &site());
            assert_eq!(chunks.len(), 1, "len {}", len);
            assert_eq!(chunks[0].text, format!("[T] <client.rs> f [#9] {}\n", message));
        }
    }

    #[test]
    fn test_exclusive_splits_without_overlap() {
        let message: String = (0..650).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = Chunker::default().chunk(Some(&message), "T", &site());

        assert_eq!(chunks.len(), 4);
        assert!(chunks[0].is_header);
        assert_eq!(chunks[0].text, "[T] <client.rs> f [#9]");
        assert_eq!(chunks[1].text.chars().count(), 300);
        assert_eq!(chunks[2].text.chars().count(), 300);
        assert_eq!(chunks[3].text, format!("{}\n", &message[600..]));

        let rebuilt: String = chunks[1..].iter().map(|c| c.text.trim_end_matches('\n')).collect();
        assert_eq!(rebuilt, message);
    }

    #[test]
    fn test_legacy_overlaps_one_char_per_boundary() {
        let message = "A".repeat(305);
        let chunker = Chunker::new(300, ChunkMode::Legacy);
        let chunks = chunker.chunk(Some(&message), "T", &site());

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "[T] <client.rs> f [#9]");
        assert_eq!(chunks[1].text, "A".repeat(301));
        assert_eq!(chunks[2].text, format!("{}\n", "A".repeat(5)));
    }

    #[test]
    fn test_legacy_exact_multiple_yields_empty_segments() {
        let message = "b".repeat(300);
        let chunks = Chunker::new(300, ChunkMode::Legacy).chunk(Some(&message), "T", &site());
        // [0,300] and [300,299] are both out of range
        assert_eq!(texts(&chunks), vec!["[T] <client.rs> f [#9]", "", "\n"]);

        let message = "c".repeat(600);
        let chunks = Chunker::new(300, ChunkMode::Legacy).chunk(Some(&message), "T", &site());
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[1].text, "c".repeat(301));
        assert_eq!(chunks[2].text, "");
        assert_eq!(chunks[3].text, "\n");
    }

    #[test]
    fn test_legacy_short_message_matches_exclusive() {
        let legacy = Chunker::new(300, ChunkMode::Legacy).chunk(Some("hi"), "T", &site());
        let exclusive = Chunker::default().chunk(Some("hi"), "T", &site());
        assert_eq!(legacy, exclusive);
    }

    #[test]
    fn test_multibyte_chars_counted_once() {
        let message = "가".repeat(301);
        let chunks = Chunker::default().chunk(Some(&message), "T", &site());
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].text, "가".repeat(300));
        assert_eq!(chunks[2].text, "가\n");
    }

    #[test]
    fn test_inclusive_slice_bounds() {
        let chars: Vec<char> = "1234".chars().collect();
        assert_eq!(inclusive_slice(&chars, 0, 2), "123");
        assert_eq!(inclusive_slice(&chars, 3, 3), "4");
        assert_eq!(inclusive_slice(&chars, 2, 1), "");
        assert_eq!(inclusive_slice(&chars, 0, 4), "");
    }

    #[test]
    fn test_zero_max_length_clamped() {
        let chunker = Chunker::new(0, ChunkMode::Exclusive);
        assert_eq!(chunker.max_chunk_length(), 1);
        let chunks = chunker.chunk(Some("ab"), "T", &site());
        assert_eq!(texts(&chunks), vec!["[T] <client.rs> f [#9]", "a", "b\n"]);
    }
}
