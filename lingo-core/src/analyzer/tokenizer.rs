//! Word splitting for normalized text.
//!
//! The word-bounded n-gram analyzer needs the words of a normalized text so
//! that its windows never cross a word boundary. Given `"hello big world"` the
//! tokenizer emits:
//!
//! ```ignore
//! ("hello", 0)
//! ("big", 1)
//! ("world", 2)
//! ```
//!
//! Tokens are slices of the input, found with a memchr scan for ASCII space
//! (0x20). Normalized text has single spaces and trimmed ends; empty runs
//! produced by stray spaces are skipped rather than emitted.

use memchr::memchr_iter;

/// Splits normalized text into words.
#[derive(Debug, Copy, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a new tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Emits `(word, position)` for each space-separated word, left to right.
    ///
    /// Position is `u32`. After emitting a token at position `u32::MAX`,
    /// further emissions stop.
    #[inline]
    pub fn tokenize<'n, F>(&self, normalized: &'n str, mut emit: F)
    where
        F: FnMut(&'n str, u32),
    {
        let bytes = normalized.as_bytes();
        if bytes.is_empty() {
            return;
        }

        let mut start = 0usize;
        let mut pos = 0u32;

        for i in memchr_iter(b' ', bytes) {
            if start < i {
                // An ASCII space is never a UTF-8 continuation byte, so both
                // ends are char boundaries.
                emit(&normalized[start..i], pos);
                if pos == u32::MAX {
                    return;
                }
                pos += 1;
            }
            start = i + 1;
        }

        if start < bytes.len() {
            emit(&normalized[start..], pos);
        }
    }
}
