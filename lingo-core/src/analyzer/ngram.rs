//! Character n-gram extraction.
//!
//! Provides extraction of 1- to 3-character sequences from normalized text.
//! N-grams are the feature units of the TF-IDF extractor.

use lingo_types::{Analyzer, NGram, NgramRange};
use smallvec::SmallVec;

use crate::analyzer::tokenizer::Tokenizer;

/// Extracts n-grams from text using a sliding window over its characters.
///
/// All windows of the shortest length are emitted first, then the next
/// length. Windows overlap and cross spaces. For text of N characters, a
/// length `n <= N` contributes exactly `N - n + 1` n-grams; longer lengths
/// contribute none.
///
/// # Example
///
/// ```
/// use lingo_core::analyzer::ngram::extract_ngrams;
/// use lingo_types::NgramRange;
///
/// let mut grams = Vec::new();
/// extract_ngrams("abc", NgramRange::default(), |g| grams.push(g.to_string()));
///
/// assert_eq!(grams, ["a", "b", "c", "ab", "bc", "abc"]);
/// ```
#[inline]
pub fn extract_ngrams<F>(text: &str, range: NgramRange, mut callback: F)
where
    F: FnMut(NGram),
{
    let chars: SmallVec<[char; 128]> = text.chars().collect();
    emit_windows(&chars, range, &mut callback);
}

/// Extracts n-grams that stay inside words.
///
/// Each word is padded with one space on both sides before windowing, so
/// word starts and ends are marked. A padded word no longer than `n` is
/// emitted once, whole, and longer lengths are skipped for it.
///
/// # Example
///
/// ```
/// use lingo_core::analyzer::ngram::extract_word_bounded_ngrams;
/// use lingo_types::NgramRange;
///
/// let mut grams = Vec::new();
/// extract_word_bounded_ngrams("a bc", NgramRange::new(3, 3).unwrap(), |g| {
///     grams.push(g.to_string())
/// });
///
/// assert_eq!(grams, [" a ", " bc", "bc "]);
/// ```
pub fn extract_word_bounded_ngrams<F>(text: &str, range: NgramRange, mut callback: F)
where
    F: FnMut(NGram),
{
    let mut padded: SmallVec<[char; 32]> = SmallVec::new();

    Tokenizer::new().tokenize(text, |word, _| {
        padded.clear();
        padded.push(' ');
        padded.extend(word.chars());
        padded.push(' ');

        for n in range.lengths() {
            if padded.len() <= n {
                callback(NGram::from_chars(&padded));
                break;
            }
            for window in padded.windows(n) {
                callback(NGram::from_chars(window));
            }
        }
    });
}

#[inline(always)]
fn emit_windows<F>(chars: &[char], range: NgramRange, callback: &mut F)
where
    F: FnMut(NGram),
{
    for n in range.lengths() {
        if chars.len() < n {
            break;
        }
        for window in chars.windows(n) {
            callback(NGram::from_chars(window));
        }
    }
}

/// Counts sliding-window n-grams for a text of `char_len` characters without
/// allocating.
#[inline]
pub fn count_ngrams(char_len: usize, range: NgramRange) -> usize {
    range
        .lengths()
        .map(|n| (char_len + 1).saturating_sub(n))
        .sum()
}

/// Trait for types that can extract n-grams.
///
/// This allows different cutting strategies to feed the same vectorizer.
pub trait NgramExtractor {
    /// Extracts all n-grams from text.
    fn extract<F>(&self, text: &str, callback: F)
    where
        F: FnMut(NGram);
}

/// Sliding window over the whole text.
#[derive(Debug, Clone, Copy)]
pub struct SlidingWindowExtractor {
    /// Lengths to extract.
    pub range: NgramRange,
}

impl NgramExtractor for SlidingWindowExtractor {
    #[inline(always)]
    fn extract<F>(&self, text: &str, callback: F)
    where
        F: FnMut(NGram),
    {
        extract_ngrams(text, self.range, callback);
    }
}

/// Sliding window inside space-padded words.
#[derive(Debug, Clone, Copy)]
pub struct WordBoundedExtractor {
    /// Lengths to extract.
    pub range: NgramRange,
}

impl NgramExtractor for WordBoundedExtractor {
    #[inline(always)]
    fn extract<F>(&self, text: &str, callback: F)
    where
        F: FnMut(NGram),
    {
        extract_word_bounded_ngrams(text, self.range, callback);
    }
}

/// Runs the extractor selected by `analyzer`.
#[inline]
pub fn for_each_ngram<F>(analyzer: Analyzer, range: NgramRange, text: &str, callback: F)
where
    F: FnMut(NGram),
{
    match analyzer {
        Analyzer::Char => SlidingWindowExtractor { range }.extract(text, callback),
        Analyzer::CharWordBounded => WordBoundedExtractor { range }.extract(text, callback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grams(text: &str, min: usize, max: usize) -> Vec<String> {
        let mut out = Vec::new();
        extract_ngrams(text, NgramRange::new(min, max).unwrap(), |g| {
            out.push(g.to_string())
        });
        out
    }

    fn wb_grams(text: &str, min: usize, max: usize) -> Vec<String> {
        let mut out = Vec::new();
        extract_word_bounded_ngrams(text, NgramRange::new(min, max).unwrap(), |g| {
            out.push(g.to_string())
        });
        out
    }

    #[test]
    fn extract_trigrams_only() {
        assert_eq!(grams("hello", 3, 3), ["hel", "ell", "llo"]);
    }

    #[test]
    fn extract_default_range() {
        assert_eq!(
            grams("hi you", 1, 3),
            [
                "h", "i", " ", "y", "o", "u", //
                "hi", "i ", " y", "yo", "ou", //
                "hi ", "i y", " yo", "you",
            ]
        );
    }

    #[test]
    fn extract_short_text() {
        assert!(grams("", 1, 3).is_empty());
        assert_eq!(grams("a", 1, 3), ["a"]);
        assert_eq!(grams("ab", 1, 3), ["a", "b", "ab"]);
        assert!(grams("ab", 3, 3).is_empty());
    }

    #[test]
    fn windows_are_per_character_not_per_byte() {
        // "café" is 4 characters but 5 bytes.
        assert_eq!(grams("café", 3, 3), ["caf", "afé"]);
    }

    #[test]
    fn count_matches_extraction() {
        let range = NgramRange::default();
        for text in ["", "a", "ab", "abc", "hello world", "это тест"] {
            let mut n = 0usize;
            extract_ngrams(text, range, |_| n += 1);
            assert_eq!(count_ngrams(text.chars().count(), range), n, "text {text:?}");
        }
    }

    #[test]
    fn count_basic() {
        let tri = NgramRange::new(3, 3).unwrap();
        assert_eq!(count_ngrams(5, tri), 3);
        assert_eq!(count_ngrams(2, tri), 0);
        assert_eq!(count_ngrams(3, tri), 1);
        assert_eq!(count_ngrams(3, NgramRange::default()), 6);
    }

    #[test]
    fn word_bounded_pads_words() {
        assert_eq!(wb_grams("ab", 2, 2), [" a", "ab", "b "]);
        assert_eq!(
            wb_grams("hi yo", 1, 2),
            [
                " ", "h", "i", " ", " h", "hi", "i ", //
                " ", "y", "o", " ", " y", "yo", "o ",
            ]
        );
    }

    #[test]
    fn word_bounded_short_word_emitted_once() {
        // Padded "a" is " a " (3 chars): the 3-gram is the whole word.
        assert_eq!(wb_grams("a", 3, 3), [" a "]);
        // With range 2..=3 the 2-grams come first, then the whole word.
        assert_eq!(wb_grams("a", 2, 3), [" a", "a ", " a "]);
    }

    #[test]
    fn word_bounded_never_crosses_words() {
        let out = wb_grams("ab cd", 3, 3);
        assert!(!out.iter().any(|g| g.contains('b') && g.contains('c')));
    }

    #[test]
    fn word_bounded_empty() {
        assert!(wb_grams("", 1, 3).is_empty());
    }

    #[test]
    fn extractors_match_free_functions() {
        let range = NgramRange::default();
        let mut via_trait = Vec::new();
        SlidingWindowExtractor { range }.extract("test", |g| via_trait.push(g));
        let mut via_fn = Vec::new();
        extract_ngrams("test", range, |g| via_fn.push(g));
        assert_eq!(via_trait, via_fn);

        let mut via_dispatch = Vec::new();
        for_each_ngram(Analyzer::CharWordBounded, range, "test", |g| {
            via_dispatch.push(g)
        });
        let mut via_wb = Vec::new();
        WordBoundedExtractor { range }.extract("test", |g| via_wb.push(g));
        assert_eq!(via_dispatch, via_wb);
    }
}
