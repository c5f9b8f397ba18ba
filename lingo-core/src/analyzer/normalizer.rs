//! Text normalization.
//!
//! Maps raw text to the canonical form every later stage sees: lowercase,
//! no digits, no punctuation or symbols, single spaces, trimmed ends.

use lingo_types::{NormalizerConfig, ScriptPolicy};

const D: u8 = 0; // drop
const L: u8 = 1; // letter
const S: u8 = 2; // whitespace

/// Classes for ASCII bytes. `\t \n \v \f \r`, the information separators
/// 0x1C-0x1F and space are whitespace.
#[rustfmt::skip]
const ASCII_CLASS: [u8; 128] = [
    D,D,D,D,D,D,D,D,D,S,S,S,S,S,D,D,
    D,D,D,D,D,D,D,D,D,D,D,D,S,S,S,S,
    S,D,D,D,D,D,D,D,D,D,D,D,D,D,D,D,
    D,D,D,D,D,D,D,D,D,D,D,D,D,D,D,D,
    D,L,L,L,L,L,L,L,L,L,L,L,L,L,L,L,
    L,L,L,L,L,L,L,L,L,L,L,D,D,D,D,D,
    D,L,L,L,L,L,L,L,L,L,L,L,L,L,L,L,
    L,L,L,L,L,L,L,L,L,L,L,D,D,D,D,D,
];

/// Normalizes text with the default configuration.
///
/// # Examples
///
/// ```
/// use lingo_core::analyzer::normalizer::normalize;
///
/// assert_eq!(normalize("Bonjour123!! le Monde"), "bonjour le monde");
/// ```
pub fn normalize(input: &str) -> String {
    TextNormalizer::default().normalize(input)
}

/// Deterministic text normalizer.
///
/// Performs the following operations:
/// - Converts all characters to lowercase (Unicode-aware)
/// - Removes digits
/// - Removes every character that is not a kept letter or whitespace; with
///   [`ScriptPolicy::Latin`] only `a`-`z` are kept
/// - Collapses whitespace runs into single spaces
/// - Removes leading/trailing whitespace
///
/// The output is a fixed point: normalizing it again returns it unchanged.
///
/// # Examples
///
/// ```
/// use lingo_core::analyzer::normalizer::TextNormalizer;
/// use lingo_types::NormalizerConfig;
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize("  Café  au LAIT 2x "), "caf au lait x");
///
/// let unicode = TextNormalizer::new(NormalizerConfig::unicode());
/// assert_eq!(unicode.normalize("Café, ПРИВЕТ!"), "café привет");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Creates a new normalizer with the specified configuration.
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[inline]
    pub const fn config(&self) -> NormalizerConfig {
        self.config
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Reuses the buffer's capacity if sufficient, growing only when necessary.
    /// Clears the buffer before writing.
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let script = self.config.script;
        let mut pending_space = false;

        for ch in input.chars() {
            if ch.is_ascii() {
                match ASCII_CLASS[ch as usize] {
                    L => push_letter(out, ch.to_ascii_lowercase(), &mut pending_space),
                    S => pending_space = true,
                    _ => {}
                }
                continue;
            }

            if ch.is_whitespace() {
                pending_space = true;
                continue;
            }

            for lowered in ch.to_lowercase() {
                if keeps(script, lowered) {
                    push_letter(out, lowered, &mut pending_space);
                }
            }
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

/// Writes a letter, emitting the pending separator only between letters so
/// runs collapse and both ends stay trimmed.
#[inline(always)]
fn push_letter(out: &mut String, c: char, pending_space: &mut bool) {
    if *pending_space {
        if !out.is_empty() {
            out.push(' ');
        }
        *pending_space = false;
    }
    out.push(c);
}

#[inline(always)]
fn keeps(script: ScriptPolicy, c: char) -> bool {
    match script {
        ScriptPolicy::Latin => c.is_ascii_lowercase(),
        ScriptPolicy::Unicode => c.is_alphabetic() && !c.is_numeric(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn norm(input: &str) -> String {
        TextNormalizer::default().normalize(input)
    }

    fn norm_unicode(input: &str) -> String {
        TextNormalizer::new(NormalizerConfig::unicode()).normalize(input)
    }

    #[test]
    fn documented_example() {
        assert_eq!(norm("Bonjour123!! le Monde"), "bonjour le monde");
    }

    #[test]
    fn ascii_basic_lowercase() {
        assert_eq!(norm("HELLO"), "hello");
        assert_eq!(norm("HeLlO"), "hello");
    }

    #[test]
    fn ascii_full_alphabet() {
        let upper: String = (b'A'..=b'Z').map(|b| b as char).collect();
        let lower: String = (b'a'..=b'z').map(|b| b as char).collect();
        assert_eq!(norm(&upper), lower);
    }

    #[test]
    fn digits_removed() {
        assert_eq!(norm("abc123def"), "abcdef");
        assert_eq!(norm("2024 was a year"), "was a year");
        assert_eq!(norm("١٢٣ abc"), "abc");
    }

    #[test]
    fn punctuation_removed() {
        assert_eq!(norm("foo-bar_baz"), "foobarbaz");
        assert_eq!(norm("Hello, how are you?"), "hello how are you");
        assert_eq!(norm("it's"), "its");
    }

    #[test]
    fn whitespace_collapse() {
        assert_eq!(norm("hello   world"), "hello world");
        assert_eq!(norm("hello\t\nworld"), "hello world");
        assert_eq!(norm("hello \r\n world"), "hello world");
        assert_eq!(norm("hello\u{00A0}\u{2003}world"), "hello world");
        assert_eq!(norm("hello\x1cworld"), "hello world");
    }

    #[test]
    fn removed_chars_between_spaces_leave_one_space() {
        assert_eq!(norm("a ! b"), "a b");
        assert_eq!(norm("a 42 b"), "a b");
    }

    #[test]
    fn leading_and_trailing_whitespace_removed() {
        assert_eq!(norm("   hello"), "hello");
        assert_eq!(norm("hello   "), "hello");
        assert_eq!(norm(" !hello! "), "hello");
    }

    #[test]
    fn only_whitespace() {
        assert_eq!(norm("   "), "");
        assert_eq!(norm("\n\t\r"), "");
    }

    #[test]
    fn empty_and_punctuation_only() {
        assert_eq!(norm(""), "");
        assert_eq!(norm("!!! ??? ..."), "");
        assert_eq!(norm("123 456"), "");
    }

    #[test]
    fn latin_policy_strips_accents_and_other_scripts() {
        assert_eq!(norm("café"), "caf");
        assert_eq!(norm("Müller"), "mller");
        assert_eq!(norm("Это тест"), "");
        assert_eq!(norm("هذا اختبار"), "");
        assert_eq!(norm("hello 你好 world"), "hello world");
    }

    #[test]
    fn lowercase_expansion_keeps_ascii_part() {
        // 'İ' lowercases to 'i' + U+0307; only the 'i' is a Latin letter.
        assert_eq!(norm("İstanbul"), "istanbul");
        // Kelvin sign lowercases to ASCII 'k'.
        assert_eq!(norm("\u{212A}elvin"), "kelvin");
    }

    #[test]
    fn unicode_policy_keeps_letters() {
        assert_eq!(norm_unicode("Это ТЕСТ!"), "это тест");
        assert_eq!(norm_unicode("Ceci est un système."), "ceci est un système");
        assert_eq!(norm_unicode("هذا 123 اختبار"), "هذا اختبار");
        assert_eq!(norm_unicode("ΆΈΉ"), "άέή");
    }

    #[test]
    fn unicode_policy_still_strips_digits_and_symbols() {
        assert_eq!(norm_unicode("abc ١٢٣ Ⅻ 🌍 !"), "abc");
    }

    #[test]
    fn normalize_into_reuses_capacity() {
        let normalizer = TextNormalizer::default();
        let mut buf = String::with_capacity(64);
        let cap = buf.capacity();

        normalizer.normalize_into("HELLO", &mut buf);
        assert_eq!(buf, "hello");
        assert_eq!(buf.capacity(), cap);

        normalizer.normalize_into("WORLD", &mut buf);
        assert_eq!(buf, "world");
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn buffer_grows_when_needed() {
        let normalizer = TextNormalizer::default();
        let mut buf = String::new();
        let long = "A".repeat(1024);
        normalizer.normalize_into(&long, &mut buf);
        assert_eq!(buf.len(), 1024);
        assert!(buf.capacity() >= 1024);
    }

    #[test]
    fn idempotent_samples() {
        let samples = [
            "hello world",
            "foo   bar",
            "ÜBER Café",
            "İİİ ßtraße",
            "Это тест системы определения языка.",
        ];
        for policy in [NormalizerConfig::default(), NormalizerConfig::unicode()] {
            let n = TextNormalizer::new(policy);
            for s in samples {
                let once = n.normalize(s);
                let twice = n.normalize(&once);
                assert_eq!(once, twice, "policy {:?}, input {:?}", policy, s);
            }
        }
    }

    #[test]
    fn free_function_matches_default() {
        let input = "Questo è un test del sistema.";
        assert_eq!(normalize(input), TextNormalizer::default().normalize(input));
    }

    proptest! {
        #[test]
        fn latin_output_alphabet(s in any::<String>()) {
            let out = norm(&s);
            prop_assert!(out.chars().all(|c| c == ' ' || c.is_ascii_lowercase()));
            prop_assert!(!out.starts_with(' ') && !out.ends_with(' '));
            prop_assert!(!out.contains("  "));
        }

        #[test]
        fn latin_idempotent(s in any::<String>()) {
            let once = norm(&s);
            prop_assert_eq!(norm(&once), once);
        }

        #[test]
        fn unicode_idempotent(s in "\\PC{0,64}") {
            let once = norm_unicode(&s);
            prop_assert_eq!(norm_unicode(&once), once);
        }
    }
}
