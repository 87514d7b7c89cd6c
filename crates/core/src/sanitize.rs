//! Text cleanup for extracted documents and filesystem-safe book names.
//!
//! Handles Unicode normalization, line ending and whitespace normalization,
//! and stripping characters that can't appear in file or directory names.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse multiple whitespace characters into one.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\x{00A0}]+").unwrap());

/// Characters Windows and Bloom refuse in file and directory names.
static INVALID_FILENAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).unwrap());

/// Zero-width characters Word leaves behind.
const INVISIBLE_CHARS: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}', '\u{00AD}'];

/// Name used when nothing usable is left after sanitizing.
const FALLBACK_NAME: &str = "Untitled";

/// Make a book title usable as a file or directory name.
///
/// Invalid characters become spaces, whitespace is collapsed, and trailing
/// dots and spaces are trimmed.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced = INVALID_FILENAME_REGEX.replace_all(name, " ");
    let collapsed = WHITESPACE_COLLAPSE_REGEX.replace_all(&replaced, " ");
    let trimmed = collapsed.trim().trim_end_matches(['.', ' ']);

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Cleans text extracted from word-processor documents.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    /// Whether to preserve original line breaks.
    preserve_line_breaks: bool,
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCleaner {
    /// Create a cleaner that keeps line breaks.
    pub fn new() -> Self {
        Self {
            preserve_line_breaks: true,
        }
    }

    /// Set whether to preserve original line breaks.
    pub fn with_preserve_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }

    /// Clean a block of text.
    ///
    /// - NFC-normalizes so composed and decomposed accents compare equal
    /// - Removes zero-width characters and soft hyphens
    /// - Collapses whitespace runs to single spaces
    /// - Trims each line and drops empty leading/trailing lines
    pub fn clean(&self, text: &str) -> String {
        let normalized: String = text
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .nfc()
            .filter(|c| !INVISIBLE_CHARS.contains(c))
            .collect();

        if self.preserve_line_breaks {
            normalized
                .lines()
                .map(|line| WHITESPACE_COLLAPSE_REGEX.replace_all(line, " ").trim().to_string())
                .collect::<Vec<_>>()
                .join("\n")
                .trim_matches('\n')
                .to_string()
        } else {
            let single_line = normalized.replace('\n', " ");
            WHITESPACE_COLLAPSE_REGEX
                .replace_all(&single_line, " ")
                .trim()
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_titles() {
        assert_eq!(sanitize_file_name("ABC123 My Book"), "ABC123 My Book");
    }

    #[test]
    fn test_sanitize_replaces_invalid_chars() {
        assert_eq!(sanitize_file_name("Who? What/Where"), "Who What Where");
        assert_eq!(sanitize_file_name("A: \"B\""), "A B");
    }

    #[test]
    fn test_sanitize_trims_trailing_dots() {
        assert_eq!(sanitize_file_name("The End..."), "The End");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_file_name("???"), "Untitled");
        assert_eq!(sanitize_file_name(""), "Untitled");
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.clean("  In the   beginning\t God  "), "In the beginning God");
    }

    #[test]
    fn test_clean_preserves_line_breaks() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.clean("Line one\r\nLine two\n"), "Line one\nLine two");
    }

    #[test]
    fn test_clean_single_line() {
        let cleaner = TextCleaner::new().with_preserve_line_breaks(false);
        assert_eq!(cleaner.clean("Line one\nLine two"), "Line one Line two");
    }

    #[test]
    fn test_clean_composes_accents() {
        let cleaner = TextCleaner::new();
        // "e" + combining acute accent
        assert_eq!(cleaner.clean("Gene\u{0301}sis"), "Gen\u{00E9}sis");
    }

    #[test]
    fn test_clean_removes_invisible_chars() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.clean("\u{FEFF}Hello\u{200B} world"), "Hello world");
    }
}
