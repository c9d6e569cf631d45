//! Date/time normalization of OCR text
//!
//! Recognizes two layouts commonly printed on photos and receipts and
//! rewrites them into a compact sortable form:
//!
//! | Layout | Input                 | Output            |
//! |--------|-----------------------|-------------------|
//! | A      | `dd.mm.yy`            | `CCyymmdd`        |
//! | B      | `dd-mm-yyyy hh:mm:ss` | `yyyymmdd-hhmmss` |
//!
//! Matching is purely positional. Values are not checked against the
//! calendar, so a month of `13` passes through untouched.

use tracing::debug;

/// Century prepended to two-digit years unless configured otherwise
pub const DEFAULT_CENTURY: u8 = 20;

/// Date layouts recognized by [`DateNormalizer`], in matching order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLayout {
    /// `dd.mm.yy`
    ShortDotted,
    /// `dd-mm-yyyy hh:mm:ss`
    DashedDateTime,
}

impl DateLayout {
    /// Every layout, in the order they are tried
    pub const ALL: [DateLayout; 2] = [DateLayout::ShortDotted, DateLayout::DashedDateTime];

    /// Total length of the layout in bytes
    fn len(self) -> usize {
        match self {
            DateLayout::ShortDotted => 8,
            DateLayout::DashedDateTime => 19,
        }
    }

    /// Fixed separator characters and their positions
    fn literals(self) -> &'static [(usize, u8)] {
        match self {
            DateLayout::ShortDotted => &[(2, b'.'), (5, b'.')],
            DateLayout::DashedDateTime => &[(2, b'-'), (5, b'-'), (10, b' '), (13, b':'), (16, b':')],
        }
    }

    /// Digit runs as half-open byte ranges
    fn digit_runs(self) -> &'static [(usize, usize)] {
        match self {
            DateLayout::ShortDotted => &[(0, 2), (3, 5), (6, 8)],
            DateLayout::DashedDateTime => &[(0, 2), (3, 5), (6, 10), (11, 13), (14, 16), (17, 19)],
        }
    }

    /// Whether `text` has exactly this layout
    pub fn matches(self, text: &str) -> bool {
        let bytes = text.as_bytes();
        bytes.len() == self.len()
            && self.literals().iter().all(|&(pos, lit)| bytes[pos] == lit)
            && self
                .digit_runs()
                .iter()
                .all(|&(start, end)| bytes[start..end].iter().all(u8::is_ascii_digit))
    }
}

/// Rewrites recognized date layouts into canonical form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    century: u8,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_CENTURY)
    }
}

impl DateNormalizer {
    /// Create a normalizer that expands `yy` to `{century:02}yy`
    ///
    /// Centuries above 99 are capped at 99 to keep the year four digits.
    pub fn new(century: u8) -> Self {
        Self { century: century.min(99) }
    }

    /// Identify the layout of already-trimmed text
    pub fn detect(&self, text: &str) -> Option<DateLayout> {
        DateLayout::ALL.into_iter().find(|layout| layout.matches(text))
    }

    /// Normalize `text`, falling back to the trimmed input
    ///
    /// Never fails. Leading and trailing whitespace is removed before
    /// matching; inner whitespace of unrecognized text is kept as is.
    pub fn normalize(&self, text: &str) -> String {
        let text = text.trim_matches(is_surrounding_space);

        let Some(layout) = self.detect(text) else {
            debug!("No date layout matched {:?}", text);
            return text.to_string();
        };

        // Layouts are pure ASCII once matched, so byte slicing is safe
        let normalized = match layout {
            DateLayout::ShortDotted => {
                let (day, month, year) = (&text[0..2], &text[3..5], &text[6..8]);
                format!("{:02}{}{}{}", self.century, year, month, day)
            }
            DateLayout::DashedDateTime => {
                let (day, month, year) = (&text[0..2], &text[3..5], &text[6..10]);
                let (hour, minute, second) = (&text[11..13], &text[14..16], &text[17..19]);
                format!("{}{}{}-{}{}{}", year, month, day, hour, minute, second)
            }
        };

        debug!("Normalized {:?} ({:?}) to {:?}", text, layout, normalized);
        normalized
    }
}

/// Unicode whitespace plus the ASCII information separators
/// U+001C..=U+001F, which OCR output occasionally carries
fn is_surrounding_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        DateNormalizer::default().normalize(text)
    }

    #[test]
    fn test_short_dotted() {
        assert_eq!(normalize("26.10.24"), "20241026");
    }

    #[test]
    fn test_dashed_date_time() {
        assert_eq!(normalize("26-10-2024 14:30:05"), "20241026-143005");
    }

    #[test]
    fn test_unrecognized_text_passes_through() {
        assert_eq!(normalize("hello world"), "hello world");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_trims_before_matching() {
        assert_eq!(normalize("  26.10.24  "), "20241026");
        assert_eq!(normalize("26.10.24\n"), "20241026");
        assert_eq!(normalize("\t26-10-2024 14:30:05\r\n\x0c"), "20241026-143005");
    }

    #[test]
    fn test_trims_information_separators() {
        assert_eq!(normalize("\u{1c}26.10.24\u{1f}"), "20241026");
        assert_eq!(normalize("\u{1d}\u{1e} text \u{a0}"), "text");
        // Other control characters are content
        assert_eq!(normalize("\u{1b}26.10.24"), "\u{1b}26.10.24");
    }

    #[test]
    fn test_fallback_keeps_inner_whitespace() {
        assert_eq!(normalize("  26 . 10 . 24 "), "26 . 10 . 24");
        assert_eq!(normalize("line one\nline two\n"), "line one\nline two");
    }

    #[test]
    fn test_no_calendar_validation() {
        assert_eq!(normalize("99.13.00"), "20001399");
        assert_eq!(normalize("00-00-0000 99:99:99"), "00000000-999999");
    }

    #[test]
    fn test_near_misses() {
        // Wrong separators
        assert_eq!(normalize("26/10/24"), "26/10/24");
        assert_eq!(normalize("26-10-24"), "26-10-24");
        assert_eq!(normalize("26.10.2024 14:30:05"), "26.10.2024 14:30:05");
        assert_eq!(normalize("26-10-2024T14:30:05"), "26-10-2024T14:30:05");
        // Wrong lengths
        assert_eq!(normalize("6.10.24"), "6.10.24");
        assert_eq!(normalize("26.10.245"), "26.10.245");
        assert_eq!(normalize("26-10-2024 14:30"), "26-10-2024 14:30");
        // Letters where digits belong (typical OCR confusions)
        assert_eq!(normalize("2O.10.24"), "2O.10.24");
        assert_eq!(normalize("26-10-2024 l4:30:05"), "26-10-2024 l4:30:05");
        // Sign characters are not digits
        assert_eq!(normalize("+6.10.24"), "+6.10.24");
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        // Full-width digits have the right char count but are not ASCII
        let text = "２６.１０.２４";
        assert_eq!(normalize(text), text);
        assert_eq!(DateNormalizer::default().detect("é6.10.24"), None);
    }

    #[test]
    fn test_detect_layout() {
        let normalizer = DateNormalizer::default();
        assert_eq!(normalizer.detect("01.02.03"), Some(DateLayout::ShortDotted));
        assert_eq!(
            normalizer.detect("01-02-2003 04:05:06"),
            Some(DateLayout::DashedDateTime)
        );
        assert_eq!(normalizer.detect("20241026"), None);
    }

    #[test]
    fn test_configurable_century() {
        assert_eq!(DateNormalizer::new(19).normalize("31.12.99"), "19991231");
        assert_eq!(DateNormalizer::new(21).normalize("01.01.00"), "21000101");
        assert_eq!(DateNormalizer::new(5).normalize("01.01.00"), "05000101");
        assert_eq!(DateNormalizer::new(200), DateNormalizer::new(99));
        // Four-digit years are never touched by the century
        assert_eq!(
            DateNormalizer::new(19).normalize("26-10-2024 14:30:05"),
            "20241026-143005"
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "26.10.24",
            "  26.10.24  ",
            "26-10-2024 14:30:05",
            "hello world",
            " padded text \n",
            "",
            "99.99.99",
            "12-34-5678 90:12:34",
        ];
        for century in [0u8, 19, 20, 99] {
            let normalizer = DateNormalizer::new(century);
            for input in inputs {
                let once = normalizer.normalize(input);
                assert_eq!(normalizer.normalize(&once), once, "input {input:?}");
            }
        }
    }
}
