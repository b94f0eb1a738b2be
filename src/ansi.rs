//! ANSI escape sequence table for terminal styles.
//!
//! Every style code is a single `u8`. This module maps each code to the
//! literal SGR escape sequence (`ESC [ <params> m`) that a terminal needs to
//! apply it. The table is dense: it has one slot per possible code, and the
//! slots that no style occupies hold the empty string.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// The escape sequence that resets all attributes and colors.
pub const RESET: &str = "\x1B[0m";

/// The prefix that opens an SGR escape sequence.
pub(crate) const CSI: &str = "\x1B[";

/// The byte that terminates an SGR escape sequence.
pub(crate) const SGR_END: char = 'm';

macro_rules! escape_table {
    ($($code:literal),+ $(,)?) => {{
        let mut table = [""; 256];
        $(
            table[$code] = concat!("\x1B[", $code, "m");
        )+
        table
    }};
}

static ESCAPES: [&str; 256] = escape_table![
    // attributes
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9,
    // foreground
    30, 31, 32, 33, 34, 35, 36, 37,
    90, 91, 92, 93, 94, 95, 96, 97,
    // background
    40, 41, 42, 43, 44, 45, 46, 47,
    100, 101, 102, 103, 104, 105, 106, 107,
];

/// Returns the escape sequence for the given style code.
///
/// Codes without a table entry return the empty string, which means "no
/// visual effect". This function never fails.
#[inline]
pub fn lookup(code: u8) -> &'static str {
    ESCAPES[usize::from(code)]
}

/// Returns the SGR parameters of the given style code, i.e., the escape
/// sequence without the leading `ESC[` and the trailing `m`.
///
/// Like [`lookup`], this returns the empty string for unpopulated codes.
#[inline]
pub fn params(code: u8) -> &'static str {
    sgr_params(lookup(code))
}

/// Strips the envelope off an SGR escape sequence.
pub(crate) fn sgr_params(escape: &str) -> &str {
    escape
        .strip_prefix(CSI)
        .and_then(|rest| rest.strip_suffix(SGR_END))
        .unwrap_or("")
}

static SGR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("\x1B\\[[0-9;]*m").expect("SGR pattern is a valid regex")
});

/// Removes every SGR escape sequence from the given text.
///
/// Text produced by wrapping a payload in any style of this crate strips back
/// to exactly that payload.
pub fn strip_escapes(text: &str) -> Cow<'_, str> {
    SGR_PATTERN.replace_all(text, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populated_codes() {
        let populated = (0u8..=9)
            .chain(30..=37)
            .chain(90..=97)
            .chain(40..=47)
            .chain(100..=107);
        let mut count = 0;
        for code in populated {
            assert_eq!(lookup(code), format!("\x1B[{code}m"));
            assert_eq!(params(code), code.to_string());
            count += 1;
        }
        assert_eq!(count, 42);
    }

    #[test]
    fn gaps_are_empty() {
        for code in [10u8, 29, 38, 39, 48, 89, 98, 99, 108, 255] {
            assert_eq!(lookup(code), "");
            assert_eq!(params(code), "");
        }
    }

    #[test]
    fn reset_is_code_zero() {
        assert_eq!(lookup(0), RESET);
        assert_eq!(RESET, "\x1b[0m");
    }

    #[test]
    fn strip() {
        assert_eq!(strip_escapes("\x1B[1;31mhi\x1B[0m there"), "hi there");
        assert_eq!(strip_escapes("plain"), "plain");
        assert!(matches!(strip_escapes("plain"), Cow::Borrowed(_)));
    }
}
