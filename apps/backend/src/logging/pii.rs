//! Redaction helpers so secrets never reach the logs.
//!
//! The sensitive values in this crate are group verification codes
//! (`XXX-XXX-XXX`) and their stored hex hashes. Raw database error text is
//! also routed through [`Redacted`] before logging, since constraint
//! messages can echo inserted values back.

use std::fmt;

use lazy_regex::{regex, Lazy};
use regex::Regex;

/// Verification code pattern: three dash-separated triplets from the
/// unambiguous code alphabet.
static CODE_REGEX: &Lazy<Regex> = regex!(r"\b[0-9A-HJKMNP-TV-Z]{3}-[0-9A-HJKMNP-TV-Z]{3}-[0-9A-HJKMNP-TV-Z]{3}\b");

/// Hex token pattern: hexadecimal runs of 16 or more characters (covers
/// blake3 verification hashes).
static HEX_TOKEN_REGEX: &Lazy<Regex> = regex!(r"\b[A-Fa-f0-9]{16,}\b");

/// Redacts sensitive information from a string.
///
/// Verification codes first, then hex tokens, to avoid double-processing.
pub fn redact(input: &str) -> String {
    let code_redacted = CODE_REGEX.replace_all(input, "[REDACTED_CODE]");
    HEX_TOKEN_REGEX
        .replace_all(&code_redacted, "[REDACTED_TOKEN]")
        .to_string()
}

/// A wrapper that automatically redacts sensitive strings when displayed.
pub struct Redacted<'a>(pub &'a str);

impl<'a> fmt::Display for Redacted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

impl<'a> fmt::Debug for Redacted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_redaction() {
        assert_eq!(
            redact("verification failed for ABC-DEF-GH1"),
            "verification failed for [REDACTED_CODE]"
        );
        // Lowercase strings are not codes
        assert_eq!(redact("abc-def-gh1"), "abc-def-gh1");
    }

    #[test]
    fn test_hex_token_redaction() {
        assert_eq!(
            redact("a1b2c3d4e5f678901234567890123456"),
            "[REDACTED_TOKEN]"
        );
        // Short hex runs are left untouched
        assert_eq!(redact("abc123def456"), "abc123def456");
    }

    #[test]
    fn test_mixed_content() {
        assert_eq!(
            redact("code ABC-DEF-GH1 hash a1b2c3d4e5f678901234567890123456"),
            "code [REDACTED_CODE] hash [REDACTED_TOKEN]"
        );
    }

    #[test]
    fn test_redacted_wrapper() {
        let redacted = Redacted("ABC-DEF-GH1");
        assert_eq!(format!("{redacted}"), "[REDACTED_CODE]");
        assert_eq!(format!("{redacted:?}"), "[REDACTED_CODE]");
    }

    #[test]
    fn test_no_sensitive_data() {
        assert_eq!(redact("Hello world"), "Hello world");
        assert_eq!(redact(""), "");
    }
}
