//! Field tokenizer
//!
//! Splits one alert body into an ordered sequence of `(label, value)`
//! tokens by matching recognized label prefixes line by line. Lines that
//! match nothing are skipped; they are never an error. Output preserves
//! line order exactly, because the resolver depends on it.

use crate::models::{Token, TokenLabel};
use regex::Regex;
use std::sync::LazyLock;

/// Signature-name field; `sig-name` and `sname` are equivalent
static SIGNATURE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:sig-name|sname)\s*:\s*(.*?)\s*$")
        .expect("SIGNATURE_REGEX pattern is valid")
});

/// Bare `src:` line; the marker carries no value of its own
static SRC_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*src\s*:\s*$").expect("SRC_MARKER_REGEX pattern is valid")
});

static IP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*ip\s*:\s*(.*?)\s*$").expect("IP_REGEX pattern is valid")
});

/// Line scanner for FireEye alert bodies.
///
/// The label is the first colon-delimited segment of the line
/// (case-insensitive, surrounding whitespace trimmed); the remainder,
/// trimmed, is the value. A `src:` line followed by text on the same line
/// matches no rule and is ignored, matching the historical parser.
pub struct FieldTokenizer;

impl FieldTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize one alert body. Total over any input; unrecognized lines
    /// simply produce no token.
    pub fn tokenize(&self, body: &str) -> Vec<Token> {
        body.lines()
            .filter_map(|line| self.tokenize_line(line))
            .collect()
    }

    fn tokenize_line(&self, line: &str) -> Option<Token> {
        if let Some(captures) = SIGNATURE_REGEX.captures(line) {
            return Some(Token::new(TokenLabel::Signature, &captures[1]));
        }
        if SRC_MARKER_REGEX.is_match(line) {
            return Some(Token::new(TokenLabel::SrcMarker, ""));
        }
        if let Some(captures) = IP_REGEX.captures(line) {
            return Some(Token::new(TokenLabel::Ip, &captures[1]));
        }
        None
    }
}

impl Default for FieldTokenizer {
    fn default() -> Self {
        Self::new()
    }
}
