//! Data models module
//!
//! Defines the core data structures: tokens produced by the field
//! tokenizer, raw messages handed over by the message store, and the
//! canonical `AlertRecord` consumed by the daily digest.

use chrono::{DateTime, Local};

/// Logical label of a recognized alert-body field.
///
/// `sig-name` and `sname` both normalize to [`TokenLabel::Signature`].
/// `src` is a positional marker that carries no value of its own; it only
/// re-labels the next `ip` field as the source address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLabel {
    Signature,
    SrcMarker,
    Ip,
}

/// One recognized `(label, value)` pair extracted from a body line.
///
/// Tokens are produced in source-line order; that order is the only signal
/// the resolver uses to tell source from destination addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub label: TokenLabel,
    pub value: String,
}

impl Token {
    pub fn new(label: TokenLabel, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// A raw alert notification as delivered by the message store.
#[derive(Debug, Clone)]
pub struct RawMessage {
    /// Full message body, scanned line by line.
    pub body: String,
    /// Sent timestamp of the message; becomes the record timestamp.
    pub sent_at: DateTime<Local>,
    /// Region tag of the folder the message was filed under.
    pub region: String,
}

/// The canonical parsed unit: one security alert.
///
/// Every field the parser could not find stays `None`; absence is
/// representable and never an error. A record is valid once constructed,
/// however incomplete, and renders with blank fields.
#[derive(Debug, Clone)]
pub struct AlertRecord {
    pub signature: Option<String>,
    pub source_ip: Option<String>,
    pub destination_ip: Option<String>,

    /// Taken from the message sent time, never parsed from the body.
    pub timestamp: DateTime<Local>,

    /// Supplied by caller context, never parsed from the body.
    pub region: String,

    /// Attribution text for the source IP, populated post-parse.
    /// `None` means the lookup failed or was skipped; the renderer
    /// substitutes the sentinel.
    pub enrichment: Option<String>,
}

impl AlertRecord {
    /// Returns the source IP if present and non-empty (the only case in
    /// which an enrichment lookup is worth performing).
    pub fn enrichable_source_ip(&self) -> Option<&str> {
        self.source_ip.as_deref().filter(|ip| !ip.is_empty())
    }
}
