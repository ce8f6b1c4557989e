//! Alert body parser module
//!
//! Front door for turning one raw notification body into an
//! [`AlertRecord`]. Most alerts are line-oriented and go through the
//! tokenizer and the order-sensitive field resolver; some arrive as a JSON
//! payload instead and are handled by a fallback that reads the known
//! field paths directly. Parsing is best-effort and total: any body,
//! however malformed, yields exactly one record.

mod resolver;
mod tokenizer;

pub use resolver::{resolve, AlertFieldResolver, ResolvedFields};
pub use tokenizer::FieldTokenizer;

use crate::models::{AlertRecord, RawMessage};
use serde_json::Value;
use tracing::debug;

/// Reusable front door over the line tokenizer and field resolver.
pub struct BodyParser {
    tokenizer: FieldTokenizer,
}

impl BodyParser {
    pub fn new() -> Self {
        Self {
            tokenizer: FieldTokenizer::new(),
        }
    }

    /// Extract the alert fields from one body.
    pub fn parse(&self, body: &str) -> ResolvedFields {
        if let Some(fields) = parse_json_alert(body) {
            debug!("Parsed alert body via JSON fallback");
            return fields;
        }
        resolve(&self.tokenizer.tokenize(body))
    }

    /// Parse a full message into a record, stamping it with the message's
    /// sent time and region.
    pub fn parse_message(&self, message: &RawMessage) -> AlertRecord {
        let fields = self.parse(&message.body);
        AlertRecord {
            signature: fields.signature,
            source_ip: fields.source_ip,
            destination_ip: fields.destination_ip,
            timestamp: message.sent_at,
            region: message.region.clone(),
            enrichment: None,
        }
    }
}

impl Default for BodyParser {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON-payload fallback. Engaged only when the body is valid JSON and
/// carries an `alert` key; anything else falls back to line tokenization.
fn parse_json_alert(body: &str) -> Option<ResolvedFields> {
    let value: Value = serde_json::from_str(body.trim()).ok()?;
    let alert = value.get("alert")?;
    // some payloads wrap the alert in a one-element array
    let alert = match alert.as_array() {
        Some(items) => items.first()?,
        None => alert,
    };

    Some(ResolvedFields {
        signature: json_string(alert, &["explanation", "ips-detected", "sig-name"]),
        source_ip: json_string(alert, &["src", "ip"]),
        destination_ip: json_string(alert, &["dst", "ip"]),
    })
}

fn json_string(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    current.as_str().map(|s| s.trim().to_string())
}
