//! Alert field resolver
//!
//! Walks a token sequence in order and assigns IP values to the source or
//! destination slot. The alert bodies do not tag which IP is which; the
//! role is implied by proximity: the first `ip` field after a `src` marker
//! is the source, every other `ip` field is the destination. A single
//! linear pass, no lookahead, total over any input sequence.

use crate::models::{Token, TokenLabel};

/// Resolver state: whether a `src` marker is waiting for its IP.
///
/// The marker's effect persists until an `ip` token consumes it or the
/// block ends; a second marker while one is already pending is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolverState {
    Idle,
    ExpectingSource,
}

/// Fields recovered from one alert block. All optional: "not parsed" and
/// "parsed as empty string" stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFields {
    pub signature: Option<String>,
    pub source_ip: Option<String>,
    pub destination_ip: Option<String>,
}

/// Order-sensitive state machine over one block's token sequence.
///
/// Filled slots are never overwritten: the first signature wins, the first
/// `ip` after a marker claims the source slot, the first remaining `ip`
/// claims the destination slot, and extra `ip` tokens are dropped.
pub struct AlertFieldResolver {
    state: ResolverState,
    fields: ResolvedFields,
}

impl AlertFieldResolver {
    pub fn new() -> Self {
        Self {
            state: ResolverState::Idle,
            fields: ResolvedFields::default(),
        }
    }

    /// Feed the next token in block order.
    pub fn push(&mut self, token: &Token) {
        match token.label {
            TokenLabel::Signature => {
                if self.fields.signature.is_none() {
                    self.fields.signature = Some(token.value.clone());
                }
            }
            TokenLabel::SrcMarker => {
                self.state = ResolverState::ExpectingSource;
            }
            TokenLabel::Ip => self.assign_ip(&token.value),
        }
    }

    fn assign_ip(&mut self, value: &str) {
        if self.state == ResolverState::ExpectingSource && self.fields.source_ip.is_none() {
            self.fields.source_ip = Some(value.to_string());
            self.state = ResolverState::Idle;
        } else if self.fields.destination_ip.is_none() {
            self.fields.destination_ip = Some(value.to_string());
        }
        // both slots filled: extra ip tokens are dropped
    }

    /// Consume the resolver at block end. Any still-pending marker simply
    /// leaves the source slot unset; state never leaks across blocks.
    pub fn finish(self) -> ResolvedFields {
        self.fields
    }
}

impl Default for AlertFieldResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve one block's token sequence into its fields.
pub fn resolve(tokens: &[Token]) -> ResolvedFields {
    let mut resolver = AlertFieldResolver::new();
    for token in tokens {
        resolver.push(token);
    }
    resolver.finish()
}
