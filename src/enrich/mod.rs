//! Source-IP enrichment module
//!
//! Attribution lookups are a side-effecting external dependency, so they
//! sit behind a single-method trait that the pipeline and tests can stub.
//! Enrichment is strictly best-effort: any failure is recorded as the
//! `UNIDENTIFIED` sentinel in the rendered digest and never aborts a run.

mod ipinfo;

pub use ipinfo::IpinfoClient;

use crate::models::AlertRecord;
use thiserror::Error;
use tracing::debug;

/// Sentinel attribution text rendered when a lookup failed or was skipped.
pub const UNIDENTIFIED: &str = "UNIDENTIFIED";

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("not an IPv4 address: {0:?}")]
    InvalidIp(String),

    #[error("lookup request failed: {0}")]
    Request(String),

    #[error("no attribution data for {0}")]
    NoData(String),
}

/// Port for resolving a source IP to human-readable attribution text.
///
/// Called at most once per record, and only for a non-empty source IP.
/// Destination addresses are never enriched.
pub trait EnrichmentPort {
    fn lookup(&self, ip: &str) -> Result<String, EnrichError>;
}

/// Attribute one record's source IP, in place.
///
/// Skipped when the record has no non-empty source IP. A failed lookup
/// leaves `enrichment` unset so the renderer substitutes the
/// [`UNIDENTIFIED`] sentinel; it never aborts the run.
pub fn enrich_record(enricher: &dyn EnrichmentPort, record: &mut AlertRecord) {
    let Some(ip) = record.enrichable_source_ip().map(str::to_string) else {
        return;
    };
    match enricher.lookup(&ip) {
        Ok(text) => record.enrichment = Some(text),
        Err(err) => debug!(ip = %ip, error = %err, "Attribution lookup failed"),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Deterministic stub that always fails, for sentinel-path tests.
    pub struct FailingEnrichment;

    impl EnrichmentPort for FailingEnrichment {
        fn lookup(&self, ip: &str) -> Result<String, EnrichError> {
            Err(EnrichError::Request(format!("stubbed failure for {ip}")))
        }
    }

    /// Deterministic stub returning a fixed attribution string.
    pub struct FixedEnrichment(pub &'static str);

    impl EnrichmentPort for FixedEnrichment {
        fn lookup(&self, _ip: &str) -> Result<String, EnrichError> {
            Ok(self.0.to_string())
        }
    }
}
