//! ipinfo.io enrichment adapter
//!
//! Blocking HTTP client for the ipinfo.io details endpoint. Refuses to
//! call out for strings that are not IPv4 literals, and treats an
//! all-empty response as no data.

use super::{EnrichError, EnrichmentPort};
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::time::Duration;

const USER_AGENT: &str = concat!("fireeye-digest/", env!("CARGO_PKG_VERSION"));

/// The subset of the ipinfo response the digest cares about.
#[derive(Debug, Deserialize)]
struct IpinfoDetails {
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    org: String,
}

pub struct IpinfoClient {
    client: reqwest::blocking::Client,
    token: String,
    base_url: String,
}

impl IpinfoClient {
    pub fn new(token: String, timeout: Duration) -> Result<Self, EnrichError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| EnrichError::Request(format!("HTTP client init failed: {e}")))?;

        Ok(Self {
            client,
            token,
            base_url: "https://ipinfo.io".to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn fetch_details(&self, ip: &str) -> Result<IpinfoDetails, EnrichError> {
        let url = format!("{}/{}/json", self.base_url, ip);
        let response = self
            .client
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .send()
            .map_err(|e| EnrichError::Request(format!("lookup for {ip} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EnrichError::Request(format!(
                "lookup for {ip} returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<IpinfoDetails>()
            .map_err(|e| EnrichError::Request(format!("lookup for {ip} returned bad JSON: {e}")))
    }
}

impl EnrichmentPort for IpinfoClient {
    fn lookup(&self, ip: &str) -> Result<String, EnrichError> {
        // keeps us from calling ipinfo on blanks/garbage
        if ip.parse::<Ipv4Addr>().is_err() {
            return Err(EnrichError::InvalidIp(ip.to_string()));
        }

        let details = self.fetch_details(ip)?;
        format_attribution(&details).ok_or_else(|| EnrichError::NoData(ip.to_string()))
    }
}

/// `from <city>, <country> (<org>)`, or `None` when every field came back
/// empty and the answer would carry no information.
fn format_attribution(details: &IpinfoDetails) -> Option<String> {
    if details.city.is_empty() && details.country.is_empty() && details.org.is_empty() {
        return None;
    }
    Some(format!(
        "from {}, {} ({})",
        details.city, details.country, details.org
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> IpinfoClient {
        // unroutable base URL; tests below never hit the network
        IpinfoClient::new("test-token".to_string(), Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://127.0.0.1:1")
    }

    #[test]
    fn test_rejects_non_ipv4_input_without_network() {
        let err = client().lookup("not-an-ip").unwrap_err();
        assert!(matches!(err, EnrichError::InvalidIp(_)));
    }

    #[test]
    fn test_rejects_out_of_range_octets() {
        let err = client().lookup("999.1.1.1").unwrap_err();
        assert!(matches!(err, EnrichError::InvalidIp(_)));
    }

    #[test]
    fn test_rejects_empty_string() {
        let err = client().lookup("").unwrap_err();
        assert!(matches!(err, EnrichError::InvalidIp(_)));
    }

    #[test]
    fn test_attribution_formatting() {
        let details = IpinfoDetails {
            city: "Springfield".to_string(),
            country: "US".to_string(),
            org: "AS64496 Example Networks".to_string(),
        };
        assert_eq!(
            format_attribution(&details).unwrap(),
            "from Springfield, US (AS64496 Example Networks)"
        );
    }

    #[test]
    fn test_all_empty_details_are_no_data() {
        let details = IpinfoDetails {
            city: String::new(),
            country: String::new(),
            org: String::new(),
        };
        assert_eq!(format_attribution(&details), None);
    }

    #[test]
    fn test_partial_details_still_format() {
        let details = IpinfoDetails {
            city: String::new(),
            country: "NL".to_string(),
            org: String::new(),
        };
        assert_eq!(format_attribution(&details).unwrap(), "from , NL ()");
    }
}
