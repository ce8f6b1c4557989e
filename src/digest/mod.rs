//! Daily digest module
//!
//! Owns parsed alert records after enrichment, groups them by calendar
//! day, and renders the analyst handoff report. Rendering is pure and
//! idempotent; where the text ends up (file vs console) is the sink's
//! concern.

use crate::enrich::UNIDENTIFIED;
use crate::models::AlertRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Product label on the report header line.
pub const FORMAT_NAME: &str = "FireEye";

const RECORD_SEPARATOR: &str = "------------------------------------";

/// Collects alert records for one region and renders the per-day digest.
///
/// Records are kept in arrival order; the renderer partitions them by the
/// local calendar date of their timestamp, walks days ascending, and
/// sorts within each day by timestamp with a stable sort, so same-second
/// records keep their arrival order.
pub struct DailyDigestAggregator {
    region: String,
    records: Vec<AlertRecord>,
}

impl DailyDigestAggregator {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: AlertRecord) {
        self.records.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Render the full report. Missing optional fields render blank;
    /// a missing enrichment renders the sentinel. Never fails.
    pub fn render(&self) -> String {
        let mut days: BTreeMap<NaiveDate, Vec<&AlertRecord>> = BTreeMap::new();
        for record in &self.records {
            days.entry(record.timestamp.date_naive())
                .or_default()
                .push(record);
        }

        let mut out = String::new();
        let _ = writeln!(out, "{} {}", FORMAT_NAME, self.region);

        for records in days.values_mut() {
            records.sort_by_key(|r| r.timestamp);
            for record in records.iter().copied() {
                render_record(&mut out, record);
            }
        }
        out
    }
}

fn render_record(out: &mut String, record: &AlertRecord) {
    let _ = writeln!(
        out,
        "{}: {} - {}",
        record.timestamp.format("%H:%M:%S"),
        record.signature.as_deref().unwrap_or(""),
        record.destination_ip.as_deref().unwrap_or(""),
    );
    let _ = writeln!(
        out,
        "\t\tSource: {}",
        record.source_ip.as_deref().unwrap_or(""),
    );
    let _ = writeln!(
        out,
        "\t\t{}",
        record.enrichment.as_deref().unwrap_or(UNIDENTIFIED),
    );
    let _ = writeln!(out, "{}", RECORD_SEPARATOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn record(
        day: u32,
        time: (u32, u32, u32),
        signature: &str,
        source: Option<&str>,
        dest: Option<&str>,
    ) -> AlertRecord {
        AlertRecord {
            signature: Some(signature.to_string()),
            source_ip: source.map(str::to_string),
            destination_ip: dest.map(str::to_string),
            timestamp: Local
                .with_ymd_and_hms(2026, 2, day, time.0, time.1, time.2)
                .unwrap(),
            region: "East".to_string(),
            enrichment: None,
        }
    }

    #[test]
    fn test_header_line_carries_format_and_region() {
        let aggregator = DailyDigestAggregator::new("East");
        let report = aggregator.render();
        assert_eq!(report, "FireEye East\n");
    }

    #[test]
    fn test_record_block_format() {
        let mut aggregator = DailyDigestAggregator::new("East");
        let mut r = record(
            22,
            (18, 7, 3),
            "SQL Injection Attempt",
            Some("203.0.113.45"),
            Some("198.51.100.10"),
        );
        r.enrichment = Some("from Springfield, US (AS64496)".to_string());
        aggregator.push(r);

        let report = aggregator.render();
        assert_eq!(
            report,
            "FireEye East\n\
             18:07:03: SQL Injection Attempt - 198.51.100.10\n\
             \t\tSource: 203.0.113.45\n\
             \t\tfrom Springfield, US (AS64496)\n\
             ------------------------------------\n"
        );
    }

    #[test]
    fn test_missing_enrichment_renders_sentinel() {
        let mut aggregator = DailyDigestAggregator::new("East");
        aggregator.push(record(22, (9, 0, 0), "Beacon", Some("203.0.113.45"), None));
        let report = aggregator.render();
        assert!(report.contains("\t\tUNIDENTIFIED\n"));
    }

    #[test]
    fn test_missing_fields_render_blank() {
        let mut aggregator = DailyDigestAggregator::new("East");
        aggregator.push(AlertRecord {
            signature: None,
            source_ip: None,
            destination_ip: None,
            timestamp: Local.with_ymd_and_hms(2026, 2, 22, 7, 30, 0).unwrap(),
            region: "East".to_string(),
            enrichment: None,
        });
        let report = aggregator.render();
        assert!(report.contains("07:30:00:  - \n"));
        assert!(report.contains("\t\tSource: \n"));
    }

    #[test]
    fn test_same_day_records_sort_by_time() {
        let mut aggregator = DailyDigestAggregator::new("East");
        aggregator.push(record(22, (18, 7, 3), "Late", None, None));
        aggregator.push(record(22, (15, 41, 12), "Early", None, None));
        let report = aggregator.render();

        let late_at = report.find("18:07:03").unwrap();
        let early_at = report.find("15:41:12").unwrap();
        assert!(early_at < late_at);
    }

    #[test]
    fn test_timestamp_ties_keep_arrival_order() {
        let mut aggregator = DailyDigestAggregator::new("East");
        aggregator.push(record(22, (12, 0, 0), "FirstArrival", None, None));
        aggregator.push(record(22, (12, 0, 0), "SecondArrival", None, None));
        let report = aggregator.render();
        assert!(report.find("FirstArrival").unwrap() < report.find("SecondArrival").unwrap());
    }

    #[test]
    fn test_days_render_in_ascending_order() {
        let mut aggregator = DailyDigestAggregator::new("East");
        aggregator.push(record(23, (8, 0, 0), "DayTwo", None, None));
        aggregator.push(record(22, (20, 0, 0), "DayOne", None, None));
        let report = aggregator.render();
        assert!(report.find("DayOne").unwrap() < report.find("DayTwo").unwrap());
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut aggregator = DailyDigestAggregator::new("East");
        aggregator.push(record(22, (18, 7, 3), "B", Some("1.1.1.1"), Some("2.2.2.2")));
        aggregator.push(record(22, (15, 41, 12), "A", None, None));
        assert_eq!(aggregator.render(), aggregator.render());
    }

    #[test]
    fn test_len_and_is_empty() {
        let mut aggregator = DailyDigestAggregator::new("East");
        assert!(aggregator.is_empty());
        aggregator.push(record(22, (12, 0, 0), "X", None, None));
        assert_eq!(aggregator.len(), 1);
        assert!(!aggregator.is_empty());
    }
}
