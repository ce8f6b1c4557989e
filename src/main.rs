//! fireeye-digest: daily analyst digest from FireEye alert emails
//!
//! Reads unread alert notifications for a region, extracts the signature
//! and source/destination addresses, optionally attributes the source IP
//! via ipinfo.io, and appends a chronological per-day summary for analyst
//! handoff.

mod collector;
mod config;
mod digest;
mod enrich;
mod models;
mod parser;
mod sink;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use collector::{FsMessageStore, MessageStore};
use config::AppConfig;
use digest::DailyDigestAggregator;
use enrich::{enrich_record, EnrichmentPort, IpinfoClient};
use parser::BodyParser;
use sink::ReportSink;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(name = "fireeye-digest")]
#[command(about = "Generate a daily summary from FireEye alert emails", long_about = None)]
struct Cli {
    /// Region subfolder to read alerts from (e.g. East, West)
    #[arg(long, default_value = "East")]
    region: String,

    /// Override the message store root folder
    #[arg(long, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Output file path; "-" writes to stdout.
    /// Default: <output dir>/summary_YYYY-MM-DD.txt
    #[arg(long, value_name = "PATH")]
    output: Option<String>,

    /// Disable the source-IP attribution lookup
    #[arg(long)]
    no_enrich: bool,

    /// Override logging level (e.g., error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::new().context("Failed to load configuration")?;
    let _log_guard = init_logging(&cfg, cli.log_level.as_deref());

    run_digest(&cli, &cfg)
}

/// Initialize logging with a daily-rolled file layer plus an optional
/// console layer. The returned guard must stay alive for the whole run.
fn init_logging(
    cfg: &AppConfig,
    override_level: Option<&str>,
) -> tracing_appender::non_blocking::WorkerGuard {
    let level = override_level.unwrap_or(&cfg.logging.level).to_string();

    if let Err(err) = std::fs::create_dir_all(&cfg.logging.directory) {
        eprintln!(
            "Failed to create log directory {:?}: {}",
            cfg.logging.directory, err
        );
    }

    let file = rolling::daily(&cfg.logging.directory, &cfg.logging.filename);
    let (writer, guard) = tracing_appender::non_blocking(file);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .compact()
        .with_ansi(false)
        .with_target(true)
        .with_filter(EnvFilter::new(&level));

    let console_layer = if cfg.logging.console_output {
        Some(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_filter(EnvFilter::new(&level)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}

/// Tokenize, resolve, enrich, aggregate, render, write, mark read.
/// One message at a time; nothing in the parse path is fatal.
fn run_digest(cli: &Cli, cfg: &AppConfig) -> Result<()> {
    let root = cli
        .input
        .clone()
        .unwrap_or_else(|| cfg.input.directory.clone());
    let store = FsMessageStore::new(root);
    let messages = store.unread_messages(&cli.region)?;
    info!(region = %cli.region, count = messages.len(), "Processing unread alerts");

    let enricher = build_enricher(cli, cfg);
    let body_parser = BodyParser::new();
    let mut aggregator = DailyDigestAggregator::new(cli.region.clone());

    for stored in &messages {
        let mut record = body_parser.parse_message(&stored.message);
        if let Some(enricher) = enricher.as_deref() {
            enrich_record(enricher, &mut record);
        }
        aggregator.push(record);
    }

    let sink = resolve_sink(cli, cfg);
    sink.write(&aggregator.render())?;

    for stored in &messages {
        if let Err(err) = store.mark_read(stored) {
            warn!(id = %stored.id, error = %err, "Failed to mark message read");
        }
    }

    info!(records = aggregator.len(), "Digest run complete");
    Ok(())
}

fn build_enricher(cli: &Cli, cfg: &AppConfig) -> Option<Box<dyn EnrichmentPort>> {
    if cli.no_enrich || !cfg.enrichment.enabled {
        return None;
    }

    let token = if cfg.enrichment.token.trim().is_empty() {
        std::env::var("IPINFO_TOKEN").unwrap_or_default()
    } else {
        cfg.enrichment.token.clone()
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        warn!("No ipinfo token configured; source IPs will render UNIDENTIFIED");
        return None;
    }

    match IpinfoClient::new(token, Duration::from_secs(cfg.enrichment.timeout_secs)) {
        Ok(client) => Some(Box::new(client)),
        Err(err) => {
            warn!(error = %err, "Enrichment disabled: client init failed");
            None
        }
    }
}

fn resolve_sink(cli: &Cli, cfg: &AppConfig) -> ReportSink {
    match cli.output.as_deref() {
        Some("-") => ReportSink::Stdout,
        Some(path) => ReportSink::File(PathBuf::from(path)),
        None => ReportSink::File(cfg.output.directory.join(format!(
            "summary_{}.txt",
            Local::now().format("%Y-%m-%d")
        ))),
    }
}
