//! Configuration module
//!
//! Provides structured configuration for the digest generator.
//! Configuration can be loaded from:
//! 1. Default values (hardcoded)
//! 2. config.toml file (optional)
//! 3. Environment variables with DIGEST__ prefix
//!
//! Example environment variable override:
//! DIGEST__LOGGING__LEVEL=debug
//! DIGEST__ENRICHMENT__TOKEN=xxxx

use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub enrichment: EnrichmentConfig,
    pub logging: LogConfig,
}

/// Message store configuration
#[derive(Debug, Deserialize)]
pub struct InputConfig {
    /// Root folder holding one subfolder of message files per region
    pub directory: PathBuf,
}

/// Digest output configuration
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

/// Source-IP attribution lookup configuration
#[derive(Debug, Deserialize)]
pub struct EnrichmentConfig {
    pub enabled: bool,
    /// ipinfo.io API token; empty means enrichment stays off
    pub token: String,
    pub timeout_secs: u64,
}

/// Operational logging configuration
#[derive(Debug, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub directory: PathBuf,
    pub filename: String,
    pub console_output: bool,
}

impl AppConfig {
    /// Load configuration from defaults, config.toml, and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            // --- Defaults ---
            .set_default("input.directory", "mail")?
            .set_default("output.directory", "out")?
            .set_default("enrichment.enabled", true)?
            .set_default("enrichment.token", "")?
            .set_default("enrichment.timeout_secs", 10)?
            .set_default("logging.level", "info")?
            .set_default("logging.directory", "logs")?
            .set_default("logging.filename", "fireeye-digest.log")?
            .set_default("logging.console_output", true)?
            // --- Sources ---
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("DIGEST").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputConfig {
                directory: PathBuf::from("mail"),
            },
            output: OutputConfig {
                directory: PathBuf::from("out"),
            },
            enrichment: EnrichmentConfig {
                enabled: true,
                token: String::new(),
                timeout_secs: 10,
            },
            logging: LogConfig {
                level: "info".to_string(),
                directory: PathBuf::from("logs"),
                filename: "fireeye-digest.log".to_string(),
                console_output: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_loads_defaults() {
        let cfg = AppConfig::new().unwrap();
        assert!(cfg.enrichment.enabled);
        assert_eq!(cfg.enrichment.timeout_secs, 10);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.console_output);
    }

    #[test]
    fn test_config_paths() {
        let cfg = AppConfig::new().unwrap();
        assert_eq!(cfg.input.directory, PathBuf::from("mail"));
        assert_eq!(cfg.output.directory, PathBuf::from("out"));
    }
}
