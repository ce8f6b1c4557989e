//! Report sink for rendered digests.
//!
//! Appends the digest text to a file (creating parent directories as
//! needed) or prints it to stdout. Formatting is entirely the digest's
//! concern; the sink only moves bytes.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

pub enum ReportSink {
    File(PathBuf),
    Stdout,
}

impl ReportSink {
    pub fn write(&self, report: &str) -> Result<()> {
        match self {
            ReportSink::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory {}", parent.display())
                    })?;
                }
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                file.write_all(report.as_bytes())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!(path = %path.display(), "Digest written");
                Ok(())
            }
            ReportSink::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(report.as_bytes())
                    .context("Failed to write digest to stdout")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "fireeye-digest-sink-{tag}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = temp_path("append");
        let path = dir.join("out").join("summary.txt");
        let sink = ReportSink::File(path.clone());

        sink.write("FireEye East\n").unwrap();
        sink.write("second run\n").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "FireEye East\nsecond run\n");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
