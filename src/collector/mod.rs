//! Message collector module
//!
//! Boundary to the store of raw alert notifications. The digest core
//! never selects or filters messages itself; the store decides what is
//! unread, and the pipeline asks it to mark messages processed once the
//! digest has been written.

use crate::models::RawMessage;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File-name prefix marking an already-processed message.
const READ_PREFIX: &str = "read.";

/// One message as held by a store, with the handle needed to mark it read.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    /// Store-local identifier (the file name for the filesystem store).
    pub id: String,
    pub message: RawMessage,
}

/// Supplier of raw alert notifications for one region.
pub trait MessageStore {
    /// All unread messages filed under the given region, oldest first.
    fn unread_messages(&self, region: &str) -> Result<Vec<StoredMessage>>;

    /// Mark one message processed so the next run skips it.
    fn mark_read(&self, message: &StoredMessage) -> Result<()>;
}

/// Filesystem-backed store: one message per file under `<root>/<region>/`.
///
/// The file's modified time stands in for the message sent time. Marking
/// a message read renames it with the `read.` prefix, the pipeline's
/// analogue of clearing an unread flag.
pub struct FsMessageStore {
    root: PathBuf,
}

impl FsMessageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn region_dir(&self, region: &str) -> PathBuf {
        self.root.join(region)
    }

    fn load_message(&self, path: &Path, region: &str) -> Result<RawMessage> {
        let body = fs::read_to_string(path)
            .with_context(|| format!("Failed to read message {}", path.display()))?;
        let modified = fs::metadata(path)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to stat message {}", path.display()))?;
        Ok(RawMessage {
            body,
            sent_at: DateTime::<Local>::from(modified),
            region: region.to_string(),
        })
    }
}

impl MessageStore for FsMessageStore {
    fn unread_messages(&self, region: &str) -> Result<Vec<StoredMessage>> {
        let dir = self.region_dir(region);
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to open message folder {}", dir.display()))?;

        let mut messages = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "Skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(READ_PREFIX) {
                continue;
            }
            match self.load_message(&path, region) {
                Ok(message) => messages.push(StoredMessage { id: name, message }),
                Err(err) => {
                    // one broken file never aborts the run
                    warn!(error = %err, "Skipping unreadable message");
                }
            }
        }

        messages.sort_by(|a, b| {
            a.message
                .sent_at
                .cmp(&b.message.sent_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        debug!(region = %region, count = messages.len(), "Collected unread messages");
        Ok(messages)
    }

    fn mark_read(&self, message: &StoredMessage) -> Result<()> {
        let dir = self.region_dir(&message.message.region);
        let from = dir.join(&message.id);
        let to = dir.join(format!("{READ_PREFIX}{}", message.id));
        fs::rename(&from, &to)
            .with_context(|| format!("Failed to mark message read: {}", from.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct TempRoot(PathBuf);

    impl TempRoot {
        fn new(tag: &str) -> Self {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos();
            let path = std::env::temp_dir().join(format!(
                "fireeye-digest-{tag}-{}-{nanos}",
                std::process::id()
            ));
            fs::create_dir_all(path.join("East")).unwrap();
            Self(path)
        }
    }

    impl Drop for TempRoot {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_unread_messages_skips_read_prefixed_files() {
        let root = TempRoot::new("unread");
        let east = root.0.join("East");
        fs::write(east.join("alert-1.txt"), "sig-name: A\n").unwrap();
        fs::write(east.join("read.alert-0.txt"), "sig-name: Old\n").unwrap();

        let store = FsMessageStore::new(&root.0);
        let messages = store.unread_messages("East").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "alert-1.txt");
        assert_eq!(messages[0].message.body, "sig-name: A\n");
        assert_eq!(messages[0].message.region, "East");
    }

    #[test]
    fn test_mark_read_renames_in_place() {
        let root = TempRoot::new("markread");
        let east = root.0.join("East");
        fs::write(east.join("alert-1.txt"), "body").unwrap();

        let store = FsMessageStore::new(&root.0);
        let messages = store.unread_messages("East").unwrap();
        store.mark_read(&messages[0]).unwrap();

        assert!(east.join("read.alert-1.txt").is_file());
        assert!(!east.join("alert-1.txt").exists());
        assert!(store.unread_messages("East").unwrap().is_empty());
    }

    #[test]
    fn test_missing_region_folder_is_an_error() {
        let root = TempRoot::new("missing");
        let store = FsMessageStore::new(&root.0);
        assert!(store.unread_messages("West").is_err());
    }
}
