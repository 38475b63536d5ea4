//! File-backed storage
//!
//! All items live in a single JSON document. Every mutation re-reads the
//! document, applies the change and writes it back with the atomic
//! temp-file-then-rename pattern, so the file on disk is always either the
//! old or the new document.

use crate::error::{Result, StorageError};
use crate::Storage;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Current on-disk schema version.
const SCHEMA_VERSION: u32 = 1;

/// Storage document schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    schema_version: u32,
    #[serde(default)]
    items: BTreeMap<String, String>,
}

/// Returns the default storage file location
///
/// Uses XDG data directory conventions:
/// - macOS: `~/Library/Application Support/buildtrack/local_storage.json`
/// - Linux: `~/.local/share/buildtrack/local_storage.json` (or `$XDG_DATA_HOME/buildtrack/local_storage.json`)
///
/// Returns `None` if no data directory can be determined.
pub fn default_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join("buildtrack").join("local_storage.json"));
        }
    }
    dirs::data_dir().map(|d| d.join("buildtrack").join("local_storage.json"))
}

/// Key/value storage persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates a storage handle for `path`. The file is created lazily on
    /// the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document.
    ///
    /// Returns an empty document if the file doesn't exist yet (first run).
    fn read_document(&self) -> Result<Document> {
        if !self.path.exists() {
            return Ok(Document {
                schema_version: SCHEMA_VERSION,
                items: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(&self.path).map_err(|e| StorageError::Read {
            path: self.path.clone(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Document {
                schema_version: SCHEMA_VERSION,
                items: BTreeMap::new(),
            });
        }

        let doc: Document = serde_json::from_str(&content).map_err(|e| StorageError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        if doc.schema_version > SCHEMA_VERSION {
            log::warn!(
                "storage file {} has newer schema version {} (supported: {})",
                self.path.display(),
                doc.schema_version,
                SCHEMA_VERSION
            );
        }

        Ok(doc)
    }

    /// Write the document atomically
    ///
    /// 1. Write to temp file with timestamp suffix
    /// 2. Fsync to disk
    /// 3. Rename temp to original
    ///
    /// On failure before rename, the temp file is preserved as a safety copy.
    fn write_document(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::Write {
                    path: self.path.clone(),
                    message: format!("Failed to create directory: {}", e),
                })?;
            }
        }

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "local_storage.json".to_string());
        let timestamp = Local::now().format("%Y%m%d-%H%M%S%.3f").to_string();
        let temp_path = self
            .path
            .with_file_name(format!("{}.tmp.{}", file_name, timestamp));

        let json = serde_json::to_string_pretty(doc).map_err(|e| StorageError::Write {
            path: self.path.clone(),
            message: format!("Failed to serialize: {}", e),
        })?;

        fs::write(&temp_path, json).map_err(|e| StorageError::Write {
            path: self.path.clone(),
            message: format!("Failed to write temp file: {}", e),
        })?;

        let file = fs::File::open(&temp_path).map_err(|e| StorageError::Write {
            path: self.path.clone(),
            message: format!("Failed to open temp file for fsync: {}", e),
        })?;
        file.sync_all().map_err(|e| StorageError::Write {
            path: self.path.clone(),
            message: format!("Failed to fsync: {}", e),
        })?;

        fs::rename(&temp_path, &self.path).map_err(|_| StorageError::WriteAtomic {
            path: self.path.clone(),
            temp_path: temp_path.clone(),
        })?;

        log::debug!("wrote {} item(s) to {}", doc.items.len(), self.path.display());
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_document()?.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let mut doc = self.read_document()?;
        doc.schema_version = SCHEMA_VERSION;
        doc.items.insert(key.to_string(), value.to_string());
        self.write_document(&doc)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let mut doc = self.read_document()?;
        if doc.items.remove(key).is_none() {
            return Ok(());
        }
        self.write_document(&doc)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.read_document()?.items.into_keys().collect())
    }
}
