//! The on-disk working store.
//!
//! All session output lives under an explicit storage root passed in at
//! construction — nothing in the crate touches ambient relative paths. The
//! layout under the root:
//!
//! ```text
//! <root>/
//! ├── export/
//! │   ├── info.json                # the metadata collection (JSON array)
//! │   ├── images/<id>.<format>     # full-resolution saved copies
//! │   └── thumbnails/<id>.<format> # generated thumbnails
//! └── export.zip                   # produced by the packager
//! ```
//!
//! The collection file is rewritten in full after every save: read, append,
//! write. Incremental appends would be faster but the file is small, and a
//! complete rewrite keeps it valid JSON at every step.
//!
//! ## Lenient import
//!
//! [`Store::import_records`] deserializes record by record and skips entries
//! that fail, reporting the skip count in [`ImportOutcome`]. A half-damaged
//! collection still seeds choice lists from its intact records; only a file
//! that is not a JSON array at all is an error.

use crate::record::ImageRecord;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the storage root holding the working tree.
pub const EXPORT_DIR: &str = "export";
/// Subdirectory for full-resolution saved images.
pub const IMAGES_DIR: &str = "images";
/// Subdirectory for generated thumbnails.
pub const THUMBNAILS_DIR: &str = "thumbnails";
/// The metadata collection file.
pub const METADATA_FILE: &str = "info.json";
/// The archive produced by the packager.
pub const ARCHIVE_NAME: &str = "export.zip";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Metadata file is not a JSON array: {0}")]
    NotAnArray(PathBuf),
}

/// Result of a lenient metadata import.
#[derive(Debug)]
pub struct ImportOutcome {
    pub records: Vec<ImageRecord>,
    /// Entries that failed to deserialize and were skipped.
    pub skipped: usize,
}

/// Handle to the working tree under one storage root.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn export_dir(&self) -> PathBuf {
        self.root.join(EXPORT_DIR)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.export_dir().join(IMAGES_DIR)
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.export_dir().join(THUMBNAILS_DIR)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.export_dir().join(METADATA_FILE)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join(ARCHIVE_NAME)
    }

    /// Create the working skeleton (export/, images/, thumbnails/).
    ///
    /// Idempotent; existing content is left alone.
    pub fn ensure_layout(&self) -> Result<(), StoreError> {
        fs::create_dir_all(self.images_dir())?;
        fs::create_dir_all(self.thumbnails_dir())?;
        Ok(())
    }

    /// Load the collection strictly. A missing file is an empty collection.
    pub fn load_records(&self) -> Result<Vec<ImageRecord>, StoreError> {
        let path = self.metadata_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load a metadata file leniently, skipping malformed entries.
    pub fn import_records(path: &Path) -> Result<ImportOutcome, StoreError> {
        let content = fs::read_to_string(path)?;
        let raw: serde_json::Value = serde_json::from_str(&content)?;
        let entries = raw
            .as_array()
            .ok_or_else(|| StoreError::NotAnArray(path.to_path_buf()))?;

        let mut records = Vec::new();
        let mut skipped = 0;
        for entry in entries {
            match serde_json::from_value::<ImageRecord>(entry.clone()) {
                Ok(record) => records.push(record),
                Err(_) => skipped += 1,
            }
        }
        Ok(ImportOutcome { records, skipped })
    }

    /// Append one record and rewrite the collection file in full.
    ///
    /// Returns the new collection size.
    pub fn append_record(&self, record: ImageRecord) -> Result<usize, StoreError> {
        self.ensure_layout()?;
        let mut records = self.load_records()?;
        records.push(record);
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(self.metadata_path(), json)?;
        Ok(records.len())
    }
}
