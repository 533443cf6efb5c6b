//! Optional keyed storage of image metadata.
//!
//! The pipeline never reaches for a global connection. A store is built by
//! the caller and handed in; when none is given the step is skipped. Every
//! write is an upsert keyed by [`ImageInfo::id`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::info::ImageInfo;

const STORE_VERSION: u8 = 1;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported store version {0}")]
    UnsupportedVersion(u8),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A keyed collection of [`ImageInfo`] records.
pub trait ImageStore {
    /// Creates the record for `info.id`, or replaces the existing one.
    fn upsert(&mut self, info: &ImageInfo) -> Result<(), StoreError>;

    /// Looks up a record by id.
    fn get(&self, id: usize) -> Option<ImageInfo>;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store, mostly useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<usize, ImageInfo>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageStore for MemoryStore {
    fn upsert(&mut self, info: &ImageInfo) -> Result<(), StoreError> {
        self.records.insert(info.id, info.clone());
        Ok(())
    }

    fn get(&self, id: usize) -> Option<ImageInfo> {
        self.records.get(&id).cloned()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// On-disk layout of [`JsonFileStore`].
#[derive(Serialize, Deserialize)]
struct StoreFile {
    version: u8,
    images: Vec<ImageInfo>,
}

/// Store backed by a single JSON file, rewritten on every upsert.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: BTreeMap<usize, ImageInfo>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let mut records = BTreeMap::new();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let file: StoreFile = serde_json::from_str(&content)?;
            if file.version != STORE_VERSION {
                return Err(StoreError::UnsupportedVersion(file.version));
            }
            for info in file.images {
                records.insert(info.id, info);
            }
        }

        Ok(Self { path, records })
    }

    fn save(&self, records: &BTreeMap<usize, ImageInfo>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = StoreFile {
            version: STORE_VERSION,
            images: records.values().cloned().collect(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

impl ImageStore for JsonFileStore {
    fn upsert(&mut self, info: &ImageInfo) -> Result<(), StoreError> {
        // Only take the record once it is on disk
        let mut next = self.records.clone();
        next.insert(info.id, info.clone());
        self.save(&next)?;
        self.records = next;
        Ok(())
    }

    fn get(&self, id: usize) -> Option<ImageInfo> {
        self.records.get(&id).cloned()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
