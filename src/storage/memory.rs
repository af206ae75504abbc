//! In-memory storage implementation for testing and pre-extracted shards.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::error::Result;
use crate::storage::{Storage, StorageError};

/// An in-memory storage implementation.
///
/// Cloning shares the underlying files.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    /// The files stored in memory, keyed by name.
    files: Arc<RwLock<BTreeMap<String, Box<[u8]>>>>,
    /// Label reported as the index path.
    label: String,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::with_label("memory")
    }

    /// Create a new memory storage reporting `label` as its location.
    pub fn with_label<S: Into<String>>(label: S) -> Self {
        MemoryStorage {
            files: Arc::new(RwLock::new(BTreeMap::new())),
            label: label.into(),
        }
    }

    /// Insert or replace a file.
    pub fn put<S: Into<String>>(&self, name: S, data: Vec<u8>) {
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files.insert(name.into(), data.into_boxed_slice());
    }

    /// Get the number of files stored.
    pub fn file_count(&self) -> usize {
        self.files.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Storage for MemoryStorage {
    fn list_files(&self) -> Result<Vec<String>> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        Ok(files.keys().cloned().collect())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files
            .get(name)
            .map(|data| data.to_vec())
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()).into())
    }

    fn file_exists(&self, name: &str) -> bool {
        self.files
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(name)
    }

    fn location(&self) -> String {
        self.label.clone()
    }
}
