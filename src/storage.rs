//! Storage abstraction layer for shardlens.
//!
//! The decoder never touches the filesystem directly; it reads through a
//! [`Storage`] so that an extracted shard on disk and a set of in-memory
//! buffers are handled identically.
//!
//! # Storage Types
//!
//! ## FileStorage
//! - A directory on disk holding the unpacked shard files
//! - Each read opens, drains and closes its own file handle
//!
//! ## MemoryStorage
//! - In-memory files for tests and for callers that already hold the bytes
//!
//! # Example
//!
//! ```
//! use shardlens::storage::{MemoryStorage, Storage};
//!
//! let storage = MemoryStorage::new();
//! storage.put("segments_1", vec![0x3f, 0xd7, 0x6c, 0x17]);
//! assert!(storage.file_exists("segments_1"));
//! assert_eq!(storage.list_files().unwrap(), vec!["segments_1".to_string()]);
//! ```

use crate::error::{Result, ShardError};

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// A read-only view of the files making up one index directory.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// List the names of all regular files, sorted.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Read the complete contents of a file.
    ///
    /// Any handle opened for the read is released before returning, on both
    /// the success and the error path.
    fn read_file(&self, name: &str) -> Result<Vec<u8>>;

    /// Check if a file exists.
    fn file_exists(&self, name: &str) -> bool;

    /// A human-readable location, used as the report's index path.
    fn location(&self) -> String;
}

/// Error types specific to storage operations.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// File not found.
    FileNotFound(String),

    /// The storage root is not a directory.
    NotADirectory(String),

    /// I/O error.
    IoError(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::FileNotFound(name) => write!(f, "File not found: {name}"),
            StorageError::NotADirectory(path) => write!(f, "Not a directory: {path}"),
            StorageError::IoError(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ShardError {
    fn from(err: StorageError) -> Self {
        ShardError::storage(err.to_string())
    }
}
