//! Error types for shardlens.
//!
//! Every failure the decoder can report is a variant of [`ShardError`].
//! Decoding is strict: the first failure aborts the file being read and no
//! partial result is returned.
//!
//! # Examples
//!
//! ```
//! use shardlens::error::{Result, ShardError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ShardError::malformed_length("string length -1"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for shardlens operations.
#[derive(Error, Debug)]
pub enum ShardError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Fewer bytes remained than a field requires.
    #[error("Truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// A variable-length integer ran past its maximum encoded length.
    #[error("Malformed varint: no terminating byte within {max_bytes} bytes")]
    MalformedVarint { max_bytes: usize },

    /// A length or count prefix declared an implausible size.
    #[error("Malformed length: {0}")]
    MalformedLength(String),

    /// A string field did not hold valid UTF-8 (strict validation only).
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// The commit file does not start with the codec magic.
    #[error("Bad magic: expected {expected:#010x}, found {actual:#010x}")]
    BadMagic { expected: u32, actual: u32 },

    /// No commit-point file was found in the directory.
    #[error("No commit found: {0}")]
    NoCommitFound(String),

    /// No directory containing a commit-point file was found.
    #[error("No index found: {0}")]
    NoIndexFound(String),

    /// A header field disagreed with its expected value (strict validation only).
    #[error("Header mismatch in {file}: {field} expected {expected:?}, found {actual:?}")]
    HeaderMismatch {
        file: String,
        field: &'static str,
        expected: String,
        actual: String,
    },

    /// Decoding a referenced segment failed.
    #[error("Segment {segment}: {source}")]
    Segment {
        segment: String,
        #[source]
        source: Box<ShardError>,
    },

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with ShardError.
pub type Result<T> = std::result::Result<T, ShardError>;

impl ShardError {
    /// Create a new truncation error.
    pub fn truncated(needed: usize, remaining: usize) -> Self {
        ShardError::Truncated { needed, remaining }
    }

    /// Create a new malformed length error.
    pub fn malformed_length<S: Into<String>>(msg: S) -> Self {
        ShardError::MalformedLength(msg.into())
    }

    /// Create a new invalid encoding error.
    pub fn invalid_encoding<S: Into<String>>(msg: S) -> Self {
        ShardError::InvalidEncoding(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        ShardError::Storage(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ShardError::Config(msg.into())
    }

    /// Create a new header mismatch error.
    pub fn header_mismatch<E: Into<String>, A: Into<String>>(
        file: &str,
        field: &'static str,
        expected: E,
        actual: A,
    ) -> Self {
        ShardError::HeaderMismatch {
            file: file.to_string(),
            field,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Attach the name of the segment whose decode failed.
    pub fn in_segment<S: Into<String>>(self, segment: S) -> Self {
        ShardError::Segment {
            segment: segment.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through segment wrappers.
    pub fn root_cause(&self) -> &ShardError {
        match self {
            ShardError::Segment { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
