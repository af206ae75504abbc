//! # shardlens
//!
//! Structural inspection of on-disk Lucene index shards.
//!
//! shardlens reads a shard's commit point (`segments_N`) and the `.si` file
//! of every segment it references straight from their byte layout, and
//! produces a [`Report`](report::Report) with segment and document counts.
//! The engine itself is never involved.
//!
//! ## Features
//!
//! - Commit-point resolution by base-36 generation
//! - Bit-exact decoding of commit and segment-info metadata
//! - Lenient or strict header validation
//! - Directory walk to find the index root in an extracted archive
//!
//! ## Example
//!
//! ```no_run
//! use shardlens::config::InspectorConfig;
//!
//! let report = shardlens::inspect("/data/shard0/index", &InspectorConfig::default())?;
//! println!("{} docs in {} segments", report.total_docs, report.total_segments);
//! # Ok::<(), shardlens::error::ShardError>(())
//! ```

use std::path::Path;

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod locate;
pub mod report;
pub mod storage;
pub mod util;

use crate::config::InspectorConfig;
use crate::error::Result;
use crate::report::{Report, build_report};
use crate::storage::FileStorage;

pub mod prelude {
    pub use crate::config::{HeaderValidation, InspectorConfig};
    pub use crate::error::{Result, ShardError};
    pub use crate::report::{Report, SegmentCommitSummary};
    pub use crate::storage::{FileStorage, MemoryStorage, Storage};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a report for the index whose commit files sit directly in `dir`.
pub fn inspect<P: AsRef<Path>>(dir: P, config: &InspectorConfig) -> Result<Report> {
    let storage = FileStorage::new(dir)?;
    build_report(&storage, config)
}
