//! Decoders for the Lucene index metadata files.
//!
//! - [`data_input`]: primitive reads over one file's bytes
//! - [`header`]: the codec header opening every file
//! - [`generation`]: picking the current `segments_N` commit point
//! - [`segment_info`]: per-segment `.si` metadata
//! - [`segment_infos`]: the `segments_N` commit point itself

pub mod data_input;
pub mod generation;
pub mod header;
pub mod segment_info;
pub mod segment_infos;

pub use data_input::{DataInput, ID_LENGTH, SegmentId, TextDecoding};
pub use generation::{CommitPoint, find_commit, resolve_commit};
pub use header::{CODEC_MAGIC, IndexHeader, SuffixFraming};
pub use segment_info::{SegmentInfo, Version, read_segment_info};
pub use segment_infos::{SegmentCommitInfo, SegmentInfos};
