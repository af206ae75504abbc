//! Commit-point (`segments_N`) decoding.
//!
//! The commit file is read strictly in order; a failed field aborts the
//! whole decode, as does a failure decoding any referenced `.si` file.
//!
//! ```text
//! header        magic, "segments", format version, id, suffix
//! versions      4 bytes (writer major/minor/bugfix, created-with major)
//! info version  int64 big-endian
//! counter       vlong
//! count         int32 big-endian
//! min version   3 bytes (only when count > 0)
//! segments      count x segment record
//! user data     string map
//! ```
//!
//! Each segment record holds the segment name, id and codec, deletion and
//! update generations, the soft-delete count, an optional commit id (format
//! versions above 9), the field-infos file set and per-field doc-values
//! update file sets.

use std::collections::BTreeMap;

use log::debug;

use crate::codec::data_input::{DataInput, SegmentId};
use crate::codec::generation::{CommitPoint, to_base36};
use crate::codec::header::{IndexHeader, SuffixFraming};
use crate::codec::segment_info::{SegmentInfo, read_segment_info};
use crate::config::InspectorConfig;
use crate::error::{Result, ShardError};
use crate::storage::Storage;

/// Codec name written in commit headers.
pub const SEGMENTS_CODEC: &str = "segments";

/// Format versions above this carry a per-segment commit id.
pub const SCI_ID_FORMAT_THRESHOLD: i32 = 9;

/// Deletion generation meaning "no deletions file".
pub const NO_DELETIONS_GEN: i64 = -1;

/// One segment as referenced by a commit point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentCommitInfo {
    pub info: SegmentInfo,
    pub codec: String,
    pub del_gen: i64,
    pub del_count: i32,
    pub field_infos_gen: i64,
    pub dv_gen: i64,
    pub soft_del_count: i32,
    pub sci_id: Option<SegmentId>,
    pub field_infos_files: Vec<String>,
    /// Doc-values update files keyed by field number.
    pub dv_update_files: BTreeMap<i32, Vec<String>>,
}

impl SegmentCommitInfo {
    /// Check if a deletions file is layered over this segment.
    pub fn has_deletions(&self) -> bool {
        self.del_gen != NO_DELETIONS_GEN
    }
}

/// A decoded commit point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentInfos {
    pub commit: CommitPoint,
    pub format_version: i32,
    pub id: SegmentId,
    /// Version bytes: writer major, minor, bugfix, then created-with major.
    pub version_bytes: [u8; 4],
    pub info_version: i64,
    pub counter: u64,
    pub min_segment_version: Option<[u8; 3]>,
    pub segments: Vec<SegmentCommitInfo>,
    pub user_data: BTreeMap<String, String>,
}

impl SegmentInfos {
    /// Decode the commit point `commit` and every `.si` file it references.
    pub fn read_commit(
        storage: &dyn Storage,
        commit: &CommitPoint,
        config: &InspectorConfig,
    ) -> Result<Self> {
        let file_name = commit.file_name.as_str();
        let mut input =
            DataInput::open(storage, file_name)?.with_text_decoding(config.text_decoding());

        let header = IndexHeader::read_checked(&mut input, SuffixFraming::LengthByte)?;
        if config.is_strict() {
            header.check_codec(file_name, SEGMENTS_CODEC)?;
            header.check_suffix(file_name, &expected_suffix(commit.generation))?;
        }
        let format_version = header.version;
        debug!("{file_name}: format version {format_version}");

        let mut version_bytes = [0u8; 4];
        for byte in version_bytes.iter_mut() {
            *byte = input.read_byte()?;
        }

        let info_version = input.read_be_i64()?;
        let counter = input.read_vlong()?;

        let count = input.read_be_i32()?;
        if count < 0 {
            return Err(ShardError::malformed_length(format!(
                "segment count {count} in {file_name}"
            )));
        }
        debug!("{file_name}: {count} segments");

        let min_segment_version = if count > 0 {
            let mut v = [0u8; 3];
            for byte in v.iter_mut() {
                *byte = input.read_byte()?;
            }
            Some(v)
        } else {
            None
        };

        let mut segments = Vec::with_capacity((count as usize).min(input.remaining()));
        for _ in 0..count {
            segments.push(read_segment_record(
                &mut input,
                storage,
                format_version,
                config,
            )?);
        }

        let user_data = input.read_string_map()?;

        Ok(SegmentInfos {
            commit: commit.clone(),
            format_version,
            id: header.id,
            version_bytes,
            info_version,
            counter,
            min_segment_version,
            segments,
            user_data,
        })
    }
}

fn expected_suffix(generation: u64) -> String {
    to_base36(generation)
}

fn read_segment_record(
    input: &mut DataInput,
    storage: &dyn Storage,
    format_version: i32,
    config: &InspectorConfig,
) -> Result<SegmentCommitInfo> {
    let name = input.read_string()?;
    let id = input.read_id()?;
    let codec = input.read_string()?;
    debug!("segment {name}: codec {codec}");

    let info = read_segment_info(storage, &name, &id, config).map_err(|e| e.in_segment(&name))?;

    let del_gen = input.read_be_i64()?;
    let del_count = input.read_be_i32()?;
    let field_infos_gen = input.read_be_i64()?;
    let dv_gen = input.read_be_i64()?;
    let soft_del_count = input.read_be_i32()?;

    let sci_id = if format_version > SCI_ID_FORMAT_THRESHOLD {
        match input.read_byte()? {
            1 => Some(input.read_id()?),
            _ => None,
        }
    } else {
        None
    };

    let field_infos_files = input.read_string_set()?;

    let dv_fields = input.read_be_i32()?;
    if dv_fields < 0 {
        return Err(ShardError::malformed_length(format!(
            "doc values update count {dv_fields} for segment {name}"
        )));
    }
    let mut dv_update_files = BTreeMap::new();
    for _ in 0..dv_fields {
        let field = input.read_be_i32()?;
        let files = input.read_string_set()?;
        dv_update_files.insert(field, files);
    }

    Ok(SegmentCommitInfo {
        info,
        codec,
        del_gen,
        del_count,
        field_infos_gen,
        dv_gen,
        soft_del_count,
        sci_id,
        field_infos_files,
        dv_update_files,
    })
}
