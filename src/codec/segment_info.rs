//! Segment info (`.si`) decoding.
//!
//! Layout after the codec header:
//!
//! | field            | encoding                                  |
//! |------------------|-------------------------------------------|
//! | version          | 3 x int32, little-endian                  |
//! | has min version  | byte, `1` means present                   |
//! | min version      | 3 x int32, little-endian (if present)     |
//! | doc count        | int32, little-endian                      |
//! | compound file    | byte, `1` means true                      |
//! | diagnostics      | string map                                |
//! | files            | string set                                |
//! | attributes       | string map                                |
//!
//! Anything after the attributes (index sort, footer) is not read.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::codec::data_input::{DataInput, SegmentId};
use crate::codec::header::{IndexHeader, SuffixFraming};
use crate::config::InspectorConfig;
use crate::error::Result;
use crate::storage::Storage;

/// File extension of segment info files.
pub const SI_EXTENSION: &str = "si";

/// Codec name written in `.si` headers.
pub const SI_CODEC: &str = "Lucene90SegmentInfo";

/// An engine release, as written into segment metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: i32,
    pub minor: i32,
    pub bugfix: i32,
}

impl Version {
    pub fn new(major: i32, minor: i32, bugfix: i32) -> Self {
        Version {
            major,
            minor,
            bugfix,
        }
    }

    fn read(input: &mut DataInput) -> Result<Self> {
        let major = input.read_le_i32()?;
        let minor = input.read_le_i32()?;
        let bugfix = input.read_le_i32()?;
        Ok(Version::new(major, minor, bugfix))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.bugfix)
    }
}

/// Metadata for one segment, decoded from its `.si` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentInfo {
    pub name: String,
    pub id: SegmentId,
    pub version: Version,
    pub min_version: Option<Version>,
    /// Documents in the segment, soft-deleted ones included.
    pub doc_count: i32,
    pub is_compound_file: bool,
    pub diagnostics: BTreeMap<String, String>,
    pub files: Vec<String>,
    pub attributes: BTreeMap<String, String>,
}

/// Name of the `.si` file for a segment.
pub fn segment_info_file_name(segment: &str) -> String {
    format!("{segment}.{SI_EXTENSION}")
}

/// Decode the `.si` file of `segment`.
///
/// `id` is the segment id recorded in the commit file; it becomes the id of
/// the returned info and, under strict validation, must match the id in the
/// `.si` header.
pub fn read_segment_info(
    storage: &dyn Storage,
    segment: &str,
    id: &SegmentId,
    config: &InspectorConfig,
) -> Result<SegmentInfo> {
    let file_name = segment_info_file_name(segment);
    let mut input =
        DataInput::open(storage, &file_name)?.with_text_decoding(config.text_decoding());

    let header = if config.is_strict() {
        IndexHeader::read_checked(&mut input, SuffixFraming::Varint)?
    } else {
        IndexHeader::read(&mut input, SuffixFraming::Varint)?
    };
    if config.is_strict() {
        header.check_codec(&file_name, SI_CODEC)?;
        header.check_id(&file_name, id)?;
        header.check_suffix(&file_name, "")?;
    }

    let version = Version::read(&mut input)?;
    let min_version = match input.read_byte()? {
        1 => Some(Version::read(&mut input)?),
        _ => None,
    };
    let doc_count = input.read_le_i32()?;
    let is_compound_file = input.read_byte()? == 1;
    let diagnostics = input.read_string_map()?;
    let files = input.read_string_set()?;
    let attributes = input.read_string_map()?;

    debug!(
        "{file_name}: version {version}, {doc_count} docs, compound={is_compound_file}, {} files",
        files.len()
    );

    Ok(SegmentInfo {
        name: segment.to_string(),
        id: *id,
        version,
        min_version,
        doc_count,
        is_compound_file,
        diagnostics,
        files,
        attributes,
    })
}
