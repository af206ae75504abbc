//! Synthetic shard writer shared by the integration tests.
//!
//! Emits byte-exact `segments_N` and `.si` files for a described commit.

#![allow(dead_code)]

use std::path::Path;

use shardlens::codec::CODEC_MAGIC;
use shardlens::codec::generation::{segments_file_name, to_base36};
use shardlens::storage::MemoryStorage;
use shardlens::util::varint::encode_u32;

pub struct SegmentFixture {
    pub name: String,
    pub id: [u8; 16],
    pub codec: String,
    pub version: (i32, i32, i32),
    pub min_version: Option<(i32, i32, i32)>,
    pub max_doc: i32,
    pub compound: bool,
    pub del_gen: i64,
    pub del_count: i32,
    pub field_infos_gen: i64,
    pub dv_gen: i64,
    pub soft_del_count: i32,
    pub sci_id: Option<[u8; 16]>,
    pub diagnostics: Vec<(String, String)>,
    pub suffix: String,
}

impl SegmentFixture {
    pub fn new(name: &str, max_doc: i32) -> Self {
        let mut id = [0u8; 16];
        for (i, byte) in id.iter_mut().enumerate() {
            *byte = name.len() as u8 * 16 + i as u8;
        }
        id[15] = name.bytes().last().unwrap_or(0);

        SegmentFixture {
            name: name.to_string(),
            id,
            codec: "Lucene912".to_string(),
            version: (9, 12, 0),
            min_version: Some((9, 12, 0)),
            max_doc,
            compound: false,
            del_gen: -1,
            del_count: 0,
            field_infos_gen: -1,
            dv_gen: -1,
            soft_del_count: 0,
            sci_id: None,
            diagnostics: vec![("source".to_string(), "flush".to_string())],
            suffix: String::new(),
        }
    }

    pub fn deletes(mut self, del_count: i32, soft_del_count: i32) -> Self {
        self.del_gen = 1;
        self.del_count = del_count;
        self.soft_del_count = soft_del_count;
        self
    }

    pub fn compound(mut self) -> Self {
        self.compound = true;
        self
    }

    pub fn sci_id(mut self, id: [u8; 16]) -> Self {
        self.sci_id = Some(id);
        self
    }

    /// Write a non-empty `.si` header suffix.
    pub fn si_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    pub fn file_name(&self) -> String {
        format!("{}.si", self.name)
    }
}

pub struct CommitFixture {
    pub generation: u64,
    pub format_version: i32,
    pub id: [u8; 16],
    pub suffix: Option<String>,
    pub segments: Vec<SegmentFixture>,
    pub user_data: Vec<(String, String)>,
}

impl CommitFixture {
    pub fn new(generation: u64) -> Self {
        CommitFixture {
            generation,
            format_version: 10,
            id: [0xc0; 16],
            suffix: None,
            segments: Vec::new(),
            user_data: Vec::new(),
        }
    }

    pub fn format(mut self, format_version: i32) -> Self {
        self.format_version = format_version;
        self
    }

    pub fn segment(mut self, segment: SegmentFixture) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn user_data(mut self, key: &str, value: &str) -> Self {
        self.user_data.push((key.to_string(), value.to_string()));
        self
    }

    /// Override the header suffix, which otherwise matches the generation.
    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }

    pub fn file_name(&self) -> String {
        segments_file_name(self.generation)
    }

    /// Encode the commit file.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let suffix = match &self.suffix {
            Some(suffix) => suffix.clone(),
            None => to_base36(self.generation),
        };
        put_header(&mut out, "segments", self.format_version, &self.id);
        // commit suffixes carry a single length byte
        out.push(suffix.len() as u8);
        out.extend_from_slice(suffix.as_bytes());

        out.extend_from_slice(&[9, 12, 0, 9]);
        out.extend_from_slice(&42i64.to_be_bytes());
        out.extend(encode_u32(self.segments.len() as u32));
        out.extend_from_slice(&(self.segments.len() as i32).to_be_bytes());
        if !self.segments.is_empty() {
            out.extend_from_slice(&[9, 12, 0]);
        }

        for segment in &self.segments {
            put_string(&mut out, &segment.name);
            out.extend_from_slice(&segment.id);
            put_string(&mut out, &segment.codec);
            out.extend_from_slice(&segment.del_gen.to_be_bytes());
            out.extend_from_slice(&segment.del_count.to_be_bytes());
            out.extend_from_slice(&segment.field_infos_gen.to_be_bytes());
            out.extend_from_slice(&segment.dv_gen.to_be_bytes());
            out.extend_from_slice(&segment.soft_del_count.to_be_bytes());
            if self.format_version > 9 {
                match &segment.sci_id {
                    Some(id) => {
                        out.push(1);
                        out.extend_from_slice(id);
                    }
                    None => out.push(0),
                }
            }
            // field infos files
            out.extend(encode_u32(0));
            // doc values updates
            out.extend_from_slice(&0i32.to_be_bytes());
        }

        put_map(&mut out, &self.user_data);
        out
    }

    /// Write the commit file and every segment's `.si` file into `dir`.
    pub fn write_to(&self, dir: &Path) {
        std::fs::write(dir.join(self.file_name()), self.to_bytes()).unwrap();
        for segment in &self.segments {
            std::fs::write(dir.join(segment.file_name()), si_bytes(segment)).unwrap();
        }
    }

    /// Put the commit file and every `.si` file into an in-memory store.
    pub fn to_storage(&self) -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.put(self.file_name(), self.to_bytes());
        for segment in &self.segments {
            storage.put(segment.file_name(), si_bytes(segment));
        }
        storage
    }
}

/// Encode one segment's `.si` file.
pub fn si_bytes(segment: &SegmentFixture) -> Vec<u8> {
    let mut out = Vec::new();
    put_header(&mut out, "Lucene90SegmentInfo", 0, &segment.id);
    put_string(&mut out, &segment.suffix);

    put_version(&mut out, segment.version);
    match segment.min_version {
        Some(v) => {
            out.push(1);
            put_version(&mut out, v);
        }
        None => out.push(0),
    }
    out.extend_from_slice(&segment.max_doc.to_le_bytes());
    out.push(u8::from(segment.compound));
    put_map(&mut out, &segment.diagnostics);

    let files = if segment.compound {
        vec![format!("{}.cfs", segment.name), format!("{}.cfe", segment.name)]
    } else {
        vec![format!("{}.fdt", segment.name), segment.file_name()]
    };
    out.extend(encode_u32(files.len() as u32));
    for file in &files {
        put_string(&mut out, file);
    }

    // attributes
    out.extend(encode_u32(0));
    out
}

fn put_header(out: &mut Vec<u8>, codec: &str, version: i32, id: &[u8; 16]) {
    out.extend_from_slice(&CODEC_MAGIC.to_be_bytes());
    put_string(out, codec);
    out.extend_from_slice(&version.to_be_bytes());
    out.extend_from_slice(id);
}

fn put_version(out: &mut Vec<u8>, (major, minor, bugfix): (i32, i32, i32)) {
    for part in [major, minor, bugfix] {
        out.extend_from_slice(&part.to_le_bytes());
    }
}

fn put_string(out: &mut Vec<u8>, s: &str) {
    out.extend(encode_u32(s.len() as u32));
    out.extend_from_slice(s.as_bytes());
}

fn put_map(out: &mut Vec<u8>, entries: &[(String, String)]) {
    out.extend(encode_u32(entries.len() as u32));
    for (key, value) in entries {
        put_string(out, key);
        put_string(out, value);
    }
}

