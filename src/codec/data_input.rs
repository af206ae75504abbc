//! Byte-level reads over one index file.
//!
//! [`DataInput`] owns the complete contents of a single file and hands out
//! the primitive encodings Lucene uses: big-endian fixed-width integers in
//! headers and commit records, little-endian integers inside `.si` bodies,
//! 7-bit varints, length-prefixed strings and string collections.
//!
//! Every read either consumes exactly the bytes of its field or fails
//! without advancing past the end of the buffer.

use std::collections::BTreeMap;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::warn;

use crate::error::{Result, ShardError};
use crate::storage::Storage;
use crate::util::varint;

/// Length of every Lucene unique id.
pub const ID_LENGTH: usize = 16;

/// A raw 16-byte unique id.
pub type SegmentId = [u8; ID_LENGTH];

/// How string bytes that are not valid UTF-8 are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDecoding {
    /// Replace invalid sequences and keep decoding.
    #[default]
    Lossy,
    /// Fail with [`ShardError::InvalidEncoding`].
    Strict,
}

/// A forward-only cursor over the bytes of one file.
#[derive(Debug, Clone)]
pub struct DataInput {
    name: String,
    bytes: Vec<u8>,
    position: usize,
    text: TextDecoding,
}

impl DataInput {
    /// Wrap an in-memory buffer. `name` is used in diagnostics only.
    pub fn new<S: Into<String>>(name: S, bytes: Vec<u8>) -> Self {
        DataInput {
            name: name.into(),
            bytes,
            position: 0,
            text: TextDecoding::default(),
        }
    }

    /// Read a whole file from storage into a new cursor.
    pub fn open(storage: &dyn Storage, name: &str) -> Result<Self> {
        let bytes = storage.read_file(name)?;
        Ok(Self::new(name, bytes))
    }

    /// Set how invalid UTF-8 in string fields is treated.
    pub fn with_text_decoding(mut self, text: TextDecoding) -> Self {
        self.text = text;
        self
    }

    /// The file name this cursor reads.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Check if every byte has been consumed.
    pub fn is_eof(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize) -> Result<&[u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(ShardError::truncated(len, remaining));
        }
        let start = self.position;
        self.position += len;
        Ok(&self.bytes[start..self.position])
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read exactly `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        Ok(self.take(len)?.to_vec())
    }

    /// Consume and discard `len` bytes.
    pub fn skip_bytes(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    /// Read a 16-byte unique id.
    pub fn read_id(&mut self) -> Result<SegmentId> {
        let mut id = [0u8; ID_LENGTH];
        id.copy_from_slice(self.take(ID_LENGTH)?);
        Ok(id)
    }

    /// Read a big-endian u32.
    pub fn read_be_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    /// Read a big-endian i32.
    pub fn read_be_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    /// Read a big-endian i64.
    pub fn read_be_i64(&mut self) -> Result<i64> {
        Ok(BigEndian::read_i64(self.take(8)?))
    }

    /// Read a little-endian i32.
    pub fn read_le_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    /// Read a 32-bit varint (at most 5 bytes).
    pub fn read_vint(&mut self) -> Result<u32> {
        let (value, read) = varint::decode_u32(&self.bytes[self.position..])?;
        self.position += read;
        Ok(value)
    }

    /// Read a 64-bit varint (at most 10 bytes).
    pub fn read_vlong(&mut self) -> Result<u64> {
        let (value, read) = varint::decode_u64(&self.bytes[self.position..])?;
        self.position += read;
        Ok(value)
    }

    /// Read a varint length prefix, rejecting values that are negative once
    /// reinterpreted as a signed 32-bit int.
    fn read_length(&mut self, what: &str) -> Result<usize> {
        let raw = self.read_vint()?;
        if raw > i32::MAX as u32 {
            return Err(ShardError::malformed_length(format!(
                "{what} {} in {}",
                raw as i32, self.name
            )));
        }
        Ok(raw as usize)
    }

    /// Read a collection size; each item needs at least `min_item_bytes`,
    /// so a size the remaining bytes cannot hold is rejected up front.
    fn read_count(&mut self, what: &str, min_item_bytes: usize) -> Result<usize> {
        let count = self.read_length(what)?;
        let remaining = self.remaining();
        if count.saturating_mul(min_item_bytes) > remaining {
            return Err(ShardError::malformed_length(format!(
                "{what} {count} exceeds {remaining} remaining bytes in {}",
                self.name
            )));
        }
        Ok(count)
    }

    /// Read a varint length-prefixed string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_length("string length")?;
        self.read_text(len)
    }

    /// Read a string of `len` bytes with no length prefix.
    pub fn read_text(&mut self, len: usize) -> Result<String> {
        let start = self.position;
        self.take(len)?;
        let bytes = &self.bytes[start..self.position];
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(e) if self.text == TextDecoding::Strict => Err(ShardError::invalid_encoding(
                format!("{e} in {}", self.name),
            )),
            Err(_) => {
                warn!("invalid UTF-8 in {}, replacing undecodable bytes", self.name);
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }

    /// Read a varint count followed by that many strings, in file order.
    pub fn read_string_set(&mut self) -> Result<Vec<String>> {
        let count = self.read_count("string set size", 1)?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.read_string()?);
        }
        Ok(values)
    }

    /// Read a varint count followed by that many key/value string pairs.
    ///
    /// A repeated key keeps the last value read.
    pub fn read_string_map(&mut self) -> Result<BTreeMap<String, String>> {
        let count = self.read_count("string map size", 2)?;
        let mut map = BTreeMap::new();
        for _ in 0..count {
            let key = self.read_string()?;
            let value = self.read_string()?;
            map.insert(key, value);
        }
        Ok(map)
    }
}
