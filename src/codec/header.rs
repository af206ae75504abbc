//! Codec index headers.
//!
//! Both `segments_N` and `.si` files open with the same envelope: a
//! big-endian magic, the codec name, a big-endian format version, the
//! 16-byte id of the object written, and a short suffix. Commit files
//! prefix the suffix with a single length byte; `.si` files write it as a
//! varint length-prefixed string.

use crate::codec::data_input::{DataInput, SegmentId};
use crate::error::{Result, ShardError};
use crate::util::hex;

/// Magic constant opening every codec header.
pub const CODEC_MAGIC: u32 = 0x3fd76c17;

/// A decoded codec index header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHeader {
    pub magic: u32,
    pub codec: String,
    pub version: i32,
    pub id: SegmentId,
    pub suffix: String,
}

/// How the header suffix is length-prefixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixFraming {
    /// A single length byte.
    LengthByte,
    /// A varint length, like any other string.
    Varint,
}

impl IndexHeader {
    /// Read a header without validating any of its fields.
    pub fn read(input: &mut DataInput, framing: SuffixFraming) -> Result<Self> {
        let magic = input.read_be_u32()?;
        Self::read_after_magic(input, magic, framing)
    }

    /// Read a header, failing with [`ShardError::BadMagic`] before anything
    /// past the magic is consumed.
    pub fn read_checked(input: &mut DataInput, framing: SuffixFraming) -> Result<Self> {
        let magic = input.read_be_u32()?;
        check_magic_value(magic)?;
        Self::read_after_magic(input, magic, framing)
    }

    fn read_after_magic(
        input: &mut DataInput,
        magic: u32,
        framing: SuffixFraming,
    ) -> Result<Self> {
        let codec = input.read_string()?;
        let version = input.read_be_i32()?;
        let id = input.read_id()?;
        let suffix = match framing {
            SuffixFraming::LengthByte => {
                let len = input.read_byte()? as usize;
                input.read_text(len)?
            }
            SuffixFraming::Varint => input.read_string()?,
        };

        Ok(IndexHeader {
            magic,
            codec,
            version,
            id,
            suffix,
        })
    }

    /// Fail with [`ShardError::BadMagic`] unless the magic is [`CODEC_MAGIC`].
    pub fn check_magic(&self) -> Result<()> {
        check_magic_value(self.magic)
    }

    /// Fail unless the codec name equals `expected`.
    pub fn check_codec(&self, file: &str, expected: &str) -> Result<()> {
        if self.codec != expected {
            return Err(ShardError::header_mismatch(
                file,
                "codec",
                expected,
                self.codec.as_str(),
            ));
        }
        Ok(())
    }

    /// Fail unless the id equals `expected`.
    pub fn check_id(&self, file: &str, expected: &SegmentId) -> Result<()> {
        if &self.id != expected {
            return Err(ShardError::header_mismatch(
                file,
                "id",
                hex::encode(expected),
                hex::encode(&self.id),
            ));
        }
        Ok(())
    }

    /// Fail unless the suffix equals `expected`.
    pub fn check_suffix(&self, file: &str, expected: &str) -> Result<()> {
        if self.suffix != expected {
            return Err(ShardError::header_mismatch(
                file,
                "suffix",
                expected,
                self.suffix.as_str(),
            ));
        }
        Ok(())
    }
}

fn check_magic_value(magic: u32) -> Result<()> {
    if magic != CODEC_MAGIC {
        return Err(ShardError::BadMagic {
            expected: CODEC_MAGIC,
            actual: magic,
        });
    }
    Ok(())
}
