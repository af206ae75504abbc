//! Shared utility modules used across shardlens components.

pub mod hex;
pub mod varint;
