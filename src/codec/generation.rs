//! Commit-point file names and generations.
//!
//! A commit point is written as `segments_<gen>` where `<gen>` is the
//! generation in base 36. The pre-generation name `segments` counts as
//! generation 0. `segments.gen` is a legacy pointer file and never a commit.

use log::warn;

use crate::error::{Result, ShardError};
use crate::storage::Storage;

/// Prefix shared by every commit-point file name.
pub const SEGMENTS: &str = "segments";

/// Legacy generation pointer file, never a commit point.
pub const SEGMENTS_GEN: &str = "segments.gen";

const RADIX: u32 = 36;

/// The commit point selected for decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPoint {
    pub file_name: String,
    pub generation: u64,
}

/// Parse the generation encoded in a commit file name.
///
/// Returns `None` for names that are not commit points, including
/// `segments.gen` and names whose suffix is not base 36.
pub fn generation_from_segments_file_name(name: &str) -> Option<u64> {
    if name == SEGMENTS {
        return Some(0);
    }

    let suffix = name.strip_prefix(SEGMENTS)?.strip_prefix('_')?;
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    u64::from_str_radix(suffix, RADIX).ok()
}

/// The commit file name for a generation.
pub fn segments_file_name(generation: u64) -> String {
    match generation {
        0 => SEGMENTS.to_string(),
        n => format!("{SEGMENTS}_{}", to_base36(n)),
    }
}

/// Render a generation in lowercase base 36.
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % RADIX as u64) as usize]);
        value /= RADIX as u64;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Pick the commit point with the highest generation from a file listing.
///
/// Names that start with `segments` but do not parse are skipped rather than
/// failing the resolution. Ties keep the name that sorts first.
pub fn resolve_commit<I, S>(names: I) -> Result<CommitPoint>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut names: Vec<String> = names
        .into_iter()
        .map(|n| n.as_ref().to_string())
        .filter(|n| n.starts_with(SEGMENTS) && n != SEGMENTS_GEN)
        .collect();
    names.sort();

    let mut best: Option<CommitPoint> = None;
    for name in names {
        let Some(generation) = generation_from_segments_file_name(&name) else {
            warn!("skipping {name}: not a commit point");
            continue;
        };

        if best.as_ref().is_none_or(|b| generation > b.generation) {
            best = Some(CommitPoint {
                file_name: name,
                generation,
            });
        }
    }

    best.ok_or_else(|| ShardError::NoCommitFound("no segments_N file found".to_string()))
}

/// Resolve the current commit point of the index held by `storage`.
pub fn find_commit(storage: &dyn Storage) -> Result<CommitPoint> {
    let files = storage.list_files()?;
    resolve_commit(&files).map_err(|_| {
        ShardError::NoCommitFound(format!("no segments_N file found in {}", storage.location()))
    })
}
