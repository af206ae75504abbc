//! Locating the index root inside an extracted archive.

use std::path::{Path, PathBuf};

use log::debug;

use crate::codec::generation::{SEGMENTS, SEGMENTS_GEN};
use crate::error::{Result, ShardError};

/// Find the first directory under `root` (itself included) that directly
/// contains a commit-point candidate.
///
/// Directories are visited depth-first in name order, so the result is
/// stable across platforms.
pub fn find_index_dir<P: AsRef<Path>>(root: P) -> Result<PathBuf> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(ShardError::NoIndexFound(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    visit(root)?.ok_or_else(|| {
        ShardError::NoIndexFound(format!("no Lucene index directory under {}", root.display()))
    })
}

fn visit(dir: &Path) -> Result<Option<PathBuf>> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    let mut subdirs = Vec::new();
    for path in entries {
        if path.is_dir() {
            subdirs.push(path);
        } else if is_commit_candidate(&path) {
            debug!("index root found at {}", dir.display());
            return Ok(Some(dir.to_path_buf()));
        }
    }

    for subdir in subdirs {
        if let Some(found) = visit(&subdir)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

fn is_commit_candidate(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with(SEGMENTS) && name != SEGMENTS_GEN)
}
