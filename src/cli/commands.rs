//! Command implementations for the shardlens CLI.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{debug, error, info};
use rayon::prelude::*;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::codec::generation::find_commit;
use crate::config::{HeaderValidation, InspectorConfig};
use crate::locate::find_index_dir;
use crate::report::{Report, build_report};
use crate::storage::{FileStorage, Storage};

/// Execute a CLI command.
pub fn execute_command(args: ShardlensArgs) -> Result<()> {
    match &args.command {
        Command::Inspect(inspect_args) => inspect_shards(inspect_args.clone(), &args),
        Command::Resolve(resolve_args) => resolve_commit_point(resolve_args.clone(), &args),
    }
}

/// Build and print a report for every requested shard.
fn inspect_shards(args: InspectArgs, cli_args: &ShardlensArgs) -> Result<()> {
    let mut config = load_config(cli_args)?;
    if args.strict {
        config.header_validation = HeaderValidation::Strict;
    }
    debug!("inspector config: {config:?}");

    let locate = args.locate;
    let results: Vec<(PathBuf, Result<Report>)> = args
        .index_paths
        .par_iter()
        .map(|path| (path.clone(), inspect_shard(path, locate, &config)))
        .collect();

    let total = results.len();
    let mut reports = Vec::with_capacity(total);
    let mut failures = Vec::new();
    for (path, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => failures.push((path, e)),
        }
    }

    output_reports(&reports, cli_args)?;

    if total == 1
        && let Some((_, e)) = failures.pop()
    {
        return Err(e);
    }
    for (path, e) in &failures {
        error!("{}: {e:#}", path.display());
    }
    if !failures.is_empty() {
        bail!("{} of {total} shards could not be inspected", failures.len());
    }

    Ok(())
}

fn inspect_shard(path: &Path, locate: bool, config: &InspectorConfig) -> Result<Report> {
    let storage = open_storage(path, locate)?;
    let report = build_report(&storage, config)
        .with_context(|| format!("failed to inspect {}", storage.location()))?;
    Ok(report)
}

/// Print which commit file is current for one shard.
fn resolve_commit_point(args: ResolveArgs, cli_args: &ShardlensArgs) -> Result<()> {
    let storage = open_storage(&args.index_path, args.locate)?;
    let commit = find_commit(&storage)?;

    output_result(
        "Current commit point",
        &ResolveResult {
            index_path: storage.location(),
            segments_file: commit.file_name,
            generation: commit.generation,
        },
        cli_args,
    )?;

    Ok(())
}

fn open_storage(path: &Path, locate: bool) -> Result<FileStorage> {
    let dir = if locate {
        find_index_dir(path)?
    } else {
        path.to_path_buf()
    };
    let storage = FileStorage::new(&dir)
        .with_context(|| format!("cannot open index directory {}", dir.display()))?;
    Ok(storage)
}

fn load_config(cli_args: &ShardlensArgs) -> Result<InspectorConfig> {
    match &cli_args.config {
        Some(path) => {
            info!("loading config from {}", path.display());
            Ok(InspectorConfig::from_file(path)?)
        }
        None => Ok(InspectorConfig::default()),
    }
}
