//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, ShardlensArgs};
use crate::error::Result;
use crate::report::{Report, SegmentCommitSummary};

/// Result structure for commit resolution.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResult {
    pub index_path: String,
    pub segments_file: String,
    pub generation: u64,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &ShardlensArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output shard reports in the specified format.
///
/// JSON output is a single object for one report and an array otherwise.
pub fn output_reports(reports: &[Report], args: &ShardlensArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            for report in reports {
                print!("{}", render_report(report, args.verbosity()));
            }
            Ok(())
        }
        OutputFormat::Json => match reports {
            [] => Ok(()),
            [report] => output_json(report, args),
            reports => output_json(&reports, args),
        },
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &ShardlensArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    if let serde_json::Value::Object(map) = value {
        for (key, value) in map {
            match value {
                serde_json::Value::String(s) => println!("{key}: {s}"),
                other => println!("{key}: {other}"),
            }
        }
    } else {
        println!("{value}");
    }

    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize + ?Sized>(result: &T, args: &ShardlensArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Render one report for a terminal.
pub fn render_report(report: &Report, verbosity: u8) -> String {
    let mut out = String::new();

    out.push_str(&format!("Shard: {}\n", report.index_path));
    out.push_str("═══════════════\n");
    out.push_str(&format!(
        "Commit:           {} (generation {}, format {})\n",
        report.segments_file, report.generation, report.format_version
    ));
    out.push_str(&format!("Segments:         {}\n", report.total_segments));
    out.push_str(&format!("Documents:        {}\n", report.total_docs));
    out.push_str(&format!("Deleted:          {}\n", report.total_deleted_docs));
    out.push_str(&format!("Soft-deleted:     {}\n", report.total_soft_deleted_docs));

    if !report.user_data.is_empty() {
        out.push_str("\nCommit User Data:\n");
        out.push_str("─────────────────\n");
        for (key, value) in &report.user_data {
            out.push_str(&format!("  {key}: {value}\n"));
        }
    }

    if !report.segments.is_empty() {
        out.push_str("\nSegments:\n");
        out.push_str("─────────\n");
        for segment in &report.segments {
            out.push_str(&render_segment(segment, verbosity));
        }
    }

    if !report.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        out.push_str("─────────\n");
        for warning in &report.warnings {
            out.push_str(&format!("  ! {warning}\n"));
        }
    }

    if verbosity > 1 {
        out.push_str(&format!("\nNotes: {}\n", report.notes));
    }
    out.push('\n');

    out
}

fn render_segment(segment: &SegmentCommitSummary, verbosity: u8) -> String {
    let mut out = format!(
        "  {:<8} {:>10} docs  {:>8} del  {:>8} soft-del  {} v{}{}\n",
        segment.name,
        segment.max_doc,
        segment.del_count,
        segment.soft_del_count,
        segment.codec,
        segment.version,
        if segment.compound { "  [cfs]" } else { "" }
    );

    if verbosity > 1 {
        out.push_str(&format!("           id: {}\n", segment.seg_id));
        if let Some(sci_id) = &segment.sci_id {
            out.push_str(&format!("           commit id: {sci_id}\n"));
        }
        if let Some(min_version) = &segment.min_version {
            out.push_str(&format!("           min version: {min_version}\n"));
        }
        out.push_str(&format!(
            "           gens: del {}, field infos {}, doc values {}\n",
            segment.del_gen, segment.field_infos_gen, segment.dv_gen
        ));
        for (key, value) in &segment.diagnostics {
            out.push_str(&format!("           {key} = {value}\n"));
        }
    }

    out
}
