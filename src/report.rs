//! Shard reports.
//!
//! A [`Report`] is the structural summary of one commit point: totals across
//! its segments plus one [`SegmentCommitSummary`] per segment, in commit
//! order. Counts are copied verbatim from the files; values that break the
//! expected invariants (`0 <= del_count <= max_doc`, likewise for soft
//! deletes) are kept as read and listed in `warnings`.

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::codec::generation::find_commit;
use crate::codec::segment_infos::{NO_DELETIONS_GEN, SegmentCommitInfo, SegmentInfos};
use crate::config::InspectorConfig;
use crate::error::Result;
use crate::storage::Storage;
use crate::util::hex;

/// Format assumptions recorded in every report.
pub const REPORT_NOTES: &str = "Parsed per Lucene90SegmentInfoFormat: header (big-endian), \
version and min version (3 x int32 little-endian), maxDoc (int32 little-endian), \
isCompound (byte), diagnostics, files, attributes. Commit records big-endian; \
commit id present for format version > 9. Checksums are not verified.";

/// Summary of one segment referenced by a commit point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentCommitSummary {
    pub name: String,
    /// Hex-encoded 16-byte segment id.
    pub seg_id: String,
    pub codec: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    pub max_doc: i32,
    pub compound: bool,
    pub del_gen: i64,
    pub del_count: i32,
    pub field_infos_gen: i64,
    pub dv_gen: i64,
    pub soft_del_count: i32,
    /// Hex-encoded commit id, when the commit format carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sci_id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub diagnostics: BTreeMap<String, String>,
}

impl SegmentCommitSummary {
    /// Summarize one decoded segment record.
    pub fn from_commit_info(sci: &SegmentCommitInfo) -> Self {
        SegmentCommitSummary {
            name: sci.info.name.clone(),
            seg_id: hex::encode(&sci.info.id),
            codec: sci.codec.clone(),
            version: sci.info.version.to_string(),
            min_version: sci.info.min_version.map(|v| v.to_string()),
            max_doc: sci.info.doc_count,
            compound: sci.info.is_compound_file,
            del_gen: sci.del_gen,
            del_count: sci.del_count,
            field_infos_gen: sci.field_infos_gen,
            dv_gen: sci.dv_gen,
            soft_del_count: sci.soft_del_count,
            sci_id: sci.sci_id.as_ref().map(|id| hex::encode(id)),
            diagnostics: sci.info.diagnostics.clone(),
        }
    }

    /// Check if a deletions file is layered over this segment.
    pub fn has_deletions(&self) -> bool {
        self.del_gen != NO_DELETIONS_GEN
    }

    /// Documents neither hard- nor soft-deleted.
    pub fn live_docs(&self) -> i64 {
        self.max_doc as i64 - self.del_count as i64 - self.soft_del_count as i64
    }

    /// Descriptions of every count invariant this segment violates.
    pub fn count_anomalies(&self) -> Vec<String> {
        let mut anomalies = Vec::new();
        if self.max_doc < 0 {
            anomalies.push(format!("segment {}: max_doc {} is negative", self.name, self.max_doc));
        }
        if self.del_count < 0 || self.del_count > self.max_doc {
            anomalies.push(format!(
                "segment {}: del_count {} outside 0..={}",
                self.name, self.del_count, self.max_doc
            ));
        }
        if self.soft_del_count < 0 || self.soft_del_count > self.max_doc {
            anomalies.push(format!(
                "segment {}: soft_del_count {} outside 0..={}",
                self.name, self.soft_del_count, self.max_doc
            ));
        }
        if (self.del_count as i64 + self.soft_del_count as i64) > self.max_doc as i64 {
            anomalies.push(format!(
                "segment {}: del_count {} + soft_del_count {} exceeds max_doc {}",
                self.name, self.del_count, self.soft_del_count, self.max_doc
            ));
        }
        anomalies
    }
}

/// Structural report for one index shard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub index_path: String,
    pub segments_file: String,
    pub generation: u64,
    pub format_version: i32,
    pub total_segments: usize,
    pub total_docs: i64,
    pub total_deleted_docs: i64,
    pub total_soft_deleted_docs: i64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub user_data: BTreeMap<String, String>,
    pub segments: Vec<SegmentCommitSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub notes: String,
}

impl Report {
    /// Aggregate a decoded commit point into a report.
    pub fn from_segment_infos<S: Into<String>>(
        index_path: S,
        infos: &SegmentInfos,
        config: &InspectorConfig,
    ) -> Self {
        let segments: Vec<SegmentCommitSummary> = infos
            .segments
            .iter()
            .map(SegmentCommitSummary::from_commit_info)
            .collect();

        let mut total_docs = 0i64;
        let mut total_deleted_docs = 0i64;
        let mut total_soft_deleted_docs = 0i64;
        let mut warnings = Vec::new();
        for segment in &segments {
            total_docs += segment.max_doc as i64;
            total_deleted_docs += segment.del_count as i64;
            total_soft_deleted_docs += segment.soft_del_count as i64;

            for anomaly in segment.count_anomalies() {
                warn!("{anomaly}");
                if config.report_anomalies {
                    warnings.push(anomaly);
                }
            }
        }

        Report {
            index_path: index_path.into(),
            segments_file: infos.commit.file_name.clone(),
            generation: infos.commit.generation,
            format_version: infos.format_version,
            total_segments: segments.len(),
            total_docs,
            total_deleted_docs,
            total_soft_deleted_docs,
            user_data: infos.user_data.clone(),
            segments,
            warnings,
            notes: REPORT_NOTES.to_string(),
        }
    }

    /// Render the report as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Resolve the current commit point in `storage`, decode it and aggregate
/// the result.
pub fn build_report(storage: &dyn Storage, config: &InspectorConfig) -> Result<Report> {
    let commit = find_commit(storage)?;
    let infos = SegmentInfos::read_commit(storage, &commit, config)?;
    let report = Report::from_segment_infos(storage.location(), &infos, config);

    info!(
        "{}: {} segments, {} docs ({} deleted, {} soft-deleted) in {}",
        report.index_path,
        report.total_segments,
        report.total_docs,
        report.total_deleted_docs,
        report.total_soft_deleted_docs,
        report.segments_file
    );

    Ok(report)
}
