//! Integration tests for decoding whole shards into reports.

mod common;

use std::fs::OpenOptions;

use common::{CommitFixture, SegmentFixture, si_bytes};
use shardlens::config::InspectorConfig;
use shardlens::error::{Result, ShardError};
use shardlens::locate::find_index_dir;
use shardlens::report::build_report;
use shardlens::util::hex;
use tempfile::TempDir;

#[test]
fn test_zero_segment_commit() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    CommitFixture::new(1).write_to(temp_dir.path());

    let report = shardlens::inspect(temp_dir.path(), &InspectorConfig::default())?;

    assert_eq!(report.segments_file, "segments_1");
    assert_eq!(report.total_segments, 0);
    assert_eq!(report.total_docs, 0);
    assert_eq!(report.total_deleted_docs, 0);
    assert_eq!(report.total_soft_deleted_docs, 0);
    assert!(report.segments.is_empty());

    Ok(())
}

#[test]
fn test_multi_segment_totals() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    CommitFixture::new(7)
        .segment(SegmentFixture::new("_0", 1000).deletes(12, 3))
        .segment(SegmentFixture::new("_1", 250).compound())
        .segment(SegmentFixture::new("_2", 40).deletes(0, 40))
        .user_data("history_uuid", "h-1")
        .write_to(temp_dir.path());

    let report = shardlens::inspect(temp_dir.path(), &InspectorConfig::default())?;

    assert_eq!(report.segments_file, "segments_7");
    assert_eq!(report.generation, 7);
    assert_eq!(report.format_version, 10);
    assert_eq!(report.total_segments, 3);
    assert_eq!(report.total_docs, 1290);
    assert_eq!(report.total_deleted_docs, 12);
    assert_eq!(report.total_soft_deleted_docs, 43);
    assert_eq!(report.user_data["history_uuid"], "h-1");
    assert!(report.warnings.is_empty());

    let names: Vec<&str> = report.segments.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["_0", "_1", "_2"]);
    assert!(report.segments[1].compound);
    assert!(!report.segments[0].compound);
    assert_eq!(report.segments[0].live_docs(), 985);
    assert_eq!(report.segments[1].version, "9.12.0");
    assert_eq!(report.segments[1].codec, "Lucene912");
    assert!(!report.segments[1].has_deletions());

    Ok(())
}

#[test]
fn test_commit_id_present_after_format_nine() -> Result<()> {
    let segment = SegmentFixture::new("_a", 3).sci_id([0xab; 16]);
    let expected_seg_id = hex::encode(&segment.id);
    let storage = CommitFixture::new(2)
        .segment(segment)
        .segment(SegmentFixture::new("_b", 4))
        .to_storage();

    let report = build_report(&storage, &InspectorConfig::default())?;

    assert_eq!(report.segments[0].sci_id.as_deref(), Some("ab".repeat(16).as_str()));
    assert_eq!(report.segments[0].seg_id, expected_seg_id);
    assert_eq!(report.segments[1].sci_id, None);
    assert_eq!(report.total_docs, 7);

    Ok(())
}

#[test]
fn test_format_nine_has_no_commit_id_marker() -> Result<()> {
    let storage = CommitFixture::new(2)
        .format(9)
        .segment(SegmentFixture::new("_0", 5).deletes(1, 0))
        .segment(SegmentFixture::new("_1", 6))
        .user_data("k", "v")
        .to_storage();

    let report = build_report(&storage, &InspectorConfig::default())?;

    assert_eq!(report.format_version, 9);
    assert_eq!(report.total_segments, 2);
    assert_eq!(report.total_docs, 11);
    assert_eq!(report.total_deleted_docs, 1);
    assert!(report.segments.iter().all(|s| s.sci_id.is_none()));
    assert_eq!(report.user_data["k"], "v");

    Ok(())
}

#[test]
fn test_bad_magic_in_commit() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = CommitFixture::new(4).segment(SegmentFixture::new("_0", 1));
    fixture.write_to(temp_dir.path());

    let mut bytes = fixture.to_bytes();
    bytes[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    std::fs::write(temp_dir.path().join("segments_4"), bytes).unwrap();

    match shardlens::inspect(temp_dir.path(), &InspectorConfig::default()) {
        Err(ShardError::BadMagic { actual, .. }) => assert_eq!(actual, 0xdeadbeef),
        other => panic!("Expected BadMagic, got {other:?}"),
    }
}

#[test]
fn test_foreign_commit_file_is_bad_magic() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("segments_1"),
        b"hello, this file is not a lucene commit",
    )
    .unwrap();

    match shardlens::inspect(temp_dir.path(), &InspectorConfig::default()) {
        Err(ShardError::BadMagic { actual, .. }) => {
            assert_eq!(actual, u32::from_be_bytes(*b"hell"));
        }
        other => panic!("Expected BadMagic, got {other:?}"),
    }
}

#[test]
fn test_long_segment_info_suffix() -> Result<()> {
    let storage = CommitFixture::new(2)
        .segment(SegmentFixture::new("_0", 77).si_suffix(&"q".repeat(200)))
        .segment(SegmentFixture::new("_1", 3))
        .to_storage();

    let report = build_report(&storage, &InspectorConfig::default())?;
    assert_eq!(report.segments[0].max_doc, 77);
    assert_eq!(report.total_docs, 80);

    Ok(())
}

#[test]
fn test_missing_segment_info_aborts() {
    let temp_dir = TempDir::new().unwrap();
    CommitFixture::new(3)
        .segment(SegmentFixture::new("_0", 10))
        .segment(SegmentFixture::new("_1", 10))
        .write_to(temp_dir.path());
    std::fs::remove_file(temp_dir.path().join("_1.si")).unwrap();

    match shardlens::inspect(temp_dir.path(), &InspectorConfig::default()) {
        Err(ShardError::Segment { segment, source }) => {
            assert_eq!(segment, "_1");
            assert!(matches!(*source, ShardError::Storage(_)));
        }
        other => panic!("Expected Segment error, got {other:?}"),
    }
}

#[test]
fn test_truncated_segment_info_aborts() {
    let temp_dir = TempDir::new().unwrap();
    CommitFixture::new(3)
        .segment(SegmentFixture::new("_0", 10))
        .write_to(temp_dir.path());

    // Header is 45 bytes; cut inside the second version component.
    let file = OpenOptions::new()
        .write(true)
        .open(temp_dir.path().join("_0.si"))
        .unwrap();
    file.set_len(50).unwrap();
    drop(file);

    let err = shardlens::inspect(temp_dir.path(), &InspectorConfig::default()).unwrap_err();
    assert!(matches!(err, ShardError::Segment { .. }));
    assert!(matches!(
        err.root_cause(),
        ShardError::Truncated {
            needed: 4,
            remaining: 1
        }
    ));
}

#[test]
fn test_truncated_commit() {
    let storage = CommitFixture::new(3)
        .segment(SegmentFixture::new("_0", 10))
        .to_storage();
    let bytes = CommitFixture::new(3)
        .segment(SegmentFixture::new("_0", 10))
        .to_bytes();
    storage.put("segments_3", bytes[..bytes.len() - 30].to_vec());

    let result = build_report(&storage, &InspectorConfig::default());
    assert!(matches!(result, Err(ShardError::Truncated { .. })));
}

#[test]
fn test_strict_rejects_suffix_mismatch() {
    let storage = CommitFixture::new(5)
        .suffix("4")
        .segment(SegmentFixture::new("_0", 2))
        .to_storage();

    let report = build_report(&storage, &InspectorConfig::default()).unwrap();
    assert_eq!(report.total_docs, 2);

    match build_report(&storage, &InspectorConfig::strict()) {
        Err(ShardError::HeaderMismatch {
            file,
            field,
            expected,
            actual,
        }) => {
            assert_eq!(file, "segments_5");
            assert_eq!(field, "suffix");
            assert_eq!(expected, "5");
            assert_eq!(actual, "4");
        }
        other => panic!("Expected HeaderMismatch, got {other:?}"),
    }
}

#[test]
fn test_strict_rejects_segment_id_mismatch() {
    let fixture = CommitFixture::new(2).segment(SegmentFixture::new("_0", 8));
    let storage = fixture.to_storage();

    let mut other = SegmentFixture::new("_0", 8);
    other.id = [0x11; 16];
    storage.put("_0.si", si_bytes(&other));

    let report = build_report(&storage, &InspectorConfig::default()).unwrap();
    assert_eq!(report.total_docs, 8);

    let err = build_report(&storage, &InspectorConfig::strict()).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        ShardError::HeaderMismatch { field: "id", .. }
    ));
}

#[test]
fn test_strict_accepts_consistent_shard() -> Result<()> {
    let storage = CommitFixture::new(71)
        .segment(SegmentFixture::new("_0", 2).sci_id([1; 16]))
        .segment(SegmentFixture::new("_1", 3))
        .to_storage();

    let report = build_report(&storage, &InspectorConfig::strict())?;
    assert_eq!(report.segments_file, "segments_1z");
    assert_eq!(report.total_docs, 5);

    Ok(())
}

#[test]
fn test_count_anomalies_become_warnings() -> Result<()> {
    let storage = CommitFixture::new(1)
        .segment(SegmentFixture::new("_0", 5).deletes(9, 0))
        .to_storage();

    let report = build_report(&storage, &InspectorConfig::default())?;
    assert_eq!(report.total_deleted_docs, 9);
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings.iter().all(|w| w.starts_with("segment _0:")));

    Ok(())
}

#[test]
fn test_locate_then_inspect() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index_dir = temp_dir.path().join("nodes").join("0").join("index");
    std::fs::create_dir_all(&index_dir).unwrap();
    std::fs::create_dir_all(temp_dir.path().join("nodes").join("0").join("translog")).unwrap();
    CommitFixture::new(9)
        .segment(SegmentFixture::new("_4", 17))
        .write_to(&index_dir);

    let found = find_index_dir(temp_dir.path())?;
    assert_eq!(found, index_dir);

    let report = shardlens::inspect(&found, &InspectorConfig::default())?;
    assert_eq!(report.index_path, index_dir.display().to_string());
    assert_eq!(report.total_docs, 17);

    Ok(())
}

#[test]
fn test_report_json_shape() -> Result<()> {
    let storage = CommitFixture::new(12)
        .segment(SegmentFixture::new("_0", 30).deletes(2, 1).sci_id([0xfe; 16]))
        .to_storage();
    let report = build_report(&storage, &InspectorConfig::default())?;

    let value: serde_json::Value = serde_json::from_str(&report.to_json(true)?)?;
    assert_eq!(value["segments_file"], "segments_c");
    assert_eq!(value["generation"], 12);
    assert_eq!(value["total_segments"], 1);
    assert_eq!(value["total_docs"], 30);
    assert_eq!(value["total_deleted_docs"], 2);
    assert_eq!(value["total_soft_deleted_docs"], 1);
    assert!(value["notes"].as_str().unwrap().contains("Lucene90SegmentInfoFormat"));

    let segment = &value["segments"][0];
    assert_eq!(segment["name"], "_0");
    assert_eq!(segment["max_doc"], 30);
    assert_eq!(segment["compound"], false);
    assert_eq!(segment["del_gen"], 1);
    assert_eq!(segment["del_count"], 2);
    assert_eq!(segment["soft_del_count"], 1);
    assert_eq!(segment["sci_id"], "fe".repeat(16));
    assert_eq!(segment["seg_id"].as_str().unwrap().len(), 32);
    assert_eq!(segment["version"], "9.12.0");
    assert_eq!(segment["min_version"], "9.12.0");

    Ok(())
}
