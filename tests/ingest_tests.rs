//! Ingestion from local sources into the raw directory, then through the
//! stage chain.

use indoc::indoc;
use pdoom_pipeline::core::FileStage;
use pdoom_pipeline::io::RealFileSystem;
use pdoom_pipeline::pipeline::{DataLayout, Orchestrator, StageSelector};
use pdoom_pipeline::sources::{
    Ingestor, MetricSource, PayloadOrigin, SampleDataProvider, SourceAdapter,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn source(id: &str, descriptor: &str, placeholder: bool) -> MetricSource {
    MetricSource {
        id: id.to_string(),
        title: id.to_string(),
        data_source: descriptor.parse().unwrap(),
        placeholder,
    }
}

#[test]
fn test_local_sources_flow_through_pipeline() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("data");
    fs::create_dir_all(root.join("exports")).unwrap();
    fs::write(
        root.join("exports/aisi.json"),
        indoc! {r#"
            {"current_value": 11, "trend": "+2", "confidence": "high",
             "last_updated": "2025-05-01T00:00:00Z"}
        "#},
    )
    .unwrap();
    fs::write(root.join("exports/broken.json"), "<html>").unwrap();

    let fs_impl = RealFileSystem::new();
    let layout = DataLayout::new(&root);
    let adapter = SourceAdapter::new(&fs_impl, &root);
    let metrics = vec![
        source("aisi_status", "local:exports/aisi.json", false),
        source("governance_researchers", "local:exports/broken.json", false),
        source("safety_researchers", "local:exports/missing.json", true),
    ];

    let report = Ingestor::new(&fs_impl, layout.clone(), &adapter, &SampleDataProvider)
        .ingest(&metrics, false)
        .unwrap();

    let origins: Vec<_> = report.results.successes.iter().map(|m| m.origin).collect();
    assert_eq!(
        origins,
        vec![
            PayloadOrigin::Fetched,
            PayloadOrigin::Fallback,
            PayloadOrigin::Placeholder
        ]
    );
    assert_eq!(report.manifest.metrics[0].confidence, "high");
    assert_eq!(report.manifest.metrics[1].confidence, "medium");

    let summary = Orchestrator::new(&fs_impl, layout.clone())
        .run(StageSelector::Full, false)
        .unwrap();
    assert_eq!(summary.total_failed(), 0);

    let served: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(
            layout
                .stage_dir(FileStage::Servable)
                .join("sources/governance_researchers.json"),
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(served["metrics"][0]["value"], 312);
    assert_eq!(served["metrics"][0]["magnitude"], "medium");
    assert_eq!(served["ready_for_dashboard"], true);
}

#[test]
fn test_dry_run_ingest_still_reads_sources() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("data");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("value.json"), r#"{"current_value": 3}"#).unwrap();

    let fs_impl = RealFileSystem::new();
    let adapter = SourceAdapter::new(&fs_impl, &root);

    let report = Ingestor::new(&fs_impl, DataLayout::new(&root), &adapter, &SampleDataProvider)
        .ingest(&[source("value", "local:value.json", false)], true)
        .unwrap();

    assert_eq!(report.results.successes[0].origin, PayloadOrigin::Fetched);
    assert!(!root.join("raw").exists());
    assert!(!root.join("metadata").exists());
}
