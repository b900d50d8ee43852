use chrono::{Duration, TimeZone, Utc};
use pdoom_pipeline::core::Timestamp;
use pdoom_pipeline::io::{FileSystem, MemoryFileSystem};
use pdoom_pipeline::pipeline::{DataLayout, Orchestrator, OrchestratorOptions, StageSelector};
use pdoom_pipeline::run_log::RunLogStore;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};

static TICKS: AtomicI64 = AtomicI64::new(0);

fn ticking_clock() -> Timestamp {
    let tick = TICKS.fetch_add(1, Ordering::SeqCst);
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(tick)
}

fn tree() -> MemoryFileSystem {
    MemoryFileSystem::with_files([(
        "/data/raw/a.json",
        r#"{"metrics": [{"name": "a", "value": 1}]}"#,
    )])
}

#[test]
fn test_log_keeps_last_hundred_runs() {
    let fs = tree();
    let orchestrator = Orchestrator::new(&fs, DataLayout::new("/data")).with_clock(ticking_clock);

    let mut stamps = Vec::new();
    for _ in 0..101 {
        let summary = orchestrator.run(StageSelector::Curate, false).unwrap();
        stamps.push(summary.reports[0].log_entry.timestamp);
    }

    let log = RunLogStore::new(&fs, "/data/metadata/pipeline_log.json", 100)
        .load()
        .unwrap();
    let kept: Vec<_> = log.entries().map(|e| e.timestamp).collect();
    assert_eq!(kept.len(), 100);
    assert_eq!(kept, stamps[1..].to_vec());
}

#[test]
fn test_configured_capacity_bounds_the_file() {
    let fs = tree();
    let options = OrchestratorOptions {
        log_capacity: 4,
        ..OrchestratorOptions::default()
    };
    let orchestrator = Orchestrator::new(&fs, DataLayout::new("/data"))
        .with_options(options)
        .with_clock(ticking_clock);

    for _ in 0..3 {
        orchestrator.run(StageSelector::Full, false).unwrap();
    }

    let stored = fs
        .read_to_string(Path::new("/data/metadata/pipeline_log.json"))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
    let runs = value["pipeline_runs"].as_array().unwrap();
    assert_eq!(runs.len(), 4);
    assert_eq!(runs[3]["action"], "transformed_to_servable");
}

#[test]
fn test_dry_runs_never_touch_the_log() {
    let fs = tree();
    let orchestrator = Orchestrator::new(&fs, DataLayout::new("/data")).with_clock(ticking_clock);
    orchestrator.run(StageSelector::Curate, false).unwrap();
    let before = fs
        .read_to_string(Path::new("/data/metadata/pipeline_log.json"))
        .unwrap();

    let summary = orchestrator.run(StageSelector::Full, true).unwrap();

    let after = fs
        .read_to_string(Path::new("/data/metadata/pipeline_log.json"))
        .unwrap();
    assert_eq!(before, after);
    assert!(summary.reports.iter().all(|r| r.log_entry.dry_run));
    assert_eq!(summary.reports.len(), 3);
}
