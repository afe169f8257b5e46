// tests/local_checkpoints.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::fs;

use shardsweep::exec::InvocationKind;
use shardsweep::run::RunOutcome;
use shardsweep::select_scenarios;
use shardsweep::sweep::SweepController;
use shardsweep::types::ScenarioKind;
use shardsweep_test_utils::builders::SweepFileBuilder;
use shardsweep_test_utils::fake_backend::{FakeBackend, run_logged_as};

#[tokio::test]
async fn fault_scenario_clears_local_write_dir_and_leaves_read_side_alone() {
    init_tracing();

    let tmp = tempfile::tempdir().unwrap();
    let write_root = tmp.path().join("checkpoints");
    let read_root = tmp.path().join("cp-union");
    fs::create_dir_all(write_root.join("100M").join("epoch-7")).unwrap();
    fs::write(write_root.join("100M").join("epoch-7").join("shard-0"), b"stale").unwrap();

    let file = SweepFileBuilder::new()
        .checkpoint_dirs(&write_root, &read_root)
        .local_checkpoints()
        .scenario_at(ScenarioKind::CheckpointFault, 100, 16)
        .build();
    let backend = FakeBackend::new();
    backend.run_until_killed(run_logged_as("Pagerank.checkpoint_fault"));
    let controller = SweepController::new(&file, backend.clone());

    let records = with_timeout(controller.run(&select_scenarios(&file, &[]))).await;

    assert_eq!(records.len(), 2);
    let write_dir = write_root.join("100M");
    assert!(write_dir.is_dir());
    assert_eq!(fs::read_dir(&write_dir).unwrap().count(), 0);
    assert!(write_root.join("100M-restore").is_dir());
    assert!(!read_root.exists());

    assert!(backend.of_kind(InvocationKind::Storage).is_empty());
}

#[tokio::test]
async fn clearing_twice_in_a_row_succeeds() {
    init_tracing();

    let tmp = tempfile::tempdir().unwrap();
    let file = SweepFileBuilder::new()
        .checkpoint_dirs(tmp.path().join("w"), tmp.path().join("r"))
        .local_checkpoints()
        .parallelism(&[1])
        .scenario(ScenarioKind::SizeScaling)
        .scenario(ScenarioKind::SizeScaling)
        .build();
    let backend = FakeBackend::new();
    let controller = SweepController::new(&file, backend.clone());

    let records = with_timeout(controller.run(&select_scenarios(&file, &[]))).await;

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.is_success()));
    assert!(tmp.path().join("w").join("10M").is_dir());
}

#[tokio::test]
async fn write_root_that_is_a_file_skips_checkpointed_point() {
    init_tracing();

    let tmp = tempfile::tempdir().unwrap();
    let write_root = tmp.path().join("not-a-dir");
    fs::write(&write_root, b"oops").unwrap();

    let file = SweepFileBuilder::new()
        .checkpoint_dirs(&write_root, tmp.path().join("r"))
        .local_checkpoints()
        .scenario_at(ScenarioKind::CheckpointFault, 100, 16)
        .build();
    let backend = FakeBackend::new();
    let controller = SweepController::new(&file, backend.clone());

    let records = with_timeout(controller.run(&select_scenarios(&file, &[]))).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, RunOutcome::Skipped);
    assert!(backend.invocations().is_empty());
}
