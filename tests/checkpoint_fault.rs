// tests/checkpoint_fault.rs

mod common;
use crate::common::{flag_value, init_tracing, log_file_name, with_timeout};

use std::path::Path;

use shardsweep::exec::InvocationKind;
use shardsweep::run::RunOutcome;
use shardsweep::select_scenarios;
use shardsweep::sweep::SweepController;
use shardsweep::types::ScenarioKind;
use shardsweep_test_utils::builders::SweepFileBuilder;
use shardsweep_test_utils::fake_backend::{FakeBackend, kind, run_logged_as};

fn fault_file() -> shardsweep::config::SweepFile {
    SweepFileBuilder::new()
        .dead_workers(&[5, 6, 10])
        .scenario_at(ScenarioKind::CheckpointFault, 100, 16)
        .build()
}

#[tokio::test]
async fn killed_run_is_restored_from_its_own_checkpoints() {
    init_tracing();

    let file = fault_file();
    let backend = FakeBackend::new();
    backend.run_until_killed(run_logged_as("Pagerank.checkpoint_fault"));
    let controller = SweepController::new(&file, backend.clone());

    let records = with_timeout(controller.run(&select_scenarios(&file, &[]))).await;

    assert_eq!(records.len(), 2);
    let (faulted, restored) = (&records[0], &records[1]);

    assert_eq!(faulted.outcome, RunOutcome::LaunchFailure);
    assert_eq!(faulted.error_detail.as_deref(), Some("terminated by signal"));
    assert!(faulted.config.as_ref().unwrap().checkpoint_enabled());
    assert_eq!(
        faulted.config.as_ref().unwrap().checkpoint_write_path(),
        Path::new("/ckpt/write/100M")
    );

    assert_eq!(restored.outcome, RunOutcome::Success);
    assert_eq!(
        restored.config.as_ref().unwrap().checkpoint_read_path(),
        faulted.config.as_ref().unwrap().checkpoint_write_path()
    );
    assert_ne!(
        restored.config.as_ref().unwrap().checkpoint_write_path(),
        restored.config.as_ref().unwrap().checkpoint_read_path()
    );

    use InvocationKind::*;
    let kinds: Vec<InvocationKind> = backend.invocations().iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![Storage, Run, Kill, Storage, Run]);

    let storage = backend.of_kind(Storage);
    assert!(storage[0].argv.last().unwrap().contains("/ckpt/write/100M"));
    assert!(storage[1].argv.last().unwrap().contains("/ckpt/write/100M-restore"));

    let kill = &backend.of_kind(Kill)[0];
    assert_eq!(kill.argv, vec!["pkill", "mpirun"]);

    let runs = backend.of_kind(Run);
    assert_eq!(flag_value(&runs[0], "--checkpoint"), Some("true"));
    assert_eq!(flag_value(&runs[0], "--dead_workers"), None);

    let restore = &runs[1];
    assert_eq!(flag_value(restore, "--checkpoint"), Some("true"));
    assert_eq!(flag_value(restore, "--dead_workers"), Some("5,6,10"));
    assert_eq!(
        flag_value(restore, "--checkpoint_read_dir"),
        Some("/ckpt/write/100M")
    );
    assert_eq!(
        flag_value(restore, "--checkpoint_write_dir"),
        Some("/ckpt/write/100M-restore")
    );
    assert_eq!(log_file_name(restore).as_deref(), Some("Pagerank.restore_fault.16"));
}

#[tokio::test]
async fn failed_restore_is_recorded_not_retried() {
    init_tracing();

    let file = fault_file();
    let backend = FakeBackend::new();
    backend.run_until_killed(run_logged_as("Pagerank.checkpoint_fault"));
    backend.exit_with(134, run_logged_as("Pagerank.restore_fault"));
    let controller = SweepController::new(&file, backend.clone());

    let records = with_timeout(controller.run(&select_scenarios(&file, &[]))).await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].outcome, RunOutcome::LaunchFailure);
    assert_eq!(
        records[1].error_detail.as_deref(),
        Some("exited with status 134")
    );
    assert_eq!(backend.of_kind(InvocationKind::Run).len(), 2);
}

#[tokio::test]
async fn pending_kill_is_withdrawn_when_run_ends_first() {
    init_tracing();

    let file = SweepFileBuilder::new()
        .fault_delay(3600.0)
        .scenario_at(ScenarioKind::CheckpointFault, 100, 16)
        .build();
    let backend = FakeBackend::new();
    let controller = SweepController::new(&file, backend.clone());

    let records = with_timeout(controller.run(&select_scenarios(&file, &[]))).await;

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.is_success()));
    assert!(backend.of_kind(InvocationKind::Kill).is_empty());
}

#[tokio::test]
async fn unclearable_checkpoints_skip_the_point() {
    init_tracing();

    let file = fault_file();
    let backend = FakeBackend::new();
    backend.exit_with(1, kind(InvocationKind::Storage));
    let controller = SweepController::new(&file, backend.clone());

    let records = with_timeout(controller.run(&select_scenarios(&file, &[]))).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, RunOutcome::Skipped);
    let detail = records[0].error_detail.as_deref().unwrap();
    assert!(detail.contains("/ckpt/write/100M"));
    assert!(backend.of_kind(InvocationKind::Run).is_empty());
    assert!(backend.of_kind(InvocationKind::Kill).is_empty());
}

#[tokio::test]
async fn later_scenarios_run_after_a_skipped_fault_point() {
    init_tracing();

    let file = SweepFileBuilder::new()
        .parallelism(&[1])
        .scenario_at(ScenarioKind::CheckpointFault, 100, 16)
        .scenario(ScenarioKind::SizeScaling)
        .build();
    let backend = FakeBackend::new();
    backend.fail_to_spawn(|i: &shardsweep::exec::Invocation| {
        i.kind == InvocationKind::Storage && i.argv.last().is_some_and(|c| c.contains("100M"))
    });
    let controller = SweepController::new(&file, backend.clone());

    let records = with_timeout(controller.run(&select_scenarios(&file, &[]))).await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].scenario, ScenarioKind::CheckpointFault);
    assert_eq!(records[0].outcome, RunOutcome::Skipped);
    assert_eq!(records[1].scenario, ScenarioKind::SizeScaling);
    assert_eq!(records[1].outcome, RunOutcome::Success);
}
