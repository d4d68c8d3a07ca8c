use std::cell::RefCell;
use std::path::Path;

use stack_nuke::cli::{RunOutcome, run_workflow};
use stack_nuke::config::{Config, RunMode, StackPrefix};
use stack_nuke::executor::{StackTool, StepError, StepResult};
use stack_nuke::input::InputError;

#[derive(Default)]
struct FakePulumi {
    calls: RefCell<Vec<(String, String)>>,
    fail_destroy: Option<String>,
}

impl StackTool for FakePulumi {
    fn destroy(&self, target: &str) -> StepResult {
        self.calls
            .borrow_mut()
            .push(("destroy".to_string(), target.to_string()));
        if self.fail_destroy.as_deref() == Some(target) {
            return Err(StepError::Exit { code: Some(255) });
        }
        Ok(())
    }

    fn remove(&self, target: &str) -> StepResult {
        self.calls
            .borrow_mut()
            .push(("rm".to_string(), target.to_string()));
        Ok(())
    }
}

const SAMPLE: &str = "my-org/remote-make/prod\ndocker-pulumi-node-ab12-34\nunrelated-line\nremote-make-worker-ff00-11\n";

fn write_list(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("in.txt");
    std::fs::write(&path, contents).expect("stack list should be written");
    path
}

#[test]
fn dry_run_lists_stacks_without_calling_pulumi() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let config = Config::new(write_list(dir.path(), SAMPLE));
    let tool = FakePulumi::default();

    let outcome = run_workflow(&config, &tool).expect("workflow should succeed");

    match outcome {
        RunOutcome::DryRun(selection) => {
            assert_eq!(
                selection.targets(&config.prefix),
                vec!["docker-pulumi-node-ab12-34", "remote-make-worker-ff00-11"]
            );
        }
        other => panic!("expected dry run, got {other:?}"),
    }
    assert!(tool.calls.borrow().is_empty());
}

#[test]
fn execute_qualifies_targets_and_keeps_order() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut config = Config::new(write_list(dir.path(), SAMPLE));
    config.prefix = StackPrefix::new("Org/Proj");
    config.mode = RunMode::Execute;
    let tool = FakePulumi {
        fail_destroy: Some("Org/Proj/docker-pulumi-node-ab12-34".to_string()),
        ..Default::default()
    };

    let outcome = run_workflow(&config, &tool).expect("step failures are not fatal");

    let calls: Vec<(String, String)> = tool.calls.borrow().clone();
    let expected: Vec<(String, String)> = [
        ("destroy", "Org/Proj/docker-pulumi-node-ab12-34"),
        ("rm", "Org/Proj/docker-pulumi-node-ab12-34"),
        ("destroy", "Org/Proj/remote-make-worker-ff00-11"),
        ("rm", "Org/Proj/remote-make-worker-ff00-11"),
    ]
    .iter()
    .map(|(op, target)| (op.to_string(), target.to_string()))
    .collect();
    assert_eq!(calls, expected);

    match outcome {
        RunOutcome::Executed(report) => assert_eq!(report.failures(), 1),
        other => panic!("expected execution, got {other:?}"),
    }
}

#[test]
fn missing_marker_never_reaches_pulumi() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut config = Config::new(write_list(
        dir.path(),
        "\n\n  other-project  \ndocker-pulumi-node-ab12\n",
    ));
    config.mode = RunMode::Execute;
    let tool = FakePulumi::default();

    let outcome = run_workflow(&config, &tool).expect("soft abort is not an error");

    assert!(matches!(outcome, RunOutcome::MissingMarker));
    assert!(tool.calls.borrow().is_empty());
}

#[test]
fn marker_without_matches_is_a_soft_abort() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut config = Config::new(write_list(dir.path(), "remote-make\nnothing-here\n"));
    config.mode = RunMode::Execute;
    let tool = FakePulumi::default();

    let outcome = run_workflow(&config, &tool).expect("soft abort is not an error");

    assert!(matches!(outcome, RunOutcome::NoStacks));
    assert!(tool.calls.borrow().is_empty());
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut config = Config::new(dir.path().join("nope.txt"));
    config.mode = RunMode::Execute;
    let tool = FakePulumi::default();

    let err = run_workflow(&config, &tool).expect_err("missing file must fail");

    assert!(matches!(
        err.downcast_ref::<InputError>(),
        Some(InputError::FileNotFound(_))
    ));
    assert!(tool.calls.borrow().is_empty());
}
