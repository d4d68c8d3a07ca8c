use std::path::{Path, PathBuf};
use std::process::Command;

use colored::Colorize;
use serde::Serialize;
use which::which;

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("command exited with status {code:?}")]
    Exit { code: Option<i32> },
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub type StepResult = Result<(), StepError>;

/// The two destructive operations issued for every selected stack.
pub trait StackTool {
    fn destroy(&self, target: &str) -> StepResult;
    fn remove(&self, target: &str) -> StepResult;
}

#[derive(Debug, Clone)]
pub struct PulumiCli {
    program: PathBuf,
}

impl PulumiCli {
    /// Resolves `bin` on `PATH`; an unresolved name is kept as-is so the
    /// failure surfaces per stack when the process is spawned.
    pub fn locate(bin: &Path) -> Self {
        let program = which(bin).unwrap_or_else(|_| bin.to_path_buf());
        Self { program }
    }

    pub fn destroy_args(target: &str) -> Vec<&str> {
        vec!["destroy", "-s", target, "--yes"]
    }

    pub fn remove_args(target: &str) -> Vec<&str> {
        vec!["stack", "rm", target, "--yes", "--force"]
    }

    fn run(&self, args: &[&str]) -> StepResult {
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|source| StepError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !status.success() {
            return Err(StepError::Exit {
                code: status.code(),
            });
        }

        Ok(())
    }
}

impl StackTool for PulumiCli {
    fn destroy(&self, target: &str) -> StepResult {
        self.run(&Self::destroy_args(target))
    }

    fn remove(&self, target: &str) -> StepResult {
        self.run(&Self::remove_args(target))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StackOutcome {
    pub target: String,
    pub destroyed: Option<String>,
    pub removed: Option<String>,
}

impl StackOutcome {
    pub fn succeeded(&self) -> bool {
        self.destroyed.is_none() && self.removed.is_none()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct DeletionReport {
    pub outcomes: Vec<StackOutcome>,
}

impl DeletionReport {
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| usize::from(o.destroyed.is_some()) + usize::from(o.removed.is_some()))
            .sum()
    }
}

/// Destroys then removes each target in order. A failed step is reported
/// and the next step still runs.
pub fn delete_stacks<T: StackTool + ?Sized>(tool: &T, targets: &[String]) -> DeletionReport {
    let mut report = DeletionReport::default();

    for (idx, target) in targets.iter().enumerate() {
        println!("\n==> [{}/{}] Destroying stack resources: {target}", idx + 1, targets.len());
        let destroyed = match tool.destroy(target) {
            Ok(()) => {
                println!("{} Successfully destroyed resources for {target}", "✅".green());
                None
            }
            Err(err) => {
                println!("{} Error destroying resources for {target}: {err}", "❌".red());
                Some(err.to_string())
            }
        };

        println!("\n==> [{}/{}] Deleting stack: {target}", idx + 1, targets.len());
        let removed = match tool.remove(target) {
            Ok(()) => {
                println!("{} Successfully deleted {target}", "✅".green());
                None
            }
            Err(err) => {
                println!("{} Error deleting {target}: {err}", "❌".red());
                Some(err.to_string())
            }
        };

        report.outcomes.push(StackOutcome {
            target: target.clone(),
            destroyed,
            removed,
        });
    }

    let failures = report.failures();
    if failures == 0 {
        println!("\nProcessed {} stacks without errors.", targets.len());
    } else {
        println!(
            "\nProcessed {} stacks, {} step(s) failed.",
            targets.len(),
            failures.to_string().as_str().red()
        );
    }

    report
}
