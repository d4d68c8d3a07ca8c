use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::config::{Config, DEFAULT_PULUMI_BIN, RunMode, StackPrefix, default_input_path};
use crate::executor::{DeletionReport, PulumiCli, StackTool, delete_stacks};
use crate::input::{GUARD_MARKER, load_lines};
use crate::selector::{SelectOutcome, Selection, SelectionReport, select_stacks};

#[derive(Debug, Parser)]
#[command(
    name = "stack-nuke",
    version,
    about = "Force-delete Pulumi worker stacks listed in a file"
)]
pub struct Cli {
    /// Path to the stack list (default: in.txt next to the binary)
    filepath: Option<PathBuf>,
    /// Fully qualified org/project prefix, e.g. Frankoslaw/remote-make/
    #[arg(long, default_value = "")]
    fqn: String,
    /// Actually delete the stacks (default: dry run only)
    #[arg(long)]
    execute: bool,
    /// Pulumi binary used for deletions
    #[arg(long, env = "PULUMI_BIN", default_value = DEFAULT_PULUMI_BIN)]
    pulumi_bin: PathBuf,
    /// Emit the selected stacks as compact JSON
    #[arg(long)]
    raw: bool,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            input_path: self.filepath.unwrap_or_else(default_input_path),
            prefix: StackPrefix::new(&self.fqn),
            mode: RunMode::from_execute_flag(self.execute),
            pulumi_bin: self.pulumi_bin,
            raw: self.raw,
        }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    MissingMarker,
    NoStacks,
    DryRun(Selection),
    Executed(DeletionReport),
}

/// Parse arguments, run the deletion workflow and return the exit code.
pub fn run() -> i32 {
    let config = Cli::parse().into_config();
    let tool = PulumiCli::locate(&config.pulumi_bin);

    match run_workflow(&config, &tool) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {err:#}");
            1
        }
    }
}

/// Load, guard, select and report; deletes through `tool` only in execute
/// mode. External step failures never turn into an `Err`.
pub fn run_workflow<T: StackTool + ?Sized>(
    config: &Config,
    tool: &T,
) -> anyhow::Result<RunOutcome> {
    let lines = load_lines(&config.input_path)
        .with_context(|| format!("loading stack list from {}", config.input_path.display()))?;

    let selection = match select_stacks(&lines) {
        SelectOutcome::MissingMarker => {
            println!("First line does not contain '{GUARD_MARKER}'. Exiting.");
            return Ok(RunOutcome::MissingMarker);
        }
        SelectOutcome::NoStacks => {
            println!("No stack names found.");
            return Ok(RunOutcome::NoStacks);
        }
        SelectOutcome::Found(selection) => selection,
    };

    let report = SelectionReport::new(&selection, &config.prefix, config.mode);
    if config.raw {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        report.print();
    }

    if config.mode == RunMode::DryRun {
        println!("\nDry run mode (no deletions performed). Use --execute to delete.");
        return Ok(RunOutcome::DryRun(selection));
    }

    Ok(RunOutcome::Executed(delete_stacks(tool, &report.targets)))
}
