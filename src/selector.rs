use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::config::{RunMode, StackPrefix};
use crate::input::has_guard_marker;

static STACK_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(docker-pulumi-node-[a-f0-9-]+|remote-make-worker-[a-f0-9-]+)$")
        .expect("stack name pattern is valid")
});

const DOCKER_NODE_PREFIX: &str = "docker-pulumi-node-";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("'{0}' is not a worker stack name")]
    NotAStackName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StackKind {
    DockerNode,
    RemoteWorker,
}

/// A stack name that passed the worker naming check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StackName(String);

impl StackName {
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        if STACK_NAME.is_match(raw) {
            Ok(StackName(raw.to_string()))
        } else {
            Err(SelectorError::NotAStackName(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> StackKind {
        if self.0.starts_with(DOCKER_NODE_PREFIX) {
            StackKind::DockerNode
        } else {
            StackKind::RemoteWorker
        }
    }
}

impl fmt::Display for StackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub stacks: Vec<StackName>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn targets(&self, prefix: &StackPrefix) -> Vec<String> {
        self.stacks
            .iter()
            .map(|stack| prefix.qualify(stack.as_str()))
            .collect()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    MissingMarker,
    NoStacks,
    Found(Selection),
}

/// Keeps every line that is exactly a worker stack name, in file order.
pub fn select(lines: &[String]) -> Selection {
    Selection {
        stacks: lines
            .iter()
            .filter_map(|line| StackName::parse(line).ok())
            .collect(),
    }
}

pub fn select_stacks(lines: &[String]) -> SelectOutcome {
    if !has_guard_marker(lines) {
        return SelectOutcome::MissingMarker;
    }

    let selection = select(lines);
    if selection.is_empty() {
        SelectOutcome::NoStacks
    } else {
        SelectOutcome::Found(selection)
    }
}

#[derive(Debug, Serialize)]
pub struct SelectionReport {
    pub mode: RunMode,
    pub prefix: Option<String>,
    pub count: usize,
    pub targets: Vec<String>,
}

impl SelectionReport {
    pub fn new(selection: &Selection, prefix: &StackPrefix, mode: RunMode) -> Self {
        Self {
            mode,
            prefix: prefix.as_str().map(str::to_string),
            count: selection.len(),
            targets: selection.targets(prefix),
        }
    }

    pub fn print(&self) {
        println!("Found {} stacks:", self.count);
        for target in &self.targets {
            println!(" - {target}");
        }
    }
}
