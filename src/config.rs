use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub const DEFAULT_INPUT_FILE: &str = "in.txt";
pub const DEFAULT_PULUMI_BIN: &str = "pulumi";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    #[default]
    DryRun,
    Execute,
}

impl RunMode {
    pub fn from_execute_flag(execute: bool) -> Self {
        if execute {
            RunMode::Execute
        } else {
            RunMode::DryRun
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::DryRun => f.write_str("dry-run"),
            RunMode::Execute => f.write_str("execute"),
        }
    }
}

/// Org/project prefix joined in front of every stack name.
///
/// A non-empty prefix always ends with exactly the `/` the caller supplied
/// or the one appended here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackPrefix(Option<String>);

impl StackPrefix {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return StackPrefix(None);
        }

        if trimmed.ends_with('/') {
            StackPrefix(Some(trimmed.to_string()))
        } else {
            StackPrefix(Some(format!("{trimmed}/")))
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn qualify(&self, name: &str) -> String {
        match &self.0 {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    pub prefix: StackPrefix,
    pub mode: RunMode,
    pub pulumi_bin: PathBuf,
    pub raw: bool,
}

impl Config {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            prefix: StackPrefix::default(),
            mode: RunMode::default(),
            pulumi_bin: PathBuf::from(DEFAULT_PULUMI_BIN),
            raw: false,
        }
    }
}

/// `in.txt` next to the running binary, or in the working directory when
/// the binary location is unknown.
pub fn default_input_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .map(|dir| dir.join(DEFAULT_INPUT_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_FILE))
}
