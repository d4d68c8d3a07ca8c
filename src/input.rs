use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Token the first line of a stack list must carry before anything in it
/// is considered for deletion.
pub const GUARD_MARKER: &str = "remote-make";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("file not found -> {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("reading stack list at {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads the stack list, trimming every line and dropping the blank ones.
pub fn load_lines(path: &Path) -> Result<Vec<String>, InputError> {
    if !path.is_file() {
        return Err(InputError::FileNotFound(path.to_path_buf()));
    }

    let data = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

pub fn has_guard_marker(lines: &[String]) -> bool {
    lines
        .first()
        .is_some_and(|first| first.contains(GUARD_MARKER))
}
