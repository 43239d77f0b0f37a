#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Utility functions for discovering files and moving JSON on and off disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use serde::{Serialize, de::DeserializeOwned};

/// A glob utility function to find paths to files with certain extension,
/// sorted so batch runs are deterministic
///
/// * `extension`: the file extension to find paths for
/// * `search_depth`: how many folders deep to search for
/// * `root_dir`: the root directory where search starts
pub fn find_files(extension: &str, search_depth: i8, root_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pattern = root_dir.to_path_buf();

    for _ in 0..search_depth {
        pattern.push("**");
    }

    pattern.push(format!("*.{extension}"));
    let pattern = pattern
        .to_str()
        .context("Could not convert root_dir to string")?
        .to_string();

    let mut files = glob(&pattern)
        .context("Could not create glob")?
        .filter_map(Result::ok)
        .collect::<Vec<_>>();
    files.sort();

    Ok(files)
}

/// Reads and deserializes a JSON file
pub fn read_json<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    serde_json::from_str(&contents).with_context(|| format!("Could not parse {}", path.display()))
}

/// Serializes a value as pretty-printed JSON and writes it to `path`
pub fn write_json_pretty<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize,
{
    let contents =
        serde_json::to_string_pretty(value).context("Could not serialize value as JSON")?;

    std::fs::write(path, contents).with_context(|| format!("Could not write {}", path.display()))
}
