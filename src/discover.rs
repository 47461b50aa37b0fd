//! Resolve command-line paths into the list of source units to process.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Expand files, directories and glob patterns into a sorted, deduplicated
/// file list.
///
/// Files named directly are taken as-is. Directories are walked
/// recursively and filtered by `extensions`. Anything else is tried as a
/// glob pattern; a pattern that matches nothing only warns, but a plain
/// path that does not exist is an error.
pub fn collect_sources(inputs: &[String], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            files.extend(walk_dir(path, extensions)?);
            continue;
        }
        if !is_glob(input) {
            bail!("no such file or directory: {}", input);
        }

        let matches: Vec<_> = glob::glob(input)
            .with_context(|| format!("invalid glob pattern: {}", input))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!(pattern = %input, "no files matched");
        }
        files.extend(matches);
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_dir(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry =
            entry.with_context(|| format!("failed to read directory: {}", root.display()))?;
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.trim_start_matches('.') == ext))
}

fn is_glob(input: &str) -> bool {
    input.contains(['*', '?', '['])
}
