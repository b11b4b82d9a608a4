// src/cli/paths.rs
//
// Path expansion for commands that take symbol graph files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::glob;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("error reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Expand file paths, directories and glob patterns into `.toml` graph files.
///
/// Explicit files keep their input order and are accepted whatever their
/// extension; directory and glob matches are restricted to `.toml`, sorted,
/// and appended. Duplicates are dropped. An empty result is not an error.
pub fn expand_paths(patterns: &[String]) -> Result<Vec<PathBuf>, PathError> {
    let mut explicit = Vec::new();
    let mut matched = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for pattern in patterns {
        let path = PathBuf::from(pattern);
        if path.is_file() {
            add_unique(path, &mut explicit, &mut seen);
        } else if path.is_dir() {
            expand_glob(&format!("{pattern}/**/*.toml"), &mut matched, &mut seen)?;
        } else {
            expand_glob(pattern, &mut matched, &mut seen)?;
        }
    }

    explicit.extend(matched);
    Ok(explicit)
}

fn expand_glob(
    pattern: &str,
    files: &mut Vec<PathBuf>,
    seen: &mut HashSet<PathBuf>,
) -> Result<(), PathError> {
    let entries = glob(pattern).map_err(|e| PathError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.msg.to_string(),
    })?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PathError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() && is_graph_file(&path) {
            found.push(path);
        }
    }
    found.sort();
    for path in found {
        add_unique(path, files, seen);
    }
    Ok(())
}

fn add_unique(path: PathBuf, files: &mut Vec<PathBuf>, seen: &mut HashSet<PathBuf>) {
    let key = path.canonicalize().unwrap_or_else(|_| path.clone());
    if seen.insert(key) {
        files.push(path);
    }
}

fn is_graph_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "# graph").unwrap();
        path
    }

    #[test]
    fn expands_directories_recursively() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "b.toml");
        create_file(dir.path(), "a.toml");
        create_file(dir.path(), "sub/c.toml");
        create_file(dir.path(), "notes.txt");

        let files = expand_paths(&[dir.path().to_string_lossy().to_string()]).unwrap();
        assert_eq!(files.len(), 3);
        let names: Vec<_> = files.iter().map(|p| p.to_path_buf()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn explicit_files_are_kept_once() {
        let dir = TempDir::new().unwrap();
        let file = create_file(dir.path(), "graph.toml");
        let text = file.to_string_lossy().to_string();
        let files = expand_paths(&[text.clone(), text]).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn glob_patterns_filter_by_extension() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "one.toml");
        create_file(dir.path(), "two.json");
        let files = expand_paths(&[format!("{}/*", dir.path().display())]).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let result = expand_paths(&["[invalid".to_string()]);
        assert!(matches!(result, Err(PathError::InvalidPattern { .. })));
    }
}
