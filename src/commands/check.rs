// src/commands/check.rs

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::common::{load_config, render_with_source};
use crate::cli::{ColorMode, expand_paths};
use crate::config::EngineConfig;
use crate::meta::load::load_str;
use crate::policy::PolicyChecker;

/// Totals over every checked file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Files that could not be read or loaded.
    pub load_failures: usize,
}

impl CheckOutcome {
    pub fn failed(&self) -> bool {
        self.errors > 0 || self.load_failures > 0
    }
}

/// Run the policy rules over graph files.
pub fn check_files(
    patterns: &[String],
    config_path: Option<&Path>,
    color_mode: ColorMode,
) -> ExitCode {
    let color = color_mode.enabled();
    let mut stderr = std::io::stderr();
    let Some(config) = load_config(config_path, &mut stderr, color) else {
        return ExitCode::FAILURE;
    };

    let files = match expand_paths(patterns) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if files.is_empty() {
        eprintln!("error: no .toml graph files found");
        return ExitCode::FAILURE;
    }

    let outcome = check_paths(&files, &config, &mut stderr, color);
    if outcome.failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Check each file independently, rendering diagnostics and a summary to `w`.
pub fn check_paths(
    files: &[PathBuf],
    config: &EngineConfig,
    w: &mut dyn Write,
    color: bool,
) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();
    for path in files {
        outcome.files += 1;
        let _span = tracing::info_span!("check", file = %path.display()).entered();
        if !check_single_file(path, config, w, color, &mut outcome) {
            outcome.load_failures += 1;
        }
    }
    let _ = writeln!(
        w,
        "checked {} file(s): {} error(s), {} warning(s)",
        outcome.files, outcome.errors, outcome.warnings
    );
    outcome
}

/// Returns false if the file could not be loaded.
fn check_single_file(
    path: &Path,
    config: &EngineConfig,
    w: &mut dyn Write,
    color: bool,
    outcome: &mut CheckOutcome,
) -> bool {
    let file_path = path.to_string_lossy();
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let _ = writeln!(w, "error: could not read '{}': {}", file_path, e);
            return false;
        }
    };

    let table = match load_str(&source, config) {
        Ok(table) => table,
        Err(err) => {
            render_with_source(err.with_file(&file_path), &file_path, &source, w, color);
            return false;
        }
    };

    let mut diagnostics = Vec::new();
    let summary = PolicyChecker::new(&table, config).check(&mut diagnostics);
    outcome.errors += summary.errors;
    outcome.warnings += summary.warnings;
    for diagnostic in diagnostics {
        render_with_source(diagnostic, &file_path, &source, w, color);
    }
    if summary.trusted_provider {
        let _ = writeln!(
            w,
            "note: {} grants internals access to '{}'",
            file_path, config.provider_identity
        );
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const OPS: &str = r#"
[[types]]
name = "Num.Base"
kind = "interface"

[[types]]
name = "Num.Ops"
kind = "interface"
attributes = ["conform.Static"]
interfaces = ["Num.Base"]
"#;

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn reports_violations_with_codes() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "ops.toml", OPS);
        let mut out = Vec::new();
        let outcome = check_paths(&[file], &EngineConfig::default(), &mut out, false);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(outcome.errors, 1);
        assert!(outcome.failed());
        assert!(text.contains("SI0004"), "{text}");
        assert!(text.contains("checked 1 file(s): 1 error(s)"), "{text}");
    }

    #[test]
    fn clean_graph_passes() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "ok.toml", "[[types]]\nname = \"App.Thing\"\n");
        let mut out = Vec::new();
        let outcome = check_paths(&[file], &EngineConfig::default(), &mut out, false);
        assert!(!outcome.failed());
    }

    #[test]
    fn load_failures_fail_the_run() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "bad.toml", "[[types]\n");
        let mut out = Vec::new();
        let outcome = check_paths(&[file], &EngineConfig::default(), &mut out, false);
        assert_eq!(outcome.load_failures, 1);
        assert!(String::from_utf8(out).unwrap().contains("L0002"));
    }
}
