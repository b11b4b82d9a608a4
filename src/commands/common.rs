// src/commands/common.rs
//
// Helpers shared by the commands: configuration loading and diagnostic rendering.

use std::io::Write;
use std::path::Path;

use miette::{Diagnostic, NamedSource};

use crate::config::EngineConfig;
use crate::errors::{LoadError, render_to_writer};

/// Render a diagnostic, attaching `source` so labels point into the file.
pub fn render_with_source<D>(
    diagnostic: D,
    file_path: &str,
    source: &str,
    w: &mut dyn Write,
    color: bool,
) where
    D: Diagnostic + Send + Sync + 'static,
{
    let report = miette::Report::new(diagnostic)
        .with_source_code(NamedSource::new(file_path, source.to_string()));
    let _ = render_to_writer(&*report, &mut *w, color);
}

/// Render a diagnostic that has no source text.
pub fn render_plain<D: Diagnostic>(diagnostic: &D, w: &mut dyn Write, color: bool) {
    let _ = render_to_writer(diagnostic, &mut *w, color);
}

/// Load the engine configuration, rendering any failure to `w`.
pub fn load_config(path: Option<&Path>, w: &mut dyn Write, color: bool) -> Option<EngineConfig> {
    match EngineConfig::discover(path) {
        Ok(config) => Some(config),
        Err(err) => {
            render_load_error(err, w, color);
            None
        }
    }
}

/// Render a load error; TOML errors get their file's text attached when readable.
pub fn render_load_error(err: LoadError, w: &mut dyn Write, color: bool) {
    let source = match &err {
        LoadError::Toml { file, .. } => std::fs::read_to_string(file)
            .ok()
            .map(|text| (file.clone(), text)),
        _ => None,
    };
    match source {
        Some((file, text)) => render_with_source(err, &file, &text, w, color),
        None => render_plain(&err, w, color),
    }
}
