// src/errors/report.rs
//! Rendering utilities for miette diagnostics.

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, ThemeCharacters, ThemeStyles};
use std::io::Write as IoWrite;

/// Create a handler for terminal output (unicode + colors).
pub fn terminal_handler() -> GraphicalReportHandler {
    let theme = GraphicalTheme {
        characters: ThemeCharacters::unicode(),
        styles: ThemeStyles::ansi(),
    };
    GraphicalReportHandler::new_themed(theme)
}

/// Create a handler for plain output (ascii + no colors).
pub fn plain_handler() -> GraphicalReportHandler {
    let theme = GraphicalTheme {
        characters: ThemeCharacters::ascii(),
        styles: ThemeStyles::none(),
    };
    GraphicalReportHandler::new_themed(theme)
}

/// Render to stderr with unicode/colors.
pub fn render_to_stderr(report: &dyn Diagnostic) {
    let handler = terminal_handler();
    let mut output = String::new();
    if handler.render_report(&mut output, report).is_ok() {
        eprint!("{}", output);
    }
}

/// Render to a buffer without colors.
pub fn render_to_string(report: &dyn Diagnostic) -> String {
    let mut output = String::new();
    let handler = plain_handler();
    let _ = handler.render_report(&mut output, report);
    output
}

/// Render to any Write impl, with or without colors.
pub fn render_to_writer<W: IoWrite>(
    report: &dyn Diagnostic,
    mut writer: W,
    color: bool,
) -> std::io::Result<()> {
    let output = if color {
        let mut output = String::new();
        let _ = terminal_handler().render_report(&mut output, report);
        output
    } else {
        render_to_string(report)
    };
    writer.write_all(output.as_bytes())
}
