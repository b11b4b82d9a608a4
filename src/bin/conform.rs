// src/bin/conform.rs

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{ColorChoice, CommandFactory, FromArgMatches};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::time::FormatTime;

use conform::cli::{Cli, Commands};
use conform::commands::check::check_files;
use conform::commands::resolve::{ResolveRequest, resolve_in_file};
use conform::commands::version::print_version;
use conform::matching::MatchMode;

/// A timer that outputs nothing but still enables span timing calculation
struct NoTimestamp;

impl FormatTime for NoTimestamp {
    fn format_time(
        &self,
        _w: &mut tracing_subscriber::fmt::format::Writer<'_>,
    ) -> std::fmt::Result {
        Ok(())
    }
}

fn main() -> ExitCode {
    // CONFORM_LOG_STYLE: "compact" (default) or "full" (with timestamps)
    if let Ok(filter) = EnvFilter::try_from_env("CONFORM_LOG") {
        let style = std::env::var("CONFORM_LOG_STYLE").unwrap_or_default();
        if style == "full" {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_level(true)
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                .with_writer(std::io::stderr)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_level(true)
                .with_timer(NoTimestamp)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(std::io::stderr)
                .init();
        }
        tracing::debug!("tracing initialized");
    }

    let styles = Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default());

    let matches = Cli::command()
        .styles(styles)
        .color(get_color_choice_from_args())
        .get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Check { paths } => check_files(&paths, config, cli.color),
        Commands::Resolve {
            file,
            capability,
            candidate,
            is_static,
        } => {
            let mode = if is_static {
                MatchMode::Static
            } else {
                MatchMode::Instance
            };
            let request = ResolveRequest {
                capability: &capability,
                candidate: &candidate,
                mode,
            };
            resolve_in_file(&file, request, config, cli.color)
        }
        Commands::Version => print_version(),
    }
}

/// Pre-scan command line args so clap's help output respects --color.
fn get_color_choice_from_args() -> ColorChoice {
    let args: Vec<String> = std::env::args().collect();

    for (i, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix("--color=") {
            return parse_color_choice(value);
        }
        if arg == "--color"
            && let Some(value) = args.get(i + 1)
        {
            return parse_color_choice(value);
        }
    }

    if std::env::var_os("NO_COLOR").is_some() {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

fn parse_color_choice(value: &str) -> ColorChoice {
    match value.to_lowercase().as_str() {
        "always" => ColorChoice::Always,
        "never" => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
