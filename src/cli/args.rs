// src/cli/args.rs

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::commands::version::version_string;

/// Color output mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorMode {
    /// Whether diagnostics written to stderr should be colored.
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
            }
        }
    }
}

/// Structural capability checker
#[derive(Parser)]
#[command(name = "conform")]
#[command(version = version_string())]
#[command(about = "Structural capability matching and static policy checks", long_about = None)]
pub struct Cli {
    /// Color output: auto, always, never
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Engine configuration file (defaults to ./conform.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the static policy rules over symbol graph files
    #[command(visible_alias = "c")]
    Check {
        /// Graph files, directories, or glob patterns
        #[arg(value_name = "PATHS", required = true)]
        paths: Vec<String>,
    },
    /// Resolve a capability against a candidate type and print the result
    #[command(visible_alias = "r")]
    Resolve {
        /// Symbol graph file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Full name of the capability interface
        #[arg(long, value_name = "NAME")]
        capability: String,

        /// Full name of the candidate type
        #[arg(long, value_name = "NAME")]
        candidate: String,

        /// Match static members instead of instance members
        #[arg(long = "static")]
        is_static: bool,
    },
    /// Show version information
    Version,
}
