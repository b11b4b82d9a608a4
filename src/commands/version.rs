// src/commands/version.rs

use std::process::ExitCode;

use crate::config::EngineConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_string() -> &'static str {
    VERSION
}

pub fn print_version() -> ExitCode {
    let defaults = EngineConfig::default();
    println!("conform {}", version_string());
    println!("adapter provider: {}", defaults.provider_identity);
    println!("static attribute: {}", defaults.static_attribute);
    println!("adapter marker: {}<T>", defaults.adapter_marker);
    ExitCode::SUCCESS
}
