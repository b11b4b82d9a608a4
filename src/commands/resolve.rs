// src/commands/resolve.rs

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use super::common::{load_config, render_load_error, render_plain};
use crate::cli::ColorMode;
use crate::config::EngineConfig;
use crate::errors::AdapterError;
use crate::matching::{CapabilitySet, MatchMode, Resolver};
use crate::meta::display::{member_signature, type_name};
use crate::meta::load::load_file;
use crate::meta::type_expr::{TypeScope, resolve_type};
use crate::meta::{SymbolTable, TypeRef};

pub struct ResolveRequest<'a> {
    pub capability: &'a str,
    pub candidate: &'a str,
    pub mode: MatchMode,
}

/// Load `file` and print how `capability` resolves on `candidate`.
pub fn resolve_in_file(
    file: &Path,
    request: ResolveRequest<'_>,
    config_path: Option<&Path>,
    color_mode: ColorMode,
) -> ExitCode {
    let color = color_mode.enabled();
    let mut stderr = std::io::stderr();
    let Some(config) = load_config(config_path, &mut stderr, color) else {
        return ExitCode::FAILURE;
    };
    let table = match load_file(file, &config) {
        Ok(table) => table,
        Err(err) => {
            render_load_error(err, &mut stderr, color);
            return ExitCode::FAILURE;
        }
    };

    match write_resolution(&table, &config, &request, &mut std::io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            render_plain(&err, &mut stderr, color);
            ExitCode::FAILURE
        }
    }
}

fn named_type(table: &SymbolTable, text: &str) -> Result<TypeRef, AdapterError> {
    let unknown = || AdapterError::UnknownType {
        name: text.to_string(),
    };
    let ty = resolve_type(table, text, &TypeScope::global(), (0, 0).into()).map_err(|_| unknown())?;
    if ty.contains_error() {
        return Err(unknown());
    }
    Ok(ty)
}

/// Write the resolution table, one line per required member.
pub fn write_resolution(
    table: &SymbolTable,
    config: &EngineConfig,
    request: &ResolveRequest<'_>,
    w: &mut dyn Write,
) -> Result<(), AdapterError> {
    let capability = named_type(table, request.capability)?;
    let candidate = named_type(table, request.candidate)?;
    let cap = CapabilitySet::from_type(table, &capability, config)?;
    cap.expect_mode(request.mode)?;

    let resolution = Resolver::new(table, config)
        .resolve(&cap, &candidate, request.mode)
        .map_err(|f| f.into_error(table, &cap, &candidate))?;

    let _ = writeln!(
        w,
        "{} -> {} ({})",
        cap.name,
        type_name(table, &candidate),
        request.mode
    );
    for m in &resolution.matches {
        let _ = writeln!(
            w,
            "  {}  =>  {}  [depth {}]",
            member_signature(table, &m.required),
            member_signature(table, &m.target),
            m.depth
        );
    }
    Ok(())
}
