// src/errors/load.rs
//! Symbol graph and configuration loading errors (L0xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use std::io;
use std::path::PathBuf;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum LoadError {
    #[error("could not read '{}'", .path.display())]
    #[diagnostic(code(L0001))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid document {file}: {message}")]
    #[diagnostic(code(L0002))]
    Toml {
        file: String,
        message: String,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("invalid type expression '{text}': {reason}")]
    #[diagnostic(code(L0003))]
    TypeExpr {
        text: String,
        reason: String,
        #[label("in this declaration")]
        span: SourceSpan,
    },

    #[error("type '{name}' is declared more than once")]
    #[diagnostic(code(L0004))]
    DuplicateType {
        name: String,
        #[label("duplicate declaration")]
        span: SourceSpan,
    },

    #[error("'{name}' cannot be nested in unknown type '{outer}'")]
    #[diagnostic(code(L0005))]
    UnknownOuterType {
        name: String,
        outer: String,
        #[label("declared here")]
        span: SourceSpan,
    },

    #[error("invalid declaration: {message}")]
    #[diagnostic(code(L0006))]
    Invalid {
        message: String,
        #[label("here")]
        span: SourceSpan,
    },
}

impl LoadError {
    /// Convert a TOML deserialization failure of in-memory text.
    pub fn from_toml(error: toml::de::Error) -> Self {
        LoadError::Toml {
            file: "<input>".to_string(),
            message: error.message().to_string(),
            span: error.span().map(SourceSpan::from),
        }
    }

    /// Attach a file name to errors that were produced from in-memory text.
    pub fn with_file(self, name: &str) -> Self {
        match self {
            LoadError::Toml { message, span, .. } => LoadError::Toml {
                file: name.to_string(),
                message,
                span,
            },
            other => other,
        }
    }
}
