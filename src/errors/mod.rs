// src/errors/mod.rs
//! Structured error reporting for conform.
//!
//! Faults (adapter building, invocation, loading) and policy diagnostics are
//! all miette diagnostics with stable codes.

pub mod codes;
pub mod engine;
pub mod load;
pub mod policy;
pub mod report;

pub use codes::{ErrorInfo, Severity};
pub use engine::{AdapterError, InvokeError};
pub use load::LoadError;
pub use policy::PolicyDiagnostic;
pub use report::{render_to_stderr, render_to_string, render_to_writer};
