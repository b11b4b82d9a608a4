// src/lib.rs
pub mod adapter;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod identity;
pub mod matching;
pub mod meta;
pub mod oracle;
pub mod policy;
pub mod runtime;

pub use adapter::{Adapter, AdapterRegistry, AdapterShape};
pub use config::EngineConfig;
pub use errors::{AdapterError, InvokeError, LoadError, PolicyDiagnostic};
pub use matching::{CapabilitySet, MatchMode, Resolution, ResolutionFailure, Resolver};
pub use meta::{MetadataProvider, SymbolTable, TypeRef};
pub use oracle::ComplianceOracle;
pub use policy::{CheckSummary, DiagnosticSink, PolicyChecker};
pub use runtime::{Call, NativeRegistry, Object, ObjectRef, Value};
