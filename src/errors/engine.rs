// src/errors/engine.rs
//! Adapter building and invocation faults (C0xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::Diagnostic;
use thiserror::Error;

use crate::matching::MatchMode;

/// Faults raised while building adapters or answering nominal queries.
///
/// Every variant names the capability set and the candidate type so a failure
/// can be diagnosed without re-running resolution.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("'{name}' is not an interface")]
    #[diagnostic(code(C0001), help("capability sets must be interface-shaped"))]
    NotAnInterface { name: String },

    #[error("capability '{capability}' is {actual}; cannot build an adapter for it in {requested} mode")]
    #[diagnostic(code(C0002))]
    WrongCapabilityKind {
        capability: String,
        requested: MatchMode,
        actual: MatchMode,
    },

    #[error("'{candidate}' does not provide {member} required by '{capability}'")]
    #[diagnostic(code(C0003))]
    MissingMember {
        capability: String,
        candidate: String,
        member: String,
    },

    #[error(
        "{member} on '{candidate}' takes {count} parameters; adapters for '{capability}' forward at most {limit}"
    )]
    #[diagnostic(code(C0004))]
    ArityExceeded {
        capability: String,
        candidate: String,
        member: String,
        count: usize,
        limit: u8,
    },

    #[error("'{candidate}' does not declare {marker} for '{capability}'")]
    #[diagnostic(
        code(C0005),
        help("list the adapter marker among the type's interfaces")
    )]
    NotAnImplementation {
        capability: String,
        candidate: String,
        marker: String,
    },

    #[error("instance of '{actual}' cannot be adapted as '{declared}'")]
    #[diagnostic(code(C0006))]
    NotInstanceOf { declared: String, actual: String },

    #[error("unknown type '{name}'")]
    #[diagnostic(code(C0007))]
    UnknownType { name: String },

    #[error("{member} resolved for '{capability}' on '{candidate}' has no native body")]
    #[diagnostic(
        code(C0008),
        help("register an implementation for the member in the native registry")
    )]
    Unbound {
        capability: String,
        candidate: String,
        member: String,
    },
}

impl AdapterError {
    /// True for faults that mean "the candidate does not conform", as opposed
    /// to usage errors.
    pub fn is_nonconformance(&self) -> bool {
        matches!(
            self,
            AdapterError::MissingMember { .. }
                | AdapterError::ArityExceeded { .. }
                | AdapterError::NotAnImplementation { .. }
        )
    }
}

/// Faults raised while calling through an adapter.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum InvokeError {
    #[error("adapter for '{capability}' has no {kind} '{name}' taking {arity} argument(s)")]
    #[diagnostic(code(C0101))]
    UnknownMember {
        capability: String,
        kind: &'static str,
        name: String,
        arity: usize,
    },

    #[error("{member} expects {expected} generic argument(s), got {found}")]
    #[diagnostic(code(C0102))]
    GenericArity {
        member: String,
        expected: usize,
        found: usize,
    },

    #[error("{member} failed: {message}")]
    #[diagnostic(code(C0103))]
    Native { member: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_member_message_names_everything() {
        let err = AdapterError::MissingMember {
            capability: "Geo.Shape".to_string(),
            candidate: "Geo.Square".to_string(),
            member: "Geo.Shape.area(): double".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("Geo.Shape.area(): double"));
        assert!(text.contains("Geo.Square"));
        assert!(err.is_nonconformance());
    }

    #[test]
    fn usage_errors_are_not_nonconformance() {
        let err = AdapterError::WrongCapabilityKind {
            capability: "Num.Parser<int>".to_string(),
            requested: MatchMode::Instance,
            actual: MatchMode::Static,
        };
        assert!(!err.is_nonconformance());
        assert_eq!(
            err.to_string(),
            "capability 'Num.Parser<int>' is static; cannot build an adapter for it in instance mode"
        );
    }
}
