// src/errors/codes.rs
//! Error codes and metadata for conform.
//!
//! Codes are grouped by prefix:
//! - C0xxx: adapter and resolution faults
//! - L0xxx: symbol graph loading errors
//! - SI0xxx: static policy rules

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// Diagnostic metadata - static definition
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub prefix: &'static str,
    pub code: u16,
    pub title: &'static str,
    pub severity: Severity,
    pub hint: Option<&'static str>,
}

impl ErrorInfo {
    /// Format the code as "SI0001", "C0003", ...
    pub fn code_string(&self) -> String {
        format!("{}{:04}", self.prefix, self.code)
    }
}

// =============================================================================
// Static policy rules (SI0xxx)
// =============================================================================

/// SI0001: a static capability set is listed directly among a type's interfaces
pub const POLICY_DIRECT_IMPLEMENTATION: ErrorInfo = ErrorInfo {
    prefix: "SI",
    code: 1,
    title: "cannot implement static capability directly",
    severity: Severity::Error,
    hint: Some("implement the adapter marker parameterized by the capability instead"),
};

/// SI0002: the adapter marker's argument is not a static capability set
pub const POLICY_MARKER_ARGUMENT: ErrorInfo = ErrorInfo {
    prefix: "SI",
    code: 2,
    title: "adapter marker argument must be a static capability",
    severity: Severity::Error,
    hint: Some("the type argument must be an interface carrying the static attribute"),
};

/// SI0003: a member of the announced static capability has no public static match
pub const POLICY_MISSING_STATIC_MEMBER: ErrorInfo = ErrorInfo {
    prefix: "SI",
    code: 3,
    title: "missing static member",
    severity: Severity::Error,
    hint: Some("the implementing member must be public and static"),
};

/// SI0004: a static capability set extends a non-static interface
pub const POLICY_STATIC_INHERITS_NON_STATIC: ErrorInfo = ErrorInfo {
    prefix: "SI",
    code: 4,
    title: "static capability cannot inherit non-static interface",
    severity: Severity::Error,
    hint: None,
};

/// SI0005: a static capability set declares an indexer
pub const POLICY_STATIC_INDEXER: ErrorInfo = ErrorInfo {
    prefix: "SI",
    code: 5,
    title: "static capability cannot contain an indexer",
    severity: Severity::Error,
    hint: None,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_codes_are_stable() {
        assert_eq!(POLICY_DIRECT_IMPLEMENTATION.code_string(), "SI0001");
        assert_eq!(POLICY_MARKER_ARGUMENT.code_string(), "SI0002");
        assert_eq!(POLICY_MISSING_STATIC_MEMBER.code_string(), "SI0003");
        assert_eq!(POLICY_STATIC_INHERITS_NON_STATIC.code_string(), "SI0004");
        assert_eq!(POLICY_STATIC_INDEXER.code_string(), "SI0005");
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
