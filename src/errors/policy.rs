// src/errors/policy.rs
//! Static policy diagnostics (SI0xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use super::codes::{
    ErrorInfo, POLICY_DIRECT_IMPLEMENTATION, POLICY_MARKER_ARGUMENT,
    POLICY_MISSING_STATIC_MEMBER, POLICY_STATIC_INDEXER, POLICY_STATIC_INHERITS_NON_STATIC,
    Severity,
};

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum PolicyDiagnostic {
    #[error("'{ty}' cannot implement static capability '{capability}' directly")]
    #[diagnostic(code(SI0001), help("implement {marker}<{capability}> instead"))]
    DirectImplementationForbidden {
        ty: String,
        capability: String,
        marker: String,
        #[label("implements '{capability}'")]
        span: SourceSpan,
    },

    #[error("the type argument of {marker} on '{ty}' must be a static capability, found '{argument}'")]
    #[diagnostic(
        code(SI0002),
        help("use an interface marked with the static attribute")
    )]
    TypeParameterMustBeStaticCapability {
        ty: String,
        marker: String,
        argument: String,
        #[label("declared here")]
        span: SourceSpan,
    },

    #[error("'{ty}' does not implement static capability member {member}")]
    #[diagnostic(
        code(SI0003),
        help("the implementing member must be public and static")
    )]
    MissingStaticMember {
        ty: String,
        capability: String,
        member: String,
        #[label("declared here")]
        span: SourceSpan,
    },

    #[error("static capability '{capability}' cannot inherit from non-static interface '{parent}'")]
    #[diagnostic(code(SI0004))]
    StaticCannotInheritNonStatic {
        capability: String,
        parent: String,
        #[label("declared here")]
        span: SourceSpan,
    },

    #[error("static capability '{capability}' cannot contain an indexer")]
    #[diagnostic(code(SI0005))]
    StaticCannotContainIndexer {
        capability: String,
        #[label("indexer declared here")]
        span: SourceSpan,
    },
}

impl PolicyDiagnostic {
    /// Static metadata (code, title, severity) of the violated rule.
    pub fn info(&self) -> &'static ErrorInfo {
        match self {
            PolicyDiagnostic::DirectImplementationForbidden { .. } => &POLICY_DIRECT_IMPLEMENTATION,
            PolicyDiagnostic::TypeParameterMustBeStaticCapability { .. } => {
                &POLICY_MARKER_ARGUMENT
            }
            PolicyDiagnostic::MissingStaticMember { .. } => &POLICY_MISSING_STATIC_MEMBER,
            PolicyDiagnostic::StaticCannotInheritNonStatic { .. } => {
                &POLICY_STATIC_INHERITS_NON_STATIC
            }
            PolicyDiagnostic::StaticCannotContainIndexer { .. } => &POLICY_STATIC_INDEXER,
        }
    }

    /// Rule id, e.g. "SI0003".
    pub fn rule_id(&self) -> String {
        self.info().code_string()
    }

    pub fn severity(&self) -> Severity {
        self.info().severity
    }

    /// Source location the diagnostic is attached to.
    pub fn span(&self) -> SourceSpan {
        match self {
            PolicyDiagnostic::DirectImplementationForbidden { span, .. }
            | PolicyDiagnostic::TypeParameterMustBeStaticCapability { span, .. }
            | PolicyDiagnostic::MissingStaticMember { span, .. }
            | PolicyDiagnostic::StaticCannotInheritNonStatic { span, .. }
            | PolicyDiagnostic::StaticCannotContainIndexer { span, .. } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_ids_match_diagnostic_codes() {
        let d = PolicyDiagnostic::StaticCannotInheritNonStatic {
            capability: "Ops".to_string(),
            parent: "Base".to_string(),
            span: (4, 3).into(),
        };
        assert_eq!(d.rule_id(), "SI0004");
        assert_eq!(d.code().map(|c| c.to_string()).as_deref(), Some("SI0004"));
        assert_eq!(d.severity(), Severity::Error);
        assert_eq!(d.span(), SourceSpan::from((4, 3)));
    }
}
