// src/policy/sink.rs

use crate::errors::{PolicyDiagnostic, Severity};

/// Receiver for diagnostics produced by the policy pass.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: PolicyDiagnostic);
}

impl DiagnosticSink for Vec<PolicyDiagnostic> {
    fn report(&mut self, diagnostic: PolicyDiagnostic) {
        self.push(diagnostic);
    }
}

/// Wraps another sink and tallies what passes through by severity.
pub struct CountingSink<'s> {
    inner: &'s mut dyn DiagnosticSink,
    pub errors: usize,
    pub warnings: usize,
}

impl<'s> CountingSink<'s> {
    pub fn new(inner: &'s mut dyn DiagnosticSink) -> Self {
        Self {
            inner,
            errors: 0,
            warnings: 0,
        }
    }
}

impl DiagnosticSink for CountingSink<'_> {
    fn report(&mut self, diagnostic: PolicyDiagnostic) {
        match diagnostic.severity() {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Note => {}
        }
        tracing::trace!(rule = %diagnostic.rule_id(), "policy violation");
        self.inner.report(diagnostic);
    }
}
