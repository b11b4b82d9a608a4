// src/policy/mod.rs
//! Static policy pass over a declared symbol graph.
//!
//! Re-derives the invariants adapter synthesis relies on and reports each
//! violation through a `DiagnosticSink`. The pass never stops early.

mod rules;
pub mod sink;

pub use sink::{CountingSink, DiagnosticSink};

use crate::config::EngineConfig;
use crate::identity::{NamespaceId, TypeDefId};
use crate::matching::capability::is_static_capability;
use crate::meta::MetadataProvider;
use rules::RuleContext;

/// Outcome of one policy pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckSummary {
    /// The program assembly grants internals visibility to the adapter provider.
    pub trusted_provider: bool,
    pub types_visited: usize,
    pub errors: usize,
    pub warnings: usize,
}

pub struct PolicyChecker<'m, M: MetadataProvider + ?Sized> {
    meta: &'m M,
    config: &'m EngineConfig,
}

impl<'m, M: MetadataProvider + ?Sized> PolicyChecker<'m, M> {
    pub fn new(meta: &'m M, config: &'m EngineConfig) -> Self {
        Self { meta, config }
    }

    /// Check every program type reachable from the namespace tree.
    #[tracing::instrument(skip_all)]
    pub fn check(&self, sink: &mut dyn DiagnosticSink) -> CheckSummary {
        let cx = RuleContext {
            meta: self.meta,
            config: self.config,
            marker: self.meta.lookup_type(&self.config.adapter_marker),
        };
        let mut types = Vec::new();
        self.collect_namespace(self.meta.root_namespace(), &mut types);

        let mut counting = CountingSink::new(sink);
        for def in &types {
            if is_static_capability(self.meta, *def, self.config) {
                rules::check_static_capability(&cx, *def, &mut counting);
            } else {
                rules::check_implementor(&cx, *def, &mut counting);
            }
        }

        let program = self.meta.program_assembly();
        let summary = CheckSummary {
            trusted_provider: self
                .meta
                .grants_provider_access(program, &self.config.provider_identity),
            types_visited: types.len(),
            errors: counting.errors,
            warnings: counting.warnings,
        };
        tracing::debug!(
            types = summary.types_visited,
            errors = summary.errors,
            trusted_provider = summary.trusted_provider,
            "policy pass complete"
        );
        summary
    }

    fn collect_namespace(&self, ns: NamespaceId, out: &mut Vec<TypeDefId>) {
        let def = self.meta.namespace(ns);
        for ty in &def.types {
            self.collect_type(*ty, out);
        }
        for child in &def.children {
            self.collect_namespace(*child, out);
        }
    }

    fn collect_type(&self, ty: TypeDefId, out: &mut Vec<TypeDefId>) {
        let def = self.meta.type_def(ty);
        if def.assembly != self.meta.program_assembly() {
            return;
        }
        out.push(ty);
        for nested in &def.nested {
            self.collect_type(*nested, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PolicyDiagnostic;
    use crate::meta::{Attribute, MemberBuilder, SymbolTable, TypeDefKind, TypeRef};

    fn static_iface(table: &mut SymbolTable, name: &str) -> TypeDefId {
        let id = table.declare_type(name, TypeDefKind::Interface);
        table.add_attribute(id, Attribute::new("conform.Static"));
        id
    }

    fn run(table: &SymbolTable) -> (CheckSummary, Vec<PolicyDiagnostic>) {
        let config = EngineConfig::default();
        let mut diagnostics = Vec::new();
        let summary = PolicyChecker::new(table, &config).check(&mut diagnostics);
        (summary, diagnostics)
    }

    #[test]
    fn direct_implementation_is_forbidden() {
        let mut table = SymbolTable::new();
        let ops = static_iface(&mut table, "Num.Ops");
        let imp = table.declare_type("Num.IntOps", TypeDefKind::Class);
        table.add_interface(imp, TypeRef::named(ops));
        let (summary, diagnostics) = run(&table);
        assert_eq!(summary.errors, 1);
        assert!(matches!(
            diagnostics[0],
            PolicyDiagnostic::DirectImplementationForbidden { .. }
        ));
    }

    #[test]
    fn marker_argument_must_be_static() {
        let mut table = SymbolTable::new();
        let plain = table.declare_type("Num.Plain", TypeDefKind::Interface);
        let imp = table.declare_type("Num.Impl", TypeDefKind::Class);
        table.add_interface(imp, table.marker_for(TypeRef::named(plain)));
        let (_, diagnostics) = run(&table);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id(), "SI0002");
    }

    #[test]
    fn error_placeholders_are_skipped() {
        let mut table = SymbolTable::new();
        let ops = static_iface(&mut table, "Num.Ops");
        table.add_interface(ops, TypeRef::Error);
        let imp = table.declare_type("Num.Impl", TypeDefKind::Class);
        table.add_interface(imp, table.marker_for(TypeRef::Error));
        let (summary, diagnostics) = run(&table);
        assert!(diagnostics.is_empty());
        assert_eq!(summary.types_visited, 2);
    }

    #[test]
    fn static_indexers_are_reported_at_the_member() {
        let mut table = SymbolTable::new();
        let int = table.primitive("int");
        let ops = static_iface(&mut table, "Num.Ops");
        table.add_member(
            ops,
            MemberBuilder::indexer(int.clone())
                .param("i", int)
                .span((40, 8).into()),
        );
        let (_, diagnostics) = run(&table);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id(), "SI0005");
        assert_eq!(diagnostics[0].span(), miette::SourceSpan::from((40, 8)));
    }

    #[test]
    fn static_members_may_come_from_a_base() {
        let mut table = SymbolTable::new();
        let int = table.primitive("int");
        let ops = static_iface(&mut table, "Num.Ops");
        table.add_member(ops, MemberBuilder::method("zero").returns(int.clone()));
        let base = table.declare_type("Num.Base", TypeDefKind::Class);
        table.add_member(
            base,
            MemberBuilder::method("zero").returns(int).static_member(),
        );
        let imp = table.declare_type("Num.Impl", TypeDefKind::Class);
        table.set_base(imp, TypeRef::named(base));
        table.add_interface(imp, table.marker_for(TypeRef::named(ops)));
        let (summary, diagnostics) = run(&table);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(summary.types_visited, 3);
    }

    #[test]
    fn nested_types_are_visited_and_trust_is_reported() {
        let mut table = SymbolTable::new();
        let ops = static_iface(&mut table, "Num.Ops");
        let outer = table.declare_type("App.Outer", TypeDefKind::Class);
        let inner = table.declare_nested_type(outer, "Inner", TypeDefKind::Class);
        table.add_interface(inner, TypeRef::named(ops));
        let program = table.program_assembly();
        table.add_assembly_attribute(
            program,
            Attribute::new("InternalsVisibleTo").with_arg("conform.adapters"),
        );
        let (summary, diagnostics) = run(&table);
        assert_eq!(diagnostics.len(), 1);
        assert!(summary.trusted_provider);
    }
}
