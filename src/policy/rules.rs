// src/policy/rules.rs
//! The five static capability rules, applied to one type at a time.

use super::sink::DiagnosticSink;
use crate::config::EngineConfig;
use crate::errors::PolicyDiagnostic;
use crate::identity::TypeDefId;
use crate::matching::capability::is_static_capability;
use crate::matching::{CapabilitySet, MatchMode, Resolver};
use crate::meta::display::{member_signature, type_name};
use crate::meta::{MetadataProvider, TypeRef, Visibility};

pub(crate) struct RuleContext<'a, M: MetadataProvider + ?Sized> {
    pub meta: &'a M,
    pub config: &'a EngineConfig,
    /// The adapter marker definition, if the table has one.
    pub marker: Option<TypeDefId>,
}

impl<M: MetadataProvider + ?Sized> RuleContext<'_, M> {
    fn is_static(&self, ty: &TypeRef) -> bool {
        ty.def_id()
            .is_some_and(|def| is_static_capability(self.meta, def, self.config))
    }

    fn marker_name(&self) -> &str {
        &self.config.adapter_marker
    }
}

/// R4 and R5, for a static capability interface.
pub(crate) fn check_static_capability<M: MetadataProvider + ?Sized>(
    cx: &RuleContext<'_, M>,
    def: TypeDefId,
    sink: &mut dyn DiagnosticSink,
) {
    let ty = cx.meta.type_def(def);
    for parent in &ty.interfaces {
        if parent.contains_error() || cx.is_static(parent) {
            continue;
        }
        sink.report(PolicyDiagnostic::StaticCannotInheritNonStatic {
            capability: ty.full_name.clone(),
            parent: type_name(cx.meta, parent),
            span: ty.span,
        });
    }
    for member in cx.meta.members_of(def) {
        if member.is_indexer {
            sink.report(PolicyDiagnostic::StaticCannotContainIndexer {
                capability: ty.full_name.clone(),
                span: member.span,
            });
        }
    }
}

/// R1, R2 and R3, for any other type.
pub(crate) fn check_implementor<M: MetadataProvider + ?Sized>(
    cx: &RuleContext<'_, M>,
    def: TypeDefId,
    sink: &mut dyn DiagnosticSink,
) {
    let ty = cx.meta.type_def(def);
    for iface in &ty.interfaces {
        let is_marker = cx.marker.is_some() && iface.def_id() == cx.marker;
        if !is_marker {
            if cx.is_static(iface) {
                sink.report(PolicyDiagnostic::DirectImplementationForbidden {
                    ty: ty.full_name.clone(),
                    capability: type_name(cx.meta, iface),
                    marker: cx.marker_name().to_string(),
                    span: ty.span,
                });
            }
            continue;
        }

        let [argument] = iface.args() else { continue };
        if argument.contains_error() {
            continue;
        }
        if !cx.is_static(argument) {
            sink.report(PolicyDiagnostic::TypeParameterMustBeStaticCapability {
                ty: ty.full_name.clone(),
                marker: cx.marker_name().to_string(),
                argument: type_name(cx.meta, argument),
                span: ty.span,
            });
            continue;
        }
        check_static_members(cx, def, argument, sink);
    }
}

/// R3: every ordinary member of `capability` needs a public static match on
/// `def` or one of its bases.
fn check_static_members<M: MetadataProvider + ?Sized>(
    cx: &RuleContext<'_, M>,
    def: TypeDefId,
    capability: &TypeRef,
    sink: &mut dyn DiagnosticSink,
) {
    let Ok(cap) = CapabilitySet::from_type(cx.meta, capability, cx.config) else {
        return;
    };
    let ty = cx.meta.type_def(def);
    let chain = cx.meta.ancestors(&TypeRef::named(def));
    let resolver = Resolver::new(cx.meta, cx.config);
    for member in cap.members.iter().filter(|m| m.is_ordinary()) {
        let found = resolver.find_member(member, &chain, MatchMode::Static, |m| {
            m.visibility == Visibility::Public
        });
        if found.is_none() {
            sink.report(PolicyDiagnostic::MissingStaticMember {
                ty: ty.full_name.clone(),
                capability: cap.name.clone(),
                member: member_signature(cx.meta, member),
                span: ty.span,
            });
        }
    }
}
