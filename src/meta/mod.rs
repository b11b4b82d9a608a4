// src/meta/mod.rs
//! Symbol-table abstraction consumed by the resolver and the policy checker.
//!
//! `MetadataProvider` is the read-only view a host exposes: type definitions,
//! their locally declared members, base types, implemented interfaces and
//! attributes. `SymbolTable` is the in-process implementation, filled either
//! programmatically (see `builder`) or from a TOML graph (see `load`).

pub mod builder;
pub mod display;
pub mod load;
pub mod members;
pub mod symbol_table;
pub mod type_expr;
pub mod types;

pub use builder::MemberBuilder;
pub use members::{MemberDef, MemberKind, MethodKind, ParamDef, RefKind, Visibility};
pub use symbol_table::{AssemblyDef, Attribute, NamespaceDef, SymbolTable, TypeDef, TypeDefKind};
pub use types::{GenericParamDef, GenericParamRef, ParamOwner, TypeRef, Variance};

use rustc_hash::FxHashSet;

use crate::config::INTERNALS_VISIBLE_TO;
use crate::identity::{AssemblyId, MemberId, NamespaceId, TypeDefId};

pub trait MetadataProvider {
    fn type_def(&self, id: TypeDefId) -> &TypeDef;

    fn member(&self, id: MemberId) -> &MemberDef;

    fn namespace(&self, id: NamespaceId) -> &NamespaceDef;

    fn assembly(&self, id: AssemblyId) -> &AssemblyDef;

    /// Look up a type by full name (`Namespace.Name`).
    fn lookup_type(&self, full_name: &str) -> Option<TypeDefId>;

    /// The unnamed global namespace every other namespace descends from.
    fn root_namespace(&self) -> NamespaceId;

    /// The assembly whose declarations make up the program being analyzed.
    fn program_assembly(&self) -> AssemblyId;

    /// Members declared directly on `id` (inherited members are not included).
    fn members_of(&self, id: TypeDefId) -> Vec<&MemberDef> {
        self.type_def(id)
            .members
            .iter()
            .map(|m| self.member(*m))
            .collect()
    }

    fn has_attribute(&self, id: TypeDefId, name: &str) -> bool {
        self.type_def(id).attributes.iter().any(|a| a.name == name)
    }

    fn is_interface(&self, ty: &TypeRef) -> bool {
        ty.def_id()
            .is_some_and(|id| self.type_def(id).kind == TypeDefKind::Interface)
    }

    /// Linearized ancestor chain: `ty` itself, then its base, up to the root.
    ///
    /// Each entry is instantiated with the arguments flowing down from `ty`,
    /// so `class B : A<int>` yields `[B, A<int>]`.
    fn ancestors(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = Some(ty.clone());
        while let Some(level) = current.take() {
            let Some(def) = level.def_id() else {
                break;
            };
            if !seen.insert(def) {
                tracing::warn!(ty = %display::type_name(self, &level), "cyclic base chain");
                break;
            }
            current = self
                .type_def(def)
                .base
                .as_ref()
                .map(|base| base.substitute(def, level.args()));
            chain.push(level);
        }
        chain
    }

    /// True if `ty` is `ancestor` or derives from it.
    fn derives_from(&self, ty: &TypeRef, ancestor: TypeDefId) -> bool {
        self.ancestors(ty)
            .iter()
            .any(|level| level.def_id() == Some(ancestor))
    }

    /// Every interface `ty` implements: directly, through its bases, and
    /// through interface extension. Instantiated, deduplicated, in discovery order.
    fn all_interfaces(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let mut found: Vec<TypeRef> = Vec::new();
        let mut stack: Vec<TypeRef> = Vec::new();
        for level in self.ancestors(ty).iter().rev() {
            let Some(def) = level.def_id() else { continue };
            for iface in self.type_def(def).interfaces.iter().rev() {
                stack.push(iface.substitute(def, level.args()));
            }
        }
        while let Some(iface) = stack.pop() {
            if found.contains(&iface) {
                continue;
            }
            if let Some(def) = iface.def_id() {
                for parent in self.type_def(def).interfaces.iter().rev() {
                    stack.push(parent.substitute(def, iface.args()));
                }
            }
            found.push(iface);
        }
        found
    }

    /// True if `ty` nominally is or implements `target`.
    fn is_assignable_to(&self, ty: &TypeRef, target: &TypeRef) -> bool {
        if ty == target {
            return true;
        }
        if self.is_interface(target) {
            return self.all_interfaces(ty).contains(target);
        }
        self.ancestors(ty).contains(target)
    }

    /// True if `assembly` grants internals visibility to the provider `identity`.
    fn grants_provider_access(&self, assembly: AssemblyId, identity: &str) -> bool {
        self.assembly(assembly).attributes.iter().any(|a| {
            a.name == INTERNALS_VISIBLE_TO && a.args.first().is_some_and(|arg| arg == identity)
        })
    }
}
