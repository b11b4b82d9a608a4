// src/matching/capability.rs
//! Capability sets: instantiated interfaces and their flattened member lists.

use rustc_hash::FxHashSet;

use super::MatchMode;
use crate::config::EngineConfig;
use crate::errors::AdapterError;
use crate::identity::TypeDefId;
use crate::meta::display::type_name;
use crate::meta::{MemberDef, MetadataProvider, TypeDefKind, TypeRef};

/// An interface instantiation viewed as a list of required members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    /// The instantiated interface; identity of the set.
    pub ty: TypeRef,
    /// Display name, e.g. `Num.Parser<int>`.
    pub name: String,
    /// Own members first, then members of extended interfaces depth-first,
    /// each interface once, with interface-level parameters substituted.
    pub members: Vec<MemberDef>,
    /// Directly extended interfaces, instantiated.
    pub parents: Vec<TypeRef>,
    /// Marked with the static capability attribute.
    pub is_static: bool,
}

/// True if `def` is an interface carrying the static capability attribute.
pub fn is_static_capability<M: MetadataProvider + ?Sized>(
    meta: &M,
    def: TypeDefId,
    config: &EngineConfig,
) -> bool {
    meta.type_def(def).kind == TypeDefKind::Interface
        && meta.has_attribute(def, &config.static_attribute)
}

impl CapabilitySet {
    /// Build the capability set of an interface instantiation.
    pub fn from_type<M: MetadataProvider + ?Sized>(
        meta: &M,
        ty: &TypeRef,
        config: &EngineConfig,
    ) -> Result<Self, AdapterError> {
        let name = type_name(meta, ty);
        let Some(def) = ty.def_id() else {
            return Err(if ty.contains_error() {
                AdapterError::UnknownType { name }
            } else {
                AdapterError::NotAnInterface { name }
            });
        };
        if meta.type_def(def).kind != TypeDefKind::Interface {
            return Err(AdapterError::NotAnInterface { name });
        }

        let mut members = Vec::new();
        let mut seen = FxHashSet::default();
        collect_members(meta, ty, &mut members, &mut seen);

        let parents = meta
            .type_def(def)
            .interfaces
            .iter()
            .map(|p| p.substitute(def, ty.args()))
            .collect();

        Ok(Self {
            ty: ty.clone(),
            name,
            members,
            parents,
            is_static: is_static_capability(meta, def, config),
        })
    }

    /// Look up a non-generic capability by full name.
    pub fn from_name<M: MetadataProvider + ?Sized>(
        meta: &M,
        full_name: &str,
        config: &EngineConfig,
    ) -> Result<Self, AdapterError> {
        let def = meta
            .lookup_type(full_name)
            .ok_or_else(|| AdapterError::UnknownType {
                name: full_name.to_string(),
            })?;
        Self::from_type(meta, &TypeRef::named(def), config)
    }

    pub fn mode(&self) -> MatchMode {
        if self.is_static {
            MatchMode::Static
        } else {
            MatchMode::Instance
        }
    }

    /// Members a candidate must provide in `mode`; static mode skips indexers.
    pub fn required(&self, mode: MatchMode) -> impl Iterator<Item = &MemberDef> {
        self.members
            .iter()
            .filter(move |m| !(mode.is_static() && m.is_indexer))
    }

    /// Fail with `WrongCapabilityKind` unless the set's static flag agrees with `requested`.
    pub fn expect_mode(&self, requested: MatchMode) -> Result<(), AdapterError> {
        if self.mode() == requested {
            Ok(())
        } else {
            Err(AdapterError::WrongCapabilityKind {
                capability: self.name.clone(),
                requested,
                actual: self.mode(),
            })
        }
    }
}

fn collect_members<M: MetadataProvider + ?Sized>(
    meta: &M,
    ty: &TypeRef,
    out: &mut Vec<MemberDef>,
    seen: &mut FxHashSet<TypeRef>,
) {
    let Some(def) = ty.def_id() else { return };
    if !seen.insert(ty.clone()) {
        return;
    }
    out.extend(
        meta.members_of(def)
            .into_iter()
            .map(|m| m.instantiate(def, ty.args())),
    );
    for parent in &meta.type_def(def).interfaces {
        collect_members(meta, &parent.substitute(def, ty.args()), out, seen);
    }
}
