// src/oracle.rs
//! Memoized compliance queries.
//!
//! Answers never imply an adapter can be built: a structurally compliant
//! candidate may still lack native bodies.

use std::sync::Arc;

use crate::cache::KeyedOnce;
use crate::config::EngineConfig;
use crate::errors::AdapterError;
use crate::matching::{CapabilitySet, MatchMode, Resolver};
use crate::meta::{MetadataProvider, SymbolTable, TypeRef};
use crate::runtime::ObjectRef;

type MemoKey = (TypeRef, TypeRef);

pub struct ComplianceOracle<M: MetadataProvider = SymbolTable> {
    meta: Arc<M>,
    config: EngineConfig,
    nominal: KeyedOnce<MemoKey, bool>,
    structural: KeyedOnce<MemoKey, bool>,
}

impl<M: MetadataProvider> ComplianceOracle<M> {
    pub fn new(meta: Arc<M>) -> Self {
        Self::with_config(meta, EngineConfig::default())
    }

    pub fn with_config(meta: Arc<M>, config: EngineConfig) -> Self {
        Self {
            meta,
            config,
            nominal: KeyedOnce::new(),
            structural: KeyedOnce::new(),
        }
    }

    /// True if `candidate` nominally implements `capability`. For a static
    /// capability that means declaring the adapter marker for it and also
    /// providing every member statically. Usage errors propagate and are not
    /// memoized; non-conformance is `false`.
    pub fn is_implementation(
        &self,
        candidate: &TypeRef,
        capability: &TypeRef,
    ) -> Result<bool, AdapterError> {
        let key = (candidate.clone(), capability.clone());
        if let Some(known) = self.nominal.get(&key) {
            return Ok(known);
        }
        let cap = CapabilitySet::from_type(&*self.meta, capability, &self.config)?;
        self.nominal.get_or_try_init(key, || self.nominal_check(&cap, candidate))
    }

    fn nominal_check(
        &self,
        cap: &CapabilitySet,
        candidate: &TypeRef,
    ) -> Result<bool, AdapterError> {
        if !cap.is_static {
            return Ok(self.meta.is_assignable_to(candidate, &cap.ty));
        }
        let marked = self
            .meta
            .lookup_type(&self.config.adapter_marker)
            .is_some_and(|marker| {
                let wanted = TypeRef::generic(marker, vec![cap.ty.clone()]);
                self.meta.all_interfaces(candidate).contains(&wanted)
            });
        if !marked {
            return Ok(false);
        }
        match self.check(cap, candidate, MatchMode::Static) {
            Ok(()) => Ok(true),
            Err(e) if e.is_nonconformance() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// True if `candidate` structurally satisfies `capability`, in the mode
    /// the capability's static flag selects. Usage errors propagate and are
    /// not memoized; non-conformance is `false`.
    pub fn is_duck(&self, candidate: &TypeRef, capability: &TypeRef) -> Result<bool, AdapterError> {
        let key = (candidate.clone(), capability.clone());
        if let Some(known) = self.structural.get(&key) {
            return Ok(known);
        }
        let cap = CapabilitySet::from_type(&*self.meta, capability, &self.config)?;
        self.structural.get_or_try_init(key, || {
            match self.check(&cap, candidate, cap.mode()) {
                Ok(()) => Ok(true),
                Err(e) if e.is_nonconformance() => Ok(false),
                Err(e) => Err(e),
            }
        })
    }

    /// Like `is_duck`, but explains a failure with the first missing member.
    pub fn require_duck(
        &self,
        candidate: &TypeRef,
        capability: &TypeRef,
    ) -> Result<(), AdapterError> {
        let cap = CapabilitySet::from_type(&*self.meta, capability, &self.config)?;
        self.check(&cap, candidate, cap.mode())
    }

    /// Structural check against the runtime type of `instance`.
    pub fn is_duck_instance(
        &self,
        instance: &ObjectRef,
        capability: &TypeRef,
    ) -> Result<bool, AdapterError> {
        self.is_duck(instance.ty(), capability)
    }

    fn check(
        &self,
        capability: &CapabilitySet,
        candidate: &TypeRef,
        mode: MatchMode,
    ) -> Result<(), AdapterError> {
        Resolver::new(&*self.meta, &self.config)
            .resolve(capability, candidate, mode)
            .map(|_| ())
            .map_err(|f| f.into_error(&*self.meta, capability, candidate))
    }

    /// Number of memoized (nominal, structural) answers.
    pub fn memo_sizes(&self) -> (usize, usize) {
        (self.nominal.len(), self.structural.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{Attribute, MemberBuilder, TypeDefKind};

    #[test]
    fn nominal_and_structural_answers_differ() {
        let mut table = SymbolTable::new();
        let int = table.primitive("int");
        let counter = table.declare_type("App.Counter", TypeDefKind::Interface);
        table.add_member(counter, MemberBuilder::property("count", int.clone()));
        let duck = table.declare_type("App.Duck", TypeDefKind::Class);
        table.add_member(duck, MemberBuilder::property("count", int));

        let oracle = ComplianceOracle::new(Arc::new(table));
        let (duck, counter) = (TypeRef::named(duck), TypeRef::named(counter));
        assert!(!oracle.is_implementation(&duck, &counter).unwrap());
        assert!(oracle.is_duck(&duck, &counter).unwrap());
        assert!(oracle.is_duck(&duck, &counter).unwrap());
        assert_eq!(oracle.memo_sizes(), (1, 1));
    }

    #[test]
    fn usage_errors_are_not_memoized() {
        let mut table = SymbolTable::new();
        let class = TypeRef::named(table.declare_type("App.Thing", TypeDefKind::Class));
        let oracle = ComplianceOracle::new(Arc::new(table));
        assert!(matches!(
            oracle.is_duck(&class, &class),
            Err(AdapterError::NotAnInterface { .. })
        ));
        assert_eq!(oracle.memo_sizes(), (0, 0));
    }

    #[test]
    fn marker_with_all_static_members_is_nominal() {
        let mut table = SymbolTable::new();
        let int = table.primitive("int");
        let ops = table.declare_type("Num.Ops", TypeDefKind::Interface);
        table.add_attribute(ops, Attribute::new("conform.Static"));
        table.add_member(ops, MemberBuilder::method("zero").static_member().returns(int.clone()));
        let marker = table.marker_for(TypeRef::named(ops));

        let imp = table.declare_type("Num.IntOps", TypeDefKind::Struct);
        table.add_interface(imp, marker.clone());
        table.add_member(imp, MemberBuilder::method("zero").static_member().returns(int.clone()));
        let empty = table.declare_type("Num.Empty", TypeDefKind::Struct);
        table.add_interface(empty, marker);
        let unmarked = table.declare_type("Num.Unmarked", TypeDefKind::Struct);
        table.add_member(unmarked, MemberBuilder::method("zero").static_member().returns(int));

        let oracle = ComplianceOracle::new(Arc::new(table));
        let ops = TypeRef::named(ops);
        assert!(oracle.is_implementation(&TypeRef::named(imp), &ops).unwrap());
        assert!(!oracle.is_implementation(&TypeRef::named(empty), &ops).unwrap());
        assert!(!oracle.is_implementation(&TypeRef::named(unmarked), &ops).unwrap());
        assert!(oracle.is_duck(&TypeRef::named(unmarked), &ops).unwrap());
        assert_eq!(oracle.memo_sizes(), (3, 1));
    }

    #[test]
    fn nominal_query_rejects_class_capabilities() {
        let mut table = SymbolTable::new();
        let base = table.declare_type("App.Base", TypeDefKind::Class);
        let derived = table.declare_type("App.Derived", TypeDefKind::Class);
        table.set_base(derived, TypeRef::named(base));
        let oracle = ComplianceOracle::new(Arc::new(table));
        let err = oracle
            .is_implementation(&TypeRef::named(derived), &TypeRef::named(base))
            .unwrap_err();
        assert!(matches!(err, AdapterError::NotAnInterface { .. }));
        assert_eq!(oracle.memo_sizes(), (0, 0));
    }
}
