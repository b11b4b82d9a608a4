// src/adapter/registry.rs
//! Adapter registry: builds dispatch tables on first use and publishes them
//! for the registry's lifetime.
//!
//! Three keyspaces, never mixed:
//! - declared: (capability, declared candidate type) for `adapt_as`
//! - polymorphic: (capability, runtime type of the instance) for `adapt`
//! - statics: (capability, implementing type), holding the bound adapter itself
//!
//! Usage errors (not an interface, wrong mode) are raised before the cache
//! is consulted. Failed resolutions are not cached.

use std::sync::Arc;

use super::shape::{Adapter, AdapterShape};
use crate::cache::KeyedOnce;
use crate::config::EngineConfig;
use crate::errors::AdapterError;
use crate::matching::{CapabilitySet, MatchMode, Resolver};
use crate::meta::display::type_name;
use crate::meta::{MetadataProvider, SymbolTable, TypeRef};
use crate::runtime::{NativeRegistry, ObjectRef};

type ShapeKey = (TypeRef, TypeRef);

/// Published entries per keyspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub declared: usize,
    pub polymorphic: usize,
    pub statics: usize,
}

pub struct AdapterRegistry<M: MetadataProvider = SymbolTable> {
    meta: Arc<M>,
    natives: Arc<NativeRegistry>,
    config: EngineConfig,
    declared: KeyedOnce<ShapeKey, Arc<AdapterShape>>,
    polymorphic: KeyedOnce<ShapeKey, Arc<AdapterShape>>,
    statics: KeyedOnce<ShapeKey, Arc<Adapter>>,
}

impl<M: MetadataProvider> AdapterRegistry<M> {
    pub fn new(meta: Arc<M>, natives: Arc<NativeRegistry>) -> Self {
        Self::with_config(meta, natives, EngineConfig::default())
    }

    pub fn with_config(meta: Arc<M>, natives: Arc<NativeRegistry>, config: EngineConfig) -> Self {
        Self {
            meta,
            natives,
            config,
            declared: KeyedOnce::new(),
            polymorphic: KeyedOnce::new(),
            statics: KeyedOnce::new(),
        }
    }

    pub fn meta(&self) -> &M {
        &self.meta
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Adapt `instance`, keyed by its runtime type.
    pub fn adapt(
        &self,
        capability: &TypeRef,
        instance: ObjectRef,
    ) -> Result<Adapter, AdapterError> {
        let cap = self.capability(capability, MatchMode::Instance)?;
        let key = (cap.ty.clone(), instance.ty().clone());
        let shape = self.polymorphic.get_or_try_init(key, || {
            self.build_shape(&cap, instance.ty(), MatchMode::Instance)
        })?;
        Ok(Adapter::new(shape, Some(instance)))
    }

    /// Adapt `instance` through the members visible on `declared`; the
    /// instance's runtime type must be `declared` or derive from it.
    pub fn adapt_as(
        &self,
        capability: &TypeRef,
        declared: &TypeRef,
        instance: ObjectRef,
    ) -> Result<Adapter, AdapterError> {
        let cap = self.capability(capability, MatchMode::Instance)?;
        if !self.meta.ancestors(instance.ty()).contains(declared) {
            return Err(AdapterError::NotInstanceOf {
                declared: type_name(&*self.meta, declared),
                actual: type_name(&*self.meta, instance.ty()),
            });
        }
        let key = (cap.ty.clone(), declared.clone());
        let shape = self.declared.get_or_try_init(key, || {
            self.build_shape(&cap, declared, MatchMode::Instance)
        })?;
        Ok(Adapter::new(shape, Some(instance)))
    }

    /// Singleton adapter over the static members of `implementation`.
    pub fn static_adapter(
        &self,
        capability: &TypeRef,
        implementation: &TypeRef,
    ) -> Result<Arc<Adapter>, AdapterError> {
        let cap = self.capability(capability, MatchMode::Static)?;
        let key = (cap.ty.clone(), implementation.clone());
        self.statics.get_or_try_init(key, || {
            let shape = self.build_shape(&cap, implementation, MatchMode::Static)?;
            Ok(Arc::new(Adapter::new(shape, None)))
        })
    }

    /// Like `static_adapter`, but `implementation` must also declare the
    /// adapter marker for the capability, directly or through a base.
    pub fn static_interface(
        &self,
        capability: &TypeRef,
        implementation: &TypeRef,
    ) -> Result<Arc<Adapter>, AdapterError> {
        let cap = self.capability(capability, MatchMode::Static)?;
        let marker = self
            .meta
            .lookup_type(&self.config.adapter_marker)
            .map(|m| TypeRef::generic(m, vec![cap.ty.clone()]));
        let declared = marker
            .as_ref()
            .is_some_and(|m| self.meta.all_interfaces(implementation).contains(m));
        if !declared {
            return Err(AdapterError::NotAnImplementation {
                capability: cap.name.clone(),
                candidate: type_name(&*self.meta, implementation),
                marker: format!("{}<{}>", self.config.adapter_marker, cap.name),
            });
        }
        self.static_adapter(capability, implementation)
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            declared: self.declared.len(),
            polymorphic: self.polymorphic.len(),
            statics: self.statics.len(),
        }
    }

    /// Validate that `ty` is a capability usable in `mode`.
    pub fn capability(&self, ty: &TypeRef, mode: MatchMode) -> Result<CapabilitySet, AdapterError> {
        let cap = CapabilitySet::from_type(&*self.meta, ty, &self.config)?;
        cap.expect_mode(mode)?;
        Ok(cap)
    }

    #[tracing::instrument(
        skip(self, capability, candidate),
        fields(capability = %capability.name, candidate = %type_name(&*self.meta, candidate))
    )]
    fn build_shape(
        &self,
        capability: &CapabilitySet,
        candidate: &TypeRef,
        mode: MatchMode,
    ) -> Result<Arc<AdapterShape>, AdapterError> {
        tracing::debug!("cache miss, building shape");
        let resolution = Resolver::new(&*self.meta, &self.config)
            .resolve(capability, candidate, mode)
            .map_err(|f| f.into_error(&*self.meta, capability, candidate))?;
        let shape = AdapterShape::build(&*self.meta, capability, &resolution, &self.natives)?;
        Ok(Arc::new(shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{Attribute, MemberBuilder, TypeDefKind};
    use crate::runtime::{Call, Object, Value};

    fn double_registry() -> (SymbolTable, NativeRegistry, TypeRef, TypeRef) {
        let mut table = SymbolTable::new();
        let double = table.primitive("double");
        let shape = table.declare_type("Geo.Shape", TypeDefKind::Interface);
        table.add_member(shape, MemberBuilder::method("area").returns(double.clone()));
        let unit = table.declare_type("Geo.Unit", TypeDefKind::Class);
        let area = table.add_member(unit, MemberBuilder::method("area").returns(double));
        let mut natives = NativeRegistry::new();
        natives.register(area, |_, _| Ok(Value::Float(1.0)));
        (table, natives, TypeRef::named(shape), TypeRef::named(unit))
    }

    #[test]
    fn static_capability_rejected_in_instance_mode() {
        let (mut table, natives, shape, unit) = double_registry();
        let def = shape.def_id().unwrap();
        table.add_attribute(def, Attribute::new("conform.Static"));
        let registry = AdapterRegistry::new(Arc::new(table), Arc::new(natives));
        let obj = Object::new(unit).into_ref();
        let err = registry.adapt(&shape, obj).unwrap_err();
        assert!(matches!(err, AdapterError::WrongCapabilityKind { .. }));
        assert_eq!(registry.cache_stats(), CacheStats::default());
    }

    #[test]
    fn unbound_targets_are_reported() {
        let (table, _, shape, unit) = double_registry();
        let registry = AdapterRegistry::new(Arc::new(table), Arc::new(NativeRegistry::new()));
        let err = registry
            .adapt(&shape, Object::new(unit).into_ref())
            .unwrap_err();
        assert!(matches!(err, AdapterError::Unbound { .. }));
    }

    #[test]
    fn shapes_are_reused_per_runtime_type() {
        let (table, natives, shape, unit) = double_registry();
        let registry = AdapterRegistry::new(Arc::new(table), Arc::new(natives));
        let a = registry
            .adapt(&shape, Object::new(unit.clone()).into_ref())
            .unwrap();
        let b = registry.adapt(&shape, Object::new(unit).into_ref()).unwrap();
        assert!(Arc::ptr_eq(a.shape(), b.shape()));
        assert_eq!(a.invoke("area", &Call::empty()).unwrap(), Value::Float(1.0));
        assert_eq!(registry.cache_stats().polymorphic, 1);
    }

    #[test]
    fn adapt_as_requires_an_instance_of_the_declared_type() {
        let (mut table, natives, shape, unit) = double_registry();
        let other = TypeRef::named(table.declare_type("Geo.Other", TypeDefKind::Class));
        let registry = AdapterRegistry::new(Arc::new(table), Arc::new(natives));
        let err = registry
            .adapt_as(&shape, &other, Object::new(unit).into_ref())
            .unwrap_err();
        assert_eq!(
            err,
            AdapterError::NotInstanceOf {
                declared: "Geo.Other".to_string(),
                actual: "Geo.Unit".to_string(),
            }
        );
    }
}
