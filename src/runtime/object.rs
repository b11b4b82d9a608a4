// src/runtime/object.rs

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::value::Value;
use crate::meta::TypeRef;

/// Shared handle to a wrapped instance. Adapters hold one of these; they
/// never copy the instance.
pub type ObjectRef = Arc<Object>;

/// A runtime instance: its concrete type and named fields.
#[derive(Debug)]
pub struct Object {
    ty: TypeRef,
    fields: RwLock<FxHashMap<String, Value>>,
}

impl Object {
    pub fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            fields: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn with_field(self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.write().insert(name.to_string(), value.into());
        self
    }

    pub fn into_ref(self) -> ObjectRef {
        Arc::new(self)
    }

    /// Runtime type; selects the polymorphic adapter cache entry.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields.read().get(name).cloned()
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) {
        self.fields.write().insert(name.to_string(), value.into());
    }
}
