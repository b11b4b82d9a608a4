// src/runtime/native_registry.rs
//! Registry of native bodies bound to declared members.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::object::ObjectRef;
use super::value::{Call, Value};
use crate::identity::MemberId;

/// Failure raised by a native body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct NativeError {
    pub message: String,
}

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A member body. The receiver is `None` for static members.
pub type NativeFn =
    Arc<dyn Fn(Option<&ObjectRef>, &Call) -> Result<Value, NativeError> + Send + Sync>;

/// Native bodies keyed by the member they implement.
#[derive(Clone, Default)]
pub struct NativeRegistry {
    functions: FxHashMap<MemberId, NativeFn>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `body` to `member`, replacing any earlier binding.
    pub fn register<F>(&mut self, member: MemberId, body: F)
    where
        F: Fn(Option<&ObjectRef>, &Call) -> Result<Value, NativeError> + Send + Sync + 'static,
    {
        self.functions.insert(member, Arc::new(body));
    }

    pub fn get(&self, member: MemberId) -> Option<&NativeFn> {
        self.functions.get(&member)
    }

    pub fn contains(&self, member: MemberId) -> bool {
        self.functions.contains_key(&member)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl std::fmt::Debug for NativeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.functions.keys().copied().collect();
        ids.sort();
        f.debug_struct("NativeRegistry")
            .field("members", &ids)
            .finish()
    }
}
