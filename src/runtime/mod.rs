// src/runtime/mod.rs
//! Runtime values, wrapped objects and the native bodies adapters forward to.

pub mod native_registry;
pub mod object;
pub mod value;

pub use native_registry::{NativeError, NativeFn, NativeRegistry};
pub use object::{Object, ObjectRef};
pub use value::{Call, Callback, Value};
