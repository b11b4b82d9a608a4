// src/adapter/mod.rs
//! Adapter synthesis: dispatch tables that forward a capability set's
//! members to the members resolved on a candidate type.

pub mod registry;
pub mod shape;

pub use registry::{AdapterRegistry, CacheStats};
pub use shape::{Adapter, AdapterShape, Slot};
