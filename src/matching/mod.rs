// src/matching/mod.rs
//! Structural matching of capability sets against candidate types.

pub mod capability;
pub mod resolver;
pub mod signature;

pub use capability::CapabilitySet;
pub use resolver::{MemberMatch, Resolution, ResolutionFailure, Resolver};
pub use signature::equivalent;

/// Whether a capability is satisfied by instance members of a wrapped object
/// or by static members of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    Instance,
    Static,
}

impl MatchMode {
    pub fn is_static(self) -> bool {
        self == MatchMode::Static
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Instance => "instance",
            MatchMode::Static => "static",
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
