// src/identity.rs
//! First-class identity types for symbol-table entities.
//!
//! Ids are dense indices into the owning `SymbolTable`; they carry no meaning
//! across tables.

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis struct $name(u32);

        impl $name {
            pub fn new(index: u32) -> Self {
                Self(index)
            }

            pub fn index(self) -> u32 {
                self.0
            }
        }
    };
}

define_entity_id! {
    /// Identity for a type definition (class, struct, interface, primitive)
    pub struct TypeDefId;
}

define_entity_id! {
    /// Identity for a member (method, property or event; always has a declaring type)
    pub struct MemberId;
}

define_entity_id! {
    /// Identity for a namespace
    pub struct NamespaceId;
}

define_entity_id! {
    /// Identity for an assembly (the unit that carries provider trust)
    pub struct AssemblyId;
}
