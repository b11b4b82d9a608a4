// src/meta/members.rs
//! Member signatures as read from the symbol table.

use miette::SourceSpan;

use super::types::{GenericParamDef, TypeRef};
use crate::identity::{MemberId, TypeDefId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Property,
    Event,
}

impl MemberKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberKind::Method => "method",
            MemberKind::Property => "property",
            MemberKind::Event => "event",
        }
    }
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distinguishes ordinary methods from compiler-special ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MethodKind {
    #[default]
    Ordinary,
    Constructor,
    Accessor,
    Operator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    Private,
}

/// How an argument is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefKind {
    #[default]
    Value,
    Ref,
    Out,
    In,
}

impl RefKind {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            RefKind::Value => None,
            RefKind::Ref => Some("ref"),
            RefKind::Out => Some("out"),
            RefKind::In => Some("in"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDef {
    pub name: String,
    pub ty: TypeRef,
    pub ref_kind: RefKind,
}

/// A method, property or event declared on a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDef {
    pub id: MemberId,
    pub declaring_type: TypeDefId,
    pub kind: MemberKind,
    pub name: String,
    pub is_static: bool,
    pub visibility: Visibility,
    pub method_kind: MethodKind,
    /// Method parameters, or indexer parameters for an indexer property.
    pub params: Vec<ParamDef>,
    /// Return type for methods, declared type for properties and events.
    pub ty: TypeRef,
    /// Method-level generic parameters.
    pub generics: Vec<GenericParamDef>,
    pub is_indexer: bool,
    pub span: SourceSpan,
}

impl MemberDef {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn generic_arity(&self) -> usize {
        self.generics.len()
    }

    /// Ordinary methods, non-indexer properties and events.
    pub fn is_ordinary(&self) -> bool {
        match self.kind {
            MemberKind::Method => self.method_kind == MethodKind::Ordinary,
            MemberKind::Property => !self.is_indexer,
            MemberKind::Event => true,
        }
    }

    /// Copy of this member with the type-level parameters of `owner` replaced by `args`.
    pub fn instantiate(&self, owner: TypeDefId, args: &[TypeRef]) -> MemberDef {
        if args.is_empty() {
            return self.clone();
        }
        MemberDef {
            params: self
                .params
                .iter()
                .map(|p| ParamDef {
                    ty: p.ty.substitute(owner, args),
                    ..p.clone()
                })
                .collect(),
            ty: self.ty.substitute(owner, args),
            generics: self
                .generics
                .iter()
                .map(|g| g.substitute(owner, args))
                .collect(),
            ..self.clone()
        }
    }
}
