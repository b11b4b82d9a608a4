// src/meta/builder.rs
//! Builder for member registration to reduce argument boilerplate.

use miette::SourceSpan;

use super::members::{MemberDef, MemberKind, MethodKind, ParamDef, RefKind, Visibility};
use super::types::{GenericParamDef, TypeRef};
use crate::identity::{MemberId, TypeDefId};

/// Builder for registering members on types.
///
/// Defaults: public, instance, ordinary, no parameters, no generics, `void`
/// type, empty span.
///
/// # Example
/// ```ignore
/// let area = table.add_member(
///     circle,
///     MemberBuilder::method("area").returns(table.primitive("double")),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MemberBuilder {
    kind: MemberKind,
    name: String,
    is_static: bool,
    visibility: Visibility,
    method_kind: MethodKind,
    params: Vec<ParamDef>,
    ty: TypeRef,
    generics: Vec<GenericParamDef>,
    is_indexer: bool,
    span: SourceSpan,
}

impl MemberBuilder {
    fn new(kind: MemberKind, name: &str, ty: TypeRef) -> Self {
        Self {
            kind,
            name: name.to_string(),
            is_static: false,
            visibility: Visibility::Public,
            method_kind: MethodKind::Ordinary,
            params: Vec::new(),
            ty,
            generics: Vec::new(),
            is_indexer: false,
            span: (0, 0).into(),
        }
    }

    pub fn method(name: &str) -> Self {
        Self::new(MemberKind::Method, name, TypeRef::Void)
    }

    pub fn property(name: &str, ty: TypeRef) -> Self {
        Self::new(MemberKind::Property, name, ty)
    }

    /// Indexer property (`this[...]`); add its parameters with `param`.
    pub fn indexer(ty: TypeRef) -> Self {
        let mut builder = Self::new(MemberKind::Property, "this[]", ty);
        builder.is_indexer = true;
        builder
    }

    pub fn event(name: &str, handler: TypeRef) -> Self {
        Self::new(MemberKind::Event, name, handler)
    }

    /// Set the return type (methods) or declared type (properties, events).
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.ty = ty;
        self
    }

    pub fn param(self, name: &str, ty: TypeRef) -> Self {
        self.param_with(name, ty, RefKind::Value)
    }

    pub fn out_param(self, name: &str, ty: TypeRef) -> Self {
        self.param_with(name, ty, RefKind::Out)
    }

    pub fn ref_param(self, name: &str, ty: TypeRef) -> Self {
        self.param_with(name, ty, RefKind::Ref)
    }

    pub fn param_with(mut self, name: &str, ty: TypeRef, ref_kind: RefKind) -> Self {
        self.params.push(ParamDef {
            name: name.to_string(),
            ty,
            ref_kind,
        });
        self
    }

    /// Append a method-level generic parameter; refer to it with
    /// `TypeRef::method_param(position, name)`.
    pub fn generic(mut self, param: GenericParamDef) -> Self {
        self.generics.push(param);
        self
    }

    pub fn is_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Shorthand for `is_static(true)`.
    pub fn static_member(self) -> Self {
        self.is_static(true)
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn method_kind(mut self, method_kind: MethodKind) -> Self {
        self.method_kind = method_kind;
        self
    }

    pub fn span(mut self, span: SourceSpan) -> Self {
        self.span = span;
        self
    }

    pub(crate) fn build(self, id: MemberId, declaring_type: TypeDefId) -> MemberDef {
        MemberDef {
            id,
            declaring_type,
            kind: self.kind,
            name: self.name,
            is_static: self.is_static,
            visibility: self.visibility,
            method_kind: self.method_kind,
            params: self.params,
            ty: self.ty,
            generics: self.generics,
            is_indexer: self.is_indexer,
            span: self.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{MetadataProvider, SymbolTable, TypeDefKind};

    #[test]
    fn builder_defaults() {
        let mut table = SymbolTable::new();
        let ty = table.declare_type("App.Thing", TypeDefKind::Class);
        let id = table.add_member(ty, MemberBuilder::method("run"));
        let member = table.member(id);
        assert_eq!(member.kind, MemberKind::Method);
        assert!(!member.is_static);
        assert_eq!(member.visibility, Visibility::Public);
        assert_eq!(member.ty, TypeRef::Void);
        assert_eq!(member.declaring_type, ty);
        assert_eq!(table.type_def(ty).members, vec![id]);
    }

    #[test]
    fn builder_collects_params_and_generics() {
        let mut table = SymbolTable::new();
        let string = table.primitive("string");
        let ty = table.declare_type("App.Parser", TypeDefKind::Class);
        let id = table.add_member(
            ty,
            MemberBuilder::method("tryParse")
                .static_member()
                .generic(GenericParamDef::new("T"))
                .param("s", string)
                .out_param("result", TypeRef::method_param(0, "T"))
                .returns(table.primitive("bool")),
        );
        let member = table.member(id);
        assert!(member.is_static);
        assert_eq!(member.arity(), 2);
        assert_eq!(member.generic_arity(), 1);
        assert_eq!(member.params[1].ref_kind, RefKind::Out);
    }
}
