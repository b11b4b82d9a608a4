// src/meta/type_expr.rs
//! Textual type expressions used by symbol graph documents.
//!
//! Grammar:
//! ```text
//! param   := ("out" | "ref" | "in")? type ident?
//! type    := atom ("[" "]")*
//! atom    := path ("<" type ("," type)* ">")?
//! path    := ident ("." ident)*
//! ```
//! `void` is the empty return type. Names resolve against method generics,
//! then the declaring type's generics, then the declaring type and its
//! enclosing namespaces, then the global namespace. A name that resolves to
//! nothing becomes `TypeRef::Error` so later passes can skip it.

use miette::SourceSpan;

use super::MetadataProvider;
use super::members::RefKind;
use super::types::TypeRef;
use crate::errors::LoadError;
use crate::identity::TypeDefId;

/// Parsed but unresolved type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSyntax {
    Path { name: String, args: Vec<TypeSyntax> },
    Array(Box<TypeSyntax>),
}

/// A parsed parameter declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSyntax {
    pub ref_kind: RefKind,
    pub ty: TypeSyntax,
    pub name: Option<String>,
}

/// Names in scope while resolving a type expression.
#[derive(Debug, Clone, Default)]
pub struct TypeScope {
    owner: Option<TypeDefId>,
    type_params: Vec<String>,
    method_params: Vec<String>,
    prefixes: Vec<String>,
}

impl TypeScope {
    /// Only fully qualified names and primitives resolve.
    pub fn global() -> Self {
        Self::default()
    }

    /// Scope inside the declaration of `id`.
    pub fn for_type<M: MetadataProvider + ?Sized>(meta: &M, id: TypeDefId) -> Self {
        let def = meta.type_def(id);
        let mut prefixes = vec![def.full_name.clone()];
        let mut outer = def.outer;
        while let Some(o) = outer {
            let outer_def = meta.type_def(o);
            prefixes.push(outer_def.full_name.clone());
            outer = outer_def.outer;
        }
        let mut ns = Some(def.namespace);
        while let Some(n) = ns {
            let ns_def = meta.namespace(n);
            if !ns_def.name.is_empty() {
                prefixes.push(ns_def.name.clone());
            }
            ns = ns_def.parent;
        }
        Self {
            owner: Some(id),
            type_params: def.type_params.iter().map(|p| p.name.clone()).collect(),
            method_params: Vec::new(),
            prefixes,
        }
    }

    /// Same scope with method-level generic parameters added.
    pub fn with_method_params(&self, names: Vec<String>) -> Self {
        Self {
            method_params: names,
            ..self.clone()
        }
    }

    fn resolve_name<M: MetadataProvider + ?Sized>(&self, meta: &M, name: &str) -> Option<TypeRef> {
        if let Some(pos) = self.method_params.iter().position(|p| p == name) {
            return Some(TypeRef::method_param(pos as u16, name));
        }
        if let (Some(owner), Some(pos)) = (
            self.owner,
            self.type_params.iter().position(|p| p == name),
        ) {
            return Some(TypeRef::type_param(owner, pos as u16, name));
        }
        self.prefixes
            .iter()
            .find_map(|prefix| meta.lookup_type(&format!("{prefix}.{name}")))
            .or_else(|| meta.lookup_type(name))
            .map(TypeRef::named)
    }

    fn is_generic_param(&self, name: &str) -> bool {
        self.method_params.iter().any(|p| p == name) || self.type_params.iter().any(|p| p == name)
    }
}

struct Parser<'s> {
    text: &'s str,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn new(text: &'s str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'s str {
        &self.text[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.text.len() - trimmed.len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<&'s str> {
        self.skip_ws();
        let rest = self.rest();
        let mut end = 0;
        for (i, c) in rest.char_indices() {
            let ok = if i == 0 {
                c.is_alphabetic() || c == '_'
            } else {
                c.is_alphanumeric() || c == '_'
            };
            if !ok {
                break;
            }
            end = i + c.len_utf8();
        }
        if end == 0 {
            return None;
        }
        self.pos += end;
        Some(&rest[..end])
    }

    fn path(&mut self) -> Result<String, String> {
        let mut name = self
            .ident()
            .ok_or_else(|| format!("expected a type name at offset {}", self.pos))?
            .to_string();
        while self.eat('.') {
            let part = self
                .ident()
                .ok_or_else(|| format!("expected a name after '.' at offset {}", self.pos))?;
            name.push('.');
            name.push_str(part);
        }
        Ok(name)
    }

    fn ty(&mut self) -> Result<TypeSyntax, String> {
        let name = self.path()?;
        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.ty()?);
                if self.eat('>') {
                    break;
                }
                if !self.eat(',') {
                    return Err(format!("expected ',' or '>' at offset {}", self.pos));
                }
            }
        }
        let mut ty = TypeSyntax::Path { name, args };
        while self.eat('[') {
            if !self.eat(']') {
                return Err(format!("expected ']' at offset {}", self.pos));
            }
            ty = TypeSyntax::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn finish(&mut self) -> Result<(), String> {
        self.skip_ws();
        if self.rest().is_empty() {
            Ok(())
        } else {
            Err(format!("unexpected '{}'", self.rest()))
        }
    }
}

/// Parse a type expression without resolving names.
pub fn parse_type(text: &str) -> Result<TypeSyntax, String> {
    let mut parser = Parser::new(text);
    let ty = parser.ty()?;
    parser.finish()?;
    Ok(ty)
}

/// Parse `[out|ref|in] Type [name]`.
pub fn parse_param(text: &str) -> Result<ParamSyntax, String> {
    let mut parser = Parser::new(text);
    let checkpoint = parser.pos;
    let ref_kind = match parser.ident() {
        Some("out") => RefKind::Out,
        Some("ref") => RefKind::Ref,
        Some("in") => RefKind::In,
        _ => {
            parser.pos = checkpoint;
            RefKind::Value
        }
    };
    let ty = parser.ty()?;
    let name = parser.ident().map(str::to_string);
    parser.finish()?;
    Ok(ParamSyntax { ref_kind, ty, name })
}

/// Resolve parsed syntax against `scope`.
pub fn resolve<M: MetadataProvider + ?Sized>(
    meta: &M,
    syntax: &TypeSyntax,
    scope: &TypeScope,
) -> Result<TypeRef, String> {
    match syntax {
        TypeSyntax::Array(element) => Ok(TypeRef::array(resolve(meta, element, scope)?)),
        TypeSyntax::Path { name, args } if name == "void" && args.is_empty() => Ok(TypeRef::Void),
        TypeSyntax::Path { name, args } => {
            if scope.is_generic_param(name) && !args.is_empty() {
                return Err(format!("generic parameter '{name}' cannot take type arguments"));
            }
            let Some(found) = scope.resolve_name(meta, name) else {
                tracing::warn!(name = %name, "unresolved type name");
                return Ok(TypeRef::Error);
            };
            let TypeRef::Named { def, .. } = found else {
                return Ok(found);
            };
            let expected = meta.type_def(def).type_params.len();
            if !args.is_empty() && args.len() != expected {
                return Err(format!(
                    "'{name}' takes {expected} type argument(s), found {}",
                    args.len()
                ));
            }
            let args = args
                .iter()
                .map(|a| resolve(meta, a, scope))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeRef::generic(def, args))
        }
    }
}

/// Parse and resolve `text`, reporting failures against `span`.
pub fn resolve_type<M: MetadataProvider + ?Sized>(
    meta: &M,
    text: &str,
    scope: &TypeScope,
    span: SourceSpan,
) -> Result<TypeRef, LoadError> {
    parse_type(text)
        .and_then(|syntax| resolve(meta, &syntax, scope))
        .map_err(|reason| LoadError::TypeExpr {
            text: text.to_string(),
            reason,
            span,
        })
}
