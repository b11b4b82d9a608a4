// src/meta/load.rs
//! Symbol graphs from TOML documents.
//!
//! ```toml
//! [program]
//! name = "geo"
//! attributes = [{ name = "InternalsVisibleTo", args = ["conform.adapters"] }]
//!
//! [[types]]
//! name = "Geo.Shape"
//! kind = "interface"
//! members = [{ kind = "method", name = "area", type = "double" }]
//!
//! [[types]]
//! name = "Geo.Circle"
//! members = [
//!   { kind = "method", name = "area", type = "double" },
//!   { kind = "method", name = "scale", type = "void", params = ["double factor"] },
//! ]
//! ```
//!
//! Loading runs in phases so that declarations may refer to types declared
//! later in the document: assemblies, then type names (top-level before
//! nested), then type parameters, then everything that mentions a type.

use std::path::Path;

use miette::SourceSpan;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use toml::Spanned;

use super::builder::MemberBuilder;
use super::members::{MethodKind, Visibility};
use super::symbol_table::{Attribute, SymbolTable, TypeDefKind};
use super::type_expr::{self, TypeScope};
use super::types::{GenericParamDef, TypeRef, Variance};
use super::MetadataProvider;
use crate::config::EngineConfig;
use crate::errors::LoadError;
use crate::identity::{AssemblyId, TypeDefId};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GraphDoc {
    program: ProgramDecl,
    assemblies: Vec<AssemblyDecl>,
    types: Vec<TypeDecl>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ProgramDecl {
    name: Option<String>,
    attributes: Vec<AttributeDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssemblyDecl {
    name: String,
    #[serde(default)]
    attributes: Vec<AttributeDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AttributeDecl {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl AttributeDecl {
    fn to_attribute(&self) -> Attribute {
        match self {
            AttributeDecl::Name(name) => Attribute::new(name),
            AttributeDecl::Full { name, args } => Attribute {
                name: name.clone(),
                args: args.clone(),
            },
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindDecl {
    #[default]
    Class,
    Struct,
    Interface,
}

impl From<KindDecl> for TypeDefKind {
    fn from(kind: KindDecl) -> Self {
        match kind {
            KindDecl::Class => TypeDefKind::Class,
            KindDecl::Struct => TypeDefKind::Struct,
            KindDecl::Interface => TypeDefKind::Interface,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeDecl {
    /// Full name for top-level types, simple name for nested ones.
    name: Spanned<String>,
    #[serde(default)]
    kind: KindDecl,
    assembly: Option<String>,
    outer: Option<String>,
    #[serde(default)]
    type_params: Vec<GenericDecl>,
    base: Option<Spanned<String>>,
    #[serde(default)]
    interfaces: Vec<Spanned<String>>,
    #[serde(default)]
    attributes: Vec<AttributeDecl>,
    #[serde(default)]
    members: Vec<MemberDecl>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum VarianceDecl {
    #[default]
    Invariant,
    Out,
    In,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenericDecl {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        variance: VarianceDecl,
        #[serde(default)]
        constructor: bool,
        #[serde(default)]
        reference_type: bool,
        #[serde(default)]
        value_type: bool,
        #[serde(default)]
        constraints: Vec<String>,
    },
}

impl GenericDecl {
    fn name(&self) -> &str {
        match self {
            GenericDecl::Name(name) | GenericDecl::Full { name, .. } => name,
        }
    }

    fn constraints(&self) -> &[String] {
        match self {
            GenericDecl::Name(_) => &[],
            GenericDecl::Full { constraints, .. } => constraints,
        }
    }

    /// Descriptor without constraint types; those resolve once every name is known.
    fn to_def(&self) -> GenericParamDef {
        let mut def = GenericParamDef::new(self.name());
        if let GenericDecl::Full {
            variance,
            constructor,
            reference_type,
            value_type,
            ..
        } = self
        {
            def.variance = match variance {
                VarianceDecl::Invariant => Variance::Invariant,
                VarianceDecl::Out => Variance::Covariant,
                VarianceDecl::In => Variance::Contravariant,
            };
            def.constructor = *constructor;
            def.reference_type = *reference_type;
            def.value_type = *value_type;
        }
        def
    }
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MemberKindDecl {
    #[default]
    Method,
    Property,
    Indexer,
    Event,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum VisibilityDecl {
    #[default]
    Public,
    Internal,
    Private,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SpecialDecl {
    Constructor,
    Accessor,
    Operator,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MemberDecl {
    #[serde(default)]
    kind: MemberKindDecl,
    name: Option<Spanned<String>>,
    #[serde(rename = "static", default)]
    is_static: bool,
    #[serde(default)]
    visibility: VisibilityDecl,
    special: Option<SpecialDecl>,
    /// Return type for methods, declared type otherwise.
    #[serde(rename = "type", alias = "returns")]
    ty: Option<Spanned<String>>,
    #[serde(default)]
    params: Vec<Spanned<String>>,
    #[serde(default)]
    generics: Vec<GenericDecl>,
}

fn span_of<T>(spanned: &Spanned<T>) -> SourceSpan {
    spanned.span().into()
}

/// Load a symbol graph from TOML text.
pub fn load_str(source: &str, config: &EngineConfig) -> Result<SymbolTable, LoadError> {
    let doc: GraphDoc = toml::from_str(source).map_err(LoadError::from_toml)?;
    let mut table = SymbolTable::with_config(config);
    GraphLoader::new(&mut table).load(&doc)?;
    tracing::debug!(types = table.type_count(), "symbol graph loaded");
    Ok(table)
}

/// Load a symbol graph file.
pub fn load_file(path: &Path, config: &EngineConfig) -> Result<SymbolTable, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&source, config).map_err(|e| e.with_file(&path.display().to_string()))
}

struct GraphLoader<'t> {
    table: &'t mut SymbolTable,
    assemblies: FxHashMap<String, AssemblyId>,
}

impl<'t> GraphLoader<'t> {
    fn new(table: &'t mut SymbolTable) -> Self {
        Self {
            table,
            assemblies: FxHashMap::default(),
        }
    }

    fn load(&mut self, doc: &GraphDoc) -> Result<(), LoadError> {
        self.declare_assemblies(doc);
        let declared = self.declare_types(&doc.types)?;
        for (id, decl) in &declared {
            let params = decl.type_params.iter().map(GenericDecl::to_def).collect();
            self.table.set_type_params(*id, params);
        }
        for (id, decl) in &declared {
            self.fill_type(*id, decl)?;
        }
        Ok(())
    }

    fn declare_assemblies(&mut self, doc: &GraphDoc) {
        let program = self.table.program_assembly();
        if let Some(name) = &doc.program.name {
            self.table.rename_program_assembly(name);
            self.assemblies.insert(name.clone(), program);
        }
        self.assemblies.insert("program".to_string(), program);
        for attribute in &doc.program.attributes {
            self.table
                .add_assembly_attribute(program, attribute.to_attribute());
        }
        for decl in &doc.assemblies {
            let id = self.assembly(&decl.name);
            for attribute in &decl.attributes {
                self.table.add_assembly_attribute(id, attribute.to_attribute());
            }
        }
    }

    /// Named assembly, declared on first mention.
    fn assembly(&mut self, name: &str) -> AssemblyId {
        if let Some(id) = self.assemblies.get(name) {
            return *id;
        }
        let id = self.table.declare_assembly(name);
        self.assemblies.insert(name.to_string(), id);
        id
    }

    fn declare_types<'d>(
        &mut self,
        decls: &'d [TypeDecl],
    ) -> Result<Vec<(TypeDefId, &'d TypeDecl)>, LoadError> {
        let mut declared = Vec::with_capacity(decls.len());
        let mut pending: Vec<&TypeDecl> = Vec::new();

        for decl in decls {
            if decl.outer.is_some() {
                pending.push(decl);
                continue;
            }
            let name = decl.name.get_ref();
            if self.table.lookup_type(name).is_some() {
                return Err(LoadError::DuplicateType {
                    name: name.clone(),
                    span: span_of(&decl.name),
                });
            }
            let assembly = match &decl.assembly {
                Some(a) => self.assembly(a),
                None => self.table.program_assembly(),
            };
            let id = self.table.declare_type_in(assembly, name, decl.kind.into());
            self.table.set_span(id, span_of(&decl.name));
            declared.push((id, decl));
        }

        // Nested types may be nested in other nested types; declare until no progress.
        while !pending.is_empty() {
            let before = pending.len();
            let mut waiting = Vec::new();
            for decl in pending {
                let outer_name = decl.outer.as_deref().unwrap_or_default();
                let Some(outer) = self.table.lookup_type(outer_name) else {
                    waiting.push(decl);
                    continue;
                };
                let full_name = format!("{}.{}", outer_name, decl.name.get_ref());
                if self.table.lookup_type(&full_name).is_some() {
                    return Err(LoadError::DuplicateType {
                        name: full_name,
                        span: span_of(&decl.name),
                    });
                }
                let id = self
                    .table
                    .declare_nested_type(outer, decl.name.get_ref(), decl.kind.into());
                self.table.set_span(id, span_of(&decl.name));
                declared.push((id, decl));
            }
            if waiting.len() == before {
                let decl = waiting[0];
                return Err(LoadError::UnknownOuterType {
                    name: decl.name.get_ref().clone(),
                    outer: decl.outer.clone().unwrap_or_default(),
                    span: span_of(&decl.name),
                });
            }
            pending = waiting;
        }
        Ok(declared)
    }

    fn fill_type(&mut self, id: TypeDefId, decl: &TypeDecl) -> Result<(), LoadError> {
        let scope = TypeScope::for_type(&*self.table, id);
        let span = span_of(&decl.name);

        let params = self.resolve_generics(&decl.type_params, &scope, span)?;
        self.table.set_type_params(id, params);

        if let Some(base) = &decl.base {
            let ty = type_expr::resolve_type(&*self.table, base.get_ref(), &scope, span_of(base))?;
            self.table.set_base(id, ty);
        }
        for iface in &decl.interfaces {
            let ty =
                type_expr::resolve_type(&*self.table, iface.get_ref(), &scope, span_of(iface))?;
            self.table.add_interface(id, ty);
        }
        for attribute in &decl.attributes {
            self.table.add_attribute(id, attribute.to_attribute());
        }
        for member in &decl.members {
            let builder = self.member(member, &scope, span)?;
            self.table.add_member(id, builder);
        }
        Ok(())
    }

    fn resolve_generics(
        &self,
        decls: &[GenericDecl],
        scope: &TypeScope,
        span: SourceSpan,
    ) -> Result<Vec<GenericParamDef>, LoadError> {
        decls
            .iter()
            .map(|g| {
                let mut def = g.to_def();
                for constraint in g.constraints() {
                    def.constraints.push(type_expr::resolve_type(
                        &*self.table,
                        constraint,
                        scope,
                        span,
                    )?);
                }
                Ok(def)
            })
            .collect()
    }

    fn member(
        &self,
        decl: &MemberDecl,
        type_scope: &TypeScope,
        type_span: SourceSpan,
    ) -> Result<MemberBuilder, LoadError> {
        let span = decl
            .name
            .as_ref()
            .map(span_of)
            .or_else(|| decl.ty.as_ref().map(span_of))
            .unwrap_or(type_span);
        let generic_names = decl.generics.iter().map(|g| g.name().to_string()).collect();
        let scope = type_scope.with_method_params(generic_names);

        let ty = match &decl.ty {
            Some(text) => {
                type_expr::resolve_type(&*self.table, text.get_ref(), &scope, span_of(text))?
            }
            None if matches!(decl.kind, MemberKindDecl::Method) => TypeRef::Void,
            None => {
                return Err(LoadError::Invalid {
                    message: "properties, indexers and events need a type".to_string(),
                    span,
                });
            }
        };
        let name = decl.name.as_ref().map(|n| n.get_ref().as_str());
        let mut builder = match (decl.kind, name) {
            (MemberKindDecl::Indexer, _) => MemberBuilder::indexer(ty),
            (MemberKindDecl::Method, Some(name)) => MemberBuilder::method(name).returns(ty),
            (MemberKindDecl::Property, Some(name)) => MemberBuilder::property(name, ty),
            (MemberKindDecl::Event, Some(name)) => MemberBuilder::event(name, ty),
            (_, None) => {
                return Err(LoadError::Invalid {
                    message: "member needs a name".to_string(),
                    span,
                });
            }
        };

        for generic in self.resolve_generics(&decl.generics, &scope, span)? {
            builder = builder.generic(generic);
        }
        for (index, param) in decl.params.iter().enumerate() {
            let param_span = span_of(param);
            let syntax = type_expr::parse_param(param.get_ref()).map_err(|reason| {
                LoadError::TypeExpr {
                    text: param.get_ref().clone(),
                    reason,
                    span: param_span,
                }
            })?;
            let ty = type_expr::resolve(&*self.table, &syntax.ty, &scope).map_err(|reason| {
                LoadError::TypeExpr {
                    text: param.get_ref().clone(),
                    reason,
                    span: param_span,
                }
            })?;
            let name = syntax.name.unwrap_or_else(|| format!("arg{index}"));
            builder = builder.param_with(&name, ty, syntax.ref_kind);
        }

        let visibility = match decl.visibility {
            VisibilityDecl::Public => Visibility::Public,
            VisibilityDecl::Internal => Visibility::Internal,
            VisibilityDecl::Private => Visibility::Private,
        };
        let method_kind = match decl.special {
            None => MethodKind::Ordinary,
            Some(SpecialDecl::Constructor) => MethodKind::Constructor,
            Some(SpecialDecl::Accessor) => MethodKind::Accessor,
            Some(SpecialDecl::Operator) => MethodKind::Operator,
        };
        Ok(builder
            .is_static(decl.is_static)
            .visibility(visibility)
            .method_kind(method_kind)
            .span(span))
    }
}
