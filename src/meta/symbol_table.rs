// src/meta/symbol_table.rs
//! In-process symbol table.

use miette::SourceSpan;
use rustc_hash::FxHashMap;

use super::MetadataProvider;
use super::builder::MemberBuilder;
use super::members::MemberDef;
use super::types::{GenericParamDef, TypeRef};
use crate::config::{DEFAULT_ADAPTER_MARKER, EngineConfig};
use crate::identity::{AssemblyId, MemberId, NamespaceId, TypeDefId};

/// Names of the built-in primitive types, registered in the global namespace.
pub const PRIMITIVES: &[&str] = &[
    "object", "bool", "char", "byte", "int", "long", "float", "double", "string",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDefKind {
    Class,
    Struct,
    Interface,
    Primitive,
}

/// An attribute applied to a type or an assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub args: Vec<String>,
}

impl Attribute {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct TypeDef {
    pub id: TypeDefId,
    /// Simple name, without namespace or outer type.
    pub name: String,
    pub full_name: String,
    pub namespace: NamespaceId,
    pub assembly: AssemblyId,
    pub kind: TypeDefKind,
    pub type_params: Vec<GenericParamDef>,
    pub base: Option<TypeRef>,
    /// Directly listed interfaces (extended interfaces, for an interface).
    pub interfaces: Vec<TypeRef>,
    pub attributes: Vec<Attribute>,
    pub members: Vec<MemberId>,
    pub nested: Vec<TypeDefId>,
    pub outer: Option<TypeDefId>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct NamespaceDef {
    pub id: NamespaceId,
    /// Full dotted name; empty for the global namespace.
    pub name: String,
    pub parent: Option<NamespaceId>,
    pub children: Vec<NamespaceId>,
    /// Top-level types; nested types hang off their outer type.
    pub types: Vec<TypeDefId>,
}

#[derive(Debug, Clone)]
pub struct AssemblyDef {
    pub id: AssemblyId,
    pub name: String,
    pub attributes: Vec<Attribute>,
}

/// Dense, append-only storage for every entity of a program.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    types: Vec<TypeDef>,
    members: Vec<MemberDef>,
    namespaces: Vec<NamespaceDef>,
    assemblies: Vec<AssemblyDef>,
    type_by_name: FxHashMap<String, TypeDefId>,
    namespace_by_name: FxHashMap<String, NamespaceId>,
    program: AssemblyId,
    core: AssemblyId,
    adapter_marker: TypeDefId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create a table holding the primitives and the adapter marker interface
    /// named by `config`, plus an empty program assembly.
    pub fn with_config(config: &EngineConfig) -> Self {
        let mut table = Self {
            types: Vec::new(),
            members: Vec::new(),
            namespaces: Vec::new(),
            assemblies: Vec::new(),
            type_by_name: FxHashMap::default(),
            namespace_by_name: FxHashMap::default(),
            program: AssemblyId::new(0),
            core: AssemblyId::new(0),
            adapter_marker: TypeDefId::new(0),
        };
        table.core = table.declare_assembly("conform.core");
        table.program = table.declare_assembly("program");
        table.namespace_id("");

        for name in PRIMITIVES {
            table.declare_type_in(table.core, name, TypeDefKind::Primitive);
        }

        let marker_name = if config.adapter_marker.is_empty() {
            DEFAULT_ADAPTER_MARKER
        } else {
            config.adapter_marker.as_str()
        };
        let marker = table.declare_type_in(table.core, marker_name, TypeDefKind::Interface);
        table.set_type_params(marker, vec![GenericParamDef::new("T")]);
        table.adapter_marker = marker;
        table
    }

    pub fn declare_assembly(&mut self, name: &str) -> AssemblyId {
        let id = AssemblyId::new(self.assemblies.len() as u32);
        self.assemblies.push(AssemblyDef {
            id,
            name: name.to_string(),
            attributes: Vec::new(),
        });
        id
    }

    pub fn add_assembly_attribute(&mut self, assembly: AssemblyId, attribute: Attribute) {
        self.assemblies[assembly.index() as usize]
            .attributes
            .push(attribute);
    }

    pub fn rename_program_assembly(&mut self, name: &str) {
        self.assemblies[self.program.index() as usize].name = name.to_string();
    }

    /// Get or create the namespace with full dotted `name`, creating parents.
    pub fn namespace_id(&mut self, name: &str) -> NamespaceId {
        if let Some(id) = self.namespace_by_name.get(name) {
            return *id;
        }
        let parent = if name.is_empty() {
            None
        } else {
            let parent_name = name.rsplit_once('.').map(|(p, _)| p).unwrap_or("");
            Some(self.namespace_id(parent_name))
        };
        let id = NamespaceId::new(self.namespaces.len() as u32);
        self.namespaces.push(NamespaceDef {
            id,
            name: name.to_string(),
            parent,
            children: Vec::new(),
            types: Vec::new(),
        });
        if let Some(parent) = parent {
            self.namespaces[parent.index() as usize].children.push(id);
        }
        self.namespace_by_name.insert(name.to_string(), id);
        id
    }

    /// Declare a top-level type in the program assembly.
    ///
    /// `full_name` is `Namespace.Name`; declaring a name twice returns the
    /// existing definition unchanged.
    pub fn declare_type(&mut self, full_name: &str, kind: TypeDefKind) -> TypeDefId {
        self.declare_type_in(self.program, full_name, kind)
    }

    pub fn declare_type_in(
        &mut self,
        assembly: AssemblyId,
        full_name: &str,
        kind: TypeDefKind,
    ) -> TypeDefId {
        if let Some(id) = self.type_by_name.get(full_name) {
            return *id;
        }
        let (ns_name, name) = full_name.rsplit_once('.').unwrap_or(("", full_name));
        let namespace = self.namespace_id(ns_name);
        let id = self.push_type(assembly, namespace, name, full_name, kind, None);
        self.namespaces[namespace.index() as usize].types.push(id);
        id
    }

    /// Declare a type nested inside `outer`; it lives in the outer type's assembly.
    pub fn declare_nested_type(
        &mut self,
        outer: TypeDefId,
        name: &str,
        kind: TypeDefKind,
    ) -> TypeDefId {
        let outer_def = &self.types[outer.index() as usize];
        let full_name = format!("{}.{}", outer_def.full_name, name);
        if let Some(id) = self.type_by_name.get(&full_name) {
            return *id;
        }
        let (assembly, namespace) = (outer_def.assembly, outer_def.namespace);
        let id = self.push_type(assembly, namespace, name, &full_name, kind, Some(outer));
        self.types[outer.index() as usize].nested.push(id);
        id
    }

    fn push_type(
        &mut self,
        assembly: AssemblyId,
        namespace: NamespaceId,
        name: &str,
        full_name: &str,
        kind: TypeDefKind,
        outer: Option<TypeDefId>,
    ) -> TypeDefId {
        let id = TypeDefId::new(self.types.len() as u32);
        self.types.push(TypeDef {
            id,
            name: name.to_string(),
            full_name: full_name.to_string(),
            namespace,
            assembly,
            kind,
            type_params: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            attributes: Vec::new(),
            members: Vec::new(),
            nested: Vec::new(),
            outer,
            span: (0, 0).into(),
        });
        self.type_by_name.insert(full_name.to_string(), id);
        id
    }

    fn type_mut(&mut self, id: TypeDefId) -> &mut TypeDef {
        &mut self.types[id.index() as usize]
    }

    pub fn set_type_params(&mut self, id: TypeDefId, params: Vec<GenericParamDef>) {
        self.type_mut(id).type_params = params;
    }

    pub fn set_base(&mut self, id: TypeDefId, base: TypeRef) {
        self.type_mut(id).base = Some(base);
    }

    pub fn add_interface(&mut self, id: TypeDefId, iface: TypeRef) {
        self.type_mut(id).interfaces.push(iface);
    }

    pub fn add_attribute(&mut self, id: TypeDefId, attribute: Attribute) {
        self.type_mut(id).attributes.push(attribute);
    }

    pub fn set_span(&mut self, id: TypeDefId, span: SourceSpan) {
        self.type_mut(id).span = span;
    }

    /// Register a member on `owner`.
    pub fn add_member(&mut self, owner: TypeDefId, member: MemberBuilder) -> MemberId {
        let id = MemberId::new(self.members.len() as u32);
        self.members.push(member.build(id, owner));
        self.type_mut(owner).members.push(id);
        id
    }

    /// Built-in primitive by name (`"int"`, `"double"`, ...).
    pub fn primitive(&self, name: &str) -> TypeRef {
        match self.type_by_name.get(name) {
            Some(id) if self.types[id.index() as usize].kind == TypeDefKind::Primitive => {
                TypeRef::named(*id)
            }
            _ => TypeRef::Error,
        }
    }

    /// The generic adapter marker interface definition.
    pub fn adapter_marker(&self) -> TypeDefId {
        self.adapter_marker
    }

    /// `Marker<capability>`.
    pub fn marker_for(&self, capability: TypeRef) -> TypeRef {
        TypeRef::generic(self.adapter_marker, vec![capability])
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.iter()
    }
}

impl MetadataProvider for SymbolTable {
    fn type_def(&self, id: TypeDefId) -> &TypeDef {
        &self.types[id.index() as usize]
    }

    fn member(&self, id: MemberId) -> &MemberDef {
        &self.members[id.index() as usize]
    }

    fn namespace(&self, id: NamespaceId) -> &NamespaceDef {
        &self.namespaces[id.index() as usize]
    }

    fn assembly(&self, id: AssemblyId) -> &AssemblyDef {
        &self.assemblies[id.index() as usize]
    }

    fn lookup_type(&self, full_name: &str) -> Option<TypeDefId> {
        self.type_by_name.get(full_name).copied()
    }

    fn root_namespace(&self) -> NamespaceId {
        NamespaceId::new(0)
    }

    fn program_assembly(&self) -> AssemblyId {
        self.program
    }
}
