// src/meta/display.rs
//! Human-readable names for types and member signatures.

use super::MetadataProvider;
use super::members::{MemberDef, MemberKind};
use super::types::TypeRef;

/// `Geo.Shape`, `Num.Parser<int>`, `T`, `int[]`.
pub fn type_name<M: MetadataProvider + ?Sized>(meta: &M, ty: &TypeRef) -> String {
    match ty {
        TypeRef::Named { def, args } => {
            let base = &meta.type_def(*def).full_name;
            if args.is_empty() {
                base.clone()
            } else {
                let args: Vec<String> = args.iter().map(|a| type_name(meta, a)).collect();
                format!("{}<{}>", base, args.join(", "))
            }
        }
        TypeRef::Param(p) => p.name.clone(),
        TypeRef::Array(element) => format!("{}[]", type_name(meta, element)),
        TypeRef::Void => "void".to_string(),
        TypeRef::Error => "?".to_string(),
    }
}

/// Fully qualified member signature, e.g.
/// `Num.Parser.tryParse(string, out int): bool`, `Geo.Shape.area: double`,
/// `Data.Table.this[int]: string`.
pub fn member_signature<M: MetadataProvider + ?Sized>(meta: &M, member: &MemberDef) -> String {
    let owner = &meta.type_def(member.declaring_type).full_name;
    let params = || {
        member
            .params
            .iter()
            .map(|p| match p.ref_kind.keyword() {
                Some(kw) => format!("{} {}", kw, type_name(meta, &p.ty)),
                None => type_name(meta, &p.ty),
            })
            .collect::<Vec<_>>()
            .join(", ")
    };
    let prefix = if member.is_static { "static " } else { "" };
    match member.kind {
        MemberKind::Method => {
            let generics = if member.generics.is_empty() {
                String::new()
            } else {
                let names: Vec<&str> = member.generics.iter().map(|g| g.name.as_str()).collect();
                format!("<{}>", names.join(", "))
            };
            format!(
                "{}{}.{}{}({}): {}",
                prefix,
                owner,
                member.name,
                generics,
                params(),
                type_name(meta, &member.ty)
            )
        }
        MemberKind::Property if member.is_indexer => format!(
            "{}{}.this[{}]: {}",
            prefix,
            owner,
            params(),
            type_name(meta, &member.ty)
        ),
        MemberKind::Property => format!(
            "{}{}.{}: {}",
            prefix,
            owner,
            member.name,
            type_name(meta, &member.ty)
        ),
        MemberKind::Event => format!(
            "{}event {}.{}: {}",
            prefix,
            owner,
            member.name,
            type_name(meta, &member.ty)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{GenericParamDef, MemberBuilder, SymbolTable, TypeDefKind};

    #[test]
    fn generic_instantiation_names() {
        let mut table = SymbolTable::new();
        let list = table.declare_type("Coll.List", TypeDefKind::Class);
        let ty = TypeRef::array(TypeRef::generic(list, vec![table.primitive("int")]));
        assert_eq!(type_name(&table, &ty), "Coll.List<int>[]");
    }

    #[test]
    fn method_signature_includes_generics_and_ref_kinds() {
        let mut table = SymbolTable::new();
        let parser = table.declare_type("Num.Parser", TypeDefKind::Interface);
        let id = table.add_member(
            parser,
            MemberBuilder::method("tryParse")
                .generic(GenericParamDef::new("T"))
                .param("s", table.primitive("string"))
                .out_param("value", TypeRef::method_param(0, "T"))
                .returns(table.primitive("bool")),
        );
        assert_eq!(
            member_signature(&table, table.member(id)),
            "Num.Parser.tryParse<T>(string, out T): bool"
        );
    }

    #[test]
    fn property_indexer_and_event_signatures() {
        let mut table = SymbolTable::new();
        let ty = table.declare_type("Data.Table", TypeDefKind::Class);
        let count = table.add_member(ty, MemberBuilder::property("count", table.primitive("int")));
        let index = table.add_member(
            ty,
            MemberBuilder::indexer(table.primitive("string")).param("i", table.primitive("int")),
        );
        let changed = table.add_member(
            ty,
            MemberBuilder::event("changed", table.primitive("object")).static_member(),
        );
        assert_eq!(member_signature(&table, table.member(count)), "Data.Table.count: int");
        assert_eq!(
            member_signature(&table, table.member(index)),
            "Data.Table.this[int]: string"
        );
        assert_eq!(
            member_signature(&table, table.member(changed)),
            "static event Data.Table.changed: object"
        );
    }
}
