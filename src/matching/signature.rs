// src/matching/signature.rs
//! Member signature equivalence.
//!
//! Two members are equivalent when a call written against the required one
//! can be forwarded unchanged to the candidate: same kind, name and
//! static-ness, and pairwise equivalent parameter, return and generic
//! descriptors. Method-level generic parameters are compared by position
//! and constraint flags, so `get<T>(T): T` matches `get<U>(U): U`.

use super::MatchMode;
use crate::meta::{GenericParamDef, MemberDef, MemberKind, ParamOwner, TypeRef};

/// Method generic descriptors of both sides, used to compare method-level parameters.
#[derive(Clone, Copy)]
struct GenericScope<'a> {
    required: &'a [GenericParamDef],
    candidate: &'a [GenericParamDef],
}

/// True if `candidate` structurally satisfies `required` under `mode`.
///
/// In static mode the candidate must be static and indexers never match;
/// in instance mode the candidate must be an instance member.
pub fn equivalent(required: &MemberDef, candidate: &MemberDef, mode: MatchMode) -> bool {
    if required.kind != candidate.kind || required.name != candidate.name {
        return false;
    }
    if candidate.is_static != mode.is_static() {
        return false;
    }
    if required.is_indexer != candidate.is_indexer {
        return false;
    }
    if mode.is_static() && candidate.is_indexer {
        return false;
    }

    match required.kind {
        MemberKind::Method => methods_equivalent(required, candidate),
        MemberKind::Property if required.is_indexer => {
            required.ty == candidate.ty && params_equivalent(required, candidate, empty_scope())
        }
        MemberKind::Property | MemberKind::Event => required.ty == candidate.ty,
    }
}

fn empty_scope() -> GenericScope<'static> {
    GenericScope {
        required: &[],
        candidate: &[],
    }
}

fn methods_equivalent(required: &MemberDef, candidate: &MemberDef) -> bool {
    if required.method_kind != candidate.method_kind
        || required.generic_arity() != candidate.generic_arity()
        || required.arity() != candidate.arity()
    {
        return false;
    }
    let scope = GenericScope {
        required: &required.generics,
        candidate: &candidate.generics,
    };
    let generics_match = required
        .generics
        .iter()
        .zip(&candidate.generics)
        .all(|(r, c)| generic_params_equivalent(r, c, scope));
    generics_match
        && types_equivalent(&required.ty, &candidate.ty, scope)
        && params_equivalent(required, candidate, scope)
}

fn params_equivalent(required: &MemberDef, candidate: &MemberDef, scope: GenericScope<'_>) -> bool {
    required.params.len() == candidate.params.len()
        && required
            .params
            .iter()
            .zip(&candidate.params)
            .all(|(r, c)| r.ref_kind == c.ref_kind && types_equivalent(&r.ty, &c.ty, scope))
}

/// Flags equal, constraint lists equal in length and pairwise equivalent by position.
fn generic_params_equivalent(
    required: &GenericParamDef,
    candidate: &GenericParamDef,
    scope: GenericScope<'_>,
) -> bool {
    required.same_flags(candidate)
        && required.constraints.len() == candidate.constraints.len()
        && required
            .constraints
            .iter()
            .zip(&candidate.constraints)
            .all(|(r, c)| types_equivalent(r, c, scope))
}

fn types_equivalent(required: &TypeRef, candidate: &TypeRef, scope: GenericScope<'_>) -> bool {
    match (required, candidate) {
        (TypeRef::Param(r), TypeRef::Param(c)) => match (r.owner, c.owner) {
            (ParamOwner::Method, ParamOwner::Method) => {
                if r.position != c.position {
                    return false;
                }
                // Constraint types are compared once per descriptor, not here.
                match (
                    scope.required.get(r.position as usize),
                    scope.candidate.get(c.position as usize),
                ) {
                    (Some(rd), Some(cd)) => rd.same_flags(cd),
                    _ => false,
                }
            }
            (ParamOwner::Type(ro), ParamOwner::Type(co)) => ro == co && r.position == c.position,
            _ => false,
        },
        (TypeRef::Param(_), _) | (_, TypeRef::Param(_)) => false,
        (
            TypeRef::Named {
                def: rd,
                args: rargs,
            },
            TypeRef::Named {
                def: cd,
                args: cargs,
            },
        ) => {
            rd == cd
                && rargs.len() == cargs.len()
                && rargs
                    .iter()
                    .zip(cargs)
                    .all(|(r, c)| types_equivalent(r, c, scope))
        }
        (TypeRef::Array(r), TypeRef::Array(c)) => types_equivalent(r, c, scope),
        (TypeRef::Void, TypeRef::Void) => true,
        _ => false,
    }
}
