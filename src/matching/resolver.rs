// src/matching/resolver.rs
//! Capability resolution: one best-matching candidate member per required member.
//!
//! Lookup walks the candidate's ancestor chain from the type itself outward.
//! The first level holding an equivalent member wins, and within a level the
//! first match in declaration order wins, so a derived type shadows its bases.

use super::capability::CapabilitySet;
use super::signature::equivalent;
use super::MatchMode;
use crate::config::EngineConfig;
use crate::errors::AdapterError;
use crate::meta::display::{member_signature, type_name};
use crate::meta::{MemberDef, MetadataProvider, TypeRef, Visibility};

/// A required member and the candidate member it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberMatch {
    /// The required member, instantiated for the capability.
    pub required: MemberDef,
    /// The matched member, instantiated for the ancestor level it was found at.
    pub target: MemberDef,
    /// The ancestor the target is declared on.
    pub level: TypeRef,
    /// 0 for the candidate itself, 1 for its base, and so on.
    pub depth: usize,
}

/// Successful resolution of a capability set against a candidate type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub capability: TypeRef,
    pub candidate: TypeRef,
    pub mode: MatchMode,
    /// One entry per required member, in the capability's declared order.
    pub matches: Vec<MemberMatch>,
}

/// Why a resolution failed; always names the first failing required member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionFailure {
    /// No equivalent, eligible member anywhere in the ancestor chain.
    Missing { member: MemberDef },
    /// A match exists but takes more parameters than adapters forward.
    ArityExceeded {
        member: MemberDef,
        target: MemberDef,
        count: usize,
        limit: u8,
    },
}

impl ResolutionFailure {
    /// The required member that failed.
    pub fn member(&self) -> &MemberDef {
        match self {
            ResolutionFailure::Missing { member }
            | ResolutionFailure::ArityExceeded { member, .. } => member,
        }
    }

    /// Convert into the adapter fault naming capability, candidate and member signature.
    pub fn into_error<M: MetadataProvider + ?Sized>(
        self,
        meta: &M,
        capability: &CapabilitySet,
        candidate: &TypeRef,
    ) -> AdapterError {
        let candidate = type_name(meta, candidate);
        match self {
            ResolutionFailure::Missing { member } => AdapterError::MissingMember {
                capability: capability.name.clone(),
                candidate,
                member: member_signature(meta, &member),
            },
            ResolutionFailure::ArityExceeded {
                target,
                count,
                limit,
                ..
            } => AdapterError::ArityExceeded {
                capability: capability.name.clone(),
                candidate,
                member: member_signature(meta, &target),
                count,
                limit,
            },
        }
    }
}

/// Stateless resolver over a metadata provider.
pub struct Resolver<'m, M: MetadataProvider + ?Sized> {
    meta: &'m M,
    config: &'m EngineConfig,
}

impl<'m, M: MetadataProvider + ?Sized> Resolver<'m, M> {
    pub fn new(meta: &'m M, config: &'m EngineConfig) -> Self {
        Self { meta, config }
    }

    /// Resolve every required member of `capability` on `candidate`.
    #[tracing::instrument(
        level = "debug",
        skip(self, capability, candidate),
        fields(capability = %capability.name, candidate = %type_name(self.meta, candidate))
    )]
    pub fn resolve(
        &self,
        capability: &CapabilitySet,
        candidate: &TypeRef,
        mode: MatchMode,
    ) -> Result<Resolution, ResolutionFailure> {
        let chain = self.meta.ancestors(candidate);
        let limit = self.config.max_parameters;
        let mut matches = Vec::with_capacity(capability.members.len());

        for required in capability.required(mode) {
            let Some(found) =
                self.find_member(required, &chain, mode, |m| self.visible_to_provider(m))
            else {
                tracing::debug!(member = %required.name, "no match");
                return Err(ResolutionFailure::Missing {
                    member: required.clone(),
                });
            };
            if found.target.arity() > limit as usize {
                return Err(ResolutionFailure::ArityExceeded {
                    member: required.clone(),
                    count: found.target.arity(),
                    target: found.target,
                    limit,
                });
            }
            tracing::trace!(member = %required.name, depth = found.depth, "matched");
            matches.push(found);
        }

        Ok(Resolution {
            capability: capability.ty.clone(),
            candidate: candidate.clone(),
            mode,
            matches,
        })
    }

    /// Find the match for one required member along `chain` (an ancestor
    /// chain as produced by `MetadataProvider::ancestors`), considering only
    /// members accepted by `eligible`.
    pub fn find_member<F>(
        &self,
        required: &MemberDef,
        chain: &[TypeRef],
        mode: MatchMode,
        eligible: F,
    ) -> Option<MemberMatch>
    where
        F: Fn(&MemberDef) -> bool,
    {
        for (depth, level) in chain.iter().enumerate() {
            let Some(def) = level.def_id() else { continue };
            let found = self
                .meta
                .members_of(def)
                .into_iter()
                .filter(|m| eligible(*m))
                .map(|m| m.instantiate(def, level.args()))
                .find(|m| equivalent(required, m, mode));
            if let Some(target) = found {
                return Some(MemberMatch {
                    required: required.clone(),
                    target,
                    level: level.clone(),
                    depth,
                });
            }
        }
        None
    }

    /// Public members always; internal members when the declaring assembly
    /// grants internals visibility to the configured provider identity.
    pub fn visible_to_provider(&self, member: &MemberDef) -> bool {
        match member.visibility {
            Visibility::Public => true,
            Visibility::Internal => {
                let assembly = self.meta.type_def(member.declaring_type).assembly;
                self.meta
                    .grants_provider_access(assembly, &self.config.provider_identity)
            }
            Visibility::Private => false,
        }
    }
}
