// src/adapter/shape.rs
//! Dispatch tables and the adapters that call through them.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::errors::{AdapterError, InvokeError};
use crate::identity::MemberId;
use crate::matching::{CapabilitySet, MatchMode, Resolution};
use crate::meta::display::{member_signature, type_name};
use crate::meta::{MemberKind, MetadataProvider, ParamDef, RefKind, TypeDefKind, TypeRef};
use crate::runtime::{Call, Callback, NativeFn, NativeRegistry, ObjectRef, Value};

/// One forwarding entry: a required member bound to the native body of the
/// member it resolved to.
pub struct Slot {
    pub kind: MemberKind,
    pub name: String,
    /// Parameter count, `out` and `ref` parameters included.
    pub arity: usize,
    pub generic_arity: usize,
    /// Signature of the required member, for error messages.
    pub signature: String,
    /// The candidate member the slot forwards to.
    pub target: MemberId,
    /// Ancestor depth the target was found at.
    pub depth: usize,
    params: Vec<ArgKind>,
    body: NativeFn,
}

/// Coarse runtime shape a parameter accepts, used to pick among overloads
/// that take the same number of arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgKind {
    Any,
    Bool,
    Int,
    Float,
    Str,
    List,
    Object,
}

impl ArgKind {
    fn of<M: MetadataProvider + ?Sized>(meta: &M, param: &ParamDef) -> Self {
        if param.ref_kind != RefKind::Value && param.ref_kind != RefKind::In {
            return ArgKind::Any;
        }
        match &param.ty {
            TypeRef::Array(_) => ArgKind::List,
            TypeRef::Named { def, .. } => {
                let def = meta.type_def(*def);
                if def.kind != TypeDefKind::Primitive {
                    return ArgKind::Object;
                }
                match def.full_name.as_str() {
                    "bool" => ArgKind::Bool,
                    "byte" | "int" | "long" => ArgKind::Int,
                    "float" | "double" => ArgKind::Float,
                    "char" | "string" => ArgKind::Str,
                    _ => ArgKind::Any,
                }
            }
            _ => ArgKind::Any,
        }
    }

    /// 2 for an exact fit, 1 for a wildcard, `None` if `value` cannot be passed.
    fn score(self, value: &Value) -> Option<u32> {
        let exact = match (self, value) {
            (ArgKind::Any, _) => return Some(1),
            (ArgKind::Bool, Value::Bool(_))
            | (ArgKind::Int, Value::Int(_))
            | (ArgKind::Float, Value::Float(_))
            | (ArgKind::Str, Value::Str(_))
            | (ArgKind::List, Value::List(_))
            | (ArgKind::Object, Value::Object(_) | Value::Callback(_)) => true,
            _ => false,
        };
        exact.then_some(2)
    }
}

impl Slot {
    /// Ordering key among overloads: generic arity fits, then argument kinds
    /// fit, then the number of exact kind matches.
    fn rank(&self, call: &Call) -> (bool, bool, u32) {
        let generic_fits = call.type_args.len() == self.generic_arity;
        let mut score = 0;
        for (kind, value) in self.params.iter().zip(&call.args) {
            match kind.score(value) {
                Some(s) => score += s,
                None => return (generic_fits, false, 0),
            }
        }
        (generic_fits, true, score)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("signature", &self.signature)
            .field("target", &self.target)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// Immutable dispatch table for one (capability, candidate, mode) triple.
#[derive(Debug)]
pub struct AdapterShape {
    pub capability: TypeRef,
    pub capability_name: String,
    pub candidate: TypeRef,
    pub candidate_name: String,
    pub mode: MatchMode,
    slots: Vec<Slot>,
    /// Slot indices by member name; overloads share a name.
    by_name: FxHashMap<String, SmallVec<[usize; 2]>>,
}

impl AdapterShape {
    /// Bind every match of `resolution` to its native body.
    pub(crate) fn build<M: MetadataProvider + ?Sized>(
        meta: &M,
        capability: &CapabilitySet,
        resolution: &Resolution,
        natives: &NativeRegistry,
    ) -> Result<Self, AdapterError> {
        let candidate_name = type_name(meta, &resolution.candidate);
        let mut slots = Vec::with_capacity(resolution.matches.len());
        let mut by_name: FxHashMap<String, SmallVec<[usize; 2]>> = FxHashMap::default();

        for m in &resolution.matches {
            let body = natives
                .get(m.target.id)
                .ok_or_else(|| AdapterError::Unbound {
                    capability: capability.name.clone(),
                    candidate: candidate_name.clone(),
                    member: member_signature(meta, &m.target),
                })?
                .clone();
            by_name
                .entry(m.required.name.clone())
                .or_default()
                .push(slots.len());
            slots.push(Slot {
                kind: m.required.kind,
                name: m.required.name.clone(),
                arity: m.required.arity(),
                generic_arity: m.required.generic_arity(),
                signature: member_signature(meta, &m.required),
                target: m.target.id,
                depth: m.depth,
                params: m.required.params.iter().map(|p| ArgKind::of(meta, p)).collect(),
                body,
            });
        }

        Ok(Self {
            capability: resolution.capability.clone(),
            capability_name: capability.name.clone(),
            candidate: resolution.candidate.clone(),
            candidate_name,
            mode: resolution.mode,
            slots,
            by_name,
        })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Find the slot for `name` of `kind` taking `call`. Overloads are
    /// narrowed by argument count (ignored for events), then ranked by
    /// generic arity and argument kinds; ties go to declaration order.
    pub fn lookup(
        &self,
        kind: MemberKind,
        name: &str,
        call: &Call,
    ) -> Result<&Slot, InvokeError> {
        let arity = call.args.len();
        let mut best: Option<(&Slot, (bool, bool, u32))> = None;
        for slot in self.by_name.get(name).into_iter().flatten().map(|i| &self.slots[*i]) {
            if slot.kind != kind || (kind != MemberKind::Event && slot.arity != arity) {
                continue;
            }
            let rank = slot.rank(call);
            if best.as_ref().is_none_or(|(_, r)| rank > *r) {
                best = Some((slot, rank));
            }
        }
        best.map(|(slot, _)| slot).ok_or_else(|| InvokeError::UnknownMember {
                capability: self.capability_name.clone(),
                kind: kind.as_str(),
                name: name.to_string(),
                arity,
            })
    }
}

/// A capability view over a wrapped instance (instance mode) or over a
/// type's static members (static mode).
#[derive(Debug, Clone)]
pub struct Adapter {
    shape: Arc<AdapterShape>,
    target: Option<ObjectRef>,
}

impl Adapter {
    pub(crate) fn new(shape: Arc<AdapterShape>, target: Option<ObjectRef>) -> Self {
        Self { shape, target }
    }

    pub fn shape(&self) -> &Arc<AdapterShape> {
        &self.shape
    }

    /// The wrapped instance; `None` for static adapters.
    pub fn target(&self) -> Option<&ObjectRef> {
        self.target.as_ref()
    }

    /// Call method `name`. `call.args` holds one value per declared
    /// parameter; `out` parameters take a placeholder and come back after
    /// the return value in a `Value::Tuple`.
    pub fn invoke(&self, name: &str, call: &Call) -> Result<Value, InvokeError> {
        let slot = self.shape.lookup(MemberKind::Method, name, call)?;
        self.forward(slot, call)
    }

    /// Read property `name`.
    pub fn get(&self, name: &str) -> Result<Value, InvokeError> {
        let call = Call::empty();
        let slot = self.shape.lookup(MemberKind::Property, name, &call)?;
        self.forward(slot, &call)
    }

    /// Read an indexer (instance mode only).
    pub fn index(&self, args: Vec<Value>) -> Result<Value, InvokeError> {
        let call = Call::new(args);
        let slot = self.shape.lookup(MemberKind::Property, "this[]", &call)?;
        self.forward(slot, &call)
    }

    /// Attach `handler` to event `name`.
    pub fn subscribe(&self, name: &str, handler: Callback) -> Result<Value, InvokeError> {
        let call = Call::new(vec![Value::Callback(handler)]);
        let slot = self.shape.lookup(MemberKind::Event, name, &call)?;
        self.forward(slot, &call)
    }

    fn forward(&self, slot: &Slot, call: &Call) -> Result<Value, InvokeError> {
        if call.type_args.len() != slot.generic_arity {
            return Err(InvokeError::GenericArity {
                member: slot.signature.clone(),
                expected: slot.generic_arity,
                found: call.type_args.len(),
            });
        }
        tracing::trace!(member = %slot.signature, "forward");
        (slot.body)(self.target.as_ref(), call).map_err(|e| InvokeError::Native {
            member: slot.signature.clone(),
            message: e.message,
        })
    }
}
