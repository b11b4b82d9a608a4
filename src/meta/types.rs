// src/meta/types.rs
//! Type references and generic parameter descriptors.

use crate::identity::TypeDefId;

/// Which declaration introduces a generic parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamOwner {
    /// Declared by the method whose signature mentions it.
    Method,
    /// Declared by a generic type definition.
    Type(TypeDefId),
}

/// A use of a generic parameter inside a signature.
///
/// The name is carried for display only; equivalence is positional.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericParamRef {
    pub owner: ParamOwner,
    pub position: u16,
    pub name: String,
}

/// A reference to a type as it appears in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A type definition, instantiated with `args` when it is generic.
    Named { def: TypeDefId, args: Vec<TypeRef> },
    /// A generic parameter.
    Param(GenericParamRef),
    /// Single-dimension array of the element type.
    Array(Box<TypeRef>),
    /// Absence of a value (method returns only).
    Void,
    /// Placeholder for a type that failed to resolve.
    Error,
}

impl TypeRef {
    /// Non-generic reference to `def`.
    pub fn named(def: TypeDefId) -> Self {
        TypeRef::Named {
            def,
            args: Vec::new(),
        }
    }

    /// Instantiation of generic definition `def` with `args`.
    pub fn generic(def: TypeDefId, args: Vec<TypeRef>) -> Self {
        TypeRef::Named { def, args }
    }

    /// Method-level generic parameter at `position`.
    pub fn method_param(position: u16, name: &str) -> Self {
        TypeRef::Param(GenericParamRef {
            owner: ParamOwner::Method,
            position,
            name: name.to_string(),
        })
    }

    /// Type-level generic parameter of `owner` at `position`.
    pub fn type_param(owner: TypeDefId, position: u16, name: &str) -> Self {
        TypeRef::Param(GenericParamRef {
            owner: ParamOwner::Type(owner),
            position,
            name: name.to_string(),
        })
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    /// The definition this reference names, if any.
    pub fn def_id(&self) -> Option<TypeDefId> {
        match self {
            TypeRef::Named { def, .. } => Some(*def),
            _ => None,
        }
    }

    /// Type arguments of a named instantiation (empty otherwise).
    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Named { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeRef::Error)
    }

    pub fn is_generic_param(&self) -> bool {
        matches!(self, TypeRef::Param(_))
    }

    /// True if an error placeholder occurs anywhere inside this reference.
    pub fn contains_error(&self) -> bool {
        match self {
            TypeRef::Error => true,
            TypeRef::Named { args, .. } => args.iter().any(TypeRef::contains_error),
            TypeRef::Array(element) => element.contains_error(),
            TypeRef::Param(_) | TypeRef::Void => false,
        }
    }

    /// Replace the type-level parameters of `owner` with `args`.
    ///
    /// Parameters with no corresponding argument are left in place, so an open
    /// instantiation (no arguments) substitutes to itself.
    pub fn substitute(&self, owner: TypeDefId, args: &[TypeRef]) -> TypeRef {
        if args.is_empty() {
            return self.clone();
        }
        match self {
            TypeRef::Param(p) if p.owner == ParamOwner::Type(owner) => args
                .get(p.position as usize)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeRef::Named { def, args: inner } => TypeRef::Named {
                def: *def,
                args: inner.iter().map(|a| a.substitute(owner, args)).collect(),
            },
            TypeRef::Array(element) => TypeRef::array(element.substitute(owner, args)),
            TypeRef::Param(_) | TypeRef::Void | TypeRef::Error => self.clone(),
        }
    }
}

/// Declared variance of a generic parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variance {
    #[default]
    Invariant,
    Covariant,
    Contravariant,
}

/// Declaration of a generic parameter with its constraints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericParamDef {
    pub name: String,
    pub variance: Variance,
    /// Requires a public parameterless constructor.
    pub constructor: bool,
    /// Requires a reference type.
    pub reference_type: bool,
    /// Requires a value type.
    pub value_type: bool,
    /// Constraint types, in declaration order.
    pub constraints: Vec<TypeRef>,
}

impl GenericParamDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variance: Variance::Invariant,
            constructor: false,
            reference_type: false,
            value_type: false,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: TypeRef) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_variance(mut self, variance: Variance) -> Self {
        self.variance = variance;
        self
    }

    pub fn reference_type(mut self) -> Self {
        self.reference_type = true;
        self
    }

    pub fn value_type(mut self) -> Self {
        self.value_type = true;
        self
    }

    pub fn constructor(mut self) -> Self {
        self.constructor = true;
        self
    }

    /// Variance and special-constraint flags agree (constraint types are not compared).
    pub fn same_flags(&self, other: &GenericParamDef) -> bool {
        self.variance == other.variance
            && self.constructor == other.constructor
            && self.reference_type == other.reference_type
            && self.value_type == other.value_type
    }

    pub fn substitute(&self, owner: TypeDefId, args: &[TypeRef]) -> GenericParamDef {
        GenericParamDef {
            constraints: self
                .constraints
                .iter()
                .map(|c| c.substitute(owner, args))
                .collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(i: u32) -> TypeDefId {
        TypeDefId::new(i)
    }

    #[test]
    fn substitute_replaces_owner_params_only() {
        let list = def(1);
        let parser = def(2);
        let other = def(3);
        let ty = TypeRef::generic(
            list,
            vec![
                TypeRef::type_param(parser, 0, "T"),
                TypeRef::type_param(other, 0, "U"),
                TypeRef::method_param(0, "M"),
            ],
        );
        let int = TypeRef::named(def(9));
        let out = ty.substitute(parser, &[int.clone()]);
        assert_eq!(
            out,
            TypeRef::generic(
                list,
                vec![
                    int,
                    TypeRef::type_param(other, 0, "U"),
                    TypeRef::method_param(0, "M"),
                ],
            )
        );
    }

    #[test]
    fn substitute_with_no_args_is_identity() {
        let ty = TypeRef::array(TypeRef::type_param(def(2), 0, "T"));
        assert_eq!(ty.substitute(def(2), &[]), ty);
    }

    #[test]
    fn contains_error_looks_inside_arguments() {
        let ty = TypeRef::generic(def(1), vec![TypeRef::array(TypeRef::Error)]);
        assert!(ty.contains_error());
        assert!(!TypeRef::named(def(1)).contains_error());
    }

    #[test]
    fn same_flags_ignores_names_and_constraints() {
        let a = GenericParamDef::new("T").reference_type();
        let b = GenericParamDef::new("U")
            .reference_type()
            .with_constraint(TypeRef::named(def(4)));
        assert!(a.same_flags(&b));
        assert!(!a.same_flags(&GenericParamDef::new("T")));
    }
}
