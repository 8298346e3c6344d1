//! Signature data model.
//!
//! # Key Types
//! - [`Signature`]: Generic arity, parameters and return of a member
//! - [`SignatureParameter`]: One parameter with ref kind, custom modifiers and flags
//! - [`SignatureReturn`]: Return type with ref kind and custom modifiers
//! - [`RefKind`]: By-value or one of the by-reference kinds
//! - [`CustomModifier`]: A `modreq`/`modopt` attached to a parameter or return

use crate::symbols::{
    token::Token,
    typesystem::{Substitution, TypeSig},
};

/// How a parameter or return value is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefKind {
    /// By value
    #[default]
    None,
    /// `ref`
    Ref,
    /// `out`
    Out,
    /// `in`
    In,
    /// `ref readonly`
    RefReadonly,
}

impl RefKind {
    /// Returns `true` for any by-reference kind.
    #[must_use]
    pub fn is_by_ref(&self) -> bool {
        !matches!(self, RefKind::None)
    }

    /// Returns `true` for the two read-only reference kinds.
    #[must_use]
    pub fn is_readonly_ref(&self) -> bool {
        matches!(self, RefKind::In | RefKind::RefReadonly)
    }

    /// Compares two ref kinds, optionally treating `in` and `ref readonly` as one kind.
    ///
    /// `ref`, `out` and the read-only kinds stay distinct in every mode.
    #[must_use]
    pub fn matches(&self, other: RefKind, ignore_readonly_vs_in: bool) -> bool {
        if ignore_readonly_vs_in && self.is_readonly_ref() && other.is_readonly_ref() {
            return true;
        }
        *self == other
    }
}

/// A custom modifier attached to a parameter or return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomModifier {
    /// `true` for `modreq`, `false` for `modopt`
    pub required: bool,
    /// The modifier type
    pub modifier: Token,
}

/// One parameter of a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureParameter {
    /// Declared name; never part of matching
    pub name: String,
    /// Parameter type
    pub ty: TypeSig,
    /// How the parameter is passed
    pub ref_kind: RefKind,
    /// Custom modifiers on the parameter type
    pub modifiers: Vec<CustomModifier>,
    /// `params` array parameter
    pub is_params: bool,
    /// `scoped` parameter
    pub scoped: bool,
}

impl SignatureParameter {
    /// A by-value parameter without modifiers.
    #[must_use]
    pub fn new(name: &str, ty: TypeSig) -> Self {
        SignatureParameter {
            name: name.to_string(),
            ty,
            ref_kind: RefKind::None,
            modifiers: Vec::new(),
            is_params: false,
            scoped: false,
        }
    }

    /// Sets the ref kind.
    #[must_use]
    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    /// Appends a custom modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: CustomModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Marks the parameter as a `params` array.
    #[must_use]
    pub fn params(mut self) -> Self {
        self.is_params = true;
        self
    }

    /// Marks the parameter as `scoped`.
    #[must_use]
    pub fn scoped(mut self) -> Self {
        self.scoped = true;
        self
    }
}

/// The return part of a signature. Properties store their type here, fields their field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureReturn {
    /// Return type
    pub ty: TypeSig,
    /// `ref` / `ref readonly` returns
    pub ref_kind: RefKind,
    /// Custom modifiers on the return type
    pub modifiers: Vec<CustomModifier>,
}

/// The canonical shape of a member used for matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Number of method type parameters
    pub generic_arity: u16,
    /// Parameters in declaration order
    pub params: Vec<SignatureParameter>,
    /// Return part
    pub ret: SignatureReturn,
}

impl Signature {
    /// A non-generic signature returning `ret` and taking `params`.
    #[must_use]
    pub fn new(ret: TypeSig, params: Vec<SignatureParameter>) -> Self {
        Signature {
            generic_arity: 0,
            params,
            ret: SignatureReturn {
                ty: ret,
                ref_kind: RefKind::None,
                modifiers: Vec::new(),
            },
        }
    }

    /// `void ()`.
    #[must_use]
    pub fn void() -> Self {
        Signature::new(TypeSig::Void, Vec::new())
    }

    /// Applies `subst` to the return type and every parameter type.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> Signature {
        if subst.is_empty() {
            return self.clone();
        }

        Signature {
            generic_arity: self.generic_arity,
            params: self
                .params
                .iter()
                .map(|param| SignatureParameter {
                    ty: param.ty.substitute(subst),
                    ..param.clone()
                })
                .collect(),
            ret: SignatureReturn {
                ty: self.ret.ty.substitute(subst),
                ref_kind: self.ret.ref_kind,
                modifiers: self.ret.modifiers.clone(),
            },
        }
    }
}
