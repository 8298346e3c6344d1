//! Type usages as they appear inside signatures.
//!
//! A [`TypeSig`] describes a *use* of a type: `List<T>`, `int[]`, `(int a, string b)`,
//! `string?`. Named types are referenced by the [`Token`] of their definition, generic
//! parameters by `(owner, ordinal)`, where the owner is either a type definition (class type
//! parameters) or a method definition (method type parameters).
//!
//! Constructed types are plain data: `B<D>` is `Named { def: B, args: [Named { def: D }] }`.
//! Walking from a derived type to its ancestors produces every ancestor in this form, already
//! expressed in the derived type's context, so member signatures of ancestors are compared by
//! applying a [`Substitution`] and then a structural comparison under a [`TypeCompareKind`].

use bitflags::bitflags;

use crate::symbols::token::Token;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Which differences a type comparison should ignore
    pub struct TypeCompareKind: u32 {
        /// Compare everything
        const CONSIDER_EVERYTHING = 0x0000;
        /// Ignore tuple element names
        const IGNORE_TUPLE_NAMES = 0x0001;
        /// Ignore nullable reference type annotations
        const IGNORE_NULLABILITY = 0x0002;
        /// Ignore custom modifiers (used by signature comparisons)
        const IGNORE_CUSTOM_MODIFIERS = 0x0004;
        /// Treat `in` and `ref readonly` parameters as the same ref kind
        const IGNORE_REF_READONLY_VS_IN = 0x0008;
    }
}

impl TypeCompareKind {
    /// Differences that never affect whether two members match for hiding or overriding.
    pub const MATCHING: TypeCompareKind = TypeCompareKind::IGNORE_TUPLE_NAMES
        .union(TypeCompareKind::IGNORE_NULLABILITY)
        .union(TypeCompareKind::IGNORE_CUSTOM_MODIFIERS)
        .union(TypeCompareKind::IGNORE_REF_READONLY_VS_IN);
}

/// One element of a tuple type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleElement {
    /// The element type
    pub ty: TypeSig,
    /// The declared element name, if any
    pub name: Option<String>,
}

/// A type usage inside a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSig {
    /// `void`, valid only as a return type
    Void,
    /// A named type, possibly constructed from a generic definition
    Named {
        /// Definition token of the type
        def: Token,
        /// Type arguments; empty for non-generic types and for generic definitions used
        /// without arguments
        args: Vec<TypeSig>,
    },
    /// A generic parameter of a type or method definition
    GenericParam {
        /// The declaring type or method
        owner: Token,
        /// Zero-based position in the declaring parameter list
        ordinal: u16,
    },
    /// An array of `element`
    Array {
        /// Element type
        element: Box<TypeSig>,
        /// Number of dimensions, 1 for `T[]`
        rank: u32,
    },
    /// An unmanaged pointer
    Pointer(Box<TypeSig>),
    /// A tuple type
    Tuple(Vec<TupleElement>),
    /// A reference type annotated as nullable (`string?`)
    Nullable(Box<TypeSig>),
}

impl TypeSig {
    /// A non-generic named type.
    #[must_use]
    pub fn named(def: Token) -> Self {
        TypeSig::Named {
            def,
            args: Vec::new(),
        }
    }

    /// A generic type constructed with `args`.
    #[must_use]
    pub fn generic(def: Token, args: Vec<TypeSig>) -> Self {
        TypeSig::Named { def, args }
    }

    /// The generic parameter `ordinal` of `owner`.
    #[must_use]
    pub fn param(owner: Token, ordinal: u16) -> Self {
        TypeSig::GenericParam { owner, ordinal }
    }

    /// A single-dimensional array of `element`.
    #[must_use]
    pub fn array(element: TypeSig) -> Self {
        TypeSig::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    /// A nullable-annotated use of `inner`.
    #[must_use]
    pub fn nullable(inner: TypeSig) -> Self {
        TypeSig::Nullable(Box::new(inner))
    }

    /// A tuple from `(type, name)` pairs.
    #[must_use]
    pub fn tuple(elements: Vec<(TypeSig, Option<&str>)>) -> Self {
        TypeSig::Tuple(
            elements
                .into_iter()
                .map(|(ty, name)| TupleElement {
                    ty,
                    name: name.map(str::to_string),
                })
                .collect(),
        )
    }

    /// The identity arguments `[T0, T1, ..]` of a generic definition with `arity` parameters.
    #[must_use]
    pub fn identity_args(owner: Token, arity: usize) -> Vec<TypeSig> {
        (0..arity)
            .map(|ordinal| TypeSig::param(owner, ordinal as u16))
            .collect()
    }

    /// Returns the definition token of a named type (looking through nullable annotations).
    #[must_use]
    pub fn definition(&self) -> Option<Token> {
        match self {
            TypeSig::Named { def, .. } => Some(*def),
            TypeSig::Nullable(inner) => inner.definition(),
            _ => None,
        }
    }

    /// Returns the type arguments of a named type, empty otherwise.
    #[must_use]
    pub fn type_args(&self) -> &[TypeSig] {
        match self {
            TypeSig::Named { args, .. } => args,
            TypeSig::Nullable(inner) => inner.type_args(),
            _ => &[],
        }
    }

    /// Returns `true` for `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, TypeSig::Void)
    }

    /// Returns the type with any top-level nullable annotation removed.
    #[must_use]
    pub fn without_nullable(&self) -> &TypeSig {
        match self {
            TypeSig::Nullable(inner) => inner.without_nullable(),
            other => other,
        }
    }

    /// Structural comparison that ignores the differences selected by `kind`.
    #[must_use]
    pub fn equals_with(&self, other: &TypeSig, kind: TypeCompareKind) -> bool {
        let (lhs, rhs) = if kind.contains(TypeCompareKind::IGNORE_NULLABILITY) {
            (self.without_nullable(), other.without_nullable())
        } else {
            (self, other)
        };

        match (lhs, rhs) {
            (TypeSig::Void, TypeSig::Void) => true,
            (
                TypeSig::Named { def: d1, args: a1 },
                TypeSig::Named { def: d2, args: a2 },
            ) => d1 == d2 && Self::all_equal(a1, a2, kind),
            (
                TypeSig::GenericParam {
                    owner: o1,
                    ordinal: n1,
                },
                TypeSig::GenericParam {
                    owner: o2,
                    ordinal: n2,
                },
            ) => o1 == o2 && n1 == n2,
            (
                TypeSig::Array {
                    element: e1,
                    rank: r1,
                },
                TypeSig::Array {
                    element: e2,
                    rank: r2,
                },
            ) => r1 == r2 && e1.equals_with(e2, kind),
            (TypeSig::Pointer(p1), TypeSig::Pointer(p2)) => p1.equals_with(p2, kind),
            (TypeSig::Tuple(t1), TypeSig::Tuple(t2)) => {
                t1.len() == t2.len()
                    && t1.iter().zip(t2).all(|(x, y)| {
                        (kind.contains(TypeCompareKind::IGNORE_TUPLE_NAMES) || x.name == y.name)
                            && x.ty.equals_with(&y.ty, kind)
                    })
            }
            (TypeSig::Nullable(n1), TypeSig::Nullable(n2)) => n1.equals_with(n2, kind),
            _ => false,
        }
    }

    fn all_equal(lhs: &[TypeSig], rhs: &[TypeSig], kind: TypeCompareKind) -> bool {
        lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(x, y)| x.equals_with(y, kind))
    }

    /// Applies `subst` to every generic parameter bound by it.
    ///
    /// Replacement types are inserted as-is and are not substituted again.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> TypeSig {
        if subst.is_empty() {
            return self.clone();
        }

        match self {
            TypeSig::Void => TypeSig::Void,
            TypeSig::Named { def, args } => TypeSig::Named {
                def: *def,
                args: args.iter().map(|arg| arg.substitute(subst)).collect(),
            },
            TypeSig::GenericParam { owner, ordinal } => subst
                .lookup(*owner, *ordinal)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeSig::Array { element, rank } => TypeSig::Array {
                element: Box::new(element.substitute(subst)),
                rank: *rank,
            },
            TypeSig::Pointer(inner) => TypeSig::Pointer(Box::new(inner.substitute(subst))),
            TypeSig::Tuple(elements) => TypeSig::Tuple(
                elements
                    .iter()
                    .map(|element| TupleElement {
                        ty: element.ty.substitute(subst),
                        name: element.name.clone(),
                    })
                    .collect(),
            ),
            TypeSig::Nullable(inner) => TypeSig::Nullable(Box::new(inner.substitute(subst))),
        }
    }

    /// Returns `true` if any tuple inside this type carries an element name.
    #[must_use]
    pub fn has_tuple_names(&self) -> bool {
        match self {
            TypeSig::Tuple(elements) => elements
                .iter()
                .any(|e| e.name.is_some() || e.ty.has_tuple_names()),
            TypeSig::Named { args, .. } => args.iter().any(TypeSig::has_tuple_names),
            TypeSig::Array { element, .. } => element.has_tuple_names(),
            TypeSig::Pointer(inner) | TypeSig::Nullable(inner) => inner.has_tuple_names(),
            TypeSig::Void | TypeSig::GenericParam { .. } => false,
        }
    }
}

/// A mapping from generic parameters to type arguments.
///
/// Each binding maps all parameters of one owner (a type or method definition) at once. A
/// parameter whose owner is not bound is left untouched by [`TypeSig::substitute`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Substitution {
    bindings: Vec<(Token, Vec<TypeSig>)>,
}

impl Substitution {
    /// Creates an empty substitution.
    #[must_use]
    pub fn new() -> Self {
        Substitution::default()
    }

    /// Adds a binding for `owner`'s parameters and returns the substitution.
    ///
    /// An empty `args` list leaves `owner`'s parameters unbound.
    #[must_use]
    pub fn with(mut self, owner: Token, args: Vec<TypeSig>) -> Self {
        self.bind(owner, args);
        self
    }

    /// Binds `owner`'s parameters to `args`, replacing a previous binding.
    pub fn bind(&mut self, owner: Token, args: Vec<TypeSig>) {
        if args.is_empty() {
            return;
        }
        if let Some(existing) = self.bindings.iter_mut().find(|(o, _)| *o == owner) {
            existing.1 = args;
        } else {
            self.bindings.push((owner, args));
        }
    }

    /// The substitution that maps the type arguments of a constructed named type.
    #[must_use]
    pub fn for_type(ty: &TypeSig) -> Self {
        match (ty.definition(), ty.type_args()) {
            (Some(def), args) if !args.is_empty() => Substitution::new().with(def, args.to_vec()),
            _ => Substitution::new(),
        }
    }

    /// Looks up the replacement for parameter `ordinal` of `owner`.
    #[must_use]
    pub fn lookup(&self, owner: Token, ordinal: u16) -> Option<&TypeSig> {
        self.bindings
            .iter()
            .find(|(o, _)| *o == owner)
            .and_then(|(_, args)| args.get(ordinal as usize))
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::token::SymbolTable;

    fn ty(row: u32) -> Token {
        Token::from_parts(SymbolTable::TypeDef, row)
    }

    #[test]
    fn test_substitute_type_params() {
        let list = ty(1);
        let base = ty(2);
        let derived = ty(3);

        // List<T_base>
        let sig = TypeSig::generic(list, vec![TypeSig::param(base, 0)]);
        let subst = Substitution::new().with(base, vec![TypeSig::named(derived)]);

        assert_eq!(
            sig.substitute(&subst),
            TypeSig::generic(list, vec![TypeSig::named(derived)])
        );
    }

    #[test]
    fn test_substitute_leaves_foreign_params() {
        let base = ty(2);
        let method = Token::from_parts(SymbolTable::Method, 1);
        let sig = TypeSig::param(method, 0);
        let subst = Substitution::new().with(base, vec![TypeSig::named(ty(9))]);
        assert_eq!(sig.substitute(&subst), sig);
    }

    #[test]
    fn test_substitution_is_single_pass() {
        let owner = ty(1);
        // T0 -> T1, T1 -> int; T0 must become T1, not int
        let subst = Substitution::new().with(
            owner,
            vec![TypeSig::param(owner, 1), TypeSig::named(ty(7))],
        );
        assert_eq!(
            TypeSig::param(owner, 0).substitute(&subst),
            TypeSig::param(owner, 1)
        );
    }

    #[test]
    fn test_equals_ignoring_tuple_names() {
        let int = TypeSig::named(ty(1));
        let a = TypeSig::tuple(vec![(int.clone(), Some("a")), (int.clone(), Some("b"))]);
        let b = TypeSig::tuple(vec![(int.clone(), Some("x")), (int.clone(), None)]);

        assert!(!a.equals_with(&b, TypeCompareKind::CONSIDER_EVERYTHING));
        assert!(a.equals_with(&b, TypeCompareKind::IGNORE_TUPLE_NAMES));
        assert!(a.has_tuple_names());
    }

    #[test]
    fn test_equals_ignoring_nullability() {
        let string = TypeSig::named(ty(4));
        let annotated = TypeSig::nullable(string.clone());

        assert!(!annotated.equals_with(&string, TypeCompareKind::CONSIDER_EVERYTHING));
        assert!(annotated.equals_with(&string, TypeCompareKind::IGNORE_NULLABILITY));

        let arr1 = TypeSig::array(annotated);
        let arr2 = TypeSig::array(string);
        assert!(arr1.equals_with(&arr2, TypeCompareKind::MATCHING));
    }

    #[test]
    fn test_for_type() {
        let base = ty(2);
        let constructed = TypeSig::generic(base, vec![TypeSig::named(ty(3))]);
        let subst = Substitution::for_type(&constructed);
        assert_eq!(subst.lookup(base, 0), Some(&TypeSig::named(ty(3))));
        assert!(Substitution::for_type(&TypeSig::named(base)).is_empty());
    }
}
