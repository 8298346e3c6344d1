//! Named type definitions.
//!
//! A [`NamedType`] is created once by the loader and never changes afterwards. The base type,
//! the interface list and the member list are filled in after the type itself exists (types
//! reference each other), which is why they use `OnceLock` and `boxcar::Vec` instead of plain
//! fields. Once population is complete all three are read-only.

use std::sync::{Arc, OnceLock};

use bitflags::bitflags;

use crate::symbols::{
    diagnostics::Span, members::Accessibility, token::Token, typesystem::TypeSig,
};

/// A reference-counted pointer to a [`NamedType`]
pub type NamedTypeRc = Arc<NamedType>;

/// The category of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Reference type with single inheritance
    Class,
    /// Interface, possibly with several base interfaces
    Interface,
    /// Value type
    Struct,
    /// Enumeration
    Enum,
    /// Delegate
    Delegate,
    /// A type that could not be resolved
    Error,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Declaration modifiers of a named type
    pub struct TypeModifiers: u32 {
        /// `abstract`
        const ABSTRACT = 0x0001;
        /// `sealed`
        const SEALED = 0x0002;
        /// `static`
        const STATIC = 0x0004;
    }
}

/// Declared variance of a generic type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variance {
    /// No variance annotation
    #[default]
    Invariant,
    /// `out T`
    Covariant,
    /// `in T`
    Contravariant,
}

/// A generic parameter declared by a type or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParamDef {
    /// Declared name (`T`, `TKey`, ..)
    pub name: String,
    /// Position in the declaring parameter list
    pub ordinal: u16,
    /// Declared variance (interfaces and delegates only)
    pub variance: Variance,
}

/// A named type definition: class, interface, struct, enum or delegate.
pub struct NamedType {
    /// Definition token
    pub token: Token,
    /// Namespace, empty for the global namespace
    pub namespace: String,
    /// Simple name without the generic arity suffix
    pub name: String,
    /// Category
    pub kind: TypeKind,
    /// Declared accessibility
    pub accessibility: Accessibility,
    /// Declaration modifiers
    pub flags: TypeModifiers,
    /// Declared generic parameters
    pub type_params: Vec<GenericParamDef>,
    /// The assembly that declares this type
    pub assembly: Token,
    /// Source location of the declaration (empty for metadata)
    pub span: Span,
    /// Base type, expressed in terms of this type's own generic parameters
    pub base: OnceLock<TypeSig>,
    /// Directly implemented interfaces, in declaration order
    pub interfaces: boxcar::Vec<TypeSig>,
    /// Declared members, in declaration order
    pub members: boxcar::Vec<Token>,
}

impl NamedType {
    /// Create a new named type without base, interfaces or members.
    ///
    /// ## Arguments
    /// * `token` - The definition token assigned by the registry
    /// * `namespace` - Namespace of the type
    /// * `name` - Simple name without arity suffix
    /// * `kind` - Category of the type
    /// * `accessibility` - Declared accessibility
    /// * `assembly` - The declaring assembly
    #[must_use]
    pub fn new(
        token: Token,
        namespace: String,
        name: String,
        kind: TypeKind,
        accessibility: Accessibility,
        assembly: Token,
    ) -> Self {
        NamedType {
            token,
            namespace,
            name,
            kind,
            accessibility,
            flags: TypeModifiers::empty(),
            type_params: Vec::new(),
            assembly,
            span: Span::default(),
            base: OnceLock::new(),
            interfaces: boxcar::Vec::new(),
            members: boxcar::Vec::new(),
        }
    }

    /// Number of declared generic parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    /// Namespace-qualified name without the arity suffix, e.g. `System.Nullable`.
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Namespace-qualified name with the arity suffix, e.g. ``System.Nullable`1``.
    #[must_use]
    pub fn metadata_name(&self) -> String {
        match self.arity() {
            0 => self.fullname(),
            n => format!("{}`{}", self.fullname(), n),
        }
    }

    /// This type used with its own generic parameters as arguments.
    #[must_use]
    pub fn self_sig(&self) -> TypeSig {
        TypeSig::generic(self.token, TypeSig::identity_args(self.token, self.arity()))
    }

    /// The declared base type, if any.
    #[must_use]
    pub fn base(&self) -> Option<&TypeSig> {
        self.base.get()
    }

    /// Set the base type. Returns `false` if a base type was already set.
    pub fn set_base(&self, base: TypeSig) -> bool {
        self.base.set(base).is_ok()
    }

    /// Returns `true` for interfaces.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Returns `true` for classes.
    #[must_use]
    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    /// Returns `true` for structs.
    #[must_use]
    pub fn is_struct(&self) -> bool {
        self.kind == TypeKind::Struct
    }

    /// Returns `true` if the type is declared `abstract`.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(TypeModifiers::ABSTRACT)
    }

    /// Declared member tokens in declaration order.
    #[must_use]
    pub fn member_tokens(&self) -> Vec<Token> {
        self.members.iter().map(|(_, token)| *token).collect()
    }

    /// Directly implemented interfaces in declaration order.
    #[must_use]
    pub fn declared_interfaces(&self) -> Vec<TypeSig> {
        self.interfaces.iter().map(|(_, sig)| sig.clone()).collect()
    }
}

impl std::fmt::Debug for NamedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedType")
            .field("token", &self.token)
            .field("name", &self.metadata_name())
            .field("kind", &self.kind)
            .field("accessibility", &self.accessibility)
            .field("assembly", &self.assembly)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::token::SymbolTable;

    fn named(name: &str, arity: usize) -> NamedType {
        let token = Token::from_parts(SymbolTable::TypeDef, 1);
        let mut ty = NamedType::new(
            token,
            "System".into(),
            name.into(),
            TypeKind::Struct,
            Accessibility::Public,
            Token::from_parts(SymbolTable::Assembly, 1),
        );
        ty.type_params = (0..arity)
            .map(|i| GenericParamDef {
                name: format!("T{i}"),
                ordinal: i as u16,
                variance: Variance::Invariant,
            })
            .collect();
        ty
    }

    #[test]
    fn test_metadata_name() {
        assert_eq!(named("Nullable", 1).metadata_name(), "System.Nullable`1");
        assert_eq!(named("Int32", 0).metadata_name(), "System.Int32");
        assert_eq!(named("Nullable", 1).fullname(), "System.Nullable");
    }

    #[test]
    fn test_self_sig() {
        let ty = named("Pair", 2);
        assert_eq!(
            ty.self_sig(),
            TypeSig::generic(
                ty.token,
                vec![TypeSig::param(ty.token, 0), TypeSig::param(ty.token, 1)]
            )
        );
    }

    #[test]
    fn test_base_set_once() {
        let ty = named("Int32", 0);
        let value_type = TypeSig::named(Token::from_parts(SymbolTable::TypeDef, 2));
        assert!(ty.set_base(value_type.clone()));
        assert!(!ty.set_base(value_type.clone()));
        assert_eq!(ty.base(), Some(&value_type));
    }
}
