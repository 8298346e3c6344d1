//! Member handles: a definition, or a definition with a substitution applied.
//!
//! A member of a constructed type (`B<D>.M`) or a constructed generic method (`D.M<int>`) is
//! identified by its definition plus the type arguments of its containing type and its own
//! method type arguments. Handles compare structurally over exactly that triple.
//!
//! Constructed handles are only created through
//! [`crate::symbols::typesystem::TypeRegistry::construct`], which canonicalises identity
//! substitutions to [`MemberHandle::Definition`] and caches every other construction, so
//! constructing the same member twice yields pointer-identical handles
//! ([`MemberHandle::is_same`]).

use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::symbols::{
    members::{MemberKind, MemberRc},
    overrides::OverriddenOrHiddenMembers,
    signatures::Signature,
    token::Token,
    typesystem::{Substitution, TypeSig},
};

/// A member with a non-identity substitution applied.
pub struct ConstructedMember {
    definition: MemberRc,
    type_args: Vec<TypeSig>,
    method_args: Vec<TypeSig>,
    signature: Signature,
    pub(crate) overridden_or_hidden: OnceLock<Arc<OverriddenOrHiddenMembers>>,
}

impl ConstructedMember {
    pub(crate) fn new(
        definition: MemberRc,
        type_args: Vec<TypeSig>,
        method_args: Vec<TypeSig>,
    ) -> Self {
        let subst = Substitution::new()
            .with(definition.owner, type_args.clone())
            .with(definition.token, method_args.clone());
        let signature = definition.signature.substitute(&subst);

        ConstructedMember {
            definition,
            type_args,
            method_args,
            signature,
            overridden_or_hidden: OnceLock::new(),
        }
    }
}

/// A reference to a member definition or to a constructed member.
#[derive(Clone)]
pub enum MemberHandle {
    /// The member as declared
    Definition(MemberRc),
    /// The member with type arguments applied
    Constructed(Arc<ConstructedMember>),
}

impl MemberHandle {
    /// The underlying definition.
    #[must_use]
    pub fn definition(&self) -> &MemberRc {
        match self {
            MemberHandle::Definition(member) => member,
            MemberHandle::Constructed(constructed) => &constructed.definition,
        }
    }

    /// Token of the underlying definition.
    #[must_use]
    pub fn token(&self) -> Token {
        self.definition().token
    }

    /// Declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition().name
    }

    /// Kind of member.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.definition().kind
    }

    /// Signature with the substitution applied.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        match self {
            MemberHandle::Definition(member) => &member.signature,
            MemberHandle::Constructed(constructed) => &constructed.signature,
        }
    }

    /// Type arguments of the containing type; empty when the containing type is used with
    /// its own parameters.
    #[must_use]
    pub fn type_args(&self) -> &[TypeSig] {
        match self {
            MemberHandle::Definition(_) => &[],
            MemberHandle::Constructed(constructed) => &constructed.type_args,
        }
    }

    /// Method type arguments; empty for unconstructed methods.
    #[must_use]
    pub fn method_args(&self) -> &[TypeSig] {
        match self {
            MemberHandle::Definition(_) => &[],
            MemberHandle::Constructed(constructed) => &constructed.method_args,
        }
    }

    /// Returns `true` for the definition itself.
    #[must_use]
    pub fn is_definition(&self) -> bool {
        matches!(self, MemberHandle::Definition(_))
    }

    /// Returns `true` for a generic method constructed with method type arguments.
    #[must_use]
    pub fn is_constructed_method(&self) -> bool {
        !self.method_args().is_empty()
    }

    /// The substitution mapping the definition's signature to this handle's signature.
    #[must_use]
    pub fn substitution(&self) -> Substitution {
        let definition = self.definition();
        Substitution::new()
            .with(definition.owner, self.type_args().to_vec())
            .with(definition.token, self.method_args().to_vec())
    }

    /// Pointer identity: both handles are the same cached object.
    #[must_use]
    pub fn is_same(&self, other: &MemberHandle) -> bool {
        match (self, other) {
            (MemberHandle::Definition(a), MemberHandle::Definition(b)) => Arc::ptr_eq(a, b),
            (MemberHandle::Constructed(a), MemberHandle::Constructed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn memo(&self) -> &OnceLock<Arc<OverriddenOrHiddenMembers>> {
        match self {
            MemberHandle::Definition(member) => &member.overridden_or_hidden,
            MemberHandle::Constructed(constructed) => &constructed.overridden_or_hidden,
        }
    }
}

impl PartialEq for MemberHandle {
    fn eq(&self, other: &Self) -> bool {
        self.token() == other.token()
            && self.type_args() == other.type_args()
            && self.method_args() == other.method_args()
    }
}

impl Eq for MemberHandle {}

impl Hash for MemberHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token().hash(state);
        self.type_args().hash(state);
        self.method_args().hash(state);
    }
}

impl std::fmt::Debug for MemberHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberHandle::Definition(member) => {
                write!(f, "Definition({}, {})", member.name, member.token)
            }
            MemberHandle::Constructed(constructed) => f
                .debug_struct("Constructed")
                .field("name", &constructed.definition.name)
                .field("token", &constructed.definition.token)
                .field("type_args", &constructed.type_args)
                .field("method_args", &constructed.method_args)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{
        members::Member,
        signatures::SignatureParameter,
        token::SymbolTable,
    };

    fn method() -> MemberRc {
        let owner = Token::from_parts(SymbolTable::TypeDef, 1);
        Arc::new(Member::new(
            Token::from_parts(SymbolTable::Method, 1),
            "M".into(),
            MemberKind::Method,
            owner,
            Signature::new(
                TypeSig::Void,
                vec![SignatureParameter::new("t", TypeSig::param(owner, 0))],
            ),
        ))
    }

    #[test]
    fn test_constructed_signature_is_substituted() {
        let definition = method();
        let int = TypeSig::named(Token::from_parts(SymbolTable::TypeDef, 7));
        let constructed = MemberHandle::Constructed(Arc::new(ConstructedMember::new(
            definition.clone(),
            vec![int.clone()],
            Vec::new(),
        )));

        assert_eq!(constructed.signature().params[0].ty, int);
        assert_eq!(
            definition.signature.params[0].ty,
            TypeSig::param(definition.owner, 0)
        );
        assert!(!constructed.is_constructed_method());
    }

    #[test]
    fn test_structural_equality() {
        let definition = method();
        let int = TypeSig::named(Token::from_parts(SymbolTable::TypeDef, 7));
        let a = MemberHandle::Constructed(Arc::new(ConstructedMember::new(
            definition.clone(),
            vec![int.clone()],
            Vec::new(),
        )));
        let b = MemberHandle::Constructed(Arc::new(ConstructedMember::new(
            definition.clone(),
            vec![int],
            Vec::new(),
        )));

        assert_eq!(a, b);
        assert!(!a.is_same(&b));
        assert!(a.is_same(&a.clone()));
        assert_ne!(a, MemberHandle::Definition(definition));
    }
}
