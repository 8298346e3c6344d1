//! Member definitions.
//!
//! A [`Member`] is immutable once registered, with one exception: the memoized
//! override/hiding classification, which is computed lazily on first query and then kept for
//! the lifetime of the member.

use std::sync::{Arc, OnceLock};

use crate::symbols::{
    diagnostics::Span,
    members::{AccessorKind, AccessorSlot, Accessibility, MemberKind, MemberModifiers},
    overrides::OverriddenOrHiddenMembers,
    signatures::Signature,
    token::Token,
    typesystem::GenericParamDef,
};

/// A reference-counted pointer to a [`Member`]
pub type MemberRc = Arc<Member>;

/// Tokens of the accessor methods owned by a property or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Accessors {
    /// `get` or `add`
    pub first: Option<Token>,
    /// `set`, `init` or `remove`
    pub second: Option<Token>,
}

impl Accessors {
    /// The accessor occupying `slot`.
    #[must_use]
    pub fn get(&self, slot: AccessorSlot) -> Option<Token> {
        match slot {
            AccessorSlot::First => self.first,
            AccessorSlot::Second => self.second,
        }
    }

    /// Iterates over present accessor tokens, first slot first.
    pub fn iter(&self) -> impl Iterator<Item = Token> {
        self.first.into_iter().chain(self.second)
    }
}

/// Back-reference from an accessor method to the property or event that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorOf {
    /// The owning property or event
    pub owner: Token,
    /// Which accessor this method is
    pub kind: AccessorKind,
}

/// A method, property, event or field declared by a named type.
pub struct Member {
    /// Definition token
    pub token: Token,
    /// Declared name; accessors use their metadata name (`get_P`)
    pub name: String,
    /// Kind of member
    pub kind: MemberKind,
    /// Declared accessibility
    pub accessibility: Accessibility,
    /// Declaration modifiers
    pub flags: MemberModifiers,
    /// The declaring type
    pub owner: Token,
    /// Shape used for matching; properties and fields keep their type in the return part
    pub signature: Signature,
    /// Method type parameters
    pub type_params: Vec<GenericParamDef>,
    /// Accessor methods of a property or event
    pub accessors: Accessors,
    /// Set for accessor methods
    pub accessor_of: Option<AccessorOf>,
    /// Properties only: declared as an indexer
    pub is_indexer: bool,
    /// Source location of the declaration (empty for metadata)
    pub span: Span,
    pub(crate) overridden_or_hidden: OnceLock<Arc<OverriddenOrHiddenMembers>>,
}

impl Member {
    /// Create a new member.
    ///
    /// ## Arguments
    /// * `token` - The definition token assigned by the registry
    /// * `name` - Declared name
    /// * `kind` - Kind of member
    /// * `owner` - The declaring type
    /// * `signature` - Shape of the member
    #[must_use]
    pub fn new(
        token: Token,
        name: String,
        kind: MemberKind,
        owner: Token,
        signature: Signature,
    ) -> Self {
        Member {
            token,
            name,
            kind,
            accessibility: Accessibility::Public,
            flags: MemberModifiers::empty(),
            owner,
            signature,
            type_params: Vec::new(),
            accessors: Accessors::default(),
            accessor_of: None,
            is_indexer: false,
            span: Span::default(),
            overridden_or_hidden: OnceLock::new(),
        }
    }

    /// Number of method type parameters.
    #[must_use]
    pub fn generic_arity(&self) -> usize {
        self.type_params.len()
    }

    /// Returns `true` for methods, including accessors.
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }

    /// Returns `true` for accessor methods of a property or event.
    #[must_use]
    pub fn is_accessor(&self) -> bool {
        self.accessor_of.is_some()
    }

    /// The accessor kind of an accessor method.
    #[must_use]
    pub fn accessor_kind(&self) -> Option<AccessorKind> {
        self.accessor_of.map(|a| a.kind)
    }

    /// Returns `true` if the member is declared `override`.
    #[must_use]
    pub fn is_override(&self) -> bool {
        self.flags.contains(MemberModifiers::OVERRIDE)
    }

    /// Returns `true` if the member is virtual, abstract or an override.
    #[must_use]
    pub fn is_in_virtual_chain(&self) -> bool {
        self.flags.is_in_virtual_chain()
    }

    /// Returns `true` if the member is declared `abstract`.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(MemberModifiers::ABSTRACT)
    }

    /// Returns `true` if the member is declared `sealed`.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.flags.contains(MemberModifiers::SEALED)
    }

    /// Returns `true` if the member is declared `static`.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberModifiers::STATIC)
    }

    /// Returns `true` for explicit interface implementations.
    #[must_use]
    pub fn is_explicit_impl(&self) -> bool {
        self.flags.contains(MemberModifiers::EXPLICIT_IMPL)
    }

    /// Returns `true` if the member carries the `new` modifier.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.flags.contains(MemberModifiers::NEW)
    }

    /// Returns the cached override/hiding classification, if it was computed already.
    #[must_use]
    pub fn cached_overridden_or_hidden(&self) -> Option<&Arc<OverriddenOrHiddenMembers>> {
        self.overridden_or_hidden.get()
    }
}

impl std::fmt::Debug for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("accessibility", &self.accessibility)
            .field("flags", &self.flags)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
