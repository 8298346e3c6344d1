//! Modifier flags, accessibility and kind enums shared by types and members.
//!
//! # Key Types
//! - [`Accessibility`]: Declared accessibility, ordered from most to least restrictive
//! - [`MemberModifiers`]: Declaration modifiers relevant to override and hiding analysis
//! - [`MemberKind`]: Method, property, event or field
//! - [`AccessorKind`]: Which accessor of a property or event a method implements

use std::fmt;

use bitflags::bitflags;

/// Bitmask for `ACCESS` state extraction from metadata member flags
pub const MEMBER_ACCESS_MASK: u32 = 0x0007;

/// Declared accessibility of a type or member.
///
/// Variants are ordered from most to least restrictive. The discriminants match the access
/// values of ECMA-335 member attributes, so metadata readers can use
/// [`Accessibility::from_access_flags`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Accessibility {
    /// Accessible only inside the declaring type
    Private = 1,
    /// `private protected`: derived types inside the declaring assembly
    ProtectedAndInternal = 2,
    /// `internal`: anything inside the declaring assembly
    Internal = 3,
    /// `protected`: the declaring type and derived types
    Protected = 4,
    /// `protected internal`: derived types anywhere, plus anything inside the assembly
    ProtectedOrInternal = 5,
    /// Accessible everywhere
    Public = 6,
}

impl Accessibility {
    /// Extract the accessibility from raw ECMA-335 member attribute flags.
    ///
    /// The compiler-controlled access value maps to [`Accessibility::Private`].
    #[must_use]
    pub fn from_access_flags(flags: u32) -> Self {
        match flags & MEMBER_ACCESS_MASK {
            2 => Accessibility::ProtectedAndInternal,
            3 => Accessibility::Internal,
            4 => Accessibility::Protected,
            5 => Accessibility::ProtectedOrInternal,
            6 => Accessibility::Public,
            _ => Accessibility::Private,
        }
    }

    /// Returns `true` if derived types in any assembly can see the member.
    #[must_use]
    pub fn grants_protected(&self) -> bool {
        matches!(
            self,
            Accessibility::Protected
                | Accessibility::ProtectedOrInternal
                | Accessibility::ProtectedAndInternal
                | Accessibility::Public
        )
    }

    /// Returns `true` if this accessibility depends on assembly boundaries.
    #[must_use]
    pub fn involves_internal(&self) -> bool {
        matches!(
            self,
            Accessibility::Internal
                | Accessibility::ProtectedOrInternal
                | Accessibility::ProtectedAndInternal
        )
    }

    /// The source keyword(s) for this accessibility.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Accessibility::Private => "private",
            Accessibility::ProtectedAndInternal => "private protected",
            Accessibility::Internal => "internal",
            Accessibility::Protected => "protected",
            Accessibility::ProtectedOrInternal => "protected internal",
            Accessibility::Public => "public",
        }
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Declaration modifiers of a member
    pub struct MemberModifiers: u32 {
        /// `virtual`
        const VIRTUAL = 0x0001;
        /// `abstract`
        const ABSTRACT = 0x0002;
        /// `override`
        const OVERRIDE = 0x0004;
        /// `sealed` (only meaningful together with `override`)
        const SEALED = 0x0008;
        /// `new`, explicitly hiding an inherited member
        const NEW = 0x0010;
        /// `static`
        const STATIC = 0x0020;
        /// `extern`
        const EXTERN = 0x0040;
        /// `required`
        const REQUIRED = 0x0080;
        /// `readonly` member of a value type
        const READONLY = 0x0100;
        /// Explicit interface implementation
        const EXPLICIT_IMPL = 0x0200;
        /// `unsafe`
        const UNSAFE = 0x0400;
        /// `partial`
        const PARTIAL = 0x0800;
    }
}

impl MemberModifiers {
    /// Modifiers that partial parts must agree on as a group (the extended modifiers).
    pub const EXTENDED: MemberModifiers = MemberModifiers::VIRTUAL
        .union(MemberModifiers::ABSTRACT)
        .union(MemberModifiers::OVERRIDE)
        .union(MemberModifiers::SEALED)
        .union(MemberModifiers::NEW)
        .union(MemberModifiers::EXTERN);

    /// Returns `true` if the member takes part in virtual dispatch: it is virtual, abstract
    /// or itself an override.
    #[must_use]
    pub fn is_in_virtual_chain(&self) -> bool {
        self.intersects(MemberModifiers::VIRTUAL | MemberModifiers::ABSTRACT | MemberModifiers::OVERRIDE)
    }

    /// Returns `true` for `sealed override`.
    #[must_use]
    pub fn is_sealed_override(&self) -> bool {
        self.contains(MemberModifiers::SEALED | MemberModifiers::OVERRIDE)
    }
}

/// The four kinds of members the resolver classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Methods, constructors, operators and accessors
    Method,
    /// Properties and indexers
    Property,
    /// Events
    Event,
    /// Fields and constants
    Field,
}

impl MemberKind {
    /// Returns `true` for members that own accessor methods.
    #[must_use]
    pub fn has_accessors(&self) -> bool {
        matches!(self, MemberKind::Property | MemberKind::Event)
    }
}

/// Which accessor of a property or event a method implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    /// Property `get`
    Get,
    /// Property `set`
    Set,
    /// Property `init`
    Init,
    /// Event `add`
    Add,
    /// Event `remove`
    Remove,
}

/// The two accessor positions a property or event has.
///
/// `set` and `init` share a slot: an `init` accessor overrides a `set` slot (and is then
/// rejected for the keyword mismatch, not for the missing slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorSlot {
    /// `get` or `add`
    First,
    /// `set`, `init` or `remove`
    Second,
}

impl AccessorKind {
    /// The slot this accessor occupies in its property or event.
    #[must_use]
    pub fn slot(&self) -> AccessorSlot {
        match self {
            AccessorKind::Get | AccessorKind::Add => AccessorSlot::First,
            AccessorKind::Set | AccessorKind::Init | AccessorKind::Remove => AccessorSlot::Second,
        }
    }

    /// The metadata name prefix of accessors of this kind.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            AccessorKind::Get => "get_",
            AccessorKind::Set | AccessorKind::Init => "set_",
            AccessorKind::Add => "add_",
            AccessorKind::Remove => "remove_",
        }
    }

    /// The source keyword of this accessor.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::Init => "init",
            AccessorKind::Add => "add",
            AccessorKind::Remove => "remove",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessibility_from_flags() {
        assert_eq!(Accessibility::from_access_flags(0x0006), Accessibility::Public);
        assert_eq!(Accessibility::from_access_flags(0x0005), Accessibility::ProtectedOrInternal);
        assert_eq!(Accessibility::from_access_flags(0x0001), Accessibility::Private);
        assert_eq!(Accessibility::from_access_flags(0x0000), Accessibility::Private);
        // only the access bits are considered
        assert_eq!(Accessibility::from_access_flags(0x00C4), Accessibility::Protected);
    }

    #[test]
    fn test_accessibility_ordering() {
        assert!(Accessibility::Private < Accessibility::Internal);
        assert!(Accessibility::Protected < Accessibility::Public);
        assert_eq!(Accessibility::ProtectedOrInternal.to_string(), "protected internal");
    }

    #[test]
    fn test_virtual_chain() {
        assert!(MemberModifiers::VIRTUAL.is_in_virtual_chain());
        assert!(MemberModifiers::ABSTRACT.is_in_virtual_chain());
        assert!((MemberModifiers::OVERRIDE | MemberModifiers::SEALED).is_in_virtual_chain());
        assert!(!(MemberModifiers::NEW | MemberModifiers::STATIC).is_in_virtual_chain());
        assert!((MemberModifiers::OVERRIDE | MemberModifiers::SEALED).is_sealed_override());
        assert!(!MemberModifiers::SEALED.is_sealed_override());
    }

    #[test]
    fn test_accessor_slots() {
        assert_eq!(AccessorKind::Set.slot(), AccessorKind::Init.slot());
        assert_ne!(AccessorKind::Get.slot(), AccessorKind::Set.slot());
        assert_eq!(AccessorKind::Add.slot(), AccessorSlot::First);
        assert_eq!(AccessorKind::Init.prefix(), "set_");
    }
}
