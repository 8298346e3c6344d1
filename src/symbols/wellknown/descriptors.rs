//! Static lookup recipes for special and well-known members.
//!
//! Each recipe names the declaring type, the member name, the member kind and the
//! signature shape in terms of other special/well-known types. Tables are indexed by the
//! discriminant of the corresponding id enum.

use strum::EnumCount;

use crate::symbols::{
    members::MemberKind,
    wellknown::{MemberId, SpecialMember, SpecialType, TypeId, WellKnownMember, WellKnownType},
};

/// A type in a member recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigTy {
    /// `void`
    Void,
    /// A special type
    Special(SpecialType),
    /// A well-known type
    WellKnown(WellKnownType),
    /// Type parameter of the declaring type
    TypeParam(u16),
    /// Type parameter of the member itself
    MethodParam(u16),
    /// Single-dimensional array
    SzArray(&'static SigTy),
    /// A generic type constructed with arguments
    Generic(&'static SigTy, &'static [SigTy]),
    /// Passed by `ref`; only valid at the top level of a parameter
    ByRef(&'static SigTy),
}

/// The lookup recipe of one special or well-known member.
#[derive(Debug, Clone, Copy)]
pub struct MemberDescriptor {
    /// The member this recipe resolves
    pub id: MemberId,
    /// Kind of member
    pub kind: MemberKind,
    /// `static` members only match static declarations and vice versa
    pub is_static: bool,
    /// Declaring type
    pub declaring_type: TypeId,
    /// Metadata name
    pub name: &'static str,
    /// Number of method type parameters
    pub arity: u16,
    /// Return type
    pub returns: SigTy,
    /// Parameter types
    pub params: &'static [SigTy],
}

const STRING: SigTy = SigTy::Special(SpecialType::String);
const OBJECT: SigTy = SigTy::Special(SpecialType::Object);
const BOOLEAN: SigTy = SigTy::Special(SpecialType::Boolean);
const T: SigTy = SigTy::TypeParam(0);

macro_rules! special {
    ($member:ident, $ty:ident) => {
        (
            MemberId::Special(SpecialMember::$member),
            TypeId::Special(SpecialType::$ty),
        )
    };
}

macro_rules! well_known {
    ($member:ident, $ty:ident) => {
        (
            MemberId::WellKnown(WellKnownMember::$member),
            TypeId::WellKnown(WellKnownType::$ty),
        )
    };
}

const fn recipe(
    ids: (MemberId, TypeId),
    is_static: bool,
    name: &'static str,
    returns: SigTy,
    params: &'static [SigTy],
) -> MemberDescriptor {
    MemberDescriptor {
        id: ids.0,
        kind: MemberKind::Method,
        is_static,
        declaring_type: ids.1,
        name,
        arity: 0,
        returns,
        params,
    }
}

/// Recipes of [`SpecialMember`], indexed by discriminant.
pub static SPECIAL_MEMBERS: [MemberDescriptor; SpecialMember::COUNT] = [
    recipe(special!(StringConcatStringString, String), true, "Concat", STRING, &[STRING, STRING]),
    recipe(
        special!(StringConcatStringStringString, String),
        true,
        "Concat",
        STRING,
        &[STRING, STRING, STRING],
    ),
    recipe(
        special!(StringConcatStringStringStringString, String),
        true,
        "Concat",
        STRING,
        &[STRING, STRING, STRING, STRING],
    ),
    recipe(
        special!(StringConcatStringArray, String),
        true,
        "Concat",
        STRING,
        &[SigTy::SzArray(&STRING)],
    ),
    recipe(special!(StringConcatObject, String), true, "Concat", STRING, &[OBJECT]),
    recipe(special!(StringConcatObjectObject, String), true, "Concat", STRING, &[OBJECT, OBJECT]),
    recipe(special!(NullableTCtor, NullableT), false, ".ctor", SigTy::Void, &[T]),
    recipe(special!(NullableTGetValueOrDefault, NullableT), false, "GetValueOrDefault", T, &[]),
    recipe(
        special!(NullableTGetValueOrDefaultDefaultValue, NullableT),
        false,
        "GetValueOrDefault",
        T,
        &[T],
    ),
    recipe(special!(NullableTGetHasValue, NullableT), false, "get_HasValue", BOOLEAN, &[]),
    recipe(special!(NullableTGetValue, NullableT), false, "get_Value", T, &[]),
    recipe(special!(IDisposableDispose, IDisposable), false, "Dispose", SigTy::Void, &[]),
    recipe(
        special!(IEnumerableGetEnumerator, IEnumerable),
        false,
        "GetEnumerator",
        SigTy::Special(SpecialType::IEnumerator),
        &[],
    ),
    recipe(
        special!(IEnumerableTGetEnumerator, IEnumerableT),
        false,
        "GetEnumerator",
        SigTy::Generic(&SigTy::Special(SpecialType::IEnumeratorT), &[T]),
        &[],
    ),
    recipe(special!(IEnumeratorMoveNext, IEnumerator), false, "MoveNext", BOOLEAN, &[]),
    recipe(special!(IEnumeratorGetCurrent, IEnumerator), false, "get_Current", OBJECT, &[]),
    recipe(special!(IEnumeratorReset, IEnumerator), false, "Reset", SigTy::Void, &[]),
    recipe(special!(IEnumeratorTGetCurrent, IEnumeratorT), false, "get_Current", T, &[]),
    recipe(special!(ObjectEquals, Object), false, "Equals", BOOLEAN, &[OBJECT]),
    recipe(special!(ObjectToString, Object), false, "ToString", STRING, &[]),
    recipe(
        special!(ObjectGetHashCode, Object),
        false,
        "GetHashCode",
        SigTy::Special(SpecialType::Int32),
        &[],
    ),
    recipe(special!(ObjectFinalize, Object), false, "Finalize", SigTy::Void, &[]),
];

/// Recipes of [`WellKnownMember`], indexed by discriminant.
pub static WELL_KNOWN_MEMBERS: [MemberDescriptor; WellKnownMember::COUNT] = [
    recipe(
        well_known!(TypeGetTypeFromHandle, Type),
        true,
        "GetTypeFromHandle",
        SigTy::WellKnown(WellKnownType::Type),
        &[SigTy::Special(SpecialType::RuntimeTypeHandle)],
    ),
    recipe(well_known!(MonitorEnter, Monitor), true, "Enter", SigTy::Void, &[OBJECT]),
    recipe(
        well_known!(MonitorEnterObjectRefBool, Monitor),
        true,
        "Enter",
        SigTy::Void,
        &[OBJECT, SigTy::ByRef(&BOOLEAN)],
    ),
    recipe(well_known!(MonitorExit, Monitor), true, "Exit", SigTy::Void, &[OBJECT]),
    recipe(
        well_known!(DebuggerHiddenAttributeCtor, DebuggerHiddenAttribute),
        false,
        ".ctor",
        SigTy::Void,
        &[],
    ),
    recipe(
        well_known!(DebuggerStepThroughAttributeCtor, DebuggerStepThroughAttribute),
        false,
        ".ctor",
        SigTy::Void,
        &[],
    ),
    recipe(
        well_known!(CompilerGeneratedAttributeCtor, CompilerGeneratedAttribute),
        false,
        ".ctor",
        SigTy::Void,
        &[],
    ),
    recipe(
        well_known!(IteratorStateMachineAttributeCtor, IteratorStateMachineAttribute),
        false,
        ".ctor",
        SigTy::Void,
        &[SigTy::WellKnown(WellKnownType::Type)],
    ),
    recipe(
        well_known!(TupleElementNamesAttributeCtor, TupleElementNamesAttribute),
        false,
        ".ctor",
        SigTy::Void,
        &[SigTy::SzArray(&STRING)],
    ),
];

/// The recipe for `id`.
#[must_use]
pub fn descriptor(id: MemberId) -> &'static MemberDescriptor {
    match id {
        MemberId::Special(id) => &SPECIAL_MEMBERS[id as usize],
        MemberId::WellKnown(id) => &WELL_KNOWN_MEMBERS[id as usize],
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_every_special_member_has_its_recipe() {
        assert_eq!(SPECIAL_MEMBERS.len(), SpecialMember::COUNT);
        for id in SpecialMember::iter() {
            assert_eq!(descriptor(id.into()).id, MemberId::Special(id));
        }
    }

    #[test]
    fn test_every_well_known_member_has_its_recipe() {
        assert_eq!(WELL_KNOWN_MEMBERS.len(), WellKnownMember::COUNT);
        for id in WellKnownMember::iter() {
            assert_eq!(descriptor(id.into()).id, MemberId::WellKnown(id));
        }
    }

    #[test]
    fn test_special_members_live_on_special_types() {
        for recipe in &SPECIAL_MEMBERS {
            assert!(matches!(recipe.declaring_type, TypeId::Special(_)));
        }
        for recipe in &WELL_KNOWN_MEMBERS {
            assert!(matches!(recipe.declaring_type, TypeId::WellKnown(_)));
        }
    }

    #[test]
    fn test_constructors_are_instance_members() {
        for recipe in SPECIAL_MEMBERS.iter().chain(&WELL_KNOWN_MEMBERS) {
            if recipe.name == ".ctor" {
                assert!(!recipe.is_static);
                assert_eq!(recipe.returns, SigTy::Void);
            }
        }
    }
}
