//! Identifiers of the framework types and members the compiler depends on.
//!
//! Every member enumerant is a dense index into a static recipe table
//! ([`crate::symbols::wellknown::SPECIAL_MEMBERS`],
//! [`crate::symbols::wellknown::WELL_KNOWN_MEMBERS`]) whose length is tied to `COUNT`.

use std::fmt;

use strum::{EnumCount, EnumIter};

/// Core library types resolved only from the core library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
#[allow(missing_docs)]
pub enum SpecialType {
    Object,
    Void,
    Boolean,
    Char,
    Int32,
    Int64,
    Double,
    String,
    IntPtr,
    ValueType,
    Enum,
    Array,
    Delegate,
    MulticastDelegate,
    NullableT,
    IDisposable,
    IEnumerable,
    IEnumerableT,
    IEnumerator,
    IEnumeratorT,
    RuntimeTypeHandle,
}

impl SpecialType {
    /// The metadata name of the type, with arity suffix.
    #[must_use]
    pub fn metadata_name(self) -> &'static str {
        match self {
            SpecialType::Object => "System.Object",
            SpecialType::Void => "System.Void",
            SpecialType::Boolean => "System.Boolean",
            SpecialType::Char => "System.Char",
            SpecialType::Int32 => "System.Int32",
            SpecialType::Int64 => "System.Int64",
            SpecialType::Double => "System.Double",
            SpecialType::String => "System.String",
            SpecialType::IntPtr => "System.IntPtr",
            SpecialType::ValueType => "System.ValueType",
            SpecialType::Enum => "System.Enum",
            SpecialType::Array => "System.Array",
            SpecialType::Delegate => "System.Delegate",
            SpecialType::MulticastDelegate => "System.MulticastDelegate",
            SpecialType::NullableT => "System.Nullable`1",
            SpecialType::IDisposable => "System.IDisposable",
            SpecialType::IEnumerable => "System.Collections.IEnumerable",
            SpecialType::IEnumerableT => "System.Collections.Generic.IEnumerable`1",
            SpecialType::IEnumerator => "System.Collections.IEnumerator",
            SpecialType::IEnumeratorT => "System.Collections.Generic.IEnumerator`1",
            SpecialType::RuntimeTypeHandle => "System.RuntimeTypeHandle",
        }
    }
}

/// Framework types looked up across all references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
#[allow(missing_docs)]
pub enum WellKnownType {
    Type,
    Monitor,
    DebuggerHiddenAttribute,
    DebuggerStepThroughAttribute,
    CompilerGeneratedAttribute,
    IteratorStateMachineAttribute,
    IsExternalInit,
    InAttribute,
    RequiresLocationAttribute,
    TupleElementNamesAttribute,
    Task,
    TaskT,
}

impl WellKnownType {
    /// The metadata name of the type, with arity suffix.
    #[must_use]
    pub fn metadata_name(self) -> &'static str {
        match self {
            WellKnownType::Type => "System.Type",
            WellKnownType::Monitor => "System.Threading.Monitor",
            WellKnownType::DebuggerHiddenAttribute => "System.Diagnostics.DebuggerHiddenAttribute",
            WellKnownType::DebuggerStepThroughAttribute => {
                "System.Diagnostics.DebuggerStepThroughAttribute"
            }
            WellKnownType::CompilerGeneratedAttribute => {
                "System.Runtime.CompilerServices.CompilerGeneratedAttribute"
            }
            WellKnownType::IteratorStateMachineAttribute => {
                "System.Runtime.CompilerServices.IteratorStateMachineAttribute"
            }
            WellKnownType::IsExternalInit => "System.Runtime.CompilerServices.IsExternalInit",
            WellKnownType::InAttribute => "System.Runtime.InteropServices.InAttribute",
            WellKnownType::RequiresLocationAttribute => {
                "System.Runtime.CompilerServices.RequiresLocationAttribute"
            }
            WellKnownType::TupleElementNamesAttribute => {
                "System.Runtime.CompilerServices.TupleElementNamesAttribute"
            }
            WellKnownType::Task => "System.Threading.Tasks.Task",
            WellKnownType::TaskT => "System.Threading.Tasks.Task`1",
        }
    }
}

/// Members of special types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
#[allow(missing_docs)]
pub enum SpecialMember {
    StringConcatStringString,
    StringConcatStringStringString,
    StringConcatStringStringStringString,
    StringConcatStringArray,
    StringConcatObject,
    StringConcatObjectObject,
    NullableTCtor,
    NullableTGetValueOrDefault,
    NullableTGetValueOrDefaultDefaultValue,
    NullableTGetHasValue,
    NullableTGetValue,
    IDisposableDispose,
    IEnumerableGetEnumerator,
    IEnumerableTGetEnumerator,
    IEnumeratorMoveNext,
    IEnumeratorGetCurrent,
    IEnumeratorReset,
    IEnumeratorTGetCurrent,
    ObjectEquals,
    ObjectToString,
    ObjectGetHashCode,
    ObjectFinalize,
}

/// Members of well-known types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
#[allow(missing_docs)]
pub enum WellKnownMember {
    TypeGetTypeFromHandle,
    MonitorEnter,
    MonitorEnterObjectRefBool,
    MonitorExit,
    DebuggerHiddenAttributeCtor,
    DebuggerStepThroughAttributeCtor,
    CompilerGeneratedAttributeCtor,
    IteratorStateMachineAttributeCtor,
    TupleElementNamesAttributeCtor,
}

/// A special or well-known member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberId {
    /// A member of a special type
    Special(SpecialMember),
    /// A member of a well-known type
    WellKnown(WellKnownMember),
}

impl From<SpecialMember> for MemberId {
    fn from(id: SpecialMember) -> Self {
        MemberId::Special(id)
    }
}

impl From<WellKnownMember> for MemberId {
    fn from(id: WellKnownMember) -> Self {
        MemberId::WellKnown(id)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberId::Special(id) => write!(f, "{id:?}"),
            MemberId::WellKnown(id) => write!(f, "{id:?}"),
        }
    }
}

/// A special or well-known type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeId {
    /// A special type
    Special(SpecialType),
    /// A well-known type
    WellKnown(WellKnownType),
}

impl TypeId {
    /// The metadata name of the type.
    #[must_use]
    pub fn metadata_name(self) -> &'static str {
        match self {
            TypeId::Special(id) => id.metadata_name(),
            TypeId::WellKnown(id) => id.metadata_name(),
        }
    }
}

impl From<SpecialType> for TypeId {
    fn from(id: SpecialType) -> Self {
        TypeId::Special(id)
    }
}

impl From<WellKnownType> for TypeId {
    fn from(id: WellKnownType) -> Self {
        TypeId::WellKnown(id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_metadata_names_are_unique() {
        let names: HashSet<&str> = SpecialType::iter()
            .map(SpecialType::metadata_name)
            .chain(WellKnownType::iter().map(WellKnownType::metadata_name))
            .collect();
        assert_eq!(names.len(), SpecialType::COUNT + WellKnownType::COUNT);
    }

    #[test]
    fn test_generic_types_carry_arity() {
        assert!(SpecialType::NullableT.metadata_name().ends_with("`1"));
        assert!(WellKnownType::TaskT.metadata_name().ends_with("`1"));
        assert_eq!(
            TypeId::from(SpecialType::IDisposable).metadata_name(),
            "System.IDisposable"
        );
    }
}
