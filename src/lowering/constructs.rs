//! Language constructs whose lowering depends on framework members.

use std::fmt;

use crate::symbols::wellknown::{MemberId, SpecialMember, WellKnownMember};

/// A construct that lowering rewrites into calls to special or well-known members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoweringConstruct {
    /// A binary operator lifted over `Nullable<T>` operands, e.g. `int? + int?`
    LiftedOperator,
    /// `++` or `--` on a `Nullable<T>` operand
    LiftedIncrement,
    /// A method body containing `yield return`
    Iterator {
        /// The iterator returns `IEnumerable<T>` rather than `IEnumerator<T>`
        enumerable: bool,
    },
    /// String concatenation with `+`
    StringConcat {
        /// Number of string operands after flattening
        operands: usize,
    },
    /// `foreach` over an enumerable
    ForEach {
        /// The collection implements `IEnumerable<T>`
        generic: bool,
    },
    /// A `using` statement or declaration
    Using,
    /// A `lock` statement
    Lock,
}

impl LoweringConstruct {
    /// The members the lowering of this construct uses, in the order it uses them.
    ///
    /// A member used twice appears twice; every use is resolved and reported on its own.
    #[must_use]
    pub fn required_members(&self) -> Vec<MemberId> {
        use SpecialMember as S;
        use WellKnownMember as W;

        let special = |ids: &[SpecialMember]| ids.iter().copied().map(MemberId::from).collect();
        match *self {
            LoweringConstruct::LiftedOperator => special(&[
                S::NullableTGetValueOrDefault,
                S::NullableTGetValueOrDefault,
                S::NullableTGetHasValue,
                S::NullableTGetHasValue,
                S::NullableTCtor,
            ]),
            LoweringConstruct::LiftedIncrement => special(&[
                S::NullableTGetHasValue,
                S::NullableTGetValueOrDefault,
                S::NullableTCtor,
            ]),
            LoweringConstruct::Iterator { enumerable } => {
                let mut members: Vec<MemberId> = special(&[
                    S::IEnumeratorTGetCurrent,
                    S::IDisposableDispose,
                    S::IEnumeratorGetCurrent,
                    S::IEnumeratorMoveNext,
                    S::IEnumeratorReset,
                ]);
                if enumerable {
                    members.push(S::IEnumerableTGetEnumerator.into());
                    members.push(S::IEnumerableGetEnumerator.into());
                }
                members.extend([
                    MemberId::from(W::CompilerGeneratedAttributeCtor),
                    W::DebuggerHiddenAttributeCtor.into(),
                    W::IteratorStateMachineAttributeCtor.into(),
                ]);
                members
            }
            LoweringConstruct::StringConcat { operands } => match operands {
                0 | 1 => Vec::new(),
                2 => special(&[S::StringConcatStringString]),
                3 => special(&[S::StringConcatStringStringString]),
                4 => special(&[S::StringConcatStringStringStringString]),
                _ => special(&[S::StringConcatStringArray]),
            },
            LoweringConstruct::ForEach { generic: true } => special(&[
                S::IEnumerableTGetEnumerator,
                S::IEnumeratorMoveNext,
                S::IEnumeratorTGetCurrent,
                S::IDisposableDispose,
            ]),
            LoweringConstruct::ForEach { generic: false } => special(&[
                S::IEnumerableGetEnumerator,
                S::IEnumeratorMoveNext,
                S::IEnumeratorGetCurrent,
                S::IDisposableDispose,
            ]),
            LoweringConstruct::Using => special(&[S::IDisposableDispose]),
            LoweringConstruct::Lock => vec![
                W::MonitorEnterObjectRefBool.into(),
                W::MonitorExit.into(),
            ],
        }
    }
}

impl fmt::Display for LoweringConstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoweringConstruct::LiftedOperator => write!(f, "lifted operator"),
            LoweringConstruct::LiftedIncrement => write!(f, "lifted increment"),
            LoweringConstruct::Iterator { .. } => write!(f, "iterator"),
            LoweringConstruct::StringConcat { operands } => {
                write!(f, "string concatenation ({operands} operands)")
            }
            LoweringConstruct::ForEach { .. } => write!(f, "foreach"),
            LoweringConstruct::Using => write!(f, "using"),
            LoweringConstruct::Lock => write!(f, "lock"),
        }
    }
}
