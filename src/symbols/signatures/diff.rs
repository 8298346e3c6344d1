//! Structured differences between two declarations of one member.
//!
//! The partial-part checker pairs a defining declaration with its implementing declaration
//! by [`crate::symbols::signatures::matches_for_hiding`] and then asks for every category in
//! which the two still differ, so it can report one diagnostic per category instead of a
//! single generic mismatch.

use bitflags::bitflags;

use crate::symbols::{
    members::{Member, MemberModifiers},
    typesystem::{Substitution, TypeCompareKind, TypeSig},
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Categories in which two declarations of a member differ
    pub struct SignatureDifferences: u32 {
        /// Return or property type differs beyond nullability and tuple names
        const TYPE = 0x0001;
        /// Ref kind of the return differs
        const REF_KIND = 0x0002;
        /// Tuple element names differ in the return or a parameter
        const TUPLE_NAMES = 0x0004;
        /// Nullability annotations differ in the return type
        const NULLABILITY_RETURN = 0x0008;
        /// Nullability annotations differ in a parameter type
        const NULLABILITY_PARAMETER = 0x0010;
        /// A `params` modifier differs
        const PARAMS = 0x0020;
        /// A `scoped` modifier differs
        const SCOPED = 0x0040;
        /// Custom modifiers or `in` versus `ref readonly` differ
        const SIGNATURE = 0x0080;
        /// Declared accessibility differs
        const ACCESSIBILITY = 0x0100;
        /// `static` differs
        const STATIC = 0x0200;
        /// `unsafe` differs
        const UNSAFE = 0x0400;
        /// `virtual`, `override`, `sealed`, `new` or `extern` differ
        const EXTENDED_MODIFIERS = 0x0800;
        /// `readonly` differs
        const READONLY = 0x1000;
        /// `required` differs
        const REQUIRED = 0x2000;
    }
}

fn differs_only_in(lhs: &TypeSig, rhs: &TypeSig, ignored: TypeCompareKind) -> bool {
    !lhs.equals_with(rhs, TypeCompareKind::CONSIDER_EVERYTHING) && lhs.equals_with(rhs, ignored)
}

/// Compares the defining and implementing declarations of a partial member.
///
/// Method type parameters of `definition` are read as those of `implementation`. The
/// parameter lists are expected to already match for hiding; parameter count mismatches are
/// not reported here.
#[must_use]
pub fn member_differences(definition: &Member, implementation: &Member) -> SignatureDifferences {
    let mut diff = SignatureDifferences::empty();
    let def_sig = &definition.signature.substitute(&Substitution::new().with(
        definition.token,
        TypeSig::identity_args(implementation.token, implementation.generic_arity()),
    ));
    let impl_sig = &implementation.signature;

    let structural = TypeCompareKind::IGNORE_NULLABILITY | TypeCompareKind::IGNORE_TUPLE_NAMES;
    if !def_sig.ret.ty.equals_with(&impl_sig.ret.ty, structural) {
        diff |= SignatureDifferences::TYPE;
    } else {
        if differs_only_in(
            &def_sig.ret.ty,
            &impl_sig.ret.ty,
            TypeCompareKind::IGNORE_TUPLE_NAMES,
        ) {
            diff |= SignatureDifferences::TUPLE_NAMES;
        }
        if !def_sig
            .ret
            .ty
            .equals_with(&impl_sig.ret.ty, TypeCompareKind::IGNORE_TUPLE_NAMES)
        {
            diff |= SignatureDifferences::NULLABILITY_RETURN;
        }
    }

    if def_sig.ret.ref_kind != impl_sig.ret.ref_kind {
        diff |= SignatureDifferences::REF_KIND;
    }
    if def_sig.ret.modifiers != impl_sig.ret.modifiers {
        diff |= SignatureDifferences::SIGNATURE;
    }

    for (d, i) in def_sig.params.iter().zip(&impl_sig.params) {
        if differs_only_in(&d.ty, &i.ty, TypeCompareKind::IGNORE_TUPLE_NAMES) {
            diff |= SignatureDifferences::TUPLE_NAMES;
        }
        if d.ty.equals_with(&i.ty, structural)
            && !d.ty.equals_with(&i.ty, TypeCompareKind::IGNORE_TUPLE_NAMES)
        {
            diff |= SignatureDifferences::NULLABILITY_PARAMETER;
        }
        if d.is_params != i.is_params {
            diff |= SignatureDifferences::PARAMS;
        }
        if d.scoped != i.scoped {
            diff |= SignatureDifferences::SCOPED;
        }
        if d.ref_kind != i.ref_kind || d.modifiers != i.modifiers {
            diff |= SignatureDifferences::SIGNATURE;
        }
    }

    if definition.accessibility != implementation.accessibility {
        diff |= SignatureDifferences::ACCESSIBILITY;
    }

    let flags_differ = |flag: MemberModifiers| {
        definition.flags.intersection(flag) != implementation.flags.intersection(flag)
    };
    if flags_differ(MemberModifiers::STATIC) {
        diff |= SignatureDifferences::STATIC;
    }
    if flags_differ(MemberModifiers::UNSAFE) {
        diff |= SignatureDifferences::UNSAFE;
    }
    if flags_differ(MemberModifiers::EXTENDED) {
        diff |= SignatureDifferences::EXTENDED_MODIFIERS;
    }
    if flags_differ(MemberModifiers::READONLY) {
        diff |= SignatureDifferences::READONLY;
    }
    if flags_differ(MemberModifiers::REQUIRED) {
        diff |= SignatureDifferences::REQUIRED;
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{
        members::{Accessibility, MemberKind},
        signatures::{RefKind, Signature, SignatureParameter},
        token::{SymbolTable, Token},
    };

    fn ty(row: u32) -> TypeSig {
        TypeSig::named(Token::from_parts(SymbolTable::TypeDef, row))
    }

    fn method(ret: TypeSig, params: Vec<SignatureParameter>) -> Member {
        Member::new(
            Token::from_parts(SymbolTable::Method, 1),
            "M".into(),
            MemberKind::Method,
            Token::from_parts(SymbolTable::TypeDef, 1),
            Signature::new(ret, params),
        )
    }

    #[test]
    fn test_identical_parts_have_no_differences() {
        let a = method(ty(2), vec![SignatureParameter::new("x", ty(3))]);
        let b = method(ty(2), vec![SignatureParameter::new("y", ty(3))]);
        assert!(member_differences(&a, &b).is_empty());
    }

    #[test]
    fn test_return_type_difference_masks_finer_categories() {
        let a = method(TypeSig::nullable(ty(2)), Vec::new());
        let b = method(ty(4), Vec::new());
        assert_eq!(member_differences(&a, &b), SignatureDifferences::TYPE);
    }

    #[test]
    fn test_tuple_names_and_nullability() {
        let named = TypeSig::tuple(vec![(ty(2), Some("a")), (ty(3), None)]);
        let unnamed = TypeSig::tuple(vec![(ty(2), None), (ty(3), None)]);

        let a = method(named.clone(), vec![SignatureParameter::new("s", TypeSig::nullable(ty(5)))]);
        let b = method(unnamed, vec![SignatureParameter::new("s", ty(5))]);

        assert_eq!(
            member_differences(&a, &b),
            SignatureDifferences::TUPLE_NAMES | SignatureDifferences::NULLABILITY_PARAMETER
        );
    }

    #[test]
    fn test_modifier_categories() {
        let mut a = method(TypeSig::Void, vec![SignatureParameter::new("x", ty(2)).params()]);
        let mut b = method(
            TypeSig::Void,
            vec![SignatureParameter::new("x", ty(2)).with_ref_kind(RefKind::In)],
        );
        a.flags = MemberModifiers::STATIC | MemberModifiers::VIRTUAL;
        b.accessibility = Accessibility::Internal;

        let diff = member_differences(&a, &b);
        assert!(diff.contains(SignatureDifferences::PARAMS));
        assert!(diff.contains(SignatureDifferences::SIGNATURE));
        assert!(diff.contains(SignatureDifferences::STATIC));
        assert!(diff.contains(SignatureDifferences::EXTENDED_MODIFIERS));
        assert!(diff.contains(SignatureDifferences::ACCESSIBILITY));
        assert!(!diff.contains(SignatureDifferences::UNSAFE));
    }
}
