//! Signature matching predicates.
//!
//! Two predicates with different strictness are used by the resolver:
//!
//! - [`matches_for_hiding`] decides whether an inherited member is a *candidate* at all. It
//!   compares generic arity and parameters only, and ignores custom modifiers, tuple element
//!   names, nullability annotations and the `in` / `ref readonly` distinction. `ref`, `out`
//!   and the read-only reference kinds are never interchangeable.
//! - [`matches_for_override`] is the exact comparison used to pick a winner among candidates.
//!   It additionally compares the return part, the precise ref kinds and every custom
//!   modifier. Nullability is never part of matching.
//!
//! Neither predicate looks at member names; callers compare those first.

use crate::symbols::{
    signatures::{Signature, SignatureParameter},
    typesystem::{Substitution, TypeCompareKind},
};

/// Exact comparison of `derived` against `base` after applying `subst` to `base`.
///
/// `subst` typically binds the base method's type parameters to the derived method's
/// parameters by ordinal; the base signature is expected to already be expressed in the
/// derived type's context.
#[must_use]
pub fn matches_for_override(derived: &Signature, base: &Signature, subst: &Substitution) -> bool {
    let base = base.substitute(subst);
    let kind = TypeCompareKind::IGNORE_NULLABILITY;

    derived.generic_arity == base.generic_arity
        && derived.params.len() == base.params.len()
        && derived
            .params
            .iter()
            .zip(&base.params)
            .all(|(d, b)| parameter_matches(d, b, kind))
        && derived.ret.ref_kind == base.ret.ref_kind
        && derived.ret.modifiers == base.ret.modifiers
        && derived.ret.ty.equals_with(&base.ret.ty, kind)
}

/// Loose comparison deciding whether `base` is a hide or override candidate for `derived`.
///
/// `base` must already be substituted into the derived context.
#[must_use]
pub fn matches_for_hiding(derived: &Signature, base: &Signature) -> bool {
    derived.generic_arity == base.generic_arity
        && derived.params.len() == base.params.len()
        && derived
            .params
            .iter()
            .zip(&base.params)
            .all(|(d, b)| parameter_matches(d, b, TypeCompareKind::MATCHING))
}

/// Compares two parameters under `kind`.
#[must_use]
pub fn parameter_matches(
    lhs: &SignatureParameter,
    rhs: &SignatureParameter,
    kind: TypeCompareKind,
) -> bool {
    lhs.ref_kind.matches(
        rhs.ref_kind,
        kind.contains(TypeCompareKind::IGNORE_REF_READONLY_VS_IN),
    ) && (kind.contains(TypeCompareKind::IGNORE_CUSTOM_MODIFIERS)
        || lhs.modifiers == rhs.modifiers)
        && lhs.ty.equals_with(&rhs.ty, kind)
}

/// Number of custom modifiers in `sig`, over the return part and all parameters.
#[must_use]
pub fn custom_modifier_count(sig: &Signature) -> usize {
    sig.ret.modifiers.len() + sig.params.iter().map(|p| p.modifiers.len()).sum::<usize>()
}
