//! Override and hiding classification.
//!
//! The resolver walks the ancestors of a member's declaring type and sorts every same-named
//! inherited member into "overridden", "hidden" or "not involved":
//!
//! - Class members walk the base chain, nearest first. The first ancestor that declares any
//!   candidate ends the walk, even if a better match exists further up.
//! - Interface members walk all base interfaces. An interface that yields candidates shadows
//!   its own bases, but unrelated interfaces are still searched, so a diamond yields one
//!   hidden member per branch.
//! - Accessors are classified through the property or event that owns them.
//! - Members of constructed types reuse the result of their definition, constructed the same
//!   way. Constructed generic methods never override anything themselves.
//!
//! Results are memoized on the member. Two threads racing on the same member may both compute
//! a result; whichever is stored first is kept and returned to both.

use std::{collections::HashSet, sync::Arc};

use crate::{
    symbols::{
        compilation::Compilation,
        members::{AccessorOf, MemberHandle, MemberRc},
        overrides::OverriddenOrHiddenMembers,
        signatures::{custom_modifier_count, matches_for_hiding, matches_for_override, Signature},
        typesystem::{NamedTypeRc, Substitution, TypeCompareKind, TypeSig},
    },
    Error::{DepthLimitExceeded, ExplicitInterfaceImplementation},
    Result,
};

/// An inherited member that has the same kind and a hiding-compatible signature.
struct Candidate {
    handle: MemberHandle,
    /// The candidate's signature in the context of the member being classified
    signature: Signature,
}

#[derive(Default)]
struct Candidates {
    same_kind: Vec<Candidate>,
    other_kind: Vec<MemberHandle>,
}

impl Candidates {
    fn is_empty(&self) -> bool {
        self.same_kind.is_empty() && self.other_kind.is_empty()
    }
}

/// Computes [`OverriddenOrHiddenMembers`] for the members of one compilation.
pub struct OverrideResolver<'a> {
    compilation: &'a Compilation,
}

impl<'a> OverrideResolver<'a> {
    /// Create a resolver over `compilation`.
    #[must_use]
    pub fn new(compilation: &'a Compilation) -> Self {
        OverrideResolver { compilation }
    }

    /// What `member` overrides and hides.
    ///
    /// The result is computed on first use and then shared: later calls return the same `Arc`.
    ///
    /// ## Arguments
    /// * `member` - A definition or constructed member
    ///
    /// # Errors
    /// Returns [`crate::Error::ExplicitInterfaceImplementation`] for explicit interface
    /// implementations, and propagates graph errors such as
    /// [`crate::Error::InheritanceCycle`].
    pub fn resolve(&self, member: &MemberHandle) -> Result<Arc<OverriddenOrHiddenMembers>> {
        if let Some(cached) = member.memo().get() {
            return Ok(cached.clone());
        }

        let computed = self.compute(member)?;
        Ok(member.memo().get_or_init(|| computed).clone())
    }

    fn compute(&self, member: &MemberHandle) -> Result<Arc<OverriddenOrHiddenMembers>> {
        let definition = member.definition();
        if definition.is_explicit_impl() {
            return Err(ExplicitInterfaceImplementation(definition.token));
        }
        if member.is_constructed_method() {
            return Ok(OverriddenOrHiddenMembers::empty());
        }
        if !member.is_definition() {
            let of_definition = self.resolve(&MemberHandle::Definition(definition.clone()))?;
            let subst = member.substitution();
            return of_definition.try_map(|found| self.reconstruct(found, &subst));
        }

        if let Some(accessor_of) = definition.accessor_of {
            return self.resolve_accessor(definition, accessor_of);
        }

        let owner = self.compilation.registry().get_type_required(definition.owner)?;
        if owner.is_interface() {
            self.search_interfaces(definition, &owner)
        } else {
            self.search_base_chain(definition, &owner)
        }
    }

    /// Re-express `found`, computed for a definition, in the context described by `subst`.
    fn reconstruct(&self, found: &MemberHandle, subst: &Substitution) -> Result<MemberHandle> {
        let type_args: Vec<TypeSig> = found
            .type_args()
            .iter()
            .map(|arg| arg.substitute(subst))
            .collect();
        let method_args: Vec<TypeSig> = found
            .method_args()
            .iter()
            .map(|arg| arg.substitute(subst))
            .collect();
        self.compilation
            .registry()
            .construct(found.definition(), type_args, method_args)
    }

    fn search_base_chain(
        &self,
        member: &MemberRc,
        owner: &NamedTypeRc,
    ) -> Result<Arc<OverriddenOrHiddenMembers>> {
        let registry = self.compilation.registry();
        let chain = registry.base_chain(&owner.self_sig(), self.max_depth())?;

        for ancestor in chain {
            let candidates = self.candidates_in(member, owner, &ancestor)?;
            if candidates.is_empty() {
                continue;
            }

            tracing::trace!(
                member = %member.token,
                ancestor = %registry.display_type(&ancestor),
                same_kind = candidates.same_kind.len(),
                other_kind = candidates.other_kind.len(),
                "override candidates"
            );
            return Ok(if member.is_override() {
                Self::classify_override(member, candidates)
            } else {
                Self::classify_hiding(candidates)
            });
        }

        Ok(OverriddenOrHiddenMembers::empty())
    }

    fn search_interfaces(
        &self,
        member: &MemberRc,
        owner: &NamedTypeRc,
    ) -> Result<Arc<OverriddenOrHiddenMembers>> {
        let registry = self.compilation.registry();
        let depth = self.max_depth();
        let mut shadowed = HashSet::new();
        let mut hidden = Vec::new();

        for iface in registry.all_interfaces(&owner.self_sig(), depth)? {
            if shadowed.contains(&iface) {
                continue;
            }
            let candidates = self.candidates_in(member, owner, &iface)?;
            if candidates.is_empty() {
                continue;
            }

            shadowed.extend(registry.all_interfaces(&iface, depth)?);
            let found = Self::classify_hiding(candidates);
            hidden.extend(found.hidden_members().iter().cloned());
        }

        Ok(OverriddenOrHiddenMembers::new(None, Vec::new(), hidden))
    }

    /// The members of `ancestor` that `member` could override or hide.
    fn candidates_in(
        &self,
        member: &MemberRc,
        owner: &NamedTypeRc,
        ancestor: &TypeSig,
    ) -> Result<Candidates> {
        let registry = self.compilation.registry();
        let Some(def) = ancestor.definition() else {
            return Ok(Candidates::default());
        };
        let ancestor_ty = registry.get_type_required(def)?;

        let mut candidates = Candidates::default();
        for other in registry.members_named(&ancestor_ty, &member.name) {
            if other.is_accessor() || other.is_explicit_impl() {
                continue;
            }
            if !self.compilation.is_member_accessible(&other, owner) {
                continue;
            }

            let handle = registry.member_of(&other, ancestor)?;
            if other.kind == member.kind {
                if other.generic_arity() != member.generic_arity() {
                    continue;
                }
                let signature = handle.signature().substitute(&method_param_mapping(&other, member));
                if matches_for_hiding(&member.signature, &signature) {
                    candidates.same_kind.push(Candidate { handle, signature });
                }
            } else if other.generic_arity() == member.generic_arity()
                || (member.is_method() && other.generic_arity() == 0)
            {
                candidates.other_kind.push(handle);
            }
        }

        Ok(candidates)
    }

    fn classify_override(
        member: &MemberRc,
        candidates: Candidates,
    ) -> Arc<OverriddenOrHiddenMembers> {
        let Candidates {
            same_kind,
            other_kind,
        } = candidates;

        let exact: Vec<&Candidate> = same_kind
            .iter()
            .filter(|candidate| {
                matches_for_override(&member.signature, &candidate.signature, &Substitution::new())
            })
            .collect();

        let (winner, ambiguous) = match exact.split_first() {
            Some((first, rest)) => (
                Some(*first),
                rest.iter().map(|c| c.handle.clone()).collect::<Vec<_>>(),
            ),
            None => (
                same_kind
                    .iter()
                    .min_by_key(|candidate| custom_modifier_count(&candidate.signature)),
                Vec::new(),
            ),
        };

        match winner {
            Some(winner) if winner.handle.definition().is_in_virtual_chain() => {
                tracing::trace!(
                    member = %member.token,
                    overridden = %winner.handle.token(),
                    ambiguous = ambiguous.len(),
                    "override resolved"
                );
                OverriddenOrHiddenMembers::new(Some(winner.handle.clone()), ambiguous, other_kind)
            }
            Some(winner) => {
                let mut hidden = vec![winner.handle.clone()];
                hidden.extend(other_kind);
                OverriddenOrHiddenMembers::new(None, Vec::new(), hidden)
            }
            None => OverriddenOrHiddenMembers::new(None, Vec::new(), other_kind),
        }
    }

    fn classify_hiding(candidates: Candidates) -> Arc<OverriddenOrHiddenMembers> {
        let mut hidden = Vec::new();
        let mut signatures: Vec<&Signature> = Vec::new();
        for candidate in &candidates.same_kind {
            let duplicate = signatures
                .iter()
                .any(|seen| matches_for_override(seen, &candidate.signature, &Substitution::new()));
            if !duplicate {
                signatures.push(&candidate.signature);
                hidden.push(candidate.handle.clone());
            }
        }
        hidden.extend(candidates.other_kind);
        OverriddenOrHiddenMembers::new(None, Vec::new(), hidden)
    }

    /// Accessors follow the classification of the property or event that owns them.
    ///
    /// The overridden accessor is the same-slot accessor of the nearest property in the
    /// owner's override chain that declares one. Hidden accessors are the same-slot accessors
    /// of hidden properties and events.
    fn resolve_accessor(
        &self,
        accessor: &MemberRc,
        accessor_of: AccessorOf,
    ) -> Result<Arc<OverriddenOrHiddenMembers>> {
        let registry = self.compilation.registry();
        let owner = registry.get_member_required(accessor_of.owner)?;
        let slot = accessor_of.kind.slot();
        let of_owner = self.resolve(&MemberHandle::Definition(owner.clone()))?;

        let mut overridden = None;
        let mut current = of_owner.overridden_member().cloned();
        let mut depth = 0;
        while let Some(property) = current {
            if let Some(token) = property.definition().accessors.get(slot) {
                let definition = registry.get_member_required(token)?;
                overridden = Some(registry.construct(&definition, property.type_args().to_vec(), Vec::new())?);
                break;
            }
            if !property.definition().is_override() {
                break;
            }
            depth += 1;
            if depth > self.max_depth() {
                return Err(DepthLimitExceeded(self.max_depth()));
            }
            current = self.resolve(&property)?.overridden_member().cloned();
        }

        let mut hidden = Vec::new();
        for hidden_member in of_owner.hidden_members() {
            if hidden_member.kind() != owner.kind {
                continue;
            }
            if let Some(token) = hidden_member.definition().accessors.get(slot) {
                let definition = registry.get_member_required(token)?;
                hidden.push(registry.construct(
                    &definition,
                    hidden_member.type_args().to_vec(),
                    Vec::new(),
                )?);
            }
        }

        tracing::trace!(
            accessor = %accessor.token,
            overridden = overridden.is_some(),
            hidden = hidden.len(),
            "accessor classified through its owner"
        );
        Ok(OverriddenOrHiddenMembers::new(overridden, Vec::new(), hidden))
    }

    /// The originally declared virtual slot of `member`, constructed like `member`.
    ///
    /// Follows overridden members from `member` towards the root of the override chain and
    /// stops early at a member `accessing_type` cannot access, or (when
    /// `require_same_return_type` is set) at a member with a different return type. The result
    /// carries `member`'s method type arguments; for an unconstructed generic method those are
    /// its own type parameters.
    ///
    /// ## Arguments
    /// * `member` - The member to start from
    /// * `accessing_type` - The type whose view of accessibility applies
    /// * `require_same_return_type` - Stop at covariant return changes
    ///
    /// # Errors
    /// Propagates errors from [`OverrideResolver::resolve`] and from member construction.
    pub fn constructed_least_overridden_method(
        &self,
        member: &MemberHandle,
        accessing_type: &NamedTypeRc,
        require_same_return_type: bool,
    ) -> Result<MemberHandle> {
        let registry = self.compilation.registry();
        let definition = member.definition();
        let method_args = if member.method_args().is_empty() {
            TypeSig::identity_args(definition.token, definition.generic_arity())
        } else {
            member.method_args().to_vec()
        };

        let mut current = registry.construct(definition, member.type_args().to_vec(), Vec::new())?;
        let mut depth = 0;
        while current.definition().is_override() {
            let result = self.resolve(&current)?;
            let Some(overridden) = result.overridden_member() else {
                break;
            };
            if !self
                .compilation
                .is_member_accessible(overridden.definition(), accessing_type)
            {
                break;
            }
            if require_same_return_type {
                let mapping = method_param_mapping(overridden.definition(), current.definition());
                let overridden_ret = overridden.signature().ret.ty.substitute(&mapping);
                if !current.signature().ret.ty.equals_with(
                    &overridden_ret,
                    TypeCompareKind::IGNORE_NULLABILITY | TypeCompareKind::IGNORE_TUPLE_NAMES,
                ) {
                    break;
                }
            }

            depth += 1;
            if depth > self.max_depth() {
                return Err(DepthLimitExceeded(self.max_depth()));
            }
            current = overridden.clone();
        }

        if current.definition().generic_arity() != method_args.len() {
            return Ok(current);
        }
        registry.construct(current.definition(), current.type_args().to_vec(), method_args)
    }

    fn max_depth(&self) -> usize {
        self.compilation.options().max_inheritance_depth
    }
}

/// Maps the method type parameters of `base` onto those of `derived`, by ordinal.
fn method_param_mapping(base: &MemberRc, derived: &MemberRc) -> Substitution {
    Substitution::new().with(
        base.token,
        TypeSig::identity_args(derived.token, derived.generic_arity()),
    )
}
