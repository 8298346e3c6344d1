//! The memoized classification result of one member.

use std::sync::{Arc, OnceLock};

use crate::symbols::members::MemberHandle;

static EMPTY: OnceLock<Arc<OverriddenOrHiddenMembers>> = OnceLock::new();

/// What a member overrides and what it hides.
///
/// At most one member is overridden. Further exact matches found next to the overridden
/// member are kept in [`OverriddenOrHiddenMembers::ambiguous`] so diagnostics can report
/// them, but they are neither overridden nor hidden.
///
/// Results are shared through `Arc`; a result with nothing in it is always the shared
/// instance returned by [`OverriddenOrHiddenMembers::empty`], which can be recognised with
/// [`OverriddenOrHiddenMembers::is_empty_singleton`].
#[derive(Debug, PartialEq, Eq)]
pub struct OverriddenOrHiddenMembers {
    overridden: Option<MemberHandle>,
    ambiguous: Vec<MemberHandle>,
    hidden: Vec<MemberHandle>,
}

impl OverriddenOrHiddenMembers {
    /// The shared empty result.
    #[must_use]
    pub fn empty() -> Arc<OverriddenOrHiddenMembers> {
        EMPTY
            .get_or_init(|| {
                Arc::new(OverriddenOrHiddenMembers {
                    overridden: None,
                    ambiguous: Vec::new(),
                    hidden: Vec::new(),
                })
            })
            .clone()
    }

    /// Build a result, returning the shared empty instance when all parts are empty.
    #[must_use]
    pub fn new(
        overridden: Option<MemberHandle>,
        ambiguous: Vec<MemberHandle>,
        hidden: Vec<MemberHandle>,
    ) -> Arc<OverriddenOrHiddenMembers> {
        if overridden.is_none() && ambiguous.is_empty() && hidden.is_empty() {
            return Self::empty();
        }
        Arc::new(OverriddenOrHiddenMembers {
            overridden,
            ambiguous,
            hidden,
        })
    }

    /// The overridden member, if any.
    #[must_use]
    pub fn overridden_member(&self) -> Option<&MemberHandle> {
        self.overridden.as_ref()
    }

    /// The overridden member as a list of zero or one entries.
    #[must_use]
    pub fn overridden_members(&self) -> &[MemberHandle] {
        self.overridden.as_slice()
    }

    /// Hidden members, in discovery order.
    #[must_use]
    pub fn hidden_members(&self) -> &[MemberHandle] {
        &self.hidden
    }

    /// Further exact matches next to the overridden member.
    #[must_use]
    pub fn ambiguous(&self) -> &[MemberHandle] {
        &self.ambiguous
    }

    /// Returns `true` if nothing is overridden or hidden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overridden.is_none() && self.ambiguous.is_empty() && self.hidden.is_empty()
    }

    /// Returns `true` if `this` is the shared empty instance.
    #[must_use]
    pub fn is_empty_singleton(this: &Arc<OverriddenOrHiddenMembers>) -> bool {
        Arc::ptr_eq(this, &Self::empty())
    }

    /// Apply `f` to every member of the result, keeping the shape.
    pub(crate) fn try_map<F>(&self, mut f: F) -> crate::Result<Arc<OverriddenOrHiddenMembers>>
    where
        F: FnMut(&MemberHandle) -> crate::Result<MemberHandle>,
    {
        let overridden = self.overridden.as_ref().map(&mut f).transpose()?;
        let ambiguous = self.ambiguous.iter().map(&mut f).collect::<crate::Result<_>>()?;
        let hidden = self.hidden.iter().map(&mut f).collect::<crate::Result<_>>()?;
        Ok(Self::new(overridden, ambiguous, hidden))
    }
}
