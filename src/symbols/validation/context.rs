//! Shared state of one validation run.

use std::sync::Arc;

use crate::{
    symbols::{
        compilation::Compilation,
        diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Span},
        members::{Accessibility, MemberHandle, MemberRc},
        overrides::{OverriddenOrHiddenMembers, OverrideResolver},
        signatures::Signature,
        typesystem::{NamedType, Substitution, TypeSig},
        validation::AnalysisOptions,
    },
    Result,
};

/// Everything a validator needs: the compilation, its options, and where to report.
pub struct ValidationContext<'a> {
    compilation: &'a Compilation,
    resolver: OverrideResolver<'a>,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> ValidationContext<'a> {
    /// Create a context reporting into `sink`.
    #[must_use]
    pub fn new(compilation: &'a Compilation, sink: &'a dyn DiagnosticSink) -> Self {
        ValidationContext {
            compilation,
            resolver: OverrideResolver::new(compilation),
            sink,
        }
    }

    /// The compilation under validation.
    #[must_use]
    pub fn compilation(&self) -> &'a Compilation {
        self.compilation
    }

    /// The analysis options of the compilation.
    #[must_use]
    pub fn options(&self) -> &AnalysisOptions {
        self.compilation.options()
    }

    /// Report one diagnostic.
    pub fn report(&self, code: DiagnosticCode, args: Vec<String>, span: Span) {
        tracing::debug!(%code, ?args, %span, "diagnostic");
        self.sink.report(Diagnostic::new(code, args, span));
    }

    /// Memoized override/hiding classification of a definition.
    ///
    /// # Errors
    /// See [`OverrideResolver::resolve`].
    pub fn resolve(&self, member: &MemberRc) -> Result<Arc<OverriddenOrHiddenMembers>> {
        self.resolver.resolve(&MemberHandle::Definition(member.clone()))
    }

    /// Memoized override/hiding classification of any handle.
    ///
    /// # Errors
    /// See [`OverrideResolver::resolve`].
    pub fn resolve_handle(&self, member: &MemberHandle) -> Result<Arc<OverriddenOrHiddenMembers>> {
        self.resolver.resolve(member)
    }

    /// `Owner.Name` of a member, for diagnostic arguments.
    #[must_use]
    pub fn display(&self, member: &MemberHandle) -> String {
        self.compilation.registry().display_member(member)
    }

    /// `Owner.Name` of a definition, for diagnostic arguments.
    #[must_use]
    pub fn display_def(&self, member: &MemberRc) -> String {
        self.display(&MemberHandle::Definition(member.clone()))
    }

    /// Display form of a type, for diagnostic arguments.
    #[must_use]
    pub fn display_type(&self, ty: &TypeSig) -> String {
        self.compilation.registry().display_type(ty)
    }

    /// Signature of `base` with its method type parameters renamed to those of `derived`.
    #[must_use]
    pub fn signature_for(&self, base: &MemberHandle, derived: &MemberRc) -> Signature {
        base.signature().substitute(&Substitution::new().with(
            base.token(),
            TypeSig::identity_args(derived.token, derived.generic_arity()),
        ))
    }

    /// Returns `true` if `member` is an override that does not override anything.
    ///
    /// # Errors
    /// See [`OverrideResolver::resolve`].
    pub fn is_bogus_override(&self, member: &MemberHandle) -> Result<bool> {
        if !member.definition().is_override() {
            return Ok(false);
        }
        Ok(self.resolve_handle(member)?.overridden_member().is_none())
    }

    /// The accessibility an override of `overridden` declared in `deriving` must state.
    ///
    /// `protected internal` reads as `protected` from an assembly that cannot see the
    /// overridden member's internals.
    #[must_use]
    pub fn required_override_accessibility(
        &self,
        overridden: &MemberRc,
        deriving: &NamedType,
    ) -> Accessibility {
        if overridden.accessibility != Accessibility::ProtectedOrInternal {
            return overridden.accessibility;
        }
        let visible = self
            .compilation
            .registry()
            .get_type(overridden.owner)
            .is_some_and(|owner| {
                self.compilation
                    .internals_visible(owner.assembly, deriving.assembly)
            });
        if visible {
            Accessibility::ProtectedOrInternal
        } else {
            Accessibility::Protected
        }
    }
}
