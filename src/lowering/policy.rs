//! What lowering does when a framework member is absent.

use strum::Display;

use crate::{
    lowering::LoweringConstruct,
    symbols::{
        compilation::Compilation,
        diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Span},
        members::MemberHandle,
        wellknown::{descriptor, MemberId, SpecialMember, WellKnownMember},
    },
};

/// Outcome of a missing framework member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MissingMemberAction {
    /// The construct cannot be lowered; CS0656 was reported
    Fail,
    /// An equivalent alternate member is used instead, without a diagnostic
    Degrade,
    /// The member is skipped, without a diagnostic
    Ignore,
}

/// How much lowering depends on a framework member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberRequirement {
    /// Lowering is incorrect without the member
    Required,
    /// The member only adds metadata such as debugger attributes
    Optional,
    /// An equivalent member can stand in for this one
    Alternate(MemberId),
}

impl MemberRequirement {
    /// The fixed classification of `id`.
    #[must_use]
    pub fn of(id: MemberId) -> Self {
        match id {
            MemberId::Special(SpecialMember::NullableTGetValueOrDefault) => {
                MemberRequirement::Alternate(SpecialMember::NullableTGetValueOrDefaultDefaultValue.into())
            }
            MemberId::WellKnown(WellKnownMember::MonitorEnterObjectRefBool) => {
                MemberRequirement::Alternate(WellKnownMember::MonitorEnter.into())
            }
            MemberId::WellKnown(
                WellKnownMember::DebuggerHiddenAttributeCtor
                | WellKnownMember::DebuggerStepThroughAttributeCtor
                | WellKnownMember::CompilerGeneratedAttributeCtor
                | WellKnownMember::IteratorStateMachineAttributeCtor,
            ) => MemberRequirement::Optional,
            _ => MemberRequirement::Required,
        }
    }
}

/// One member use of a lowered construct.
#[derive(Debug, Clone)]
pub struct MemberUse {
    /// The member lowering asked for
    pub requested: MemberId,
    /// The member lowering got: the requested one or an alternate
    pub resolved: Option<(MemberId, MemberHandle)>,
    /// Set when the requested member was absent
    pub action: Option<MissingMemberAction>,
}

/// The framework members bound for one construct.
#[derive(Debug, Clone)]
pub struct LoweredConstruct {
    /// The construct that was lowered
    pub construct: LoweringConstruct,
    /// Every member use, in the order lowering needs them
    pub uses: Vec<MemberUse>,
}

impl LoweredConstruct {
    /// Returns `true` if any required member was absent.
    #[must_use]
    pub fn has_failed(&self) -> bool {
        self.uses
            .iter()
            .any(|u| u.action == Some(MissingMemberAction::Fail))
    }

    /// The member bound for the first use of `id`.
    #[must_use]
    pub fn member(&self, id: MemberId) -> Option<&MemberHandle> {
        self.uses
            .iter()
            .find(|u| u.requested == id)
            .and_then(|u| u.resolved.as_ref())
            .map(|(_, handle)| handle)
    }
}

/// Binds framework members for lowering and reports the absent ones.
///
/// Every use is reported on its own: two sites needing the same absent member produce two
/// diagnostics, and so does one construct using it twice.
pub struct MissingMemberPolicy<'a> {
    compilation: &'a Compilation,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> MissingMemberPolicy<'a> {
    /// Create a policy reporting into `sink`.
    #[must_use]
    pub fn new(compilation: &'a Compilation, sink: &'a dyn DiagnosticSink) -> Self {
        MissingMemberPolicy { compilation, sink }
    }

    /// Decide what an absent `id` means for a construct at `span`.
    ///
    /// Required members report CS0656 and fail. Optional members are ignored. A member with an
    /// alternate degrades to it when the alternate resolves; otherwise the last alternate of
    /// the chain is reported and lowering fails.
    pub fn on_missing(&self, id: MemberId, span: Span) -> MissingMemberAction {
        match self.fallback(id) {
            Ok(Some(_)) => MissingMemberAction::Degrade,
            Ok(None) => MissingMemberAction::Ignore,
            Err(last) => {
                self.report_missing(last, span);
                MissingMemberAction::Fail
            }
        }
    }

    /// Resolve `id` for a construct at `span`, falling back to alternates.
    ///
    /// Returns the member actually bound and its id, or `None` when lowering has to go
    /// without it.
    pub fn require(&self, id: MemberId, span: Span) -> Option<(MemberId, MemberHandle)> {
        self.bind(id, span).0
    }

    /// Bind every member `construct` needs.
    ///
    /// ## Arguments
    /// * `construct` - The construct being lowered
    /// * `span` - Source span of the construct, used for every diagnostic
    pub fn lower(&self, construct: LoweringConstruct, span: Span) -> LoweredConstruct {
        let uses = construct
            .required_members()
            .into_iter()
            .map(|requested| {
                let (resolved, action) = self.bind(requested, span);
                MemberUse {
                    requested,
                    resolved,
                    action,
                }
            })
            .collect();

        let lowered = LoweredConstruct { construct, uses };
        if lowered.has_failed() {
            tracing::debug!(%construct, %span, "construct cannot be lowered");
        }
        lowered
    }

    fn bind(
        &self,
        id: MemberId,
        span: Span,
    ) -> (Option<(MemberId, MemberHandle)>, Option<MissingMemberAction>) {
        if let Some(found) = self.compilation.get_member(id) {
            return (Some((id, found)), None);
        }

        match self.fallback(id) {
            Ok(Some(alternate)) => {
                tracing::debug!(%id, alternate = %alternate.0, "using alternate framework member");
                (Some(alternate), Some(MissingMemberAction::Degrade))
            }
            Ok(None) => {
                tracing::trace!(%id, "optional framework member skipped");
                (None, Some(MissingMemberAction::Ignore))
            }
            Err(last) => {
                self.report_missing(last, span);
                (None, Some(MissingMemberAction::Fail))
            }
        }
    }

    /// Walks the alternates of an absent `id`.
    ///
    /// `Ok(Some)` is the first alternate that resolves, `Ok(None)` means the member is
    /// optional, and `Err` names the last member tried.
    fn fallback(&self, id: MemberId) -> Result<Option<(MemberId, MemberHandle)>, MemberId> {
        let mut current = id;
        loop {
            match MemberRequirement::of(current) {
                MemberRequirement::Required => return Err(current),
                MemberRequirement::Optional => return Ok(None),
                MemberRequirement::Alternate(next) => {
                    if let Some(found) = self.compilation.get_member(next) {
                        return Ok(Some((next, found)));
                    }
                    current = next;
                }
            }
        }
    }

    fn report_missing(&self, id: MemberId, span: Span) {
        let recipe = descriptor(id);
        let args = vec![
            recipe.declaring_type.metadata_name().to_string(),
            recipe.name.to_string(),
        ];
        tracing::debug!(%id, %span, "required framework member is missing");
        self.sink.report(Diagnostic::new(
            DiagnosticCode::MissingPredefinedMember,
            args,
            span,
        ));
    }
}
