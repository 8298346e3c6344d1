//! Accessor consistency of property and event overrides.
//!
//! An overriding property may only declare accessors that some property in its override chain
//! declares, must keep `set` and `init` apart, and must restate the accessibility of the
//! accessor at the root of the chain. Events always restate both accessors; properties do so
//! when [`crate::AnalysisOptions::require_all_accessors_on_override`] is set.

use crate::{
    symbols::{
        diagnostics::DiagnosticCode,
        members::{AccessorKind, AccessorSlot, MemberHandle, MemberKind, MemberRc},
        typesystem::NamedTypeRc,
        validation::ValidationContext,
    },
    Result,
};

/// Validates the accessors of overriding properties and events.
pub struct AccessorValidator;

impl AccessorValidator {
    /// Check every overriding property and event declared by `ty`.
    ///
    /// # Errors
    /// Propagates resolver errors for a malformed symbol graph.
    pub fn validate_type(ctx: &ValidationContext<'_>, ty: &NamedTypeRc) -> Result<()> {
        for member in ctx.compilation().registry().members_of(ty) {
            if !member.kind.has_accessors() || !member.is_override() || member.is_explicit_impl() {
                continue;
            }
            let result = ctx.resolve(&member)?;
            if let Some(overridden) = result.overridden_member() {
                Self::validate_member(ctx, ty, &member, overridden)?;
            }
        }
        Ok(())
    }

    fn validate_member(
        ctx: &ValidationContext<'_>,
        ty: &NamedTypeRc,
        member: &MemberRc,
        overridden: &MemberHandle,
    ) -> Result<()> {
        let registry = ctx.compilation().registry();
        let owner_checked =
            overridden.definition().flags.is_sealed_override() || ctx.is_bogus_override(overridden)?;

        for token in member.accessors.iter() {
            let accessor = registry.get_member_required(token)?;
            let Some(kind) = accessor.accessor_kind() else {
                continue;
            };
            let name = ctx.display_def(&accessor);
            let result = ctx.resolve(&accessor)?;

            let Some(base) = result.overridden_member() else {
                let code = match kind {
                    AccessorKind::Get | AccessorKind::Add => DiagnosticCode::NoGetToOverride,
                    AccessorKind::Set | AccessorKind::Init | AccessorKind::Remove => {
                        DiagnosticCode::NoSetToOverride
                    }
                };
                ctx.report(code, vec![name, ctx.display(overridden)], accessor.span);
                continue;
            };
            let base_name = ctx.display(base);

            let base_kind = base.definition().accessor_kind();
            if kind.slot() == AccessorSlot::Second
                && (kind == AccessorKind::Init) != (base_kind == Some(AccessorKind::Init))
            {
                ctx.report(
                    DiagnosticCode::CantChangeInitOnlyOnOverride,
                    vec![name, base_name],
                    accessor.span,
                );
                continue;
            }

            if !owner_checked {
                if base.definition().flags.is_sealed_override() {
                    ctx.report(
                        DiagnosticCode::CantOverrideSealed,
                        vec![name, base_name],
                        accessor.span,
                    );
                    continue;
                }
                if ctx.is_bogus_override(base)? {
                    ctx.report(
                        DiagnosticCode::CantOverrideBogusMethod,
                        vec![name, base_name],
                        accessor.span,
                    );
                    continue;
                }
            }

            let root = ctx.compilation().constructed_least_overridden_method(
                &MemberHandle::Definition(accessor.clone()),
                ty,
                false,
            )?;
            let required = ctx.required_override_accessibility(root.definition(), ty);
            if accessor.accessibility != required {
                ctx.report(
                    DiagnosticCode::CantChangeAccessOnOverride,
                    vec![name, required.keyword().to_string(), base_name],
                    accessor.span,
                );
            }
        }

        let must_restate = member.kind == MemberKind::Event
            || ctx.options().require_all_accessors_on_override;
        if must_restate {
            for slot in [AccessorSlot::First, AccessorSlot::Second] {
                if member.accessors.get(slot).is_some() {
                    continue;
                }
                if let Some(kind) = Self::inherited_accessor(ctx, overridden, slot)? {
                    ctx.report(
                        DiagnosticCode::MissingOverrideAccessor,
                        vec![ctx.display_def(member), kind.keyword().to_string()],
                        member.span,
                    );
                }
            }
        }
        Ok(())
    }

    /// The accessor kind of the nearest property or event in the override chain starting at
    /// `overridden` that declares `slot`.
    fn inherited_accessor(
        ctx: &ValidationContext<'_>,
        overridden: &MemberHandle,
        slot: AccessorSlot,
    ) -> Result<Option<AccessorKind>> {
        let registry = ctx.compilation().registry();
        let mut current = Some(overridden.clone());
        let mut depth = 0;

        while let Some(handle) = current {
            let definition = handle.definition();
            if let Some(token) = definition.accessors.get(slot) {
                return Ok(registry.get_member_required(token)?.accessor_kind());
            }
            if !definition.is_override() || depth >= ctx.options().max_inheritance_depth {
                break;
            }
            depth += 1;
            current = ctx.resolve_handle(&handle)?.overridden_member().cloned();
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        symbols::{
            builders::{minimal_corlib, EventBuilder, PropertyBuilder, TypeBuilder},
            diagnostics::Diagnostics,
            members::{Accessibility, MemberModifiers},
            typesystem::TypeSig,
            wellknown::SpecialType,
        },
        AnalysisOptions, Compilation,
    };

    fn special(compilation: &Compilation, id: SpecialType) -> TypeSig {
        TypeSig::named(compilation.get_special_type(id).token().expect("special type"))
    }

    fn base(compilation: &Compilation) -> Result<NamedTypeRc> {
        minimal_corlib(compilation)?;
        let int = special(compilation, SpecialType::Int32);
        let base = TypeBuilder::class("", "Base").build(compilation)?;
        PropertyBuilder::new("ReadOnly", int.clone())
            .get()
            .with_flags(MemberModifiers::VIRTUAL)
            .build(compilation, &base)?;
        PropertyBuilder::new("Settable", int.clone())
            .get()
            .set()
            .with_accessor_accessibility(AccessorKind::Set, Accessibility::Protected)
            .with_flags(MemberModifiers::VIRTUAL)
            .build(compilation, &base)?;
        PropertyBuilder::new("Initable", int)
            .get()
            .init()
            .with_flags(MemberModifiers::VIRTUAL)
            .build(compilation, &base)?;
        Ok(base)
    }

    fn validate(compilation: &Compilation, ty: &NamedTypeRc) -> Result<Diagnostics> {
        let diagnostics = Diagnostics::new();
        AccessorValidator::validate_type(&ValidationContext::new(compilation, &diagnostics), ty)?;
        Ok(diagnostics)
    }

    #[test]
    fn test_accessor_errors() -> Result<()> {
        let compilation = Compilation::with_options("App", AnalysisOptions::relaxed());
        let base = base(&compilation)?;
        let int = special(&compilation, SpecialType::Int32);
        let derived = TypeBuilder::class("", "Derived")
            .extends(TypeSig::named(base.token))
            .build(&compilation)?;
        PropertyBuilder::new("ReadOnly", int.clone())
            .get()
            .set()
            .with_flags(MemberModifiers::OVERRIDE)
            .build(&compilation, &derived)?;
        PropertyBuilder::new("Settable", int)
            .set()
            .with_flags(MemberModifiers::OVERRIDE)
            .build(&compilation, &derived)?;

        let diagnostics = validate(&compilation, &derived)?;
        assert_eq!(diagnostics.with_code(DiagnosticCode::NoSetToOverride).len(), 1);
        let access = diagnostics.with_code(DiagnosticCode::CantChangeAccessOnOverride);
        assert_eq!(access.len(), 1);
        assert_eq!(access[0].args[1], "protected");
        assert!(diagnostics.with_code(DiagnosticCode::MissingOverrideAccessor).is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_accessors_on_override() -> Result<()> {
        let compilation = Compilation::new("App");
        let base = base(&compilation)?;
        let int = special(&compilation, SpecialType::Int32);
        let object = special(&compilation, SpecialType::Object);
        EventBuilder::new("Changed", object.clone())
            .with_flags(MemberModifiers::VIRTUAL)
            .build(&compilation, &base)?;

        let derived = TypeBuilder::class("", "Derived")
            .extends(TypeSig::named(base.token))
            .build(&compilation)?;
        PropertyBuilder::new("Settable", int)
            .get()
            .with_flags(MemberModifiers::OVERRIDE)
            .build(&compilation, &derived)?;
        EventBuilder::new("Changed", object)
            .with_accessors(true, false)
            .with_flags(MemberModifiers::OVERRIDE)
            .build(&compilation, &derived)?;

        let diagnostics = validate(&compilation, &derived)?;
        let missing = diagnostics.with_code(DiagnosticCode::MissingOverrideAccessor);
        assert_eq!(missing.len(), 2);
        assert!(missing.iter().any(|d| d.args[1] == "set"));
        assert!(missing.iter().any(|d| d.args[1] == "remove"));
        Ok(())
    }

    #[test]
    fn test_set_cannot_override_init() -> Result<()> {
        let compilation = Compilation::with_options("App", AnalysisOptions::relaxed());
        let base = base(&compilation)?;
        let int = special(&compilation, SpecialType::Int32);
        let derived = TypeBuilder::class("", "Derived")
            .extends(TypeSig::named(base.token))
            .build(&compilation)?;
        PropertyBuilder::new("Initable", int)
            .get()
            .set()
            .with_flags(MemberModifiers::OVERRIDE)
            .build(&compilation, &derived)?;

        let diagnostics = validate(&compilation, &derived)?;
        assert_eq!(diagnostics.with_code(DiagnosticCode::CantChangeInitOnlyOnOverride).len(), 1);
        Ok(())
    }
}
