//! Override legality.
//!
//! Checks every member declared `override` against what the resolver found for it:
//! whether there is something to override at all, whether that member may be overridden,
//! and whether the override restates accessibility, return type and ref-ness correctly.
//! Accessors are checked separately by [`crate::symbols::validation::AccessorValidator`].

use crate::{
    symbols::{
        diagnostics::DiagnosticCode,
        members::{MemberHandle, MemberKind, MemberRc},
        signatures::RefKind,
        typesystem::{NamedTypeRc, TypeCompareKind, TypeSig},
        validation::ValidationContext,
    },
    Result,
};

/// Validates `override` declarations.
pub struct OverrideValidator;

impl OverrideValidator {
    /// Check every override declared by `ty`.
    ///
    /// # Errors
    /// Propagates resolver errors for a malformed symbol graph.
    pub fn validate_type(ctx: &ValidationContext<'_>, ty: &NamedTypeRc) -> Result<()> {
        let registry = ctx.compilation().registry();
        for member in registry.members_of(ty) {
            if member.is_override() && !member.is_accessor() && !member.is_explicit_impl() {
                Self::validate_member(ctx, ty, &member)?;
            }
        }
        Ok(())
    }

    fn validate_member(ctx: &ValidationContext<'_>, ty: &NamedTypeRc, member: &MemberRc) -> Result<()> {
        let name = ctx.display_def(member);
        if member.is_static() {
            ctx.report(DiagnosticCode::StaticNotVirtual, vec![name], member.span);
            return Ok(());
        }

        let result = ctx.resolve(member)?;
        let Some(overridden) = result.overridden_member() else {
            let code = match result.hidden_members().first() {
                None => DiagnosticCode::OverrideNotExpected,
                Some(hidden) if hidden.kind() == member.kind => DiagnosticCode::CantOverrideNonVirtual,
                Some(_) => match member.kind {
                    MemberKind::Property => DiagnosticCode::CantOverrideNonProperty,
                    MemberKind::Event => DiagnosticCode::CantOverrideNonEvent,
                    MemberKind::Method | MemberKind::Field => DiagnosticCode::CantOverrideNonFunction,
                },
            };
            let mut args = vec![name];
            args.extend(result.hidden_members().first().map(|hidden| ctx.display(hidden)));
            ctx.report(code, args, member.span);
            return Ok(());
        };

        let overridden_name = ctx.display(overridden);
        if let Some(other) = result.ambiguous().first() {
            ctx.report(
                DiagnosticCode::AmbiguousOverride,
                vec![
                    overridden_name.clone(),
                    ctx.display(other),
                    ctx.display_type(&ty.self_sig()),
                ],
                member.span,
            );
        }

        let base = overridden.definition();
        if base.flags.is_sealed_override() {
            ctx.report(
                DiagnosticCode::CantOverrideSealed,
                vec![name, overridden_name],
                member.span,
            );
            return Ok(());
        }
        if ctx.is_bogus_override(overridden)? {
            ctx.report(
                DiagnosticCode::CantOverrideBogusMethod,
                vec![name, overridden_name],
                member.span,
            );
            return Ok(());
        }

        let required = ctx.required_override_accessibility(base, ty);
        if member.accessibility != required {
            ctx.report(
                DiagnosticCode::CantChangeAccessOnOverride,
                vec![name.clone(), required.keyword().to_string(), overridden_name.clone()],
                member.span,
            );
        }

        Self::validate_types(ctx, member, overridden, &name, &overridden_name)
    }

    /// Return, property or event type of an override against the overridden member.
    fn validate_types(
        ctx: &ValidationContext<'_>,
        member: &MemberRc,
        overridden: &MemberHandle,
        name: &str,
        overridden_name: &str,
    ) -> Result<()> {
        let options = ctx.options();
        let base_sig = ctx.signature_for(overridden, member);
        let sig = &member.signature;

        if sig.ret.ref_kind != base_sig.ret.ref_kind {
            ctx.report(
                DiagnosticCode::CantChangeRefReturnOnOverride,
                vec![name.to_string(), overridden_name.to_string()],
                member.span,
            );
            return Ok(());
        }

        let structural = TypeCompareKind::IGNORE_NULLABILITY | TypeCompareKind::IGNORE_TUPLE_NAMES;
        if !sig.ret.ty.equals_with(&base_sig.ret.ty, structural) {
            let covariant_allowed = options.covariant_returns
                && sig.ret.ref_kind == RefKind::None
                && match member.kind {
                    MemberKind::Method => true,
                    MemberKind::Property => member.accessors.second.is_none(),
                    MemberKind::Event | MemberKind::Field => false,
                };
            if covariant_allowed && Self::is_covariant(ctx, &sig.ret.ty, &base_sig.ret.ty)? {
                return Ok(());
            }

            let code = match member.kind {
                MemberKind::Method => DiagnosticCode::CantChangeReturnTypeOnOverride,
                _ => DiagnosticCode::CantChangeTypeOnOverride,
            };
            ctx.report(
                code,
                vec![
                    name.to_string(),
                    overridden_name.to_string(),
                    ctx.display_type(&base_sig.ret.ty),
                ],
                member.span,
            );
            return Ok(());
        }

        let tuple_names_differ = |lhs: &TypeSig, rhs: &TypeSig| {
            !lhs.equals_with(rhs, TypeCompareKind::IGNORE_NULLABILITY)
        };
        if tuple_names_differ(&sig.ret.ty, &base_sig.ret.ty)
            || sig
                .params
                .iter()
                .zip(&base_sig.params)
                .any(|(p, b)| tuple_names_differ(&p.ty, &b.ty))
        {
            ctx.report(
                DiagnosticCode::CantChangeTupleNamesOnOverride,
                vec![name.to_string(), overridden_name.to_string()],
                member.span,
            );
        }

        for (param, base_param) in sig.params.iter().zip(&base_sig.params) {
            let readonly_refs = |kind: RefKind| matches!(kind, RefKind::In | RefKind::RefReadonly);
            if param.ref_kind != base_param.ref_kind
                && readonly_refs(param.ref_kind)
                && readonly_refs(base_param.ref_kind)
            {
                ctx.report(
                    DiagnosticCode::OverridingDifferentRefness,
                    vec![param.name.clone(), overridden_name.to_string()],
                    member.span,
                );
            }
        }

        if options.report_nullability_warnings {
            Self::validate_nullability(ctx, member, &base_sig, name)?;
        }
        Ok(())
    }

    fn validate_nullability(
        ctx: &ValidationContext<'_>,
        member: &MemberRc,
        base_sig: &crate::symbols::signatures::Signature,
        name: &str,
    ) -> Result<()> {
        let nullability_differs = |lhs: &TypeSig, rhs: &TypeSig| {
            !lhs.equals_with(rhs, TypeCompareKind::IGNORE_TUPLE_NAMES)
        };
        let sig = &member.signature;

        if nullability_differs(&sig.ret.ty, &base_sig.ret.ty) {
            let code = match member.kind {
                MemberKind::Method => DiagnosticCode::NullabilityMismatchInReturnTypeOnOverride,
                _ => DiagnosticCode::NullabilityMismatchInTypeOnOverride,
            };
            ctx.report(code, vec![name.to_string()], member.span);
        }
        for (param, base_param) in sig.params.iter().zip(&base_sig.params) {
            if nullability_differs(&param.ty, &base_param.ty) {
                ctx.report(
                    DiagnosticCode::NullabilityMismatchInParameterTypeOnOverride,
                    vec![param.name.clone()],
                    member.span,
                );
            }
        }
        Ok(())
    }

    /// Returns `true` if `derived` is a class type whose base chain reaches `base`.
    fn is_covariant(ctx: &ValidationContext<'_>, derived: &TypeSig, base: &TypeSig) -> Result<bool> {
        let registry = ctx.compilation().registry();
        let Some(def) = derived.definition() else {
            return Ok(false);
        };
        if !registry.get_type_required(def)?.is_class() {
            return Ok(false);
        }

        let structural = TypeCompareKind::IGNORE_NULLABILITY | TypeCompareKind::IGNORE_TUPLE_NAMES;
        Ok(registry
            .base_chain(derived.without_nullable(), ctx.options().max_inheritance_depth)?
            .iter()
            .any(|ancestor| ancestor.equals_with(base.without_nullable(), structural)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        symbols::{
            builders::{minimal_corlib, MethodBuilder, TypeBuilder},
            diagnostics::Diagnostics,
            members::{Accessibility, MemberModifiers},
            wellknown::SpecialType,
        },
        Compilation,
    };

    fn special(compilation: &Compilation, id: SpecialType) -> TypeSig {
        TypeSig::named(compilation.get_special_type(id).token().expect("special type"))
    }

    #[test]
    fn test_override_without_base_member() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;
        let ty = TypeBuilder::class("", "C").build(&compilation)?;
        MethodBuilder::new("Missing")
            .with_flags(MemberModifiers::OVERRIDE)
            .build(&compilation, &ty)?;

        let diagnostics = Diagnostics::new();
        OverrideValidator::validate_type(&ValidationContext::new(&compilation, &diagnostics), &ty)?;
        assert_eq!(diagnostics.with_code(DiagnosticCode::OverrideNotExpected).len(), 1);
        Ok(())
    }

    #[test]
    fn test_override_legality_codes() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;
        let int = special(&compilation, SpecialType::Int32);
        let string = special(&compilation, SpecialType::String);

        let base = TypeBuilder::class("", "Base").build(&compilation)?;
        MethodBuilder::new("Plain").build(&compilation, &base)?;
        MethodBuilder::new("Returns")
            .with_flags(MemberModifiers::VIRTUAL)
            .returns(int.clone())
            .build(&compilation, &base)?;
        MethodBuilder::new("Guarded")
            .with_flags(MemberModifiers::VIRTUAL)
            .with_accessibility(Accessibility::Protected)
            .build(&compilation, &base)?;

        let derived = TypeBuilder::class("", "Derived")
            .extends(TypeSig::named(base.token))
            .build(&compilation)?;
        MethodBuilder::new("Plain")
            .with_flags(MemberModifiers::OVERRIDE)
            .build(&compilation, &derived)?;
        MethodBuilder::new("Returns")
            .with_flags(MemberModifiers::OVERRIDE)
            .returns(string)
            .build(&compilation, &derived)?;
        MethodBuilder::new("Guarded")
            .with_flags(MemberModifiers::OVERRIDE)
            .build(&compilation, &derived)?;

        let diagnostics = Diagnostics::new();
        OverrideValidator::validate_type(&ValidationContext::new(&compilation, &diagnostics), &derived)?;
        assert_eq!(diagnostics.with_code(DiagnosticCode::CantOverrideNonVirtual).len(), 1);
        assert_eq!(diagnostics.with_code(DiagnosticCode::CantChangeReturnTypeOnOverride).len(), 1);
        let access = diagnostics.with_code(DiagnosticCode::CantChangeAccessOnOverride);
        assert_eq!(access.len(), 1);
        assert_eq!(access[0].args[1], "protected");
        Ok(())
    }

    #[test]
    fn test_covariant_return_needs_option() -> Result<()> {
        let build = |options| -> Result<Diagnostics> {
            let compilation = Compilation::with_options("App", options);
            minimal_corlib(&compilation)?;
            let animal = TypeBuilder::class("", "Animal").build(&compilation)?;
            let cat = TypeBuilder::class("", "Cat")
                .extends(TypeSig::named(animal.token))
                .build(&compilation)?;
            let base = TypeBuilder::class("", "Shelter").build(&compilation)?;
            MethodBuilder::new("Adopt")
                .with_flags(MemberModifiers::VIRTUAL)
                .returns(TypeSig::named(animal.token))
                .build(&compilation, &base)?;
            let derived = TypeBuilder::class("", "CatShelter")
                .extends(TypeSig::named(base.token))
                .build(&compilation)?;
            MethodBuilder::new("Adopt")
                .with_flags(MemberModifiers::OVERRIDE)
                .returns(TypeSig::named(cat.token))
                .build(&compilation, &derived)?;

            let diagnostics = Diagnostics::new();
            OverrideValidator::validate_type(
                &ValidationContext::new(&compilation, &diagnostics),
                &derived,
            )?;
            Ok(diagnostics)
        };

        let strict = build(crate::AnalysisOptions::strict())?;
        assert_eq!(strict.with_code(DiagnosticCode::CantChangeReturnTypeOnOverride).len(), 1);
        let relaxed = build(crate::AnalysisOptions::relaxed())?;
        assert!(!relaxed.has_any());
        Ok(())
    }
}
