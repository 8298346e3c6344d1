//! Hiding of inherited members.
//!
//! A member that is not an override and shares its name (and, for members of the same kind,
//! its signature) with an inherited member hides it. Hiding is legal but has to be stated with
//! `new`; hiding an abstract member in a class is always an error.

use std::collections::HashSet;

use crate::{
    symbols::{
        diagnostics::DiagnosticCode,
        members::MemberRc,
        typesystem::NamedTypeRc,
        validation::{partial::partial_pairs, ValidationContext},
    },
    Result,
};

/// Validates `new` modifiers and implicit hiding.
pub struct HidingValidator;

impl HidingValidator {
    /// Check every non-override member declared by `ty`.
    ///
    /// # Errors
    /// Propagates resolver errors for a malformed symbol graph.
    pub fn validate_type(ctx: &ValidationContext<'_>, ty: &NamedTypeRc) -> Result<()> {
        let implementations: HashSet<_> = partial_pairs(ctx, ty)
            .into_iter()
            .map(|(_, implementation)| implementation.token)
            .collect();

        for member in ctx.compilation().registry().members_of(ty) {
            if member.is_override()
                || member.is_accessor()
                || member.is_explicit_impl()
                || member.name == ".ctor"
                || implementations.contains(&member.token)
            {
                continue;
            }
            Self::validate_member(ctx, ty, &member)?;
        }
        Ok(())
    }

    fn validate_member(ctx: &ValidationContext<'_>, ty: &NamedTypeRc, member: &MemberRc) -> Result<()> {
        let warnings = ctx.options().report_hiding_warnings;
        let result = ctx.resolve(member)?;
        let hidden = result.hidden_members();

        let Some(first) = hidden.first() else {
            if member.is_new() && warnings {
                ctx.report(
                    DiagnosticCode::NewNotRequired,
                    vec![ctx.display_def(member)],
                    member.span,
                );
            }
            return Ok(());
        };

        if !ty.is_interface() {
            if let Some(abstract_member) = hidden.iter().find(|h| h.definition().is_abstract()) {
                ctx.report(
                    DiagnosticCode::HidingAbstractMethod,
                    vec![ctx.display_def(member), ctx.display(abstract_member)],
                    member.span,
                );
                return Ok(());
            }
        }

        if member.is_new() || !warnings {
            return Ok(());
        }

        let overridable = hidden.iter().find(|h| {
            let def = h.definition();
            def.kind == member.kind && def.is_in_virtual_chain() && !def.is_static()
        });
        let (code, hidden) = match overridable {
            Some(h) if !member.is_static() => (DiagnosticCode::NewOrOverrideExpected, h),
            _ => (DiagnosticCode::NewRequired, first),
        };
        ctx.report(
            code,
            vec![ctx.display_def(member), ctx.display(hidden)],
            member.span,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        symbols::{
            builders::{minimal_corlib, FieldBuilder, MethodBuilder, TypeBuilder},
            diagnostics::Diagnostics,
            members::MemberModifiers,
            typesystem::{TypeModifiers, TypeSig},
            wellknown::SpecialType,
        },
        AnalysisOptions, Compilation,
    };

    fn hierarchy(compilation: &Compilation) -> Result<(NamedTypeRc, NamedTypeRc)> {
        minimal_corlib(compilation)?;
        let base = TypeBuilder::class("", "Base").build(compilation)?;
        MethodBuilder::new("Virtual")
            .with_flags(MemberModifiers::VIRTUAL)
            .build(compilation, &base)?;
        MethodBuilder::new("Plain").build(compilation, &base)?;
        let derived = TypeBuilder::class("", "Derived")
            .extends(TypeSig::named(base.token))
            .build(compilation)?;
        Ok((base, derived))
    }

    #[test]
    fn test_hiding_warnings() -> Result<()> {
        let compilation = Compilation::new("App");
        let (_, derived) = hierarchy(&compilation)?;
        MethodBuilder::new("Virtual").build(&compilation, &derived)?;
        MethodBuilder::new("Plain").build(&compilation, &derived)?;
        MethodBuilder::new("Fresh")
            .with_flags(MemberModifiers::NEW)
            .build(&compilation, &derived)?;

        let diagnostics = Diagnostics::new();
        HidingValidator::validate_type(&ValidationContext::new(&compilation, &diagnostics), &derived)?;
        assert_eq!(diagnostics.with_code(DiagnosticCode::NewOrOverrideExpected).len(), 1);
        assert_eq!(diagnostics.with_code(DiagnosticCode::NewRequired).len(), 1);
        assert_eq!(diagnostics.with_code(DiagnosticCode::NewNotRequired).len(), 1);
        assert!(!diagnostics.has_errors());
        Ok(())
    }

    #[test]
    fn test_hiding_warnings_can_be_disabled() -> Result<()> {
        let compilation = Compilation::with_options("App", AnalysisOptions::minimal());
        let (_, derived) = hierarchy(&compilation)?;
        MethodBuilder::new("Virtual").build(&compilation, &derived)?;

        let diagnostics = Diagnostics::new();
        HidingValidator::validate_type(&ValidationContext::new(&compilation, &diagnostics), &derived)?;
        assert!(!diagnostics.has_any());
        Ok(())
    }

    #[test]
    fn test_hiding_abstract_member_is_an_error() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;
        let int = TypeSig::named(
            compilation
                .get_special_type(SpecialType::Int32)
                .token()
                .expect("int"),
        );
        let base = TypeBuilder::class("", "Shape")
            .with_flags(TypeModifiers::ABSTRACT)
            .build(&compilation)?;
        MethodBuilder::new("Area")
            .with_flags(MemberModifiers::ABSTRACT)
            .build(&compilation, &base)?;
        let derived = TypeBuilder::class("", "Square")
            .with_flags(TypeModifiers::ABSTRACT)
            .extends(TypeSig::named(base.token))
            .build(&compilation)?;
        FieldBuilder::new("Area", int)
            .with_flags(MemberModifiers::NEW)
            .build(&compilation, &derived)?;

        let diagnostics = Diagnostics::new();
        HidingValidator::validate_type(&ValidationContext::new(&compilation, &diagnostics), &derived)?;
        assert_eq!(diagnostics.with_code(DiagnosticCode::HidingAbstractMethod).len(), 1);
        assert!(diagnostics.has_errors());
        Ok(())
    }
}
