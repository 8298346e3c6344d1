//! Consistency of partial member declarations.
//!
//! A partial method or property is declared twice in one type: a defining declaration and an
//! implementing declaration. The two are paired by name, kind and a hiding match of their
//! signatures, then compared category by category with
//! [`crate::symbols::signatures::member_differences`].

use std::collections::HashSet;

use crate::{
    symbols::{
        diagnostics::DiagnosticCode,
        members::{AccessorKind, AccessorSlot, MemberKind, MemberModifiers, MemberRc},
        signatures::{matches_for_hiding, member_differences, SignatureDifferences},
        token::Token,
        typesystem::{NamedTypeRc, Substitution, TypeSig},
        validation::ValidationContext,
    },
    Result,
};

/// A defining declaration and its implementing declaration.
pub(crate) type PartialPair = (MemberRc, MemberRc);

/// Pairs the partial members of `ty`.
///
/// The first unpaired partial declaration of a name is the definition; the next partial
/// declaration with the same name and kind whose signature matches it is the implementation.
/// Unpaired declarations are left out.
pub(crate) fn partial_pairs(ctx: &ValidationContext<'_>, ty: &NamedTypeRc) -> Vec<PartialPair> {
    let parts: Vec<MemberRc> = ctx
        .compilation()
        .registry()
        .members_of(ty)
        .into_iter()
        .filter(|m| m.flags.contains(MemberModifiers::PARTIAL) && !m.is_accessor())
        .collect();

    let mut paired: HashSet<Token> = HashSet::new();
    let mut pairs = Vec::new();
    for (index, definition) in parts.iter().enumerate() {
        if paired.contains(&definition.token) {
            continue;
        }
        let implementation = parts[index + 1..].iter().find(|candidate| {
            !paired.contains(&candidate.token)
                && candidate.name == definition.name
                && candidate.kind == definition.kind
                && matches_for_hiding(
                    &candidate.signature,
                    &definition.signature.substitute(&Substitution::new().with(
                        definition.token,
                        TypeSig::identity_args(candidate.token, candidate.generic_arity()),
                    )),
                )
        });
        if let Some(implementation) = implementation {
            paired.insert(definition.token);
            paired.insert(implementation.token);
            pairs.push((definition.clone(), implementation.clone()));
        }
    }
    pairs
}

/// Validates pairs of partial member declarations.
pub struct PartialMemberValidator;

impl PartialMemberValidator {
    /// Check every partial member declared by `ty`.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if an accessor token is dangling.
    pub fn validate_type(ctx: &ValidationContext<'_>, ty: &NamedTypeRc) -> Result<()> {
        for member in ctx.compilation().registry().members_of(ty) {
            if member.flags.contains(MemberModifiers::PARTIAL)
                && member.is_explicit_impl()
                && !member.is_accessor()
            {
                ctx.report(
                    DiagnosticCode::PartialMemberNotExplicit,
                    vec![ctx.display_def(&member)],
                    member.span,
                );
            }
        }

        for (definition, implementation) in partial_pairs(ctx, ty) {
            Self::validate_pair(ctx, &definition, &implementation);
            if definition.kind == MemberKind::Property {
                Self::validate_accessors(ctx, &definition, &implementation)?;
            }
        }
        Ok(())
    }

    fn validate_pair(ctx: &ValidationContext<'_>, definition: &MemberRc, implementation: &MemberRc) {
        let diff = member_differences(definition, implementation);
        if diff.is_empty() {
            return;
        }

        let is_property = implementation.kind == MemberKind::Property;
        let name = ctx.display_def(implementation);
        let report = |code: DiagnosticCode| {
            ctx.report(code, vec![name.clone()], implementation.span);
        };

        if diff.contains(SignatureDifferences::TYPE) {
            report(if is_property {
                DiagnosticCode::PartialPropertyTypeDifference
            } else {
                DiagnosticCode::PartialMethodReturnTypeDifference
            });
        }
        if diff.contains(SignatureDifferences::REF_KIND) {
            report(DiagnosticCode::PartialMemberRefReturnDifference);
        }
        if diff.contains(SignatureDifferences::TUPLE_NAMES) {
            report(DiagnosticCode::PartialMemberInconsistentTupleNames);
        }
        if diff.contains(SignatureDifferences::PARAMS) {
            report(DiagnosticCode::PartialMemberParamsDifference);
        }
        if diff.contains(SignatureDifferences::SCOPED) {
            report(DiagnosticCode::ScopedMismatchInParameterOfPartial);
        }
        if diff.contains(SignatureDifferences::ACCESSIBILITY) {
            report(DiagnosticCode::PartialMemberAccessibilityDifference);
        }
        if diff.contains(SignatureDifferences::STATIC) {
            report(DiagnosticCode::PartialMemberStaticDifference);
        }
        if diff.contains(SignatureDifferences::UNSAFE) {
            report(DiagnosticCode::PartialMemberUnsafeDifference);
        }
        if diff.contains(SignatureDifferences::EXTENDED_MODIFIERS) {
            report(DiagnosticCode::PartialMemberExtendedModDifference);
        }
        if diff.contains(SignatureDifferences::READONLY) {
            report(DiagnosticCode::PartialMemberReadOnlyDifference);
        }
        if diff.contains(SignatureDifferences::REQUIRED) {
            report(DiagnosticCode::PartialPropertyRequiredDifference);
        }
        if diff.contains(SignatureDifferences::SIGNATURE) {
            report(if is_property {
                DiagnosticCode::PartialPropertySignatureDifference
            } else {
                DiagnosticCode::PartialMethodSignatureDifference
            });
        }

        if ctx.options().report_nullability_warnings {
            if diff.contains(SignatureDifferences::NULLABILITY_RETURN) {
                report(DiagnosticCode::NullabilityMismatchInReturnTypeOnPartial);
            }
            if diff.contains(SignatureDifferences::NULLABILITY_PARAMETER) {
                report(DiagnosticCode::NullabilityMismatchInParameterTypeOnPartial);
            }
        }
    }

    fn validate_accessors(
        ctx: &ValidationContext<'_>,
        definition: &MemberRc,
        implementation: &MemberRc,
    ) -> Result<()> {
        let registry = ctx.compilation().registry();
        let accessor_kind = |token: Option<Token>| -> Result<Option<AccessorKind>> {
            token
                .map(|token| registry.get_member_required(token))
                .transpose()
                .map(|member| member.and_then(|m| m.accessor_kind()))
        };

        for slot in [AccessorSlot::First, AccessorSlot::Second] {
            let declared = accessor_kind(definition.accessors.get(slot))?;
            let implemented = accessor_kind(implementation.accessors.get(slot))?;

            match (declared, implemented) {
                (Some(kind), None) => ctx.report(
                    DiagnosticCode::PartialPropertyMissingAccessor,
                    vec![ctx.display_def(implementation), kind.keyword().to_string()],
                    implementation.span,
                ),
                (None, Some(kind)) => ctx.report(
                    DiagnosticCode::PartialPropertyUnexpectedAccessor,
                    vec![ctx.display_def(implementation), kind.keyword().to_string()],
                    implementation.span,
                ),
                (Some(declared), Some(implemented))
                    if (declared == AccessorKind::Init) != (implemented == AccessorKind::Init) =>
                {
                    ctx.report(
                        DiagnosticCode::PartialPropertyInitMismatch,
                        vec![ctx.display_def(implementation), implemented.keyword().to_string()],
                        implementation.span,
                    );
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        symbols::{
            builders::{minimal_corlib, MethodBuilder, PropertyBuilder, TypeBuilder},
            diagnostics::Diagnostics,
            members::Accessibility,
            wellknown::SpecialType,
        },
        Compilation,
    };

    fn int(compilation: &Compilation) -> TypeSig {
        TypeSig::named(
            compilation
                .get_special_type(SpecialType::Int32)
                .token()
                .expect("int"),
        )
    }

    #[test]
    fn test_partial_method_differences() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;
        let ty = TypeBuilder::class("", "C").build(&compilation)?;
        MethodBuilder::new("M")
            .with_flags(MemberModifiers::PARTIAL)
            .returns(int(&compilation))
            .build(&compilation, &ty)?;
        MethodBuilder::new("M")
            .with_flags(MemberModifiers::PARTIAL | MemberModifiers::STATIC)
            .with_accessibility(Accessibility::Private)
            .build(&compilation, &ty)?;

        let diagnostics = Diagnostics::new();
        PartialMemberValidator::validate_type(
            &ValidationContext::new(&compilation, &diagnostics),
            &ty,
        )?;
        assert_eq!(
            diagnostics
                .with_code(DiagnosticCode::PartialMethodReturnTypeDifference)
                .len(),
            1
        );
        assert_eq!(diagnostics.with_code(DiagnosticCode::PartialMemberStaticDifference).len(), 1);
        assert_eq!(
            diagnostics
                .with_code(DiagnosticCode::PartialMemberAccessibilityDifference)
                .len(),
            1
        );
        Ok(())
    }

    #[test]
    fn test_partial_property_accessors() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;
        let ty = TypeBuilder::class("", "C").build(&compilation)?;
        PropertyBuilder::new("P", int(&compilation))
            .get()
            .set()
            .with_flags(MemberModifiers::PARTIAL)
            .build(&compilation, &ty)?;
        PropertyBuilder::new("P", int(&compilation))
            .get()
            .with_flags(MemberModifiers::PARTIAL)
            .build(&compilation, &ty)?;
        PropertyBuilder::new("Q", int(&compilation))
            .get()
            .set()
            .with_flags(MemberModifiers::PARTIAL)
            .build(&compilation, &ty)?;
        PropertyBuilder::new("Q", int(&compilation))
            .get()
            .init()
            .with_flags(MemberModifiers::PARTIAL)
            .build(&compilation, &ty)?;

        let diagnostics = Diagnostics::new();
        let ctx = ValidationContext::new(&compilation, &diagnostics);
        assert_eq!(partial_pairs(&ctx, &ty).len(), 2);
        PartialMemberValidator::validate_type(&ctx, &ty)?;

        let missing = diagnostics.with_code(DiagnosticCode::PartialPropertyMissingAccessor);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].args[1], "set");
        assert_eq!(diagnostics.with_code(DiagnosticCode::PartialPropertyInitMismatch).len(), 1);
        Ok(())
    }

    #[test]
    fn test_unpaired_part_is_ignored() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;
        let ty = TypeBuilder::class("", "C").build(&compilation)?;
        MethodBuilder::new("M")
            .with_flags(MemberModifiers::PARTIAL)
            .build(&compilation, &ty)?;
        MethodBuilder::new("M")
            .with_flags(MemberModifiers::PARTIAL)
            .param("x", int(&compilation))
            .build(&compilation, &ty)?;

        let diagnostics = Diagnostics::new();
        let ctx = ValidationContext::new(&compilation, &diagnostics);
        assert!(partial_pairs(&ctx, &ty).is_empty());
        PartialMemberValidator::validate_type(&ctx, &ty)?;
        assert!(!diagnostics.has_any());
        Ok(())
    }
}
