//! Unimplemented abstract members.

use std::collections::HashSet;

use crate::{
    symbols::{
        diagnostics::DiagnosticCode,
        members::{MemberHandle, MemberKind},
        token::Token,
        typesystem::NamedTypeRc,
        validation::ValidationContext,
    },
    Result,
};

/// Reports abstract members a concrete class leaves without an override.
pub struct AbstractMemberValidator;

impl AbstractMemberValidator {
    /// Check that `ty` overrides every abstract method and accessor it inherits.
    ///
    /// Interfaces, structs and abstract classes are skipped.
    ///
    /// # Errors
    /// Propagates base chain and resolver errors.
    pub fn validate_type(ctx: &ValidationContext<'_>, ty: &NamedTypeRc) -> Result<()> {
        if !ty.is_class() || ty.is_abstract() {
            return Ok(());
        }

        let registry = ctx.compilation().registry();
        let mut implemented: HashSet<Token> = HashSet::new();
        Self::collect_overridden(ctx, ty, &mut implemented)?;

        for ancestor in registry.base_chain(&ty.self_sig(), ctx.options().max_inheritance_depth)? {
            let Some(def) = ancestor.definition() else {
                continue;
            };
            let ancestor_ty = registry.get_type_required(def)?;

            for member in registry.members_of(&ancestor_ty) {
                if member.kind == MemberKind::Method
                    && member.is_abstract()
                    && !implemented.contains(&member.token)
                {
                    let handle = registry.member_of(&member, &ancestor)?;
                    ctx.report(
                        DiagnosticCode::UnimplementedAbstractMethod,
                        vec![ctx.display_type(&ty.self_sig()), ctx.display(&handle)],
                        ty.span,
                    );
                }
            }
            Self::collect_overridden(ctx, &ancestor_ty, &mut implemented)?;
        }
        Ok(())
    }

    /// Adds the definitions overridden by the overrides `ty` declares.
    fn collect_overridden(
        ctx: &ValidationContext<'_>,
        ty: &NamedTypeRc,
        implemented: &mut HashSet<Token>,
    ) -> Result<()> {
        for member in ctx.compilation().registry().members_of(ty) {
            if member.kind != MemberKind::Method || !member.is_override() || member.is_explicit_impl() {
                continue;
            }
            let result = ctx.resolve(&member)?;
            implemented.extend(result.overridden_member().map(MemberHandle::token));
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
            members::MemberModifiers,
            typesystem::{TypeModifiers, TypeSig},
            wellknown::SpecialType,
        },
        Compilation,
    };

    #[test]
    fn test_unimplemented_abstract_members() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;
        let int = TypeSig::named(
            compilation
                .get_special_type(SpecialType::Int32)
                .token()
                .expect("int"),
        );

        let shape = TypeBuilder::class("", "Shape")
            .with_flags(TypeModifiers::ABSTRACT)
            .build(&compilation)?;
        MethodBuilder::new("Area")
            .with_flags(MemberModifiers::ABSTRACT)
            .returns(int.clone())
            .build(&compilation, &shape)?;
        MethodBuilder::new("Draw")
            .with_flags(MemberModifiers::ABSTRACT)
            .build(&compilation, &shape)?;
        PropertyBuilder::new("Sides", int.clone())
            .get()
            .with_flags(MemberModifiers::ABSTRACT)
            .build(&compilation, &shape)?;

        let polygon = TypeBuilder::class("", "Polygon")
            .with_flags(TypeModifiers::ABSTRACT)
            .extends(TypeSig::named(shape.token))
            .build(&compilation)?;
        MethodBuilder::new("Draw")
            .with_flags(MemberModifiers::OVERRIDE)
            .build(&compilation, &polygon)?;

        let square = TypeBuilder::class("", "Square")
            .extends(TypeSig::named(polygon.token))
            .build(&compilation)?;
        MethodBuilder::new("Area")
            .with_flags(MemberModifiers::OVERRIDE)
            .returns(int)
            .build(&compilation, &square)?;

        let diagnostics = Diagnostics::new();
        let ctx = ValidationContext::new(&compilation, &diagnostics);
        AbstractMemberValidator::validate_type(&ctx, &square)?;
        AbstractMemberValidator::validate_type(&ctx, &polygon)?;

        let missing = diagnostics.with_code(DiagnosticCode::UnimplementedAbstractMethod);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].args[0], "Square");
        assert!(missing[0].args[1].contains("get_Sides"));
        Ok(())
    }
}
