//! Binding member recipes to live members of a compilation.

use crate::symbols::{
    compilation::Compilation,
    members::{Accessibility, Member, MemberHandle},
    signatures::{matches_for_override, RefKind, Signature, SignatureParameter},
    token::Token,
    typesystem::{NamedType, Substitution, TypeModifiers, TypeSig},
    wellknown::{descriptor, MemberDescriptor, MemberId, SigTy},
};

/// Find the member described by `id` among the declared members of its declaring type.
///
/// The declaring type is resolved first; an unresolved declaring type, or a signature that
/// names an unresolved type, makes the member absent. Generic constraints are not checked.
pub(crate) fn resolve_member(compilation: &Compilation, id: MemberId) -> Option<MemberHandle> {
    let recipe = descriptor(id);
    let lookup = compilation.get_type(recipe.declaring_type);
    let Some(declaring) = lookup.found() else {
        tracing::debug!(%id, "declaring type of framework member did not resolve");
        return None;
    };

    let registry = compilation.registry();
    let found = registry
        .members_named(declaring, recipe.name)
        .into_iter()
        .find(|member| {
            member.kind == recipe.kind
                && is_bindable(member, declaring)
                && member.is_static() == recipe.is_static
                && member.generic_arity() == usize::from(recipe.arity)
                && member.signature.params.len() == recipe.params.len()
                && recipe_signature(compilation, recipe, declaring.token, member.token)
                    .is_some_and(|expected| {
                        matches_for_override(&member.signature, &expected, &Substitution::new())
                    })
        });

    if found.is_none() {
        tracing::debug!(%id, "framework member not found");
    }
    found.map(MemberHandle::Definition)
}

/// Public members always bind. Protected members bind on classes that can be derived from,
/// where generated overrides and calls from derived types reach them.
fn is_bindable(member: &Member, declaring: &NamedType) -> bool {
    match member.accessibility {
        Accessibility::Public => true,
        Accessibility::Protected | Accessibility::ProtectedOrInternal => {
            declaring.is_class() && !declaring.flags.contains(TypeModifiers::SEALED)
        }
        _ => false,
    }
}

/// The signature a recipe describes, for a candidate declared as `method` in `declaring`.
fn recipe_signature(
    compilation: &Compilation,
    recipe: &MemberDescriptor,
    declaring: Token,
    method: Token,
) -> Option<Signature> {
    let params = recipe
        .params
        .iter()
        .map(|param| match param {
            SigTy::ByRef(inner) => Some(
                SignatureParameter::new("", recipe_type(compilation, inner, declaring, method)?)
                    .with_ref_kind(RefKind::Ref),
            ),
            other => Some(SignatureParameter::new(
                "",
                recipe_type(compilation, other, declaring, method)?,
            )),
        })
        .collect::<Option<Vec<_>>>()?;

    let mut signature = Signature::new(
        recipe_type(compilation, &recipe.returns, declaring, method)?,
        params,
    );
    signature.generic_arity = recipe.arity;
    Some(signature)
}

fn recipe_type(
    compilation: &Compilation,
    ty: &SigTy,
    declaring: Token,
    method: Token,
) -> Option<TypeSig> {
    match ty {
        SigTy::Void => Some(TypeSig::Void),
        SigTy::Special(id) => compilation.get_special_type(*id).token().map(TypeSig::named),
        SigTy::WellKnown(id) => compilation.get_well_known_type(*id).token().map(TypeSig::named),
        SigTy::TypeParam(ordinal) => Some(TypeSig::param(declaring, *ordinal)),
        SigTy::MethodParam(ordinal) => Some(TypeSig::param(method, *ordinal)),
        SigTy::SzArray(element) => {
            recipe_type(compilation, element, declaring, method).map(TypeSig::array)
        }
        SigTy::Generic(definition, args) => {
            let definition = recipe_type(compilation, definition, declaring, method)?.definition()?;
            let args = args
                .iter()
                .map(|arg| recipe_type(compilation, arg, declaring, method))
                .collect::<Option<Vec<_>>>()?;
            Some(TypeSig::generic(definition, args))
        }
        SigTy::ByRef(inner) => recipe_type(compilation, inner, declaring, method),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        symbols::{
            builders::{minimal_corlib, MethodBuilder, TypeBuilder},
            members::{Accessibility, MemberModifiers},
            typesystem::TypeModifiers,
            wellknown::{SpecialMember, SpecialType, WellKnownMember},
        },
        Compilation, Result,
    };

    #[test]
    fn test_resolves_members_of_minimal_corlib() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;

        let dispose = compilation
            .get_special_member(SpecialMember::IDisposableDispose)
            .expect("Dispose");
        assert_eq!(dispose.name(), "Dispose");

        let get_enumerator = compilation
            .get_special_member(SpecialMember::IEnumerableTGetEnumerator)
            .expect("GetEnumerator");
        let enumerable = compilation
            .get_special_type(SpecialType::IEnumerableT)
            .token()
            .expect("IEnumerable<T>");
        assert_eq!(get_enumerator.definition().owner, enumerable);

        assert!(compilation
            .get_well_known_member(WellKnownMember::MonitorEnterObjectRefBool)
            .is_some());
        Ok(())
    }

    #[test]
    fn test_overloads_are_told_apart_by_signature() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;

        let two = compilation
            .get_special_member(SpecialMember::StringConcatStringString)
            .expect("Concat(string, string)");
        let three = compilation
            .get_special_member(SpecialMember::StringConcatStringStringString)
            .expect("Concat(string, string, string)");
        assert_ne!(two.token(), three.token());
        assert_eq!(three.signature().params.len(), 3);
        Ok(())
    }

    #[test]
    fn test_wrong_shape_does_not_resolve() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;
        compilation.make_member_missing(SpecialMember::IDisposableDispose);
        assert!(compilation
            .get_special_member(SpecialMember::IDisposableDispose)
            .is_none());

        // A static Dispose with the right name is not the interface member.
        let other = Compilation::new("Other");
        let corlib = other.add_reference("mscorlib", true, Vec::new())?;
        let disposable = TypeBuilder::interface("System", "IDisposable")
            .with_assembly(corlib.token)
            .build(&other)?;
        MethodBuilder::new("Dispose")
            .with_flags(MemberModifiers::STATIC)
            .build(&other, &disposable)?;
        assert!(other
            .get_special_member(SpecialMember::IDisposableDispose)
            .is_none());
        Ok(())
    }

    #[test]
    fn test_protected_members_bind_on_derivable_classes() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;
        let finalize = compilation
            .get_special_member(SpecialMember::ObjectFinalize)
            .expect("Finalize");
        assert_eq!(finalize.definition().accessibility, Accessibility::Protected);

        let declare = |accessibility: Accessibility, flags: TypeModifiers| -> Result<Compilation> {
            let other = Compilation::new("Other");
            let corlib = other.add_reference("mscorlib", true, Vec::new())?;
            let object = TypeBuilder::class("System", "Object")
                .with_assembly(corlib.token)
                .with_flags(flags)
                .without_base()
                .build(&other)?;
            MethodBuilder::new("Finalize")
                .with_accessibility(accessibility)
                .with_flags(MemberModifiers::VIRTUAL)
                .build(&other, &object)?;
            Ok(other)
        };

        let private = declare(Accessibility::Private, TypeModifiers::empty())?;
        assert!(private.get_special_member(SpecialMember::ObjectFinalize).is_none());

        let sealed = declare(Accessibility::Protected, TypeModifiers::SEALED)?;
        assert!(sealed.get_special_member(SpecialMember::ObjectFinalize).is_none());
        Ok(())
    }
}
