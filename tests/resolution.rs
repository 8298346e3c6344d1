//! Integration tests for override and hiding resolution.
//!
//! Each test declares a small hierarchy through the builder API and checks the
//! classification the resolver computes for one member.

use std::sync::Arc;

use symscope::prelude::*;

fn special(compilation: &Compilation, id: SpecialType) -> TypeSig {
    TypeSig::named(
        compilation
            .get_special_type(id)
            .token()
            .expect("core library declares every special type"),
    )
}

fn resolve(compilation: &Compilation, member: &MemberRc) -> Result<Arc<OverriddenOrHiddenMembers>> {
    compilation.overridden_or_hidden(&MemberHandle::Definition(member.clone()))
}

/// class Base { virtual void M(); } class Derived : Base { override void M(); }
#[test]
fn test_basic_override() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;

    let base = TypeBuilder::class("", "Base").build(&compilation)?;
    let base_m = MethodBuilder::new("M")
        .with_flags(MemberModifiers::VIRTUAL)
        .build(&compilation, &base)?;
    let derived = TypeBuilder::class("", "Derived")
        .extends(TypeSig::named(base.token))
        .build(&compilation)?;
    let derived_m = MethodBuilder::new("M")
        .with_flags(MemberModifiers::OVERRIDE)
        .build(&compilation, &derived)?;

    let result = resolve(&compilation, &derived_m)?;
    assert_eq!(result.overridden_members(), &[MemberHandle::Definition(base_m)]);
    assert!(result.hidden_members().is_empty());
    assert!(result.ambiguous().is_empty());
    Ok(())
}

/// class Base { virtual int M { get; set; } } class Derived : Base { new int M; }
#[test]
fn test_field_hides_property() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;
    let int = special(&compilation, SpecialType::Int32);

    let base = TypeBuilder::class("", "Base").build(&compilation)?;
    let property = PropertyBuilder::new("M", int.clone())
        .get()
        .set()
        .with_flags(MemberModifiers::VIRTUAL)
        .build(&compilation, &base)?;
    let derived = TypeBuilder::class("", "Derived")
        .extends(TypeSig::named(base.token))
        .build(&compilation)?;
    let field = FieldBuilder::new("M", int)
        .with_flags(MemberModifiers::NEW)
        .build(&compilation, &derived)?;

    let result = resolve(&compilation, &field)?;
    assert!(result.overridden_member().is_none());
    assert_eq!(result.hidden_members(), &[MemberHandle::Definition(property)]);

    let diagnostics = Diagnostics::new();
    validate_compilation(&compilation, &diagnostics)?;
    assert!(diagnostics.with_code(DiagnosticCode::NewNotRequired).is_empty());
    assert!(diagnostics.with_code(DiagnosticCode::NewRequired).is_empty());
    Ok(())
}

/// class Base { int M; virtual void M(); } class Derived : Base { override void M(); }
#[test]
fn test_override_and_hide_in_one_name_group() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;
    let int = special(&compilation, SpecialType::Int32);

    let base = TypeBuilder::class("", "Base").build(&compilation)?;
    let field = FieldBuilder::new("M", int).build(&compilation, &base)?;
    let method = MethodBuilder::new("M")
        .with_flags(MemberModifiers::VIRTUAL)
        .build(&compilation, &base)?;
    let derived = TypeBuilder::class("", "Derived")
        .extends(TypeSig::named(base.token))
        .build(&compilation)?;
    let derived_m = MethodBuilder::new("M")
        .with_flags(MemberModifiers::OVERRIDE)
        .build(&compilation, &derived)?;

    let result = resolve(&compilation, &derived_m)?;
    assert_eq!(result.overridden_member(), Some(&MemberHandle::Definition(method)));
    assert_eq!(result.hidden_members(), &[MemberHandle::Definition(field)]);
    Ok(())
}

/// class B<T> { virtual void M<U>(T t, U u); } class D : B<D> { override void M<V>(D d, V v); }
#[test]
fn test_generic_immediate_and_least_overridden() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;

    let b = TypeBuilder::class("", "B").with_type_params(&["T"]).build(&compilation)?;
    let b_m = MethodBuilder::new("M")
        .with_type_params(&["U"])
        .param("t", TypeSig::param(b.token, 0))
        .param("u", MethodBuilder::method_param(0))
        .with_flags(MemberModifiers::VIRTUAL)
        .build(&compilation, &b)?;

    let b_token = b.token;
    let d = TypeBuilder::class("", "D")
        .extends_with(move |d| TypeSig::generic(b_token, vec![TypeSig::named(d)]))
        .build(&compilation)?;
    let d_m = MethodBuilder::new("M")
        .with_type_params(&["V"])
        .param("d", TypeSig::named(d.token))
        .param("v", MethodBuilder::method_param(0))
        .with_flags(MemberModifiers::OVERRIDE)
        .build(&compilation, &d)?;

    let registry = compilation.registry();
    let immediate = registry.construct(&b_m, vec![TypeSig::named(d.token)], Vec::new())?;
    let result = resolve(&compilation, &d_m)?;
    assert_eq!(result.overridden_member(), Some(&immediate));
    assert_eq!(registry.display_member(&immediate), "B<D>.M");

    let least = compilation.constructed_least_overridden_method(
        &MemberHandle::Definition(d_m.clone()),
        &d,
        false,
    )?;
    let expected = registry.construct(
        &b_m,
        vec![TypeSig::named(d.token)],
        vec![TypeSig::param(d_m.token, 0)],
    )?;
    assert_eq!(least, expected);
    assert!(least.is_constructed_method());

    // A constructed generic method never records an override of its own.
    let int = special(&compilation, SpecialType::Int32);
    let d_m_int = registry.construct(&d_m, Vec::new(), vec![int])?;
    let constructed = compilation.overridden_or_hidden(&d_m_int)?;
    assert!(constructed.overridden_member().is_none());
    Ok(())
}

/// Without an exact match the nearest ancestor with candidates wins, then the candidate with
/// the fewest custom modifiers, then the first declared.
#[test]
fn test_custom_modifier_tie_break() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;
    let int = special(&compilation, SpecialType::Int32);
    let is_const = TypeBuilder::class("System.Runtime.CompilerServices", "IsConst")
        .build(&compilation)?;
    let modopt = CustomModifier {
        required: false,
        modifier: is_const.token,
    };

    let with_modifiers = |count: usize| {
        (0..count).fold(SignatureParameter::new("x", int.clone()), |param, _| {
            param.with_modifier(modopt)
        })
    };

    let mut parent: Option<Token> = None;
    let mut declared = Vec::new();
    let hierarchy: [(&str, &[usize]); 4] =
        [("A", &[1]), ("B", &[2]), ("C", &[1]), ("D", &[2, 1, 1])];
    for (name, modifiers) in hierarchy {
        let mut builder = TypeBuilder::class("", name);
        if let Some(parent) = parent {
            builder = builder.extends(TypeSig::named(parent));
        }
        let ty = builder.build(&compilation)?;
        for &count in modifiers {
            declared.push(
                MethodBuilder::new("Method1")
                    .parameter(with_modifiers(count))
                    .with_flags(MemberModifiers::VIRTUAL | MemberModifiers::NEW)
                    .build(&compilation, &ty)?,
            );
        }
        parent = Some(ty.token);
    }

    let e = TypeBuilder::class("", "E")
        .extends(TypeSig::named(parent.expect("hierarchy declared")))
        .build(&compilation)?;
    let e_m = MethodBuilder::new("Method1")
        .param("x", int)
        .with_flags(MemberModifiers::OVERRIDE)
        .build(&compilation, &e)?;

    // D declares modifier counts [2, 1, 1]: the first one-modifier overload wins.
    let result = resolve(&compilation, &e_m)?;
    assert_eq!(
        result.overridden_member(),
        Some(&MemberHandle::Definition(declared[4].clone()))
    );
    Ok(())
}

/// ref and out are never interchangeable; in and ref readonly only differ for overriding.
#[test]
fn test_ref_kinds() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;
    let int = special(&compilation, SpecialType::Int32);

    let base = TypeBuilder::class("", "Base").build(&compilation)?;
    MethodBuilder::new("ByRef")
        .parameter(SignatureParameter::new("x", int.clone()).with_ref_kind(RefKind::Ref))
        .with_flags(MemberModifiers::VIRTUAL)
        .build(&compilation, &base)?;
    let readonly_ref = MethodBuilder::new("ReadOnlyRef")
        .parameter(SignatureParameter::new("x", int.clone()).with_ref_kind(RefKind::RefReadonly))
        .with_flags(MemberModifiers::VIRTUAL)
        .build(&compilation, &base)?;

    let derived = TypeBuilder::class("", "Derived")
        .extends(TypeSig::named(base.token))
        .build(&compilation)?;
    let by_out = MethodBuilder::new("ByRef")
        .parameter(SignatureParameter::new("x", int.clone()).with_ref_kind(RefKind::Out))
        .with_flags(MemberModifiers::OVERRIDE)
        .build(&compilation, &derived)?;
    let by_in = MethodBuilder::new("ReadOnlyRef")
        .parameter(SignatureParameter::new("x", int).with_ref_kind(RefKind::In))
        .with_flags(MemberModifiers::OVERRIDE)
        .build(&compilation, &derived)?;

    assert!(resolve(&compilation, &by_out)?.is_empty());
    assert_eq!(
        resolve(&compilation, &by_in)?.overridden_member(),
        Some(&MemberHandle::Definition(readonly_ref))
    );

    let diagnostics = Diagnostics::new();
    validate_compilation(&compilation, &diagnostics)?;
    assert_eq!(diagnostics.with_code(DiagnosticCode::OverrideNotExpected).len(), 1);
    assert_eq!(diagnostics.with_code(DiagnosticCode::OverridingDifferentRefness).len(), 1);
    Ok(())
}

/// interface IA { void M(); } interface IB { void M(); } interface IC : IA, IB { new void M(); }
#[test]
fn test_interface_diamond_hides_both() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;
    let abstract_member = MemberModifiers::ABSTRACT | MemberModifiers::VIRTUAL;

    let ia = TypeBuilder::interface("", "IA").build(&compilation)?;
    let ia_m = MethodBuilder::new("M")
        .with_flags(abstract_member)
        .build(&compilation, &ia)?;
    let ib = TypeBuilder::interface("", "IB").build(&compilation)?;
    let ib_m = MethodBuilder::new("M")
        .with_flags(abstract_member)
        .build(&compilation, &ib)?;

    let ic = TypeBuilder::interface("", "IC")
        .implements(TypeSig::named(ia.token))
        .implements(TypeSig::named(ib.token))
        .build(&compilation)?;
    let ic_m = MethodBuilder::new("M")
        .with_flags(abstract_member | MemberModifiers::NEW)
        .build(&compilation, &ic)?;

    let result = resolve(&compilation, &ic_m)?;
    assert!(result.overridden_member().is_none());
    assert_eq!(
        result.hidden_members(),
        &[MemberHandle::Definition(ia_m), MemberHandle::Definition(ib_m)]
    );

    let diagnostics = Diagnostics::new();
    validate_compilation(&compilation, &diagnostics)?;
    assert!(!diagnostics.has_any());
    Ok(())
}

/// A member shadowing an interface member hides it, but not the member that interface hides.
#[test]
fn test_interface_hiding_is_transitive_only_once() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;
    let abstract_member = MemberModifiers::ABSTRACT | MemberModifiers::VIRTUAL;

    let ia = TypeBuilder::interface("", "IA").build(&compilation)?;
    MethodBuilder::new("M")
        .with_flags(abstract_member)
        .build(&compilation, &ia)?;
    let ib = TypeBuilder::interface("", "IB")
        .implements(TypeSig::named(ia.token))
        .build(&compilation)?;
    let ib_m = MethodBuilder::new("M")
        .with_flags(abstract_member | MemberModifiers::NEW)
        .build(&compilation, &ib)?;
    let ic = TypeBuilder::interface("", "IC")
        .implements(TypeSig::named(ib.token))
        .build(&compilation)?;
    let ic_m = MethodBuilder::new("M")
        .with_flags(abstract_member | MemberModifiers::NEW)
        .build(&compilation, &ic)?;

    let result = resolve(&compilation, &ic_m)?;
    assert_eq!(result.hidden_members(), &[MemberHandle::Definition(ib_m)]);
    Ok(())
}

#[test]
fn test_results_are_shared() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;

    let base = TypeBuilder::class("", "Base").build(&compilation)?;
    let lonely = MethodBuilder::new("Lonely").build(&compilation, &base)?;
    MethodBuilder::new("M")
        .with_flags(MemberModifiers::VIRTUAL)
        .build(&compilation, &base)?;
    let derived = TypeBuilder::class("", "Derived")
        .extends(TypeSig::named(base.token))
        .build(&compilation)?;
    let derived_m = MethodBuilder::new("M")
        .with_flags(MemberModifiers::OVERRIDE)
        .build(&compilation, &derived)?;

    let first = resolve(&compilation, &derived_m)?;
    let second = resolve(&compilation, &derived_m)?;
    assert!(Arc::ptr_eq(&first, &second));

    let empty = resolve(&compilation, &lonely)?;
    assert!(OverriddenOrHiddenMembers::is_empty_singleton(&empty));
    assert!(Arc::ptr_eq(&empty, &OverriddenOrHiddenMembers::empty()));
    Ok(())
}

#[test]
fn test_search_stops_at_nearest_ancestor_with_candidates() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;
    let int = special(&compilation, SpecialType::Int32);
    let string = special(&compilation, SpecialType::String);

    let a = TypeBuilder::class("", "A").build(&compilation)?;
    MethodBuilder::new("M")
        .param("x", int.clone())
        .with_flags(MemberModifiers::VIRTUAL)
        .build(&compilation, &a)?;
    let b = TypeBuilder::class("", "B")
        .extends(TypeSig::named(a.token))
        .build(&compilation)?;
    MethodBuilder::new("M")
        .param("x", string)
        .with_flags(MemberModifiers::VIRTUAL)
        .build(&compilation, &b)?;
    let c = TypeBuilder::class("", "C")
        .extends(TypeSig::named(b.token))
        .build(&compilation)?;
    let c_m = MethodBuilder::new("M")
        .param("x", int)
        .with_flags(MemberModifiers::OVERRIDE)
        .build(&compilation, &c)?;

    // B declares an M, so A.M(int) is never considered.
    assert!(resolve(&compilation, &c_m)?.is_empty());
    Ok(())
}

/// The same hierarchy declared in source and in a referenced assembly classifies alike.
#[test]
fn test_source_and_reference_agree() -> Result<()> {
    fn declare(compilation: &Compilation, assembly: Option<Token>) -> Result<Vec<String>> {
        let int = special(compilation, SpecialType::Int32);
        let prefix = if assembly.is_some() { "Ref" } else { "Src" };
        let place = |builder: TypeBuilder| match assembly {
            Some(token) => builder.with_assembly(token),
            None => builder,
        };

        let base = place(TypeBuilder::class(prefix, "Base")).build(compilation)?;
        MethodBuilder::new("Run")
            .with_flags(MemberModifiers::VIRTUAL)
            .build(compilation, &base)?;
        PropertyBuilder::new("Size", int.clone())
            .get()
            .set()
            .with_flags(MemberModifiers::VIRTUAL)
            .build(compilation, &base)?;
        FieldBuilder::new("Tag", int.clone()).build(compilation, &base)?;

        let derived = place(TypeBuilder::class(prefix, "Derived"))
            .extends(TypeSig::named(base.token))
            .build(compilation)?;
        MethodBuilder::new("Run")
            .with_flags(MemberModifiers::OVERRIDE | MemberModifiers::SEALED)
            .build(compilation, &derived)?;
        PropertyBuilder::new("Size", int.clone())
            .get()
            .with_flags(MemberModifiers::OVERRIDE)
            .build(compilation, &derived)?;
        MethodBuilder::new("Tag")
            .with_flags(MemberModifiers::NEW)
            .build(compilation, &derived)?;

        let registry = compilation.registry();
        let mut classified = Vec::new();
        for member in registry.members_of(&derived) {
            let result = compilation.overridden_or_hidden(&MemberHandle::Definition(member.clone()))?;
            let strip = |handle: &MemberHandle| {
                registry
                    .display_member(handle)
                    .trim_start_matches(prefix)
                    .to_string()
            };
            classified.push(format!(
                "{} -> {:?} / {:?}",
                member.name,
                result.overridden_member().map(strip),
                result.hidden_members().iter().map(strip).collect::<Vec<_>>()
            ));
        }
        Ok(classified)
    }

    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;
    let library = AssemblyBuilder::new("Library").build(&compilation)?;

    let from_source = declare(&compilation, None)?;
    let from_reference = declare(&compilation, Some(library.token))?;
    assert_eq!(from_source, from_reference);
    assert_eq!(from_source.len(), 4);
    Ok(())
}
