//! Integration tests for framework type lookup and the missing-member policy.

use symscope::prelude::*;

/// Three assemblies declare `System.Type`: the core library (public), a friend library that
/// makes it public and a friend library that keeps it internal.
fn ambiguous_type_compilation() -> Result<Compilation> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;

    let lib1 = AssemblyBuilder::new("Lib1")
        .internals_visible_to("App")
        .build(&compilation)?;
    let lib2 = AssemblyBuilder::new("Lib2")
        .internals_visible_to("App")
        .build(&compilation)?;
    TypeBuilder::class("System", "Type")
        .with_assembly(lib1.token)
        .build(&compilation)?;
    TypeBuilder::class("System", "Type")
        .with_assembly(lib2.token)
        .with_accessibility(Accessibility::Internal)
        .build(&compilation)?;
    Ok(compilation)
}

/// Well-known lookup settles on the core library's public declaration.
#[test]
fn test_well_known_type_prefers_corlib() -> Result<()> {
    let compilation = ambiguous_type_compilation()?;

    let lookup = compilation.get_well_known_type(WellKnownType::Type);
    let ty = lookup.found().expect("System.Type resolves");
    assert_eq!(ty.fullname(), "System.Type");
    let assembly = compilation.get_assembly(ty.assembly)?;
    assert!(assembly.is_corlib);

    let get_type = compilation
        .get_well_known_member(WellKnownMember::TypeGetTypeFromHandle)
        .expect("GetTypeFromHandle resolves");
    assert_eq!(get_type.definition().owner, ty.token);
    Ok(())
}

/// Lookup by name sees three accessible candidates and gives up.
#[test]
fn test_metadata_name_lookup_is_ambiguous() -> Result<()> {
    let compilation = ambiguous_type_compilation()?;
    assert!(compilation.get_type_by_metadata_name("System.Type").is_none());
    assert!(compilation.get_type_by_metadata_name("System.Threading.Monitor").is_some());
    Ok(())
}

/// A source declaration shadows every reference.
#[test]
fn test_source_declaration_wins() -> Result<()> {
    let compilation = ambiguous_type_compilation()?;
    let source = TypeBuilder::class("System", "Type").build(&compilation)?;

    let by_name = compilation
        .get_type_by_metadata_name("System.Type")
        .expect("source type resolves");
    assert_eq!(by_name.token, source.token);
    assert_eq!(
        compilation.get_well_known_type(WellKnownType::Type).token(),
        Some(source.token)
    );
    Ok(())
}

/// Special types only come from the core library.
#[test]
fn test_special_type_requires_corlib() -> Result<()> {
    let compilation = Compilation::new("App");
    let lookup = compilation.get_special_type(SpecialType::Object);
    assert!(lookup.is_error());
    assert_eq!(lookup.special_type(), Some(SpecialType::Object));

    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;
    assert!(!compilation.get_special_type(SpecialType::Object).is_error());
    Ok(())
}

/// An iterator without `IDisposable.Dispose` reports CS0656 at the iterator's span.
#[test]
fn test_missing_dispose_in_iterator() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;
    compilation.make_member_missing(SpecialMember::IDisposableDispose);

    let diagnostics = Diagnostics::new();
    let policy = MissingMemberPolicy::new(&compilation, &diagnostics);
    let span = Span::new(120, 180);
    let lowered = policy.lower(LoweringConstruct::Iterator { enumerable: true }, span);

    assert!(lowered.has_failed());
    assert!(lowered.member(SpecialMember::IEnumeratorMoveNext.into()).is_some());

    let missing = diagnostics.with_code(DiagnosticCode::MissingPredefinedMember);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].args, vec!["System.IDisposable", "Dispose"]);
    assert_eq!(missing[0].span, span);
    assert_eq!(missing[0].severity, DiagnosticSeverity::Error);
    Ok(())
}

/// `lock` falls back to `Monitor.Enter(object)` without a diagnostic.
#[test]
fn test_lock_uses_alternate_enter() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;
    compilation.make_member_missing(WellKnownMember::MonitorEnterObjectRefBool);

    let diagnostics = Diagnostics::new();
    let policy = MissingMemberPolicy::new(&compilation, &diagnostics);
    let lowered = policy.lower(LoweringConstruct::Lock, Span::default());

    assert!(!lowered.has_failed());
    assert!(!diagnostics.has_any());
    let enter = lowered
        .uses
        .iter()
        .find(|used| used.requested == MemberId::from(WellKnownMember::MonitorEnterObjectRefBool))
        .expect("enter is requested");
    assert_eq!(
        enter.resolved.as_ref().map(|(id, _)| *id),
        Some(MemberId::from(WellKnownMember::MonitorEnter))
    );
    assert_eq!(enter.action, Some(MissingMemberAction::Degrade));
    Ok(())
}

/// Each use of a missing member is reported on its own.
#[test]
fn test_missing_member_reported_per_use() -> Result<()> {
    let compilation = Compilation::new("App");
    minimal_corlib(&compilation)?;
    compilation.make_member_missing(WellKnownMember::MonitorExit);

    let diagnostics = Diagnostics::new();
    let policy = MissingMemberPolicy::new(&compilation, &diagnostics);
    policy.lower(LoweringConstruct::Lock, Span::new(0, 10));
    policy.lower(LoweringConstruct::Lock, Span::new(20, 30));

    let missing = diagnostics.with_code(DiagnosticCode::MissingPredefinedMember);
    assert_eq!(missing.len(), 2);
    assert!(missing
        .iter()
        .all(|d| d.args == vec!["System.Threading.Monitor", "Exit"]));
    Ok(())
}
