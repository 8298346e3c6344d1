//! A small core library for tests, benchmarks and embedders without real references.
//!
//! [`minimal_corlib`] declares every special and well-known type together with the members
//! the lowering passes ask for, in the shapes the member recipes expect.

use std::sync::Arc;

use crate::{
    symbols::{
        builders::{AssemblyBuilder, MethodBuilder, PropertyBuilder, TypeBuilder},
        compilation::{Assembly, Compilation},
        members::{Accessibility, MemberModifiers},
        signatures::{RefKind, SignatureParameter},
        token::Token,
        typesystem::{NamedTypeRc, TypeModifiers, TypeSig},
    },
    Result,
};

const VIRTUAL: MemberModifiers = MemberModifiers::VIRTUAL;
const STATIC: MemberModifiers = MemberModifiers::STATIC;
const INTERFACE_MEMBER: MemberModifiers = MemberModifiers::ABSTRACT.union(MemberModifiers::VIRTUAL);

struct Corlib<'a> {
    compilation: &'a Compilation,
    assembly: Token,
}

impl Corlib<'_> {
    fn class(&self, namespace: &str, name: &str) -> TypeBuilder {
        TypeBuilder::class(namespace, name).with_assembly(self.assembly)
    }

    fn value_type(&self, namespace: &str, name: &str) -> Result<NamedTypeRc> {
        TypeBuilder::value_type(namespace, name)
            .with_assembly(self.assembly)
            .build(self.compilation)
    }

    fn interface(&self, namespace: &str, name: &str) -> TypeBuilder {
        TypeBuilder::interface(namespace, name).with_assembly(self.assembly)
    }

    fn attribute(&self, namespace: &str, name: &str, attribute: &NamedTypeRc) -> Result<NamedTypeRc> {
        self.class(namespace, name)
            .extends(TypeSig::named(attribute.token))
            .with_flags(TypeModifiers::SEALED)
            .build(self.compilation)
    }

    fn ctor(&self, owner: &NamedTypeRc) -> Result<()> {
        MethodBuilder::constructor().build(self.compilation, owner)?;
        Ok(())
    }
}

/// Register a core library named `mscorlib` with the special and well-known types
///
/// ## Arguments
/// * 'compilation' - The compilation to add the reference to
///
/// # Errors
/// Returns [`crate::Error::DuplicateName`] if an assembly named `mscorlib` already exists.
///
/// # Examples
///
/// ```rust
/// use symscope::Compilation;
/// use symscope::symbols::builders::minimal_corlib;
/// use symscope::symbols::wellknown::SpecialType;
///
/// # fn main() -> symscope::Result<()> {
/// let compilation = Compilation::new("App");
/// let corlib = minimal_corlib(&compilation)?;
/// assert!(corlib.is_corlib);
/// assert!(!compilation.get_special_type(SpecialType::String).is_error());
/// # Ok(())
/// # }
/// ```
pub fn minimal_corlib(compilation: &Compilation) -> Result<Arc<Assembly>> {
    let assembly = AssemblyBuilder::new("mscorlib").corlib().build(compilation)?;
    let lib = Corlib {
        compilation,
        assembly: assembly.token,
    };

    let object = lib.class("System", "Object").build(compilation)?;
    let object_sig = TypeSig::named(object.token);
    lib.class("System", "ValueType")
        .with_flags(TypeModifiers::ABSTRACT)
        .build(compilation)?;

    lib.value_type("System", "Void")?;
    let boolean = TypeSig::named(lib.value_type("System", "Boolean")?.token);
    lib.value_type("System", "Char")?;
    let int32 = TypeSig::named(lib.value_type("System", "Int32")?.token);
    lib.value_type("System", "Int64")?;
    lib.value_type("System", "Double")?;
    lib.value_type("System", "IntPtr")?;
    let type_handle = TypeSig::named(lib.value_type("System", "RuntimeTypeHandle")?.token);

    let string = lib
        .class("System", "String")
        .with_flags(TypeModifiers::SEALED)
        .build(compilation)?;
    let string_sig = TypeSig::named(string.token);

    MethodBuilder::new("Equals")
        .with_flags(VIRTUAL)
        .returns(boolean.clone())
        .param("obj", object_sig.clone())
        .build(compilation, &object)?;
    MethodBuilder::new("ToString")
        .with_flags(VIRTUAL)
        .returns(string_sig.clone())
        .build(compilation, &object)?;
    MethodBuilder::new("GetHashCode")
        .with_flags(VIRTUAL)
        .returns(int32)
        .build(compilation, &object)?;
    MethodBuilder::new("Finalize")
        .with_flags(VIRTUAL)
        .with_accessibility(Accessibility::Protected)
        .build(compilation, &object)?;
    lib.ctor(&object)?;

    for arity in 2..=4 {
        let mut concat = MethodBuilder::new("Concat")
            .with_flags(STATIC)
            .returns(string_sig.clone());
        for index in 0..arity {
            concat = concat.param(&format!("str{index}"), string_sig.clone());
        }
        concat.build(compilation, &string)?;
    }
    MethodBuilder::new("Concat")
        .with_flags(STATIC)
        .returns(string_sig.clone())
        .parameter(SignatureParameter::new("values", TypeSig::array(string_sig.clone())).params())
        .build(compilation, &string)?;
    MethodBuilder::new("Concat")
        .with_flags(STATIC)
        .returns(string_sig.clone())
        .param("arg0", object_sig.clone())
        .build(compilation, &string)?;
    MethodBuilder::new("Concat")
        .with_flags(STATIC)
        .returns(string_sig.clone())
        .param("arg0", object_sig.clone())
        .param("arg1", object_sig.clone())
        .build(compilation, &string)?;

    lib.class("System", "Enum")
        .with_flags(TypeModifiers::ABSTRACT)
        .extends(TypeSig::named(
            compilation
                .corlib_type("System.ValueType")
                .map_or(object.token, |ty| ty.token),
        ))
        .build(compilation)?;
    lib.class("System", "Array")
        .with_flags(TypeModifiers::ABSTRACT)
        .build(compilation)?;
    let delegate = lib
        .class("System", "Delegate")
        .with_flags(TypeModifiers::ABSTRACT)
        .build(compilation)?;
    lib.class("System", "MulticastDelegate")
        .with_flags(TypeModifiers::ABSTRACT)
        .extends(TypeSig::named(delegate.token))
        .build(compilation)?;
    let attribute = lib
        .class("System", "Attribute")
        .with_flags(TypeModifiers::ABSTRACT)
        .build(compilation)?;

    let nullable = TypeBuilder::value_type("System", "Nullable")
        .with_assembly(lib.assembly)
        .with_type_params(&["T"])
        .build(compilation)?;
    let t = TypeSig::param(nullable.token, 0);
    MethodBuilder::constructor()
        .param("value", t.clone())
        .build(compilation, &nullable)?;
    MethodBuilder::new("GetValueOrDefault")
        .returns(t.clone())
        .build(compilation, &nullable)?;
    MethodBuilder::new("GetValueOrDefault")
        .returns(t.clone())
        .param("defaultValue", t.clone())
        .build(compilation, &nullable)?;
    PropertyBuilder::new("HasValue", boolean.clone())
        .get()
        .build(compilation, &nullable)?;
    PropertyBuilder::new("Value", t).get().build(compilation, &nullable)?;

    let disposable = lib.interface("System", "IDisposable").build(compilation)?;
    MethodBuilder::new("Dispose")
        .with_flags(INTERFACE_MEMBER)
        .build(compilation, &disposable)?;

    let enumerator = lib
        .interface("System.Collections", "IEnumerator")
        .build(compilation)?;
    MethodBuilder::new("MoveNext")
        .with_flags(INTERFACE_MEMBER)
        .returns(boolean.clone())
        .build(compilation, &enumerator)?;
    PropertyBuilder::new("Current", object_sig.clone())
        .get()
        .with_flags(INTERFACE_MEMBER)
        .build(compilation, &enumerator)?;
    MethodBuilder::new("Reset")
        .with_flags(INTERFACE_MEMBER)
        .build(compilation, &enumerator)?;

    let enumerable = lib
        .interface("System.Collections", "IEnumerable")
        .build(compilation)?;
    MethodBuilder::new("GetEnumerator")
        .with_flags(INTERFACE_MEMBER)
        .returns(TypeSig::named(enumerator.token))
        .build(compilation, &enumerable)?;

    let enumerator_t = lib
        .interface("System.Collections.Generic", "IEnumerator")
        .with_type_params(&["T"])
        .implements(TypeSig::named(disposable.token))
        .implements(TypeSig::named(enumerator.token))
        .build(compilation)?;
    PropertyBuilder::new("Current", TypeSig::param(enumerator_t.token, 0))
        .get()
        .with_flags(INTERFACE_MEMBER)
        .build(compilation, &enumerator_t)?;

    let enumerable_t = lib
        .interface("System.Collections.Generic", "IEnumerable")
        .with_type_params(&["T"])
        .implements(TypeSig::named(enumerable.token))
        .build(compilation)?;
    MethodBuilder::new("GetEnumerator")
        .with_flags(INTERFACE_MEMBER)
        .returns(TypeSig::generic(
            enumerator_t.token,
            vec![TypeSig::param(enumerable_t.token, 0)],
        ))
        .build(compilation, &enumerable_t)?;

    let system_type = lib
        .class("System", "Type")
        .with_flags(TypeModifiers::ABSTRACT)
        .build(compilation)?;
    let type_sig = TypeSig::named(system_type.token);
    MethodBuilder::new("GetTypeFromHandle")
        .with_flags(STATIC)
        .returns(type_sig.clone())
        .param("handle", type_handle)
        .build(compilation, &system_type)?;

    let monitor = lib
        .class("System.Threading", "Monitor")
        .with_flags(TypeModifiers::STATIC)
        .build(compilation)?;
    MethodBuilder::new("Enter")
        .with_flags(STATIC)
        .param("obj", object_sig.clone())
        .build(compilation, &monitor)?;
    MethodBuilder::new("Enter")
        .with_flags(STATIC)
        .param("obj", object_sig.clone())
        .parameter(SignatureParameter::new("lockTaken", boolean).with_ref_kind(RefKind::Ref))
        .build(compilation, &monitor)?;
    MethodBuilder::new("Exit")
        .with_flags(STATIC)
        .param("obj", object_sig)
        .build(compilation, &monitor)?;

    for (namespace, name) in [
        ("System.Diagnostics", "DebuggerHiddenAttribute"),
        ("System.Diagnostics", "DebuggerStepThroughAttribute"),
        ("System.Runtime.CompilerServices", "CompilerGeneratedAttribute"),
        ("System.Runtime.InteropServices", "InAttribute"),
        ("System.Runtime.CompilerServices", "RequiresLocationAttribute"),
    ] {
        let ty = lib.attribute(namespace, name, &attribute)?;
        lib.ctor(&ty)?;
    }
    let iterator_attribute = lib.attribute(
        "System.Runtime.CompilerServices",
        "IteratorStateMachineAttribute",
        &attribute,
    )?;
    MethodBuilder::constructor()
        .param("stateMachineType", type_sig)
        .build(compilation, &iterator_attribute)?;
    let tuple_names = lib.attribute(
        "System.Runtime.CompilerServices",
        "TupleElementNamesAttribute",
        &attribute,
    )?;
    MethodBuilder::constructor()
        .param("transformNames", TypeSig::array(string_sig))
        .build(compilation, &tuple_names)?;

    lib.class("System.Runtime.CompilerServices", "IsExternalInit")
        .with_flags(TypeModifiers::STATIC)
        .build(compilation)?;

    let task = lib.class("System.Threading.Tasks", "Task").build(compilation)?;
    lib.class("System.Threading.Tasks", "Task")
        .with_type_params(&["TResult"])
        .extends(TypeSig::named(task.token))
        .build(compilation)?;

    tracing::debug!(
        types = compilation.registry().len(),
        members = compilation.registry().member_count(),
        "registered minimal core library"
    );
    Ok(assembly)
}
