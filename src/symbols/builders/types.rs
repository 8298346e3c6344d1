//! Builders for assemblies and named types.

use std::sync::Arc;

use crate::{
    symbols::{
        compilation::{Assembly, Compilation},
        diagnostics::Span,
        members::Accessibility,
        token::{SymbolTable, Token},
        typesystem::{GenericParamDef, NamedType, NamedTypeRc, TypeKind, TypeModifiers, TypeSig, Variance},
    },
    Result,
};

type DeferredSig = Box<dyn FnOnce(Token) -> TypeSig>;

/// Provides a fluent API for registering a referenced assembly
pub struct AssemblyBuilder {
    name: String,
    is_corlib: bool,
    internals_visible_to: Vec<String>,
}

impl AssemblyBuilder {
    /// Start building an assembly with the given name
    #[must_use]
    pub fn new(name: &str) -> Self {
        AssemblyBuilder {
            name: name.to_string(),
            is_corlib: false,
            internals_visible_to: Vec::new(),
        }
    }

    /// Mark the assembly as the core library
    #[must_use]
    pub fn corlib(mut self) -> Self {
        self.is_corlib = true;
        self
    }

    /// Grant `friend` access to internal members
    ///
    /// ## Arguments
    /// * 'friend' - Simple name of the friend assembly
    #[must_use]
    pub fn internals_visible_to(mut self, friend: &str) -> Self {
        self.internals_visible_to.push(friend.to_string());
        self
    }

    /// Register the assembly with `compilation`
    ///
    /// # Errors
    /// Returns [`crate::Error::DuplicateName`] if the name is taken.
    pub fn build(self, compilation: &Compilation) -> Result<Arc<Assembly>> {
        compilation.add_reference(&self.name, self.is_corlib, self.internals_visible_to)
    }
}

/// Provides a fluent API for registering named types
///
/// Classes without an explicit base derive from `System.Object`, structs from
/// `System.ValueType`, enums from `System.Enum` and delegates from
/// `System.MulticastDelegate`, provided the core library declares them.
pub struct TypeBuilder {
    namespace: String,
    name: String,
    kind: TypeKind,
    accessibility: Accessibility,
    flags: TypeModifiers,
    type_params: Vec<(String, Variance)>,
    assembly: Option<Token>,
    base: Option<DeferredSig>,
    no_base: bool,
    interfaces: Vec<DeferredSig>,
    span: Span,
}

impl TypeBuilder {
    fn new(namespace: &str, name: &str, kind: TypeKind) -> Self {
        TypeBuilder {
            namespace: namespace.to_string(),
            name: name.to_string(),
            kind,
            accessibility: Accessibility::Public,
            flags: TypeModifiers::empty(),
            type_params: Vec::new(),
            assembly: None,
            base: None,
            no_base: false,
            interfaces: Vec::new(),
            span: Span::default(),
        }
    }

    /// Start building a class with the given name
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace for a class type
    /// * 'name'      - Name for a class type
    #[must_use]
    pub fn class(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, TypeKind::Class)
    }

    /// Start building an interface with the given name
    #[must_use]
    pub fn interface(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, TypeKind::Interface)
    }

    /// Start building a value type with the given name
    #[must_use]
    pub fn value_type(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, TypeKind::Struct)
    }

    /// Start building a delegate with the given name
    #[must_use]
    pub fn delegate(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, TypeKind::Delegate)
    }

    /// Set the declared accessibility (default: public)
    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Add declaration modifiers
    #[must_use]
    pub fn with_flags(mut self, flags: TypeModifiers) -> Self {
        self.flags |= flags;
        self
    }

    /// Declare generic parameters, in order
    #[must_use]
    pub fn with_type_params(mut self, names: &[&str]) -> Self {
        self.type_params
            .extend(names.iter().map(|name| (name.to_string(), Variance::Invariant)));
        self
    }

    /// Declare one generic parameter with a variance annotation
    #[must_use]
    pub fn with_variant_param(mut self, name: &str, variance: Variance) -> Self {
        self.type_params.push((name.to_string(), variance));
        self
    }

    /// Declare the type in `assembly` instead of the source assembly
    #[must_use]
    pub fn with_assembly(mut self, assembly: Token) -> Self {
        self.assembly = Some(assembly);
        self
    }

    /// Set the source location
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Set the base type
    #[must_use]
    pub fn extends(self, base: TypeSig) -> Self {
        self.extends_with(move |_| base)
    }

    /// Set a base type that refers to the type being built, e.g. `D : B<D>`
    ///
    /// ## Arguments
    /// * 'base' - Receives the token of the new type
    #[must_use]
    pub fn extends_with<F>(mut self, base: F) -> Self
    where
        F: FnOnce(Token) -> TypeSig + 'static,
    {
        self.base = Some(Box::new(base));
        self
    }

    /// Do not derive from the default base type
    #[must_use]
    pub fn without_base(mut self) -> Self {
        self.no_base = true;
        self
    }

    /// Add an implemented interface (or base interface, for interfaces)
    #[must_use]
    pub fn implements(self, interface: TypeSig) -> Self {
        self.implements_with(move |_| interface)
    }

    /// Add an implemented interface that refers to the type being built
    #[must_use]
    pub fn implements_with<F>(mut self, interface: F) -> Self
    where
        F: FnOnce(Token) -> TypeSig + 'static,
    {
        self.interfaces.push(Box::new(interface));
        self
    }

    /// Register the type with `compilation`
    ///
    /// # Errors
    /// Returns an error if the declaring assembly is unknown or the type cannot be inserted.
    pub fn build(self, compilation: &Compilation) -> Result<NamedTypeRc> {
        let assembly = match self.assembly {
            Some(token) => compilation.get_assembly(token)?.token,
            None => compilation.source_assembly().token,
        };

        let registry = compilation.registry();
        let token = registry.next_token(SymbolTable::TypeDef)?;

        let mut ty = NamedType::new(
            token,
            self.namespace,
            self.name,
            self.kind,
            self.accessibility,
            assembly,
        );
        ty.flags = self.flags;
        ty.span = self.span;
        ty.type_params = self
            .type_params
            .into_iter()
            .enumerate()
            .map(|(ordinal, (name, variance))| GenericParamDef {
                name,
                ordinal: u16::try_from(ordinal).unwrap_or(u16::MAX),
                variance,
            })
            .collect();

        let base = match self.base {
            Some(base) => Some(base(token)),
            None if self.no_base => None,
            None => Self::default_base(compilation, &ty),
        };
        if let Some(base) = base {
            ty.set_base(base);
        }
        for interface in self.interfaces {
            ty.interfaces.push(interface(token));
        }

        let ty = Arc::new(ty);
        registry.insert_type(ty.clone())?;
        Ok(ty)
    }

    fn default_base(compilation: &Compilation, ty: &NamedType) -> Option<TypeSig> {
        let name = match ty.kind {
            TypeKind::Class if ty.metadata_name() == "System.Object" => return None,
            TypeKind::Class => "System.Object",
            TypeKind::Struct => "System.ValueType",
            TypeKind::Enum => "System.Enum",
            TypeKind::Delegate => "System.MulticastDelegate",
            TypeKind::Interface | TypeKind::Error => return None,
        };
        compilation
            .corlib_type(name)
            .map(|base| TypeSig::named(base.token))
    }
}
