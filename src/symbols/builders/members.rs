//! Builders for methods, properties, events and fields.
//!
//! Every builder registers its member with the registry of the given compilation and
//! appends it to the declaring type's member list, so the call order of `build` is the
//! declaration order the resolver sees.

use std::sync::Arc;

use crate::{
    symbols::{
        compilation::Compilation,
        diagnostics::Span,
        members::{
            AccessorKind, AccessorOf, Accessibility, Accessors, Member, MemberKind,
            MemberModifiers, MemberRc,
        },
        signatures::{CustomModifier, RefKind, Signature, SignatureParameter},
        token::{SymbolTable, Token},
        typesystem::{GenericParamDef, NamedTypeRc, Substitution, TypeSig, Variance},
        wellknown::WellKnownType,
    },
    Result,
};

/// Placeholder owner for method type parameters before the method has a token
const PENDING_METHOD: Token = Token::from_parts(SymbolTable::Method, 0);

fn generic_params(names: &[String]) -> Vec<GenericParamDef> {
    names
        .iter()
        .enumerate()
        .map(|(ordinal, name)| GenericParamDef {
            name: name.clone(),
            ordinal: u16::try_from(ordinal).unwrap_or(u16::MAX),
            variance: Variance::Invariant,
        })
        .collect()
}

/// Provides a fluent API for registering methods
///
/// Method type parameters are referenced through [`MethodBuilder::method_param`] while the
/// signature is being described; they are bound to the new method on `build`.
pub struct MethodBuilder {
    name: String,
    accessibility: Accessibility,
    flags: MemberModifiers,
    type_params: Vec<String>,
    signature: Signature,
    span: Span,
}

impl MethodBuilder {
    /// Start building a method returning `void`
    #[must_use]
    pub fn new(name: &str) -> Self {
        MethodBuilder {
            name: name.to_string(),
            accessibility: Accessibility::Public,
            flags: MemberModifiers::empty(),
            type_params: Vec::new(),
            signature: Signature::void(),
            span: Span::default(),
        }
    }

    /// Start building an instance constructor
    #[must_use]
    pub fn constructor() -> Self {
        Self::new(".ctor")
    }

    /// Type parameter `ordinal` of the method being built
    #[must_use]
    pub fn method_param(ordinal: u16) -> TypeSig {
        TypeSig::param(PENDING_METHOD, ordinal)
    }

    /// Set the return type
    #[must_use]
    pub fn returns(mut self, ty: TypeSig) -> Self {
        self.signature.ret.ty = ty;
        self
    }

    /// Return by reference (`ref` or `ref readonly`)
    #[must_use]
    pub fn returns_ref(mut self, ref_kind: RefKind) -> Self {
        self.signature.ret.ref_kind = ref_kind;
        self
    }

    /// Add a custom modifier to the return type
    #[must_use]
    pub fn with_return_modifier(mut self, modifier: CustomModifier) -> Self {
        self.signature.ret.modifiers.push(modifier);
        self
    }

    /// Add a by-value parameter
    #[must_use]
    pub fn param(self, name: &str, ty: TypeSig) -> Self {
        self.parameter(SignatureParameter::new(name, ty))
    }

    /// Add a fully described parameter
    #[must_use]
    pub fn parameter(mut self, parameter: SignatureParameter) -> Self {
        self.signature.params.push(parameter);
        self
    }

    /// Set the declared accessibility (default: public)
    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Add declaration modifiers
    #[must_use]
    pub fn with_flags(mut self, flags: MemberModifiers) -> Self {
        self.flags |= flags;
        self
    }

    /// Declare method type parameters, in order
    #[must_use]
    pub fn with_type_params(mut self, names: &[&str]) -> Self {
        self.type_params.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Set the source location
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Register the method as a member of `owner`
    ///
    /// # Errors
    /// Returns an error if `owner` is not registered with `compilation`.
    pub fn build(self, compilation: &Compilation, owner: &NamedTypeRc) -> Result<MemberRc> {
        let registry = compilation.registry();
        let token = registry.next_token(SymbolTable::Method)?;

        let mut signature = self.signature.substitute(
            &Substitution::new().with(
                PENDING_METHOD,
                TypeSig::identity_args(token, self.type_params.len()),
            ),
        );
        signature.generic_arity = u16::try_from(self.type_params.len()).unwrap_or(u16::MAX);

        let mut member = Member::new(token, self.name, MemberKind::Method, owner.token, signature);
        member.accessibility = self.accessibility;
        member.flags = self.flags;
        member.type_params = generic_params(&self.type_params);
        member.span = self.span;

        let member = Arc::new(member);
        registry.insert_member(member.clone())?;
        Ok(member)
    }
}

#[derive(Clone, Copy, Default)]
struct AccessorSpec {
    accessibility: Option<Accessibility>,
    flags: MemberModifiers,
}

/// Provides a fluent API for registering properties and indexers
///
/// Accessor methods are registered right after the property, named `get_P` / `set_P` and
/// inheriting the property's accessibility and modifiers unless overridden per accessor.
pub struct PropertyBuilder {
    name: String,
    ty: TypeSig,
    ref_kind: RefKind,
    accessibility: Accessibility,
    flags: MemberModifiers,
    indexer_params: Vec<SignatureParameter>,
    getter: Option<AccessorSpec>,
    setter: Option<(AccessorKind, AccessorSpec)>,
    span: Span,
}

impl PropertyBuilder {
    /// Start building a property of type `ty` without accessors
    #[must_use]
    pub fn new(name: &str, ty: TypeSig) -> Self {
        PropertyBuilder {
            name: name.to_string(),
            ty,
            ref_kind: RefKind::None,
            accessibility: Accessibility::Public,
            flags: MemberModifiers::empty(),
            indexer_params: Vec::new(),
            getter: None,
            setter: None,
            span: Span::default(),
        }
    }

    /// Start building an indexer (`this[...]`) of type `ty`
    #[must_use]
    pub fn indexer(ty: TypeSig) -> Self {
        Self::new("Item", ty)
    }

    /// Add a `get` accessor
    #[must_use]
    pub fn get(mut self) -> Self {
        self.getter = Some(AccessorSpec::default());
        self
    }

    /// Add a `set` accessor
    #[must_use]
    pub fn set(mut self) -> Self {
        self.setter = Some((AccessorKind::Set, AccessorSpec::default()));
        self
    }

    /// Add an `init` accessor
    #[must_use]
    pub fn init(mut self) -> Self {
        self.setter = Some((AccessorKind::Init, AccessorSpec::default()));
        self
    }

    /// Give the accessor `kind` its own accessibility
    ///
    /// The accessor is added if it is not there yet.
    #[must_use]
    pub fn with_accessor_accessibility(mut self, kind: AccessorKind, accessibility: Accessibility) -> Self {
        self.accessor_spec(kind).accessibility = Some(accessibility);
        self
    }

    /// Add modifiers to the accessor `kind` only
    #[must_use]
    pub fn with_accessor_flags(mut self, kind: AccessorKind, flags: MemberModifiers) -> Self {
        self.accessor_spec(kind).flags |= flags;
        self
    }

    fn accessor_spec(&mut self, kind: AccessorKind) -> &mut AccessorSpec {
        match kind {
            AccessorKind::Get | AccessorKind::Add => {
                self.getter.get_or_insert_with(AccessorSpec::default)
            }
            AccessorKind::Set | AccessorKind::Init | AccessorKind::Remove => {
                let spec = match self.setter.take() {
                    Some((existing, spec)) if existing == kind => spec,
                    _ => AccessorSpec::default(),
                };
                &mut self.setter.insert((kind, spec)).1
            }
        }
    }

    /// Return by reference
    #[must_use]
    pub fn returns_ref(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    /// Add an indexer parameter
    #[must_use]
    pub fn param(mut self, name: &str, ty: TypeSig) -> Self {
        self.indexer_params.push(SignatureParameter::new(name, ty));
        self
    }

    /// Set the declared accessibility (default: public)
    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Add declaration modifiers, which also apply to the accessors
    #[must_use]
    pub fn with_flags(mut self, flags: MemberModifiers) -> Self {
        self.flags |= flags;
        self
    }

    /// Set the source location
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Register the property and its accessors as members of `owner`
    ///
    /// # Errors
    /// Returns an error if `owner` is not registered with `compilation`.
    pub fn build(self, compilation: &Compilation, owner: &NamedTypeRc) -> Result<MemberRc> {
        let registry = compilation.registry();
        let token = registry.next_token(SymbolTable::Property)?;
        let getter = match self.getter {
            Some(spec) => Some((AccessorKind::Get, spec, registry.next_token(SymbolTable::Method)?)),
            None => None,
        };
        let setter = match self.setter {
            Some((kind, spec)) => Some((kind, spec, registry.next_token(SymbolTable::Method)?)),
            None => None,
        };

        let is_indexer = !self.indexer_params.is_empty();
        let mut signature = Signature::new(self.ty.clone(), self.indexer_params.clone());
        signature.ret.ref_kind = self.ref_kind;

        let mut property = Member::new(token, self.name.clone(), MemberKind::Property, owner.token, signature);
        property.accessibility = self.accessibility;
        property.flags = self.flags;
        property.is_indexer = is_indexer;
        property.span = self.span;
        property.accessors = Accessors {
            first: getter.map(|(_, _, token)| token),
            second: setter.map(|(_, _, token)| token),
        };

        let property = Arc::new(property);
        registry.insert_member(property.clone())?;

        for (kind, spec, accessor_token) in getter.into_iter().chain(setter) {
            let signature = match kind {
                AccessorKind::Get => {
                    let mut signature = Signature::new(self.ty.clone(), self.indexer_params.clone());
                    signature.ret.ref_kind = self.ref_kind;
                    signature
                }
                _ => {
                    let mut params = self.indexer_params.clone();
                    params.push(SignatureParameter::new("value", self.ty.clone()));
                    let mut signature = Signature::new(TypeSig::Void, params);
                    if kind == AccessorKind::Init {
                        if let Some(marker) = is_external_init(compilation) {
                            signature.ret.modifiers.push(CustomModifier {
                                required: true,
                                modifier: marker,
                            });
                        }
                    }
                    signature
                }
            };
            let accessor = accessor_member(
                accessor_token,
                &self.name,
                kind,
                &property,
                spec,
                signature,
            );
            registry.insert_member(Arc::new(accessor))?;
        }

        Ok(property)
    }
}

/// The modreq marker of `init` accessors, without caching the lookup
fn is_external_init(compilation: &Compilation) -> Option<Token> {
    compilation
        .registry()
        .types_by_metadata_name(WellKnownType::IsExternalInit.metadata_name())
        .first()
        .map(|ty| ty.token)
}

fn accessor_member(
    token: Token,
    name: &str,
    kind: AccessorKind,
    owner: &Member,
    spec: AccessorSpec,
    signature: Signature,
) -> Member {
    let mut accessor = Member::new(
        token,
        format!("{}{}", kind.prefix(), name),
        MemberKind::Method,
        owner.owner,
        signature,
    );
    accessor.accessibility = spec.accessibility.unwrap_or(owner.accessibility);
    accessor.flags = owner.flags | spec.flags;
    accessor.accessor_of = Some(AccessorOf {
        owner: owner.token,
        kind,
    });
    accessor.span = owner.span;
    accessor
}

/// Provides a fluent API for registering events
pub struct EventBuilder {
    name: String,
    ty: TypeSig,
    accessibility: Accessibility,
    flags: MemberModifiers,
    add: bool,
    remove: bool,
    span: Span,
}

impl EventBuilder {
    /// Start building a field-like event with both accessors
    #[must_use]
    pub fn new(name: &str, ty: TypeSig) -> Self {
        EventBuilder {
            name: name.to_string(),
            ty,
            accessibility: Accessibility::Public,
            flags: MemberModifiers::empty(),
            add: true,
            remove: true,
            span: Span::default(),
        }
    }

    /// Choose which accessors exist
    #[must_use]
    pub fn with_accessors(mut self, add: bool, remove: bool) -> Self {
        self.add = add;
        self.remove = remove;
        self
    }

    /// Set the declared accessibility (default: public)
    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Add declaration modifiers, which also apply to the accessors
    #[must_use]
    pub fn with_flags(mut self, flags: MemberModifiers) -> Self {
        self.flags |= flags;
        self
    }

    /// Set the source location
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Register the event and its accessors as members of `owner`
    ///
    /// # Errors
    /// Returns an error if `owner` is not registered with `compilation`.
    pub fn build(self, compilation: &Compilation, owner: &NamedTypeRc) -> Result<MemberRc> {
        let registry = compilation.registry();
        let token = registry.next_token(SymbolTable::Event)?;
        let add = self
            .add
            .then(|| registry.next_token(SymbolTable::Method))
            .transpose()?
            .map(|token| (AccessorKind::Add, token));
        let remove = self
            .remove
            .then(|| registry.next_token(SymbolTable::Method))
            .transpose()?
            .map(|token| (AccessorKind::Remove, token));

        let mut event = Member::new(
            token,
            self.name.clone(),
            MemberKind::Event,
            owner.token,
            Signature::new(self.ty.clone(), Vec::new()),
        );
        event.accessibility = self.accessibility;
        event.flags = self.flags;
        event.span = self.span;
        event.accessors = Accessors {
            first: add.map(|(_, token)| token),
            second: remove.map(|(_, token)| token),
        };

        let event = Arc::new(event);
        registry.insert_member(event.clone())?;

        for (kind, accessor_token) in add.into_iter().chain(remove) {
            let signature = Signature::new(
                TypeSig::Void,
                vec![SignatureParameter::new("value", self.ty.clone())],
            );
            let accessor = accessor_member(
                accessor_token,
                &self.name,
                kind,
                &event,
                AccessorSpec::default(),
                signature,
            );
            registry.insert_member(Arc::new(accessor))?;
        }

        Ok(event)
    }
}

/// Provides a fluent API for registering fields
pub struct FieldBuilder {
    name: String,
    ty: TypeSig,
    accessibility: Accessibility,
    flags: MemberModifiers,
    span: Span,
}

impl FieldBuilder {
    /// Start building a field of type `ty`
    #[must_use]
    pub fn new(name: &str, ty: TypeSig) -> Self {
        FieldBuilder {
            name: name.to_string(),
            ty,
            accessibility: Accessibility::Public,
            flags: MemberModifiers::empty(),
            span: Span::default(),
        }
    }

    /// Set the declared accessibility (default: public)
    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Add declaration modifiers
    #[must_use]
    pub fn with_flags(mut self, flags: MemberModifiers) -> Self {
        self.flags |= flags;
        self
    }

    /// Set the source location
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Register the field as a member of `owner`
    ///
    /// # Errors
    /// Returns an error if `owner` is not registered with `compilation`.
    pub fn build(self, compilation: &Compilation, owner: &NamedTypeRc) -> Result<MemberRc> {
        let registry = compilation.registry();
        let mut field = Member::new(
            registry.next_token(SymbolTable::Field)?,
            self.name,
            MemberKind::Field,
            owner.token,
            Signature::new(self.ty, Vec::new()),
        );
        field.accessibility = self.accessibility;
        field.flags = self.flags;
        field.span = self.span;

        let field = Arc::new(field);
        registry.insert_member(field.clone())?;
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::builders::{minimal_corlib, TypeBuilder};

    #[test]
    fn test_generic_method_binds_its_parameters() -> Result<()> {
        let compilation = Compilation::new("App");
        let ty = TypeBuilder::class("", "C").build(&compilation)?;
        let method = MethodBuilder::new("M")
            .with_type_params(&["U"])
            .returns(MethodBuilder::method_param(0))
            .param("u", MethodBuilder::method_param(0))
            .build(&compilation, &ty)?;

        assert_eq!(method.generic_arity(), 1);
        assert_eq!(method.signature.generic_arity, 1);
        assert_eq!(method.signature.ret.ty, TypeSig::param(method.token, 0));
        assert_eq!(method.signature.params[0].ty, TypeSig::param(method.token, 0));
        Ok(())
    }

    #[test]
    fn test_property_registers_accessors() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;
        let int = compilation
            .get_type_by_metadata_name("System.Int32")
            .map(|ty| TypeSig::named(ty.token))
            .expect("Int32");
        let ty = TypeBuilder::class("", "C").build(&compilation)?;
        let property = PropertyBuilder::new("P", int.clone())
            .get()
            .init()
            .with_accessor_accessibility(AccessorKind::Init, Accessibility::Protected)
            .with_flags(MemberModifiers::VIRTUAL)
            .build(&compilation, &ty)?;

        let registry = compilation.registry();
        let getter = registry.get_member_required(property.accessors.first.expect("get"))?;
        assert_eq!(getter.name, "get_P");
        assert_eq!(getter.signature.ret.ty, int);
        assert!(getter.is_in_virtual_chain());
        assert_eq!(getter.accessibility, Accessibility::Public);

        let init = registry.get_member_required(property.accessors.second.expect("init"))?;
        assert_eq!(init.name, "set_P");
        assert_eq!(init.accessor_kind(), Some(AccessorKind::Init));
        assert_eq!(init.accessibility, Accessibility::Protected);
        assert_eq!(init.signature.ret.modifiers.len(), 1);
        assert_eq!(init.signature.params.len(), 1);

        assert_eq!(registry.members_of(&ty).len(), 3);
        Ok(())
    }

    #[test]
    fn test_event_and_field() -> Result<()> {
        let compilation = Compilation::new("App");
        let ty = TypeBuilder::class("", "C").build(&compilation)?;
        let handler = TypeBuilder::delegate("", "Handler").build(&compilation)?;

        let event = EventBuilder::new("Changed", TypeSig::named(handler.token))
            .with_accessors(true, false)
            .build(&compilation, &ty)?;
        assert!(event.accessors.first.is_some());
        assert!(event.accessors.second.is_none());

        let field = FieldBuilder::new("count", TypeSig::named(handler.token))
            .with_accessibility(Accessibility::Private)
            .build(&compilation, &ty)?;
        assert_eq!(field.kind, MemberKind::Field);
        assert_eq!(compilation.registry().members_of(&ty).len(), 3);
        Ok(())
    }
}
