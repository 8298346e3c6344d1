//! The compilation context.
//!
//! A [`Compilation`] owns one symbol graph: the source assembly being compiled, the assemblies
//! it references, and the [`TypeRegistry`] holding every type and member of all of them. All
//! resolution entry points take the compilation explicitly, and every cache (special types,
//! well-known types, framework members, override results) lives either in the compilation or
//! in members it owns. Two compilations never share resolved state, even when they were
//! loaded from the same references.
//!
//! # Type Lookup
//!
//! Three lookups by metadata name exist and intentionally disagree in edge cases:
//!
//! - [`Compilation::get_type_by_metadata_name`]: the source assembly wins; otherwise the name
//!   must resolve to exactly one accessible candidate, else `None`.
//! - [`Compilation::get_well_known_type`]: only public candidates count; ties are broken in
//!   favour of the core library.
//! - [`Compilation::get_special_type`]: only the core library is searched and the type must
//!   be unique and public.
//!
//! The special and well-known lookups never return `None`; failure is an error type that
//! still carries the requested id.

use std::sync::Arc;

use crossbeam_skiplist::SkipMap;
use dashmap::{DashMap, DashSet};

use crate::{
    symbols::{
        members::{Accessibility, Member, MemberHandle},
        overrides::{OverriddenOrHiddenMembers, OverrideResolver},
        token::{SymbolTable, Token},
        typesystem::{NamedType, NamedTypeRc, TypeKind, TypeRegistry, TypeSig},
        validation::AnalysisOptions,
        wellknown::{
            self, MemberId, SpecialMember, SpecialType, TypeId, WellKnownMember, WellKnownType,
        },
    },
    Error::{AssemblyNotFound, DuplicateName},
    Result,
};

/// One assembly taking part in a compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// Assembly token
    pub token: Token,
    /// Simple assembly name
    pub name: String,
    /// The assembly defining `System.Object`
    pub is_corlib: bool,
    /// Names of assemblies granted access to this assembly's internal members
    pub internals_visible_to: Vec<String>,
}

impl Assembly {
    /// Returns `true` if `other` may see this assembly's internal members.
    #[must_use]
    pub fn grants_internals_to(&self, other: &Assembly) -> bool {
        self.token == other.token || self.internals_visible_to.contains(&other.name)
    }
}

/// Why a special or well-known type could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    /// No acceptable candidate exists
    Missing,
    /// More than one acceptable candidate exists
    Ambiguous,
}

/// Placeholder for a special or well-known type that did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorType {
    /// The requested type
    pub id: TypeId,
    /// Why it did not resolve
    pub reason: LookupFailure,
}

/// Outcome of a special or well-known type lookup.
#[derive(Debug, Clone)]
pub enum TypeLookup {
    /// The type resolved
    Found(NamedTypeRc),
    /// The type did not resolve; the requested id is kept
    Error(ErrorType),
}

impl TypeLookup {
    /// The resolved type, if any.
    #[must_use]
    pub fn found(&self) -> Option<&NamedTypeRc> {
        match self {
            TypeLookup::Found(ty) => Some(ty),
            TypeLookup::Error(_) => None,
        }
    }

    /// Returns `true` if the lookup failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, TypeLookup::Error(_))
    }

    /// Kind of the resolved type, [`TypeKind::Error`] on failure.
    #[must_use]
    pub fn type_kind(&self) -> TypeKind {
        match self {
            TypeLookup::Found(ty) => ty.kind,
            TypeLookup::Error(_) => TypeKind::Error,
        }
    }

    /// The special type this lookup was for, also on failure.
    #[must_use]
    pub fn special_type(&self) -> Option<SpecialType> {
        let id = match self {
            TypeLookup::Found(_) => return None,
            TypeLookup::Error(error) => error.id,
        };
        match id {
            TypeId::Special(special) => Some(special),
            TypeId::WellKnown(_) => None,
        }
    }

    /// Token of the resolved type.
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.found().map(|ty| ty.token)
    }
}

/// One symbol graph under analysis.
pub struct Compilation {
    name: String,
    options: AnalysisOptions,
    registry: TypeRegistry,
    assemblies: SkipMap<Token, Arc<Assembly>>,
    source_assembly: Arc<Assembly>,
    special_types: DashMap<SpecialType, TypeLookup>,
    well_known_types: DashMap<WellKnownType, TypeLookup>,
    framework_members: DashMap<MemberId, Option<MemberHandle>>,
    missing_members: DashSet<MemberId>,
    missing_types: DashSet<TypeId>,
}

impl Compilation {
    /// Create a compilation with default [`AnalysisOptions`].
    ///
    /// ## Arguments
    /// * `name` - Name of the source assembly
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::with_options(name, AnalysisOptions::default())
    }

    /// Create a compilation with explicit options.
    ///
    /// ## Arguments
    /// * `name` - Name of the source assembly
    /// * `options` - Analysis options
    #[must_use]
    pub fn with_options(name: &str, options: AnalysisOptions) -> Self {
        let registry = TypeRegistry::new();
        let source_assembly = Arc::new(Assembly {
            token: TypeRegistry::source_assembly_token(),
            name: name.to_string(),
            is_corlib: false,
            internals_visible_to: Vec::new(),
        });

        let assemblies = SkipMap::new();
        assemblies.insert(source_assembly.token, source_assembly.clone());

        Compilation {
            name: name.to_string(),
            options,
            registry,
            assemblies,
            source_assembly,
            special_types: DashMap::new(),
            well_known_types: DashMap::new(),
            framework_members: DashMap::new(),
            missing_members: DashSet::new(),
            missing_types: DashSet::new(),
        }
    }

    /// Name of the source assembly.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The analysis options.
    #[must_use]
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// The registry holding every type and member.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The assembly being compiled.
    #[must_use]
    pub fn source_assembly(&self) -> &Arc<Assembly> {
        &self.source_assembly
    }

    /// Register a referenced assembly.
    ///
    /// ## Arguments
    /// * `name` - Simple assembly name, unique within the compilation
    /// * `is_corlib` - Whether the assembly is the core library
    /// * `internals_visible_to` - Assemblies granted access to internal members
    ///
    /// # Errors
    /// Returns [`crate::Error::DuplicateName`] if an assembly of that name exists.
    pub fn add_reference(
        &self,
        name: &str,
        is_corlib: bool,
        internals_visible_to: Vec<String>,
    ) -> Result<Arc<Assembly>> {
        if self.assemblies.iter().any(|entry| entry.value().name == name) {
            return Err(DuplicateName(name.to_string()));
        }

        let assembly = Arc::new(Assembly {
            token: self.registry.next_token(SymbolTable::Assembly)?,
            name: name.to_string(),
            is_corlib,
            internals_visible_to,
        });
        self.assemblies.insert(assembly.token, assembly.clone());
        Ok(assembly)
    }

    /// Look up an assembly by token.
    ///
    /// # Errors
    /// Returns [`crate::Error::AssemblyNotFound`] for unknown tokens.
    pub fn get_assembly(&self, token: Token) -> Result<Arc<Assembly>> {
        self.assemblies
            .get(&token)
            .map(|entry| entry.value().clone())
            .ok_or(AssemblyNotFound(token))
    }

    /// All assemblies, source assembly first.
    #[must_use]
    pub fn assemblies(&self) -> Vec<Arc<Assembly>> {
        self.assemblies
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Returns `true` if `ty` is declared by the source assembly.
    #[must_use]
    pub fn is_source(&self, ty: &NamedType) -> bool {
        ty.assembly == self.source_assembly.token
    }

    /// Types declared by the source assembly, in token order.
    #[must_use]
    pub fn source_types(&self) -> Vec<NamedTypeRc> {
        self.registry
            .all_types()
            .into_iter()
            .filter(|ty| self.is_source(ty))
            .collect()
    }

    /// Returns `true` if code in assembly `accessing` may use internal members of `declaring`.
    #[must_use]
    pub fn internals_visible(&self, declaring: Token, accessing: Token) -> bool {
        if declaring == accessing {
            return true;
        }
        match (self.get_assembly(declaring), self.get_assembly(accessing)) {
            (Ok(declaring), Ok(accessing)) => declaring.grants_internals_to(&accessing),
            _ => false,
        }
    }

    /// Returns `true` if `ty` may be named from code inside `from`.
    #[must_use]
    pub fn is_type_accessible(&self, ty: &NamedType, from: &NamedType) -> bool {
        match ty.accessibility {
            Accessibility::Public => true,
            Accessibility::Private => ty.token == from.token,
            _ => self.internals_visible(ty.assembly, from.assembly),
        }
    }

    /// Returns `true` if `member` may be used from code inside `from`.
    ///
    /// Protected access only checks that `from` derives from the declaring type.
    #[must_use]
    pub fn is_member_accessible(&self, member: &Member, from: &NamedType) -> bool {
        let Some(owner) = self.registry.get_type(member.owner) else {
            return false;
        };
        if !self.is_type_accessible(&owner, from) {
            return false;
        }
        if owner.token == from.token {
            return true;
        }

        let derives = || {
            self.registry
                .derives_from(from.token, owner.token, self.options.max_inheritance_depth)
        };
        let internal = || self.internals_visible(owner.assembly, from.assembly);

        match member.accessibility {
            Accessibility::Public => true,
            Accessibility::Private => false,
            Accessibility::Protected => derives(),
            Accessibility::Internal => internal(),
            Accessibility::ProtectedOrInternal => derives() || internal(),
            Accessibility::ProtectedAndInternal => derives() && internal(),
        }
    }

    /// Look up a type by metadata name, the way user code names it.
    ///
    /// A type declared in the source assembly always wins. Otherwise exactly one accessible
    /// candidate must exist across all references; ambiguity yields `None`.
    #[must_use]
    pub fn get_type_by_metadata_name(&self, name: &str) -> Option<NamedTypeRc> {
        let candidates = self.registry.types_by_metadata_name(name);
        if let Some(source) = candidates.iter().find(|ty| self.is_source(ty)) {
            return Some(source.clone());
        }

        let accessible: Vec<NamedTypeRc> = candidates
            .into_iter()
            .filter(|ty| {
                ty.accessibility == Accessibility::Public
                    || self.internals_visible(ty.assembly, self.source_assembly.token)
            })
            .collect();

        match accessible.as_slice() {
            [single] => Some(single.clone()),
            [] => None,
            _ => {
                tracing::debug!(name, candidates = accessible.len(), "ambiguous metadata name");
                None
            }
        }
    }

    /// Resolve a special type from the core library.
    #[must_use]
    pub fn get_special_type(&self, id: SpecialType) -> TypeLookup {
        if self.missing_types.contains(&TypeId::Special(id)) {
            return Self::error_type(id.into(), LookupFailure::Missing);
        }
        if let Some(cached) = self.special_types.get(&id) {
            return cached.value().clone();
        }

        let candidates: Vec<NamedTypeRc> = self
            .registry
            .types_by_metadata_name(id.metadata_name())
            .into_iter()
            .filter(|ty| {
                self.get_assembly(ty.assembly)
                    .is_ok_and(|assembly| assembly.is_corlib)
            })
            .collect();

        let lookup = match candidates.as_slice() {
            [single] if single.accessibility == Accessibility::Public => {
                TypeLookup::Found(single.clone())
            }
            [] | [_] => Self::error_type(id.into(), LookupFailure::Missing),
            _ => Self::error_type(id.into(), LookupFailure::Ambiguous),
        };
        if lookup.is_error() {
            tracing::debug!(?id, "special type did not resolve");
        }

        self.special_types.entry(id).or_insert(lookup).value().clone()
    }

    /// Resolve a well-known type across all assemblies.
    ///
    /// A source declaration wins. Otherwise only public candidates count: a single one
    /// resolves, and among several the one from the core library is chosen.
    #[must_use]
    pub fn get_well_known_type(&self, id: WellKnownType) -> TypeLookup {
        if self.missing_types.contains(&TypeId::WellKnown(id)) {
            return Self::error_type(id.into(), LookupFailure::Missing);
        }
        if let Some(cached) = self.well_known_types.get(&id) {
            return cached.value().clone();
        }

        let candidates = self.registry.types_by_metadata_name(id.metadata_name());
        let lookup = if let Some(source) = candidates.iter().find(|ty| self.is_source(ty)) {
            TypeLookup::Found(source.clone())
        } else {
            let public: Vec<&NamedTypeRc> = candidates
                .iter()
                .filter(|ty| ty.accessibility == Accessibility::Public)
                .collect();
            let from_corlib: Vec<&NamedTypeRc> = public
                .iter()
                .copied()
                .filter(|ty| {
                    self.get_assembly(ty.assembly)
                        .is_ok_and(|assembly| assembly.is_corlib)
                })
                .collect();

            match (public.as_slice(), from_corlib.as_slice()) {
                ([single], _) | (_, [single]) => TypeLookup::Found((*single).clone()),
                ([], _) => Self::error_type(id.into(), LookupFailure::Missing),
                _ => Self::error_type(id.into(), LookupFailure::Ambiguous),
            }
        };
        if lookup.is_error() {
            tracing::debug!(?id, "well-known type did not resolve");
        }

        self.well_known_types.entry(id).or_insert(lookup).value().clone()
    }

    /// Resolve a special or well-known type.
    #[must_use]
    pub fn get_type(&self, id: TypeId) -> TypeLookup {
        match id {
            TypeId::Special(id) => self.get_special_type(id),
            TypeId::WellKnown(id) => self.get_well_known_type(id),
        }
    }

    /// Resolve a special member; `None` if it is absent.
    #[must_use]
    pub fn get_special_member(&self, id: SpecialMember) -> Option<MemberHandle> {
        self.get_member(id.into())
    }

    /// Resolve a well-known member; `None` if it is absent.
    #[must_use]
    pub fn get_well_known_member(&self, id: WellKnownMember) -> Option<MemberHandle> {
        self.get_member(id.into())
    }

    /// Resolve a special or well-known member; `None` if it is absent.
    #[must_use]
    pub fn get_member(&self, id: MemberId) -> Option<MemberHandle> {
        if self.missing_members.contains(&id) {
            return None;
        }
        if let Some(cached) = self.framework_members.get(&id) {
            return cached.value().clone();
        }

        let resolved = wellknown::resolve_member(self, id);
        self.framework_members
            .entry(id)
            .or_insert(resolved)
            .value()
            .clone()
    }

    /// Make `id` resolve as absent in this compilation.
    pub fn make_member_missing(&self, id: impl Into<MemberId>) {
        self.missing_members.insert(id.into());
    }

    /// Make `id` resolve as absent in this compilation, together with all its members.
    pub fn make_type_missing(&self, id: impl Into<TypeId>) {
        self.missing_types.insert(id.into());
        self.framework_members.clear();
    }

    /// Returns `true` if `id` was made missing through [`Compilation::make_member_missing`].
    #[must_use]
    pub fn is_member_made_missing(&self, id: MemberId) -> bool {
        self.missing_members.contains(&id)
    }

    /// What `member` overrides and hides. Computed once per member, then shared.
    ///
    /// # Errors
    /// See [`OverrideResolver::resolve`].
    pub fn overridden_or_hidden(
        &self,
        member: &MemberHandle,
    ) -> Result<Arc<OverriddenOrHiddenMembers>> {
        OverrideResolver::new(self).resolve(member)
    }

    /// The originally declared virtual slot of `member`, constructed like `member`.
    ///
    /// # Errors
    /// See [`OverrideResolver::constructed_least_overridden_method`].
    pub fn constructed_least_overridden_method(
        &self,
        member: &MemberHandle,
        accessing_type: &NamedTypeRc,
        require_same_return_type: bool,
    ) -> Result<MemberHandle> {
        OverrideResolver::new(self).constructed_least_overridden_method(
            member,
            accessing_type,
            require_same_return_type,
        )
    }

    /// `ty` used with its own parameters, or with `args` when given.
    #[must_use]
    pub fn type_sig(ty: &NamedType, args: Vec<TypeSig>) -> TypeSig {
        if args.is_empty() {
            ty.self_sig()
        } else {
            TypeSig::generic(ty.token, args)
        }
    }

    /// A type declared by a core library assembly, bypassing the special type caches.
    pub(crate) fn corlib_type(&self, name: &str) -> Option<NamedTypeRc> {
        self.registry
            .types_by_metadata_name(name)
            .into_iter()
            .find(|ty| {
                self.get_assembly(ty.assembly)
                    .is_ok_and(|assembly| assembly.is_corlib)
            })
    }

    fn error_type(id: TypeId, reason: LookupFailure) -> TypeLookup {
        TypeLookup::Error(ErrorType { id, reason })
    }
}

impl std::fmt::Debug for Compilation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compilation")
            .field("name", &self.name)
            .field("assemblies", &self.assemblies.len())
            .field("types", &self.registry.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::builders::{minimal_corlib, TypeBuilder};

    #[test]
    fn test_source_type_wins_metadata_lookup() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;
        let local = TypeBuilder::class("System", "Type").build(&compilation)?;

        let found = compilation.get_type_by_metadata_name("System.Type");
        assert_eq!(found.map(|ty| ty.token), Some(local.token));
        Ok(())
    }

    #[test]
    fn test_internal_types_need_internals_visible_to() -> Result<()> {
        let compilation = Compilation::new("App");
        let hidden = compilation.add_reference("Hidden", false, Vec::new())?;
        let friendly = compilation.add_reference("Friendly", false, vec!["App".into()])?;

        TypeBuilder::class("Lib", "Secret")
            .with_accessibility(Accessibility::Internal)
            .with_assembly(hidden.token)
            .build(&compilation)?;
        assert!(compilation.get_type_by_metadata_name("Lib.Secret").is_none());

        TypeBuilder::class("Lib", "Shared")
            .with_accessibility(Accessibility::Internal)
            .with_assembly(friendly.token)
            .build(&compilation)?;
        assert!(compilation.get_type_by_metadata_name("Lib.Shared").is_some());
        Ok(())
    }

    #[test]
    fn test_special_type_requires_corlib() -> Result<()> {
        let compilation = Compilation::new("App");
        let other = compilation.add_reference("Other", false, Vec::new())?;
        TypeBuilder::class("System", "Object")
            .with_assembly(other.token)
            .build(&compilation)?;

        let lookup = compilation.get_special_type(SpecialType::Object);
        assert!(lookup.is_error());
        assert_eq!(lookup.type_kind(), TypeKind::Error);
        assert_eq!(lookup.special_type(), Some(SpecialType::Object));

        // The ordinary lookup still finds it.
        assert!(compilation.get_type_by_metadata_name("System.Object").is_some());
        Ok(())
    }

    #[test]
    fn test_make_type_missing() -> Result<()> {
        let compilation = Compilation::new("App");
        minimal_corlib(&compilation)?;
        assert!(!compilation.get_special_type(SpecialType::IDisposable).is_error());

        compilation.make_type_missing(SpecialType::IDisposable);
        assert!(compilation.get_special_type(SpecialType::IDisposable).is_error());
        assert!(compilation
            .get_special_member(SpecialMember::IDisposableDispose)
            .is_none());
        Ok(())
    }

    #[test]
    fn test_duplicate_reference_names() -> Result<()> {
        let compilation = Compilation::new("App");
        compilation.add_reference("Lib", false, Vec::new())?;
        assert!(matches!(
            compilation.add_reference("Lib", false, Vec::new()),
            Err(crate::Error::DuplicateName(_))
        ));
        assert!(matches!(
            compilation.add_reference("App", false, Vec::new()),
            Err(crate::Error::DuplicateName(_))
        ));
        Ok(())
    }
}
