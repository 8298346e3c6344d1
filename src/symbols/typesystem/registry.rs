//! Central registry of named types and members.
//!
//! The `TypeRegistry` is the arena the whole symbol graph lives in. Types and members are
//! stored by [`Token`] and reference each other only through tokens, which keeps the graph
//! acyclic at the ownership level and makes every walk an iterative lookup loop.
//!
//! # Key Components
//!
//! - [`TypeRegistry`] - Token-indexed storage for types and members
//! - Construction cache - deduplicates constructed members so equal constructions are the
//!   same object
//! - Graph walks - [`TypeRegistry::base_chain`] and [`TypeRegistry::all_interfaces`]
//!
//! # Registry Architecture
//!
//! - **Token-based lookup**: Primary storage in `SkipMap`s keyed by token
//! - **Name-based lookup**: Secondary index by metadata name (``System.Nullable`1``)
//! - **Construction cache**: `DashMap` keyed by `(definition, type args, method args)`
//!
//! # Thread Safety
//!
//! All storage uses lock-free (`SkipMap`, `boxcar::Vec`) or sharded (`DashMap`) structures,
//! and token allocation is a single atomic increment per table. Registration is expected to
//! finish before analysis starts, but neither phase needs external locking.
//!
//! # Examples
//!
//! ```rust
//! use symscope::Compilation;
//! use symscope::symbols::builders::{minimal_corlib, TypeBuilder};
//!
//! # fn main() -> symscope::Result<()> {
//! let compilation = Compilation::new("App");
//! minimal_corlib(&compilation)?;
//! let widget = TypeBuilder::class("Demo", "Widget").build(&compilation)?;
//!
//! let registry = compilation.registry();
//! assert_eq!(registry.types_by_metadata_name("Demo.Widget").len(), 1);
//! assert_eq!(registry.base_chain(&widget.self_sig(), 16)?.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use strum::EnumCount;

use crate::{
    symbols::{
        members::{ConstructedMember, MemberHandle, MemberRc},
        token::{SymbolTable, Token},
        typesystem::{NamedTypeRc, Substitution, TypeSig},
    },
    Error::{DepthLimitExceeded, GenericArityMismatch, InheritanceCycle, MemberNotFound, TypeNotFound},
    Result,
};

/// Largest row a 24-bit token can carry.
const MAX_ROW: u32 = 0x00FF_FFFF;

/// Assembly row reserved for the source assembly of the owning compilation.
const SOURCE_ASSEMBLY_ROW: u32 = 1;

type ConstructionKey = (Token, Vec<TypeSig>, Vec<TypeSig>);

/// Token-indexed storage for every type and member of a compilation.
pub struct TypeRegistry {
    /// Primary type storage
    types: SkipMap<Token, NamedTypeRc>,
    /// Primary member storage (methods, fields, properties, events)
    members: SkipMap<Token, MemberRc>,
    /// Next free row, one counter per [`SymbolTable`]
    next_row: [AtomicU32; SymbolTable::COUNT],
    /// Secondary index: types by metadata name
    types_by_metadata_name: DashMap<String, Vec<Token>>,
    /// Constructed members, deduplicated by definition and arguments
    constructed: DashMap<ConstructionKey, Arc<ConstructedMember>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        TypeRegistry {
            types: SkipMap::new(),
            members: SkipMap::new(),
            next_row: std::array::from_fn(|slot| {
                if slot == Self::table_slot(SymbolTable::Assembly) {
                    AtomicU32::new(SOURCE_ASSEMBLY_ROW + 1)
                } else {
                    AtomicU32::new(1)
                }
            }),
            types_by_metadata_name: DashMap::new(),
            constructed: DashMap::new(),
        }
    }

    fn table_slot(table: SymbolTable) -> usize {
        match table {
            SymbolTable::TypeDef => 0,
            SymbolTable::Field => 1,
            SymbolTable::Method => 2,
            SymbolTable::Event => 3,
            SymbolTable::Property => 4,
            SymbolTable::Assembly => 5,
        }
    }

    /// Allocate the next token of `table`.
    ///
    /// Tokens are handed out in increasing row order, so tokens of one table compare in
    /// allocation order.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] once every 24-bit row of `table` is taken.
    pub fn next_token(&self, table: SymbolTable) -> Result<Token> {
        let row = self.next_row[Self::table_slot(table)]
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |row| {
                (row <= MAX_ROW).then_some(row + 1)
            })
            .map_err(|_| malformed_error!("Table {:?} has no rows left", table))?;
        Ok(Token::from_parts(table, row))
    }

    /// The token of the source assembly, reserved by every registry.
    #[must_use]
    pub fn source_assembly_token() -> Token {
        Token::from_parts(SymbolTable::Assembly, SOURCE_ASSEMBLY_ROW)
    }

    /// Register a named type.
    ///
    /// ## Arguments
    /// * `ty` - The type to register; its token must come from [`TypeRegistry::next_token`]
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the token is not a type token or is already in use.
    pub fn insert_type(&self, ty: NamedTypeRc) -> Result<()> {
        if !ty.token.is_type() {
            return Err(malformed_error!("{} is not a type token", ty.token));
        }
        if self.types.contains_key(&ty.token) {
            return Err(malformed_error!("type token {} registered twice", ty.token));
        }

        self.types_by_metadata_name
            .entry(ty.metadata_name())
            .or_default()
            .push(ty.token);
        self.types.insert(ty.token, ty);
        Ok(())
    }

    /// Register a member and append it to its owner's declared members.
    ///
    /// ## Arguments
    /// * `member` - The member to register
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the owning type is not registered, and
    /// [`crate::Error::Malformed`] if the token is already in use.
    pub fn insert_member(&self, member: MemberRc) -> Result<()> {
        let owner = self.get_type_required(member.owner)?;
        if self.members.contains_key(&member.token) {
            return Err(malformed_error!("member token {} registered twice", member.token));
        }

        owner.members.push(member.token);
        self.members.insert(member.token, member);
        Ok(())
    }

    /// Look up a type by token.
    #[must_use]
    pub fn get_type(&self, token: Token) -> Option<NamedTypeRc> {
        self.types.get(&token).map(|entry| entry.value().clone())
    }

    /// Look up a type by token.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if no type is registered under `token`.
    pub fn get_type_required(&self, token: Token) -> Result<NamedTypeRc> {
        self.get_type(token).ok_or(TypeNotFound(token))
    }

    /// Look up a member by token.
    #[must_use]
    pub fn get_member(&self, token: Token) -> Option<MemberRc> {
        self.members.get(&token).map(|entry| entry.value().clone())
    }

    /// Look up a member by token.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if no member is registered under `token`.
    pub fn get_member_required(&self, token: Token) -> Result<MemberRc> {
        self.get_member(token).ok_or(MemberNotFound(token))
    }

    /// All types registered under `name`, in registration order.
    #[must_use]
    pub fn types_by_metadata_name(&self, name: &str) -> Vec<NamedTypeRc> {
        self.types_by_metadata_name
            .get(name)
            .map(|tokens| {
                tokens
                    .value()
                    .iter()
                    .filter_map(|token| self.get_type(*token))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Declared members of `ty` in declaration order.
    #[must_use]
    pub fn members_of(&self, ty: &NamedTypeRc) -> Vec<MemberRc> {
        ty.members
            .iter()
            .filter_map(|(_, token)| self.get_member(*token))
            .collect()
    }

    /// Declared members of `ty` called `name`, in declaration order.
    #[must_use]
    pub fn members_named(&self, ty: &NamedTypeRc, name: &str) -> Vec<MemberRc> {
        ty.members
            .iter()
            .filter_map(|(_, token)| self.get_member(*token))
            .filter(|member| member.name == name)
            .collect()
    }

    /// Count of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry holds no types
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Count of registered members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Get all types in token order
    pub fn all_types(&self) -> Vec<NamedTypeRc> {
        self.types
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Construct `definition` inside a containing type instance and with method arguments.
    ///
    /// `type_args` are the arguments of the containing type and `method_args` the method type
    /// arguments; either may be empty to keep the definition's own parameters. Passing the
    /// identity arguments is the same as passing nothing. When nothing remains to substitute
    /// the definition itself is returned, otherwise a cached [`ConstructedMember`], so equal
    /// constructions always yield the same object.
    ///
    /// ## Arguments
    /// * `definition` - The member definition
    /// * `type_args` - Arguments of the containing type
    /// * `method_args` - Method type arguments
    ///
    /// # Errors
    /// Returns [`crate::Error::GenericArityMismatch`] if a non-empty argument list has the
    /// wrong length, and [`crate::Error::TypeNotFound`] if the owner is not registered.
    pub fn construct(
        &self,
        definition: &MemberRc,
        type_args: Vec<TypeSig>,
        method_args: Vec<TypeSig>,
    ) -> Result<MemberHandle> {
        let owner = self.get_type_required(definition.owner)?;

        if !type_args.is_empty() && type_args.len() != owner.arity() {
            return Err(GenericArityMismatch {
                member: owner.token,
                expected: owner.arity(),
                actual: type_args.len(),
            });
        }
        if !method_args.is_empty() && method_args.len() != definition.generic_arity() {
            return Err(GenericArityMismatch {
                member: definition.token,
                expected: definition.generic_arity(),
                actual: method_args.len(),
            });
        }

        let type_args = if type_args == TypeSig::identity_args(owner.token, owner.arity()) {
            Vec::new()
        } else {
            type_args
        };
        let method_args = if method_args
            == TypeSig::identity_args(definition.token, definition.generic_arity())
        {
            Vec::new()
        } else {
            method_args
        };

        if type_args.is_empty() && method_args.is_empty() {
            return Ok(MemberHandle::Definition(definition.clone()));
        }

        let key = (definition.token, type_args.clone(), method_args.clone());
        let constructed = self
            .constructed
            .entry(key)
            .or_insert_with(|| {
                Arc::new(ConstructedMember::new(
                    definition.clone(),
                    type_args,
                    method_args,
                ))
            })
            .clone();

        Ok(MemberHandle::Constructed(constructed))
    }

    /// `definition` as a member of `containing`, a use of its declaring type.
    ///
    /// # Errors
    /// See [`TypeRegistry::construct`].
    pub fn member_of(&self, definition: &MemberRc, containing: &TypeSig) -> Result<MemberHandle> {
        self.construct(definition, containing.type_args().to_vec(), Vec::new())
    }

    /// Number of distinct constructed members created so far.
    #[must_use]
    pub fn constructed_count(&self) -> usize {
        self.constructed.len()
    }

    /// The ancestors of `ty`, nearest first, each expressed in `ty`'s context.
    ///
    /// For `D : B<D>` and `B<T> : A<T[]>`, the chain of `D` is `[B<D>, A<D[]>]`.
    ///
    /// ## Arguments
    /// * `ty` - A named type usage (definition or constructed)
    /// * `max_depth` - Maximum number of ancestors to visit
    ///
    /// # Errors
    /// Returns [`crate::Error::InheritanceCycle`] if a type repeats,
    /// [`crate::Error::DepthLimitExceeded`] past `max_depth` ancestors and
    /// [`crate::Error::TypeNotFound`] for dangling base tokens.
    pub fn base_chain(&self, ty: &TypeSig, max_depth: usize) -> Result<Vec<TypeSig>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = ty.clone();

        if let Some(def) = current.definition() {
            seen.insert(def);
        }

        while let Some(def) = current.definition() {
            let named = self.get_type_required(def)?;
            let Some(base) = named.base() else {
                break;
            };

            let base = base.substitute(&Substitution::for_type(&current));
            let Some(base_def) = base.definition() else {
                return Err(malformed_error!("base type of {} is not a named type", def));
            };
            if !seen.insert(base_def) {
                tracing::warn!(ty = %def, base = %base_def, "inheritance cycle");
                return Err(InheritanceCycle(base_def));
            }
            if chain.len() >= max_depth {
                return Err(DepthLimitExceeded(max_depth));
            }

            chain.push(base.clone());
            current = base;
        }

        Ok(chain)
    }

    /// Interfaces declared directly on `ty`, expressed in `ty`'s context.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if `ty` names an unregistered type.
    pub fn direct_interfaces(&self, ty: &TypeSig) -> Result<Vec<TypeSig>> {
        let Some(def) = ty.definition() else {
            return Ok(Vec::new());
        };
        let named = self.get_type_required(def)?;
        let subst = Substitution::for_type(ty);

        Ok(named
            .interfaces
            .iter()
            .map(|(_, iface)| iface.substitute(&subst))
            .collect())
    }

    /// All interfaces implemented by `ty`, transitively.
    ///
    /// Interfaces declared on `ty` itself and on every ancestor are included together with
    /// their base interfaces. Duplicates are dropped, and every interface is listed before
    /// any of its own base interfaces; otherwise declaration order is kept.
    ///
    /// ## Arguments
    /// * `ty` - A named type usage
    /// * `max_depth` - Bound for the base chain and for interface nesting
    ///
    /// # Errors
    /// Propagates errors from [`TypeRegistry::base_chain`], and returns
    /// [`crate::Error::DepthLimitExceeded`] for interface nesting deeper than `max_depth`.
    pub fn all_interfaces(&self, ty: &TypeSig, max_depth: usize) -> Result<Vec<TypeSig>> {
        let mut roots = self.direct_interfaces(ty)?;
        for ancestor in self.base_chain(ty, max_depth)? {
            roots.extend(self.direct_interfaces(&ancestor)?);
        }

        // Post-order over the reversed declaration order, reversed again at the end,
        // gives a topological order that keeps declaration order among siblings.
        let mut seen = HashSet::new();
        let mut postorder = Vec::new();
        let mut stack: Vec<(TypeSig, bool)> =
            roots.into_iter().map(|iface| (iface, false)).collect();

        while let Some((iface, expanded)) = stack.pop() {
            if expanded {
                postorder.push(iface);
                continue;
            }
            if !seen.insert(iface.clone()) {
                continue;
            }
            if seen.len() > max_depth.saturating_mul(16) {
                return Err(DepthLimitExceeded(max_depth));
            }

            let bases = self.direct_interfaces(&iface)?;
            stack.push((iface, true));
            stack.extend(
                bases
                    .into_iter()
                    .filter(|base| !seen.contains(base))
                    .map(|base| (base, false)),
            );
        }

        postorder.reverse();
        Ok(postorder)
    }

    /// Returns `true` if `derived` is `base` or has `base` in its base chain.
    ///
    /// Generic arguments are ignored: `D : B<int>` derives from `B`.
    #[must_use]
    pub fn derives_from(&self, derived: Token, base: Token, max_depth: usize) -> bool {
        let mut current = Some(derived);
        let mut depth = 0;

        while let Some(token) = current {
            if token == base {
                return true;
            }
            if depth > max_depth {
                return false;
            }
            depth += 1;
            current = self
                .get_type(token)
                .and_then(|ty| ty.base().and_then(TypeSig::definition));
        }
        false
    }

    /// Human readable form of a type usage, e.g. `B<D>`, `int[]`, `(int a, T)`.
    ///
    /// Used for diagnostic arguments.
    #[must_use]
    pub fn display_type(&self, ty: &TypeSig) -> String {
        match ty {
            TypeSig::Void => "void".to_string(),
            TypeSig::Named { def, args } => {
                let name = self
                    .get_type(*def)
                    .map_or_else(|| def.to_string(), |named| named.fullname());
                if args.is_empty() {
                    name
                } else {
                    let args: Vec<String> = args.iter().map(|a| self.display_type(a)).collect();
                    format!("{}<{}>", name, args.join(", "))
                }
            }
            TypeSig::GenericParam { owner, ordinal } => self
                .generic_param_name(*owner, *ordinal)
                .unwrap_or_else(|| format!("!{ordinal}")),
            TypeSig::Array { element, rank } => {
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                format!("{}[{}]", self.display_type(element), commas)
            }
            TypeSig::Pointer(inner) => format!("{}*", self.display_type(inner)),
            TypeSig::Tuple(elements) => {
                let elements: Vec<String> = elements
                    .iter()
                    .map(|element| match &element.name {
                        Some(name) => format!("{} {}", self.display_type(&element.ty), name),
                        None => self.display_type(&element.ty),
                    })
                    .collect();
                format!("({})", elements.join(", "))
            }
            TypeSig::Nullable(inner) => format!("{}?", self.display_type(inner)),
        }
    }

    /// Human readable form of a member handle, e.g. `B<D>.M`.
    #[must_use]
    pub fn display_member(&self, member: &MemberHandle) -> String {
        let definition = member.definition();
        let owner = match self.get_type(definition.owner) {
            Some(owner) if !member.type_args().is_empty() => self.display_type(
                &TypeSig::generic(owner.token, member.type_args().to_vec()),
            ),
            Some(owner) => owner.fullname(),
            None => definition.owner.to_string(),
        };
        format!("{}.{}", owner, definition.name)
    }

    fn generic_param_name(&self, owner: Token, ordinal: u16) -> Option<String> {
        let params = if owner.is_type() {
            self.get_type(owner)?.type_params.clone()
        } else {
            self.get_member(owner)?.type_params.clone()
        };
        params
            .into_iter()
            .find(|param| param.ordinal == ordinal)
            .map(|param| param.name)
    }
}
