//! Type system of the symbol graph.
//!
//! This module provides the named-type model and the structural type usages that member
//! signatures are built from, together with the registry that owns them.
//!
//! # Key Components
//!
//! - [`NamedType`]: A class, interface, struct, enum or delegate definition
//! - [`TypeSig`]: A use of a type inside a signature (`List<T>`, `int[]`, `(int a, T)`)
//! - [`Substitution`]: Generic parameter bindings applied to type usages
//! - [`TypeCompareKind`]: Which differences a structural comparison ignores
//! - [`TypeRegistry`]: Token-indexed arena owning all types and members
//!
//! # Type System Features
//!
//! - **Arena storage**: Types and members reference each other by [`crate::symbols::token::Token`]
//! - **Explicit construction**: Constructed members are `(definition, arguments)` pairs,
//!   cached by the registry
//! - **Deterministic walks**: Base chains and interface flattening are iterative and bounded

mod named;
mod registry;
mod sig;

pub use named::{GenericParamDef, NamedType, NamedTypeRc, TypeKind, TypeModifiers, Variance};
pub use registry::TypeRegistry;
pub use sig::{Substitution, TupleElement, TypeCompareKind, TypeSig};
