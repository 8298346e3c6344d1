//! The symbol graph and everything computed over it.
//!
//! # Architecture
//!
//! Types and members live in a token-indexed arena ([`typesystem::TypeRegistry`]) owned by a
//! [`compilation::Compilation`]. Everything else reads that arena:
//!
//! - [`signatures`] compares member shapes for hiding, overriding and partial parts
//! - [`overrides`] classifies every member as overriding, hiding, or neither
//! - [`wellknown`] binds the framework types and members lowering depends on
//! - [`validation`] turns classifications into diagnostics
//!
//! The graph is filled through [`builders`] (or by constructing [`typesystem::NamedType`] and
//! [`members::Member`] directly) and is read-only once analysis starts.
//!
//! # Key Components
//!
//! - [`compilation::Compilation`] - One analysis context: references, caches, options
//! - [`members::MemberHandle`] - A member definition or a constructed generic member
//! - [`overrides::OverriddenOrHiddenMembers`] - Memoized resolution result
//! - [`diagnostics::Diagnostics`] - Thread-safe diagnostic collection

pub mod builders;
pub mod compilation;
pub mod diagnostics;
pub mod members;
pub mod overrides;
pub mod signatures;
pub mod token;
pub mod typesystem;
pub mod validation;
pub mod wellknown;
