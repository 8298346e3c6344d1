//! Fluent builders for populating a [`crate::Compilation`].
//!
//! A front end (or a test) declares the symbol graph through these builders instead of
//! filling [`crate::symbols::typesystem::NamedType`] and [`crate::symbols::members::Member`]
//! by hand. Builders allocate tokens, wire accessors to their properties and events, and
//! register everything with the compilation's registry in declaration order.
//!
//! # Key Components
//!
//! - [`AssemblyBuilder`] - Referenced assemblies, core library flag, friend assemblies
//! - [`TypeBuilder`] - Classes, interfaces, structs and delegates
//! - [`MethodBuilder`], [`PropertyBuilder`], [`EventBuilder`], [`FieldBuilder`] - Members
//! - [`minimal_corlib`] - A core library with every special and well-known type
//!
//! # Examples
//!
//! ```rust
//! use symscope::Compilation;
//! use symscope::symbols::builders::{minimal_corlib, MethodBuilder, TypeBuilder};
//! use symscope::symbols::members::{MemberHandle, MemberModifiers};
//! use symscope::symbols::typesystem::TypeSig;
//!
//! # fn main() -> symscope::Result<()> {
//! let compilation = Compilation::new("App");
//! minimal_corlib(&compilation)?;
//!
//! let base = TypeBuilder::class("Demo", "Base").build(&compilation)?;
//! MethodBuilder::new("Run")
//!     .with_flags(MemberModifiers::VIRTUAL)
//!     .build(&compilation, &base)?;
//!
//! let derived = TypeBuilder::class("Demo", "Derived")
//!     .extends(TypeSig::named(base.token))
//!     .build(&compilation)?;
//! let run = MethodBuilder::new("Run")
//!     .with_flags(MemberModifiers::OVERRIDE)
//!     .build(&compilation, &derived)?;
//!
//! let result = compilation.overridden_or_hidden(&MemberHandle::Definition(run))?;
//! assert!(result.overridden_member().is_some());
//! # Ok(())
//! # }
//! ```

mod corlib;
mod members;
mod types;

pub use corlib::minimal_corlib;
pub use members::{EventBuilder, FieldBuilder, MethodBuilder, PropertyBuilder};
pub use types::{AssemblyBuilder, TypeBuilder};
