//! Override and hiding resolution.
//!
//! For every member this module answers two separate questions:
//!
//! - [`OverrideResolver::resolve`] - the *immediate* classification: the one member that is
//!   overridden, the members that are hidden, and further exact matches that make an
//!   override ambiguous.
//! - [`OverrideResolver::constructed_least_overridden_method`] - the *original* virtual slot
//!   at the root of the override chain, constructed with the caller's type arguments.
//!
//! Both are also available on [`crate::Compilation`].
//!
//! # Examples
//!
//! ```rust
//! use symscope::Compilation;
//! use symscope::symbols::builders::{minimal_corlib, FieldBuilder, MethodBuilder, TypeBuilder};
//! use symscope::symbols::members::{MemberHandle, MemberModifiers};
//! use symscope::symbols::typesystem::TypeSig;
//!
//! # fn main() -> symscope::Result<()> {
//! let compilation = Compilation::new("App");
//! minimal_corlib(&compilation)?;
//! let int = TypeSig::named(compilation.get_type_by_metadata_name("System.Int32").unwrap().token);
//!
//! let base = TypeBuilder::class("", "Base").build(&compilation)?;
//! MethodBuilder::new("M").with_flags(MemberModifiers::VIRTUAL).build(&compilation, &base)?;
//!
//! let derived = TypeBuilder::class("", "Derived")
//!     .extends(TypeSig::named(base.token))
//!     .build(&compilation)?;
//! let field = FieldBuilder::new("M", int)
//!     .with_flags(MemberModifiers::NEW)
//!     .build(&compilation, &derived)?;
//!
//! let result = compilation.overridden_or_hidden(&MemberHandle::Definition(field))?;
//! assert!(result.overridden_member().is_none());
//! assert_eq!(result.hidden_members().len(), 1);
//! # Ok(())
//! # }
//! ```

mod resolver;
mod result;

pub use resolver::OverrideResolver;
pub use result::OverriddenOrHiddenMembers;
