//! Special and well-known framework types and members.
//!
//! Lowering and validation need a fixed set of framework entities: `System.Object`,
//! `Nullable<T>.GetValueOrDefault`, `IDisposable.Dispose` and so on. Each one is named by a
//! closed enum ([`SpecialType`], [`WellKnownType`], [`SpecialMember`], [`WellKnownMember`])
//! and described by a static recipe ([`MemberDescriptor`]). Resolution binds a recipe to a
//! live member of one [`crate::Compilation`] and is cached by that compilation.
//!
//! Absence is a normal result. Deciding whether a missing member is an error is the job of
//! [`crate::lowering::MissingMemberPolicy`].
//!
//! # Examples
//!
//! ```rust
//! use symscope::Compilation;
//! use symscope::symbols::builders::minimal_corlib;
//! use symscope::symbols::wellknown::SpecialMember;
//!
//! # fn main() -> symscope::Result<()> {
//! let compilation = Compilation::new("App");
//! minimal_corlib(&compilation)?;
//! assert!(compilation.get_special_member(SpecialMember::IDisposableDispose).is_some());
//!
//! compilation.make_member_missing(SpecialMember::IDisposableDispose);
//! assert!(compilation.get_special_member(SpecialMember::IDisposableDispose).is_none());
//! # Ok(())
//! # }
//! ```

mod descriptors;
mod ids;
mod resolve;

pub use descriptors::{descriptor, MemberDescriptor, SigTy, SPECIAL_MEMBERS, WELL_KNOWN_MEMBERS};
pub use ids::{MemberId, SpecialMember, SpecialType, TypeId, WellKnownMember, WellKnownType};
pub(crate) use resolve::resolve_member;
