//! Framework member binding for lowering.
//!
//! Lowering rewrites language constructs (lifted operators, iterators, `foreach`, `using`,
//! `lock`, string concatenation) into calls to special and well-known members. This module
//! decides what happens when such a member is absent from the references:
//!
//! - **Required** members report `CS0656` at the construct's span, once per use
//! - **Optional** members (debugger and compiler-generated attributes) are skipped silently
//! - **Alternate** members fall back to an equivalent member without a diagnostic, e.g.
//!   `Nullable<T>.GetValueOrDefault()` to `GetValueOrDefault(T)`
//!
//! # Examples
//!
//! ```rust
//! use symscope::Compilation;
//! use symscope::lowering::{LoweringConstruct, MissingMemberPolicy};
//! use symscope::symbols::builders::minimal_corlib;
//! use symscope::symbols::diagnostics::{Diagnostics, Span};
//! use symscope::symbols::wellknown::SpecialMember;
//!
//! # fn main() -> symscope::Result<()> {
//! let compilation = Compilation::new("App");
//! minimal_corlib(&compilation)?;
//! compilation.make_member_missing(SpecialMember::IDisposableDispose);
//!
//! let diagnostics = Diagnostics::new();
//! let policy = MissingMemberPolicy::new(&compilation, &diagnostics);
//! let lowered = policy.lower(LoweringConstruct::Using, Span::new(10, 42));
//!
//! assert!(lowered.has_failed());
//! assert_eq!(diagnostics.error_count(), 1);
//! # Ok(())
//! # }
//! ```

mod constructs;
mod policy;

pub use constructs::LoweringConstruct;
pub use policy::{
    LoweredConstruct, MemberRequirement, MemberUse, MissingMemberAction, MissingMemberPolicy,
};
