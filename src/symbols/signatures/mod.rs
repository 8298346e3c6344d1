//! Member signatures and the predicates that compare them.
//!
//! # Key Components
//!
//! - [`Signature`]: Generic arity, parameters and return part of a member
//! - [`matches_for_override`] / [`matches_for_hiding`]: Exact and candidate matching
//! - [`custom_modifier_count`]: Tie-break input when no candidate matches exactly
//! - [`member_differences`]: Per-category diff between two declarations of one member
//!
//! Signatures never contain the member name; name comparison is the caller's job.

mod diff;
mod matching;
mod types;

pub use diff::{member_differences, SignatureDifferences};
pub use matching::{custom_modifier_count, matches_for_hiding, matches_for_override, parameter_matches};
pub use types::{CustomModifier, RefKind, Signature, SignatureParameter, SignatureReturn};
