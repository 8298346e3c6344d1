//! Members of named types.
//!
//! # Key Components
//!
//! - [`Member`]: A method, property, event or field definition
//! - [`MemberHandle`]: A definition or a constructed member, compared structurally
//! - [`Accessibility`], [`MemberModifiers`], [`MemberKind`], [`AccessorKind`]: Declaration data
//!
//! Properties and events own their accessor methods through [`Accessors`]; each accessor
//! points back to its owner through [`AccessorOf`]. Accessors are classified by the
//! resolver independently of their property.

mod handle;
mod member;
mod types;

pub use handle::{ConstructedMember, MemberHandle};
pub use member::{AccessorOf, Accessors, Member, MemberRc};
pub use types::{
    AccessorKind, AccessorSlot, Accessibility, MemberKind, MemberModifiers, MEMBER_ACCESS_MASK,
};
