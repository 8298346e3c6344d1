// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # symscope
//!
//! Symbol resolution and override/hiding analysis for C#-like type hierarchies.
//!
//! Given a graph of classes, interfaces and structs with their methods, properties, events
//! and fields, `symscope` answers the questions a compiler back end asks about members:
//!
//! - **What does this member override, and what does it hide?** Computed once per member
//!   and shared between threads.
//! - **Which virtual slot does a call dispatch through?** The least-overridden member,
//!   constructed with the caller's generic arguments.
//! - **Is this declaration legal?** Override, hiding, accessor, abstract-member and
//!   partial-part checks producing structured `CSnnnn` diagnostics.
//! - **Is the framework member lowering needs present?** Special and well-known members
//!   resolved per compilation, with a policy for absent ones.
//!
//! ## Features
//!
//! - **Arena-based symbol graph** - Types and members addressed by stable tokens
//! - **Structural generics** - Constructed members are cached `(definition, arguments)` pairs
//! - **Lock-free memoization** - Resolution results are computed at most once per member
//! - **Parallel validation** - Types are validated concurrently with `rayon`
//! - **Structured diagnostics** - Codes, arguments and spans; formatting is up to the caller
//!
//! ## Quick Start
//!
//! ```rust
//! use symscope::prelude::*;
//!
//! # fn main() -> symscope::Result<()> {
//! let compilation = Compilation::new("App");
//! minimal_corlib(&compilation)?;
//!
//! let base = TypeBuilder::class("Shapes", "Shape").build(&compilation)?;
//! let area = MethodBuilder::new("Area")
//!     .with_flags(MemberModifiers::VIRTUAL)
//!     .build(&compilation, &base)?;
//!
//! let circle = TypeBuilder::class("Shapes", "Circle")
//!     .extends(TypeSig::named(base.token))
//!     .build(&compilation)?;
//! let circle_area = MethodBuilder::new("Area")
//!     .with_flags(MemberModifiers::OVERRIDE)
//!     .build(&compilation, &circle)?;
//!
//! let result = compilation.overridden_or_hidden(&MemberHandle::Definition(circle_area))?;
//! assert_eq!(
//!     result.overridden_member(),
//!     Some(&MemberHandle::Definition(area))
//! );
//!
//! let diagnostics = Diagnostics::new();
//! validate_compilation(&compilation, &diagnostics)?;
//! assert!(!diagnostics.has_any());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`symbols`] - The symbol graph, resolution, framework members and validation
//! - [`lowering`] - Binding framework members for lowering, and what happens when they are absent
//! - [`Error`] and [`Result`] - Errors for structural misuse of the API
//!
//! Problems in the analysed program are never [`Error`]s. They are reported as
//! [`symbols::diagnostics::Diagnostic`] values through a
//! [`symbols::diagnostics::DiagnosticSink`].
//!
//! ## Logging
//!
//! Resolution decisions, ambiguous lookups and missing framework members are logged through
//! [`tracing`]. No subscriber is installed by the library.

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and functions.
///
/// # Example
///
/// ```rust
/// use symscope::prelude::*;
///
/// let compilation = Compilation::new("App");
/// assert_eq!(compilation.name(), "App");
/// ```
pub mod prelude;

/// Binding framework members for lowering.
pub mod lowering;

/// The symbol graph and the analyses over it.
///
/// # Key Components
///
/// - [`symbols::compilation::Compilation`] - One analysis context
/// - [`symbols::builders`] - Fluent API for populating the graph
/// - [`symbols::overrides`] - Override/hiding resolution
/// - [`symbols::wellknown`] - Special and well-known framework types and members
/// - [`symbols::validation`] - Diagnostics over the graph
pub mod symbols;

/// `symscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust
/// use symscope::{Compilation, Result};
/// use symscope::symbols::builders::TypeBuilder;
/// use symscope::symbols::typesystem::NamedTypeRc;
///
/// fn declare(compilation: &Compilation) -> Result<NamedTypeRc> {
///     TypeBuilder::interface("App", "IShape").build(compilation)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `symscope` Error type
///
/// Every fallible operation of the crate returns this error. It describes structural misuse
/// of the symbol graph API, never a problem in the analysed program.
pub use error::Error;

/// One analysis context: references, type lookup caches and options.
///
/// See [`symbols::compilation::Compilation`].
pub use symbols::compilation::Compilation;

/// Options controlling resolution bounds and validation.
///
/// See [`symbols::validation::AnalysisOptions`].
pub use symbols::validation::AnalysisOptions;
