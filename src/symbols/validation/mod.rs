//! Diagnostics over a populated symbol graph.
//!
//! The validators turn override/hiding classifications into diagnostics. Each one is a unit
//! struct with a `validate_type` entry point checking the members one source type declares;
//! [`validate_compilation`] runs the enabled validators over every source type.
//!
//! # Key Components
//!
//! - [`OverrideValidator`] - `override` legality, return types, accessibility
//! - [`HidingValidator`] - `new` modifiers and implicit hiding
//! - [`AccessorValidator`] - Accessors of overriding properties and events
//! - [`AbstractMemberValidator`] - Abstract members left unimplemented by concrete classes
//! - [`PartialMemberValidator`] - Defining versus implementing partial declarations
//! - [`AnalysisOptions`] - Which validators run and which relaxations apply
//!
//! # Thread Safety
//!
//! With [`AnalysisOptions::parallel`] set, types are validated concurrently with [`rayon`].
//! Reports then reach the sink in no particular order; use
//! [`crate::symbols::diagnostics::Diagnostics::sorted`] for stable output. Resolution results
//! are memoized on the members, so concurrent validators share them.
//!
//! # Examples
//!
//! ```rust
//! use symscope::Compilation;
//! use symscope::symbols::builders::{minimal_corlib, MethodBuilder, TypeBuilder};
//! use symscope::symbols::diagnostics::{DiagnosticCode, Diagnostics};
//! use symscope::symbols::members::MemberModifiers;
//! use symscope::symbols::validation::validate_compilation;
//!
//! # fn main() -> symscope::Result<()> {
//! let compilation = Compilation::new("App");
//! minimal_corlib(&compilation)?;
//! let ty = TypeBuilder::class("", "C").build(&compilation)?;
//! MethodBuilder::new("Nothing")
//!     .with_flags(MemberModifiers::OVERRIDE)
//!     .build(&compilation, &ty)?;
//!
//! let diagnostics = Diagnostics::new();
//! validate_compilation(&compilation, &diagnostics)?;
//! assert_eq!(diagnostics.with_code(DiagnosticCode::OverrideNotExpected).len(), 1);
//! # Ok(())
//! # }
//! ```

mod abstracts;
mod accessors;
mod config;
mod context;
mod hiding;
mod overrides;
mod partial;

pub use abstracts::AbstractMemberValidator;
pub use accessors::AccessorValidator;
pub use config::AnalysisOptions;
pub use context::ValidationContext;
pub use hiding::HidingValidator;
pub use overrides::OverrideValidator;
pub use partial::PartialMemberValidator;

use rayon::prelude::*;

use crate::{
    symbols::{compilation::Compilation, diagnostics::DiagnosticSink, typesystem::NamedTypeRc},
    Result,
};

type TypeValidator = fn(&ValidationContext<'_>, &NamedTypeRc) -> Result<()>;

/// Runs every validator enabled in the compilation's options over all source types.
///
/// Hiding checks run together with override validation.
///
/// ## Arguments
/// * `compilation` - A fully populated compilation
/// * `sink` - Receives every diagnostic
///
/// # Errors
/// Returns the first structural error (inheritance cycle, depth limit, dangling token) any
/// validator hits. Diagnostics reported before the error stay in `sink`.
pub fn validate_compilation(compilation: &Compilation, sink: &dyn DiagnosticSink) -> Result<()> {
    let options = compilation.options();
    let checks: [(bool, TypeValidator); 5] = [
        (options.enable_override_validation, OverrideValidator::validate_type),
        (options.enable_override_validation, HidingValidator::validate_type),
        (options.enable_accessor_validation, AccessorValidator::validate_type),
        (options.enable_abstract_validation, AbstractMemberValidator::validate_type),
        (options.enable_partial_validation, PartialMemberValidator::validate_type),
    ];
    let validators: Vec<TypeValidator> = checks
        .into_iter()
        .filter_map(|(enabled, validator)| enabled.then_some(validator))
        .collect();

    if validators.is_empty() {
        return Ok(());
    }

    let types = compilation.source_types();
    tracing::debug!(
        types = types.len(),
        validators = validators.len(),
        parallel = options.parallel,
        "validating compilation"
    );

    let ctx = ValidationContext::new(compilation, sink);
    let validate = |ty: &NamedTypeRc| -> Result<()> {
        validators.iter().try_for_each(|validator| validator(&ctx, ty))
    };

    if options.parallel {
        types.par_iter().try_for_each(validate)
    } else {
        types.iter().try_for_each(validate)
    }
}
