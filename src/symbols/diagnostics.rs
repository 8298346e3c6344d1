//! Structured diagnostics produced by resolution, validation and lowering.
//!
//! Nothing in this crate formats a human-readable message. A [`Diagnostic`] is a tuple of a
//! [`DiagnosticCode`], an ordered list of arguments (symbol names, metadata names) and the
//! [`Span`] of the syntax it is anchored to. Rendering and localisation belong to whoever
//! consumes the diagnostics.
//!
//! # Architecture
//!
//! Producers only ever see the [`DiagnosticSink`] trait. The provided [`Diagnostics`]
//! container implements it on top of `boxcar::Vec`, which allows lock-free concurrent
//! appends, so parallel validation workers can report without coordinating.
//!
//! # Examples
//!
//! ```rust
//! use symscope::symbols::diagnostics::{
//!     Diagnostic, DiagnosticCode, DiagnosticSink, Diagnostics, Span,
//! };
//!
//! let diagnostics = Diagnostics::new();
//! diagnostics.report(Diagnostic::new(
//!     DiagnosticCode::MissingPredefinedMember,
//!     vec!["System.IDisposable".into(), "Dispose".into()],
//!     Span::new(10, 42),
//! ));
//!
//! assert!(diagnostics.has_errors());
//! assert_eq!(diagnostics.with_code(DiagnosticCode::MissingPredefinedMember).len(), 1);
//! assert_eq!(DiagnosticCode::MissingPredefinedMember.id(), "CS0656");
//! ```

use std::fmt;

/// A half-open source range `[start, end)` a diagnostic is anchored to.
///
/// Spans are opaque to this crate: they are supplied by the loader for declarations and by
/// lowering for the constructs that need a framework member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Returns `true` for zero-length spans. Symbols loaded from metadata carry one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

/// Severity level of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    /// Non-fatal, compilation output is still produced.
    Warning,
    /// Fatal for the compilation, but analysis continues to find further problems.
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Warning => write!(f, "WARN"),
            DiagnosticSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// The closed set of diagnostics this crate can produce.
///
/// Each code maps onto a stable `CSnnnn` identifier through [`DiagnosticCode::id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum DiagnosticCode {
    // Override legality
    OverrideNotExpected,
    CantOverrideNonVirtual,
    CantOverrideNonFunction,
    CantOverrideNonProperty,
    CantOverrideNonEvent,
    CantOverrideSealed,
    CantChangeAccessOnOverride,
    CantChangeReturnTypeOnOverride,
    CantChangeTypeOnOverride,
    CantChangeRefReturnOnOverride,
    CantChangeTupleNamesOnOverride,
    StaticNotVirtual,
    AmbiguousOverride,
    CantOverrideBogusMethod,
    OverridingDifferentRefness,
    NullabilityMismatchInTypeOnOverride,
    NullabilityMismatchInReturnTypeOnOverride,
    NullabilityMismatchInParameterTypeOnOverride,

    // Hiding
    NewRequired,
    NewOrOverrideExpected,
    NewNotRequired,
    HidingAbstractMethod,

    // Abstract members
    UnimplementedAbstractMethod,

    // Accessors
    NoGetToOverride,
    NoSetToOverride,
    CantChangeInitOnlyOnOverride,
    MissingOverrideAccessor,

    // Framework members
    MissingPredefinedMember,

    // Partial parts
    PartialMemberNotExplicit,
    PartialPropertyTypeDifference,
    PartialMethodReturnTypeDifference,
    PartialMemberRefReturnDifference,
    PartialMemberInconsistentTupleNames,
    PartialMemberParamsDifference,
    ScopedMismatchInParameterOfPartial,
    PartialMemberAccessibilityDifference,
    PartialMemberStaticDifference,
    PartialMemberUnsafeDifference,
    PartialMemberExtendedModDifference,
    PartialMemberReadOnlyDifference,
    PartialPropertyRequiredDifference,
    NullabilityMismatchInReturnTypeOnPartial,
    NullabilityMismatchInParameterTypeOnPartial,
    PartialPropertySignatureDifference,
    PartialMethodSignatureDifference,
    PartialPropertyMissingAccessor,
    PartialPropertyUnexpectedAccessor,
    PartialPropertyInitMismatch,
}

impl DiagnosticCode {
    /// The numeric part of the `CSnnnn` identifier.
    #[must_use]
    pub fn number(&self) -> u16 {
        match self {
            DiagnosticCode::OverrideNotExpected => 115,
            DiagnosticCode::CantOverrideNonVirtual => 506,
            DiagnosticCode::CantOverrideNonFunction => 505,
            DiagnosticCode::CantOverrideNonProperty => 544,
            DiagnosticCode::CantOverrideNonEvent => 72,
            DiagnosticCode::CantOverrideSealed => 239,
            DiagnosticCode::CantChangeAccessOnOverride => 507,
            DiagnosticCode::CantChangeReturnTypeOnOverride => 508,
            DiagnosticCode::CantChangeTypeOnOverride => 1715,
            DiagnosticCode::CantChangeRefReturnOnOverride => 8148,
            DiagnosticCode::CantChangeTupleNamesOnOverride => 8139,
            DiagnosticCode::StaticNotVirtual => 112,
            DiagnosticCode::AmbiguousOverride => 462,
            DiagnosticCode::CantOverrideBogusMethod => 569,
            DiagnosticCode::OverridingDifferentRefness => 9507,
            DiagnosticCode::NullabilityMismatchInTypeOnOverride => 8608,
            DiagnosticCode::NullabilityMismatchInReturnTypeOnOverride => 8609,
            DiagnosticCode::NullabilityMismatchInParameterTypeOnOverride => 8610,
            DiagnosticCode::NewRequired => 108,
            DiagnosticCode::NewOrOverrideExpected => 114,
            DiagnosticCode::NewNotRequired => 109,
            DiagnosticCode::HidingAbstractMethod => 533,
            DiagnosticCode::UnimplementedAbstractMethod => 534,
            DiagnosticCode::NoGetToOverride => 545,
            DiagnosticCode::NoSetToOverride => 546,
            DiagnosticCode::CantChangeInitOnlyOnOverride => 8853,
            DiagnosticCode::MissingOverrideAccessor => 65,
            DiagnosticCode::MissingPredefinedMember => 656,
            DiagnosticCode::PartialMemberNotExplicit => 754,
            DiagnosticCode::PartialPropertyTypeDifference => 9255,
            DiagnosticCode::PartialMethodReturnTypeDifference => 8817,
            DiagnosticCode::PartialMemberRefReturnDifference => 8818,
            DiagnosticCode::PartialMemberInconsistentTupleNames => 8142,
            DiagnosticCode::PartialMemberParamsDifference => 758,
            DiagnosticCode::ScopedMismatchInParameterOfPartial => 8988,
            DiagnosticCode::PartialMemberAccessibilityDifference => 8799,
            DiagnosticCode::PartialMemberStaticDifference => 763,
            DiagnosticCode::PartialMemberUnsafeDifference => 764,
            DiagnosticCode::PartialMemberExtendedModDifference => 8800,
            DiagnosticCode::PartialMemberReadOnlyDifference => 8663,
            DiagnosticCode::PartialPropertyRequiredDifference => 9257,
            DiagnosticCode::NullabilityMismatchInReturnTypeOnPartial => 8819,
            DiagnosticCode::NullabilityMismatchInParameterTypeOnPartial => 8611,
            DiagnosticCode::PartialPropertySignatureDifference => 9256,
            DiagnosticCode::PartialMethodSignatureDifference => 8826,
            DiagnosticCode::PartialPropertyMissingAccessor => 9252,
            DiagnosticCode::PartialPropertyUnexpectedAccessor => 9253,
            DiagnosticCode::PartialPropertyInitMismatch => 9254,
        }
    }

    /// The `CSnnnn` identifier of this code.
    #[must_use]
    pub fn id(&self) -> String {
        format!("CS{:04}", self.number())
    }

    /// The severity a diagnostic with this code carries.
    #[must_use]
    pub fn default_severity(&self) -> DiagnosticSeverity {
        match self {
            DiagnosticCode::OverridingDifferentRefness
            | DiagnosticCode::NullabilityMismatchInTypeOnOverride
            | DiagnosticCode::NullabilityMismatchInReturnTypeOnOverride
            | DiagnosticCode::NullabilityMismatchInParameterTypeOnOverride
            | DiagnosticCode::NewRequired
            | DiagnosticCode::NewOrOverrideExpected
            | DiagnosticCode::NewNotRequired
            | DiagnosticCode::NullabilityMismatchInReturnTypeOnPartial
            | DiagnosticCode::NullabilityMismatchInParameterTypeOnPartial
            | DiagnosticCode::PartialPropertySignatureDifference
            | DiagnosticCode::PartialMethodSignatureDifference => DiagnosticSeverity::Warning,
            _ => DiagnosticSeverity::Error,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CS{:04}", self.number())
    }
}

/// A single structured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong
    pub code: DiagnosticCode,
    /// Severity, derived from the code
    pub severity: DiagnosticSeverity,
    /// Positional arguments (symbol or metadata names)
    pub args: Vec<String>,
    /// Where the problem is anchored
    pub span: Span,
}

impl Diagnostic {
    /// Creates a new diagnostic with the default severity of `code`.
    ///
    /// # Arguments
    ///
    /// * `code` - Which diagnostic this is
    /// * `args` - Ordered arguments for the consumer's message template
    /// * `span` - The syntax the diagnostic is anchored to
    #[must_use]
    pub fn new(code: DiagnosticCode, args: Vec<String>, span: Span) -> Self {
        Diagnostic {
            code,
            severity: code.default_severity(),
            args,
            span,
        }
    }

    /// Returns `true` if this diagnostic is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.severity, self.code, self.span)?;
        if !self.args.is_empty() {
            write!(f, " ({})", self.args.join(", "))?;
        }
        Ok(())
    }
}

/// Receiver for diagnostics.
///
/// Implementations must accept reports from multiple threads at once.
pub trait DiagnosticSink: Sync {
    /// Accepts one diagnostic.
    fn report(&self, diagnostic: Diagnostic);
}

/// Thread-safe container for collecting diagnostic entries.
///
/// Uses `boxcar::Vec` internally for lock-free concurrent append operations.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a new empty diagnostics container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Returns true if any diagnostics have been collected.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns true if any error-level diagnostics have been collected.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|(_, d)| d.is_error())
    }

    /// Returns the total number of diagnostics.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns the number of error-level diagnostics.
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|(_, d)| d.is_error()).count()
    }

    /// Returns the number of warning-level diagnostics.
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Returns copies of all diagnostics carrying `code`, in report order.
    pub fn with_code(&self, code: DiagnosticCode) -> Vec<Diagnostic> {
        self.entries
            .iter()
            .filter(|(_, d)| d.code == code)
            .map(|(_, d)| d.clone())
            .collect()
    }

    /// Returns an iterator over all diagnostics in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Returns all diagnostics sorted by span, then code.
    ///
    /// Parallel validation reports in a nondeterministic order; this view does not depend on it.
    pub fn sorted(&self) -> Vec<Diagnostic> {
        let mut all: Vec<Diagnostic> = self.iter().cloned().collect();
        all.sort_by(|a, b| {
            a.span
                .cmp(&b.span)
                .then(a.code.cmp(&b.code))
                .then(a.args.cmp(&b.args))
        });
        all
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}
