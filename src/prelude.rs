//! # symscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and functions
//! of the symscope library. Import it to declare a symbol graph, resolve members and run
//! validation without spelling out module paths.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all symscope operations
pub use crate::Error;

/// The result type used throughout symscope
pub use crate::Result;

/// Options controlling resolution and validation
pub use crate::AnalysisOptions;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// One analysis context
pub use crate::Compilation;

/// Referenced assemblies and their lookup results
pub use crate::symbols::compilation::{Assembly, TypeLookup};

// ================================================================================================
// Symbol Graph
// ================================================================================================

/// Stable arena identifiers
pub use crate::symbols::token::Token;

/// Types and type usages
pub use crate::symbols::typesystem::{
    NamedType, NamedTypeRc, Substitution, TypeCompareKind, TypeKind, TypeModifiers, TypeSig,
};

/// Members and their declaration data
pub use crate::symbols::members::{
    AccessorKind, Accessibility, Member, MemberHandle, MemberKind, MemberModifiers, MemberRc,
};

/// Member signatures
pub use crate::symbols::signatures::{
    CustomModifier, RefKind, Signature, SignatureDifferences, SignatureParameter,
};

// ================================================================================================
// Building
// ================================================================================================

/// Fluent builders and the core library stub
pub use crate::symbols::builders::{
    minimal_corlib, AssemblyBuilder, EventBuilder, FieldBuilder, MethodBuilder, PropertyBuilder,
    TypeBuilder,
};

// ================================================================================================
// Analysis
// ================================================================================================

/// Override/hiding resolution
pub use crate::symbols::overrides::{OverriddenOrHiddenMembers, OverrideResolver};

/// Special and well-known framework entities
pub use crate::symbols::wellknown::{
    MemberId, SpecialMember, SpecialType, TypeId, WellKnownMember, WellKnownType,
};

/// Diagnostics
pub use crate::symbols::diagnostics::{
    Diagnostic, DiagnosticCode, DiagnosticSeverity, DiagnosticSink, Diagnostics, Span,
};

/// Validation
pub use crate::symbols::validation::validate_compilation;

/// Missing framework members in lowering
pub use crate::lowering::{LoweringConstruct, MissingMemberAction, MissingMemberPolicy};
