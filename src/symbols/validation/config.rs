//! Analysis configuration
//!
//! This module provides the options that shape override resolution and validation: which
//! language relaxations are active, which diagnostic groups are produced, and how the
//! validation driver schedules its work.

/// Configuration for override/hiding analysis of one compilation
///
/// The resolver itself only reads `max_inheritance_depth`. Every other option affects the
/// validators that turn resolution results into diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalysisOptions {
    /// Permit covariant return types on method and read-only property overrides
    pub covariant_returns: bool,

    /// A property override must restate every accessor of the overridden property
    /// Events always have to restate both accessors
    pub require_all_accessors_on_override: bool,

    /// Emit the hiding warnings (CS0108, CS0114, CS0109)
    pub report_hiding_warnings: bool,

    /// Emit nullability mismatch warnings on overrides and partial parts
    pub report_nullability_warnings: bool,

    /// Run override legality checks
    pub enable_override_validation: bool,

    /// Run accessor consistency checks
    pub enable_accessor_validation: bool,

    /// Check concrete classes for unimplemented abstract members
    pub enable_abstract_validation: bool,

    /// Compare the declarations of partial members
    pub enable_partial_validation: bool,

    /// Validate types in parallel with rayon
    pub parallel: bool,

    /// Maximum number of ancestors any walk visits (default: 256)
    pub max_inheritance_depth: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            covariant_returns: false,
            require_all_accessors_on_override: true,
            report_hiding_warnings: true,
            report_nullability_warnings: true,
            enable_override_validation: true,
            enable_accessor_validation: true,
            enable_abstract_validation: true,
            enable_partial_validation: true,
            parallel: true,
            max_inheritance_depth: 256,
        }
    }
}

impl AnalysisOptions {
    /// Creates a configuration that resolves but validates nothing
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            covariant_returns: false,
            require_all_accessors_on_override: false,
            report_hiding_warnings: false,
            report_nullability_warnings: false,
            enable_override_validation: false,
            enable_accessor_validation: false,
            enable_abstract_validation: false,
            enable_partial_validation: false,
            parallel: false,
            max_inheritance_depth: 256,
        }
    }

    /// Creates a configuration that only reports errors, sequentially
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            report_hiding_warnings: false,
            report_nullability_warnings: false,
            parallel: false,
            ..Self::default()
        }
    }

    /// Creates the strictest configuration: no covariant returns, every accessor restated
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Creates a configuration following the current language rules
    ///
    /// Covariant returns are allowed and property overrides may leave out accessors.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            covariant_returns: true,
            require_all_accessors_on_override: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_options_presets() {
        let disabled = AnalysisOptions::disabled();
        assert!(!disabled.enable_override_validation);
        assert!(!disabled.enable_accessor_validation);
        assert!(!disabled.enable_abstract_validation);
        assert!(!disabled.enable_partial_validation);
        assert!(!disabled.report_hiding_warnings);

        let minimal = AnalysisOptions::minimal();
        assert!(minimal.enable_override_validation);
        assert!(!minimal.report_hiding_warnings);
        assert!(!minimal.report_nullability_warnings);
        assert!(!minimal.parallel);

        let relaxed = AnalysisOptions::relaxed();
        assert!(relaxed.covariant_returns);
        assert!(!relaxed.require_all_accessors_on_override);
        assert!(relaxed.report_hiding_warnings);

        let strict = AnalysisOptions::strict();
        assert!(!strict.covariant_returns);
        assert!(strict.require_all_accessors_on_override);
    }

    #[test]
    fn test_default_options() {
        let default = AnalysisOptions::default();
        assert_eq!(default, AnalysisOptions::strict());
        assert_eq!(default.max_inheritance_depth, 256);
    }
}
