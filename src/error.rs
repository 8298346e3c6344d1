use thiserror::Error;

use crate::symbols::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors describe misuse of the symbol graph API (dangling tokens, impossible constructions,
/// graphs that violate structural assumptions). Problems in the *analysed program* such as an
/// illegal override or a missing framework member are never errors; they are reported as
/// [`crate::symbols::diagnostics::Diagnostic`] values through a sink.
///
/// # Error Categories
///
/// ## Graph Errors
/// - [`Error::Malformed`] - The symbol graph violates a structural assumption
/// - [`Error::TypeNotFound`] - A token does not name a registered type
/// - [`Error::MemberNotFound`] - A token does not name a registered member
/// - [`Error::AssemblyNotFound`] - A token does not name a registered assembly
/// - [`Error::DuplicateName`] - A named entity was registered twice
///
/// ## Resolution Errors
/// - [`Error::ExplicitInterfaceImplementation`] - Explicit implementations are not classified
/// - [`Error::InheritanceCycle`] - A base-type chain loops back on itself
/// - [`Error::DepthLimitExceeded`] - A walk exceeded the configured depth
/// - [`Error::GenericArityMismatch`] - Construction with the wrong number of type arguments
///
/// # Examples
///
/// ```rust
/// use symscope::{Error, Compilation};
/// use symscope::symbols::token::Token;
///
/// let compilation = Compilation::new("App");
/// match compilation.registry().get_type_required(Token::new(0x0200_0042)) {
///     Ok(_) => unreachable!(),
///     Err(Error::TypeNotFound(token)) => assert_eq!(token.row(), 0x42),
///     Err(e) => panic!("unexpected: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The symbol graph is damaged and could not be processed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Failed to find type in the `TypeRegistry`.
    ///
    /// The associated [`Token`] identifies which type was not found.
    #[error("Failed to find type in TypeRegistry - {0}")]
    TypeNotFound(Token),

    /// Failed to find member in the `TypeRegistry`.
    ///
    /// The associated [`Token`] identifies which member was not found.
    #[error("Failed to find member in TypeRegistry - {0}")]
    MemberNotFound(Token),

    /// Failed to find an assembly registered with the compilation.
    #[error("Failed to find assembly - {0}")]
    AssemblyNotFound(Token),

    /// A named entity was registered twice where uniqueness is required.
    #[error("Duplicate name - {0}")]
    DuplicateName(String),

    /// Explicit interface implementations are never classified by the override/hiding resolver.
    ///
    /// The associated [`Token`] identifies the explicit implementation that was queried.
    #[error("Explicit interface implementation can not be classified - {0}")]
    ExplicitInterfaceImplementation(Token),

    /// A base-type chain loops back on itself.
    ///
    /// Cycles are illegal in a well-formed program, but a metadata reader may still hand one
    /// over. The associated [`Token`] is the first type seen twice.
    #[error("Inheritance cycle detected at {0}")]
    InheritanceCycle(Token),

    /// A walk over the type graph exceeded the configured maximum depth.
    #[error("Reached the maximum inheritance depth - {0}")]
    DepthLimitExceeded(usize),

    /// A generic member or type was constructed with the wrong number of type arguments.
    #[error("Generic arity mismatch for {member}: expected {expected}, got {actual}")]
    GenericArityMismatch {
        /// The generic definition being constructed
        member: Token,
        /// Number of type parameters declared by the definition
        expected: usize,
        /// Number of type arguments supplied
        actual: usize,
    },
}
