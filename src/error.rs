//! Error types for the ACSL logic layer

use thiserror::Error;

/// ACSL logic layer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Construction errors
    /// Operator not permitted for the node being built
    ///
    /// **Triggered by:** Building a binary term from a logical operator, or a
    /// logical predicate from an arithmetic one
    /// **Example:** `BinaryTerm::new(a, b, BinaryOperator::And)`
    #[error("Invalid operator {op} for {context}")]
    InvalidOperator {
        /// Operator token
        op: String,
        /// Kind of node being constructed
        context: String,
    },

    /// Simple predicate built around a term that is not a comparison
    ///
    /// **Triggered by:** Wrapping `x + 1` instead of `x + 1 > 0`
    #[error("Expected a comparison term, got {term}")]
    NotAComparison {
        /// Offending term
        term: String,
    },

    /// Two types have no common generalization
    #[error("Incompatible types: {left} and {right}")]
    IncompatibleTypes {
        /// Left type
        left: String,
        /// Right type
        right: String,
    },

    /// A builtin appears in a clause where it is not allowed
    ///
    /// **Triggered by:** `\result` in a `requires` clause
    /// **Example:** `requires \result > 0;`
    #[error("{builtin} is not allowed in {clause} clauses")]
    IllegalPlacement {
        /// Builtin or construct name
        builtin: String,
        /// Clause kind
        clause: String,
    },

    // Translation errors
    /// Identifier or function that cannot be resolved in the input program
    ///
    /// **Triggered by:** Annotations that mention undeclared variables
    /// **Recovery:** Classified as Recoverable - the annotation is skipped
    #[error("Unrecognized code: {name} ({reason})")]
    UnrecognizedCode {
        /// Name that failed to resolve
        name: String,
        /// Why it could not be used
        reason: String,
    },

    /// Construct that has no sound translation
    ///
    /// **Triggered by:** `\at(x, Pre)`, quantifiers in host expressions
    #[error("Unsupported construct: {construct}")]
    Unsupported {
        /// Description of the construct
        construct: String,
    },

    /// Old value requested before it was recorded
    ///
    /// **Triggered by:** Translating `\old(t)` without snapshotting `t` first.
    /// This is an ordering bug in the caller, not an input error.
    #[error("No old value recorded for {term}")]
    MissingOldValue {
        /// Term whose old value is missing
        term: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Bug in the producer of the AST or in the translation order; abort the annotation
    Fatal,
    /// Problem with the input program; the annotation can be skipped
    Recoverable,
}

impl Error {
    /// Create an unsupported-construct error
    pub fn unsupported(construct: impl Into<String>) -> Self {
        Error::Unsupported {
            construct: construct.into(),
        }
    }

    /// Create an unrecognized-code error
    pub fn unrecognized(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::UnrecognizedCode {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-operator error
    pub fn invalid_operator(op: impl ToString, context: impl Into<String>) -> Self {
        Error::InvalidOperator {
            op: op.to_string(),
            context: context.into(),
        }
    }

    /// Classify error severity
    pub fn classify(&self) -> ErrorSeverity {
        match self {
            Error::InvalidOperator { .. } => ErrorSeverity::Fatal,
            Error::NotAComparison { .. } => ErrorSeverity::Fatal,
            Error::IncompatibleTypes { .. } => ErrorSeverity::Fatal,
            Error::IllegalPlacement { .. } => ErrorSeverity::Fatal,
            Error::MissingOldValue { .. } => ErrorSeverity::Fatal,

            Error::UnrecognizedCode { .. } => ErrorSeverity::Recoverable,
            Error::Unsupported { .. } => ErrorSeverity::Recoverable,
            Error::Config(_) => ErrorSeverity::Recoverable,
        }
    }

    /// True for errors that stem from the input program rather than from a bug
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::UnrecognizedCode { .. })
    }
}

/// Result type for ACSL operations
pub type Result<T> = std::result::Result<T, Error>;
