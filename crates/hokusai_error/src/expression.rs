//! Parameter expression error types.

/// Specific error conditions for parsing and evaluating expressions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ExpressionErrorKind {
    /// Text is not a well-formed expression
    #[display("Syntax error in '{}' at offset {}: {}", source_text, offset, message)]
    Syntax {
        /// Expression text
        source_text: String,
        /// Byte offset of the problem
        offset: usize,
        /// Description
        message: String,
    },
    /// Identifier has no value in the parameter store
    #[display("Undefined parameter '{}'", _0)]
    UndefinedParameter(String),
    /// Operator applied to values it does not support
    #[display("Cannot apply '{}' to {} and {}", operator, left, right)]
    TypeMismatch {
        /// Operator text
        operator: String,
        /// Left operand type
        left: &'static str,
        /// Right operand type
        right: &'static str,
    },
    /// Integer division or remainder by zero
    #[display("Division by zero")]
    DivisionByZero,
    /// Condition did not produce a boolean
    #[display("Condition '{}' produced {} instead of a boolean", source_text, found)]
    NotBoolean {
        /// Expression text
        source_text: String,
        /// Type actually produced
        found: &'static str,
    },
}

/// Error type for expressions.
///
/// # Examples
///
/// ```
/// use hokusai_error::{ExpressionError, ExpressionErrorKind};
///
/// let err = ExpressionError::new(ExpressionErrorKind::UndefinedParameter("flag".into()));
/// assert!(format!("{}", err).contains("flag"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Expression Error: {} at line {} in {}", kind, line, file)]
pub struct ExpressionError {
    /// The specific error condition
    pub kind: ExpressionErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ExpressionError {
    /// Create a new ExpressionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExpressionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ExpressionErrorKind {
        &self.kind
    }
}
