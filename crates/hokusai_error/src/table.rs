//! Tabular script store error types.

use crate::RowContext;

/// Specific error conditions for cell table access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TableErrorKind {
    /// Column is not declared in the header row
    #[display("{}: column '{}' is not declared in the header", context, column)]
    MissingColumn {
        /// Row being read
        context: RowContext,
        /// Requested column name
        column: String,
    },
    /// Required cell is empty
    #[display("{}: required cell '{}' is empty", context, column)]
    EmptyCell {
        /// Row being read
        context: RowContext,
        /// Requested column name
        column: String,
    },
    /// Cell text could not be converted to the requested type
    #[display("{}: cannot read '{}' in column '{}' as {}", context, raw, column, expected)]
    Unparseable {
        /// Row being read
        context: RowContext,
        /// Column name
        column: String,
        /// Raw cell text
        raw: String,
        /// Name of the expected type
        expected: &'static str,
    },
    /// Delimited text could not be read
    #[display("{}: malformed record: {}", context, reason)]
    Malformed {
        /// Record that failed
        context: RowContext,
        /// Reader message
        reason: String,
    },
}

/// Error type for cell table operations.
///
/// # Examples
///
/// ```
/// use hokusai_error::{RowContext, TableError, TableErrorKind};
///
/// let err = TableError::new(TableErrorKind::EmptyCell {
///     context: RowContext::new("intro", 4),
///     column: "Arg1".to_string(),
/// });
/// assert!(format!("{}", err).contains("intro:4"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Table Error: {} at line {} in {}", kind, line, file)]
pub struct TableError {
    /// The specific error condition
    pub kind: TableErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl TableError {
    /// Create a new TableError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TableErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TableErrorKind {
        &self.kind
    }
}
