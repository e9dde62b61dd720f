//! Command construction error types.

use crate::RowContext;

/// Specific error conditions raised while building commands from rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CommandErrorKind {
    /// Command tag matches neither a custom nor a built-in command
    #[display("{}: unknown command '{}'", context, tag)]
    UnknownTag {
        /// Offending row
        context: RowContext,
        /// Raw tag text
        tag: String,
    },
    /// Label cell lacks the `*` sigil or is too short
    #[display("{}: '{}' is not a scenario label", context, raw)]
    InvalidLabel {
        /// Offending row
        context: RowContext,
        /// Raw cell text
        raw: String,
    },
    /// Argument present but unusable for this command
    #[display("{}: invalid argument for {}: {}", context, tag, reason)]
    InvalidArgument {
        /// Offending row
        context: RowContext,
        /// Command tag
        tag: String,
        /// Why the argument was rejected
        reason: String,
    },
    /// Constructor registered for a tag failed for a reason of its own
    #[display("{}: {} could not be built: {}", context, tag, message)]
    Construction {
        /// Offending row
        context: RowContext,
        /// Command tag
        tag: String,
        /// Underlying failure
        message: String,
    },
}

/// Error type for command construction.
///
/// # Examples
///
/// ```
/// use hokusai_error::{CommandError, CommandErrorKind, RowContext};
///
/// let err = CommandError::new(CommandErrorKind::UnknownTag {
///     context: RowContext::new("intro", 3),
///     tag: "Teleport".to_string(),
/// });
/// assert!(format!("{}", err).contains("Teleport"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Command Error: {} at line {} in {}", kind, line, file)]
pub struct CommandError {
    /// The specific error condition
    pub kind: CommandErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl CommandError {
    /// Create a new CommandError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CommandErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CommandErrorKind {
        &self.kind
    }
}
