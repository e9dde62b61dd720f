//! Top-level error wrapper types.

use crate::{
    BuilderError, CommandError, ConfigError, ExpressionError, PersistenceError, ScenarioError,
    TableError,
};

/// Every error condition the hokusai crates can report.
///
/// # Examples
///
/// ```
/// use hokusai_error::{HokusaiError, ScenarioError, ScenarioErrorKind};
///
/// let err: HokusaiError =
///     ScenarioError::new(ScenarioErrorKind::UndefinedLabel("finale".into())).into();
/// assert!(format!("{}", err).contains("finale"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum HokusaiErrorKind {
    /// Cell table access error
    #[from(TableError)]
    Table(TableError),
    /// Command construction error
    #[from(CommandError)]
    Command(CommandError),
    /// Scenario control-flow error
    #[from(ScenarioError)]
    Scenario(ScenarioError),
    /// Parameter expression error
    #[from(ExpressionError)]
    Expression(ExpressionError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Read-history persistence error
    #[from(PersistenceError)]
    Persistence(PersistenceError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Hokusai error with kind discrimination.
///
/// # Examples
///
/// ```
/// use hokusai_error::{ConfigError, HokusaiResult};
///
/// fn might_fail() -> HokusaiResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Hokusai Error: {}", _0)]
pub struct HokusaiError(Box<HokusaiErrorKind>);

impl HokusaiError {
    /// Create a new error from a kind.
    pub fn new(kind: HokusaiErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HokusaiErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to HokusaiErrorKind
impl<T> From<T> for HokusaiError
where
    T: Into<HokusaiErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for hokusai operations.
pub type HokusaiResult<T> = std::result::Result<T, HokusaiError>;
