//! Scenario control-flow error types.

/// Specific error conditions detected while compiling or playing a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ScenarioErrorKind {
    /// Label is not defined by any loaded table
    #[display("Scenario label '{}' is not defined", _0)]
    UndefinedLabel(String),
    /// Label defined twice across the corpus; the first definition wins
    #[display("Scenario label '{}' is defined more than once (first in {})", label, first)]
    DuplicateLabel {
        /// Label name
        label: String,
        /// Table holding the definition that is kept
        first: String,
    },
    /// EndIf, ElseIf or Else executed with no open If
    #[display("{} without a matching If", _0)]
    UnmatchedConditional(String),
    /// Requested page lies beyond the pages the label defines
    #[display("Page {} is out of range for label '{}'", page, label)]
    PageOutOfRange {
        /// Label name
        label: String,
        /// Requested page
        page: i32,
    },
    /// A new gallery scene started before the previous one ended
    #[display("Gallery scene '{}' replaced by '{}' before it ended", previous, next)]
    GalleryOverwritten {
        /// Scene that was still open
        previous: String,
        /// Scene that replaced it
        next: String,
    },
    /// EndSceneGallery executed outside a gallery scene
    #[display("EndSceneGallery outside a registered gallery scene")]
    NoGalleryScene,
}

/// Error type for scenario control flow.
///
/// # Examples
///
/// ```
/// use hokusai_error::{ScenarioError, ScenarioErrorKind};
///
/// let err = ScenarioError::new(ScenarioErrorKind::UndefinedLabel("ending".to_string()));
/// assert!(format!("{}", err).contains("ending"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Scenario Error: {} at line {} in {}", kind, line, file)]
pub struct ScenarioError {
    /// The specific error condition
    pub kind: ScenarioErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ScenarioError {
    /// Create a new ScenarioError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ScenarioErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
