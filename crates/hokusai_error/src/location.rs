//! Row context attached to script authoring errors.

/// Where in a script an authoring error originated.
///
/// Rows are reported 1-based, the way a designer sees them in a spreadsheet.
///
/// # Examples
///
/// ```
/// use hokusai_error::RowContext;
///
/// let ctx = RowContext::new("chapter1", 12);
/// assert_eq!(format!("{}", ctx), "chapter1:12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("{}:{}", source, row_number)]
pub struct RowContext {
    /// Name of the table the row belongs to
    pub source: String,
    /// 1-based row number
    pub row_number: usize,
}

impl RowContext {
    /// Create a row context from a table name and a 1-based row number.
    pub fn new(source: impl Into<String>, row_number: usize) -> Self {
        Self {
            source: source.into(),
            row_number,
        }
    }
}
