//! In-memory cell table and the row view commands are built from.

use crate::{Delimiter, tokenize};
use hokusai_error::{HokusaiResult, RowContext, TableError, TableErrorKind};
use std::collections::HashMap;
use tracing::{debug, error, instrument};

/// A grid of string cells with a header row naming the columns.
///
/// Rows may be ragged; a missing trailing cell reads as empty. The table is
/// built once by an importer and only read afterwards.
///
/// # Examples
///
/// ```
/// use hokusai_core::{CellTable, Delimiter};
///
/// let table = CellTable::from_delimited("intro", "Command,Arg1,Text\n,,Hello\n", Delimiter::Comma).unwrap();
/// assert_eq!(table.try_column_index("Text"), Some(2));
/// assert_eq!(table.try_column_index("Voice"), None);
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct CellTable {
    /// Source name used in error context
    name: String,
    /// All rows, header included
    rows: Vec<Vec<String>>,
    /// Index of the header row
    header_row: usize,
    #[getter(skip)]
    header: HashMap<String, usize>,
}

impl CellTable {
    /// Create a table whose first row is the header.
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        let mut table = Self {
            name: name.into(),
            rows,
            header_row: 0,
            header: HashMap::new(),
        };
        table.parse_header();
        table
    }

    /// Use a different row as the header.
    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self.parse_header();
        self
    }

    /// Tokenize delimited text into a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the text contains an unterminated quoted field.
    #[instrument(skip(text), fields(len = text.len()))]
    pub fn from_delimited(
        name: impl Into<String> + std::fmt::Debug,
        text: &str,
        delimiter: Delimiter,
    ) -> HokusaiResult<Self> {
        let name = name.into();
        let rows = tokenize(text, delimiter, &name)?;
        debug!(rows = rows.len(), "Tokenized table");
        Ok(Self::new(name, rows))
    }

    /// Rebuild the column-name index from the header row.
    ///
    /// Blank header cells are ignored and the first occurrence of a duplicate
    /// name wins. Calling this again yields the same index.
    pub fn parse_header(&mut self) {
        self.header.clear();
        let Some(cells) = self.rows.get(self.header_row) else {
            return;
        };
        for (index, cell) in cells.iter().enumerate() {
            let name = cell.trim();
            if name.is_empty() {
                continue;
            }
            self.header.entry(name.to_string()).or_insert(index);
        }
    }

    /// Zero-based index of a header, if declared.
    pub fn try_column_index(&self, name: &str) -> Option<usize> {
        self.header.get(name).copied()
    }

    /// First row holding data rather than headers.
    pub fn data_top_row(&self) -> usize {
        self.header_row + 1
    }

    /// Number of rows, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// View of the row at `index`.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.rows.len()).then_some(Row { table: self, index })
    }

    /// Rows below the header, in order.
    pub fn data_rows(&self) -> impl Iterator<Item = Row<'_>> {
        (self.data_top_row()..self.rows.len()).map(move |index| Row { table: self, index })
    }
}

/// A value that can be read out of a cell.
pub trait CellValue: Sized {
    /// Name used in parse error messages.
    const TYPE_NAME: &'static str;

    /// Convert non-empty cell text, or `None` if it is malformed.
    fn from_cell(raw: &str) -> Option<Self>;
}

impl CellValue for String {
    const TYPE_NAME: &'static str = "text";

    fn from_cell(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl CellValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_cell(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

macro_rules! numeric_cell {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl CellValue for $ty {
                const TYPE_NAME: &'static str = $name;

                fn from_cell(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

numeric_cell!(i32 => "integer", i64 => "integer", u32 => "integer", usize => "integer", f32 => "number", f64 => "number");

/// One row of a [`CellTable`], with typed access by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a CellTable,
    index: usize,
}

impl<'a> Row<'a> {
    /// The table this row belongs to.
    pub fn table(&self) -> &'a CellTable {
        self.table
    }

    /// Zero-based row index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based row number, as shown in a spreadsheet.
    pub fn row_number(&self) -> usize {
        self.index + 1
    }

    /// Error context for this row.
    pub fn context(&self) -> RowContext {
        RowContext::new(self.table.name.as_str(), self.row_number())
    }

    /// Raw cells of the row.
    pub fn cells(&self) -> &'a [String] {
        &self.table.rows[self.index]
    }

    /// Whether every cell is empty or whitespace.
    pub fn is_empty(&self) -> bool {
        self.cells().iter().all(|cell| cell.trim().is_empty())
    }

    /// Raw text of a cell, `None` when the column is undeclared, the row is too
    /// short, or the cell is blank.
    pub fn cell(&self, column: impl AsRef<str>) -> Option<&'a str> {
        let index = self.table.try_column_index(column.as_ref())?;
        let cell = self.cells().get(index)?;
        (!cell.trim().is_empty()).then_some(cell.as_str())
    }

    /// Whether a cell is missing or blank.
    pub fn is_empty_cell(&self, column: impl AsRef<str>) -> bool {
        self.cell(column).is_none()
    }

    /// Read a required cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is undeclared, the cell is blank, or the
    /// text does not convert to `T`.
    pub fn parse<T: CellValue>(&self, column: impl AsRef<str>) -> HokusaiResult<T> {
        let column = column.as_ref();
        if self.table.try_column_index(column).is_none() {
            return Err(TableError::new(TableErrorKind::MissingColumn {
                context: self.context(),
                column: column.to_string(),
            })
            .into());
        }
        match self.cell(column) {
            Some(raw) => self.convert(column, raw),
            None => Err(TableError::new(TableErrorKind::EmptyCell {
                context: self.context(),
                column: column.to_string(),
            })
            .into()),
        }
    }

    /// Read an optional cell, falling back to `default` when it is missing or
    /// blank.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell has text that does not convert to `T`.
    pub fn parse_optional<T: CellValue>(
        &self,
        column: impl AsRef<str>,
        default: T,
    ) -> HokusaiResult<T> {
        let column = column.as_ref();
        match self.cell(column) {
            Some(raw) => self.convert(column, raw),
            None => Ok(default),
        }
    }

    /// Read a cell if it is present and well formed.
    ///
    /// Malformed text is logged with row context and reads as `None`.
    pub fn try_parse<T: CellValue>(&self, column: impl AsRef<str>) -> Option<T> {
        let column = column.as_ref();
        self.cell(column)
            .and_then(|raw| self.convert(column, raw).ok())
    }

    /// Cells joined for log output, prefixed with the row number.
    pub fn to_debug_string(&self) -> String {
        format!("{}: {}", self.row_number(), self.cells().join(" | "))
    }

    fn convert<T: CellValue>(&self, column: &str, raw: &str) -> HokusaiResult<T> {
        T::from_cell(raw).ok_or_else(|| {
            error!(
                source = %self.table.name,
                row = self.row_number(),
                column,
                raw,
                expected = T::TYPE_NAME,
                "Malformed cell"
            );
            TableError::new(TableErrorKind::Unparseable {
                context: self.context(),
                column: column.to_string(),
                raw: raw.to_string(),
                expected: T::TYPE_NAME,
            })
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> CellTable {
        CellTable::new(
            "test",
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_header_ignores_blanks_and_keeps_first_duplicate() {
        let t = table(&[&["Command", "", "Text", "Text", " Arg1 "]]);
        assert_eq!(t.try_column_index("Command"), Some(0));
        assert_eq!(t.try_column_index("Text"), Some(2));
        assert_eq!(t.try_column_index("Arg1"), Some(4));
        assert_eq!(t.try_column_index(""), None);
        assert_eq!(t.try_column_index("command"), None);
    }

    #[test]
    fn test_parse_header_is_idempotent() {
        let mut t = table(&[&["A", "B"]]);
        t.parse_header();
        t.parse_header();
        assert_eq!(t.try_column_index("B"), Some(1));
    }

    #[test]
    fn test_ragged_row_reads_missing_cells_as_empty() {
        let t = table(&[&["Command", "Arg1", "Arg6"], &["Wait"]]);
        let row = t.row(1).unwrap();
        assert!(row.is_empty_cell("Arg6"));
        assert_eq!(row.parse_optional("Arg6", 0.5f32).unwrap(), 0.5);
    }

    #[test]
    fn test_typed_access() {
        let t = table(&[&["Arg1", "Arg2", "Arg3"], &["12", "True", "x"]]);
        let row = t.row(1).unwrap();
        assert_eq!(row.parse::<i32>("Arg1").unwrap(), 12);
        assert!(row.parse::<bool>("Arg2").unwrap());
        assert!(row.parse::<f32>("Arg3").is_err());
        assert!(row.parse_optional::<f32>("Arg3", 1.0).is_err());
        assert_eq!(row.try_parse::<f32>("Arg3"), None);
        assert!(row.parse::<String>("Missing").is_err());
    }

    #[test]
    fn test_whitespace_row_is_empty() {
        let t = table(&[&["A", "B"], &["  ", "\t"]]);
        assert!(t.row(1).unwrap().is_empty());
        assert_eq!(t.data_rows().count(), 1);
    }

    #[test]
    fn test_row_context_is_one_based() {
        let t = table(&[&["A"], &["x"]]);
        assert_eq!(t.row(1).unwrap().context(), RowContext::new("test", 2));
    }
}
