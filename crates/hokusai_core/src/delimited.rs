//! Delimited-text tokenizer for script tables.
//!
//! Backed by the `csv` reader: quoted fields are taken literally, including
//! delimiters and line breaks, a doubled quote inside a quoted field is a
//! literal quote, and rows end at `\n` or `\r\n` outside quotes.

use hokusai_error::{HokusaiResult, RowContext, TableError, TableErrorKind};
use serde::{Deserialize, Serialize};

/// Cell separator of a delimited table.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Delimiter {
    /// Comma-separated values
    #[default]
    Comma,
    /// Tab-separated values
    Tab,
}

impl Delimiter {
    /// The separator character.
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }

    /// The separator byte handed to the reader.
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }

    /// Pick the delimiter from a file extension (`tsv` selects tabs).
    pub fn from_extension(ext: &str) -> Self {
        if ext.eq_ignore_ascii_case("tsv") {
            Delimiter::Tab
        } else {
            Delimiter::Comma
        }
    }
}

/// Split delimited text into rows of cells.
///
/// Rows may be ragged. Blank lines are dropped, so a row's position is its
/// record number rather than its line number. `source` is only used for
/// error context.
///
/// # Errors
///
/// Returns an error if the reader rejects a record.
///
/// # Examples
///
/// ```
/// use hokusai_core::{tokenize, Delimiter};
///
/// let rows = tokenize("a,\"b,c\"\r\n\"say \"\"hi\"\"\",d\n", Delimiter::Comma, "demo").unwrap();
/// assert_eq!(rows, vec![
///     vec!["a".to_string(), "b,c".to_string()],
///     vec!["say \"hi\"".to_string(), "d".to_string()],
/// ]);
/// ```
pub fn tokenize(
    text: &str,
    delimiter: Delimiter,
    source: &str,
) -> HokusaiResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            let row = e
                .position()
                .map_or(index + 1, |position| position.record() as usize + 1);
            TableError::new(TableErrorKind::Malformed {
                context: RowContext::new(source, row),
                reason: e.to_string(),
            })
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}
