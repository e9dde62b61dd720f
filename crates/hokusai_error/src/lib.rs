//! Error types for the hokusai scenario engine.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Script authoring errors carry a [`RowContext`] naming the table and the
//! 1-based row so designers can find the offending cell.
//!
//! # Examples
//!
//! ```
//! use hokusai_error::{HokusaiResult, RowContext, TableError, TableErrorKind};
//!
//! fn read_arg() -> HokusaiResult<String> {
//!     Err(TableError::new(TableErrorKind::EmptyCell {
//!         context: RowContext::new("intro", 2),
//!         column: "Arg1".into(),
//!     }))?
//! }
//!
//! assert!(read_arg().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod command;
mod config;
mod error;
mod expression;
mod location;
mod scenario;
mod table;

pub use builder::{BuilderError, BuilderErrorKind};
pub use command::{CommandError, CommandErrorKind};
pub use config::{ConfigError, PersistenceError};
pub use error::{HokusaiError, HokusaiErrorKind, HokusaiResult};
pub use expression::{ExpressionError, ExpressionErrorKind};
pub use location::RowContext;
pub use scenario::{ScenarioError, ScenarioErrorKind};
pub use table::{TableError, TableErrorKind};
