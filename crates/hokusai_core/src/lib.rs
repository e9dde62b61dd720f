//! Core data types for the hokusai scenario engine.
//!
//! This crate holds the tabular script store (cell tables, the delimited-text
//! tokenizer and typed row access), resource handles with asset path
//! resolution, and the parameter store with its small expression language.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod column;
mod delimited;
mod expression;
mod params;
mod resource;
mod table;

pub use column::Column;
pub use delimited::{Delimiter, tokenize};
pub use expression::{Expression, Statements};
pub use params::{ParamStore, Value};
pub use resource::{
    AssetCategory, AssetDirectories, AssetDirectory, ResourceHandle, ResourceKind,
};
pub use table::{CellTable, CellValue, Row};
