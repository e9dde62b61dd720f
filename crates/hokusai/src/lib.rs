//! Hokusai - table-driven visual novel scenario engine
//!
//! Scenarios are written as spreadsheet-style tables: one row per command,
//! a `Command` column naming the tag and argument columns after it. Hokusai
//! compiles those tables and plays them against a presentation host, loading
//! assets through a reference-counted provider.
//!
//! # Features
//!
//! - **Tabular scripts**: comma- or tab-separated tables with named columns
//! - **Branching**: `If` / `ElseIf` / `Else` / `EndIf`, selections and jumps
//! - **Parameters**: a typed store with a small expression language
//! - **Resumable**: label and page save points, read history, autosave hook
//! - **Headless**: every side effect goes through a trait, so runs are testable
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hokusai::{
//!     ConsoleHost, FileAssetLoader, HokusaiConfig, ResourceLedger, ScenarioPlayer, load_scripts,
//! };
//!
//! let config = HokusaiConfig::load()?;
//! let source = load_scripts(&["scripts/intro.csv"], config.script())?;
//! let mut player = ScenarioPlayer::new(
//!     ConsoleHost::stdout(vec![]),
//!     ResourceLedger::new(FileAssetLoader::new(".")),
//!     source,
//! );
//! player.start("intro", 0, None);
//! ```
//!
//! # Architecture
//!
//! Hokusai is organized as a workspace with focused crates:
//!
//! - `hokusai-error` - Error types
//! - `hokusai-core` - Cell tables, resource handles, parameters and expressions
//! - `hokusai-interface` - Host, resource, source and history traits
//! - `hokusai-scenario` - Command set, compiler and player
//!
//! This crate (`hokusai`) re-exports everything for convenience and adds the
//! pieces the command-line runner needs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod console;
mod loader;
pub mod logging;
mod scripts;

pub use console::ConsoleHost;
pub use loader::FileAssetLoader;
pub use scripts::{build_corpus, load_characters, load_scripts, load_table};

// Re-export workspace crates
pub use hokusai_core::*;
pub use hokusai_error::*;
pub use hokusai_interface::*;
pub use hokusai_scenario::*;
