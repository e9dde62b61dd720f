//! Scenario interpreter for the hokusai engine.
//!
//! Tables of rows become [`Scenario`]s of commands through the
//! [`CommandFactory`]; the [`ScenarioPlayer`] walks them, consulting the
//! [`IfStack`] and driving each [`Command`] through its load, execute, wait
//! and release lifecycle.
//!
//! # Features
//!
//! - **Extensible dispatch**: host-defined tags are tried before built-ins
//! - **Conditional skipping**: nested If / ElseIf / Else / EndIf
//! - **Preloading**: a capped window of resources for upcoming commands
//! - **Save and resume**: label and page cursor, read history, autosave hook
//!
//! # Example
//!
//! ```
//! use hokusai_core::{CellTable, Delimiter};
//! use hokusai_scenario::{CommandFactory, CommandSettings, Scenario};
//!
//! let table = CellTable::from_delimited(
//!     "intro",
//!     "Command,Arg1,Text\n*intro,,\nSelection,*left,Go left\nSelection,*right,Go right\n",
//!     Delimiter::Comma,
//! ).unwrap();
//! let scenario = Scenario::compile(&table, &CommandFactory::new(), &CommandSettings::default());
//! assert_eq!(scenario.len(), 4);
//! assert_eq!(scenario.command(3).unwrap().tag(), "SelectionEnd");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod characters;
mod command;
pub mod commands;
mod config;
mod corpus;
mod factory;
mod history;
mod if_stack;
mod ledger;
mod player;
mod preload;
mod scenario;
mod source;

pub use characters::{CharacterInfo, CharacterSettings};
pub use command::{Command, ExecutionContext, PlayerRequest};
pub use commands::BuiltinTag;
pub use config::{HokusaiConfig, PlayerConfig, PlayerConfigBuilder, ScriptConfig};
pub use corpus::ScenarioCorpus;
pub use factory::{COMMENT_TAG, CommandConstructor, CommandFactory, CommandSettings};
pub use history::ReadHistory;
pub use if_stack::IfStack;
pub use ledger::ResourceLedger;
pub use player::{LABEL_START_PAGE, PlayerState, ScenarioPlayer, SuspendReason, TickStatus};
pub use preload::PreloadWindow;
pub use scenario::Scenario;
pub use source::InMemoryScenarioSource;
