//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the hokusai binary.

mod check;
mod commands;
mod run;

pub use check::check_scripts;
pub use commands::{CheckArgs, Cli, Commands, RunArgs};
pub use run::run_scenario;

use hokusai::{HokusaiConfig, HokusaiResult};
use std::path::Path;

/// Configuration from an explicit file, or the layered lookup.
fn load_config(path: Option<&Path>) -> HokusaiResult<HokusaiConfig> {
    match path {
        Some(path) => HokusaiConfig::from_file(path),
        None => HokusaiConfig::load(),
    }
}
