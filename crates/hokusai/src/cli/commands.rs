//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Hokusai - play and check table-driven visual novel scenarios
#[derive(Parser, Debug)]
#[command(name = "hokusai")]
#[command(about = "Play and check table-driven visual novel scenarios", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a scenario headlessly, printing what the player would see
    Run(RunArgs),

    /// Compile scripts and report labels and authoring errors
    Check(CheckArgs),
}

/// Arguments for `hokusai run`
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Script tables to load (.csv or .tsv)
    #[arg(long = "script", required = true, num_args = 1..)]
    pub scripts: Vec<PathBuf>,

    /// Label to start at, with or without the leading '*'
    #[arg(long)]
    pub label: String,

    /// Page within the label to resume at
    #[arg(long, default_value_t = 0)]
    pub page: i32,

    /// Selection picks to answer with, in order (e.g. 0,1,0)
    #[arg(long, value_delimiter = ',')]
    pub choices: Vec<usize>,

    /// Play as this scene-gallery scene
    #[arg(long)]
    pub gallery: Option<String>,

    /// Configuration file (defaults to the layered hokusai.toml lookup)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read-history JSON file, loaded before and saved after the run
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Directory asset paths are resolved against
    #[arg(long, default_value = ".")]
    pub asset_root: PathBuf,
}

/// Arguments for `hokusai check`
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Script tables to compile
    #[arg(long = "script", required = true, num_args = 1..)]
    pub scripts: Vec<PathBuf>,

    /// Configuration file (defaults to the layered hokusai.toml lookup)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_arguments_parse() {
        let cli = Cli::try_parse_from([
            "hokusai", "run", "--script", "a.csv", "b.tsv", "--label", "*intro", "--page", "2",
            "--choices", "0,1", "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.scripts, vec![PathBuf::from("a.csv"), PathBuf::from("b.tsv")]);
        assert_eq!(args.label, "*intro");
        assert_eq!(args.page, 2);
        assert_eq!(args.choices, vec![0, 1]);
        assert_eq!(args.asset_root, PathBuf::from("."));
    }

    #[test]
    fn test_check_requires_a_script() {
        assert!(Cli::try_parse_from(["hokusai", "check"]).is_err());
    }
}
