//! Hokusai CLI binary.
//!
//! This binary provides command-line access to the scenario engine:
//! - Play a scenario headlessly, printing presentation calls
//! - Check scripts for authoring errors

use clap::Parser;
use hokusai::logging::{LoggingConfig, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, check_scripts, run_scenario};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    init_logging(
        &LoggingConfig::new()
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs),
    )?;

    // Execute the requested command
    match cli.command {
        Commands::Run(args) => {
            run_scenario(&args).await?;
        }

        Commands::Check(args) => {
            let problems = check_scripts(&args)?;
            if problems > 0 {
                return Err(format!("{} authoring error(s) found", problems).into());
            }
        }
    }

    Ok(())
}
