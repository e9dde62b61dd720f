//! Script checker.

use super::{CheckArgs, load_config};
use hokusai::{HokusaiResult, build_corpus, load_table};
use tracing::instrument;

/// Compile every script, print its labels and authoring errors, and return
/// the number of errors found.
#[instrument(skip_all, fields(scripts = args.scripts.len()))]
pub fn check_scripts(args: &CheckArgs) -> HokusaiResult<usize> {
    let config = load_config(args.config.as_deref())?;
    let mut corpus = build_corpus(&config)?;

    let mut problems = 0;
    for path in &args.scripts {
        let table = load_table(path, config.script())?;
        let scenario = corpus.compile_table(&table);
        println!(
            "{}: {} commands, {} labels",
            path.display(),
            scenario.len(),
            scenario.labels().count()
        );
        for (label, index) in scenario.labels() {
            println!("  *{} at command {}", label, index);
        }
        for diagnostic in scenario.diagnostics() {
            println!("  error: {}", diagnostic);
            problems += 1;
        }
    }

    Ok(problems)
}
