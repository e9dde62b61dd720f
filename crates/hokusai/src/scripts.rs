//! Reading script and settings tables from disk.

use hokusai_core::CellTable;
use hokusai_error::{HokusaiResult, PersistenceError};
use hokusai_scenario::{
    CharacterSettings, CommandFactory, CommandSettings, HokusaiConfig, InMemoryScenarioSource,
    ScenarioCorpus, ScriptConfig,
};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Read one delimited table. The table is named after the file stem.
///
/// # Errors
///
/// Returns an error if the file cannot be read or has an unterminated quote.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_table(path: impl AsRef<Path>, config: &ScriptConfig) -> HokusaiResult<CellTable> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        PersistenceError::new(
            format!("Failed to read script: {}", e),
            path.display().to_string(),
        )
    })?;
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("script")
        .to_string();
    let table = CellTable::from_delimited(name, &text, config.delimiter_for(path))?
        .with_header_row(*config.header_row());
    debug!(rows = table.len(), "Loaded table");
    Ok(table)
}

/// Read script files into a source with every table resident.
///
/// # Errors
///
/// Returns the first file that fails to load.
pub fn load_scripts<P: AsRef<Path>>(
    paths: &[P],
    config: &ScriptConfig,
) -> HokusaiResult<InMemoryScenarioSource> {
    let mut source = InMemoryScenarioSource::new();
    for path in paths {
        source.add_table(load_table(path, config)?);
    }
    info!(tables = paths.len(), "Scripts loaded");
    Ok(source)
}

/// Read the character settings table named in the script config, if any.
///
/// # Errors
///
/// Returns an error if the configured file cannot be loaded.
pub fn load_characters(config: &ScriptConfig) -> HokusaiResult<CharacterSettings> {
    match config.characters() {
        Some(path) => {
            let table = load_table(path, config)?;
            let characters = CharacterSettings::from_table(&table);
            debug!(characters = characters.len(), "Loaded character settings");
            Ok(characters)
        }
        None => Ok(CharacterSettings::new()),
    }
}

/// Corpus with the built-in commands and the configured asset layout.
///
/// # Errors
///
/// Returns an error if the character settings cannot be loaded.
pub fn build_corpus(config: &HokusaiConfig) -> HokusaiResult<ScenarioCorpus> {
    let settings = CommandSettings {
        assets: config.assets().clone(),
        characters: load_characters(config.script())?,
    };
    Ok(ScenarioCorpus::new(CommandFactory::new(), settings))
}
