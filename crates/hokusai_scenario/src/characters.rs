//! Character settings table: display names and the texture for each pattern.

use hokusai_core::{CellTable, Column};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Settings for one character.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct CharacterInfo {
    /// Name shown to the player
    display_name: String,
    /// Pattern key and texture file name, in table order
    #[getter(skip)]
    patterns: Vec<(String, String)>,
}

impl CharacterInfo {
    /// Texture file for a pattern, or for the default pattern when `None`.
    pub fn file_name(&self, pattern: Option<&str>) -> Option<&str> {
        match pattern {
            None => self.patterns.first().map(|(_, file)| file.as_str()),
            Some(pattern) => self
                .patterns
                .iter()
                .find(|(key, _)| key == pattern)
                .map(|(_, file)| file.as_str()),
        }
    }

    /// The first pattern listed for the character.
    pub fn default_pattern(&self) -> Option<&str> {
        self.patterns.first().map(|(key, _)| key.as_str())
    }
}

/// Characters known to the script, keyed by the name used in `Arg1`.
///
/// Rows name a character, a pattern, a display name and a texture file. A
/// blank character name continues the previous row's character; a blank
/// display name keeps the previous one for the same character.
///
/// # Examples
///
/// ```
/// use hokusai_core::CellTable;
/// use hokusai_scenario::CharacterSettings;
///
/// let table = CellTable::from_delimited(
///     "chars",
///     "CharacterName,Pattern,NameText,FileName\nann,smile,Ann,ann_smile\n,sad,,ann_sad\n",
///     Default::default(),
/// ).unwrap();
/// let settings = CharacterSettings::from_table(&table);
/// let ann = settings.get("ann").unwrap();
/// assert_eq!(ann.display_name(), "Ann");
/// assert_eq!(ann.file_name(None), Some("ann_smile"));
/// assert_eq!(ann.file_name(Some("sad")), Some("ann_sad"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterSettings {
    characters: HashMap<String, CharacterInfo>,
}

impl CharacterSettings {
    /// Create empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a settings table.
    #[instrument(skip(table), fields(source = %table.name()))]
    pub fn from_table(table: &CellTable) -> Self {
        let mut settings = Self::new();
        let mut previous_name: Option<String> = None;

        for row in table.data_rows() {
            if row.is_empty() {
                continue;
            }
            let name = match row.cell(Column::CharacterName) {
                Some(name) => name.trim().to_string(),
                None => match &previous_name {
                    Some(name) => name.clone(),
                    None => {
                        warn!(row = row.row_number(), "Character row without a name, skipped");
                        continue;
                    }
                },
            };
            let display_name = row.cell(Column::NameText).map(|text| text.to_string());
            let pattern = row.cell(Column::Pattern).map(|p| p.trim().to_string());
            let file_name = row
                .cell(Column::FileName)
                .map(|f| f.trim().to_string())
                .or_else(|| pattern.clone());

            settings.add(&name, display_name, pattern, file_name);
            previous_name = Some(name);
        }

        debug!(characters = settings.len(), "Loaded character settings");
        settings
    }

    /// Add a row of settings.
    pub fn add(
        &mut self,
        name: &str,
        display_name: Option<String>,
        pattern: Option<String>,
        file_name: Option<String>,
    ) {
        let info = self
            .characters
            .entry(name.to_string())
            .or_insert_with(|| CharacterInfo {
                display_name: name.to_string(),
                patterns: Vec::new(),
            });
        if let Some(display_name) = display_name {
            info.display_name = display_name;
        }
        if let (Some(pattern), Some(file_name)) = (pattern, file_name) {
            if info.patterns.iter().any(|(key, _)| *key == pattern) {
                warn!(character = name, pattern = %pattern, "Duplicate pattern, first one kept");
            } else {
                info.patterns.push((pattern, file_name));
            }
        }
    }

    /// Settings for a character.
    pub fn get(&self, name: &str) -> Option<&CharacterInfo> {
        self.characters.get(name)
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether no character is known.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
