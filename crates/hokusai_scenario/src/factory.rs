//! Command factory: turns one table row into a command.

use crate::commands::{BuiltinTag, CharacterCommand, LABEL_SIGIL, ScenarioLabelCommand, TextCommand};
use crate::{CharacterSettings, Command};
use hokusai_core::{AssetDirectories, Column, Row};
use hokusai_error::{CommandError, CommandErrorKind, HokusaiResult};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tag that marks a row as a comment.
pub const COMMENT_TAG: &str = "Comment";

/// Constructor for a host-defined command tag.
pub type CommandConstructor =
    Arc<dyn Fn(&Row<'_>, &CommandSettings) -> HokusaiResult<Arc<dyn Command>> + Send + Sync>;

/// Lookup tables every command constructor may consult.
#[derive(Debug, Clone, Default)]
pub struct CommandSettings {
    /// Where each asset category lives
    pub assets: AssetDirectories,
    /// Character display names and textures
    pub characters: CharacterSettings,
}

/// Maps the Command cell of a row to a command.
///
/// Host-registered tags are tried before the built-ins, so a host may replace
/// any built-in command.
///
/// # Examples
///
/// ```
/// use hokusai_core::{CellTable, Delimiter};
/// use hokusai_scenario::{CommandFactory, CommandSettings};
///
/// let table = CellTable::from_delimited(
///     "intro",
///     "Command,Arg1,Text\n*intro,Opening,\n,,Hello\n//,,note\n",
///     Delimiter::Comma,
/// ).unwrap();
/// let factory = CommandFactory::new();
/// let settings = CommandSettings::default();
/// let made: Vec<_> = table
///     .data_rows()
///     .map(|row| factory.create(&row, &settings).unwrap().map(|c| c.tag().to_string()))
///     .collect();
/// assert_eq!(made, vec![Some("ScenarioLabel".to_string()), Some("Text".to_string()), None]);
/// ```
#[derive(Clone, Default)]
pub struct CommandFactory {
    custom: HashMap<String, CommandConstructor>,
}

impl std::fmt::Debug for CommandFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<&String> = self.custom.keys().collect();
        tags.sort();
        f.debug_struct("CommandFactory")
            .field("custom", &tags)
            .finish()
    }
}

impl CommandFactory {
    /// Create a factory that knows only the built-in tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for a host-defined tag.
    ///
    /// A constructor already registered for the tag is replaced and a warning
    /// logged.
    #[tracing::instrument(skip(self, constructor))]
    pub fn register(&mut self, tag: &str, constructor: CommandConstructor) {
        if self.custom.contains_key(tag) {
            warn!(tag, "Command tag already registered, overwriting previous registration");
        } else {
            debug!("Registering command tag");
        }
        self.custom.insert(tag.to_string(), constructor);
    }

    /// Whether a host-defined tag is registered.
    pub fn is_registered(&self, tag: &str) -> bool {
        self.custom.contains_key(tag)
    }

    /// Build the command for a row.
    ///
    /// Returns `Ok(None)` for rows that carry no command: blank rows, comments
    /// and tag-less rows without a character or text.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown tag, a bare label sigil, or arguments
    /// the command cannot use.
    pub fn create(
        &self,
        row: &Row<'_>,
        settings: &CommandSettings,
    ) -> HokusaiResult<Option<Arc<dyn Command>>> {
        let Some(tag) = row.cell(Column::Command).map(str::trim) else {
            return self.infer(row, settings);
        };

        if tag == COMMENT_TAG || tag.starts_with("//") {
            return Ok(None);
        }

        if let Some(constructor) = self.custom.get(tag) {
            return constructor(row, settings).map(Some);
        }

        if let Some(label) = tag.strip_prefix(LABEL_SIGIL) {
            if label.is_empty() {
                return Err(CommandError::new(CommandErrorKind::InvalidLabel {
                    context: row.context(),
                    raw: tag.to_string(),
                })
                .into());
            }
            return Ok(Some(Arc::new(ScenarioLabelCommand::from_row(label, row))));
        }

        match BuiltinTag::from_str(tag) {
            Ok(builtin) => builtin.build(row, settings).map(Some),
            Err(_) => Err(CommandError::new(CommandErrorKind::UnknownTag {
                context: row.context(),
                tag: tag.to_string(),
            })
            .into()),
        }
    }

    fn infer(
        &self,
        row: &Row<'_>,
        settings: &CommandSettings,
    ) -> HokusaiResult<Option<Arc<dyn Command>>> {
        if !row.is_empty_cell(Column::Arg1) {
            return Ok(Some(Arc::new(CharacterCommand::from_row(row, settings)?)));
        }
        if !row.is_empty_cell(Column::Text) {
            return Ok(Some(Arc::new(TextCommand::from_row(row, settings)?)));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExecutionContext;
    use hokusai_core::{CellTable, Delimiter};
    use hokusai_error::{HokusaiErrorKind, RowContext};

    #[derive(Debug)]
    struct Shake {
        context: RowContext,
    }

    impl Command for Shake {
        fn tag(&self) -> &str {
            "Shake"
        }

        fn context(&self) -> &RowContext {
            &self.context
        }

        fn execute(&self, _ctx: &mut ExecutionContext<'_>) {}
    }

    fn table(text: &str) -> CellTable {
        CellTable::from_delimited("test", text, Delimiter::Comma).unwrap()
    }

    fn tag_of(factory: &CommandFactory, table: &CellTable, index: usize) -> Option<String> {
        let row = table.row(index).unwrap();
        factory
            .create(&row, &CommandSettings::default())
            .unwrap()
            .map(|command| command.tag().to_string())
    }

    #[test]
    fn test_tagless_rows_infer_character_then_text() {
        let table = table("Command,Arg1,Text\n,ann,Hi\n,,Narration\n,,\n");
        let factory = CommandFactory::new();
        assert_eq!(tag_of(&factory, &table, 1).as_deref(), Some("Character"));
        assert_eq!(tag_of(&factory, &table, 2).as_deref(), Some("Text"));
        assert_eq!(tag_of(&factory, &table, 3), None);
    }

    #[test]
    fn test_builtin_tags_match_case_exactly() {
        let table = table("Command,Arg1,Arg6\nWait,,1.5\nwait,,1.5\nENDIF,,\n");
        let factory = CommandFactory::new();
        let settings = CommandSettings::default();
        assert_eq!(tag_of(&factory, &table, 1).as_deref(), Some("Wait"));
        assert!(factory.create(&table.row(2).unwrap(), &settings).is_err());
        assert!(factory.create(&table.row(3).unwrap(), &settings).is_err());
    }

    #[test]
    fn test_unknown_tag_reports_row() {
        let table = table("Command,Arg1\nTeleport,x\n");
        let factory = CommandFactory::new();
        let err = factory
            .create(&table.row(1).unwrap(), &CommandSettings::default())
            .unwrap_err();
        match err.kind() {
            HokusaiErrorKind::Command(e) => match e.kind() {
                CommandErrorKind::UnknownTag { context, tag } => {
                    assert_eq!(context.row_number, 2);
                    assert_eq!(tag, "Teleport");
                }
                other => panic!("unexpected kind {other:?}"),
            },
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_bare_sigil_is_invalid_label() {
        let table = table("Command\n*\n");
        let factory = CommandFactory::new();
        assert!(
            factory
                .create(&table.row(1).unwrap(), &CommandSettings::default())
                .is_err()
        );
    }

    #[test]
    fn test_custom_tag_is_tried_first() {
        let table = table("Command\nShake\nWait\n");
        let mut factory = CommandFactory::new();
        let shake: CommandConstructor = Arc::new(|row: &Row<'_>, _: &CommandSettings| {
            Ok(Arc::new(Shake {
                context: row.context(),
            }) as Arc<dyn Command>)
        });
        factory.register("Shake", shake.clone());
        factory.register("Wait", shake);
        assert_eq!(tag_of(&factory, &table, 1).as_deref(), Some("Shake"));
        assert_eq!(tag_of(&factory, &table, 2).as_deref(), Some("Shake"));
        assert!(factory.is_registered("Wait"));
    }

    #[test]
    fn test_same_row_builds_same_shape() {
        let table = table("Command,Arg1,Text\nBg,room,\n,ann,Hello\n");
        let factory = CommandFactory::new();
        let settings = CommandSettings::default();
        for index in 1..table.len() {
            let row = table.row(index).unwrap();
            let a = factory.create(&row, &settings).unwrap().unwrap();
            let b = factory.create(&row, &settings).unwrap().unwrap();
            assert_eq!(a.declared_resources(), b.declared_resources());
            assert_eq!(a.is_page_boundary(), b.is_page_boundary());
        }
    }
}
