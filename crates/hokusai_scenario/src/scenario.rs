//! A table compiled into an ordered command sequence.

use crate::{Command, CommandFactory, CommandSettings};
use hokusai_core::CellTable;
use hokusai_error::{HokusaiError, HokusaiResult, ScenarioError, ScenarioErrorKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Commands built from one table, addressable by index and by label.
///
/// Rows that fail to build are dropped; the errors are kept as diagnostics
/// so a checker can report every problem in one pass.
#[derive(Debug)]
pub struct Scenario {
    name: String,
    commands: Vec<Arc<dyn Command>>,
    labels: Vec<(String, usize)>,
    label_index: HashMap<String, usize>,
    diagnostics: Vec<HokusaiError>,
}

impl Scenario {
    /// Compile every data row of a table.
    ///
    /// A command that needs a terminator gets one inserted before the next
    /// command that is neither the terminator nor another command of the same
    /// kind, or at the end of the table.
    #[instrument(skip_all, fields(source = %table.name()))]
    pub fn compile(table: &CellTable, factory: &CommandFactory, settings: &CommandSettings) -> Self {
        let mut scenario = Self {
            name: table.name().clone(),
            commands: Vec::new(),
            labels: Vec::new(),
            label_index: HashMap::new(),
            diagnostics: Vec::new(),
        };
        let mut pending: Option<(String, Arc<dyn Command>)> = None;
        let mut depth = 0usize;

        for row in table.data_rows() {
            if row.is_empty() {
                continue;
            }
            let command = match factory.create(&row, settings) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    error!(row = %row.context(), raw = %row.to_debug_string(), error = %e, "Command dropped");
                    scenario.diagnostics.push(e);
                    continue;
                }
            };

            if let Some((opener, terminator)) = pending.take() {
                if command.tag() == opener || command.tag() == terminator.tag() {
                    if command.tag() == opener {
                        pending = Some((opener, terminator));
                    }
                } else {
                    scenario.commands.push(terminator);
                }
            }
            if let Some(terminator) = command.terminator() {
                pending.get_or_insert_with(|| (command.tag().to_string(), terminator));
            }

            match command.tag() {
                "If" => depth += 1,
                "EndIf" | "ElseIf" | "Else" if depth == 0 => {
                    let e = ScenarioError::new(ScenarioErrorKind::UnmatchedConditional(format!(
                        "{} at {}",
                        command.tag(),
                        command.context()
                    )));
                    warn!(row = %command.context(), tag = command.tag(), "Unmatched conditional");
                    scenario.diagnostics.push(e.into());
                }
                "EndIf" => depth -= 1,
                _ => {}
            }

            if let Some(label) = command.scenario_label() {
                scenario.add_label(label, scenario.commands.len());
            }
            scenario.commands.push(command);
        }

        if let Some((_, terminator)) = pending {
            scenario.commands.push(terminator);
        }
        if depth > 0 {
            warn!(open = depth, "If blocks left open at end of table");
            scenario.diagnostics.push(
                ScenarioError::new(ScenarioErrorKind::UnmatchedConditional(format!(
                    "{} If block(s) left open in {}",
                    depth, scenario.name
                )))
                .into(),
            );
        }

        debug!(
            commands = scenario.commands.len(),
            labels = scenario.labels.len(),
            diagnostics = scenario.diagnostics.len(),
            "Compiled scenario"
        );
        scenario
    }

    fn add_label(&mut self, label: &str, index: usize) {
        if self.label_index.contains_key(label) {
            let e = ScenarioError::new(ScenarioErrorKind::DuplicateLabel {
                label: label.to_string(),
                first: self.name.clone(),
            });
            error!(label, index, "Label defined twice in one table, first kept");
            self.diagnostics.push(e.into());
            return;
        }
        self.label_index.insert(label.to_string(), index);
        self.labels.push((label.to_string(), index));
    }

    /// Name of the table the scenario came from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the scenario has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Command at `index`, `None` past the end.
    pub fn command(&self, index: usize) -> Option<&Arc<dyn Command>> {
        self.commands.get(index)
    }

    /// Every command, in order.
    pub fn commands(&self) -> &[Arc<dyn Command>] {
        &self.commands
    }

    /// Index of the label command for `label`.
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.label_index.get(label).copied()
    }

    /// Labels in table order with their command indices.
    pub fn labels(&self) -> impl Iterator<Item = (&str, usize)> {
        self.labels.iter().map(|(label, index)| (label.as_str(), *index))
    }

    /// Errors collected while compiling.
    pub fn diagnostics(&self) -> &[HokusaiError] {
        &self.diagnostics
    }

    /// Index to resume `label` at `page`.
    ///
    /// Page 0 (or any negative page) is the label command itself; page `k`
    /// is the command after the `k`-th page boundary following the label.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is not in this scenario, or if the
    /// label has fewer than `page` boundaries before the next label.
    pub fn seek_page_index(&self, label: &str, page: i32) -> HokusaiResult<usize> {
        let start = self.label_index(label).ok_or_else(|| {
            ScenarioError::new(ScenarioErrorKind::UndefinedLabel(label.to_string()))
        })?;
        if page <= 0 {
            return Ok(start);
        }

        let mut boundaries = 0;
        for (index, command) in self.commands.iter().enumerate().skip(start + 1) {
            if command.scenario_label().is_some() {
                break;
            }
            if command.is_page_boundary() {
                boundaries += 1;
                if boundaries == page {
                    return Ok(index + 1);
                }
            }
        }
        Err(ScenarioError::new(ScenarioErrorKind::PageOutOfRange {
            label: label.to_string(),
            page,
        })
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hokusai_core::Delimiter;

    fn compile(text: &str) -> Scenario {
        let table = CellTable::from_delimited("test", text, Delimiter::Comma).unwrap();
        Scenario::compile(&table, &CommandFactory::new(), &CommandSettings::default())
    }

    fn tags(scenario: &Scenario) -> Vec<&str> {
        scenario.commands().iter().map(|c| c.tag()).collect()
    }

    #[test]
    fn test_selection_end_inserted_after_run() {
        let scenario = compile(
            "Command,Arg1,Text\n\
             Selection,*a,Go A\n\
             Selection,*b,Go B\n\
             ,,After\n",
        );
        assert_eq!(
            tags(&scenario),
            vec!["Selection", "Selection", "SelectionEnd", "Text"]
        );
    }

    #[test]
    fn test_explicit_selection_end_not_doubled() {
        let scenario = compile(
            "Command,Arg1,Text\n\
             Selection,*a,Go A\n\
             SelectionEnd,,\n",
        );
        assert_eq!(tags(&scenario), vec!["Selection", "SelectionEnd"]);
    }

    #[test]
    fn test_selection_end_inserted_at_end_of_table() {
        let scenario = compile("Command,Arg1,Text\nSelection,*a,Go A\n");
        assert_eq!(tags(&scenario), vec!["Selection", "SelectionEnd"]);
    }

    #[test]
    fn test_bad_rows_become_diagnostics() {
        let scenario = compile(
            "Command,Arg1,Text\n\
             *start,,\n\
             Teleport,x,\n\
             If,x >,\n\
             ,,Still here\n",
        );
        assert_eq!(tags(&scenario), vec!["ScenarioLabel", "Text"]);
        assert_eq!(scenario.diagnostics().len(), 2);
    }

    #[test]
    fn test_unmatched_conditionals_reported() {
        let scenario = compile("Command,Arg1\nEndIf,\nIf,true\n");
        assert_eq!(scenario.diagnostics().len(), 2);
    }

    #[test]
    fn test_duplicate_label_keeps_first() {
        let scenario = compile("Command,Text\n*a,\n,one\n*a,\n,two\n");
        assert_eq!(scenario.label_index("a"), Some(0));
        assert_eq!(scenario.labels().count(), 1);
        assert_eq!(scenario.diagnostics().len(), 1);
    }

    #[test]
    fn test_seek_page_index() {
        let scenario = compile(
            "Command,Text\n\
             *intro,\n\
             ,p0\n\
             Wait,\n\
             ,p1\n\
             ,p2\n\
             *next,\n\
             ,q0\n",
        );
        assert_eq!(scenario.seek_page_index("intro", -1).unwrap(), 0);
        assert_eq!(scenario.seek_page_index("intro", 0).unwrap(), 0);
        assert_eq!(scenario.seek_page_index("intro", 1).unwrap(), 2);
        assert_eq!(scenario.seek_page_index("intro", 2).unwrap(), 4);
        assert_eq!(scenario.seek_page_index("intro", 3).unwrap(), 5);
        assert!(scenario.seek_page_index("intro", 4).is_err());
        assert!(scenario.seek_page_index("missing", 0).is_err());
        assert_eq!(scenario.seek_page_index("next", 1).unwrap(), 7);
    }
}
