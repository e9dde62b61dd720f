//! Scenario source backed by tables held in memory.

use crate::commands::LABEL_SIGIL;
use hokusai_core::{CellTable, Column};
use hokusai_interface::ScenarioSource;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
struct Entry {
    table: Arc<CellTable>,
    ready: bool,
}

/// Tables keyed by the labels they define.
///
/// A table added as pending is known but not resident until
/// [`InMemoryScenarioSource::set_ready`] marks it, which models scripts that
/// arrive after they are asked for.
///
/// # Examples
///
/// ```
/// use hokusai_core::{CellTable, Delimiter};
/// use hokusai_interface::ScenarioSource;
/// use hokusai_scenario::InMemoryScenarioSource;
///
/// let table = CellTable::from_delimited("ch1", "Command,Text\n*start,\n,Hi\n", Delimiter::Comma).unwrap();
/// let mut source = InMemoryScenarioSource::new();
/// source.add_pending_table(table);
/// assert!(!source.is_label_loaded("start"));
/// source.set_ready("ch1", true);
/// assert!(source.is_label_loaded("start"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryScenarioSource {
    tables: HashMap<String, Entry>,
    labels: HashMap<String, String>,
    requested: Vec<String>,
}

impl InMemoryScenarioSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table that is resident immediately.
    pub fn add_table(&mut self, table: CellTable) {
        self.insert(table, true);
    }

    /// Add a table that is not resident until marked ready.
    pub fn add_pending_table(&mut self, table: CellTable) {
        self.insert(table, false);
    }

    #[instrument(skip_all, fields(source = %table.name(), ready = ready))]
    fn insert(&mut self, table: CellTable, ready: bool) {
        let name = table.name().clone();
        for label in defined_labels(&table) {
            match self.labels.get(&label) {
                Some(owner) if *owner != name => {
                    warn!(label = %label, first = %owner, "Label already defined by another table, first kept");
                }
                Some(_) => {}
                None => {
                    self.labels.insert(label, name.clone());
                }
            }
        }
        debug!("Added table");
        self.tables.insert(
            name,
            Entry {
                table: Arc::new(table),
                ready,
            },
        );
    }

    /// Mark a table resident or not. Unknown names are ignored.
    pub fn set_ready(&mut self, name: &str, ready: bool) {
        match self.tables.get_mut(name) {
            Some(entry) => entry.ready = ready,
            None => warn!(name, "No such table"),
        }
    }

    /// Labels asked for through [`ScenarioSource::request_label`], in order.
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    /// Name of the table defining `label`.
    pub fn table_name_for_label(&self, label: &str) -> Option<&str> {
        self.labels.get(label).map(String::as_str)
    }

    /// Every table, resident or not.
    pub fn tables(&self) -> impl Iterator<Item = &Arc<CellTable>> {
        self.tables.values().map(|entry| &entry.table)
    }
}

impl ScenarioSource for InMemoryScenarioSource {
    fn request_label(&mut self, label: &str) {
        debug!(label, "Label requested");
        self.requested.push(label.to_string());
    }

    /// Labels no table defines read as loaded: nothing more will arrive, so
    /// the player can report them as undefined instead of waiting forever.
    fn is_label_loaded(&self, label: &str) -> bool {
        match self.labels.get(label) {
            Some(name) => self.tables.get(name).is_some_and(|entry| entry.ready),
            None => true,
        }
    }

    fn table_for_label(&self, label: &str) -> Option<Arc<CellTable>> {
        let entry = self.tables.get(self.labels.get(label)?)?;
        entry.ready.then(|| Arc::clone(&entry.table))
    }
}

/// Labels a table defines through `*label` cells in the Command column.
fn defined_labels(table: &CellTable) -> Vec<String> {
    table
        .data_rows()
        .filter_map(|row| row.cell(Column::Command))
        .filter_map(|cell| cell.trim().strip_prefix(LABEL_SIGIL))
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}
