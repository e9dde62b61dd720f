//! Every scenario compiled so far, keyed by label.

use crate::{CommandFactory, CommandSettings, Scenario};
use hokusai_core::CellTable;
use hokusai_interface::ScenarioSource;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Append-only script corpus.
///
/// Tables are compiled the first time one of their labels is needed. A label
/// keeps the scenario it was first seen in.
#[derive(Debug, Default)]
pub struct ScenarioCorpus {
    factory: CommandFactory,
    settings: CommandSettings,
    scenarios: Vec<Arc<Scenario>>,
    by_table: HashMap<String, usize>,
    labels: HashMap<String, usize>,
}

impl ScenarioCorpus {
    /// Create an empty corpus.
    pub fn new(factory: CommandFactory, settings: CommandSettings) -> Self {
        Self {
            factory,
            settings,
            ..Self::default()
        }
    }

    /// Compile a table unless it already has been.
    #[instrument(skip_all, fields(source = %table.name()))]
    pub fn compile_table(&mut self, table: &CellTable) -> Arc<Scenario> {
        if let Some(&index) = self.by_table.get(table.name()) {
            debug!("Table already compiled");
            return Arc::clone(&self.scenarios[index]);
        }

        let scenario = Arc::new(Scenario::compile(table, &self.factory, &self.settings));
        let index = self.scenarios.len();
        for (label, _) in scenario.labels() {
            match self.labels.get(label) {
                Some(&first) => warn!(
                    label,
                    first = %self.scenarios[first].name(),
                    "Label already defined, first kept"
                ),
                None => {
                    self.labels.insert(label.to_string(), index);
                }
            }
        }
        self.by_table.insert(table.name().clone(), index);
        self.scenarios.push(Arc::clone(&scenario));
        scenario
    }

    /// Scenario defining `label`, compiling its table from `source` if it is
    /// resident and not yet compiled.
    pub fn scenario_for_label(
        &mut self,
        label: &str,
        source: &dyn ScenarioSource,
    ) -> Option<Arc<Scenario>> {
        if let Some(scenario) = self.scenario(label) {
            return Some(scenario);
        }
        let table = source.table_for_label(label)?;
        self.compile_table(&table);
        self.scenario(label)
    }

    /// Scenario defining `label`, if compiled.
    pub fn scenario(&self, label: &str) -> Option<Arc<Scenario>> {
        self.labels
            .get(label)
            .map(|&index| Arc::clone(&self.scenarios[index]))
    }

    /// Compiled scenarios, oldest first.
    pub fn scenarios(&self) -> &[Arc<Scenario>] {
        &self.scenarios
    }

    /// Factory used for tables compiled from now on.
    pub fn factory_mut(&mut self) -> &mut CommandFactory {
        &mut self.factory
    }

    /// Settings used for tables compiled from now on.
    pub fn settings(&self) -> &CommandSettings {
        &self.settings
    }

    /// Settings, writable.
    pub fn settings_mut(&mut self) -> &mut CommandSettings {
        &mut self.settings
    }
}
