//! Read history and the last autosave point.

use hokusai_error::{HokusaiResult, PersistenceError};
use hokusai_interface::{ReadHistorySink, SavePoint};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, instrument};

/// What the player has already read.
///
/// Pages are read in order, so only the furthest page per label is kept.
///
/// # Examples
///
/// ```
/// use hokusai_interface::ReadHistorySink;
/// use hokusai_scenario::ReadHistory;
///
/// let mut history = ReadHistory::new();
/// history.record_page_read("intro", 2);
/// history.record_page_read("intro", 1);
/// assert!(history.is_page_read("intro", 2));
/// assert!(!history.is_page_read("intro", 3));
/// assert!(!history.is_page_read("ending", 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadHistory {
    #[serde(default)]
    pages: BTreeMap<String, i32>,
    #[serde(default)]
    viewed_scenes: BTreeSet<String>,
    #[serde(default)]
    last_save: Option<SavePoint>,
}

impl ReadHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `page` of `label` has been read.
    pub fn is_page_read(&self, label: &str, page: i32) -> bool {
        self.pages.get(label).is_some_and(|&furthest| page <= furthest)
    }

    /// Furthest page read in `label`.
    pub fn furthest_page(&self, label: &str) -> Option<i32> {
        self.pages.get(label).copied()
    }

    /// Whether a gallery scene has been watched to its end.
    pub fn is_scene_viewed(&self, label: &str) -> bool {
        self.viewed_scenes.contains(label)
    }

    /// Most recent autosave point.
    pub fn last_save(&self) -> Option<&SavePoint> {
        self.last_save.as_ref()
    }

    /// Load a history file. A missing file is an empty history.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> HokusaiResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No history file, starting empty");
            return Ok(Self::new());
        }
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PersistenceError::new(format!("Failed to read history file: {}", e), display.as_str())
        })?;
        let history: Self = serde_json::from_str(&contents).map_err(|e| {
            PersistenceError::new(format!("Failed to parse history file: {}", e), display.as_str())
        })?;
        debug!(labels = history.pages.len(), "Loaded history");
        Ok(history)
    }

    /// Write the history as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be serialized or written.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> HokusaiResult<()> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PersistenceError::new(format!("Failed to serialize history: {}", e), display.as_str())
        })?;
        std::fs::write(path, contents).map_err(|e| {
            PersistenceError::new(format!("Failed to write history file: {}", e), display.as_str())
        })?;
        debug!(labels = self.pages.len(), "Saved history");
        Ok(())
    }
}

impl ReadHistorySink for ReadHistory {
    fn record_page_read(&mut self, label: &str, page: i32) {
        let furthest = self.pages.entry(label.to_string()).or_insert(page);
        *furthest = (*furthest).max(page);
    }

    fn record_scene_viewed(&mut self, label: &str) {
        debug!(label, "Scene viewed");
        self.viewed_scenes.insert(label.to_string());
    }

    fn autosave(&mut self, point: &SavePoint) {
        self.last_save = Some(point.clone());
    }
}
