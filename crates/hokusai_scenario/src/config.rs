//! Engine configuration.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from hokusai.toml)
//! - `~/.config/hokusai/hokusai.toml`
//! - `./hokusai.toml`

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use hokusai_core::{AssetDirectories, Delimiter, ParamStore};
use hokusai_error::{BuilderError, ConfigError, HokusaiError, HokusaiResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, instrument};

fn default_preload_cap() -> usize {
    20
}

fn default_frame_interval_ms() -> u64 {
    16
}

/// Player tuning.
///
/// # Examples
///
/// ```
/// use hokusai_scenario::PlayerConfig;
///
/// let config = PlayerConfig::builder().preload_cap(8usize).build().unwrap();
/// assert_eq!(*config.preload_cap(), 8);
/// assert_eq!(*config.frame_interval_ms(), 16);
/// assert!(PlayerConfig::builder().preload_cap(0usize).build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), build_fn(error = "BuilderError", validate = "Self::validate"))]
pub struct PlayerConfig {
    /// Most distinct resources the preload window holds
    #[serde(default = "default_preload_cap")]
    #[builder(default = "default_preload_cap()")]
    preload_cap: usize,
    /// Tick interval used by the CLI runner, in milliseconds
    #[serde(default = "default_frame_interval_ms")]
    #[builder(default = "default_frame_interval_ms()")]
    frame_interval_ms: u64,
}

impl PlayerConfig {
    /// Creates a new builder.
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }
}

impl PlayerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.preload_cap == Some(0) {
            return Err("preload_cap must be at least 1".to_string());
        }
        if self.frame_interval_ms == Some(0) {
            return Err("frame_interval_ms must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            preload_cap: default_preload_cap(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

/// How script files are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ScriptConfig {
    /// Cell separator; chosen from the file extension when unset
    #[serde(default)]
    delimiter: Option<Delimiter>,
    /// Row holding the column names
    #[serde(default)]
    header_row: usize,
    /// Character settings table
    #[serde(default)]
    characters: Option<PathBuf>,
}

impl ScriptConfig {
    /// Delimiter for a script file.
    pub fn delimiter_for(&self, path: &std::path::Path) -> Delimiter {
        self.delimiter.unwrap_or_else(|| {
            Delimiter::from_extension(
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or_default(),
            )
        })
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct HokusaiConfig {
    /// Player tuning
    #[serde(default)]
    player: PlayerConfig,
    /// Script reading
    #[serde(default)]
    script: ScriptConfig,
    /// Asset directories
    #[serde(default)]
    assets: AssetDirectories,
    /// Initial parameter values
    #[serde(default)]
    params: ParamStore,
    /// Labels registered as scene-gallery scenes
    #[serde(default)]
    gallery_labels: Vec<String>,
}

impl HokusaiConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> HokusaiResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                HokusaiError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                HokusaiError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load the bundled defaults with any user overrides on top.
    ///
    /// Missing user files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed.
    #[instrument]
    pub fn load() -> HokusaiResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../hokusai.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/hokusai/hokusai.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("hokusai").required(false));

        builder
            .build()
            .map_err(|e| {
                HokusaiError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                HokusaiError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
