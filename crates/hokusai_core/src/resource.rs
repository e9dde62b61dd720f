//! Resource handles and asset path resolution.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Broad type of an externally loaded asset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
pub enum ResourceKind {
    /// Image drawn by the presentation layer
    Texture,
    /// Clip played by the audio layer
    Sound,
}

/// Opaque, cheaply cloned reference to an asset by path.
///
/// Two handles to the same path and kind are the same resource; use counts
/// are tracked by the resource provider, not by the handle.
///
/// # Examples
///
/// ```
/// use hokusai_core::{ResourceHandle, ResourceKind};
///
/// let a = ResourceHandle::new("Texture/BG/room.jpg", ResourceKind::Texture);
/// let b = a.clone();
/// assert_eq!(a, b);
/// assert_eq!(a.path(), "Texture/BG/room.jpg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("{}", path)]
pub struct ResourceHandle {
    path: Arc<str>,
    kind: ResourceKind,
}

impl ResourceHandle {
    /// Create a handle for a resolved asset path.
    pub fn new(path: impl AsRef<str>, kind: ResourceKind) -> Self {
        Self {
            path: Arc::from(path.as_ref()),
            kind,
        }
    }

    /// Resolved asset path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Asset type.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

/// Asset category, each with its own directory and default extension.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetCategory {
    /// Character standing pictures
    Character,
    /// Backgrounds
    Bg,
    /// Event stills
    Event,
    /// Free sprites
    Sprite,
    /// Background music
    Bgm,
    /// Sound effects
    Se,
    /// Looping ambient sound
    Ambience,
    /// Character voices
    Voice,
}

impl AssetCategory {
    /// Resource kind stored in this category.
    pub fn kind(self) -> ResourceKind {
        match self {
            AssetCategory::Character
            | AssetCategory::Bg
            | AssetCategory::Event
            | AssetCategory::Sprite => ResourceKind::Texture,
            AssetCategory::Bgm
            | AssetCategory::Se
            | AssetCategory::Ambience
            | AssetCategory::Voice => ResourceKind::Sound,
        }
    }
}

/// Directory and default extension for one asset category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct AssetDirectory {
    /// Directory relative to the asset root
    dir: String,
    /// Extension appended when a file name has none (including the dot)
    ext: String,
}

impl AssetDirectory {
    /// Create a directory entry.
    pub fn new(dir: impl Into<String>, ext: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            ext: ext.into(),
        }
    }
}

fn character_dir() -> AssetDirectory {
    AssetDirectory::new("Texture/Character", ".png")
}
fn bg_dir() -> AssetDirectory {
    AssetDirectory::new("Texture/BG", ".jpg")
}
fn event_dir() -> AssetDirectory {
    AssetDirectory::new("Texture/Event", ".jpg")
}
fn sprite_dir() -> AssetDirectory {
    AssetDirectory::new("Texture/Sprite", ".png")
}
fn bgm_dir() -> AssetDirectory {
    AssetDirectory::new("Sound/BGM", ".wav")
}
fn se_dir() -> AssetDirectory {
    AssetDirectory::new("Sound/SE", ".wav")
}
fn ambience_dir() -> AssetDirectory {
    AssetDirectory::new("Sound/Ambience", ".wav")
}
fn voice_dir() -> AssetDirectory {
    AssetDirectory::new("Sound/Voice", ".wav")
}

/// Where each asset category lives, used to turn script file names into
/// resource handles.
///
/// # Examples
///
/// ```
/// use hokusai_core::{AssetCategory, AssetDirectories};
///
/// let dirs = AssetDirectories::default();
/// let handle = dirs.handle(AssetCategory::Bg, "room");
/// assert_eq!(handle.path(), "Texture/BG/room.jpg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDirectories {
    /// Prefix applied to every category directory
    #[serde(default)]
    pub root: String,
    /// Character standing pictures
    #[serde(default = "character_dir")]
    pub character: AssetDirectory,
    /// Backgrounds
    #[serde(default = "bg_dir")]
    pub bg: AssetDirectory,
    /// Event stills
    #[serde(default = "event_dir")]
    pub event: AssetDirectory,
    /// Free sprites
    #[serde(default = "sprite_dir")]
    pub sprite: AssetDirectory,
    /// Background music
    #[serde(default = "bgm_dir")]
    pub bgm: AssetDirectory,
    /// Sound effects
    #[serde(default = "se_dir")]
    pub se: AssetDirectory,
    /// Ambient loops
    #[serde(default = "ambience_dir")]
    pub ambience: AssetDirectory,
    /// Voices
    #[serde(default = "voice_dir")]
    pub voice: AssetDirectory,
}

impl Default for AssetDirectories {
    fn default() -> Self {
        Self {
            root: String::new(),
            character: character_dir(),
            bg: bg_dir(),
            event: event_dir(),
            sprite: sprite_dir(),
            bgm: bgm_dir(),
            se: se_dir(),
            ambience: ambience_dir(),
            voice: voice_dir(),
        }
    }
}

impl AssetDirectories {
    /// Directory entry for a category.
    pub fn directory(&self, category: AssetCategory) -> &AssetDirectory {
        match category {
            AssetCategory::Character => &self.character,
            AssetCategory::Bg => &self.bg,
            AssetCategory::Event => &self.event,
            AssetCategory::Sprite => &self.sprite,
            AssetCategory::Bgm => &self.bgm,
            AssetCategory::Se => &self.se,
            AssetCategory::Ambience => &self.ambience,
            AssetCategory::Voice => &self.voice,
        }
    }

    /// Resolve a script file name to an asset path.
    ///
    /// Absolute URLs are returned untouched. Names without an extension get the
    /// category's default one.
    pub fn resolve(&self, category: AssetCategory, file_name: &str) -> String {
        let file_name = file_name.trim();
        if file_name.is_empty() || file_name.contains("://") {
            return file_name.to_string();
        }

        let directory = self.directory(category);
        let mut name = file_name.to_string();
        if Path::new(file_name).extension().is_none() {
            name.push_str(&directory.ext);
        }

        [self.root.as_str(), directory.dir.as_str(), name.as_str()]
            .iter()
            .map(|part| part.trim_matches('/'))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Resolve a file name straight to a handle.
    pub fn handle(&self, category: AssetCategory, file_name: &str) -> ResourceHandle {
        ResourceHandle::new(self.resolve(category, file_name), category.kind())
    }
}
