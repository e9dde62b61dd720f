//! Value types exchanged between the interpreter and its collaborators.

use derive_builder::Builder;
use derive_getters::Getters;
use hokusai_core::{ResourceHandle, Statements};
use hokusai_error::BuilderError;
use serde::{Deserialize, Serialize};

/// Progress of an asset load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum LoadState {
    /// Requested, not finished yet
    Pending,
    /// Ready to use
    Loaded,
    /// Finished without a usable asset
    #[display("Failed: {}", _0)]
    Failed(String),
}

impl LoadState {
    /// Whether the load has finished, successfully or not.
    pub fn is_complete(&self) -> bool {
        !matches!(self, LoadState::Pending)
    }

    /// Whether the asset is usable.
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }
}

/// Who holds a use of a resource.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum ResourceOwner {
    /// The command at this index of the running scenario
    #[display("Command({})", _0)]
    Command(usize),
    /// The player's preload window
    Preload,
}

/// Audio channel a clip plays on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum SoundStream {
    /// Background music, one track at a time
    Bgm,
    /// One-shot sound effects
    Se,
    /// Looping environmental sound
    Ambience,
    /// Character voices
    Voice,
}

/// Direction of a screen fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum FadeDirection {
    /// Fade from black to the scene
    In,
    /// Fade from the scene to black
    Out,
}

/// Why a scenario run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum EndReason {
    /// Ran off the end of the script or hit `EndScenario`
    Completed,
    /// Stopped from outside or by `StopScenario`
    Stopped,
    /// Erased from outside or by `EraseScenario`
    Erased,
}

/// Screen position in layout units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset
    pub x: f32,
    /// Vertical offset
    pub y: f32,
}

impl Position {
    /// Create a position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A character standing picture to show.
#[derive(Debug, Clone, PartialEq, Builder, Getters)]
#[builder(setter(into, strip_option), build_fn(error = "BuilderError"))]
pub struct CharacterSprite {
    /// Character key from the script
    name: String,
    /// Name shown to the player
    #[builder(default)]
    display_name: Option<String>,
    /// Expression or pose key
    #[builder(default)]
    pattern: Option<String>,
    /// Resolved texture, if the character has one for this pattern
    #[builder(default)]
    texture: Option<ResourceHandle>,
    /// Layer to draw on
    #[builder(default)]
    layer: Option<String>,
    /// Position override
    #[builder(default)]
    position: Option<Position>,
    /// Fade time in seconds
    #[builder(default)]
    fade: f32,
}

impl CharacterSprite {
    /// Creates a new character sprite builder.
    pub fn builder() -> CharacterSpriteBuilder {
        CharacterSpriteBuilder::default()
    }
}

/// A line of text for the message window.
#[derive(Debug, Clone, PartialEq, Builder, Getters)]
#[builder(setter(into, strip_option), build_fn(error = "BuilderError"))]
pub struct TextLine {
    /// Body text, markup included
    text: String,
    /// Speaker name, `None` for narration
    #[builder(default)]
    speaker: Option<String>,
    /// Voice clip played with the line
    #[builder(default)]
    voice: Option<ResourceHandle>,
    /// Voice version tag from the script
    #[builder(default)]
    voice_version: Option<i32>,
}

impl TextLine {
    /// Creates a new text line builder.
    pub fn builder() -> TextLineBuilder {
        TextLineBuilder::default()
    }
}

/// One option of a selection menu.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Choice {
    /// Text shown on the button
    caption: String,
    /// Label jumped to when picked
    target_label: String,
    /// Assignments applied when picked
    effect: Option<Statements>,
}

impl Choice {
    /// Create a choice.
    pub fn new(
        caption: impl Into<String>,
        target_label: impl Into<String>,
        effect: Option<Statements>,
    ) -> Self {
        Self {
            caption: caption.into(),
            target_label: target_label.into(),
            effect,
        }
    }
}

/// A tween animation on a named layer or object.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Tween {
    /// Layer or object name
    target: String,
    /// Animation kind, e.g. `MoveTo` or `ScaleTo`
    animation: String,
    /// Animation parameters as written, e.g. `x=100 time=0.5`
    arguments: String,
    /// Repeat count; `None` plays once
    loop_count: Option<u32>,
}

impl Tween {
    /// Create a tween.
    pub fn new(
        target: impl Into<String>,
        animation: impl Into<String>,
        arguments: impl Into<String>,
        loop_count: Option<u32>,
    ) -> Self {
        Self {
            target: target.into(),
            animation: animation.into(),
            arguments: arguments.into(),
            loop_count,
        }
    }
}

/// A resumable position: the label and the page within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct SavePoint {
    /// Scenario label
    label: String,
    /// Page within the label
    page: i32,
}

impl SavePoint {
    /// Create a save point.
    pub fn new(label: impl Into<String>, page: i32) -> Self {
        Self {
            label: label.into(),
            page,
        }
    }
}
