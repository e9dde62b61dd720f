//! Built-in commands.

mod flow;
mod layer;
mod misc;
mod selection;
mod sound;
mod text;

pub use flow::{
    ControlCommand, ElseCommand, ElseIfCommand, EndIfCommand, IfCommand, JumpCommand,
    ScenarioLabelCommand,
};
pub use layer::{LayerCommand, LayerOffCommand};
pub use misc::{FadeCommand, ParamCommand, SendMessageCommand, TweenCommand, WaitCommand};
pub use selection::{SelectionCommand, SelectionEndCommand};
pub use sound::{SoundCommand, StopSoundCommand};
pub use text::{CharacterCommand, CharacterOffCommand, TextCommand};

use crate::{Command, CommandSettings};
use hokusai_core::{AssetCategory, Column, Expression, ParamStore, ResourceHandle, Row, Statements};
use hokusai_error::{CommandError, CommandErrorKind, HokusaiError, HokusaiResult};
use hokusai_interface::ResourceProvider;
use std::sync::Arc;
use tracing::warn;

/// Marker that opens a scenario label in the Command column or a label
/// argument.
pub const LABEL_SIGIL: char = '*';

/// Fade time used when `Arg6` is blank.
pub const DEFAULT_FADE: f32 = 0.2;

/// Tags understood without registration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::IntoStaticStr,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum BuiltinTag {
    /// Narration or dialogue text
    Text,
    /// Character display with optional dialogue
    Character,
    /// Hide characters
    CharacterOff,
    /// Show a background
    Bg,
    /// Clear the background
    BgOff,
    /// Show an event still
    BgEvent,
    /// Clear the event still
    BgEventOff,
    /// Show a sprite
    Sprite,
    /// Clear sprites
    SpriteOff,
    /// Sound effect
    Se,
    /// Background music
    Bgm,
    /// Stop background music
    StopBgm,
    /// Ambient loop
    Ambience,
    /// Stop the ambient loop
    StopAmbience,
    /// Stop every stream
    StopSound,
    /// Timed pause
    Wait,
    /// Fade the screen in
    FadeIn,
    /// Fade the screen out
    FadeOut,
    /// Parameter assignment
    Param,
    /// Open a conditional block
    If,
    /// Alternative branch
    ElseIf,
    /// Fallback branch
    Else,
    /// Close a conditional block
    EndIf,
    /// Selection menu entry
    Selection,
    /// Present the collected selection menu
    SelectionEnd,
    /// Jump to a label
    Jump,
    /// Message to game code
    SendMessage,
    /// Tween animation on a layer or object
    Tween,
    /// End the run normally
    EndScenario,
    /// Stop the run
    StopScenario,
    /// Erase the run
    EraseScenario,
    /// End a scene-gallery scene
    EndSceneGallery,
}

impl BuiltinTag {
    /// Canonical tag text.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Build the command for a row carrying this tag.
    pub fn build(self, row: &Row<'_>, settings: &CommandSettings) -> HokusaiResult<Arc<dyn Command>> {
        let command: Arc<dyn Command> = match self {
            BuiltinTag::Text => Arc::new(TextCommand::from_row(row, settings)?),
            BuiltinTag::Character => Arc::new(CharacterCommand::from_row(row, settings)?),
            BuiltinTag::CharacterOff => Arc::new(CharacterOffCommand::from_row(row)),
            BuiltinTag::Bg | BuiltinTag::BgEvent | BuiltinTag::Sprite => {
                Arc::new(LayerCommand::from_row(self, row, settings)?)
            }
            BuiltinTag::BgOff | BuiltinTag::BgEventOff | BuiltinTag::SpriteOff => {
                Arc::new(LayerOffCommand::from_row(self, row))
            }
            BuiltinTag::Se | BuiltinTag::Bgm | BuiltinTag::Ambience => {
                Arc::new(SoundCommand::from_row(self, row, settings)?)
            }
            BuiltinTag::StopBgm | BuiltinTag::StopAmbience | BuiltinTag::StopSound => {
                Arc::new(StopSoundCommand::from_row(self, row))
            }
            BuiltinTag::Wait => Arc::new(WaitCommand::from_row(row)),
            BuiltinTag::FadeIn | BuiltinTag::FadeOut => Arc::new(FadeCommand::from_row(self, row)),
            BuiltinTag::Param => Arc::new(ParamCommand::from_row(row)?),
            BuiltinTag::If => Arc::new(IfCommand::from_row(row)?),
            BuiltinTag::ElseIf => Arc::new(ElseIfCommand::from_row(row)?),
            BuiltinTag::Else => Arc::new(ElseCommand::from_row(row)),
            BuiltinTag::EndIf => Arc::new(EndIfCommand::from_row(row)),
            BuiltinTag::Selection => Arc::new(SelectionCommand::from_row(row)?),
            BuiltinTag::SelectionEnd => Arc::new(SelectionEndCommand::new(row.context())),
            BuiltinTag::Jump => Arc::new(JumpCommand::from_row(row)?),
            BuiltinTag::SendMessage => Arc::new(SendMessageCommand::from_row(row)?),
            BuiltinTag::Tween => Arc::new(TweenCommand::from_row(row)?),
            BuiltinTag::EndScenario
            | BuiltinTag::StopScenario
            | BuiltinTag::EraseScenario
            | BuiltinTag::EndSceneGallery => Arc::new(ControlCommand::new(self, row.context())),
        };
        Ok(command)
    }
}

fn invalid(row: &Row<'_>, tag: BuiltinTag, reason: impl Into<String>) -> CommandError {
    CommandError::new(CommandErrorKind::InvalidArgument {
        context: row.context(),
        tag: tag.to_string(),
        reason: reason.into(),
    })
}

/// Required text argument.
pub(crate) fn required_text(row: &Row<'_>, column: Column, tag: BuiltinTag) -> HokusaiResult<String> {
    row.cell(column)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| HokusaiError::from(invalid(row, tag, format!("{} is required", column))))
}

/// Optional text argument, trimmed.
pub(crate) fn optional_text(row: &Row<'_>, column: Column) -> Option<String> {
    row.cell(column).map(|text| text.trim().to_string())
}

/// `*label` argument with the sigil stripped.
pub(crate) fn label_argument(row: &Row<'_>, column: Column, tag: BuiltinTag) -> HokusaiResult<String> {
    let raw = required_text(row, column, tag)?;
    match raw.strip_prefix(LABEL_SIGIL) {
        Some(label) if !label.is_empty() => Ok(label.to_string()),
        _ => Err(CommandError::new(CommandErrorKind::InvalidLabel {
            context: row.context(),
            raw,
        })
        .into()),
    }
}

/// Expression argument, parsed now so syntax errors surface at build time.
pub(crate) fn expression_argument(
    row: &Row<'_>,
    column: Column,
    tag: BuiltinTag,
) -> HokusaiResult<Option<Expression>> {
    optional_text(row, column)
        .map(|text| {
            Expression::parse(&text).map_err(|e| HokusaiError::from(invalid(row, tag, e.to_string())))
        })
        .transpose()
}

/// Statement argument, parsed now so syntax errors surface at build time.
pub(crate) fn statements_argument(
    row: &Row<'_>,
    column: Column,
    tag: BuiltinTag,
) -> HokusaiResult<Option<Statements>> {
    optional_text(row, column)
        .map(|text| {
            Statements::parse(&text).map_err(|e| HokusaiError::from(invalid(row, tag, e.to_string())))
        })
        .transpose()
}

/// Fade time from `Arg6`; malformed text is logged and reads as the default.
pub(crate) fn fade_argument(row: &Row<'_>) -> f32 {
    row.try_parse(Column::Arg6).unwrap_or(DEFAULT_FADE)
}

/// Voice clip handle from the `Voice` column.
pub(crate) fn voice_argument(row: &Row<'_>, settings: &CommandSettings) -> Option<ResourceHandle> {
    optional_text(row, Column::Voice)
        .map(|voice| settings.assets.handle(AssetCategory::Voice, &voice))
}

/// The handle if its asset is usable; failed loads are logged and dropped.
pub(crate) fn usable<'h>(
    resources: &dyn ResourceProvider,
    handle: &'h ResourceHandle,
    command: &dyn Command,
) -> Option<&'h ResourceHandle> {
    let state = resources.load_state(handle);
    if state.is_loaded() {
        Some(handle)
    } else {
        warn!(
            row = %command.context(),
            tag = command.tag(),
            resource = %handle,
            state = %state,
            "Resource unavailable, skipped"
        );
        None
    }
}

/// Evaluate a condition; evaluation errors are logged and read as false.
pub(crate) fn condition_holds(
    condition: &Expression,
    params: &ParamStore,
    command: &dyn Command,
) -> bool {
    condition.eval_bool(params).unwrap_or_else(|e| {
        tracing::error!(
            row = %command.context(),
            tag = command.tag(),
            condition = %condition,
            error = %e,
            "Condition failed to evaluate, treated as false"
        );
        false
    })
}
