//! Text and character commands.

use super::{
    BuiltinTag, fade_argument, optional_text, required_text, usable, voice_argument,
};
use crate::{Command, CommandSettings, ExecutionContext};
use hokusai_core::{AssetCategory, Column, ResourceHandle, Row};
use hokusai_error::{HokusaiResult, RowContext};
use hokusai_interface::{CharacterSprite, Position, TextLine};
use tracing::{error, warn};

/// Pattern value that hides the character instead of showing it.
pub const PATTERN_OFF: &str = "<Off>";

#[derive(Debug, Clone, PartialEq)]
struct Line {
    text: String,
    voice: Option<ResourceHandle>,
    voice_version: Option<i32>,
}

impl Line {
    fn from_row(row: &Row<'_>, settings: &CommandSettings) -> Option<Self> {
        let text = row.cell(Column::Text)?.to_string();
        Some(Self {
            text,
            voice: voice_argument(row, settings),
            voice_version: row.try_parse(Column::VoiceVersion),
        })
    }

    fn show(&self, speaker: Option<&str>, ctx: &mut ExecutionContext<'_>, command: &dyn Command) {
        let mut builder = TextLine::builder();
        builder.text(self.text.as_str());
        if let Some(speaker) = speaker {
            builder.speaker(speaker);
        }
        if let Some(voice) = self
            .voice
            .as_ref()
            .and_then(|voice| usable(ctx.resources(), voice, command))
        {
            builder.voice(voice.clone());
        }
        if let Some(version) = self.voice_version {
            builder.voice_version(version);
        }
        match builder.build() {
            Ok(line) => ctx.host().show_text(&line),
            Err(e) => error!(row = %command.context(), error = %e, "Failed to build text line"),
        }
    }
}

/// Narration: shows a line of text and waits for it to finish.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    context: RowContext,
    line: Option<Line>,
    resources: Vec<ResourceHandle>,
}

impl TextCommand {
    /// Build from a row.
    pub fn from_row(row: &Row<'_>, settings: &CommandSettings) -> HokusaiResult<Self> {
        let line = Line::from_row(row, settings);
        let resources = line.iter().filter_map(|l| l.voice.clone()).collect();
        Ok(Self {
            context: row.context(),
            line,
            resources,
        })
    }

    /// The text shown, if any.
    pub fn text(&self) -> Option<&str> {
        self.line.as_ref().map(|line| line.text.as_str())
    }
}

impl Command for TextCommand {
    fn tag(&self) -> &str {
        BuiltinTag::Text.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn declared_resources(&self) -> &[ResourceHandle] {
        &self.resources
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        if let Some(line) = &self.line {
            line.show(None, ctx, self);
        }
    }

    fn is_wait_complete(&self, ctx: &mut ExecutionContext<'_>) -> bool {
        self.line.is_none() || ctx.host().is_text_display_complete()
    }

    fn is_page_boundary(&self) -> bool {
        self.line.is_some()
    }
}

/// Shows (or hides) a character, optionally speaking a line.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterCommand {
    context: RowContext,
    name: String,
    display_name: String,
    pattern: Option<String>,
    hide: bool,
    texture: Option<ResourceHandle>,
    layer: Option<String>,
    position: Option<Position>,
    fade: f32,
    line: Option<Line>,
    resources: Vec<ResourceHandle>,
}

impl CharacterCommand {
    /// Build from a row.
    ///
    /// # Errors
    ///
    /// Returns an error if `Arg1` (the character name) is blank.
    pub fn from_row(row: &Row<'_>, settings: &CommandSettings) -> HokusaiResult<Self> {
        let name = required_text(row, Column::Arg1, BuiltinTag::Character)?;
        let pattern = optional_text(row, Column::Arg2);
        let hide = pattern.as_deref() == Some(PATTERN_OFF);
        let info = settings.characters.get(&name);

        let display_name = info.map_or_else(|| name.clone(), |info| info.display_name().clone());
        let texture = match (info, hide) {
            (_, true) | (None, _) => None,
            (Some(info), false) => match info.file_name(pattern.as_deref()) {
                Some(file) => Some(settings.assets.handle(AssetCategory::Character, file)),
                None => {
                    warn!(
                        row = %row.context(),
                        character = %name,
                        pattern = ?pattern,
                        "Unknown character pattern, shown without a texture"
                    );
                    None
                }
            },
        };

        let x = row.try_parse::<f32>(Column::Arg4);
        let y = row.try_parse::<f32>(Column::Arg5);
        let position = (x.is_some() || y.is_some())
            .then(|| Position::new(x.unwrap_or_default(), y.unwrap_or_default()));

        let line = Line::from_row(row, settings);
        let resources = texture
            .iter()
            .cloned()
            .chain(line.iter().filter_map(|l| l.voice.clone()))
            .collect();

        Ok(Self {
            context: row.context(),
            name,
            display_name,
            pattern,
            hide,
            texture,
            layer: optional_text(row, Column::Arg3),
            position,
            fade: fade_argument(row),
            line,
            resources,
        })
    }

    /// Character key.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn sprite(&self, ctx: &ExecutionContext<'_>) -> HokusaiResult<CharacterSprite> {
        let mut builder = CharacterSprite::builder();
        builder
            .name(self.name.as_str())
            .display_name(self.display_name.as_str())
            .fade(self.fade);
        if let Some(pattern) = &self.pattern {
            builder.pattern(pattern.as_str());
        }
        if let Some(texture) = self
            .texture
            .as_ref()
            .and_then(|texture| usable(ctx.resources(), texture, self))
        {
            builder.texture(texture.clone());
        }
        if let Some(layer) = &self.layer {
            builder.layer(layer.as_str());
        }
        if let Some(position) = self.position {
            builder.position(position);
        }
        Ok(builder.build()?)
    }
}

impl Command for CharacterCommand {
    fn tag(&self) -> &str {
        BuiltinTag::Character.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn declared_resources(&self) -> &[ResourceHandle] {
        &self.resources
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        if self.hide {
            ctx.host().hide_character(Some(self.name.as_str()), self.fade);
        } else {
            match self.sprite(ctx) {
                Ok(sprite) => ctx.host().show_character(&sprite),
                Err(e) => error!(row = %self.context, error = %e, "Failed to build character"),
            }
        }
        if let Some(line) = &self.line {
            line.show(Some(self.display_name.as_str()), ctx, self);
        }
    }

    fn is_wait_complete(&self, ctx: &mut ExecutionContext<'_>) -> bool {
        self.line.is_none() || ctx.host().is_text_display_complete()
    }

    fn is_page_boundary(&self) -> bool {
        self.line.is_some()
    }
}

/// Hides one character, or all of them when `Arg1` is blank.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterOffCommand {
    context: RowContext,
    name: Option<String>,
    fade: f32,
}

impl CharacterOffCommand {
    /// Build from a row.
    pub fn from_row(row: &Row<'_>) -> Self {
        Self {
            context: row.context(),
            name: optional_text(row, Column::Arg1),
            fade: fade_argument(row),
        }
    }
}

impl Command for CharacterOffCommand {
    fn tag(&self) -> &str {
        BuiltinTag::CharacterOff.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        ctx.host().hide_character(self.name.as_deref(), self.fade);
    }
}
