//! Sound commands.

use super::{BuiltinTag, fade_argument, required_text, usable};
use crate::{Command, CommandSettings, ExecutionContext};
use hokusai_core::{AssetCategory, Column, ResourceHandle, Row};
use hokusai_error::{HokusaiResult, RowContext};
use hokusai_interface::SoundStream;

/// Plays a clip on the BGM, SE or ambience stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundCommand {
    tag: BuiltinTag,
    context: RowContext,
    stream: SoundStream,
    looping: bool,
    fade: f32,
    resources: [ResourceHandle; 1],
}

impl SoundCommand {
    /// Build from a `Bgm`, `Se` or `Ambience` row.
    ///
    /// `Arg2` overrides looping (BGM and ambience loop by default, effects do
    /// not); `Arg6` is a fade-in time.
    ///
    /// # Errors
    ///
    /// Returns an error if `Arg1` (the file name) is blank.
    pub fn from_row(
        tag: BuiltinTag,
        row: &Row<'_>,
        settings: &CommandSettings,
    ) -> HokusaiResult<Self> {
        let file = required_text(row, Column::Arg1, tag)?;
        let (category, stream) = match tag {
            BuiltinTag::Se => (AssetCategory::Se, SoundStream::Se),
            BuiltinTag::Ambience => (AssetCategory::Ambience, SoundStream::Ambience),
            _ => (AssetCategory::Bgm, SoundStream::Bgm),
        };
        let looping = row
            .try_parse::<bool>(Column::Arg2)
            .unwrap_or(stream != SoundStream::Se);
        let fade = if row.is_empty_cell(Column::Arg6) {
            0.0
        } else {
            fade_argument(row)
        };
        Ok(Self {
            tag,
            context: row.context(),
            stream,
            looping,
            fade,
            resources: [settings.assets.handle(category, &file)],
        })
    }
}

impl Command for SoundCommand {
    fn tag(&self) -> &str {
        self.tag.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn declared_resources(&self) -> &[ResourceHandle] {
        &self.resources
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        if let Some(clip) = usable(ctx.resources(), &self.resources[0], self) {
            ctx.host()
                .play_sound(self.stream, clip, self.looping, self.fade);
        }
    }
}

/// Stops the BGM stream, the ambience stream, or every stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StopSoundCommand {
    tag: BuiltinTag,
    context: RowContext,
    fade: f32,
}

impl StopSoundCommand {
    /// Build from a `StopBgm`, `StopAmbience` or `StopSound` row.
    pub fn from_row(tag: BuiltinTag, row: &Row<'_>) -> Self {
        Self {
            tag,
            context: row.context(),
            fade: fade_argument(row),
        }
    }

    fn stream(&self) -> Option<SoundStream> {
        match self.tag {
            BuiltinTag::StopBgm => Some(SoundStream::Bgm),
            BuiltinTag::StopAmbience => Some(SoundStream::Ambience),
            _ => None,
        }
    }
}

impl Command for StopSoundCommand {
    fn tag(&self) -> &str {
        self.tag.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        let stream = self.stream();
        ctx.host().stop_sound(stream, self.fade);
    }
}
