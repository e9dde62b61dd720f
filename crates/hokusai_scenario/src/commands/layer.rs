//! Background, event still and sprite commands.

use super::{BuiltinTag, fade_argument, optional_text, required_text, usable};
use crate::{Command, CommandSettings, ExecutionContext};
use hokusai_core::{AssetCategory, Column, ResourceHandle, Row};
use hokusai_error::{HokusaiResult, RowContext};

/// Shows an image on the background, event or sprite layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCommand {
    tag: BuiltinTag,
    context: RowContext,
    name: String,
    fade: f32,
    resources: [ResourceHandle; 1],
}

impl LayerCommand {
    /// Build from a `Bg`, `BgEvent` or `Sprite` row.
    ///
    /// # Errors
    ///
    /// Returns an error if `Arg1` (the file name) is blank.
    pub fn from_row(
        tag: BuiltinTag,
        row: &Row<'_>,
        settings: &CommandSettings,
    ) -> HokusaiResult<Self> {
        let name = required_text(row, Column::Arg1, tag)?;
        let category = match tag {
            BuiltinTag::BgEvent => AssetCategory::Event,
            BuiltinTag::Sprite => AssetCategory::Sprite,
            _ => AssetCategory::Bg,
        };
        let texture = settings.assets.handle(category, &name);
        Ok(Self {
            tag,
            context: row.context(),
            name,
            fade: fade_argument(row),
            resources: [texture],
        })
    }

    /// Texture shown.
    pub fn texture(&self) -> &ResourceHandle {
        &self.resources[0]
    }
}

impl Command for LayerCommand {
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
        let Some(texture) = usable(ctx.resources(), self.texture(), self) else {
            return;
        };
        let host = ctx.host();
        match self.tag {
            BuiltinTag::BgEvent => host.set_event_image(texture, self.fade),
            BuiltinTag::Sprite => host.set_sprite(&self.name, texture, self.fade),
            _ => host.set_background(texture, self.fade),
        }
    }
}

/// Clears the background, the event still, or sprites.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerOffCommand {
    tag: BuiltinTag,
    context: RowContext,
    name: Option<String>,
    fade: f32,
}

impl LayerOffCommand {
    /// Build from a `BgOff`, `BgEventOff` or `SpriteOff` row.
    pub fn from_row(tag: BuiltinTag, row: &Row<'_>) -> Self {
        Self {
            tag,
            context: row.context(),
            name: optional_text(row, Column::Arg1),
            fade: fade_argument(row),
        }
    }
}

impl Command for LayerOffCommand {
    fn tag(&self) -> &str {
        self.tag.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        let host = ctx.host();
        match self.tag {
            BuiltinTag::BgEventOff => host.clear_event_image(self.fade),
            BuiltinTag::SpriteOff => host.clear_sprite(self.name.as_deref(), self.fade),
            _ => host.clear_background(self.fade),
        }
    }
}
